use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use chess_ai::GameConfig;
use chess_cli::{Game, GameState};
use chess_core::MoveStatus;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("chess_cli=info".parse()?)
                .add_directive("chess_ai=info".parse()?),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            GameConfig::load(&path).with_context(|| format!("读取对局配置失败: {path}"))?
        }
        None => GameConfig::default(),
    };
    info!(?config, "对局开始");

    let mut game = Game::new(config);
    let mut lines = io::stdin().lock().lines();

    loop {
        println!("{}", game.board());
        match game.state() {
            GameState::Checkmate { winner } => {
                println!("将死，{winner} 获胜");
                break;
            }
            GameState::Stalemate => {
                println!("逼和");
                break;
            }
            GameState::Playing => {}
        }

        let side = game.board().next_move_maker();
        if game.board().current_player().is_in_check() {
            println!("{side} 被将军");
        }

        if game.is_computer_turn() {
            let Some(mv) = game.computer_move()? else {
                warn!(%side, "电脑没有可走的棋");
                break;
            };
            if !game.make_move(mv).is_done() {
                bail!("电脑给出的走法无法执行: {mv}");
            }
            println!("{side}: {mv}");
            continue;
        }

        print!("{side} > ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let input = line.trim();

        match input {
            "" => continue,
            "quit" | "exit" => break,
            "history" => {
                print!("{}", game.history_text());
                continue;
            }
            _ => {}
        }

        // "moves e2" 列出该格棋子的候选落点
        if let Some(square) = input.strip_prefix("moves ") {
            match square.trim().parse() {
                Ok(square) => {
                    let moves: Vec<String> =
                        game.moves_from(square).iter().map(|mv| mv.to_string()).collect();
                    println!("{}", moves.join(" "));
                }
                Err(e) => println!("{e}"),
            }
            continue;
        }

        match game.play_input(input) {
            Ok(MoveStatus::Done) => {}
            Ok(MoveStatus::IllegalMove) => println!("不合法的走法"),
            Ok(MoveStatus::LeavesPlayerInCheck) => println!("走完后己方王会被将军"),
            Err(e) => println!("{e}"),
        }
    }

    print!("{}", game.history_text());
    Ok(())
}
