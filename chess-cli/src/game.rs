//! 对局控制
//!
//! 持有当前局面、走子记录和对局配置。电脑走子在独立线程中搜索。

use std::thread;

use anyhow::{anyhow, bail, Context, Result};
use chess_ai::{AiEngine, GameConfig};
use chess_core::{Alliance, Board, Move, MoveLog, MoveStatus, Square};
use tracing::{debug, info};

/// 对局状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Checkmate { winner: Alliance },
    Stalemate,
}

/// 一局棋
#[derive(Debug)]
pub struct Game {
    board: Board,
    log: MoveLog,
    config: GameConfig,
}

impl Game {
    /// 从标准开局创建
    pub fn new(config: GameConfig) -> Self {
        Self::with_board(config, Board::standard())
    }

    pub fn with_board(config: GameConfig, board: Board) -> Self {
        Self {
            board,
            log: MoveLog::new(),
            config,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        let player = self.board.current_player();
        if player.is_in_check_mate() {
            GameState::Checkmate {
                winner: player.alliance().opponent(),
            }
        } else if player.is_in_stale_mate() {
            GameState::Stalemate
        } else {
            GameState::Playing
        }
    }

    /// 当前走子方是否由电脑控制
    pub fn is_computer_turn(&self) -> bool {
        self.config.is_computer(self.board.next_move_maker())
    }

    /// 执行走子，成功时更新局面并记录
    pub fn make_move(&mut self, mv: Move) -> MoveStatus {
        let transition = self.board.current_player().make_move(&mv);
        let status = transition.status();
        if status.is_done() {
            let next = transition.into_board();
            self.board = next;
            self.log.add_move(mv);
            debug!(%mv, capture = mv.is_attack(), castle = mv.is_castle(), "已记录走法");
        }
        status
    }

    /// 解析 "e2 e4" 或 "e2e4" 形式的输入并走子
    pub fn play_input(&mut self, input: &str) -> Result<MoveStatus> {
        let (from, to) = parse_input(input)?;
        let mv = self.board.move_between(from, to);
        Ok(self.make_move(mv))
    }

    /// 某一格上棋子的候选落点
    pub fn moves_from(&self, square: Square) -> Vec<Move> {
        self.board.current_player().moves_from(square)
    }

    /// 在工作线程中搜索电脑的走法
    pub fn computer_move(&self) -> Result<Option<Move>> {
        let ai_config = self.config.ai_config()?;
        let board = self.board.clone();
        let alliance = board.next_move_maker();
        info!(%alliance, depth = ai_config.search_depth, "电脑思考中");

        let worker = thread::Builder::new()
            .name("chess-ai".to_string())
            .spawn(move || AiEngine::new(ai_config).search(&board))
            .context("无法启动 AI 线程")?;
        worker.join().map_err(|_| anyhow!("AI 线程异常退出"))
    }

    /// 走子历史，每回合一行
    pub fn history_text(&self) -> String {
        let mut output = String::new();
        for (i, row) in self.log.history_rows(&self.board).iter().enumerate() {
            output.push_str(&format!("{}.", i + 1));
            if let Some(white) = &row.white {
                output.push_str(&format!(" {white}"));
            }
            if let Some(black) = &row.black {
                output.push_str(&format!(" {black}"));
            }
            output.push('\n');
        }
        output
    }
}

/// 解析起点和终点
pub fn parse_input(input: &str) -> Result<(Square, Square)> {
    let compact: String = input.split_whitespace().collect();
    if compact.len() != 4 || !compact.is_ascii() {
        bail!("无法识别的走法: {input:?}，示例: e2 e4");
    }
    let from: Square = compact[..2].parse()?;
    let to: Square = compact[2..].parse()?;
    Ok((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_ai::PlayerType;
    use chess_core::{BoardBuilder, Piece, PieceKind};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn human_game() -> Game {
        Game::new(GameConfig {
            white: PlayerType::Human,
            black: PlayerType::Human,
            search_depth: 1,
        })
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("e2 e4").unwrap(), (sq("e2"), sq("e4")));
        assert_eq!(parse_input("g1f3").unwrap(), (sq("g1"), sq("f3")));
        assert!(parse_input("e2").is_err());
        assert!(parse_input("z9 e4").is_err());
    }

    #[test]
    fn test_play_input() {
        let mut game = human_game();
        assert_eq!(game.play_input("e2 e4").unwrap(), MoveStatus::Done);
        assert_eq!(game.board().next_move_maker(), Alliance::Black);
        assert_eq!(game.log().len(), 1);

        // 轮到黑方，白方的走法无效
        assert_eq!(game.play_input("d2 d4").unwrap(), MoveStatus::IllegalMove);
        assert_eq!(game.log().len(), 1);
        assert_eq!(game.board().next_move_maker(), Alliance::Black);
    }

    #[test]
    fn test_fools_mate() {
        let mut game = human_game();
        for input in ["f2 f3", "e7 e5", "g2 g4", "d8 h4"] {
            assert!(game.play_input(input).unwrap().is_done());
        }
        assert_eq!(
            game.state(),
            GameState::Checkmate {
                winner: Alliance::Black
            }
        );
        assert_eq!(game.history_text(), "1. f3 e5\n2. g4 Qh4#\n");
    }

    #[test]
    fn test_moves_from() {
        let game = human_game();
        let targets: Vec<Square> = game
            .moves_from(sq("g1"))
            .iter()
            .filter_map(|mv| mv.destination())
            .collect();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&sq("f3")));
        assert!(targets.contains(&sq("h3")));
    }

    #[test]
    fn test_with_board_black_to_move() {
        // 黑方先走的残局，历史第一行白方一栏为空
        let board = BoardBuilder::new()
            .set_piece(Piece::new(PieceKind::King, Alliance::White, sq("e1")))
            .set_piece(Piece::new(PieceKind::Rook, Alliance::White, sq("a1")))
            .set_piece(Piece::new(PieceKind::King, Alliance::Black, sq("e8")))
            .set_piece(Piece::new(PieceKind::Rook, Alliance::Black, sq("a8")))
            .set_piece(Piece::new(PieceKind::Rook, Alliance::Black, sq("h8")))
            .set_move_maker(Alliance::Black)
            .build()
            .unwrap();
        let config = GameConfig {
            white: PlayerType::Human,
            black: PlayerType::Computer,
            search_depth: 2,
        };
        let mut game = Game::with_board(config, board);
        assert_eq!(game.config(), &config);
        assert!(game.is_computer_turn());

        // 吃车后将军，但不是最后一步，不带后缀
        assert!(game.play_input("a8 a1").unwrap().is_done());
        assert!(game.log().moves()[0].is_attack());
        assert!(game.play_input("e1 d2").unwrap().is_done());
        assert!(game.play_input("e8 g8").unwrap().is_done());
        assert!(game.log().moves()[2].is_castle());

        assert_eq!(game.history_text(), "1. Rxa1\n2. Kd2 O-O\n");
    }

    #[test]
    fn test_computer_move() {
        let mut game = Game::new(GameConfig {
            white: PlayerType::Computer,
            black: PlayerType::Human,
            search_depth: 1,
        });
        assert!(game.is_computer_turn());

        let mv = game.computer_move().unwrap().unwrap();
        assert_eq!(game.make_move(mv), MoveStatus::Done);
        assert!(!game.is_computer_turn());
        assert_eq!(game.state(), GameState::Playing);
    }
}
