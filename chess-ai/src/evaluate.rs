//! 棋局评估函数

use chess_core::{Alliance, Board, Player};

/// 对方被将军时的加分
pub const CHECK_BONUS: i32 = 5;

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 评估棋局（白方视角，正值对白方有利）
    ///
    /// 每一方的得分 = 子力 + 走法数 + 将军加分，结果为白方减黑方。
    pub fn evaluate(board: &Board) -> i32 {
        Self::score_player(&board.white_player()) - Self::score_player(&board.black_player())
    }

    fn score_player(player: &Player<'_>) -> i32 {
        Self::material(player) + Self::mobility(player) + Self::check(player)
    }

    fn material(player: &Player<'_>) -> i32 {
        player.active_pieces().iter().map(|piece| piece.value()).sum()
    }

    // 伪合法走法加易位，与 legal_moves 一致
    fn mobility(player: &Player<'_>) -> i32 {
        player.legal_moves().len() as i32
    }

    fn check(player: &Player<'_>) -> i32 {
        if player.opponent().is_in_check() {
            CHECK_BONUS
        } else {
            0
        }
    }

    /// 快速评估（仅计算子力差）
    pub fn evaluate_material(board: &Board) -> i32 {
        let mut score = 0;
        for piece in board.all_pieces() {
            match piece.alliance {
                Alliance::White => score += piece.value(),
                Alliance::Black => score -= piece.value(),
            }
        }
        score
    }
}
