//! 错误类型定义

use thiserror::Error;

use crate::alliance::Alliance;

/// 国际象棋规则错误
///
/// 只覆盖构造局面时的输入错误；走子被拒绝通过 [`MoveStatus`](crate::MoveStatus) 表达，
/// 不会以错误形式返回。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// 无效的格子编号
    #[error("Invalid square index: {index}")]
    InvalidSquare { index: usize },

    /// 无效的代数记号（如 "e4"）
    #[error("Invalid square notation: {text:?}")]
    InvalidNotation { text: String },

    /// 缺少王
    #[error("Board has no {alliance} king")]
    MissingKing { alliance: Alliance },

    /// 同一方出现多个王
    #[error("Board has {count} {alliance} kings")]
    MultipleKings { alliance: Alliance, count: usize },

    /// 吃过路兵目标不是棋盘上的对方兵
    #[error("En passant pawn on {square} is not an opposing pawn on the board")]
    InvalidEnPassantPawn { square: String },

    /// 非走子方正被将军（王可以被直接吃掉）
    #[error("Side not to move ({alliance}) is in check")]
    OpponentInCheck { alliance: Alliance },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
