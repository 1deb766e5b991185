//! 阵营定义

use serde::{Deserialize, Serialize};

use crate::square::{Square, EIGHTH_RANK, FIRST_RANK, SECOND_RANK, SEVENTH_RANK};

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alliance {
    /// 白方（先手，在下方）
    White,
    /// 黑方（后手，在上方）
    Black,
}

impl Alliance {
    /// 前进方向（格子编号的增减符号）
    ///
    /// 编号 0 为 a8，白方朝编号减小的方向前进。
    pub fn direction(&self) -> i8 {
        match self {
            Alliance::White => -1,
            Alliance::Black => 1,
        }
    }

    /// 相反方向
    pub fn opposite_direction(&self) -> i8 {
        -self.direction()
    }

    /// 获取对方阵营
    pub fn opponent(&self) -> Alliance {
        match self {
            Alliance::White => Alliance::Black,
            Alliance::Black => Alliance::White,
        }
    }

    pub fn is_white(&self) -> bool {
        *self == Alliance::White
    }

    pub fn is_black(&self) -> bool {
        *self == Alliance::Black
    }

    /// 该格是否位于本方的升变线上
    pub fn is_pawn_promotion_square(&self, square: Square) -> bool {
        match self {
            Alliance::White => EIGHTH_RANK[square.index()],
            Alliance::Black => FIRST_RANK[square.index()],
        }
    }

    /// 该格是否位于本方兵的初始行
    pub fn is_pawn_start_square(&self, square: Square) -> bool {
        match self {
            Alliance::White => SECOND_RANK[square.index()],
            Alliance::Black => SEVENTH_RANK[square.index()],
        }
    }
}

impl std::fmt::Display for Alliance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alliance::White => write!(f, "White"),
            Alliance::Black => write!(f, "Black"),
        }
    }
}
