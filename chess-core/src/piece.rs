//! 棋子定义

use serde::{Deserialize, Serialize};

use crate::alliance::Alliance;
use crate::board::Board;
use crate::movegen::MoveGenerator;
use crate::moves::Move;
use crate::square::Square;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// 获取棋子的子力分值（用于 AI 评估）
    pub fn value(&self) -> i32 {
        match self {
            PieceKind::Pawn => 10,
            PieceKind::Knight => 30,
            PieceKind::Bishop => 30,
            PieceKind::Rook => 50,
            PieceKind::Queen => 90,
            PieceKind::King => 99999,
        }
    }

    /// 棋子字母（白方大写，黑方小写）
    pub fn to_char(&self, alliance: Alliance) -> char {
        let c = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        match alliance {
            Alliance::White => c.to_ascii_uppercase(),
            Alliance::Black => c,
        }
    }

    pub fn is_king(&self) -> bool {
        *self == PieceKind::King
    }

    pub fn is_rook(&self) -> bool {
        *self == PieceKind::Rook
    }
}

/// 棋子
///
/// 相等性由 (类型, 阵营, 位置, 是否未动) 共同决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub alliance: Alliance,
    pub position: Square,
    /// 是否还未移动过（王车易位、兵双步依赖此标记）
    pub first_move: bool,
}

impl Piece {
    /// 创建尚未移动过的棋子
    pub fn new(kind: PieceKind, alliance: Alliance, position: Square) -> Self {
        Self {
            kind,
            alliance,
            position,
            first_move: true,
        }
    }

    /// 设置是否未动标记
    pub fn with_first_move(self, first_move: bool) -> Self {
        Self { first_move, ..self }
    }

    /// 走到目标格后的新棋子（清除未动标记）
    pub fn move_to(&self, destination: Square) -> Piece {
        Piece {
            position: destination,
            first_move: false,
            ..*self
        }
    }

    /// 兵升变后的棋子（固定为后）
    pub fn promoted(&self, destination: Square) -> Piece {
        Piece {
            kind: PieceKind::Queen,
            alliance: self.alliance,
            position: destination,
            first_move: false,
        }
    }

    /// 获取棋子分值
    pub fn value(&self) -> i32 {
        self.kind.value()
    }

    /// 棋子字母
    pub fn to_char(&self) -> char {
        self.kind.to_char(self.alliance)
    }

    /// 该棋子在给定局面下的伪合法走法（不考虑己方王的安全）
    pub fn pseudo_legal_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::new();
        MoveGenerator::generate_piece_moves(board, *self, &mut moves);
        moves
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.to_char(), self.position)
    }
}
