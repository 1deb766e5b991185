//! 走法定义与执行
//!
//! 走法只是描述：执行时从源局面复制未受影响的棋子，应用本走法的变化，
//! 然后通过 [`BoardBuilder`] 得到新局面，源局面保持不变。

use crate::alliance::Alliance;
use crate::board::{Board, BoardBuilder};
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

/// 走法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    /// 普通移动（非兵）
    Major { piece: Piece, destination: Square },
    /// 普通吃子（非兵）
    MajorAttack {
        piece: Piece,
        destination: Square,
        attacked: Piece,
    },
    /// 兵前进一格
    PawnPush { piece: Piece, destination: Square },
    /// 兵从初始行前进两格
    PawnJump { piece: Piece, destination: Square },
    /// 兵斜吃
    PawnAttack {
        piece: Piece,
        destination: Square,
        attacked: Piece,
    },
    /// 吃过路兵：被吃的兵在目标格的横向相邻格，而不在目标格上
    PawnEnPassantAttack {
        piece: Piece,
        destination: Square,
        attacked: Piece,
    },
    /// 升变，包装一次前进（`attacked` 为空）或一次斜吃
    PawnPromotion {
        piece: Piece,
        destination: Square,
        attacked: Option<Piece>,
    },
    /// 短易位
    KingSideCastle {
        king: Piece,
        destination: Square,
        rook: Piece,
        rook_destination: Square,
    },
    /// 长易位
    QueenSideCastle {
        king: Piece,
        destination: Square,
        rook: Piece,
        rook_destination: Square,
    },
    /// 空走法：两格之间找不到对应的合法走法
    Null,
}

impl Move {
    /// 被移动的棋子
    pub fn moved_piece(&self) -> Option<Piece> {
        match *self {
            Move::Major { piece, .. }
            | Move::MajorAttack { piece, .. }
            | Move::PawnPush { piece, .. }
            | Move::PawnJump { piece, .. }
            | Move::PawnAttack { piece, .. }
            | Move::PawnEnPassantAttack { piece, .. }
            | Move::PawnPromotion { piece, .. } => Some(piece),
            Move::KingSideCastle { king, .. } | Move::QueenSideCastle { king, .. } => Some(king),
            Move::Null => None,
        }
    }

    /// 起始格
    pub fn current_square(&self) -> Option<Square> {
        self.moved_piece().map(|piece| piece.position)
    }

    /// 目标格
    pub fn destination(&self) -> Option<Square> {
        match *self {
            Move::Major { destination, .. }
            | Move::MajorAttack { destination, .. }
            | Move::PawnPush { destination, .. }
            | Move::PawnJump { destination, .. }
            | Move::PawnAttack { destination, .. }
            | Move::PawnEnPassantAttack { destination, .. }
            | Move::PawnPromotion { destination, .. }
            | Move::KingSideCastle { destination, .. }
            | Move::QueenSideCastle { destination, .. } => Some(destination),
            Move::Null => None,
        }
    }

    /// 被吃的棋子
    pub fn attacked_piece(&self) -> Option<Piece> {
        match *self {
            Move::MajorAttack { attacked, .. }
            | Move::PawnAttack { attacked, .. }
            | Move::PawnEnPassantAttack { attacked, .. } => Some(attacked),
            Move::PawnPromotion { attacked, .. } => attacked,
            _ => None,
        }
    }

    pub fn is_attack(&self) -> bool {
        self.attacked_piece().is_some()
    }

    pub fn is_castle(&self) -> bool {
        matches!(self, Move::KingSideCastle { .. } | Move::QueenSideCastle { .. })
    }

    /// 易位中的车及其目标格
    pub fn castle_rook(&self) -> Option<(Piece, Square)> {
        match *self {
            Move::KingSideCastle {
                rook,
                rook_destination,
                ..
            }
            | Move::QueenSideCastle {
                rook,
                rook_destination,
                ..
            } => Some((rook, rook_destination)),
            _ => None,
        }
    }

    /// 在生成本走法的局面上执行，得到新局面
    pub(crate) fn execute(&self, board: &Board) -> Board {
        let (piece, destination) = match (self.moved_piece(), self.destination()) {
            (Some(piece), Some(destination)) => (piece, destination),
            _ => return board.clone(),
        };
        let attacked = self.attacked_piece();
        let rook = self.castle_rook();

        let mut builder = BoardBuilder::new();
        for other in board.all_pieces() {
            let affected = other == piece
                || Some(other) == attacked
                || rook.is_some_and(|(rook, _)| rook == other);
            if !affected {
                builder.set_piece(other);
            }
        }

        let placed = match self {
            Move::PawnPromotion { .. } => piece.promoted(destination),
            _ => piece.move_to(destination),
        };
        builder.set_piece(placed);

        if let Some((rook, rook_destination)) = rook {
            builder.set_piece(rook.move_to(rook_destination));
        }

        let en_passant_pawn = match self {
            Move::PawnJump { .. } => Some(placed),
            _ => None,
        };

        builder
            .set_move_maker(piece.alliance.opponent())
            .set_en_passant_pawn(en_passant_pawn)
            .build_unchecked()
    }
}

impl std::fmt::Display for Move {
    /// 简化代数记谱（"e4"、"exd5"、"Nf3"、"O-O"、"e8=Q"）
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Move::Major { piece, destination } => {
                write!(f, "{}{}", piece.kind.to_char(Alliance::White), destination)
            }
            Move::MajorAttack {
                piece, destination, ..
            } => write!(
                f,
                "{}x{}",
                piece.kind.to_char(Alliance::White),
                destination
            ),
            Move::PawnPush { destination, .. } | Move::PawnJump { destination, .. } => {
                write!(f, "{}", destination)
            }
            Move::PawnAttack {
                piece, destination, ..
            }
            | Move::PawnEnPassantAttack {
                piece, destination, ..
            } => write!(f, "{}x{}", piece.position.file_char(), destination),
            Move::PawnPromotion {
                piece,
                destination,
                attacked,
            } => {
                let queen = PieceKind::Queen.to_char(Alliance::White);
                match attacked {
                    Some(_) => write!(
                        f,
                        "{}x{}={}",
                        piece.position.file_char(),
                        destination,
                        queen
                    ),
                    None => write!(f, "{}={}", destination, queen),
                }
            }
            Move::KingSideCastle { .. } => write!(f, "O-O"),
            Move::QueenSideCastle { .. } => write!(f, "O-O-O"),
            Move::Null => write!(f, "-"),
        }
    }
}
