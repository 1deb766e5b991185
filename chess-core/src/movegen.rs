//! 伪合法走法生成
//!
//! 只考虑棋子走法和棋盘占用，不检查己方王是否安全；
//! 王的安全统一在 [`Player::make_move`](crate::Player::make_move) 中判断。

use crate::alliance::Alliance;
use crate::board::Board;
use crate::constants::NUM_TILES;
use crate::moves::Move;
use crate::piece::{Piece, PieceKind};
use crate::square::{Square, EIGHTH_COLUMN, FIRST_COLUMN, SECOND_COLUMN, SEVENTH_COLUMN};

type Mask = [bool; NUM_TILES];

/// 一个偏移量及其需要排除的边界列
///
/// 起点落在任一掩码内时，该偏移会绕到棋盘另一侧，必须跳过。
#[derive(Clone, Copy)]
struct Direction {
    offset: i8,
    edges: &'static [&'static Mask],
}

impl Direction {
    const fn new(offset: i8, edges: &'static [&'static Mask]) -> Self {
        Self { offset, edges }
    }

    fn is_excluded(&self, from: Square) -> bool {
        self.edges.iter().any(|mask| mask[from.index()])
    }

    /// 从 from 沿该方向走一步
    fn step(&self, from: Square) -> Option<Square> {
        if self.is_excluded(from) {
            return None;
        }
        from.offset(self.offset)
    }
}

const KNIGHT_STEPS: [Direction; 8] = [
    Direction::new(-17, &[&FIRST_COLUMN]),
    Direction::new(-15, &[&EIGHTH_COLUMN]),
    Direction::new(-10, &[&FIRST_COLUMN, &SECOND_COLUMN]),
    Direction::new(-6, &[&SEVENTH_COLUMN, &EIGHTH_COLUMN]),
    Direction::new(6, &[&FIRST_COLUMN, &SECOND_COLUMN]),
    Direction::new(10, &[&SEVENTH_COLUMN, &EIGHTH_COLUMN]),
    Direction::new(15, &[&FIRST_COLUMN]),
    Direction::new(17, &[&EIGHTH_COLUMN]),
];

const BISHOP_DIRECTIONS: [Direction; 4] = [
    Direction::new(-9, &[&FIRST_COLUMN]),
    Direction::new(-7, &[&EIGHTH_COLUMN]),
    Direction::new(7, &[&FIRST_COLUMN]),
    Direction::new(9, &[&EIGHTH_COLUMN]),
];

const ROOK_DIRECTIONS: [Direction; 4] = [
    Direction::new(-8, &[]),
    Direction::new(-1, &[&FIRST_COLUMN]),
    Direction::new(1, &[&EIGHTH_COLUMN]),
    Direction::new(8, &[]),
];

/// 王和后共用的八个方向
const ROYAL_DIRECTIONS: [Direction; 8] = [
    Direction::new(-9, &[&FIRST_COLUMN]),
    Direction::new(-8, &[]),
    Direction::new(-7, &[&EIGHTH_COLUMN]),
    Direction::new(-1, &[&FIRST_COLUMN]),
    Direction::new(1, &[&EIGHTH_COLUMN]),
    Direction::new(7, &[&FIRST_COLUMN]),
    Direction::new(8, &[]),
    Direction::new(9, &[&EIGHTH_COLUMN]),
];

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定阵营的所有伪合法走法（不含易位）
    pub fn generate_pseudo_legal(board: &Board, alliance: Alliance) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);

        for piece in board.all_pieces().filter(|piece| piece.alliance == alliance) {
            Self::generate_piece_moves(board, piece, &mut moves);
        }

        moves
    }

    /// 生成指定棋子的所有伪合法走法
    pub(crate) fn generate_piece_moves(board: &Board, piece: Piece, moves: &mut Vec<Move>) {
        match piece.kind {
            PieceKind::Pawn => Self::generate_pawn_moves(board, piece, moves),
            PieceKind::Knight => Self::generate_step_moves(board, piece, &KNIGHT_STEPS, moves),
            PieceKind::Bishop => Self::generate_slide_moves(board, piece, &BISHOP_DIRECTIONS, moves),
            PieceKind::Rook => Self::generate_slide_moves(board, piece, &ROOK_DIRECTIONS, moves),
            PieceKind::Queen => Self::generate_slide_moves(board, piece, &ROYAL_DIRECTIONS, moves),
            PieceKind::King => Self::generate_step_moves(board, piece, &ROYAL_DIRECTIONS, moves),
        }
    }

    /// 马、王：每个偏移只走一步
    fn generate_step_moves(
        board: &Board,
        piece: Piece,
        directions: &[Direction],
        moves: &mut Vec<Move>,
    ) {
        for direction in directions {
            if let Some(to) = direction.step(piece.position) {
                Self::try_add_move(board, piece, to, moves);
            }
        }
    }

    /// 象、车、后：沿方向一直走到被挡住
    fn generate_slide_moves(
        board: &Board,
        piece: Piece,
        directions: &[Direction],
        moves: &mut Vec<Move>,
    ) {
        for direction in directions {
            let mut current = piece.position;
            while let Some(to) = direction.step(current) {
                if let Some(target) = board.piece_at(to) {
                    // 遇到棋子，能吃则吃，然后停下
                    if target.alliance != piece.alliance {
                        moves.push(Move::MajorAttack {
                            piece,
                            destination: to,
                            attacked: target,
                        });
                    }
                    break;
                }
                moves.push(Move::Major {
                    piece,
                    destination: to,
                });
                current = to;
            }
        }
    }

    /// 生成兵的走法
    fn generate_pawn_moves(board: &Board, piece: Piece, moves: &mut Vec<Move>) {
        let alliance = piece.alliance;
        let forward = 8 * alliance.direction();

        // 前进一格
        if let Some(to) = piece.position.offset(forward) {
            if board.piece_at(to).is_none() {
                if alliance.is_pawn_promotion_square(to) {
                    moves.push(Move::PawnPromotion {
                        piece,
                        destination: to,
                        attacked: None,
                    });
                } else {
                    moves.push(Move::PawnPush {
                        piece,
                        destination: to,
                    });
                }
            }
        }

        // 从初始行前进两格，途经格和目标格都必须为空
        if piece.first_move && alliance.is_pawn_start_square(piece.position) {
            let between = piece.position.offset(forward);
            let to = piece.position.offset(2 * forward);
            if let (Some(between), Some(to)) = (between, to) {
                if board.piece_at(between).is_none() && board.piece_at(to).is_none() {
                    moves.push(Move::PawnJump {
                        piece,
                        destination: to,
                    });
                }
            }
        }

        // 两个斜吃方向：(偏移, 需要排除的边界列, 横向相邻格偏移)
        let captures = match alliance {
            Alliance::White => [(-7, &EIGHTH_COLUMN, 1i8), (-9, &FIRST_COLUMN, -1i8)],
            Alliance::Black => [(7, &FIRST_COLUMN, -1i8), (9, &EIGHTH_COLUMN, 1i8)],
        };

        for (offset, edge, lateral) in captures {
            if edge[piece.position.index()] {
                continue;
            }
            let Some(to) = piece.position.offset(offset) else {
                continue;
            };

            match board.piece_at(to) {
                Some(target) => {
                    if target.alliance == alliance {
                        continue;
                    }
                    if alliance.is_pawn_promotion_square(to) {
                        moves.push(Move::PawnPromotion {
                            piece,
                            destination: to,
                            attacked: Some(target),
                        });
                    } else {
                        moves.push(Move::PawnAttack {
                            piece,
                            destination: to,
                            attacked: target,
                        });
                    }
                }
                None => {
                    // 吃过路兵：对方刚双步的兵就在本兵横向相邻格
                    if let Some(en_passant) = board.en_passant_pawn() {
                        let beside = piece.position.offset(lateral);
                        if beside == Some(en_passant.position) && en_passant.alliance != alliance {
                            moves.push(Move::PawnEnPassantAttack {
                                piece,
                                destination: to,
                                attacked: en_passant,
                            });
                        }
                    }
                }
            }
        }
    }

    /// 尝试添加走法（检查目标位置是否可以移动）
    fn try_add_move(board: &Board, piece: Piece, to: Square, moves: &mut Vec<Move>) {
        if let Some(target) = board.piece_at(to) {
            // 目标位置有棋子
            if target.alliance != piece.alliance {
                // 可以吃
                moves.push(Move::MajorAttack {
                    piece,
                    destination: to,
                    attacked: target,
                });
            }
        } else {
            // 空位
            moves.push(Move::Major {
                piece,
                destination: to,
            });
        }
    }
}
