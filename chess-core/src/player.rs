//! 玩家视图：合法走法、将军判定、王车易位和走子关卡
//!
//! 伪合法走法生成不检查王的安全，[`Player::make_move`] 是整个系统中唯一的
//! 王安全关卡：在走完之后的局面上重新计算对方的攻击。

use std::borrow::Cow;

use tracing::trace;

use crate::alliance::Alliance;
use crate::board::Board;
use crate::constants::{BLACK_KING_HOME, WHITE_KING_HOME};
use crate::moves::Move;
use crate::piece::Piece;
use crate::square::Square;

/// 走子结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveStatus {
    /// 走子成功
    Done,
    /// 不在走子方的走法集合中
    IllegalMove,
    /// 走完后己方王被攻击
    LeavesPlayerInCheck,
}

impl MoveStatus {
    pub fn is_done(&self) -> bool {
        *self == MoveStatus::Done
    }
}

/// 一次走子尝试的结果
///
/// 被拒绝时 `board` 就是原局面。
#[derive(Debug, Clone)]
pub struct MoveTransition<'a> {
    board: Cow<'a, Board>,
    mv: Move,
    status: MoveStatus,
}

impl<'a> MoveTransition<'a> {
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 取出结果局面
    pub fn into_board(self) -> Board {
        self.board.into_owned()
    }

    pub fn attempted_move(&self) -> Move {
        self.mv
    }

    pub fn status(&self) -> MoveStatus {
        self.status
    }
}

/// 返回目标格为 square 的所有走法，即该格受到的攻击
pub fn attacks_on(square: Square, moves: &[Move]) -> Vec<Move> {
    moves
        .iter()
        .filter(|mv| mv.destination() == Some(square))
        .copied()
        .collect()
}

/// 一侧易位涉及的格子
struct CastleSide {
    rook_home: u8,
    /// 王与车之间必须为空的格子
    between: &'static [u8],
    /// 不能受攻击的格子（王经过的格子和落点）
    guarded: [u8; 2],
    king_destination: u8,
    rook_destination: u8,
}

/// 某一方的易位布局
struct CastleLayout {
    king_home: usize,
    king_side: CastleSide,
    queen_side: CastleSide,
}

const WHITE_CASTLES: CastleLayout = CastleLayout {
    king_home: WHITE_KING_HOME,
    king_side: CastleSide {
        rook_home: 63,
        between: &[61, 62],
        guarded: [61, 62],
        king_destination: 62,
        rook_destination: 61,
    },
    queen_side: CastleSide {
        rook_home: 56,
        between: &[57, 58, 59],
        guarded: [59, 58],
        king_destination: 58,
        rook_destination: 59,
    },
};

const BLACK_CASTLES: CastleLayout = CastleLayout {
    king_home: BLACK_KING_HOME,
    king_side: CastleSide {
        rook_home: 7,
        between: &[5, 6],
        guarded: [5, 6],
        king_destination: 6,
        rook_destination: 5,
    },
    queen_side: CastleSide {
        rook_home: 0,
        between: &[1, 2, 3],
        guarded: [3, 2],
        king_destination: 2,
        rook_destination: 3,
    },
};

fn castle_layout(alliance: Alliance) -> &'static CastleLayout {
    match alliance {
        Alliance::White => &WHITE_CASTLES,
        Alliance::Black => &BLACK_CASTLES,
    }
}

/// 玩家
///
/// 每个局面重新计算，不会被原地修改。
#[derive(Debug, Clone)]
pub struct Player<'a> {
    board: &'a Board,
    alliance: Alliance,
    king: Piece,
    legal_moves: Vec<Move>,
    in_check: bool,
}

impl<'a> Player<'a> {
    pub(crate) fn new(board: &'a Board, alliance: Alliance) -> Self {
        let king = board.king(alliance);
        let opponent_moves = board.standard_moves(alliance.opponent());
        let in_check = !attacks_on(king.position, opponent_moves).is_empty();

        let mut legal_moves = board.standard_moves(alliance).to_vec();
        if !in_check {
            legal_moves.extend(Self::king_castles(board, alliance, king, opponent_moves));
        }

        Self {
            board,
            alliance,
            king,
            legal_moves,
            in_check,
        }
    }

    /// 计算可行的易位走法（调用方已保证王没有被将军）
    fn king_castles(
        board: &Board,
        alliance: Alliance,
        king: Piece,
        opponent_moves: &[Move],
    ) -> Vec<Move> {
        let layout = castle_layout(alliance);
        let mut castles = Vec::new();

        if !king.first_move || king.position.index() != layout.king_home {
            return castles;
        }

        for (side, king_side) in [(&layout.king_side, true), (&layout.queen_side, false)] {
            let occupied = side
                .between
                .iter()
                .any(|index| board.piece_at(Square::new_unchecked(*index)).is_some());
            if occupied {
                continue;
            }

            let rook = match board.piece_at(Square::new_unchecked(side.rook_home)) {
                Some(rook) if rook.kind.is_rook() && rook.alliance == alliance && rook.first_move => {
                    rook
                }
                _ => continue,
            };

            let attacked = side
                .guarded
                .iter()
                .any(|index| !attacks_on(Square::new_unchecked(*index), opponent_moves).is_empty());
            if attacked {
                continue;
            }

            let destination = Square::new_unchecked(side.king_destination);
            let rook_destination = Square::new_unchecked(side.rook_destination);
            castles.push(if king_side {
                Move::KingSideCastle {
                    king,
                    destination,
                    rook,
                    rook_destination,
                }
            } else {
                Move::QueenSideCastle {
                    king,
                    destination,
                    rook,
                    rook_destination,
                }
            });
        }

        castles
    }

    pub fn alliance(&self) -> Alliance {
        self.alliance
    }

    /// 己方王
    pub fn king(&self) -> Piece {
        self.king
    }

    /// 己方所有棋子
    pub fn active_pieces(&self) -> Vec<Piece> {
        self.board.active_pieces(self.alliance)
    }

    /// 伪合法走法加易位（不保证王的安全）
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// 从指定格出发的走法（用于高亮选中棋子的落点）
    pub fn moves_from(&self, square: Square) -> Vec<Move> {
        self.legal_moves
            .iter()
            .filter(|mv| mv.current_square() == Some(square))
            .copied()
            .collect()
    }

    /// 对手玩家
    pub fn opponent(&self) -> Player<'a> {
        self.board.player(self.alliance.opponent())
    }

    pub fn is_in_check(&self) -> bool {
        self.in_check
    }

    pub fn is_in_check_mate(&self) -> bool {
        self.in_check && !self.has_escape_moves()
    }

    pub fn is_in_stale_mate(&self) -> bool {
        !self.in_check && !self.has_escape_moves()
    }

    /// 是否存在至少一个能走成功的走法
    pub fn has_escape_moves(&self) -> bool {
        self.legal_moves
            .iter()
            .any(|mv| self.make_move(mv).status().is_done())
    }

    /// 尝试走子
    pub fn make_move(&self, mv: &Move) -> MoveTransition<'a> {
        if !self.legal_moves.contains(mv) {
            trace!(%mv, alliance = %self.alliance, "拒绝非法走法");
            return MoveTransition {
                board: Cow::Borrowed(self.board),
                mv: *mv,
                status: MoveStatus::IllegalMove,
            };
        }

        let transition_board = mv.execute(self.board);
        let king = transition_board.king(self.alliance);
        let opponent_moves = transition_board.standard_moves(self.alliance.opponent());
        if !attacks_on(king.position, opponent_moves).is_empty() {
            trace!(%mv, alliance = %self.alliance, "拒绝走后己方王被将军的走法");
            return MoveTransition {
                board: Cow::Borrowed(self.board),
                mv: *mv,
                status: MoveStatus::LeavesPlayerInCheck,
            };
        }

        MoveTransition {
            board: Cow::Owned(transition_board),
            mv: *mv,
            status: MoveStatus::Done,
        }
    }
}

impl std::fmt::Display for Player<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.alliance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;
    use crate::piece::PieceKind;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn piece(kind: PieceKind, alliance: Alliance, square: &str) -> Piece {
        Piece::new(kind, alliance, sq(square))
    }

    /// 白王 e1、白车 a1/h1、黑王 e8 的易位测试局面，外加额外棋子
    fn castle_board(extra: &[Piece]) -> Board {
        let mut builder = BoardBuilder::new();
        builder
            .set_piece(piece(PieceKind::King, Alliance::White, "e1"))
            .set_piece(piece(PieceKind::Rook, Alliance::White, "a1"))
            .set_piece(piece(PieceKind::Rook, Alliance::White, "h1"))
            .set_piece(piece(PieceKind::King, Alliance::Black, "e8"));
        for p in extra {
            builder.set_piece(*p);
        }
        builder.build().unwrap()
    }

    fn castles(board: &Board) -> (bool, bool) {
        let player = board.white_player();
        let king_side = player
            .legal_moves()
            .iter()
            .any(|m| matches!(m, Move::KingSideCastle { .. }));
        let queen_side = player
            .legal_moves()
            .iter()
            .any(|m| matches!(m, Move::QueenSideCastle { .. }));
        (king_side, queen_side)
    }

    #[test]
    fn test_initial_player() {
        let board = Board::standard();
        let player = board.current_player();

        assert_eq!(player.alliance(), Alliance::White);
        assert_eq!(player.king().position, sq("e1"));
        assert_eq!(player.legal_moves().len(), 20);
        assert_eq!(player.active_pieces().len(), 16);
        assert!(!player.is_in_check());
        assert!(!player.is_in_check_mate());
        assert!(!player.is_in_stale_mate());
        assert_eq!(player.opponent().alliance(), Alliance::Black);
    }

    #[test]
    fn test_attacks_on() {
        let board = Board::standard();
        let moves = board.standard_moves(Alliance::White);
        // f3 可以由 g1 马和 f2 兵到达
        assert_eq!(attacks_on(sq("f3"), moves).len(), 2);
        assert!(attacks_on(sq("e5"), moves).is_empty());
    }

    #[test]
    fn test_moves_from() {
        let board = Board::standard();
        let player = board.current_player();
        assert_eq!(player.moves_from(sq("b1")).len(), 2);
        assert_eq!(player.moves_from(sq("e2")).len(), 2);
        assert!(player.moves_from(sq("e1")).is_empty());
    }

    #[test]
    fn test_make_move_done() {
        let board = Board::standard();
        let mv = board.move_between(sq("e2"), sq("e4"));
        let transition = board.current_player().make_move(&mv);

        assert_eq!(transition.status(), MoveStatus::Done);
        assert_eq!(transition.attempted_move(), mv);
        let next = transition.into_board();
        assert_eq!(next.next_move_maker(), Alliance::Black);
        assert_eq!(next.en_passant_pawn(), next.piece_at(sq("e4")));
    }

    #[test]
    fn test_make_move_illegal() {
        let board = Board::standard();
        let player = board.current_player();

        let transition = player.make_move(&Move::Null);
        assert_eq!(transition.status(), MoveStatus::IllegalMove);
        assert_eq!(transition.board(), &board);

        // 黑方的走法不在白方集合中
        let black_move = board.standard_moves(Alliance::Black)[0];
        let transition = player.make_move(&black_move);
        assert_eq!(transition.status(), MoveStatus::IllegalMove);
    }

    #[test]
    fn test_make_move_leaves_player_in_check() {
        // e2 上的白象被 e8 黑车钉住
        let board = BoardBuilder::new()
            .set_piece(piece(PieceKind::King, Alliance::White, "e1"))
            .set_piece(piece(PieceKind::Bishop, Alliance::White, "e2"))
            .set_piece(piece(PieceKind::Rook, Alliance::Black, "e8"))
            .set_piece(piece(PieceKind::King, Alliance::Black, "a8"))
            .build()
            .unwrap();
        let player = board.current_player();
        let mv = board.move_between(sq("e2"), sq("d3"));
        assert!(matches!(mv, Move::Major { .. }));

        let transition = player.make_move(&mv);
        assert_eq!(transition.status(), MoveStatus::LeavesPlayerInCheck);
        // 走子方不变，局面不变
        assert_eq!(transition.board(), &board);
        assert_eq!(transition.board().next_move_maker(), Alliance::White);
    }

    #[test]
    fn test_king_cannot_step_into_pawn_attack() {
        let board = BoardBuilder::new()
            .set_piece(piece(PieceKind::King, Alliance::White, "e4"))
            .set_piece(piece(PieceKind::Pawn, Alliance::Black, "e6").with_first_move(false))
            .set_piece(piece(PieceKind::King, Alliance::Black, "a8"))
            .build()
            .unwrap();
        let mv = board.move_between(sq("e4"), sq("d5"));
        let transition = board.current_player().make_move(&mv);
        assert_eq!(transition.status(), MoveStatus::LeavesPlayerInCheck);
    }

    #[test]
    fn test_castling_available() {
        let board = castle_board(&[]);
        assert_eq!(castles(&board), (true, true));

        let player = board.white_player();
        let mv = board.move_between(sq("e1"), sq("c1"));
        let next = player.make_move(&mv).into_board();
        assert_eq!(next.piece_at(sq("c1")).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(next.piece_at(sq("d1")).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(next.piece_at(sq("a1")).is_none());
    }

    #[test]
    fn test_castling_rejected_king_moved() {
        let board = BoardBuilder::new()
            .set_piece(piece(PieceKind::King, Alliance::White, "e1").with_first_move(false))
            .set_piece(piece(PieceKind::Rook, Alliance::White, "a1"))
            .set_piece(piece(PieceKind::Rook, Alliance::White, "h1"))
            .set_piece(piece(PieceKind::King, Alliance::Black, "e8"))
            .build()
            .unwrap();
        assert_eq!(castles(&board), (false, false));
    }

    #[test]
    fn test_castling_rejected_after_king_round_trip() {
        // 王走出去再走回来，未动标记已经清除
        let mut board = castle_board(&[piece(PieceKind::Pawn, Alliance::Black, "a7")]);
        for (from, to) in [("e1", "e2"), ("a7", "a6"), ("e2", "e1"), ("a6", "a5")] {
            let mv = board.move_between(sq(from), sq(to));
            let transition = board.current_player().make_move(&mv);
            assert!(transition.status().is_done());
            board = transition.into_board();
        }
        assert_eq!(castles(&board), (false, false));
    }

    #[test]
    fn test_castling_rejected_rook_moved() {
        let board = castle_board(&[
            piece(PieceKind::Rook, Alliance::White, "h1").with_first_move(false),
        ]);
        assert_eq!(castles(&board), (false, true));
    }

    #[test]
    fn test_castling_rejected_square_occupied() {
        let board = castle_board(&[piece(PieceKind::Knight, Alliance::White, "b1")]);
        assert_eq!(castles(&board), (true, false));

        let board = castle_board(&[piece(PieceKind::Bishop, Alliance::Black, "g1")]);
        assert_eq!(castles(&board), (false, true));
    }

    #[test]
    fn test_castling_rejected_transit_attacked() {
        // f8 黑车攻击 f1（王经过的格子）
        let board = castle_board(&[piece(PieceKind::Rook, Alliance::Black, "f8")]);
        assert_eq!(castles(&board), (false, true));

        // d8 黑车攻击 d1
        let board = castle_board(&[piece(PieceKind::Rook, Alliance::Black, "d8")]);
        assert_eq!(castles(&board), (true, false));
    }

    #[test]
    fn test_castling_rejected_landing_attacked() {
        // g8 黑车攻击 g1（王的落点）
        let board = castle_board(&[piece(PieceKind::Rook, Alliance::Black, "g8")]);
        assert_eq!(castles(&board), (false, true));

        // c8 黑车攻击 c1
        let board = castle_board(&[piece(PieceKind::Rook, Alliance::Black, "c8")]);
        assert_eq!(castles(&board), (true, false));
    }

    #[test]
    fn test_castling_rejected_in_check() {
        let board = BoardBuilder::new()
            .set_piece(piece(PieceKind::King, Alliance::White, "e1"))
            .set_piece(piece(PieceKind::Rook, Alliance::White, "a1"))
            .set_piece(piece(PieceKind::Rook, Alliance::White, "h1"))
            .set_piece(piece(PieceKind::Rook, Alliance::Black, "e5"))
            .set_piece(piece(PieceKind::King, Alliance::Black, "b8"))
            .build()
            .unwrap();
        assert!(board.white_player().is_in_check());
        assert_eq!(castles(&board), (false, false));
    }

    #[test]
    fn test_black_castling_mirrored() {
        let board = BoardBuilder::new()
            .set_piece(piece(PieceKind::King, Alliance::White, "e1"))
            .set_piece(piece(PieceKind::King, Alliance::Black, "e8"))
            .set_piece(piece(PieceKind::Rook, Alliance::Black, "a8"))
            .set_piece(piece(PieceKind::Rook, Alliance::Black, "h8"))
            .set_move_maker(Alliance::Black)
            .build()
            .unwrap();

        let mv = board.move_between(sq("e8"), sq("g8"));
        assert!(matches!(mv, Move::KingSideCastle { .. }));
        let next = board.current_player().make_move(&mv).into_board();
        assert_eq!(next.piece_at(sq("g8")).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(next.piece_at(sq("f8")).map(|p| p.kind), Some(PieceKind::Rook));

        let mv = board.move_between(sq("e8"), sq("c8"));
        assert!(matches!(mv, Move::QueenSideCastle { .. }));
    }

    #[test]
    fn test_en_passant_capture() {
        let board = BoardBuilder::new()
            .set_piece(piece(PieceKind::King, Alliance::White, "e1"))
            .set_piece(piece(PieceKind::Pawn, Alliance::White, "e5").with_first_move(false))
            .set_piece(piece(PieceKind::Pawn, Alliance::Black, "d7"))
            .set_piece(piece(PieceKind::King, Alliance::Black, "h8"))
            .set_move_maker(Alliance::Black)
            .build()
            .unwrap();

        // 黑兵双步落到白兵旁边
        let jump = board.move_between(sq("d7"), sq("d5"));
        let board = board.current_player().make_move(&jump).into_board();
        let jumped = board.piece_at(sq("d5")).unwrap();
        assert_eq!(board.en_passant_pawn(), Some(jumped));

        let mv = board.move_between(sq("e5"), sq("d6"));
        assert!(matches!(mv, Move::PawnEnPassantAttack { .. }));
        assert_eq!(mv.attacked_piece(), Some(jumped));

        let transition = board.current_player().make_move(&mv);
        assert!(transition.status().is_done());
        let next = transition.into_board();
        // 被吃的兵从 d5 移除，而不是从目标格 d6
        assert!(next.piece_at(sq("d5")).is_none());
        assert_eq!(next.piece_at(sq("d6")).map(|p| p.kind), Some(PieceKind::Pawn));
        assert_eq!(next.active_pieces(Alliance::Black).len(), 1);
    }

    #[test]
    fn test_en_passant_expires() {
        let board = BoardBuilder::new()
            .set_piece(piece(PieceKind::King, Alliance::White, "e1"))
            .set_piece(piece(PieceKind::Pawn, Alliance::White, "e5").with_first_move(false))
            .set_piece(piece(PieceKind::Pawn, Alliance::Black, "d7"))
            .set_piece(piece(PieceKind::King, Alliance::Black, "h8"))
            .set_move_maker(Alliance::Black)
            .build()
            .unwrap();

        let mut board = board;
        for (from, to) in [("d7", "d5"), ("e1", "e2"), ("h8", "h7")] {
            let mv = board.move_between(sq(from), sq(to));
            board = board.current_player().make_move(&mv).into_board();
        }
        // 隔了一回合后不能再吃过路兵
        assert_eq!(board.move_between(sq("e5"), sq("d6")), Move::Null);
    }

    #[test]
    fn test_checkmate() {
        // 底线将死：白王 h1 被 a1 黑车将军，g2/h2 被自己的兵堵住
        let board = BoardBuilder::new()
            .set_piece(piece(PieceKind::King, Alliance::White, "h1"))
            .set_piece(piece(PieceKind::Pawn, Alliance::White, "g2"))
            .set_piece(piece(PieceKind::Pawn, Alliance::White, "h2"))
            .set_piece(piece(PieceKind::Rook, Alliance::Black, "a1"))
            .set_piece(piece(PieceKind::King, Alliance::Black, "e8"))
            .build()
            .unwrap();
        let player = board.current_player();

        assert!(player.is_in_check());
        assert!(player.is_in_check_mate());
        assert!(!player.is_in_stale_mate());
    }

    #[test]
    fn test_stalemate() {
        // 黑王 a8 无子可动且未被将军
        let board = BoardBuilder::new()
            .set_piece(piece(PieceKind::King, Alliance::White, "b6"))
            .set_piece(piece(PieceKind::Queen, Alliance::White, "c7"))
            .set_piece(piece(PieceKind::King, Alliance::Black, "a8"))
            .set_move_maker(Alliance::Black)
            .build()
            .unwrap();
        let player = board.current_player();

        assert!(!player.is_in_check());
        assert!(player.is_in_stale_mate());
        assert!(!player.is_in_check_mate());
    }

    #[test]
    fn test_check_not_mate() {
        let board = BoardBuilder::new()
            .set_piece(piece(PieceKind::King, Alliance::White, "e1"))
            .set_piece(piece(PieceKind::Rook, Alliance::Black, "e5"))
            .set_piece(piece(PieceKind::King, Alliance::Black, "a8"))
            .build()
            .unwrap();
        let player = board.current_player();

        assert!(player.is_in_check());
        assert!(!player.is_in_check_mate());
        assert!(player.has_escape_moves());
    }

    #[test]
    fn test_kings_invariant_along_game() {
        // 每一步都选第一个能走成功的走法，双方王始终各一个
        let mut board = Board::standard();
        for _ in 0..40 {
            let player = board.current_player();
            let next = player
                .legal_moves()
                .iter()
                .map(|mv| player.make_move(mv))
                .find(|t| t.status().is_done())
                .map(|t| t.into_board());
            let Some(next) = next else { break };
            board = next;

            for alliance in [Alliance::White, Alliance::Black] {
                let kings = board
                    .active_pieces(alliance)
                    .iter()
                    .filter(|p| p.kind.is_king())
                    .count();
                assert_eq!(kings, 1);
            }
        }
    }
}
