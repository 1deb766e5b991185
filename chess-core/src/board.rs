//! 棋盘状态
//!
//! [`Board`] 构造后不可变：每步棋都通过 [`BoardBuilder`] 生成一个新局面。
//! 构造时顺带缓存双方的伪合法走法，供 [`Player`] 判断将军、易位和走子合法性。

use crate::alliance::Alliance;
use crate::constants::{NUM_TILES, NUM_TILES_PER_ROW};
use crate::error::{ChessError, Result};
use crate::movegen::MoveGenerator;
use crate::moves::Move;
use crate::piece::{Piece, PieceKind};
use crate::player::{attacks_on, Player};
use crate::square::Square;

/// 格子视图（只读）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    coordinate: Square,
    piece: Option<Piece>,
}

impl Tile {
    pub fn coordinate(&self) -> Square {
        self.coordinate
    }

    pub fn piece(&self) -> Option<Piece> {
        self.piece
    }

    pub fn is_occupied(&self) -> bool {
        self.piece.is_some()
    }
}

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// 64 格，索引 0 为 a8
    squares: [Option<Piece>; NUM_TILES],
    /// 当前走子方
    next_move_maker: Alliance,
    /// 刚刚双步前进、可以被吃过路兵的兵
    en_passant_pawn: Option<Piece>,
    /// 白方伪合法走法（不含易位）
    white_moves: Vec<Move>,
    /// 黑方伪合法走法（不含易位）
    black_moves: Vec<Move>,
}

impl Board {
    /// 创建初始棋盘
    pub fn standard() -> Self {
        const BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut builder = BoardBuilder::new();
        for (column, kind) in BACK_RANK.iter().enumerate() {
            let column = column as u8;
            // 黑方（上方，第 8、7 行）
            builder.set_piece(Piece::new(*kind, Alliance::Black, Square::new_unchecked(column)));
            builder.set_piece(Piece::new(
                PieceKind::Pawn,
                Alliance::Black,
                Square::new_unchecked(8 + column),
            ));
            // 白方（下方，第 2、1 行）
            builder.set_piece(Piece::new(
                PieceKind::Pawn,
                Alliance::White,
                Square::new_unchecked(48 + column),
            ));
            builder.set_piece(Piece::new(*kind, Alliance::White, Square::new_unchecked(56 + column)));
        }
        builder.set_move_maker(Alliance::White);
        builder.build_unchecked()
    }

    /// 获取格子视图
    pub fn tile(&self, square: Square) -> Tile {
        Tile {
            coordinate: square,
            piece: self.squares[square.index()],
        }
    }

    /// 获取指定格子的棋子
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// 获取指定阵营的所有棋子
    pub fn active_pieces(&self, alliance: Alliance) -> Vec<Piece> {
        self.squares
            .iter()
            .flatten()
            .filter(|piece| piece.alliance == alliance)
            .copied()
            .collect()
    }

    /// 获取所有棋子
    pub fn all_pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.squares.iter().flatten().copied()
    }

    /// 当前走子方
    pub fn next_move_maker(&self) -> Alliance {
        self.next_move_maker
    }

    /// 可被吃过路兵的兵
    pub fn en_passant_pawn(&self) -> Option<Piece> {
        self.en_passant_pawn
    }

    /// 指定阵营的伪合法走法（不含易位）
    pub fn standard_moves(&self, alliance: Alliance) -> &[Move] {
        match alliance {
            Alliance::White => &self.white_moves,
            Alliance::Black => &self.black_moves,
        }
    }

    /// 查找指定阵营的王
    ///
    /// # Panics
    ///
    /// 局面缺王说明棋盘已损坏，属于不可恢复的编程错误。
    pub fn king(&self, alliance: Alliance) -> Piece {
        match self.find_king(alliance) {
            Some(king) => king,
            None => panic!("corrupted board: no {alliance} king on the board"),
        }
    }

    fn find_king(&self, alliance: Alliance) -> Option<Piece> {
        self.all_pieces()
            .find(|piece| piece.kind.is_king() && piece.alliance == alliance)
    }

    /// 指定阵营的玩家视图
    pub fn player(&self, alliance: Alliance) -> Player<'_> {
        Player::new(self, alliance)
    }

    pub fn white_player(&self) -> Player<'_> {
        self.player(Alliance::White)
    }

    pub fn black_player(&self) -> Player<'_> {
        self.player(Alliance::Black)
    }

    /// 当前走子方的玩家视图
    pub fn current_player(&self) -> Player<'_> {
        self.player(self.next_move_maker)
    }

    /// 在当前走子方的走法中查找 from -> to，找不到返回 [`Move::Null`]
    pub fn move_between(&self, from: Square, to: Square) -> Move {
        self.current_player()
            .legal_moves()
            .iter()
            .find(|mv| mv.current_square() == Some(from) && mv.destination() == Some(to))
            .copied()
            .unwrap_or(Move::Null)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..NUM_TILES_PER_ROW {
            let line: Vec<String> = (0..NUM_TILES_PER_ROW)
                .map(|column| {
                    match self.squares[row * NUM_TILES_PER_ROW + column] {
                        Some(piece) => piece.to_char().to_string(),
                        None => "-".to_string(),
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

/// 棋盘构造器
#[derive(Debug, Clone)]
pub struct BoardBuilder {
    config: [Option<Piece>; NUM_TILES],
    next_move_maker: Alliance,
    en_passant_pawn: Option<Piece>,
}

impl BoardBuilder {
    /// 创建空构造器（白方先走）
    pub fn new() -> Self {
        Self {
            config: [None; NUM_TILES],
            next_move_maker: Alliance::White,
            en_passant_pawn: None,
        }
    }

    /// 把棋子放到它自身记录的位置上（覆盖原有棋子）
    pub fn set_piece(&mut self, piece: Piece) -> &mut Self {
        self.config[piece.position.index()] = Some(piece);
        self
    }

    /// 设置走子方
    pub fn set_move_maker(&mut self, alliance: Alliance) -> &mut Self {
        self.next_move_maker = alliance;
        self
    }

    /// 设置可被吃过路兵的兵
    pub fn set_en_passant_pawn(&mut self, pawn: Option<Piece>) -> &mut Self {
        self.en_passant_pawn = pawn;
        self
    }

    /// 构造并校验局面
    ///
    /// 要求双方各有且仅有一个王、吃过路兵目标是棋盘上的对方兵、
    /// 非走子方没有被将军。
    pub fn build(&self) -> Result<Board> {
        for alliance in [Alliance::White, Alliance::Black] {
            let count = self
                .config
                .iter()
                .flatten()
                .filter(|piece| piece.kind.is_king() && piece.alliance == alliance)
                .count();
            match count {
                0 => return Err(ChessError::MissingKing { alliance }),
                1 => {}
                count => return Err(ChessError::MultipleKings { alliance, count }),
            }
        }

        if let Some(pawn) = self.en_passant_pawn {
            let on_board = self.config[pawn.position.index()] == Some(pawn);
            if !on_board
                || pawn.kind != PieceKind::Pawn
                || pawn.alliance == self.next_move_maker
            {
                return Err(ChessError::InvalidEnPassantPawn {
                    square: pawn.position.to_string(),
                });
            }
        }

        let board = self.build_unchecked();
        let waiting = board.next_move_maker.opponent();
        let king = board.king(waiting);
        if !attacks_on(king.position, board.standard_moves(board.next_move_maker)).is_empty() {
            return Err(ChessError::OpponentInCheck { alliance: waiting });
        }
        Ok(board)
    }

    /// 构造局面但不做校验（走子执行时使用）
    pub(crate) fn build_unchecked(&self) -> Board {
        let mut board = Board {
            squares: self.config,
            next_move_maker: self.next_move_maker,
            en_passant_pawn: self.en_passant_pawn,
            white_moves: Vec::new(),
            black_moves: Vec::new(),
        };
        board.white_moves = MoveGenerator::generate_pseudo_legal(&board, Alliance::White);
        board.black_moves = MoveGenerator::generate_pseudo_legal(&board, Alliance::Black);
        board
    }
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}
