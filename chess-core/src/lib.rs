//! 国际象棋规则库
//!
//! 包含:
//! - 阵营、格子、棋子、棋盘等核心数据结构
//! - 伪合法走法生成（步进/滑行棋子、兵、吃过路兵、升变）
//! - 玩家视图：王车易位、将军/将死/逼和判定、走子关卡
//! - 走子记录

mod alliance;
mod board;
mod constants;
mod error;
mod movegen;
mod moves;
mod piece;
mod player;
mod record;
mod square;

pub use alliance::Alliance;
pub use board::{Board, BoardBuilder, Tile};
pub use constants::*;
pub use error::{ChessError, Result};
pub use movegen::MoveGenerator;
pub use moves::Move;
pub use piece::{Piece, PieceKind};
pub use player::{attacks_on, MoveStatus, MoveTransition, Player};
pub use record::{HistoryRow, MoveLog};
pub use square::{
    Square, EIGHTH_COLUMN, EIGHTH_RANK, FIRST_COLUMN, FIRST_RANK, SECOND_COLUMN, SECOND_RANK,
    SEVENTH_COLUMN, SEVENTH_RANK,
};
