//! 规则常量定义

/// 棋盘格子总数
pub const NUM_TILES: usize = 64;

/// 每行（每列）格子数
pub const NUM_TILES_PER_ROW: usize = 8;

/// 白方王的初始格子（e1）
pub const WHITE_KING_HOME: usize = 60;

/// 黑方王的初始格子（e8）
pub const BLACK_KING_HOME: usize = 4;
