//! 棋盘格子与边界掩码
//!
//! 格子编号 0..64，0 为 a8，7 为 h8，56 为 a1，63 为 h1。
//! 只用编号加减无法区分"走出棋盘"和"绕到下一行"，
//! 所以走法生成依赖下面预先计算好的列/行掩码排除越界的偏移。

use std::str::FromStr;

use crate::constants::{NUM_TILES, NUM_TILES_PER_ROW};
use crate::error::ChessError;

const fn column_mask(column: usize) -> [bool; NUM_TILES] {
    let mut mask = [false; NUM_TILES];
    let mut index = column;
    while index < NUM_TILES {
        mask[index] = true;
        index += NUM_TILES_PER_ROW;
    }
    mask
}

const fn row_mask(row: usize) -> [bool; NUM_TILES] {
    let mut mask = [false; NUM_TILES];
    let mut index = row * NUM_TILES_PER_ROW;
    while index < (row + 1) * NUM_TILES_PER_ROW {
        mask[index] = true;
        index += 1;
    }
    mask
}

/// a 列
pub const FIRST_COLUMN: [bool; NUM_TILES] = column_mask(0);
/// b 列
pub const SECOND_COLUMN: [bool; NUM_TILES] = column_mask(1);
/// g 列
pub const SEVENTH_COLUMN: [bool; NUM_TILES] = column_mask(6);
/// h 列
pub const EIGHTH_COLUMN: [bool; NUM_TILES] = column_mask(7);

/// 第 8 行（黑方底线）
pub const EIGHTH_RANK: [bool; NUM_TILES] = row_mask(0);
/// 第 7 行（黑兵初始行）
pub const SEVENTH_RANK: [bool; NUM_TILES] = row_mask(1);
/// 第 2 行（白兵初始行）
pub const SECOND_RANK: [bool; NUM_TILES] = row_mask(6);
/// 第 1 行（白方底线）
pub const FIRST_RANK: [bool; NUM_TILES] = row_mask(7);

/// 棋盘格子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// 创建新格子
    pub fn new(index: usize) -> Option<Self> {
        if index < NUM_TILES {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// 创建新格子（不检查边界，内部使用）
    pub const fn new_unchecked(index: u8) -> Self {
        Self(index)
    }

    /// 格子编号
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// 列号（0 = a 列）
    pub fn column(&self) -> usize {
        self.index() % NUM_TILES_PER_ROW
    }

    /// 行号（0 = 第 8 行）
    pub fn row(&self) -> usize {
        self.index() / NUM_TILES_PER_ROW
    }

    /// 按编号偏移，只检查是否落在 0..64 内
    ///
    /// 是否绕行到相邻行由调用方用列掩码判断。
    pub fn offset(&self, delta: i8) -> Option<Square> {
        let target = self.0 as i16 + delta as i16;
        if (0..NUM_TILES as i16).contains(&target) {
            Some(Square(target as u8))
        } else {
            None
        }
    }

    /// 列字母
    pub fn file_char(&self) -> char {
        (b'a' + self.column() as u8) as char
    }

    /// 行数字
    pub fn rank_char(&self) -> char {
        (b'8' - self.row() as u8) as char
    }
}

impl TryFrom<usize> for Square {
    type Error = ChessError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Square::new(index).ok_or(ChessError::InvalidSquare { index })
    }
}

impl FromStr for Square {
    type Err = ChessError;

    /// 从代数记号解析（如 "e4"）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ChessError::InvalidNotation {
            text: s.to_string(),
        };
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(invalid());
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(invalid());
        }
        let column = (file - b'a') as usize;
        let row = (b'8' - rank) as usize;
        Ok(Square((row * NUM_TILES_PER_ROW + column) as u8))
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}
