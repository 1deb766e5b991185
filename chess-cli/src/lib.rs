//! 国际象棋命令行对局
//!
//! 包含:
//! - 对局控制（人类输入、电脑搜索、走子记录）

pub mod game;

pub use game::{parse_input, Game, GameState};
