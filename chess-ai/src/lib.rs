//! 国际象棋 AI 引擎
//!
//! 包含:
//! - 棋局评估函数（子力 + 走法数 + 将军加分）
//! - 固定深度 Minimax 搜索
//! - 引擎与对局配置

mod config;
mod evaluate;
mod search;

pub use config::{
    AiConfig, ConfigError, GameConfig, PlayerType, DEFAULT_SEARCH_DEPTH, MAX_SEARCH_DEPTH,
    MIN_SEARCH_DEPTH,
};
pub use evaluate::{Evaluator, CHECK_BONUS};
pub use search::{search, AiEngine};
