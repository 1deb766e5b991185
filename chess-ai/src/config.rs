//! 引擎与对局配置
//!
//! 从 JSON 加载，搜索深度限制在 [`MIN_SEARCH_DEPTH`]..=[`MAX_SEARCH_DEPTH`]。

use std::path::Path;

use chess_core::Alliance;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// 最小搜索深度
pub const MIN_SEARCH_DEPTH: u8 = 1;
/// 最大搜索深度（耗时随深度指数增长）
pub const MAX_SEARCH_DEPTH: u8 = 5;
/// 默认搜索深度
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 搜索深度超出范围
    #[error("Invalid search depth {depth}: expected 1..=5")]
    InvalidDepth { depth: u8 },

    /// JSON 解析错误
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn validate_depth(depth: u8) -> Result<u8, ConfigError> {
    if (MIN_SEARCH_DEPTH..=MAX_SEARCH_DEPTH).contains(&depth) {
        Ok(depth)
    } else {
        Err(ConfigError::InvalidDepth { depth })
    }
}

/// AI 配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    /// 搜索层数（半回合）
    pub search_depth: u8,
}

impl AiConfig {
    pub fn new(search_depth: u8) -> Result<Self, ConfigError> {
        Ok(Self {
            search_depth: validate_depth(search_depth)?,
        })
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

/// 玩家类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerType {
    Human,
    Computer,
}

/// 对局配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub white: PlayerType,
    pub black: PlayerType,
    pub search_depth: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            white: PlayerType::Human,
            black: PlayerType::Computer,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

impl GameConfig {
    /// 从 JSON 字符串解析并校验
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        validate_depth(config.search_depth)?;
        Ok(config)
    }

    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        info!("已加载对局配置: {:?}", path);
        Ok(config)
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn player_type(&self, alliance: Alliance) -> PlayerType {
        match alliance {
            Alliance::White => self.white,
            Alliance::Black => self.black,
        }
    }

    /// 该方是否由电脑控制
    pub fn is_computer(&self, alliance: Alliance) -> bool {
        self.player_type(alliance) == PlayerType::Computer
    }

    /// 对应的 AI 配置
    pub fn ai_config(&self) -> Result<AiConfig, ConfigError> {
        AiConfig::new(self.search_depth)
    }
}
