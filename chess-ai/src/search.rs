//! 搜索引擎
//!
//! 固定深度的 Minimax：白方取最大值，黑方取最小值，叶子节点使用静态评估。
//! 不做剪枝、置换表或走法排序。

use std::time::Instant;

use chess_core::{Board, Move};
use tracing::{debug, info};

use crate::config::AiConfig;
use crate::evaluate::Evaluator;

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            nodes_searched: 0,
        }
    }

    /// 搜索最佳走法
    ///
    /// 没有能走成功的走法时返回 None。分值相同时后生成的走法胜出。
    pub fn search(&mut self, board: &Board) -> Option<Move> {
        self.nodes_searched = 0;
        let start = Instant::now();
        let depth = self.config.search_depth;

        let player = board.current_player();
        let maximizing = player.alliance().is_white();

        let mut best_move = None;
        let mut highest = i32::MIN;
        let mut lowest = i32::MAX;

        for mv in player.legal_moves() {
            let transition = player.make_move(mv);
            if !transition.status().is_done() {
                continue;
            }

            let next_depth = depth.saturating_sub(1);
            let value = if maximizing {
                self.min(transition.board(), next_depth)
            } else {
                self.max(transition.board(), next_depth)
            };
            debug!(%mv, value, "根节点候选走法");

            if maximizing && value >= highest {
                highest = value;
                best_move = Some(*mv);
            } else if !maximizing && value <= lowest {
                lowest = value;
                best_move = Some(*mv);
            }
        }

        match best_move {
            Some(mv) => info!(
                depth,
                best_move = %mv,
                nodes = self.nodes_searched,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "搜索完成"
            ),
            None => info!(depth, alliance = %player.alliance(), "没有可走的棋"),
        }

        best_move
    }

    /// 黑方层：取最小值
    fn min(&mut self, board: &Board, depth: u8) -> i32 {
        self.nodes_searched += 1;
        if depth == 0 {
            return Evaluator::evaluate(board);
        }

        let player = board.current_player();
        let mut lowest = None;
        for mv in player.legal_moves() {
            let transition = player.make_move(mv);
            if transition.status().is_done() {
                let value = self.max(transition.board(), depth - 1);
                lowest = Some(lowest.map_or(value, |current: i32| current.min(value)));
            }
        }

        // 将死或逼和
        lowest.unwrap_or_else(|| Evaluator::evaluate(board))
    }

    /// 白方层：取最大值
    fn max(&mut self, board: &Board, depth: u8) -> i32 {
        self.nodes_searched += 1;
        if depth == 0 {
            return Evaluator::evaluate(board);
        }

        let player = board.current_player();
        let mut highest = None;
        for mv in player.legal_moves() {
            let transition = player.make_move(mv);
            if transition.status().is_done() {
                let value = self.min(transition.board(), depth - 1);
                highest = Some(highest.map_or(value, |current: i32| current.max(value)));
            }
        }

        highest.unwrap_or_else(|| Evaluator::evaluate(board))
    }

    /// 获取搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

/// 以给定深度搜索当前走子方的最佳走法
///
/// 深度不在 1..=5 范围内时不搜索，直接返回 None。
pub fn search(board: &Board, depth: u8) -> Option<Move> {
    let config = AiConfig::new(depth).ok()?;
    AiEngine::new(config).search(board)
}
