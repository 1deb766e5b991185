//! 走子记录
//!
//! 按顺序保存已经走成功的走法，生成白黑成对的历史行，并统计被吃掉的棋子。

use crate::alliance::Alliance;
use crate::board::Board;
use crate::moves::Move;
use crate::piece::Piece;

/// 历史记录中的一行（一个回合）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryRow {
    pub white: Option<String>,
    pub black: Option<String>,
}

/// 走子记录
#[derive(Debug, Clone, Default)]
pub struct MoveLog {
    moves: Vec<Move>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加走法
    pub fn add_move(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// 按下标移除，越界返回 None
    pub fn remove_move(&mut self, index: usize) -> Option<Move> {
        if index < self.moves.len() {
            Some(self.moves.remove(index))
        } else {
            None
        }
    }

    /// 移除第一个相同的走法
    pub fn remove(&mut self, mv: &Move) -> bool {
        match self.moves.iter().position(|m| m == mv) {
            Some(index) => {
                self.moves.remove(index);
                true
            }
            None => false,
        }
    }

    /// 某一方被吃掉的棋子，按分值从小到大排序
    pub fn taken_pieces(&self, alliance: Alliance) -> Vec<Piece> {
        let mut taken: Vec<Piece> = self
            .moves
            .iter()
            .filter_map(Move::attacked_piece)
            .filter(|piece| piece.alliance == alliance)
            .collect();
        taken.sort_by_key(|piece| piece.value());
        taken
    }

    /// 生成历史行
    ///
    /// `board` 是最后一步走完后的局面，用于给最后一步加上 "+" 或 "#"。
    /// 按走子的阵营分列：白方走法总是另起一行，黑方走法填入上一行的空位。
    pub fn history_rows(&self, board: &Board) -> Vec<HistoryRow> {
        let mut rows: Vec<HistoryRow> = Vec::with_capacity(self.moves.len() / 2 + 1);
        let last = self.moves.len().saturating_sub(1);

        for (index, mv) in self.moves.iter().enumerate() {
            let Some(piece) = mv.moved_piece() else {
                continue;
            };
            let mut text = mv.to_string();
            if index == last {
                text.push_str(check_suffix(board));
            }

            match piece.alliance {
                Alliance::White => rows.push(HistoryRow {
                    white: Some(text),
                    black: None,
                }),
                Alliance::Black => match rows.last_mut() {
                    Some(row) if row.black.is_none() => row.black = Some(text),
                    _ => rows.push(HistoryRow {
                        white: None,
                        black: Some(text),
                    }),
                },
            }
        }

        rows
    }
}

fn check_suffix(board: &Board) -> &'static str {
    let player = board.current_player();
    if player.is_in_check_mate() {
        "#"
    } else if player.is_in_check() {
        "+"
    } else {
        ""
    }
}
