//! 引擎入口
//!
//! 一次调用完成：导入外部棋盘 → 选步 → 落子 → 写回外部棋盘。

use crate::ai::{AIConfig, AIEngine, Outcome};
use crate::board::{Board, GridBoard};
use crate::types::Color;
use log::{debug, info};
use std::sync::atomic::AtomicBool;

/// 在外部棋盘上为 color 找出并走出最佳一步
///
/// 棋盘原地修改。没有合法走法或取消时没有可用走法，棋盘保持不变；
/// 取消时若已有完整搜索过的走法则照常落子。
pub fn find_and_apply_best_move(
    grid: &mut GridBoard,
    color: Color,
    cancel: &AtomicBool,
) -> Outcome {
    Engine::default().play(grid, color, cancel)
}

/// 持有配置的引擎
pub struct Engine {
    ai: AIEngine,
}

impl Engine {
    pub fn new(config: &AIConfig) -> Self {
        Engine {
            ai: AIEngine::alpha_beta(config),
        }
    }

    /// 按策略名创建
    pub fn with_strategy(name: &str, config: &AIConfig) -> Result<Self, String> {
        Ok(Engine {
            ai: AIEngine::from_strategy(name, config)?,
        })
    }

    /// 在内部棋盘上选步并落子
    pub fn play_board(&self, board: &mut Board, color: Color, cancel: &AtomicBool) -> Outcome {
        let outcome = self.ai.choose_move(board, color, cancel);
        match outcome.played() {
            Some(played) => {
                board.apply(&played.mv);
                info!("{} {}: {}", color, outcome.label(), played.mv);
            }
            None => info!("{} {}", color, outcome.label()),
        }
        outcome
    }

    /// 在外部棋盘上选步并落子
    pub fn play(&self, grid: &mut GridBoard, color: Color, cancel: &AtomicBool) -> Outcome {
        let mut board = Board::from_grid(grid);
        debug!("imported board:\n{}", board);

        let outcome = self.play_board(&mut board, color, cancel);
        if outcome.played().is_some() {
            board.write_grid(grid);
        }
        outcome
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(&AIConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Rank, Square};

    #[test]
    fn test_plays_one_move_from_initial() {
        let mut grid = GridBoard::initial();
        let cancel = AtomicBool::new(false);
        let outcome = find_and_apply_best_move(&mut grid, Color::Black, &cancel);
        assert!(matches!(outcome, Outcome::Played(_)));
        assert_ne!(grid, GridBoard::initial());

        let board = Board::from_grid(&grid);
        assert_eq!(board.count(Color::Black, Rank::Man), 12);
        assert_eq!(board.count(Color::White, Rank::Man), 12);
    }

    #[test]
    fn test_no_move_leaves_grid_unchanged() {
        let mut grid = GridBoard::empty();
        grid.set(0, 7, Square::piece(Color::White, Rank::King));
        let before = grid;
        let cancel = AtomicBool::new(false);
        let outcome = find_and_apply_best_move(&mut grid, Color::Black, &cancel);
        assert_eq!(outcome, Outcome::NoLegalMove);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_cancel_before_search_leaves_grid_unchanged() {
        let mut grid = GridBoard::initial();
        let cancel = AtomicBool::new(true);
        let outcome = find_and_apply_best_move(&mut grid, Color::White, &cancel);
        assert_eq!(outcome, Outcome::Cancelled(None));
        assert_eq!(grid, GridBoard::initial());
    }

    #[test]
    fn test_with_unknown_strategy() {
        assert!(Engine::with_strategy("nope", &AIConfig::default()).is_err());
        assert!(Engine::with_strategy("random", &AIConfig::default()).is_ok());
    }
}
