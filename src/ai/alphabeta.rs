//! Alpha-Beta 搜索
//!
//! 黑方取最大、白方取最小（不用 negamax，评估是固定视角）。
//! 深度耗尽时若仍有吃子未完成，继续多搜一层，吃子序列不会被深度截断。

use super::eval::evaluate;
use super::{AIConfig, AIStrategy, Outcome, PlayedMove, NODE_COUNT};
use crate::board::Board;
use crate::types::{Color, Move};
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// 无子可走时的分数（超过任何局面评估）
pub const MATE_SCORE: i32 = 5000;

/// 根节点的初始窗口
pub const SEARCH_WINDOW: i32 = 10000;

/// 搜索上下文：持有棋盘，递归中原地 apply/undo
pub struct SearchContext<'a> {
    board: Board,
    cancel: &'a AtomicBool,
    deadline: Option<Instant>,
    cancelled: bool,
}

impl<'a> SearchContext<'a> {
    pub fn new(board: Board, cancel: &'a AtomicBool) -> Self {
        SearchContext {
            board,
            cancel,
            deadline: None,
            cancelled: false,
        }
    }

    /// 超时后视同取消
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + limit);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    /// 搜索是否被中止过
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    fn poll_cancel(&mut self) -> bool {
        if !self.cancelled {
            let timed_out = self.deadline.is_some_and(|d| Instant::now() >= d);
            if self.cancel.load(Ordering::Relaxed) || timed_out {
                self.cancelled = true;
            }
        }
        self.cancelled
    }

    /// 本节点的走法；深度为 0 且无吃子时返回 None 表示应直接评估
    fn node_moves(&mut self, depth: &mut u32, color: Color) -> Option<Vec<Move>> {
        let capture = self.board.has_capture(color);
        if *depth == 0 {
            if !capture {
                return None;
            }
            *depth = 1;
        }
        Some(if capture {
            self.board.generate_captures(color)
        } else {
            self.board.generate_quiet_moves(color)
        })
    }

    /// 递归搜索，返回局面分（黑方视角）
    pub fn search(&mut self, depth: u32, mut alpha: i32, mut beta: i32, color: Color) -> i32 {
        NODE_COUNT.fetch_add(1, Ordering::Relaxed);
        if self.poll_cancel() {
            return 0;
        }

        let mut depth = depth;
        let moves = match self.node_moves(&mut depth, color) {
            Some(moves) => moves,
            None => return evaluate(&self.board, color),
        };
        if moves.is_empty() {
            return lost(color);
        }

        for mv in &moves {
            self.board.apply(mv);
            let value = self.search(depth - 1, alpha, beta, color.opposite());
            self.board.undo(mv);

            if self.cancelled {
                return 0;
            }

            match color {
                Color::Black => {
                    if value >= beta {
                        return value;
                    }
                    alpha = alpha.max(value);
                }
                Color::White => {
                    if value <= alpha {
                        return value;
                    }
                    beta = beta.min(value);
                }
            }
        }

        match color {
            Color::Black => alpha,
            Color::White => beta,
        }
    }

    /// 根节点搜索，额外返回最佳走法
    ///
    /// 中途取消时返回已经完整搜索过的子节点中最好的走法。
    pub fn search_root(&mut self, depth: u32, color: Color) -> (i32, Option<Move>) {
        let mut alpha = -SEARCH_WINDOW;
        let mut beta = SEARCH_WINDOW;
        let mut best = None;

        NODE_COUNT.fetch_add(1, Ordering::Relaxed);
        if self.poll_cancel() {
            return (0, None);
        }

        let mut depth = depth;
        let moves = match self.node_moves(&mut depth, color) {
            Some(moves) => moves,
            None => return (evaluate(&self.board, color), None),
        };
        if moves.is_empty() {
            return (lost(color), None);
        }

        for mv in &moves {
            self.board.apply(mv);
            let value = self.search(depth - 1, alpha, beta, color.opposite());
            self.board.undo(mv);

            if self.cancelled {
                break;
            }

            match color {
                Color::Black => {
                    if value >= beta {
                        return (value, Some(*mv));
                    }
                    if value > alpha {
                        alpha = value;
                        best = Some(*mv);
                    }
                }
                Color::White => {
                    if value <= alpha {
                        return (value, Some(*mv));
                    }
                    if value < beta {
                        beta = value;
                        best = Some(*mv);
                    }
                }
            }
        }

        let score = match color {
            Color::Black => alpha,
            Color::White => beta,
        };
        (score, best)
    }
}

/// color 无子可走
#[inline]
fn lost(color: Color) -> i32 {
    match color {
        Color::Black => -MATE_SCORE,
        Color::White => MATE_SCORE,
    }
}

/// Alpha-Beta AI
pub struct AlphaBetaAI {
    depth: u32,
    time_limit: Option<Duration>,
}

impl AlphaBetaAI {
    pub fn new(config: &AIConfig) -> Self {
        AlphaBetaAI {
            depth: config.depth.max(1),
            time_limit: config
                .time_limit
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
        }
    }
}

impl AIStrategy for AlphaBetaAI {
    fn choose_move(&self, board: &mut Board, color: Color, cancel: &AtomicBool) -> Outcome {
        // 只有一个吃子或只有一个普通走法时直接走，不搜索
        let captures = board.generate_captures(color);
        let candidates = if captures.is_empty() {
            board.generate_quiet_moves(color)
        } else {
            captures
        };
        match candidates.len() {
            0 => {
                debug!("{} has no legal move", color);
                return Outcome::NoLegalMove;
            }
            1 => {
                debug!("{} forced: {}", color, candidates[0]);
                return Outcome::Played(PlayedMove {
                    mv: candidates[0],
                    score: None,
                    forced: true,
                });
            }
            _ => {}
        }

        let mut ctx = SearchContext::new(board.clone(), cancel);
        if let Some(limit) = self.time_limit {
            ctx = ctx.with_time_limit(limit);
        }
        let (score, best) = ctx.search_root(self.depth, color);
        debug_assert_eq!(ctx.board(), &*board, "search must restore the board");

        let played = best.map(|mv| PlayedMove {
            mv,
            score: Some(score),
            forced: false,
        });

        if ctx.was_cancelled() {
            info!(
                "search cancelled for {}, best so far: {}",
                color,
                played.map_or_else(|| "none".to_string(), |p| p.mv.to_string())
            );
            return Outcome::Cancelled(played);
        }

        match played {
            Some(played) => {
                debug!("{} plays {} (score {})", color, played.mv, score);
                Outcome::Played(played)
            }
            None => Outcome::NoLegalMove,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions::*;

    /// 不剪枝的极大极小（同样的吃子延伸规则）
    fn minimax(board: &mut Board, depth: u32, color: Color) -> i32 {
        let capture = board.has_capture(color);
        let mut depth = depth;
        if depth == 0 {
            if !capture {
                return evaluate(board, color);
            }
            depth = 1;
        }
        let moves = board.legal_moves(color);
        if moves.is_empty() {
            return lost(color);
        }

        let values = moves.iter().map(|mv| {
            board.apply(mv);
            let v = minimax(board, depth - 1, color.opposite());
            board.undo(mv);
            v
        });
        let values: Vec<i32> = values.collect();
        match color {
            Color::Black => values.into_iter().max().unwrap(),
            Color::White => values.into_iter().min().unwrap(),
        }
    }

    /// 不剪枝的根节点：取第一个严格更优的走法
    fn minimax_root(board: &mut Board, depth: u32, color: Color) -> (i32, Move) {
        let moves = board.legal_moves(color);
        let mut best: Option<(i32, Move)> = None;
        for mv in &moves {
            board.apply(mv);
            let v = minimax(board, depth - 1, color.opposite());
            board.undo(mv);
            let better = match (best, color) {
                (None, _) => true,
                (Some((b, _)), Color::Black) => v > b,
                (Some((b, _)), Color::White) => v < b,
            };
            if better {
                best = Some((v, *mv));
            }
        }
        best.unwrap()
    }

    #[test]
    fn test_alphabeta_matches_minimax() {
        for fen in [START, EARLY_1, EARLY_2, MID_1, MID_2, BRANCHING_CAPTURE] {
            let state = crate::fen::parse_fen(fen).unwrap();
            for depth in 1..=3 {
                let mut board = state.board();
                let (expected_score, expected_move) = minimax_root(&mut board, depth, state.turn);

                let cancel = AtomicBool::new(false);
                let mut ctx = SearchContext::new(state.board(), &cancel);
                let (score, best) = ctx.search_root(depth, state.turn);

                assert_eq!(score, expected_score, "score mismatch: {} depth {}", fen, depth);
                assert_eq!(best, Some(expected_move), "move mismatch: {} depth {}", fen, depth);
                assert_eq!(ctx.into_board(), state.board());
            }
        }
    }

    #[test]
    fn test_no_moves_is_loss() {
        let cancel = AtomicBool::new(false);
        let mut ctx = SearchContext::new(Board::from_fen(SHUTOUT).unwrap(), &cancel);
        assert_eq!(ctx.search(1, -SEARCH_WINDOW, SEARCH_WINDOW, Color::Black), -MATE_SCORE);

        let mut ctx = SearchContext::new(Board::from_fen(NO_WHITE_PIECES).unwrap(), &cancel);
        assert_eq!(ctx.search(2, -SEARCH_WINDOW, SEARCH_WINDOW, Color::White), MATE_SCORE);
    }

    #[test]
    fn test_capture_extension_at_depth_zero() {
        // 深度 0 但有吃子，必须先吃完再评估
        let mut board = Board::from_fen(SINGLE_CAPTURE).unwrap();
        let cancel = AtomicBool::new(false);
        let mut ctx = SearchContext::new(board.clone(), &cancel);
        let value = ctx.search(0, -SEARCH_WINDOW, SEARCH_WINDOW, Color::Black);
        assert_ne!(value, evaluate(&board, Color::Black));

        let mv = board.legal_moves(Color::Black)[0];
        board.apply(&mv);
        assert_eq!(value, evaluate(&board, Color::White));
    }

    #[test]
    fn test_cancelled_search_returns_neutral() {
        let cancel = AtomicBool::new(true);
        let mut ctx = SearchContext::new(Board::initial(), &cancel);
        assert_eq!(ctx.search(3, -SEARCH_WINDOW, SEARCH_WINDOW, Color::Black), 0);
        assert!(ctx.was_cancelled());
        assert_eq!(ctx.search_root(3, Color::Black), (0, None));
        assert_eq!(ctx.into_board(), Board::initial());
    }

    #[test]
    fn test_choose_move_cancelled() {
        let cancel = AtomicBool::new(true);
        let ai = AlphaBetaAI::new(&AIConfig::default());
        let mut board = Board::initial();
        let outcome = ai.choose_move(&mut board, Color::Black, &cancel);
        assert_eq!(outcome, Outcome::Cancelled(None));
        assert_eq!(board, Board::initial());
    }

    /// 搜索进行中另一个线程置位取消标志
    fn cancel_after<T>(delay: Duration, cancel: &AtomicBool, run: impl FnOnce() -> T) -> T {
        std::thread::scope(|s| {
            s.spawn(move || {
                std::thread::sleep(delay);
                cancel.store(true, Ordering::Relaxed);
            });
            run()
        })
    }

    #[test]
    fn test_inner_nodes_poll_cancel() {
        // 深度 30 不可能搜完，只有内部节点检查取消标志才会返回
        let cancel = AtomicBool::new(false);
        let mut ctx = SearchContext::new(Board::from_fen(MID_1).unwrap(), &cancel);
        let start = Instant::now();
        let value = cancel_after(Duration::from_millis(50), &cancel, || {
            ctx.search(30, -SEARCH_WINDOW, SEARCH_WINDOW, Color::White)
        });

        assert_eq!(value, 0);
        assert!(ctx.was_cancelled());
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(ctx.into_board(), Board::from_fen(MID_1).unwrap());
    }

    #[test]
    fn test_choose_move_cancelled_mid_search() {
        let ai = AlphaBetaAI::new(&AIConfig {
            depth: 30,
            ..Default::default()
        });
        let cancel = AtomicBool::new(false);
        let mut board = Board::initial();
        let start = Instant::now();
        let outcome = cancel_after(Duration::from_millis(50), &cancel, || {
            ai.choose_move(&mut board, Color::Black, &cancel)
        });

        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(board, Board::initial());
        match outcome {
            Outcome::Cancelled(Some(played)) => {
                assert!(!played.forced);
                assert!(board.legal_moves(Color::Black).contains(&played.mv));
            }
            Outcome::Cancelled(None) => {}
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_forced_move_ignores_cancel() {
        let cancel = AtomicBool::new(true);
        let ai = AlphaBetaAI::new(&AIConfig::default());
        let mut board = Board::from_fen(SINGLE_CAPTURE).unwrap();
        match ai.choose_move(&mut board, Color::Black, &cancel) {
            Outcome::Played(played) => {
                assert!(played.forced);
                assert_eq!(played.score, None);
                assert_eq!(played.mv.to_string(), "9x18");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_prefers_longer_capture_when_better() {
        let ai = AlphaBetaAI::new(&AIConfig::default());
        let cancel = AtomicBool::new(false);
        let mut board = Board::from_fen(BRANCHING_CAPTURE).unwrap();
        match ai.choose_move(&mut board, Color::Black, &cancel) {
            Outcome::Played(played) => {
                assert!(!played.forced);
                assert_eq!(played.mv.to_string(), "3x19");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_shutout_has_no_legal_move() {
        let ai = AlphaBetaAI::new(&AIConfig::default());
        let cancel = AtomicBool::new(false);
        let mut board = Board::from_fen(SHUTOUT).unwrap();
        assert_eq!(
            ai.choose_move(&mut board, Color::Black, &cancel),
            Outcome::NoLegalMove
        );
    }

    #[test]
    fn test_time_limit_zero_cancels() {
        let config = AIConfig {
            depth: 6,
            time_limit: Some(0.0),
            ..Default::default()
        };
        let ai = AlphaBetaAI::new(&config);
        let cancel = AtomicBool::new(false);
        let mut board = Board::initial();
        assert!(matches!(
            ai.choose_move(&mut board, Color::Black, &cancel),
            Outcome::Cancelled(_)
        ));
        assert!(!cancel.load(Ordering::Relaxed));
    }
}
