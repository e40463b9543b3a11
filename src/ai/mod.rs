//! AI 策略模块
//!
//! 默认策略是带吃子延伸的 Alpha-Beta 搜索，另有随机策略用于自对弈陪练

mod alphabeta;
pub mod eval;
mod random;

pub use alphabeta::{AlphaBetaAI, SearchContext, MATE_SCORE, SEARCH_WINDOW};
pub use eval::{evaluate, evaluate_detailed, EvalBreakdown};
pub use random::RandomAI;

use crate::board::Board;
use crate::fen::parse_fen;
use crate::types::{Color, Move};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};

/// 全局节点计数器
pub static NODE_COUNT: AtomicU64 = AtomicU64::new(0);

/// 重置节点计数器
pub fn reset_node_count() {
    NODE_COUNT.store(0, AtomicOrdering::Relaxed);
}

/// 获取当前节点计数
pub fn get_node_count() -> u64 {
    NODE_COUNT.load(AtomicOrdering::Relaxed)
}

/// 可用策略
pub const AVAILABLE_STRATEGIES: &[&str] = &["alphabeta", "random"];

/// 默认策略
pub const DEFAULT_STRATEGY: &str = "alphabeta";

/// AI 配置
#[derive(Debug, Clone)]
pub struct AIConfig {
    /// 搜索深度（吃子延伸不计入）
    pub depth: u32,
    /// 时间限制（秒），超时视同取消
    pub time_limit: Option<f64>,
    /// 随机种子
    pub seed: Option<u64>,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            depth: 1,
            time_limit: None,
            seed: None,
        }
    }
}

/// 实际走出的一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedMove {
    pub mv: Move,
    /// 搜索分数（黑方视角）；强制走法和随机策略没有分数
    pub score: Option<i32>,
    /// 唯一合法走法，未经搜索
    pub forced: bool,
}

/// 一次选步的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 找到走法
    Played(PlayedMove),
    /// 走子方无合法走法（判负）
    NoLegalMove,
    /// 搜索被中止，可能带有目前为止最好的走法
    Cancelled(Option<PlayedMove>),
}

impl Outcome {
    /// 需要落到棋盘上的走法
    pub fn played(&self) -> Option<&PlayedMove> {
        match self {
            Outcome::Played(played) | Outcome::Cancelled(Some(played)) => Some(played),
            Outcome::NoLegalMove | Outcome::Cancelled(None) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Played(_) => "played",
            Outcome::NoLegalMove => "no_legal_move",
            Outcome::Cancelled(_) => "cancelled",
        }
    }
}

/// AI 策略接口
pub trait AIStrategy {
    /// 为 color 选择走法；返回时棋盘保持原样，由调用方落子
    fn choose_move(&self, board: &mut Board, color: Color, cancel: &AtomicBool) -> Outcome;
}

/// AI 引擎 - 统一的 AI 接口
pub struct AIEngine {
    strategy: Box<dyn AIStrategy>,
}

impl AIEngine {
    /// 创建 Alpha-Beta AI
    pub fn alpha_beta(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(AlphaBetaAI::new(config)),
        }
    }

    /// 创建随机 AI
    pub fn random(seed: Option<u64>) -> Self {
        AIEngine {
            strategy: Box::new(RandomAI::new(seed)),
        }
    }

    /// 从策略名称创建
    pub fn from_strategy(name: &str, config: &AIConfig) -> Result<Self, String> {
        match name.to_lowercase().as_str() {
            "alphabeta" | "alpha_beta" | "minimax" => Ok(Self::alpha_beta(config)),
            "random" => Ok(Self::random(config.seed)),
            _ => Err(format!(
                "Unknown strategy: {}. Available: {}",
                name,
                AVAILABLE_STRATEGIES.join(", ")
            )),
        }
    }

    pub fn choose_move(&self, board: &mut Board, color: Color, cancel: &AtomicBool) -> Outcome {
        self.strategy.choose_move(board, color, cancel)
    }

    /// 从 FEN 选择走法（不可取消）
    pub fn choose_move_fen(&self, fen: &str) -> Result<Outcome, String> {
        let state = parse_fen(fen)?;
        let mut board = state.board();
        let cancel = AtomicBool::new(false);
        Ok(self.strategy.choose_move(&mut board, state.turn, &cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_positions::*;

    #[test]
    fn test_all_strategies_from_name() {
        let config = AIConfig::default();
        for name in AVAILABLE_STRATEGIES.iter().chain(["minimax", "AlphaBeta"].iter()) {
            let result = AIEngine::from_strategy(name, &config);
            assert!(result.is_ok(), "Failed to create strategy: {}", name);
        }
        assert!(AIEngine::from_strategy("mcts", &config).is_err());
    }

    #[test]
    fn test_alphabeta_plays_from_start() {
        let ai = AIEngine::from_strategy(DEFAULT_STRATEGY, &AIConfig::default()).unwrap();
        let outcome = ai.choose_move_fen(START).unwrap();
        let played = outcome.played().unwrap();
        assert!(!played.forced);
        assert!(played.score.is_some());
        assert!(!played.mv.is_capture());
    }

    #[test]
    fn test_node_count_increases() {
        let ai = AIEngine::alpha_beta(&AIConfig {
            depth: 2,
            ..Default::default()
        });
        let before = get_node_count();
        ai.choose_move_fen(START).unwrap();
        assert!(get_node_count() > before);
    }

    #[test]
    fn test_outcome_played() {
        let ai = AIEngine::random(Some(7));
        assert_eq!(ai.choose_move_fen(SHUTOUT).unwrap(), Outcome::NoLegalMove);
        assert_eq!(Outcome::NoLegalMove.played(), None);
        assert_eq!(Outcome::Cancelled(None).label(), "cancelled");
    }

    #[test]
    fn test_invalid_fen() {
        let ai = AIEngine::random(None);
        assert!(ai.choose_move_fen("not a fen").is_err());
    }
}
