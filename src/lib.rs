//! Checkers AI Engine
//!
//! 跳棋 AI 引擎 - 强制吃子、连跳、Alpha-Beta 搜索，支持 FEN 输入输出

pub mod ai;
pub mod board;
pub mod engine;
pub mod fen;
pub mod movegen;
pub mod test_positions;
pub mod types;

pub use ai::{
    evaluate, evaluate_detailed, get_node_count, reset_node_count, AIConfig, AIEngine,
    AIStrategy, AlphaBetaAI, EvalBreakdown, Outcome, PlayedMove, RandomAI, SearchContext,
    AVAILABLE_STRATEGIES, DEFAULT_STRATEGY, MATE_SCORE,
};
pub use board::{Board, GridBoard};
pub use engine::{find_and_apply_best_move, Engine};
pub use fen::{apply_move_to_fen, board_to_fen, parse_fen, FenState};
pub use movegen::legal_moves_from_fen;
pub use types::{Color, GameResult, Leg, Move, Rank, Square};
