//! 随机 AI 策略

use super::{AIStrategy, Outcome, PlayedMove};
use crate::board::Board;
use crate::types::Color;
use rand::prelude::*;
use std::cell::RefCell;
use std::sync::atomic::AtomicBool;

/// 随机 AI - 在合法走法中均匀随机选择（遵守强制吃子）
pub struct RandomAI {
    rng: RefCell<StdRng>,
}

impl RandomAI {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        RandomAI {
            rng: RefCell::new(rng),
        }
    }
}

impl AIStrategy for RandomAI {
    fn choose_move(&self, board: &mut Board, color: Color, _cancel: &AtomicBool) -> Outcome {
        let moves = board.legal_moves(color);
        let forced = moves.len() == 1;
        match moves.choose(&mut *self.rng.borrow_mut()) {
            Some(&mv) => Outcome::Played(PlayedMove {
                mv,
                score: None,
                forced,
            }),
            None => Outcome::NoLegalMove,
        }
    }
}
