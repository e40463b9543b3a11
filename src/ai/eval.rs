//! 局面评估
//!
//! 固定视角：正分对黑方有利，负分对白方有利。
//! 各项常量都是调参值，按项拆开以便调试时输出明细。

use crate::board::{cell_row, Board, PLAYABLE_CELLS};
use crate::types::{Color, Rank, Square};
use serde::Serialize;

// === 常量定义 ===

/// 兵价值
pub const MAN_VALUE: i32 = 100;
/// 王价值
pub const KING_VALUE: i32 = 130;
/// 兑子奖励系数：领先时鼓励兑子
const EXCHANGE_SCALE: i32 = 250;
/// 走子方奖励
const TURN_BONUS: i32 = 2;
/// 卡位奖励
const CRAMP_BONUS: i32 = 5;
/// 底线防守系数
const BACK_RANK_WEIGHT: i32 = 3;
/// 双角完整奖励
const DOUBLE_CORNER_BONUS: i32 = 3;
/// 中心兵系数
const CENTER_MAN_WEIGHT: i32 = 1;
/// 中心王系数
const CENTER_KING_WEIGHT: i32 = 5;
/// 边线兵系数
const EDGE_MAN_WEIGHT: i32 = 1;
/// 边线王系数
const EDGE_KING_WEIGHT: i32 = 5;
/// 开局/中局/残局的推进系数
const TEMPO_OPENING: i32 = -2;
const TEMPO_MIDGAME: i32 = -1;
const TEMPO_ENDGAME: i32 = 2;
/// 劣势方的王占据安全角时的分值
const KING_SAFETY_PENALTY: i32 = 15;

/// 底线防守表，下标为底线四格的占用位图
const BACK_RANK_GUARD: [i32; 16] = [0, -1, 1, 0, 1, 1, 2, 1, 1, 0, 7, 4, 2, 2, 9, 8];

/// 中心八格
const CENTER: [usize; 8] = [15, 16, 20, 21, 24, 25, 29, 30];

/// 边线格（包括双方底线和左右两边）
const EDGE: [usize; 14] = [5, 6, 7, 8, 13, 14, 22, 23, 31, 32, 37, 38, 39, 40];

/// 双角附近的安全格
const SAFE_EDGE: [usize; 4] = [8, 13, 32, 37];

/// 黑方走子时计算的体系（黑方一侧起的四列）
///
/// 与白方体系对称，取满 16 格；只数每行第一格会让黑方的体系计数偏少。
const BLACK_SYSTEM: [usize; 16] = [5, 6, 7, 8, 14, 15, 16, 17, 23, 24, 25, 26, 32, 33, 34, 35];

/// 白方走子时计算的体系
const WHITE_SYSTEM: [usize; 16] = [
    10, 11, 12, 13, 19, 20, 21, 22, 28, 29, 30, 31, 37, 38, 39, 40,
];

const BM: Square = Square::piece_of(crate::types::BLACK, crate::types::MAN);
const BK: Square = Square::piece_of(crate::types::BLACK, crate::types::KING);
const WM: Square = Square::piece_of(crate::types::WHITE, crate::types::MAN);
const WK: Square = Square::piece_of(crate::types::WHITE, crate::types::KING);

/// 各项评估明细
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvalBreakdown {
    pub material: i32,
    pub exchange: i32,
    pub turn: i32,
    pub cramp: i32,
    pub back_rank: i32,
    pub double_corner: i32,
    pub center: i32,
    pub edge: i32,
    pub tempo: i32,
    pub king_safety: i32,
    pub opposition: i32,
}

impl EvalBreakdown {
    pub fn total(&self) -> i32 {
        self.material
            + self.exchange
            + self.turn
            + self.cramp
            + self.back_rank
            + self.double_corner
            + self.center
            + self.edge
            + self.tempo
            + self.king_safety
            + self.opposition
    }
}

/// 棋子数量
#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    black_men: i32,
    black_kings: i32,
    white_men: i32,
    white_kings: i32,
}

impl Counts {
    fn of(board: &Board) -> Self {
        Counts {
            black_men: board.count(Color::Black, Rank::Man) as i32,
            black_kings: board.count(Color::Black, Rank::King) as i32,
            white_men: board.count(Color::White, Rank::Man) as i32,
            white_kings: board.count(Color::White, Rank::King) as i32,
        }
    }

    fn black(&self) -> i32 {
        self.black_men + self.black_kings
    }

    fn white(&self) -> i32 {
        self.white_men + self.white_kings
    }

    fn total(&self) -> i32 {
        self.black() + self.white()
    }
}

/// 评估局面，color 为走子方
pub fn evaluate(board: &Board, color: Color) -> i32 {
    evaluate_detailed(board, color).total()
}

/// 评估局面并返回各项明细
pub fn evaluate_detailed(board: &Board, color: Color) -> EvalBreakdown {
    let counts = Counts::of(board);

    let black_material = MAN_VALUE * counts.black_men + KING_VALUE * counts.black_kings;
    let white_material = MAN_VALUE * counts.white_men + KING_VALUE * counts.white_kings;
    let material_sum = black_material + white_material;

    EvalBreakdown {
        material: black_material - white_material,
        exchange: if material_sum == 0 {
            0
        } else {
            EXCHANGE_SCALE * (black_material - white_material) / material_sum
        },
        turn: match color {
            Color::Black => TURN_BONUS,
            Color::White => -TURN_BONUS,
        },
        cramp: cramp(board),
        back_rank: BACK_RANK_WEIGHT
            * (BACK_RANK_GUARD[back_rank_code(board, Color::Black)]
                - BACK_RANK_GUARD[back_rank_code(board, Color::White)]),
        double_corner: double_corner(board),
        center: weighted_presence(board, &CENTER, CENTER_MAN_WEIGHT, CENTER_KING_WEIGHT),
        edge: -weighted_presence(board, &EDGE, EDGE_MAN_WEIGHT, EDGE_KING_WEIGHT),
        tempo: tempo(board, counts.black_men + counts.white_men),
        king_safety: king_safety(board, &counts),
        opposition: opposition(board, color, &counts),
    }
}

fn cramp(board: &Board) -> i32 {
    let mut score = 0;
    if board.get(23) == BM && board.get(28) == WM {
        score += CRAMP_BONUS;
    }
    if board.get(22) == WM && board.get(17) == BM {
        score -= CRAMP_BONUS;
    }
    score
}

/// 底线四格的兵占用位图，从各自的单角一侧开始编码
///
/// 只数本方的兵。对方的兵到达这一行就已升变，所以正常对局里与“任意兵”的写法等价；
/// 仅在导入的局面里底线留有未升变的对方兵时结果不同。
fn back_rank_code(board: &Board, color: Color) -> usize {
    let cells: [usize; 4] = match color {
        Color::Black => [5, 6, 7, 8],
        Color::White => [40, 39, 38, 37],
    };
    let man = Square::piece(color, Rank::Man);
    cells
        .iter()
        .enumerate()
        .filter(|&(_, &cell)| board.get(cell) == man)
        .map(|(bit, _)| 1 << bit)
        .sum()
}

fn double_corner(board: &Board) -> i32 {
    let mut score = 0;
    if board.get(8) == BM && (board.get(12) == BM || board.get(13) == BM) {
        score += DOUBLE_CORNER_BONUS;
    }
    if board.get(37) == WM && (board.get(32) == WM || board.get(33) == WM) {
        score -= DOUBLE_CORNER_BONUS;
    }
    score
}

/// 某组格子上双方棋子的加权差（黑减白）
fn weighted_presence(board: &Board, cells: &[usize], man_weight: i32, king_weight: i32) -> i32 {
    cells
        .iter()
        .map(|&cell| match board.get(cell) {
            sq if sq == BM => man_weight,
            sq if sq == BK => king_weight,
            sq if sq == WM => -man_weight,
            sq if sq == WK => -king_weight,
            _ => 0,
        })
        .sum()
}

/// 兵的推进程度，按剩余兵数分阶段加权
fn tempo(board: &Board, men: i32) -> i32 {
    let mut advance = 0;
    for &cell in PLAYABLE_CELLS.iter() {
        let row = cell_row(cell).unwrap_or(0) as i32;
        match board.get(cell) {
            sq if sq == BM => advance += row,
            sq if sq == WM => advance -= 7 - row,
            _ => {}
        }
    }

    let multiplier = if men >= 16 {
        TEMPO_OPENING
    } else if men >= 12 {
        TEMPO_MIDGAME
    } else if men < 9 {
        TEMPO_ENDGAME
    } else {
        0
    };
    multiplier * advance
}

/// 子力领先时，对方少于三个王且王停在安全角，对领先方不利（对方容易守和）
fn king_safety(board: &Board, counts: &Counts) -> i32 {
    let mut score = 0;
    for &cell in SAFE_EDGE.iter() {
        if counts.black() > counts.white() && counts.white_kings < 3 && board.get(cell) == WK {
            score -= KING_SAFETY_PENALTY;
        }
        if counts.white() > counts.black() && counts.black_kings < 3 && board.get(cell) == BK {
            score += KING_SAFETY_PENALTY;
        }
    }
    score
}

/// 子数相等时的"走步"判断：统计体系内的棋子数奇偶
fn opposition(board: &Board, color: Color, counts: &Counts) -> i32 {
    if counts.black() != counts.white() {
        return 0;
    }

    let total = counts.total();
    let magnitude = [(12, 1), (10, 1), (8, 2), (6, 2)]
        .iter()
        .filter(|(limit, _)| total <= *limit)
        .map(|(_, bonus)| bonus)
        .sum::<i32>();
    if magnitude == 0 {
        return 0;
    }

    let system: &[usize] = match color {
        Color::Black => &BLACK_SYSTEM,
        Color::White => &WHITE_SYSTEM,
    };
    let stones = system
        .iter()
        .filter(|&&cell| !board.get(cell).is_free())
        .count();

    // 黑方走子时奇数有利，白方走子时偶数有利（对黑方而言）
    let favorable = match color {
        Color::Black => stones % 2 == 1,
        Color::White => stones % 2 == 0,
    };
    if favorable {
        magnitude
    } else {
        -magnitude
    }
}
