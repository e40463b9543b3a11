//! 跳棋测试局面库
//!
//! 提供命名的 FEN 测试局面，方便测试和调试
//!
//! 编号使用标准记法：黑方从 1-12 出发向 32 方向前进，白方从 21-32 出发。

// =============================================================================
// 开局 (START)
// =============================================================================

/// 初始局面，黑方先走
pub const START: &str = "B:W21,22,23,24,25,26,27,28,29,30,31,32:B1,2,3,4,5,6,7,8,9,10,11,12";

/// 黑方 11-15 之后
pub const EARLY_1: &str = "W:W21,22,23,24,25,26,27,28,29,30,31,32:B1,2,3,4,5,6,7,8,9,10,12,15";

/// 黑方 11-15、白方 23-19 之后
pub const EARLY_2: &str = "B:W19,21,22,24,25,26,27,28,29,30,31,32:B1,2,3,4,5,6,7,8,9,10,12,15";

// =============================================================================
// 中局 (MID)
// =============================================================================

/// 双方互有吃子机会的中局
pub const MID_1: &str = "B:W17,19,21,22,24,25,27,28,30,31:B1,2,3,5,6,7,10,11,12,14";

/// 有王的中局
pub const MID_2: &str = "W:WK5,20,21,23,26,28,31:B1,2,K15,16,18,22";

// =============================================================================
// 吃子 (CAPTURE)
// =============================================================================

/// 黑兵 9 只有唯一的吃子 9x18
pub const SINGLE_CAPTURE: &str = "B:W14:B9";

/// 黑王 4 连吃三个白兵，落在 25
pub const KING_TRIPLE_JUMP: &str = "B:W8,15,22:BK4";

/// 黑兵 3 有两条路线：3x10（吃一个）和 3x19（连吃两个）
pub const BRANCHING_CAPTURE: &str = "B:W7,8,16:B3";

/// 黑王 11 绕一圈连吃四个后回到起点，两个方向各一条
pub const KING_LOOP: &str = "B:W15,16,23,24:BK11";

/// 黑兵 21 吃 25 后在 30 升变，同一步里不能继续向后吃 26
pub const PROMOTION_CAPTURE: &str = "B:W25,26:B21";

// =============================================================================
// 特殊情况 (SPECIAL)
// =============================================================================

/// 黑兵 25 可以走到底线升变
pub const PROMOTION: &str = "B:W1:B25";

/// 黑方四个兵全部被堵死，没有合法走法
pub const SHUTOUT: &str = "B:W29,30,31,32:B25,26,27,28";

/// 白方已经没有棋子
pub const NO_WHITE_PIECES: &str = "W:W:B1,K20";

/// 所有命名局面（用于批量测试）
pub const ALL: &[&str] = &[
    START,
    EARLY_1,
    EARLY_2,
    MID_1,
    MID_2,
    SINGLE_CAPTURE,
    KING_TRIPLE_JUMP,
    BRANCHING_CAPTURE,
    KING_LOOP,
    PROMOTION_CAPTURE,
    PROMOTION,
    SHUTOUT,
    NO_WHITE_PIECES,
];
