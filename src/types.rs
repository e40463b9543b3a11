//! 跳棋核心类型定义
//!
//! 格子状态使用位掩码表示：颜色和兵种可以分别测试，组合值可直接作为查表下标。
//! 这些数值同时也是与外部棋盘、存档格式之间的约定，不能随意修改。

use std::fmt;

/// 哨兵格（非棋盘格）
pub const OCCUPIED: u8 = 0;
/// 白方
pub const WHITE: u8 = 1;
/// 黑方
pub const BLACK: u8 = 2;
/// 兵
pub const MAN: u8 = 4;
/// 王
pub const KING: u8 = 8;
/// 空格
pub const FREE: u8 = 16;

/// 棋子颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// 获取对方颜色
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 颜色位
    #[inline]
    pub fn flag(&self) -> u8 {
        match self {
            Color::White => WHITE,
            Color::Black => BLACK,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Color> {
        match c.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'B' => Some(Color::Black),
            _ => None,
        }
    }

    /// 转换为 FEN 字符
    pub fn to_fen_char(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }

    /// 该颜色的兵升变所在的行（对方底线）
    #[inline]
    pub fn promotion_row(&self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// 兵种
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rank {
    /// 兵：只能斜向前走
    Man,
    /// 王：四个斜方向都能走
    King,
}

impl Rank {
    #[inline]
    pub fn flag(&self) -> u8 {
        match self {
            Rank::Man => MAN,
            Rank::King => KING,
        }
    }
}

/// 单个格子的状态（位掩码）
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square(u8);

impl Square {
    pub const OCCUPIED: Square = Square(OCCUPIED);
    pub const FREE: Square = Square(FREE);

    /// 某方的某种棋子
    #[inline]
    pub const fn piece_of(color: u8, rank: u8) -> Square {
        Square(color | rank)
    }

    #[inline]
    pub fn piece(color: Color, rank: Rank) -> Square {
        Square(color.flag() | rank.flag())
    }

    /// 从外部原始字节解析
    ///
    /// 只接受恰好一个颜色位加一个兵种位的组合，其余（包括 0）一律视为空格。
    pub fn from_raw(raw: u8) -> Square {
        const VALID: [u8; 4] = [WHITE | MAN, WHITE | KING, BLACK | MAN, BLACK | KING];
        if VALID.contains(&raw) {
            Square(raw)
        } else {
            Square::FREE
        }
    }

    #[inline]
    pub fn raw(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.0 & FREE != 0
    }

    /// 是否为某方棋子（哨兵和空格都返回 false）
    #[inline]
    pub fn has_color(&self, color: Color) -> bool {
        self.0 & color.flag() != 0
    }

    #[inline]
    pub fn is_man(&self) -> bool {
        self.0 & MAN != 0
    }

    #[inline]
    pub fn is_king(&self) -> bool {
        self.0 & KING != 0
    }

    pub fn color(&self) -> Option<Color> {
        if self.has_color(Color::White) {
            Some(Color::White)
        } else if self.has_color(Color::Black) {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn rank(&self) -> Option<Rank> {
        if self.is_man() {
            Some(Rank::Man)
        } else if self.is_king() {
            Some(Rank::King)
        } else {
            None
        }
    }

    /// 兵升变后的状态；王和非棋子原样返回
    pub fn promoted(&self) -> Square {
        if self.is_man() {
            Square((self.0 & !MAN) | KING)
        } else {
            *self
        }
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            OCCUPIED => "OCCUPIED",
            FREE => "FREE",
            r if r == WHITE | MAN => "WHITE|MAN",
            r if r == WHITE | KING => "WHITE|KING",
            r if r == BLACK | MAN => "BLACK|MAN",
            r if r == BLACK | KING => "BLACK|KING",
            _ => return write!(f, "Square({})", self.0),
        };
        write!(f, "{}", name)
    }
}

/// 走法的一步状态变化：某格从 before 变为 after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub cell: u8,
    pub before: Square,
    pub after: Square,
}

impl Leg {
    const EMPTY: Leg = Leg {
        cell: 0,
        before: Square::OCCUPIED,
        after: Square::OCCUPIED,
    };

    pub fn new(cell: usize, before: Square, after: Square) -> Self {
        Leg {
            cell: cell as u8,
            before,
            after,
        }
    }
}

/// 对方最多 12 个棋子，所以一步吃子最多 2 + 12 条 leg
pub const MAX_LEGS: usize = 14;

/// 跳棋走法
///
/// legs[0] 清空起点，legs[1] 落到终点（已包含升变），
/// 之后每条 leg 移除一个被吃的棋子。
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Move {
    legs: [Leg; MAX_LEGS],
    len: u8,
}

impl Move {
    fn with_legs(origin: Leg, landing: Leg) -> Self {
        let mut legs = [Leg::EMPTY; MAX_LEGS];
        legs[0] = origin;
        legs[1] = landing;
        Move { legs, len: 2 }
    }

    /// 普通走法：piece 从 from 走到 to，落地后状态为 landed
    pub fn quiet(from: usize, to: usize, piece: Square, landed: Square) -> Self {
        Move::with_legs(
            Leg::new(from, piece, Square::FREE),
            Leg::new(to, Square::FREE, landed),
        )
    }

    /// 单跳吃子
    pub fn capture(
        from: usize,
        over: usize,
        to: usize,
        piece: Square,
        victim: Square,
        landed: Square,
    ) -> Self {
        let mut mv = Move::quiet(from, to, piece, landed);
        mv.push_capture(over, victim);
        mv
    }

    /// 连跳：终点移到 to，并追加一个被吃的棋子
    pub fn extend(&mut self, over: usize, victim: Square, to: usize, landed: Square) {
        self.legs[1] = Leg::new(to, Square::FREE, landed);
        self.push_capture(over, victim);
    }

    fn push_capture(&mut self, over: usize, victim: Square) {
        debug_assert!((self.len as usize) < MAX_LEGS, "capture chain overflow");
        self.legs[self.len as usize] = Leg::new(over, victim, Square::FREE);
        self.len += 1;
    }

    #[inline]
    pub fn legs(&self) -> &[Leg] {
        &self.legs[..self.len as usize]
    }

    #[inline]
    pub fn origin(&self) -> usize {
        self.legs[0].cell as usize
    }

    #[inline]
    pub fn destination(&self) -> usize {
        self.legs[1].cell as usize
    }

    /// 走子方在起点时的状态
    #[inline]
    pub fn piece(&self) -> Square {
        self.legs[0].before
    }

    /// 落地后的状态（可能已升变）
    #[inline]
    pub fn landed(&self) -> Square {
        self.legs[1].after
    }

    pub fn is_capture(&self) -> bool {
        self.len > 2
    }

    /// 被吃棋子的 leg
    pub fn captures(&self) -> &[Leg] {
        &self.legs[2..self.len as usize]
    }

    pub fn is_promotion(&self) -> bool {
        self.piece().is_man() && self.landed().is_king()
    }
}

/// 标准记谱：普通走法 `11-15`，吃子 `15x24`（只记起点和最终落点）
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let from = crate::board::cell_to_square(self.origin()).unwrap_or(0);
        let to = crate::board::cell_to_square(self.destination()).unwrap_or(0);
        let sep = if self.is_capture() { 'x' } else { '-' };
        write!(f, "{}{}{}", from, sep, to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.legs()).finish()
    }
}

/// 游戏结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    WhiteWin,
    BlackWin,
    Draw,
}
