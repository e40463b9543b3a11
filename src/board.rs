//! 跳棋内部棋盘
//!
//! 内部使用 46 格的线性数组，四周和每第 9 格是哨兵，
//! 这样 ±4/±5 的邻居运算永远不会越界，走法生成不需要边界判断。
//!
//! ```text
//!     (white)
//!   37  38  39  40
//! 32  33  34  35
//!   28  29  30  31
//! 23  24  25  26
//!   19  20  21  22
//! 14  15  16  17
//!   10  11  12  13
//! 5   6   7   8
//!     (black)
//! ```
//!
//! 外部棋盘是 8×8 的 (列, 行) 网格，列 0 在左，行 0 是黑方底线，
//! 只有 (列 + 行) 为奇数的格子可以落子。

use crate::fen::{board_to_fen, parse_fen};
use crate::types::{Color, Move, Rank, Square};
use std::fmt;

/// 内部格子总数
pub const BOARD_CELLS: usize = 46;

/// 哨兵行号
const NO_ROW: u8 = u8::MAX;

/// 每个内部格所在的行（哨兵为 NO_ROW）
const CELL_ROW: [u8; BOARD_CELLS] = [
    NO_ROW, NO_ROW, NO_ROW, NO_ROW, NO_ROW, // 0-4
    0, 0, 0, 0, NO_ROW, // 5-9
    1, 1, 1, 1, // 10-13
    2, 2, 2, 2, NO_ROW, // 14-18
    3, 3, 3, 3, // 19-22
    4, 4, 4, 4, NO_ROW, // 23-27
    5, 5, 5, 5, // 28-31
    6, 6, 6, 6, NO_ROW, // 32-36
    7, 7, 7, 7, // 37-40
    NO_ROW, NO_ROW, NO_ROW, NO_ROW, NO_ROW, // 41-45
];

/// 32 个真实棋盘格，按行从黑方底线开始
pub const PLAYABLE_CELLS: [usize; 32] = [
    5, 6, 7, 8, 10, 11, 12, 13, 14, 15, 16, 17, 19, 20, 21, 22, 23, 24, 25, 26, 28, 29, 30, 31,
    32, 33, 34, 35, 37, 38, 39, 40,
];

lazy_static::lazy_static! {
    /// 内部格 -> 外部 (列, 行)
    static ref CELL_COORDS: [Option<(usize, usize)>; BOARD_CELLS] = {
        let mut table = [None; BOARD_CELLS];
        for (idx, &cell) in PLAYABLE_CELLS.iter().enumerate() {
            let (row, k) = (idx / 4, idx % 4);
            // 每行四格从右往左排列，保证 +4/+5 恰好是相邻的两条斜线
            let col = 7 - (2 * k + row % 2);
            table[cell] = Some((col, row));
        }
        table
    };

    /// 外部 (列, 行) -> 内部格
    static ref COORD_CELLS: [[Option<usize>; 8]; 8] = {
        let mut table = [[None; 8]; 8];
        for &cell in PLAYABLE_CELLS.iter() {
            if let Some((col, row)) = CELL_COORDS[cell] {
                table[col][row] = Some(cell);
            }
        }
        table
    };

    /// 内部格 -> 标准编号 1..32（哨兵为 0）
    static ref CELL_SQUARES: [u8; BOARD_CELLS] = {
        let mut table = [0u8; BOARD_CELLS];
        for (idx, &cell) in PLAYABLE_CELLS.iter().enumerate() {
            let (row, k) = (idx / 4, idx % 4);
            table[cell] = (4 * row + (3 - k) + 1) as u8;
        }
        table
    };
}

/// 是否为真实棋盘格
#[inline]
pub fn is_playable(cell: usize) -> bool {
    cell < BOARD_CELLS && CELL_ROW[cell] != NO_ROW
}

/// 内部格所在的行（0 是黑方底线）
#[inline]
pub fn cell_row(cell: usize) -> Option<usize> {
    match CELL_ROW.get(cell) {
        Some(&row) if row != NO_ROW => Some(row as usize),
        _ => None,
    }
}

/// 内部格 -> 外部 (列, 行)
pub fn cell_coords(cell: usize) -> Option<(usize, usize)> {
    CELL_COORDS.get(cell).copied().flatten()
}

/// 外部 (列, 行) -> 内部格
pub fn coords_cell(col: usize, row: usize) -> Option<usize> {
    if col >= 8 || row >= 8 {
        return None;
    }
    COORD_CELLS[col][row]
}

/// 内部格 -> 标准编号
pub fn cell_to_square(cell: usize) -> Option<u8> {
    match CELL_SQUARES.get(cell) {
        Some(&sq) if sq != 0 => Some(sq),
        _ => None,
    }
}

/// 标准编号 -> 内部格
pub fn square_to_cell(square: u8) -> Option<usize> {
    if !(1..=32).contains(&square) {
        return None;
    }
    PLAYABLE_CELLS
        .iter()
        .copied()
        .find(|&cell| CELL_SQUARES[cell] == square)
}

// ============================================================================
// 外部棋盘
// ============================================================================

/// 外部 8×8 棋盘，按 [列][行] 存储
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBoard {
    cells: [[Square; 8]; 8],
}

impl GridBoard {
    pub fn empty() -> Self {
        GridBoard {
            cells: [[Square::FREE; 8]; 8],
        }
    }

    /// 标准开局：黑方占 0-2 行，白方占 5-7 行
    pub fn initial() -> Self {
        let mut grid = GridBoard::empty();
        for row in 0..8 {
            for col in 0..8 {
                if !GridBoard::is_playable(col, row) {
                    continue;
                }
                if row < 3 {
                    grid.set(col, row, Square::piece(Color::Black, Rank::Man));
                } else if row > 4 {
                    grid.set(col, row, Square::piece(Color::White, Rank::Man));
                }
            }
        }
        grid
    }

    /// 从原始字节解析，无法识别的值视为空格
    pub fn from_raw(raw: [[u8; 8]; 8]) -> Self {
        let mut grid = GridBoard::empty();
        for (col, column) in raw.iter().enumerate() {
            for (row, &value) in column.iter().enumerate() {
                grid.cells[col][row] = Square::from_raw(value);
            }
        }
        grid
    }

    pub fn to_raw(&self) -> [[u8; 8]; 8] {
        let mut raw = [[0u8; 8]; 8];
        for col in 0..8 {
            for row in 0..8 {
                raw[col][row] = self.cells[col][row].raw();
            }
        }
        raw
    }

    #[inline]
    pub fn is_playable(col: usize, row: usize) -> bool {
        col < 8 && row < 8 && (col + row) % 2 == 1
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> Square {
        self.cells[col][row]
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, square: Square) {
        self.cells[col][row] = square;
    }

    /// 是否还有某方的棋子
    pub fn has_pieces(&self, color: Color) -> bool {
        self.cells
            .iter()
            .flatten()
            .any(|square| square.has_color(color))
    }
}

impl Default for GridBoard {
    fn default() -> Self {
        GridBoard::initial()
    }
}

// ============================================================================
// 内部棋盘
// ============================================================================

/// 内部棋盘
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [Square; BOARD_CELLS],
}

impl Board {
    /// 空棋盘：真实格为空，其余为哨兵
    pub fn empty() -> Self {
        let mut cells = [Square::OCCUPIED; BOARD_CELLS];
        for &cell in PLAYABLE_CELLS.iter() {
            cells[cell] = Square::FREE;
        }
        Board { cells }
    }

    pub fn initial() -> Self {
        Board::from_grid(&GridBoard::initial())
    }

    /// 从外部棋盘导入
    pub fn from_grid(grid: &GridBoard) -> Self {
        let mut board = Board::empty();
        for &cell in PLAYABLE_CELLS.iter() {
            if let Some((col, row)) = cell_coords(cell) {
                board.cells[cell] = Square::from_raw(grid.get(col, row).raw());
            }
        }
        board
    }

    /// 导出到外部棋盘（只写真实格）
    pub fn write_grid(&self, grid: &mut GridBoard) {
        for &cell in PLAYABLE_CELLS.iter() {
            if let Some((col, row)) = cell_coords(cell) {
                grid.set(col, row, self.cells[cell]);
            }
        }
    }

    pub fn to_grid(&self) -> GridBoard {
        let mut grid = GridBoard::empty();
        self.write_grid(&mut grid);
        grid
    }

    /// 从 FEN 字符串创建棋盘（忽略走子方）
    pub fn from_fen(fen: &str) -> Result<Board, String> {
        Ok(parse_fen(fen)?.board())
    }

    pub fn to_fen(&self, turn: Color) -> String {
        board_to_fen(self, turn)
    }

    #[inline]
    pub fn get(&self, cell: usize) -> Square {
        self.cells[cell]
    }

    /// 设置真实格的状态
    pub fn set(&mut self, cell: usize, square: Square) {
        debug_assert!(is_playable(cell), "cell {} is a sentinel", cell);
        self.cells[cell] = square;
    }

    /// 临时修改（走法生成用），调用方负责恢复
    #[inline]
    pub(crate) fn replace(&mut self, cell: usize, square: Square) -> Square {
        std::mem::replace(&mut self.cells[cell], square)
    }

    /// 执行走法：按顺序写入每条 leg 的 after
    pub fn apply(&mut self, mv: &Move) {
        for leg in mv.legs() {
            self.cells[leg.cell as usize] = leg.after;
        }
    }

    /// 撤销走法：倒序写回每条 leg 的 before
    ///
    /// 王连跳回到起点时起点和终点是同一格，必须倒序才能恢复原状。
    pub fn undo(&mut self, mv: &Move) {
        for leg in mv.legs().iter().rev() {
            self.cells[leg.cell as usize] = leg.before;
        }
    }

    /// 某方的全部棋子 (格, 状态)
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (usize, Square)> + '_ {
        PLAYABLE_CELLS
            .iter()
            .map(move |&cell| (cell, self.cells[cell]))
            .filter(move |(_, square)| square.has_color(color))
    }

    pub fn count(&self, color: Color, rank: Rank) -> usize {
        let target = Square::piece(color, rank);
        PLAYABLE_CELLS
            .iter()
            .filter(|&&cell| self.cells[cell] == target)
            .count()
    }

    pub fn has_pieces(&self, color: Color) -> bool {
        self.pieces(color).next().is_some()
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..8).rev() {
            write!(f, "{} ", row)?;
            for col in 0..8 {
                let ch = match coords_cell(col, row) {
                    None => ' ',
                    Some(cell) => {
                        let square = self.cells[cell];
                        match (square.color(), square.rank()) {
                            (Some(Color::Black), Some(Rank::Man)) => 'b',
                            (Some(Color::Black), Some(Rank::King)) => 'B',
                            (Some(Color::White), Some(Rank::Man)) => 'w',
                            (Some(Color::White), Some(Rank::King)) => 'W',
                            _ => '.',
                        }
                    }
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "  01234567")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Board")?;
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_layout() {
        for cell in [0, 1, 2, 3, 4, 9, 18, 27, 36, 41, 42, 43, 44, 45] {
            assert!(!is_playable(cell), "cell {} should be a sentinel", cell);
            assert_eq!(Board::empty().get(cell), Square::OCCUPIED);
        }
        assert_eq!(PLAYABLE_CELLS.iter().filter(|&&c| is_playable(c)).count(), 32);
    }

    #[test]
    fn test_neighbor_offsets_are_diagonals() {
        // 每个真实格的 ±4/±5 要么是哨兵，要么是外部棋盘上斜向相邻的格
        for &cell in PLAYABLE_CELLS.iter() {
            let (col, row) = cell_coords(cell).unwrap();
            for offset in [4isize, 5, -4, -5] {
                let next = (cell as isize + offset) as usize;
                match cell_coords(next) {
                    Some((c2, r2)) => {
                        assert_eq!((r2 as isize - row as isize).abs(), 1);
                        assert_eq!((c2 as isize - col as isize).abs(), 1);
                        // 正偏移总是朝白方（行号增加）
                        assert_eq!(r2 > row, offset > 0);
                    }
                    None => {
                        let off_board = (offset > 0 && row == 7)
                            || (offset < 0 && row == 0)
                            || col == 0
                            || col == 7;
                        assert!(
                            off_board,
                            "cell {} offset {} hit a sentinel mid-board",
                            cell,
                            offset
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_coords_parity() {
        for &cell in PLAYABLE_CELLS.iter() {
            let (col, row) = cell_coords(cell).unwrap();
            assert!(GridBoard::is_playable(col, row));
            assert_eq!(coords_cell(col, row), Some(cell));
            assert_eq!(cell_row(cell), Some(row));
        }
        assert_eq!(coords_cell(0, 0), None);
    }

    #[test]
    fn test_square_numbering() {
        assert_eq!(square_to_cell(1), Some(8));
        assert_eq!(square_to_cell(4), Some(5));
        assert_eq!(square_to_cell(5), Some(13));
        assert_eq!(square_to_cell(32), Some(37));
        assert_eq!(square_to_cell(0), None);
        assert_eq!(square_to_cell(33), None);
        for sq in 1..=32u8 {
            let cell = square_to_cell(sq).unwrap();
            assert_eq!(cell_to_square(cell), Some(sq));
        }
    }

    #[test]
    fn test_initial_board() {
        let board = Board::initial();
        assert_eq!(board.count(Color::Black, Rank::Man), 12);
        assert_eq!(board.count(Color::White, Rank::Man), 12);
        for cell in 5..=17 {
            if is_playable(cell) {
                assert_eq!(board.get(cell), Square::piece(Color::Black, Rank::Man));
            }
        }
        for cell in 19..=26 {
            if is_playable(cell) {
                assert_eq!(board.get(cell), Square::FREE);
            }
        }
    }

    #[test]
    fn test_grid_roundtrip() {
        let mut grid = GridBoard::initial();
        grid.set(1, 0, Square::piece(Color::White, Rank::King));
        let board = Board::from_grid(&grid);
        assert_eq!(board.to_grid(), grid);
    }

    #[test]
    fn test_import_ignores_unknown_values() {
        let mut raw = [[0u8; 8]; 8];
        raw[1][0] = 0xFF;
        raw[3][0] = crate::types::BLACK | crate::types::MAN;
        let grid = GridBoard::from_raw(raw);
        let board = Board::from_grid(&grid);
        assert_eq!(board.get(coords_cell(1, 0).unwrap()), Square::FREE);
        assert_eq!(
            board.get(coords_cell(3, 0).unwrap()),
            Square::piece(Color::Black, Rank::Man)
        );
        assert_eq!(board.pieces(Color::Black).count(), 1);
    }

    #[test]
    fn test_export_leaves_unplayable_squares() {
        let mut grid = GridBoard::empty();
        grid.set(0, 0, Square::OCCUPIED);
        Board::initial().write_grid(&mut grid);
        assert_eq!(grid.get(0, 0), Square::OCCUPIED);
        assert!(grid.has_pieces(Color::White));
    }
}
