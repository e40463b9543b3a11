//! 走法生成
//!
//! 普通走法和吃子走法分开生成。有吃子时必须吃子（强制吃子规则），
//! 吃子会一直连跳到无子可吃为止，每条不同的最长路线是一个独立的走法。

use crate::board::{cell_row, Board, PLAYABLE_CELLS};
use crate::fen::parse_fen;
use crate::types::{Color, GameResult, Move, Rank, Square};

/// 黑兵向前（朝白方）
const BLACK_FORWARD: [isize; 2] = [4, 5];
/// 白兵向前（朝黑方）
const WHITE_FORWARD: [isize; 2] = [-4, -5];
/// 王的四个方向
const KING_DIRECTIONS: [isize; 4] = [4, 5, -4, -5];

/// 某方某兵种可走的方向
#[inline]
fn directions(color: Color, rank: Rank) -> &'static [isize] {
    match (rank, color) {
        (Rank::King, _) => &KING_DIRECTIONS,
        (Rank::Man, Color::Black) => &BLACK_FORWARD,
        (Rank::Man, Color::White) => &WHITE_FORWARD,
    }
}

#[inline]
fn step(cell: usize, dir: isize) -> usize {
    (cell as isize + dir) as usize
}

/// 落到 cell 后的状态：兵到达对方底线即升变
#[inline]
fn landed_state(piece: Square, color: Color, cell: usize) -> Square {
    if piece.is_man() && cell_row(cell) == Some(color.promotion_row()) {
        piece.promoted()
    } else {
        piece
    }
}

impl Board {
    /// 生成所有普通（不吃子）走法
    pub fn generate_quiet_moves(&self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();

        for &cell in PLAYABLE_CELLS.iter() {
            let piece = self.get(cell);
            if !piece.has_color(color) {
                continue;
            }
            let rank = match piece.rank() {
                Some(rank) => rank,
                None => continue,
            };

            for &dir in directions(color, rank) {
                let to = step(cell, dir);
                if self.get(to).is_free() {
                    moves.push(Move::quiet(cell, to, piece, landed_state(piece, color, to)));
                }
            }
        }

        moves
    }

    /// 某格上的 color 方 rank 棋子能否在此处起跳
    pub fn can_capture_from(&self, cell: usize, color: Color, rank: Rank) -> bool {
        let enemy = color.opposite();
        directions(color, rank).iter().any(|&dir| {
            let over = step(cell, dir);
            // 短路求值：只有 over 是对方棋子（真实格）时才会读取 over + dir
            self.get(over).has_color(enemy) && self.get(step(over, dir)).is_free()
        })
    }

    /// 是否存在吃子（不枚举完整走法）
    pub fn has_capture(&self, color: Color) -> bool {
        PLAYABLE_CELLS.iter().any(|&cell| {
            let piece = self.get(cell);
            piece.has_color(color)
                && piece
                    .rank()
                    .is_some_and(|rank| self.can_capture_from(cell, color, rank))
        })
    }

    /// 生成所有最长吃子路线
    ///
    /// 生成过程中会临时修改棋盘（清空起点、移除被吃子），
    /// 返回前所有修改都已恢复。
    pub fn generate_captures(&mut self, color: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        let enemy = color.opposite();

        for &cell in PLAYABLE_CELLS.iter() {
            let piece = self.get(cell);
            if !piece.has_color(color) {
                continue;
            }
            let rank = match piece.rank() {
                Some(rank) => rank,
                None => continue,
            };

            for &dir in directions(color, rank) {
                let over = step(cell, dir);
                if !self.get(over).has_color(enemy) {
                    continue;
                }
                let to = step(over, dir);
                if !self.get(to).is_free() {
                    continue;
                }

                let victim = self.get(over);
                let landed = landed_state(piece, color, to);
                let mv = Move::capture(cell, over, to, piece, victim, landed);

                self.replace(cell, Square::FREE);
                self.replace(over, Square::FREE);
                self.continue_capture(color, rank, piece, to, mv, &mut moves);
                self.replace(over, victim);
                self.replace(cell, piece);
            }
        }

        moves
    }

    /// 从 at 继续连跳；没有后续时 mv 就是一条最长路线
    ///
    /// 兵种固定为起跳时的兵种：中途升变的兵不会在同一步里获得王的方向。
    fn continue_capture(
        &mut self,
        color: Color,
        rank: Rank,
        piece: Square,
        at: usize,
        mv: Move,
        moves: &mut Vec<Move>,
    ) {
        let enemy = color.opposite();
        let mut found = false;

        for &dir in directions(color, rank) {
            let over = step(at, dir);
            if !self.get(over).has_color(enemy) {
                continue;
            }
            let to = step(over, dir);
            if !self.get(to).is_free() {
                continue;
            }

            found = true;
            let victim = self.get(over);
            let mut next = mv;
            next.extend(over, victim, to, landed_state(piece, color, to));

            self.replace(over, Square::FREE);
            self.continue_capture(color, rank, piece, to, next, moves);
            self.replace(over, victim);
        }

        if !found {
            moves.push(mv);
        }
    }

    /// 合法走法：有吃子时只返回吃子走法
    pub fn legal_moves(&mut self, color: Color) -> Vec<Move> {
        if self.has_capture(color) {
            self.generate_captures(color)
        } else {
            self.generate_quiet_moves(color)
        }
    }

    /// 合法走法（字符串格式）
    pub fn legal_moves_str(&mut self, color: Color) -> Vec<String> {
        self.legal_moves(color)
            .iter()
            .map(|m| m.to_string())
            .collect()
    }

    /// 轮到 turn 走时的胜负：没有棋子或无子可动即判负
    pub fn game_result(&mut self, turn: Color) -> GameResult {
        if self.has_pieces(turn) && !self.legal_moves(turn).is_empty() {
            return GameResult::Ongoing;
        }
        match turn {
            Color::Black => GameResult::WhiteWin,
            Color::White => GameResult::BlackWin,
        }
    }
}

/// 从 FEN 获取走子方的合法走法
pub fn legal_moves_from_fen(fen: &str) -> Result<Vec<String>, String> {
    let state = parse_fen(fen)?;
    let mut board = state.board();
    Ok(board.legal_moves_str(state.turn))
}
