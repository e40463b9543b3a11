//! FEN 解析和生成
//!
//! 跳棋 PDN FEN 格式
//!
//! 格式: `<回合>:<颜色><棋子列表>:<颜色><棋子列表>`
//!
//! - 回合：`B` 黑方 / `W` 白方
//! - 棋子列表：逗号分隔的标准编号 (1-32)，`K` 前缀表示王，支持 `a-b` 区间
//! - 结尾的 `.` 会被忽略
//!
//! 例：`B:W21,22,23,24,25,26,27,28,29,30,31,32:B1,2,3,4,5,6,7,8,9,10,11,12`

use crate::board::{cell_to_square, square_to_cell, Board, PLAYABLE_CELLS};
use crate::types::{Color, Rank, Square};

/// FEN 中的棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenPiece {
    /// 标准编号 1..32
    pub square: u8,
    pub color: Color,
    pub rank: Rank,
}

/// FEN 解析后的状态
#[derive(Debug, Clone)]
pub struct FenState {
    pub pieces: Vec<FenPiece>,
    pub turn: Color,
}

impl FenState {
    /// 构建内部棋盘
    pub fn board(&self) -> Board {
        let mut board = Board::empty();
        for piece in &self.pieces {
            if let Some(cell) = square_to_cell(piece.square) {
                board.set(cell, Square::piece(piece.color, piece.rank));
            }
        }
        board
    }
}

/// 解析 FEN 字符串
pub fn parse_fen(fen: &str) -> Result<FenState, String> {
    let fen = fen.trim().trim_end_matches('.');
    let parts: Vec<&str> = fen.split(':').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Invalid FEN format: expected '<turn>:<color><squares>:<color><squares>', got: {}",
            fen
        ));
    }

    let turn_str = parts[0].trim();
    let mut turn_chars = turn_str.chars();
    let turn = match (turn_chars.next(), turn_chars.next()) {
        (Some(c), None) => {
            Color::from_fen_char(c).ok_or_else(|| format!("Invalid turn: {}", turn_str))?
        }
        _ => return Err(format!("Invalid turn: {}", turn_str)),
    };

    let mut pieces = Vec::new();
    for section in &parts[1..] {
        parse_section(section.trim(), &mut pieces)?;
    }

    Ok(FenState { pieces, turn })
}

/// 解析一方的棋子列表
fn parse_section(section: &str, pieces: &mut Vec<FenPiece>) -> Result<(), String> {
    let mut chars = section.chars();
    let color = chars
        .next()
        .and_then(Color::from_fen_char)
        .ok_or_else(|| format!("Invalid color tag in section: {}", section))?;
    let list = chars.as_str();

    for token in list.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (rank, body) = match token.strip_prefix('K') {
            Some(rest) => (Rank::King, rest),
            None => (Rank::Man, token),
        };

        let squares = match body.split_once('-') {
            Some((from, to)) => {
                let from = parse_square(from)?;
                let to = parse_square(to)?;
                if from > to {
                    return Err(format!("Invalid square range: {}", token));
                }
                (from..=to).collect::<Vec<u8>>()
            }
            None => vec![parse_square(body)?],
        };

        for square in squares {
            if pieces.iter().any(|p| p.square == square) {
                return Err(format!("Duplicate square: {}", square));
            }
            pieces.push(FenPiece {
                square,
                color,
                rank,
            });
        }
    }

    Ok(())
}

fn parse_square(s: &str) -> Result<u8, String> {
    let square: u8 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid square: {}", s))?;
    if !(1..=32).contains(&square) {
        return Err(format!("Square out of range (1-32): {}", square));
    }
    Ok(square)
}

/// 生成某方的棋子列表
fn section_for(board: &Board, color: Color) -> String {
    let mut squares: Vec<(u8, Square)> = PLAYABLE_CELLS
        .iter()
        .filter(|&&cell| board.get(cell).has_color(color))
        .filter_map(|&cell| cell_to_square(cell).map(|sq| (sq, board.get(cell))))
        .collect();
    squares.sort_by_key(|(sq, _)| *sq);

    let list: Vec<String> = squares
        .into_iter()
        .map(|(sq, square)| {
            if square.is_king() {
                format!("K{}", sq)
            } else {
                sq.to_string()
            }
        })
        .collect();

    format!("{}{}", color.to_fen_char(), list.join(","))
}

/// 棋盘转换为 FEN 字符串
pub fn board_to_fen(board: &Board, turn: Color) -> String {
    format!(
        "{}:{}:{}",
        turn.to_fen_char(),
        section_for(board, Color::White),
        section_for(board, Color::Black)
    )
}

/// 在 FEN 上执行标准记谱的走法，返回新 FEN
///
/// 走法需要是当前局面下的合法走法（`11-15`、`15x24`）。
pub fn apply_move_to_fen(fen: &str, notation: &str) -> Result<String, String> {
    let state = parse_fen(fen)?;
    let mut board = state.board();
    let moves = board.legal_moves(state.turn);
    let mv = moves
        .iter()
        .find(|m| m.to_string() == notation.trim())
        .ok_or_else(|| format!("Illegal move: {}", notation))?;
    board.apply(mv);
    Ok(board_to_fen(&board, state.turn.opposite()))
}
