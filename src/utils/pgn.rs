//! PGN read/write utilities for game history interchange.
//!
//! Movetext is written in SAN and wrapped at 80 columns. Reading accepts SAN
//! (and long algebraic as a fallback), skipping comments, variations, NAGs and
//! move numbers.

use std::collections::BTreeMap;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::Side;
use crate::game_state::game_status::GameResult;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::chess_move::Move;
use crate::utils::long_algebraic::parse_long_algebraic;
use crate::utils::san::{move_to_san, san_to_move};

const MOVETEXT_WIDTH: usize = 80;

#[derive(Debug, Clone)]
pub struct PgnGame {
    pub headers: BTreeMap<String, String>,
    pub initial_board: Board,
    pub moves: Vec<Move>,
    pub final_board: Board,
    pub result: String,
}

/// Render headers (in the given order) and the SAN movetext of `moves`
/// played from `initial`. The `Result` header, if any, terminates the
/// movetext.
pub fn write_pgn(headers: &[(String, String)], initial: &Board, moves: &[Move]) -> ChessResult<String> {
    let mut out = String::new();
    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    let mut board = initial.clone();
    let mut tokens = Vec::<String>::with_capacity(moves.len() * 3 / 2 + 1);
    for (ply, mv) in moves.iter().enumerate() {
        let san = move_to_san(&board, *mv)?;
        match board.side_to_move() {
            Side::White => tokens.push(format!("{}.", board.fullmove_number())),
            Side::Black if ply == 0 => tokens.push(format!("{}...", board.fullmove_number())),
            Side::Black => {}
        }
        tokens.push(san);
        board = board.apply(*mv)?;
    }

    let result = headers
        .iter()
        .find(|(key, _)| key == "Result")
        .map_or("*", |(_, value)| normalize_result(value));
    tokens.push(result.to_owned());

    out.push_str(&wrap_tokens(&tokens));
    out.push('\n');
    Ok(out)
}

pub fn read_pgn(pgn: &str) -> ChessResult<PgnGame> {
    let mut headers = BTreeMap::<String, String>::new();
    let mut movetext_lines = Vec::<&str>::new();

    for line in pgn.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        if trimmed.starts_with('[') {
            let (key, value) = parse_header_line(trimmed)?;
            headers.insert(key, value);
        } else {
            movetext_lines.push(trimmed);
        }
    }

    let initial_board = match (headers.get("SetUp").map(String::as_str), headers.get("FEN")) {
        (_, Some(fen)) => Board::from_fen(fen)?,
        (Some("1"), None) => {
            return Err(ChessErrors::InvalidPgn(
                "SetUp is 1 but the FEN header is missing".to_owned(),
            ))
        }
        _ => Board::initial(),
    };

    let mut board = initial_board.clone();
    let mut moves = Vec::<Move>::new();
    let mut result = "*".to_owned();

    let movetext = strip_pgn_comments_and_variations(&movetext_lines.join(" "));
    for raw in movetext.split_whitespace() {
        let token = strip_move_number(raw);
        if token.is_empty() || token.starts_with('$') {
            continue;
        }
        if is_result_token(token) {
            result = token.to_owned();
            break;
        }

        let mv = resolve_move(&board, token).ok_or_else(|| {
            ChessErrors::InvalidPgn(format!("illegal move {token} at ply {}", moves.len() + 1))
        })?;
        board = board.apply(mv)?;
        moves.push(mv);
    }

    if let Some(header_result) = headers.get("Result") {
        result = normalize_result(header_result).to_owned();
    }

    Ok(PgnGame {
        headers,
        initial_board,
        moves,
        final_board: board,
        result,
    })
}

fn resolve_move(board: &Board, token: &str) -> Option<Move> {
    if let Ok(mv) = san_to_move(board, token) {
        return Some(mv);
    }
    let parsed = parse_long_algebraic(token).ok()?;
    generate_legal_moves(board, 1u64 << parsed.from)
        .into_iter()
        .find(|mv| mv.to() == parsed.to && mv.promotion() == parsed.promotion)
}

fn parse_header_line(line: &str) -> ChessResult<(String, String)> {
    let invalid = || ChessErrors::InvalidPgn(format!("bad header line: {line}"));

    let inner = line
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(invalid)?;
    let (key, value_raw) = inner.trim().split_once(' ').ok_or_else(invalid)?;
    let value = value_raw
        .trim()
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(invalid)?;

    Ok((key.to_owned(), value.replace("\\\"", "\"").replace("\\\\", "\\")))
}

fn strip_pgn_comments_and_variations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_brace = false;
    let mut paren_depth = 0usize;

    for ch in text.chars() {
        match ch {
            '{' if !in_brace => in_brace = true,
            '}' if in_brace => {
                in_brace = false;
                out.push(' ');
            }
            '(' if !in_brace => paren_depth += 1,
            ')' if !in_brace => {
                paren_depth = paren_depth.saturating_sub(1);
                out.push(' ');
            }
            _ if !in_brace && paren_depth == 0 => out.push(ch),
            _ => {}
        }
    }

    out
}

/// `12.e4` -> `e4`, `12...` -> ``, `e4` -> `e4`.
fn strip_move_number(token: &str) -> &str {
    let digits = token.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return token;
    }
    let rest = &token[digits..];
    if rest.starts_with('.') {
        rest.trim_start_matches('.')
    } else {
        token
    }
}

fn is_result_token(token: &str) -> bool {
    token == "*" || GameResult::from_pgn(token).is_some()
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn wrap_tokens(tokens: &[String]) -> String {
    let mut out = String::new();
    let mut line_len = 0usize;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > MOVETEXT_WIDTH {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(token);
        line_len += token.len();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{read_pgn, strip_move_number, write_pgn};
    use crate::chess_errors::ChessErrors;
    use crate::game_state::board::Board;
    use crate::moves::chess_move::Move;
    use crate::utils::san::san_to_move;

    fn play(board: &Board, sans: &[&str]) -> (Vec<Move>, Board) {
        let mut board = board.clone();
        let mut moves = Vec::new();
        for san in sans {
            let mv = san_to_move(&board, san).expect("SAN should parse");
            board = board.apply(mv).expect("move should apply");
            moves.push(mv);
        }
        (moves, board)
    }

    fn headers(result: &str) -> Vec<(String, String)> {
        vec![
            ("Event".to_owned(), "Test \"quoted\"".to_owned()),
            ("Result".to_owned(), result.to_owned()),
        ]
    }

    #[test]
    fn round_trip_start_position_history() {
        let (moves, final_board) = play(&Board::initial(), &["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        let pgn = write_pgn(&headers("*"), &Board::initial(), &moves).expect("PGN should write");
        assert!(pgn.contains("1. e4 e5 2. Nf3 Nc6 3. Bb5 *"));

        let parsed = read_pgn(&pgn).expect("PGN should parse");
        assert_eq!(parsed.moves, moves);
        assert_eq!(parsed.final_board, final_board);
        assert_eq!(parsed.result, "*");
        assert_eq!(parsed.headers.get("Event").map(String::as_str), Some("Test \"quoted\""));
    }

    #[test]
    fn round_trip_custom_fen_with_black_to_move() {
        let initial = Board::from_fen("4k3/4p3/8/8/8/8/4P3/4K3 b - - 0 7").expect("FEN should parse");
        let (moves, _) = play(&initial, &["e5", "e4"]);
        let mut headers = headers("1-0");
        headers.push(("SetUp".to_owned(), "1".to_owned()));
        headers.push(("FEN".to_owned(), initial.to_fen()));

        let pgn = write_pgn(&headers, &initial, &moves).expect("PGN should write");
        assert!(pgn.contains("7... e5 8. e4 1-0"));

        let parsed = read_pgn(&pgn).expect("PGN should parse");
        assert_eq!(parsed.initial_board, initial);
        assert_eq!(parsed.moves, moves);
        assert_eq!(parsed.result, "1-0");
    }

    #[test]
    fn skips_comments_variations_and_annotations() {
        let pgn = "[Event \"x\"]\n\n1.e4 {best by test} e5 (1...c5 2.Nf3) 2. Nf3! $1 Nc6?! 3.Bb5 1/2-1/2\n";
        let parsed = read_pgn(pgn).expect("PGN should parse");
        assert_eq!(parsed.moves.len(), 5);
        assert_eq!(parsed.result, "1/2-1/2");
    }

    #[test]
    fn accepts_long_algebraic_movetext() {
        let parsed = read_pgn("1. e2e4 e7e5 2. g1f3 *").expect("PGN should parse");
        assert_eq!(parsed.moves.len(), 3);
    }

    #[test]
    fn rejects_illegal_moves_and_broken_headers() {
        assert_eq!(
            read_pgn("1. e4 e4 *").map(|g| g.moves.len()),
            Err(ChessErrors::InvalidPgn("illegal move e4 at ply 2".to_owned()))
        );
        assert!(matches!(read_pgn("[Event x]\n1. e4"), Err(ChessErrors::InvalidPgn(_))));
        assert!(matches!(
            read_pgn("[SetUp \"1\"]\n1. e4"),
            Err(ChessErrors::InvalidPgn(_))
        ));
    }

    #[test]
    fn move_number_prefixes() {
        assert_eq!(strip_move_number("12.e4"), "e4");
        assert_eq!(strip_move_number("12..."), "");
        assert_eq!(strip_move_number("O-O"), "O-O");
        assert_eq!(strip_move_number("1-0"), "1-0");
    }
}
