//! Conversions between square indices and coordinates such as `e4`.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::{square_at, Square};

/// Parse a coordinate (for example "e4") into a square index.
pub fn parse_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessErrors::InvalidSquare(square.to_owned()));
    }

    let (file, rank) = (bytes[0], bytes[1]);
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessErrors::InvalidSquare(square.to_owned()));
    }

    Ok(square_at(file - b'a', rank - b'1'))
}

/// Coordinate name of a square index. Off-board indices keep their number
/// (`#64`) so they can never be mistaken for a real square.
pub fn square_name(square: Square) -> String {
    if square > 63 {
        return format!("#{square}");
    }
    format!("{}{}", file_char(square % 8), rank_char(square / 8))
}

#[inline]
pub fn file_char(file: u8) -> char {
    char::from(b'a' + (file & 7))
}

#[inline]
pub fn rank_char(rank: u8) -> char {
    char::from(b'1' + (rank & 7))
}
