//! Long algebraic coordinates such as `e2e4` or `e7e8q`.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::parse_square;

/// Move intent read from long algebraic text. No legality is implied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongAlgebraicMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

pub fn parse_long_algebraic(text: &str) -> ChessResult<LongAlgebraicMove> {
    let text = text.trim();
    let invalid = || ChessErrors::InvalidLongAlgebraic(text.to_owned());

    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(invalid());
    }

    let from = parse_square(&text[0..2]).map_err(|_| invalid())?;
    let to = parse_square(&text[2..4]).map_err(|_| invalid())?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch) => Some(
            PieceKind::from_letter(ch.to_ascii_uppercase())
                .filter(|kind| PieceKind::PROMOTIONS.contains(kind))
                .ok_or_else(invalid)?,
        ),
    };

    Ok(LongAlgebraicMove {
        from,
        to,
        promotion,
    })
}
