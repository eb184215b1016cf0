//! Packed move descriptions.
//!
//! A `Move` is a single `u64` carrying source, destination, the moving piece,
//! the captured piece, the promotion piece, and rule flags. Only move
//! generation builds them; callers receive them from the engine and hand them
//! back unchanged.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::square_name;

const FROM_SHIFT: u64 = 0;
const TO_SHIFT: u64 = 6;
const MOVED_PIECE_SHIFT: u64 = 12;
const CAPTURED_PIECE_SHIFT: u64 = 15;
const PROMOTION_PIECE_SHIFT: u64 = 18;

const SQUARE_MASK: u64 = 0x3F;
const PIECE_MASK: u64 = 0x7;
const NO_PIECE_CODE: u64 = 0x7;

pub const FLAG_CAPTURE: u64 = 1u64 << 21;
pub const FLAG_DOUBLE_PAWN_PUSH: u64 = 1u64 << 22;
pub const FLAG_EN_PASSANT: u64 = 1u64 << 23;
pub const FLAG_CASTLING: u64 = 1u64 << 24;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u64);

impl Move {
    pub(crate) fn new(
        from: Square,
        to: Square,
        moved_piece: PieceKind,
        captured_piece: Option<PieceKind>,
        promotion_piece: Option<PieceKind>,
        flags: u64,
    ) -> Self {
        let mut packed = 0u64;
        packed |= (from as u64) << FROM_SHIFT;
        packed |= (to as u64) << TO_SHIFT;
        packed |= piece_code(Some(moved_piece)) << MOVED_PIECE_SHIFT;
        packed |= piece_code(captured_piece) << CAPTURED_PIECE_SHIFT;
        packed |= piece_code(promotion_piece) << PROMOTION_PIECE_SHIFT;
        packed |= flags;
        Move(packed)
    }

    #[inline]
    pub fn from(self) -> Square {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub fn to(self) -> Square {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub fn moved_piece(self) -> PieceKind {
        // Moves are only built with a moved piece, so the code is always valid.
        piece_from_code((self.0 >> MOVED_PIECE_SHIFT) & PIECE_MASK).unwrap_or(PieceKind::Pawn)
    }

    #[inline]
    pub fn captured_piece(self) -> Option<PieceKind> {
        piece_from_code((self.0 >> CAPTURED_PIECE_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub fn promotion(self) -> Option<PieceKind> {
        piece_from_code((self.0 >> PROMOTION_PIECE_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub fn is_capture(self) -> bool {
        self.0 & FLAG_CAPTURE != 0
    }

    #[inline]
    pub fn is_en_passant(self) -> bool {
        self.0 & FLAG_EN_PASSANT != 0
    }

    #[inline]
    pub fn is_castling(self) -> bool {
        self.0 & FLAG_CASTLING != 0
    }

    #[inline]
    pub fn is_double_pawn_push(self) -> bool {
        self.0 & FLAG_DOUBLE_PAWN_PUSH != 0
    }

    /// Long algebraic form, e.g. `e2e4` or `e7e8q`.
    pub fn to_long_algebraic(self) -> String {
        let mut out = format!("{}{}", square_name(self.from()), square_name(self.to()));
        if let Some(promotion) = self.promotion() {
            out.push(promotion.letter().to_ascii_lowercase());
        }
        out
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Move")
            .field("lan", &self.to_long_algebraic())
            .field("piece", &self.moved_piece())
            .field("captured", &self.captured_piece())
            .field("castling", &self.is_castling())
            .field("en_passant", &self.is_en_passant())
            .finish()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_long_algebraic())
    }
}

#[inline]
fn piece_code(piece: Option<PieceKind>) -> u64 {
    piece.map_or(NO_PIECE_CODE, |kind| kind.index() as u64)
}

#[inline]
fn piece_from_code(code: u64) -> Option<PieceKind> {
    PieceKind::from_index(code as usize)
}

#[cfg(test)]
mod tests {
    use super::{Move, FLAG_CAPTURE};
    use crate::game_state::chess_types::PieceKind;

    #[test]
    fn packed_fields_read_back() {
        let mv = Move::new(
            52,
            61,
            PieceKind::Pawn,
            Some(PieceKind::Bishop),
            Some(PieceKind::Queen),
            FLAG_CAPTURE,
        );
        assert_eq!(mv.from(), 52);
        assert_eq!(mv.to(), 61);
        assert_eq!(mv.moved_piece(), PieceKind::Pawn);
        assert_eq!(mv.captured_piece(), Some(PieceKind::Bishop));
        assert_eq!(mv.promotion(), Some(PieceKind::Queen));
        assert!(mv.is_capture());
        assert!(!mv.is_castling());
        assert_eq!(mv.to_long_algebraic(), "e7f8q");
    }

    #[test]
    fn quiet_move_has_no_optional_pieces() {
        let mv = Move::new(6, 21, PieceKind::Knight, None, None, 0);
        assert_eq!(mv.captured_piece(), None);
        assert_eq!(mv.promotion(), None);
        assert_eq!(mv.to_string(), "g1f3");
    }
}
