//! Draw conditions that can be read off a single board.

use crate::game_state::chess_rules::FIFTY_MOVE_HALFMOVE_LIMIT;
use crate::game_state::{board::Board, chess_types::*};
use crate::moves::attack_tables::squares_of;

const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

/// Neither side can possibly deliver mate.
///
/// Covers bare kings, a single minor piece against a bare king, and any
/// number of bishops (on either side) that all stand on one square colour.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut heavy_or_pawn = 0u64;
    let mut knights = 0u64;
    let mut bishops = 0u64;

    for side in Side::BOTH {
        heavy_or_pawn |= board.bitboard(side, PieceKind::Pawn)
            | board.bitboard(side, PieceKind::Rook)
            | board.bitboard(side, PieceKind::Queen);
        knights |= board.bitboard(side, PieceKind::Knight);
        bishops |= board.bitboard(side, PieceKind::Bishop);
    }

    if heavy_or_pawn != 0 {
        return false;
    }

    let minors = knights.count_ones() + bishops.count_ones();
    if minors <= 1 {
        return true;
    }
    if knights != 0 {
        return false;
    }

    let light = squares_of(bishops).all(|sq| LIGHT_SQUARES & (1u64 << sq) != 0);
    let dark = squares_of(bishops).all(|sq| LIGHT_SQUARES & (1u64 << sq) == 0);
    light || dark
}

/// One hundred halfmoves without a capture or pawn move.
#[inline]
pub fn is_fifty_move_draw(board: &Board) -> bool {
    board.halfmove_clock() >= FIFTY_MOVE_HALFMOVE_LIMIT
}
