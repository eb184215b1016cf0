use crate::game_state::{board::Board, chess_types::*};
use crate::moves::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};

#[inline]
pub fn is_king_in_check(board: &Board, side: Side) -> bool {
    let Some(king_sq) = board.king_square(side) else {
        return false;
    };
    is_square_attacked(board, king_sq, side.opposite())
}

/// True if any piece of `attacker` attacks `square` on `board`.
pub fn is_square_attacked(board: &Board, square: Square, attacker: Side) -> bool {
    // A pawn of `attacker` hits `square` exactly when a defending pawn on
    // `square` would hit the attacker's pawn.
    if pawn_attacks(attacker.opposite(), square) & board.bitboard(attacker, PieceKind::Pawn) != 0 {
        return true;
    }

    if knight_attacks(square) & board.bitboard(attacker, PieceKind::Knight) != 0 {
        return true;
    }

    if king_attacks(square) & board.bitboard(attacker, PieceKind::King) != 0 {
        return true;
    }

    let queens = board.bitboard(attacker, PieceKind::Queen);
    let occupancy = board.occupancy_all();

    let diagonal = board.bitboard(attacker, PieceKind::Bishop) | queens;
    if bishop_attacks(square, occupancy) & diagonal != 0 {
        return true;
    }

    let orthogonal = board.bitboard(attacker, PieceKind::Rook) | queens;
    rook_attacks(square, occupancy) & orthogonal != 0
}
