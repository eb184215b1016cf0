//! Knight, bishop, rook and queen move generation.
//!
//! These pieces have no special rules, so each one turns its attack mask
//! (minus own pieces) straight into quiet moves and captures.

use crate::game_state::{board::Board, chess_types::*};
use crate::moves::attack_tables::{
    bishop_attacks, knight_attacks, queen_attacks, rook_attacks, squares_of,
};
use crate::moves::chess_move::{Move, FLAG_CAPTURE};

pub fn generate_piece_moves(board: &Board, from_mask: u64, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let occupancy = board.occupancy_all();

    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        for from in squares_of(board.bitboard(side, kind) & from_mask) {
            let attacks = match kind {
                PieceKind::Knight => knight_attacks(from),
                PieceKind::Bishop => bishop_attacks(from, occupancy),
                PieceKind::Rook => rook_attacks(from, occupancy),
                _ => queen_attacks(from, occupancy),
            };
            push_targets(board, from, kind, attacks, out);
        }
    }
}

/// Emit a move from `from` to every square of `attacks` not held by the mover.
pub(crate) fn push_targets(
    board: &Board,
    from: Square,
    kind: PieceKind,
    attacks: u64,
    out: &mut Vec<Move>,
) {
    let side = board.side_to_move();
    let enemy_occ = board.occupancy(side.opposite());

    for to in squares_of(attacks & !board.occupancy(side)) {
        if enemy_occ & (1u64 << to) != 0 {
            let captured = board.piece_at(to).map(|piece| piece.kind);
            out.push(Move::new(from, to, kind, captured, None, FLAG_CAPTURE));
        } else {
            out.push(Move::new(from, to, kind, None, None, 0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_piece_moves;
    use crate::game_state::board::Board;

    #[test]
    fn only_knights_move_from_start() {
        let mut out = Vec::new();
        generate_piece_moves(&Board::initial(), u64::MAX, &mut out);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|mv| !mv.is_capture()));
    }

    #[test]
    fn sliders_capture_first_enemy_on_ray() {
        let board = Board::from_fen("4k3/8/8/8/3p4/8/8/3RK3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        generate_piece_moves(&board, u64::MAX, &mut out);
        let captures: Vec<String> = out
            .iter()
            .filter(|mv| mv.is_capture())
            .map(|mv| mv.to_long_algebraic())
            .collect();
        assert_eq!(captures, vec!["d1d4"]);
        // d2, d3, d4 up the file plus a1, b1, c1 along the rank.
        assert_eq!(out.len(), 6);
    }
}
