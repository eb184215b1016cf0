//! Full legal move generation pipeline.
//!
//! Collects pseudo-legal moves piece by piece, plays each candidate on a copy
//! of the board, and drops those that leave the mover's own king attacked.

use crate::game_state::board::Board;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_pieces::generate_piece_moves;
use crate::moves::chess_move::Move;

/// Every pseudo-legal move of the side to move whose source is in `from_mask`.
pub fn generate_pseudo_legal_moves(board: &Board, from_mask: u64) -> Vec<Move> {
    let mut pseudo = Vec::<Move>::with_capacity(64);
    generate_pawn_moves(board, from_mask, &mut pseudo);
    generate_piece_moves(board, from_mask, &mut pseudo);
    generate_king_moves(board, from_mask, &mut pseudo);
    pseudo
}

/// Legal moves of the side to move whose source is in `from_mask`, each paired
/// with the board it produces.
pub fn generate_legal_moves_with_boards(board: &Board, from_mask: u64) -> Vec<(Move, Board)> {
    let mover = board.side_to_move();
    generate_pseudo_legal_moves(board, from_mask)
        .into_iter()
        .filter_map(|mv| {
            let next = apply_move(board, mv).ok()?;
            (!is_king_in_check(&next, mover)).then_some((mv, next))
        })
        .collect()
}

pub fn generate_legal_moves(board: &Board, from_mask: u64) -> Vec<Move> {
    generate_legal_moves_with_boards(board, from_mask)
        .into_iter()
        .map(|(mv, _)| mv)
        .collect()
}

/// Cheaper than generating the full list when only existence matters.
pub fn has_any_legal_move(board: &Board) -> bool {
    let mover = board.side_to_move();
    generate_pseudo_legal_moves(board, u64::MAX)
        .into_iter()
        .any(|mv| apply_move(board, mv).is_ok_and(|next| !is_king_in_check(&next, mover)))
}
