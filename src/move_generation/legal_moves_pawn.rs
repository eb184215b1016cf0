use crate::game_state::{board::Board, chess_types::*};
use crate::moves::attack_tables::{pawn_attacks, squares_of};
use crate::moves::chess_move::{Move, FLAG_CAPTURE, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT};

/// Pseudo-legal pawn moves for the side to move, limited to pawns in `from_mask`.
pub fn generate_pawn_moves(board: &Board, from_mask: u64, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let enemy = side.opposite();
    let empty = !board.occupancy_all();
    let enemy_occ = board.occupancy(enemy);

    for from in squares_of(board.bitboard(side, PieceKind::Pawn) & from_mask) {
        let Some(one_step) = forward(side, from) else {
            continue;
        };

        if empty & (1u64 << one_step) != 0 {
            push_with_promotions(side, from, one_step, None, 0, out);

            if square_rank(from) == side.pawn_start_rank() {
                if let Some(two_step) = forward(side, one_step) {
                    if empty & (1u64 << two_step) != 0 {
                        out.push(Move::new(
                            from,
                            two_step,
                            PieceKind::Pawn,
                            None,
                            None,
                            FLAG_DOUBLE_PAWN_PUSH,
                        ));
                    }
                }
            }
        }

        for to in squares_of(pawn_attacks(side, from)) {
            if enemy_occ & (1u64 << to) != 0 {
                let captured = board.piece_at(to).map(|piece| piece.kind);
                push_with_promotions(side, from, to, captured, FLAG_CAPTURE, out);
            } else if board.en_passant_square() == Some(to) {
                out.push(Move::new(
                    from,
                    to,
                    PieceKind::Pawn,
                    Some(PieceKind::Pawn),
                    None,
                    FLAG_CAPTURE | FLAG_EN_PASSANT,
                ));
            }
        }
    }
}

fn push_with_promotions(
    side: Side,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    flags: u64,
    out: &mut Vec<Move>,
) {
    if square_rank(to) == side.promotion_rank() {
        for promotion in PieceKind::PROMOTIONS {
            out.push(Move::new(from, to, PieceKind::Pawn, captured, Some(promotion), flags));
        }
    } else {
        out.push(Move::new(from, to, PieceKind::Pawn, captured, None, flags));
    }
}

#[inline]
fn forward(side: Side, square: Square) -> Option<Square> {
    match side {
        Side::White => square.checked_add(8).filter(|sq| *sq < 64),
        Side::Black => square.checked_sub(8),
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::board::Board;

    fn lans(fen: &str) -> Vec<String> {
        let board = Board::from_fen(fen).expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&board, u64::MAX, &mut out);
        let mut lans: Vec<String> = out.iter().map(|mv| mv.to_long_algebraic()).collect();
        lans.sort();
        lans
    }

    #[test]
    fn single_and_double_pushes_from_start() {
        let moves = lans("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert_eq!(moves, vec!["e2e3", "e2e4"]);
    }

    #[test]
    fn blocked_pawn_has_no_push() {
        let moves = lans("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(moves.is_empty());
    }

    #[test]
    fn promotions_expand_to_four_kinds() {
        let moves = lans("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(
            moves,
            vec!["a7a8b", "a7a8n", "a7a8q", "a7a8r", "a7b8b", "a7b8n", "a7b8q", "a7b8r"]
        );
    }

    #[test]
    fn en_passant_capture_is_generated() {
        let moves = lans("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        assert!(moves.contains(&"e5d6".to_owned()));
    }
}
