//! King steps and castling.

use crate::game_state::{board::Board, chess_types::*};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_moves_pieces::push_targets;
use crate::moves::attack_tables::king_attacks;
use crate::moves::chess_move::{Move, FLAG_CASTLING};

struct CastlePath {
    right: CastlingRights,
    king_from: Square,
    king_to: Square,
    must_be_empty: &'static [Square],
    must_be_safe: &'static [Square],
}

const CASTLE_PATHS: [CastlePath; 4] = [
    CastlePath {
        right: CASTLE_WHITE_KINGSIDE,
        king_from: 4,
        king_to: 6,
        must_be_empty: &[5, 6],
        must_be_safe: &[5, 6],
    },
    CastlePath {
        right: CASTLE_WHITE_QUEENSIDE,
        king_from: 4,
        king_to: 2,
        must_be_empty: &[1, 2, 3],
        must_be_safe: &[3, 2],
    },
    CastlePath {
        right: CASTLE_BLACK_KINGSIDE,
        king_from: 60,
        king_to: 62,
        must_be_empty: &[61, 62],
        must_be_safe: &[61, 62],
    },
    CastlePath {
        right: CASTLE_BLACK_QUEENSIDE,
        king_from: 60,
        king_to: 58,
        must_be_empty: &[57, 58, 59],
        must_be_safe: &[59, 58],
    },
];

pub fn generate_king_moves(board: &Board, from_mask: u64, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let Some(from) = board.king_square(side) else {
        return;
    };
    if from_mask & (1u64 << from) == 0 {
        return;
    }

    push_targets(board, from, PieceKind::King, king_attacks(from), out);
    generate_castling_moves(board, from, out);
}

fn generate_castling_moves(board: &Board, king_from: Square, out: &mut Vec<Move>) {
    let side = board.side_to_move();
    let enemy = side.opposite();

    // Cannot castle out of check.
    if is_square_attacked(board, king_from, enemy) {
        return;
    }

    for path in &CASTLE_PATHS {
        if path.king_from != king_from || board.castling_rights() & path.right == 0 {
            continue;
        }
        // Rights can outlive the rook in hand-written FEN.
        let rook_square = if path.king_to > path.king_from {
            path.king_from + 3
        } else {
            path.king_from - 4
        };
        if board.bitboard(side, PieceKind::Rook) & (1u64 << rook_square) == 0 {
            continue;
        }
        let path_clear = path
            .must_be_empty
            .iter()
            .all(|sq| board.occupancy_all() & (1u64 << sq) == 0);
        let path_safe = path
            .must_be_safe
            .iter()
            .all(|sq| !is_square_attacked(board, *sq, enemy));
        if path_clear && path_safe {
            out.push(Move::new(
                king_from,
                path.king_to,
                PieceKind::King,
                None,
                None,
                FLAG_CASTLING,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::board::Board;

    fn castles(fen: &str) -> Vec<String> {
        let board = Board::from_fen(fen).expect("FEN should parse");
        let mut out = Vec::new();
        generate_king_moves(&board, u64::MAX, &mut out);
        let mut lans: Vec<String> = out
            .iter()
            .filter(|mv| mv.is_castling())
            .map(|mv| mv.to_long_algebraic())
            .collect();
        lans.sort();
        lans
    }

    #[test]
    fn both_castles_available_on_open_back_rank() {
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1"), vec!["e1c1", "e1g1"]);
        assert_eq!(castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1"), vec!["e8c8", "e8g8"]);
    }

    #[test]
    fn cannot_castle_through_attacked_square() {
        // Black rook on f8 covers f1.
        assert_eq!(castles("1k3r2/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1c1"]);
    }

    #[test]
    fn queenside_b_file_may_be_attacked() {
        // b1 attacked, but the king never crosses it.
        assert_eq!(castles("1r6/8/8/8/8/8/8/R3K2k w Q - 0 1"), vec!["e1c1"]);
    }

    #[test]
    fn cannot_castle_out_of_check_or_without_rights() {
        assert!(castles("1k2r3/8/8/8/8/8/8/R3K2R w KQ - 0 1").is_empty());
        assert!(castles("4k3/8/8/8/8/8/8/R3K2R w - - 0 1").is_empty());
    }
}
