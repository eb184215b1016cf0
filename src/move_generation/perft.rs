//! Perft: leaf-node counting used to verify move generation.

use crate::game_state::board::Board;
use crate::move_generation::legal_move_generator::generate_legal_moves_with_boards;

/// Number of leaf positions reachable in exactly `depth` plies.
pub fn perft(board: &Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves_with_boards(board, u64::MAX);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|(_, next)| perft(next, depth - 1))
        .sum()
}

/// Per-root-move node counts, sorted by long algebraic move, for comparing
/// against a reference engine when a total disagrees.
pub fn perft_divide(board: &Board, depth: u8) -> Vec<(String, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let mut out: Vec<(String, u64)> = generate_legal_moves_with_boards(board, u64::MAX)
        .iter()
        .map(|(mv, next)| (mv.to_long_algebraic(), perft(next, depth - 1)))
        .collect();
    out.sort();
    out
}

#[cfg(test)]
mod tests {
    use super::{perft, perft_divide};
    use crate::game_state::board::Board;

    fn assert_counts(fen: &str, expected: &[u64]) {
        let board = Board::from_fen(fen).expect("perft FEN should parse");
        for (depth_idx, nodes) in expected.iter().enumerate() {
            let depth = (depth_idx + 1) as u8;
            assert_eq!(perft(&board, depth), *nodes, "{fen} depth {depth}");
        }
    }

    #[test]
    fn start_position() {
        assert_counts(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[20, 400, 8902],
        );
    }

    #[test]
    fn kiwipete() {
        assert_counts(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[48, 2039],
        );
    }

    #[test]
    fn rook_and_pawn_endgame() {
        assert_counts("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812]);
    }

    #[test]
    fn promotions_and_checks() {
        assert_counts(
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            &[6, 264, 9467],
        );
        assert_counts(
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            &[44, 1486],
        );
    }

    #[test]
    fn divide_sums_to_total() {
        let board = Board::initial();
        let divided = perft_divide(&board, 2);
        assert_eq!(divided.len(), 20);
        assert_eq!(divided.iter().map(|(_, n)| n).sum::<u64>(), 400);
    }
}
