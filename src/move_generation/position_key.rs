//! Zobrist keys for repetition detection.
//!
//! Keys are drawn from a fixed-seed `StdRng` so hashes are deterministic
//! across runs, which keeps repetition behaviour reproducible in tests.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::{board::Board, chess_types::*};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::attack_tables::{pawn_attacks, squares_of};

const ZOBRIST_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    black_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for side in &mut piece_square {
        for kind in side {
            for key in kind {
                *key = rng.random();
            }
        }
    }

    let black_to_move = rng.random();

    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.random();
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = rng.random();
    }

    ZobristTables {
        piece_square,
        black_to_move,
        castling,
        en_passant_file,
    }
}

/// Key identifying a position for repetition purposes.
///
/// Two boards share a key when they have the same placement, side to move
/// and castling rights, and the same en-passant file where an en-passant
/// capture is actually available. Clocks are ignored.
pub fn position_key(board: &Board) -> u64 {
    let tables = tables();
    let mut key = 0u64;

    for side in Side::BOTH {
        for kind in PieceKind::ALL {
            for square in squares_of(board.bitboard(side, kind)) {
                key ^= tables.piece_square[side.index()][kind.index()][square as usize];
            }
        }
    }

    if board.side_to_move() == Side::Black {
        key ^= tables.black_to_move;
    }

    key ^= tables.castling[(board.castling_rights() & 0x0F) as usize];

    if let Some(ep) = capturable_en_passant(board) {
        key ^= tables.en_passant_file[square_file(ep) as usize];
    }

    key
}

/// The en-passant square, but only when the side to move has a legal
/// en-passant capture onto it.
fn capturable_en_passant(board: &Board) -> Option<Square> {
    let ep = board.en_passant_square()?;
    let side = board.side_to_move();
    // Pawns of `side` that attack `ep` are the squares a pawn of the other
    // side on `ep` would attack.
    let capturers = pawn_attacks(side.opposite(), ep) & board.bitboard(side, PieceKind::Pawn);
    if capturers == 0 {
        return None;
    }
    generate_legal_moves(board, capturers)
        .iter()
        .any(|mv| mv.is_en_passant())
        .then_some(ep)
}

#[cfg(test)]
mod tests {
    use super::position_key;
    use crate::game_state::board::Board;

    #[test]
    fn keys_are_deterministic_and_ignore_clocks() {
        let a = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").expect("FEN should parse");
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 37 60").expect("FEN should parse");
        assert_eq!(position_key(&a), position_key(&b));
        assert_eq!(position_key(&a), position_key(&a.clone()));
    }

    #[test]
    fn side_and_castling_change_the_key() {
        let white = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1").expect("FEN should parse");
        let black = Board::from_fen("4k3/8/8/8/8/8/8/4K2R b K - 0 1").expect("FEN should parse");
        let no_rights = Board::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1").expect("FEN should parse");
        assert_ne!(position_key(&white), position_key(&black));
        assert_ne!(position_key(&white), position_key(&no_rights));
    }

    #[test]
    fn uncapturable_en_passant_square_is_ignored() {
        let with_ep = Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
            .expect("FEN should parse");
        let without = Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
            .expect("FEN should parse");
        assert_eq!(position_key(&with_ep), position_key(&without));

        let capturable = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let stale = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2").expect("FEN should parse");
        assert_ne!(position_key(&capturable), position_key(&stale));
    }

    #[test]
    fn pinned_en_passant_capturer_is_ignored() {
        // The e5 pawn is pinned to its king by the e8 rook, so exd6 is illegal.
        let pinned = Board::from_fen("4r2k/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let plain = Board::from_fen("4r2k/8/8/3pP3/8/8/8/4K3 w - - 0 2").expect("FEN should parse");
        assert_eq!(position_key(&pinned), position_key(&plain));
    }
}
