//! Produces the board that follows a move.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::{board::Board, chess_types::*};
use crate::moves::chess_move::Move;
use crate::utils::algebraic::square_name;

/// Return a new board with `mv` played by the side to move.
///
/// Handles relocation, captures, en-passant removal, castling rook moves,
/// promotion, castling rights, the en-passant square and both clocks. Legality
/// is not checked here; the source square must hold a piece of the side to
/// move.
pub fn apply_move(board: &Board, mv: Move) -> ChessResult<Board> {
    let from = mv.from();
    let to = mv.to();
    let moving_side = board.side_to_move();
    let enemy = moving_side.opposite();

    let moved = board
        .piece_at(from)
        .filter(|piece| piece.side == moving_side)
        .ok_or_else(|| ChessErrors::IllegalMove {
            from: square_name(from),
            to: square_name(to),
        })?;

    let from_mask = 1u64 << from;
    let to_mask = 1u64 << to;
    let mut next = board.clone();

    next.pieces[moving_side.index()][moved.kind.index()] &= !from_mask;

    let captured_something = if mv.is_en_passant() {
        let capture_sq = match moving_side {
            Side::White => to - 8,
            Side::Black => to + 8,
        };
        next.pieces[enemy.index()][PieceKind::Pawn.index()] &= !(1u64 << capture_sq);
        true
    } else {
        let occupied = board.occupancy(enemy) & to_mask != 0;
        for bitboard in next.pieces[enemy.index()].iter_mut() {
            *bitboard &= !to_mask;
        }
        occupied
    };

    let placed = mv.promotion().unwrap_or(moved.kind);
    next.pieces[moving_side.index()][placed.index()] |= to_mask;

    if mv.is_castling() && moved.kind == PieceKind::King {
        let rook_hop = match (from, to) {
            (4, 6) => Some((7, 5)),
            (4, 2) => Some((0, 3)),
            (60, 62) => Some((63, 61)),
            (60, 58) => Some((56, 59)),
            _ => None,
        };
        if let Some((rook_from, rook_to)) = rook_hop {
            let rooks = &mut next.pieces[moving_side.index()][PieceKind::Rook.index()];
            *rooks &= !(1u64 << rook_from);
            *rooks |= 1u64 << rook_to;
        }
    }

    next.castling_rights &= !(rights_lost_at(from) | rights_lost_at(to));
    if moved.kind == PieceKind::King {
        next.castling_rights &= match moving_side {
            Side::White => !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE),
            Side::Black => !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE),
        };
    }

    next.en_passant_square = mv.is_double_pawn_push().then(|| (from + to) / 2);

    if moved.kind == PieceKind::Pawn || captured_something {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_side == Side::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy;
    next.recalc_occupancy();

    Ok(next)
}

/// Castling rights that vanish once a piece leaves or lands on `square`.
fn rights_lost_at(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_WHITE_QUEENSIDE,
        7 => CASTLE_WHITE_KINGSIDE,
        56 => CASTLE_BLACK_QUEENSIDE,
        63 => CASTLE_BLACK_KINGSIDE,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::apply_move;
    use crate::chess_errors::ChessErrors;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Piece, PieceKind, Side, CASTLE_BLACK_KINGSIDE};
    use crate::moves::chess_move::{
        Move, FLAG_CAPTURE, FLAG_CASTLING, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
    };

    #[test]
    fn double_push_sets_en_passant_square() {
        let mv = Move::new(12, 28, PieceKind::Pawn, None, None, FLAG_DOUBLE_PAWN_PUSH);
        let next = apply_move(&Board::initial(), mv).expect("move should apply");
        assert_eq!(next.en_passant_square(), Some(20));
        assert_eq!(next.side_to_move(), Side::Black);
        assert_eq!(
            next.to_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
    }

    #[test]
    fn empty_source_square_is_rejected() {
        let mv = Move::new(20, 28, PieceKind::Pawn, None, None, 0);
        assert_eq!(
            apply_move(&Board::initial(), mv),
            Err(ChessErrors::IllegalMove {
                from: "e3".to_owned(),
                to: "e4".to_owned()
            })
        );
    }

    #[test]
    fn castling_moves_the_rook() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10").expect("FEN should parse");
        let mv = Move::new(4, 6, PieceKind::King, None, None, FLAG_CASTLING);
        let next = apply_move(&board, mv).expect("castle should apply");
        assert_eq!(next.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 10");
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let mv = Move::new(
            36,
            43,
            PieceKind::Pawn,
            Some(PieceKind::Pawn),
            None,
            FLAG_EN_PASSANT | FLAG_CAPTURE,
        );
        let next = apply_move(&board, mv).expect("en passant should apply");
        assert_eq!(next.to_fen(), "4k3/8/3P4/8/8/8/8/4K3 b - - 0 2");
    }

    #[test]
    fn capturing_a_corner_rook_clears_its_right() {
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let mv = Move::new(7, 63, PieceKind::Rook, Some(PieceKind::Rook), None, FLAG_CAPTURE);
        let next = apply_move(&board, mv).expect("capture should apply");
        assert_eq!(next.castling_rights() & CASTLE_BLACK_KINGSIDE, 0);
        assert_eq!(next.to_fen(), "r3k2R/8/8/8/8/8/8/R3K3 b Qq - 0 1");
    }

    #[test]
    fn promotion_substitutes_the_piece() {
        let board = Board::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mv = Move::new(48, 56, PieceKind::Pawn, None, Some(PieceKind::Queen), 0);
        let next = apply_move(&board, mv).expect("promotion should apply");
        assert_eq!(next.piece_at(56), Some(Piece::new(Side::White, PieceKind::Queen)));
        assert_eq!(next.bitboard(Side::White, PieceKind::Pawn), 0);
    }
}
