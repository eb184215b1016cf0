//! FEN-to-Board parser.
//!
//! Builds a fully-populated board from a Forsyth-Edwards Notation string,
//! including piece bitboards, castling rights, en-passant square, clocks and
//! occupancies. The halfmove and fullmove fields may be omitted and default to
//! `0` and `1`.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::{board::Board, chess_types::*};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::utils::algebraic::parse_square;

pub fn parse_fen(fen: &str) -> ChessResult<Board> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side to move"))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en-passant square"))?;
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let mut board = Board::empty();

    parse_placement(board_part, &mut board)?;
    board.side_to_move = parse_side_to_move(side_part)?;
    board.castling_rights = parse_castling_rights(castling_part)?;
    board.en_passant_square = parse_en_passant_square(en_passant_part, board.side_to_move)?;
    board.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("invalid halfmove clock '{halfmove_part}'")))?;
    board.fullmove_number = fullmove_part
        .parse::<u16>()
        .ok()
        .filter(|n| *n >= 1)
        .ok_or_else(|| invalid(&format!("invalid fullmove number '{fullmove_part}'")))?;

    board.recalc_occupancy();
    validate_kings(&board)?;
    validate_waiting_king_safe(&board)?;

    Ok(board)
}

fn parse_placement(board_part: &str, board: &mut Board) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(&format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as u8;
            } else {
                let piece = Piece::from_fen_char(ch)
                    .ok_or_else(|| invalid(&format!("invalid piece character '{ch}'")))?;
                if file >= 8 {
                    return Err(invalid(&format!("rank {} has too many files", rank + 1)));
                }
                board.put_piece(square_at(file, rank), piece);
                file += 1;
            }

            if file > 8 {
                return Err(invalid(&format!("rank {} has too many files", rank + 1)));
            }
        }

        if file != 8 {
            return Err(invalid(&format!("rank {} does not sum to 8 files", rank + 1)));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Side> {
    match side_part {
        "w" => Ok(Side::White),
        "b" => Ok(Side::Black),
        _ => Err(invalid(&format!("invalid side to move '{side_part}'"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    castling_part.chars().try_fold(0, |rights, ch| match ch {
        'K' => Ok(rights | CASTLE_WHITE_KINGSIDE),
        'Q' => Ok(rights | CASTLE_WHITE_QUEENSIDE),
        'k' => Ok(rights | CASTLE_BLACK_KINGSIDE),
        'q' => Ok(rights | CASTLE_BLACK_QUEENSIDE),
        _ => Err(invalid(&format!("invalid castling character '{ch}'"))),
    })
}

fn parse_en_passant_square(en_passant_part: &str, side_to_move: Side) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = parse_square(en_passant_part)
        .map_err(|_| invalid(&format!("invalid en-passant square '{en_passant_part}'")))?;
    let expected_rank = match side_to_move {
        Side::White => 5,
        Side::Black => 2,
    };
    if square_rank(square) != expected_rank {
        return Err(invalid(&format!(
            "en-passant square '{en_passant_part}' is not on the capture rank"
        )));
    }

    Ok(Some(square))
}

fn validate_kings(board: &Board) -> ChessResult<()> {
    for side in Side::BOTH {
        let kings = board.bitboard(side, PieceKind::King).count_ones();
        if kings != 1 {
            return Err(invalid(&format!("{side} must have exactly one king, found {kings}")));
        }
    }
    Ok(())
}

/// The side that just moved cannot have left its king attacked.
fn validate_waiting_king_safe(board: &Board) -> ChessResult<()> {
    let waiting = board.side_to_move().opposite();
    if is_king_in_check(board, waiting) {
        return Err(invalid(&format!("{waiting} king is in check with {} to move", board.side_to_move())));
    }
    Ok(())
}

fn invalid(reason: &str) -> ChessErrors {
    ChessErrors::InvalidFen(reason.to_owned())
}
