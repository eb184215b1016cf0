use crate::game_state::{board::Board, chess_types::*};
use crate::utils::algebraic::square_name;

pub fn generate_fen(board: &Board) -> String {
    let side_to_move = match board.side_to_move() {
        Side::White => "w",
        Side::Black => "b",
    };
    let en_passant = board
        .en_passant_square()
        .map_or_else(|| "-".to_owned(), square_name);

    format!(
        "{} {} {} {} {} {}",
        generate_placement_field(board),
        side_to_move,
        generate_castling_field(board.castling_rights()),
        en_passant,
        board.halfmove_clock(),
        board.fullmove_number()
    )
}

/// Placement field only, used where side and clocks do not matter.
pub fn generate_placement_field(board: &Board) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            match board.piece_at(square_at(file, rank)) {
                Some(piece) => {
                    if empty_count > 0 {
                        out.push(char::from(b'0' + empty_count));
                        empty_count = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty_count += 1,
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let out: String = [
        (CASTLE_WHITE_KINGSIDE, 'K'),
        (CASTLE_WHITE_QUEENSIDE, 'Q'),
        (CASTLE_BLACK_KINGSIDE, 'k'),
        (CASTLE_BLACK_QUEENSIDE, 'q'),
    ]
    .iter()
    .filter(|(flag, _)| rights & flag != 0)
    .map(|(_, ch)| *ch)
    .collect();

    if out.is_empty() {
        "-".to_owned()
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{generate_fen, generate_placement_field};
    use crate::game_state::board::Board;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    #[test]
    fn round_trip_starting_position_fen() {
        let parsed = Board::from_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        let generated = generate_fen(&parsed);
        assert_eq!(generated, STARTING_POSITION_FEN);

        let reparsed = Board::from_fen(&generated).expect("generated FEN should parse");
        assert!(reparsed.same_placement(&parsed));
        assert_eq!(reparsed, parsed);
    }

    #[test]
    fn round_trip_custom_positions() {
        for fen in [
            "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6",
            "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ] {
            let parsed = Board::from_fen(fen).expect("FEN should parse");
            assert_eq!(generate_fen(&parsed), fen);
        }
    }

    #[test]
    fn placement_field_skips_state() {
        assert_eq!(
            generate_placement_field(&Board::initial()),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
        );
    }
}
