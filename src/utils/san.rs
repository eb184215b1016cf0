//! Standard algebraic notation (SAN) for move history and PGN movetext.
//!
//! Formatting needs the board before the move: disambiguation depends on the
//! other legal moves, and the `+`/`#` suffix on the position that follows.
//! Parsing goes the other way round, matching the text against the SAN of
//! every legal move.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::{board::Board, chess_types::*};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_any_legal_move};
use crate::moves::chess_move::Move;
use crate::utils::algebraic::{file_char, rank_char, square_name};

/// SAN of `mv` played on `board`, including any check or mate suffix.
///
/// `mv` must be legal on `board`.
pub fn move_to_san(board: &Board, mv: Move) -> ChessResult<String> {
    let legal = generate_legal_moves(board, u64::MAX);
    let mut san = san_without_suffix(mv, &legal);

    let next = board.apply(mv)?;
    if is_king_in_check(&next, next.side_to_move()) {
        san.push(if has_any_legal_move(&next) { '+' } else { '#' });
    }

    Ok(san)
}

/// Find the legal move on `board` written as `san`.
///
/// Check and annotation suffixes (`+ # ! ?`) are ignored, `0-0` is read as
/// `O-O`, and the `=` before a promotion piece is optional.
pub fn san_to_move(board: &Board, san: &str) -> ChessResult<Move> {
    let wanted = normalize(san);
    if wanted.is_empty() {
        return Err(ChessErrors::InvalidSan(san.to_owned()));
    }

    let legal = generate_legal_moves(board, u64::MAX);
    let mut matches = legal
        .iter()
        .copied()
        .filter(|mv| normalize(&san_without_suffix(*mv, &legal)) == wanted);

    match (matches.next(), matches.next()) {
        (Some(mv), None) => Ok(mv),
        (Some(_), Some(_)) => Err(ChessErrors::InvalidSan(san.to_owned())),
        (None, _) => Err(missing_promotion(&legal, &wanted)
            .unwrap_or_else(|| ChessErrors::InvalidSan(san.to_owned()))),
    }
}

/// `b8` or `axb8` written for a move that only exists as a promotion.
fn missing_promotion(legal: &[Move], wanted: &str) -> Option<ChessErrors> {
    legal
        .iter()
        .filter(|mv| mv.promotion().is_some())
        .find(|mv| {
            let full = normalize(&san_without_suffix(**mv, legal));
            full.strip_suffix(|c: char| c.is_ascii_uppercase()) == Some(wanted)
        })
        .map(|mv| ChessErrors::MissingPromotion {
            from: square_name(mv.from()),
            to: square_name(mv.to()),
        })
}

fn san_without_suffix(mv: Move, legal: &[Move]) -> String {
    if mv.is_castling() {
        return if square_file(mv.to()) == 6 {
            "O-O".to_owned()
        } else {
            "O-O-O".to_owned()
        };
    }

    let from = mv.from();
    let to = mv.to();
    let kind = mv.moved_piece();
    let mut out = String::new();

    if kind == PieceKind::Pawn {
        if mv.is_capture() {
            out.push(file_char(square_file(from)));
        }
    } else {
        out.push(kind.letter());
        out.push_str(&disambiguation(mv, legal));
    }

    if mv.is_capture() {
        out.push('x');
    }
    out.push_str(&square_name(to));

    if let Some(promotion) = mv.promotion() {
        out.push('=');
        out.push(promotion.letter());
    }

    out
}

fn disambiguation(mv: Move, legal: &[Move]) -> String {
    let from = mv.from();
    let rivals: Vec<Square> = legal
        .iter()
        .filter(|other| {
            other.to() == mv.to() && other.from() != from && other.moved_piece() == mv.moved_piece()
        })
        .map(|other| other.from())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|sq| square_file(*sq) == square_file(from));
    let shares_rank = rivals.iter().any(|sq| square_rank(*sq) == square_rank(from));

    match (shares_file, shares_rank) {
        (false, _) => file_char(square_file(from)).to_string(),
        (true, false) => rank_char(square_rank(from)).to_string(),
        (true, true) => square_name(from),
    }
}

fn normalize(san: &str) -> String {
    san.trim()
        .trim_end_matches(['+', '#', '!', '?'])
        .replace('0', "O")
        .replace('=', "")
}

#[cfg(test)]
mod tests {
    use super::{move_to_san, san_to_move};
    use crate::chess_errors::ChessErrors;
    use crate::game_state::board::Board;
    use crate::move_generation::legal_move_generator::generate_legal_moves;

    fn san_of(fen: &str, lan: &str) -> String {
        let board = Board::from_fen(fen).expect("FEN should parse");
        let mv = generate_legal_moves(&board, u64::MAX)
            .into_iter()
            .find(|mv| mv.to_long_algebraic() == lan)
            .expect("move should be legal");
        move_to_san(&board, mv).expect("SAN should format")
    }

    #[test]
    fn pawn_and_piece_moves() {
        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert_eq!(san_of(start, "e2e4"), "e4");
        assert_eq!(san_of(start, "g1f3"), "Nf3");
    }

    #[test]
    fn captures_castles_and_en_passant() {
        assert_eq!(
            san_of("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 2", "e4d5"),
            "exd5"
        );
        assert_eq!(san_of("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1"), "O-O");
        assert_eq!(san_of("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1c1"), "O-O-O");
        assert_eq!(san_of("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", "e5d6"), "exd6");
    }

    #[test]
    fn disambiguates_by_file_then_rank() {
        // Knights on b1 and f3 can both reach d2.
        assert_eq!(san_of("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1", "b1d2"), "Nbd2");
        // Rooks on e1 and e3 can both reach e2.
        assert_eq!(san_of("k7/8/8/8/8/4R3/8/K3R3 w - - 0 1", "e1e2"), "R1e2");
        // Queens on a1, a3 and c1 can all reach b2.
        assert_eq!(san_of("4k3/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1", "a1b2"), "Qa1b2");
    }

    #[test]
    fn promotion_check_and_mate_suffixes() {
        assert_eq!(san_of("8/P7/8/8/8/8/8/k6K w - - 0 1", "a7a8q"), "a8=Q+");
        assert_eq!(
            san_of("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2", "d8h4"),
            "Qh4#"
        );
    }

    #[test]
    fn parses_san_leniently() {
        let board = Board::initial();
        let mv = san_to_move(&board, "Nf3").expect("Nf3 should parse");
        assert_eq!(mv.to_long_algebraic(), "g1f3");
        let mv = san_to_move(&board, "e4!?").expect("e4 should parse");
        assert_eq!(mv.to_long_algebraic(), "e2e4");

        let castle = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let mv = san_to_move(&castle, "0-0").expect("0-0 should parse");
        assert_eq!(mv.to_long_algebraic(), "e1g1");

        let promo = Board::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").expect("FEN should parse");
        let mv = san_to_move(&promo, "a8N").expect("a8N should parse");
        assert_eq!(mv.to_long_algebraic(), "a7a8n");
    }

    #[test]
    fn rejects_unknown_or_ambiguous_san() {
        let board = Board::initial();
        assert_eq!(san_to_move(&board, "e5"), Err(ChessErrors::InvalidSan("e5".to_owned())));
        assert!(san_to_move(&board, "").is_err());

        let promo = Board::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let missing = ChessErrors::MissingPromotion {
            from: "a7".to_owned(),
            to: "a8".to_owned(),
        };
        assert_eq!(san_to_move(&promo, "a8"), Err(missing));
        assert!(matches!(
            san_to_move(&promo, "axb8+"),
            Err(ChessErrors::MissingPromotion { .. })
        ));

        let two_knights = Board::from_fen("4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1").expect("FEN should parse");
        assert!(san_to_move(&two_knights, "Nd2").is_err());
    }
}
