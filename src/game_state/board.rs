//! Immutable board snapshots.
//!
//! `Board` stores one bitboard per `(side, piece kind)` plus occupancy caches
//! and the FEN position state (side to move, castling rights, en-passant
//! square, clocks). Applying a move never mutates a board in place: it returns
//! a fresh snapshot, so earlier boards stay valid for history and rendering.

use crate::chess_errors::ChessResult;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::apply_move;
use crate::moves::attack_tables::squares_of;
use crate::moves::chess_move::Move;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

const START_WHITE: [u64; 6] = [
    0x0000_0000_0000_FF00,
    (1 << 1) | (1 << 6),
    (1 << 2) | (1 << 5),
    (1 << 0) | (1 << 7),
    1 << 3,
    1 << 4,
];

const START_BLACK: [u64; 6] = [
    0x00FF_0000_0000_0000,
    (1 << 57) | (1 << 62),
    (1 << 58) | (1 << 61),
    (1 << 56) | (1 << 63),
    1 << 59,
    1 << 60,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    // [side][piece_kind]
    pub(crate) pieces: [[u64; 6]; 2],

    pub(crate) occupancy_by_side: [u64; 2],
    pub(crate) occupancy_all: u64,

    pub(crate) side_to_move: Side,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,

    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Board {
    /// Board with no pieces, White to move. Only used while parsing.
    pub(crate) fn empty() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_side: [0; 2],
            occupancy_all: 0,
            side_to_move: Side::White,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard starting arrangement.
    pub fn initial() -> Self {
        let mut board = Self {
            pieces: [START_WHITE, START_BLACK],
            castling_rights: CASTLE_ALL,
            ..Self::empty()
        };
        board.recalc_occupancy();
        board
    }

    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    pub fn to_fen(&self) -> String {
        generate_fen(self)
    }

    /// Occupant of `square`, if any. Off-board squares are always empty.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        if square > 63 {
            return None;
        }
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        let side = if self.occupancy_by_side[Side::White.index()] & mask != 0 {
            Side::White
        } else {
            Side::Black
        };
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.pieces[side.index()][kind.index()] & mask != 0)
            .map(|kind| Piece::new(side, kind))
    }

    /// New board with `mv` played. Fails if the source square is empty.
    ///
    /// This does not check legality; `MoveEngine::apply` does.
    pub fn apply(&self, mv: Move) -> ChessResult<Board> {
        apply_move(self, mv)
    }

    #[inline]
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Bitboard of `side`'s pieces of `kind`.
    #[inline]
    pub fn bitboard(&self, side: Side, kind: PieceKind) -> u64 {
        self.pieces[side.index()][kind.index()]
    }

    #[inline]
    pub fn occupancy(&self, side: Side) -> u64 {
        self.occupancy_by_side[side.index()]
    }

    #[inline]
    pub fn occupancy_all(&self) -> u64 {
        self.occupancy_all
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        let kings = self.bitboard(side, PieceKind::King);
        (kings != 0).then(|| kings.trailing_zeros() as Square)
    }

    /// Every occupied square with its piece, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        squares_of(self.occupancy_all)
            .filter_map(move |square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// True when both boards hold the same piece on every square.
    pub fn same_placement(&self, other: &Board) -> bool {
        self.pieces == other.pieces
    }

    /// Copy of this board with a different side to move. The en-passant
    /// square only belongs to the side that was on move, so it is dropped.
    pub(crate) fn with_side_to_move(&self, side: Side) -> Board {
        if side == self.side_to_move {
            return self.clone();
        }
        let mut next = self.clone();
        next.side_to_move = side;
        next.en_passant_square = None;
        next
    }

    pub(crate) fn put_piece(&mut self, square: Square, piece: Piece) {
        self.pieces[piece.side.index()][piece.kind.index()] |= 1u64 << square;
    }

    pub(crate) fn recalc_occupancy(&mut self) {
        for side in Side::BOTH {
            self.occupancy_by_side[side.index()] =
                self.pieces[side.index()].iter().fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_side[0] | self.occupancy_by_side[1];
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Piece, PieceKind, Side};
    use crate::utils::algebraic::parse_square;

    #[test]
    fn initial_board_matches_starting_fen() {
        let parsed = Board::from_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(Board::initial(), parsed);
        assert_eq!(Board::initial().to_fen(), STARTING_POSITION_FEN);
    }

    #[test]
    fn piece_at_reports_occupants() {
        let board = Board::initial();
        let e1 = parse_square("e1").expect("e1 should parse");
        let d8 = parse_square("d8").expect("d8 should parse");
        let e4 = parse_square("e4").expect("e4 should parse");
        assert_eq!(board.piece_at(e1), Some(Piece::new(Side::White, PieceKind::King)));
        assert_eq!(board.piece_at(d8), Some(Piece::new(Side::Black, PieceKind::Queen)));
        assert_eq!(board.piece_at(e4), None);
        assert_eq!(board.piece_at(64), None);
        assert_eq!(board.piece_at(u8::MAX), None);
        assert_eq!(board.pieces().count(), 32);
    }

    #[test]
    fn king_squares_on_initial_board() {
        let board = Board::initial();
        assert_eq!(board.king_square(Side::White), Some(4));
        assert_eq!(board.king_square(Side::Black), Some(60));
    }

    #[test]
    fn switching_side_drops_en_passant() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let flipped = board.with_side_to_move(Side::Black);
        assert_eq!(flipped.side_to_move(), Side::Black);
        assert_eq!(flipped.en_passant_square(), None);
        assert!(flipped.same_placement(&board));
    }
}
