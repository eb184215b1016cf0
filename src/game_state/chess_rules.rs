//! Canonical chess-rule constants.

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock value at which the fifty-move rule draws the game.
pub const FIFTY_MOVE_HALFMOVE_LIMIT: u16 = 100;

/// Occurrences of the same position that draw by repetition.
pub const REPETITION_DRAW_COUNT: usize = 3;
