//! Crate root module declarations for the arcade chess core.
//!
//! Exposes the rules layer (board, move generation, classification), the
//! session layer (game session and turn clock), and the notation helpers
//! (FEN, long algebraic, SAN, PGN) so binaries, tests and embedding UIs can
//! import stable module paths.

pub mod chess_errors;
pub mod config;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_status;
}

pub mod moves {
    pub mod attack_tables;
    pub mod chess_move;
}

pub mod move_generation {
    pub mod draw_rules;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_moves_king;
    pub mod legal_moves_pawn;
    pub mod legal_moves_pieces;
    pub mod move_engine;
    pub mod perft;
    pub mod position_key;
}

pub mod session {
    pub mod game_session;
    pub mod snapshot;
    pub mod turn_clock;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod render_game_state;
    pub mod san;
}

pub use chess_errors::{ChessErrors, ChessResult};
pub use config::GameConfig;
pub use game_state::board::Board;
pub use game_state::chess_types::{Piece, PieceKind, Side, Square};
pub use game_state::game_status::{DrawReason, GameResult, GameStatus};
pub use move_generation::move_engine::MoveEngine;
pub use moves::chess_move::Move;
pub use session::game_session::{GameSession, HistoryEntry, MoveRow};
pub use session::snapshot::SessionSnapshot;
pub use session::turn_clock::{TurnClock, TurnSource};
