//! Serializable read model of a session and its clock.

use serde::{Deserialize, Serialize};

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::Side;
use crate::game_state::game_status::GameStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub fen: String,
    pub side_to_move: Side,
    pub status: GameStatus,
    /// PGN result token, `*` while in progress.
    pub result: String,
    pub san_history: Vec<String>,
    pub in_check: bool,
    pub white_seconds: u64,
    pub black_seconds: u64,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> ChessResult<String> {
        serde_json::to_string(self).map_err(|err| ChessErrors::Serialization(err.to_string()))
    }
}
