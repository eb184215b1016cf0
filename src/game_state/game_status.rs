//! Position classification results.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    InsufficientMaterial,
    FiftyMove,
    ThreefoldRepetition,
}

/// Classification of a position from the point of view of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
    Draw(DrawReason),
}

impl GameStatus {
    /// Checkmate, stalemate and draws end the game.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "ongoing"),
            GameStatus::Check => write!(f, "check"),
            GameStatus::Checkmate => write!(f, "checkmate"),
            GameStatus::Stalemate => write!(f, "stalemate"),
            GameStatus::Draw(DrawReason::InsufficientMaterial) => {
                write!(f, "draw by insufficient material")
            }
            GameStatus::Draw(DrawReason::FiftyMove) => write!(f, "draw by fifty-move rule"),
            GameStatus::Draw(DrawReason::ThreefoldRepetition) => {
                write!(f, "draw by threefold repetition")
            }
        }
    }
}

/// Final score of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    /// Result of a terminal `status` reached with `side_to_move` on move.
    /// Returns `None` while the game is still in progress.
    pub fn from_status(status: GameStatus, side_to_move: Side) -> Option<Self> {
        match status {
            GameStatus::Ongoing | GameStatus::Check => None,
            GameStatus::Checkmate => Some(match side_to_move {
                Side::White => GameResult::BlackWins,
                Side::Black => GameResult::WhiteWins,
            }),
            GameStatus::Stalemate | GameStatus::Draw(_) => Some(GameResult::Draw),
        }
    }

    /// PGN result token.
    pub const fn as_pgn(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }

    pub fn from_pgn(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" => Some(GameResult::Draw),
            _ => None,
        }
    }
}
