//! Game configuration: starting position and PGN header names.

use std::env;

use serde::{Deserialize, Serialize};

use crate::game_state::chess_rules::STARTING_POSITION_FEN;

pub const ENV_START_FEN: &str = "ARCADE_CHESS_START_FEN";
pub const ENV_WHITE: &str = "ARCADE_CHESS_WHITE";
pub const ENV_BLACK: &str = "ARCADE_CHESS_BLACK";
pub const ENV_EVENT: &str = "ARCADE_CHESS_EVENT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// FEN the session starts from and returns to on reset.
    pub start_fen: String,
    pub white: String,
    pub black: String,
    pub event: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_fen: STARTING_POSITION_FEN.to_owned(),
            white: "White".to_owned(),
            black: "Black".to_owned(),
            event: "Casual Game".to_owned(),
        }
    }
}

impl GameConfig {
    /// Defaults overridden by any of the `ARCADE_CHESS_*` variables that are
    /// set and non-empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let fields: [(&str, &mut String); 4] = [
            (ENV_START_FEN, &mut config.start_fen),
            (ENV_WHITE, &mut config.white),
            (ENV_BLACK, &mut config.black),
            (ENV_EVENT, &mut config.event),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value.trim().to_owned();
            }
        }
        config
    }

    pub fn with_start_fen(mut self, fen: impl Into<String>) -> Self {
        self.start_fen = fen.into();
        self
    }
}
