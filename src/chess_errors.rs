//! Errors used throughout the crate.
//!
//! `ChessErrors` is the single error type returned by board manipulation,
//! notation parsing, and the game session. Every variant is recoverable: the
//! operation that produced it leaves all state untouched, so callers reject
//! the attempted transition and carry on.
//!
//! Usage guidelines:
//! - Intent-level failures (`IllegalMove`, `GameOver`, `MissingPromotion`)
//!   are expected during play and are usually surfaced to the player as a
//!   rejected move.
//! - Parsing failures (`InvalidFen`, `InvalidSquare`, `InvalidLongAlgebraic`,
//!   `InvalidSan`, `InvalidPgn`) carry the offending text or a description of
//!   what was wrong with it.

use thiserror::Error;

use crate::game_state::game_status::GameStatus;

pub type ChessResult<T> = Result<T, ChessErrors>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessErrors {
    /// The requested move is not in the current legal set, or references an
    /// empty source square.
    ///
    /// Payload: source and destination squares in algebraic form.
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: String, to: String },

    /// A move was attempted after the game reached a terminal state.
    #[error("game is over: {0}")]
    GameOver(GameStatus),

    /// A pawn move reaching the last rank was requested without naming the
    /// promotion piece. The engine never picks one on the caller's behalf.
    #[error("move from {from} to {to} requires a promotion piece")]
    MissingPromotion { from: String, to: String },

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid long algebraic move: {0}")]
    InvalidLongAlgebraic(String),

    #[error("invalid SAN move: {0}")]
    InvalidSan(String),

    #[error("invalid PGN: {0}")]
    InvalidPgn(String),

    /// A read model could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
