//! One game between two local players.
//!
//! The session owns the starting board and an append-only history of played
//! moves; the current board is always the last history entry. Every intent is
//! validated against the legal move set before anything changes, so a rejected
//! intent leaves the session exactly as it was.

use std::collections::HashMap;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::config::GameConfig;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::game_status::{GameResult, GameStatus};
use crate::game_state::{board::Board, chess_types::*};
use crate::move_generation::move_engine::MoveEngine;
use crate::moves::chess_move::Move;
use crate::session::snapshot::SessionSnapshot;
use crate::session::turn_clock::{TurnClock, TurnSource};
use crate::utils::algebraic::square_name;
use crate::utils::long_algebraic::parse_long_algebraic;
use crate::utils::pgn::{read_pgn, write_pgn};
use crate::utils::san::{move_to_san, san_to_move};

/// A played move with its SAN and the board it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub mv: Move,
    pub san: String,
    pub board_after: Board,
}

/// One line of a two-column move list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRow {
    pub move_number: u16,
    pub white: String,
    /// Empty while Black has not replied yet.
    pub black: String,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    engine: MoveEngine,
    initial: Board,
    history: Vec<HistoryEntry>,
    status: GameStatus,
    repetitions: HashMap<u64, usize>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Standard game with default player names.
    pub fn new() -> Self {
        Self::from_parts(GameConfig::default(), Board::initial())
    }

    /// Game starting from `config.start_fen`.
    pub fn with_config(config: GameConfig) -> ChessResult<Self> {
        let initial = Board::from_fen(&config.start_fen)?;
        Ok(Self::from_parts(config, initial))
    }

    fn from_parts(config: GameConfig, initial: Board) -> Self {
        let engine = MoveEngine;
        let mut session = Self {
            config,
            engine,
            status: GameStatus::Ongoing,
            repetitions: HashMap::new(),
            history: Vec::new(),
            initial,
        };
        session.restart();
        session
    }

    /// Rebuild a session from PGN text. Player and event headers in the PGN
    /// take precedence over `config`, as does its `FEN` header.
    pub fn from_pgn(config: GameConfig, pgn: &str) -> ChessResult<Self> {
        let game = read_pgn(pgn)?;

        let mut config = config.with_start_fen(game.initial_board.to_fen());
        for (key, field) in [
            ("White", &mut config.white),
            ("Black", &mut config.black),
            ("Event", &mut config.event),
        ] {
            if let Some(value) = game.headers.get(key) {
                field.clone_from(value);
            }
        }

        let mut session = Self::from_parts(config, game.initial_board);
        for mv in &game.moves {
            session.play(*mv)?;
        }

        info!(
            "imported PGN game with {} plies, status {}",
            session.history.len(),
            session.status
        );
        Ok(session)
    }

    /// Try to move the piece on `from` to `to`.
    ///
    /// `promotion` is required when the move reaches the last rank with a
    /// pawn and ignored otherwise.
    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ChessResult<HistoryEntry> {
        if self.status.is_terminal() {
            debug!("rejecting move after game end ({})", self.status);
            return Err(ChessErrors::GameOver(self.status));
        }

        let illegal = || ChessErrors::IllegalMove {
            from: square_name(from),
            to: square_name(to),
        };

        let board = self.board();
        let candidates: Vec<Move> = self
            .engine
            .legal_moves_from(board, from, board.side_to_move())
            .into_iter()
            .filter(|mv| mv.to() == to)
            .collect();

        let chosen = if candidates.iter().any(|mv| mv.promotion().is_some()) {
            let Some(kind) = promotion else {
                debug!("rejecting {}{}: promotion piece missing", square_name(from), square_name(to));
                return Err(ChessErrors::MissingPromotion {
                    from: square_name(from),
                    to: square_name(to),
                });
            };
            candidates.into_iter().find(|mv| mv.promotion() == Some(kind))
        } else {
            candidates.into_iter().next()
        };

        match chosen {
            Some(mv) => self.play(mv),
            None => {
                debug!("rejecting {}{}: not a legal move", square_name(from), square_name(to));
                Err(illegal())
            }
        }
    }

    /// Play a move written as `e2e4` or `e7e8q`.
    pub fn attempt_long_algebraic(&mut self, text: &str) -> ChessResult<HistoryEntry> {
        let parsed = parse_long_algebraic(text)?;
        self.attempt_move(parsed.from, parsed.to, parsed.promotion)
    }

    /// Play a move written in SAN, such as `Nf3` or `exd8=Q+`.
    pub fn attempt_san(&mut self, text: &str) -> ChessResult<HistoryEntry> {
        if self.status.is_terminal() {
            return Err(ChessErrors::GameOver(self.status));
        }
        let mv = san_to_move(self.board(), text)?;
        self.attempt_move(mv.from(), mv.to(), mv.promotion())
    }

    fn play(&mut self, mv: Move) -> ChessResult<HistoryEntry> {
        if self.status.is_terminal() {
            return Err(ChessErrors::GameOver(self.status));
        }

        let board = self.board();
        let mover = board.side_to_move();
        let san = move_to_san(board, mv)?;
        let board_after = self.engine.apply(board, mv)?;

        let key = self.engine.position_key(&board_after);
        let occurrences = self.repetitions.get(&key).copied().unwrap_or(0) + 1;
        let status = self.engine.classify_with_repetitions(
            &board_after,
            board_after.side_to_move(),
            occurrences,
        );

        debug!("{mover} played {san} ({mv}), status {status}");
        if status.is_terminal() {
            info!("game over after {san}: {status}");
        }

        let entry = HistoryEntry {
            mv,
            san,
            board_after,
        };
        self.repetitions.insert(key, occurrences);
        self.status = status;
        self.history.push(entry.clone());
        Ok(entry)
    }

    /// Legal moves of the piece on `square` for the side to move.
    pub fn legal_moves_from(&self, square: Square) -> Vec<Move> {
        let board = self.board();
        self.engine
            .legal_moves_from(board, square, board.side_to_move())
    }

    /// Return to the configured starting position. The clock is not touched.
    pub fn reset(&mut self) {
        self.restart();
        info!("session reset to {}", self.initial.to_fen());
    }

    fn restart(&mut self) {
        self.history.clear();
        self.repetitions.clear();
        self.repetitions
            .insert(self.engine.position_key(&self.initial), 1);
        self.status = self
            .engine
            .classify(&self.initial, self.initial.side_to_move());
    }

    pub fn board(&self) -> &Board {
        self.history
            .last()
            .map_or(&self.initial, |entry| &entry.board_after)
    }

    pub fn initial_board(&self) -> &Board {
        &self.initial
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn side_to_move(&self) -> Side {
        self.board().side_to_move()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_in_check(&self) -> bool {
        self.engine.is_in_check(self.board(), self.side_to_move())
    }

    /// `None` while the game is in progress.
    pub fn result(&self) -> Option<GameResult> {
        GameResult::from_status(self.status, self.side_to_move())
    }

    /// PGN result token, `*` while the game is in progress.
    pub fn result_text(&self) -> &'static str {
        self.result().map_or("*", GameResult::as_pgn)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn san_history(&self) -> Vec<&str> {
        self.history.iter().map(|entry| entry.san.as_str()).collect()
    }

    /// History grouped into numbered White/Black pairs. A game that starts
    /// with Black to move gets `...` in the first White cell.
    pub fn move_rows(&self) -> Vec<MoveRow> {
        let mut sans: Vec<String> = self.history.iter().map(|e| e.san.clone()).collect();
        if self.initial.side_to_move() == Side::Black && !sans.is_empty() {
            sans.insert(0, "...".to_owned());
        }

        let first_number = self.initial.fullmove_number();
        sans.chunks(2)
            .enumerate()
            .map(|(idx, pair)| MoveRow {
                move_number: first_number.saturating_add(idx as u16),
                white: pair[0].clone(),
                black: pair.get(1).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Read model for a UI, combining this session with its clock.
    pub fn snapshot(&self, clock: &TurnClock) -> SessionSnapshot {
        SessionSnapshot {
            fen: self.board().to_fen(),
            side_to_move: self.side_to_move(),
            status: self.status,
            result: self.result_text().to_owned(),
            san_history: self.history.iter().map(|e| e.san.clone()).collect(),
            in_check: self.is_in_check(),
            white_seconds: clock.elapsed(Side::White),
            black_seconds: clock.elapsed(Side::Black),
        }
    }

    /// PGN of the game so far, dated today.
    pub fn to_pgn(&self) -> ChessResult<String> {
        let date = chrono::Local::now().format("%Y.%m.%d").to_string();
        let mut headers: Vec<(String, String)> = vec![
            ("Event".to_owned(), self.config.event.clone()),
            ("Site".to_owned(), "Local".to_owned()),
            ("Date".to_owned(), date),
            ("Round".to_owned(), "-".to_owned()),
            ("White".to_owned(), self.config.white.clone()),
            ("Black".to_owned(), self.config.black.clone()),
            ("Result".to_owned(), self.result_text().to_owned()),
        ];

        let initial_fen = self.initial.to_fen();
        if initial_fen != STARTING_POSITION_FEN {
            headers.push(("SetUp".to_owned(), "1".to_owned()));
            headers.push(("FEN".to_owned(), initial_fen));
        }

        let moves: Vec<Move> = self.history.iter().map(|entry| entry.mv).collect();
        write_pgn(&headers, &self.initial, &moves)
    }
}

impl TurnSource for GameSession {
    fn side_to_move(&self) -> Side {
        GameSession::side_to_move(self)
    }

    fn is_terminal(&self) -> bool {
        GameSession::is_terminal(self)
    }
}
