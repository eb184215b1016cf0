//! Rules front-end: legal moves, validated application and classification.
//!
//! `MoveEngine` is stateless. Every method takes the board it should reason
//! about, so callers can hold as many snapshots as they like and ask about
//! any of them.

use log::debug;

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_rules::REPETITION_DRAW_COUNT;
use crate::game_state::game_status::{DrawReason, GameStatus};
use crate::game_state::{board::Board, chess_types::*};
use crate::move_generation::draw_rules::{is_fifty_move_draw, is_insufficient_material};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{generate_legal_moves, has_any_legal_move};
use crate::move_generation::perft::perft;
use crate::move_generation::position_key::position_key;
use crate::moves::chess_move::Move;
use crate::utils::algebraic::square_name;

#[derive(Debug, Clone, Copy, Default)]
pub struct MoveEngine;

impl MoveEngine {
    /// Legal moves of the piece on `square` with `side_to_move` on move.
    ///
    /// Empty when the square is empty, holds a piece of the other side, or the
    /// piece has nowhere legal to go.
    pub fn legal_moves_from(&self, board: &Board, square: Square, side_to_move: Side) -> Vec<Move> {
        if square > 63 {
            return Vec::new();
        }
        match board.piece_at(square) {
            Some(piece) if piece.side == side_to_move => {
                let board = board.with_side_to_move(side_to_move);
                generate_legal_moves(&board, 1u64 << square)
            }
            _ => Vec::new(),
        }
    }

    /// Every legal move for the board's side to move.
    pub fn legal_moves(&self, board: &Board) -> Vec<Move> {
        generate_legal_moves(board, u64::MAX)
    }

    /// Play `mv` after checking it is still legal on `board`.
    ///
    /// Moves come from an earlier `legal_moves_from` call; one that no longer
    /// matches the board (stale UI state) fails with `IllegalMove`.
    pub fn apply(&self, board: &Board, mv: Move) -> ChessResult<Board> {
        let legal = self.legal_moves_from(board, mv.from(), board.side_to_move());
        if !legal.contains(&mv) {
            debug!("rejecting stale or illegal move {mv}");
            return Err(ChessErrors::IllegalMove {
                from: square_name(mv.from()),
                to: square_name(mv.to()),
            });
        }
        board.apply(mv)
    }

    pub fn is_in_check(&self, board: &Board, side: Side) -> bool {
        is_king_in_check(board, side)
    }

    /// Classify the position with `side_to_move` on move.
    ///
    /// Precedence: checkmate, stalemate, insufficient material, fifty-move
    /// rule, check, ongoing.
    pub fn classify(&self, board: &Board, side_to_move: Side) -> GameStatus {
        self.classify_with_repetitions(board, side_to_move, 1)
    }

    /// Like [`MoveEngine::classify`], also reporting threefold repetition when
    /// the position has occurred `occurrences` times (this one included).
    pub fn classify_with_repetitions(
        &self,
        board: &Board,
        side_to_move: Side,
        occurrences: usize,
    ) -> GameStatus {
        let board = board.with_side_to_move(side_to_move);
        let in_check = is_king_in_check(&board, side_to_move);

        if !has_any_legal_move(&board) {
            return if in_check {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if is_insufficient_material(&board) {
            return GameStatus::Draw(DrawReason::InsufficientMaterial);
        }
        if is_fifty_move_draw(&board) {
            return GameStatus::Draw(DrawReason::FiftyMove);
        }
        if occurrences >= REPETITION_DRAW_COUNT {
            return GameStatus::Draw(DrawReason::ThreefoldRepetition);
        }
        if in_check {
            GameStatus::Check
        } else {
            GameStatus::Ongoing
        }
    }

    /// Repetition key of `board`; equal keys mean the same position.
    pub fn position_key(&self, board: &Board) -> u64 {
        position_key(board)
    }

    pub fn perft(&self, board: &Board, depth: u8) -> u64 {
        perft(board, depth)
    }
}
