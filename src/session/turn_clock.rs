//! Per-side elapsed time, advanced one second per external tick.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::Side;

/// What the clock needs to know about a game in order to tick.
pub trait TurnSource {
    fn side_to_move(&self) -> Side;
    fn is_terminal(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnClock {
    white_seconds: u64,
    black_seconds: u64,
}

impl TurnClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one second to the side on move. Does nothing once the game is over.
    pub fn tick(&mut self, source: &impl TurnSource) {
        let Some(side) = self.active_side(source) else {
            return;
        };
        let counter = match side {
            Side::White => &mut self.white_seconds,
            Side::Black => &mut self.black_seconds,
        };
        *counter = counter.saturating_add(1);
        trace!("clock tick for {side}: {}s", *counter);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn elapsed(&self, side: Side) -> u64 {
        match side {
            Side::White => self.white_seconds,
            Side::Black => self.black_seconds,
        }
    }

    /// Side whose counter the next tick would advance.
    pub fn active_side(&self, source: &impl TurnSource) -> Option<Side> {
        (!source.is_terminal()).then(|| source.side_to_move())
    }

    /// Elapsed time as `MM:SS`; minutes keep counting past 59.
    pub fn formatted(&self, side: Side) -> String {
        let seconds = self.elapsed(side);
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::{TurnClock, TurnSource};
    use crate::game_state::chess_types::Side;

    struct FixedTurn {
        side: Side,
        terminal: bool,
    }

    impl TurnSource for FixedTurn {
        fn side_to_move(&self) -> Side {
            self.side
        }

        fn is_terminal(&self) -> bool {
            self.terminal
        }
    }

    #[test]
    fn only_the_side_to_move_accrues_time() {
        let mut clock = TurnClock::new();
        let white = FixedTurn { side: Side::White, terminal: false };
        let black = FixedTurn { side: Side::Black, terminal: false };

        clock.tick(&white);
        clock.tick(&white);
        clock.tick(&black);

        assert_eq!(clock.elapsed(Side::White), 2);
        assert_eq!(clock.elapsed(Side::Black), 1);
        assert_eq!(clock.active_side(&black), Some(Side::Black));
    }

    #[test]
    fn frozen_once_terminal() {
        let mut clock = TurnClock::new();
        let over = FixedTurn { side: Side::White, terminal: true };
        clock.tick(&over);
        assert_eq!(clock, TurnClock::default());
        assert_eq!(clock.active_side(&over), None);
    }

    #[test]
    fn formats_minutes_and_seconds() {
        let mut clock = TurnClock::new();
        let white = FixedTurn { side: Side::White, terminal: false };
        for _ in 0..75 {
            clock.tick(&white);
        }
        assert_eq!(clock.formatted(Side::White), "01:15");
        assert_eq!(clock.formatted(Side::Black), "00:00");

        clock.white_seconds = 100 * 60 + 5;
        assert_eq!(clock.formatted(Side::White), "100:05");

        clock.reset();
        assert_eq!(clock.elapsed(Side::White), 0);
    }
}
