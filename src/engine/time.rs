//! Time management.
//!
//! Turns the clock fields of a `go` command into the wall-clock budget of a
//! single search.

use std::time::Duration;

use crate::board::{Color, SearchLimits};

/// Moves-to-go estimate when the GUI does not send one
pub const DEFAULT_MOVES_TO_GO: u64 = 30;

/// Clock fields of a `go` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoParams {
    pub movetime: Option<u64>,
    pub infinite: bool,
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u64>,
}

/// Time control settings for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeControl {
    /// No time limit
    #[default]
    Infinite,
    /// Fixed time per move
    MoveTime { time_ms: u64 },
    /// Remaining clock time and increment of the side to move
    Incremental {
        time_left_ms: u64,
        inc_ms: u64,
        movestogo: Option<u64>,
    },
}

impl TimeControl {
    /// Time control of `side` under `go`. `movetime` wins over the clocks;
    /// `infinite` wins over both.
    #[must_use]
    pub fn from_go(go: &GoParams, side: Color) -> Self {
        if go.infinite {
            return TimeControl::Infinite;
        }
        if let Some(time_ms) = go.movetime {
            return TimeControl::MoveTime { time_ms };
        }
        let (time, inc) = match side {
            Color::White => (go.wtime, go.winc),
            Color::Black => (go.btime, go.binc),
        };
        match time {
            Some(time_left_ms) => TimeControl::Incremental {
                time_left_ms,
                inc_ms: inc.unwrap_or(0),
                movestogo: go.movestogo,
            },
            None => TimeControl::Infinite,
        }
    }

    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, TimeControl::Infinite)
    }

    /// Wall-clock budget for one move. `move_overhead_ms` is reserved from
    /// the clock; an explicit `movetime` is used as given.
    #[must_use]
    pub fn budget(&self, move_overhead_ms: u64) -> Option<Duration> {
        match *self {
            TimeControl::Infinite => None,
            TimeControl::MoveTime { time_ms } => Some(Duration::from_millis(time_ms.max(1))),
            TimeControl::Incremental {
                time_left_ms,
                inc_ms,
                movestogo,
            } => {
                let safe_ms = time_left_ms.saturating_sub(move_overhead_ms);
                let moves_to_go = movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
                let target = safe_ms / moves_to_go + inc_ms * 3 / 4;
                Some(Duration::from_millis(target.min(safe_ms)))
            }
        }
    }
}

/// Search limits for `go` with the given side to move and overhead.
///
/// A `go` without any limit searches until `stop`.
#[must_use]
pub fn search_limits(go: &GoParams, side: Color, move_overhead_ms: u64) -> SearchLimits {
    SearchLimits {
        depth: go.depth,
        nodes: go.nodes,
        time: TimeControl::from_go(go, side).budget(move_overhead_ms),
    }
}

/// True when the search result should be withheld until `stop`: an explicit
/// `go infinite`, or a `go` that leaves the search without any limit.
#[must_use]
pub fn waits_for_stop(go: &GoParams, limits: &SearchLimits) -> bool {
    go.infinite || limits.is_infinite()
}
