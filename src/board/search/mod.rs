//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening; only completed iterations count
//! - Negamax alpha-beta with mate distance pruning
//! - Quiescence search with stand-pat
//! - Move ordering (hash move, MVV-LVA, promotions, checks, killers, history)
//! - Transposition table with ply-adjusted mate scores

mod alphabeta;
mod constants;
mod iterative;
mod ordering;

use std::sync::Arc;
use std::time::Duration;

use crate::tt::{TranspositionTable, DEFAULT_TT_MB};

use super::Move;
use constants::HISTORY_MAX;
pub use constants::{MATE_SCORE, MATE_THRESHOLD, MAX_DEPTH, MAX_PLY};
pub use iterative::search;

/// What bounds a single search. Everything `None` searches until stopped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Deepest iteration to run
    pub depth: Option<u32>,
    /// Node budget
    pub nodes: Option<u64>,
    /// Wall-clock budget measured from the start of the search
    pub time: Option<Duration>,
}

impl SearchLimits {
    #[must_use]
    pub fn infinite() -> Self {
        SearchLimits::default()
    }

    #[must_use]
    pub fn depth(depth: u32) -> Self {
        SearchLimits {
            depth: Some(depth),
            ..SearchLimits::default()
        }
    }

    #[must_use]
    pub fn time(time: Duration) -> Self {
        SearchLimits {
            time: Some(time),
            ..SearchLimits::default()
        }
    }

    #[must_use]
    pub fn nodes(nodes: u64) -> Self {
        SearchLimits {
            nodes: Some(nodes),
            ..SearchLimits::default()
        }
    }

    /// True when nothing but the stop flag ends the search.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.depth.is_none() && self.nodes.is_none() && self.time.is_none()
    }
}

/// Outcome of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move of the last completed iteration, or the first ordered legal
    /// move when none completed. `None` only when there are no legal moves.
    pub best_move: Option<Move>,
    /// Score of the last completed iteration from the mover's side
    pub score: i32,
    /// Depth of the last completed iteration (0 if none)
    pub depth: u32,
    /// Nodes visited, including quiescence
    pub nodes: u64,
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub seldepth: u32,
    /// Centipawns from the mover's side
    pub score: i32,
    /// Moves to mate; negative when the mover is getting mated
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;

/// Moves to mate encoded in `score`, if it is a mate score.
#[must_use]
pub fn mate_in(score: i32) -> Option<i32> {
    if score.abs() < MATE_THRESHOLD {
        None
    } else if score > 0 {
        Some((MATE_SCORE - score + 1) / 2)
    } else {
        Some(-(MATE_SCORE + score + 1) / 2)
    }
}

pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[Move::null(); 2]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn get(&self, ply: usize) -> [Move; 2] {
        self.slots.get(ply).copied().unwrap_or([Move::null(); 2])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row[0] != mv {
            row[1] = row[0];
            row[0] = mv;
        }
    }

    pub fn reset(&mut self) {
        self.slots = [[Move::null(); 2]; MAX_PLY];
    }
}

/// Quiet move cutoff counts indexed by origin and destination.
pub struct HistoryTable {
    entries: [i32; 4096],
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable { entries: [0; 4096] }
    }

    fn index(mv: Move) -> usize {
        mv.from().index() * 64 + mv.to().index()
    }

    #[must_use]
    pub fn score(&self, mv: Move) -> i32 {
        self.entries[Self::index(mv)]
    }

    /// Reward a quiet move that caused a beta cutoff at `depth`.
    pub fn update(&mut self, mv: Move, depth: u32) {
        let bonus = (depth * depth) as i32;
        let entry = &mut self.entries[Self::index(mv)];
        *entry = entry.saturating_add(bonus).min(HISTORY_MAX);
    }

    pub fn decay(&mut self) {
        for entry in &mut self.entries {
            *entry >>= 2;
        }
    }

    pub fn reset(&mut self) {
        self.entries = [0; 4096];
    }
}

/// Search tables persisted across searches of one game.
pub struct SearchState {
    pub tt: TranspositionTable,
    pub killers: KillerTable,
    pub history: HistoryTable,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        SearchState {
            tt: TranspositionTable::new(tt_mb),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
        }
    }

    /// Prepare for the next search of the same game.
    pub fn new_search(&mut self) {
        self.tt.new_search();
        self.killers.reset();
        self.history.decay();
    }

    /// Forget everything learned so far.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.killers.reset();
        self.history.reset();
    }

    pub fn resize_tt(&mut self, tt_mb: usize) {
        self.tt.resize(tt_mb);
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tt.hashfull_per_mille()
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_TT_MB)
    }
}
