use std::fmt::Write as _;
use std::time::Duration;

use crate::board::{Move, SearchIterationInfo};

#[must_use]
pub fn format_bestmove(best_move: Option<Move>) -> String {
    match best_move {
        Some(mv) => format!("bestmove {mv}"),
        None => "bestmove 0000".to_string(),
    }
}

/// `info` line for one completed iteration.
#[must_use]
pub fn format_info(info: &SearchIterationInfo) -> String {
    let score = match info.mate_in {
        Some(moves) => format!("mate {moves}"),
        None => format!("cp {}", info.score),
    };
    let mut line = format!(
        "info depth {} seldepth {} score {score} nodes {} nps {} time {} hashfull {}",
        info.depth, info.seldepth, info.nodes, info.nps, info.time_ms, info.hashfull
    );
    if !info.pv.is_empty() {
        line.push_str(" pv");
        for mv in &info.pv {
            let _ = write!(line, " {mv}");
        }
    }
    line
}

#[must_use]
pub fn format_perft(depth: u32, nodes: u64, elapsed: Duration) -> String {
    format!(
        "info string perft depth {depth} nodes {nodes} time {}",
        elapsed.as_millis()
    )
}
