use std::time::Instant;

use log::debug;

use super::alphabeta::SearchContext;
use super::constants::{INFINITY, MAX_DEPTH, MAX_PLY};
use super::ordering::MoveOrderer;
use super::{mate_in, SearchInfoCallback, SearchIterationInfo, SearchLimits, SearchResult, SearchState};
use crate::board::{Board, Evaluator, Move};
use crate::sync::StopFlag;
use crate::tt::BoundType;

impl SearchContext<'_> {
    /// Search every root move to `depth`. Returns `None` when the iteration
    /// was cut short and its result must be thrown away.
    fn search_root(
        &mut self,
        board: &mut Board,
        depth: u32,
        previous_best: Option<Move>,
    ) -> Option<(Move, i32)> {
        let moves = MoveOrderer::new(previous_best, self.state.killers.get(0), &self.state.history)
            .order(board);

        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best: Option<(Move, i32)> = None;

        for mv in moves.into_ordered() {
            if self.should_stop() {
                return None;
            }
            let score = {
                let mut child = board.scoped(mv);
                -self.alphabeta(&mut child, depth - 1, -beta, -alpha, 1)
            };
            if self.should_stop() {
                return None;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
            alpha = alpha.max(score);
        }

        if let Some((mv, score)) = best {
            self.state
                .tt
                .store(board.hash(), depth, score, BoundType::Exact, Some(mv));
        }
        best
    }

    /// Follow hash moves from the root while they stay legal.
    fn extract_pv(&self, board: &mut Board, best: Move, max_len: usize) -> Vec<Move> {
        let mut pv = vec![best];
        let mut made = vec![board.make_move(best)];
        let mut seen = vec![board.hash()];

        while pv.len() < max_len {
            let Some(mv) = self.state.tt.probe(board.hash()).and_then(|e| e.best_move) else {
                break;
            };
            if !board.legal_moves().contains(mv) {
                break;
            }
            pv.push(mv);
            made.push(board.make_move(mv));
            if seen.contains(&board.hash()) {
                break;
            }
            seen.push(board.hash());
        }

        for info in made.into_iter().rev() {
            board.unmake_move(info);
        }
        pv
    }

    /// Iterative deepening. The best move of the last fully completed
    /// iteration wins; a partially searched iteration is discarded. Depth 1
    /// runs to completion regardless of the deadline and node cap, only the
    /// stop flag can cut it short.
    fn iterative_deepening(
        &mut self,
        board: &mut Board,
        max_depth: u32,
        on_iteration: Option<&SearchInfoCallback>,
    ) -> Option<(Move, i32, u32)> {
        let mut completed: Option<(Move, i32, u32)> = None;

        for depth in 1..=max_depth {
            if self.limits_reached() {
                break;
            }
            self.seldepth = 0;

            let previous_best = completed.map(|(mv, _, _)| mv);
            let Some((mv, score)) = self.search_root(board, depth, previous_best) else {
                debug!("iteration {depth} aborted after {} nodes", self.nodes);
                break;
            };
            completed = Some((mv, score, depth));
            self.limits_armed = true;

            if let Some(callback) = on_iteration {
                let elapsed = self.start_time.elapsed();
                let time_ms = elapsed.as_millis() as u64;
                let nps = if time_ms > 0 {
                    self.nodes * 1000 / time_ms
                } else {
                    0
                };
                let info = SearchIterationInfo {
                    depth,
                    seldepth: self.seldepth.max(depth),
                    score,
                    mate_in: mate_in(score),
                    nodes: self.nodes,
                    nps,
                    time_ms,
                    hashfull: self.state.hashfull_per_mille(),
                    pv: self.extract_pv(board, mv, depth as usize),
                };
                callback(&info);
            }
        }

        completed
    }
}

/// Run an iterative-deepening search of `board` and return the best move found.
///
/// The board is left exactly as it was given. When no legal move exists the
/// result carries no move; otherwise a move is always returned, even if the
/// stop flag is already set on entry.
pub fn search(
    board: &mut Board,
    state: &mut SearchState,
    evaluator: &dyn Evaluator,
    limits: &SearchLimits,
    stop: &StopFlag,
    on_iteration: Option<SearchInfoCallback>,
) -> SearchResult {
    let start_time = Instant::now();
    state.new_search();

    let fallback = MoveOrderer::new(
        state.tt.probe(board.hash()).and_then(|e| e.best_move),
        state.killers.get(0),
        &state.history,
    )
    .order(board)
    .into_ordered()
    .next();

    let Some(fallback) = fallback else {
        return SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
        };
    };

    let mut ctx = SearchContext {
        state,
        evaluator,
        stop,
        start_time,
        deadline: limits.time.map(|t| start_time + t),
        node_limit: limits.nodes,
        nodes: 0,
        seldepth: 0,
        limits_armed: false,
        aborted: false,
    };
    let max_depth = limits
        .depth
        .unwrap_or(MAX_DEPTH)
        .clamp(1, (MAX_PLY / 2) as u32);
    let completed = ctx.iterative_deepening(board, max_depth, on_iteration.as_ref());

    match completed {
        Some((best_move, score, depth)) => SearchResult {
            best_move: Some(best_move),
            score,
            depth,
            nodes: ctx.nodes,
        },
        None => {
            debug!("no iteration completed, falling back to {fallback}");
            SearchResult {
                best_move: Some(fallback),
                score: 0,
                depth: 0,
                nodes: ctx.nodes,
            }
        }
    }
}
