//! Negamax alpha-beta and quiescence search.

use std::time::Instant;

use super::constants::{
    INFINITY, MATE_SCORE, MATE_THRESHOLD, MAX_PLY, MAX_QSEARCH_DEPTH, POLL_INTERVAL,
};
use super::ordering::{order_tactical, MoveOrderer};
use super::SearchState;
use crate::board::{Board, Evaluator, Move};
use crate::sync::StopFlag;
use crate::tt::BoundType;

/// Mate scores are stored relative to the node, not the root.
fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Per-search state threaded through the recursion. The board is passed
/// separately so each child can borrow it through a `ScopedMove` guard.
pub(super) struct SearchContext<'a> {
    pub(super) state: &'a mut SearchState,
    pub(super) evaluator: &'a dyn Evaluator,
    pub(super) stop: &'a StopFlag,
    pub(super) start_time: Instant,
    pub(super) deadline: Option<Instant>,
    pub(super) node_limit: Option<u64>,
    pub(super) nodes: u64,
    pub(super) seldepth: u32,
    /// Deadline and node cap only apply once this is set, after depth 1.
    pub(super) limits_armed: bool,
    /// Set once any limit fires; every score computed afterwards is discarded.
    pub(super) aborted: bool,
}

impl SearchContext<'_> {
    /// Count a node and report whether the search has to unwind.
    ///
    /// The stop flag is read at every node; the node cap and the deadline
    /// every `POLL_INTERVAL` nodes once they are armed.
    #[inline]
    fn visit(&mut self, ply: usize) -> bool {
        self.nodes += 1;
        self.seldepth = self.seldepth.max(ply as u32);
        if !self.aborted && self.nodes % POLL_INTERVAL == 0 && self.budget_exhausted() {
            self.aborted = true;
        }
        self.should_stop()
    }

    fn budget_exhausted(&self) -> bool {
        if !self.limits_armed {
            return false;
        }
        let out_of_nodes = self.node_limit.is_some_and(|limit| self.nodes >= limit);
        let out_of_time = self.deadline.is_some_and(|d| Instant::now() >= d);
        out_of_nodes || out_of_time
    }

    #[inline]
    pub(super) fn should_stop(&mut self) -> bool {
        if !self.aborted && self.stop.is_stopped() {
            self.aborted = true;
        }
        self.aborted
    }

    /// True when a limit has already been reached before the next iteration.
    pub(super) fn limits_reached(&mut self) -> bool {
        if self.budget_exhausted() {
            self.aborted = true;
        }
        self.should_stop()
    }

    pub(super) fn evaluate(&self, board: &Board) -> i32 {
        self.evaluator.evaluate(board)
    }

    /// Score `board` to `depth` plies within the window `(alpha, beta)`.
    pub(super) fn alphabeta(
        &mut self,
        board: &mut Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
    ) -> i32 {
        if self.visit(ply) {
            return 0;
        }

        if ply > 0 {
            if board.is_repetition()
                || board.halfmove_clock() >= 100
                || board.is_insufficient_material()
            {
                return 0;
            }

            // Mate distance pruning
            alpha = alpha.max(-MATE_SCORE + ply as i32);
            beta = beta.min(MATE_SCORE - ply as i32 - 1);
            if alpha >= beta {
                return alpha;
            }
        }

        if ply >= MAX_PLY - 1 {
            return self.evaluate(board);
        }

        if depth == 0 {
            return self.quiesce(board, alpha, beta, ply, 0);
        }

        let hash = board.hash();
        let mut hash_move = None;
        if let Some(entry) = self.state.tt.probe(hash) {
            hash_move = entry.best_move;
            if ply > 0 && entry.depth() >= depth {
                let score = score_from_tt(entry.score(), ply);
                match entry.bound_type {
                    BoundType::Exact => return score,
                    BoundType::LowerBound if score >= beta => return score,
                    BoundType::UpperBound if score <= alpha => return score,
                    _ => {}
                }
            }
        }

        let in_check = board.is_in_check(board.side_to_move());
        let moves = MoveOrderer::new(hash_move, self.state.killers.get(ply), &self.state.history)
            .order(board);
        if moves.is_empty() {
            return if in_check {
                -(MATE_SCORE - ply as i32)
            } else {
                0
            };
        }

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move: Option<Move> = None;

        for mv in moves.into_ordered() {
            let score = {
                let mut child = board.scoped(mv);
                -self.alphabeta(&mut child, depth - 1, -beta, -alpha, ply + 1)
            };
            if self.should_stop() {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                if !mv.is_tactical() {
                    self.state.killers.update(ply, mv);
                    self.state.history.update(mv, depth);
                }
                break;
            }
        }

        let bound = if best_score >= beta {
            BoundType::LowerBound
        } else if best_score > original_alpha {
            BoundType::Exact
        } else {
            BoundType::UpperBound
        };
        self.state
            .tt
            .store(hash, depth, score_to_tt(best_score, ply), bound, best_move);

        best_score
    }

    /// Resolve captures and promotions until the position is quiet. In check
    /// every evasion is searched and standing pat is not allowed.
    pub(super) fn quiesce(
        &mut self,
        board: &mut Board,
        mut alpha: i32,
        beta: i32,
        ply: usize,
        qdepth: u32,
    ) -> i32 {
        if self.visit(ply) {
            return 0;
        }
        if qdepth >= MAX_QSEARCH_DEPTH || ply >= MAX_PLY - 1 {
            return self.evaluate(board);
        }

        let in_check = board.is_in_check(board.side_to_move());
        let (moves, mut best_score) = if in_check {
            let moves = MoveOrderer::new(None, [Move::null(); 2], &self.state.history).order(board);
            if moves.is_empty() {
                return -(MATE_SCORE - ply as i32);
            }
            (moves, -INFINITY)
        } else {
            let stand_pat = self.evaluate(board);
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
            (order_tactical(board), stand_pat)
        };

        for mv in moves.into_ordered() {
            let score = {
                let mut child = board.scoped(mv);
                -self.quiesce(&mut child, -beta, -alpha, ply + 1, qdepth + 1)
            };
            if self.should_stop() {
                return 0;
            }

            if score > best_score {
                best_score = score;
            }
            if score >= beta {
                return score;
            }
            alpha = alpha.max(score);
        }

        best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mate_scores_round_trip_through_tt() {
        let mate_in_three_plies = MATE_SCORE - 3;
        let stored = score_to_tt(mate_in_three_plies, 2);
        assert_eq!(stored, MATE_SCORE - 1);
        assert_eq!(score_from_tt(stored, 2), mate_in_three_plies);
        assert_eq!(score_from_tt(stored, 4), MATE_SCORE - 5);

        let mated = -(MATE_SCORE - 4);
        assert_eq!(score_from_tt(score_to_tt(mated, 1), 1), mated);
        assert_eq!(score_to_tt(35, 9), 35);
    }
}
