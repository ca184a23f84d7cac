//! Engine controller implementation.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error};
use parking_lot::Mutex;

use crate::board::{
    search, Board, Evaluator, SearchInfoCallback, SearchLimits, SearchResult, SearchState,
    StandardEvaluator,
};
use crate::sync::StopFlag;

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Poll interval while an infinite search waits for `stop`
const STOP_POLL_MS: u64 = 5;

/// Active search job state
pub struct SearchJob {
    /// Stop flag for the search
    stop: StopFlag,
    /// Set by the search thread right before it reports its result
    reported: Arc<AtomicBool>,
    /// Handle to the search thread
    handle: JoinHandle<()>,
}

impl SearchJob {
    /// Signal stop without waiting
    pub fn signal_stop(&self) {
        self.stop.stop();
    }

    /// True once the search thread has handed its result over.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.reported.load(Ordering::Acquire)
    }

    /// Stop the search and wait for the thread to finish
    pub fn stop_and_wait(self) {
        self.signal_stop();
        self.join();
    }

    fn join(self) {
        if self.handle.join().is_err() {
            error!("search thread terminated abnormally");
        }
    }
}

/// Owns the current position, the search tables and at most one running
/// search.
pub struct EngineController {
    /// Current board position
    board: Board,
    /// Search state (transposition table, killers, history)
    search_state: Arc<Mutex<SearchState>>,
    evaluator: Arc<dyn Evaluator>,
    /// Active search job (if any)
    current_job: Option<SearchJob>,
    /// Optional callback for per-iteration search info
    info_callback: Option<SearchInfoCallback>,
}

impl EngineController {
    /// Create a new engine controller using the standard evaluator
    #[must_use]
    pub fn new(tt_mb: usize) -> Self {
        Self::with_evaluator(tt_mb, Arc::new(StandardEvaluator))
    }

    #[must_use]
    pub fn with_evaluator(tt_mb: usize, evaluator: Arc<dyn Evaluator>) -> Self {
        EngineController {
            board: Board::new(),
            search_state: Arc::new(Mutex::new(SearchState::new(tt_mb))),
            evaluator,
            current_job: None,
            info_callback: None,
        }
    }

    /// Set the per-iteration info callback used by later searches
    pub fn set_info_callback(&mut self, callback: Option<SearchInfoCallback>) {
        self.info_callback = callback;
    }

    /// Get a reference to the current board
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Set the board position
    pub fn set_board(&mut self, board: Board) {
        self.stop_search();
        self.board = board;
    }

    /// Get a reference to the search state
    #[must_use]
    pub fn search_state(&self) -> &Arc<Mutex<SearchState>> {
        &self.search_state
    }

    /// Reset the board to the starting position and forget all search tables
    pub fn new_game(&mut self) {
        self.stop_search();
        self.board = Board::new();
        self.search_state.lock().clear();
    }

    pub fn clear_tables(&mut self) {
        self.stop_search();
        self.search_state.lock().clear();
    }

    pub fn resize_hash(&mut self, tt_mb: usize) {
        self.stop_search();
        self.search_state.lock().resize_tt(tt_mb);
    }

    /// Stop any active search and wait for its thread
    pub fn stop_search(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.stop_and_wait();
        }
    }

    /// Check if there's an active search
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.is_some()
    }

    /// Join a search that has already reported its result. Returns true when
    /// a job was reaped.
    pub fn reap_finished(&mut self) -> bool {
        if self.current_job.as_ref().is_some_and(SearchJob::is_finished) {
            if let Some(job) = self.current_job.take() {
                job.join();
            }
            return true;
        }
        false
    }

    #[must_use]
    pub fn has_legal_moves(&mut self) -> bool {
        self.board.has_legal_moves()
    }

    /// Leaf count of the legal move tree of the current position
    pub fn perft(&mut self, depth: u32) -> u64 {
        self.board.perft(depth)
    }

    /// Start a search of a copy of the current position on a background
    /// thread.
    ///
    /// `on_complete` runs on the search thread with the result. With
    /// `wait_for_stop` the result is held back until the stop flag is set.
    pub fn start_search<F>(
        &mut self,
        limits: SearchLimits,
        wait_for_stop: bool,
        on_complete: F,
    ) -> io::Result<()>
    where
        F: FnOnce(SearchResult) + Send + 'static,
    {
        self.stop_search();

        let stop = StopFlag::new();
        let reported = Arc::new(AtomicBool::new(false));

        let mut search_board = self.board.clone();
        let mut root = self.board.clone();
        let search_state = Arc::clone(&self.search_state);
        let evaluator = Arc::clone(&self.evaluator);
        let info_callback = self.info_callback.clone();
        let thread_stop = stop.clone();
        let thread_reported = Arc::clone(&reported);

        debug!("starting search with {limits:?}");

        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    let mut guard = search_state.lock();
                    search(
                        &mut search_board,
                        &mut guard,
                        evaluator.as_ref(),
                        &limits,
                        &thread_stop,
                        info_callback,
                    )
                }));

                let result = outcome.unwrap_or_else(|_| {
                    error!("search panicked, reporting the first legal move");
                    SearchResult {
                        best_move: root.legal_moves().first(),
                        score: 0,
                        depth: 0,
                        nodes: 0,
                    }
                });

                if wait_for_stop {
                    while !thread_stop.is_stopped() {
                        thread::sleep(Duration::from_millis(STOP_POLL_MS));
                    }
                }

                thread_reported.store(true, Ordering::Release);
                on_complete(result);
            })?;

        self.current_job = Some(SearchJob {
            stop,
            reported,
            handle,
        });
        Ok(())
    }
}

impl Drop for EngineController {
    fn drop(&mut self) {
        self.stop_search();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_search_reports_through_callback() {
        let mut controller = EngineController::new(1);
        let (tx, rx) = mpsc::channel();
        controller
            .start_search(SearchLimits::depth(2), false, move |result| {
                tx.send(result).unwrap();
            })
            .unwrap();
        let result = rx.recv_timeout(Duration::from_secs(30)).unwrap();
        assert!(result.best_move.is_some());
        assert_eq!(result.depth, 2);
        assert!(controller.is_searching());
        controller.stop_search();
        assert!(!controller.is_searching());
    }

    #[test]
    fn test_infinite_search_waits_for_stop() {
        let mut controller = EngineController::new(1);
        let (tx, rx) = mpsc::channel();
        controller
            .start_search(SearchLimits::depth(1), true, move |result| {
                tx.send(result).unwrap();
            })
            .unwrap();
        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
        assert!(!controller.reap_finished());
        controller.stop_search();
        assert!(rx.try_recv().unwrap().best_move.is_some());
    }

    #[test]
    fn test_reap_finished_joins_reported_job() {
        let mut controller = EngineController::new(1);
        let (tx, rx) = mpsc::channel();
        controller
            .start_search(SearchLimits::depth(1), false, move |result| {
                tx.send(result).unwrap();
            })
            .unwrap();
        rx.recv_timeout(Duration::from_secs(30)).unwrap();
        let mut reaped = false;
        for _ in 0..100 {
            if controller.reap_finished() {
                reaped = true;
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert!(reaped);
        assert!(!controller.is_searching());
    }

    #[test]
    fn test_search_leaves_position_untouched() {
        let mut controller = EngineController::new(1);
        let before = controller.board().to_fen();
        let (tx, rx) = mpsc::channel();
        controller
            .start_search(SearchLimits::depth(3), false, move |result| {
                tx.send(result).unwrap();
            })
            .unwrap();
        rx.recv_timeout(Duration::from_secs(30)).unwrap();
        controller.stop_search();
        assert_eq!(controller.board().to_fen(), before);
    }

    #[test]
    fn test_new_game_resets_board_and_tables() {
        let mut controller = EngineController::new(1);
        let board: Board = "4k3/8/8/8/8/8/8/4K2R w K - 0 1".parse().unwrap();
        controller.set_board(board);
        controller.search_state().lock().tt.store(
            7,
            3,
            10,
            crate::tt::BoundType::Exact,
            None,
        );
        controller.new_game();
        assert_eq!(controller.board().to_fen(), crate::board::START_FEN);
        assert!(controller.search_state().lock().tt.probe(7).is_none());
    }

    #[test]
    fn test_perft_on_current_position() {
        let mut controller = EngineController::new(1);
        assert_eq!(controller.perft(2), 400);
    }
}
