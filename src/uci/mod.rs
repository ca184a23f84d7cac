//! Universal Chess Interface (UCI) protocol implementation.
//!
//! `UciSession` reads one command line at a time, owns the position and at
//! most one background search, and writes every response line through a
//! shared writer.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info, warn};
use parking_lot::Mutex;

use crate::board::{Board, SearchInfoCallback, SearchIterationInfo};
use crate::engine::{search_limits, waits_for_stop, EngineController, GoParams};

pub mod command;
mod error;
mod logger;
pub mod options;
pub mod report;

pub use command::{parse_uci_command, PositionBase, PositionCommand, UciCommand};
pub use error::UciError;
pub use logger::UciLogger;
pub use options::{EngineConfig, UciOptionAction, UciOptions};

/// Protocol state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Ready,
    NewGame,
    PositionSet,
    Thinking,
    Terminated,
}

/// Result of processing a protocol command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Quit,
}

/// Write one response line and flush it while holding the lock.
fn write_line<W: Write>(out: &Mutex<W>, line: &str) -> io::Result<()> {
    let mut out = out.lock();
    writeln!(out, "{line}")?;
    out.flush()
}

/// Build a position from a `position` command without touching the current
/// one, so a bad move leaves the session's position as it was.
pub fn build_position(cmd: &PositionCommand) -> Result<Board, UciError> {
    let mut board = match &cmd.base {
        PositionBase::StartPos => Board::new(),
        PositionBase::Fen(fen) => Board::try_from_fen(fen)?,
    };
    for (index, text) in cmd.moves.iter().enumerate() {
        board
            .play_uci(text)
            .map_err(|error| UciError::InvalidMove { index, error })?;
    }
    Ok(board)
}

pub struct UciSession<W: Write + Send + 'static> {
    config: EngineConfig,
    options: UciOptions,
    controller: EngineController,
    out: Arc<Mutex<W>>,
    state: SessionState,
    debug: bool,
}

impl<W: Write + Send + 'static> UciSession<W> {
    #[must_use]
    pub fn new(config: EngineConfig, out: W) -> Self {
        Self::with_shared_output(config, Arc::new(Mutex::new(out)))
    }

    /// Session writing through a writer the caller keeps a handle to.
    #[must_use]
    pub fn with_shared_output(config: EngineConfig, out: Arc<Mutex<W>>) -> Self {
        let options = UciOptions::new(&config);
        let mut controller = EngineController::new(options.hash_mb);

        let info_out = Arc::clone(&out);
        let on_iteration: SearchInfoCallback = Arc::new(move |info: &SearchIterationInfo| {
            if let Err(e) = write_line(&info_out, &report::format_info(info)) {
                error!("failed to write search info: {e}");
            }
        });
        controller.set_info_callback(Some(on_iteration));

        UciSession {
            config,
            options,
            controller,
            out,
            state: SessionState::Uninitialized,
            debug: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    #[must_use]
    pub fn options(&self) -> &UciOptions {
        &self.options
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        self.controller.board()
    }

    #[must_use]
    pub fn controller(&self) -> &EngineController {
        &self.controller
    }

    /// Print the `<name> by <author>` line.
    pub fn greet(&self) -> io::Result<()> {
        write_line(&self.out, &self.config.greeting())
    }

    /// Read commands until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> io::Result<()> {
        for line in input.lines() {
            if self.handle_line(&line?)? == CommandResult::Quit {
                return Ok(());
            }
        }
        debug!("end of input, shutting down");
        self.quit();
        Ok(())
    }

    /// Process one input line. Only a failure to write to the output is an
    /// error; bad commands are logged and leave the session as it was.
    pub fn handle_line(&mut self, line: &str) -> io::Result<CommandResult> {
        if self.state == SessionState::Terminated {
            return Ok(CommandResult::Quit);
        }
        self.reap_finished_search();

        let responses = match parse_uci_command(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Ok(Vec::new()),
            Err(e) => Err(e),
        };
        let responses = responses.unwrap_or_else(|e| {
            warn!("{e}");
            Vec::new()
        });
        for response in &responses {
            write_line(&self.out, response)?;
        }

        Ok(if self.state == SessionState::Terminated {
            CommandResult::Quit
        } else {
            CommandResult::Continue
        })
    }

    /// A search that ended by itself has already printed `bestmove`.
    fn reap_finished_search(&mut self) {
        if self.state == SessionState::Thinking && self.controller.reap_finished() {
            self.state = SessionState::PositionSet;
        }
    }

    fn ensure_idle(&self, command: &'static str) -> Result<(), UciError> {
        if self.state == SessionState::Thinking {
            return Err(UciError::Busy { command });
        }
        Ok(())
    }

    fn execute(&mut self, command: UciCommand) -> Result<Vec<String>, UciError> {
        match command {
            UciCommand::Uci => Ok(self.identify()),
            UciCommand::Debug(Some(on)) => {
                self.debug = on;
                UciLogger::set_debug(on);
                Ok(Vec::new())
            }
            UciCommand::Debug(None) => Ok(Vec::new()),
            UciCommand::IsReady => Ok(vec!["readyok".to_string()]),
            UciCommand::SetOption { name, value } => {
                self.ensure_idle("setoption")?;
                self.set_option(&name, value.as_deref())?;
                Ok(Vec::new())
            }
            UciCommand::UciNewGame => {
                self.ensure_idle("ucinewgame")?;
                self.controller.new_game();
                self.state = SessionState::NewGame;
                Ok(Vec::new())
            }
            UciCommand::Position(cmd) => {
                self.ensure_idle("position")?;
                let board = build_position(&cmd)?;
                self.controller.set_board(board);
                self.state = SessionState::PositionSet;
                Ok(Vec::new())
            }
            UciCommand::Go(go) => {
                self.ensure_idle("go")?;
                self.go(&go)
            }
            UciCommand::Stop => {
                if self.state == SessionState::Thinking {
                    self.controller.stop_search();
                    self.state = SessionState::PositionSet;
                }
                Ok(Vec::new())
            }
            UciCommand::Quit => {
                self.quit();
                Ok(Vec::new())
            }
            UciCommand::Perft(depth) => {
                self.ensure_idle("perft")?;
                let start = Instant::now();
                let nodes = self.controller.perft(depth);
                Ok(vec![report::format_perft(depth, nodes, start.elapsed())])
            }
            UciCommand::Unknown(text) => {
                debug!("ignoring unknown command '{text}'");
                Ok(Vec::new())
            }
        }
    }

    fn identify(&mut self) -> Vec<String> {
        if self.state == SessionState::Uninitialized {
            self.state = SessionState::Ready;
        }
        let mut lines = vec![
            format!("id name {}", self.config.name),
            format!("id author {}", self.config.author),
        ];
        lines.extend(self.options.option_lines());
        lines.push("uciok".to_string());
        lines
    }

    fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), UciError> {
        match self.options.apply_setoption(name, value)? {
            Some(UciOptionAction::ResizeHash(mb)) => {
                info!("resizing transposition table to {mb} MB");
                self.controller.resize_hash(mb);
            }
            Some(UciOptionAction::ClearHash) => self.controller.clear_tables(),
            None => {}
        }
        Ok(())
    }

    fn go(&mut self, go: &GoParams) -> Result<Vec<String>, UciError> {
        if !self.controller.has_legal_moves() {
            info!("no legal moves in {}", self.controller.board().to_fen());
            return Ok(vec![report::format_bestmove(None)]);
        }

        let side = self.controller.board().side_to_move();
        let limits = search_limits(go, side, self.options.move_overhead_ms);
        let wait_for_stop = waits_for_stop(go, &limits);

        let out = Arc::clone(&self.out);
        self.controller
            .start_search(limits, wait_for_stop, move |result| {
                if let Err(e) = write_line(&out, &report::format_bestmove(result.best_move)) {
                    error!("failed to write bestmove: {e}");
                }
            })?;
        self.state = SessionState::Thinking;
        Ok(Vec::new())
    }

    fn quit(&mut self) {
        self.controller.stop_search();
        self.state = SessionState::Terminated;
    }
}
