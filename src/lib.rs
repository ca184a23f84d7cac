//! Bitboard chess engine speaking the UCI protocol.
//!
//! - [`board`]: position model, move generation, evaluation and search
//! - [`engine`]: background search thread and time management
//! - [`uci`]: protocol session and command parsing

pub mod board;
pub mod engine;
pub mod sync;
pub mod tt;
pub mod uci;
mod zobrist;

pub use board::{Board, Color, Move, Piece, Square};
pub use sync::StopFlag;
pub use tt::TranspositionTable;
pub use uci::{EngineConfig, UciSession};
