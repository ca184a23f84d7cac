//! Engine controller for managing search and game state.
//!
//! Runs searches on a background thread and turns `go` limits into a time
//! budget. The UCI session drives everything through this module.

mod controller;
pub mod time;

pub use controller::{EngineController, SearchJob};
pub use time::{search_limits, waits_for_stop, GoParams, TimeControl, DEFAULT_MOVES_TO_GO};
