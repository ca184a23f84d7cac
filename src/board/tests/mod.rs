//! Board module tests.
//!
//! Tests are organized into separate files by category:
//! - `perft.rs` - Move generation counts for reference positions
//! - `draw.rs` - Draw detection (50-move, repetition, insufficient material)
//! - `make_unmake.rs` - Make/unmake move correctness
//! - `search.rs` - Search results on small tactical positions
//! - `proptest.rs` - Property-based tests

mod draw;
mod make_unmake;
mod proptest;
