//! Core chess types.
//!
//! - `Piece` and `Color`: piece kinds and sides
//! - `Square`: (rank, file) board coordinate
//! - `Bitboard`: 64-bit square set
//! - `Move`, `MoveList`, `ScoredMoveList`: packed moves and move containers
//! - `CastlingRights`: castling state

mod bitboard;
mod castling;
mod moves;
mod piece;
mod square;

pub use bitboard::{Bitboard, BitboardIter};
pub use castling::CastlingRights;
pub use moves::{Move, MoveList, MoveListIntoIter, OrderedMoves, ScoredMove, ScoredMoveList};
pub use piece::{Color, Piece};
pub use square::Square;

pub(crate) use piece::PROMOTION_PIECES;
