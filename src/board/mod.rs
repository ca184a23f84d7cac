//! Chess board representation and game logic.
//!
//! Uses bitboards for move generation and evaluation. Supports the full rules
//! of chess including castling, en passant, promotions and the draw rules.
//!
//! # Example
//! ```
//! use uci_chess_engine::board::Board;
//!
//! let mut board = Board::new();
//! let moves = board.legal_moves();
//! assert_eq!(moves.len(), 20);
//! ```

mod attack_tables;
mod error;
mod evaluation;
mod fen;
mod make_unmake;
mod movegen;
pub mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError, SquareError};
pub use evaluation::{Evaluator, StandardEvaluator};
pub use fen::START_FEN;
pub use make_unmake::ScopedMove;
pub use state::{Board, UnmakeInfo};
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, MoveListIntoIter, OrderedMoves,
    Piece, ScoredMove, ScoredMoveList, Square,
};

pub use search::{
    search, SearchInfoCallback, SearchIterationInfo, SearchLimits, SearchResult, SearchState,
    MATE_SCORE,
};

pub(crate) use types::PROMOTION_PIECES;
