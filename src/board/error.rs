//! Error types for board parsing.

use std::fmt;

use super::{Color, Square};

/// FEN parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// Fewer than the four mandatory fields
    TooFewParts { found: usize },
    /// Piece placement does not have exactly 8 ranks
    WrongRankCount { found: usize },
    /// Unknown piece letter in the placement field
    InvalidPiece { char: char },
    /// A rank describes more than 8 squares
    TooManyFiles { rank: usize, files: usize },
    /// A rank describes fewer than 8 squares
    TooFewFiles { rank: usize, files: usize },
    /// Side to move is not `w` or `b`
    InvalidSideToMove { found: String },
    /// Unknown letter in the castling field
    InvalidCastling { char: char },
    /// En passant field is neither `-` nor a square behind a pawn that just
    /// double-pushed
    InvalidEnPassant { found: String },
    /// Halfmove clock or fullmove number is not a number
    InvalidClock { found: String },
    /// A side does not have exactly one king
    KingCount { color: Color, found: u32 },
    /// Pawn on the first or last rank
    PawnOnBackRank { square: Square },
    /// The side not to move is in check
    OpponentInCheck { color: Color },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 fields, found {found}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "FEN placement must have 8 ranks, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::TooManyFiles { rank, files } => {
                write!(f, "Too many files ({files}) in rank {rank}")
            }
            FenError::TooFewFiles { rank, files } => {
                write!(f, "Too few files ({files}) in rank {rank}")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::InvalidClock { found } => {
                write!(f, "Invalid move counter '{found}'")
            }
            FenError::KingCount { color, found } => {
                write!(f, "Expected one {color} king, found {found}")
            }
            FenError::PawnOnBackRank { square } => {
                write!(f, "Pawn on back rank square {square}")
            }
            FenError::OpponentInCheck { color } => {
                write!(f, "{color} is in check but not to move")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Move text parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move text must be 4 or 5 characters
    InvalidLength { len: usize },
    /// Origin or destination is not a square
    InvalidSquare { notation: String },
    /// Promotion suffix is not one of n, b, r, q
    InvalidPromotion { char: char },
    /// Well-formed, but not legal in the current position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Square text parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    InvalidLength { len: usize },
    InvalidFile { file: char },
    InvalidRank { rank: char },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidLength { len } => {
                write!(f, "Square must be 2 characters, found {len}")
            }
            SquareError::InvalidFile { file } => write!(f, "Invalid file '{file}'"),
            SquareError::InvalidRank { rank } => write!(f, "Invalid rank '{rank}'"),
        }
    }
}

impl std::error::Error for SquareError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fen_error_too_few_parts() {
        let err = FenError::TooFewParts { found: 2 };
        assert!(err.to_string().contains('2'));
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_fen_error_invalid_piece() {
        let err = FenError::InvalidPiece { char: 'z' };
        assert!(err.to_string().contains("'z'"));
    }

    #[test]
    fn test_fen_error_files() {
        let err = FenError::TooFewFiles { rank: 3, files: 7 };
        assert!(err.to_string().contains('7'));
        let err = FenError::TooManyFiles { rank: 3, files: 9 };
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn test_fen_error_invalid_side() {
        let err = FenError::InvalidSideToMove {
            found: "X".to_string(),
        };
        assert!(err.to_string().contains("'X'"));
    }

    #[test]
    fn test_move_error_messages() {
        assert!(MoveParseError::InvalidLength { len: 3 }
            .to_string()
            .contains('3'));
        let err = MoveParseError::IllegalMove {
            notation: "e2e5".to_string(),
        };
        assert!(err.to_string().contains("e2e5"));
        assert!(MoveParseError::InvalidPromotion { char: 'k' }
            .to_string()
            .contains("'k'"));
    }

    #[test]
    fn test_square_error_messages() {
        assert!(SquareError::InvalidFile { file: 'x' }
            .to_string()
            .contains('x'));
        assert!(SquareError::InvalidRank { rank: '9' }
            .to_string()
            .contains('9'));
    }
}
