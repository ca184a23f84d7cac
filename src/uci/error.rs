use std::fmt;
use std::io;

use crate::board::{FenError, MoveParseError};

/// Failures while handling a UCI command. None of them ends the session.
#[derive(Debug)]
pub enum UciError {
    /// Invalid FEN string
    InvalidFen(FenError),
    /// Move `index` (zero-based) of the move list could not be played
    InvalidMove { index: usize, error: MoveParseError },
    /// `position fen` without a FEN
    MissingFen,
    /// A numeric argument is missing or not a number
    InvalidNumber { keyword: String, token: Option<String> },
    /// Command not allowed while a search is running
    Busy { command: &'static str },
    /// The search thread could not be started
    Spawn(io::Error),
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
            UciError::InvalidMove { index, error } => {
                write!(f, "Invalid move #{}: {error}", index + 1)
            }
            UciError::MissingFen => write!(f, "Missing FEN after 'position fen'"),
            UciError::InvalidNumber {
                keyword,
                token: Some(token),
            } => write!(f, "Invalid number '{token}' for '{keyword}'"),
            UciError::InvalidNumber {
                keyword,
                token: None,
            } => write!(f, "Missing number after '{keyword}'"),
            UciError::Busy { command } => {
                write!(f, "Cannot handle '{command}' while searching")
            }
            UciError::Spawn(e) => write!(f, "Failed to start search thread: {e}"),
        }
    }
}

impl std::error::Error for UciError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UciError::InvalidFen(e) => Some(e),
            UciError::InvalidMove { error, .. } => Some(error),
            UciError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

impl From<io::Error> for UciError {
    fn from(e: io::Error) -> Self {
        UciError::Spawn(e)
    }
}
