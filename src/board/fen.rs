use std::str::FromStr;

use super::error::{FenError, MoveParseError};
use super::{Board, CastlingRights, Color, Move, Piece, Square, UnmakeInfo};

/// FEN of the standard initial position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Board {
    /// Parse a position from FEN.
    ///
    /// The placement, side, castling and en passant fields are required; the
    /// halfmove clock and fullmove number default to `0 1` when missing.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut board = Board::empty();
        parse_placement(&mut board, parts[0])?;

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        board.castling_rights = CastlingRights::from_fen_field(parts[2])
            .map_err(|char| FenError::InvalidCastling { char })?;

        board.en_passant_target = match parts[3] {
            "-" => None,
            text => {
                let invalid = || FenError::InvalidEnPassant {
                    found: text.to_string(),
                };
                let sq: Square = text.parse().map_err(|_| invalid())?;
                if !en_passant_consistent(&board, sq) {
                    return Err(invalid());
                }
                Some(sq)
            }
        };

        board.halfmove_clock = parse_counter(parts.get(4).copied(), 0)?;
        board.fullmove_number = parse_counter(parts.get(5).copied(), 1)?.max(1);

        for color in Color::BOTH {
            let found = board.pieces(color, Piece::King).popcount();
            if found != 1 {
                return Err(FenError::KingCount { color, found });
            }
            let misplaced = board
                .pieces(color, Piece::Pawn)
                .into_iter()
                .find(|sq| sq.rank() == 0 || sq.rank() == 7);
            if let Some(square) = misplaced {
                return Err(FenError::PawnOnBackRank { square });
            }
        }

        let waiting = board.side_to_move.opponent();
        if board.is_in_check(waiting) {
            return Err(FenError::OpponentInCheck { color: waiting });
        }

        board.reset_hash();
        Ok(board)
    }

    /// Six-field FEN of the current position.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square(rank, file)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let side = match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let ep = self
            .en_passant_target
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{placement} {side} {} {ep} {} {}",
            self.castling_rights.to_fen_field(),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    /// Resolve UCI move text (`e2e4`, `e7e8q`) against the legal moves.
    pub fn parse_move(&mut self, text: &str) -> Result<Move, MoveParseError> {
        if !(4..=5).contains(&text.len()) {
            return Err(MoveParseError::InvalidLength { len: text.len() });
        }
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: text.to_string(),
        };
        if !text.is_ascii() {
            return Err(invalid_square());
        }
        let from: Square = text[0..2].parse().map_err(|_| invalid_square())?;
        let to: Square = text[2..4].parse().map_err(|_| invalid_square())?;

        let promotion = match text[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(piece @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => {
                    Some(piece)
                }
                _ => return Err(MoveParseError::InvalidPromotion { char: c }),
            },
        };

        self.legal_moves()
            .into_iter()
            .find(|mv| mv.from() == from && mv.to() == to && mv.promotion() == promotion)
            .ok_or_else(|| MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
    }

    /// Parse and play a move given as UCI text.
    pub fn make_move_uci(&mut self, text: &str) -> Result<UnmakeInfo, MoveParseError> {
        let mv = self.parse_move(text)?;
        Ok(self.make_move(mv))
    }

    /// Parse and play a move for good, as when replaying a game record.
    pub fn play_uci(&mut self, text: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(text)?;
        let _ = self.make_move(mv);
        Ok(mv)
    }
}

/// The target must sit behind an enemy pawn that could have just made a
/// double push: both the target and the pawn's origin square are empty.
fn en_passant_consistent(board: &Board, sq: Square) -> bool {
    let us = board.side_to_move;
    let (target_rank, pawn_rank, origin_rank) = match us {
        Color::White => (5, 4, 6),
        Color::Black => (2, 3, 1),
    };
    sq.rank() == target_rank
        && board.piece_at(Square(pawn_rank, sq.file())) == Some((us.opponent(), Piece::Pawn))
        && board.piece_at(sq).is_none()
        && board.piece_at(Square(origin_rank, sq.file())).is_none()
}

fn parse_placement(board: &mut Board, placement: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }
    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i;
        let mut file = 0usize;
        for c in rank_str.chars() {
            if let Some(skip @ 1..=8) = c.to_digit(10) {
                file += skip as usize;
            } else {
                let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                if file >= 8 {
                    return Err(FenError::TooManyFiles {
                        rank: rank + 1,
                        files: file + 1,
                    });
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                board.toggle_piece(Square(rank, file), color, piece);
                file += 1;
            }
        }
        if file > 8 {
            return Err(FenError::TooManyFiles {
                rank: rank + 1,
                files: file,
            });
        }
        if file < 8 {
            return Err(FenError::TooFewFiles {
                rank: rank + 1,
                files: file,
            });
        }
    }
    Ok(())
}

fn parse_counter(field: Option<&str>, default: u32) -> Result<u32, FenError> {
    match field {
        None => Ok(default),
        Some(text) => text.parse().map_err(|_| FenError::InvalidClock {
            found: text.to_string(),
        }),
    }
}

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Board::try_from_fen(s)
    }
}
