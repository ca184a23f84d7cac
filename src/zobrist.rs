//! Zobrist hashing keys.
//!
//! Keys come from a fixed-seed generator so hashes are identical across runs,
//! which keeps repetition detection and search results reproducible.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{CastlingRights, Color, Piece, Square};

const ZOBRIST_SEED: u64 = 1_234_567_890;

pub(crate) struct ZobristKeys {
    // piece_keys[color][piece][square]
    piece_keys: [[[u64; 64]; 6]; 2],
    black_to_move_key: u64,
    // castling_keys[color][side], side 0 = kingside, 1 = queenside
    castling_keys: [[u64; 2]; 2],
    // only the file of the en passant target matters
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut piece_keys = [[[0; 64]; 6]; 2];
        for key in piece_keys.iter_mut().flatten().flatten() {
            *key = rng.gen();
        }
        let black_to_move_key = rng.gen();
        let mut castling_keys = [[0; 2]; 2];
        for key in castling_keys.iter_mut().flatten() {
            *key = rng.gen();
        }
        let mut en_passant_keys = [0; 8];
        for key in &mut en_passant_keys {
            *key = rng.gen();
        }
        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    pub(crate) fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[color.index()][piece.index()][sq.index()]
    }

    #[inline]
    pub(crate) fn side_to_move(&self) -> u64 {
        self.black_to_move_key
    }

    /// Combined key of every right present in `rights`.
    pub(crate) fn castling(&self, rights: CastlingRights) -> u64 {
        let mut key = 0;
        for color in Color::BOTH {
            for (side, kingside) in [true, false].into_iter().enumerate() {
                if rights.has(color, kingside) {
                    key ^= self.castling_keys[color.index()][side];
                }
            }
        }
        key
    }

    #[inline]
    pub(crate) fn en_passant(&self, target: Square) -> u64 {
        self.en_passant_keys[target.file()]
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_distinct() {
        let a = ZOBRIST.piece(Color::White, Piece::Pawn, Square(1, 4));
        let b = ZOBRIST.piece(Color::Black, Piece::Pawn, Square(1, 4));
        let c = ZOBRIST.piece(Color::White, Piece::Knight, Square(1, 4));
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(ZOBRIST.side_to_move(), 0);
    }

    #[test]
    fn test_castling_key_composes() {
        let mut rights = CastlingRights::all();
        let all = ZOBRIST.castling(rights);
        rights.remove(Color::White, true);
        let without = ZOBRIST.castling(rights);
        let mut only = CastlingRights::none();
        only.set(Color::White, true);
        assert_eq!(all ^ without, ZOBRIST.castling(only));
        assert_eq!(ZOBRIST.castling(CastlingRights::none()), 0);
    }
}
