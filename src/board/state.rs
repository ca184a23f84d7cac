use std::collections::HashMap;

use crate::zobrist::ZOBRIST;

use super::{Bitboard, CastlingRights, Color, Move, Piece, Square};

/// Everything `unmake_move` needs to restore the position before `mv`.
#[derive(Clone, Debug)]
#[must_use = "a made move must be unmade with this token"]
pub struct UnmakeInfo {
    pub(crate) mv: Move,
    pub(crate) moved_piece: Piece,
    pub(crate) captured: Option<(Piece, Square)>,
    pub(crate) previous_en_passant_target: Option<Square>,
    pub(crate) previous_castling_rights: CastlingRights,
    pub(crate) previous_hash: u64,
    pub(crate) previous_halfmove_clock: u32,
    pub(crate) previous_fullmove_number: u32,
    pub(crate) made_hash: u64,
    pub(crate) previous_repetition_count: u32,
}

impl UnmakeInfo {
    /// The move this token reverts.
    #[must_use]
    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// Occurrence count of each position hash along the game and the line being searched.
#[derive(Clone, Debug, Default)]
pub(crate) struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub(crate) fn get(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    pub(crate) fn set(&mut self, hash: u64, count: u32) {
        if count == 0 {
            self.counts.remove(&hash);
        } else {
            self.counts.insert(hash, count);
        }
    }

    pub(crate) fn increment(&mut self, hash: u64) -> u32 {
        let next = self.get(hash).saturating_add(1);
        self.set(hash, next);
        next
    }
}

/// A chess position: piece placement, side to move, rights, clocks and history.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) hash: u64,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) repetition_counts: RepetitionTable,
}

impl Board {
    /// The standard initial position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.into_iter().enumerate() {
            board.toggle_piece(Square(0, file), Color::White, piece);
            board.toggle_piece(Square(1, file), Color::White, Piece::Pawn);
            board.toggle_piece(Square(6, file), Color::Black, Piece::Pawn);
            board.toggle_piece(Square(7, file), Color::Black, piece);
        }
        board.castling_rights = CastlingRights::all();
        board.reset_hash();
        board
    }

    pub(crate) fn empty() -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            side_to_move: Color::White,
            en_passant_target: None,
            castling_rights: CastlingRights::none(),
            hash: 0,
            halfmove_clock: 0,
            fullmove_number: 1,
            repetition_counts: RepetitionTable::default(),
        }
    }

    /// Recompute the hash from scratch and restart the repetition history at it.
    pub(crate) fn reset_hash(&mut self) {
        self.hash = self.compute_hash();
        self.repetition_counts = RepetitionTable::default();
        self.repetition_counts.set(self.hash, 1);
    }

    pub(crate) fn compute_hash(&self) -> u64 {
        let mut hash = 0;
        for color in Color::BOTH {
            for piece in Piece::ALL {
                for sq in self.pieces[color.index()][piece.index()] {
                    hash ^= ZOBRIST.piece(color, piece, sq);
                }
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.side_to_move();
        }
        hash ^= ZOBRIST.castling(self.castling_rights);
        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant(ep);
        }
        hash
    }

    /// Add or remove a piece. The hash is maintained by the caller.
    #[inline]
    pub(crate) fn toggle_piece(&mut self, sq: Square, color: Color, piece: Piece) {
        let bit = Bitboard::from_square(sq);
        self.pieces[color.index()][piece.index()] = self.pieces[color.index()][piece.index()] ^ bit;
        self.occupied[color.index()] = self.occupied[color.index()] ^ bit;
        self.all_occupied = self.all_occupied ^ bit;
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        if !self.all_occupied.contains(sq) {
            return None;
        }
        let color = if self.occupied[Color::White.index()].contains(sq) {
            Color::White
        } else {
            Color::Black
        };
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[color.index()][piece.index()].contains(sq))
            .map(|piece| (color, piece))
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[must_use]
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// True if the current position already occurred earlier in the game or line.
    #[must_use]
    pub fn is_repetition(&self) -> bool {
        self.repetition_counts.get(self.hash) >= 2
    }

    /// Draw by the fifty-move rule, threefold repetition or dead material.
    #[must_use]
    pub fn is_draw_by_rule(&self) -> bool {
        self.halfmove_clock >= 100
            || self.repetition_counts.get(self.hash) >= 3
            || self.is_insufficient_material()
    }

    /// Neither side can possibly mate: bare kings, a single minor piece,
    /// or bishops that all stand on one square color.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let both = |piece: Piece| {
            self.pieces(Color::White, piece) | self.pieces(Color::Black, piece)
        };
        if !(both(Piece::Pawn) | both(Piece::Rook) | both(Piece::Queen)).is_empty() {
            return false;
        }
        let knights = both(Piece::Knight).popcount();
        let bishops = both(Piece::Bishop);
        match (knights, bishops.popcount()) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (0, _) => {
                (bishops & Bitboard::LIGHT_SQUARES).is_empty()
                    || (bishops & Bitboard::DARK_SQUARES).is_empty()
            }
            _ => false,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
