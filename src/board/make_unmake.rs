use std::ops::{Deref, DerefMut};

use crate::zobrist::ZOBRIST;

use super::{Board, CastlingRights, Color, Move, Piece, Square, UnmakeInfo};

/// Rook origin and destination for a castling move of `color`.
#[inline]
fn castling_rook_squares(color: Color, kingside: bool) -> (Square, Square) {
    let rank = color.back_rank();
    if kingside {
        (Square(rank, 7), Square(rank, 5))
    } else {
        (Square(rank, 0), Square(rank, 3))
    }
}

/// Drop the castling right tied to a rook corner when anything leaves or lands on it.
#[inline]
fn clear_corner_right(rights: &mut CastlingRights, sq: Square) {
    match (sq.rank(), sq.file()) {
        (0, 0) => rights.remove(Color::White, false),
        (0, 7) => rights.remove(Color::White, true),
        (7, 0) => rights.remove(Color::Black, false),
        (7, 7) => rights.remove(Color::Black, true),
        _ => {}
    }
}

impl Board {
    /// Apply a pseudo-legal move and return the token that reverts it.
    ///
    /// # Panics
    ///
    /// Panics if the origin square is empty, which means the move was not
    /// generated from this position.
    pub fn make_move(&mut self, mv: Move) -> UnmakeInfo {
        let us = self.side_to_move;
        let them = us.opponent();
        let from = mv.from();
        let to = mv.to();

        let moved_piece = match self.piece_at(from) {
            Some((color, piece)) if color == us => piece,
            _ => panic!("make_move: no {us} piece on {from} for {mv}"),
        };

        let previous_hash = self.hash;
        let previous_en_passant_target = self.en_passant_target;
        let previous_castling_rights = self.castling_rights;
        let previous_halfmove_clock = self.halfmove_clock;
        let previous_fullmove_number = self.fullmove_number;

        let mut hash = self.hash ^ ZOBRIST.side_to_move() ^ ZOBRIST.castling(self.castling_rights);
        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant(ep);
        }

        let captured = if mv.is_en_passant() {
            Some((Piece::Pawn, Square(from.rank(), to.file())))
        } else if mv.is_castling() {
            None
        } else {
            self.piece_at(to).map(|(_, piece)| (piece, to))
        };
        if let Some((piece, sq)) = captured {
            self.toggle_piece(sq, them, piece);
            hash ^= ZOBRIST.piece(them, piece, sq);
        }

        let placed = mv.promotion().unwrap_or(moved_piece);
        self.toggle_piece(from, us, moved_piece);
        self.toggle_piece(to, us, placed);
        hash ^= ZOBRIST.piece(us, moved_piece, from) ^ ZOBRIST.piece(us, placed, to);

        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(us, mv.is_castle_kingside());
            self.toggle_piece(rook_from, us, Piece::Rook);
            self.toggle_piece(rook_to, us, Piece::Rook);
            hash ^= ZOBRIST.piece(us, Piece::Rook, rook_from) ^ ZOBRIST.piece(us, Piece::Rook, rook_to);
        }

        self.en_passant_target = if mv.is_double_pawn_push() {
            Some(Square((from.rank() + to.rank()) / 2, from.file()))
        } else {
            None
        };
        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant(ep);
        }

        if moved_piece == Piece::King {
            self.castling_rights.remove_color(us);
        }
        clear_corner_right(&mut self.castling_rights, from);
        clear_corner_right(&mut self.castling_rights, to);
        hash ^= ZOBRIST.castling(self.castling_rights);

        if moved_piece == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = them;
        self.hash = hash;

        let previous_repetition_count = self.repetition_counts.get(hash);
        self.repetition_counts.increment(hash);

        UnmakeInfo {
            mv,
            moved_piece,
            captured,
            previous_en_passant_target,
            previous_castling_rights,
            previous_hash,
            previous_halfmove_clock,
            previous_fullmove_number,
            made_hash: hash,
            previous_repetition_count,
        }
    }

    /// Revert the most recent `make_move`.
    ///
    /// # Panics
    ///
    /// Panics if `info` does not belong to the last move made on this board.
    pub fn unmake_move(&mut self, info: UnmakeInfo) {
        assert_eq!(
            self.hash, info.made_hash,
            "unmake_move({}) called out of order",
            info.mv
        );
        self.repetition_counts
            .set(info.made_hash, info.previous_repetition_count);

        let us = self.side_to_move.opponent();
        let mv = info.mv;
        let placed = mv.promotion().unwrap_or(info.moved_piece);
        self.toggle_piece(mv.to(), us, placed);
        self.toggle_piece(mv.from(), us, info.moved_piece);

        if mv.is_castling() {
            let (rook_from, rook_to) = castling_rook_squares(us, mv.is_castle_kingside());
            self.toggle_piece(rook_to, us, Piece::Rook);
            self.toggle_piece(rook_from, us, Piece::Rook);
        }
        if let Some((piece, sq)) = info.captured {
            self.toggle_piece(sq, us.opponent(), piece);
        }

        self.side_to_move = us;
        self.en_passant_target = info.previous_en_passant_target;
        self.castling_rights = info.previous_castling_rights;
        self.halfmove_clock = info.previous_halfmove_clock;
        self.fullmove_number = info.previous_fullmove_number;
        self.hash = info.previous_hash;
    }

    /// Make `mv` for the lifetime of the returned guard; dropping the guard
    /// unmakes it, whichever way the enclosing scope is left.
    pub fn scoped(&mut self, mv: Move) -> ScopedMove<'_> {
        let info = self.make_move(mv);
        ScopedMove {
            board: self,
            info: Some(info),
        }
    }
}

/// A move held on a board until the guard is dropped.
pub struct ScopedMove<'a> {
    board: &'a mut Board,
    info: Option<UnmakeInfo>,
}

impl Deref for ScopedMove<'_> {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board
    }
}

impl DerefMut for ScopedMove<'_> {
    fn deref_mut(&mut self) -> &mut Board {
        self.board
    }
}

impl Drop for ScopedMove<'_> {
    fn drop(&mut self) {
        if let Some(info) = self.info.take() {
            self.board.unmake_move(info);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: &mut Board, text: &str) -> UnmakeInfo {
        board.make_move_uci(text).unwrap()
    }

    #[test]
    fn test_double_push_sets_en_passant() {
        let mut board = Board::new();
        let _ = play(&mut board, "e2e4");
        assert_eq!(board.en_passant_target(), Some(Square(2, 4)));
        let _ = play(&mut board, "g8f6");
        assert_eq!(board.en_passant_target(), None);
        assert_eq!(board.fullmove_number(), 2);
        assert_eq!(board.halfmove_clock(), 1);
    }

    #[test]
    fn test_en_passant_capture_and_unmake() {
        let mut board: Board = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2".parse().unwrap();
        let before = board.to_fen();
        let info = play(&mut board, "e5d6");
        assert_eq!(board.piece_at(Square(4, 3)), None);
        assert_eq!(board.piece_at(Square(5, 3)), Some((Color::White, Piece::Pawn)));
        assert_eq!(board.hash(), board.compute_hash());
        board.unmake_move(info);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_castling_moves_rook_and_clears_rights() {
        let mut board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let before = board.to_fen();
        let info = play(&mut board, "e1g1");
        assert_eq!(board.piece_at(Square(0, 5)), Some((Color::White, Piece::Rook)));
        assert_eq!(board.piece_at(Square(0, 7)), None);
        assert_eq!(board.castling_rights().to_fen_field(), "kq");
        assert_eq!(board.hash(), board.compute_hash());
        board.unmake_move(info);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_rook_capture_clears_opponent_right() {
        let mut board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let _ = play(&mut board, "a1a8");
        assert_eq!(board.castling_rights().to_fen_field(), "Kk");
        assert_eq!(board.hash(), board.compute_hash());
    }

    #[test]
    fn test_promotion_capture_unmake() {
        let mut board: Board = "1r5k/P7/8/8/8/8/8/K7 w - - 5 40".parse().unwrap();
        let before = board.to_fen();
        let info = play(&mut board, "a7b8q");
        assert_eq!(board.piece_at(Square(7, 1)), Some((Color::White, Piece::Queen)));
        assert_eq!(board.halfmove_clock(), 0);
        board.unmake_move(info);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn test_scoped_move_restores_on_drop() {
        let mut board = Board::new();
        let hash = board.hash();
        let mv = board.parse_move("g1f3").unwrap();
        {
            let inner = board.scoped(mv);
            assert_ne!(inner.hash(), hash);
            assert_eq!(inner.side_to_move(), Color::Black);
        }
        assert_eq!(board.hash(), hash);
        assert_eq!(board.to_fen(), Board::new().to_fen());
    }

    #[test]
    #[should_panic(expected = "out of order")]
    fn test_unmake_out_of_order_panics() {
        let mut board = Board::new();
        let first = play(&mut board, "e2e4");
        let _second = play(&mut board, "e7e5");
        board.unmake_move(first);
    }
}
