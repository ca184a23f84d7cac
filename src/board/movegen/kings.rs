use super::super::attack_tables::{
    bishop_attacks, rook_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS,
};
use super::super::{Bitboard, Board, Color, Move, MoveList, Piece, Square};

impl Board {
    /// Single steps plus castling. Castling here only checks rights, the
    /// rook's presence and empty squares between king and rook; attacked
    /// squares are filtered by the legality pass.
    pub(super) fn push_king_moves(&self, from: Square, list: &mut MoveList) {
        self.push_targets(from, Bitboard(KING_ATTACKS[from.index()]), list);

        let us = self.side_to_move;
        let rank = us.back_rank();
        if from != Square(rank, 4) {
            return;
        }
        let rooks = self.pieces(us, Piece::Rook);
        let empty = |files: &[usize]| {
            files
                .iter()
                .all(|&file| !self.all_occupied.contains(Square(rank, file)))
        };
        if self.castling_rights.has(us, true) && rooks.contains(Square(rank, 7)) && empty(&[5, 6])
        {
            list.push(Move::castle_kingside(from, Square(rank, 6)));
        }
        if self.castling_rights.has(us, false)
            && rooks.contains(Square(rank, 0))
            && empty(&[1, 2, 3])
        {
            list.push(Move::castle_queenside(from, Square(rank, 2)));
        }
    }

    /// True if any piece of `by` attacks `sq` in the current position.
    #[must_use]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let idx = sq.index();
        let occ = self.all_occupied.0;
        let theirs = |piece: Piece| self.pieces(by, piece).0;

        PAWN_ATTACKS[by.opponent().index()][idx] & theirs(Piece::Pawn) != 0
            || KNIGHT_ATTACKS[idx] & theirs(Piece::Knight) != 0
            || KING_ATTACKS[idx] & theirs(Piece::King) != 0
            || bishop_attacks(idx, occ) & (theirs(Piece::Bishop) | theirs(Piece::Queen)) != 0
            || rook_attacks(idx, occ) & (theirs(Piece::Rook) | theirs(Piece::Queen)) != 0
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, Piece::King).lsb()
    }

    /// True if `color`'s king is attacked by any opposing piece.
    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_square_attacked(king, color.opponent()))
    }
}
