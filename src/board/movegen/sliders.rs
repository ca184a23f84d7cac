use super::super::attack_tables::{bishop_attacks, queen_attacks, rook_attacks};
use super::super::{Bitboard, Board, MoveList, Piece, Square};

impl Board {
    /// Bishop, rook and queen moves; each ray stops at the first blocker.
    pub(super) fn push_slider_moves(&self, from: Square, piece: Piece, list: &mut MoveList) {
        let occ = self.all_occupied.0;
        let attacks = match piece {
            Piece::Bishop => bishop_attacks(from.index(), occ),
            Piece::Rook => rook_attacks(from.index(), occ),
            _ => queen_attacks(from.index(), occ),
        };
        self.push_targets(from, Bitboard(attacks), list);
    }
}
