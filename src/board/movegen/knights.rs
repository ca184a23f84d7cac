use super::super::attack_tables::KNIGHT_ATTACKS;
use super::super::{Bitboard, Board, MoveList, Square};

impl Board {
    pub(super) fn push_knight_moves(&self, from: Square, list: &mut MoveList) {
        self.push_targets(from, Bitboard(KNIGHT_ATTACKS[from.index()]), list);
    }
}
