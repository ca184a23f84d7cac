use super::super::attack_tables::PAWN_ATTACKS;
use super::super::{Bitboard, Board, Color, Move, MoveList, Square, PROMOTION_PIECES};

impl Board {
    pub(super) fn push_pawn_moves(&self, from: Square, list: &mut MoveList) {
        let us = self.side_to_move;
        let them = us.opponent();
        let (forward, start_rank): (isize, usize) = match us {
            Color::White => (1, 1),
            Color::Black => (-1, 6),
        };
        let promotion_rank = us.promotion_rank();

        let one_rank = from.rank() as isize + forward;
        if !(0..8).contains(&one_rank) {
            return;
        }
        let one = Square(one_rank as usize, from.file());
        if !self.all_occupied.contains(one) {
            if one.rank() == promotion_rank {
                for piece in PROMOTION_PIECES {
                    list.push(Move::promotion_to(from, one, piece, false));
                }
            } else {
                list.push(Move::quiet(from, one));
                if from.rank() == start_rank {
                    let two = Square((one_rank + forward) as usize, from.file());
                    if !self.all_occupied.contains(two) {
                        list.push(Move::double_pawn_push(from, two));
                    }
                }
            }
        }

        let attacks = Bitboard(PAWN_ATTACKS[us.index()][from.index()]);
        for to in attacks & self.occupied[them.index()] {
            if to.rank() == promotion_rank {
                for piece in PROMOTION_PIECES {
                    list.push(Move::promotion_to(from, to, piece, true));
                }
            } else {
                list.push(Move::capture(from, to));
            }
        }

        if let Some(ep) = self.en_passant_target {
            if attacks.contains(ep) {
                list.push(Move::en_passant(from, ep));
            }
        }
    }
}
