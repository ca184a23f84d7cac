//! Move generation.
//!
//! Pseudo-legal moves come from per-piece generators; legality is decided
//! by making each move and testing whether the mover's king is attacked.

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::attack_tables::{
    bishop_attacks, queen_attacks, rook_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS,
};
use super::{Bitboard, Board, Color, Move, MoveList, Piece, ScoredMoveList, Square};

/// Squares attacked by `piece` of `color` standing on `sq` with occupancy `occ`.
#[inline]
#[must_use]
pub(crate) fn attacks_from(piece: Piece, color: Color, sq: Square, occ: u64) -> u64 {
    let idx = sq.index();
    match piece {
        Piece::Pawn => PAWN_ATTACKS[color.index()][idx],
        Piece::Knight => KNIGHT_ATTACKS[idx],
        Piece::Bishop => bishop_attacks(idx, occ),
        Piece::Rook => rook_attacks(idx, occ),
        Piece::Queen => queen_attacks(idx, occ),
        Piece::King => KING_ATTACKS[idx],
    }
}

impl Board {
    /// Quiet moves to empty targets, captures to enemy-occupied ones.
    fn push_targets(&self, from: Square, targets: Bitboard, list: &mut MoveList) {
        let them = self.occupied[self.side_to_move.opponent().index()];
        for to in targets & !self.occupied[self.side_to_move.index()] {
            if them.contains(to) {
                list.push(Move::capture(from, to));
            } else {
                list.push(Move::quiet(from, to));
            }
        }
    }

    fn push_piece_moves(&self, from: Square, piece: Piece, list: &mut MoveList) {
        match piece {
            Piece::Pawn => self.push_pawn_moves(from, list),
            Piece::Knight => self.push_knight_moves(from, list),
            Piece::Bishop | Piece::Rook | Piece::Queen => {
                self.push_slider_moves(from, piece, list);
            }
            Piece::King => self.push_king_moves(from, list),
        }
    }

    /// All pseudo-legal moves for the side to move, in one list.
    pub(crate) fn generate_pseudo_moves(&self) -> MoveList {
        let mut list = MoveList::new();
        for piece in Piece::ALL {
            for from in self.pieces(self.side_to_move, piece) {
                self.push_piece_moves(from, piece, &mut list);
            }
        }
        list
    }

    /// Pseudo-legal moves, produced lazily one piece at a time. These obey
    /// piece movement rules but may leave the mover's king in check.
    pub fn pseudo_legal_moves(&self) -> impl Iterator<Item = Move> + '_ {
        let us = self.side_to_move;
        Piece::ALL.into_iter().flat_map(move |piece| {
            self.pieces(us, piece).into_iter().flat_map(move |from| {
                let mut list = MoveList::new();
                self.push_piece_moves(from, piece, &mut list);
                list
            })
        })
    }

    /// Run `visit(board, mv, gives_check)` for every legal move.
    ///
    /// A move is legal when the mover's king is not attacked after it is
    /// made. Castling is additionally refused while in check and when the
    /// king would cross an attacked square.
    fn for_each_legal(&mut self, mut visit: impl FnMut(&Board, Move, bool)) {
        let us = self.side_to_move;
        let them = us.opponent();
        let in_check = self.is_in_check(us);
        for mv in self.generate_pseudo_moves() {
            if mv.is_castling() {
                let rank = us.back_rank();
                let crossed = Square(rank, if mv.is_castle_kingside() { 5 } else { 3 });
                if in_check || self.is_square_attacked(crossed, them) {
                    continue;
                }
            }
            let info = self.make_move(mv);
            let legal = !self.is_in_check(us);
            let gives_check = legal && self.is_in_check(them);
            self.unmake_move(info);
            if legal {
                visit(self, mv, gives_check);
            }
        }
    }

    /// Legal moves in generation order.
    pub fn legal_moves(&mut self) -> MoveList {
        let mut list = MoveList::new();
        self.for_each_legal(|_, mv, _| list.push(mv));
        list
    }

    /// Legal moves scored by `priority(board, mv, gives_check)`; the returned
    /// list is consumed highest priority first.
    pub fn legal_moves_ordered<F>(&mut self, mut priority: F) -> ScoredMoveList
    where
        F: FnMut(&Board, Move, bool) -> i32,
    {
        let mut list = ScoredMoveList::new();
        self.for_each_legal(|board, mv, gives_check| {
            list.push(mv, priority(board, mv, gives_check));
        });
        list
    }

    /// Legal captures and promotions.
    pub fn tactical_moves(&mut self) -> MoveList {
        let mut list = MoveList::new();
        self.for_each_legal(|_, mv, _| {
            if mv.is_tactical() {
                list.push(mv);
            }
        });
        list
    }

    #[must_use]
    pub fn has_legal_moves(&mut self) -> bool {
        !self.legal_moves().is_empty()
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.is_in_check(self.side_to_move) && !self.has_legal_moves()
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.is_in_check(self.side_to_move) && !self.has_legal_moves()
    }

    /// Count leaf nodes of the legal move tree to `depth`.
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.legal_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for mv in moves {
            let mut child = self.scoped(mv);
            nodes += child.perft(depth - 1);
        }
        nodes
    }
}
