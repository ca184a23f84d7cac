//! Attack tables for move generation.
//!
//! Sliding attacks use Hyperbola Quintessence (the `o^(o-2r)` trick) on
//! diagonals, anti-diagonals and files, and a small lookup table on ranks
//! where byteswapping does not help.

#![allow(clippy::needless_range_loop)]

mod tables;

pub(crate) use tables::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};

use once_cell::sync::Lazy;

const FILE_A: u64 = 0x0101_0101_0101_0101;

/// Mask of the line through `sq` along (dr, df), excluding `sq` itself.
fn line_mask(sq: usize, dr: isize, df: isize) -> u64 {
    let mut mask = 0u64;
    for dir in [1isize, -1] {
        let mut r = (sq / 8) as isize + dr * dir;
        let mut f = (sq % 8) as isize + df * dir;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            mask |= 1u64 << (r * 8 + f);
            r += dr * dir;
            f += df * dir;
        }
    }
    mask
}

static DIAG_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        masks[sq] = line_mask(sq, 1, 1);
    }
    masks
});

static ANTI_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        masks[sq] = line_mask(sq, 1, -1);
    }
    masks
});

static FILE_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        masks[sq] = (FILE_A << (sq % 8)) & !(1u64 << sq);
    }
    masks
});

/// `RANK_ATTACKS[8 * inner_occupancy + file]`: attacks along rank 1, where
/// `inner_occupancy` holds the b..g file bits of the rank.
static RANK_ATTACKS: Lazy<[u64; 512]> = Lazy::new(|| {
    let mut attacks = [0u64; 512];
    for occ in 0..64usize {
        for file in 0..8usize {
            let blocked = |f: usize| (1..=6).contains(&f) && occ & (1 << (f - 1)) != 0;
            let mut attack = 0u64;
            for f in (file + 1)..8 {
                attack |= 1u64 << f;
                if blocked(f) {
                    break;
                }
            }
            for f in (0..file).rev() {
                attack |= 1u64 << f;
                if blocked(f) {
                    break;
                }
            }
            attacks[8 * occ + file] = attack;
        }
    }
    attacks
});

#[inline]
fn hyp_quint(occupied: u64, mask: u64, square: usize) -> u64 {
    let piece_bit = 1u64 << square;
    let forward = occupied & mask;
    let backward = forward.swap_bytes();
    let forward_attacks = forward.wrapping_sub(piece_bit.wrapping_mul(2));
    let backward_attacks = backward
        .wrapping_sub(piece_bit.swap_bytes().wrapping_mul(2))
        .swap_bytes();
    (forward_attacks ^ backward_attacks) & mask
}

#[inline]
fn rank_attacks(occupied: u64, square: usize) -> u64 {
    let rank = square / 8;
    let file = square % 8;
    let inner = ((occupied >> (rank * 8 + 1)) & 63) as usize;
    RANK_ATTACKS[8 * inner + file] << (rank * 8)
}

#[inline]
pub(crate) fn bishop_attacks(square: usize, occupancy: u64) -> u64 {
    hyp_quint(occupancy, DIAG_MASKS[square], square)
        | hyp_quint(occupancy, ANTI_MASKS[square], square)
}

#[inline]
pub(crate) fn rook_attacks(square: usize, occupancy: u64) -> u64 {
    hyp_quint(occupancy, FILE_MASKS[square], square) | rank_attacks(occupancy, square)
}

#[inline]
pub(crate) fn queen_attacks(square: usize, occupancy: u64) -> u64 {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ray-walking reference used to cross-check the fast lookups.
    fn slow_attacks(square: usize, occupancy: u64, dirs: &[(isize, isize)]) -> u64 {
        let mut attacks = 0u64;
        for &(dr, df) in dirs {
            let mut r = (square / 8) as isize + dr;
            let mut f = (square % 8) as isize + df;
            while (0..8).contains(&r) && (0..8).contains(&f) {
                let bit = 1u64 << (r * 8 + f);
                attacks |= bit;
                if occupancy & bit != 0 {
                    break;
                }
                r += dr;
                f += df;
            }
        }
        attacks
    }

    const ROOK_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
    const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

    #[test]
    fn test_rook_attacks_empty_board() {
        let attacks = rook_attacks(28, 0);
        let expected = ((0xFFu64 << 24) | (FILE_A << 4)) & !(1u64 << 28);
        assert_eq!(attacks, expected);
    }

    #[test]
    fn test_rook_attacks_with_blockers() {
        // Rook on e4, blockers on e6 and c4
        let blockers = (1u64 << 44) | (1u64 << 26);
        let attacks = rook_attacks(28, blockers);
        assert!(attacks & (1u64 << 44) != 0);
        assert!(attacks & (1u64 << 52) == 0);
        assert!(attacks & (1u64 << 26) != 0);
        assert!(attacks & (1u64 << 25) == 0);
    }

    #[test]
    fn test_sliders_match_ray_walk() {
        let occupancies = [
            0u64,
            0xFF00_FF00_FF00_FF00,
            0x00FF_00FF_00FF_00FF,
            0x0000_1028_0044_2200,
            0x8142_2418_1824_4281,
        ];
        for sq in 0..64 {
            for &occ in &occupancies {
                let occ = occ | (1u64 << sq);
                assert_eq!(rook_attacks(sq, occ), slow_attacks(sq, occ, &ROOK_DIRS));
                assert_eq!(bishop_attacks(sq, occ), slow_attacks(sq, occ, &BISHOP_DIRS));
            }
        }
    }

    #[test]
    fn test_leaper_tables() {
        // Knight on a1 reaches b3 and c2
        assert_eq!(KNIGHT_ATTACKS[0], (1u64 << 17) | (1u64 << 10));
        // King on e1 has five neighbours
        assert_eq!(KING_ATTACKS[4].count_ones(), 5);
        // White pawn on e4 attacks d5 and f5, black pawn on e4 attacks d3 and f3
        assert_eq!(PAWN_ATTACKS[0][28], (1u64 << 35) | (1u64 << 37));
        assert_eq!(PAWN_ATTACKS[1][28], (1u64 << 19) | (1u64 << 21));
    }
}
