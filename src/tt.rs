//! Transposition table keyed by Zobrist hash.
//!
//! The table is owned by the search state and only ever touched by one
//! search thread at a time, so slots are plain words. Each slot keeps the
//! full key next to a packed entry so index collisions are detected on probe.

use std::mem;

use crate::board::Move;

/// Default size of the table in megabytes.
pub const DEFAULT_TT_MB: usize = 16;

/// Accepted range for the `Hash` option.
pub const MIN_TT_MB: usize = 1;
pub const MAX_TT_MB: usize = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Failed high: score >= beta
    UpperBound, // Failed low: score <= alpha
}

impl BoundType {
    fn to_u8(self) -> u8 {
        match self {
            BoundType::Exact => 0,
            BoundType::LowerBound => 1,
            BoundType::UpperBound => 2,
        }
    }

    fn from_u8(v: u8) -> Self {
        match v & 0x3 {
            0 => BoundType::Exact,
            1 => BoundType::LowerBound,
            _ => BoundType::UpperBound,
        }
    }
}

/// Unpacked entry returned by [`TranspositionTable::probe`].
#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub depth: u8,
    pub score: i16,
    pub bound_type: BoundType,
    pub best_move: Option<Move>,
}

impl TTEntry {
    pub fn depth(&self) -> u32 {
        u32::from(self.depth)
    }

    pub fn score(&self) -> i32 {
        i32::from(self.score)
    }
}

/// Packed layout:
/// - bits 0-15:  move (0 = none)
/// - bits 16-31: score (i16)
/// - bits 32-39: depth
/// - bits 40-41: bound
/// - bits 42-47: generation
/// - bit 48:     occupied marker
const OCCUPIED: u64 = 1 << 48;

fn pack_entry(depth: u8, score: i16, bound: BoundType, best_move: Option<Move>, generation: u8) -> u64 {
    let mv = u64::from(best_move.map_or(0, |m| m.as_u16()));
    let sc = u64::from(score as u16);
    let bound_gen = u64::from((bound.to_u8() & 0x3) | ((generation & 0x3F) << 2));
    mv | (sc << 16) | (u64::from(depth) << 32) | (bound_gen << 40) | OCCUPIED
}

fn unpack_entry(data: u64) -> TTEntry {
    let mv_bits = (data & 0xFFFF) as u16;
    TTEntry {
        depth: ((data >> 32) & 0xFF) as u8,
        score: ((data >> 16) & 0xFFFF) as u16 as i16,
        bound_type: BoundType::from_u8(((data >> 40) & 0x3) as u8),
        best_move: (mv_bits != 0).then(|| Move::from_u16(mv_bits)),
    }
}

#[derive(Clone, Copy, Default)]
struct TTSlot {
    key: u64,
    data: u64,
}

impl TTSlot {
    fn is_empty(self) -> bool {
        self.data & OCCUPIED == 0
    }

    fn depth(self) -> u8 {
        ((self.data >> 32) & 0xFF) as u8
    }

    fn generation(self) -> u8 {
        ((self.data >> 42) & 0x3F) as u8
    }
}

/// Slots sharing one index.
const BUCKET_SIZE: usize = 4;

#[derive(Clone, Copy, Default)]
struct TTBucket {
    slots: [TTSlot; BUCKET_SIZE],
}

pub struct TranspositionTable {
    buckets: Vec<TTBucket>,
    mask: usize,
    size_mb: usize,
    generation: u8,
}

impl TranspositionTable {
    /// Allocate a table of roughly `size_mb` megabytes (clamped to the
    /// accepted option range), rounded down to a power of two buckets.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let size_mb = size_mb.clamp(MIN_TT_MB, MAX_TT_MB);
        let bytes = size_mb * 1024 * 1024;
        let wanted = (bytes / mem::size_of::<TTBucket>()).max(1);
        let num_buckets = if wanted.is_power_of_two() {
            wanted
        } else {
            wanted.next_power_of_two() / 2
        };

        TranspositionTable {
            buckets: vec![TTBucket::default(); num_buckets],
            mask: num_buckets - 1,
            size_mb,
            generation: 0,
        }
    }

    #[must_use]
    pub fn size_mb(&self) -> usize {
        self.size_mb
    }

    /// Reallocate at a new size. Existing entries are dropped.
    pub fn resize(&mut self, size_mb: usize) {
        *self = TranspositionTable::new(size_mb);
    }

    /// Age the table so entries from earlier searches are replaced first.
    pub fn new_search(&mut self) {
        self.generation = (self.generation + 1) & 0x3F;
    }

    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// The stored entry for `hash`, if any.
    #[must_use]
    pub fn probe(&self, hash: u64) -> Option<TTEntry> {
        self.buckets[self.index(hash)]
            .slots
            .iter()
            .find(|slot| !slot.is_empty() && slot.key == hash)
            .map(|slot| unpack_entry(slot.data))
    }

    /// Store an entry, preferring an empty slot or the same position, then
    /// the slot with the shallowest and oldest entry.
    pub fn store(
        &mut self,
        hash: u64,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
    ) {
        let depth = depth.min(255) as u8;
        let score = score.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16;
        let generation = self.generation;
        let idx = self.index(hash);
        let bucket = &mut self.buckets[idx];

        let target = bucket
            .slots
            .iter()
            .position(|slot| slot.is_empty() || slot.key == hash)
            .unwrap_or_else(|| {
                let mut replace = 0;
                let mut worst = i32::MAX;
                for (i, slot) in bucket.slots.iter().enumerate() {
                    let age = generation.wrapping_sub(slot.generation()) & 0x3F;
                    let priority = i32::from(slot.depth()) * 2 - i32::from(age);
                    if priority < worst {
                        worst = priority;
                        replace = i;
                    }
                }
                replace
            });

        // Keep the old move when a same-position update has none.
        let slot = &mut bucket.slots[target];
        let best_move = if best_move.is_none() && slot.key == hash && !slot.is_empty() {
            unpack_entry(slot.data).best_move
        } else {
            best_move
        };
        *slot = TTSlot {
            key: hash,
            data: pack_entry(depth, score, bound_type, best_move, generation),
        };
    }

    /// Table fullness in per mille, sampled over the first buckets.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        let sample = self.buckets.len().min(1000);
        let occupied = self
            .buckets
            .iter()
            .take(sample)
            .flat_map(|bucket| bucket.slots.iter())
            .filter(|slot| !slot.is_empty())
            .count();
        ((occupied * 1000) / (sample * BUCKET_SIZE)) as u32
    }

    pub fn clear(&mut self) {
        self.buckets.fill(TTBucket::default());
        self.generation = 0;
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        TranspositionTable::new(DEFAULT_TT_MB)
    }
}
