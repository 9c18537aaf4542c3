//! BMI2 parallel-bit-extract sliding attacks.
//!
//! The occupancy bits under a square's relevant mask are compressed into a
//! dense low-order index with `pext`, which is already injective over the
//! mask's subsets, so no magic-constant search is needed. Rook and bishop
//! slots for all squares share one flat table addressed by per-square
//! offsets.
//!
//! Construction runs on any host through the software deposit fallback; the
//! engine is only *selected* when the hardware instruction is present, since
//! the software extract path would be far slower than magic lookup.

use super::{relevant_bishop_mask, relevant_rook_mask, ClassicAttacks, SlidingAttacks};
use crate::{bits, Bitboard};
use citrine_core::Square;

// Total slots across both piece kinds and all squares:
// rook 102,400 + bishop 5,248.
const TABLE_SLOTS: usize = 107_648;

struct PextEntry {
    rook_offset: usize,
    bishop_offset: usize,
    rook_mask: Bitboard,
    bishop_mask: Bitboard,
}

/// The parallel-bit-extract engine: one `pext` and one load per query.
pub struct PextAttacks {
    table: Vec<Bitboard>,
    entries: Vec<PextEntry>,
}

impl PextAttacks {
    /// Runtime selection requires the hardware instruction.
    pub fn is_supported() -> bool {
        bits::bmi2_available()
    }

    /// Builds the flat attack table from the ray-scanning ground truth.
    pub fn new() -> Self {
        let mut table = Vec::with_capacity(TABLE_SLOTS);
        let mut entries = Vec::with_capacity(64);

        for index in 0..64u8 {
            let square = Square::from_index(index).expect("square indices run 0..64");
            let rook_mask = relevant_rook_mask(square);
            let bishop_mask = relevant_bishop_mask(square);

            let rook_offset = table.len();
            append_attacks(&mut table, square, rook_mask, |sq, occ| {
                ClassicAttacks.rook_attacks(sq, occ)
            });

            let bishop_offset = table.len();
            append_attacks(&mut table, square, bishop_mask, |sq, occ| {
                ClassicAttacks.bishop_attacks(sq, occ)
            });

            entries.push(PextEntry {
                rook_offset,
                bishop_offset,
                rook_mask,
                bishop_mask,
            });
        }

        debug_assert_eq!(table.len(), TABLE_SLOTS);
        PextAttacks { table, entries }
    }
}

impl Default for PextAttacks {
    fn default() -> Self {
        Self::new()
    }
}

// One slot per subset, in extract order: depositing the index back through
// the mask enumerates subsets exactly as extraction will address them.
fn append_attacks(
    table: &mut Vec<Bitboard>,
    square: Square,
    mask: Bitboard,
    ground_truth: impl Fn(Square, Bitboard) -> Bitboard,
) {
    for index in 0..(1u64 << mask.count()) {
        let blockers = Bitboard::new(bits::pdep(index, mask.0));
        table.push(ground_truth(square, blockers));
    }
}

impl SlidingAttacks for PextAttacks {
    #[inline]
    fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let entry = &self.entries[sq.index() as usize];
        self.table[entry.bishop_offset + bits::pext(occupied.0, entry.bishop_mask.0) as usize]
    }

    #[inline]
    fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let entry = &self.entries[sq.index() as usize];
        self.table[entry.rook_offset + bits::pext(occupied.0, entry.rook_mask.0) as usize]
    }

    #[inline]
    fn queen_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let entry = &self.entries[sq.index() as usize];
        self.table[entry.bishop_offset + bits::pext(occupied.0, entry.bishop_mask.0) as usize]
            | self.table[entry.rook_offset + bits::pext(occupied.0, entry.rook_mask.0) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::parse(name).unwrap()
    }

    #[test]
    fn table_is_fully_packed() {
        let engine = PextAttacks::new();
        assert_eq!(engine.table.len(), TABLE_SLOTS);
        assert_eq!(engine.entries.len(), 64);
        // offsets are dense and strictly increasing
        for pair in engine.entries.windows(2) {
            assert!(pair[0].rook_offset < pair[0].bishop_offset);
            assert!(pair[0].bishop_offset < pair[1].rook_offset);
        }
    }

    #[test]
    fn empty_board_counts() {
        let engine = PextAttacks::new();
        assert_eq!(engine.bishop_attacks(sq("d4"), Bitboard::EMPTY).count(), 13);
        assert_eq!(engine.rook_attacks(sq("d4"), Bitboard::EMPTY).count(), 14);
        assert_eq!(engine.queen_attacks(sq("d4"), Bitboard::EMPTY).count(), 27);
    }

    #[test]
    fn blocker_is_included_and_shadow_excluded() {
        let engine = PextAttacks::new();
        let blockers = Bitboard::from_square(sq("f6"));
        let attacks = engine.bishop_attacks(sq("d4"), blockers);
        assert!(attacks.contains(sq("e5")));
        assert!(attacks.contains(sq("f6")));
        assert!(!attacks.contains(sq("g7")));
        assert!(!attacks.contains(sq("h8")));
    }

    #[test]
    fn queen_is_union_of_rook_and_bishop() {
        let engine = PextAttacks::new();
        let occupied = Bitboard::new(0x00FF_0000_1800_FF00);
        for index in 0..64 {
            let square = Square::from_index(index).unwrap();
            assert_eq!(
                engine.queen_attacks(square, occupied),
                engine.rook_attacks(square, occupied) | engine.bishop_attacks(square, occupied)
            );
        }
    }
}
