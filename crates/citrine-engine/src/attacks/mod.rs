//! Attack computation for every piece kind.
//!
//! Leaper (knight, king) and pawn attacks come from compile-time tables.
//! Sliding attacks (bishop, rook, queen) go through the [`SlidingAttacks`]
//! capability trait, with three interchangeable engines:
//!
//! - [`ClassicAttacks`]: ray scanning, no tables beyond the ray masks,
//!   always available, and the ground truth the other two are built from.
//! - [`MagicAttacks`]: perfect-hashed dense lookup via magic multiplication.
//! - [`PextAttacks`]: dense lookup indexed by the BMI2 parallel-bit-extract
//!   instruction; selected only when the hardware provides it.
//!
//! One engine is chosen per process on first use, in the order pext, magic,
//! classic, and held behind [`sliding`] for the process lifetime.

mod classic;
mod magic;
mod pext;

pub use classic::ClassicAttacks;
pub use magic::MagicAttacks;
pub use pext::PextAttacks;

use crate::bits;
use crate::Bitboard;
use citrine_core::{Color, Square};
use std::sync::OnceLock;

/// Sliding-piece attack computation against a blocker occupancy.
///
/// A blocker square is part of the attack set (it may be capturable);
/// squares beyond it are not.
pub trait SlidingAttacks: Send + Sync {
    fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard;
    fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard;

    fn queen_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop_attacks(sq, occupied) | self.rook_attacks(sq, occupied)
    }
}

static SLIDING: OnceLock<Box<dyn SlidingAttacks>> = OnceLock::new();

/// Returns the process-wide sliding-attack engine, building it on first use.
///
/// The `OnceLock` guarantees table construction happens-before every lookup,
/// from any thread.
pub fn sliding() -> &'static dyn SlidingAttacks {
    SLIDING.get_or_init(select).as_ref()
}

fn select() -> Box<dyn SlidingAttacks> {
    if bits::bmi2_available() {
        return Box::new(PextAttacks::new());
    }
    if MagicAttacks::is_supported() {
        return Box::new(MagicAttacks::new());
    }
    Box::new(ClassicAttacks)
}

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, -1),
    (1, 0),
    (1, 1),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const WHITE_PAWN_DELTAS: [(i8, i8); 2] = [(1, -1), (1, 1)];
const BLACK_PAWN_DELTAS: [(i8, i8); 2] = [(-1, -1), (-1, 1)];

const fn leaper_mask(sq: u8, deltas: &[(i8, i8)]) -> u64 {
    let rank = (sq / 8) as i8;
    let file = (sq % 8) as i8;
    let mut bb = 0u64;
    let mut i = 0;
    while i < deltas.len() {
        let (dr, df) = deltas[i];
        let r = rank + dr;
        let f = file + df;
        if r >= 0 && r < 8 && f >= 0 && f < 8 {
            bb |= 1u64 << (r * 8 + f);
        }
        i += 1;
    }
    bb
}

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0u8;
    while sq < 64 {
        table[sq as usize] = Bitboard::new(leaper_mask(sq, deltas));
        sq += 1;
    }
    table
}

const KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_DELTAS);
const KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_DELTAS);
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&WHITE_PAWN_DELTAS),
    leaper_table(&BLACK_PAWN_DELTAS),
];

/// Squares a knight on `sq` attacks.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Squares a king on `sq` attacks.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Squares from which a pawn of `color` would attack `sq`.
#[inline]
pub fn pawn_defends(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.flip().index()][sq.index() as usize]
}

/// Relevant blocker mask for a bishop: its diagonal rays, board edges
/// excluded (an edge square never affects what lies beyond it).
pub(crate) fn relevant_bishop_mask(sq: Square) -> Bitboard {
    let rank = (sq.index() / 8) as i8;
    let file = (sq.index() % 8) as i8;
    let mut mask = 0u64;
    for (dr, df) in [(1, 1), (1, -1), (-1, 1), (-1, -1)] {
        let mut r = rank + dr;
        let mut f = file + df;
        while (1..7).contains(&r) && (1..7).contains(&f) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    Bitboard::new(mask)
}

/// Relevant blocker mask for a rook: its file and rank, edges excluded.
pub(crate) fn relevant_rook_mask(sq: Square) -> Bitboard {
    let rank = sq.index() / 8;
    let file = sq.index() % 8;
    let mut mask = 0u64;
    for f in 1..7 {
        if f != file {
            mask |= 1u64 << (rank * 8 + f);
        }
    }
    for r in 1..7 {
        if r != rank {
            mask |= 1u64 << (r * 8 + file);
        }
    }
    Bitboard::new(mask)
}
