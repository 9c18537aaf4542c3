//! Zobrist hash keys.
//!
//! Every hashable position feature has a fixed pseudo-random key; the
//! position hash is the XOR of the keys of its active features, so any
//! feature toggles in and out of the hash with a single XOR.

use citrine_core::{CastlingRights, Color, Piece, Square};

/// Key tables for incremental position hashing.
pub struct ZobristKeys {
    /// [piece][color][square]
    pieces: [[[u64; 64]; 2]; 6],
    /// Per-side active-color keys.
    side: [u64; 2],
    /// One key per castling-rights combination.
    castling: [u64; 16],
    /// Keyed by the en-passant target file.
    en_passant: [u64; 8],
}

/// The process-wide key set, built at compile time from a fixed seed so
/// hashes are reproducible across runs.
pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

const fn xorshift(state: u64) -> u64 {
    let mut x = state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

impl ZobristKeys {
    const fn new() -> Self {
        let mut state = 0x9E37_79B9_7F4A_7C15u64;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut side = [0u64; 2];
        let mut castling = [0u64; 16];
        let mut en_passant = [0u64; 8];

        let mut piece = 0;
        while piece < 6 {
            let mut color = 0;
            while color < 2 {
                let mut square = 0;
                while square < 64 {
                    state = xorshift(state);
                    pieces[piece][color][square] = state;
                    square += 1;
                }
                color += 1;
            }
            piece += 1;
        }

        let mut i = 0;
        while i < 2 {
            state = xorshift(state);
            side[i] = state;
            i += 1;
        }

        // index 0 (no rights) hashes as a feature too, so loading and
        // incremental narrowing agree
        let mut i = 0;
        while i < 16 {
            state = xorshift(state);
            castling[i] = state;
            i += 1;
        }

        let mut i = 0;
        while i < 8 {
            state = xorshift(state);
            en_passant[i] = state;
            i += 1;
        }

        ZobristKeys {
            pieces,
            side,
            castling,
            en_passant,
        }
    }

    /// Key for a piece of a color on a square.
    #[inline]
    pub fn piece(&self, color: Color, piece: Piece, square: Square) -> u64 {
        self.pieces[piece.index()][color.index()][square.index() as usize]
    }

    /// Key for the side to move.
    #[inline]
    pub fn side(&self, color: Color) -> u64 {
        self.side[color.index()]
    }

    /// Key for a castling-rights combination.
    #[inline]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.bits() as usize]
    }

    /// Key for a validated en-passant target, by file.
    #[inline]
    pub fn en_passant(&self, target: Square) -> u64 {
        self.en_passant[target.file().index() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_nonzero() {
        assert_ne!(ZOBRIST.side(Color::White), 0);
        assert_ne!(ZOBRIST.side(Color::Black), 0);
        assert_ne!(ZOBRIST.piece(Color::White, Piece::Pawn, Square::A1), 0);
        assert_ne!(ZOBRIST.castling(CastlingRights::ALL), 0);
        assert_ne!(ZOBRIST.en_passant(Square::parse("e3").unwrap()), 0);
    }

    #[test]
    fn keys_distinguish_features() {
        let a = ZOBRIST.piece(Color::White, Piece::Pawn, Square::A1);
        assert_ne!(a, ZOBRIST.piece(Color::White, Piece::Pawn, Square::B1));
        assert_ne!(a, ZOBRIST.piece(Color::Black, Piece::Pawn, Square::A1));
        assert_ne!(a, ZOBRIST.piece(Color::White, Piece::Knight, Square::A1));
        assert_ne!(ZOBRIST.side(Color::White), ZOBRIST.side(Color::Black));
    }

    #[test]
    fn en_passant_keyed_by_file() {
        let e3 = Square::parse("e3").unwrap();
        let e6 = Square::parse("e6").unwrap();
        let d3 = Square::parse("d3").unwrap();
        assert_eq!(ZOBRIST.en_passant(e3), ZOBRIST.en_passant(e6));
        assert_ne!(ZOBRIST.en_passant(e3), ZOBRIST.en_passant(d3));
    }
}
