//! Packed move encoding.
//!
//! A move is one 64-bit word:
//!
//! ```text
//! bits  0-3   moving piece kind (0xF = none, null move only)
//! bits  4-9   from square
//! bits 10-15  to square
//! bits 16-19  move kind
//! bits 20-23  captured piece kind (0xF = none)
//! bits 24-27  promotion piece kind (0xF = none)
//! bits 28-43  move-ordering score
//! ```
//!
//! The score participates in ordering only; move identity (equality and
//! hashing) is over the low 28 bits.

use crate::{File, Piece, Square};
use std::fmt;

/// How a move alters the position, beyond relocating the moving piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Quiet move of a non-pawn piece.
    Normal = 0,
    /// Capture of an enemy piece on the destination square.
    Capture = 1,
    /// Castling; the destination is the king's target square.
    Castle = 2,
    /// En-passant capture; the victim is behind the destination.
    EnPassant = 3,
    /// Quiet single pawn advance.
    PawnPush = 4,
    /// Pawn advance of two squares from its starting rank.
    DoublePush = 5,
    /// Quiet pawn advance onto the promotion rank.
    Promote = 6,
    /// Capturing pawn advance onto the promotion rank.
    PromoteCapture = 7,
    /// No-op move used as a sentinel and for null-move search.
    Null = 8,
}

impl MoveKind {
    const fn from_bits(bits: u8) -> MoveKind {
        match bits {
            0 => MoveKind::Normal,
            1 => MoveKind::Capture,
            2 => MoveKind::Castle,
            3 => MoveKind::EnPassant,
            4 => MoveKind::PawnPush,
            5 => MoveKind::DoublePush,
            6 => MoveKind::Promote,
            7 => MoveKind::PromoteCapture,
            8 => MoveKind::Null,
            _ => panic!("move word holds an unrecognized move kind"),
        }
    }
}

const FROM_SHIFT: u32 = 4;
const TO_SHIFT: u32 = 10;
const KIND_SHIFT: u32 = 16;
const CAPTURE_SHIFT: u32 = 20;
const PROMOTE_SHIFT: u32 = 24;
const SCORE_SHIFT: u32 = 28;

const NONE_NIBBLE: u64 = 0xF;

// Everything below the score field.
const IDENTITY_MASK: u64 = (1 << SCORE_SHIFT) - 1;

const fn piece_nibble(piece: Option<Piece>) -> u64 {
    match piece {
        Some(p) => p as u64,
        None => NONE_NIBBLE,
    }
}

const fn nibble_piece(nibble: u64) -> Option<Piece> {
    if nibble == NONE_NIBBLE {
        None
    } else {
        Some(Piece::ALL[nibble as usize])
    }
}

/// A complete move description packed into one word.
#[derive(Clone, Copy)]
pub struct Move(u64);

impl Move {
    /// The null move: no piece, no squares, kind [`MoveKind::Null`].
    pub const NULL: Move = Move(
        NONE_NIBBLE
            | (MoveKind::Null as u64) << KIND_SHIFT
            | NONE_NIBBLE << CAPTURE_SHIFT
            | NONE_NIBBLE << PROMOTE_SHIFT,
    );

    /// Packs a full move description.
    #[inline]
    pub const fn pack(
        piece: Piece,
        from: Square,
        to: Square,
        kind: MoveKind,
        capture: Option<Piece>,
        promote: Option<Piece>,
        score: u16,
    ) -> Self {
        Move(
            piece as u64
                | (from.index() as u64) << FROM_SHIFT
                | (to.index() as u64) << TO_SHIFT
                | (kind as u64) << KIND_SHIFT
                | piece_nibble(capture) << CAPTURE_SHIFT
                | piece_nibble(promote) << PROMOTE_SHIFT
                | (score as u64) << SCORE_SHIFT,
        )
    }

    /// Packs a quiet move with no capture, promotion, or score.
    #[inline]
    pub const fn normal(piece: Piece, from: Square, to: Square) -> Self {
        Self::pack(piece, from, to, MoveKind::Normal, None, None, 0)
    }

    /// Returns the moving piece; `None` only for the null move.
    #[inline]
    pub const fn piece(self) -> Option<Piece> {
        nibble_piece(self.0 & 0xF)
    }

    /// Returns the origin square.
    #[inline]
    pub const fn from(self) -> Square {
        // 6-bit field, always a valid index
        unsafe { Square::from_index_unchecked(((self.0 >> FROM_SHIFT) & 0x3F) as u8) }
    }

    /// Returns the destination square.
    #[inline]
    pub const fn to(self) -> Square {
        // 6-bit field, always a valid index
        unsafe { Square::from_index_unchecked(((self.0 >> TO_SHIFT) & 0x3F) as u8) }
    }

    /// Returns the move kind.
    #[inline]
    pub const fn kind(self) -> MoveKind {
        MoveKind::from_bits(((self.0 >> KIND_SHIFT) & 0xF) as u8)
    }

    /// Returns the captured piece kind, if any.
    #[inline]
    pub const fn capture(self) -> Option<Piece> {
        nibble_piece((self.0 >> CAPTURE_SHIFT) & 0xF)
    }

    /// Returns the promotion piece kind, if any.
    #[inline]
    pub const fn promote(self) -> Option<Piece> {
        nibble_piece((self.0 >> PROMOTE_SHIFT) & 0xF)
    }

    /// Returns the move-ordering score.
    #[inline]
    pub const fn score(self) -> u16 {
        ((self.0 >> SCORE_SHIFT) & 0xFFFF) as u16
    }

    /// Returns the same move with a replacement score.
    #[inline]
    pub const fn with_score(self, score: u16) -> Move {
        Move((self.0 & IDENTITY_MASK) | (score as u64) << SCORE_SHIFT)
    }

    /// Returns the move with the score field cleared, for identity
    /// comparison of raw words.
    #[inline]
    pub const fn without_score(self) -> Move {
        Move(self.0 & IDENTITY_MASK)
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.capture().is_some()
    }

    #[inline]
    pub const fn is_promote(self) -> bool {
        self.promote().is_some()
    }

    #[inline]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promote()
    }

    #[inline]
    pub fn is_pawn_move(self) -> bool {
        self.piece() == Some(Piece::Pawn)
    }
}

// Move identity ignores the score field.
impl PartialEq for Move {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 & IDENTITY_MASK == other.0 & IDENTITY_MASK
    }
}

impl Eq for Move {}

impl std::hash::Hash for Move {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (self.0 & IDENTITY_MASK).hash(state);
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind() == MoveKind::Castle {
            return if self.to().file() == File::C {
                write!(f, "O-O-O")
            } else {
                write!(f, "O-O")
            };
        }
        write!(f, "{}", self.from())?;
        if self.is_capture() {
            write!(f, "x")?;
        }
        write!(f, "{}", self.to())?;
        if let Some(promote) = self.promote() {
            write!(f, "{}", promote.san_letter())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Move")
            .field("piece", &self.piece())
            .field("from", &self.from())
            .field("to", &self.to())
            .field("kind", &self.kind())
            .field("capture", &self.capture())
            .field("promote", &self.promote())
            .field("score", &self.score())
            .finish()
    }
}
