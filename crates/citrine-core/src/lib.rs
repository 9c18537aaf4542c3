//! Fundamental chess types.
//!
//! This crate provides the value types shared across the engine:
//! - [`Color`] and [`Piece`] for piece identity
//! - [`File`], [`Rank`], and [`Square`] for board coordinates
//! - [`Occupant`] for mailbox square contents
//! - [`Move`] and [`MoveKind`] for the packed move encoding
//! - [`CastlingRights`] flags
//! - [`Fen`] parsing and validation

mod castling;
mod color;
mod fen;
mod mov;
mod occupant;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{Move, MoveKind};
pub use occupant::Occupant;
pub use piece::{Piece, MAX_PIECES};
pub use square::{File, Rank, Square};
