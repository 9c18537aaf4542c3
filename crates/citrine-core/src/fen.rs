//! FEN (Forsyth-Edwards Notation) validation and parsing.
//!
//! The whole record is validated before any field is produced, so a caller
//! building a position from a [`Fen`] can never observe a partial parse.

use crate::{CastlingRights, Color, Piece, Rank, Square};
use thiserror::Error;

/// Reasons a FEN record is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("expected 6 fields, got {0}")]
    FieldCount(usize),

    #[error("bad piece placement: {0}")]
    Placement(String),

    #[error("bad side to move: expected 'w' or 'b', got '{0}'")]
    SideToMove(String),

    #[error("bad castling availability: '{0}'")]
    Castling(String),

    #[error("bad en passant target: '{0}'")]
    EnPassant(String),

    #[error("bad halfmove clock: '{0}'")]
    HalfmoveClock(String),

    #[error("bad fullmove number: '{0}'")]
    FullmoveNumber(String),
}

/// A validated FEN record, decoded into typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    /// Occupied squares with their contents, in placement order.
    pub pieces: Vec<(Square, Color, Piece)>,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    /// En-passant target square, exactly as written (not yet validated
    /// against the pawns actually able to capture there).
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Validates and parses a FEN record.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::FieldCount(fields.len()));
        }

        let pieces = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let castling = CastlingRights::from_fen(fields[2])
            .ok_or_else(|| FenError::Castling(fields[2].to_string()))?;

        let en_passant = parse_en_passant(fields[3])?;

        let halfmove_clock = fields[4]
            .parse::<u16>()
            .map_err(|_| FenError::HalfmoveClock(fields[4].to_string()))?;

        let fullmove_number = fields[5]
            .parse::<u16>()
            .map_err(|_| FenError::FullmoveNumber(fields[5].to_string()))?;

        Ok(Fen {
            pieces,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn parse_placement(placement: &str) -> Result<Vec<(Square, Color, Piece)>, FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::Placement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut pieces = Vec::with_capacity(32);
    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - row as u8; // FEN lists rank 8 first
        let mut file = 0u32;
        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                file += skip;
            } else if let Some((color, piece)) = Piece::from_fen_char(ch) {
                if file >= 8 {
                    return Err(FenError::Placement(format!(
                        "rank {} overflows 8 files",
                        rank + 1
                    )));
                }
                let square = Square::from_index(rank * 8 + file as u8)
                    .expect("rank and file are both below 8");
                pieces.push((square, color, piece));
                file += 1;
            } else {
                return Err(FenError::Placement(format!(
                    "unexpected character '{}' in rank {}",
                    ch,
                    rank + 1
                )));
            }
        }
        if file != 8 {
            return Err(FenError::Placement(format!(
                "rank {} describes {} files, expected 8",
                rank + 1,
                file
            )));
        }
    }
    Ok(pieces)
}

fn parse_en_passant(field: &str) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let square = Square::parse(field).ok_or_else(|| FenError::EnPassant(field.to_string()))?;
    // only the passed-over ranks are legal targets
    if square.rank() != Rank::R3 && square.rank() != Rank::R6 {
        return Err(FenError::EnPassant(field.to_string()));
    }
    Ok(Some(square))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos() {
        let fen = Fen::parse(Fen::STARTPOS).unwrap();
        assert_eq!(fen.pieces.len(), 32);
        assert_eq!(fen.side_to_move, Color::White);
        assert_eq!(fen.castling, CastlingRights::ALL);
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
        assert!(fen
            .pieces
            .contains(&(Square::E1, Color::White, Piece::King)));
        assert!(fen
            .pieces
            .contains(&(Square::D8, Color::Black, Piece::Queen)));
    }

    #[test]
    fn en_passant_target() {
        let fen =
            Fen::parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(fen.en_passant, Square::parse("e3"));
        assert_eq!(fen.side_to_move, Color::Black);
    }

    #[test]
    fn rejects_field_count() {
        assert_eq!(Fen::parse("nonsense"), Err(FenError::FieldCount(1)));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - -"),
            Err(FenError::FieldCount(4))
        ));
    }

    #[test]
    fn rejects_bad_placement() {
        // seven ranks
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        // illegal piece letter
        assert!(matches!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
        // nine files in one rank
        assert!(matches!(
            Fen::parse("rnbqkbnrr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenError::Placement(_))
        ));
    }

    #[test]
    fn rejects_bad_side() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::SideToMove(_))
        ));
    }

    #[test]
    fn rejects_bad_castling() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w KX - 0 1"),
            Err(FenError::Castling(_))
        ));
    }

    #[test]
    fn rejects_bad_en_passant() {
        for target in ["e9", "x3", "e4", "ee"] {
            assert!(
                matches!(
                    Fen::parse(&format!("8/8/8/8/8/8/8/8 w - {target} 0 1")),
                    Err(FenError::EnPassant(_))
                ),
                "accepted '{target}'"
            );
        }
    }

    #[test]
    fn rejects_bad_clocks() {
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - x 1"),
            Err(FenError::HalfmoveClock(_))
        ));
        assert!(matches!(
            Fen::parse("8/8/8/8/8/8/8/8 w - - 0 x"),
            Err(FenError::FullmoveNumber(_))
        ));
    }

    #[test]
    fn error_messages_name_the_offender() {
        let err = Fen::parse("8/8/8/8/8/8/8/8 q - - 0 1").unwrap_err();
        assert!(err.to_string().contains('q'));
    }
}
