//! Move generation and make/unmake.
//!
//! Generation is pseudo-legal: it respects piece movement and occupancy but
//! not king safety. [`Position::make_move`] is the single legality gate; it
//! rejects a move that would leave the mover's king attacked (or castle out
//! of or through attack) and restores the position exactly, so callers
//! simply try the next candidate.

use crate::attacks;
use crate::position::CASTLE_MASK;
use crate::zobrist::ZOBRIST;
use crate::{Bitboard, MoveList, Position};
use citrine_core::{CastlingRights, Color, File, Move, MoveKind, Piece, Rank, Square, MAX_PIECES};

/// Base ordering score for captures.
pub const CAPTURE_SCORE: u16 = 10_000;

/// Base ordering score for quiet promotions.
pub const PROMOTE_SCORE: u16 = 9_000;

/// Most-valuable-victim / least-valuable-attacker: a bigger victim raises
/// the score by whole ranks, a cheaper attacker breaks ties upward.
fn capture_score(victim: Piece, attacker: Piece) -> u16 {
    CAPTURE_SCORE + ((victim.index() as u16) << 3) + (MAX_PIECES - attacker.index()) as u16
}

// Queen and knight promotions order ahead of the rarely useful rook and
// bishop underpromotions.
fn promote_bonus(promote: Piece) -> u16 {
    match promote {
        Piece::Queen | Piece::Knight => promote.value(),
        _ => 0,
    }
}

/// Index step from the en-passant target square back to the captured
/// pawn's square, from the capturer's point of view.
fn ep_offset(side: Color) -> i8 {
    match side {
        Color::White => -8,
        Color::Black => 8,
    }
}

fn moving_piece(m: Move) -> Piece {
    m.piece().expect("a non-null move names its piece")
}

fn captured_piece(m: Move) -> Piece {
    m.capture().expect("a capture names its victim")
}

fn promotion_piece(m: Move) -> Piece {
    m.promote().expect("a promotion names its piece")
}

/// One castling direction of one side.
struct CastleLane {
    rights: u8,
    /// Squares between king and rook that must be empty.
    clear: Bitboard,
    king_to: Square,
}

/// The per-side move-generation configuration: one data-driven record
/// instead of duplicated white/black code paths.
struct SideContext {
    side: Color,
    /// Pawns may double-push from this rank.
    start_rank: Rank,
    /// Pawns standing on this rank promote when they advance or capture.
    promote_rank: Rank,
    king_from: Square,
    kingside: CastleLane,
    queenside: CastleLane,
    /// Shift distances mapping capture-target sets back onto their pawns.
    left_shift: u32,
    right_shift: u32,
    /// Index deltas from a pawn to its destinations.
    left_delta: i8,
    right_delta: i8,
    push_delta: i8,
}

impl SideContext {
    const WHITE: SideContext = SideContext {
        side: Color::White,
        start_rank: Rank::R2,
        promote_rank: Rank::R7,
        king_from: Square::E1,
        kingside: CastleLane {
            rights: CastlingRights::WHITE_KINGSIDE,
            clear: Bitboard::new(Square::F1.mask() | Square::G1.mask()),
            king_to: Square::G1,
        },
        queenside: CastleLane {
            rights: CastlingRights::WHITE_QUEENSIDE,
            clear: Bitboard::new(Square::B1.mask() | Square::C1.mask() | Square::D1.mask()),
            king_to: Square::C1,
        },
        left_shift: 7,
        right_shift: 9,
        left_delta: 7,
        right_delta: 9,
        push_delta: 8,
    };

    const BLACK: SideContext = SideContext {
        side: Color::Black,
        start_rank: Rank::R7,
        promote_rank: Rank::R2,
        king_from: Square::E8,
        kingside: CastleLane {
            rights: CastlingRights::BLACK_KINGSIDE,
            clear: Bitboard::new(Square::F8.mask() | Square::G8.mask()),
            king_to: Square::G8,
        },
        queenside: CastleLane {
            rights: CastlingRights::BLACK_QUEENSIDE,
            clear: Bitboard::new(Square::B8.mask() | Square::C8.mask() | Square::D8.mask()),
            king_to: Square::C8,
        },
        left_shift: 9,
        right_shift: 7,
        left_delta: -9,
        right_delta: -7,
        push_delta: -8,
    };

    fn of(side: Color) -> &'static SideContext {
        match side {
            Color::White => &Self::WHITE,
            Color::Black => &Self::BLACK,
        }
    }

    /// Maps a set of destination squares to the sources `by` index steps
    /// behind them in this side's advance direction.
    fn sources_behind(&self, targets: Bitboard, by: u32) -> Bitboard {
        match self.side {
            Color::White => targets >> by,
            Color::Black => targets << by,
        }
    }
}

/// How the rook accompanies a castling king, keyed by the king's target.
struct CastleRookMove {
    /// The square the king crosses; may not be attacked.
    king_through: Square,
    rook_from: Square,
    rook_to: Square,
}

fn castle_rook_move(king_to: Square) -> CastleRookMove {
    match king_to {
        Square::C1 => CastleRookMove {
            king_through: Square::D1,
            rook_from: Square::A1,
            rook_to: Square::D1,
        },
        Square::G1 => CastleRookMove {
            king_through: Square::F1,
            rook_from: Square::H1,
            rook_to: Square::F1,
        },
        Square::C8 => CastleRookMove {
            king_through: Square::D8,
            rook_from: Square::A8,
            rook_to: Square::D8,
        },
        Square::G8 => CastleRookMove {
            king_through: Square::F8,
            rook_from: Square::H8,
            rook_to: Square::F8,
        },
        other => panic!("{other} is not a castling destination"),
    }
}

fn push_promotions(list: &mut MoveList, from: Square, to: Square, victim: Option<Piece>) {
    for promote in Piece::PROMOTIONS {
        let (kind, score) = match victim {
            Some(victim) => (
                MoveKind::PromoteCapture,
                capture_score(victim, Piece::Pawn) + promote_bonus(promote),
            ),
            None => (MoveKind::Promote, PROMOTE_SCORE + promote_bonus(promote)),
        };
        list.push(Move::pack(
            Piece::Pawn,
            from,
            to,
            kind,
            victim,
            Some(promote),
            score,
        ));
    }
}

impl Position {
    /// Appends every pseudo-legal move for the side to move.
    pub fn generate_moves(&self, list: &mut MoveList) {
        let ctx = SideContext::of(self.side_to_move);
        let friends = self.units(ctx.side);
        let enemies = self.units(ctx.side.flip());
        let pawns = self.pieces_of(ctx.side, Piece::Pawn);

        if pawns.any() {
            if let Some(target) = self.en_passant_validated {
                self.generate_en_passant(list, ctx, target, pawns);
            }
            self.generate_pawn_moves(list, ctx, pawns, enemies);
        }
        self.generate_castling(list, ctx);
        for piece in [
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
            Piece::King,
        ] {
            self.generate_piece_moves(list, piece, self.pieces(piece) & friends, enemies);
        }
    }

    fn generate_en_passant(
        &self,
        list: &mut MoveList,
        ctx: &SideContext,
        target: Square,
        pawns: Bitboard,
    ) {
        for from in attacks::pawn_defends(ctx.side, target) & pawns {
            list.push(Move::pack(
                Piece::Pawn,
                from,
                target,
                MoveKind::EnPassant,
                Some(Piece::Pawn),
                None,
                capture_score(Piece::Pawn, Piece::Pawn),
            ));
        }
    }

    fn generate_pawn_moves(
        &self,
        list: &mut MoveList,
        ctx: &SideContext,
        pawns: Bitboard,
        enemies: Bitboard,
    ) {
        let not_file_a = !Bitboard::file(File::A);
        let not_file_h = !Bitboard::file(File::H);

        // pawn sets by what their target squares allow
        let mut left = pawns & ctx.sources_behind(enemies & not_file_h, ctx.left_shift);
        let mut right = pawns & ctx.sources_behind(enemies & not_file_a, ctx.right_shift);
        let mut push = pawns & !ctx.sources_behind(self.all, 8);
        let double = push & Bitboard::rank(ctx.start_rank) & !ctx.sources_behind(self.all, 16);

        // promotions fan out per piece, handled after the plain moves
        let promoting = Bitboard::rank(ctx.promote_rank);
        let left_promo = left & promoting;
        left &= !promoting;
        let right_promo = right & promoting;
        right &= !promoting;
        let push_promo = push & promoting;
        push &= !promoting;

        for from in left {
            let to = from.offset(ctx.left_delta);
            let victim = self.victim_at(to);
            list.push(Move::pack(
                Piece::Pawn,
                from,
                to,
                MoveKind::Capture,
                Some(victim),
                None,
                capture_score(victim, Piece::Pawn),
            ));
        }
        for from in right {
            let to = from.offset(ctx.right_delta);
            let victim = self.victim_at(to);
            list.push(Move::pack(
                Piece::Pawn,
                from,
                to,
                MoveKind::Capture,
                Some(victim),
                None,
                capture_score(victim, Piece::Pawn),
            ));
        }
        for from in push {
            let to = from.offset(ctx.push_delta);
            list.push(Move::pack(
                Piece::Pawn,
                from,
                to,
                MoveKind::PawnPush,
                None,
                None,
                0,
            ));
        }
        for from in double {
            let to = from.offset(2 * ctx.push_delta);
            list.push(Move::pack(
                Piece::Pawn,
                from,
                to,
                MoveKind::DoublePush,
                None,
                None,
                0,
            ));
        }

        for from in left_promo {
            let to = from.offset(ctx.left_delta);
            push_promotions(list, from, to, Some(self.victim_at(to)));
        }
        for from in right_promo {
            let to = from.offset(ctx.right_delta);
            push_promotions(list, from, to, Some(self.victim_at(to)));
        }
        for from in push_promo {
            let to = from.offset(ctx.push_delta);
            push_promotions(list, from, to, None);
        }
    }

    /// Emits castles gated only on rights and empty between-squares. Attack
    /// checks on the king's path need the opponent's whole attack picture,
    /// which is cheaper to compute once at make time than per generation.
    fn generate_castling(&self, list: &mut MoveList, ctx: &SideContext) {
        for lane in [&ctx.kingside, &ctx.queenside] {
            if self.castling.any(lane.rights) && (self.all & lane.clear).is_empty() {
                list.push(Move::pack(
                    Piece::King,
                    ctx.king_from,
                    lane.king_to,
                    MoveKind::Castle,
                    None,
                    None,
                    0,
                ));
            }
        }
    }

    fn generate_piece_moves(
        &self,
        list: &mut MoveList,
        piece: Piece,
        movers: Bitboard,
        enemies: Bitboard,
    ) {
        for from in movers {
            let reach = self.piece_attacks(piece, from);
            for to in reach & enemies {
                let victim = self.victim_at(to);
                list.push(Move::pack(
                    piece,
                    from,
                    to,
                    MoveKind::Capture,
                    Some(victim),
                    None,
                    capture_score(victim, piece),
                ));
            }
            for to in reach & !self.all {
                list.push(Move::normal(piece, from, to));
            }
        }
    }

    /// Attack set of a piece standing on `from` against the current
    /// occupancy.
    pub fn piece_attacks(&self, piece: Piece, from: Square) -> Bitboard {
        match piece {
            Piece::Knight => attacks::knight_attacks(from),
            Piece::Bishop => attacks::sliding().bishop_attacks(from, self.all),
            Piece::Rook => attacks::sliding().rook_attacks(from, self.all),
            Piece::Queen => attacks::sliding().queen_attacks(from, self.all),
            Piece::King => attacks::king_attacks(from),
            // pawns advance and capture by their own rules, not an attack set
            Piece::Pawn => Bitboard::EMPTY,
        }
    }

    fn victim_at(&self, to: Square) -> Piece {
        self.piece_at(to)
            .piece()
            .expect("capture target must be occupied")
    }

    fn narrow_castling(&mut self, from: Square, to: Square) {
        self.castling
            .narrow(CASTLE_MASK[from.index() as usize] & CASTLE_MASK[to.index() as usize]);
    }

    /// Attempts a pseudo-legal move.
    ///
    /// Returns false when the move is illegal (castling out of or through
    /// attack, or any move leaving the mover's king attacked). On failure
    /// the position is restored exactly, hash included; on success the side
    /// to move flips and the state record is kept for [`Position::unmake_move`].
    pub fn make_move(&mut self, m: Move) -> bool {
        self.push_state(m);

        if let Some(target) = self.en_passant_validated {
            self.hash ^= ZOBRIST.en_passant(target);
        }
        self.en_passant = None;
        self.en_passant_validated = None;
        self.hash ^= ZOBRIST.castling(self.castling);

        let mover = self.side_to_move;
        let opponent = mover.flip();
        let from = m.from();
        let to = m.to();

        match m.kind() {
            MoveKind::Normal => {
                let piece = moving_piece(m);
                self.remove_piece(mover, piece, from);
                self.add_piece(mover, piece, to);
                self.narrow_castling(from, to);
                self.halfmove_clock += 1;
            }
            MoveKind::Capture => {
                let victim = captured_piece(m);
                let piece = moving_piece(m);
                self.remove_piece(opponent, victim, to);
                self.remove_piece(mover, piece, from);
                self.add_piece(mover, piece, to);
                self.narrow_castling(from, to);
                self.halfmove_clock = 0;
            }
            MoveKind::Castle => {
                let rook = castle_rook_move(to);
                if self.is_square_attacked(from, opponent)
                    || self.is_square_attacked(rook.king_through, opponent)
                {
                    let state = self.pop_state();
                    self.restore_state(&state);
                    return false;
                }
                self.remove_piece(mover, Piece::King, from);
                self.add_piece(mover, Piece::King, to);
                self.remove_piece(mover, Piece::Rook, rook.rook_from);
                self.add_piece(mover, Piece::Rook, rook.rook_to);
                self.narrow_castling(from, to);
                self.halfmove_clock += 1;
            }
            MoveKind::EnPassant => {
                self.remove_piece(opponent, Piece::Pawn, to.offset(ep_offset(mover)));
                self.remove_piece(mover, Piece::Pawn, from);
                self.add_piece(mover, Piece::Pawn, to);
                self.halfmove_clock = 0;
            }
            MoveKind::PawnPush => {
                self.remove_piece(mover, Piece::Pawn, from);
                self.add_piece(mover, Piece::Pawn, to);
                self.halfmove_clock = 0;
            }
            MoveKind::DoublePush => {
                self.remove_piece(mover, Piece::Pawn, from);
                self.add_piece(mover, Piece::Pawn, to);
                let target = to.offset(ep_offset(mover));
                self.en_passant = Some(target);
                if self.en_passant_attackable(opponent) {
                    self.en_passant_validated = Some(target);
                    self.hash ^= ZOBRIST.en_passant(target);
                }
                self.halfmove_clock = 0;
            }
            MoveKind::Promote => {
                self.remove_piece(mover, Piece::Pawn, from);
                self.add_piece(mover, promotion_piece(m), to);
                self.halfmove_clock = 0;
            }
            MoveKind::PromoteCapture => {
                self.remove_piece(opponent, captured_piece(m), to);
                self.remove_piece(mover, Piece::Pawn, from);
                self.add_piece(mover, promotion_piece(m), to);
                self.narrow_castling(from, to);
                self.halfmove_clock = 0;
            }
            MoveKind::Null => {}
        }

        // the single legality gate
        if self.king_attacked(mover) {
            // unmake flips back before reversing, so pre-flip here
            self.side_to_move = opponent;
            self.unmake_move();
            return false;
        }

        if mover == Color::Black {
            self.fullmove_number += 1;
        }
        self.hash ^= ZOBRIST.castling(self.castling);
        self.hash ^= ZOBRIST.side(mover);
        self.side_to_move = opponent;
        self.hash ^= ZOBRIST.side(opponent);
        true
    }

    /// Reverses the most recent successful move. The saved state record
    /// restores every scalar, hash included, so piece placement is the only
    /// thing to rewind.
    pub fn unmake_move(&mut self) {
        let opponent = self.side_to_move;
        self.side_to_move = self.side_to_move.flip();
        let state = self.pop_state();
        let m = state.last_move;
        let mover = self.side_to_move;
        let from = m.from();
        let to = m.to();

        match m.kind() {
            MoveKind::Normal | MoveKind::PawnPush | MoveKind::DoublePush => {
                let piece = moving_piece(m);
                self.remove_piece_no_hash(mover, piece, to);
                self.add_piece_no_hash(mover, piece, from);
            }
            MoveKind::Capture => {
                let piece = moving_piece(m);
                self.remove_piece_no_hash(mover, piece, to);
                self.add_piece_no_hash(mover, piece, from);
                self.add_piece_no_hash(opponent, captured_piece(m), to);
            }
            MoveKind::Castle => {
                let rook = castle_rook_move(to);
                self.remove_piece_no_hash(mover, Piece::Rook, rook.rook_to);
                self.add_piece_no_hash(mover, Piece::Rook, rook.rook_from);
                self.remove_piece_no_hash(mover, Piece::King, to);
                self.add_piece_no_hash(mover, Piece::King, from);
            }
            MoveKind::EnPassant => {
                self.remove_piece_no_hash(mover, Piece::Pawn, to);
                self.add_piece_no_hash(mover, Piece::Pawn, from);
                self.add_piece_no_hash(opponent, Piece::Pawn, to.offset(ep_offset(mover)));
            }
            MoveKind::Promote => {
                self.remove_piece_no_hash(mover, promotion_piece(m), to);
                self.add_piece_no_hash(mover, Piece::Pawn, from);
            }
            MoveKind::PromoteCapture => {
                self.remove_piece_no_hash(mover, promotion_piece(m), to);
                self.add_piece_no_hash(mover, Piece::Pawn, from);
                self.add_piece_no_hash(opponent, captured_piece(m), to);
            }
            MoveKind::Null => {}
        }

        self.restore_state(&state);
    }
}
