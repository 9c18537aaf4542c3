//! Perft: exhaustive move-path enumeration.
//!
//! Counts the positions reachable at a fixed depth via
//! generate - make - recurse - unmake. The totals are compared against
//! published reference counts, which exercises every corner of move
//! generation and make/unmake at once.

use crate::{MoveListPool, Position};
use citrine_core::FenError;

/// An enumeration driver over one position.
pub struct Perft {
    position: Position,
    pool: MoveListPool,
}

impl Perft {
    /// Starts from the standard starting position.
    pub fn new() -> Self {
        Perft {
            position: Position::startpos(),
            pool: MoveListPool::new(10),
        }
    }

    /// Starts from an arbitrary position.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Perft {
            position: Position::from_fen(fen)?,
            pool: MoveListPool::new(10),
        })
    }

    /// Counts leaf positions `depth` plies out.
    pub fn expand(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut list = self.pool.acquire();
        self.position.generate_moves(&mut list);

        let mut nodes = 0;
        for i in 0..list.len() {
            let m = list[i];
            if !self.position.make_move(m) {
                continue;
            }
            nodes += if depth == 1 { 1 } else { self.expand(depth - 1) };
            self.position.unmake_move();
        }

        self.pool.release(list);
        nodes
    }

    /// Per-move breakdown at the root: move text, the position after the
    /// move, and the subtree leaf count. The tool for bisecting a count
    /// mismatch down to one move.
    pub fn divide(&mut self, depth: u32) -> Vec<(String, String, u64)> {
        let mut list = self.pool.acquire();
        self.position.generate_moves(&mut list);

        let mut results = Vec::with_capacity(list.len());
        for i in 0..list.len() {
            let m = list[i];
            if !self.position.make_move(m) {
                continue;
            }
            let fen = self.position.to_fen();
            let nodes = if depth <= 1 { 1 } else { self.expand(depth - 1) };
            results.push((m.to_string(), fen, nodes));
            self.position.unmake_move();
        }

        self.pool.release(list);
        results
    }
}

impl Default for Perft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_shallow() {
        let mut perft = Perft::new();
        assert_eq!(perft.expand(1), 20);
        assert_eq!(perft.expand(2), 400);
        assert_eq!(perft.expand(3), 8_902);
        assert_eq!(perft.expand(4), 197_281);
    }

    #[test]
    #[ignore = "slow in debug builds"]
    fn startpos_depth_five() {
        let mut perft = Perft::new();
        assert_eq!(perft.expand(5), 4_865_609);
    }

    #[test]
    fn kiwipete() {
        let mut perft = Perft::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(perft.expand(1), 48);
        assert_eq!(perft.expand(2), 2_039);
        assert_eq!(perft.expand(3), 97_862);
    }

    #[test]
    fn position_three() {
        let mut perft = Perft::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        assert_eq!(perft.expand(1), 14);
        assert_eq!(perft.expand(2), 191);
        assert_eq!(perft.expand(3), 2_812);
        assert_eq!(perft.expand(4), 43_238);
    }

    #[test]
    fn position_four() {
        let mut perft = Perft::from_fen(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        )
        .unwrap();
        assert_eq!(perft.expand(1), 6);
        assert_eq!(perft.expand(2), 264);
        assert_eq!(perft.expand(3), 9_467);
    }

    #[test]
    fn position_five() {
        let mut perft =
            Perft::from_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1").unwrap();
        assert_eq!(perft.expand(1), 44);
        assert_eq!(perft.expand(2), 1_486);
        assert_eq!(perft.expand(3), 62_379);
    }

    #[test]
    fn divide_sums_to_expand() {
        let mut perft = Perft::new();
        let breakdown = perft.divide(2);
        assert_eq!(breakdown.len(), 20);
        let total: u64 = breakdown.iter().map(|(_, _, nodes)| nodes).sum();
        assert_eq!(total, perft.expand(2));
        // every entry carries the position reached by its move
        for (_, fen, _) in &breakdown {
            assert!(fen.split(' ').nth(1) == Some("b"));
        }
    }

    #[test]
    fn enumeration_leaves_the_position_untouched() {
        let mut perft = Perft::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        let before = perft.position.clone();
        perft.expand(3);
        perft.divide(2);
        assert_eq!(perft.position, before);
    }
}
