//! Seeded randomness for piece and food generation
//!
//! Every piece is drawn independently: a uniform kind, then a uniform
//! rotation from that kind's table. Food lands on a uniformly chosen free
//! cell. A seeded ChaCha stream keeps runs reproducible in tests.

use crate::grid::Point;
use crate::piece::Piece;
use crate::tetromino::PieceKind;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct Randomizer {
    rng: ChaCha8Rng,
}

impl Default for Randomizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Randomizer {
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw a random piece spawned for a board of `board_width`
    pub fn next_piece(&mut self, board_width: usize) -> Piece {
        let kinds = PieceKind::all();
        let kind = kinds[self.rng.gen_range(0..kinds.len())];
        let rotation = self.rng.gen_range(0..kind.rotations().len());
        Piece::new(kind, rotation, board_width)
    }

    /// Pick a random cell not covered by `occupied`, None if the board is full
    pub fn free_cell<'a, I>(&mut self, width: usize, height: usize, occupied: I) -> Option<Point>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let taken: HashSet<Point> = occupied.into_iter().copied().collect();
        let candidates: Vec<Point> = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Point::new(x, y)))
            .filter(|point| !taken.contains(point))
            .collect();
        candidates.choose(&mut self.rng).copied()
    }
}
