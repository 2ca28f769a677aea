//! RNG module - bag random piece generation
//!
//! Implements the "7-bag" randomization algorithm used in modern Tetris.
//! Each bag contains one of each piece (I, O, T, S, Z, J, L), shuffled.
//! Draws from the bag until empty, then generates a new bag.
//!
//! A bag may hold several permutations at once (`copies`); five copies give
//! the 35-bag variant. [`FixedSequence`] replays a scripted order for tests
//! and puzzle set-ups.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::types::PieceKind;

/// Source of upcoming piece kinds
pub trait Randomizer {
    /// Draw the next piece kind
    fn draw(&mut self) -> PieceKind;

    /// Forget pending pieces and start a fresh sequence
    fn restart(&mut self);
}

/// Shuffled-bag piece generator
#[derive(Debug, Clone)]
pub struct PieceBag<R: Rng = StdRng> {
    bag: VecDeque<PieceKind>,
    copies: usize,
    rng: R,
}

impl PieceBag<StdRng> {
    /// Create a classic 7-bag with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), 1)
    }

    /// Create a bag holding `copies` permutations per refill
    pub fn with_copies(seed: u64, copies: usize) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), copies)
    }

    /// Create a 7-bag seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::from_entropy_with_copies(1)
    }

    /// Entropy-seeded bag holding `copies` permutations per refill
    pub fn from_entropy_with_copies(copies: usize) -> Self {
        Self::with_rng(StdRng::from_entropy(), copies)
    }
}

impl<R: Rng> PieceBag<R> {
    /// Create a bag over an explicit RNG; `copies` is clamped to at least 1
    pub fn with_rng(rng: R, copies: usize) -> Self {
        let mut bag = Self {
            bag: VecDeque::with_capacity(PieceKind::ALL.len() * copies.max(1)),
            copies: copies.max(1),
            rng,
        };
        bag.refill_bag();
        bag
    }

    /// Pieces per full bag
    pub fn bag_size(&self) -> usize {
        PieceKind::ALL.len() * self.copies
    }

    /// Pieces left before the next refill
    pub fn remaining(&self) -> usize {
        self.bag.len()
    }

    /// Peek at the next piece in the current bag
    pub fn peek(&self) -> Option<PieceKind> {
        self.bag.front().copied()
    }

    /// Generate a new shuffled bag
    fn refill_bag(&mut self) {
        let mut fresh: Vec<PieceKind> = (0..self.copies)
            .flat_map(|_| PieceKind::ALL)
            .collect();
        fresh.shuffle(&mut self.rng);
        self.bag.extend(fresh);
    }
}

impl<R: Rng> Randomizer for PieceBag<R> {
    fn draw(&mut self) -> PieceKind {
        if self.bag.is_empty() {
            self.refill_bag();
        }
        match self.bag.pop_front() {
            Some(kind) => kind,
            // refill_bag always pushes at least seven pieces
            None => PieceKind::I,
        }
    }

    fn restart(&mut self) {
        self.bag.clear();
        self.refill_bag();
    }
}

/// Replays a fixed list of kinds, cycling when exhausted
#[derive(Debug, Clone)]
pub struct FixedSequence {
    kinds: Vec<PieceKind>,
    index: usize,
}

impl FixedSequence {
    /// An empty list behaves like `[I]`
    pub fn new(kinds: impl IntoIterator<Item = PieceKind>) -> Self {
        let mut kinds: Vec<PieceKind> = kinds.into_iter().collect();
        if kinds.is_empty() {
            kinds.push(PieceKind::I);
        }
        Self { kinds, index: 0 }
    }
}

impl Randomizer for FixedSequence {
    fn draw(&mut self) -> PieceKind {
        let kind = self.kinds[self.index % self.kinds.len()];
        self.index += 1;
        kind
    }

    fn restart(&mut self) {
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_7bag_contains_all_pieces() {
        let mut bag = PieceBag::new(12345);
        let drawn: HashSet<PieceKind> = (0..7).map(|_| bag.draw()).collect();
        assert_eq!(drawn.len(), 7);
    }

    #[test]
    fn test_bag_refills_at_boundary() {
        let mut bag = PieceBag::new(7);
        for _ in 0..7 {
            bag.draw();
        }
        assert_eq!(bag.remaining(), 0);
        let second: HashSet<PieceKind> = (0..7).map(|_| bag.draw()).collect();
        assert_eq!(second.len(), 7);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = PieceBag::new(99);
        let mut b = PieceBag::new(99);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_35bag_has_five_of_each() {
        let mut bag = PieceBag::with_copies(3, 5);
        assert_eq!(bag.bag_size(), 35);
        let drawn: Vec<PieceKind> = (0..35).map(|_| bag.draw()).collect();
        for kind in PieceKind::ALL {
            assert_eq!(drawn.iter().filter(|&&k| k == kind).count(), 5);
        }
    }

    #[test]
    fn test_restart_refills_full_bag() {
        let mut bag = PieceBag::new(1);
        bag.draw();
        bag.draw();
        bag.restart();
        assert_eq!(bag.remaining(), 7);
    }

    #[test]
    fn test_fixed_sequence_cycles() {
        let mut seq = FixedSequence::new([PieceKind::T, PieceKind::O]);
        assert_eq!(seq.draw(), PieceKind::T);
        assert_eq!(seq.draw(), PieceKind::O);
        assert_eq!(seq.draw(), PieceKind::T);
        seq.restart();
        assert_eq!(seq.draw(), PieceKind::T);
    }
}
