//! Root move tie-breaking
//!
//! When several root children share the best compound score the driver asks
//! a [`TieBreak`] strategy to pick one. Strategies only see the candidates,
//! already in child order; they never touch the tree.

use chess_rules::Move;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait TieBreak: Send {
    /// Pick one of `candidates`, which are in child order
    fn choose(&mut self, candidates: &[Move]) -> Option<Move>;

    fn name(&self) -> &'static str;
}

/// Earliest candidate in child order wins
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstCandidate;

impl TieBreak for FirstCandidate {
    fn choose(&mut self, candidates: &[Move]) -> Option<Move> {
        candidates.first().copied()
    }

    fn name(&self) -> &'static str {
        "first"
    }
}

/// Uniformly random candidate
#[derive(Debug, Clone)]
pub struct RandomTieBreak {
    rng: StdRng,
}

impl RandomTieBreak {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        RandomTieBreak { rng }
    }
}

impl TieBreak for RandomTieBreak {
    fn choose(&mut self, candidates: &[Move]) -> Option<Move> {
        if candidates.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..candidates.len());
        Some(candidates[index])
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Move> {
        vec![Move::plain(12, 28), Move::plain(11, 27), Move::plain(6, 21)]
    }

    #[test]
    fn test_first_candidate() {
        let mut strategy = FirstCandidate;
        assert_eq!(strategy.choose(&candidates()), Some(Move::plain(12, 28)));
        assert_eq!(strategy.choose(&[]), None);
    }

    #[test]
    fn test_random_picks_a_candidate() {
        let mut strategy = RandomTieBreak::new(Some(7));
        let pool = candidates();
        for _ in 0..50 {
            let choice = strategy.choose(&pool).unwrap();
            assert!(pool.contains(&choice));
        }
        assert_eq!(strategy.choose(&[]), None);
    }

    #[test]
    fn test_random_is_reproducible_with_seed() {
        let pool = candidates();
        let mut a = RandomTieBreak::new(Some(42));
        let mut b = RandomTieBreak::new(Some(42));
        let picks_a: Vec<_> = (0..20).map(|_| a.choose(&pool)).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.choose(&pool)).collect();
        assert_eq!(picks_a, picks_b);
    }
}
