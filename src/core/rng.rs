//! Deterministic dice rolling for sampled battles.
//!
//! The exact analyzer never touches randomness. `BattleRng` exists for the
//! Monte-Carlo side of the crate: `Board::roll` and the simulation runner.
//!
//! ```
//! use battle_odds::core::BattleRng;
//!
//! let mut rng = BattleRng::new(42);
//! let die = rng.roll_die();
//! assert!((1..=6).contains(&die));
//!
//! // Same seed, same rolls
//! let mut a = BattleRng::new(7);
//! let mut b = BattleRng::new(7);
//! assert_eq!(a.count_hits(10, 3), b.count_hits(10, 3));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of faces on a combat die.
pub const DIE_FACES: u32 = 6;

/// Deterministic RNG with forking for independent trials.
///
/// Uses ChaCha8 for speed while keeping a reproducible stream per seed.
#[derive(Clone, Debug)]
pub struct BattleRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl BattleRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fork this RNG to create an independent branch.
    ///
    /// Each fork produces a different but deterministic sequence, so a trial
    /// run on a fork never shifts the dice seen by later trials.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self {
            inner: ChaCha8Rng::seed_from_u64(fork_seed),
            seed: fork_seed,
            fork_counter: 0,
        }
    }

    /// Roll a single die, returning a face in `1..=6`.
    pub fn roll_die(&mut self) -> u32 {
        self.inner.gen_range(1..=DIE_FACES)
    }

    /// Roll `dice` dice and count those showing `power` or less.
    pub fn count_hits(&mut self, dice: u32, power: u32) -> u32 {
        if power == 0 {
            return 0;
        }
        (0..dice).filter(|_| self.roll_die() <= power).count() as u32
    }
}
