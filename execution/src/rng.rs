//! Number drawing.

use lottosim_types::{GameConfig, Settings, Target, Ticket};
use rand::{rngs::OsRng, Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::{
    collections::BTreeSet,
    ops::RangeInclusive,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::warn;

/// Where a [DrawRng] got its seed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entropy {
    /// Seeded from the operating system's entropy source.
    Os,
    /// Seeded explicitly (reproducible runs).
    Seeded(u64),
    /// The OS source failed; seeded from the wall clock.
    Fallback,
}

/// Random source for tickets and targets.
///
/// Backed by ChaCha20, seeded from the OS when possible.
#[derive(Clone)]
pub struct DrawRng {
    inner: ChaCha20Rng,
    entropy: Entropy,
}

impl DrawRng {
    /// Seed from the OS entropy source, falling back to a time-derived seed.
    ///
    /// Never fails; check [DrawRng::is_weak] to learn whether the fallback
    /// was taken.
    pub fn from_entropy() -> Self {
        match ChaCha20Rng::from_rng(OsRng) {
            Ok(inner) => Self {
                inner,
                entropy: Entropy::Os,
            },
            Err(err) => {
                warn!(?err, "os entropy unavailable, seeding from clock");
                let nanos = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or_default();
                Self {
                    inner: ChaCha20Rng::seed_from_u64(nanos ^ std::process::id() as u64),
                    entropy: Entropy::Fallback,
                }
            }
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha20Rng::seed_from_u64(seed),
            entropy: Entropy::Seeded(seed),
        }
    }

    pub fn entropy(&self) -> Entropy {
        self.entropy
    }

    pub fn is_weak(&self) -> bool {
        self.entropy == Entropy::Fallback
    }

    /// Uniform integer in `range`.
    pub fn int_in(&mut self, range: RangeInclusive<u16>) -> u16 {
        if range.is_empty() {
            return *range.start();
        }
        self.inner.gen_range(range)
    }

    /// Draw `count` unique numbers from `1..=max` minus `exclude`, sorted.
    ///
    /// Returns fewer than `count` numbers if the pool is too small.
    pub fn draw(&mut self, max: u16, count: u16, exclude: &BTreeSet<u16>) -> Vec<u16> {
        let pool: Vec<u16> = (1..=max).filter(|n| !exclude.contains(n)).collect();
        let mut result = self.pick(pool, count as usize);
        result.sort_unstable();
        result
    }

    /// Remove up to `count` uniformly chosen numbers from `pool`.
    fn pick(&mut self, mut pool: Vec<u16>, count: usize) -> Vec<u16> {
        let count = count.min(pool.len());
        let mut result = Vec::with_capacity(count);
        for _ in 0..count {
            let idx = self.inner.gen_range(0..pool.len());
            result.push(pool.swap_remove(idx));
        }
        result
    }

    /// Generate a ticket for the configured game.
    ///
    /// Takes every pinned number, fills from the preferred numbers, then
    /// from the numbers that are neither pinned, preferred nor excluded.
    /// The main numbers are sorted.
    pub fn ticket(&mut self, settings: &Settings) -> Ticket {
        let game = &settings.game;
        let count = game.main_count as usize;
        let pinned = &settings.pinned_numbers;
        let preferred = &settings.preferred_numbers;

        let mut main: Vec<u16> = pinned.iter().copied().take(count).collect();
        let pool: Vec<u16> = preferred
            .iter()
            .copied()
            .filter(|n| !pinned.contains(n))
            .collect();
        let needed = count.saturating_sub(main.len());
        main.extend(self.pick(pool, needed));
        if main.len() < count {
            let pool: Vec<u16> = (1..=game.max_main)
                .filter(|n| {
                    !pinned.contains(n)
                        && !preferred.contains(n)
                        && !settings.excluded_numbers.contains(n)
                })
                .collect();
            let needed = count - main.len();
            main.extend(self.pick(pool, needed));
        }
        main.sort_unstable();

        Ticket {
            main,
            bonus: game.bonus_range().map(|range| self.int_in(range)),
        }
    }

    /// Draw a winning target for `game`.
    pub fn target(&mut self, game: &GameConfig) -> Target {
        Target {
            main: self.draw(game.max_main, game.main_count, &BTreeSet::new()),
            bonus: game.bonus_range().map(|range| self.int_in(range)),
        }
    }
}
