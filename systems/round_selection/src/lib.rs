#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic round selection drawing quiz targets from a region.

use city_quiz_core::{Point, Region, Round, RoundError, DEFAULT_ROUND_SIZE};
use log::debug;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the round selector.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    round_size: usize,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided round size and seed.
    #[must_use]
    pub const fn new(round_size: usize, rng_seed: u64) -> Self {
        Self {
            round_size,
            rng_seed,
        }
    }

    /// Creates a configuration with the default round size.
    #[must_use]
    pub const fn with_seed(rng_seed: u64) -> Self {
        Self::new(DEFAULT_ROUND_SIZE, rng_seed)
    }

    /// Maximum number of targets drawn per round.
    #[must_use]
    pub const fn round_size(&self) -> usize {
        self.round_size
    }
}

/// Seeded selector that draws successive rounds from regions.
#[derive(Debug)]
pub struct RoundSelector {
    round_size: usize,
    rng: ChaCha8Rng,
}

impl RoundSelector {
    /// Creates a new round selector using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            round_size: config.round_size,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Draws the next round from `region`.
    pub fn start_round(&mut self, region: &Region) -> Result<Round, RoundError> {
        select_round(region, self.round_size, &mut self.rng)
    }
}

/// Draws `min(round_size, |points|)` distinct points uniformly at random and
/// shuffles their names independently into the label order.
pub fn select_round<R>(
    region: &Region,
    round_size: usize,
    rng: &mut R,
) -> Result<Round, RoundError>
where
    R: Rng + ?Sized,
{
    if round_size == 0 {
        return Err(RoundError::ZeroRoundSize);
    }
    // Unreachable through `Region::new`, which refuses empty regions.
    if region.points().is_empty() {
        return Err(RoundError::EmptyRegion {
            code: region.code().to_owned(),
        });
    }

    let mut pool: Vec<&Point> = region.points().iter().collect();
    pool.shuffle(rng);
    pool.truncate(round_size);
    let targets: Vec<Point> = pool.into_iter().cloned().collect();

    let mut label_order: Vec<String> = targets
        .iter()
        .map(|target| target.name().to_owned())
        .collect();
    label_order.shuffle(rng);

    debug!(
        "drew {} of {} points from region `{}`",
        targets.len(),
        region.points().len(),
        region.code()
    );
    Round::new(targets, label_order)
}
