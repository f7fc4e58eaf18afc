//! Randomness source for the simulated training/generation pipeline
//!
//! Training progress, final accuracy, generation latency and the displayed
//! loss are all random draws rather than real computation. The sampler is an
//! explicit, cloneable handle so tests can seed it and get reproducible runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};

/// Per-poll progress increment range (percent)
pub const PROGRESS_INCREMENT: std::ops::RangeInclusive<i64> = 5..=15;

/// Final accuracy band sampled on natural completion
pub const FINAL_ACCURACY_BAND: std::ops::Range<f64> = 0.85..0.95;

/// Generation latency band in seconds
pub const GENERATION_TIME_BAND: std::ops::Range<f64> = 2.0..5.0;

/// Displayed training loss band (recomputed on every poll, never persisted)
pub const CURRENT_LOSS_BAND: std::ops::Range<f64> = 0.1..0.5;

/// Seedable random sampler shared across handlers
#[derive(Clone)]
pub struct Sampler {
    rng: Arc<Mutex<StdRng>>,
}

impl Sampler {
    /// Sampler seeded from OS entropy (production)
    pub fn from_entropy() -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Deterministic sampler for tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned lock only means another draw panicked; the RNG state
        // itself is still usable
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }

    /// Progress advance applied on each status poll of a training session
    pub fn progress_increment(&self) -> i64 {
        self.with_rng(|rng| rng.gen_range(PROGRESS_INCREMENT))
    }

    /// Final accuracy recorded when progress saturates at 100
    pub fn final_accuracy(&self) -> f64 {
        self.with_rng(|rng| rng.gen_range(FINAL_ACCURACY_BAND))
    }

    /// Simulated elapsed time for a generation request
    pub fn generation_time(&self) -> f64 {
        self.with_rng(|rng| rng.gen_range(GENERATION_TIME_BAND))
    }

    /// Display-only loss value, freshly sampled per poll
    pub fn current_loss(&self) -> f64 {
        self.with_rng(|rng| rng.gen_range(CURRENT_LOSS_BAND))
    }
}
