use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform random draws used for parameter initialisation and for sampling
/// training pairs.
pub trait RandomSource {
    /// Uniform integer in `[0, n)`. Returns `0` when `n == 0`.
    fn next_index(&mut self, n: usize) -> usize;

    /// Uniform double in `[min, max)`. Callers guarantee `min < max`.
    fn next_in_range(&mut self, min: f64, max: f64) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_index(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.gen_range(0..n)
    }

    fn next_in_range(&mut self, min: f64, max: f64) -> f64 {
        self.gen_range(min..max)
    }
}

/// A seeded `StdRng` behind a mutex so several owners (or threads) can draw
/// from one stream. Cloning shares the stream.
#[derive(Debug, Clone)]
pub struct SharedRandom {
    inner: Arc<Mutex<StdRng>>,
}

impl SharedRandom {
    pub fn from_seed(seed: u64) -> SharedRandom {
        SharedRandom {
            inner: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn from_entropy() -> SharedRandom {
        SharedRandom {
            inner: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    // A panic while holding the lock cannot leave a StdRng half-updated.
    fn lock(&self) -> MutexGuard<'_, StdRng> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RngCore for SharedRandom {
    fn next_u32(&mut self) -> u32 {
        self.lock().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.lock().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.lock().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.lock().try_fill_bytes(dest)
    }
}
