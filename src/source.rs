//! Random sequence generation
//!
//! The generator is an explicit value owned by the caller. Seed it for
//! reproducible sequences, or draw the seed from the OS for benchmarking runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use crate::sequence::Sequence;

/// Errors that can occur while generating a sequence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("invalid sequence size {0}, the size must be greater than zero")]
    InvalidSize(usize),
}

/// Produces sequences of non-negative random integers
#[derive(Debug, Clone)]
pub struct SequenceSource {
    rng: StdRng,
}

impl SequenceSource {
    /// Deterministic source: the same seed always yields the same sequences
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from operating system entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Generate a sequence of `size` values in `0..=i64::MAX`
    pub fn generate(&mut self, size: usize) -> Result<Sequence, SourceError> {
        if size == 0 {
            return Err(SourceError::InvalidSize(size));
        }

        let values: Vec<i64> = (0..size)
            .map(|_| self.rng.random_range(0..=i64::MAX))
            .collect();
        debug!(size, "generated random sequence");

        Ok(Sequence::from_vec(values))
    }
}
