//! Read-only integer sequences with zero-copy chunk views
//!
//! A [`Sequence`] owns its values and never mutates them after construction.
//! Reducers borrow it through [`SequenceView`]s:
//!
//! - **`fetch()`** - view over the whole sequence.
//! - **`fetch_chunk()`** - view over one planned [`Chunk`].
//!
//! Views borrow from the sequence and cannot outlive it. The parallel
//! reducer fetches one view per chunk before dispatch and hands each chunk
//! task its own view.
//!
//! # Example
//!
//! ```
//! use chunkmax::{ReduceConfig, Sequence};
//!
//! let sequence = Sequence::from_vec(vec![5, 1, 9, 3, 7, 2, 8, 4]);
//!
//! assert_eq!(sequence.maximum(), Ok(9));
//! assert_eq!(sequence.max_parallel(&ReduceConfig::with_chunks(4)), Ok(9));
//!
//! // One whole-sequence view, then one view per chunk
//! assert_eq!(sequence.fetch_count(), 5);
//! ```

use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

use crate::chunks::Chunk;
use crate::config::ReduceConfig;
use crate::reduce::{maximum, plan_parallel, reduce_parts, ReduceError};

/// Errors that can occur while viewing a sequence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("chunk {index} range {start}..{end} out of bounds for length {len}")]
    ChunkOutOfBounds {
        index: usize,
        start: usize,
        end: usize,
        len: usize,
    },
}

/// An owned, immutable sequence of machine integers
///
/// Tracks how many views have been handed out, for diagnostics.
#[derive(Debug)]
pub struct Sequence {
    values: Vec<i64>,

    fetch_count: AtomicU64,
}

impl Sequence {
    /// Take ownership of `values`
    pub fn from_vec(values: Vec<i64>) -> Self {
        Self {
            values,
            fetch_count: AtomicU64::new(0),
        }
    }

    /// Returns the number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the sequence holds no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of views handed out so far
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// View the whole sequence without copying
    pub fn fetch(&self) -> SequenceView<'_> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        SequenceView {
            values: &self.values,
        }
    }

    /// View the values covered by `chunk`
    pub fn fetch_chunk(&self, chunk: &Chunk) -> Result<SequenceView<'_>, SequenceError> {
        if chunk.end > self.values.len() || chunk.start > chunk.end {
            return Err(SequenceError::ChunkOutOfBounds {
                index: chunk.index,
                start: chunk.start,
                end: chunk.end,
                len: self.values.len(),
            });
        }
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        Ok(SequenceView {
            values: &self.values[chunk.range()],
        })
    }

    /// Sequential maximum over the whole sequence
    pub fn maximum(&self) -> Result<i64, ReduceError> {
        maximum(self.fetch().as_slice())
    }

    /// Chunked parallel maximum over the whole sequence
    ///
    /// Every chunk view is fetched before any task is dispatched.
    pub fn max_parallel(&self, config: &ReduceConfig) -> Result<i64, ReduceError> {
        let Some(plan) = plan_parallel(self.len(), config)? else {
            return self.maximum();
        };

        let views = plan
            .iter()
            .map(|chunk| self.fetch_chunk(chunk))
            .collect::<Result<Vec<_>, _>>()?;
        let parts: Vec<&[i64]> = views.iter().map(SequenceView::as_slice).collect();

        reduce_parts(&parts, config.collect)
    }
}

impl From<Vec<i64>> for Sequence {
    fn from(values: Vec<i64>) -> Self {
        Self::from_vec(values)
    }
}

/// A borrowed, read-only view into a [`Sequence`]
#[derive(Debug, Clone, Copy)]
pub struct SequenceView<'a> {
    values: &'a [i64],
}

impl<'a> SequenceView<'a> {
    /// Returns the values as a slice
    pub fn as_slice(&self) -> &'a [i64] {
        self.values
    }
}

impl<'a> Deref for SequenceView<'a> {
    type Target = [i64];

    fn deref(&self) -> &Self::Target {
        self.values
    }
}

impl<'a> AsRef<[i64]> for SequenceView<'a> {
    fn as_ref(&self) -> &[i64] {
        self.values
    }
}
