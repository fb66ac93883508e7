//! Sequential and chunked parallel maximum
//!
//! [`maximum`] is a single linear scan. [`max_parallel`] plans a fixed number
//! of contiguous chunks, runs [`maximum`] over each chunk on its own rayon
//! task, waits for every task at the end of the scope, and reduces the
//! partial results with one more call to [`maximum`].
//!
//! Both reducers check their preconditions before touching the data, so a
//! failed call never dispatches any concurrent work.

use std::fmt::Debug;

use crossbeam_channel::bounded;
use thiserror::Error;
use tracing::{debug, trace};

use crate::chunks::{plan_chunks, ChunkError, ChunkPlan};
use crate::config::{CollectMode, ReduceConfig};
use crate::sequence::SequenceError;

/// Errors returned by the reducers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReduceError {
    #[error("cannot take the maximum of an empty sequence")]
    EmptyInput,

    #[error("sequence length {len} is smaller than chunk_count {chunk_count}")]
    InsufficientLength { len: usize, chunk_count: usize },

    #[error("chunk_count must be greater than 0, got {0}")]
    InvalidChunkCount(usize),

    #[error("chunk {chunk} never published a partial result")]
    Unpublished { chunk: usize },

    #[error(transparent)]
    View(#[from] SequenceError),
}

impl ReduceError {
    /// Returns true if the same input would succeed with a smaller chunk count
    pub fn is_retryable_with_fewer_chunks(&self) -> bool {
        matches!(self, ReduceError::InsufficientLength { .. })
    }
}

impl From<ChunkError> for ReduceError {
    fn from(err: ChunkError) -> Self {
        match err {
            ChunkError::EmptyInput => ReduceError::EmptyInput,
            ChunkError::ZeroChunks => ReduceError::InvalidChunkCount(0),
            ChunkError::InsufficientLength { len, chunk_count } => {
                ReduceError::InsufficientLength { len, chunk_count }
            }
        }
    }
}

/// Maximum of `values` in a single pass
///
/// Ties resolve to the shared value; the position of the maximum is not
/// reported.
///
/// ```
/// use chunkmax::maximum;
///
/// assert_eq!(maximum(&[3, 7, 7, 2, 7]), Ok(7));
/// assert!(maximum::<i64>(&[]).is_err());
/// ```
pub fn maximum<T: Ord + Copy>(values: &[T]) -> Result<T, ReduceError> {
    match values {
        [] => Err(ReduceError::EmptyInput),
        [only] => Ok(*only),
        [first, rest @ ..] => Ok(rest
            .iter()
            .fold(*first, |best, &value| if value > best { value } else { best })),
    }
}

/// Maximum of `values` computed over `chunk_count` concurrent chunks
///
/// Uses [`CollectMode::Slots`]. See [`max_parallel_with`] to pick the
/// collection medium.
pub fn max_parallel<T>(values: &[T], chunk_count: usize) -> Result<T, ReduceError>
where
    T: Ord + Copy + Send + Sync + Debug,
{
    max_parallel_with(values, &ReduceConfig::with_chunks(chunk_count))
}

/// Maximum of `values` computed as configured by `config`
///
/// Fails with [`ReduceError::EmptyInput`] on an empty slice and with
/// [`ReduceError::InsufficientLength`] when there are fewer values than
/// chunks. A single value is returned directly.
///
/// ```
/// use chunkmax::{max_parallel_with, CollectMode, ReduceConfig};
///
/// let values = [1, 2, 3, 4, 5, 6, 7, 100];
/// let config = ReduceConfig::with_chunks(8).with_collect(CollectMode::Channel);
/// assert_eq!(max_parallel_with(&values, &config), Ok(100));
/// ```
pub fn max_parallel_with<T>(values: &[T], config: &ReduceConfig) -> Result<T, ReduceError>
where
    T: Ord + Copy + Send + Sync + Debug,
{
    let Some(plan) = plan_parallel(values.len(), config)? else {
        return maximum(values);
    };

    let parts: Vec<&[T]> = plan.iter().map(|chunk| &values[chunk.range()]).collect();
    reduce_parts(&parts, config.collect)
}

/// Precondition checks shared by every parallel entry point
///
/// Returns `None` for a single-element input, which needs no dispatch.
pub(crate) fn plan_parallel(
    len: usize,
    config: &ReduceConfig,
) -> Result<Option<ChunkPlan>, ReduceError> {
    if len == 0 {
        return Err(ReduceError::EmptyInput);
    }
    if config.chunk_count == 0 {
        return Err(ReduceError::InvalidChunkCount(config.chunk_count));
    }
    if len == 1 {
        return Ok(None);
    }

    let plan = plan_chunks(len, config.chunk_count)?;
    debug!(
        len = plan.len,
        chunks = plan.num_chunks(),
        step = plan.step,
        remainder = plan.remainder,
        collect = %config.collect,
        "dispatching chunked maximum"
    );
    Ok(Some(plan))
}

/// Reduce each part on its own rayon task, then reduce the partial results
///
/// `parts[i]` is the data of chunk `i`. Every part must be non-empty.
pub(crate) fn reduce_parts<T>(parts: &[&[T]], collect: CollectMode) -> Result<T, ReduceError>
where
    T: Ord + Copy + Send + Sync + Debug,
{
    let partials = match collect {
        CollectMode::Slots => collect_slots(parts),
        CollectMode::Channel => collect_channel(parts),
    };
    reduce_partials(partials)
}

/// Final reduction; any chunk that failed or never published fails the call
fn reduce_partials<T>(partials: Vec<Result<T, ReduceError>>) -> Result<T, ReduceError>
where
    T: Ord + Copy + Debug,
{
    let partials = partials.into_iter().collect::<Result<Vec<T>, _>>()?;
    let max = maximum(&partials)?;
    debug!(?max, "chunked maximum complete");
    Ok(max)
}

fn unpublished<T>(count: usize) -> Vec<Result<T, ReduceError>> {
    (0..count)
        .map(|chunk| Err(ReduceError::Unpublished { chunk }))
        .collect()
}

/// Each task overwrites the slot matching its chunk index
fn collect_slots<T>(parts: &[&[T]]) -> Vec<Result<T, ReduceError>>
where
    T: Ord + Copy + Send + Sync + Debug,
{
    let mut partials = unpublished(parts.len());
    let slots = partials.iter_mut().zip(parts.iter().copied()).enumerate();

    rayon::scope(move |s| {
        for (chunk, (slot, part)) in slots {
            s.spawn(move |_| {
                *slot = maximum(part);
                trace!(chunk, partial = ?slot, "chunk reduced");
            });
        }
    });

    partials
}

/// Each task sends `(chunk index, partial)` over a channel sized to the parts
fn collect_channel<T>(parts: &[&[T]]) -> Vec<Result<T, ReduceError>>
where
    T: Ord + Copy + Send + Sync + Debug,
{
    let (tx, rx) = bounded(parts.len());

    rayon::scope(|s| {
        for (chunk, &part) in parts.iter().enumerate() {
            let tx = tx.clone();
            s.spawn(move |_| {
                if let Err(err) = tx.send((chunk, maximum(part))) {
                    debug!(chunk, %err, "partial result not delivered");
                }
            });
        }
    });
    drop(tx);

    let mut partials = unpublished(parts.len());
    for (chunk, partial) in rx.iter() {
        trace!(chunk, ?partial, "chunk reduced");
        partials[chunk] = partial;
    }

    partials
}
