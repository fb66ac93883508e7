//! Chunk planning for the parallel reducer
//!
//! Splits an index range `[0, len)` into a fixed number of contiguous,
//! non-overlapping chunks. Every chunk but the last spans `len / chunk_count`
//! indices; the last one also absorbs the `len % chunk_count` remainder.

use thiserror::Error;

/// Errors that can occur while planning chunks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("cannot plan chunks over an empty sequence")]
    EmptyInput,

    #[error("chunk_count must be greater than 0")]
    ZeroChunks,

    #[error("sequence length {len} is smaller than chunk_count {chunk_count}")]
    InsufficientLength { len: usize, chunk_count: usize },
}

/// A contiguous half-open index range `[start, end)` owned by one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in the plan
    pub index: usize,

    /// First index covered
    pub start: usize,

    /// One past the last index covered
    pub end: usize,
}

impl Chunk {
    /// Returns the number of indices in this chunk
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if this chunk covers no indices
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the chunk as a range, ready for slicing
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// The full set of chunks for one reduction
#[derive(Debug, Clone)]
pub struct ChunkPlan {
    /// Length of the sequence being partitioned
    pub len: usize,

    /// Number of chunks requested
    pub chunk_count: usize,

    /// Length of every chunk except possibly the last
    pub step: usize,

    /// Extra indices absorbed by the last chunk
    pub remainder: usize,

    /// The individual chunks, in index order
    pub chunks: Vec<Chunk>,
}

impl ChunkPlan {
    /// Returns the number of chunks
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Returns an iterator over the chunks
    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    /// Verify that every index in `[0, len)` belongs to exactly one chunk
    pub fn covers_exactly(&self) -> bool {
        let mut seen = vec![false; self.len];
        for chunk in &self.chunks {
            for idx in chunk.range() {
                if idx >= self.len || seen[idx] {
                    return false;
                }
                seen[idx] = true;
            }
        }
        seen.iter().all(|&b| b)
    }
}

impl<'a> IntoIterator for &'a ChunkPlan {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Partition `[0, len)` into `chunk_count` contiguous chunks
///
/// # Example
///
/// ```
/// use chunkmax::chunks::plan_chunks;
///
/// let plan = plan_chunks(13, 8).unwrap();
/// assert_eq!(plan.num_chunks(), 8);
/// assert_eq!(plan.chunks[7].range(), 7..13);
/// assert!(plan.covers_exactly());
/// ```
pub fn plan_chunks(len: usize, chunk_count: usize) -> Result<ChunkPlan, ChunkError> {
    if len == 0 {
        return Err(ChunkError::EmptyInput);
    }
    if chunk_count == 0 {
        return Err(ChunkError::ZeroChunks);
    }
    if len < chunk_count {
        return Err(ChunkError::InsufficientLength { len, chunk_count });
    }

    let step = len / chunk_count;
    let remainder = len % chunk_count;

    let chunks = (0..chunk_count)
        .map(|index| {
            let start = index * step;
            let mut end = start + step;
            if index == chunk_count - 1 {
                end += remainder;
            }
            Chunk { index, start, end }
        })
        .collect();

    Ok(ChunkPlan {
        len,
        chunk_count,
        step,
        remainder,
        chunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split() {
        let plan = plan_chunks(16, 4).unwrap();

        assert_eq!(plan.num_chunks(), 4);
        assert_eq!(plan.step, 4);
        assert_eq!(plan.remainder, 0);
        assert!(plan.covers_exactly());

        let ranges: Vec<_> = plan.iter().map(Chunk::range).collect();
        assert_eq!(ranges, vec![0..4, 4..8, 8..12, 12..16]);
    }

    #[test]
    fn test_last_chunk_absorbs_remainder() {
        let plan = plan_chunks(13, 8).unwrap();

        assert_eq!(plan.step, 1);
        assert_eq!(plan.remainder, 5);
        for chunk in &plan.chunks[..7] {
            assert_eq!(chunk.len(), 1);
        }
        assert_eq!(plan.chunks[7], Chunk { index: 7, start: 7, end: 13 });
        assert!(plan.covers_exactly());
    }

    #[test]
    fn test_length_equal_to_chunk_count() {
        let plan = plan_chunks(8, 8).unwrap();

        assert_eq!(plan.num_chunks(), 8);
        assert!(plan.iter().all(|c| c.len() == 1));
        assert!(plan.covers_exactly());
    }

    #[test]
    fn test_chunk_lengths_sum_to_len() {
        for len in [1, 2, 7, 10, 100, 1000, 1001] {
            for chunk_count in [1, 2, 3, 7, 8, 10] {
                if len < chunk_count {
                    continue;
                }
                let plan = plan_chunks(len, chunk_count).unwrap();
                let total: usize = plan.iter().map(Chunk::len).sum();

                assert_eq!(total, len, "len={}, chunk_count={}", len, chunk_count);
                assert!(
                    plan.covers_exactly(),
                    "coverage failed for len={}, chunk_count={}",
                    len,
                    chunk_count
                );
                assert!(plan.iter().all(|c| !c.is_empty()));
            }
        }
    }

    #[test]
    fn test_chunks_are_contiguous_in_order() {
        let plan = plan_chunks(1001, 7).unwrap();

        assert_eq!(plan.chunks[0].start, 0);
        for pair in plan.chunks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
        assert_eq!(plan.chunks[6].end, 1001);
    }

    #[test]
    fn test_error_cases() {
        assert_eq!(plan_chunks(0, 8).unwrap_err(), ChunkError::EmptyInput);
        assert_eq!(plan_chunks(10, 0).unwrap_err(), ChunkError::ZeroChunks);
        assert_eq!(
            plan_chunks(4, 8).unwrap_err(),
            ChunkError::InsufficientLength {
                len: 4,
                chunk_count: 8
            }
        );
    }

    #[test]
    fn test_covers_exactly_detects_overlap() {
        let mut plan = plan_chunks(10, 2).unwrap();
        plan.chunks[1].start = 4;

        assert!(!plan.covers_exactly());
    }

    #[test]
    fn test_covers_exactly_detects_gap() {
        let mut plan = plan_chunks(10, 2).unwrap();
        plan.chunks[1].start = 6;

        assert!(!plan.covers_exactly());
    }
}
