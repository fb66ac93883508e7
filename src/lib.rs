//! Chunkmax: sequential and chunked parallel maximum
//!
//! This crate computes the maximum of a large integer sequence two ways: a
//! single linear scan, and a fixed number of contiguous chunks reduced
//! concurrently and combined into one result.

pub mod chunks;
pub mod config;
pub mod reduce;
pub mod sequence;
pub mod source;

// Re-export main types at crate root
pub use chunks::{plan_chunks, Chunk, ChunkError, ChunkPlan};
pub use config::{CollectMode, ReduceConfig, DEFAULT_CHUNK_COUNT};
pub use reduce::{max_parallel, max_parallel_with, maximum, ReduceError};
pub use sequence::{Sequence, SequenceError, SequenceView};
pub use source::{SequenceSource, SourceError};
