//! Configuration for the chunked parallel reducer

use std::fmt;
use std::str::FromStr;

/// Number of chunks used when none is configured
pub const DEFAULT_CHUNK_COUNT: usize = 8;

/// How partial results are handed back from the chunk tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectMode {
    /// Pre-sized vector indexed by chunk number; each task writes its own slot
    #[default]
    Slots,

    /// Bounded channel sized to the chunk count; each task sends one message
    Channel,
}

impl fmt::Display for CollectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectMode::Slots => write!(f, "slots"),
            CollectMode::Channel => write!(f, "channel"),
        }
    }
}

impl FromStr for CollectMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slots" => Ok(CollectMode::Slots),
            "channel" => Ok(CollectMode::Channel),
            other => Err(format!(
                "unknown collect mode '{}', expected 'slots' or 'channel'",
                other
            )),
        }
    }
}

/// Settings for one parallel reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceConfig {
    /// Number of chunks, and therefore of concurrent tasks
    pub chunk_count: usize,

    /// Medium used to collect partial results
    pub collect: CollectMode,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            chunk_count: DEFAULT_CHUNK_COUNT,
            collect: CollectMode::default(),
        }
    }
}

impl ReduceConfig {
    /// Create a configuration with the given chunk count
    pub fn with_chunks(chunk_count: usize) -> Self {
        Self {
            chunk_count,
            ..Default::default()
        }
    }

    /// Set the collection medium
    pub fn with_collect(mut self, collect: CollectMode) -> Self {
        self.collect = collect;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReduceConfig::default();
        assert_eq!(config.chunk_count, 8);
        assert_eq!(config.collect, CollectMode::Slots);
    }

    #[test]
    fn test_builder() {
        let config = ReduceConfig::with_chunks(3).with_collect(CollectMode::Channel);
        assert_eq!(config.chunk_count, 3);
        assert_eq!(config.collect, CollectMode::Channel);
    }

    #[test]
    fn test_collect_mode_parse() {
        assert_eq!("slots".parse::<CollectMode>(), Ok(CollectMode::Slots));
        assert_eq!("Channel".parse::<CollectMode>(), Ok(CollectMode::Channel));
        assert!("queue".parse::<CollectMode>().is_err());
        assert_eq!(CollectMode::Channel.to_string(), "channel");
    }
}
