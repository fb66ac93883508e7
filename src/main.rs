use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chunkmax::{CollectMode, ReduceConfig, SequenceSource, DEFAULT_CHUNK_COUNT};
use clap::Parser;
use tracing::{debug, info};

/// Compare a sequential and a chunked parallel maximum over random integers
#[derive(Parser, Debug)]
#[command(name = "chunkmax", version)]
struct Cli {
    /// Number of random integers to generate
    #[arg(short = 'n', long, default_value_t = 100_000_000)]
    size: usize,

    /// Number of chunks reduced concurrently
    #[arg(short, long, default_value_t = DEFAULT_CHUNK_COUNT)]
    chunks: usize,

    /// Seed for the random generator; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// How partial results are collected: slots or channel
    #[arg(long, default_value_t = CollectMode::Slots)]
    collect: CollectMode,

    /// Size of the rayon thread pool; rayon picks one when omitted
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(cli.log_level())
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 2)
        .init();
}

fn report(label: &str, max: i64, elapsed: Duration) {
    info!(max, ?elapsed, "{} maximum found", label);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    debug!(?cli, "parsed arguments");

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("chunkmax-worker-{}", i))
            .build_global()
            .context("failed to build rayon thread pool")?;
    }

    let mut source = match cli.seed {
        Some(seed) => SequenceSource::seeded(seed),
        None => SequenceSource::from_entropy(),
    };

    info!(size = cli.size, "generating random integers");
    let sequence = source
        .generate(cli.size)
        .context("failed to generate random numbers")?;

    info!("searching for the maximum on one thread");
    let start = Instant::now();
    let max = sequence.maximum().context("sequential maximum failed")?;
    report("sequential", max, start.elapsed());

    let config = ReduceConfig::with_chunks(cli.chunks).with_collect(cli.collect);
    info!(
        chunks = config.chunk_count,
        collect = %config.collect,
        "searching for the maximum in parallel"
    );
    let start = Instant::now();
    let max = sequence
        .max_parallel(&config)
        .context("parallel maximum failed")?;
    report("parallel", max, start.elapsed());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["chunkmax"]).unwrap();

        assert_eq!(cli.size, 100_000_000);
        assert_eq!(cli.chunks, DEFAULT_CHUNK_COUNT);
        assert_eq!(cli.collect, CollectMode::Slots);
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "chunkmax", "-n", "13", "-c", "4", "--seed", "7", "--collect", "channel", "-vv",
        ])
        .unwrap();

        assert_eq!(cli.size, 13);
        assert_eq!(cli.chunks, 4);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.collect, CollectMode::Channel);
        assert_eq!(cli.log_level(), "trace");
    }

    #[test]
    fn test_report_handles_durations_beyond_u64_micros() {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            report("parallel", 1, Duration::MAX);
            report("sequential", 1, Duration::from_micros(1500));
        });
    }
}
