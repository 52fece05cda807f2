use std::time::Instant;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use heatscan::{EngineConfig, Observation, QuadrantTally, ScanEngine};

/// Generate random detector observations, then reduce and scan them.
#[derive(Parser, Debug)]
#[command(name = "heatscan", about = "Parallel scan-with-reduction demo")]
struct Cli {
    /// Number of observations to generate (must be a power of two).
    #[arg(long, default_value_t = 128)]
    count: usize,

    /// Sequential cutoff: subtrees with at most this many leaves fold
    /// sequentially instead of forking.
    #[arg(long, default_value_t = heatscan::DEFAULT_THRESHOLD)]
    threshold: usize,

    /// Worker thread count (default: available hardware concurrency).
    #[arg(long)]
    workers: Option<usize>,

    /// RNG seed for reproducible inputs.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print every prefix tally instead of just the last one.
    #[arg(long)]
    show_scan: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    ensure!(
        cli.count > 0 && cli.count.is_power_of_two(),
        "--count must be a power of two, got {}",
        cli.count
    );

    let observations = generate_observations(cli.count, cli.seed);

    let start = Instant::now();

    let mut config = EngineConfig::default().with_threshold(cli.threshold);
    if let Some(workers) = cli.workers {
        config = config.with_workers(workers);
    }
    let engine = ScanEngine::<QuadrantTally>::with_config(observations, config)
        .context("failed to build scan engine")?;

    let reduction = engine.reduction().context("reduction pass failed")?;
    println!("Reduction result:\n{reduction}");

    let prefixes = engine.scan().context("scan pass failed")?;
    if cli.show_scan {
        println!("Scan result:");
        for tally in &prefixes {
            println!("{tally}");
        }
    } else if let Some(last) = prefixes.last() {
        println!("Final prefix (equals reduction):\n{last}");
    }

    println!(
        "Performed reduce and scan on {} observations in {:?}.",
        engine.len(),
        start.elapsed()
    );

    Ok(())
}

/// Uniform random observations over the [-1, 1] square, timestamped in
/// bursts of sixteen events per millisecond.
fn generate_observations(count: usize, seed: u64) -> Vec<Observation> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let x = rng.gen_range(-1.0..=1.0);
            let y = rng.gen_range(-1.0..=1.0);
            Observation::new((i / 16) as i64, x, y)
        })
        .collect()
}
