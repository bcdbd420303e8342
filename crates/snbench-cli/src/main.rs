//! snbench - sync server latency benchmark
//!
//! Usage:
//!   SN_EMAIL=… SN_PASSWORD=… snbench --iterations 10 --purge-post-iter
//!
//! Each iteration signs in and pushes a batch of encrypted notes, timing
//! both. Averages go to stdout, progress logging to stderr.

mod config;

use std::time::Duration;

use clap::Parser;
use snbench_core::generator::DEFAULT_BATCH_SIZE;
use snbench_core::{BenchConfig, Benchmark, ContentType, FilterSet, Report};
use snbench_sync::HttpSyncClient;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "snbench")]
#[command(author, version, about = "Sync server latency benchmark")]
#[command(
    long_about = "Measures sign-in and item upload latency against a notes sync server.\n\n\
    Credentials come from SN_EMAIL and SN_PASSWORD; SN_SERVER overrides the endpoint."
)]
struct Cli {
    /// Times to run
    #[arg(long, default_value_t = 1)]
    iterations: u32,

    /// Purge items before running tests
    #[arg(long)]
    purge_before_tests: bool,

    /// Purge after each iteration
    #[arg(long = "purge-post-iter")]
    purge_post_iter: bool,

    /// Notes pushed per iteration
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Content types deleted by purges
    #[arg(long = "purge-type", value_delimiter = ',', default_values = ["Note", "Tag"])]
    purge_types: Vec<ContentType>,

    /// Per-request timeout in seconds (none by default)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn bench_config(&self) -> BenchConfig {
        BenchConfig {
            iterations: self.iterations,
            purge_before_tests: self.purge_before_tests,
            purge_post_iteration: self.purge_post_iter,
            batch_size: self.batch_size,
            purge_filters: FilterSet::types(self.purge_types.iter().cloned()),
        }
    }
}

fn log_run_start(server: &str, config: &BenchConfig, timeout: Option<u64>) {
    info!(
        server,
        iterations = config.iterations,
        batch_size = config.batch_size,
        purge_before_tests = config.purge_before_tests,
        purge_post_iteration = config.purge_post_iteration,
        timeout_secs = ?timeout,
        "starting benchmark"
    );
}

fn print_summary(report: &Report) {
    println!("-----------");
    println!(
        "Average Auth time: {:?}",
        report.average_auth().unwrap_or_default()
    );
    println!(
        "Average Put time:  {:?}",
        report.average_put().unwrap_or_default()
    );
    if report.purged() > 0 {
        println!("Items purged:      {}", report.purged());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries the summary
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let credentials = config::credentials_from_env()?;
    let client = match cli.timeout {
        Some(secs) => HttpSyncClient::with_timeout(Duration::from_secs(secs))?,
        None => HttpSyncClient::new(),
    };

    let config = cli.bench_config();
    log_run_start(&credentials.server, &config, cli.timeout);

    let report = Benchmark::new(&client, credentials, config).run().await?;
    info!(
        samples = report.samples().len(),
        purged = report.purged(),
        "benchmark finished"
    );

    print_summary(&report);
    Ok(())
}
