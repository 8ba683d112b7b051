use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use shared::telemetry::{init_tracing, TelemetryConfig};
use shared::{DatabaseConfig, DatabasePool};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use tsdb_bench::config::BenchmarkConfig;
use tsdb_bench::evaluator::LatencyBenchmark;
use tsdb_bench::executor::PgQueryExecutor;
use tsdb_bench::input::InputSource;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input filename (csv), `-` reads standard input
    #[arg(short, long, default_value = "-")]
    file: String,
    /// Number of workers [default: 2]
    #[arg(short, long)]
    workers: Option<usize>,
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,
    /// Tasks buffered per worker queue [default: 1]
    #[arg(long)]
    queue_depth: Option<usize>,
    /// time_bucket width, as a Postgres interval [default: "1 minute"]
    #[arg(long)]
    bucket_interval: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing(TelemetryConfig::from_env("tsdb-bench"))?;

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BenchmarkConfig::from_file(path)?,
        None => BenchmarkConfig::default(),
    };
    if let Some(workers) = cli.workers {
        config.workers = workers;
    }
    if let Some(queue_depth) = cli.queue_depth {
        config.queue_depth = queue_depth;
    }
    if let Some(bucket_interval) = cli.bucket_interval {
        config.bucket_interval = bucket_interval;
    }
    config.validate()?;

    let db_config = DatabaseConfig::from_env()?;
    let input = InputSource::parse(&cli.file);

    info!("Input: {}, workers: {}", input, config.workers);
    info!("Database URL: {}", db_config.redacted_url());

    let max_connections = u32::try_from(config.workers).unwrap_or(u32::MAX);
    let db_pool = DatabasePool::connect_with_retry(
        &db_config,
        max_connections,
        config.connect_attempts,
        Duration::from_secs(config.connect_delay_secs),
    )
    .await?;

    let reader = input.open()?;

    let executor = Arc::new(PgQueryExecutor::new(
        db_pool.clone(),
        config.bucket_interval.clone(),
    ));
    let benchmark = LatencyBenchmark::new(executor, config.latency_config());
    let result = benchmark.run(reader).await?;

    db_pool.close().await;

    result.stats.print_summary();
    Ok(())
}
