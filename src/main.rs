use std::sync::Arc;

use clap::Parser;
use tokio::time::Duration;

use ticker_fetch::cli::Cli;
use ticker_fetch::config::ApiConfig;
use ticker_fetch::dispatch::{self, DispatchOptions};
use ticker_fetch::error::{Context, Result};
use ticker_fetch::fetch::HttpQuoteApi;
use ticker_fetch::report;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ApiConfig::load(&cli.config).context("Failed to load configuration")?;
    let api = Arc::new(HttpQuoteApi::new(&config)?);

    let options = DispatchOptions {
        mode: cli.mode,
        num_requests: cli.num_requests,
        max_requests_per_period: cli.max_requests_per_period,
        period: Duration::from_secs_f64(cli.period_secs.max(0.0)),
        num_workers: cli.num_workers,
    };

    let outcome = dispatch::run(&config.symbols, &options, api).await?;
    println!("{}", report::render(&outcome));

    Ok(())
}
