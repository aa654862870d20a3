use clap::Parser;

use crate::dispatch::Mode;

#[derive(Parser)]
#[command(name = "ticker-fetch")]
#[command(about = "Fetch ticker quotes from a remote API under a global rate limit")]
#[command(version = "0.1")]
pub struct Cli {
    /// How each worker issues the calls of one rate-limited batch
    #[arg(short, long, value_enum, default_value = "sequential")]
    pub mode: Mode,

    /// Number of quote requests to perform
    #[arg(short, long, default_value_t = 10)]
    pub num_requests: usize,

    /// Rate limit on requests allowed per period, shared across all workers
    #[arg(long, default_value_t = 25)]
    pub max_requests_per_period: u32,

    /// Duration of the rate-limiting period in seconds
    #[arg(long, default_value_t = 5.0)]
    pub period_secs: f64,

    /// Number of workers to run in parallel
    #[arg(short = 'w', long, default_value_t = 1)]
    pub num_workers: usize,

    /// Path to a JSON config with base_url, request params and the symbol list
    #[arg(short, long, default_value = "config_api_requests.json")]
    pub config: String,
}
