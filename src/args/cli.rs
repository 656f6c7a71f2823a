use clap::Parser;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::engine::RunSettings;

use super::defaults::DEFAULT_URL_SOURCE;
use super::parsers::{parse_bool_env, parse_positive_u64, parse_positive_usize};
use super::types::{PositiveU64, PositiveUsize, TrafficType};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Concurrent synthetic-traffic generator - simulated clients probing HTTP and DNS targets with latency, status, and per-phase timing reports."
)]
pub struct TrafficArgs {
    /// Number of simulated clients making requests
    #[arg(long, short = 'c', default_value = "10", value_parser = parse_positive_usize)]
    pub clients: PositiveUsize,

    /// Number of requests made by each client
    #[arg(long, short = 'n', default_value = "10", value_parser = parse_positive_u64)]
    pub requests: PositiveU64,

    /// Milliseconds to wait between two requests of the same client
    #[arg(long, short = 'w', default_value = "1000")]
    pub wait: u64,

    /// Probe deadline in seconds
    #[arg(long, default_value = "10", value_parser = parse_positive_u64)]
    pub timeout: PositiveU64,

    /// Kind of traffic to generate
    #[arg(long = "type", short = 't', default_value = "http", value_enum)]
    pub traffic_type: TrafficType,

    /// Follow HTTP redirects instead of stopping at the first response
    #[arg(long = "follow-redirect")]
    pub follow_redirect: bool,

    /// Seed for target selection (defaults to the current time)
    #[arg(long, allow_negative_numbers = true)]
    pub seed: Option<i64>,

    /// Newline-delimited file listing the targets
    #[arg(long = "url-source", short = 'f', default_value = DEFAULT_URL_SOURCE)]
    pub url_source: String,

    /// Path to config file (TOML or JSON)
    #[arg(long)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}

impl TrafficArgs {
    /// Resolves the arguments into the settings consumed by the engine.
    #[must_use]
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            clients: self.clients.get(),
            requests: self.requests.get(),
            wait: Duration::from_millis(self.wait),
            timeout: Duration::from_secs(self.timeout.get()),
            traffic_type: self.traffic_type,
            follow_redirect: self.follow_redirect,
            seed: self.seed.unwrap_or_else(time_seed),
            color: !self.no_color,
        }
    }
}

fn time_seed() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
