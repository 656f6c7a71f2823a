use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, TrafficArgs, TrafficType};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Applies configuration values to CLI arguments.
///
/// A value from the config file only replaces an argument that was not given
/// on the command line or through the environment.
///
/// # Errors
///
/// Returns an error when a config value is out of range or not recognised.
pub fn apply_config(
    args: &mut TrafficArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_cli(matches, "clients")
        && let Some(clients) = config.clients
    {
        args.clients = ensure_positive_usize(clients, "clients")?;
    }

    if !is_cli(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = ensure_positive_u64(requests, "requests")?;
    }

    if !is_cli(matches, "wait")
        && let Some(wait) = config.wait
    {
        args.wait = wait;
    }

    if !is_cli(matches, "timeout")
        && let Some(timeout) = config.timeout
    {
        args.timeout = ensure_positive_u64(timeout, "timeout")?;
    }

    if !is_cli(matches, "traffic_type")
        && let Some(traffic_type) = config.traffic_type.as_deref()
    {
        args.traffic_type = traffic_type
            .parse::<TrafficType>()
            .map_err(|err| AppError::config(ConfigError::InvalidTrafficType { source: err }))?;
    }

    if !is_cli(matches, "follow_redirect")
        && let Some(follow_redirect) = config.follow_redirect
    {
        args.follow_redirect = follow_redirect;
    }

    if !is_cli(matches, "seed")
        && let Some(seed) = config.seed
    {
        args.seed = Some(seed);
    }

    if !is_cli(matches, "url_source")
        && let Some(url_source) = config.url_source.clone()
    {
        args.url_source = url_source;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_cli(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_u64(value: u64, field: &'static str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive { field, source: err })
    })
}

fn ensure_positive_usize(value: usize, field: &'static str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive { field, source: err })
    })
}
