use super::{apply_config, load_config_file};
use clap::{CommandFactory, FromArgMatches};
use tempfile::tempdir;

use crate::args::{TrafficArgs, TrafficType};
use crate::error::{AppError, ConfigError};

use super::types::ConfigFile;

fn parse_with_config(
    cli: &[&str],
    config: &ConfigFile,
) -> Result<TrafficArgs, String> {
    let matches = TrafficArgs::command()
        .try_get_matches_from(cli)
        .map_err(|err| format!("parse failed: {}", err))?;
    let mut args =
        TrafficArgs::from_arg_matches(&matches).map_err(|err| format!("parse failed: {}", err))?;
    apply_config(&mut args, &matches, config).map_err(|err| err.to_string())?;
    Ok(args)
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("trafficgen.toml");
    let content = r#"
clients = 4
requests = 25
wait = 250
timeout = 3
type = "dns"
follow_redirect = true
seed = -7
url_source = "./hosts.txt"
"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    let checks = [
        (config.clients == Some(4), "clients"),
        (config.requests == Some(25), "requests"),
        (config.wait == Some(250), "wait"),
        (config.timeout == Some(3), "timeout"),
        (config.traffic_type.as_deref() == Some("dns"), "type"),
        (config.follow_redirect == Some(true), "follow_redirect"),
        (config.seed == Some(-7), "seed"),
        (config.url_source.as_deref() == Some("./hosts.txt"), "url_source"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(format!("Unexpected {}: {:?}", message, config));
        }
    }
    Ok(())
}

#[test]
fn parse_json_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("trafficgen.json");
    let content = r#"{ "clients": 2, "type": "http", "no_color": true }"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.clients != Some(2) || config.no_color != Some(true) {
        return Err(format!("Unexpected config: {:?}", config));
    }
    Ok(())
}

#[test]
fn unsupported_extension_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("trafficgen.yaml");
    std::fs::write(&path, "clients: 1").map_err(|err| format!("write failed: {}", err))?;

    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected unsupported extension error".to_owned()),
    }
}

#[test]
fn malformed_toml_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("trafficgen.toml");
    std::fs::write(&path, "clients = [").map_err(|err| format!("write failed: {}", err))?;

    match load_config_file(&path) {
        Err(AppError::Config(ConfigError::ParseToml { .. })) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected parse error".to_owned()),
    }
}

#[test]
fn config_fills_unset_arguments() -> Result<(), String> {
    let config = ConfigFile {
        clients: Some(3),
        requests: Some(7),
        traffic_type: Some("DNS".to_owned()),
        seed: Some(99),
        ..ConfigFile::default()
    };
    let args = parse_with_config(&["trafficgen"], &config)?;
    let checks = [
        (args.clients.get() == 3, "clients"),
        (args.requests.get() == 7, "requests"),
        (args.traffic_type == TrafficType::Dns, "traffic type"),
        (args.seed == Some(99), "seed"),
        (args.wait == 1000, "wait keeps its default"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(format!("Unexpected {}: {:?}", message, args));
        }
    }
    Ok(())
}

#[test]
fn cli_values_win_over_config() -> Result<(), String> {
    let config = ConfigFile {
        clients: Some(3),
        wait: Some(5),
        ..ConfigFile::default()
    };
    let args = parse_with_config(&["trafficgen", "--clients", "8"], &config)?;
    if args.clients.get() != 8 {
        return Err(format!("CLI clients should win, got {}", args.clients.get()));
    }
    if args.wait != 5 {
        return Err(format!("Config wait should apply, got {}", args.wait));
    }
    Ok(())
}

#[test]
fn invalid_config_values_are_rejected() -> Result<(), String> {
    let zero_clients = ConfigFile {
        clients: Some(0),
        ..ConfigFile::default()
    };
    if parse_with_config(&["trafficgen"], &zero_clients).is_ok() {
        return Err("Expected zero clients to be rejected".to_owned());
    }

    let bad_type = ConfigFile {
        traffic_type: Some("smtp".to_owned()),
        ..ConfigFile::default()
    };
    match parse_with_config(&["trafficgen"], &bad_type) {
        Err(message) if message.contains("smtp") => Ok(()),
        Err(message) => Err(format!("Unexpected error: {}", message)),
        Ok(_) => Err("Expected unknown traffic type to be rejected".to_owned()),
    }
}

#[test]
fn explicit_config_path_is_read() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("run.json");
    std::fs::write(&path, r#"{"requests": 3}"#).map_err(|err| format!("write failed: {}", err))?;
    let path_str = path
        .to_str()
        .ok_or_else(|| "tempdir path is not UTF-8".to_owned())?;

    let config = super::load_config(Some(path_str))
        .map_err(|err| err.to_string())?
        .ok_or_else(|| "Expected a config file".to_owned())?;
    if config.requests != Some(3) {
        return Err(format!("Unexpected requests: {:?}", config.requests));
    }

    let missing = dir.path().join("absent.toml");
    let missing_str = missing
        .to_str()
        .ok_or_else(|| "tempdir path is not UTF-8".to_owned())?;
    if super::load_config(Some(missing_str)).is_ok() {
        return Err("Expected an error for a missing explicit config".to_owned());
    }
    Ok(())
}
