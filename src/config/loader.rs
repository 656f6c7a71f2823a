use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult, ConfigError};

use super::types::ConfigFile;

/// Config files picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["trafficgen.toml", "trafficgen.json"];

/// Reads the run options file: `--config <path>` when given, otherwise the
/// first of [`DEFAULT_CONFIG_FILES`] present in the working directory.
///
/// The file may set any of `clients`, `requests`, `wait`, `timeout`, `type`,
/// `follow_redirect`, `seed`, `url_source`, `verbose` and `no_color`; see
/// [`ConfigFile`]. A missing default file is not an error.
///
/// # Errors
///
/// Returns an error when the chosen file cannot be read or parsed.
pub fn load_config(explicit: Option<&str>) -> AppResult<Option<ConfigFile>> {
    let Some(path) = explicit.map(PathBuf::from).or_else(default_config_path) else {
        return Ok(None);
    };
    tracing::debug!("Reading run options from {}", path.display());
    load_config_file(&path).map(Some)
}

fn default_config_path() -> Option<PathBuf> {
    DEFAULT_CONFIG_FILES
        .iter()
        .map(Path::new)
        .find(|candidate| candidate.exists())
        .map(Path::to_path_buf)
}

pub(crate) fn load_config_file(path: &Path) -> AppResult<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|err| {
        AppError::config(ConfigError::ReadConfig {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseToml {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some("json") => serde_json::from_str(&content).map_err(|err| {
            AppError::config(ConfigError::ParseJson {
                path: path.to_path_buf(),
                source: err,
            })
        }),
        Some(ext) => Err(AppError::config(ConfigError::UnsupportedExtension {
            ext: ext.to_owned(),
        })),
        None => Err(AppError::config(ConfigError::MissingExtension)),
    }
}
