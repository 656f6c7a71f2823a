//! Target list loading and random selection.

use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use url::Url;

use crate::error::TargetError;
use crate::probe::with_default_scheme;

/// Marks a comment line in a target file.
const COMMENT_PREFIX: char = '#';

/// Immutable snapshot of the run's targets, shared by every worker.
///
/// Never empty: both constructors refuse an empty list.
#[derive(Debug, Clone)]
pub struct TargetList {
    targets: Arc<[String]>,
}

impl TargetList {
    /// # Errors
    ///
    /// Returns [`TargetError::Empty`] when `targets` is empty.
    pub fn from_vec(targets: Vec<String>) -> Result<Self, TargetError> {
        if targets.is_empty() {
            return Err(TargetError::Empty);
        }
        Ok(Self {
            targets: targets.into(),
        })
    }

    /// Reads a newline-delimited target file.
    ///
    /// Lines are trimmed; blank lines and `#` comments are skipped. Entries
    /// that do not form a valid URL once a scheme is assumed are logged and
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or holds no usable
    /// target.
    pub fn load(path: &Path) -> Result<Self, TargetError> {
        let content = std::fs::read_to_string(path).map_err(|err| TargetError::ReadUrlFile {
            path: path.to_path_buf(),
            source: err,
        })?;
        let targets = parse_targets(&content);
        if targets.is_empty() {
            return Err(TargetError::UrlFileEmpty {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!("Loaded {} targets from {}", targets.len(), path.display());
        Self::from_vec(targets)
    }

    /// Picks a target uniformly at random.
    #[must_use]
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let index = rng.gen_range(0..self.targets.len());
        self.targets.get(index).map_or("", String::as_str)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.targets.len()
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[String] {
        &self.targets
    }
}

fn parse_targets(content: &str) -> Vec<String> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                return None;
            }
            match Url::parse(&with_default_scheme(line)) {
                Ok(url) if url.host_str().is_some_and(|host| !host.is_empty()) => {
                    Some(line.to_owned())
                }
                Ok(_) => {
                    tracing::warn!("Skipping target on line {}: missing host", index.saturating_add(1));
                    None
                }
                Err(err) => {
                    tracing::warn!(
                        "Skipping invalid target on line {}: {}",
                        index.saturating_add(1),
                        err
                    );
                    None
                }
            }
        })
        .collect()
}
