use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TargetError {
    #[error("Failed to read URL file '{path}': {source}")]
    ReadUrlFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("URL file '{path}' contained no usable targets.")]
    UrlFileEmpty { path: PathBuf },
    #[error("Target list was empty.")]
    Empty,
}
