//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;


pub use cli::TrafficArgs;
pub use types::{PositiveU64, PositiveUsize, TrafficType};

pub(crate) use defaults::DEFAULT_USER_AGENT;
