mod app;
mod config;
mod probe;
mod stats;
mod targets;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use probe::ProbeError;
pub use stats::StatsError;
pub use targets::TargetError;
pub use validation::ValidationError;
