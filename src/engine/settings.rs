use std::time::Duration;

use crate::args::TrafficType;

/// Resolved parameters of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSettings {
    pub clients: usize,
    /// Iterations performed by each client.
    pub requests: u64,
    /// Pause between two iterations of the same client.
    pub wait: Duration,
    /// Per-probe deadline.
    pub timeout: Duration,
    pub traffic_type: TrafficType,
    pub follow_redirect: bool,
    pub seed: i64,
    pub color: bool,
}
