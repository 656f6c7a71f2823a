//! Network probes: one request against one target, reported as an [`Outcome`].
mod classify;
mod dns;
mod http;
mod outcome;
mod resolver;
mod timeline;


use std::sync::Arc;

use async_trait::async_trait;

use crate::args::TrafficType;
use crate::engine::RunSettings;
use crate::error::AppResult;

pub use dns::DnsProbe;
pub use http::{HttpProbe, HttpProbeSettings, RedirectPolicy};
pub use outcome::{Classification, Outcome, PhaseBreakdown};
pub use resolver::build_resolver;

/// Scheme assumed for targets listed without one.
const DEFAULT_SCHEME: &str = "http://";

/// A protocol probe shared by every worker of a run.
///
/// Implementations never fail: every problem is reported through the
/// returned [`Outcome`].
#[async_trait]
pub trait Probe: Send + Sync {
    fn display_name(&self) -> &'static str;

    async fn probe(&self, target: &str) -> Outcome;
}

/// Builds the probe for the configured traffic type.
///
/// # Errors
///
/// Returns an error when the TLS connector cannot be created.
pub fn build_probe(settings: &RunSettings) -> AppResult<Arc<dyn Probe>> {
    let resolver = build_resolver(settings.timeout);
    match settings.traffic_type {
        TrafficType::Http => {
            let probe = HttpProbe::new(
                resolver,
                HttpProbeSettings {
                    timeout: settings.timeout,
                    redirects: RedirectPolicy::from_flag(settings.follow_redirect),
                },
            )?;
            Ok(Arc::new(probe))
        }
        TrafficType::Dns => Ok(Arc::new(DnsProbe::new(resolver, settings.timeout))),
    }
}

/// Prefixes `http://` to targets that carry no scheme.
#[must_use]
pub fn with_default_scheme(target: &str) -> String {
    let target = target.trim();
    if target.contains("://") {
        target.to_owned()
    } else {
        format!("{}{}", DEFAULT_SCHEME, target)
    }
}
