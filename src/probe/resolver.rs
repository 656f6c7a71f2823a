use std::time::Duration;

use trust_dns_resolver::TokioAsyncResolver;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};

/// Builds the shared resolver from the host's resolver configuration.
///
/// Falls back to the library defaults when the system configuration cannot be
/// read. Caching is disabled so every probe performs a real lookup.
#[must_use]
pub fn build_resolver(timeout: Duration) -> TokioAsyncResolver {
    let (config, mut opts) =
        trust_dns_resolver::system_conf::read_system_conf().unwrap_or_else(|err| {
            tracing::warn!(
                "Failed to read system resolver config, using defaults: {}",
                err
            );
            (ResolverConfig::default(), ResolverOpts::default())
        });
    opts.timeout = timeout;
    opts.cache_size = 0;
    opts.attempts = 1;
    TokioAsyncResolver::tokio(config, opts)
}
