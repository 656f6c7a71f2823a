use std::time::{Duration, Instant};

use async_trait::async_trait;
use trust_dns_resolver::TokioAsyncResolver;
use url::Url;

use super::Probe;
use super::classify::classify;
use super::outcome::Outcome;
use crate::error::ProbeError;

/// Status label of a successful lookup.
const DNS_OK_STATUS: &str = "OK";

/// Resolves the target's host name and times the lookup.
pub struct DnsProbe {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

impl DnsProbe {
    #[must_use]
    pub const fn new(resolver: TokioAsyncResolver, timeout: Duration) -> Self {
        Self { resolver, timeout }
    }
}

#[async_trait]
impl Probe for DnsProbe {
    fn display_name(&self) -> &'static str {
        "dns"
    }

    async fn probe(&self, target: &str) -> Outcome {
        let Some(host) = lookup_host(target) else {
            return Outcome::failed(
                target,
                Duration::ZERO,
                ProbeError::Address {
                    detail: format!("missing host in '{}'", target),
                },
            );
        };

        let started = Instant::now();
        let result = tokio::time::timeout(self.timeout, self.resolver.lookup_ip(host.as_str())).await;
        let elapsed = started.elapsed();

        match result {
            Ok(Ok(_answer)) => Outcome::succeeded(target, elapsed, DNS_OK_STATUS),
            Ok(Err(err)) => Outcome::failed(target, elapsed, classify(&err)),
            Err(_elapsed) => Outcome::failed(target, elapsed, ProbeError::Timeout),
        }
    }
}

/// Host name to resolve: bare names are used as-is, URL-shaped targets give
/// their host component.
pub(super) fn lookup_host(target: &str) -> Option<String> {
    let target = target.trim();
    if target.contains("://") {
        let url = Url::parse(target).ok()?;
        return url.host_str().map(|host| host.trim_matches(['[', ']']).to_owned());
    }
    let host = target.split(['/', '?', '#']).next().unwrap_or_default();
    let host = strip_port(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_owned())
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return host
            .split_once(']')
            .map_or(host, |(inner, _)| inner.trim_start_matches('['));
    }
    match host.rsplit_once(':') {
        Some((name, port))
            if !name.contains(':') && port.chars().all(|ch| ch.is_ascii_digit()) =>
        {
            name
        }
        Some(_) | None => host,
    }
}
