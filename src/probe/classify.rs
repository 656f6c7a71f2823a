use std::error::Error;
use std::io;
use std::net::AddrParseError;

use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

use crate::error::ProbeError;

/// Maps a probe failure onto the reported taxonomy.
///
/// The source chain is walked from the outermost error inward and the first
/// recognised cause wins, so a DNS failure wrapped by a connect error still
/// reports as a DNS failure.
#[must_use]
pub fn classify(err: &(dyn Error + 'static)) -> ProbeError {
    let mut current: Option<&(dyn Error + 'static)> = Some(err);
    while let Some(cause) = current {
        if let Some(classified) = classify_one(cause) {
            return classified;
        }
        current = cause.source();
    }
    ProbeError::Other(err.to_string())
}

fn classify_one(err: &(dyn Error + 'static)) -> Option<ProbeError> {
    if let Some(resolve) = err.downcast_ref::<ResolveError>() {
        return Some(classify_resolve(resolve));
    }
    if let Some(addr) = err.downcast_ref::<AddrParseError>() {
        return Some(ProbeError::Address {
            detail: addr.to_string(),
        });
    }
    if let Some(io_err) = err.downcast_ref::<io::Error>() {
        return Some(classify_io(io_err));
    }
    if err.downcast_ref::<tokio::time::error::Elapsed>().is_some() {
        return Some(ProbeError::Timeout);
    }
    if let Some(parse) = err.downcast_ref::<url::ParseError>() {
        return Some(ProbeError::Request {
            detail: parse.to_string(),
        });
    }
    if let Some(http_err) = err.downcast_ref::<http::Error>() {
        return Some(ProbeError::Request {
            detail: http_err.to_string(),
        });
    }
    if let Some(hyper_err) = err.downcast_ref::<hyper::Error>() {
        return classify_hyper(hyper_err);
    }
    if let Some(tls) = err.downcast_ref::<native_tls::Error>() {
        return Some(ProbeError::Network {
            detail: tls.to_string(),
        });
    }
    None
}

fn classify_resolve(err: &ResolveError) -> ProbeError {
    let detail = err.to_string();
    // Resolver timeouts and socket failures are lookup failures too.
    if matches!(err.kind(), ResolveErrorKind::NoConnections) {
        ProbeError::DnsConfig { detail }
    } else {
        ProbeError::DnsLookup { detail }
    }
}

fn classify_io(err: &io::Error) -> ProbeError {
    let kind = err.kind();
    if matches!(
        kind,
        io::ErrorKind::AddrNotAvailable | io::ErrorKind::AddrInUse
    ) {
        ProbeError::Address {
            detail: err.to_string(),
        }
    } else if kind == io::ErrorKind::TimedOut {
        ProbeError::Timeout
    } else {
        ProbeError::Os {
            detail: err.to_string(),
        }
    }
}

/// Returns `None` when the hyper error wraps an IO error, letting the chain
/// walk reach it.
fn classify_hyper(err: &hyper::Error) -> Option<ProbeError> {
    if err.is_timeout() {
        return Some(ProbeError::Timeout);
    }
    if err.is_parse() || err.is_parse_status() || err.is_user() {
        return Some(ProbeError::Request {
            detail: err.to_string(),
        });
    }
    if err
        .source()
        .and_then(|source| source.downcast_ref::<io::Error>())
        .is_some()
    {
        return None;
    }
    if err.is_incomplete_message() {
        return Some(ProbeError::Request {
            detail: err.to_string(),
        });
    }
    Some(ProbeError::Network {
        detail: err.to_string(),
    })
}
