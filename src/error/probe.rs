use thiserror::Error;

/// Failure of a single probe, classified into the taxonomy reported by the
/// summary.
///
/// The `Display` output is the tally label: failures with the same cause are
/// counted together regardless of the target that produced them. Use
/// [`ProbeError::detail`] for the full message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("DNS lookup error")]
    DnsLookup { detail: String },
    #[error("DNS config error")]
    DnsConfig { detail: String },
    #[error("Addr Error")]
    Address { detail: String },
    #[error("Op Error")]
    Os { detail: String },
    #[error("URL Timeout")]
    Timeout,
    #[error("URL Error: {detail}")]
    Request { detail: String },
    #[error("Net Error")]
    Network { detail: String },
    #[error("{0}")]
    Other(String),
}

impl ProbeError {
    /// Label under which the failure is tallied.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Human-readable description including the underlying cause.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            ProbeError::DnsLookup { detail } => format!("DNS lookup error: {}", detail),
            ProbeError::DnsConfig { detail } => format!("DNS config error: {}", detail),
            ProbeError::Address { detail } => format!("Addr Error: {}", detail),
            ProbeError::Os { detail } => format!("Op Error: {}", detail),
            ProbeError::Timeout => "URL Timeout: deadline exceeded".to_owned(),
            ProbeError::Request { detail } => format!("URL Error: {}", detail),
            ProbeError::Network { detail } => format!("Net Error: {}", detail),
            ProbeError::Other(message) => message.clone(),
        }
    }
}
