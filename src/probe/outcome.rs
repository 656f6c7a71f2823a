use std::time::Duration;

use crate::error::ProbeError;

/// Severity assigned to a probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Success,
    Warning,
    Critical,
}

impl Classification {
    /// 2xx responses succeed; any other completed response is a warning.
    #[must_use]
    pub const fn from_status(status_code: u16) -> Self {
        if status_code >= 200 && status_code < 300 {
            Classification::Success
        } else {
            Classification::Warning
        }
    }
}

/// Time spent in each stage of one HTTP request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseBreakdown {
    pub resolution: Duration,
    pub connection: Duration,
    pub establishing: Duration,
    pub server_processing: Duration,
    pub content_transfer: Duration,
}

impl PhaseBreakdown {
    #[must_use]
    pub const fn saturating_add(self, other: PhaseBreakdown) -> Self {
        Self {
            resolution: self.resolution.saturating_add(other.resolution),
            connection: self.connection.saturating_add(other.connection),
            establishing: self.establishing.saturating_add(other.establishing),
            server_processing: self
                .server_processing
                .saturating_add(other.server_processing),
            content_transfer: self.content_transfer.saturating_add(other.content_transfer),
        }
    }

    /// Labelled phases in timeline order.
    #[must_use]
    pub const fn phases(&self) -> [(&'static str, Duration); 5] {
        [
            ("DNSLookup", self.resolution),
            ("TCPConnection", self.connection),
            ("EstablishingConnection", self.establishing),
            ("ServerProcessing", self.server_processing),
            ("ContentTransfer", self.content_transfer),
        ]
    }
}

/// Result of a single probe invocation.
///
/// Built once by the probe that ran it and never mutated afterwards; the
/// worker hands it to the aggregator by value.
#[derive(Debug, Clone)]
pub struct Outcome {
    url: String,
    duration: Duration,
    classification: Classification,
    status: String,
    status_code: Option<u16>,
    error: Option<ProbeError>,
    size: u64,
    phases: Option<PhaseBreakdown>,
}

impl Outcome {
    /// A successful probe without a protocol status code (DNS answers).
    #[must_use]
    pub fn succeeded(url: impl Into<String>, duration: Duration, status: &str) -> Self {
        Self {
            url: url.into(),
            duration,
            classification: Classification::Success,
            status: status.to_owned(),
            status_code: None,
            error: None,
            size: 0,
            phases: None,
        }
    }

    /// A completed HTTP exchange, classified from its status code.
    #[must_use]
    pub fn responded(
        url: impl Into<String>,
        duration: Duration,
        status_code: u16,
        status: &str,
    ) -> Self {
        Self {
            url: url.into(),
            duration,
            classification: Classification::from_status(status_code),
            status: status.to_owned(),
            status_code: Some(status_code),
            error: None,
            size: 0,
            phases: None,
        }
    }

    #[must_use]
    pub fn failed(url: impl Into<String>, duration: Duration, error: ProbeError) -> Self {
        Self {
            url: url.into(),
            duration,
            classification: Classification::Critical,
            status: String::new(),
            status_code: None,
            error: Some(error),
            size: 0,
            phases: None,
        }
    }

    #[must_use]
    pub const fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    #[must_use]
    pub const fn with_phases(mut self, phases: PhaseBreakdown) -> Self {
        self.phases = Some(phases);
        self
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn classification(&self) -> Classification {
        self.classification
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ProbeError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    #[must_use]
    pub const fn phases(&self) -> Option<&PhaseBreakdown> {
        self.phases.as_ref()
    }

    /// Label the outcome is counted under in the status table.
    #[cfg(test)]
    pub fn tally_label(&self) -> String {
        self.error
            .as_ref()
            .map_or_else(|| self.status.clone(), ProbeError::label)
    }

    /// Compact status for log columns: the numeric code when there is one.
    #[must_use]
    pub fn short_status(&self) -> String {
        match (self.error.as_ref(), self.status_code) {
            (Some(_), _) => "ERR".to_owned(),
            (None, Some(code)) => code.to_string(),
            (None, None) => self.status.clone(),
        }
    }
}
