use std::time::{Duration, Instant};

use super::outcome::PhaseBreakdown;

/// Connection-lifecycle events of one HTTP exchange, in timeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineEvent {
    ResolutionStart,
    ResolutionDone,
    ConnectStart,
    ConnectDone,
    ConnectionReady,
    FirstByte,
    LastByte,
}

/// Timestamps collected while a request runs.
///
/// Events that never fired (resolution of an IP literal, a request that
/// failed before its first byte) stay `None` and their phases collapse to
/// zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTimeline {
    resolution_start: Option<Instant>,
    resolution_done: Option<Instant>,
    connect_start: Option<Instant>,
    connect_done: Option<Instant>,
    connection_ready: Option<Instant>,
    first_byte: Option<Instant>,
    last_byte: Option<Instant>,
}

impl RequestTimeline {
    pub fn record(&mut self, event: TimelineEvent) {
        self.record_at(event, Instant::now());
    }

    pub const fn record_at(&mut self, event: TimelineEvent, at: Instant) {
        let slot = match event {
            TimelineEvent::ResolutionStart => &mut self.resolution_start,
            TimelineEvent::ResolutionDone => &mut self.resolution_done,
            TimelineEvent::ConnectStart => &mut self.connect_start,
            TimelineEvent::ConnectDone => &mut self.connect_done,
            TimelineEvent::ConnectionReady => &mut self.connection_ready,
            TimelineEvent::FirstByte => &mut self.first_byte,
            TimelineEvent::LastByte => &mut self.last_byte,
        };
        *slot = Some(at);
    }

    /// Splits the timeline into phases. Each phase only looks at its own two
    /// boundaries.
    #[must_use]
    pub fn breakdown(&self) -> PhaseBreakdown {
        PhaseBreakdown {
            resolution: span(self.resolution_start, self.resolution_done),
            connection: span(self.connect_start, self.connect_done),
            establishing: span(self.connect_done, self.connection_ready),
            server_processing: span(self.connection_ready, self.first_byte),
            content_transfer: span(self.first_byte, self.last_byte),
        }
    }
}

fn span(from: Option<Instant>, to: Option<Instant>) -> Duration {
    match (from, to) {
        (Some(from), Some(to)) => to.saturating_duration_since(from),
        _ => Duration::ZERO,
    }
}
