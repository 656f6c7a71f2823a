use std::time::Duration;

/// Running min/max/total over a stream of durations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationStats {
    count: u64,
    min: Option<Duration>,
    max: Option<Duration>,
    total: Duration,
}

impl DurationStats {
    pub fn record(&mut self, duration: Duration) {
        self.count = self.count.saturating_add(1);
        self.total = self.total.saturating_add(duration);
        self.min = Some(self.min.map_or(duration, |min| min.min(duration)));
        self.max = Some(self.max.map_or(duration, |max| max.max(duration)));
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    pub const fn min(&self) -> Option<Duration> {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Option<Duration> {
        self.max
    }

    #[must_use]
    pub const fn total(&self) -> Duration {
        self.total
    }

    /// Mean duration, or `None` before the first sample.
    #[must_use]
    pub fn average(&self) -> Option<Duration> {
        average_of(self.total, self.count)
    }
}

/// Divides `total` evenly over `count` samples.
pub(super) fn average_of(total: Duration, count: u64) -> Option<Duration> {
    let nanos = total.as_nanos().checked_div(u128::from(count))?;
    Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
}
