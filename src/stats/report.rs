use std::fmt;
use std::time::Duration;

use super::histogram::Percentiles;
use crate::args::TrafficType;
use crate::probe::PhaseBreakdown;

/// Placeholder for values that cannot be computed yet.
const NOT_AVAILABLE: &str = "n/a";
/// Width of the label column in the rendered report.
const LABEL_WIDTH: usize = 24;

/// Immutable snapshot of a run's statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    pub traffic_type: TrafficType,
    pub count: u64,
    pub non_error: u64,
    pub min: Option<Duration>,
    pub max: Option<Duration>,
    pub average: Option<Duration>,
    pub total: Duration,
    pub run_duration: Option<Duration>,
    /// Bytes per second over the run duration.
    pub throughput: Option<u64>,
    pub total_bytes: u64,
    pub statuses: Vec<(String, u64)>,
    pub percentiles: Option<Percentiles>,
    pub phase_totals: Option<PhaseBreakdown>,
    pub phase_averages: Option<[(&'static str, Option<Duration>); 5]>,
}

#[cfg(test)]
impl StatsReport {
    pub fn status_count(&self, label: &str) -> u64 {
        self.statuses
            .iter()
            .find(|(name, _)| name == label)
            .map_or(0, |(_, count)| *count)
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Stats:")?;
        row(f, "Requests:", &self.count)?;
        row(f, "Min duration:", &format_duration(self.min))?;
        row(f, "Max duration:", &format_duration(self.max))?;
        row(f, "Average duration:", &format_duration(self.average))?;
        row(f, "Total duration:", &format_duration(Some(self.total)))?;
        row(f, "Exec duration:", &format_duration(self.run_duration))?;
        let percentiles = self.percentiles.map_or_else(
            || NOT_AVAILABLE.to_owned(),
            |p| format!("{:?} / {:?} / {:?}", p.p50, p.p90, p.p99),
        );
        row(f, "P50/P90/P99:", &percentiles)?;
        if self.traffic_type == TrafficType::Http {
            let speed = self.throughput.map_or_else(
                || NOT_AVAILABLE.to_owned(),
                |rate| format!("{}/s", format_bytes_compact(rate)),
            );
            row(f, "Avg speed:", &speed)?;
            row(f, "Total size:", &format_bytes_compact(self.total_bytes))?;
        }

        writeln!(f)?;
        writeln!(f, "Statuses:")?;
        if self.statuses.is_empty() {
            writeln!(f, "  {}", NOT_AVAILABLE)?;
        }
        for (label, count) in &self.statuses {
            row(f, &format!("{}:", label), count)?;
        }

        if let Some(phases) = self.phase_averages.as_ref() {
            writeln!(f)?;
            writeln!(f, "Request details:")?;
            for (label, average) in phases {
                row(f, &format!("{}:", label), &format_duration(*average))?;
            }
        }
        Ok(())
    }
}

fn row(f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display) -> fmt::Result {
    writeln!(f, "  {:<width$}{}", label, value, width = LABEL_WIDTH)
}

#[must_use]
pub fn format_duration(value: Option<Duration>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_owned(), |duration| format!("{:?}", duration))
}

/// Decimal byte count with two fractional digits above one kilobyte.
#[must_use]
pub fn format_bytes_compact(bytes: u64) -> String {
    const UNITS: [(u64, &str); 4] = [
        (1_000_000_000_000, "TB"),
        (1_000_000_000, "GB"),
        (1_000_000, "MB"),
        (1_000, "KB"),
    ];

    for (scale, unit) in UNITS {
        if bytes >= scale {
            let whole = bytes.checked_div(scale).unwrap_or(0);
            let frac = bytes
                .saturating_sub(whole.saturating_mul(scale))
                .saturating_mul(100)
                .checked_div(scale)
                .unwrap_or(0);
            return format!("{whole}.{frac:02}{unit}");
        }
    }
    format!("{bytes}B")
}
