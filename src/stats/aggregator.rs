use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::duration::{DurationStats, average_of};
use super::histogram::LatencyHistogram;
use super::report::StatsReport;
use crate::args::TrafficType;
use crate::error::AppResult;
use crate::probe::{Outcome, PhaseBreakdown};

/// Nanoseconds per second, for throughput in bytes per second.
const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Counters of one run. Only ever touched through [`StatsAggregator`].
#[derive(Debug)]
struct RunStats {
    durations: DurationStats,
    run_duration: Option<Duration>,
    labels: BTreeMap<String, u64>,
    total_bytes: u64,
    non_error: u64,
    phases: Option<PhaseBreakdown>,
    histogram: LatencyHistogram,
}

/// Thread-safe accumulator shared by every worker of a run.
#[derive(Debug)]
pub struct StatsAggregator {
    traffic_type: TrafficType,
    inner: Mutex<RunStats>,
}

impl StatsAggregator {
    /// Creates an empty aggregator. HTTP runs also sum phase timings.
    ///
    /// # Errors
    ///
    /// Returns an error if the latency histogram cannot be allocated.
    pub fn new(traffic_type: TrafficType) -> AppResult<Self> {
        let phases = match traffic_type {
            TrafficType::Http => Some(PhaseBreakdown::default()),
            TrafficType::Dns => None,
        };
        Ok(Self {
            traffic_type,
            inner: Mutex::new(RunStats {
                durations: DurationStats::default(),
                run_duration: None,
                labels: BTreeMap::new(),
                total_bytes: 0,
                non_error: 0,
                phases,
                histogram: LatencyHistogram::new()?,
            }),
        })
    }

    /// Folds one probe outcome into the run statistics.
    ///
    /// Failed outcomes only count towards durations and their error label.
    pub fn add_outcome(&self, outcome: &Outcome) {
        let mut guard = self.lock();
        let stats = &mut *guard;
        stats.durations.record(outcome.duration());
        if let Err(err) = stats.histogram.record(outcome.duration()) {
            tracing::warn!("Latency not recorded in percentiles: {}", err);
        }

        if let Some(error) = outcome.error() {
            tally(&mut stats.labels, error.label());
            return;
        }

        stats.non_error = stats.non_error.saturating_add(1);
        tally(&mut stats.labels, outcome.status().to_owned());
        stats.total_bytes = stats.total_bytes.saturating_add(outcome.size());
        if let (Some(sum), Some(phases)) = (stats.phases.as_mut(), outcome.phases()) {
            *sum = sum.saturating_add(*phases);
        }
    }

    pub fn set_run_duration(&self, duration: Duration) {
        self.lock().run_duration = Some(duration);
    }

    /// Snapshot of the current statistics, ready to render.
    #[must_use]
    pub fn report(&self) -> StatsReport {
        let stats = self.lock();
        let throughput = stats
            .run_duration
            .map(|run| run.as_nanos())
            .filter(|nanos| *nanos > 0)
            .and_then(|nanos| {
                u128::from(stats.total_bytes)
                    .saturating_mul(NANOS_PER_SEC)
                    .checked_div(nanos)
            })
            .map(|rate| u64::try_from(rate).unwrap_or(u64::MAX));
        let phase_averages = stats.phases.map(|sum| {
            sum.phases()
                .map(|(label, total)| (label, average_of(total, stats.non_error)))
        });

        StatsReport {
            traffic_type: self.traffic_type,
            count: stats.durations.count(),
            non_error: stats.non_error,
            min: stats.durations.min(),
            max: stats.durations.max(),
            average: stats.durations.average(),
            total: stats.durations.total(),
            run_duration: stats.run_duration,
            throughput,
            total_bytes: stats.total_bytes,
            statuses: stats
                .labels
                .iter()
                .map(|(label, count)| (label.clone(), *count))
                .collect(),
            percentiles: stats.histogram.percentiles(),
            phase_totals: stats.phases,
            phase_averages,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RunStats> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn tally(labels: &mut BTreeMap<String, u64>, label: String) {
    let count = labels.entry(label).or_insert(0);
    *count = count.saturating_add(1);
}
