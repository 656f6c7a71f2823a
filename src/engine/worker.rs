use std::sync::Arc;
use std::time::Duration;

use crossterm::style::{Color, Stylize};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::watch;

use super::settings::RunSettings;
use crate::probe::{Classification, Outcome, Probe};
use crate::stats::{StatsAggregator, format_bytes_compact};
use crate::targets::TargetList;

/// Digits needed to print `max`: `floor(log10(max)) + 1`, and 1 for zero.
#[must_use]
pub fn padding_width(max: u64) -> usize {
    max.checked_ilog10().map_or(1, |digits| {
        usize::try_from(digits).unwrap_or(0).saturating_add(1)
    })
}

/// Layout of the per-iteration log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    worker_width: usize,
    iteration_width: usize,
    total: u64,
    color: bool,
}

impl LineFormat {
    #[must_use]
    pub fn new(clients: usize, requests: u64, color: bool) -> Self {
        Self {
            worker_width: padding_width(u64::try_from(clients).unwrap_or(u64::MAX)),
            iteration_width: padding_width(requests),
            total: requests,
            color,
        }
    }

    /// `worker#03 - 007/100 | 200 |       12.5ms | Get http://a.example ( 1.20KB )`
    #[must_use]
    pub fn render(&self, worker_id: usize, iteration: u64, outcome: &Outcome) -> String {
        let status = outcome.short_status();
        let status = if self.color {
            status
                .with(status_color(outcome.classification()))
                .to_string()
        } else {
            status
        };
        let suffix = match (outcome.error(), outcome.status_code()) {
            (Some(error), _) => format!(" : {}", error.detail()),
            (None, Some(_)) => format!(" ( {} )", format_bytes_compact(outcome.size())),
            (None, None) => String::new(),
        };
        let duration = format!("{:?}", outcome.duration());
        format!(
            "worker#{:0ww$} - {:0iw$}/{} | {} | {:>12} | Get {}{}",
            worker_id,
            iteration,
            self.total,
            status,
            duration,
            outcome.url(),
            suffix,
            ww = self.worker_width,
            iw = self.iteration_width,
        )
    }
}

const fn status_color(classification: Classification) -> Color {
    match classification {
        Classification::Success => Color::Green,
        Classification::Warning => Color::Yellow,
        Classification::Critical => Color::Red,
    }
}

/// One simulated client.
pub struct Worker {
    id: usize,
    iterations: u64,
    wait: Duration,
    probe: Arc<dyn Probe>,
    stats: Arc<StatsAggregator>,
    targets: TargetList,
    rng: StdRng,
    cancel: watch::Receiver<bool>,
    line: LineFormat,
}

impl Worker {
    #[must_use]
    pub fn new(
        id: usize,
        settings: &RunSettings,
        probe: Arc<dyn Probe>,
        stats: Arc<StatsAggregator>,
        targets: TargetList,
        cancel: watch::Receiver<bool>,
    ) -> Self {
        Self {
            id,
            iterations: settings.requests,
            wait: settings.wait,
            probe,
            stats,
            targets,
            rng: StdRng::seed_from_u64(worker_seed(settings.seed, id)),
            cancel,
            line: LineFormat::new(settings.clients, settings.requests, settings.color),
        }
    }

    /// Runs every iteration unless cancellation is raised first.
    ///
    /// Cancellation is observed between iterations; a probe already in
    /// flight always completes and is recorded.
    pub async fn run(mut self) {
        for iteration in 1..=self.iterations {
            if *self.cancel.borrow() {
                tracing::debug!("worker#{} stopping before iteration {}", self.id, iteration);
                return;
            }

            let target = self.targets.pick(&mut self.rng);
            let outcome = self.probe.probe(target).await;
            self.stats.add_outcome(&outcome);
            tracing::info!("{}", self.line.render(self.id, iteration, &outcome));

            tokio::select! {
                () = tokio::time::sleep(self.wait) => {}
                () = cancelled(&mut self.cancel) => {}
            }
        }
    }
}

/// Per-worker seed so that a fixed run seed reproduces every sequence.
fn worker_seed(seed: i64, id: usize) -> u64 {
    let id = u64::try_from(id).unwrap_or(u64::MAX);
    u64::from_ne_bytes(seed.to_ne_bytes()).wrapping_add(id)
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}
