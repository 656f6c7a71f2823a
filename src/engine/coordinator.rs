use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, watch};

use super::settings::RunSettings;
use super::worker::Worker;
use crate::error::{AppError, AppResult, ValidationError};
use crate::probe::Probe;
use crate::stats::StatsAggregator;
use crate::targets::TargetList;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    Idle,
    Running,
    Terminated,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTermination {
    /// Every worker ran all of its iterations.
    Completed,
    /// Workers stopped early after one interrupt.
    Cancelled,
    /// A second interrupt arrived before the workers unwound.
    Forced,
}

/// Owns the worker pool and the lifecycle of one run.
pub struct TrafficGenerator {
    settings: RunSettings,
    targets: TargetList,
    probe: Arc<dyn Probe>,
    stats: Arc<StatsAggregator>,
    state: GeneratorState,
}

impl TrafficGenerator {
    #[must_use]
    pub const fn new(
        settings: RunSettings,
        targets: TargetList,
        probe: Arc<dyn Probe>,
        stats: Arc<StatsAggregator>,
    ) -> Self {
        Self {
            settings,
            targets,
            probe,
            stats,
            state: GeneratorState::Idle,
        }
    }

    #[must_use]
    pub const fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    /// Runs every worker to completion, or until interrupted.
    ///
    /// The first message on `interrupts` raises cancellation and keeps
    /// waiting for the workers; a second one returns
    /// [`RunTermination::Forced`] without waiting. The run duration is
    /// recorded unless the run was forced.
    ///
    /// # Errors
    ///
    /// Returns an error when the generator has already been started.
    pub async fn generate(
        &mut self,
        mut interrupts: mpsc::Receiver<()>,
    ) -> AppResult<RunTermination> {
        if self.state != GeneratorState::Idle {
            return Err(AppError::validation(
                ValidationError::GeneratorAlreadyStarted,
            ));
        }
        self.state = GeneratorState::Running;
        tracing::debug!(
            "Starting {} {} clients, {} requests each",
            self.settings.clients,
            self.probe.display_name(),
            self.settings.requests
        );

        let started = Instant::now();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let workers: Vec<_> = (1..=self.settings.clients)
            .map(|id| {
                let worker = Worker::new(
                    id,
                    &self.settings,
                    Arc::clone(&self.probe),
                    Arc::clone(&self.stats),
                    self.targets.clone(),
                    cancel_rx.clone(),
                );
                tokio::spawn(worker.run())
            })
            .collect();
        drop(cancel_rx);

        let mut watcher = tokio::spawn(async move {
            for handle in workers {
                if let Err(err) = handle.await {
                    tracing::error!("Worker task failed: {}", err);
                }
            }
        });

        let mut interrupted = false;
        let mut interrupts_open = true;
        let termination = loop {
            tokio::select! {
                joined = &mut watcher => {
                    if let Err(err) = joined {
                        tracing::error!("Worker watcher failed: {}", err);
                    }
                    break if interrupted {
                        RunTermination::Cancelled
                    } else {
                        RunTermination::Completed
                    };
                }
                received = interrupts.recv(), if interrupts_open => {
                    match received {
                        Some(()) if interrupted => {
                            tracing::warn!("Second interrupt received, stopping immediately.");
                            break RunTermination::Forced;
                        }
                        Some(()) => {
                            interrupted = true;
                            tracing::warn!(
                                "Interrupt received, waiting for clients to finish their current request. Interrupt again to force exit."
                            );
                            drop(cancel_tx.send(true));
                        }
                        None => interrupts_open = false,
                    }
                }
            }
        };

        self.state = GeneratorState::Terminated;
        if termination != RunTermination::Forced {
            self.stats.set_run_duration(started.elapsed());
        }
        Ok(termination)
    }
}
