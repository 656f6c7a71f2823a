use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Interrupts buffered before the coordinator reads them; only two matter.
const INTERRUPT_CHANNEL_CAPACITY: usize = 2;

#[must_use]
pub fn interrupt_channel() -> (mpsc::Sender<()>, mpsc::Receiver<()>) {
    mpsc::channel::<()>(INTERRUPT_CHANNEL_CAPACITY)
}

/// Forwards every Ctrl+C and SIGTERM to `interrupt_tx` until the receiver
/// goes away.
#[must_use]
pub fn setup_signal_interrupt_handler(
    interrupt_tx: mpsc::Sender<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        #[cfg(unix)]
        let mut term_signal = match signal(SignalKind::terminate()) {
            Ok(signal) => Some(signal),
            Err(err) => {
                eprintln!("Failed to register SIGTERM handler: {}", err);
                None
            }
        };

        loop {
            #[cfg(unix)]
            {
                tokio::select! {
                    () = interrupt_tx.closed() => break,
                    result = tokio::signal::ctrl_c() => {
                        if let Err(err) = result {
                            eprintln!("Failed to listen for Ctrl+C: {}", err);
                            break;
                        }
                    }
                    () = async {
                        if let Some(signal) = term_signal.as_mut() {
                            signal.recv().await;
                        } else {
                            std::future::pending::<()>().await;
                        }
                    } => {}
                }
            }

            #[cfg(not(unix))]
            {
                tokio::select! {
                    () = interrupt_tx.closed() => break,
                    result = tokio::signal::ctrl_c() => {
                        if let Err(err) = result {
                            eprintln!("Failed to listen for Ctrl+C: {}", err);
                            break;
                        }
                    }
                }
            }

            if interrupt_tx.try_send(()).is_err() {
                tracing::debug!("Interrupt dropped, coordinator is not listening");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, AppResult};
    use std::future::Future;
    use std::time::Duration;

    const SIGNAL_HANDLER_SETTLE: Duration = Duration::from_millis(10);
    const SHUTDOWN_HANDLER_TIMEOUT: Duration = Duration::from_secs(1);

    fn run_async_test<F>(future: F) -> AppResult<()>
    where
        F: Future<Output = AppResult<()>>,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
        runtime.block_on(future)
    }

    #[test]
    fn signal_handler_exits_when_receiver_closes() -> AppResult<()> {
        run_async_test(async {
            let (interrupt_tx, interrupt_rx) = interrupt_channel();
            let handle = setup_signal_interrupt_handler(interrupt_tx);

            tokio::time::sleep(SIGNAL_HANDLER_SETTLE).await;
            drop(interrupt_rx);

            tokio::time::timeout(SHUTDOWN_HANDLER_TIMEOUT, handle)
                .await
                .map_err(|err| {
                    AppError::validation(format!("Timed out waiting for signal handler: {}", err))
                })?
                .map_err(|err| AppError::validation(format!("Signal task join error: {}", err)))?;
            Ok(())
        })
    }
}
