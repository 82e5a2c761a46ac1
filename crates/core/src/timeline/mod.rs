use std::{
    sync::mpsc::{channel, RecvTimeoutError, Sender},
    thread::JoinHandle,
    time::{Duration, Instant},
};

/// Cadence of the fade sweep.
pub const FADE_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Monotonic session clock reporting seconds since the session started.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    started: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn now_seconds(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

/// Periodic timer driving the fade sweep.
///
/// The callback runs on the timer thread and should only hand the tick to the
/// session's owner (for example by sending a message). Returning `false` from
/// the callback stops the timer. Once [`FadeScheduler::cancel`] returns the
/// callback is never invoked again.
#[derive(Debug)]
pub struct FadeScheduler {
    cancel_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl FadeScheduler {
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = channel::<()>();
        let worker = std::thread::Builder::new()
            .name("smashpad-fade".to_string())
            .spawn(move || loop {
                match cancel_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if !on_tick() {
                            tracing::debug!("fade tick receiver gone, stopping timer");
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });

        match worker {
            Ok(worker) => Self {
                cancel_tx: Some(cancel_tx),
                worker: Some(worker),
            },
            Err(err) => {
                tracing::warn!(%err, "fade timer unavailable, figures will not fade");
                Self {
                    cancel_tx: None,
                    worker: None,
                }
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|worker| !worker.is_finished())
            .unwrap_or(false)
    }

    /// Stops the timer and waits for its thread to exit.
    pub fn cancel(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("fade timer thread panicked");
            }
        }
    }
}

impl Drop for FadeScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
