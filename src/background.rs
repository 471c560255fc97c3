use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, info_span, Instrument};

use crate::domain::services::job_processor::JobProcessor;

struct Running {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Runs a sweep once per period while started. The first sweep happens one full
/// period after `start`; ticks missed while the process was down are not replayed.
pub struct Scheduler {
    processor: Arc<JobProcessor>,
    period: Duration,
    running: Mutex<Option<Running>>,
}

impl Scheduler {
    pub fn new(processor: Arc<JobProcessor>, period: Duration) -> Self {
        Self {
            processor,
            period,
            running: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Returns `false` if the scheduler was already started.
    pub async fn start(&self) -> bool {
        let mut running = self.running.lock().await;
        if running.is_some() {
            return false;
        }

        info!("Starting email job scheduler (every {:?})...", self.period);
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(
            run_sweeps(self.processor.clone(), self.period, shutdown_rx)
                .instrument(info_span!("email_scheduler")),
        );
        *running = Some(Running { shutdown, handle });
        true
    }

    /// Waits for an in-flight sweep to finish. Returns `false` if nothing was running.
    pub async fn stop(&self) -> bool {
        let Some(Running { shutdown, handle }) = self.running.lock().await.take() else {
            return false;
        };

        let _ = shutdown.send(());
        if let Err(e) = handle.await {
            error!("Email job scheduler task ended abnormally: {:?}", e);
        }
        info!("Email job scheduler stopped");
        true
    }
}

async fn run_sweeps(processor: Arc<JobProcessor>, period: Duration, mut shutdown: oneshot::Receiver<()>) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                processor.sweep().await;
            }
            _ = &mut shutdown => break,
        }
    }
}
