//! Scheduler — the timer loop that drives the automation runner.
//!
//! One tick shortly after startup (bounded initial delay, so the
//! persistence layer finishes initialising first), then one tick per fixed
//! interval. The interval is a configuration constant, not runtime-tunable.
//! Each scheduled tick is bounded by a generous timeout; on expiry the
//! tick future is dropped at its current await point, which is safe —
//! completed ledger writes are durable and unstarted sends are retried
//! next tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ports::{
    AutomationLogRepository, AutomationSettingsRepository, Clock, EventPublisher,
    NotificationDispatcher, RecipientSource,
};
use crate::runner::AutomationRunner;

/// Timing knobs for the scheduler loop.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Delay before the first tick after process start.
    pub initial_delay: Duration,
    /// Gap between scheduled ticks.
    pub interval: Duration,
    /// Ceiling on one tick's wall-clock time.
    pub tick_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            interval: Duration::from_secs(60 * 60),
            tick_timeout: Duration::from_secs(5 * 60),
        }
    }
}

/// Handle to a running scheduler loop.
///
/// Dropping the handle without calling [`SchedulerHandle::stop`] leaves
/// the loop running for the lifetime of the runtime.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal the loop to stop and wait for it to finish.
    ///
    /// An in-flight tick runs to completion (bounded by its timeout)
    /// before the loop observes the signal and exits.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Whether the loop task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the scheduler loop on the current tokio runtime.
pub fn start<SR, LR, RS, D, P, C>(
    runner: Arc<AutomationRunner<SR, LR, RS, D, P, C>>,
    config: SchedulerConfig,
) -> SchedulerHandle
where
    SR: AutomationSettingsRepository + Send + Sync + 'static,
    LR: AutomationLogRepository + Send + Sync + 'static,
    RS: RecipientSource + Send + Sync + 'static,
    D: NotificationDispatcher + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + 'static,
{
    let (shutdown, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        tracing::info!(
            interval_secs = config.interval.as_secs(),
            initial_delay_secs = config.initial_delay.as_secs(),
            "automation scheduler started"
        );

        tokio::select! {
            () = tokio::time::sleep(config.initial_delay) => {}
            _ = shutdown_rx.changed() => return,
        }
        run_scheduled_tick(&runner, config.tick_timeout).await;

        let mut interval = tokio::time::interval(config.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first interval tick completes immediately; the startup tick
        // above already covered it.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => run_scheduled_tick(&runner, config.tick_timeout).await,
                _ = shutdown_rx.changed() => {
                    tracing::info!("automation scheduler stopping");
                    return;
                }
            }
        }
    });

    SchedulerHandle { shutdown, task }
}

async fn run_scheduled_tick<SR, LR, RS, D, P, C>(
    runner: &AutomationRunner<SR, LR, RS, D, P, C>,
    tick_timeout: Duration,
) where
    SR: AutomationSettingsRepository,
    LR: AutomationLogRepository,
    RS: RecipientSource,
    D: NotificationDispatcher,
    P: EventPublisher,
    C: Clock,
{
    match tokio::time::timeout(tick_timeout, runner.tick_if_idle()).await {
        Ok(Some(Ok(report))) => {
            tracing::debug!(
                sent = report.total_sent(),
                failed = report.total_failed(),
                "scheduled tick finished"
            );
        }
        Ok(Some(Err(err))) => {
            tracing::error!(error = %err, "scheduled tick failed, retrying at the next interval");
        }
        // Overlap skip; already logged by the runner.
        Ok(None) => {}
        Err(_) => {
            tracing::error!(
                timeout_secs = tick_timeout.as_secs(),
                "scheduled tick exceeded its timeout, abandoning remaining work"
            );
        }
    }
}
