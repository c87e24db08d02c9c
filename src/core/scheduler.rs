//! Timer-driven orchestrator for the recurring activities

use crate::config::ScheduleConfig;
use crate::core::calendar;
use crate::error::SchedulerError;
use crate::jobs::context::JobContext;
use crate::jobs::handlers;
use crate::jobs::types::Activity;
use chrono::{Local, NaiveDateTime, NaiveTime};
use futures_util::future::join_all;
use futures_util::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, timeout, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Created,
    Running,
    ShuttingDown,
    Stopped,
}

impl OrchestratorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestratorState::Created => "CREATED",
            OrchestratorState::Running => "RUNNING",
            OrchestratorState::ShuttingDown => "SHUTTING_DOWN",
            OrchestratorState::Stopped => "STOPPED",
        }
    }
}

/// When an activity fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Every day at a local wall-clock time.
    Daily(NaiveTime),
    /// Fixed rate after an initial delay.
    Every { initial_delay: Duration, period: Duration },
    /// Once, after a delay.
    Once(Duration),
}

impl Trigger {
    /// Delay before the first fire when starting at `now`.
    pub fn first_delay(&self, now: NaiveDateTime) -> Duration {
        match *self {
            Trigger::Daily(at) => calendar::initial_delay(now, at),
            Trigger::Every { initial_delay, .. } => initial_delay,
            Trigger::Once(delay) => delay,
        }
    }

    pub fn period(&self) -> Option<Duration> {
        match *self {
            Trigger::Daily(_) => Some(DAY),
            Trigger::Every { period, .. } => Some(period),
            Trigger::Once(_) => None,
        }
    }
}

/// The activity/trigger table for a schedule configuration.
pub fn plan(schedule: &ScheduleConfig) -> Vec<(Activity, Trigger)> {
    let mut plan = vec![
        (Activity::DailyFetch, Trigger::Daily(schedule.fetch_time)),
        (Activity::DailyAnalysis, Trigger::Daily(schedule.analysis_time)),
        (
            Activity::NewsRefresh,
            Trigger::Every {
                initial_delay: schedule.news_initial_delay,
                period: schedule.news_interval,
            },
        ),
        (
            Activity::NotificationFlush,
            Trigger::Every {
                initial_delay: schedule.notification_initial_delay,
                period: schedule.notification_interval,
            },
        ),
        (
            Activity::PriceMonitor,
            Trigger::Every {
                initial_delay: schedule.price_monitor_initial_delay,
                period: schedule.price_monitor_interval,
            },
        ),
    ];
    if schedule.initial_sync {
        plan.push((Activity::InitialSync, Trigger::Once(schedule.initial_sync_delay)));
    }
    plan
}

fn validate(schedule: &ScheduleConfig) -> Result<(), SchedulerError> {
    if schedule.pool_size == 0 {
        return Err(SchedulerError::InvalidConfig("worker pool size must be > 0".into()));
    }
    for (activity, trigger) in plan(schedule) {
        if trigger.period() == Some(Duration::ZERO) {
            return Err(SchedulerError::InvalidConfig(format!(
                "{} interval must be > 0",
                activity
            )));
        }
    }
    Ok(())
}

/// Runs the recurring activities on fixed-rate timers against a shared
/// [`JobContext`], at most `pool_size` bodies at a time.
///
/// `start` registers the timers and returns immediately. `stop` stops new
/// fires, waits up to the shutdown grace period for running bodies, cancels
/// what is left and closes the collaborator handles. A stopped orchestrator
/// cannot be restarted.
pub struct JobOrchestrator {
    ctx: Arc<JobContext>,
    state: Mutex<OrchestratorState>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    shutdown: watch::Sender<bool>,
    permits: Arc<Semaphore>,
}

impl JobOrchestrator {
    pub fn new(ctx: Arc<JobContext>) -> Self {
        let pool_size = ctx.config.schedule.pool_size;
        let (shutdown, _) = watch::channel(false);
        Self {
            ctx,
            state: Mutex::new(OrchestratorState::Created),
            handles: Mutex::new(Vec::new()),
            shutdown,
            permits: Arc::new(Semaphore::new(pool_size)),
        }
    }

    pub fn state(&self) -> OrchestratorState {
        *lock(&self.state)
    }

    pub fn context(&self) -> &Arc<JobContext> {
        &self.ctx
    }

    /// Register every timer. Must be called from within a Tokio runtime.
    pub fn start(&self) -> Result<(), SchedulerError> {
        let mut state = lock(&self.state);
        if *state != OrchestratorState::Created {
            return Err(SchedulerError::InvalidState {
                action: "start",
                state: state.as_str(),
            });
        }
        let schedule = &self.ctx.config.schedule;
        validate(schedule)?;

        let now = Local::now().naive_local();
        let plan = plan(schedule);
        let mut handles = Vec::with_capacity(plan.len());
        for (activity, trigger) in plan {
            let first = trigger.first_delay(now);
            info!(
                activity = %activity,
                first_in_secs = first.as_secs(),
                period_secs = trigger.period().map(|p| p.as_secs()),
                "JobOrchestrator: scheduled {} (first run in {}s)",
                activity,
                first.as_secs()
            );
            handles.push(self.spawn_timer(activity, first, trigger.period()));
        }
        *lock(&self.handles) = handles;
        *state = OrchestratorState::Running;

        info!(
            pool_size = schedule.pool_size,
            "JobOrchestrator: started with pool size {}",
            schedule.pool_size
        );
        Ok(())
    }

    fn spawn_timer(&self, activity: Activity, first: Duration, period: Option<Duration>) -> JoinHandle<()> {
        let ctx = self.ctx.clone();
        let permits = self.permits.clone();
        let mut shutdown = self.shutdown.subscribe();

        tokio::spawn(async move {
            let Some(period) = period else {
                let due = tokio::select! {
                    biased;
                    _ = shutdown.wait_for(|stopped| *stopped) => false,
                    _ = sleep(first) => true,
                };
                if due {
                    fire(activity, &ctx, &permits, &mut shutdown).await;
                }
                return;
            };

            // Burst keeps the schedule anchored to the first fire: a late run
            // is caught up, later fires are not shifted.
            let mut ticker = interval_at(Instant::now() + first, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.wait_for(|stopped| *stopped) => break,
                    _ = ticker.tick() => {}
                }
                fire(activity, &ctx, &permits, &mut shutdown).await;
            }
            debug!(activity = %activity, "JobOrchestrator: timer for {} stopped", activity);
        })
    }

    /// Stop the orchestrator. Safe to call any number of times, in any state.
    pub async fn stop(&self) {
        let previous = {
            let mut state = lock(&self.state);
            let previous = *state;
            if matches!(previous, OrchestratorState::Created | OrchestratorState::Running) {
                *state = OrchestratorState::ShuttingDown;
            }
            previous
        };

        match previous {
            OrchestratorState::ShuttingDown | OrchestratorState::Stopped => {
                debug!("JobOrchestrator: stop requested again, ignoring");
                return;
            }
            OrchestratorState::Created => {
                info!("JobOrchestrator: stopping before start");
            }
            OrchestratorState::Running => {
                info!("JobOrchestrator: shutting down");
                self.shutdown.send_replace(true);
                self.permits.close();
                self.drain().await;
            }
        }

        self.ctx.close().await;
        *lock(&self.state) = OrchestratorState::Stopped;
        info!("JobOrchestrator: stopped");
    }

    async fn drain(&self) {
        let mut handles = std::mem::take(&mut *lock(&self.handles));
        let grace = self.ctx.config.schedule.shutdown_grace;

        if timeout(grace, join_all(handles.iter_mut())).await.is_ok() {
            info!("JobOrchestrator: all activities finished");
            return;
        }

        warn!(
            grace_secs = grace.as_secs(),
            "JobOrchestrator: grace period elapsed, cancelling remaining activities"
        );
        for handle in &handles {
            handle.abort();
        }
        join_all(handles.iter_mut()).await;
    }
}

impl Drop for JobOrchestrator {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

async fn fire(
    activity: Activity,
    ctx: &Arc<JobContext>,
    permits: &Semaphore,
    shutdown: &mut watch::Receiver<bool>,
) {
    let now = Local::now().naive_local();
    if !activity.is_open(now) {
        debug!(activity = %activity, "JobOrchestrator: {} gated at {}", activity, now);
        return;
    }

    let _permit = tokio::select! {
        biased;
        _ = shutdown.wait_for(|stopped| *stopped) => return,
        permit = permits.acquire() => match permit {
            Ok(permit) => permit,
            Err(_) => return,
        },
    };

    let started = Instant::now();
    debug!(activity = %activity, "JobOrchestrator: running {}", activity);
    match AssertUnwindSafe(handlers::run_activity(activity, ctx)).catch_unwind().await {
        Ok(summary) => {
            debug!(
                activity = %activity,
                elapsed_ms = started.elapsed().as_millis() as u64,
                processed = summary.processed,
                failed = summary.failed,
                "JobOrchestrator: {} finished",
                activity
            );
        }
        Err(panic) => {
            error!(
                activity = %activity,
                panic = %panic_message(panic.as_ref()),
                "JobOrchestrator: {} panicked; next fire proceeds as scheduled",
                activity
            );
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
