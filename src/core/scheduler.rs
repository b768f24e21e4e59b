//! Cron-driven dispatch of the sync jobs.
//!
//! Every job gets its own loop that sleeps until the next fire time and then
//! dispatches a tick. Jobs never wait on each other. Whether a job may run
//! on top of its own previous tick is decided by [`OverlapPolicy`].

use crate::config::ScheduleConfig;
use crate::core::tick::run_tick;
use crate::domain::model::JobKind;
use crate::domain::ports::SyncJob;
use crate::utils::error::{Result, SyncError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;

/// What to do when a tick fires while the previous tick of the same job is
/// still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Drop the new tick.
    #[default]
    Skip,
    /// Run the new tick once the previous one is done. At most one tick
    /// waits per job; further fires are dropped until it starts.
    Queue,
    /// Run both at once.
    Allow,
}

impl fmt::Display for OverlapPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapPolicy::Skip => f.write_str("skip"),
            OverlapPolicy::Queue => f.write_str("queue"),
            OverlapPolicy::Allow => f.write_str("allow"),
        }
    }
}

impl FromStr for OverlapPolicy {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(OverlapPolicy::Skip),
            "queue" => Ok(OverlapPolicy::Queue),
            "allow" => Ok(OverlapPolicy::Allow),
            other => Err(SyncError::InvalidConfigValue {
                field: "SYNC_OVERLAP_POLICY".to_string(),
                value: other.to_string(),
                reason: "Expected one of: skip, queue, allow".to_string(),
            }),
        }
    }
}

/// A job plus the lane its ticks run in.
#[derive(Clone)]
pub(crate) struct JobSlot {
    job: Arc<dyn SyncJob>,
    policy: OverlapPolicy,
    lane: Arc<Mutex<()>>,
    pending: Arc<AtomicBool>,
}

impl JobSlot {
    pub(crate) fn new(job: Arc<dyn SyncJob>, policy: OverlapPolicy) -> Self {
        Self {
            job,
            policy,
            lane: Arc::new(Mutex::new(())),
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn kind(&self) -> JobKind {
        self.job.kind()
    }

    /// Starts a tick in the background. Returns `None` when the tick was
    /// dropped: the lane is busy under [`OverlapPolicy::Skip`], or a tick is
    /// already waiting under [`OverlapPolicy::Queue`].
    pub(crate) fn dispatch(&self) -> Option<JoinHandle<()>> {
        let job = self.job.clone();

        match self.policy {
            OverlapPolicy::Skip => match self.lane.clone().try_lock_owned() {
                Ok(guard) => Some(tokio::spawn(async move {
                    run_tick(job.as_ref()).await;
                    drop(guard);
                })),
                Err(_) => {
                    tracing::warn!("{} is still running, skipping this tick", job.kind());
                    None
                }
            },
            OverlapPolicy::Queue => match self.lane.clone().try_lock_owned() {
                Ok(guard) => Some(tokio::spawn(async move {
                    run_tick(job.as_ref()).await;
                    drop(guard);
                })),
                Err(_) if self.pending.swap(true, Ordering::SeqCst) => {
                    tracing::warn!("{} already has a tick waiting, dropping this one", job.kind());
                    None
                }
                Err(_) => {
                    let lane = self.lane.clone();
                    let pending = self.pending.clone();
                    Some(tokio::spawn(async move {
                        let _guard = lane.lock_owned().await;
                        pending.store(false, Ordering::SeqCst);
                        run_tick(job.as_ref()).await;
                    }))
                }
            },
            OverlapPolicy::Allow => Some(tokio::spawn(async move {
                run_tick(job.as_ref()).await;
            })),
        }
    }

    /// Waits for the lane to empty. Ticks started under
    /// [`OverlapPolicy::Allow`] are not tracked.
    pub(crate) async fn drain(&self) {
        let _guard = self.lane.lock().await;
    }
}

pub struct Scheduler {
    schedule: cron::Schedule,
    policy: OverlapPolicy,
    jobs: Vec<Arc<dyn SyncJob>>,
}

impl Scheduler {
    pub fn new(schedule: cron::Schedule, policy: OverlapPolicy) -> Self {
        Self {
            schedule,
            policy,
            jobs: Vec::new(),
        }
    }

    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        Ok(Self::new(config.parse()?, config.overlap))
    }

    pub fn with_job(mut self, job: Arc<dyn SyncJob>) -> Self {
        self.jobs.push(job);
        self
    }

    pub fn jobs(&self) -> impl Iterator<Item = JobKind> + '_ {
        self.jobs.iter().map(|job| job.kind())
    }

    /// First fire time strictly after `after`.
    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Runs until `shutdown` fires (or its sender is dropped), then waits
    /// for queued and skip-guarded ticks to finish.
    pub async fn run(self, shutdown: &broadcast::Sender<()>) {
        tracing::info!(
            "Scheduling {} jobs (overlap policy: {})",
            self.jobs.len(),
            self.policy
        );

        let handles: Vec<_> = self
            .jobs
            .iter()
            .map(|job| {
                let slot = JobSlot::new(job.clone(), self.policy);
                let schedule = self.schedule.clone();
                let shutdown = shutdown.subscribe();
                tokio::spawn(job_loop(slot, schedule, shutdown))
            })
            .collect();

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!("Scheduler task ended abnormally: {}", e);
            }
        }
    }
}

async fn job_loop(
    slot: JobSlot,
    schedule: cron::Schedule,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut cursor = Utc::now();

    loop {
        let Some(next) = schedule.after(&cursor).next() else {
            tracing::warn!("{} has no upcoming fire time, stopping", slot.kind());
            break;
        };
        let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        tracing::debug!("{} next run at {}", slot.kind(), next);

        tokio::select! {
            _ = shutdown.recv() => break,
            _ = tokio::time::sleep(wait) => {}
        }

        // Fire times missed while asleep are not replayed.
        cursor = next.max(Utc::now());
        let _ = slot.dispatch();
    }

    slot.drain().await;
    tracing::info!("{} scheduler stopped", slot.kind());
}
