//! Wiring: builds the platform clients and the four jobs from a config.

pub mod server;

use crate::adapters::{BackMarketClient, ShopifyClient};
use crate::config::{ScheduleConfig, SyncConfig};
use crate::core::{
    run_tick, CancelOrders, DestinationPlatform, ImportOrders, JobKind, JobReport, Scheduler,
    SourcePlatform, SyncJob, SyncStock, SyncTracking,
};
use crate::utils::error::Result;
use std::sync::Arc;

pub struct SyncApp {
    jobs: Vec<Arc<dyn SyncJob>>,
}

impl SyncApp {
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        let source = Arc::new(ShopifyClient::new(&config.source)?);
        let destination = Arc::new(BackMarketClient::new(&config.destination)?);
        Ok(Self::with_platforms(source, destination))
    }

    pub fn with_platforms<S, D>(source: Arc<S>, destination: Arc<D>) -> Self
    where
        S: SourcePlatform + 'static,
        D: DestinationPlatform + 'static,
    {
        let jobs: Vec<Arc<dyn SyncJob>> = vec![
            Arc::new(ImportOrders::new(source.clone(), destination.clone())),
            Arc::new(SyncTracking::new(source.clone(), destination.clone())),
            Arc::new(SyncStock::new(source.clone(), destination.clone())),
            Arc::new(CancelOrders::new(source, destination)),
        ];
        Self { jobs }
    }

    pub fn job(&self, kind: JobKind) -> Option<Arc<dyn SyncJob>> {
        self.jobs.iter().find(|job| job.kind() == kind).cloned()
    }

    /// Runs the selected jobs one after another, a single tick each.
    /// Failed ticks are logged and reported as `None`.
    pub async fn run_once(&self, kinds: &[JobKind]) -> Vec<(JobKind, Option<JobReport>)> {
        let mut outcomes = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            if let Some(job) = self.job(kind) {
                outcomes.push((kind, run_tick(job.as_ref()).await));
            }
        }
        outcomes
    }

    pub fn scheduler(&self, config: &ScheduleConfig) -> Result<Scheduler> {
        let scheduler = Scheduler::from_config(config)?;
        Ok(self
            .jobs
            .iter()
            .cloned()
            .fold(scheduler, |scheduler, job| scheduler.with_job(job)))
    }
}
