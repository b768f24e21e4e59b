use crate::domain::model::{JobKind, JobReport, OrderStatus, Platform};
use crate::domain::ports::{DestinationPlatform, SourcePlatform, SyncJob};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Copies the first tracking number of each fulfilled source order.
/// Orders without tracking numbers are passed over without a log line.
pub struct SyncTracking<S, D> {
    source: Arc<S>,
    destination: Arc<D>,
}

impl<S, D> SyncTracking<S, D> {
    pub fn new(source: Arc<S>, destination: Arc<D>) -> Self {
        Self {
            source,
            destination,
        }
    }
}

#[async_trait]
impl<S: SourcePlatform, D: DestinationPlatform> SyncJob for SyncTracking<S, D> {
    fn kind(&self) -> JobKind {
        JobKind::SyncTracking
    }

    async fn run(&self) -> Result<JobReport> {
        let orders = self.source.list_orders(Some(OrderStatus::Fulfilled)).await?;
        let mut report = JobReport::new(self.kind(), orders.len());

        for order in &orders {
            let Some(tracking_number) = order.first_tracking_number() else {
                report.skipped += 1;
                continue;
            };

            tracing::info!(
                "Updating tracking for order {} in {}",
                order.id,
                Platform::Destination
            );
            self.destination
                .update_tracking(&order.id, tracking_number)
                .await?;
            report.written += 1;
        }

        Ok(report)
    }
}
