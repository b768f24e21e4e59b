use crate::domain::model::{JobKind, JobReport, OrderStatus, Platform};
use crate::domain::ports::{DestinationPlatform, SourcePlatform, SyncJob};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Cancels source orders that were canceled on the destination.
///
/// Order ids are assumed to be the same on both platforms.
pub struct CancelOrders<S, D> {
    source: Arc<S>,
    destination: Arc<D>,
}

impl<S, D> CancelOrders<S, D> {
    pub fn new(source: Arc<S>, destination: Arc<D>) -> Self {
        Self {
            source,
            destination,
        }
    }
}

#[async_trait]
impl<S: SourcePlatform, D: DestinationPlatform> SyncJob for CancelOrders<S, D> {
    fn kind(&self) -> JobKind {
        JobKind::CancelOrders
    }

    async fn run(&self) -> Result<JobReport> {
        let orders = self.destination.list_orders(OrderStatus::Canceled).await?;
        let mut report = JobReport::new(self.kind(), orders.len());

        for order in &orders {
            tracing::info!("Canceling order {} in {}", order.id, Platform::Source);
            self.source.cancel_order(&order.id).await?;
            report.written += 1;
        }

        Ok(report)
    }
}
