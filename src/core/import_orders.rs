use crate::domain::model::{JobKind, JobReport, Platform};
use crate::domain::ports::{DestinationPlatform, SourcePlatform, SyncJob};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Pushes every source order to the destination's create endpoint.
///
/// There is no idempotency key: an order still listed on the next tick is
/// sent again.
pub struct ImportOrders<S, D> {
    source: Arc<S>,
    destination: Arc<D>,
}

impl<S, D> ImportOrders<S, D> {
    pub fn new(source: Arc<S>, destination: Arc<D>) -> Self {
        Self {
            source,
            destination,
        }
    }
}

#[async_trait]
impl<S: SourcePlatform, D: DestinationPlatform> SyncJob for ImportOrders<S, D> {
    fn kind(&self) -> JobKind {
        JobKind::ImportOrders
    }

    async fn run(&self) -> Result<JobReport> {
        let orders = self.source.list_orders(None).await?;
        let mut report = JobReport::new(self.kind(), orders.len());

        for order in &orders {
            tracing::info!("Importing order {} to {}", order.id, Platform::Destination);
            self.destination.create_order(order).await?;
            report.written += 1;
        }

        Ok(report)
    }
}
