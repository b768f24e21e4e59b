use crate::domain::model::{JobKind, JobReport};
use crate::domain::ports::{DestinationPlatform, SourcePlatform, SyncJob};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Pushes the first variant's inventory quantity, keyed by SKU.
///
/// Only the first variant of a product is considered. A variant without a
/// SKU is logged and skipped.
pub struct SyncStock<S, D> {
    source: Arc<S>,
    destination: Arc<D>,
}

impl<S, D> SyncStock<S, D> {
    pub fn new(source: Arc<S>, destination: Arc<D>) -> Self {
        Self {
            source,
            destination,
        }
    }
}

#[async_trait]
impl<S: SourcePlatform, D: DestinationPlatform> SyncJob for SyncStock<S, D> {
    fn kind(&self) -> JobKind {
        JobKind::SyncStock
    }

    async fn run(&self) -> Result<JobReport> {
        let products = self.source.list_products().await?;
        let mut report = JobReport::new(self.kind(), products.len());

        for product in &products {
            let Some(variant) = product.first_variant() else {
                report.skipped += 1;
                continue;
            };

            match variant.sku() {
                Some(sku) => {
                    tracing::info!("Updating stock for SKU {}", sku);
                    self.destination
                        .update_inventory(sku, variant.inventory_quantity)
                        .await?;
                    report.written += 1;
                }
                None => {
                    tracing::info!(
                        "Product {} variant does not have a SKU. Skipping.",
                        product.id
                    );
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{Call, FakeDestination, FakeSource};
    use crate::domain::model::Product;
    use serde_json::json;

    fn products(value: serde_json::Value) -> Vec<Product> {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_sku_less_variant_is_skipped() {
        let source = Arc::new(FakeSource::default().with_products(products(json!([
            {"id": 9, "variants": [{"sku": null, "inventory_quantity": 5}]},
            {"id": 10, "variants": [{"sku": "X1", "inventory_quantity": 3}]}
        ]))));
        let destination = Arc::new(FakeDestination::default());
        let job = SyncStock::new(source, destination.clone());

        let report = job.run().await.unwrap();

        assert_eq!(
            destination.calls(),
            vec![Call::UpdateInventory("X1".to_string(), Some(3))]
        );
        assert_eq!(report.written, 1);
        assert_eq!(report.skipped, 1);
    }

    #[tokio::test]
    async fn test_only_first_variant_counts() {
        let source = Arc::new(FakeSource::default().with_products(products(json!([
            {"id": 1, "variants": [
                {"sku": "FIRST", "inventory_quantity": 0},
                {"sku": "SECOND", "inventory_quantity": 40}
            ]},
            {"id": 2, "variants": [
                {"sku": "", "inventory_quantity": 7},
                {"sku": "IGNORED", "inventory_quantity": 8}
            ]},
            {"id": 3, "variants": []}
        ]))));
        let destination = Arc::new(FakeDestination::default());
        let job = SyncStock::new(source, destination.clone());

        let report = job.run().await.unwrap();

        assert_eq!(
            destination.calls(),
            vec![Call::UpdateInventory("FIRST".to_string(), Some(0))]
        );
        assert_eq!(report.fetched, 3);
        assert_eq!(report.skipped, 2);
    }

    #[tokio::test]
    async fn test_negative_stock_is_passed_through() {
        let source = Arc::new(FakeSource::default().with_products(products(json!([
            {"id": 4, "variants": [{"sku": "OVERSOLD", "inventory_quantity": -2}]}
        ]))));
        let destination = Arc::new(FakeDestination::default());
        SyncStock::new(source, destination.clone())
            .run()
            .await
            .unwrap();

        assert_eq!(
            destination.calls(),
            vec![Call::UpdateInventory("OVERSOLD".to_string(), Some(-2))]
        );
    }
}
