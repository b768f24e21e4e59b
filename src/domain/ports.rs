use crate::domain::model::{JobKind, JobReport, Order, OrderStatus, Product, RemoteId};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The storefront orders and stock are read from.
#[async_trait]
pub trait SourcePlatform: Send + Sync {
    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>>;
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn cancel_order(&self, id: &RemoteId) -> Result<Value>;
}

/// The marketplace orders and stock are mirrored into.
#[async_trait]
pub trait DestinationPlatform: Send + Sync {
    async fn create_order(&self, order: &Order) -> Result<Value>;
    async fn update_tracking(&self, id: &RemoteId, tracking_number: &str) -> Result<Value>;
    async fn update_inventory(&self, sku: &str, stock: Option<i64>) -> Result<Value>;
    async fn list_orders(&self, status: OrderStatus) -> Result<Vec<Order>>;
}

/// One sync routine. A run is a single fetch-then-write pass.
#[async_trait]
pub trait SyncJob: Send + Sync {
    fn kind(&self) -> JobKind;
    async fn run(&self) -> Result<JobReport>;
}
