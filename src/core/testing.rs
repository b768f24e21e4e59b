//! In-memory platforms that record every call, for the routine tests.

use crate::domain::model::{Order, OrderStatus, Platform, Product, RemoteId};
use crate::domain::ports::{DestinationPlatform, SourcePlatform};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListSourceOrders(Option<&'static str>),
    ListProducts,
    CancelOrder(String),
    CreateOrder(Value),
    UpdateTracking(String, String),
    UpdateInventory(String, Option<i64>),
    ListDestinationOrders(&'static str),
}

fn rejected(platform: Platform) -> SyncError {
    SyncError::Status {
        platform,
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        body: r#"{"error":"boom"}"#.to_string(),
    }
}

#[derive(Default)]
pub struct FakeSource {
    orders: Vec<Order>,
    fulfilled: Vec<Order>,
    products: Vec<Product>,
    fail_lists: bool,
    fail_cancels: bool,
    calls: Mutex<Vec<Call>>,
}

impl FakeSource {
    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders = orders;
        self
    }

    pub fn with_fulfilled(mut self, orders: Vec<Order>) -> Self {
        self.fulfilled = orders;
        self
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn failing_lists(mut self) -> Self {
        self.fail_lists = true;
        self
    }

    pub fn failing_cancels(mut self) -> Self {
        self.fail_cancels = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SourcePlatform for FakeSource {
    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        self.record(Call::ListSourceOrders(status.map(|s| s.as_str())));
        if self.fail_lists {
            return Err(rejected(Platform::Source));
        }
        Ok(match status {
            Some(OrderStatus::Fulfilled) => self.fulfilled.clone(),
            _ => self.orders.clone(),
        })
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        self.record(Call::ListProducts);
        if self.fail_lists {
            return Err(rejected(Platform::Source));
        }
        Ok(self.products.clone())
    }

    async fn cancel_order(&self, id: &RemoteId) -> Result<Value> {
        self.record(Call::CancelOrder(id.to_string()));
        if self.fail_cancels {
            return Err(rejected(Platform::Source));
        }
        Ok(json!({"order": {"id": id}}))
    }
}

/// `failing_on_call(n)` makes the n-th write (1-based) fail after it is
/// recorded.
#[derive(Default)]
pub struct FakeDestination {
    canceled: Vec<Order>,
    fail_on_call: Option<usize>,
    writes: Mutex<usize>,
    calls: Mutex<Vec<Call>>,
}

impl FakeDestination {
    pub fn with_canceled(mut self, orders: Vec<Order>) -> Self {
        self.canceled = orders;
        self
    }

    pub fn failing_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn write(&self, call: Call) -> Result<Value> {
        self.calls.lock().unwrap().push(call);
        let mut writes = self.writes.lock().unwrap();
        *writes += 1;
        if self.fail_on_call == Some(*writes) {
            return Err(rejected(Platform::Destination));
        }
        Ok(Value::Null)
    }
}

#[async_trait]
impl DestinationPlatform for FakeDestination {
    async fn create_order(&self, order: &Order) -> Result<Value> {
        self.write(Call::CreateOrder(json!({ "order": order })))
    }

    async fn update_tracking(&self, id: &RemoteId, tracking_number: &str) -> Result<Value> {
        self.write(Call::UpdateTracking(id.to_string(), tracking_number.to_string()))
    }

    async fn update_inventory(&self, sku: &str, stock: Option<i64>) -> Result<Value> {
        self.write(Call::UpdateInventory(sku.to_string(), stock))
    }

    async fn list_orders(&self, status: OrderStatus) -> Result<Vec<Order>> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::ListDestinationOrders(status.as_str()));
        Ok(self.canceled.clone())
    }
}
