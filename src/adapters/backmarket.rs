use crate::adapters::http::{Credential, RemoteClient};
use crate::config::DestinationConfig;
use crate::domain::model::{
    CreateOrderRequest, Order, OrderList, OrderStatus, Platform, RemoteId, StockUpdate,
    TrackingUpdate,
};
use crate::domain::ports::DestinationPlatform;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// BackMarket seller API, bearer-token authenticated.
#[derive(Clone)]
pub struct BackMarketClient {
    http: RemoteClient,
}

impl BackMarketClient {
    pub fn new(config: &DestinationConfig) -> Result<Self> {
        let http = RemoteClient::new(
            Platform::Destination,
            &config.base_url,
            Credential::Bearer(config.api_key.clone()),
        )?;
        Ok(Self { http })
    }
}

#[async_trait]
impl DestinationPlatform for BackMarketClient {
    async fn create_order(&self, order: &Order) -> Result<Value> {
        self.http
            .send_json(Method::POST, &["orders"], &CreateOrderRequest { order })
            .await
    }

    async fn update_tracking(&self, id: &RemoteId, tracking_number: &str) -> Result<Value> {
        let id = id.to_string();
        self.http
            .send_json(
                Method::PUT,
                &["orders", id.as_str()],
                &TrackingUpdate { tracking_number },
            )
            .await
    }

    async fn update_inventory(&self, sku: &str, stock: Option<i64>) -> Result<Value> {
        self.http
            .send_json(Method::PUT, &["inventory", sku], &StockUpdate { stock })
            .await
    }

    async fn list_orders(&self, status: OrderStatus) -> Result<Vec<Order>> {
        let list: OrderList = self
            .http
            .get_json(&["orders"], &[("status", status.as_str())])
            .await?;
        Ok(list.orders)
    }
}
