use crate::adapters::http::{Credential, RemoteClient};
use crate::config::SourceConfig;
use crate::domain::model::{EmptyBody, Order, OrderList, OrderStatus, Platform, Product, ProductList, RemoteId};
use crate::domain::ports::SourcePlatform;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin REST API.
#[derive(Clone)]
pub struct ShopifyClient {
    http: RemoteClient,
}

impl ShopifyClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let http = RemoteClient::new(
            Platform::Source,
            &config.api_base_url(),
            Credential::Header {
                name: ACCESS_TOKEN_HEADER,
                value: config.access_token.clone(),
            },
        )?;
        Ok(Self { http })
    }
}

#[async_trait]
impl SourcePlatform for ShopifyClient {
    async fn list_orders(&self, status: Option<OrderStatus>) -> Result<Vec<Order>> {
        let query: Vec<(&str, &str)> = status.iter().map(|s| ("status", s.as_str())).collect();
        let list: OrderList = self.http.get_json(&["orders.json"], &query).await?;
        Ok(list.orders)
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        let list: ProductList = self.http.get_json(&["products.json"], &[]).await?;
        Ok(list.products)
    }

    async fn cancel_order(&self, id: &RemoteId) -> Result<Value> {
        let id = id.to_string();
        self.http
            .send_json(Method::POST, &["orders", id.as_str(), "cancel.json"], &EmptyBody {})
            .await
    }
}
