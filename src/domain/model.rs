use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The two marketplaces this service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Shopify storefront, source of truth for orders and stock.
    Source,
    /// BackMarket, where orders and stock are mirrored.
    Destination,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Source => f.write_str("Shopify"),
            Platform::Destination => f.write_str("BackMarket"),
        }
    }
}

/// Identifier as either platform sends it: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteId::Number(n) => write!(f, "{}", n),
            RemoteId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RemoteId {
    fn from(value: u64) -> Self {
        RemoteId::Number(value)
    }
}

impl From<&str> for RemoteId {
    fn from(value: &str) -> Self {
        RemoteId::Text(value.to_string())
    }
}

/// An order as listed by either platform.
///
/// Only the identifier is typed. Every other field, `null`s included, stays
/// in `extra` untouched so the order can be forwarded verbatim and an oddly
/// typed field never fails the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: RemoteId,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

const TRACKING_NUMBERS: &str = "tracking_numbers";

impl Order {
    pub fn new(id: impl Into<RemoteId>) -> Self {
        Self {
            id: id.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_tracking_numbers<I, S>(mut self, numbers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let numbers = numbers
            .into_iter()
            .map(|n| serde_json::Value::String(n.into()))
            .collect();
        self.extra
            .insert(TRACKING_NUMBERS.to_string(), serde_json::Value::Array(numbers));
        self
    }

    /// Absent, `null` or non-array values read as no tracking numbers.
    pub fn tracking_numbers(&self) -> &[serde_json::Value] {
        self.extra
            .get(TRACKING_NUMBERS)
            .and_then(serde_json::Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn first_tracking_number(&self) -> Option<&str> {
        self.tracking_numbers().first().and_then(serde_json::Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default)]
    pub id: Option<RemoteId>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

impl Variant {
    /// Empty SKUs count as missing.
    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref().filter(|sku| !sku.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RemoteId,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Stock sync only ever looks at the first variant.
    pub fn first_variant(&self) -> Option<&Variant> {
        self.variants.first()
    }
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderList {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductList {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub products: Vec<Product>,
}

/// Server-side status filters used by the list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Fulfilled,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Fulfilled => "fulfilled",
            OrderStatus::Canceled => "canceled",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateOrderRequest<'a> {
    pub order: &'a Order,
}

#[derive(Debug, Serialize)]
pub struct TrackingUpdate<'a> {
    pub tracking_number: &'a str,
}

#[derive(Debug, Serialize)]
pub struct StockUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct EmptyBody {}

/// The four sync routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum JobKind {
    ImportOrders,
    SyncTracking,
    SyncStock,
    CancelOrders,
}

impl JobKind {
    pub const ALL: [JobKind; 4] = [
        JobKind::ImportOrders,
        JobKind::SyncTracking,
        JobKind::SyncStock,
        JobKind::CancelOrders,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::ImportOrders => "import-orders",
            JobKind::SyncTracking => "sync-tracking",
            JobKind::SyncStock => "sync-stock",
            JobKind::CancelOrders => "cancel-orders",
        }
    }

    /// Used in the failure line, e.g. "error importing orders: ...".
    pub fn activity(&self) -> &'static str {
        match self {
            JobKind::ImportOrders => "importing orders",
            JobKind::SyncTracking => "syncing tracking numbers",
            JobKind::SyncStock => "syncing stock",
            JobKind::CancelOrders => "canceling orders",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one successful tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobReport {
    pub job: JobKind,
    pub fetched: usize,
    pub written: usize,
    pub skipped: usize,
}

impl JobReport {
    pub fn new(job: JobKind, fetched: usize) -> Self {
        Self {
            job,
            fetched,
            written: 0,
            skipped: 0,
        }
    }
}
