// Adapters layer: concrete clients for the two marketplaces.

pub mod backmarket;
pub mod http;
pub mod shopify;

pub use backmarket::BackMarketClient;
pub use shopify::ShopifyClient;
