pub mod cancel_orders;
pub mod import_orders;
pub mod scheduler;
pub mod sync_stock;
pub mod sync_tracking;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{JobKind, JobReport};
pub use crate::domain::ports::{DestinationPlatform, SourcePlatform, SyncJob};
pub use crate::utils::error::Result;
pub use cancel_orders::CancelOrders;
pub use import_orders::ImportOrders;
pub use scheduler::{OverlapPolicy, Scheduler};
pub use sync_stock::SyncStock;
pub use sync_tracking::SyncTracking;
pub use tick::run_tick;
