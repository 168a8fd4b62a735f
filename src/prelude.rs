//! One-stop imports for the common surface.

pub use crate::error::{ConfigError, InvariantError};
pub use crate::lfu::LfuCache;
#[cfg(feature = "metrics")]
pub use crate::metrics::{LfuMetricsSnapshot, PoolMetricsSnapshot};
pub use crate::pool::{ObjectPool, Pool, SyncPool};
