pub use crate::config::{CacheConfig, DEFAULT_CAPACITY};
pub use crate::error::{CacheError, ConfigError, InvalidArgument};
pub use crate::key::CacheKey;
pub use crate::registry::CacheRegistry;
pub use crate::shared::SharedCache;
pub use crate::stats::CacheStatsSnapshot;
pub use crate::store::lru::{CacheEntry, LruStore};
pub use crate::traits::ConcurrentCache;
