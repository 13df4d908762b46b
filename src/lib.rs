//! lrukit: a bounded, thread-safe LRU cache with one shared instance per
//! key/value type pair.
//!
//! - [`store::lru::LruStore`]: single-threaded map + recency list, strict LRU eviction.
//! - [`shared::SharedCache`]: mutex-guarded store with one-time `configure` and `reset`.
//! - [`registry::CacheRegistry`]: hands out the single `SharedCache` of each `(K, V)`.
//!
//! ```
//! use lrukit::prelude::*;
//!
//! let registry = CacheRegistry::new();
//! registry.configure::<u32, String>(1).unwrap();
//!
//! let cache = registry.instance::<u32, String>();
//! cache.add(1, "Test1".to_string()).unwrap();
//! cache.add(2, "Test2".to_string()).unwrap();
//!
//! assert_eq!(cache.get(&1), None);
//! assert_eq!(cache.get(&2).as_deref(), Some("Test2"));
//! ```

pub mod config;
pub mod error;
pub mod key;
pub mod prelude;
pub mod registry;
pub mod shared;
pub mod stats;
pub mod store;
pub mod traits;
