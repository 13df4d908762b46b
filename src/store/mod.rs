//! Single-threaded storage engines wrapped by [`SharedCache`](crate::shared::SharedCache).

pub mod lru;

pub use lru::{CacheEntry, Iter, LruStore};
