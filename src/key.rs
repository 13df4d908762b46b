//! Key requirements for the shared cache.
//!
//! Keys compare by their intrinsic `Eq + Hash`. On top of that every key type
//! states whether a value of it can be *null*: `Option::None` is the only
//! null among the provided implementations. [`SharedCache::add`] rejects null
//! keys with [`InvalidArgument`] before touching the store.
//!
//! Custom key types opt in with an empty impl:
//!
//! ```
//! use lrukit::key::CacheKey;
//!
//! #[derive(PartialEq, Eq, Hash, Clone)]
//! struct PageId(u64);
//!
//! impl CacheKey for PageId {}
//!
//! assert!(!PageId(7).is_null());
//! assert!(None::<PageId>.is_null());
//! ```
//!
//! [`SharedCache::add`]: crate::shared::SharedCache::add
//! [`InvalidArgument`]: crate::error::InvalidArgument

use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;

/// A type usable as a cache key.
pub trait CacheKey: Eq + Hash {
    /// Returns `true` when this key is the null value of its type.
    #[inline]
    fn is_null(&self) -> bool {
        false
    }
}

impl<T: CacheKey> CacheKey for Option<T> {
    #[inline]
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

macro_rules! impl_non_null_key {
    ($($ty:ty),* $(,)?) => {
        $(impl CacheKey for $ty {})*
    };
}

impl_non_null_key!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, (), String,
    Box<str>, Arc<str>, Rc<str>, Vec<u8>,
);

impl CacheKey for str {}

impl<T: CacheKey + ?Sized> CacheKey for &T {
    #[inline]
    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

macro_rules! impl_tuple_key {
    ($($name:ident),+) => {
        impl<$($name: CacheKey),+> CacheKey for ($($name,)+) {}
    };
}

impl_tuple_key!(A);
impl_tuple_key!(A, B);
impl_tuple_key!(A, B, C);
impl_tuple_key!(A, B, C, D);
