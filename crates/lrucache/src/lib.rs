//! # lrucache
//!
//! Fixed-capacity Least-Recently-Used cache.
//!
//! ## Architecture
//! - **Key Index**: AHash map from key to entry handle (O(1))
//! - **Recency List**: arena-backed doubly-linked list, head is least
//!   recently used, tail is most recently used (O(1) splice and evict)
//! - **LruCache**: `put`/`get` over the two, evicting the head when a new
//!   key would exceed capacity
//!
//! `SharedLruCache` puts the whole cache behind one lock for use across
//! threads, and `ReadThrough` memoizes lookups against a slower [`Source`].

#![warn(missing_docs)]

mod error;
pub mod index;
pub mod list;
mod lru;
mod read_through;
mod shared;
mod stats;

pub use error::{Error, Result};
pub use lru::LruCache;
pub use read_through::{ReadThrough, Source};
pub use shared::SharedLruCache;
pub use stats::{CacheStats, StatsSnapshot};
