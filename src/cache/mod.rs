//! In-memory query cache.
//!
//! Holds the last-known result of each query, keyed by a logical query
//! identity, and lets write paths splice their results into it without
//! re-fetching:
//! - `set` replaces a whole entry (what a query does when it settles)
//! - `prepend`, `replace` and `remove` edit one entry by entity key
//!
//! Nothing is persisted and nothing is reconciled with the server.

mod store;
mod traits;

pub use store::{CacheEntry, QueryCache};
pub use traits::{Cacheable, QueryKey};
