//! lrukit: an LRU-K admission cache.
//!
//! Keys are tracked in an unbounded history list until they have been
//! referenced K times, then admitted into a capacity-bounded LRU list.
//! Eviction only ever removes admitted entries.
//!
//! - [`policy::lru_k::LrukCache`]: single-threaded engine.
//! - [`policy::lru_k::ConcurrentLrukCache`]: shared handle behind a
//!   `parking_lot::RwLock`.
//! - [`builder::LrukBuilder`]: validated construction with an optional
//!   eviction callback.
//!
//! ```
//! use lrukit::prelude::*;
//!
//! let mut cache = LrukBuilder::new(2).k(2).try_build().unwrap();
//! cache.put("page", 1);
//! assert_eq!(cache.get(&"page"), Some(&1));
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod prelude;
pub mod traits;
