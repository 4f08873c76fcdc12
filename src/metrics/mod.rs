//! Point-in-time cache statistics.

pub mod snapshot;

pub use snapshot::LrukStats;
