pub mod lru_k;

pub use lru_k::{ConcurrentLrukCache, LrukCache};
