pub use crate::builder::{LrukBuilder, DEFAULT_K};
pub use crate::ds::{FixedHistory, IntrusiveList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::metrics::snapshot::LrukStats;
pub use crate::policy::lru_k::{ConcurrentLrukCache, EvictionCallback, LrukCache, Membership};
pub use crate::traits::{CoreCache, LrukCacheTrait, MutableCache};
