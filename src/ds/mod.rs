pub mod fixed_history;
pub mod intrusive_list;
pub mod slot_arena;

pub use fixed_history::FixedHistory;
pub use intrusive_list::IntrusiveList;
pub use slot_arena::{SlotArena, SlotId};
