pub mod category;
pub mod context_entry;
pub mod filter;
pub mod stats;
pub mod suggestion;
pub mod task;
pub mod ui_state;
