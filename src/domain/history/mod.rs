pub mod entity;
pub mod invariants;

pub use entity::{next_sequence, HistoryCategory, HistoryDetails, HistoryEntry, NewHistoryEntry};
pub use invariants::{build_history_details, validate_history_details, HistoryInput};
