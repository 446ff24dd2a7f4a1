// src/events/mod.rs
//
// Internal event system - public API
//
// The type-erased handler alias stays inside the bus module.

pub mod bus;
pub mod types;

pub use types::{
    AssetCreated, AssetDeleted, AssetFlaggedForCalibration, AssetUpdated, AssetsReindexed,
    AttachmentAdded, DomainEvent, HistoryRecorded,
};

pub use bus::{EventBus, EventLogEntry, DEFAULT_EVENT_LOG_CAPACITY};

/// Initialize a new event bus
pub fn create_event_bus() -> EventBus {
    EventBus::new()
}
