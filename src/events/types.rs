// events/types.rs
//
// Domain events emitted by the ledger services.
// Each event is an immutable fact that has already been committed.
//
// RULES:
// - Events are facts, not commands
// - Emitted only after the store write succeeded
// - Carry only the data needed to react

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::HistoryCategory;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! domain_event {
    ($name:ident) => {
        impl DomainEvent for $name {
            fn event_id(&self) -> Uuid { self.event_id }
            fn occurred_at(&self) -> DateTime<Utc> { self.occurred_at }
            fn event_type(&self) -> &'static str { stringify!($name) }
        }
    };
}

// ============================================================================
// ASSET EVENTS
// ============================================================================

/// Emitted when an asset is registered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCreated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub creation_key: i64,
    pub display_index: u32,
    pub primary_code: String,
}

impl AssetCreated {
    pub fn new(creation_key: i64, display_index: u32, primary_code: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            creation_key,
            display_index,
            primary_code,
        }
    }
}

domain_event!(AssetCreated);

/// Emitted when payload fields of an asset change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetUpdated {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub creation_key: i64,
}

impl AssetUpdated {
    pub fn new(creation_key: i64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            creation_key,
        }
    }
}

domain_event!(AssetUpdated);

/// Emitted after an asset and its dependents are removed.
/// Attachment storage keys are included so blob cleanup can react.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDeleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub creation_key: i64,
    pub primary_code: String,
    pub storage_keys: Vec<String>,
}

impl AssetDeleted {
    pub fn new(creation_key: i64, primary_code: String, storage_keys: Vec<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            creation_key,
            primary_code,
            storage_keys,
        }
    }
}

domain_event!(AssetDeleted);

/// Emitted when a repair pass rewrote at least one display index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsReindexed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub checked: usize,
    pub reassigned: usize,
    pub failed: usize,
}

impl AssetsReindexed {
    pub fn new(checked: usize, reassigned: usize, failed: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            checked,
            reassigned,
            failed,
        }
    }
}

domain_event!(AssetsReindexed);

// ============================================================================
// HISTORY EVENTS
// ============================================================================

/// Emitted when a history entry is appended
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecorded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub owner_creation_key: i64,
    pub category: HistoryCategory,
    pub sequence: u32,
}

impl HistoryRecorded {
    pub fn new(owner_creation_key: i64, category: HistoryCategory, sequence: u32) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            owner_creation_key,
            category,
            sequence,
        }
    }
}

domain_event!(HistoryRecorded);

/// Emitted when a calibration record moved the asset into the calibration status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetFlaggedForCalibration {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub creation_key: i64,
    pub previous_status: String,
}

impl AssetFlaggedForCalibration {
    pub fn new(creation_key: i64, previous_status: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            creation_key,
            previous_status,
        }
    }
}

domain_event!(AssetFlaggedForCalibration);

// ============================================================================
// ATTACHMENT EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub owner_creation_key: i64,
    pub attachment_id: i64,
    pub storage_key: String,
}

impl AttachmentAdded {
    pub fn new(owner_creation_key: i64, attachment_id: i64, storage_key: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            owner_creation_key,
            attachment_id,
            storage_key,
        }
    }
}

domain_event!(AttachmentAdded);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names() {
        assert_eq!(AssetCreated::new(1, 1, "TS-1".into()).event_type(), "AssetCreated");
        assert_eq!(AssetsReindexed::new(3, 1, 0).event_type(), "AssetsReindexed");
        assert_eq!(
            HistoryRecorded::new(1, HistoryCategory::Fault, 2).event_type(),
            "HistoryRecorded"
        );
    }

    #[test]
    fn test_event_ids_are_unique() {
        let a = AssetUpdated::new(1);
        let b = AssetUpdated::new(1);
        assert_ne!(a.event_id(), b.event_id());
    }
}
