// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod asset;
pub mod attachment;
pub mod history;
pub mod identifier;
pub mod status;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Asset Domain
pub use asset::{next_display_index, validate_asset, Asset, NewAsset};

// History Domain
pub use history::{
    build_history_details, next_sequence, validate_history_details, HistoryCategory,
    HistoryDetails, HistoryEntry, HistoryInput, NewHistoryEntry,
};

// Attachment Domain
pub use attachment::{Attachment, NewAttachment};

// Identifier lookup
pub use identifier::{normalize_identifier, IdentifierField, RESOLUTION_ORDER};

// Derived status (never persisted, except the calibration flag)
pub use status::{
    calibration_status_change, format_calendar_date, parse_calendar_date, parse_date_field,
    warranty_label,
    WarrantyLabel, CALIBRATION_STATUS,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid history category '{0}' (expected 'fault' or 'calibration')")]
    InvalidCategory(String),

    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequiredField(Vec<String>),

    #[error("Invalid date for {field}: '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { field: String, value: String },
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Collects the names of required text fields that are absent or blank.
///
/// Order of the returned names follows the order of `fields`.
pub fn missing_fields(fields: &[(&str, Option<&str>)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Trims a caller-supplied optional string; blank becomes `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_keeps_declaration_order() {
        let missing = missing_fields(&[
            ("name", Some("Oscilloscope")),
            ("brand", None),
            ("model", Some("   ")),
            ("serial_number", Some("SN-1")),
        ]);
        assert_eq!(missing, vec!["brand".to_string(), "model".to_string()]);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  CLC-7 ".to_string())), Some("CLC-7".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_missing_field_message_lists_names() {
        let err = DomainError::MissingRequiredField(vec!["fault_description".into(), "fault_date".into()]);
        assert_eq!(err.to_string(), "Missing required fields: fault_description, fault_date");
    }
}
