use super::entity::Asset;
use crate::domain::{missing_fields, DomainError, DomainResult};

/// Validates all Asset invariants
/// These are the absolute rules that must hold for an Asset to be stored
pub fn validate_asset(asset: &Asset) -> DomainResult<()> {
    validate_required_fields(asset)?;
    validate_display_index(asset)?;
    Ok(())
}

/// Identifying and descriptive fields cannot be blank
fn validate_required_fields(asset: &Asset) -> DomainResult<()> {
    let missing = missing_fields(&[
        ("primary_code", Some(asset.primary_code.as_str())),
        ("name", Some(asset.name.as_str())),
        ("brand", Some(asset.brand.as_str())),
        ("model", Some(asset.model.as_str())),
        ("serial_number", Some(asset.serial_number.as_str())),
        ("location", Some(asset.location.as_str())),
        ("status", Some(asset.status.as_str())),
    ]);
    if !missing.is_empty() {
        return Err(DomainError::MissingRequiredField(missing));
    }
    Ok(())
}

/// A stored index, when present, is 1-based
fn validate_display_index(asset: &Asset) -> DomainResult<()> {
    if asset.display_index == Some(0) {
        return Err(DomainError::InvariantViolation(format!(
            "Asset {} has display index 0; indices start at 1",
            asset.creation_key
        )));
    }
    Ok(())
}

/// Invariants that must hold true for the Asset domain:
///
/// 1. creation_key is immutable and never reused
/// 2. display_index is derived from creation order, never the reverse
/// 3. primary_code and serial_number are unique among live assets
/// 4. Required descriptive fields are non-blank
/// 5. Deleting an asset deletes its history and attachments
