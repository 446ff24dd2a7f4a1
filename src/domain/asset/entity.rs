use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::identifier::IdentifierField;

/// One physical equipment unit.
///
/// `creation_key` is assigned by the store on insert and is the only source
/// of creation order. `display_index` is a cached position that may be
/// transiently wrong; `None` marks a missing or corrupt stored value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Store-assigned, monotonically increasing, never reused
    pub creation_key: i64,

    /// Cached 1-based position ("STT")
    pub display_index: Option<u32>,

    /// Primary asset code (unique, case-insensitive)
    pub primary_code: String,

    /// Alternate code, e.g. the calibration lab number
    pub alt_code: Option<String>,

    /// Manufacturer serial number (unique, case-insensitive)
    pub serial_number: String,

    pub name: String,
    pub brand: String,
    pub model: String,
    pub description: Option<String>,
    pub location: String,

    /// Free-form status label; "Calib" is set by calibration history
    pub status: String,

    pub import_date: Option<NaiveDate>,

    /// Raw warranty end date as stored. Kept as text so that legacy
    /// values that fail to parse still round-trip.
    pub warranty_end: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An asset that has not been persisted yet (no creation key, no index).
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub primary_code: String,
    pub alt_code: Option<String>,
    pub serial_number: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub description: Option<String>,
    pub location: String,
    pub status: String,
    pub import_date: Option<NaiveDate>,
    pub warranty_end: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewAsset {
    /// Creates a draft with the identifying fields set and the payload
    /// filled with the given labels. Timestamps are taken now.
    pub fn new(
        primary_code: String,
        serial_number: String,
        name: String,
        brand: String,
        model: String,
        location: String,
        status: String,
    ) -> Self {
        Self {
            primary_code,
            alt_code: None,
            serial_number,
            name,
            brand,
            model,
            description: None,
            location,
            status,
            import_date: None,
            warranty_end: None,
            created_at: Utc::now(),
        }
    }

    /// Builds the persisted form once the store has assigned keys.
    pub fn into_asset(self, creation_key: i64, display_index: Option<u32>) -> Asset {
        Asset {
            creation_key,
            display_index,
            primary_code: self.primary_code,
            alt_code: self.alt_code,
            serial_number: self.serial_number,
            name: self.name,
            brand: self.brand,
            model: self.model,
            description: self.description,
            location: self.location,
            status: self.status,
            import_date: self.import_date,
            warranty_end: self.warranty_end,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

impl Asset {
    /// Value of one identifier field, if present.
    pub fn identifier(&self, field: IdentifierField) -> Option<&str> {
        match field {
            IdentifierField::PrimaryCode => Some(self.primary_code.as_str()),
            IdentifierField::AltCode => self.alt_code.as_deref(),
            IdentifierField::SerialNumber => Some(self.serial_number.as_str()),
        }
    }

    /// Update payload fields
    /// `creation_key` and `display_index` are never touched here.
    #[allow(clippy::too_many_arguments)]
    pub fn update_fields(
        &mut self,
        primary_code: Option<String>,
        alt_code: Option<Option<String>>,
        serial_number: Option<String>,
        name: Option<String>,
        brand: Option<String>,
        model: Option<String>,
        description: Option<Option<String>>,
        location: Option<String>,
        status: Option<String>,
        import_date: Option<Option<NaiveDate>>,
        warranty_end: Option<Option<String>>,
    ) {
        if let Some(v) = primary_code {
            self.primary_code = v;
        }
        if let Some(v) = alt_code {
            self.alt_code = v;
        }
        if let Some(v) = serial_number {
            self.serial_number = v;
        }
        if let Some(v) = name {
            self.name = v;
        }
        if let Some(v) = brand {
            self.brand = v;
        }
        if let Some(v) = model {
            self.model = v;
        }
        if let Some(v) = description {
            self.description = v;
        }
        if let Some(v) = location {
            self.location = v;
        }
        if let Some(v) = status {
            self.status = v;
        }
        if let Some(v) = import_date {
            self.import_date = v;
        }
        if let Some(v) = warranty_end {
            self.warranty_end = v;
        }

        self.updated_at = Utc::now();
    }
}
