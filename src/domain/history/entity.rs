use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::DomainError;

/// A fault or calibration event recorded against an Asset.
///
/// Entries are created once and never edited; they disappear only when the
/// owning asset is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Store key
    pub id: i64,

    /// Back-reference to the owning asset
    pub owner_creation_key: i64,

    /// 1-based position within (owner, category)
    pub sequence: u32,

    /// Category-specific payload
    pub details: HistoryDetails,

    pub recorded_at: DateTime<Utc>,
}

/// History category (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryCategory {
    Fault,
    Calibration,
}

/// Payload of a history entry. Each category carries exactly its own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum HistoryDetails {
    Fault {
        description: String,
        fault_date: NaiveDate,
        sent_date: Option<NaiveDate>,
        return_date: Option<NaiveDate>,
    },
    Calibration {
        calib_date: NaiveDate,
        expire_date: NaiveDate,
    },
}

/// A history entry waiting for its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryEntry {
    pub owner_creation_key: i64,
    pub details: HistoryDetails,
    pub recorded_at: DateTime<Utc>,
}

impl NewHistoryEntry {
    pub fn new(owner_creation_key: i64, details: HistoryDetails) -> Self {
        Self {
            owner_creation_key,
            details,
            recorded_at: Utc::now(),
        }
    }

    pub fn category(&self) -> HistoryCategory {
        self.details.category()
    }

    pub fn into_entry(self, id: i64, sequence: u32) -> HistoryEntry {
        HistoryEntry {
            id,
            owner_creation_key: self.owner_creation_key,
            sequence,
            details: self.details,
            recorded_at: self.recorded_at,
        }
    }
}

impl HistoryEntry {
    pub fn category(&self) -> HistoryCategory {
        self.details.category()
    }
}

impl HistoryDetails {
    pub fn category(&self) -> HistoryCategory {
        match self {
            HistoryDetails::Fault { .. } => HistoryCategory::Fault,
            HistoryDetails::Calibration { .. } => HistoryCategory::Calibration,
        }
    }
}

/// Next sequence within one (owner, category): `max + 1`, or 1.
pub fn next_sequence(current_max: Option<u32>) -> u32 {
    current_max.map_or(1, |max| max.saturating_add(1))
}

impl HistoryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryCategory::Fault => "fault",
            HistoryCategory::Calibration => "calibration",
        }
    }
}

impl std::fmt::Display for HistoryCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HistoryCategory {
    type Err = DomainError;

    /// Accepts the stored names plus the short "calib" form older clients send.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fault" => Ok(HistoryCategory::Fault),
            "calibration" | "calib" => Ok(HistoryCategory::Calibration),
            other => Err(DomainError::InvalidCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("fault".parse::<HistoryCategory>().unwrap(), HistoryCategory::Fault);
        assert_eq!(" Calib ".parse::<HistoryCategory>().unwrap(), HistoryCategory::Calibration);
        assert_eq!(
            "calibration".parse::<HistoryCategory>().unwrap(),
            HistoryCategory::Calibration
        );
        assert!(matches!(
            "repair".parse::<HistoryCategory>(),
            Err(DomainError::InvalidCategory(c)) if c == "repair"
        ));
    }

    #[test]
    fn test_next_sequence() {
        assert_eq!(next_sequence(None), 1);
        assert_eq!(next_sequence(Some(3)), 4);
    }

    #[test]
    fn test_details_category() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let fault = HistoryDetails::Fault {
            description: "no display".into(),
            fault_date: date,
            sent_date: None,
            return_date: None,
        };
        let calib = HistoryDetails::Calibration {
            calib_date: date,
            expire_date: date,
        };
        assert_eq!(fault.category(), HistoryCategory::Fault);
        assert_eq!(calib.category(), HistoryCategory::Calibration);
    }
}
