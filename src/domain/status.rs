// Derived status rules.
//
// Warranty label is computed on every read and never stored. The calibration
// flag is the single derived value that is persisted, and only in one
// direction: it is set, never cleared, by this module.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::asset::Asset;
use crate::domain::history::{HistoryDetails, HistoryEntry};
use crate::domain::{DomainError, DomainResult};

/// Status label written when the latest calibration has expired.
pub const CALIBRATION_STATUS: &str = "Calib";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a calendar date as stored and submitted (`YYYY-MM-DD`).
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Parses an optional caller-supplied date field. Blank means absent;
/// anything else must parse.
pub fn parse_date_field(field: &str, raw: Option<&str>) -> DomainResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => parse_calendar_date(value)
            .map(Some)
            .ok_or_else(|| DomainError::InvalidDate {
                field: field.to_string(),
                value: value.to_string(),
            }),
    }
}

/// Formats a calendar date the way it is stored.
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantyLabel {
    Valid,
    Expired,
    /// No warranty date, or one that does not parse
    Unknown,
}

impl WarrantyLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarrantyLabel::Valid => "valid",
            WarrantyLabel::Expired => "expired",
            WarrantyLabel::Unknown => "",
        }
    }
}

impl std::fmt::Display for WarrantyLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Warranty is valid through its end date, inclusive.
pub fn warranty_label(asset: &Asset, today: NaiveDate) -> WarrantyLabel {
    match asset.warranty_end.as_deref().and_then(parse_calendar_date) {
        None => WarrantyLabel::Unknown,
        Some(end) if end >= today => WarrantyLabel::Valid,
        Some(_) => WarrantyLabel::Expired,
    }
}

/// Decides whether recording `incoming` flags the asset for calibration.
///
/// The deciding entry is the calibration with the latest `calib_date` among
/// `existing` and `incoming`; on equal dates the higher sequence wins, and
/// `incoming` ranks above every existing entry. Returns the status to write,
/// or `None` to leave the asset untouched (including when `incoming` is not
/// a calibration).
pub fn calibration_status_change(
    existing: &[HistoryEntry],
    incoming: &HistoryDetails,
    today: NaiveDate,
) -> Option<&'static str> {
    let HistoryDetails::Calibration {
        calib_date,
        expire_date,
    } = incoming
    else {
        return None;
    };

    let latest = existing
        .iter()
        .filter_map(|entry| match entry.details {
            HistoryDetails::Calibration {
                calib_date,
                expire_date,
            } => Some(((calib_date, u64::from(entry.sequence)), expire_date)),
            HistoryDetails::Fault { .. } => None,
        })
        .chain(std::iter::once(((*calib_date, u64::MAX), *expire_date)))
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, expire)| expire)?;

    if latest < today {
        Some(CALIBRATION_STATUS)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::NewAsset;
    use chrono::{Duration, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn asset_with_warranty(warranty_end: Option<&str>) -> Asset {
        let mut draft = NewAsset::new(
            "TS-001".into(),
            "SN-001".into(),
            "Scope".into(),
            "Tek".into(),
            "TBS1052".into(),
            "Lab".into(),
            "OK".into(),
        );
        draft.warranty_end = warranty_end.map(str::to_string);
        draft.into_asset(1, Some(1))
    }

    fn calibration(sequence: u32, calib: NaiveDate, expire: NaiveDate) -> HistoryEntry {
        HistoryEntry {
            id: i64::from(sequence),
            owner_creation_key: 1,
            sequence,
            details: HistoryDetails::Calibration {
                calib_date: calib,
                expire_date: expire,
            },
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn test_warranty_boundaries() {
        let today = day(2025, 6, 15);
        assert_eq!(
            warranty_label(&asset_with_warranty(Some("2025-06-15")), today),
            WarrantyLabel::Valid
        );
        assert_eq!(
            warranty_label(&asset_with_warranty(Some("2025-06-14")), today),
            WarrantyLabel::Expired
        );
        assert_eq!(warranty_label(&asset_with_warranty(None), today), WarrantyLabel::Unknown);
        assert_eq!(
            warranty_label(&asset_with_warranty(Some("15/06/2025")), today),
            WarrantyLabel::Unknown
        );
        assert_eq!(WarrantyLabel::Unknown.as_str(), "");
    }

    #[test]
    fn test_expired_first_calibration_flags_asset() {
        let today = day(2025, 6, 15);
        let incoming = HistoryDetails::Calibration {
            calib_date: today - Duration::days(365),
            expire_date: today - Duration::days(1),
        };
        assert_eq!(calibration_status_change(&[], &incoming, today), Some(CALIBRATION_STATUS));
    }

    #[test]
    fn test_later_valid_calibration_does_not_flag() {
        let today = day(2025, 6, 15);
        let existing = vec![calibration(1, day(2024, 6, 1), day(2025, 6, 1))];
        let incoming = HistoryDetails::Calibration {
            calib_date: day(2025, 6, 10),
            expire_date: day(2026, 6, 10),
        };
        assert_eq!(calibration_status_change(&existing, &incoming, today), None);
    }

    #[test]
    fn test_older_incoming_is_outranked_by_existing() {
        let today = day(2025, 6, 15);
        // Existing calibration is newer and still valid; a back-dated
        // expired entry must not flag the asset.
        let existing = vec![calibration(1, day(2025, 5, 1), day(2026, 5, 1))];
        let incoming = HistoryDetails::Calibration {
            calib_date: day(2023, 1, 1),
            expire_date: day(2024, 1, 1),
        };
        assert_eq!(calibration_status_change(&existing, &incoming, today), None);
    }

    #[test]
    fn test_same_calib_date_tie_goes_to_incoming() {
        let today = day(2025, 6, 15);
        let existing = vec![calibration(1, day(2025, 1, 1), day(2026, 1, 1))];
        let incoming = HistoryDetails::Calibration {
            calib_date: day(2025, 1, 1),
            expire_date: day(2025, 2, 1),
        };
        assert_eq!(
            calibration_status_change(&existing, &incoming, today),
            Some(CALIBRATION_STATUS)
        );
    }

    #[test]
    fn test_fault_never_changes_status() {
        let today = day(2025, 6, 15);
        let incoming = HistoryDetails::Fault {
            description: "burnt fuse".into(),
            fault_date: today,
            sent_date: None,
            return_date: None,
        };
        assert_eq!(calibration_status_change(&[], &incoming, today), None);
    }

    #[test]
    fn test_expiry_today_is_not_expired() {
        let today = day(2025, 6, 15);
        let incoming = HistoryDetails::Calibration {
            calib_date: day(2024, 6, 15),
            expire_date: today,
        };
        assert_eq!(calibration_status_change(&[], &incoming, today), None);
    }
}
