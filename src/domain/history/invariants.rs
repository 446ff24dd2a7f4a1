use super::entity::{HistoryCategory, HistoryDetails};
use crate::domain::status::parse_date_field;
use crate::domain::{missing_fields, DomainError, DomainResult};

/// Raw, caller-supplied history payload. Every field is optional here; which
/// ones are required depends on the category.
#[derive(Debug, Clone, Default)]
pub struct HistoryInput {
    pub fault_description: Option<String>,
    pub fault_date: Option<String>,
    pub sent_date: Option<String>,
    pub return_date: Option<String>,
    pub calib_date: Option<String>,
    pub expire_date: Option<String>,
}

/// Builds the typed payload for `category` from raw input.
///
/// Fault requires `fault_description` and `fault_date`; calibration requires
/// `calib_date` and `expire_date`. Fields of the other category are ignored.
pub fn build_history_details(
    category: HistoryCategory,
    input: &HistoryInput,
) -> DomainResult<HistoryDetails> {
    match category {
        HistoryCategory::Fault => {
            let missing = missing_fields(&[
                ("fault_description", input.fault_description.as_deref()),
                ("fault_date", input.fault_date.as_deref()),
            ]);
            if !missing.is_empty() {
                return Err(DomainError::MissingRequiredField(missing));
            }

            let details = HistoryDetails::Fault {
                description: input.fault_description.as_deref().unwrap_or_default().trim().to_string(),
                fault_date: required_date("fault_date", input.fault_date.as_deref())?,
                sent_date: parse_date_field("sent_date", input.sent_date.as_deref())?,
                return_date: parse_date_field("return_date", input.return_date.as_deref())?,
            };
            validate_history_details(&details)?;
            Ok(details)
        }
        HistoryCategory::Calibration => {
            let missing = missing_fields(&[
                ("calib_date", input.calib_date.as_deref()),
                ("expire_date", input.expire_date.as_deref()),
            ]);
            if !missing.is_empty() {
                return Err(DomainError::MissingRequiredField(missing));
            }

            let details = HistoryDetails::Calibration {
                calib_date: required_date("calib_date", input.calib_date.as_deref())?,
                expire_date: required_date("expire_date", input.expire_date.as_deref())?,
            };
            validate_history_details(&details)?;
            Ok(details)
        }
    }
}

/// Validates an already-typed payload
pub fn validate_history_details(details: &HistoryDetails) -> DomainResult<()> {
    if let HistoryDetails::Fault { description, .. } = details {
        if description.trim().is_empty() {
            return Err(DomainError::MissingRequiredField(vec![
                "fault_description".to_string(),
            ]));
        }
    }
    Ok(())
}

fn required_date(field: &str, raw: Option<&str>) -> DomainResult<chrono::NaiveDate> {
    parse_date_field(field, raw)?
        .ok_or_else(|| DomainError::MissingRequiredField(vec![field.to_string()]))
}

/// Critical History Invariants:
///
/// 1. Category is fault or calibration, nothing else
/// 2. An entry carries exactly the fields of its category
/// 3. Sequence is gapless from 1 per (asset, category)
/// 4. Entries are never edited after creation

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_fault_with_required_fields() {
        let input = HistoryInput {
            fault_description: Some("Display flickers".into()),
            fault_date: Some("2025-03-01".into()),
            sent_date: Some("".into()),
            ..Default::default()
        };
        let details = build_history_details(HistoryCategory::Fault, &input).unwrap();
        assert_eq!(
            details,
            HistoryDetails::Fault {
                description: "Display flickers".into(),
                fault_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                sent_date: None,
                return_date: None,
            }
        );
    }

    #[test]
    fn test_fault_missing_fields_are_listed() {
        let input = HistoryInput {
            calib_date: Some("2025-03-01".into()),
            ..Default::default()
        };
        match build_history_details(HistoryCategory::Fault, &input) {
            Err(DomainError::MissingRequiredField(fields)) => {
                assert_eq!(fields, vec!["fault_description", "fault_date"]);
            }
            other => panic!("expected missing fields, got {:?}", other),
        }
    }

    #[test]
    fn test_calibration_missing_expire_date() {
        let input = HistoryInput {
            calib_date: Some("2025-03-01".into()),
            ..Default::default()
        };
        match build_history_details(HistoryCategory::Calibration, &input) {
            Err(DomainError::MissingRequiredField(fields)) => {
                assert_eq!(fields, vec!["expire_date"]);
            }
            other => panic!("expected missing fields, got {:?}", other),
        }
    }

    #[test]
    fn test_calibration_ignores_fault_fields() {
        let input = HistoryInput {
            fault_description: Some("ignored".into()),
            calib_date: Some("2025-03-01".into()),
            expire_date: Some("2026-03-01".into()),
            ..Default::default()
        };
        let details = build_history_details(HistoryCategory::Calibration, &input).unwrap();
        assert_eq!(details.category(), HistoryCategory::Calibration);
    }

    #[test]
    fn test_unparsable_date_is_rejected() {
        let input = HistoryInput {
            calib_date: Some("01/03/2025".into()),
            expire_date: Some("2026-03-01".into()),
            ..Default::default()
        };
        assert!(matches!(
            build_history_details(HistoryCategory::Calibration, &input),
            Err(DomainError::InvalidDate { field, .. }) if field == "calib_date"
        ));
    }
}
