// src/application/error_handling.rs
//
// Maps internal errors to structured responses for whatever surface hosts
// the engine (HTTP handler, CLI, desktop shell).
//
// - Consistent shape for every failure
// - Store internals are logged, not exposed
// - Missing required fields are listed by name

use serde::Serialize;

use crate::error::{AppError, ErrorKind};

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
}

impl ErrorResponse {
    pub fn from_app_error(error: &AppError) -> Self {
        let error_type = error.kind();

        let message = match error_type {
            ErrorKind::StoreUnavailable => {
                log::error!("store error: {:?}", error);
                "Database operation failed".to_string()
            }
            ErrorKind::Internal => {
                log::error!("internal error: {:?}", error);
                "Internal error".to_string()
            }
            _ => error.to_string(),
        };

        Self {
            success: false,
            error_type,
            message,
            missing_fields: error.missing_fields().to_vec(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"success":false,"error_type":"internal"}"#.to_string())
    }
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self::from_app_error(&error)
    }
}

/// Runs `f` and converts its error into an `ErrorResponse`
pub fn handle_result<T>(f: impl FnOnce() -> Result<T, AppError>) -> Result<T, ErrorResponse> {
    f().map_err(ErrorResponse::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, IdentifierField};

    #[test]
    fn test_missing_fields_are_listed() {
        let error = AppError::Domain(DomainError::MissingRequiredField(vec![
            "name".into(),
            "brand".into(),
        ]));

        let response = ErrorResponse::from_app_error(&error);

        assert_eq!(response.error_type, ErrorKind::MissingRequiredField);
        assert_eq!(response.missing_fields, vec!["name", "brand"]);
        assert!(response.to_json().contains(r#""missing_fields":["name","brand"]"#));
    }

    #[test]
    fn test_store_details_are_hidden() {
        let response: ErrorResponse = AppError::Pool("connection refused at /var/db".into()).into();

        assert_eq!(response.error_type, ErrorKind::StoreUnavailable);
        assert!(!response.message.contains("/var/db"));
        assert!(!response.to_json().contains("missing_fields"));
    }

    #[test]
    fn test_duplicate_message_names_field() {
        let response = ErrorResponse::from_app_error(&AppError::DuplicateIdentifier {
            field: IdentifierField::SerialNumber,
            value: "SN-1".into(),
        });

        assert_eq!(response.error_type, ErrorKind::DuplicateIdentifier);
        assert!(response.message.contains("serial_number"));
    }

    #[test]
    fn test_handle_result_passes_success_through() {
        assert_eq!(handle_result(|| Ok::<_, AppError>(3)).unwrap(), 3);
        let err = handle_result(|| Err::<(), _>(AppError::not_found("asset 'X'"))).unwrap_err();
        assert_eq!(err.error_type, ErrorKind::NotFound);
    }
}
