// src/error/types.rs
use crate::domain::{DomainError, IdentifierField};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate {field}: '{value}' is already used by another asset")]
    DuplicateIdentifier { field: IdentifierField, value: String },

    #[error("Other error: {0}")]
    Other(String),
}

/// Coarse error classification surfaced to CRUD callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    DuplicateIdentifier,
    InvalidCategory,
    MissingRequiredField,
    InvalidInput,
    StoreUnavailable,
    Internal,
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Database(_) | AppError::Pool(_) => ErrorKind::StoreUnavailable,
            AppError::Domain(DomainError::InvalidCategory(_)) => ErrorKind::InvalidCategory,
            AppError::Domain(DomainError::MissingRequiredField(_)) => {
                ErrorKind::MissingRequiredField
            }
            AppError::Domain(_) => ErrorKind::InvalidInput,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::DuplicateIdentifier { .. } => ErrorKind::DuplicateIdentifier,
            AppError::Serialization(_)
            | AppError::Io(_)
            | AppError::Config(_)
            | AppError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Field names for `MissingRequiredField`, empty otherwise
    pub fn missing_fields(&self) -> &[String] {
        match self {
            AppError::Domain(DomainError::MissingRequiredField(fields)) => fields,
            _ => &[],
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Other(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_are_store_unavailable() {
        let err = AppError::Pool("timed out waiting for connection".into());
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        let err = AppError::Database(rusqlite::Error::InvalidQuery);
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }

    #[test]
    fn test_domain_errors_keep_their_kind() {
        let err = AppError::from(DomainError::InvalidCategory("repair".into()));
        assert_eq!(err.kind(), ErrorKind::InvalidCategory);

        let err = AppError::from(DomainError::MissingRequiredField(vec!["calib_date".into()]));
        assert_eq!(err.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(err.missing_fields(), ["calib_date".to_string()]);
    }

    #[test]
    fn test_duplicate_message() {
        let err = AppError::DuplicateIdentifier {
            field: IdentifierField::SerialNumber,
            value: "SN-1".into(),
        };
        assert_eq!(
            err.to_string(),
            "Duplicate serial_number: 'SN-1' is already used by another asset"
        );
        assert_eq!(err.kind(), ErrorKind::DuplicateIdentifier);
    }
}
