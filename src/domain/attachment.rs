use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{missing_fields, DomainError, DomainResult};

/// Reference to a file stored outside the ledger (blob storage).
/// Only the reference is kept here; bytes live elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub owner_creation_key: i64,
    pub file_name: String,
    /// Opaque key understood by the external blob store
    pub storage_key: String,
    pub attached_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    pub owner_creation_key: i64,
    pub file_name: String,
    pub storage_key: String,
    pub attached_at: DateTime<Utc>,
}

impl NewAttachment {
    /// Both names are required and stored trimmed
    pub fn new(owner_creation_key: i64, file_name: &str, storage_key: &str) -> DomainResult<Self> {
        let missing = missing_fields(&[
            ("file_name", Some(file_name)),
            ("storage_key", Some(storage_key)),
        ]);
        if !missing.is_empty() {
            return Err(DomainError::MissingRequiredField(missing));
        }

        Ok(Self {
            owner_creation_key,
            file_name: file_name.trim().to_string(),
            storage_key: storage_key.trim().to_string(),
            attached_at: Utc::now(),
        })
    }

    pub fn into_attachment(self, id: i64) -> Attachment {
        Attachment {
            id,
            owner_creation_key: self.owner_creation_key,
            file_name: self.file_name,
            storage_key: self.storage_key,
            attached_at: self.attached_at,
        }
    }
}
