// src/repositories/attachment_repository.rs
//
// Attachment references. File bytes are never stored here.

use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{Attachment, NewAttachment};
use crate::error::AppResult;
use crate::repositories::sql;

pub trait AttachmentRepository: Send + Sync {
    fn insert(&self, attachment: &NewAttachment) -> AppResult<Attachment>;
    /// Oldest first
    fn list_for_asset(&self, owner_creation_key: i64) -> AppResult<Vec<Attachment>>;
}

pub struct SqliteAttachmentRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteAttachmentRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_attachment(row: &Row) -> rusqlite::Result<Attachment> {
        let attached_at: String = row.get("attached_at")?;

        Ok(Attachment {
            id: row.get("id")?,
            owner_creation_key: row.get("asset_id")?,
            file_name: row.get("file_name")?,
            storage_key: row.get("storage_key")?,
            attached_at: sql::timestamp(4, &attached_at)?,
        })
    }
}

impl AttachmentRepository for SqliteAttachmentRepository {
    fn insert(&self, attachment: &NewAttachment) -> AppResult<Attachment> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT INTO attachments (asset_id, file_name, storage_key, attached_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                attachment.owner_creation_key,
                attachment.file_name,
                attachment.storage_key,
                attachment.attached_at.to_rfc3339(),
            ],
        )?;

        Ok(attachment.clone().into_attachment(conn.last_insert_rowid()))
    }

    fn list_for_asset(&self, owner_creation_key: i64) -> AppResult<Vec<Attachment>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, asset_id, file_name, storage_key, attached_at
             FROM attachments WHERE asset_id = ?1 ORDER BY id",
        )?;

        let attachments = stmt
            .query_map(params![owner_creation_key], Self::row_to_attachment)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(attachments)
    }
}
