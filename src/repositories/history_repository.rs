// src/repositories/history_repository.rs
//
// History persistence. Sequence allocation, the status decision, the insert
// and the status write on the owning asset share one immediate transaction.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{next_sequence, HistoryCategory, HistoryDetails, HistoryEntry, NewHistoryEntry};
use crate::error::{AppError, AppResult};
use crate::repositories::sql;

const HISTORY_COLUMNS: &str = "id, asset_id, category, sequence, fault_description, fault_date,
     sent_date, return_date, calib_date, expire_date, recorded_at";

/// Picks the status to write on the owning asset, given the asset's existing
/// entries of the new entry's category as seen inside the insert transaction.
pub type StatusRule<'a> = &'a dyn Fn(&[HistoryEntry]) -> Option<&'static str>;

/// An inserted entry and the status it displaced, if any
#[derive(Debug, Clone)]
pub struct RecordedHistory {
    pub entry: HistoryEntry,
    /// Asset status before the rule changed it; `None` when untouched
    pub replaced_status: Option<String>,
}

pub trait HistoryRepository: Send + Sync {
    /// Allocates the next sequence for (owner, category) and inserts the entry.
    fn insert(&self, entry: &NewHistoryEntry) -> AppResult<HistoryEntry>;
    /// Same as `insert`, and writes the status `rule` picks to the owning
    /// asset. A status equal to the current one is not rewritten.
    fn insert_with_status(
        &self,
        entry: &NewHistoryEntry,
        rule: StatusRule<'_>,
    ) -> AppResult<RecordedHistory>;
    fn max_sequence(&self, owner_creation_key: i64, category: HistoryCategory) -> AppResult<Option<u32>>;
    /// Ordered by category, then sequence
    fn list_for_asset(
        &self,
        owner_creation_key: i64,
        category: Option<HistoryCategory>,
    ) -> AppResult<Vec<HistoryEntry>>;
    /// Every entry, ordered by owner creation key, category, sequence
    fn list_all(&self) -> AppResult<Vec<HistoryEntry>>;
}

pub struct SqliteHistoryRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteHistoryRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: &Row) -> rusqlite::Result<HistoryEntry> {
        let category: String = row.get("category")?;
        let sequence: i64 = row.get("sequence")?;
        let recorded_at: String = row.get("recorded_at")?;

        let details = match category.as_str() {
            "fault" => HistoryDetails::Fault {
                description: sql::required(4, "fault_description", row.get("fault_description")?)?,
                fault_date: sql::required(5, "fault_date", sql::optional_date(5, row.get("fault_date")?)?)?,
                sent_date: sql::optional_date(6, row.get("sent_date")?)?,
                return_date: sql::optional_date(7, row.get("return_date")?)?,
            },
            "calibration" => HistoryDetails::Calibration {
                calib_date: sql::required(8, "calib_date", sql::optional_date(8, row.get("calib_date")?)?)?,
                expire_date: sql::required(9, "expire_date", sql::optional_date(9, row.get("expire_date")?)?)?,
            },
            _ => return Err(rusqlite::Error::InvalidQuery),
        };

        Ok(HistoryEntry {
            id: row.get("id")?,
            owner_creation_key: row.get("asset_id")?,
            sequence: sql::required(3, "sequence", sql::position(Some(sequence)))?,
            details,
            recorded_at: sql::timestamp(10, &recorded_at)?,
        })
    }

    fn entries_of(
        conn: &Connection,
        owner_creation_key: i64,
        category: HistoryCategory,
    ) -> rusqlite::Result<Vec<HistoryEntry>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM asset_history WHERE asset_id = ?1 AND category = ?2 ORDER BY sequence",
            HISTORY_COLUMNS
        ))?;
        let entries = stmt
            .query_map(params![owner_creation_key, category.as_str()], Self::row_to_entry)?
            .collect();
        entries
    }
}

fn keep_status(_existing: &[HistoryEntry]) -> Option<&'static str> {
    None
}

impl HistoryRepository for SqliteHistoryRepository {
    fn insert(&self, entry: &NewHistoryEntry) -> AppResult<HistoryEntry> {
        Ok(self.insert_with_status(entry, &keep_status)?.entry)
    }

    fn insert_with_status(
        &self,
        entry: &NewHistoryEntry,
        rule: StatusRule<'_>,
    ) -> AppResult<RecordedHistory> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let category = entry.category();

        let current_status: String = tx
            .query_row(
                "SELECT status FROM assets WHERE id = ?1",
                params![entry.owner_creation_key],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| AppError::not_found(format!("asset {}", entry.owner_creation_key)))?;

        let existing = Self::entries_of(&tx, entry.owner_creation_key, category)?;
        let status_flag = rule(&existing).filter(|flag| *flag != current_status);

        let current_max: Option<i64> = tx.query_row(
            "SELECT MAX(sequence) FROM asset_history WHERE asset_id = ?1 AND category = ?2",
            params![entry.owner_creation_key, category.as_str()],
            |row| row.get(0),
        )?;
        let sequence = next_sequence(sql::position(current_max));

        let (description, fault_date, sent_date, return_date, calib_date, expire_date) =
            match &entry.details {
                HistoryDetails::Fault {
                    description,
                    fault_date,
                    sent_date,
                    return_date,
                } => (
                    Some(description.clone()),
                    sql::date_text(Some(*fault_date)),
                    sql::date_text(*sent_date),
                    sql::date_text(*return_date),
                    None,
                    None,
                ),
                HistoryDetails::Calibration {
                    calib_date,
                    expire_date,
                } => (
                    None,
                    None,
                    None,
                    None,
                    sql::date_text(Some(*calib_date)),
                    sql::date_text(Some(*expire_date)),
                ),
            };

        tx.execute(
            "INSERT INTO asset_history (
                asset_id, category, sequence, fault_description, fault_date, sent_date,
                return_date, calib_date, expire_date, recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                entry.owner_creation_key,
                category.as_str(),
                i64::from(sequence),
                description,
                fault_date,
                sent_date,
                return_date,
                calib_date,
                expire_date,
                entry.recorded_at.to_rfc3339(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        if let Some(status) = status_flag {
            tx.execute(
                "UPDATE assets SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status, Utc::now().to_rfc3339(), entry.owner_creation_key],
            )?;
        }

        tx.commit()?;
        Ok(RecordedHistory {
            entry: entry.clone().into_entry(id, sequence),
            replaced_status: status_flag.map(|_| current_status),
        })
    }

    fn max_sequence(&self, owner_creation_key: i64, category: HistoryCategory) -> AppResult<Option<u32>> {
        let conn = self.pool.get()?;
        let max: Option<i64> = conn.query_row(
            "SELECT MAX(sequence) FROM asset_history WHERE asset_id = ?1 AND category = ?2",
            params![owner_creation_key, category.as_str()],
            |row| row.get(0),
        )?;
        Ok(sql::position(max))
    }

    fn list_for_asset(
        &self,
        owner_creation_key: i64,
        category: Option<HistoryCategory>,
    ) -> AppResult<Vec<HistoryEntry>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM asset_history
             WHERE asset_id = ?1 AND (?2 IS NULL OR category = ?2)
             ORDER BY category, sequence, id",
            HISTORY_COLUMNS
        ))?;

        let entries = stmt
            .query_map(
                params![owner_creation_key, category.map(|c| c.as_str())],
                Self::row_to_entry,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn list_all(&self) -> AppResult<Vec<HistoryEntry>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM asset_history ORDER BY asset_id, category, sequence, id",
            HISTORY_COLUMNS
        ))?;

        let entries = stmt
            .query_map([], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
