// src/repositories/asset_repository.rs
//
// Asset persistence. Row order everywhere is creation order (`id`).

use chrono::Utc;
use rusqlite::{params, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{next_display_index, Asset, IdentifierField, NewAsset, RESOLUTION_ORDER};
use crate::error::{AppError, AppResult};
use crate::repositories::sql;

const ASSET_COLUMNS: &str = "id, display_index, primary_code, alt_code, serial_number, name, brand,
     model, description, location, status, import_date, warranty_end, created_at, updated_at";

/// Stored display index of one asset, as found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSlot {
    pub creation_key: i64,
    pub display_index: Option<u32>,
}

#[cfg_attr(test, mockall::automock)]
pub trait AssetRepository: Send + Sync {
    /// Inserts and assigns `creation_key` and the next display index in one
    /// immediate transaction.
    fn insert(&self, asset: &NewAsset) -> AppResult<Asset>;
    fn get_by_key(&self, creation_key: i64) -> AppResult<Option<Asset>>;
    /// Case-insensitive match on one identifier field; lowest creation key wins.
    fn find_by_field(&self, field: IdentifierField, value: &str) -> AppResult<Option<Asset>>;
    /// First asset in creation order whose primary code, alternate code or
    /// serial number matches `value` case-insensitively.
    fn find_by_identifier(&self, value: &str) -> AppResult<Option<Asset>>;
    /// 1-based position of the asset in creation order
    fn creation_rank(&self, creation_key: i64) -> AppResult<u32>;
    fn list_ordered_by_creation(&self) -> AppResult<Vec<Asset>>;
    fn list_index_slots(&self) -> AppResult<Vec<IndexSlot>>;
    fn max_display_index(&self) -> AppResult<Option<i64>>;
    /// Writes payload fields; never touches `id` or `display_index`.
    fn update_fields(&self, asset: &Asset) -> AppResult<()>;
    fn update_display_index(&self, creation_key: i64, display_index: u32) -> AppResult<()>;
    /// Deletes the asset; history and attachments cascade.
    fn delete(&self, creation_key: i64) -> AppResult<()>;
}

pub struct SqliteAssetRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteAssetRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_asset(row: &Row) -> rusqlite::Result<Asset> {
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Asset {
            creation_key: row.get("id")?,
            display_index: sql::position(row.get("display_index")?),
            primary_code: row.get("primary_code")?,
            alt_code: row.get("alt_code")?,
            serial_number: row.get("serial_number")?,
            name: row.get("name")?,
            brand: row.get("brand")?,
            model: row.get("model")?,
            description: row.get("description")?,
            location: row.get("location")?,
            status: row.get("status")?,
            import_date: sql::optional_date(11, row.get("import_date")?)?,
            warranty_end: row.get("warranty_end")?,
            created_at: sql::timestamp(13, &created_at)?,
            updated_at: sql::timestamp(14, &updated_at)?,
        })
    }

    /// Turns a UNIQUE violation on an identifier column into a domain error.
    fn map_write_error(err: rusqlite::Error, primary_code: &str, serial_number: &str) -> AppError {
        if let rusqlite::Error::SqliteFailure(ref failure, Some(ref message)) = err {
            if failure.code == ErrorCode::ConstraintViolation {
                if message.contains("assets.primary_code") {
                    return AppError::DuplicateIdentifier {
                        field: IdentifierField::PrimaryCode,
                        value: primary_code.to_string(),
                    };
                }
                if message.contains("assets.serial_number") {
                    return AppError::DuplicateIdentifier {
                        field: IdentifierField::SerialNumber,
                        value: serial_number.to_string(),
                    };
                }
            }
        }
        AppError::Database(err)
    }
}

impl AssetRepository for SqliteAssetRepository {
    fn insert(&self, asset: &NewAsset) -> AppResult<Asset> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current_max: Option<i64> =
            tx.query_row("SELECT MAX(display_index) FROM assets", [], |row| row.get(0))?;
        let display_index = next_display_index(current_max);

        tx.execute(
            "INSERT INTO assets (
                display_index, primary_code, alt_code, serial_number, name, brand, model,
                description, location, status, import_date, warranty_end, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
            params![
                i64::from(display_index),
                asset.primary_code,
                asset.alt_code,
                asset.serial_number,
                asset.name,
                asset.brand,
                asset.model,
                asset.description,
                asset.location,
                asset.status,
                sql::date_text(asset.import_date),
                asset.warranty_end,
                asset.created_at.to_rfc3339(),
            ],
        )
        .map_err(|e| Self::map_write_error(e, &asset.primary_code, &asset.serial_number))?;

        let creation_key = tx.last_insert_rowid();
        tx.commit()?;

        Ok(asset.clone().into_asset(creation_key, Some(display_index)))
    }

    fn get_by_key(&self, creation_key: i64) -> AppResult<Option<Asset>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM assets WHERE id = ?1", ASSET_COLUMNS))?;

        let asset = stmt
            .query_row(params![creation_key], Self::row_to_asset)
            .optional()?;
        Ok(asset)
    }

    fn find_by_field(&self, field: IdentifierField, value: &str) -> AppResult<Option<Asset>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM assets WHERE {} = ?1 COLLATE UNICASE ORDER BY id LIMIT 1",
            ASSET_COLUMNS,
            field.column()
        ))?;

        let asset = stmt.query_row(params![value], Self::row_to_asset).optional()?;
        Ok(asset)
    }

    fn find_by_identifier(&self, value: &str) -> AppResult<Option<Asset>> {
        let matches = RESOLUTION_ORDER
            .iter()
            .map(|field| format!("{} = ?1 COLLATE UNICASE", field.column()))
            .collect::<Vec<_>>()
            .join(" OR ");

        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM assets WHERE {} ORDER BY id LIMIT 1",
            ASSET_COLUMNS, matches
        ))?;

        let asset = stmt.query_row(params![value], Self::row_to_asset).optional()?;
        Ok(asset)
    }

    fn creation_rank(&self, creation_key: i64) -> AppResult<u32> {
        let conn = self.pool.get()?;
        let rank: i64 = conn.query_row(
            "SELECT COUNT(*) FROM assets WHERE id <= ?1",
            params![creation_key],
            |row| row.get(0),
        )?;

        u32::try_from(rank)
            .map_err(|_| AppError::Other("asset count exceeds display index range".into()))
    }

    fn list_ordered_by_creation(&self) -> AppResult<Vec<Asset>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM assets ORDER BY id", ASSET_COLUMNS))?;

        let assets = stmt
            .query_map([], Self::row_to_asset)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(assets)
    }

    fn list_index_slots(&self) -> AppResult<Vec<IndexSlot>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id, display_index FROM assets ORDER BY id")?;

        let slots = stmt
            .query_map([], |row| {
                Ok(IndexSlot {
                    creation_key: row.get(0)?,
                    display_index: sql::position(row.get(1)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(slots)
    }

    fn max_display_index(&self) -> AppResult<Option<i64>> {
        let conn = self.pool.get()?;
        let max = conn.query_row("SELECT MAX(display_index) FROM assets", [], |row| row.get(0))?;
        Ok(max)
    }

    fn update_fields(&self, asset: &Asset) -> AppResult<()> {
        let conn = self.pool.get()?;

        let rows_affected = conn
            .execute(
                "UPDATE assets SET
                    primary_code = ?1, alt_code = ?2, serial_number = ?3, name = ?4, brand = ?5,
                    model = ?6, description = ?7, location = ?8, status = ?9, import_date = ?10,
                    warranty_end = ?11, updated_at = ?12
                 WHERE id = ?13",
                params![
                    asset.primary_code,
                    asset.alt_code,
                    asset.serial_number,
                    asset.name,
                    asset.brand,
                    asset.model,
                    asset.description,
                    asset.location,
                    asset.status,
                    sql::date_text(asset.import_date),
                    asset.warranty_end,
                    asset.updated_at.to_rfc3339(),
                    asset.creation_key,
                ],
            )
            .map_err(|e| Self::map_write_error(e, &asset.primary_code, &asset.serial_number))?;

        if rows_affected == 0 {
            return Err(AppError::not_found(format!("asset {}", asset.creation_key)));
        }
        Ok(())
    }

    fn update_display_index(&self, creation_key: i64, display_index: u32) -> AppResult<()> {
        let conn = self.pool.get()?;
        let rows_affected = conn.execute(
            "UPDATE assets SET display_index = ?1, updated_at = ?2 WHERE id = ?3",
            params![i64::from(display_index), Utc::now().to_rfc3339(), creation_key],
        )?;

        if rows_affected == 0 {
            return Err(AppError::not_found(format!("asset {}", creation_key)));
        }
        Ok(())
    }

    fn delete(&self, creation_key: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        let rows_affected = conn.execute("DELETE FROM assets WHERE id = ?1", params![creation_key])?;

        if rows_affected == 0 {
            return Err(AppError::not_found(format!("asset {}", creation_key)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;

    fn draft(code: &str, serial: &str) -> NewAsset {
        NewAsset::new(
            code.into(),
            serial.into(),
            "Torque wrench".into(),
            "Norbar".into(),
            "TTi 60".into(),
            "Assembly".into(),
            "OK".into(),
        )
    }

    #[test]
    fn test_insert_assigns_keys_and_indices() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAssetRepository::new(pool);

        let a = repo.insert(&draft("TS-1", "SN-1")).unwrap();
        let b = repo.insert(&draft("TS-2", "SN-2")).unwrap();

        assert!(b.creation_key > a.creation_key);
        assert_eq!(a.display_index, Some(1));
        assert_eq!(b.display_index, Some(2));
        assert_eq!(repo.max_display_index().unwrap(), Some(2));
    }

    #[test]
    fn test_duplicate_serial_maps_to_domain_error() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAssetRepository::new(pool);

        repo.insert(&draft("TS-1", "SN-1")).unwrap();
        let err = repo.insert(&draft("TS-2", "sn-1")).unwrap_err();

        assert!(matches!(
            err,
            AppError::DuplicateIdentifier { field: IdentifierField::SerialNumber, .. }
        ));
    }

    #[test]
    fn test_find_by_field_is_case_insensitive() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAssetRepository::new(pool);

        let mut with_alt = draft("TS-1", "SN-1");
        with_alt.alt_code = Some("CLC-9".into());
        let inserted = repo.insert(&with_alt).unwrap();

        let found = repo.find_by_field(IdentifierField::AltCode, "clc-9").unwrap();
        assert_eq!(found.map(|a| a.creation_key), Some(inserted.creation_key));
        assert!(repo
            .find_by_field(IdentifierField::PrimaryCode, "clc-9")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_identifier_match_folds_non_ascii_case() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAssetRepository::new(pool);
        let inserted = repo.insert(&draft("MÁY-Đ1", "SN-1")).unwrap();

        let found = repo.find_by_identifier("máy-đ1").unwrap();
        assert_eq!(found.map(|a| a.creation_key), Some(inserted.creation_key));

        let err = repo.insert(&draft("máy-đ1", "SN-2")).unwrap_err();
        assert!(matches!(
            err,
            AppError::DuplicateIdentifier { field: IdentifierField::PrimaryCode, .. }
        ));
    }

    #[test]
    fn test_find_by_identifier_prefers_earliest_asset() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAssetRepository::new(pool);
        let first = repo.insert(&draft("TS-1", "X-1")).unwrap();
        repo.insert(&draft("X-1", "SN-2")).unwrap();

        let found = repo.find_by_identifier("x-1").unwrap().unwrap();
        assert_eq!(found.creation_key, first.creation_key);
        assert!(repo.find_by_identifier("nope").unwrap().is_none());
    }

    #[test]
    fn test_creation_rank_counts_survivors() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAssetRepository::new(pool);
        let a = repo.insert(&draft("TS-1", "SN-1")).unwrap();
        let b = repo.insert(&draft("TS-2", "SN-2")).unwrap();
        let c = repo.insert(&draft("TS-3", "SN-3")).unwrap();

        repo.delete(b.creation_key).unwrap();

        assert_eq!(repo.creation_rank(a.creation_key).unwrap(), 1);
        assert_eq!(repo.creation_rank(c.creation_key).unwrap(), 2);
    }

    #[test]
    fn test_corrupt_index_reads_back_as_missing() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAssetRepository::new(Arc::clone(&pool));
        let asset = repo.insert(&draft("TS-1", "SN-1")).unwrap();

        pool.get()
            .unwrap()
            .execute("UPDATE assets SET display_index = NULL WHERE id = ?1", [asset.creation_key])
            .unwrap();

        let slots = repo.list_index_slots().unwrap();
        assert_eq!(
            slots,
            vec![IndexSlot { creation_key: asset.creation_key, display_index: None }]
        );
        // Null maximum falls back to 1 for the next insert
        let next = repo.insert(&draft("TS-2", "SN-2")).unwrap();
        assert_eq!(next.display_index, Some(1));
    }

    #[test]
    fn test_update_fields_keeps_index() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAssetRepository::new(pool);
        let mut asset = repo.insert(&draft("TS-1", "SN-1")).unwrap();

        asset.location = "Warehouse".into();
        asset.display_index = Some(42);
        repo.update_fields(&asset).unwrap();

        let stored = repo.get_by_key(asset.creation_key).unwrap().unwrap();
        assert_eq!(stored.location, "Warehouse");
        assert_eq!(stored.display_index, Some(1));
    }

    #[test]
    fn test_delete_missing_asset_is_not_found() {
        let (_dir, pool) = create_test_pool();
        let repo = SqliteAssetRepository::new(pool);
        assert!(matches!(repo.delete(77), Err(AppError::NotFound(_))));
    }
}
