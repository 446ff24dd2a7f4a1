// Shared fixtures for service tests: a fully wired engine over a temporary
// database with a fixed calendar.

use chrono::NaiveDate;
use std::ops::Deref;
use std::sync::Arc;

use crate::application::AppState;
use crate::config::EngineConfig;
use crate::db::connection::create_test_pool;
use crate::services::{CreateAssetRequest, FixedClock, RecordHistoryRequest};

pub(crate) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

pub(crate) struct TestEngine {
    _dir: tempfile::TempDir,
    state: AppState,
}

impl Deref for TestEngine {
    type Target = AppState;

    fn deref(&self) -> &AppState {
        &self.state
    }
}

impl TestEngine {
    /// Nulls the stored display index of one asset
    pub(crate) fn corrupt_index(&self, primary_code: &str) {
        self.pool
            .get()
            .unwrap()
            .execute(
                "UPDATE assets SET display_index = NULL WHERE primary_code = ?1",
                [primary_code],
            )
            .unwrap();
    }

    /// Stored indices in creation order
    pub(crate) fn stored_indices(&self) -> Vec<Option<u32>> {
        let conn = self.pool.get().unwrap();
        let mut stmt = conn
            .prepare("SELECT display_index FROM assets ORDER BY id")
            .unwrap();
        let rows = stmt
            .query_map([], |row| row.get::<_, Option<u32>>(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        rows
    }
}

pub(crate) fn engine_with(config: EngineConfig) -> TestEngine {
    let (dir, pool) = create_test_pool();
    let state = AppState::with_pool(pool, config, Arc::new(FixedClock(today())));
    TestEngine { _dir: dir, state }
}

pub(crate) fn engine() -> TestEngine {
    engine_with(EngineConfig::default())
}

pub(crate) fn create_request(primary_code: &str, serial_number: &str) -> CreateAssetRequest {
    CreateAssetRequest {
        primary_code: Some(primary_code.to_string()),
        serial_number: Some(serial_number.to_string()),
        name: Some("Digital multimeter".into()),
        brand: Some("Fluke".into()),
        model: Some("87V".into()),
        location: Some("Lab 2".into()),
        status: Some("In use".into()),
        ..Default::default()
    }
}

pub(crate) fn fault(identifier: &str, fault_date: &str) -> RecordHistoryRequest {
    RecordHistoryRequest {
        identifier: identifier.to_string(),
        category: "fault".into(),
        fault_description: Some("Does not power on".into()),
        fault_date: Some(fault_date.to_string()),
        ..Default::default()
    }
}

pub(crate) fn calibration(identifier: &str, calib_date: &str, expire_date: &str) -> RecordHistoryRequest {
    RecordHistoryRequest {
        identifier: identifier.to_string(),
        category: "calibration".into(),
        calib_date: Some(calib_date.to_string()),
        expire_date: Some(expire_date.to_string()),
        ..Default::default()
    }
}
