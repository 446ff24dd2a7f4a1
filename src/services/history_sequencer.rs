// src/services/history_sequencer.rs
//
// Per-(asset, category) sequence numbers for history entries.
// The history insert applies the same rule inside its transaction; this is
// the read-only view of the number the next entry will get.

use std::sync::Arc;

use crate::domain::{next_sequence, HistoryCategory};
use crate::error::AppResult;
use crate::repositories::HistoryRepository;

pub struct HistorySequencer {
    history_repo: Arc<dyn HistoryRepository>,
}

impl HistorySequencer {
    pub fn new(history_repo: Arc<dyn HistoryRepository>) -> Self {
        Self { history_repo }
    }

    /// `max(sequence) + 1` within (owner, category), or 1
    pub fn next_sequence(&self, owner_creation_key: i64, category: HistoryCategory) -> AppResult<u32> {
        let max = self.history_repo.max_sequence(owner_creation_key, category)?;
        Ok(next_sequence(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::create_test_pool;
    use crate::domain::{HistoryDetails, NewAsset, NewHistoryEntry};
    use crate::repositories::{AssetRepository, SqliteAssetRepository, SqliteHistoryRepository};
    use chrono::NaiveDate;

    #[test]
    fn test_categories_count_independently() {
        let (_dir, pool) = create_test_pool();
        let assets = SqliteAssetRepository::new(Arc::clone(&pool));
        let history = Arc::new(SqliteHistoryRepository::new(pool));
        let sequencer = HistorySequencer::new(history.clone());
        let key = assets
            .insert(&NewAsset::new(
                "TS-1".into(),
                "SN-1".into(),
                "Thermometer".into(),
                "Testo".into(),
                "735".into(),
                "Lab".into(),
                "OK".into(),
            ))
            .unwrap()
            .creation_key;

        assert_eq!(sequencer.next_sequence(key, HistoryCategory::Fault).unwrap(), 1);

        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let fault = HistoryDetails::Fault {
            description: "Drifting".into(),
            fault_date: date,
            sent_date: None,
            return_date: None,
        };
        history.insert(&NewHistoryEntry::new(key, fault.clone())).unwrap();
        history.insert(&NewHistoryEntry::new(key, fault)).unwrap();

        assert_eq!(sequencer.next_sequence(key, HistoryCategory::Fault).unwrap(), 3);
        assert_eq!(sequencer.next_sequence(key, HistoryCategory::Calibration).unwrap(), 1);
    }
}
