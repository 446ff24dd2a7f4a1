// src/services/history_service.rs
//
// Appends fault and calibration entries to an asset and reads them back.

use serde::Deserialize;
use std::sync::Arc;

use crate::domain::{build_history_details, HistoryCategory, HistoryEntry, HistoryInput, NewHistoryEntry};
use crate::error::AppResult;
use crate::events::{AssetFlaggedForCalibration, EventBus, HistoryRecorded};
use crate::repositories::HistoryRepository;
use crate::services::history_sequencer::HistorySequencer;
use crate::services::identifier_resolver::IdentifierResolver;
use crate::services::status_deriver::StatusDeriver;

/// Raw add-history input as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordHistoryRequest {
    pub identifier: String,
    /// "fault", "calibration" (or "calib")
    pub category: String,
    pub fault_description: Option<String>,
    pub fault_date: Option<String>,
    pub sent_date: Option<String>,
    pub return_date: Option<String>,
    pub calib_date: Option<String>,
    pub expire_date: Option<String>,
}

impl RecordHistoryRequest {
    fn input(&self) -> HistoryInput {
        HistoryInput {
            fault_description: self.fault_description.clone(),
            fault_date: self.fault_date.clone(),
            sent_date: self.sent_date.clone(),
            return_date: self.return_date.clone(),
            calib_date: self.calib_date.clone(),
            expire_date: self.expire_date.clone(),
        }
    }
}

pub struct HistoryService {
    history_repo: Arc<dyn HistoryRepository>,
    resolver: Arc<IdentifierResolver>,
    sequencer: Arc<HistorySequencer>,
    status: Arc<StatusDeriver>,
    event_bus: Arc<EventBus>,
}

impl HistoryService {
    pub fn new(
        history_repo: Arc<dyn HistoryRepository>,
        resolver: Arc<IdentifierResolver>,
        sequencer: Arc<HistorySequencer>,
        status: Arc<StatusDeriver>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            history_repo,
            resolver,
            sequencer,
            status,
            event_bus,
        }
    }

    /// Validates and appends one entry.
    ///
    /// A calibration whose deciding record has already expired sets the
    /// asset status to "Calib" in the same transaction as the insert, judged
    /// against the calibrations committed at that point. Nothing here ever
    /// clears it.
    pub fn record_history(&self, request: RecordHistoryRequest) -> AppResult<HistoryEntry> {
        let asset = self.resolver.resolve(&request.identifier)?;
        let category: HistoryCategory = request.category.parse()?;
        let details = build_history_details(category, &request.input())?;
        let new_entry = NewHistoryEntry::new(asset.creation_key, details);

        let rule = |existing: &[HistoryEntry]| {
            self.status.calibration_status(existing, &new_entry.details)
        };
        let recorded = self.history_repo.insert_with_status(&new_entry, &rule)?;
        let entry = recorded.entry;
        log::info!(
            "recorded {} #{} for asset {}",
            category,
            entry.sequence,
            asset.creation_key
        );

        self.event_bus.emit(HistoryRecorded::new(
            asset.creation_key,
            category,
            entry.sequence,
        ));
        if let Some(previous_status) = recorded.replaced_status {
            log::info!(
                "asset {} flagged for calibration (was '{}')",
                asset.creation_key,
                previous_status
            );
            self.event_bus.emit(AssetFlaggedForCalibration::new(
                asset.creation_key,
                previous_status,
            ));
        }

        Ok(entry)
    }

    /// Entries of one asset, by category then sequence
    pub fn list_history(
        &self,
        identifier: &str,
        category: Option<HistoryCategory>,
    ) -> AppResult<Vec<HistoryEntry>> {
        let asset = self.resolver.resolve(identifier)?;
        self.history_repo.list_for_asset(asset.creation_key, category)
    }

    /// Sequence the next entry of `category` would receive
    pub fn next_sequence(&self, identifier: &str, category: HistoryCategory) -> AppResult<u32> {
        let asset = self.resolver.resolve(identifier)?;
        self.sequencer.next_sequence(asset.creation_key, category)
    }
}
