// src/services/export_service.rs
//
// Flat, spreadsheet-shaped snapshot of the ledger. Rendering the rows into
// a workbook is left to the caller.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{format_calendar_date, HistoryDetails, HistoryEntry};
use crate::error::AppResult;
use crate::repositories::HistoryRepository;
use crate::services::asset_service::{AssetService, AssetView};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetExportRow {
    pub display_index: u32,
    pub primary_code: String,
    pub alt_code: String,
    pub serial_number: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub description: String,
    pub location: String,
    pub status: String,
    pub import_date: String,
    pub warranty_end: String,
    pub warranty_label: String,
}

/// One history entry, keyed by the owner's serial number. Columns that do
/// not apply to the entry's category are empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryExportRow {
    pub serial_number: String,
    pub category: String,
    pub sequence: u32,
    pub fault_description: String,
    pub fault_date: String,
    pub sent_date: String,
    pub return_date: String,
    pub calib_date: String,
    pub expire_date: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSnapshot {
    pub assets: Vec<AssetExportRow>,
    pub history: Vec<HistoryExportRow>,
}

pub struct ExportService {
    assets: Arc<AssetService>,
    history_repo: Arc<dyn HistoryRepository>,
}

impl ExportService {
    pub fn new(assets: Arc<AssetService>, history_repo: Arc<dyn HistoryRepository>) -> Self {
        Self { assets, history_repo }
    }

    /// Assets in display order; history grouped by asset in the same order,
    /// then by category and sequence.
    pub fn snapshot(&self) -> AppResult<ExportSnapshot> {
        let views = self.assets.list_assets()?;
        let mut by_owner: HashMap<i64, Vec<HistoryEntry>> = HashMap::new();
        for entry in self.history_repo.list_all()? {
            by_owner.entry(entry.owner_creation_key).or_default().push(entry);
        }

        let mut history = Vec::new();
        for view in &views {
            if let Some(entries) = by_owner.remove(&view.asset.creation_key) {
                history.extend(
                    entries
                        .iter()
                        .map(|entry| history_row(&view.asset.serial_number, entry)),
                );
            }
        }

        Ok(ExportSnapshot {
            assets: views.iter().map(asset_row).collect(),
            history,
        })
    }
}

fn asset_row(view: &AssetView) -> AssetExportRow {
    let asset = &view.asset;
    AssetExportRow {
        display_index: view.display_index,
        primary_code: asset.primary_code.clone(),
        alt_code: asset.alt_code.clone().unwrap_or_default(),
        serial_number: asset.serial_number.clone(),
        name: asset.name.clone(),
        brand: asset.brand.clone(),
        model: asset.model.clone(),
        description: asset.description.clone().unwrap_or_default(),
        location: asset.location.clone(),
        status: asset.status.clone(),
        import_date: asset.import_date.map(format_calendar_date).unwrap_or_default(),
        warranty_end: asset.warranty_end.clone().unwrap_or_default(),
        warranty_label: view.warranty_label.as_str().to_string(),
    }
}

fn history_row(serial_number: &str, entry: &HistoryEntry) -> HistoryExportRow {
    let text = |date: Option<chrono::NaiveDate>| date.map(format_calendar_date).unwrap_or_default();

    let mut row = HistoryExportRow {
        serial_number: serial_number.to_string(),
        category: entry.category().as_str().to_string(),
        sequence: entry.sequence,
        fault_description: String::new(),
        fault_date: String::new(),
        sent_date: String::new(),
        return_date: String::new(),
        calib_date: String::new(),
        expire_date: String::new(),
    };

    match &entry.details {
        HistoryDetails::Fault {
            description,
            fault_date,
            sent_date,
            return_date,
        } => {
            row.fault_description = description.clone();
            row.fault_date = text(Some(*fault_date));
            row.sent_date = text(*sent_date);
            row.return_date = text(*return_date);
        }
        HistoryDetails::Calibration {
            calib_date,
            expire_date,
        } => {
            row.calib_date = text(Some(*calib_date));
            row.expire_date = text(Some(*expire_date));
        }
    }
    row
}
