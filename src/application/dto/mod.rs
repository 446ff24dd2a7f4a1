// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// - Flat, serializable shapes for clients
// - Dates as `YYYY-MM-DD`, timestamps as RFC 3339
// - Conversion FROM domain entities only

use serde::{Deserialize, Serialize};

use crate::domain::{format_calendar_date, Attachment, HistoryDetails, HistoryEntry};
use crate::services::{AssetView, DeletedAsset, RepairReport};

// ============================================================================
// ASSET DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDto {
    pub creation_key: i64,
    /// "STT"
    pub display_index: u32,
    pub primary_code: String,
    pub alt_code: Option<String>,
    pub serial_number: String,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub description: Option<String>,
    pub location: String,
    pub status: String,
    pub import_date: Option<String>,
    pub warranty_end: Option<String>,
    /// "valid", "expired" or ""
    pub warranty_label: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedAssetDto {
    pub primary_code: String,
    pub serial_number: String,
    /// Blob keys the caller should remove
    pub storage_keys: Vec<String>,
}

// ============================================================================
// HISTORY DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntryDto {
    pub id: i64,
    pub category: String,
    pub sequence: u32,
    pub fault_description: Option<String>,
    pub fault_date: Option<String>,
    pub sent_date: Option<String>,
    pub return_date: Option<String>,
    pub calib_date: Option<String>,
    pub expire_date: Option<String>,
    pub recorded_at: String,
}

// ============================================================================
// ATTACHMENT DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentDto {
    pub id: i64,
    pub file_name: String,
    pub storage_key: String,
    pub attached_at: String,
}

// ============================================================================
// MAINTENANCE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairReportDto {
    pub checked: usize,
    pub reassigned: usize,
    pub failed: usize,
    pub needed_repair: bool,
}

// ============================================================================
// RESPONSE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

// ============================================================================
// CONVERSION HELPERS (Domain → DTO)
// ============================================================================

impl From<AssetView> for AssetDto {
    fn from(view: AssetView) -> Self {
        let asset = view.asset;
        Self {
            creation_key: asset.creation_key,
            display_index: view.display_index,
            primary_code: asset.primary_code,
            alt_code: asset.alt_code,
            serial_number: asset.serial_number,
            name: asset.name,
            brand: asset.brand,
            model: asset.model,
            description: asset.description,
            location: asset.location,
            status: asset.status,
            import_date: asset.import_date.map(format_calendar_date),
            warranty_end: asset.warranty_end,
            warranty_label: view.warranty_label.as_str().to_string(),
            created_at: asset.created_at.to_rfc3339(),
            updated_at: asset.updated_at.to_rfc3339(),
        }
    }
}

impl From<DeletedAsset> for DeletedAssetDto {
    fn from(deleted: DeletedAsset) -> Self {
        Self {
            primary_code: deleted.asset.primary_code,
            serial_number: deleted.asset.serial_number,
            storage_keys: deleted
                .attachments
                .into_iter()
                .map(|a| a.storage_key)
                .collect(),
        }
    }
}

impl From<HistoryEntry> for HistoryEntryDto {
    fn from(entry: HistoryEntry) -> Self {
        let mut dto = Self {
            id: entry.id,
            category: entry.category().to_string(),
            sequence: entry.sequence,
            fault_description: None,
            fault_date: None,
            sent_date: None,
            return_date: None,
            calib_date: None,
            expire_date: None,
            recorded_at: entry.recorded_at.to_rfc3339(),
        };

        match entry.details {
            HistoryDetails::Fault {
                description,
                fault_date,
                sent_date,
                return_date,
            } => {
                dto.fault_description = Some(description);
                dto.fault_date = Some(format_calendar_date(fault_date));
                dto.sent_date = sent_date.map(format_calendar_date);
                dto.return_date = return_date.map(format_calendar_date);
            }
            HistoryDetails::Calibration {
                calib_date,
                expire_date,
            } => {
                dto.calib_date = Some(format_calendar_date(calib_date));
                dto.expire_date = Some(format_calendar_date(expire_date));
            }
        }
        dto
    }
}

impl From<Attachment> for AttachmentDto {
    fn from(attachment: Attachment) -> Self {
        Self {
            id: attachment.id,
            file_name: attachment.file_name,
            storage_key: attachment.storage_key,
            attached_at: attachment.attached_at.to_rfc3339(),
        }
    }
}

impl From<RepairReport> for RepairReportDto {
    fn from(report: RepairReport) -> Self {
        Self {
            checked: report.checked,
            reassigned: report.reassigned,
            failed: report.failed,
            needed_repair: report.needed_repair,
        }
    }
}
