// src/services/asset_service.rs
//
// Asset lifecycle orchestration: create, read, list, update, delete.
// Index allocation happens in the repository insert; index repair runs
// after every delete.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{EngineConfig, IndexMode};
use crate::domain::{
    missing_fields, non_blank, parse_date_field, validate_asset, Asset, Attachment, DomainError,
    IdentifierField, NewAsset, WarrantyLabel,
};
use crate::error::{AppError, AppResult};
use crate::events::{AssetCreated, AssetDeleted, AssetUpdated, AssetsReindexed, EventBus};
use crate::repositories::{AssetRepository, AttachmentRepository};
use crate::services::consistency_repairer::{ConsistencyRepairer, RepairReport};
use crate::services::identifier_resolver::IdentifierResolver;
use crate::services::status_deriver::StatusDeriver;

/// Raw create input. Absent and blank are treated alike.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAssetRequest {
    pub primary_code: Option<String>,
    pub alt_code: Option<String>,
    pub serial_number: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    /// `YYYY-MM-DD`
    pub import_date: Option<String>,
    /// Stored as given
    pub warranty_end: Option<String>,
}

/// Partial update. `None` leaves a field unchanged. For optional fields a
/// blank value clears them; for required fields it is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssetRequest {
    pub identifier: String,
    pub primary_code: Option<String>,
    pub alt_code: Option<String>,
    pub serial_number: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub import_date: Option<String>,
    pub warranty_end: Option<String>,
}

/// An asset as presented to readers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetView {
    pub asset: Asset,
    pub display_index: u32,
    pub warranty_label: WarrantyLabel,
}

/// What a delete removed. Attachment storage keys let the caller drop blobs.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedAsset {
    pub asset: Asset,
    pub attachments: Vec<Attachment>,
}

pub struct AssetService {
    asset_repo: Arc<dyn AssetRepository>,
    attachment_repo: Arc<dyn AttachmentRepository>,
    resolver: Arc<IdentifierResolver>,
    repairer: Arc<ConsistencyRepairer>,
    status: Arc<StatusDeriver>,
    event_bus: Arc<EventBus>,
    index_mode: IndexMode,
    repair_on_insert: bool,
}

impl AssetService {
    pub fn new(
        asset_repo: Arc<dyn AssetRepository>,
        attachment_repo: Arc<dyn AttachmentRepository>,
        resolver: Arc<IdentifierResolver>,
        repairer: Arc<ConsistencyRepairer>,
        status: Arc<StatusDeriver>,
        event_bus: Arc<EventBus>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            asset_repo,
            attachment_repo,
            resolver,
            repairer,
            status,
            event_bus,
            index_mode: config.index_mode,
            repair_on_insert: config.repair_on_insert,
        }
    }

    /// Creates an asset at the next display index.
    ///
    /// Required: `primary_code`, `name`, `brand`, `model`, `serial_number`,
    /// `location`, `status`. `primary_code` is mandatory here even though
    /// legacy records may carry none; imports of such records must assign
    /// one first. All missing names are reported together.
    pub fn create_asset(&self, request: CreateAssetRequest) -> AppResult<Asset> {
        let missing = missing_fields(&[
            ("primary_code", request.primary_code.as_deref()),
            ("name", request.name.as_deref()),
            ("brand", request.brand.as_deref()),
            ("model", request.model.as_deref()),
            ("serial_number", request.serial_number.as_deref()),
            ("location", request.location.as_deref()),
            ("status", request.status.as_deref()),
        ]);
        if !missing.is_empty() {
            return Err(DomainError::MissingRequiredField(missing).into());
        }

        let import_date = parse_date_field("import_date", request.import_date.as_deref())?;
        let mut draft = NewAsset::new(
            trimmed(request.primary_code),
            trimmed(request.serial_number),
            trimmed(request.name),
            trimmed(request.brand),
            trimmed(request.model),
            trimmed(request.location),
            trimmed(request.status),
        );
        draft.alt_code = non_blank(request.alt_code);
        draft.description = non_blank(request.description);
        draft.import_date = import_date;
        draft.warranty_end = non_blank(request.warranty_end);

        self.ensure_unique(IdentifierField::PrimaryCode, &draft.primary_code, None)?;
        self.ensure_unique(IdentifierField::SerialNumber, &draft.serial_number, None)?;

        let asset = self.asset_repo.insert(&draft)?;
        log::info!(
            "created asset {} ({}) at index {:?}",
            asset.creation_key,
            asset.primary_code,
            asset.display_index
        );

        self.event_bus.emit(AssetCreated::new(
            asset.creation_key,
            asset.display_index.unwrap_or_default(),
            asset.primary_code.clone(),
        ));

        if self.repair_on_insert {
            self.repair_indices();
        }

        Ok(asset)
    }

    /// Single-asset read. Never writes: in `IndexMode::Stored` a missing
    /// stored index falls back to the creation rank.
    pub fn get_asset(&self, identifier: &str) -> AppResult<AssetView> {
        let asset = self.resolver.resolve(identifier)?;

        let display_index = match (self.index_mode, asset.display_index) {
            (IndexMode::Stored, Some(stored)) => stored,
            _ => self.asset_repo.creation_rank(asset.creation_key)?,
        };
        let warranty_label = self.status.warranty_label(&asset);

        Ok(AssetView {
            asset,
            display_index,
            warranty_label,
        })
    }

    /// All assets in display order
    pub fn list_assets(&self) -> AppResult<Vec<AssetView>> {
        if self.index_mode == IndexMode::Stored {
            self.repair_indices();
        }

        let assets = self.asset_repo.list_ordered_by_creation()?;
        let mut views = Vec::with_capacity(assets.len());

        for (position, asset) in assets.into_iter().enumerate() {
            let rank = u32::try_from(position + 1)
                .map_err(|_| AppError::Other("asset count exceeds display index range".into()))?;
            let display_index = match self.index_mode {
                IndexMode::Derived => rank,
                IndexMode::Stored => asset.display_index.unwrap_or(rank),
            };
            let warranty_label = self.status.warranty_label(&asset);
            views.push(AssetView {
                asset,
                display_index,
                warranty_label,
            });
        }

        if self.index_mode == IndexMode::Stored {
            views.sort_by_key(|view| (view.display_index, view.asset.creation_key));
        }
        Ok(views)
    }

    pub fn update_asset(&self, request: UpdateAssetRequest) -> AppResult<Asset> {
        let mut asset = self.resolver.resolve(&request.identifier)?;

        let blank_required: Vec<String> = [
            ("primary_code", &request.primary_code),
            ("name", &request.name),
            ("brand", &request.brand),
            ("model", &request.model),
            ("serial_number", &request.serial_number),
            ("location", &request.location),
            ("status", &request.status),
        ]
        .iter()
        .filter(|(_, value)| value.as_deref().is_some_and(|v| v.trim().is_empty()))
        .map(|(name, _)| name.to_string())
        .collect();
        if !blank_required.is_empty() {
            return Err(DomainError::MissingRequiredField(blank_required).into());
        }

        let primary_code = request.primary_code.map(|v| v.trim().to_string());
        let serial_number = request.serial_number.map(|v| v.trim().to_string());
        if let Some(code) = &primary_code {
            self.ensure_unique(IdentifierField::PrimaryCode, code, Some(asset.creation_key))?;
        }
        if let Some(serial) = &serial_number {
            self.ensure_unique(IdentifierField::SerialNumber, serial, Some(asset.creation_key))?;
        }

        let import_date = match request.import_date.as_deref() {
            None => None,
            Some(raw) => Some(parse_date_field("import_date", Some(raw))?),
        };

        asset.update_fields(
            primary_code,
            request.alt_code.map(|v| non_blank(Some(v))),
            serial_number,
            request.name.map(|v| v.trim().to_string()),
            request.brand.map(|v| v.trim().to_string()),
            request.model.map(|v| v.trim().to_string()),
            request.description.map(|v| non_blank(Some(v))),
            request.location.map(|v| v.trim().to_string()),
            request.status.map(|v| v.trim().to_string()),
            import_date,
            request.warranty_end.map(|v| non_blank(Some(v))),
        );

        validate_asset(&asset)?;
        self.asset_repo.update_fields(&asset)?;

        self.event_bus.emit(AssetUpdated::new(asset.creation_key));
        Ok(asset)
    }

    /// Removes the asset with its history and attachments, then closes the
    /// gap in the stored display indices.
    pub fn delete_asset(&self, identifier: &str) -> AppResult<DeletedAsset> {
        let asset = self.resolver.resolve(identifier)?;
        let attachments = self.attachment_repo.list_for_asset(asset.creation_key)?;

        self.asset_repo.delete(asset.creation_key)?;
        log::info!("deleted asset {} ({})", asset.creation_key, asset.primary_code);

        self.event_bus.emit(AssetDeleted::new(
            asset.creation_key,
            asset.primary_code.clone(),
            attachments.iter().map(|a| a.storage_key.clone()).collect(),
        ));

        self.repair_indices();

        Ok(DeletedAsset { asset, attachments })
    }

    /// Runs a repair pass and announces it when rows moved
    pub fn repair_indices(&self) -> RepairReport {
        let report = self.repairer.repair();
        if report.reassigned > 0 {
            self.event_bus.emit(AssetsReindexed::new(
                report.checked,
                report.reassigned,
                report.failed,
            ));
        }
        report
    }

    /// Rejects `value` when another asset (not `own_key`) already holds it
    fn ensure_unique(&self, field: IdentifierField, value: &str, own_key: Option<i64>) -> AppResult<()> {
        match self.asset_repo.find_by_field(field, value)? {
            Some(existing) if Some(existing.creation_key) != own_key => {
                Err(AppError::DuplicateIdentifier {
                    field,
                    value: value.to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Required fields are checked before this is called
fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}
