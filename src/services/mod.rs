// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Engine components (resolver, allocator, repairer, sequencer, status) are
// small and stateless; the lifecycle services compose them.

pub mod asset_service;
pub mod attachment_service;
pub mod consistency_repairer;
pub mod export_service;
pub mod history_sequencer;
pub mod history_service;
pub mod identifier_resolver;
pub mod index_allocator;
pub mod status_deriver;

#[cfg(test)]
pub(crate) mod test_support;


pub use identifier_resolver::IdentifierResolver;
pub use index_allocator::IndexAllocator;
pub use consistency_repairer::{ConsistencyRepairer, RepairReport};
pub use history_sequencer::HistorySequencer;
pub use status_deriver::{Clock, FixedClock, StatusDeriver, SystemClock};

pub use asset_service::{
    AssetService,
    AssetView,
    CreateAssetRequest,
    DeletedAsset,
    UpdateAssetRequest,
};

pub use history_service::{HistoryService, RecordHistoryRequest};

pub use attachment_service::AttachmentService;

pub use export_service::{AssetExportRow, ExportService, ExportSnapshot, HistoryExportRow};
