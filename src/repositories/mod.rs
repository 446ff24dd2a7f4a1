// src/repositories/mod.rs
//
// Repository layer
//
// RULES:
// - Repositories are DUMB data mappers
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only
// - The only logic allowed is what must share a transaction with its insert
//   (display index, history sequence, a caller-supplied status rule)

mod sql;

pub mod asset_repository;
pub mod attachment_repository;
pub mod history_repository;

pub use asset_repository::{AssetRepository, IndexSlot, SqliteAssetRepository};
pub use attachment_repository::{AttachmentRepository, SqliteAttachmentRepository};
pub use history_repository::{
    HistoryRepository, RecordedHistory, SqliteHistoryRepository, StatusRule,
};

#[cfg(test)]
pub use asset_repository::MockAssetRepository;
