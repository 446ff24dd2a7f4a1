// src/application/state.rs

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::db::{self, ConnectionPool};
use crate::error::AppResult;
use crate::events::EventBus;
use crate::repositories::{
    AssetRepository, AttachmentRepository, HistoryRepository, SqliteAssetRepository,
    SqliteAttachmentRepository, SqliteHistoryRepository,
};
use crate::services::{
    AssetService, AttachmentService, Clock, ConsistencyRepairer, ExportService, HistorySequencer,
    HistoryService, IdentifierResolver, IndexAllocator, StatusDeriver, SystemClock,
};

/// Fully wired engine.
/// All fields are Arc-wrapped so hosts can share them across threads.
pub struct AppState {
    pub config: EngineConfig,
    pub pool: Arc<ConnectionPool>,
    pub event_bus: Arc<EventBus>,

    pub resolver: Arc<IdentifierResolver>,
    pub index_allocator: Arc<IndexAllocator>,
    pub repairer: Arc<ConsistencyRepairer>,
    pub sequencer: Arc<HistorySequencer>,
    pub status: Arc<StatusDeriver>,

    pub asset_service: Arc<AssetService>,
    pub history_service: Arc<HistoryService>,
    pub attachment_service: Arc<AttachmentService>,
    pub export_service: Arc<ExportService>,
}

impl AppState {
    /// Opens (or creates) the database, applies the schema, checks integrity
    /// and wires every service with the system clock.
    pub fn initialize(config: EngineConfig) -> AppResult<Self> {
        let pool = db::create_connection_pool(&config)?;
        {
            let conn = db::get_connection(&pool)?;
            db::initialize_database(&conn)?;
            db::verify_database_integrity(&conn)?;
        }

        Ok(Self::with_pool(Arc::new(pool), config, Arc::new(SystemClock)))
    }

    /// Wires services over an already-initialized pool
    pub fn with_pool(pool: Arc<ConnectionPool>, config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let event_bus = Arc::new(EventBus::with_log_capacity(config.event_log_capacity));

        let asset_repo: Arc<dyn AssetRepository> =
            Arc::new(SqliteAssetRepository::new(Arc::clone(&pool)));
        let history_repo: Arc<dyn HistoryRepository> =
            Arc::new(SqliteHistoryRepository::new(Arc::clone(&pool)));
        let attachment_repo: Arc<dyn AttachmentRepository> =
            Arc::new(SqliteAttachmentRepository::new(Arc::clone(&pool)));

        let resolver = Arc::new(IdentifierResolver::new(Arc::clone(&asset_repo)));
        let index_allocator = Arc::new(IndexAllocator::new(Arc::clone(&asset_repo)));
        let repairer = Arc::new(ConsistencyRepairer::new(Arc::clone(&asset_repo)));
        let sequencer = Arc::new(HistorySequencer::new(Arc::clone(&history_repo)));
        let status = Arc::new(StatusDeriver::new(clock));

        let asset_service = Arc::new(AssetService::new(
            Arc::clone(&asset_repo),
            Arc::clone(&attachment_repo),
            Arc::clone(&resolver),
            Arc::clone(&repairer),
            Arc::clone(&status),
            Arc::clone(&event_bus),
            &config,
        ));
        let history_service = Arc::new(HistoryService::new(
            Arc::clone(&history_repo),
            Arc::clone(&resolver),
            Arc::clone(&sequencer),
            Arc::clone(&status),
            Arc::clone(&event_bus),
        ));
        let attachment_service = Arc::new(AttachmentService::new(
            attachment_repo,
            Arc::clone(&resolver),
            Arc::clone(&event_bus),
        ));
        let export_service = Arc::new(ExportService::new(Arc::clone(&asset_service), history_repo));

        Self {
            config,
            pool,
            event_bus,
            resolver,
            index_allocator,
            repairer,
            sequencer,
            status,
            asset_service,
            history_service,
            attachment_service,
            export_service,
        }
    }

    /// Runs SQLite's integrity check; hosts use it as a health probe
    pub fn health_check(&self) -> AppResult<()> {
        let conn = db::get_connection(&self.pool)?;
        db::verify_database_integrity(&conn)
    }

    pub fn database_stats(&self) -> AppResult<db::DatabaseStats> {
        let conn = db::get_connection(&self.pool)?;
        db::get_database_stats(&conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            database_path: Some(dir.path().join("ledger.db")),
            pool_max_size: 2,
            ..EngineConfig::default()
        };

        let state = AppState::initialize(config).unwrap();

        state.health_check().unwrap();
        assert_eq!(state.database_stats().unwrap().asset_count, 0);
        assert_eq!(state.index_allocator.next_index(), 1);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig {
            database_path: Some(dir.path().join("ledger.db")),
            pool_max_size: 2,
            ..EngineConfig::default()
        };

        {
            let state = AppState::initialize(config.clone()).unwrap();
            state
                .asset_service
                .create_asset(crate::services::test_support::create_request("TS-1", "SN-1"))
                .unwrap();
        }

        let state = AppState::initialize(config).unwrap();
        assert_eq!(state.database_stats().unwrap().asset_count, 1);
        assert_eq!(state.index_allocator.next_index(), 2);
    }

    #[test]
    fn test_event_log_is_bounded_by_config() {
        let engine = crate::services::test_support::engine_with(EngineConfig {
            event_log_capacity: 2,
            ..EngineConfig::default()
        });

        for n in 1..=4 {
            engine
                .asset_service
                .create_asset(crate::services::test_support::create_request(
                    &format!("TS-{}", n),
                    &format!("SN-{}", n),
                ))
                .unwrap();
        }

        assert_eq!(engine.event_bus.log_capacity(), 2);
        assert_eq!(engine.event_bus.get_event_log().len(), 2);
    }
}
