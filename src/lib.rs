// src/lib.rs
// AssetLedger - equipment inventory with ordered, gapless positions
//
// Architecture:
// - Domain-centric: ordering, sequencing and status rules live in `domain`
// - Repositories are dumb SQLite mappers over an r2d2 pool
// - Services compose the engine components and emit events after commits
// - Application layer wires everything into one `AppState`

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    warranty_label,
    Asset,
    Attachment,
    DomainError,
    HistoryCategory,
    HistoryDetails,
    HistoryEntry,
    IdentifierField,
    WarrantyLabel,
    CALIBRATION_STATUS,
};

// ============================================================================
// PUBLIC API - Errors & Config
// ============================================================================

pub use config::{EngineConfig, IndexMode};
pub use error::{AppError, AppResult, ErrorKind};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    AssetCreated,
    AssetDeleted,
    AssetFlaggedForCalibration,
    AssetUpdated,
    AssetsReindexed,
    AttachmentAdded,
    DomainEvent,
    EventBus,
    EventLogEntry,
    HistoryRecorded,
};

// ============================================================================
// PUBLIC API - Database & Repositories
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

pub use repositories::{
    AssetRepository,
    AttachmentRepository,
    HistoryRepository,
    SqliteAssetRepository,
    SqliteAttachmentRepository,
    SqliteHistoryRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    AssetService,
    AssetView,
    AttachmentService,
    Clock,
    ConsistencyRepairer,
    CreateAssetRequest,
    DeletedAsset,
    ExportService,
    ExportSnapshot,
    FixedClock,
    HistorySequencer,
    HistoryService,
    IdentifierResolver,
    IndexAllocator,
    RecordHistoryRequest,
    RepairReport,
    StatusDeriver,
    SystemClock,
    UpdateAssetRequest,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, ErrorResponse};
pub use application::dto;
