// src/config.rs
//
// Engine configuration
//
// Defaults suit a single-site deployment; every knob can be overridden
// from the environment by the host process.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{AppError, AppResult};
use crate::events::DEFAULT_EVENT_LOG_CAPACITY;

pub const ENV_DB_PATH: &str = "ASSET_LEDGER_DB_PATH";
pub const ENV_POOL_SIZE: &str = "ASSET_LEDGER_POOL_SIZE";
pub const ENV_BUSY_TIMEOUT_MS: &str = "ASSET_LEDGER_BUSY_TIMEOUT_MS";
pub const ENV_INDEX_MODE: &str = "ASSET_LEDGER_INDEX_MODE";
pub const ENV_REPAIR_ON_INSERT: &str = "ASSET_LEDGER_REPAIR_ON_INSERT";
pub const ENV_EVENT_LOG_CAPACITY: &str = "ASSET_LEDGER_EVENT_LOG_CAPACITY";

/// Where listings take the display index from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// Rank by creation key, computed on every read
    Derived,
    /// Stored column, repaired before each listing
    Stored,
}

impl FromStr for IndexMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "derived" => Ok(IndexMode::Derived),
            "stored" => Ok(IndexMode::Stored),
            other => Err(AppError::Config(format!(
                "Unknown index mode '{}' (expected 'derived' or 'stored')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Database file; `None` means the per-user data directory
    pub database_path: Option<PathBuf>,
    pub pool_max_size: u32,
    pub busy_timeout_ms: u32,
    pub index_mode: IndexMode,
    /// Run a repair pass right after every asset insert
    pub repair_on_insert: bool,
    /// Recent emissions the event bus keeps in memory; 0 keeps none
    pub event_log_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            pool_max_size: 15,
            busy_timeout_ms: 5000,
            index_mode: IndexMode::Derived,
            repair_on_insert: false,
            event_log_capacity: DEFAULT_EVENT_LOG_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `ASSET_LEDGER_*` variables that are set.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(ENV_POOL_SIZE) {
            config.pool_max_size = parse_number(ENV_POOL_SIZE, &raw)?;
            if config.pool_max_size == 0 {
                return Err(AppError::Config(format!("{} must be at least 1", ENV_POOL_SIZE)));
            }
        }
        if let Some(raw) = lookup(ENV_BUSY_TIMEOUT_MS) {
            config.busy_timeout_ms = parse_number(ENV_BUSY_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_INDEX_MODE) {
            config.index_mode = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_REPAIR_ON_INSERT) {
            config.repair_on_insert = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(AppError::Config(format!(
                        "{} must be true or false, got '{}'",
                        ENV_REPAIR_ON_INSERT, other
                    )))
                }
            };
        }

        if let Some(raw) = lookup(ENV_EVENT_LOG_CAPACITY) {
            config.event_log_capacity = parse_number(ENV_EVENT_LOG_CAPACITY, &raw)?;
        }

        Ok(config)
    }
}

fn parse_number<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| AppError::Config(format!("{} must be a number: {}", key, e)))
}
