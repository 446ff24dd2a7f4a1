// src/services/identifier_resolver.rs
//
// Maps a user-supplied identifier to exactly one asset.
// All identifier fields are matched at once; the earliest created asset wins.

use std::sync::Arc;

use crate::domain::{normalize_identifier, Asset};
use crate::error::{AppError, AppResult};
use crate::repositories::AssetRepository;

pub struct IdentifierResolver {
    asset_repo: Arc<dyn AssetRepository>,
}

impl IdentifierResolver {
    pub fn new(asset_repo: Arc<dyn AssetRepository>) -> Self {
        Self { asset_repo }
    }

    /// Resolves against primary code, alternate code and serial number,
    /// case-insensitively. When several assets match through any of those
    /// fields, the one created first wins. No match is `NotFound`.
    pub fn resolve(&self, identifier: &str) -> AppResult<Asset> {
        self.resolve_optional(identifier)?
            .ok_or_else(|| AppError::not_found(format!("asset '{}'", identifier.trim())))
    }

    /// Same lookup, with "no match" as `Ok(None)`. Blank input never matches.
    pub fn resolve_optional(&self, identifier: &str) -> AppResult<Option<Asset>> {
        let Some(value) = normalize_identifier(identifier) else {
            return Ok(None);
        };

        let asset = self.asset_repo.find_by_identifier(value)?;
        if let Some(asset) = &asset {
            log::debug!("resolved '{}' to asset {}", value, asset.creation_key);
        }
        Ok(asset)
    }
}
