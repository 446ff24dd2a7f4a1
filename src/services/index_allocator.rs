// src/services/index_allocator.rs
//
// Proposes the display index for the next insert. The asset insert applies
// the same rule inside its own transaction; this entry point serves callers
// that need the value ahead of time (previews, imports).

use std::sync::Arc;

use crate::domain::next_display_index;
use crate::repositories::AssetRepository;

pub struct IndexAllocator {
    asset_repo: Arc<dyn AssetRepository>,
}

impl IndexAllocator {
    pub fn new(asset_repo: Arc<dyn AssetRepository>) -> Self {
        Self { asset_repo }
    }

    /// `max + 1`, or 1 for an empty collection. Never fails: a store error
    /// is logged and answered with 1, and the repairer closes any gap later.
    pub fn next_index(&self) -> u32 {
        match self.asset_repo.max_display_index() {
            Ok(max) => next_display_index(max),
            Err(e) => {
                log::warn!("could not read max display index, falling back to 1: {}", e);
                1
            }
        }
    }
}
