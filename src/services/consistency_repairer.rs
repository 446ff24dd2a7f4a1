// src/services/consistency_repairer.rs
//
// Restores the display-index invariant: stored indices, read in creation
// order, must be exactly 1..N.
//
// Every write is derived from creation order alone, so passes are idempotent
// and concurrent passes converge on the same result.

use serde::Serialize;
use std::sync::Arc;

use crate::domain::asset::needs_reindex;
use crate::repositories::{AssetRepository, IndexSlot};

/// Outcome of one repair pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairReport {
    /// Rows inspected
    pub checked: usize,
    /// Rows whose stored index was rewritten
    pub reassigned: usize,
    /// Row writes that failed and were skipped
    pub failed: usize,
    pub needed_repair: bool,
}

pub struct ConsistencyRepairer {
    asset_repo: Arc<dyn AssetRepository>,
}

impl ConsistencyRepairer {
    pub fn new(asset_repo: Arc<dyn AssetRepository>) -> Self {
        Self { asset_repo }
    }

    /// Runs one pass. Never returns an error: fetch failures end the pass,
    /// row failures are skipped, both are logged.
    pub fn repair(&self) -> RepairReport {
        let slots = match self.fetch_slots() {
            Some(slots) => slots,
            None => return RepairReport::default(),
        };

        let mut report = RepairReport {
            checked: slots.len(),
            ..RepairReport::default()
        };

        let stored: Vec<Option<u32>> = slots.iter().map(|s| s.display_index).collect();
        if !needs_reindex(&stored) {
            return report;
        }
        report.needed_repair = true;

        // Re-read so that rows inserted since the check are ranked too
        let Some(slots) = self.fetch_slots() else {
            return report;
        };
        report.checked = slots.len();

        for (position, slot) in slots.iter().enumerate() {
            let Ok(expected) = u32::try_from(position + 1) else {
                log::error!("asset collection exceeds the display index range");
                break;
            };
            if slot.display_index == Some(expected) {
                continue;
            }

            match self.asset_repo.update_display_index(slot.creation_key, expected) {
                Ok(()) => report.reassigned += 1,
                Err(e) => {
                    report.failed += 1;
                    log::warn!(
                        "skipping display index repair for asset {} ({:?} -> {}): {}",
                        slot.creation_key,
                        slot.display_index,
                        expected,
                        e
                    );
                }
            }
        }

        log::debug!(
            "repair pass: checked={} reassigned={} failed={}",
            report.checked,
            report.reassigned,
            report.failed
        );
        report
    }

    fn fetch_slots(&self) -> Option<Vec<IndexSlot>> {
        match self.asset_repo.list_index_slots() {
            Ok(slots) => Some(slots),
            Err(e) => {
                log::error!("repair pass aborted, could not read display indices: {}", e);
                None
            }
        }
    }
}
