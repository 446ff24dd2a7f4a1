// src/services/status_deriver.rs
//
// Binds the pure status rules to a calendar. "Today" is the local date of
// the machine running the engine unless a fixed clock is injected.

use chrono::{Local, NaiveDate};
use std::sync::Arc;

use crate::domain::{calibration_status_change, warranty_label, Asset, HistoryDetails, HistoryEntry, WarrantyLabel};

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always answers the same date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

pub struct StatusDeriver {
    clock: Arc<dyn Clock>,
}

impl StatusDeriver {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn warranty_label(&self, asset: &Asset) -> WarrantyLabel {
        warranty_label(asset, self.today())
    }

    /// Status to persist alongside `incoming`, if any
    pub fn calibration_status(
        &self,
        existing: &[HistoryEntry],
        incoming: &HistoryDetails,
    ) -> Option<&'static str> {
        calibration_status_change(existing, incoming, self.today())
    }
}

impl Default for StatusDeriver {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
