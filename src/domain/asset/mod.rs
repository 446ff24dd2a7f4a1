pub mod entity;
pub mod invariants;
pub mod ordering;

pub use entity::{Asset, NewAsset};
pub use invariants::validate_asset;
pub use ordering::{needs_reindex, next_display_index};
