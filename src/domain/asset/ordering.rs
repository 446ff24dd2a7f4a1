// Display index rules.
//
// creation order is the ground truth; the stored index is a cache of the
// 1-based rank of each asset in that order.

/// Next index for an insert: `max + 1`, or 1 when the collection is empty
/// or the stored maximum is missing/corrupt.
pub fn next_display_index(current_max: Option<i64>) -> u32 {
    match current_max {
        Some(max) if max >= 1 => u32::try_from(max)
            .ok()
            .and_then(|m| m.checked_add(1))
            .unwrap_or(1),
        _ => 1,
    }
}

/// True unless `slots` (taken in creation order) is exactly `1, 2, ..., N`.
pub fn needs_reindex(slots: &[Option<u32>]) -> bool {
    slots
        .iter()
        .enumerate()
        .any(|(position, slot)| *slot != Some(position as u32 + 1))
}
