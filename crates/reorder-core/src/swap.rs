use crate::{ProjectedBounds, VisibleItemInfo};

/// Find the visible row the dragged row should trade places with, if any.
///
/// Only rows overlapping `bounds` are considered. The direction of travel is measured
/// from `current_item`, the row currently occupying the dragged index's slot: when
/// moving down, a neighbor qualifies once the dragged bottom is past its bottom;
/// otherwise once the dragged top is past its top. Partial overlap never qualifies,
/// which keeps two adjacent rows from flickering back and forth.
///
/// Returns the first qualifying row in `visible_items` order.
pub fn find_swap_target(
    bounds: ProjectedBounds,
    dragged_index: usize,
    current_item: &VisibleItemInfo,
    visible_items: &[VisibleItemInfo],
) -> Option<VisibleItemInfo> {
    let delta = bounds.start - current_item.offset;

    visible_items
        .iter()
        .filter(|item| {
            item.index != dragged_index
                && item.offset_end() >= bounds.start
                && item.offset <= bounds.end
        })
        .find(|item| {
            if delta > 0.0 {
                bounds.end > item.offset_end()
            } else {
                bounds.start < item.offset
            }
        })
        .copied()
}
