use crate::{PinnedRows, VisibleItemInfo};

const MIN_ITEM_SIZE: f32 = 1.0;

/// Cached row origins for a vertical list of variable-height rows.
///
/// Hosts without their own windowing engine can use this to answer
/// [`crate::ViewportModel`] queries.
#[derive(Clone, Debug, PartialEq)]
pub struct ListLayout {
    sizes: Vec<f32>,
    // `origins[ix]` is the top of row `ix`; the last entry is the content height.
    origins: Vec<f32>,
}

impl Default for ListLayout {
    fn default() -> Self {
        Self {
            sizes: Vec::new(),
            origins: vec![0.0],
        }
    }
}

impl ListLayout {
    pub fn new(sizes: impl IntoIterator<Item = f32>) -> Self {
        let mut layout = Self::default();
        layout.rebuild(sizes);
        layout
    }

    pub fn rebuild(&mut self, sizes: impl IntoIterator<Item = f32>) {
        self.sizes.clear();
        self.origins.clear();
        self.origins.push(0.0);

        for size in sizes {
            let size = sanitize_item_size(size);
            self.sizes.push(size);
            let last = self.origins.last().copied().unwrap_or(0.0);
            self.origins.push(last + size);
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn item_size(&self, ix: usize) -> Option<f32> {
        self.sizes.get(ix).copied()
    }

    pub fn item_origin(&self, ix: usize) -> Option<f32> {
        if ix < self.sizes.len() {
            self.origins.get(ix).copied()
        } else {
            None
        }
    }

    pub fn content_height(&self) -> f32 {
        self.origins.last().copied().unwrap_or(0.0)
    }

    /// Largest scroll top that still fills the viewport.
    pub fn max_scroll_top(&self, viewport_height: f32) -> f32 {
        (self.content_height() - viewport_height).max(0.0)
    }

    pub fn clamp_scroll_top(&self, scroll_top: f32, viewport_height: f32) -> f32 {
        if !scroll_top.is_finite() {
            return 0.0;
        }
        scroll_top.clamp(0.0, self.max_scroll_top(viewport_height))
    }

    /// Index of the row containing content position `y`, or `len()` when `y` is past
    /// the last row.
    pub fn index_at(&self, y: f32) -> usize {
        let item_count = self.sizes.len();
        if item_count == 0 || !y.is_finite() {
            return 0;
        }

        let y = y.max(0.0);
        if y >= self.content_height() {
            return item_count;
        }

        // Origins are strictly increasing since sizes are clamped to at least 1px.
        self.origins[1..].partition_point(|end| *end <= y)
    }

    /// Rows intersecting a viewport of `viewport_height` scrolled to `scroll_top`.
    ///
    /// Offsets are relative to the viewport's top edge, so rows above it have negative
    /// offsets.
    pub fn visible_items(&self, scroll_top: f32, viewport_height: f32) -> Vec<VisibleItemInfo> {
        if viewport_height <= 0.0 {
            return Vec::new();
        }

        let first = self.index_at(scroll_top);
        let mut items = Vec::new();
        for ix in first..self.sizes.len() {
            let offset = self.origins[ix] - scroll_top;
            if offset >= viewport_height {
                break;
            }
            items.push(VisibleItemInfo::new(ix, offset, self.sizes[ix]));
        }
        items
    }

    /// [`ListLayout::visible_items`] plus the rows a drag keeps materialized outside the
    /// viewport, ordered by index.
    pub fn materialized_items(
        &self,
        scroll_top: f32,
        viewport_height: f32,
        pinned: Option<PinnedRows>,
    ) -> Vec<VisibleItemInfo> {
        let mut items = self.visible_items(scroll_top, viewport_height);
        let Some(pinned) = pinned else {
            return items;
        };

        let mut extra = Vec::new();
        if pinned.index < self.sizes.len() {
            extra.push(pinned.index);
        }

        // Rows touching `start..=end` in content space; a row ending exactly at `start`
        // still counts as overlapping.
        let start = scroll_top + pinned.bounds.start;
        let end = scroll_top + pinned.bounds.end;
        if start.is_finite() && end.is_finite() {
            let first = self.index_at(start).saturating_sub(1);
            for ix in first..self.sizes.len() {
                if self.origins[ix] > end {
                    break;
                }
                if self.origins[ix + 1] >= start {
                    extra.push(ix);
                }
            }
        }

        for ix in extra {
            if items.iter().all(|item| item.index != ix) {
                items.push(VisibleItemInfo::new(
                    ix,
                    self.origins[ix] - scroll_top,
                    self.sizes[ix],
                ));
            }
        }
        items.sort_by_key(|item| item.index);
        items
    }
}

fn sanitize_item_size(size: f32) -> f32 {
    if !size.is_finite() || size <= 0.0 {
        MIN_ITEM_SIZE
    } else {
        size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProjectedBounds;

    #[test]
    fn origins_are_prefix_sums_of_clamped_sizes() {
        let layout = ListLayout::new([10.0, 0.0, f32::NAN, 30.0]);
        assert_eq!(layout.len(), 4);
        assert_eq!(layout.item_size(1), Some(1.0));
        assert_eq!(layout.item_size(2), Some(1.0));
        assert_eq!(layout.item_origin(3), Some(12.0));
        assert_eq!(layout.item_origin(4), None);
        assert_eq!(layout.content_height(), 42.0);
    }

    #[test]
    fn index_at_finds_the_containing_row() {
        let layout = ListLayout::new([10.0, 20.0, 30.0]);
        assert_eq!(layout.index_at(-5.0), 0);
        assert_eq!(layout.index_at(0.0), 0);
        assert_eq!(layout.index_at(9.9), 0);
        assert_eq!(layout.index_at(10.0), 1);
        assert_eq!(layout.index_at(59.0), 2);
        assert_eq!(layout.index_at(60.0), 3);
        assert_eq!(ListLayout::default().index_at(10.0), 0);
    }

    #[test]
    fn visible_items_are_viewport_relative() {
        let layout = ListLayout::new([50.0; 10]);
        let items = layout.visible_items(75.0, 100.0);
        assert_eq!(
            items,
            vec![
                VisibleItemInfo::new(1, -25.0, 50.0),
                VisibleItemInfo::new(2, 25.0, 50.0),
                VisibleItemInfo::new(3, 75.0, 50.0),
            ]
        );
    }

    #[test]
    fn visible_items_stop_at_the_content_end() {
        let layout = ListLayout::new([50.0; 3]);
        let items = layout.visible_items(0.0, 400.0);
        assert_eq!(items.len(), 3);
        assert!(layout.visible_items(0.0, 0.0).is_empty());
    }

    #[test]
    fn materialized_items_keep_the_pinned_slot_and_projected_rows() {
        let layout = ListLayout::new([50.0; 20]);
        let pinned = PinnedRows {
            index: 1,
            bounds: ProjectedBounds {
                start: 150.0,
                end: 200.0,
            },
        };

        // The viewport shows rows 2 and 3; row 1 is pinned above it and rows 4..=6
        // touch content 250..=300 below it.
        let items = layout.materialized_items(100.0, 100.0, Some(pinned));
        let indices: Vec<usize> = items.iter().map(|item| item.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(items[0], VisibleItemInfo::new(1, -50.0, 50.0));
        assert_eq!(items[5], VisibleItemInfo::new(6, 200.0, 50.0));

        assert_eq!(
            layout.materialized_items(100.0, 100.0, None),
            layout.visible_items(100.0, 100.0)
        );
    }

    #[test]
    fn materialized_items_ignore_rows_past_the_content() {
        let layout = ListLayout::new([50.0; 3]);
        let pinned = PinnedRows {
            index: 7,
            bounds: ProjectedBounds {
                start: 400.0,
                end: 450.0,
            },
        };
        let items = layout.materialized_items(0.0, 100.0, Some(pinned));
        let indices: Vec<usize> = items.iter().map(|item| item.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn scroll_top_is_clamped_to_content() {
        let layout = ListLayout::new([50.0; 4]);
        assert_eq!(layout.max_scroll_top(120.0), 80.0);
        assert_eq!(layout.clamp_scroll_top(500.0, 120.0), 80.0);
        assert_eq!(layout.clamp_scroll_top(-3.0, 120.0), 0.0);
        assert_eq!(layout.max_scroll_top(400.0), 0.0);
    }
}
