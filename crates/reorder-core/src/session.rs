use crate::VisibleItemInfo;

/// Projected bounds of the dragged row, `start..end` along the list axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectedBounds {
    pub start: f32,
    pub end: f32,
}

/// Rows a windowing engine has to keep materialized for a drag update, even when they
/// lie outside the viewport: the dragged row's current slot, and every row touching
/// the span the dragged row is projected to cover.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinnedRows {
    pub index: usize,
    pub bounds: ProjectedBounds,
}

/// Geometry of an in-progress drag.
///
/// The dragged index and the drag-start snapshot are stored together so that one
/// can never be set without the other.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragSession {
    active: Option<ActiveDrag>,
    cumulative_delta: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveDrag {
    dragged_index: usize,
    initial_item: VisibleItemInfo,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a drag from `item`. Any previous geometry is discarded.
    pub fn start(&mut self, item: VisibleItemInfo) {
        self.active = Some(ActiveDrag {
            dragged_index: item.index,
            initial_item: item,
        });
        self.cumulative_delta = 0.0;
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.cumulative_delta = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn dragged_index(&self) -> Option<usize> {
        self.active.map(|drag| drag.dragged_index)
    }

    /// The row layout captured at drag start. Never updated by swaps.
    pub fn initial_item(&self) -> Option<VisibleItemInfo> {
        self.active.map(|drag| drag.initial_item)
    }

    pub fn cumulative_delta(&self) -> f32 {
        self.cumulative_delta
    }

    /// Add a gesture displacement. Ignored when no drag is active.
    pub fn accumulate(&mut self, delta: f32) {
        if self.active.is_some() {
            self.cumulative_delta += delta;
        }
    }

    /// Point the session at the row's new logical slot after a swap.
    pub(crate) fn set_dragged_index(&mut self, index: usize) {
        if let Some(drag) = self.active.as_mut() {
            drag.dragged_index = index;
        }
    }

    pub fn projected_bounds(&self) -> Option<ProjectedBounds> {
        self.active.map(|drag| ProjectedBounds {
            start: drag.initial_item.offset + self.cumulative_delta,
            end: drag.initial_item.offset_end() + self.cumulative_delta,
        })
    }

    /// What must stay materialized once `pending_delta` has been accumulated.
    pub fn pinned_rows(&self, pending_delta: f32) -> Option<PinnedRows> {
        let index = self.dragged_index()?;
        let bounds = self.projected_bounds()?;
        Some(PinnedRows {
            index,
            bounds: ProjectedBounds {
                start: bounds.start + pending_delta,
                end: bounds.end + pending_delta,
            },
        })
    }

    /// Translation to apply to the dragged row so it keeps following the pointer.
    ///
    /// `current_offset` is the dragged index's materialized offset, or `None` when
    /// that slot is currently off-window (treated as 0).
    pub fn presentation_offset(&self, current_offset: Option<f32>) -> f32 {
        let initial_offset = self.initial_item().map_or(0.0, |item| item.offset);
        initial_offset + self.cumulative_delta - current_offset.unwrap_or(0.0)
    }
}
