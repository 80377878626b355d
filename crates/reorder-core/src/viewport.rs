use std::ops::Range;

/// Layout of a single materialized row, as reported by the windowing engine.
///
/// `offset` and `size` are measured along the list axis, in the same coordinate
/// space as [`ViewportModel::visible_range`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleItemInfo {
    pub index: usize,
    pub offset: f32,
    pub size: f32,
}

impl VisibleItemInfo {
    pub fn new(index: usize, offset: f32, size: f32) -> Self {
        Self {
            index,
            offset,
            size,
        }
    }

    pub fn offset_end(&self) -> f32 {
        self.offset + self.size
    }
}

/// Handle to an in-flight scroll started by [`ViewportModel::scroll_by`].
pub trait ScrollTask {
    /// `true` until the scroll has been fully applied, failed or was cancelled.
    fn is_active(&self) -> bool;

    fn cancel(self);
}

impl<T> ScrollTask for async_task::Task<T> {
    fn is_active(&self) -> bool {
        !self.is_finished()
    }

    fn cancel(self) {
        // Dropping an `async_task::Task` cancels it.
        drop(self);
    }
}

/// The windowing engine, seen from the drag core.
///
/// Implementations are read fresh on every lifecycle call; nothing returned here is
/// cached across calls.
pub trait ViewportModel {
    type Scroll: ScrollTask;

    /// Currently materialized rows, ordered top to bottom.
    fn visible_items(&self) -> Vec<VisibleItemInfo>;

    /// The visible pixel window, `start..end`.
    fn visible_range(&self) -> Range<f32>;

    /// Start scrolling by `amount` pixels (positive = toward the list end).
    ///
    /// Must not block. Clamping at the list extremities is up to the implementation.
    fn scroll_by(&mut self, amount: f32) -> Self::Scroll;

    fn find_visible_item(&self, index: usize) -> Option<VisibleItemInfo> {
        self.visible_items()
            .into_iter()
            .find(|item| item.index == index)
    }
}
