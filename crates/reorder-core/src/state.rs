use crate::{
    AutoScroller, DragSession, PinnedRows, ReorderPublisher, ScrollTask, ViewportModel,
    VisibleItemInfo, find_swap_target, scroll_amount,
};

/// Drag-to-reorder state machine for a windowed vertical list.
///
/// The host forwards its gesture stream through [`DragDropState::on_drag_start`],
/// [`DragDropState::on_drag`] and [`DragDropState::on_drag_end`] /
/// [`DragDropState::on_drag_cancel`], passing its current viewport each time. Confirmed
/// swaps are reported through the publisher supplied at construction. Calls that make
/// no sense in the current state (no drag active, row not materialized) are ignored.
pub struct DragDropState<P, S> {
    publisher: P,
    session: DragSession,
    autoscroller: AutoScroller<S>,
    autoscroll: bool,
}

impl<P, S> DragDropState<P, S>
where
    P: ReorderPublisher,
    S: ScrollTask,
{
    pub fn new(publisher: P) -> Self {
        Self {
            publisher,
            session: DragSession::new(),
            autoscroller: AutoScroller::new(),
            autoscroll: true,
        }
    }

    /// Enable or disable edge autoscroll (enabled by default).
    pub fn autoscroll(mut self, enabled: bool) -> Self {
        self.autoscroll = enabled;
        self
    }

    pub fn set_autoscroll(&mut self, enabled: bool) {
        self.autoscroll = enabled;
        if !enabled {
            self.autoscroller.cancel();
        }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    pub fn session(&self) -> &DragSession {
        &self.session
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_active()
    }

    pub fn dragged_index(&self) -> Option<usize> {
        self.session.dragged_index()
    }

    /// Layout of the dragged row as captured at drag start.
    ///
    /// Hosts use it to keep that row materialized while it is scrolled out of view.
    pub fn initial_item(&self) -> Option<VisibleItemInfo> {
        self.session.initial_item()
    }

    pub fn cumulative_delta(&self) -> f32 {
        self.session.cumulative_delta()
    }

    /// Rows the viewport passed to the next [`DragDropState::on_drag`] with `delta` must
    /// report even when they are outside the visible range.
    ///
    /// Without them a row held more than one row height past an edge overlaps nothing
    /// while the list autoscrolls, and its own slot eventually scrolls out.
    pub fn pinned_rows(&self, delta: f32) -> Option<PinnedRows> {
        self.session.pinned_rows(delta)
    }

    pub fn is_autoscrolling(&self) -> bool {
        self.autoscroller.is_scrolling()
    }

    /// Raw translation for the dragged row (0 when no drag is active).
    pub fn dragged_item_offset<V: ViewportModel>(&self, viewport: &V) -> f32 {
        if !self.session.is_active() {
            return 0.0;
        }
        let current_offset = self
            .session
            .dragged_index()
            .and_then(|ix| viewport.find_visible_item(ix))
            .map(|item| item.offset);
        self.session.presentation_offset(current_offset)
    }

    /// Translation to apply to row `index`, or `None` unless it is the dragged row.
    pub fn presentation_offset<V: ViewportModel>(
        &self,
        index: usize,
        viewport: &V,
    ) -> Option<f32> {
        (self.session.dragged_index() == Some(index)).then(|| self.dragged_item_offset(viewport))
    }

    pub fn on_drag_start<V>(&mut self, index: usize, viewport: &V)
    where
        V: ViewportModel<Scroll = S>,
    {
        let Some(item) = viewport.find_visible_item(index) else {
            log::trace!("drag start on row {index} ignored, row is not materialized");
            return;
        };

        log::debug!("drag start on row {index}");
        self.autoscroller.cancel();
        self.session.start(item);
    }

    pub fn on_drag<V>(&mut self, delta: f32, viewport: &mut V)
    where
        V: ViewportModel<Scroll = S>,
    {
        if !self.session.is_active() {
            return;
        }

        self.session.accumulate(delta);
        self.swap_if_needed(viewport);
        self.scroll_if_needed(viewport);
    }

    pub fn on_drag_end(&mut self) {
        if self.session.is_active() {
            log::debug!(
                "drag end at row {:?} after {:.1}px",
                self.session.dragged_index(),
                self.session.cumulative_delta()
            );
        }
        self.reset();
    }

    pub fn on_drag_cancel(&mut self) {
        if self.session.is_active() {
            log::debug!("drag cancelled at row {:?}", self.session.dragged_index());
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.session.clear();
        self.autoscroller.cancel();
    }

    fn swap_if_needed<V: ViewportModel>(&mut self, viewport: &V) {
        let (Some(dragged_index), Some(bounds)) = (
            self.session.dragged_index(),
            self.session.projected_bounds(),
        ) else {
            return;
        };

        let visible_items = viewport.visible_items();
        let Some(current_item) = visible_items
            .iter()
            .find(|item| item.index == dragged_index)
            .copied()
        else {
            log::trace!("row {dragged_index} is not materialized, skipping swap detection");
            return;
        };

        if let Some(target) = find_swap_target(bounds, dragged_index, &current_item, &visible_items)
        {
            log::debug!("swap row {dragged_index} -> {}", target.index);
            self.publisher.on_move(dragged_index, target.index);
            self.session.set_dragged_index(target.index);
        }
    }

    fn scroll_if_needed<V>(&mut self, viewport: &mut V)
    where
        V: ViewportModel<Scroll = S>,
    {
        if !self.autoscroll {
            return;
        }
        let Some(bounds) = self.session.projected_bounds() else {
            return;
        };

        let amount = scroll_amount(
            self.session.cumulative_delta(),
            bounds,
            viewport.visible_range(),
        );
        self.autoscroller
            .update(amount, |amount| viewport.scroll_by(amount));
    }
}
