use std::{cell::Cell, ops::Range, rc::Rc, time::Duration};

use gpui::{
    App, AppContext as _, Bounds, Context, CursorStyle, DragMoveEvent, ElementId, Entity,
    EntityId, FocusHandle, InteractiveElement as _, IntoElement, ListSizingBehavior,
    ParentElement as _, Pixels, Render, RenderOnce, SharedString, Size,
    StatefulInteractiveElement as _, StyleRefinement, Styled, Task, Timer, Window, canvas,
    deferred, div, prelude::FluentBuilder as _, px, size,
};
use gpui_component::list::ListItem;
use gpui_component::scroll::{Scrollbar, ScrollbarState};
use gpui_component::{ActiveTheme as _, VirtualListScrollHandle, v_virtual_list};
use gpui_reorder_core::{
    DragDropState, ListLayout, PinnedRows, ReorderPublisher, ScrollTask, ViewportModel,
    VisibleItemInfo, move_item,
};

const CONTEXT: &str = "SortableVList";
const DEFAULT_ROW_HEIGHT: Pixels = px(48.);
const DEFAULT_AUTOSCROLL_INTERVAL: Duration = Duration::from_millis(16);

/// Create a [`SortableVList`].
pub fn sortable_vlist<T, R>(
    state: &Entity<SortableVListState<T>>,
    render_item: R,
) -> SortableVList<T>
where
    T: 'static,
    R: Fn(usize, &SortableVListItem<T>, SortableRowState, &mut Window, &mut App) -> ListItem
        + 'static,
{
    SortableVList::new(state, render_item)
}

/// A single row in a [`SortableVListState`].
#[derive(Clone)]
pub struct SortableVListItem<T> {
    pub id: SharedString,
    pub label: SharedString,
    pub data: T,
    height: Pixels,
}

impl<T> SortableVListItem<T> {
    pub fn new(id: impl Into<SharedString>, label: impl Into<SharedString>, data: T) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            data,
            height: DEFAULT_ROW_HEIGHT,
        }
    }

    pub fn height(mut self, height: Pixels) -> Self {
        self.height = height;
        self
    }

    pub fn item_height(&self) -> Pixels {
        self.height
    }
}

#[derive(Clone)]
struct SortableDrag {
    list_id: EntityId,
    ix: usize,
}

/// gpui needs a view for every drag; the list draws the lifted row itself.
struct DragPlaceholder;

impl Render for DragPlaceholder {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        div()
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SortableRowState {
    pub selected: bool,
    pub dragging: bool,
}

/// A confirmed swap, reported after the items have been reordered.
#[derive(Clone, Debug)]
pub struct SortableReorder {
    pub item_id: SharedString,
    pub from: usize,
    pub to: usize,
}

/// Swaps reported by the drag core during one update, applied right after it returns.
#[derive(Default)]
struct PendingMoves(Vec<(usize, usize)>);

impl ReorderPublisher for PendingMoves {
    fn on_move(&mut self, from: usize, to: usize) {
        self.0.push((from, to));
    }
}

/// Replay swaps onto `items`, reporting each one after it is applied. Returns the index
/// the last moved row ended up at.
fn replay_moves<T>(
    items: &mut Vec<SortableVListItem<T>>,
    moves: Vec<(usize, usize)>,
    mut on_reorder: impl FnMut(&SortableReorder, &[SortableVListItem<T>]),
) -> Option<usize> {
    let mut last_ix = None;
    for (from, to) in moves {
        if !move_item(items, from, to) {
            log::warn!("ignoring out-of-range move {from} -> {to}");
            continue;
        }
        last_ix = Some(to);

        let reorder = SortableReorder {
            item_id: items[to].id.clone(),
            from,
            to,
        };
        on_reorder(&reorder, items);
    }
    last_ix
}

/// The dragged row as drawn above the list, relative to the list's top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
struct LiftedRow {
    ix: usize,
    top: f32,
    height: f32,
}

fn lifted_row<P, S, V>(drag: &DragDropState<P, S>, viewport: &V) -> Option<LiftedRow>
where
    P: ReorderPublisher,
    S: ScrollTask,
    V: ViewportModel,
{
    let ix = drag.dragged_index()?;
    let slot = viewport.find_visible_item(ix)?;
    let offset = drag.presentation_offset(ix, viewport)?;
    Some(LiftedRow {
        ix,
        top: slot.offset + offset,
        height: slot.size,
    })
}

/// Window y of the mouse-down that started dragging `row`.
fn press_position_y(list_top: Pixels, row: &VisibleItemInfo, press_offset: Pixels) -> Pixels {
    list_top + px(row.offset) + press_offset
}

/// A scroll step scheduled on the foreground executor.
struct AutoScrollJob {
    task: Task<()>,
    done: Rc<Cell<bool>>,
}

impl ScrollTask for AutoScrollJob {
    fn is_active(&self) -> bool {
        !self.done.get()
    }

    fn cancel(self) {
        if self.done.get() {
            // The step already ran; its future may still be unwinding the update that
            // replaced it.
            self.task.detach();
        }
    }
}

/// The list as seen by the drag core: rows are reported relative to the viewport top,
/// so rows slide under a stationary pointer while the list autoscrolls. Rows pinned by
/// the drag are reported even when they are outside the viewport.
struct ListViewport<'a, 'b, T: 'static> {
    layout: &'a ListLayout,
    scroll_top: f32,
    height: f32,
    pinned: Option<PinnedRows>,
    interval: Duration,
    cx: &'a mut Context<'b, SortableVListState<T>>,
}

impl<T: 'static> ViewportModel for ListViewport<'_, '_, T> {
    type Scroll = AutoScrollJob;

    fn visible_items(&self) -> Vec<VisibleItemInfo> {
        self.layout
            .materialized_items(self.scroll_top, self.height, self.pinned)
    }

    fn visible_range(&self) -> Range<f32> {
        0.0..self.height
    }

    fn scroll_by(&mut self, amount: f32) -> AutoScrollJob {
        let done = Rc::new(Cell::new(false));
        let finished = done.clone();
        let interval = self.interval;
        let task = self.cx.spawn(async move |this, cx| {
            Timer::after(interval).await;
            finished.set(true);
            this.update(cx, |state, cx| state.on_autoscroll_step(amount, cx))
                .ok();
        });
        AutoScrollJob { task, done }
    }
}

/// State for a long-press-and-drag sortable list based on `gpui-component`'s virtual list.
pub struct SortableVListState<T> {
    focus_handle: FocusHandle,
    items: Vec<SortableVListItem<T>>,
    item_sizes: Rc<Vec<Size<Pixels>>>,
    layout: ListLayout,
    viewport_bounds: Bounds<Pixels>,
    scrollbar_state: ScrollbarState,
    scroll_handle: VirtualListScrollHandle,
    drag_handle_width: Option<Pixels>,
    autoscroll_interval: Duration,
    selected_ix: Option<usize>,
    last_pointer_y: Option<Pixels>,
    drag: DragDropState<PendingMoves, AutoScrollJob>,
    on_reorder: Option<Rc<dyn Fn(&SortableReorder, &[SortableVListItem<T>])>>,
    render_item: Rc<
        dyn Fn(usize, &SortableVListItem<T>, SortableRowState, &mut Window, &mut App) -> ListItem,
    >,
}

impl<T: 'static> SortableVListState<T> {
    pub fn new(cx: &mut App) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            items: Vec::new(),
            item_sizes: Rc::new(Vec::new()),
            layout: ListLayout::default(),
            viewport_bounds: Bounds::default(),
            scrollbar_state: ScrollbarState::default(),
            scroll_handle: VirtualListScrollHandle::new(),
            drag_handle_width: None,
            autoscroll_interval: DEFAULT_AUTOSCROLL_INTERVAL,
            selected_ix: None,
            last_pointer_y: None,
            drag: DragDropState::new(PendingMoves::default()),
            on_reorder: None,
            render_item: Rc::new(|_, _, _, _, _| ListItem::new("sortable-vlist-empty")),
        }
    }

    pub fn items(mut self, items: impl Into<Vec<SortableVListItem<T>>>) -> Self {
        self.items = items.into();
        self.rebuild_layout();
        self
    }

    /// Restrict drag start to a left-side handle area with the given width.
    pub fn drag_handle_width(mut self, width: Pixels) -> Self {
        self.drag_handle_width = Some(width);
        self
    }

    /// Allow dragging from anywhere on the row (the default).
    pub fn drag_on_row(mut self) -> Self {
        self.drag_handle_width = None;
        self
    }

    /// Scroll the list while a dragged row is held past the top or bottom edge.
    pub fn autoscroll(mut self, enabled: bool) -> Self {
        self.drag.set_autoscroll(enabled);
        self
    }

    /// Delay before each autoscroll step is applied.
    pub fn autoscroll_interval(mut self, interval: Duration) -> Self {
        self.autoscroll_interval = interval;
        self
    }

    /// Provide a callback invoked after every swap made while dragging.
    pub fn on_reorder(
        mut self,
        on_reorder: impl Fn(&SortableReorder, &[SortableVListItem<T>]) + 'static,
    ) -> Self {
        self.on_reorder = Some(Rc::new(on_reorder));
        self
    }

    pub fn set_items(
        &mut self,
        items: impl Into<Vec<SortableVListItem<T>>>,
        cx: &mut Context<Self>,
    ) {
        self.drag.on_drag_cancel();
        self.items = items.into();
        self.rebuild_layout();
        self.selected_ix = None;
        self.last_pointer_y = None;
        cx.notify();
    }

    pub fn items_ref(&self) -> &[SortableVListItem<T>] {
        &self.items
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_ix
    }

    pub fn dragged_index(&self) -> Option<usize> {
        self.drag.dragged_index()
    }

    pub fn set_item_height(&mut self, ix: usize, height: Pixels, cx: &mut Context<Self>) {
        if let Some(item) = self.items.get_mut(ix) {
            item.height = height;
            self.rebuild_layout();
            cx.notify();
        }
    }

    fn rebuild_layout(&mut self) {
        self.layout
            .rebuild(self.items.iter().map(|item| f32::from(item.height)));
        self.item_sizes = Rc::new(
            (0..self.layout.len())
                .map(|ix| size(px(0.), px(self.layout.item_size(ix).unwrap_or(1.0))))
                .collect(),
        );
    }

    fn scroll_top(&self) -> f32 {
        -f32::from(self.scroll_handle.offset().y)
    }

    fn viewport_height(&self) -> f32 {
        f32::from(self.viewport_bounds.size.height)
    }

    /// Move the list by `amount` pixels, clamped to the content. Returns the distance
    /// actually scrolled.
    fn scroll_list_by(&mut self, amount: f32) -> f32 {
        let current = self.scroll_top();
        let next = self
            .layout
            .clamp_scroll_top(current + amount, self.viewport_height());
        let mut offset = self.scroll_handle.offset();
        offset.y = px(-next);
        self.scroll_handle.set_offset(offset);
        next - current
    }

    fn on_entry_click(
        &mut self,
        ix: usize,
        _event: &gpui::ClickEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        self.selected_ix = Some(ix);
        cx.notify();
    }

    /// `press_offset` is the mouse-down position within the row, so movement made
    /// before gpui's drag threshold is not lost.
    fn on_drag_start(
        &mut self,
        drag: &SortableDrag,
        press_offset: Pixels,
        cx: &mut Context<Self>,
    ) {
        let scroll_top = self.scroll_top();
        let height = self.viewport_height();
        let viewport = ListViewport {
            layout: &self.layout,
            scroll_top,
            height,
            pinned: None,
            interval: self.autoscroll_interval,
            cx,
        };
        self.drag.on_drag_start(drag.ix, &viewport);

        if let Some(row) = self.drag.initial_item().filter(|row| row.index == drag.ix) {
            let list_top = self.viewport_bounds.origin.y;
            self.last_pointer_y = Some(press_position_y(list_top, &row, press_offset));
            self.selected_ix = Some(drag.ix);
        }
        cx.notify();
    }

    fn on_drag_move(
        &mut self,
        event: &DragMoveEvent<SortableDrag>,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !cx.has_active_drag() || event.drag(cx).list_id != cx.entity_id() {
            return;
        }

        let pointer_y = event.event.position.y;
        let Some(last_pointer_y) = self.last_pointer_y.replace(pointer_y) else {
            return;
        };
        let delta = f32::from(pointer_y - last_pointer_y);
        if delta != 0.0 {
            self.drag_update(delta, cx);
        }
    }

    fn on_drop(&mut self, drag: &SortableDrag, _window: &mut Window, cx: &mut Context<Self>) {
        if drag.list_id != cx.entity_id() {
            return;
        }

        self.drag.on_drag_end();
        self.last_pointer_y = None;
        cx.notify();
    }

    fn on_autoscroll_step(&mut self, amount: f32, cx: &mut Context<Self>) {
        let moved = self.scroll_list_by(amount);
        cx.notify();

        // Keep creeping while the pointer idles past the edge; stop at the list ends.
        if moved != 0.0 && self.drag.is_dragging() {
            self.drag_update(0.0, cx);
        }
    }

    fn drag_update(&mut self, delta: f32, cx: &mut Context<Self>) {
        let scroll_top = self.scroll_top();
        let height = self.viewport_height();
        let mut viewport = ListViewport {
            layout: &self.layout,
            scroll_top,
            height,
            pinned: self.drag.pinned_rows(delta),
            interval: self.autoscroll_interval,
            cx,
        };
        self.drag.on_drag(delta, &mut viewport);

        self.apply_pending_moves();
        cx.notify();
    }

    fn apply_pending_moves(&mut self) {
        let moves = std::mem::take(&mut self.drag.publisher_mut().0);
        if moves.is_empty() {
            return;
        }

        let on_reorder = self.on_reorder.clone();
        let last_ix = replay_moves(&mut self.items, moves, |reorder, items| {
            if let Some(on_reorder) = on_reorder.as_ref() {
                on_reorder(reorder, items);
            }
        });
        if last_ix.is_some() {
            self.selected_ix = last_ix;
        }
        self.rebuild_layout();
    }

    fn lifted_row(&self, cx: &mut Context<Self>) -> Option<LiftedRow> {
        let viewport = ListViewport {
            layout: &self.layout,
            scroll_top: self.scroll_top(),
            height: self.viewport_height(),
            pinned: self.drag.pinned_rows(0.0),
            interval: self.autoscroll_interval,
            cx,
        };
        lifted_row(&self.drag, &viewport)
    }
}

impl<T: 'static> Render for SortableVListState<T> {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if self.drag.is_dragging() && !cx.has_active_drag() {
            // The drag was released outside the list or aborted.
            self.drag.on_drag_cancel();
            self.last_pointer_y = None;
        }

        let render_item = Rc::clone(&self.render_item);
        let state_entity = cx.entity();
        let lifted = self.lifted_row(cx);
        let drag_handle_width = self.drag_handle_width;
        let list_id = cx.entity_id();
        let item_sizes = self.item_sizes.clone();
        let scroll_handle = self.scroll_handle.clone();

        // Painted after the list so the lifted row stays above its neighbors.
        let lifted_overlay = lifted.and_then(|row| {
            let item = self.items.get(row.ix)?;
            let row_state = SortableRowState {
                selected: true,
                dragging: true,
            };
            let list_item = (render_item)(row.ix, item, row_state, window, cx);
            Some(
                deferred(
                    div()
                        .absolute()
                        .left_0()
                        .right_0()
                        .top(px(row.top))
                        .h(px(row.height))
                        .bg(cx.theme().background)
                        .border_1()
                        .border_color(cx.theme().drag_border)
                        .shadow_md()
                        .child(list_item.selected(true).size_full()),
                )
                .with_priority(1),
            )
        });

        div()
            .id("sortable-vlist-state")
            .size_full()
            .relative()
            .child(
                canvas(
                    {
                        let state_entity = state_entity.clone();
                        move |bounds, _window, cx| {
                            state_entity.update(cx, |state, _| state.viewport_bounds = bounds);
                        }
                    },
                    |_, _, _, _| {},
                )
                .absolute()
                .size_full(),
            )
            .child(
                div()
                    .id("sortable-vlist-list")
                    .size_full()
                    .on_drag_move::<SortableDrag>(cx.listener(Self::on_drag_move))
                    .on_drop::<SortableDrag>(cx.listener(Self::on_drop))
                    .child(
                        v_virtual_list(
                            cx.entity(),
                            "items",
                            item_sizes,
                            move |state, visible_range: Range<usize>, window, cx| {
                                let mut rows = Vec::with_capacity(visible_range.len());
                                for ix in visible_range {
                                    let item = &state.items[ix];

                                    let selected = Some(ix) == state.selected_ix;
                                    let dragging = lifted.is_some_and(|row| row.ix == ix);
                                    let row_state = SortableRowState { selected, dragging };

                                    let list_item = (render_item)(ix, item, row_state, window, cx);
                                    let drag_value = SortableDrag { list_id, ix };

                                    let row = div()
                                        .id(ix)
                                        .relative()
                                        .size_full()
                                        .flex()
                                        .flex_row()
                                        .child(list_item.selected(selected).h_full().flex_1())
                                        // The slot stays in place; the lifted copy is drawn
                                        // by the overlay.
                                        .when(dragging, |this| this.opacity(0.))
                                        .on_click(cx.listener(
                                            move |this, click_event, window, cx| {
                                                this.on_entry_click(ix, click_event, window, cx);
                                            },
                                        ))
                                        .map(|this| {
                                            let state_entity = state_entity.clone();
                                            match drag_handle_width {
                                                Some(handle_width) => this.child(
                                                    div()
                                                        .id(("sortable-vlist-handle", ix))
                                                        .absolute()
                                                        .top_0()
                                                        .left_0()
                                                        .bottom_0()
                                                        .w(handle_width)
                                                        .cursor(CursorStyle::OpenHand)
                                                        .on_drag(
                                                            drag_value,
                                                            move |drag, offset, _window, cx: &mut App| {
                                                                state_entity.update(cx, |state, cx| {
                                                                    state.on_drag_start(drag, offset.y, cx);
                                                                });
                                                                cx.new(|_| DragPlaceholder)
                                                            },
                                                        ),
                                                ),
                                                None => this.on_drag(
                                                    drag_value,
                                                    move |drag, offset, _window, cx: &mut App| {
                                                        state_entity.update(cx, |state, cx| {
                                                            state.on_drag_start(drag, offset.y, cx);
                                                        });
                                                        cx.new(|_| DragPlaceholder)
                                                    },
                                                ),
                                            }
                                        });

                                    rows.push(row);
                                }
                                rows
                            },
                        )
                        .track_scroll(&scroll_handle)
                        .flex_grow()
                        .size_full()
                        .with_sizing_behavior(ListSizingBehavior::Auto)
                        .into_any_element(),
                    ),
            )
            .children(lifted_overlay)
            .child(
                div()
                    .absolute()
                    .top_0()
                    .right_0()
                    .bottom_0()
                    .w(px(12.))
                    .child(Scrollbar::uniform_scroll(
                        &self.scrollbar_state,
                        &self.scroll_handle,
                    )),
            )
    }
}

/// A virtual list whose rows can be long-pressed and dragged to reorder them.
#[derive(IntoElement)]
pub struct SortableVList<T: 'static> {
    id: ElementId,
    state: Entity<SortableVListState<T>>,
    style: StyleRefinement,
    render_item: Rc<
        dyn Fn(usize, &SortableVListItem<T>, SortableRowState, &mut Window, &mut App) -> ListItem,
    >,
}

impl<T: 'static> SortableVList<T> {
    pub fn new<R>(state: &Entity<SortableVListState<T>>, render_item: R) -> Self
    where
        R: Fn(usize, &SortableVListItem<T>, SortableRowState, &mut Window, &mut App) -> ListItem
            + 'static,
    {
        Self {
            id: ElementId::Name(format!("sortable-vlist-{}", state.entity_id()).into()),
            state: state.clone(),
            style: StyleRefinement::default(),
            render_item: Rc::new(move |ix, item, row_state, window, cx| {
                render_item(ix, item, row_state, window, cx)
            }),
        }
    }
}

impl<T: 'static> Styled for SortableVList<T> {
    fn style(&mut self) -> &mut StyleRefinement {
        &mut self.style
    }
}

impl<T: 'static> RenderOnce for SortableVList<T> {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let focus_handle = self.state.read(cx).focus_handle.clone();
        self.state
            .update(cx, |state, _| state.render_item = self.render_item);

        div()
            .id(self.id)
            .key_context(CONTEXT)
            .track_focus(&focus_handle)
            .size_full()
            .child(self.state)
            .refine_style(&self.style)
    }
}
