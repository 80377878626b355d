#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    ops::Range,
    rc::Rc,
};

use gpui_reorder_core::{
    DragDropState, ListLayout, PinnedRows, ReorderPublisher, ScrollTask, ViewportModel,
    VisibleItemInfo, move_item,
};

/// Scroll handle whose completion is driven by the test.
#[derive(Clone, Debug)]
pub struct ManualScroll {
    pub amount: f32,
    pub active: Rc<Cell<bool>>,
    pub cancelled: Rc<Cell<bool>>,
}

impl ManualScroll {
    pub fn finish(&self) {
        self.active.set(false);
    }
}

impl ScrollTask for ManualScroll {
    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn cancel(self) {
        if self.active.get() {
            self.cancelled.set(true);
        }
        self.active.set(false);
    }
}

/// A list of labelled rows laid out by [`ListLayout`], shared between the viewport and
/// the reorder callback the way a real host shares its item storage.
#[derive(Clone)]
pub struct SharedList {
    pub items: Rc<RefCell<Vec<(String, f32)>>>,
    pub moves: Rc<RefCell<Vec<(usize, usize)>>>,
}

impl SharedList {
    pub fn uniform(count: usize, size: f32) -> Self {
        Self::with_sizes((0..count).map(|_| size))
    }

    pub fn with_sizes(sizes: impl IntoIterator<Item = f32>) -> Self {
        let items = sizes
            .into_iter()
            .enumerate()
            .map(|(ix, size)| (format!("Item {ix}"), size))
            .collect();
        Self {
            items: Rc::new(RefCell::new(items)),
            moves: Rc::default(),
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.items.borrow().iter().map(|(label, _)| label.clone()).collect()
    }

    pub fn moves(&self) -> Vec<(usize, usize)> {
        self.moves.borrow().clone()
    }

    pub fn publisher(&self) -> impl FnMut(usize, usize) + use<> {
        let items = self.items.clone();
        let moves = self.moves.clone();
        move |from, to| {
            moves.borrow_mut().push((from, to));
            move_item(&mut items.borrow_mut(), from, to);
        }
    }
}

/// Windowed viewport over a [`SharedList`]; scrolls are applied immediately but stay
/// "outstanding" until the test finishes them.
pub struct TestViewport {
    pub list: SharedList,
    pub scroll_top: f32,
    pub height: f32,
    pub scrolls: Vec<ManualScroll>,
    pub pinned: Option<PinnedRows>,
}

impl TestViewport {
    pub fn new(list: SharedList, height: f32) -> Self {
        Self {
            list,
            scroll_top: 0.0,
            height,
            scrolls: Vec::new(),
            pinned: None,
        }
    }

    /// Feed `delta` the way the gpui list does, keeping the drag's rows materialized.
    pub fn drag_pinned<P: ReorderPublisher>(
        &mut self,
        state: &mut DragDropState<P, ManualScroll>,
        delta: f32,
    ) {
        self.pinned = state.pinned_rows(delta);
        state.on_drag(delta, self);
    }

    pub fn layout(&self) -> ListLayout {
        ListLayout::new(self.list.items.borrow().iter().map(|(_, size)| *size))
    }

    pub fn finish_scrolls(&self) {
        for scroll in &self.scrolls {
            scroll.finish();
        }
    }

    pub fn requested_amounts(&self) -> Vec<f32> {
        self.scrolls.iter().map(|scroll| scroll.amount).collect()
    }
}

impl ViewportModel for TestViewport {
    type Scroll = ManualScroll;

    fn visible_items(&self) -> Vec<VisibleItemInfo> {
        self.layout()
            .materialized_items(self.scroll_top, self.height, self.pinned)
    }

    fn visible_range(&self) -> Range<f32> {
        0.0..self.height
    }

    fn scroll_by(&mut self, amount: f32) -> ManualScroll {
        let layout = self.layout();
        self.scroll_top = layout.clamp_scroll_top(self.scroll_top + amount, self.height);

        let scroll = ManualScroll {
            amount,
            active: Rc::new(Cell::new(true)),
            cancelled: Rc::default(),
        };
        self.scrolls.push(scroll.clone());
        scroll
    }
}
