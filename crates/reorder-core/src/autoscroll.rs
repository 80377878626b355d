use std::ops::Range;

use crate::{ProjectedBounds, ScrollTask};

/// How far, and in which direction, the viewport should scroll for the current drag.
///
/// The amount is the distance the dragged row extends past the viewport edge it is
/// moving toward, so scrolling speeds up the further the row is pulled past the edge.
/// It is deliberately left unclamped.
pub fn scroll_amount(
    cumulative_delta: f32,
    bounds: ProjectedBounds,
    visible_range: Range<f32>,
) -> Option<f32> {
    if cumulative_delta > 0.0 {
        let diff = bounds.end - visible_range.end;
        (diff > 0.0).then_some(diff)
    } else if cumulative_delta < 0.0 {
        let diff = bounds.start - visible_range.start;
        (diff < 0.0).then_some(diff)
    } else {
        None
    }
}

/// Holds at most one outstanding autoscroll task.
pub struct AutoScroller<S> {
    task: Option<S>,
}

impl<S> Default for AutoScroller<S> {
    fn default() -> Self {
        Self { task: None }
    }
}

impl<S: ScrollTask> AutoScroller<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_scrolling(&self) -> bool {
        self.task.as_ref().is_some_and(|task| task.is_active())
    }

    /// Issue a scroll through `start` unless one is still in flight.
    ///
    /// Returns `true` when a new task was started.
    pub fn update(&mut self, amount: Option<f32>, start: impl FnOnce(f32) -> S) -> bool {
        if self.is_scrolling() {
            log::trace!("autoscroll still in flight, skipping");
            return false;
        }

        // A finished, failed or cancelled task no longer counts as outstanding.
        self.cancel();

        let Some(amount) = amount else {
            return false;
        };

        log::debug!("autoscroll by {amount:.1}px");
        self.task = Some(start(amount));
        true
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    #[derive(Clone, Default)]
    struct FakeTask {
        active: Rc<Cell<bool>>,
        cancelled: Rc<Cell<bool>>,
    }

    impl ScrollTask for FakeTask {
        fn is_active(&self) -> bool {
            self.active.get()
        }

        fn cancel(self) {
            self.active.set(false);
            self.cancelled.set(true);
        }
    }

    fn running() -> FakeTask {
        let task = FakeTask::default();
        task.active.set(true);
        task
    }

    fn bounds(start: f32, end: f32) -> ProjectedBounds {
        ProjectedBounds { start, end }
    }

    #[test]
    fn downward_drag_past_end_scrolls_by_overshoot() {
        assert_eq!(scroll_amount(40.0, bounds(230.0, 280.0), 0.0..250.0), Some(30.0));
        assert_eq!(scroll_amount(40.0, bounds(190.0, 240.0), 0.0..250.0), None);
    }

    #[test]
    fn upward_drag_past_start_scrolls_by_negative_overshoot() {
        assert_eq!(scroll_amount(-40.0, bounds(-15.0, 35.0), 0.0..250.0), Some(-15.0));
        assert_eq!(scroll_amount(-40.0, bounds(5.0, 55.0), 0.0..250.0), None);
    }

    #[test]
    fn direction_follows_cumulative_delta_not_position() {
        // Row sits past the top edge but the drag is net downward.
        assert_eq!(scroll_amount(10.0, bounds(-20.0, 30.0), 0.0..250.0), None);
        assert_eq!(scroll_amount(0.0, bounds(-20.0, 300.0), 0.0..250.0), None);
    }

    #[test]
    fn only_one_task_is_outstanding() {
        let mut scroller = AutoScroller::new();
        let first = running();
        let mut starts = 0;

        assert!(scroller.update(Some(10.0), |_| {
            starts += 1;
            first.clone()
        }));
        assert!(!scroller.update(Some(25.0), |_| {
            starts += 1;
            running()
        }));
        assert_eq!(starts, 1);

        first.active.set(false);
        assert!(!scroller.is_scrolling());
        assert!(scroller.update(Some(25.0), |amount| {
            assert_eq!(amount, 25.0);
            running()
        }));
    }

    #[test]
    fn cancel_stops_the_outstanding_task() {
        let mut scroller = AutoScroller::new();
        let task = running();
        scroller.update(Some(10.0), |_| task.clone());

        scroller.cancel();
        assert!(task.cancelled.get());
        assert!(!scroller.is_scrolling());

        // Idempotent.
        scroller.cancel();
    }
}
