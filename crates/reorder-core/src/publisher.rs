/// Receives every confirmed swap.
///
/// The owner of the items is expected to remove the item at `from` and reinsert it at
/// `to` (see [`move_item`]), then re-render.
pub trait ReorderPublisher {
    fn on_move(&mut self, from: usize, to: usize);
}

impl<F> ReorderPublisher for F
where
    F: FnMut(usize, usize),
{
    fn on_move(&mut self, from: usize, to: usize) {
        self(from, to)
    }
}

/// Remove the item at `from` and reinsert it at `to`, shifting the items in between
/// by one.
///
/// Returns `false` (and leaves `items` untouched) when either index is out of range
/// or both are equal.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }

    let item = items.remove(from);
    items.insert(to, item);
    true
}
