//! Id-keyed operations over ordered vectors.
//!
//! Shared by the page section list and the two-level builder model. Every
//! function is total: unknown ids and out-of-range moves leave the vector as
//! it was and report `false`/`None`.

/// Items addressable by a stable string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

pub fn position_of<T: Keyed>(items: &[T], key: &str) -> Option<usize> {
    items.iter().position(|item| item.key() == key)
}

/// Inserts at `position`, clamped to the end; `None` appends. Returns the
/// index the item landed at.
pub fn insert_at<T>(items: &mut Vec<T>, item: T, position: Option<usize>) -> usize {
    let index = position.map_or(items.len(), |p| p.min(items.len()));
    items.insert(index, item);
    index
}

pub fn remove<T: Keyed>(items: &mut Vec<T>, key: &str) -> Option<T> {
    position_of(items, key).map(|index| items.remove(index))
}

/// Swaps the item with its neighbour. First-up and last-down are no-ops.
pub fn step<T: Keyed>(items: &mut [T], key: &str, direction: Direction) -> bool {
    let Some(index) = position_of(items, key) else {
        return false;
    };
    match direction {
        Direction::Up if index > 0 => {
            items.swap(index, index - 1);
            true
        }
        Direction::Down if index + 1 < items.len() => {
            items.swap(index, index + 1);
            true
        }
        _ => false,
    }
}

/// Moves the item to `target`, clamped to the last index, shifting the
/// items in between. Returns the original index when a move happened.
pub fn move_to<T: Keyed>(items: &mut Vec<T>, key: &str, target: usize) -> Option<usize> {
    let from = position_of(items, key)?;
    let to = target.min(items.len().saturating_sub(1));
    if from == to {
        return None;
    }
    let item = items.remove(from);
    items.insert(to, item);
    Some(from)
}

/// Inserts `copy` right after the item keyed `key`.
pub fn insert_after<T: Keyed>(items: &mut Vec<T>, key: &str, copy: T) -> Option<usize> {
    let index = position_of(items, key)? + 1;
    items.insert(index, copy);
    Some(index)
}

pub fn is_first<T: Keyed>(items: &[T], key: &str) -> bool {
    items.first().is_some_and(|item| item.key() == key)
}

pub fn is_last<T: Keyed>(items: &[T], key: &str) -> bool {
    items.last().is_some_and(|item| item.key() == key)
}
