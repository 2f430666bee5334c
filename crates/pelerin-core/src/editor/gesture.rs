//! Pointer-to-index translation for drag reordering.
//!
//! The platform layer reports which block the pointer hovers and where; this
//! module decides whether that hover moves the dragged block. A move happens
//! only once the pointer crosses the hovered block's vertical midpoint, and
//! always by exactly one position, so a long drag becomes a sequence of
//! single-step reorders.

use crate::models::BlockId;

/// Vertical extent of the hovered block in the platform's coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverRect {
    pub top: f64,
    pub height: f64,
}

impl HoverRect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// One applied reorder step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderStep {
    pub id: BlockId,
    pub from: usize,
    pub to: usize,
}

/// An in-progress drag of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragGesture {
    dragged: BlockId,
}

impl DragGesture {
    pub fn new(dragged: BlockId) -> Self {
        Self { dragged }
    }

    pub fn dragged(&self) -> &BlockId {
        &self.dragged
    }
}

/// Target index for the dragged block, or `None` when the hover does not
/// cross the midpoint in the direction of travel.
///
/// Dragging downwards moves only once the pointer is below the hovered
/// block's midpoint; dragging upwards only once it is above.
pub fn hover_target(
    drag_index: usize,
    hover_index: usize,
    pointer_y: f64,
    rect: HoverRect,
) -> Option<usize> {
    if drag_index == hover_index {
        return None;
    }
    let midpoint = rect.midpoint();
    if drag_index < hover_index {
        (pointer_y > midpoint).then_some(drag_index + 1)
    } else {
        (pointer_y < midpoint).then_some(drag_index - 1)
    }
}
