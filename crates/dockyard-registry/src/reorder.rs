// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Drag-to-reorder engine.
//
// A drag gesture names the dragged row (`from`), the row under the pointer
// (`target`) and which half of that row the pointer is in. The moved item
// is removed and reinserted at:
//
//   target - (from < target ? 1 : 0) + (insert_below ? 1 : 0)
//
// clamped to the length of the list after removal. Dropping a row onto
// itself never moves anything.

use dockyard_core::error::{DockyardError, Result};
use tracing::debug;

/// A completed drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderRequest {
    /// Index of the dragged item.
    pub from: usize,
    /// Index of the row the pointer was over on release.
    pub target: usize,
    /// Pointer was in the lower half of the target row.
    pub insert_below: bool,
}

impl ReorderRequest {
    pub fn new(from: usize, target: usize, insert_below: bool) -> Self {
        Self {
            from,
            target,
            insert_below,
        }
    }
}

/// Vertical extent of a rendered row, in the same coordinate space as the
/// pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub top: f64,
    pub height: f64,
}

impl RowBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Whether a pointer at `pointer_y` is past the row's vertical midpoint.
    /// Exactly on the midpoint counts as the upper half.
    pub fn insert_below(&self, pointer_y: f64) -> bool {
        pointer_y > self.top + self.height / 2.0
    }
}

/// Final index of the moved item for a list of `len` items.
///
/// Callers must have checked `from` and `target` against `len`.
pub fn landing_index(len: usize, from: usize, target: usize, insert_below: bool) -> usize {
    if from == target {
        return from;
    }
    let shifted = if from < target { target - 1 } else { target };
    let adjusted = shifted + usize::from(insert_below);
    // After removal the list has len - 1 items; inserting at that length
    // appends.
    adjusted.min(len - 1)
}

/// Apply a gesture to `list` in place.
///
/// Returns `Ok(true)` when the order changed, `Ok(false)` for a no-op, and
/// `NotFound` when either index is outside the list.
pub fn apply<T>(list: &mut Vec<T>, request: ReorderRequest) -> Result<bool> {
    let len = list.len();
    for index in [request.from, request.target] {
        if index >= len {
            return Err(DockyardError::NotFound { index, len });
        }
    }

    if request.from == request.target {
        debug!(index = request.from, "dropped onto itself");
        return Ok(false);
    }

    let landing = landing_index(len, request.from, request.target, request.insert_below);
    if landing == request.from {
        debug!(?request, "gesture leaves order unchanged");
        return Ok(false);
    }

    let moved = list.remove(request.from);
    list.insert(landing, moved);
    debug!(from = request.from, to = landing, "item moved");
    Ok(true)
}

/// State of one drag gesture.
///
/// `Idle -> Dragging -> Hovering (repeats while the pointer moves) -> Idle`.
/// Dropping returns to `Idle` immediately; the only cancellation path is
/// releasing outside a row or leaving the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: usize,
    },
    Hovering {
        source: usize,
        target: usize,
        insert_below: bool,
    },
}

/// Owned drag-gesture state for one surface.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// The row being dragged, if any.
    pub fn source(&self) -> Option<usize> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { source } | DragState::Hovering { source, .. } => Some(source),
        }
    }

    /// Row and half currently highlighted as the drop position.
    pub fn drop_indicator(&self) -> Option<(usize, bool)> {
        match self.state {
            DragState::Hovering {
                target,
                insert_below,
                ..
            } => Some((target, insert_below)),
            _ => None,
        }
    }

    /// Pointer pressed on a row and started moving.
    pub fn start(&mut self, source: usize) {
        self.state = DragState::Dragging { source };
    }

    /// Pointer moved over `target`. Recomputed on every move, so the half
    /// follows the pointer rather than the position at drag start.
    pub fn hover(&mut self, target: usize, insert_below: bool) {
        if let Some(source) = self.source() {
            self.state = DragState::Hovering {
                source,
                target,
                insert_below,
            };
        }
    }

    /// `hover` with the half derived from the pointer and the row's bounds.
    pub fn hover_at(&mut self, target: usize, pointer_y: f64, bounds: RowBounds) {
        self.hover(target, bounds.insert_below(pointer_y));
    }

    /// Pointer left a row but is still over the list.
    pub fn leave_row(&mut self, row: usize) {
        if let DragState::Hovering { source, target, .. } = self.state
            && target == row
        {
            self.state = DragState::Dragging { source };
        }
    }

    /// Pointer left the list, or was released outside any row.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Pointer released. Yields the gesture when it ended over a row.
    pub fn release(&mut self) -> Option<ReorderRequest> {
        let request = match self.state {
            DragState::Hovering {
                source,
                target,
                insert_below,
            } => Some(ReorderRequest::new(source, target, insert_below)),
            _ => None,
        };
        self.state = DragState::Idle;
        request
    }
}
