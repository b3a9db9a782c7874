// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction state owned by the engine.
//!
//! There is exactly one [`InteractionState`] per [`CardStack`](crate::CardStack).
//! Collaborators read it through [`CardStack::state`](crate::CardStack::state);
//! only the engine mutates it.

use crate::effect::SurfaceId;
use crate::geometry::{Point, Vec2};

/// Direction of an automatic scroll during a drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AutoscrollDirection {
    /// Towards the start of the list (offset decreasing).
    Up,
    /// Towards the end of the list (offset increasing).
    Down,
}

/// Autoscroll loop status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Autoscroll {
    /// Current direction, if any.
    pub direction: Option<AutoscrollDirection>,
    /// Whether the host's periodic tick should be running.
    pub active: bool,
}

/// Bookkeeping for one long-press drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// Index the drag started on.
    pub start_index: usize,
    /// Centre of the picked-up card when the drag started.
    pub start_center: Point,
    /// Touch location when the drag started, in content coordinates.
    pub start_touch: Point,
    /// Latest touch location, in content coordinates.
    pub touch: Point,
    /// Current index of the dragged item.
    pub current_index: usize,
    /// Index the dragged item was last swapped into.
    pub last_swapped: Option<usize>,
    /// Last touch location that landed on an item.
    pub last_hit_touch: Point,
}

impl DragSession {
    /// Starts a session on `index`.
    #[must_use]
    pub fn new(index: usize, start_center: Point, touch: Point) -> Self {
        Self {
            start_index: index,
            start_center,
            start_touch: touch,
            touch,
            current_index: index,
            last_swapped: None,
            last_hit_touch: touch,
        }
    }

    /// Touch movement since the drag started.
    #[must_use]
    pub fn touch_delta(&self) -> Vec2 {
        self.touch - self.start_touch
    }

    /// Index the snapshot should settle into when the drag ends.
    #[must_use]
    pub fn resting_index(&self) -> usize {
        self.last_swapped.unwrap_or(self.start_index)
    }
}

/// Drag-reorder gesture state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// The long press was recognised and the card lifted.
    Pressed(DragSession),
    /// The touch has moved at least once.
    Dragging(DragSession),
    /// The touch lifted; the snapshot is settling into place.
    Ended(DragSession),
    /// The drag was cancelled; cleared on the next layout pass.
    Cancelled,
}

impl DragState {
    /// The live session, if the drag is pressed or dragging.
    #[must_use]
    pub fn active_session(&self) -> Option<&DragSession> {
        match self {
            Self::Pressed(s) | Self::Dragging(s) => Some(s),
            _ => None,
        }
    }

    /// Index whose live view is hidden behind the drag snapshot.
    #[must_use]
    pub fn dragged_index(&self) -> Option<usize> {
        match self {
            Self::Pressed(s) | Self::Dragging(s) | Self::Ended(s) => Some(s.current_index),
            Self::Idle | Self::Cancelled => None,
        }
    }

    /// Returns `true` if no drag is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Revealed-card pan bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PanSession {
    pub(crate) start_y: f64,
}

/// Transient interaction state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub(crate) revealed: Option<usize>,
    pub(crate) flipped: Option<SurfaceId>,
    pub(crate) drag: DragState,
    pub(crate) autoscroll: Autoscroll,
    pub(crate) scroll_shift: f64,
    pub(crate) pan_listener: Option<usize>,
    pub(crate) pan: Option<PanSession>,
    pub(crate) frozen_bottom_inset: Option<f64>,
}

impl InteractionState {
    /// The revealed index, if any.
    #[must_use]
    pub fn revealed(&self) -> Option<usize> {
        self.revealed
    }

    /// Whether the revealed card shows its back face.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped.is_some()
    }

    /// The surface attached as the back face, while flipped.
    #[must_use]
    pub fn back_surface(&self) -> Option<SurfaceId> {
        self.flipped
    }

    /// Drag-reorder state.
    #[must_use]
    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Autoscroll loop status.
    #[must_use]
    pub fn autoscroll(&self) -> Autoscroll {
        self.autoscroll
    }

    /// Pending scroll correction from inserts and deletes above the revealed
    /// card.
    #[must_use]
    pub fn scroll_shift(&self) -> f64 {
        self.scroll_shift
    }

    /// Index the revealed-card pan listener is installed on.
    #[must_use]
    pub fn pan_listener(&self) -> Option<usize> {
        self.pan_listener
    }

    /// Bottom inset held while an editor has focus.
    #[must_use]
    pub fn frozen_bottom_inset(&self) -> Option<f64> {
        self.frozen_bottom_inset
    }

    /// Clears the revealed index and everything that only makes sense with
    /// one.
    pub(crate) fn clear_revealed(&mut self) -> Option<usize> {
        self.flipped = None;
        self.pan = None;
        self.revealed.take()
    }
}
