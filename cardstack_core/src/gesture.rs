// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture kinds, phases, timing constants and arbitration.
//!
//! The host owns gesture recognition. It tells the engine which kind of
//! gesture wants to start and forwards phases once [`can_begin`] agrees.

use crate::geometry::Vec2;
use crate::time::{Duration, HostTime};

/// Minimum press duration before a reorder drag is recognised.
pub const LONG_PRESS_DURATION: Duration = Duration::from_millis(490);

/// Upward nudge applied to the drag snapshot on pickup.
pub const LIFT_OFFSET: f64 = 20.0;

/// Duration of the pickup nudge.
pub const LIFT_DURATION: Duration = Duration::from_millis(200);

/// Duration of the neighbour slide after a reorder swap.
pub const NEIGHBOR_SHIFT_DURATION: Duration = Duration::from_millis(250);

/// Duration of the snapshot settling into its slot.
pub const SETTLE_DURATION: Duration = Duration::from_millis(200);

/// Duration of a flip in either direction.
pub const FLIP_DURATION: Duration = Duration::from_millis(500);

/// Duration of the revealed card returning after a pan.
pub const PAN_SETTLE_DURATION: Duration = Duration::from_millis(300);

/// Duration of an animated relayout.
pub const RELAYOUT_DURATION: Duration = Duration::from_millis(300);

/// A pan further than `revealed height / PAN_DISMISS_DIVISOR` dismisses.
pub const PAN_DISMISS_DIVISOR: f64 = 7.0;

/// Autoscroll speed at the viewport edge, in points per second.
pub const MAX_AUTOSCROLL_SPEED: f64 = 600.0;

/// Lifecycle of a continuous gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    /// The gesture was recognised.
    Began,
    /// The touch moved.
    Changed,
    /// The touch lifted.
    Ended,
    /// The system took the touch away.
    Cancelled,
}

/// Gestures the engine arbitrates between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureKind {
    /// Long-press drag to reorder.
    Reorder,
    /// Tap to select.
    Tap,
    /// Vertical pan on the revealed card.
    RevealedPan {
        /// Velocity at recognition time.
        velocity: Vec2,
    },
}

/// One autoscroll frame from the host's periodic clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoscrollTick {
    /// Time of the tick.
    pub now: HostTime,
    /// Time since the previous tick.
    pub duration: Duration,
}

/// Decides whether a gesture of `kind` may begin.
///
/// Reorder and tap refuse while a card is revealed. The revealed-card pan
/// only begins when it is more vertical than horizontal.
#[must_use]
pub fn can_begin(kind: GestureKind, revealed: Option<usize>) -> bool {
    match kind {
        GestureKind::Reorder | GestureKind::Tap => revealed.is_none(),
        GestureKind::RevealedPan { velocity } => velocity.y.abs() > velocity.x.abs(),
    }
}
