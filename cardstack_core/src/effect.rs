// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side effects requested from the host.
//!
//! The engine never touches views. Everything it needs done (relayouts,
//! animations, snapshot bookkeeping, scroll changes) is queued as an
//! [`Effect`] and handed over by
//! [`CardStack::take_effects`](crate::CardStack::take_effects).
//!
//! A [`Transition`] is a timed animation the host runs with its own
//! interpolator. When it finishes, the host reports back with
//! [`CardStack::finish_transition`](crate::CardStack::finish_transition);
//! that is the only point where the engine resumes asynchronously.

use core::fmt;

use crate::geometry::{CardTransform, Point, Rect};
use crate::state::AutoscrollDirection;
use crate::time::Duration;

/// Identifies one in-flight [`Transition`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionId(pub u64);

impl fmt::Debug for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransitionId({})", self.0)
    }
}

/// Opaque handle to a host-owned surface used as a card's back face.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub u32);

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

/// Which face a flip turns towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    /// The card's own content.
    Front,
    /// The attached back surface.
    Back,
}

/// What a transition animates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionKind {
    /// Animate every item to the attributes of the next layout pass.
    Relayout,
    /// Flip the revealed card.
    Flip {
        /// The revealed index.
        index: usize,
        /// Face shown once the flip completes.
        face: Face,
        /// The back surface.
        surface: SurfaceId,
        /// Frame for the back surface in the card's local coordinates.
        surface_frame: Rect,
    },
    /// Lift the drag snapshot by a fixed offset.
    SnapshotLift {
        /// Upward offset.
        offset: f64,
    },
    /// Move the drag snapshot onto its resting frame.
    SnapshotSettle {
        /// Destination frame.
        frame: Rect,
    },
    /// Slide a card vacated by a reorder.
    NeighborShift {
        /// Index the card was moved to.
        index: usize,
        /// Vertical displacement.
        dy: f64,
    },
    /// Animate the revealed card's transform after a pan.
    RevealedSettle {
        /// The revealed index.
        index: usize,
        /// Target transform.
        transform: CardTransform,
    },
}

/// A kind-only view of [`TransitionKind`], for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionTag {
    /// [`TransitionKind::Relayout`].
    Relayout,
    /// [`TransitionKind::Flip`].
    Flip,
    /// [`TransitionKind::SnapshotLift`].
    SnapshotLift,
    /// [`TransitionKind::SnapshotSettle`].
    SnapshotSettle,
    /// [`TransitionKind::NeighborShift`].
    NeighborShift,
    /// [`TransitionKind::RevealedSettle`].
    RevealedSettle,
}

impl TransitionKind {
    /// Returns the kind without its payload.
    #[must_use]
    pub fn tag(&self) -> TransitionTag {
        match self {
            Self::Relayout => TransitionTag::Relayout,
            Self::Flip { .. } => TransitionTag::Flip,
            Self::SnapshotLift { .. } => TransitionTag::SnapshotLift,
            Self::SnapshotSettle { .. } => TransitionTag::SnapshotSettle,
            Self::NeighborShift { .. } => TransitionTag::NeighborShift,
            Self::RevealedSettle { .. } => TransitionTag::RevealedSettle,
        }
    }
}

/// A timed animation for the host to run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// Handle to pass back to `finish_transition`.
    pub id: TransitionId,
    /// What to animate.
    pub kind: TransitionKind,
    /// Suggested duration.
    pub duration: Duration,
    /// Whether rasterization caching must be off for the duration; the host
    /// restores its previous setting afterwards.
    pub disable_rasterization: bool,
    /// Whether later state-machine operations wait for this one.
    pub blocking: bool,
}

/// A request for the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Recompute layout by calling `prepare`.
    Invalidate {
        /// Item content must be reloaded, not just repositioned.
        reload: bool,
        /// Whether the host should animate to the new attributes.
        animated: bool,
    },
    /// Start an animation.
    Transition(Transition),
    /// Set the scroll view's content offset.
    ScrollTo {
        /// New vertical offset.
        offset_y: f64,
    },
    /// Enable or disable user scrolling.
    ScrollEnabled(bool),
    /// Install or remove the revealed-card pan listener.
    PanListener {
        /// Item the listener belongs to.
        index: usize,
        /// `true` to install, `false` to remove.
        installed: bool,
    },
    /// Capture a snapshot of `index` and float it above the list.
    SnapshotBegin {
        /// Item to capture.
        index: usize,
        /// Snapshot frame.
        frame: Rect,
    },
    /// Move the snapshot.
    SnapshotMoved {
        /// New snapshot centre.
        center: Point,
    },
    /// Place the snapshot directly below the item at `z_index`.
    SnapshotRestack {
        /// Z index of the item above the snapshot.
        z_index: usize,
    },
    /// Discard the snapshot.
    SnapshotEnd,
    /// Mirror a reorder in the host's list view.
    MoveItem {
        /// Source index.
        from: usize,
        /// Destination index.
        to: usize,
    },
    /// Start the periodic autoscroll tick.
    AutoscrollStart(AutoscrollDirection),
    /// Stop the periodic autoscroll tick.
    AutoscrollStop,
    /// Apply an interactive transform to the revealed card.
    RevealedTransform {
        /// The revealed index.
        index: usize,
        /// Transform about the card centre.
        transform: CardTransform,
    },
    /// Remove the back surface from the card.
    SurfaceDetached {
        /// The surface to remove.
        surface: SurfaceId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_kinds() {
        assert_eq!(TransitionKind::Relayout.tag(), TransitionTag::Relayout);
        let flip = TransitionKind::Flip {
            index: 0,
            face: Face::Back,
            surface: SurfaceId(1),
            surface_frame: Rect::ZERO,
        };
        assert_eq!(flip.tag(), TransitionTag::Flip);
        let shift = TransitionKind::NeighborShift { index: 3, dy: -80.0 };
        assert_eq!(shift.tag(), TransitionTag::NeighborShift);
    }

    #[test]
    fn ids_debug_compactly() {
        use alloc::format;
        assert_eq!(format!("{:?}", TransitionId(7)), "TransitionId(7)");
        assert_eq!(format!("{:?}", SurfaceId(2)), "SurfaceId(2)");
    }
}
