// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The collaborator interface.
//!
//! [`CardDelegate`] is how the engine talks back to whoever owns the item
//! data. Every method has a default: vetoes allow, notifications do nothing,
//! size queries defer to the configuration. Hooks are called synchronously
//! and must not block.

use crate::geometry::Size;

/// Callbacks from the engine to the item owner.
pub trait CardDelegate {
    /// Overrides both width and height of an item.
    fn requested_size(&self, index: usize) -> Option<Size> {
        _ = index;
        None
    }

    /// Overrides the height of an item. Ignored when
    /// [`requested_size`](Self::requested_size) returns a value.
    fn requested_height(&self, index: usize) -> Option<f64> {
        _ = index;
        None
    }

    /// Returns `false` to veto revealing `index`.
    fn can_reveal(&self, index: usize) -> bool {
        _ = index;
        true
    }

    /// Returns `false` to veto unrevealing `index`.
    fn can_unreveal(&self, index: usize) -> bool {
        _ = index;
        true
    }

    /// Called before the reveal relayout starts.
    fn will_reveal(&mut self, index: usize) {
        _ = index;
    }

    /// Called once the reveal transition has finished.
    fn did_reveal(&mut self, index: usize) {
        _ = index;
    }

    /// Called before the unreveal relayout starts.
    fn will_unreveal(&mut self, index: usize) {
        _ = index;
    }

    /// Called once the unreveal transition has finished.
    fn did_unreveal(&mut self, index: usize) {
        _ = index;
    }

    /// Moves the item at `from` to `to` in the backing list.
    ///
    /// Must be applied synchronously so the backing order keeps matching
    /// the engine's z-order.
    fn move_item(&mut self, from: usize, to: usize) {
        _ = (from, to);
    }

    /// Called when a tap lands on `index`.
    fn did_select(&mut self, index: usize) {
        _ = index;
    }
}

/// A [`CardDelegate`] that accepts every default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDelegate;

impl CardDelegate for NoopDelegate {}
