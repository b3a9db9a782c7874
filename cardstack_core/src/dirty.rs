// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Every layout pass diffs freshly generated attributes against the cache
//! and marks the affected indices (via [`understory_dirty`]) on one channel
//! per category of change. Reorder steps mark [`MOVED`] as they happen.
//!
//! All channels are local-only: an item's attributes never depend on
//! another item's dirtiness, so no dependency edges are registered.
//!
//! # Consumption
//!
//! [`CardStack::prepare`](crate::CardStack::prepare) drains every channel
//! and surfaces the results as [`LayoutChanges`](crate::LayoutChanges), so
//! hosts only touch the views that changed.

use understory_dirty::Channel;

/// Frame or scale changed.
pub const FRAME: Channel = Channel::new(0);

/// Hidden flag or alpha changed.
pub const VISIBILITY: Channel = Channel::new(1);

/// The revealed flag changed.
pub const REVEAL: Channel = Channel::new(2);

/// The item moved to a new index during a reorder.
pub const MOVED: Channel = Channel::new(3);
