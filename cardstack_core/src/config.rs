// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout tunables.
//!
//! [`LayoutConfig`] is a plain value. Every setter clamps its input to the
//! valid range instead of rejecting it, since these are continuously
//! adjustable visual parameters. Setting a field never triggers work on its
//! own; [`LayoutConfig::change_from`] classifies the difference between two
//! configurations so the caller decides when to relayout or reload.

/// Smallest allowed head height.
pub const MIN_HEAD_HEIGHT: f64 = 20.0;

/// Largest allowed bottom-stack size.
pub const MAX_BOTTOM_STACK_SIZE: usize = 10;

/// Largest allowed spacing between bottom-stack cards.
pub const MAX_BOTTOM_STACK_MARGIN: f64 = 20.0;

/// How much work a configuration change requires.
///
/// Variants are ordered by cost, so `max` combines two changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigChange {
    /// Nothing visible changed (gesture thresholds, snapping flags).
    None,
    /// Cached geometry must be recomputed.
    Relayout,
    /// Bottom-stack membership changed; every item must be reloaded.
    Reload,
}

/// Tunables for the card-stack layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
    first_movable_index: usize,
    head_height: f64,
    default_item_height: f64,
    expand_head_height_to_fill: bool,
    stretch_at_scroll_top: bool,
    maximum_item_height: f64,
    bottom_stack_size: usize,
    bottom_stack_should_scale: bool,
    bottom_stack_min_scale: f64,
    bottom_stack_max_scale: f64,
    bottom_stack_margin: f64,
    top_inset_for_background: f64,
    top_inset_should_snap: bool,
    bottom_inset: f64,
    autoscroll_zone_top: f64,
    autoscroll_zone_bottom: f64,
    snap_head_to_top: bool,
    stop_cards_at_top: bool,
    collapse_all: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            first_movable_index: 0,
            head_height: 80.0,
            default_item_height: 250.0,
            expand_head_height_to_fill: true,
            stretch_at_scroll_top: true,
            maximum_item_height: 0.0,
            bottom_stack_size: 5,
            bottom_stack_should_scale: true,
            bottom_stack_min_scale: 0.94,
            bottom_stack_max_scale: 1.0,
            bottom_stack_margin: 10.0,
            top_inset_for_background: 0.0,
            top_inset_should_snap: true,
            bottom_inset: 0.0,
            autoscroll_zone_top: 120.0,
            autoscroll_zone_bottom: 120.0,
            snap_head_to_top: false,
            stop_cards_at_top: true,
            collapse_all: false,
        }
    }
}

/// Clamps `v` to `[lo, hi]`, mapping NaN to `lo`.
fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

impl LayoutConfig {
    // -- getters -------------------------------------------------------------

    /// Items below this index cannot be picked up or displaced by a drag.
    #[must_use]
    pub fn first_movable_index(&self) -> usize {
        self.first_movable_index
    }

    /// Visible strip of a collapsed card.
    #[must_use]
    pub fn head_height(&self) -> f64 {
        self.head_height
    }

    /// Item height used when the collaborator does not request one.
    #[must_use]
    pub fn default_item_height(&self) -> f64 {
        self.default_item_height
    }

    /// Whether heads grow to fill the viewport when there are few items.
    #[must_use]
    pub fn expand_head_height_to_fill(&self) -> bool {
        self.expand_head_height_to_fill
    }

    /// Whether cards fan apart while overscrolling above the top.
    #[must_use]
    pub fn stretch_at_scroll_top(&self) -> bool {
        self.stretch_at_scroll_top
    }

    /// Upper bound on item height; `0` means unbounded.
    #[must_use]
    pub fn maximum_item_height(&self) -> f64 {
        self.maximum_item_height
    }

    /// Number of cards in the compressed bottom stack.
    #[must_use]
    pub fn bottom_stack_size(&self) -> usize {
        self.bottom_stack_size
    }

    /// Whether bottom-stack cards shrink with depth.
    #[must_use]
    pub fn bottom_stack_should_scale(&self) -> bool {
        self.bottom_stack_should_scale
    }

    /// Scale of the deepest bottom-stack card. Never exceeds
    /// [`bottom_stack_max_scale`](Self::bottom_stack_max_scale).
    #[must_use]
    pub fn bottom_stack_min_scale(&self) -> f64 {
        self.bottom_stack_min_scale
    }

    /// Scale of the front bottom-stack card.
    #[must_use]
    pub fn bottom_stack_max_scale(&self) -> f64 {
        self.bottom_stack_max_scale
    }

    /// Vertical spacing between bottom-stack cards.
    #[must_use]
    pub fn bottom_stack_margin(&self) -> f64 {
        self.bottom_stack_margin
    }

    /// Space reserved above the first card for a background view.
    #[must_use]
    pub fn top_inset_for_background(&self) -> f64 {
        self.top_inset_for_background
    }

    /// Whether scrolling snaps to either edge of the background area.
    #[must_use]
    pub fn top_inset_should_snap(&self) -> bool {
        self.top_inset_should_snap
    }

    /// Extra space below the last card.
    #[must_use]
    pub fn bottom_inset(&self) -> f64 {
        self.bottom_inset
    }

    /// Height of the band at the top of the viewport that triggers autoscroll.
    #[must_use]
    pub fn autoscroll_zone_top(&self) -> f64 {
        self.autoscroll_zone_top
    }

    /// Height of the band at the bottom of the viewport that triggers
    /// autoscroll.
    #[must_use]
    pub fn autoscroll_zone_bottom(&self) -> f64 {
        self.autoscroll_zone_bottom
    }

    /// Whether scrolling snaps so a card head sits at the top.
    #[must_use]
    pub fn snap_head_to_top(&self) -> bool {
        self.snap_head_to_top
    }

    /// Whether scrolled-past cards stay pinned at the top of the viewport.
    #[must_use]
    pub fn stop_cards_at_top(&self) -> bool {
        self.stop_cards_at_top
    }

    /// Whether every card is shown in the bottom stack.
    #[must_use]
    pub fn collapse_all(&self) -> bool {
        self.collapse_all
    }

    // -- setters -------------------------------------------------------------

    /// Sets the first movable index.
    pub fn set_first_movable_index(&mut self, v: usize) -> &mut Self {
        self.first_movable_index = v;
        self
    }

    /// Sets the head height, clamped to at least [`MIN_HEAD_HEIGHT`].
    pub fn set_head_height(&mut self, v: f64) -> &mut Self {
        self.head_height = clamp(v, MIN_HEAD_HEIGHT, f64::MAX);
        self
    }

    /// Sets the default item height, clamped to be non-negative.
    pub fn set_default_item_height(&mut self, v: f64) -> &mut Self {
        self.default_item_height = clamp(v, 0.0, f64::MAX);
        self
    }

    /// Enables or disables head expansion.
    pub fn set_expand_head_height_to_fill(&mut self, v: bool) -> &mut Self {
        self.expand_head_height_to_fill = v;
        self
    }

    /// Enables or disables the overscroll fan effect.
    pub fn set_stretch_at_scroll_top(&mut self, v: bool) -> &mut Self {
        self.stretch_at_scroll_top = v;
        self
    }

    /// Sets the maximum item height, clamped to be non-negative.
    pub fn set_maximum_item_height(&mut self, v: f64) -> &mut Self {
        self.maximum_item_height = clamp(v, 0.0, f64::MAX);
        self
    }

    /// Sets the bottom-stack size, clamped to [`MAX_BOTTOM_STACK_SIZE`].
    pub fn set_bottom_stack_size(&mut self, v: usize) -> &mut Self {
        self.bottom_stack_size = v.min(MAX_BOTTOM_STACK_SIZE);
        self
    }

    /// Enables or disables bottom-stack scaling.
    pub fn set_bottom_stack_should_scale(&mut self, v: bool) -> &mut Self {
        self.bottom_stack_should_scale = v;
        self
    }

    /// Sets the minimum bottom-stack scale, clamped to
    /// `[0, bottom_stack_max_scale]`.
    pub fn set_bottom_stack_min_scale(&mut self, v: f64) -> &mut Self {
        self.bottom_stack_min_scale = clamp(v, 0.0, self.bottom_stack_max_scale);
        self
    }

    /// Sets the maximum bottom-stack scale, clamped to `[0, 1]`.
    ///
    /// Lowering the maximum below the current minimum pulls the minimum down
    /// with it.
    pub fn set_bottom_stack_max_scale(&mut self, v: f64) -> &mut Self {
        self.bottom_stack_max_scale = clamp(v, 0.0, 1.0);
        if self.bottom_stack_min_scale > self.bottom_stack_max_scale {
            self.bottom_stack_min_scale = self.bottom_stack_max_scale;
        }
        self
    }

    /// Sets the bottom-stack margin, clamped to `[0, MAX_BOTTOM_STACK_MARGIN]`.
    pub fn set_bottom_stack_margin(&mut self, v: f64) -> &mut Self {
        self.bottom_stack_margin = clamp(v, 0.0, MAX_BOTTOM_STACK_MARGIN);
        self
    }

    /// Sets the background space above the first card, clamped to be
    /// non-negative.
    pub fn set_top_inset_for_background(&mut self, v: f64) -> &mut Self {
        self.top_inset_for_background = clamp(v, 0.0, f64::MAX);
        self
    }

    /// Enables or disables background-area snapping.
    pub fn set_top_inset_should_snap(&mut self, v: bool) -> &mut Self {
        self.top_inset_should_snap = v;
        self
    }

    /// Sets the space below the last card, clamped to be non-negative.
    pub fn set_bottom_inset(&mut self, v: f64) -> &mut Self {
        self.bottom_inset = clamp(v, 0.0, f64::MAX);
        self
    }

    /// Sets the top autoscroll zone, clamped to be non-negative.
    pub fn set_autoscroll_zone_top(&mut self, v: f64) -> &mut Self {
        self.autoscroll_zone_top = clamp(v, 0.0, f64::MAX);
        self
    }

    /// Sets the bottom autoscroll zone, clamped to be non-negative.
    pub fn set_autoscroll_zone_bottom(&mut self, v: f64) -> &mut Self {
        self.autoscroll_zone_bottom = clamp(v, 0.0, f64::MAX);
        self
    }

    /// Enables or disables head snapping.
    pub fn set_snap_head_to_top(&mut self, v: bool) -> &mut Self {
        self.snap_head_to_top = v;
        self
    }

    /// Enables or disables pinning scrolled-past cards at the top.
    pub fn set_stop_cards_at_top(&mut self, v: bool) -> &mut Self {
        self.stop_cards_at_top = v;
        self
    }

    /// Enables or disables collapse-all mode.
    ///
    /// Prefer [`CardStack::set_config`](crate::CardStack::set_config) for live
    /// toggles; it also performs the flip-back and unreveal notifications.
    pub fn set_collapse_all(&mut self, v: bool) -> &mut Self {
        self.collapse_all = v;
        self
    }

    // -- change classification -----------------------------------------------

    /// Classifies the work needed to move from `old` to `self`.
    #[must_use]
    pub fn change_from(&self, old: &Self) -> ConfigChange {
        if self == old {
            return ConfigChange::None;
        }
        if self.bottom_stack_size != old.bottom_stack_size
            || self.collapse_all != old.collapse_all
        {
            return ConfigChange::Reload;
        }
        let visual = self.head_height != old.head_height
            || self.default_item_height != old.default_item_height
            || self.expand_head_height_to_fill != old.expand_head_height_to_fill
            || self.stretch_at_scroll_top != old.stretch_at_scroll_top
            || self.maximum_item_height != old.maximum_item_height
            || self.bottom_stack_should_scale != old.bottom_stack_should_scale
            || self.bottom_stack_min_scale != old.bottom_stack_min_scale
            || self.bottom_stack_max_scale != old.bottom_stack_max_scale
            || self.bottom_stack_margin != old.bottom_stack_margin
            || self.top_inset_for_background != old.top_inset_for_background
            || self.bottom_inset != old.bottom_inset
            || self.stop_cards_at_top != old.stop_cards_at_top;
        if visual {
            ConfigChange::Relayout
        } else {
            ConfigChange::None
        }
    }
}
