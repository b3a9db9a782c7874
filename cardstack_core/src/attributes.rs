// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-item layout attributes.
//!
//! [`AttributeGenerator`] is a pure function of the scroll state, the item
//! count, the configuration and the interaction state. Each index falls into
//! exactly one branch:
//!
//! - **stacked**: nothing revealed and not collapsed; cards overlap by the
//!   head height and react to scrolling.
//! - **revealed**: the revealed card, full height at the top of the viewport.
//! - **bottom**: everything else; bottom-stack members are piled up and
//!   scaled, the rest are hidden.

use alloc::vec::Vec;
use core::ops::Range;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::bottom_stack::{BottomStack, ScaleLaw};
use crate::config::LayoutConfig;
use crate::delegate::CardDelegate;
use crate::geometry::{CardTransform, Insets, Point, Rect, Size, Vec2, intersects};

/// Added to the revealed card's y so it never exactly equals a previous
/// value, which some animators treat as "no change".
pub const REVEALED_EPSILON: f64 = 0.01;

/// Recycling guard: hidden cards this many heads above the first visible
/// card are parked off-screen.
const PARK_DISTANCE: f64 = 5.0;

/// Fan-out factor per index while overscrolling above the top.
const STRETCH_PER_INDEX: f64 = -0.2;

// ---------------------------------------------------------------------------
// LayoutAttributes
// ---------------------------------------------------------------------------

/// Geometry and visibility for one item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutAttributes {
    /// Item index.
    pub index: usize,
    /// Unscaled frame in content coordinates.
    pub frame: Rect,
    /// Uniform scale applied about the frame centre.
    pub scale: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Whether the item should not be drawn at all.
    pub hidden: bool,
    /// Draw order; equal to the item's position in the backing list.
    pub z_index: usize,
    /// Whether this is the revealed item.
    pub is_revealed: bool,
}

impl LayoutAttributes {
    /// Creates visible, unscaled attributes at `frame`.
    #[must_use]
    pub fn new(index: usize, frame: Rect) -> Self {
        Self {
            index,
            frame,
            scale: 1.0,
            alpha: 1.0,
            hidden: false,
            z_index: index,
            is_revealed: false,
        }
    }

    /// The transform to apply about the frame centre.
    #[must_use]
    pub fn transform(&self) -> CardTransform {
        CardTransform::from_scale(self.scale)
    }

    /// The on-screen rectangle once [`transform`](Self::transform) is applied.
    #[must_use]
    pub fn visual_frame(&self) -> Rect {
        self.transform().apply_to_frame(self.frame)
    }

    /// Returns `true` if the item can receive touches.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        !self.hidden && self.alpha > 0.01
    }
}

// ---------------------------------------------------------------------------
// ScrollView
// ---------------------------------------------------------------------------

/// The host scroll view's state, supplied on every pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollView {
    /// Viewport size.
    pub viewport: Size,
    /// Raw vertical content offset.
    pub offset_y: f64,
    /// Content insets (`x0` left, `y0` top, `x1` right, `y1` bottom).
    pub insets: Insets,
}

impl ScrollView {
    /// Creates a scroll view with zero insets.
    #[must_use]
    pub fn new(viewport: Size, offset_y: f64) -> Self {
        Self {
            viewport,
            offset_y,
            insets: Insets::ZERO,
        }
    }

    /// Scroll offset measured from the top inset.
    #[must_use]
    pub fn content_offset_top(&self) -> f64 {
        self.offset_y + self.insets.y0
    }

    /// Visible rectangle in content coordinates.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(Point::new(0.0, self.offset_y), self.viewport)
    }

    /// Width available to items.
    #[must_use]
    pub fn item_width(&self) -> f64 {
        self.viewport.width - self.insets.x0 - self.insets.x1
    }
}

/// Resolves the size of an item from the delegate and configuration.
#[must_use]
pub fn item_size(
    config: &LayoutConfig,
    scroll: &ScrollView,
    delegate: &dyn CardDelegate,
    index: usize,
) -> Size {
    if let Some(size) = delegate.requested_size(index) {
        return size;
    }
    let mut height = delegate
        .requested_height(index)
        .unwrap_or(config.default_item_height());
    if config.maximum_item_height() > 0.0 {
        height = height.min(config.maximum_item_height());
    }
    Size::new(scroll.item_width(), height)
}

// ---------------------------------------------------------------------------
// AttributeGenerator
// ---------------------------------------------------------------------------

/// Everything the generator reads.
#[derive(Clone, Copy, Debug)]
pub struct LayoutInput<'a> {
    /// Layout tunables.
    pub config: &'a LayoutConfig,
    /// Scroll state. The bottom inset should already reflect any freeze.
    pub scroll: ScrollView,
    /// Number of items.
    pub item_count: usize,
    /// The revealed index, if any.
    pub revealed: Option<usize>,
    /// The index whose live view is hidden behind a drag snapshot.
    pub dragged: Option<usize>,
    /// Pending scroll correction from inserts and deletes.
    pub scroll_shift: f64,
    /// Current bottom-stack membership.
    pub bottom: &'a BottomStack,
}

/// Produces [`LayoutAttributes`] for individual indices.
#[derive(Debug)]
pub struct AttributeGenerator<'a> {
    input: LayoutInput<'a>,
    head_height: f64,
    bottom_count: usize,
    scale_law: ScaleLaw,
}

impl<'a> AttributeGenerator<'a> {
    /// Prepares a generator for one layout pass.
    #[must_use]
    pub fn new(input: LayoutInput<'a>) -> Self {
        let bottom_count = input
            .bottom
            .visible_count(input.item_count, input.config.bottom_stack_size());
        Self {
            head_height: effective_head_height(input.config, &input.scroll, input.item_count),
            bottom_count,
            scale_law: ScaleLaw::new(input.config, bottom_count),
            input,
        }
    }

    /// Head height after expand-to-fill.
    #[must_use]
    pub fn head_height(&self) -> f64 {
        self.head_height
    }

    /// Number of cards laid out in the bottom stack.
    #[must_use]
    pub fn bottom_count(&self) -> usize {
        self.bottom_count
    }

    /// The scale law for this pass.
    #[must_use]
    pub fn scale_law(&self) -> &ScaleLaw {
        &self.scale_law
    }

    /// Computes attributes for one index.
    #[must_use]
    pub fn generate(&self, index: usize, size: Size) -> LayoutAttributes {
        let collapse = self.input.config.collapse_all();
        match self.input.revealed {
            None if !collapse => self.stacked(index, size),
            Some(r) if r == index && !collapse => self.revealed(index, size),
            _ => self.bottom(index, size),
        }
    }

    /// Computes attributes for every index in `range`.
    pub fn generate_range(
        &self,
        range: Range<usize>,
        mut size_of: impl FnMut(usize) -> Size,
    ) -> Vec<LayoutAttributes> {
        range.map(|i| self.generate(i, size_of(i))).collect()
    }

    fn stacked(&self, index: usize, size: Size) -> LayoutAttributes {
        let config = self.input.config;
        let head = self.head_height;
        let top = config.top_inset_for_background();
        let cot = self.input.scroll.content_offset_top();
        let start = ((cot + self.input.scroll_shift - top) / head).floor();
        let i = index as f64;

        let natural = Rect::from_origin_size(Point::new(0.0, top + head * i), size);
        let mut attr = LayoutAttributes::new(index, natural);
        if self.input.dragged == Some(index) {
            attr.alpha = 0.0;
        }

        // Between 0 and the background inset the natural position holds.
        if cot > top {
            let stop = config.stop_cards_at_top();
            attr.hidden = stop && i < start;
            if self.input.dragged == Some(index + 1) {
                attr.hidden = false;
            }
            let pinned = stop && ((index != 0 && i <= start) || (index == 0 && cot - top > 0.0));
            if pinned {
                attr.frame = natural.with_origin(Point::new(0.0, cot));
            }
            if attr.hidden && i < start - PARK_DISTANCE {
                let parked = self.input.scroll.viewport.height * -1.5;
                attr.frame = natural.with_origin(Point::new(0.0, parked));
            }
        } else if cot < 0.0 && config.stretch_at_scroll_top() {
            let stretch = 1.0 + i * STRETCH_PER_INDEX;
            attr.frame = natural + Vec2::new(0.0, cot * stretch);
        }
        attr
    }

    fn revealed(&self, index: usize, size: Size) -> LayoutAttributes {
        let cot = self.input.scroll.content_offset_top();
        let y = if self.input.item_count == 1 {
            cot + self.input.config.top_inset_for_background() + REVEALED_EPSILON
        } else {
            cot + REVEALED_EPSILON
        };
        let mut attr = LayoutAttributes::new(index, Rect::from_origin_size(Point::new(0.0, y), size));
        attr.is_revealed = true;
        attr
    }

    fn bottom(&self, index: usize, size: Size) -> LayoutAttributes {
        let config = self.input.config;
        let scroll = &self.input.scroll;
        let natural = Rect::from_origin_size(
            Point::new(0.0, config.head_height() * index as f64),
            size,
        );
        let mut attr = LayoutAttributes::new(index, natural);

        if let Some(slot) = self.input.bottom.slot_of(index) {
            let margin = config.bottom_stack_margin();
            let baseline = scroll.viewport.height + scroll.offset_y
                - scroll.insets.y1
                - margin * self.bottom_count as f64;
            let scale = self.scale_law.scale_for_slot(slot, false);
            let centering = (size.height - size.height * scale) / 2.0;
            let y = baseline + slot as f64 * margin - centering;
            attr.frame = natural.with_origin(Point::new(0.0, y));
            attr.scale = scale;
        } else {
            attr.hidden = true;
            attr.alpha = 0.0;
            if intersects(scroll.visible_rect(), natural) {
                let below = scroll.offset_y + scroll.viewport.height;
                attr.frame = natural.with_origin(Point::new(0.0, below));
            }
        }
        attr
    }
}

/// Head height after expand-to-fill.
#[must_use]
pub fn effective_head_height(config: &LayoutConfig, scroll: &ScrollView, item_count: usize) -> f64 {
    let head = config.head_height();
    if !config.expand_head_height_to_fill() || item_count == 0 {
        return head;
    }
    let available = scroll.viewport.height
        - (scroll.insets.y0 + scroll.insets.y1 + config.top_inset_for_background());
    head.max(available / item_count as f64)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bottom_stack::{BottomStackInput, select};
    use crate::delegate::NoopDelegate;

    const VIEW: Size = Size::new(320.0, 600.0);
    const CARD: Size = Size::new(320.0, 250.0);

    fn config_without_expand() -> LayoutConfig {
        let mut c = LayoutConfig::default();
        c.set_expand_head_height_to_fill(false);
        c
    }

    fn run(
        config: &LayoutConfig,
        scroll: ScrollView,
        n: usize,
        revealed: Option<usize>,
        dragged: Option<usize>,
    ) -> Vec<LayoutAttributes> {
        let bottom = select(&BottomStackInput::new(
            config,
            revealed,
            n,
            scroll.content_offset_top(),
            0.0,
        ));
        let generator = AttributeGenerator::new(LayoutInput {
            config,
            scroll,
            item_count: n,
            revealed,
            dragged,
            scroll_shift: 0.0,
            bottom: &bottom,
        });
        generator.generate_range(0..n, |_| CARD)
    }

    #[test]
    fn every_index_gets_contiguous_z() {
        let config = LayoutConfig::default();
        for n in [0, 1, 4, 17] {
            for revealed in [None, Some(0)] {
                let revealed = revealed.filter(|_| n > 0);
                let attrs = run(&config, ScrollView::new(VIEW, 40.0), n, revealed, None);
                assert_eq!(attrs.len(), n);
                for (i, a) in attrs.iter().enumerate() {
                    assert_eq!(a.z_index, i);
                    assert_eq!(a.index, i);
                }
            }
        }
    }

    #[test]
    fn stacked_at_rest_uses_natural_positions() {
        let config = config_without_expand();
        let attrs = run(&config, ScrollView::new(VIEW, 0.0), 6, None, None);
        for (i, a) in attrs.iter().enumerate() {
            assert_eq!(a.frame.y0, 80.0 * i as f64);
            assert!(!a.hidden);
            assert!(!a.is_revealed);
            assert_eq!(a.frame.size(), CARD);
        }
    }

    #[test]
    fn expand_fills_viewport_with_few_items() {
        let config = LayoutConfig::default();
        let attrs = run(&config, ScrollView::new(VIEW, 0.0), 3, None, None);
        assert_eq!(attrs[1].frame.y0, 200.0);
        assert_eq!(attrs[2].frame.y0, 400.0);
    }

    #[test]
    fn scrolled_cards_pin_at_top() {
        let config = config_without_expand();
        // Offset 250 => start index 3.
        let attrs = run(&config, ScrollView::new(VIEW, 250.0), 20, None, None);
        assert_eq!(attrs[0].frame.y0, 250.0);
        assert!(attrs[0].hidden);
        assert_eq!(attrs[2].frame.y0, 250.0);
        assert!(attrs[2].hidden);
        // The start card is pinned but still visible.
        assert_eq!(attrs[3].frame.y0, 250.0);
        assert!(!attrs[3].hidden);
        assert_eq!(attrs[4].frame.y0, 320.0);
    }

    #[test]
    fn far_hidden_cards_are_parked_above() {
        let config = config_without_expand();
        // Offset 800 => start index 10.
        let attrs = run(&config, ScrollView::new(VIEW, 800.0), 20, None, None);
        assert_eq!(attrs[2].frame.y0, -900.0);
        assert_eq!(attrs[7].frame.y0, 800.0);
    }

    #[test]
    fn card_above_dragged_stays_visible() {
        let config = config_without_expand();
        let attrs = run(&config, ScrollView::new(VIEW, 250.0), 20, None, Some(3));
        assert!(!attrs[2].hidden);
        assert_eq!(attrs[3].alpha, 0.0);
    }

    #[test]
    fn without_stop_at_top_cards_scroll_away() {
        let mut config = config_without_expand();
        config.set_stop_cards_at_top(false);
        let attrs = run(&config, ScrollView::new(VIEW, 250.0), 20, None, None);
        assert_eq!(attrs[0].frame.y0, 0.0);
        assert!(!attrs[0].hidden);
    }

    #[test]
    fn overscroll_fans_cards_out() {
        let config = config_without_expand();
        let attrs = run(&config, ScrollView::new(VIEW, -100.0), 4, None, None);
        assert_eq!(attrs[0].frame.y0, -100.0);
        assert!((attrs[1].frame.y0 - (80.0 - 80.0)).abs() < 1e-9);
        assert!((attrs[2].frame.y0 - (160.0 - 60.0)).abs() < 1e-9);

        let mut flat = config;
        flat.set_stretch_at_scroll_top(false);
        let attrs = run(&flat, ScrollView::new(VIEW, -100.0), 4, None, None);
        assert_eq!(attrs[2].frame.y0, 160.0);
    }

    #[test]
    fn revealed_card_sits_at_offset() {
        let config = config_without_expand();
        let attrs = run(&config, ScrollView::new(VIEW, 120.0), 10, Some(4), None);
        let revealed: Vec<_> = attrs.iter().filter(|a| a.is_revealed).collect();
        assert_eq!(revealed.len(), 1);
        assert_eq!(revealed[0].index, 4);
        assert!((revealed[0].frame.y0 - 120.01).abs() < 1e-9);
        assert_eq!(revealed[0].frame.height(), 250.0);
    }

    #[test]
    fn single_revealed_card_respects_background_inset() {
        let mut config = config_without_expand();
        config.set_top_inset_for_background(40.0);
        let attrs = run(&config, ScrollView::new(VIEW, 0.0), 1, Some(0), None);
        assert!((attrs[0].frame.y0 - 40.01).abs() < 1e-9);
    }

    #[test]
    fn bottom_stack_is_piled_and_scaled() {
        let config = config_without_expand();
        let attrs = run(&config, ScrollView::new(VIEW, 0.0), 10, Some(2), None);
        // Members {0, 1, 3, 4, 5}; baseline = 600 - 0 - 10 * 5 = 550.
        let members = [0usize, 1, 3, 4, 5];
        for (slot, &i) in members.iter().enumerate() {
            let a = &attrs[i];
            assert!(!a.hidden, "member {i} hidden");
            let scale = 1.0 - (4 - slot) as f64 * 0.012;
            assert!((a.scale - scale).abs() < 1e-12, "member {i} scale {}", a.scale);
            let y = 550.0 + slot as f64 * 10.0 - (250.0 - 250.0 * scale) / 2.0;
            assert!((a.frame.y0 - y).abs() < 1e-9, "member {i} y {}", a.frame.y0);
        }
        // Non-members near the viewport are parked just below it.
        assert!(attrs[6].hidden);
        assert_eq!(attrs[6].alpha, 0.0);
        assert_eq!(attrs[6].frame.y0, 600.0);
        // Non-members far away keep their natural position.
        assert!(attrs[9].hidden);
        assert_eq!(attrs[9].frame.y0, 720.0);
    }

    #[test]
    fn bottom_members_exclude_revealed() {
        let config = config_without_expand();
        let attrs = run(&config, ScrollView::new(VIEW, 0.0), 10, Some(2), None);
        assert_eq!(attrs.iter().filter(|a| a.is_revealed).count(), 1);
        assert!(attrs[2].is_revealed);
        assert_eq!(attrs[2].scale, 1.0);
    }

    #[test]
    fn collapse_all_has_no_revealed_card() {
        let mut config = config_without_expand();
        config.set_collapse_all(true);
        let attrs = run(&config, ScrollView::new(VIEW, 0.0), 10, None, None);
        assert!(attrs.iter().all(|a| !a.is_revealed));
        assert!((0..5).all(|i| !attrs[i].hidden));
        assert!((5..10).all(|i| attrs[i].hidden));
    }

    #[test]
    fn item_size_prefers_delegate_then_clamps() {
        struct Tall;
        impl CardDelegate for Tall {
            fn requested_height(&self, _index: usize) -> Option<f64> {
                Some(900.0)
            }
        }
        let mut config = LayoutConfig::default();
        let mut scroll = ScrollView::new(VIEW, 0.0);
        scroll.insets = Insets::new(10.0, 0.0, 10.0, 0.0);
        assert_eq!(
            item_size(&config, &scroll, &NoopDelegate, 0),
            Size::new(300.0, 250.0)
        );
        assert_eq!(item_size(&config, &scroll, &Tall, 0).height, 900.0);
        config.set_maximum_item_height(500.0);
        assert_eq!(item_size(&config, &scroll, &Tall, 0).height, 500.0);
    }

    #[test]
    fn visual_frame_and_interactivity() {
        let mut a = LayoutAttributes::new(0, Rect::new(0.0, 0.0, 100.0, 100.0));
        a.scale = 0.5;
        assert_eq!(a.visual_frame(), Rect::new(25.0, 25.0, 75.0, 75.0));
        assert!(a.is_interactive());
        a.alpha = 0.0;
        assert!(!a.is_interactive());
    }
}
