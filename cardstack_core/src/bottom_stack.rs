// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bottom-stack membership and scaling.
//!
//! When a card is revealed (or every card is collapsed) the remaining cards
//! are drawn as a compressed pile at the bottom of the viewport. [`select`]
//! decides which indices form that pile; [`ScaleLaw`] decides how much each
//! one shrinks.
//!
//! # Window selection
//!
//! With a card revealed at `R` and a stack size `S`, the candidate window is
//! `[R - S/2, R + S/2]`. The window is then shifted to fit inside the list:
//!
//! - clipped at the low end: it starts at 0 and grows at the high end by the
//!   clipped amount, plus one more when `S` is odd;
//! - clipped at the high end: it ends at `N - 1` and starts at
//!   `N - 2*(S/2) - 1`, one lower when `S` is odd;
//! - unclipped with `S` odd: it grows by one at the low end, or at the high
//!   end if the low end is already 0.
//!
//! After a final clamp to `[0, N - 1]`, `R` itself is removed. The two
//! boundary rules are deliberately asymmetric; the sweep test below pins the
//! exact membership.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::LayoutConfig;

/// Inputs for [`select`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BottomStackInput {
    /// The revealed index, if any.
    pub revealed: Option<usize>,
    /// Number of items in the list.
    pub item_count: usize,
    /// Configured bottom-stack size.
    pub stack_size: usize,
    /// Whether collapse-all mode is on.
    pub collapse_all: bool,
    /// Scroll offset measured from the top content inset.
    pub content_offset_top: f64,
    /// Configured head height.
    pub head_height: f64,
    /// Pending scroll correction from inserts and deletes.
    pub scroll_shift: f64,
}

impl BottomStackInput {
    /// Builds an input from a configuration and the current state.
    #[must_use]
    pub fn new(
        config: &LayoutConfig,
        revealed: Option<usize>,
        item_count: usize,
        content_offset_top: f64,
        scroll_shift: f64,
    ) -> Self {
        Self {
            revealed,
            item_count,
            stack_size: config.bottom_stack_size(),
            collapse_all: config.collapse_all(),
            content_offset_top,
            head_height: config.head_height(),
            scroll_shift,
        }
    }
}

/// The indices drawn in the bottom stack, in ascending order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BottomStack {
    indices: Vec<usize>,
    revealed_rank: usize,
}

impl BottomStack {
    /// Member indices, ascending.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Offset of the revealed index from the start of the selection window.
    ///
    /// Zero when nothing is revealed.
    #[must_use]
    pub fn revealed_rank(&self) -> usize {
        self.revealed_rank
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if there are no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Returns `true` if `index` is a member.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Position of `index` within the stack, `0` being the deepest card.
    #[must_use]
    pub fn slot_of(&self, index: usize) -> Option<usize> {
        self.indices.binary_search(&index).ok()
    }

    /// Number of cards actually laid out in the stack: the smallest of the
    /// item count, the configured size, and the member count.
    #[must_use]
    pub fn visible_count(&self, item_count: usize, stack_size: usize) -> usize {
        item_count.min(stack_size).min(self.indices.len())
    }
}

/// Chooses the bottom-stack members.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "collapse start is floored and clamped to be non-negative before the cast"
)]
pub fn select(input: &BottomStackInput) -> BottomStack {
    let n = input.item_count;
    let Some(revealed) = input.revealed else {
        if !input.collapse_all || n == 0 || input.stack_size == 0 {
            return BottomStack::default();
        }
        let start = ((input.content_offset_top + input.scroll_shift) / input.head_height)
            .floor()
            .max(0.0) as usize;
        let end = start.saturating_add(input.stack_size).min(n);
        return BottomStack {
            indices: (start.min(n)..end).collect(),
            revealed_rank: 0,
        };
    };

    if n == 0 {
        return BottomStack::default();
    }

    let count = n as isize;
    let r = revealed as isize;
    let half = (input.stack_size / 2) as isize;
    let odd = input.stack_size % 2 == 1;

    let mut lo = r - half;
    let mut hi = r + half;
    if lo < 0 {
        lo = 0;
        hi = r + half + (r - half).abs();
        if odd {
            hi += 1;
        }
    } else if hi >= count {
        lo = count - 2 * half - 1;
        hi = count - 1;
        if odd {
            lo -= 1;
        }
    } else if odd {
        if lo > 0 {
            lo -= 1;
        } else {
            hi += 1;
        }
    }
    let lo = lo.max(0);
    let hi = hi.min(count - 1);

    let indices = (lo..=hi)
        .filter(|&i| i != r)
        .map(|i| i as usize)
        .collect();
    BottomStack {
        indices,
        revealed_rank: (r - lo).max(0) as usize,
    }
}

/// Per-card scale for bottom-stack members.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLaw {
    enabled: bool,
    max_scale: f64,
    per_card: f64,
    visible_count: usize,
}

impl ScaleLaw {
    /// Builds the law for a stack that currently lays out `visible_count`
    /// cards.
    #[must_use]
    pub fn new(config: &LayoutConfig, visible_count: usize) -> Self {
        let max_scale = config.bottom_stack_max_scale();
        let min_scale = config.bottom_stack_min_scale().min(max_scale);
        let size = config.bottom_stack_size();
        let per_card = if size == 0 {
            0.0
        } else {
            (max_scale - min_scale) / size as f64
        };
        Self {
            enabled: config.bottom_stack_should_scale(),
            max_scale,
            per_card,
            visible_count,
        }
    }

    /// Scale decrement between neighbouring cards.
    #[must_use]
    pub fn scale_per_card(&self) -> f64 {
        self.per_card
    }

    /// Scale for the card at stack `slot` (`0` = deepest).
    ///
    /// `behind` applies one extra step of shrink, used while the revealed
    /// card is being dragged back onto the pile; it only applies to slots
    /// inside the visible stack.
    #[must_use]
    pub fn scale_for_slot(&self, slot: usize, behind: bool) -> f64 {
        if !self.enabled {
            return 1.0;
        }
        let depth = self.visible_count as f64 - 1.0 - slot as f64;
        let extra = if behind && slot < self.visible_count {
            self.per_card
        } else {
            0.0
        };
        (self.max_scale - depth * self.per_card - extra).min(1.0)
    }
}
