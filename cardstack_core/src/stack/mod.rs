// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The card-stack engine.
//!
//! [`CardStack`] owns the configuration, the interaction state and the
//! attribute cache. The host drives it with three kinds of input:
//!
//! - **layout passes**: [`prepare`](CardStack::prepare) with the current
//!   scroll state and item count, returning the indices whose attributes
//!   changed;
//! - **commands and gestures**: reveal, unreveal, flip, drag phases, taps,
//!   autoscroll ticks, insert and delete notifications;
//! - **transition completions**: [`finish_transition`](CardStack::finish_transition).
//!
//! Everything the host must do in response is queued as an
//! [`Effect`](crate::Effect) and collected with
//! [`take_effects`](CardStack::take_effects).

mod drag;
mod reveal;
mod transition;

#[cfg(test)]
mod harness;

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use understory_dirty::{CycleHandling, DirtyTracker};

use crate::attributes::{AttributeGenerator, LayoutAttributes, LayoutInput, ScrollView, item_size};
use crate::bottom_stack::{BottomStack, BottomStackInput, select};
use crate::config::{ConfigChange, LayoutConfig};
use crate::delegate::CardDelegate;
use crate::dirty;
use crate::effect::Effect;
use crate::geometry::{Point, Rect, Size, intersects};
use crate::gesture::{self, GestureKind};
use crate::state::{DragState, InteractionState};
use crate::trace::{LayoutPassEvent, TraceRecord, Tracer};

pub use reveal::completion;
pub use transition::Completion;
use transition::{Pending, Step};

/// Indices regenerated before the first visible head.
const WINDOW_BEFORE: f64 = 10.0;

/// Indices regenerated after the last visible head.
const WINDOW_AFTER: f64 = 5.0;

/// Scale applied to items animating out after a delete.
const DISAPPEARING_SCALE: f64 = 0.001;

// ---------------------------------------------------------------------------
// LayoutChanges
// ---------------------------------------------------------------------------

/// The set of changes produced by a single [`CardStack::prepare`] call.
///
/// Each field lists item indices, ascending. Hosts use them to update only
/// the views that changed.
#[derive(Clone, Debug, Default)]
pub struct LayoutChanges {
    /// Items whose frame or scale changed.
    pub frames: Vec<usize>,
    /// Items whose hidden flag or alpha changed.
    pub visibility: Vec<usize>,
    /// Items that became or stopped being the revealed item.
    pub reveal: Vec<usize>,
    /// Items moved by reorder swaps since the last pass.
    pub moved: Vec<usize>,
    /// Whether every item was regenerated.
    pub reloaded: bool,
}

impl LayoutChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.visibility.clear();
        self.reveal.clear();
        self.moved.clear();
        self.reloaded = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.reloaded
            && self.frames.is_empty()
            && self.visibility.is_empty()
            && self.reveal.is_empty()
            && self.moved.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CardStack
// ---------------------------------------------------------------------------

/// Layout and interaction engine for a vertical stack of cards.
pub struct CardStack {
    config: LayoutConfig,
    state: InteractionState,
    scroll: ScrollView,
    item_count: usize,

    // -- Attribute cache --
    cache: Vec<LayoutAttributes>,
    cache_valid: bool,
    pending_reload: bool,
    bottom: BottomStack,
    bottom_count: usize,
    dirty: DirtyTracker<u32>,
    disappearing: Vec<LayoutAttributes>,

    // -- Host protocol --
    effects: Vec<Effect>,
    queue: VecDeque<Step>,
    pending: Vec<Pending>,
    blocking: Option<crate::effect::TransitionId>,
    next_transition: u64,

    // -- Diagnostics --
    trace_seq: u64,
    trace_log: Vec<TraceRecord>,
}

impl fmt::Debug for CardStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardStack")
            .field("item_count", &self.item_count)
            .field("state", &self.state)
            .field("queued", &self.queue.len())
            .field("pending", &self.pending.len())
            .field("blocking", &self.blocking)
            .finish_non_exhaustive()
    }
}

impl Default for CardStack {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl CardStack {
    /// Creates an engine with no items.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            state: InteractionState::default(),
            scroll: ScrollView::new(Size::ZERO, 0.0),
            item_count: 0,
            cache: Vec::new(),
            cache_valid: false,
            pending_reload: false,
            bottom: BottomStack::default(),
            bottom_count: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            disappearing: Vec::new(),
            effects: Vec::new(),
            queue: VecDeque::new(),
            pending: Vec::new(),
            blocking: None,
            next_transition: 0,
            trace_seq: 0,
            trace_log: Vec::new(),
        }
    }

    /// The current configuration.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replaces the configuration and reports what the change requires.
    ///
    /// The matching [`Effect::Invalidate`] is queued. Toggling collapse-all
    /// additionally runs the collapse sequence: the revealed card is flipped
    /// back and unrevealed, scrolling is disabled while collapsed, and the
    /// whole stack relayouts.
    pub fn set_config(&mut self, config: LayoutConfig, delegate: &mut dyn CardDelegate) -> ConfigChange {
        let change = config.change_from(&self.config);
        let collapse_toggled = config.collapse_all() != self.config.collapse_all();
        self.config = config;
        if collapse_toggled {
            self.pending_reload = true;
            self.queue.push_back(Step::Collapse);
            self.pump(delegate);
            return change;
        }
        match change {
            ConfigChange::None => {}
            ConfigChange::Relayout => {
                // Geometry outside the visible window is stale too.
                self.pending_reload = true;
                self.invalidate(false);
            }
            ConfigChange::Reload => self.invalidate(true),
        }
        change
    }

    /// Read-only view of the interaction state.
    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Item count seen by the last layout pass.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Scroll state seen by the last layout pass, including engine-driven
    /// offset changes since then.
    #[must_use]
    pub fn scroll(&self) -> &ScrollView {
        &self.scroll
    }

    /// Bottom-stack membership computed by the last layout pass.
    #[must_use]
    pub fn bottom_stack(&self) -> &BottomStack {
        &self.bottom
    }

    // -- Layout pass --

    /// Runs a layout pass and returns the changes.
    pub fn prepare(
        &mut self,
        scroll: ScrollView,
        item_count: usize,
        delegate: &dyn CardDelegate,
    ) -> LayoutChanges {
        let mut changes = LayoutChanges::default();
        self.prepare_into(scroll, item_count, delegate, &mut changes);
        changes
    }

    /// Like [`prepare`](Self::prepare), but reuses a caller-provided buffer
    /// to avoid allocation.
    ///
    /// While an editor has focus the bottom inset of `scroll` is replaced by
    /// the value seen when focus was gained. When nothing is revealed, the
    /// pending scroll correction from inserts and deletes is folded into the
    /// offset and emitted as [`Effect::ScrollTo`].
    pub fn prepare_into(
        &mut self,
        mut scroll: ScrollView,
        item_count: usize,
        delegate: &dyn CardDelegate,
        changes: &mut LayoutChanges,
    ) {
        changes.clear();

        if let Some(bottom) = self.state.frozen_bottom_inset {
            scroll.insets.y1 = bottom;
        }
        if item_count != self.item_count {
            self.pending_reload = true;
        }
        self.item_count = item_count;
        if self.state.revealed.is_some_and(|r| r >= item_count) {
            self.state.clear_revealed();
            self.state.pan_listener = None;
        }
        if self.state.revealed.is_none() && !self.config.collapse_all() && self.state.scroll_shift != 0.0 {
            scroll.offset_y += self.state.scroll_shift;
            self.state.scroll_shift = 0.0;
            self.effects.push(Effect::ScrollTo {
                offset_y: scroll.offset_y,
            });
        }
        self.scroll = scroll;
        if matches!(self.state.drag, DragState::Cancelled) {
            self.state.drag = DragState::Idle;
        }

        changes.reloaded = self.layout_pass(delegate);

        changes.frames = self.drain_channel(dirty::FRAME);
        changes.visibility = self.drain_channel(dirty::VISIBILITY);
        changes.reveal = self.drain_channel(dirty::REVEAL);
        changes.moved = self.drain_channel(dirty::MOVED);
    }

    /// Regenerates attributes and marks what changed. Returns `true` if every
    /// index was regenerated.
    pub(crate) fn layout_pass(&mut self, delegate: &dyn CardDelegate) -> bool {
        let n = self.item_count;
        let reload = self.pending_reload || !self.cache_valid || self.cache.len() != n;
        self.pending_reload = false;

        self.bottom = select(&BottomStackInput::new(
            &self.config,
            self.state.revealed,
            n,
            self.scroll.content_offset_top(),
            self.state.scroll_shift,
        ));
        let range = if reload { 0..n } else { self.visible_window() };
        let generator = AttributeGenerator::new(LayoutInput {
            config: &self.config,
            scroll: self.scroll,
            item_count: n,
            revealed: self.state.revealed,
            dragged: self.state.drag.dragged_index(),
            scroll_shift: self.state.scroll_shift,
            bottom: &self.bottom,
        });
        let config = &self.config;
        let scroll = self.scroll;
        let fresh = generator.generate_range(range, |i| item_size(config, &scroll, delegate, i));
        self.bottom_count = generator.bottom_count();

        if reload {
            for stale in n..self.cache.len() {
                self.dirty.remove_key(index_key(stale));
            }
            self.cache.truncate(n);
        }
        let regenerated = fresh.len();
        for attr in fresh {
            self.store(attr);
        }
        self.cache_valid = true;

        let event = LayoutPassEvent {
            seq: 0,
            item_count: n,
            regenerated,
            reloaded: reload,
            offset_y: self.scroll.offset_y,
            revealed: self.state.revealed,
        };
        self.record(|seq| TraceRecord::LayoutPass(LayoutPassEvent { seq, ..event }));
        reload
    }

    /// Indices near the viewport, in configured head-height units.
    fn visible_window(&self) -> core::ops::Range<usize> {
        let n = self.item_count;
        let head = self.config.head_height();
        let shift = self.state.scroll_shift;
        let top = self.config.top_inset_for_background();
        let start = ((self.scroll.content_offset_top() - top + shift) / head).floor() - WINDOW_BEFORE;
        let end = ((self.scroll.offset_y + self.scroll.viewport.height + shift) / head).floor() + WINDOW_AFTER;
        let start = clamp_index(start, n);
        start..clamp_index(end, n).max(start)
    }

    fn store(&mut self, attr: LayoutAttributes) {
        let key = index_key(attr.index);
        match self.cache.get_mut(attr.index) {
            Some(old) => {
                if old.frame != attr.frame || old.scale != attr.scale {
                    self.dirty.mark(key, dirty::FRAME);
                }
                if old.hidden != attr.hidden || old.alpha != attr.alpha {
                    self.dirty.mark(key, dirty::VISIBILITY);
                }
                if old.is_revealed != attr.is_revealed {
                    self.dirty.mark(key, dirty::REVEAL);
                }
                *old = attr;
            }
            None => {
                self.dirty.mark(key, dirty::FRAME);
                self.dirty.mark(key, dirty::VISIBILITY);
                if attr.is_revealed {
                    self.dirty.mark(key, dirty::REVEAL);
                }
                self.cache.push(attr);
            }
        }
    }

    fn drain_channel(&mut self, channel: understory_dirty::Channel) -> Vec<usize> {
        self.dirty
            .drain(channel)
            .deterministic()
            .run()
            .map(|k| k as usize)
            .collect()
    }

    // -- Queries --

    /// Cached attributes for `index`.
    #[must_use]
    pub fn attributes(&self, index: usize) -> Option<&LayoutAttributes> {
        self.cache.get(index)
    }

    /// Cached attributes whose frame intersects `rect`, ordered by index.
    pub fn attributes_in(&self, rect: Rect) -> impl Iterator<Item = &LayoutAttributes> + '_ {
        self.cache.iter().filter(move |a| intersects(a.frame, rect))
    }

    /// Topmost interactive item whose scaled frame contains `point`.
    #[must_use]
    pub fn index_at(&self, point: Point) -> Option<usize> {
        self.hit_test(point, false)
    }

    /// Topmost item containing `point`. With `include_transparent`, items
    /// hidden behind a drag snapshot count as hits.
    pub(crate) fn hit_test(&self, point: Point, include_transparent: bool) -> Option<usize> {
        self.cache
            .iter()
            .filter(|a| {
                let reachable = if include_transparent {
                    !a.hidden
                } else {
                    a.is_interactive()
                };
                reachable && a.visual_frame().contains(point)
            })
            .max_by_key(|a| a.z_index)
            .map(|a| a.index)
    }

    /// Total scrollable content size.
    #[must_use]
    pub fn content_size(&self, delegate: &dyn CardDelegate) -> Size {
        let width = self.scroll.item_width();
        let fixed = self.config.top_inset_for_background() + self.config.bottom_inset();
        let Some(last) = self.item_count.checked_sub(1) else {
            return Size::new(width, fixed);
        };
        let last_height = item_size(&self.config, &self.scroll, delegate, last).height;
        Size::new(
            width,
            self.config.head_height() * last as f64 + last_height + fixed,
        )
    }

    /// Adjusts where a fling should come to rest.
    ///
    /// Offsets inside the background inset snap to either edge of it. Past
    /// the inset, offsets snap to the nearest card head when that is enabled
    /// and the content is tall enough to scroll a full head.
    #[must_use]
    pub fn target_content_offset(&self, proposed_y: f64, delegate: &dyn CardDelegate) -> f64 {
        let inset_top = self.scroll.insets.y0;
        let top = self.config.top_inset_for_background();
        let y = proposed_y + inset_top;
        if self.config.top_inset_should_snap() && top > 0.0 && y > 0.0 && y < top {
            return if y < top * 0.5 { -inset_top } else { top - inset_top };
        }
        let head = self.config.head_height();
        let tall_enough =
            self.content_size(delegate).height > self.scroll.viewport.height + head;
        if self.config.snap_head_to_top() && y > top && tall_enough {
            let start = ((y - top) / head).floor() + 1.0;
            let into_head = (y - top) % head;
            let base = start * head + (top - inset_top);
            return if into_head > head * 0.5 { base } else { base - head };
        }
        proposed_y
    }

    /// Attributes for an item animating out after [`will_delete`](Self::will_delete).
    #[must_use]
    pub fn disappearing_attributes(&self, index: usize) -> Option<&LayoutAttributes> {
        self.disappearing.iter().find(|a| a.index == index)
    }

    // -- Gestures shared by every mode --

    /// Whether a gesture of `kind` may begin now.
    #[must_use]
    pub fn can_begin(&self, kind: GestureKind) -> bool {
        gesture::can_begin(kind, self.state.revealed)
    }

    /// Handles a tap: hit-tests `point` and notifies the delegate.
    pub fn tap(&mut self, point: Point, delegate: &mut dyn CardDelegate) -> Option<usize> {
        if !self.can_begin(GestureKind::Tap) {
            return None;
        }
        let index = self.index_at(point)?;
        delegate.did_select(index);
        Some(index)
    }

    // -- Host events --

    /// Records whether an editor has focus.
    ///
    /// While focused, layout passes keep using the bottom inset seen when
    /// focus was gained, so an on-screen keyboard does not reshuffle the
    /// bottom stack.
    pub fn focus_changed(&mut self, focused: bool) {
        self.state.frozen_bottom_inset = focused.then_some(self.scroll.insets.y1);
    }

    /// Must be called before items are inserted at `indices` (post-insert
    /// positions).
    ///
    /// The revealed item keeps being revealed: each insertion at or above it
    /// bumps the revealed index and accumulates one head of scroll
    /// correction.
    ///
    /// # Panics
    ///
    /// Panics if an index lies past the end of the grown list.
    pub fn will_insert(&mut self, indices: &[usize]) {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        let head = self.config.head_height();
        for (inserted, &idx) in sorted.iter().enumerate() {
            assert!(
                idx <= self.item_count + inserted,
                "insert index {idx} past the end of {} items",
                self.item_count + inserted
            );
            if let Some(r) = self.state.revealed
                && idx <= r
            {
                self.state.revealed = Some(r + 1);
                if self.state.pan_listener == Some(r) {
                    self.state.pan_listener = Some(r + 1);
                }
                self.state.scroll_shift += head;
            }
        }
        self.renumber_queued(|old| Some(shift_past_inserts(old, &sorted)));
        self.pending_reload = true;
    }

    /// Must be called before the items at `indices` (pre-delete positions)
    /// are removed.
    ///
    /// Deleting the revealed item unreveals it without consulting the veto.
    /// Deletions above it shift the revealed index and the scroll correction
    /// the other way.
    ///
    /// # Panics
    ///
    /// Panics if an index is outside the current list.
    pub fn will_delete(&mut self, indices: &[usize], delegate: &mut dyn CardDelegate) {
        for &idx in indices {
            assert!(
                idx < self.item_count,
                "delete index {idx} outside {} items",
                self.item_count
            );
        }
        self.renumber_queued(|old| {
            (!indices.contains(&old)).then(|| old - indices.iter().filter(|&&i| i < old).count())
        });
        self.disappearing.clear();
        for &idx in indices {
            if let Some(attr) = self.cache.get(idx) {
                let mut gone = *attr;
                gone.alpha = 0.0;
                gone.scale = DISAPPEARING_SCALE;
                self.disappearing.push(gone);
            }
        }

        if let Some(r) = self.state.revealed {
            if indices.contains(&r) {
                self.force_unreveal(delegate);
            } else {
                let above = indices.iter().filter(|&&i| i < r).count();
                if above > 0 {
                    self.state.revealed = Some(r - above);
                    if self.state.pan_listener == Some(r) {
                        self.state.pan_listener = Some(r - above);
                    }
                    self.state.scroll_shift -= self.config.head_height() * above as f64;
                }
            }
        }
        self.pending_reload = true;
    }

    /// Forgets the items recorded by [`will_delete`](Self::will_delete).
    pub fn finalize_updates(&mut self) {
        self.disappearing.clear();
    }

    // -- Diagnostics --

    /// Forwards buffered trace events to `tracer`, oldest first.
    ///
    /// Events are only buffered with the `trace` feature enabled.
    pub fn flush_trace(&mut self, tracer: &mut Tracer<'_>) {
        for record in self.trace_log.drain(..) {
            record.dispatch(tracer);
        }
    }

    /// Buffers an event, stamping it with the next sequence number.
    pub(crate) fn record(&mut self, make: impl FnOnce(u64) -> TraceRecord) {
        if cfg!(feature = "trace") {
            let seq = self.trace_seq;
            self.trace_seq += 1;
            self.trace_log.push(make(seq));
        }
    }

    /// Queues a non-animated invalidation.
    pub(crate) fn invalidate(&mut self, reload: bool) {
        if reload {
            self.pending_reload = true;
        }
        self.effects.push(Effect::Invalidate {
            reload,
            animated: false,
        });
    }
}

/// Where the item at `old` lands once items are inserted at the sorted
/// post-insert positions `inserted`.
fn shift_past_inserts(old: usize, inserted: &[usize]) -> usize {
    inserted
        .iter()
        .fold(old, |at, &p| if p <= at { at + 1 } else { at })
}

fn index_key(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is finite, floored and clamped to [0, n] before the cast"
)]
fn clamp_index(value: f64, n: usize) -> usize {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= n as f64 {
        n
    } else {
        value as usize
    }
}
