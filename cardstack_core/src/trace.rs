// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the layout engine.
//!
//! This module provides a [`TraceSink`] trait with per-event methods. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! The engine never holds a sink. With `trace` enabled it buffers events as
//! they happen and the host forwards them with
//! [`CardStack::flush_trace`](crate::CardStack::flush_trace). Every event
//! carries a monotonic sequence number so interleaving survives buffering.

use crate::effect::{TransitionId, TransitionTag};
use crate::state::AutoscrollDirection;
use crate::time::{Duration, HostTime};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Step of the reveal state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealPhase {
    /// The reveal relayout is about to start.
    WillReveal,
    /// The reveal relayout finished.
    DidReveal,
    /// The unreveal relayout is about to start.
    WillUnreveal,
    /// The unreveal relayout finished.
    DidUnreveal,
    /// The delegate refused a reveal or unreveal.
    Vetoed,
}

/// Step of a reorder drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// The card was picked up.
    Pressed,
    /// The touch lifted; the snapshot is settling.
    Ended,
    /// The snapshot reached its slot.
    Settled,
    /// The drag was abandoned.
    Cancelled,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the end of every layout pass.
#[derive(Clone, Copy, Debug)]
pub struct LayoutPassEvent {
    /// Sequence number.
    pub seq: u64,
    /// Number of items.
    pub item_count: usize,
    /// Number of indices regenerated.
    pub regenerated: usize,
    /// Whether every index was regenerated.
    pub reloaded: bool,
    /// Scroll offset the pass ran at.
    pub offset_y: f64,
    /// Revealed index at the time of the pass.
    pub revealed: Option<usize>,
}

/// Emitted when the engine requests a transition.
#[derive(Clone, Copy, Debug)]
pub struct TransitionBeginEvent {
    /// Sequence number.
    pub seq: u64,
    /// Transition handle.
    pub id: TransitionId,
    /// What is being animated.
    pub kind: TransitionTag,
    /// Suggested duration.
    pub duration: Duration,
    /// Whether later operations wait for it.
    pub blocking: bool,
}

/// Emitted when the host reports a transition as finished.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEndEvent {
    /// Sequence number.
    pub seq: u64,
    /// Transition handle.
    pub id: TransitionId,
    /// What was animated.
    pub kind: TransitionTag,
}

/// Emitted at each step of the reveal state machine.
#[derive(Clone, Copy, Debug)]
pub struct RevealEvent {
    /// Sequence number.
    pub seq: u64,
    /// Item index.
    pub index: usize,
    /// Which step.
    pub phase: RevealPhase,
}

/// Emitted at each step of a reorder drag.
#[derive(Clone, Copy, Debug)]
pub struct DragEvent {
    /// Sequence number.
    pub seq: u64,
    /// Which step.
    pub phase: DragPhase,
    /// Index the drag started on.
    pub start_index: usize,
    /// Current index of the dragged item.
    pub current_index: usize,
}

/// Emitted for every single-step swap.
#[derive(Clone, Copy, Debug)]
pub struct ReorderEvent {
    /// Sequence number.
    pub seq: u64,
    /// Source index passed to `move_item`.
    pub from: usize,
    /// Destination index passed to `move_item`.
    pub to: usize,
}

/// Emitted for every autoscroll tick that moved the content.
#[derive(Clone, Copy, Debug)]
pub struct AutoscrollEvent {
    /// Sequence number.
    pub seq: u64,
    /// Host time of the tick.
    pub now: HostTime,
    /// Scroll direction.
    pub direction: AutoscrollDirection,
    /// Applied offset change.
    pub distance: f64,
    /// Offset after the change.
    pub offset_y: f64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a layout pass.
    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        _ = e;
    }

    /// Called when a transition is requested.
    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        _ = e;
    }

    /// Called when a transition is finished.
    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        _ = e;
    }

    /// Called at each reveal step.
    fn on_reveal(&mut self, e: &RevealEvent) {
        _ = e;
    }

    /// Called at each drag step.
    fn on_drag(&mut self, e: &DragEvent) {
        _ = e;
    }

    /// Called for each reorder swap.
    fn on_reorder(&mut self, e: &ReorderEvent) {
        _ = e;
    }

    /// Called for each autoscroll tick.
    fn on_autoscroll(&mut self, e: &AutoscrollEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`LayoutPassEvent`].
    #[inline]
    pub fn layout_pass(&mut self, e: &LayoutPassEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout_pass(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionBeginEvent`].
    #[inline]
    pub fn transition_begin(&mut self, e: &TransitionBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEndEvent`].
    #[inline]
    pub fn transition_end(&mut self, e: &TransitionEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RevealEvent`].
    #[inline]
    pub fn reveal(&mut self, e: &RevealEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reveal(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DragEvent`].
    #[inline]
    pub fn drag(&mut self, e: &DragEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_drag(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReorderEvent`].
    #[inline]
    pub fn reorder(&mut self, e: &ReorderEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reorder(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AutoscrollEvent`].
    #[inline]
    pub fn autoscroll(&mut self, e: &AutoscrollEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_autoscroll(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Engine-side buffer
// ---------------------------------------------------------------------------

/// A buffered event awaiting `flush_trace`.
#[derive(Clone, Copy, Debug)]
pub(crate) enum TraceRecord {
    LayoutPass(LayoutPassEvent),
    TransitionBegin(TransitionBeginEvent),
    TransitionEnd(TransitionEndEvent),
    Reveal(RevealEvent),
    Drag(DragEvent),
    Reorder(ReorderEvent),
    Autoscroll(AutoscrollEvent),
}

impl TraceRecord {
    pub(crate) fn dispatch(&self, tracer: &mut Tracer<'_>) {
        match self {
            Self::LayoutPass(e) => tracer.layout_pass(e),
            Self::TransitionBegin(e) => tracer.transition_begin(e),
            Self::TransitionEnd(e) => tracer.transition_end(e),
            Self::Reveal(e) => tracer.reveal(e),
            Self::Drag(e) => tracer.drag(e),
            Self::Reorder(e) => tracer.reorder(e),
            Self::Autoscroll(e) => tracer.autoscroll(e),
        }
    }
}
