// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr), prefixed
//! with the event's sequence number.

use std::io::Write;

use cardstack_core::state::AutoscrollDirection;
use cardstack_core::trace::{
    AutoscrollEvent, DragEvent, DragPhase, LayoutPassEvent, ReorderEvent, RevealEvent,
    RevealPhase, TraceSink, TransitionBeginEvent, TransitionEndEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn reveal_name(phase: RevealPhase) -> &'static str {
    match phase {
        RevealPhase::WillReveal => "will-reveal",
        RevealPhase::DidReveal => "did-reveal",
        RevealPhase::WillUnreveal => "will-unreveal",
        RevealPhase::DidUnreveal => "did-unreveal",
        RevealPhase::Vetoed => "vetoed",
    }
}

fn drag_name(phase: DragPhase) -> &'static str {
    match phase {
        DragPhase::Pressed => "pressed",
        DragPhase::Ended => "ended",
        DragPhase::Settled => "settled",
        DragPhase::Cancelled => "cancelled",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        let mode = if e.reloaded { "reload" } else { "window" };
        let revealed = e
            .revealed
            .map_or_else(|| "-".to_owned(), |i| i.to_string());
        let _ = writeln!(
            self.writer,
            "#{:<5} [layout] {mode} items={} regenerated={} offset={:.1} revealed={revealed}",
            e.seq, e.item_count, e.regenerated, e.offset_y,
        );
    }

    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        let _ = writeln!(
            self.writer,
            "#{:<5} [transition:begin] {:?} {:?} {:.0}ms{}",
            e.seq,
            e.id,
            e.kind,
            e.duration.as_secs_f64() * 1000.0,
            if e.blocking { " blocking" } else { "" },
        );
    }

    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        let _ = writeln!(
            self.writer,
            "#{:<5} [transition:end] {:?} {:?}",
            e.seq, e.id, e.kind,
        );
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        let _ = writeln!(
            self.writer,
            "#{:<5} [reveal] {} index={}",
            e.seq,
            reveal_name(e.phase),
            e.index,
        );
    }

    fn on_drag(&mut self, e: &DragEvent) {
        let _ = writeln!(
            self.writer,
            "#{:<5} [drag] {} start={} current={}",
            e.seq,
            drag_name(e.phase),
            e.start_index,
            e.current_index,
        );
    }

    fn on_reorder(&mut self, e: &ReorderEvent) {
        let _ = writeln!(
            self.writer,
            "#{:<5} [reorder] {} -> {}",
            e.seq, e.from, e.to,
        );
    }

    fn on_autoscroll(&mut self, e: &AutoscrollEvent) {
        let arrow = match e.direction {
            AutoscrollDirection::Up => "up",
            AutoscrollDirection::Down => "down",
        };
        let _ = writeln!(
            self.writer,
            "#{:<5} [autoscroll] {arrow} by {:.0} to {:.1}",
            e.seq, e.distance, e.offset_y,
        );
    }
}
