// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for cardstack
//! diagnostics.
//!
//! This crate provides [`TraceSink`](cardstack_core::trace::TraceSink)
//! implementations for development and post-mortem analysis. Feed them from
//! [`CardStack::flush_trace`](cardstack_core::CardStack::flush_trace):
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.

pub mod chrome;
pub mod pretty;
pub mod recorder;
