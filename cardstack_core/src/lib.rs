// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout and interaction engine for scrollable stacks of overlapping cards.
//!
//! `cardstack_core` computes where every card of a vertically scrolling
//! "wallet" sits, and runs the interactions on top of it: revealing a card
//! to the top of the viewport with the rest collapsed into a bottom stack,
//! flipping the revealed card, dismissing it with a pan, and reordering by
//! long-press drag with edge autoscroll. It is `no_std` compatible (with
//! `alloc`) and owns no views; the host renders attributes and performs the
//! animations the engine asks for.
//!
//! # Architecture
//!
//! ```text
//!   Host scroll view (offset, insets, item count)
//!       │
//!       ▼
//!   CardStack::prepare() ──► AttributeGenerator ──► attribute cache
//!       │                        ▲                       │
//!       │                 bottom_stack::select()         ▼
//!       │                                          LayoutChanges
//!       ▼
//!   commands, gestures ──► Step queue ──► Effect queue ──► host
//!                              ▲                            │
//!                              └── finish_transition() ◄────┘
//! ```
//!
//! **[`config`]**: [`LayoutConfig`](config::LayoutConfig) with clamped
//! setters and change classification.
//!
//! **[`attributes`]**: Per-item geometry for the stacked, revealed and
//! bottom-stack layouts.
//!
//! **[`bottom_stack`]**: Which items collapse below a revealed card, and
//! how much each one shrinks.
//!
//! **[`state`]**: Reveal, flip, drag and autoscroll state, readable through
//! [`CardStack::state`].
//!
//! **[`effect`]**: Requests the host must carry out, including animated
//! transitions it reports back with [`CardStack::finish_transition`].
//!
//! **[`gesture`]**: Gesture phases, arbitration and timing constants.
//!
//! **[`dirty`]**: Change channels tracked via `understory_dirty` and
//! surfaced per pass as [`LayoutChanges`].
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Buffers trace events for
//!   [`CardStack::flush_trace`] and enables `Tracer` method bodies.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod attributes;
pub mod bottom_stack;
pub mod config;
pub mod delegate;
pub mod dirty;
pub mod effect;
pub mod geometry;
pub mod gesture;
pub mod state;
pub mod time;
pub mod trace;

mod stack;

pub use effect::Effect;
pub use stack::{CardStack, Completion, LayoutChanges, completion};
