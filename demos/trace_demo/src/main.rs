// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated card-stack session that exercises the tracing and diagnostics
//! pipeline.
//!
//! Plays the host for a wallet of twelve cards: reveals and flips one, then
//! reorders by dragging into the bottom autoscroll zone. Events go to both a
//! [`PrettyPrintSink`](cardstack_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](cardstack_debug::recorder::RecorderSink), and the
//! recording is exported as a Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use cardstack_core::attributes::ScrollView;
use cardstack_core::delegate::CardDelegate;
use cardstack_core::effect::SurfaceId;
use cardstack_core::geometry::{Point, Size};
use cardstack_core::gesture::{AutoscrollTick, GesturePhase};
use cardstack_core::time::{Duration, HostTime};
use cardstack_core::trace::{
    AutoscrollEvent, DragEvent, LayoutPassEvent, ReorderEvent, RevealEvent, TraceSink, Tracer,
    TransitionBeginEvent, TransitionEndEvent,
};
use cardstack_core::{CardStack, Effect, completion};

use cardstack_debug::pretty::PrettyPrintSink;
use cardstack_debug::recorder::RecorderSink;

const CARD_COUNT: usize = 12;
const VIEWPORT: Size = Size::new(375.0, 667.0);
/// 60 Hz autoscroll tick.
const TICK: Duration = Duration::from_millis(16);

/// The host's data source: card names in display order.
struct Wallet {
    cards: Vec<String>,
}

impl CardDelegate for Wallet {
    fn can_unreveal(&self, index: usize) -> bool {
        // The membership card refuses to be put away.
        self.cards.get(index).is_none_or(|c| c != "Membership")
    }

    fn did_reveal(&mut self, index: usize) {
        if let Some(card) = self.cards.get(index) {
            println!("      host: showing {card}");
        }
    }

    fn move_item(&mut self, from: usize, to: usize) {
        let card = self.cards.remove(from);
        self.cards.insert(to, card);
    }
}

/// Forwards every event to both sinks.
struct Tee<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Tee<'_> {
    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        self.pretty.on_layout_pass(e);
        self.recorder.on_layout_pass(e);
    }

    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        self.pretty.on_transition_begin(e);
        self.recorder.on_transition_begin(e);
    }

    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        self.pretty.on_transition_end(e);
        self.recorder.on_transition_end(e);
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        self.pretty.on_reveal(e);
        self.recorder.on_reveal(e);
    }

    fn on_drag(&mut self, e: &DragEvent) {
        self.pretty.on_drag(e);
        self.recorder.on_drag(e);
    }

    fn on_reorder(&mut self, e: &ReorderEvent) {
        self.pretty.on_reorder(e);
        self.recorder.on_reorder(e);
    }

    fn on_autoscroll(&mut self, e: &AutoscrollEvent) {
        self.pretty.on_autoscroll(e);
        self.recorder.on_autoscroll(e);
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- engine ------------------------------------------------------------
    let mut wallet = Wallet {
        cards: (0..CARD_COUNT)
            .map(|i| match i {
                2 => "Membership".to_owned(),
                _ => format!("Card {i}"),
            })
            .collect(),
    };
    let mut stack = CardStack::default();
    stack.prepare(ScrollView::new(VIEWPORT, 0.0), CARD_COUNT, &wallet);

    // -- reveal, flip, unreveal ----------------------------------------------
    println!("== reveal card 4");
    stack.reveal(4, Some(completion(|| println!("      host: reveal done"))), &mut wallet);
    play_host(&mut stack, &mut wallet);

    println!("== flip it");
    stack.flip(SurfaceId(1), None, &mut wallet);
    play_host(&mut stack, &mut wallet);

    println!("== unreveal (flips back first)");
    stack.unreveal(None, &mut wallet);
    play_host(&mut stack, &mut wallet);

    println!("== reveal the membership card, then try to unreveal it");
    stack.reveal(2, None, &mut wallet);
    stack.unreveal(None, &mut wallet);
    play_host(&mut stack, &mut wallet);
    println!("      still revealed: {:?}", stack.state().revealed());

    println!("== reveal card 0 instead");
    stack.reveal(0, None, &mut wallet);
    play_host(&mut stack, &mut wallet);
    stack.unreveal_action(&mut wallet);
    play_host(&mut stack, &mut wallet);

    // -- drag into the autoscroll zone ---------------------------------------
    println!("== drag card 1 down past the bottom edge");
    let head = 80.0;
    stack.drag(GesturePhase::Began, Point::new(100.0, head + 20.0), &mut wallet);
    stack.drag(GesturePhase::Changed, Point::new(100.0, 4.0 * head + 20.0), &mut wallet);
    stack.drag(GesturePhase::Changed, Point::new(100.0, VIEWPORT.height - 30.0), &mut wallet);
    let mut now = HostTime(1_000_000_000);
    for _ in 0..10 {
        now = now + TICK;
        stack.autoscroll_tick(AutoscrollTick { now, duration: TICK }, &mut wallet);
    }
    let resting = stack.state().drag().dragged_index();
    stack.drag(GesturePhase::Ended, Point::new(100.0, 0.0), &mut wallet);
    play_host(&mut stack, &mut wallet);
    println!("      card 1 now rests at {resting:?}: {:?}", wallet.cards);

    // -- diagnostics -----------------------------------------------------------
    {
        let mut tee = Tee {
            pretty: &mut pretty,
            recorder: &mut recorder,
        };
        stack.flush_trace(&mut Tracer::new(&mut tee));
    }

    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    cardstack_debug::chrome::export(recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({} bytes recorded)", recorder.as_bytes().len());
}

/// Acts as the host until the engine goes quiet: every invalidation runs a
/// layout pass and every transition finishes immediately.
fn play_host(stack: &mut CardStack, wallet: &mut Wallet) {
    loop {
        let effects = stack.take_effects();
        if effects.is_empty() {
            return;
        }
        let mut relayout = false;
        let mut finished = Vec::new();
        for effect in effects {
            match effect {
                Effect::Invalidate { .. } => relayout = true,
                Effect::Transition(t) => finished.push(t.id),
                Effect::ScrollTo { offset_y } => println!("      host: scroll to {offset_y:.1}"),
                other => println!("      host: {other:?}"),
            }
        }
        if relayout {
            let scroll = *stack.scroll();
            let count = stack.item_count();
            stack.prepare(scroll, count, wallet);
        }
        for id in finished {
            stack.finish_transition(id, wallet);
        }
    }
}
