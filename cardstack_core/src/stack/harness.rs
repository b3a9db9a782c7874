// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test host: a recording delegate and a loop that plays the host's part.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use super::CardStack;
use crate::attributes::ScrollView;
use crate::delegate::CardDelegate;
use crate::effect::Effect;
use crate::geometry::Size;

pub(super) const VIEW: Size = Size::new(320.0, 600.0);

pub(super) fn scroll_at(offset_y: f64) -> ScrollView {
    ScrollView::new(VIEW, offset_y)
}

/// Logs every notification and mirrors reorders into `order`.
#[derive(Debug, Default)]
pub(super) struct Recorder {
    pub(super) log: Vec<String>,
    pub(super) selected: Vec<usize>,
    pub(super) order: Vec<usize>,
    pub(super) veto_reveal: Vec<usize>,
    pub(super) veto_unreveal: Vec<usize>,
}

impl Recorder {
    pub(super) fn with_items(n: usize) -> Self {
        Self {
            order: (0..n).collect(),
            ..Self::default()
        }
    }
}

impl CardDelegate for Recorder {
    fn can_reveal(&self, index: usize) -> bool {
        !self.veto_reveal.contains(&index)
    }

    fn can_unreveal(&self, index: usize) -> bool {
        !self.veto_unreveal.contains(&index)
    }

    fn will_reveal(&mut self, index: usize) {
        self.log.push(format!("will_reveal {index}"));
    }

    fn did_reveal(&mut self, index: usize) {
        self.log.push(format!("did_reveal {index}"));
    }

    fn will_unreveal(&mut self, index: usize) {
        self.log.push(format!("will_unreveal {index}"));
    }

    fn did_unreveal(&mut self, index: usize) {
        self.log.push(format!("did_unreveal {index}"));
    }

    fn move_item(&mut self, from: usize, to: usize) {
        let item = self.order.remove(from);
        self.order.insert(to, item);
    }

    fn did_select(&mut self, index: usize) {
        self.selected.push(index);
    }
}

/// An engine with `n` items after one layout pass at offset 0.
pub(super) fn prepared(n: usize) -> (CardStack, Recorder) {
    let mut stack = CardStack::default();
    let d = Recorder::with_items(n);
    stack.prepare(scroll_at(0.0), n, &d);
    (stack, d)
}

/// Plays the host until the engine goes quiet: runs a layout pass for every
/// invalidation and immediately finishes every transition. Returns every
/// effect seen, in order.
pub(super) fn settle(stack: &mut CardStack, d: &mut Recorder) -> Vec<Effect> {
    let mut seen = Vec::new();
    for _ in 0..64 {
        let effects = stack.take_effects();
        if effects.is_empty() {
            break;
        }
        let invalidated = effects
            .iter()
            .any(|e| matches!(e, Effect::Invalidate { .. }));
        let finished: Vec<_> = effects
            .iter()
            .filter_map(|e| match e {
                Effect::Transition(t) => Some(t.id),
                _ => None,
            })
            .collect();
        seen.extend(effects);
        if invalidated {
            let scroll = *stack.scroll();
            let n = stack.item_count();
            stack.prepare(scroll, n, d);
        }
        for id in finished {
            stack.finish_transition(id, d);
        }
    }
    seen
}
