// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal, unreveal, flip and collapse-all.
//!
//! Each public operation is queued as a step. A step that finds the
//! revealed card flipped pushes its own continuation to the front of the
//! queue and flips back first, so the flip-back always completes before the
//! operation's notifications start.

use alloc::boxed::Box;

use super::CardStack;
use super::transition::{Completion, Continuation, Step};
use crate::attributes::item_size;
use crate::bottom_stack::ScaleLaw;
use crate::delegate::CardDelegate;
use crate::effect::{Effect, Face, SurfaceId, TransitionKind};
use crate::geometry::{CardTransform, Point, Rect, Size, Vec2};
use crate::gesture::{FLIP_DURATION, GesturePhase, PAN_DISMISS_DIVISOR, PAN_SETTLE_DURATION};
use crate::state::PanSession;
use crate::trace::{RevealEvent, RevealPhase, TraceRecord};

impl CardStack {
    // -- Commands --

    /// Reveals the card at `index`.
    ///
    /// While collapse-all is on this only leaves collapse mode. A veto from
    /// [`CardDelegate::can_reveal`] clears any current reveal instead.
    /// `completion` fires after [`CardDelegate::did_reveal`].
    pub fn reveal(
        &mut self,
        index: usize,
        completion: Option<Completion>,
        delegate: &mut dyn CardDelegate,
    ) {
        self.queue.push_back(Step::Reveal { index, completion });
        self.pump(delegate);
    }

    /// Unreveals the revealed card, flipping it back first if needed.
    ///
    /// With nothing revealed, `completion` fires immediately. A veto from
    /// [`CardDelegate::can_unreveal`] leaves everything as it is.
    pub fn unreveal(&mut self, completion: Option<Completion>, delegate: &mut dyn CardDelegate) {
        self.queue.push_back(Step::Unreveal { completion });
        self.pump(delegate);
    }

    /// Flips the revealed card to show `surface` on its back.
    ///
    /// Does nothing if nothing is revealed or the card is already flipped.
    pub fn flip(
        &mut self,
        surface: SurfaceId,
        completion: Option<Completion>,
        delegate: &mut dyn CardDelegate,
    ) {
        self.queue.push_back(Step::Flip {
            surface,
            completion,
        });
        self.pump(delegate);
    }

    /// Flips the revealed card back to its front.
    ///
    /// If it is not flipped, `completion` fires immediately.
    pub fn flip_back(&mut self, completion: Option<Completion>, delegate: &mut dyn CardDelegate) {
        self.queue.push_back(Step::FlipBack { completion });
        self.pump(delegate);
    }

    /// Action hook: flip back without a completion.
    pub fn flip_back_action(&mut self, delegate: &mut dyn CardDelegate) {
        self.flip_back(None, delegate);
    }

    /// Action hook: unreveal without a completion.
    pub fn unreveal_action(&mut self, delegate: &mut dyn CardDelegate) {
        self.unreveal(None, delegate);
    }

    /// Action hook: turn collapse-all on.
    pub fn collapse_all_action(&mut self, delegate: &mut dyn CardDelegate) {
        let mut config = self.config;
        config.set_collapse_all(true);
        self.set_config(config, delegate);
    }

    // -- Steps --

    pub(super) fn step_reveal(
        &mut self,
        index: usize,
        completion: Option<Completion>,
        delegate: &mut dyn CardDelegate,
    ) {
        if self.config.collapse_all() {
            self.config.set_collapse_all(false);
            self.pending_reload = true;
            self.step_collapse(delegate);
            return;
        }
        if index >= self.item_count {
            return;
        }
        if !delegate.can_reveal(index) {
            self.remove_pan_listener();
            if let Some(surface) = self.state.flipped {
                self.effects.push(Effect::SurfaceDetached { surface });
            }
            let previous = self.state.clear_revealed();
            self.trace_reveal(index, RevealPhase::Vetoed);
            if previous.is_some() {
                self.invalidate(true);
            }
            return;
        }
        if self.state.flipped.is_some() {
            self.queue.push_front(Step::RevealProceed { index, completion });
            self.step_flip_back(None, delegate);
            return;
        }
        self.step_reveal_proceed(index, completion, delegate);
    }

    pub(super) fn step_reveal_proceed(
        &mut self,
        index: usize,
        completion: Option<Completion>,
        delegate: &mut dyn CardDelegate,
    ) {
        self.remove_pan_listener();
        self.state.revealed = Some(index);
        delegate.will_reveal(index);
        self.trace_reveal(index, RevealPhase::WillReveal);
        self.relayout(true, Continuation::RevealDone { index, completion });
    }

    pub(super) fn reveal_done(
        &mut self,
        index: usize,
        completion: Option<Completion>,
        delegate: &mut dyn CardDelegate,
    ) {
        // Deleting the item during the relayout already unrevealed it.
        let Some(current) = self.state.revealed else {
            return;
        };
        debug_assert_eq!(current, index, "revealed item renumbered without its continuation");
        self.state.pan_listener = Some(index);
        self.effects.push(Effect::PanListener {
            index,
            installed: true,
        });
        delegate.did_reveal(index);
        self.trace_reveal(index, RevealPhase::DidReveal);
        if let Some(done) = completion {
            done();
        }
    }

    pub(super) fn step_unreveal(
        &mut self,
        completion: Option<Completion>,
        delegate: &mut dyn CardDelegate,
    ) {
        let Some(index) = self.state.revealed else {
            if let Some(done) = completion {
                done();
            }
            return;
        };
        if !delegate.can_unreveal(index) {
            self.trace_reveal(index, RevealPhase::Vetoed);
            return;
        }
        if self.state.flipped.is_some() {
            self.queue.push_front(Step::UnrevealProceed { completion });
            self.step_flip_back(None, delegate);
            return;
        }
        self.step_unreveal_proceed(completion, delegate);
    }

    pub(super) fn step_unreveal_proceed(
        &mut self,
        completion: Option<Completion>,
        delegate: &mut dyn CardDelegate,
    ) {
        let Some(index) = self.state.revealed else {
            if let Some(done) = completion {
                done();
            }
            return;
        };
        self.remove_pan_listener();
        delegate.will_unreveal(index);
        self.trace_reveal(index, RevealPhase::WillUnreveal);
        self.state.clear_revealed();
        self.relayout(true, Continuation::UnrevealDone { index, completion });
    }

    pub(super) fn unreveal_done(
        &mut self,
        index: usize,
        completion: Option<Completion>,
        delegate: &mut dyn CardDelegate,
    ) {
        delegate.did_unreveal(index);
        self.trace_reveal(index, RevealPhase::DidUnreveal);
        if let Some(done) = completion {
            done();
        }
    }

    /// Unreveals for a delete of the revealed item: no veto, no flip-back
    /// animation, and nothing waits for the relayout.
    pub(super) fn force_unreveal(&mut self, delegate: &mut dyn CardDelegate) {
        let Some(index) = self.state.revealed else {
            return;
        };
        if let Some(surface) = self.state.flipped {
            self.effects.push(Effect::SurfaceDetached { surface });
        }
        self.remove_pan_listener();
        delegate.will_unreveal(index);
        self.trace_reveal(index, RevealPhase::WillUnreveal);
        self.state.clear_revealed();
        self.relayout(false, Continuation::ForcedUnrevealDone { index });
    }

    pub(super) fn step_flip(
        &mut self,
        surface: SurfaceId,
        completion: Option<Completion>,
        delegate: &mut dyn CardDelegate,
    ) {
        if self.state.flipped.is_some() {
            return;
        }
        let Some(index) = self.state.revealed else {
            return;
        };
        let surface_frame = Rect::from_origin_size(Point::ZERO, self.revealed_size(index, delegate));
        self.state.flipped = Some(surface);
        self.begin_transition(
            TransitionKind::Flip {
                index,
                face: Face::Back,
                surface,
                surface_frame,
            },
            FLIP_DURATION,
            true,
            Continuation::FlipDone { completion },
        );
    }

    pub(super) fn step_flip_back(
        &mut self,
        completion: Option<Completion>,
        delegate: &mut dyn CardDelegate,
    ) {
        let (Some(surface), Some(index)) = (self.state.flipped, self.state.revealed) else {
            if let Some(done) = completion {
                done();
            }
            return;
        };
        let surface_frame = Rect::from_origin_size(Point::ZERO, self.revealed_size(index, delegate));
        self.begin_transition(
            TransitionKind::Flip {
                index,
                face: Face::Front,
                surface,
                surface_frame,
            },
            FLIP_DURATION,
            true,
            Continuation::FlipBackDone {
                surface,
                completion,
            },
        );
    }

    pub(super) fn flip_back_done(&mut self, surface: SurfaceId, completion: Option<Completion>) {
        self.effects.push(Effect::SurfaceDetached { surface });
        self.state.flipped = None;
        if let Some(done) = completion {
            done();
        }
    }

    pub(super) fn step_collapse(&mut self, delegate: &mut dyn CardDelegate) {
        if self.state.flipped.is_some() {
            self.queue.push_front(Step::CollapseProceed);
            self.step_flip_back(None, delegate);
            return;
        }
        self.step_collapse_proceed(delegate);
    }

    pub(super) fn step_collapse_proceed(&mut self, delegate: &mut dyn CardDelegate) {
        self.effects
            .push(Effect::ScrollEnabled(!self.config.collapse_all()));
        let previous = self.state.revealed;
        if let Some(index) = previous {
            self.remove_pan_listener();
            delegate.will_unreveal(index);
            self.trace_reveal(index, RevealPhase::WillUnreveal);
            self.state.clear_revealed();
        }
        self.relayout(true, Continuation::CollapseDone { previous });
    }

    pub(super) fn collapse_done(&mut self, previous: Option<usize>, delegate: &mut dyn CardDelegate) {
        if let Some(index) = previous {
            delegate.did_unreveal(index);
            self.trace_reveal(index, RevealPhase::DidUnreveal);
        }
    }

    // -- Revealed-card pan --

    /// Handles the vertical pan on the revealed card.
    ///
    /// Dragging down shrinks the card towards its bottom-stack scale.
    /// Releasing past a seventh of the card's height throws it onto the
    /// stack and unreveals; otherwise it springs back.
    pub fn revealed_pan(&mut self, phase: GesturePhase, point: Point) {
        if self.item_count == 1 || self.state.flipped.is_some() {
            return;
        }
        let Some(index) = self.state.revealed else {
            return;
        };
        if self.state.pan_listener != Some(index) {
            return;
        }
        match phase {
            GesturePhase::Began => {
                self.state.pan = Some(PanSession { start_y: point.y });
            }
            GesturePhase::Changed => {
                let Some(pan) = self.state.pan else {
                    return;
                };
                let shift = (point.y - pan.start_y).max(0.0);
                let diff = 1.0 - self.scale_behind_revealed();
                let half = self.scroll.viewport.height / 2.0;
                let scale = 1.0 - (shift * diff / half).min(diff);
                let transform = CardTransform::from_translation(Vec2::new(0.0, shift))
                    .then(CardTransform::from_scale(scale));
                self.effects
                    .push(Effect::RevealedTransform { index, transform });
            }
            GesturePhase::Ended | GesturePhase::Cancelled => {
                let Some(pan) = self.state.pan.take() else {
                    return;
                };
                let shift = (point.y - pan.start_y).max(0.0);
                let height = self.cache.get(index).map_or(0.0, |a| a.frame.height());
                let dismiss = shift > height / PAN_DISMISS_DIVISOR;
                let (reset_y, scale) = if dismiss {
                    (self.scroll.viewport.height, self.scale_behind_revealed())
                } else {
                    (0.0, 1.0)
                };
                let transform =
                    CardTransform::from_translation(Vec2::new(0.0, reset_y * (2.0 - scale)))
                        .then(CardTransform::from_scale(scale));
                self.begin_transition(
                    TransitionKind::RevealedSettle { index, transform },
                    PAN_SETTLE_DURATION,
                    false,
                    Continuation::PanSettled { dismiss },
                );
            }
        }
    }

    // -- Helpers --

    /// Scale the revealed card shrinks to when thrown back onto the stack.
    fn scale_behind_revealed(&self) -> f64 {
        ScaleLaw::new(&self.config, self.bottom_count)
            .scale_for_slot(self.bottom.revealed_rank(), true)
    }

    fn revealed_size(&self, index: usize, delegate: &dyn CardDelegate) -> Size {
        self.cache
            .get(index)
            .map(|a| a.frame.size())
            .unwrap_or_else(|| item_size(&self.config, &self.scroll, delegate, index))
    }

    fn remove_pan_listener(&mut self) {
        if let Some(index) = self.state.pan_listener.take() {
            self.effects.push(Effect::PanListener {
                index,
                installed: false,
            });
        }
    }

    fn trace_reveal(&mut self, index: usize, phase: RevealPhase) {
        self.record(|seq| TraceRecord::Reveal(RevealEvent { seq, index, phase }));
    }
}

/// Boxes a closure as a [`Completion`].
pub fn completion(f: impl FnOnce() + 'static) -> Completion {
    Box::new(f)
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::Cell;

    use proptest::prelude::*;

    use super::super::harness::{prepared, scroll_at, settle};
    use super::*;
    use crate::effect::Transition;

    fn flag() -> (Rc<Cell<bool>>, Completion) {
        let fired = Rc::new(Cell::new(false));
        let inner = Rc::clone(&fired);
        (fired, completion(move || inner.set(true)))
    }

    fn transitions(effects: &[Effect]) -> Vec<Transition> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Transition(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn reveal_notifies_in_order_then_installs_listener() {
        let (mut stack, mut d) = prepared(10);
        let (fired, done) = flag();
        stack.reveal(2, Some(done), &mut d);
        assert_eq!(d.log, ["will_reveal 2"]);
        assert!(!fired.get());

        let effects = settle(&mut stack, &mut d);
        assert_eq!(d.log, ["will_reveal 2", "did_reveal 2"]);
        assert!(fired.get());
        assert_eq!(stack.state().revealed(), Some(2));
        assert_eq!(stack.state().pan_listener(), Some(2));
        assert!(effects.contains(&Effect::PanListener {
            index: 2,
            installed: true
        }));
        assert!(stack.attributes(2).is_some_and(|a| a.is_revealed));
    }

    #[test]
    fn unreveal_with_nothing_revealed_completes_at_once() {
        let (mut stack, mut d) = prepared(4);
        let (fired, done) = flag();
        stack.unreveal(Some(done), &mut d);
        assert!(fired.get());
        assert!(stack.take_effects().is_empty());
    }

    #[test]
    fn vetoed_reveal_clears_current_reveal() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(1, None, &mut d);
        settle(&mut stack, &mut d);
        d.veto_reveal.push(3);
        stack.reveal(3, None, &mut d);
        assert_eq!(stack.state().revealed(), None);
        assert_eq!(stack.state().pan_listener(), None);
        let effects = stack.take_effects();
        assert!(effects.contains(&Effect::PanListener {
            index: 1,
            installed: false
        }));
        assert!(effects.contains(&Effect::Invalidate {
            reload: true,
            animated: false
        }));
        assert_eq!(d.log, ["will_reveal 1", "did_reveal 1"]);
    }

    #[test]
    fn vetoed_unreveal_changes_nothing() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(4, None, &mut d);
        settle(&mut stack, &mut d);
        d.veto_unreveal.push(4);
        stack.unreveal(None, &mut d);
        assert!(stack.take_effects().is_empty());
        assert_eq!(stack.state().revealed(), Some(4));
        assert_eq!(stack.state().pan_listener(), Some(4));
    }

    #[test]
    fn flip_needs_a_revealed_card() {
        let (mut stack, mut d) = prepared(10);
        stack.flip(SurfaceId(1), None, &mut d);
        assert!(!stack.state().is_flipped());
        assert!(stack.take_effects().is_empty());
    }

    #[test]
    fn flip_matches_revealed_frame_and_blocks() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(0, None, &mut d);
        settle(&mut stack, &mut d);
        let (fired, done) = flag();
        stack.flip(SurfaceId(7), Some(done), &mut d);
        assert!(stack.state().is_flipped());
        assert!(stack.is_busy());
        let flips = transitions(&stack.take_effects());
        assert_eq!(flips.len(), 1);
        assert!(flips[0].disable_rasterization);
        assert_eq!(
            flips[0].kind,
            TransitionKind::Flip {
                index: 0,
                face: Face::Back,
                surface: SurfaceId(7),
                surface_frame: Rect::new(0.0, 0.0, 320.0, 250.0),
            }
        );
        stack.finish_transition(flips[0].id, &mut d);
        assert!(fired.get());

        // A second flip while flipped is ignored.
        stack.flip(SurfaceId(8), None, &mut d);
        assert!(stack.take_effects().is_empty());
        assert_eq!(stack.state().back_surface(), Some(SurfaceId(7)));
    }

    #[test]
    fn unreveal_while_flipped_flips_back_first() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(3, None, &mut d);
        stack.flip(SurfaceId(5), None, &mut d);
        settle(&mut stack, &mut d);
        assert!(stack.state().is_flipped());

        stack.unreveal(None, &mut d);
        // The flip-back runs alone; unreveal hooks wait for it.
        let first = transitions(&stack.take_effects());
        assert!(matches!(
            first[..],
            [Transition {
                kind: TransitionKind::Flip {
                    face: Face::Front,
                    ..
                },
                ..
            }]
        ));
        assert_eq!(d.log.len(), 2);
        stack.finish_transition(first[0].id, &mut d);
        let effects = settle(&mut stack, &mut d);
        assert_eq!(effects.first(), Some(&Effect::SurfaceDetached {
            surface: SurfaceId(5)
        }));
        assert_eq!(d.log[2..], ["will_unreveal 3", "did_unreveal 3"]);
        assert!(!stack.state().is_flipped());
        assert_eq!(stack.state().revealed(), None);
    }

    #[test]
    fn flip_back_when_not_flipped_completes_at_once() {
        let (mut stack, mut d) = prepared(3);
        let (fired, done) = flag();
        stack.flip_back(Some(done), &mut d);
        assert!(fired.get());
    }

    #[test]
    fn collapse_all_unreveals_and_locks_scrolling() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(2, None, &mut d);
        settle(&mut stack, &mut d);

        stack.collapse_all_action(&mut d);
        let effects = settle(&mut stack, &mut d);
        assert!(effects.contains(&Effect::ScrollEnabled(false)));
        assert_eq!(d.log[2..], ["will_unreveal 2", "did_unreveal 2"]);
        assert_eq!(stack.state().revealed(), None);
        assert_eq!(stack.state().pan_listener(), None);
        assert_eq!(stack.bottom_stack().indices(), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn reveal_while_collapsed_leaves_collapse_mode() {
        let (mut stack, mut d) = prepared(10);
        stack.collapse_all_action(&mut d);
        settle(&mut stack, &mut d);

        let (fired, done) = flag();
        stack.reveal(4, Some(done), &mut d);
        let effects = settle(&mut stack, &mut d);
        assert!(!stack.config().collapse_all());
        assert!(effects.contains(&Effect::ScrollEnabled(true)));
        assert_eq!(stack.state().revealed(), None);
        assert!(!fired.get());
        assert!(stack.bottom_stack().is_empty());
    }

    #[test]
    fn insert_above_revealed_tracks_the_item() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(5, None, &mut d);
        settle(&mut stack, &mut d);

        stack.will_insert(&[0, 1]);
        assert_eq!(stack.state().revealed(), Some(7));
        assert_eq!(stack.state().pan_listener(), Some(7));
        assert_eq!(stack.state().scroll_shift(), 160.0);
        // Inserting below the revealed card changes nothing.
        stack.will_insert(&[9]);
        assert_eq!(stack.state().revealed(), Some(7));

        stack.prepare(scroll_at(0.0), 13, &d);
        stack.unreveal(None, &mut d);
        let effects = settle(&mut stack, &mut d);
        assert!(effects.contains(&Effect::ScrollTo { offset_y: 160.0 }));
        assert_eq!(stack.state().scroll_shift(), 0.0);
    }

    #[test]
    fn delete_above_revealed_shifts_back() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(5, None, &mut d);
        settle(&mut stack, &mut d);
        stack.will_delete(&[0, 2, 8], &mut d);
        assert_eq!(stack.state().revealed(), Some(3));
        assert_eq!(stack.state().scroll_shift(), -160.0);
    }

    #[test]
    fn deleting_revealed_item_forces_unreveal() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(5, None, &mut d);
        stack.flip(SurfaceId(2), None, &mut d);
        settle(&mut stack, &mut d);
        d.veto_unreveal.push(5);

        stack.will_delete(&[5], &mut d);
        assert_eq!(stack.state().revealed(), None);
        assert!(!stack.state().is_flipped());
        // Nothing waits on the relayout.
        assert!(!stack.is_busy());
        let effects = stack.take_effects();
        assert!(effects.contains(&Effect::SurfaceDetached {
            surface: SurfaceId(2)
        }));
        let relayout = transitions(&effects);
        assert!(!relayout[0].blocking);
        stack.finish_transition(relayout[0].id, &mut d);
        assert_eq!(d.log[2..], ["will_unreveal 5", "did_unreveal 5"]);
    }

    #[test]
    fn queued_reveal_follows_an_insert() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(1, None, &mut d);
        stack.reveal(5, None, &mut d);
        stack.will_insert(&[0]);
        stack.prepare(scroll_at(0.0), 11, &d);
        settle(&mut stack, &mut d);
        // The item that was at 5 is now at 6.
        assert_eq!(stack.state().revealed(), Some(6));
        assert_eq!(
            d.log,
            ["will_reveal 1", "did_reveal 2", "will_reveal 6", "did_reveal 6"]
        );
    }

    #[test]
    fn queued_reveal_of_a_deleted_item_is_dropped() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(1, None, &mut d);
        let (fired, done) = flag();
        stack.reveal(5, Some(done), &mut d);
        stack.will_delete(&[5], &mut d);
        stack.prepare(scroll_at(0.0), 9, &d);
        settle(&mut stack, &mut d);
        assert_eq!(stack.state().revealed(), Some(1));
        assert_eq!(d.log, ["will_reveal 1", "did_reveal 1"]);
        assert!(!fired.get());
    }

    #[test]
    fn deleting_mid_reveal_skips_did_reveal() {
        let (mut stack, mut d) = prepared(10);
        let (fired, done) = flag();
        stack.reveal(3, Some(done), &mut d);
        stack.will_delete(&[3], &mut d);
        stack.prepare(scroll_at(0.0), 9, &d);
        settle(&mut stack, &mut d);
        assert_eq!(d.log, ["will_reveal 3", "will_unreveal 3", "did_unreveal 3"]);
        assert!(!fired.get());
        assert_eq!(stack.state().revealed(), None);
        assert_eq!(stack.state().pan_listener(), None);
        assert!(!stack.is_busy());
    }

    #[test]
    fn short_pan_springs_back() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(2, None, &mut d);
        settle(&mut stack, &mut d);

        stack.revealed_pan(GesturePhase::Began, Point::new(100.0, 100.0));
        stack.revealed_pan(GesturePhase::Changed, Point::new(100.0, 400.0));
        let moved = stack.take_effects();
        let Some(Effect::RevealedTransform { index, transform }) = moved.first().copied() else {
            panic!("expected a transform, got {moved:?}");
        };
        assert_eq!(index, 2);
        assert!(transform.scale < 1.0);
        assert!(transform.translation.y > 0.0);

        // 30 < 250 / 7.
        stack.revealed_pan(GesturePhase::Ended, Point::new(100.0, 130.0));
        let settle_effects = stack.take_effects();
        let t = transitions(&settle_effects);
        assert_eq!(
            t[0].kind,
            TransitionKind::RevealedSettle {
                index: 2,
                transform: CardTransform::IDENTITY
            }
        );
        stack.finish_transition(t[0].id, &mut d);
        assert_eq!(stack.state().revealed(), Some(2));
    }

    #[test]
    fn long_pan_dismisses() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(2, None, &mut d);
        settle(&mut stack, &mut d);

        stack.revealed_pan(GesturePhase::Began, Point::new(100.0, 100.0));
        stack.revealed_pan(GesturePhase::Ended, Point::new(100.0, 200.0));
        settle(&mut stack, &mut d);
        assert_eq!(stack.state().revealed(), None);
        assert_eq!(d.log[2..], ["will_unreveal 2", "did_unreveal 2"]);
    }

    #[test]
    fn pan_is_ignored_with_a_single_card() {
        let (mut stack, mut d) = prepared(1);
        stack.reveal(0, None, &mut d);
        settle(&mut stack, &mut d);
        stack.revealed_pan(GesturePhase::Began, Point::new(10.0, 10.0));
        stack.revealed_pan(GesturePhase::Changed, Point::new(10.0, 300.0));
        assert!(stack.take_effects().is_empty());
    }

    proptest! {
        #[test]
        fn reveal_then_unreveal_ends_idle(n in 1usize..30, pick in 0usize..30) {
            let index = pick % n;
            let (mut stack, mut d) = prepared(n);
            stack.reveal(index, None, &mut d);
            stack.unreveal(None, &mut d);
            settle(&mut stack, &mut d);
            prop_assert_eq!(stack.state().revealed(), None);
            prop_assert_eq!(stack.state().pan_listener(), None);
            prop_assert!(!stack.is_busy());
            prop_assert_eq!(stack.pending_transitions(), 0);
            let expected: Vec<_> = ["will_reveal", "did_reveal", "will_unreveal", "did_unreveal"]
                .iter()
                .map(|hook| alloc::format!("{hook} {index}"))
                .collect();
            prop_assert_eq!(&d.log, &expected);
        }
    }
}
