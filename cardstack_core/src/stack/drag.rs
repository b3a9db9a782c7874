// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Long-press reorder and edge autoscroll.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use super::CardStack;
use super::transition::Continuation;
use crate::attributes::effective_head_height;
use crate::delegate::CardDelegate;
use crate::dirty;
use crate::effect::{Effect, TransitionKind};
use crate::geometry::{Point, Vec2};
use crate::gesture::{
    AutoscrollTick, GestureKind, GesturePhase, LIFT_DURATION, LIFT_OFFSET, MAX_AUTOSCROLL_SPEED,
    NEIGHBOR_SHIFT_DURATION, SETTLE_DURATION,
};
use crate::state::{AutoscrollDirection, DragSession, DragState};
use crate::trace::{AutoscrollEvent, DragEvent, DragPhase, ReorderEvent, TraceRecord};

impl CardStack {
    /// Feeds one phase of the long-press reorder gesture.
    ///
    /// The host sends [`GesturePhase::Began`] once the press has been held
    /// for [`LONG_PRESS_DURATION`](crate::gesture::LONG_PRESS_DURATION).
    /// `point` is the touch location in content coordinates.
    pub fn drag(&mut self, phase: GesturePhase, point: Point, delegate: &mut dyn CardDelegate) {
        match phase {
            GesturePhase::Began => self.drag_began(point),
            GesturePhase::Changed => {
                let session = match &mut self.state.drag {
                    DragState::Pressed(s) | DragState::Dragging(s) => {
                        s.touch = point;
                        *s
                    }
                    _ => return,
                };
                self.state.drag = DragState::Dragging(session);
                self.drag_moved(delegate);
            }
            GesturePhase::Ended => self.drag_ended(),
            GesturePhase::Cancelled => self.drag_cancelled(),
        }
    }

    fn drag_began(&mut self, point: Point) {
        if !self.can_begin(GestureKind::Reorder) || !self.state.drag.is_idle() {
            return;
        }
        let Some(index) = self.hit_test(point, false) else {
            return;
        };
        if index < self.config.first_movable_index() {
            return;
        }
        let Some(frame) = self.cache.get(index).map(|a| a.visual_frame()) else {
            return;
        };
        self.state.drag = DragState::Pressed(DragSession::new(index, frame.center(), point));
        self.effects.push(Effect::SnapshotBegin { index, frame });
        self.effects.push(Effect::Invalidate {
            reload: false,
            animated: false,
        });
        self.begin_transition(
            TransitionKind::SnapshotLift {
                offset: LIFT_OFFSET,
            },
            LIFT_DURATION,
            false,
            Continuation::Nothing,
        );
        self.trace_drag(DragPhase::Pressed, index, index);
    }

    /// Follows the touch: moves the snapshot, drives autoscroll, and swaps
    /// the dragged item one neighbour at a time towards the hit item.
    fn drag_moved(&mut self, delegate: &mut dyn CardDelegate) {
        let Some(mut session) = self.state.drag.active_session().copied() else {
            return;
        };
        let touch = session.touch;
        let lifted = session.start_center
            + Vec2::new(0.0, touch.y - session.start_touch.y - LIFT_OFFSET);
        self.effects.push(Effect::SnapshotMoved { center: lifted });

        let zone_top = self.config.autoscroll_zone_top();
        let zone_bottom = self.config.autoscroll_zone_bottom();
        if zone_bottom > 0.0 && touch.y > self.bottom_zone_edge() {
            self.start_autoscroll(AutoscrollDirection::Down);
        } else if zone_top > 0.0 && touch.y - self.scroll.offset_y - self.scroll.insets.y0 < zone_top
        {
            self.start_autoscroll(AutoscrollDirection::Up);
        } else {
            self.stop_autoscroll();
        }

        let hit = match self.hit_test(touch, true) {
            Some(hit) => {
                session.last_hit_touch = touch;
                Some(hit)
            }
            None => self.hit_test(session.last_hit_touch, true),
        };
        let Some(hit) = hit else {
            self.state.drag = DragState::Dragging(session);
            return;
        };
        if hit < self.config.first_movable_index() {
            self.state.drag = DragState::Dragging(session);
            return;
        }
        let mut last = match session.last_swapped {
            Some(last) => last,
            None if hit != session.start_index => session.start_index,
            None => {
                self.state.drag = DragState::Dragging(session);
                return;
            }
        };

        let head = effective_head_height(&self.config, &self.scroll, self.item_count);
        while last != hit {
            let next = if hit > last { last + 1 } else { last - 1 };
            assert!(
                next < self.item_count,
                "reorder target {next} outside {} items",
                self.item_count
            );
            delegate.move_item(next, last);
            self.effects.push(Effect::MoveItem {
                from: next,
                to: last,
            });
            let dy = if next > last { -head } else { head };
            self.begin_transition(
                TransitionKind::NeighborShift { index: last, dy },
                NEIGHBOR_SHIFT_DURATION,
                false,
                Continuation::Nothing,
            );
            session.current_index = next;
            self.dirty.mark(super::index_key(last), dirty::MOVED);
            self.dirty.mark(super::index_key(next), dirty::MOVED);
            self.effects.push(Effect::SnapshotRestack { z_index: next });
            self.record(|seq| TraceRecord::Reorder(ReorderEvent { seq, from: next, to: last }));
            self.state.drag = DragState::Dragging(session);
            self.layout_pass(&*delegate);
            last = next;
        }
        session.last_swapped = Some(hit);
        self.state.drag = DragState::Dragging(session);
    }

    fn drag_ended(&mut self) {
        self.stop_autoscroll();
        let Some(session) = self.state.drag.active_session().copied() else {
            return;
        };
        let resting = session.resting_index();
        let Some(frame) = self.cache.get(resting).map(|a| a.visual_frame()) else {
            self.drag_cancelled();
            return;
        };
        self.state.drag = DragState::Ended(session);
        self.begin_transition(
            TransitionKind::SnapshotSettle { frame },
            SETTLE_DURATION,
            false,
            Continuation::SnapshotSettled {
                moved: session.start_index != resting,
            },
        );
        self.trace_drag(DragPhase::Ended, session.start_index, session.current_index);
    }

    /// Drops the snapshot once it has settled into its slot.
    pub(super) fn snapshot_settled(&mut self, moved: bool) {
        let DragState::Ended(session) = self.state.drag else {
            return;
        };
        self.state.drag = DragState::Idle;
        self.invalidate(true);
        self.effects.push(Effect::SnapshotEnd);
        if !moved {
            self.effects.push(Effect::Invalidate {
                reload: false,
                animated: false,
            });
        }
        self.trace_drag(DragPhase::Settled, session.start_index, session.current_index);
    }

    fn drag_cancelled(&mut self) {
        self.stop_autoscroll();
        let (start, current) = match self.state.drag {
            DragState::Idle | DragState::Cancelled => return,
            DragState::Pressed(s) | DragState::Dragging(s) | DragState::Ended(s) => {
                (s.start_index, s.current_index)
            }
        };
        self.state.drag = DragState::Cancelled;
        self.effects.push(Effect::SnapshotEnd);
        self.invalidate(true);
        self.trace_drag(DragPhase::Cancelled, start, current);
    }

    // -- Autoscroll --

    /// Advances the autoscroll by one host tick and returns the applied
    /// offset change.
    ///
    /// Speed grows linearly from zero at the inner edge of the zone to
    /// [`MAX_AUTOSCROLL_SPEED`] at the viewport edge. The offset never leaves
    /// `[-top inset, content height - viewport height + bottom inset]`.
    pub fn autoscroll_tick(&mut self, tick: AutoscrollTick, delegate: &mut dyn CardDelegate) -> f64 {
        let autoscroll = self.state.autoscroll;
        let Some(direction) = autoscroll.direction.filter(|_| autoscroll.active) else {
            return 0.0;
        };
        let Some(session) = self.state.drag.active_session().copied() else {
            return 0.0;
        };
        let touch_y = session.touch.y;
        let (depth, zone) = match direction {
            AutoscrollDirection::Up => {
                let zone = self.config.autoscroll_zone_top();
                let into = zone - (touch_y - self.scroll.content_offset_top());
                (into.clamp(0.0, zone.max(0.0)), zone)
            }
            AutoscrollDirection::Down => {
                let zone = self.config.autoscroll_zone_bottom();
                let into = touch_y - self.bottom_zone_edge();
                (into.clamp(0.0, zone.max(0.0)), zone)
            }
        };
        let speed = if zone > 0.0 {
            MAX_AUTOSCROLL_SPEED * depth / zone
        } else {
            0.0
        };
        let step = (speed * tick.duration.as_secs_f64()).round();

        let old = self.scroll.offset_y;
        let min_y = -self.scroll.insets.y0;
        let viewport_h = self.scroll.viewport.height;
        let content_h = self.content_size(&*delegate).height;
        let max_y = (content_h.max(viewport_h) - viewport_h + self.scroll.insets.y1).max(min_y);
        let target = match direction {
            AutoscrollDirection::Up => (old - step).max(min_y),
            AutoscrollDirection::Down => (old + step).min(max_y),
        };
        let distance = target - old;
        if distance == 0.0 {
            return 0.0;
        }

        self.scroll.offset_y = target;
        self.effects.push(Effect::ScrollTo { offset_y: target });
        if let DragState::Pressed(s) | DragState::Dragging(s) = &mut self.state.drag {
            s.touch.y += distance;
        }
        self.record(|seq| {
            TraceRecord::Autoscroll(AutoscrollEvent {
                seq,
                now: tick.now,
                direction,
                distance,
                offset_y: target,
            })
        });
        self.layout_pass(&*delegate);
        self.drag_moved(delegate);
        distance
    }

    fn start_autoscroll(&mut self, direction: AutoscrollDirection) {
        let current = self.state.autoscroll;
        if current.active && current.direction == Some(direction) {
            return;
        }
        self.state.autoscroll.direction = Some(direction);
        self.state.autoscroll.active = true;
        self.effects.push(Effect::AutoscrollStart(direction));
    }

    fn stop_autoscroll(&mut self) {
        if !self.state.autoscroll.active {
            return;
        }
        self.state.autoscroll.active = false;
        self.state.autoscroll.direction = None;
        self.effects.push(Effect::AutoscrollStop);
    }

    /// Content y below which a drag touch autoscrolls down.
    fn bottom_zone_edge(&self) -> f64 {
        self.scroll.offset_y + self.scroll.viewport.height
            - self.config.bottom_inset()
            - self.scroll.insets.y1
            - self.config.autoscroll_zone_bottom()
    }

    fn trace_drag(&mut self, phase: DragPhase, start_index: usize, current_index: usize) {
        self.record(|seq| {
            TraceRecord::Drag(DragEvent {
                seq,
                phase,
                start_index,
                current_index,
            })
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::super::harness::{Recorder, prepared, scroll_at, settle};
    use super::*;
    use crate::time::{Duration, HostTime};

    /// A point on the head of `index` with the default 80pt heads.
    fn on_head(index: usize) -> Point {
        Point::new(100.0, 80.0 * index as f64 + 20.0)
    }

    fn moves(effects: &[Effect]) -> Vec<(usize, usize)> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::MoveItem { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn drag_down_swaps_one_neighbour_at_a_time() {
        let (mut stack, mut d) = prepared(10);
        stack.drag(GesturePhase::Began, on_head(0), &mut d);
        assert!(matches!(stack.state().drag(), DragState::Pressed(_)));
        let began = stack.take_effects();
        assert!(matches!(began[0], Effect::SnapshotBegin { index: 0, .. }));

        stack.drag(GesturePhase::Changed, on_head(5), &mut d);
        let effects = stack.take_effects();
        assert_eq!(moves(&effects), [(1, 0), (2, 1), (3, 2), (4, 3), (5, 4)]);
        assert_eq!(d.order, [1, 2, 3, 4, 5, 0, 6, 7, 8, 9]);
        let DragState::Dragging(session) = *stack.state().drag() else {
            panic!("expected an active drag");
        };
        assert_eq!(session.current_index, 5);
        assert_eq!(session.last_swapped, Some(5));
        // The dragged item's live view stays transparent at its new index.
        assert_eq!(stack.attributes(5).map(|a| a.alpha), Some(0.0));

        let changes = stack.prepare(scroll_at(0.0), 10, &d);
        assert_eq!(changes.moved, [0, 1, 2, 3, 4, 5]);

        stack.drag(GesturePhase::Ended, on_head(5), &mut d);
        let effects = settle(&mut stack, &mut d);
        assert!(effects.contains(&Effect::SnapshotEnd));
        assert!(stack.state().drag().is_idle());
        assert_eq!(stack.attributes(5).map(|a| a.alpha), Some(1.0));
    }

    #[test]
    fn swapping_back_restores_order() {
        let (mut stack, mut d) = prepared(10);
        stack.drag(GesturePhase::Began, on_head(2), &mut d);
        stack.drag(GesturePhase::Changed, on_head(4), &mut d);
        stack.drag(GesturePhase::Changed, on_head(2), &mut d);
        assert_eq!(d.order, (0..10).collect::<Vec<_>>());
        stack.take_effects();
        stack.drag(GesturePhase::Ended, on_head(2), &mut d);
        let effects = settle(&mut stack, &mut d);
        // An unmoved drag asks for one more plain relayout.
        assert!(effects.contains(&Effect::Invalidate {
            reload: false,
            animated: false
        }));
    }

    #[test]
    fn fixed_items_cannot_be_picked_up_or_passed() {
        let (mut stack, mut d) = prepared(10);
        let mut config = *stack.config();
        config.set_first_movable_index(2);
        stack.set_config(config, &mut d);
        settle(&mut stack, &mut d);

        stack.drag(GesturePhase::Began, on_head(1), &mut d);
        assert!(stack.state().drag().is_idle());

        stack.drag(GesturePhase::Began, on_head(3), &mut d);
        stack.drag(GesturePhase::Changed, on_head(0), &mut d);
        assert!(moves(&stack.take_effects()).is_empty());
        assert_eq!(d.order, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn cancel_is_idempotent() {
        let (mut stack, mut d) = prepared(10);
        stack.drag(GesturePhase::Began, on_head(1), &mut d);
        stack.take_effects();
        stack.drag(GesturePhase::Cancelled, on_head(1), &mut d);
        assert_eq!(stack.state().drag(), &DragState::Cancelled);
        let first = stack.take_effects();
        assert!(first.contains(&Effect::SnapshotEnd));
        stack.drag(GesturePhase::Cancelled, on_head(1), &mut d);
        assert!(stack.take_effects().is_empty());

        stack.prepare(scroll_at(0.0), 10, &d);
        assert!(stack.state().drag().is_idle());
    }

    #[test]
    fn refused_while_revealed() {
        let (mut stack, mut d) = prepared(10);
        stack.reveal(0, None, &mut d);
        settle(&mut stack, &mut d);
        stack.drag(GesturePhase::Began, on_head(3), &mut d);
        assert!(stack.state().drag().is_idle());
        assert!(stack.take_effects().is_empty());
    }

    #[test]
    fn edge_zones_start_and_stop_autoscroll() {
        let (mut stack, mut d) = prepared(30);
        stack.drag(GesturePhase::Began, on_head(3), &mut d);
        stack.drag(GesturePhase::Changed, Point::new(100.0, 560.0), &mut d);
        assert!(
            stack
                .take_effects()
                .contains(&Effect::AutoscrollStart(AutoscrollDirection::Down))
        );
        assert_eq!(stack.state().autoscroll().direction, Some(AutoscrollDirection::Down));

        let tick = AutoscrollTick {
            now: HostTime(16_000_000),
            duration: Duration::from_millis(100),
        };
        // 80 of 120 points into the zone: 400pt/s for 0.1s.
        assert_eq!(stack.autoscroll_tick(tick, &mut d), 40.0);
        assert_eq!(stack.scroll().offset_y, 40.0);

        stack.drag(GesturePhase::Changed, Point::new(100.0, 340.0), &mut d);
        assert!(stack.take_effects().contains(&Effect::AutoscrollStop));
        assert!(!stack.state().autoscroll().active);
        assert_eq!(stack.autoscroll_tick(tick, &mut d), 0.0);
    }

    #[test]
    fn zero_zone_never_autoscrolls() {
        let (mut stack, mut d) = prepared(30);
        let mut config = *stack.config();
        config.set_autoscroll_zone_bottom(0.0);
        stack.set_config(config, &mut d);
        settle(&mut stack, &mut d);
        stack.drag(GesturePhase::Began, on_head(3), &mut d);
        stack.drag(GesturePhase::Changed, Point::new(100.0, 599.0), &mut d);
        assert!(!stack.state().autoscroll().active);
    }

    proptest! {
        #[test]
        fn autoscroll_stays_in_bounds(
            start in 0.0f64..1500.0,
            down in any::<bool>(),
            ticks in 1usize..40,
            dt_ms in 1u64..200,
        ) {
            let n = 30;
            let mut d = Recorder::with_items(n);
            let mut stack = super::super::CardStack::default();
            stack.prepare(scroll_at(start), n, &d);
            let max_y = stack.content_size(&d).height - 600.0;

            let Some(grab) = (0..n).find_map(|i| {
                let p = Point::new(100.0, start + 200.0 + i as f64);
                stack.index_at(p).map(|_| p)
            }) else {
                return Ok(());
            };
            stack.drag(GesturePhase::Began, grab, &mut d);
            let edge = if down { start + 590.0 } else { start + 10.0 };
            stack.drag(GesturePhase::Changed, Point::new(100.0, edge), &mut d);

            let tick = AutoscrollTick {
                now: HostTime(0),
                duration: Duration::from_millis(dt_ms),
            };
            for _ in 0..ticks {
                stack.autoscroll_tick(tick, &mut d);
                let y = stack.scroll().offset_y;
                prop_assert!(y >= 0.0 && y <= max_y.max(start), "offset {y} escaped");
            }
        }
    }
}
