// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Operation queue and transition bookkeeping.
//!
//! State-machine operations run as [`Step`]s. A step may start a *blocking*
//! transition; until the host finishes it, later steps wait in FIFO order so
//! no relayout interleaves with another operation's notifications. Every
//! transition carries a [`Continuation`] that runs when it finishes.

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::CardStack;
use crate::delegate::CardDelegate;
use crate::effect::{Effect, SurfaceId, Transition, TransitionId, TransitionKind, TransitionTag};
use crate::gesture::RELAYOUT_DURATION;
use crate::time::Duration;
use crate::trace::{TraceRecord, TransitionBeginEvent, TransitionEndEvent};

/// Callback fired when a reveal, unreveal or flip-back completes.
pub type Completion = Box<dyn FnOnce()>;

/// A queued state-machine operation.
pub(crate) enum Step {
    Reveal {
        index: usize,
        completion: Option<Completion>,
    },
    RevealProceed {
        index: usize,
        completion: Option<Completion>,
    },
    Unreveal {
        completion: Option<Completion>,
    },
    UnrevealProceed {
        completion: Option<Completion>,
    },
    Flip {
        surface: SurfaceId,
        completion: Option<Completion>,
    },
    FlipBack {
        completion: Option<Completion>,
    },
    Collapse,
    CollapseProceed,
}

/// What to do once a transition finishes.
pub(crate) enum Continuation {
    Nothing,
    RevealDone {
        index: usize,
        completion: Option<Completion>,
    },
    UnrevealDone {
        index: usize,
        completion: Option<Completion>,
    },
    FlipDone {
        completion: Option<Completion>,
    },
    FlipBackDone {
        surface: SurfaceId,
        completion: Option<Completion>,
    },
    CollapseDone {
        previous: Option<usize>,
    },
    ForcedUnrevealDone {
        index: usize,
    },
    SnapshotSettled {
        moved: bool,
    },
    PanSettled {
        dismiss: bool,
    },
}

impl Step {
    fn reveal_target(&mut self) -> Option<&mut usize> {
        match self {
            Self::Reveal { index, .. } | Self::RevealProceed { index, .. } => Some(index),
            _ => None,
        }
    }
}

impl Continuation {
    fn item(&mut self) -> Option<&mut usize> {
        match self {
            Self::RevealDone { index, .. }
            | Self::UnrevealDone { index, .. }
            | Self::ForcedUnrevealDone { index } => Some(index),
            Self::CollapseDone { previous } => previous.as_mut(),
            _ => None,
        }
    }
}

/// An in-flight transition.
pub(crate) struct Pending {
    pub(crate) id: TransitionId,
    pub(crate) tag: TransitionTag,
    pub(crate) then: Continuation,
}

impl CardStack {
    /// Takes every queued effect, oldest first.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        core::mem::take(&mut self.effects)
    }

    /// Returns `true` while a blocking transition holds back queued
    /// operations.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.blocking.is_some()
    }

    /// Number of transitions the host has not finished yet.
    #[must_use]
    pub fn pending_transitions(&self) -> usize {
        self.pending.len()
    }

    /// Reports that the host finished the transition `id`.
    ///
    /// Runs the transition's continuation, then any operations that were
    /// waiting for it. Returns `false`, doing nothing, if `id` is not in
    /// flight (already finished, or never issued).
    pub fn finish_transition(&mut self, id: TransitionId, delegate: &mut dyn CardDelegate) -> bool {
        let Some(pos) = self.pending.iter().position(|p| p.id == id) else {
            return false;
        };
        let pending = self.pending.remove(pos);
        if self.blocking == Some(id) {
            self.blocking = None;
        }
        let tag = pending.tag;
        self.record(|seq| TraceRecord::TransitionEnd(TransitionEndEvent { seq, id, kind: tag }));
        self.resume(pending.then, delegate);
        self.pump(delegate);
        true
    }

    /// Queues a transition effect and registers its continuation.
    pub(crate) fn begin_transition(
        &mut self,
        kind: TransitionKind,
        duration: Duration,
        blocking: bool,
        then: Continuation,
    ) -> TransitionId {
        let id = TransitionId(self.next_transition);
        self.next_transition += 1;
        if blocking {
            debug_assert!(self.blocking.is_none(), "two blocking transitions in flight");
            self.blocking = Some(id);
        }
        let disable_rasterization = matches!(kind, TransitionKind::Flip { .. });
        self.effects.push(Effect::Transition(Transition {
            id,
            kind,
            duration,
            disable_rasterization,
            blocking,
        }));
        let tag = kind.tag();
        self.pending.push(Pending { id, tag, then });
        self.record(|seq| {
            TraceRecord::TransitionBegin(TransitionBeginEvent {
                seq,
                id,
                kind: tag,
                duration,
                blocking,
            })
        });
        id
    }

    /// Requests an animated full relayout.
    pub(crate) fn relayout(&mut self, blocking: bool, then: Continuation) -> TransitionId {
        self.pending_reload = true;
        self.effects.push(Effect::Invalidate {
            reload: true,
            animated: true,
        });
        self.begin_transition(TransitionKind::Relayout, RELAYOUT_DURATION, blocking, then)
    }

    /// Renumbers the items held by queued steps and in-flight continuations.
    ///
    /// `map` returns `None` for a deleted item. Queued reveals of a deleted
    /// item are dropped along with their completion; continuations keep the
    /// index they had.
    pub(crate) fn renumber_queued(&mut self, map: impl Fn(usize) -> Option<usize>) {
        self.queue.retain_mut(|step| {
            let Some(index) = step.reveal_target() else {
                return true;
            };
            match map(*index) {
                Some(moved) => {
                    *index = moved;
                    true
                }
                None => false,
            }
        });
        for pending in &mut self.pending {
            if let Some(index) = pending.then.item()
                && let Some(moved) = map(*index)
            {
                *index = moved;
            }
        }
    }

    /// Runs queued steps until one blocks.
    pub(crate) fn pump(&mut self, delegate: &mut dyn CardDelegate) {
        while self.blocking.is_none() {
            let Some(step) = self.queue.pop_front() else {
                break;
            };
            self.run_step(step, delegate);
        }
    }

    fn run_step(&mut self, step: Step, delegate: &mut dyn CardDelegate) {
        match step {
            Step::Reveal { index, completion } => self.step_reveal(index, completion, delegate),
            Step::RevealProceed { index, completion } => {
                self.step_reveal_proceed(index, completion, delegate);
            }
            Step::Unreveal { completion } => self.step_unreveal(completion, delegate),
            Step::UnrevealProceed { completion } => {
                self.step_unreveal_proceed(completion, delegate);
            }
            Step::Flip {
                surface,
                completion,
            } => self.step_flip(surface, completion, delegate),
            Step::FlipBack { completion } => self.step_flip_back(completion, delegate),
            Step::Collapse => self.step_collapse(delegate),
            Step::CollapseProceed => self.step_collapse_proceed(delegate),
        }
    }

    fn resume(&mut self, then: Continuation, delegate: &mut dyn CardDelegate) {
        match then {
            Continuation::Nothing => {}
            Continuation::RevealDone { index, completion } => {
                self.reveal_done(index, completion, delegate);
            }
            Continuation::UnrevealDone { index, completion } => {
                self.unreveal_done(index, completion, delegate);
            }
            Continuation::FlipDone { completion } => {
                if let Some(done) = completion {
                    done();
                }
            }
            Continuation::FlipBackDone {
                surface,
                completion,
            } => self.flip_back_done(surface, completion),
            Continuation::CollapseDone { previous } => self.collapse_done(previous, delegate),
            Continuation::ForcedUnrevealDone { index } => {
                self.unreveal_done(index, None, delegate);
            }
            Continuation::SnapshotSettled { moved } => self.snapshot_settled(moved),
            Continuation::PanSettled { dismiss } => {
                if dismiss {
                    self.unreveal(None, delegate);
                }
            }
        }
    }
}
