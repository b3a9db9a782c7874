// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`]. Indices are widened to `u64` and
//! offsets stored as raw `f64` bits.

use cardstack_core::effect::{TransitionId, TransitionTag};
use cardstack_core::state::AutoscrollDirection;
use cardstack_core::time::{Duration, HostTime};
use cardstack_core::trace::{
    AutoscrollEvent, DragEvent, DragPhase, LayoutPassEvent, ReorderEvent, RevealEvent,
    RevealPhase, TraceSink, TransitionBeginEvent, TransitionEndEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_LAYOUT_PASS: u8 = 1;
const TAG_TRANSITION_BEGIN: u8 = 2;
const TAG_TRANSITION_END: u8 = 3;
const TAG_REVEAL: u8 = 4;
const TAG_DRAG: u8 = 5;
const TAG_REORDER: u8 = 6;
const TAG_AUTOSCROLL: u8 = 7;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_index(&mut self, v: usize) {
        self.write_u64(v as u64);
    }

    fn write_option_index(&mut self, v: Option<usize>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_index(val);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_tag(&mut self, t: TransitionTag) {
        self.write_u8(match t {
            TransitionTag::Relayout => 0,
            TransitionTag::Flip => 1,
            TransitionTag::SnapshotLift => 2,
            TransitionTag::SnapshotSettle => 3,
            TransitionTag::NeighborShift => 4,
            TransitionTag::RevealedSettle => 5,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        self.write_u8(TAG_LAYOUT_PASS);
        self.write_u64(e.seq);
        self.write_index(e.item_count);
        self.write_index(e.regenerated);
        self.write_bool(e.reloaded);
        self.write_f64(e.offset_y);
        self.write_option_index(e.revealed);
    }

    fn on_transition_begin(&mut self, e: &TransitionBeginEvent) {
        self.write_u8(TAG_TRANSITION_BEGIN);
        self.write_u64(e.seq);
        self.write_u64(e.id.0);
        self.write_tag(e.kind);
        self.write_u64(e.duration.nanos());
        self.write_bool(e.blocking);
    }

    fn on_transition_end(&mut self, e: &TransitionEndEvent) {
        self.write_u8(TAG_TRANSITION_END);
        self.write_u64(e.seq);
        self.write_u64(e.id.0);
        self.write_tag(e.kind);
    }

    fn on_reveal(&mut self, e: &RevealEvent) {
        self.write_u8(TAG_REVEAL);
        self.write_u64(e.seq);
        self.write_index(e.index);
        self.write_u8(match e.phase {
            RevealPhase::WillReveal => 0,
            RevealPhase::DidReveal => 1,
            RevealPhase::WillUnreveal => 2,
            RevealPhase::DidUnreveal => 3,
            RevealPhase::Vetoed => 4,
        });
    }

    fn on_drag(&mut self, e: &DragEvent) {
        self.write_u8(TAG_DRAG);
        self.write_u64(e.seq);
        self.write_u8(match e.phase {
            DragPhase::Pressed => 0,
            DragPhase::Ended => 1,
            DragPhase::Settled => 2,
            DragPhase::Cancelled => 3,
        });
        self.write_index(e.start_index);
        self.write_index(e.current_index);
    }

    fn on_reorder(&mut self, e: &ReorderEvent) {
        self.write_u8(TAG_REORDER);
        self.write_u64(e.seq);
        self.write_index(e.from);
        self.write_index(e.to);
    }

    fn on_autoscroll(&mut self, e: &AutoscrollEvent) {
        self.write_u8(TAG_AUTOSCROLL);
        self.write_u64(e.seq);
        self.write_u64(e.now.nanos());
        self.write_u8(match e.direction {
            AutoscrollDirection::Up => 0,
            AutoscrollDirection::Down => 1,
        });
        self.write_f64(e.distance);
        self.write_f64(e.offset_y);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`LayoutPassEvent`].
    LayoutPass(LayoutPassEvent),
    /// A [`TransitionBeginEvent`].
    TransitionBegin(TransitionBeginEvent),
    /// A [`TransitionEndEvent`].
    TransitionEnd(TransitionEndEvent),
    /// A [`RevealEvent`].
    Reveal(RevealEvent),
    /// A [`DragEvent`].
    Drag(DragEvent),
    /// A [`ReorderEvent`].
    Reorder(ReorderEvent),
    /// An [`AutoscrollEvent`].
    Autoscroll(AutoscrollEvent),
}

impl RecordedEvent {
    /// Sequence number of the wrapped event.
    #[must_use]
    pub fn seq(&self) -> u64 {
        match self {
            Self::LayoutPass(e) => e.seq,
            Self::TransitionBegin(e) => e.seq,
            Self::TransitionEnd(e) => e.seq,
            Self::Reveal(e) => e.seq,
            Self::Drag(e) => e.seq,
            Self::Reorder(e) => e.seq,
            Self::Autoscroll(e) => e.seq,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
///
/// Stops at the first unknown tag or truncated record.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        let v = *self.data.get(self.pos)?;
        self.pos += 1;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_index(&mut self) -> Option<usize> {
        usize::try_from(self.read_u64()?).ok()
    }

    fn read_option_index(&mut self) -> Option<Option<usize>> {
        let present = self.read_u8()?;
        let val = self.read_index()?;
        Some((present != 0).then_some(val))
    }

    fn read_f64(&mut self) -> Option<f64> {
        Some(f64::from_bits(self.read_u64()?))
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_tag(&mut self) -> Option<TransitionTag> {
        Some(match self.read_u8()? {
            0 => TransitionTag::Relayout,
            1 => TransitionTag::Flip,
            2 => TransitionTag::SnapshotLift,
            3 => TransitionTag::SnapshotSettle,
            4 => TransitionTag::NeighborShift,
            _ => TransitionTag::RevealedSettle,
        })
    }

    fn decode_layout_pass(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayoutPass(LayoutPassEvent {
            seq: self.read_u64()?,
            item_count: self.read_index()?,
            regenerated: self.read_index()?,
            reloaded: self.read_bool()?,
            offset_y: self.read_f64()?,
            revealed: self.read_option_index()?,
        }))
    }

    fn decode_transition_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransitionBegin(TransitionBeginEvent {
            seq: self.read_u64()?,
            id: TransitionId(self.read_u64()?),
            kind: self.read_tag()?,
            duration: Duration(self.read_u64()?),
            blocking: self.read_bool()?,
        }))
    }

    fn decode_transition_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TransitionEnd(TransitionEndEvent {
            seq: self.read_u64()?,
            id: TransitionId(self.read_u64()?),
            kind: self.read_tag()?,
        }))
    }

    fn decode_reveal(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reveal(RevealEvent {
            seq: self.read_u64()?,
            index: self.read_index()?,
            phase: match self.read_u8()? {
                0 => RevealPhase::WillReveal,
                1 => RevealPhase::DidReveal,
                2 => RevealPhase::WillUnreveal,
                3 => RevealPhase::DidUnreveal,
                _ => RevealPhase::Vetoed,
            },
        }))
    }

    fn decode_drag(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Drag(DragEvent {
            seq: self.read_u64()?,
            phase: match self.read_u8()? {
                0 => DragPhase::Pressed,
                1 => DragPhase::Ended,
                2 => DragPhase::Settled,
                _ => DragPhase::Cancelled,
            },
            start_index: self.read_index()?,
            current_index: self.read_index()?,
        }))
    }

    fn decode_reorder(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reorder(ReorderEvent {
            seq: self.read_u64()?,
            from: self.read_index()?,
            to: self.read_index()?,
        }))
    }

    fn decode_autoscroll(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Autoscroll(AutoscrollEvent {
            seq: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            direction: if self.read_u8()? == 0 {
                AutoscrollDirection::Up
            } else {
                AutoscrollDirection::Down
            },
            distance: self.read_f64()?,
            offset_y: self.read_f64()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_LAYOUT_PASS => self.decode_layout_pass(),
            TAG_TRANSITION_BEGIN => self.decode_transition_begin(),
            TAG_TRANSITION_END => self.decode_transition_end(),
            TAG_REVEAL => self.decode_reveal(),
            TAG_DRAG => self.decode_drag(),
            TAG_REORDER => self.decode_reorder(),
            TAG_AUTOSCROLL => self.decode_autoscroll(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_pass_keeps_optional_reveal() {
        let mut rec = RecorderSink::new();
        rec.on_layout_pass(&LayoutPassEvent {
            seq: 3,
            item_count: 12,
            regenerated: 12,
            reloaded: true,
            offset_y: -64.5,
            revealed: Some(4),
        });
        rec.on_layout_pass(&LayoutPassEvent {
            seq: 4,
            item_count: 12,
            regenerated: 7,
            reloaded: false,
            offset_y: 0.0,
            revealed: None,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RecordedEvent::LayoutPass(e) => {
                assert_eq!(e.seq, 3);
                assert!(e.reloaded);
                assert_eq!(e.offset_y, -64.5);
                assert_eq!(e.revealed, Some(4));
            }
            other => panic!("expected LayoutPass, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::LayoutPass(e) => {
                assert_eq!(e.regenerated, 7);
                assert_eq!(e.revealed, None);
            }
            other => panic!("expected LayoutPass, got {other:?}"),
        }
    }

    #[test]
    fn transition_pair_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_transition_begin(&TransitionBeginEvent {
            seq: 0,
            id: TransitionId(9),
            kind: TransitionTag::Flip,
            duration: Duration::from_millis(500),
            blocking: true,
        });
        rec.on_reveal(&RevealEvent {
            seq: 1,
            index: 2,
            phase: RevealPhase::Vetoed,
        });
        rec.on_transition_end(&TransitionEndEvent {
            seq: 2,
            id: TransitionId(9),
            kind: TransitionTag::Flip,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.iter().map(RecordedEvent::seq).collect::<Vec<_>>(), [0, 1, 2]);
        match &events[0] {
            RecordedEvent::TransitionBegin(e) => {
                assert_eq!(e.id, TransitionId(9));
                assert_eq!(e.kind, TransitionTag::Flip);
                assert_eq!(e.duration, Duration::from_millis(500));
                assert!(e.blocking);
            }
            other => panic!("expected TransitionBegin, got {other:?}"),
        }
        assert!(matches!(
            events[1],
            RecordedEvent::Reveal(RevealEvent {
                index: 2,
                phase: RevealPhase::Vetoed,
                ..
            })
        ));
        assert!(matches!(events[2], RecordedEvent::TransitionEnd(_)));
    }

    #[test]
    fn drag_events_keep_indices() {
        let mut rec = RecorderSink::new();
        rec.on_drag(&DragEvent {
            seq: 0,
            phase: DragPhase::Pressed,
            start_index: 3,
            current_index: 3,
        });
        rec.on_reorder(&ReorderEvent {
            seq: 1,
            from: 4,
            to: 3,
        });
        rec.on_autoscroll(&AutoscrollEvent {
            seq: 2,
            now: HostTime(16_000_000),
            direction: AutoscrollDirection::Down,
            distance: 7.0,
            offset_y: 207.0,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            events[1],
            RecordedEvent::Reorder(ReorderEvent { from: 4, to: 3, .. })
        ));
        match &events[2] {
            RecordedEvent::Autoscroll(e) => {
                assert_eq!(e.now, HostTime(16_000_000));
                assert_eq!(e.direction, AutoscrollDirection::Down);
                assert_eq!(e.offset_y, 207.0);
            }
            other => panic!("expected Autoscroll, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_reorder(&ReorderEvent {
            seq: 0,
            from: 1,
            to: 2,
        });
        rec.on_reorder(&ReorderEvent {
            seq: 1,
            from: 2,
            to: 3,
        });
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(decode(cut).count(), 1);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        assert_eq!(decode(&[]).count(), 0);
    }
}
