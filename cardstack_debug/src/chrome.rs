// Copyright 2026 the Cardstack Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Engine events carry sequence numbers rather than wall-clock time, so the
//! exported timeline is logical: event `seq` is placed at `seq` microseconds.
//! Transitions become async begin/end pairs keyed by their id.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        let ts = recorded.seq();
        match recorded {
            RecordedEvent::LayoutPass(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": if e.reloaded { "Reload" } else { "LayoutPass" },
                    "cat": "Layout",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "item_count": e.item_count,
                        "regenerated": e.regenerated,
                        "offset_y": e.offset_y,
                        "revealed": e.revealed,
                    }
                }));
            }
            RecordedEvent::TransitionBegin(e) => {
                events.push(json!({
                    "ph": "b",
                    "name": format!("{:?}", e.kind),
                    "cat": "Transition",
                    "id": e.id.0,
                    "ts": ts,
                    "pid": 0,
                    "tid": 1,
                    "args": {
                        "duration_ms": e.duration.nanos() as f64 / 1_000_000.0,
                        "blocking": e.blocking,
                    }
                }));
            }
            RecordedEvent::TransitionEnd(e) => {
                events.push(json!({
                    "ph": "e",
                    "name": format!("{:?}", e.kind),
                    "cat": "Transition",
                    "id": e.id.0,
                    "ts": ts,
                    "pid": 0,
                    "tid": 1,
                }));
            }
            RecordedEvent::Reveal(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.phase),
                    "cat": "Reveal",
                    "ts": ts,
                    "pid": 0,
                    "tid": 2,
                    "s": "t",
                    "args": {
                        "index": e.index,
                    }
                }));
            }
            RecordedEvent::Drag(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("Drag{:?}", e.phase),
                    "cat": "Drag",
                    "ts": ts,
                    "pid": 0,
                    "tid": 3,
                    "s": "t",
                    "args": {
                        "start_index": e.start_index,
                        "current_index": e.current_index,
                    }
                }));
            }
            RecordedEvent::Reorder(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Reorder",
                    "cat": "Drag",
                    "ts": ts,
                    "pid": 0,
                    "tid": 3,
                    "s": "t",
                    "args": {
                        "from": e.from,
                        "to": e.to,
                    }
                }));
            }
            RecordedEvent::Autoscroll(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": "offset_y",
                    "cat": "Autoscroll",
                    "ts": ts,
                    "pid": 0,
                    "args": {
                        "offset_y": e.offset_y,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use cardstack_core::effect::{TransitionId, TransitionTag};
    use cardstack_core::time::Duration;
    use cardstack_core::trace::{
        RevealEvent, RevealPhase, TraceSink, TransitionBeginEvent, TransitionEndEvent,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_transition_begin(&TransitionBeginEvent {
            seq: 0,
            id: TransitionId(1),
            kind: TransitionTag::Relayout,
            duration: Duration::from_millis(300),
            blocking: true,
        });
        rec.on_reveal(&RevealEvent {
            seq: 1,
            index: 4,
            phase: RevealPhase::WillReveal,
        });
        rec.on_transition_end(&TransitionEndEvent {
            seq: 2,
            id: TransitionId(1),
            kind: TransitionTag::Relayout,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "b");
        assert_eq!(parsed[0]["name"], "Relayout");
        assert_eq!(parsed[0]["id"], 1);
        assert_eq!(parsed[0]["args"]["duration_ms"], 300.0);

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "WillReveal");
        assert_eq!(parsed[1]["args"]["index"], 4);

        assert_eq!(parsed[2]["ph"], "e");
        assert_eq!(parsed[2]["ts"], 2);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
