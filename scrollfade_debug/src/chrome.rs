// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//! Passes become begin/end slices; scrolls, skips and disposal become instant
//! events.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use scrollfade_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
/// Opacity and skip events carry no timestamp of their own and are placed at
/// the start of their pass.
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut pass_start = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Scroll(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Scroll",
                    "cat": "Input",
                    "ts": ticks_to_us(e.timestamp.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "scroll_index": e.scroll_index,
                        "action": format!("{:?}", e.action),
                    }
                }));
            }
            RecordedEvent::PassBegin(e) => {
                pass_start = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "B",
                    "name": "Pass",
                    "cat": "Pass",
                    "ts": pass_start,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": e.pass_index,
                        "trigger": format!("{:?}", e.trigger),
                        "viewport_height": e.viewport_height,
                        "targets": e.targets,
                    }
                }));
            }
            RecordedEvent::Opacity(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Opacity",
                    "cat": "Rich",
                    "ts": pass_start,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "pass_index": e.pass_index,
                        "target_index": e.target_index,
                        "element_index": e.element_index,
                        "opacity": e.opacity,
                    }
                }));
            }
            RecordedEvent::Skip(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Skip",
                    "cat": "Pass",
                    "ts": pass_start,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "pass_index": e.pass_index,
                        "target_index": e.target_index,
                        "element_index": e.element_index,
                        "reason": format!("{:?}", e.reason),
                    }
                }));
            }
            RecordedEvent::PassSummary(s) => {
                events.push(json!({
                    "ph": "E",
                    "name": "Pass",
                    "cat": "Pass",
                    "ts": ticks_to_us(s.timestamp.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "pass_index": s.pass_index,
                        "unmatched_targets": s.unmatched_targets,
                        "elements_updated": s.elements_updated,
                        "elements_skipped": s.elements_skipped,
                    }
                }));
            }
            RecordedEvent::Dispose(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Dispose",
                    "cat": "Lifecycle",
                    "ts": ticks_to_us(e.timestamp.ticks(), timebase),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "passes": e.passes,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}
