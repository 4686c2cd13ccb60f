// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].

use scrollfade_core::sync::ScrollAction;
use scrollfade_core::time::HostTime;
use scrollfade_core::trace::{
    DisposeEvent, OpacityEvent, PassBeginEvent, PassSummary, PassTrigger, ScrollEvent, SkipEvent,
    SkipReason, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SCROLL: u8 = 1;
const TAG_PASS_BEGIN: u8 = 2;
const TAG_OPACITY: u8 = 3;
const TAG_SKIP: u8 = 4;
const TAG_PASS_SUMMARY: u8 = 5;
const TAG_DISPOSE: u8 = 6;

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

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_option_u32(&mut self, v: Option<u32>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u32(val);
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
            }
        }
    }

    fn write_action(&mut self, a: ScrollAction) {
        self.write_u8(match a {
            ScrollAction::RequestFrame => 0,
            ScrollAction::Absorbed => 1,
            ScrollAction::Ignored => 2,
        });
    }

    fn write_trigger(&mut self, t: PassTrigger) {
        self.write_u8(match t {
            PassTrigger::Eager => 0,
            PassTrigger::Frame => 1,
            PassTrigger::Manual => 2,
        });
    }

    fn write_reason(&mut self, r: SkipReason) {
        self.write_u8(match r {
            SkipReason::NoMatch => 0,
            SkipReason::Detached => 1,
            SkipReason::ZeroWaypoint => 2,
            SkipReason::DegenerateViewport => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_scroll(&mut self, e: &ScrollEvent) {
        self.write_u8(TAG_SCROLL);
        self.write_u64(e.scroll_index);
        self.write_u64(e.timestamp.ticks());
        self.write_action(e.action);
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.write_u8(TAG_PASS_BEGIN);
        self.write_u64(e.pass_index);
        self.write_trigger(e.trigger);
        self.write_u64(e.timestamp.ticks());
        self.write_f64(e.viewport_height);
        self.write_u32(e.targets);
    }

    fn on_opacity(&mut self, e: &OpacityEvent) {
        self.write_u8(TAG_OPACITY);
        self.write_u64(e.pass_index);
        self.write_u32(e.target_index);
        self.write_u32(e.element_index);
        self.write_f64(e.opacity);
    }

    fn on_skip(&mut self, e: &SkipEvent) {
        self.write_u8(TAG_SKIP);
        self.write_u64(e.pass_index);
        self.write_u32(e.target_index);
        self.write_option_u32(e.element_index);
        self.write_reason(e.reason);
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        self.write_u8(TAG_PASS_SUMMARY);
        self.write_u64(s.pass_index);
        self.write_trigger(s.trigger);
        self.write_u64(s.timestamp.ticks());
        self.write_u32(s.targets);
        self.write_u32(s.unmatched_targets);
        self.write_u32(s.elements_updated);
        self.write_u32(s.elements_skipped);
    }

    fn on_dispose(&mut self, e: &DisposeEvent) {
        self.write_u8(TAG_DISPOSE);
        self.write_u64(e.timestamp.ticks());
        self.write_u64(e.passes);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`ScrollEvent`].
    Scroll(ScrollEvent),
    /// A [`PassBeginEvent`].
    PassBegin(PassBeginEvent),
    /// An [`OpacityEvent`].
    Opacity(OpacityEvent),
    /// A [`SkipEvent`].
    Skip(SkipEvent),
    /// A [`PassSummary`].
    PassSummary(PassSummary),
    /// A [`DisposeEvent`].
    Dispose(DisposeEvent),
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
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.read_array::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_option_u32(&mut self) -> Option<Option<u32>> {
        let present = self.read_u8()?;
        let val = self.read_u32()?;
        Some((present != 0).then_some(val))
    }

    fn read_action(&mut self) -> Option<ScrollAction> {
        Some(match self.read_u8()? {
            0 => ScrollAction::RequestFrame,
            1 => ScrollAction::Absorbed,
            _ => ScrollAction::Ignored,
        })
    }

    fn read_trigger(&mut self) -> Option<PassTrigger> {
        Some(match self.read_u8()? {
            0 => PassTrigger::Eager,
            1 => PassTrigger::Frame,
            _ => PassTrigger::Manual,
        })
    }

    fn read_reason(&mut self) -> Option<SkipReason> {
        Some(match self.read_u8()? {
            0 => SkipReason::NoMatch,
            1 => SkipReason::Detached,
            2 => SkipReason::ZeroWaypoint,
            _ => SkipReason::DegenerateViewport,
        })
    }

    fn decode_scroll(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Scroll(ScrollEvent {
            scroll_index: self.read_u64()?,
            timestamp: HostTime(self.read_u64()?),
            action: self.read_action()?,
        }))
    }

    fn decode_pass_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassBegin(PassBeginEvent {
            pass_index: self.read_u64()?,
            trigger: self.read_trigger()?,
            timestamp: HostTime(self.read_u64()?),
            viewport_height: self.read_f64()?,
            targets: self.read_u32()?,
        }))
    }

    fn decode_opacity(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Opacity(OpacityEvent {
            pass_index: self.read_u64()?,
            target_index: self.read_u32()?,
            element_index: self.read_u32()?,
            opacity: self.read_f64()?,
        }))
    }

    fn decode_skip(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Skip(SkipEvent {
            pass_index: self.read_u64()?,
            target_index: self.read_u32()?,
            element_index: self.read_option_u32()?,
            reason: self.read_reason()?,
        }))
    }

    fn decode_pass_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PassSummary(PassSummary {
            pass_index: self.read_u64()?,
            trigger: self.read_trigger()?,
            timestamp: HostTime(self.read_u64()?),
            targets: self.read_u32()?,
            unmatched_targets: self.read_u32()?,
            elements_updated: self.read_u32()?,
            elements_skipped: self.read_u32()?,
        }))
    }

    fn decode_dispose(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Dispose(DisposeEvent {
            timestamp: HostTime(self.read_u64()?),
            passes: self.read_u64()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_SCROLL => self.decode_scroll(),
            TAG_PASS_BEGIN => self.decode_pass_begin(),
            TAG_OPACITY => self.decode_opacity(),
            TAG_SKIP => self.decode_skip(),
            TAG_PASS_SUMMARY => self.decode_pass_summary(),
            TAG_DISPOSE => self.decode_dispose(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> PassSummary {
        PassSummary {
            pass_index: 4,
            trigger: PassTrigger::Frame,
            timestamp: HostTime(64_000),
            targets: 3,
            unmatched_targets: 1,
            elements_updated: 5,
            elements_skipped: 2,
        }
    }

    #[test]
    fn summary_survives_recording() {
        let mut rec = RecorderSink::new();
        rec.on_pass_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        let RecordedEvent::PassSummary(s) = &events[0] else {
            panic!("expected PassSummary, got {:?}", events[0]);
        };
        assert_eq!(*s, sample_summary());
    }

    #[test]
    fn mixed_stream_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_scroll(&ScrollEvent {
            scroll_index: 0,
            timestamp: HostTime(10),
            action: ScrollAction::RequestFrame,
        });
        rec.on_pass_begin(&PassBeginEvent {
            pass_index: 1,
            trigger: PassTrigger::Frame,
            timestamp: HostTime(16_000),
            viewport_height: 812.5,
            targets: 1,
        });
        rec.on_opacity(&OpacityEvent {
            pass_index: 1,
            target_index: 0,
            element_index: 2,
            opacity: -0.35,
        });
        rec.on_skip(&SkipEvent {
            pass_index: 1,
            target_index: 0,
            element_index: Some(3),
            reason: SkipReason::Detached,
        });
        rec.on_dispose(&DisposeEvent {
            timestamp: HostTime(20_000),
            passes: 2,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(
            events[0],
            RecordedEvent::Scroll(ScrollEvent {
                action: ScrollAction::RequestFrame,
                ..
            })
        ));
        match &events[1] {
            RecordedEvent::PassBegin(e) => {
                assert_eq!(e.viewport_height, 812.5);
                assert_eq!(e.trigger, PassTrigger::Frame);
            }
            other => panic!("expected PassBegin, got {other:?}"),
        }
        match &events[2] {
            RecordedEvent::Opacity(e) => assert_eq!(e.opacity, -0.35),
            other => panic!("expected Opacity, got {other:?}"),
        }
        match &events[3] {
            RecordedEvent::Skip(e) => {
                assert_eq!(e.element_index, Some(3));
                assert_eq!(e.reason, SkipReason::Detached);
            }
            other => panic!("expected Skip, got {other:?}"),
        }
        assert!(matches!(
            events[4],
            RecordedEvent::Dispose(DisposeEvent { passes: 2, .. })
        ));
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_pass_summary(&sample_summary());
        rec.on_pass_summary(&sample_summary());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 3]).collect();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        assert_eq!(decode(&[0xFF, 1, 2, 3]).count(), 0);
    }
}
