// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use scrollfade_core::sync::ScrollAction;
use scrollfade_core::time::{HostTime, Timebase};
use scrollfade_core::trace::{
    DisposeEvent, OpacityEvent, PassBeginEvent, PassSummary, PassTrigger, ScrollEvent, SkipEvent,
    SkipReason, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn host_us(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1000.0
    }
}

fn action_name(action: ScrollAction) -> &'static str {
    match action {
        ScrollAction::RequestFrame => "request",
        ScrollAction::Absorbed => "absorbed",
        ScrollAction::Ignored => "ignored",
    }
}

fn trigger_name(trigger: PassTrigger) -> &'static str {
    match trigger {
        PassTrigger::Eager => "eager",
        PassTrigger::Frame => "frame",
        PassTrigger::Manual => "manual",
    }
}

fn reason_name(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NoMatch => "no-match",
        SkipReason::Detached => "detached",
        SkipReason::ZeroWaypoint => "zero-waypoint",
        SkipReason::DegenerateViewport => "no-viewport",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_scroll(&mut self, e: &ScrollEvent) {
        let _ = writeln!(
            self.writer,
            "[scroll] #{} at {:.1}µs {}",
            e.scroll_index,
            self.host_us(e.timestamp),
            action_name(e.action),
        );
    }

    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] pass={} {} at {:.1}µs viewport={}px targets={}",
            e.pass_index,
            trigger_name(e.trigger),
            self.host_us(e.timestamp),
            e.viewport_height,
            e.targets,
        );
    }

    fn on_opacity(&mut self, e: &OpacityEvent) {
        let _ = writeln!(
            self.writer,
            "[opacity] pass={} target={} element={} opacity={:.2}",
            e.pass_index, e.target_index, e.element_index, e.opacity,
        );
    }

    fn on_skip(&mut self, e: &SkipEvent) {
        let element = match e.element_index {
            Some(i) => format!(" element={i}"),
            None => String::new(),
        };
        let _ = writeln!(
            self.writer,
            "[skip] pass={} target={}{element} {}",
            e.pass_index,
            e.target_index,
            reason_name(e.reason),
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] pass={} {} targets={} unmatched={} updated={} skipped={}",
            s.pass_index,
            trigger_name(s.trigger),
            s.targets,
            s.unmatched_targets,
            s.elements_updated,
            s.elements_skipped,
        );
    }

    fn on_dispose(&mut self, e: &DisposeEvent) {
        let _ = writeln!(
            self.writer,
            "[dispose] at {:.1}µs after {} passes",
            self.host_us(e.timestamp),
            e.passes,
        );
    }
}
