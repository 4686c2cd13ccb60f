// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the update loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! [`Synchronizer`](crate::sync::Synchronizer) calls at each stage. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates the per-element [`OpacityEvent`]
//!   and the corresponding `TraceSink` method.

use crate::sync::ScrollAction;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What started an update pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassTrigger {
    /// The pass run once when an instance is set up.
    Eager,
    /// A frame callback scheduled by a scroll event.
    Frame,
    /// An explicit caller request.
    Manual,
}

/// Why a target or element was left untouched in a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The selector matched no elements.
    NoMatch,
    /// The element is detached from the render tree.
    Detached,
    /// The waypoint resolved to a zero-length distance.
    ZeroWaypoint,
    /// The viewport has no height.
    DegenerateViewport,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for every scroll event the synchronizer receives.
#[derive(Clone, Copy, Debug)]
pub struct ScrollEvent {
    /// Monotonic scroll-event counter.
    pub scroll_index: u64,
    /// Host time when the event was handled.
    pub timestamp: HostTime,
    /// What the synchronizer did with it.
    pub action: ScrollAction,
}

/// Marks the beginning of an update pass.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Monotonic pass counter.
    pub pass_index: u64,
    /// What started the pass.
    pub trigger: PassTrigger,
    /// Host time at the start of the pass.
    pub timestamp: HostTime,
    /// Viewport height read for this pass.
    pub viewport_height: f64,
    /// Number of configured targets.
    pub targets: u32,
}

/// A per-element opacity write.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct OpacityEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Index of the target spec.
    pub target_index: u32,
    /// Index of the element among the target's matches.
    pub element_index: u32,
    /// The opacity written.
    pub opacity: f64,
}

/// Emitted when a target or one of its elements is skipped.
#[derive(Clone, Copy, Debug)]
pub struct SkipEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Index of the target spec.
    pub target_index: u32,
    /// Index of the element, or `None` when the whole target was skipped.
    pub element_index: Option<u32>,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Per-pass summary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// What started the pass.
    pub trigger: PassTrigger,
    /// Host time at the start of the pass.
    pub timestamp: HostTime,
    /// Number of configured targets.
    pub targets: u32,
    /// Targets whose selector matched nothing.
    pub unmatched_targets: u32,
    /// Elements whose opacity was written.
    pub elements_updated: u32,
    /// Elements that were skipped.
    pub elements_skipped: u32,
}

/// Emitted once when a synchronizer is disposed.
#[derive(Clone, Copy, Debug)]
pub struct DisposeEvent {
    /// Host time of disposal.
    pub timestamp: HostTime,
    /// Passes run over the synchronizer's lifetime.
    pub passes: u64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the update loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called for every scroll event.
    fn on_scroll(&mut self, e: &ScrollEvent) {
        _ = e;
    }

    /// Called at the beginning of a pass.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called for every opacity write (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_opacity(&mut self, e: &OpacityEvent) {
        _ = e;
    }

    /// Called when a target or element is skipped.
    fn on_skip(&mut self, e: &SkipEvent) {
        _ = e;
    }

    /// Called with the summary at the end of a pass.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }

    /// Called when the synchronizer is disposed.
    fn on_dispose(&mut self, e: &DisposeEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`ScrollEvent`].
    #[inline]
    pub fn scroll(&mut self, e: &ScrollEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_scroll(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`OpacityEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn opacity(&mut self, e: &OpacityEvent) {
        if let Some(s) = &mut self.sink {
            s.on_opacity(e);
        }
    }

    /// Emits a [`SkipEvent`].
    #[inline]
    pub fn skip(&mut self, e: &SkipEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_skip(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits a [`DisposeEvent`].
    #[inline]
    pub fn dispose(&mut self, e: &DisposeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_dispose(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
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
            pass_index: 3,
            trigger: PassTrigger::Frame,
            timestamp: HostTime(16_000),
            targets: 2,
            unmatched_targets: 1,
            elements_updated: 4,
            elements_skipped: 0,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_scroll(&ScrollEvent {
            scroll_index: 0,
            timestamp: HostTime(0),
            action: ScrollAction::RequestFrame,
        });
        sink.on_pass_summary(&sample_summary());
        sink.on_dispose(&DisposeEvent {
            timestamp: HostTime(0),
            passes: 0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.pass_summary(&sample_summary());
        tracer.skip(&SkipEvent {
            pass_index: 0,
            target_index: 0,
            element_index: None,
            reason: SkipReason::NoMatch,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            passes: Vec<u64>,
        }
        impl TraceSink for RecordingSink {
            fn on_pass_summary(&mut self, s: &PassSummary) {
                self.passes.push(s.pass_index);
            }
        }

        let mut sink = RecordingSink { passes: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.pass_summary(&sample_summary());
        drop(tracer);
        assert_eq!(sink.passes, &[3]);
    }
}
