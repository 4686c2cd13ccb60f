// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wiring a [`Synchronizer`] to a [`FrameScheduler`].
//!
//! [`Driver`] is the handle a backend's scroll listener holds. It runs the
//! eager pass on construction, turns [`ScrollAction::RequestFrame`] into a
//! frame request whose callback runs [`Synchronizer::on_frame`], and tears
//! everything down on [`dispose`](Driver::dispose).
//!
//! Frame callbacks hold only a weak reference, so a dropped driver never
//! keeps its host alive and a late callback is a no-op.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use crate::host::{FrameScheduler, Host};
use crate::sync::{FrameState, ScrollAction, Synchronizer};
use crate::trace::{PassSummary, PassTrigger, TraceSink, Tracer};

struct DriverInner<H: Host, F> {
    sync: RefCell<Synchronizer<H>>,
    frames: F,
    sink: RefCell<Option<Box<dyn TraceSink>>>,
}

impl<H: Host, F: FrameScheduler> DriverInner<H, F> {
    fn with_tracer<R>(&self, f: impl FnOnce(&mut Tracer<'_>) -> R) -> R {
        let mut sink = self.sink.borrow_mut();
        let mut tracer = match sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        f(&mut tracer)
    }

    fn run_pass(&self, trigger: PassTrigger) -> Option<PassSummary> {
        let now = self.frames.now();
        self.with_tracer(|tracer| self.sync.borrow_mut().apply_now(trigger, now, tracer))
    }

    fn run_frame(&self) -> Option<PassSummary> {
        let now = self.frames.now();
        self.with_tracer(|tracer| self.sync.borrow_mut().on_frame(now, tracer))
    }
}

/// A synchronizer attached to a frame scheduler.
///
/// Cloning yields another handle to the same instance.
pub struct Driver<H: Host, F> {
    inner: Rc<DriverInner<H, F>>,
}

impl<H: Host, F> Clone for Driver<H, F> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: Host, F> core::fmt::Debug for Driver<H, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Driver")
            .field("sync", &self.inner.sync)
            .finish_non_exhaustive()
    }
}

impl<H: Host + 'static, F: FrameScheduler + 'static> Driver<H, F> {
    /// Creates a driver and runs the eager pass.
    #[must_use]
    pub fn new(sync: Synchronizer<H>, frames: F) -> Self {
        Self::build(sync, frames, None)
    }

    /// Creates a driver that reports to `sink`, and runs the eager pass.
    #[must_use]
    pub fn with_sink(sync: Synchronizer<H>, frames: F, sink: Box<dyn TraceSink>) -> Self {
        Self::build(sync, frames, Some(sink))
    }

    fn build(sync: Synchronizer<H>, frames: F, sink: Option<Box<dyn TraceSink>>) -> Self {
        let driver = Self {
            inner: Rc::new(DriverInner {
                sync: RefCell::new(sync),
                frames,
                sink: RefCell::new(sink),
            }),
        };
        driver.inner.run_pass(PassTrigger::Eager);
        driver
    }

    /// Runs a pass immediately, outside the frame cycle.
    pub fn apply_now(&self) -> Option<PassSummary> {
        self.inner.run_pass(PassTrigger::Manual)
    }

    /// Handles one scroll event, requesting a frame if the synchronizer asks
    /// for one.
    pub fn handle_scroll(&self) -> ScrollAction {
        let now = self.inner.frames.now();
        let action = self
            .inner
            .with_tracer(|tracer| self.inner.sync.borrow_mut().on_scroll(now, tracer));
        if action == ScrollAction::RequestFrame {
            let weak = Rc::downgrade(&self.inner);
            self.inner.frames.request_frame(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.run_frame();
                }
            }));
        }
        action
    }

    /// Cancels pending frames and disposes the synchronizer.
    pub fn dispose(&self) {
        self.inner.frames.cancel_pending();
        let now = self.inner.frames.now();
        self.inner
            .with_tracer(|tracer| self.inner.sync.borrow_mut().dispose(now, tracer));
    }

    /// Returns `true` once disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.sync.borrow().is_disposed()
    }

    /// Returns the synchronizer's frame state.
    #[must_use]
    pub fn state(&self) -> FrameState {
        self.inner.sync.borrow().state()
    }

    /// Returns the number of passes run so far, including the eager one.
    #[must_use]
    pub fn passes(&self) -> u64 {
        self.inner.sync.borrow().passes()
    }

    /// Returns the frame scheduler.
    #[must_use]
    pub fn frames(&self) -> &F {
        &self.inner.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Direction, Options, Waypoint};
    use crate::sync::SyncConfig;
    use crate::target::TargetSpec;
    use crate::testing::{FakeDocument, ManualFrames};
    use alloc::vec;

    fn bottom_self(selector: &str) -> TargetSpec {
        TargetSpec::new(
            selector,
            Options::new(Direction::Bottom, Waypoint::SelfRelative),
        )
        .unwrap()
    }

    fn driver(
        doc: &FakeDocument,
        config: SyncConfig,
    ) -> (Driver<FakeDocument, Rc<ManualFrames>>, Rc<ManualFrames>) {
        let frames = Rc::new(ManualFrames::default());
        let sync = Synchronizer::new(doc.clone(), vec![bottom_self(".box")], config);
        (Driver::new(sync, Rc::clone(&frames)), frames)
    }

    #[test]
    fn construction_runs_one_eager_pass() {
        let doc = FakeDocument::new(800.0);
        let el = doc.add(&[".box"], 400.0, 400.0);
        let (driver, frames) = driver(&doc, SyncConfig::default());

        assert_eq!(driver.passes(), 1);
        assert_eq!(doc.opacity(el), Some(1.0));
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn scroll_burst_collapses_into_one_pass_with_latest_geometry() {
        let doc = FakeDocument::new(800.0);
        let el = doc.add(&[".box"], 800.0, 400.0);
        let (driver, frames) = driver(&doc, SyncConfig::coalescing());
        assert_eq!(doc.opacity(el), Some(0.0));

        for _ in 0..5 {
            doc.scroll_by(40.0);
            driver.handle_scroll();
        }
        assert_eq!(frames.pending(), 1);
        assert_eq!(frames.run_frame(), 1);

        assert_eq!(driver.passes(), 2);
        assert_eq!(doc.writes(el), 2);
        // 200px scrolled: (800 - 600) / 400
        assert_eq!(doc.opacity(el), Some(0.5));
        assert_eq!(driver.state(), FrameState::Idle);

        doc.scroll_by(100.0);
        assert_eq!(driver.handle_scroll(), ScrollAction::RequestFrame);
        frames.run_frame();
        assert_eq!(doc.opacity(el), Some(0.75));
    }

    #[test]
    fn per_event_policy_runs_a_pass_per_scroll() {
        let doc = FakeDocument::new(800.0);
        let el = doc.add(&[".box"], 800.0, 400.0);
        let (driver, frames) = driver(&doc, SyncConfig::per_event());

        for _ in 0..4 {
            doc.scroll_by(50.0);
            driver.handle_scroll();
        }
        assert_eq!(frames.pending(), 4);
        assert_eq!(frames.run_frame(), 4);

        assert_eq!(driver.passes(), 5);
        assert_eq!(doc.opacity(el), Some(0.5));
    }

    #[test]
    fn dispose_cancels_pending_frames_and_stops_updates() {
        let doc = FakeDocument::new(800.0);
        let el = doc.add(&[".box"], 800.0, 400.0);
        let (driver, frames) = driver(&doc, SyncConfig::default());

        doc.scroll_by(100.0);
        driver.handle_scroll();
        driver.dispose();

        assert!(driver.is_disposed());
        assert_eq!(frames.cancelled(), 1);
        assert_eq!(frames.run_frame(), 0);
        assert_eq!(driver.handle_scroll(), ScrollAction::Ignored);
        assert_eq!(frames.pending(), 0);
        assert_eq!(doc.writes(el), 1);
    }

    #[test]
    fn late_frame_after_drop_is_a_no_op() {
        let doc = FakeDocument::new(800.0);
        let el = doc.add(&[".box"], 800.0, 400.0);
        let (driver, frames) = driver(&doc, SyncConfig::default());

        driver.handle_scroll();
        drop(driver);
        assert_eq!(frames.run_frame(), 1);
        assert_eq!(doc.writes(el), 1);
    }

    #[test]
    fn clones_share_one_instance() {
        let doc = FakeDocument::new(800.0);
        doc.add(&[".box"], 800.0, 400.0);
        let (driver, frames) = driver(&doc, SyncConfig::default());
        let listener_handle = driver.clone();

        assert_eq!(listener_handle.handle_scroll(), ScrollAction::RequestFrame);
        assert_eq!(driver.handle_scroll(), ScrollAction::Absorbed);
        frames.run_frame();
        assert_eq!(driver.passes(), 2);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn sink_sees_scrolls_and_passes() {
        use crate::trace::ScrollEvent;
        use alloc::vec::Vec;

        #[derive(Default)]
        struct Log {
            scrolls: Vec<ScrollAction>,
            passes: Vec<PassTrigger>,
        }
        struct SharedSink(Rc<RefCell<Log>>);
        impl TraceSink for SharedSink {
            fn on_scroll(&mut self, e: &ScrollEvent) {
                self.0.borrow_mut().scrolls.push(e.action);
            }
            fn on_pass_summary(&mut self, s: &PassSummary) {
                self.0.borrow_mut().passes.push(s.trigger);
            }
        }

        let doc = FakeDocument::new(800.0);
        doc.add(&[".box"], 800.0, 400.0);
        let log = Rc::new(RefCell::new(Log::default()));
        let frames = Rc::new(ManualFrames::default());
        let sync = Synchronizer::new(doc, vec![bottom_self(".box")], SyncConfig::default());
        let driver = Driver::with_sink(
            sync,
            Rc::clone(&frames),
            Box::new(SharedSink(Rc::clone(&log))),
        );

        driver.handle_scroll();
        driver.handle_scroll();
        frames.run_frame();

        let log = log.borrow();
        assert_eq!(
            log.scrolls,
            [ScrollAction::RequestFrame, ScrollAction::Absorbed]
        );
        assert_eq!(log.passes, [PassTrigger::Eager, PassTrigger::Frame]);
    }
}
