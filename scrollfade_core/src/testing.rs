// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory test doubles for the host contract.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Rect;

use crate::host::{FrameScheduler, Host};
use crate::time::HostTime;

struct FakeElement {
    selectors: Vec<&'static str>,
    rect: Rect,
    attached: bool,
    opacity: Option<f64>,
    writes: u32,
}

struct DocState {
    viewport_height: f64,
    elements: Vec<FakeElement>,
}

/// A document whose geometry tests can change while a synchronizer owns it.
#[derive(Clone)]
pub(crate) struct FakeDocument {
    state: Rc<RefCell<DocState>>,
}

impl FakeDocument {
    pub(crate) fn new(viewport_height: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(DocState {
                viewport_height,
                elements: Vec::new(),
            })),
        }
    }

    /// Adds an element matched by each of `selectors`; returns its handle.
    pub(crate) fn add(&self, selectors: &[&'static str], top: f64, height: f64) -> usize {
        let mut state = self.state.borrow_mut();
        state.elements.push(FakeElement {
            selectors: selectors.to_vec(),
            rect: Rect::new(0.0, top, 100.0, top + height),
            attached: true,
            opacity: None,
            writes: 0,
        });
        state.elements.len() - 1
    }

    /// Moves every element up by `dy`, as scrolling down would.
    pub(crate) fn scroll_by(&self, dy: f64) {
        for el in &mut self.state.borrow_mut().elements {
            el.rect = Rect::new(el.rect.x0, el.rect.y0 - dy, el.rect.x1, el.rect.y1 - dy);
        }
    }

    pub(crate) fn detach(&self, id: usize) {
        self.state.borrow_mut().elements[id].attached = false;
    }

    pub(crate) fn opacity(&self, id: usize) -> Option<f64> {
        self.state.borrow().elements[id].opacity
    }

    pub(crate) fn writes(&self, id: usize) -> u32 {
        self.state.borrow().elements[id].writes
    }
}

impl Host for FakeDocument {
    type Element = usize;

    fn resolve(&self, selector: &str) -> Vec<usize> {
        let state = self.state.borrow();
        (0..state.elements.len())
            .filter(|&id| state.elements[id].selectors.iter().any(|s| *s == selector))
            .collect()
    }

    fn viewport_height(&self) -> f64 {
        self.state.borrow().viewport_height
    }

    fn bounding_rect(&self, element: &usize) -> Option<Rect> {
        let state = self.state.borrow();
        let el = &state.elements[*element];
        el.attached.then_some(el.rect)
    }

    fn set_opacity(&mut self, element: &usize, opacity: f64) {
        let mut state = self.state.borrow_mut();
        let el = &mut state.elements[*element];
        el.opacity = Some(opacity);
        el.writes += 1;
    }
}

/// A frame scheduler that runs callbacks only when the test says so.
#[derive(Default)]
pub(crate) struct ManualFrames {
    queue: RefCell<Vec<Box<dyn FnOnce()>>>,
    clock: Cell<u64>,
    cancelled: Cell<usize>,
}

impl ManualFrames {
    pub(crate) fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    pub(crate) fn cancelled(&self) -> usize {
        self.cancelled.get()
    }

    /// Runs every callback queued before this call; returns how many ran.
    pub(crate) fn run_frame(&self) -> usize {
        let batch = core::mem::take(&mut *self.queue.borrow_mut());
        let ran = batch.len();
        for callback in batch {
            callback();
        }
        self.clock.set(self.clock.get() + 16_000);
        ran
    }
}

impl FrameScheduler for ManualFrames {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        self.queue.borrow_mut().push(callback);
    }

    fn cancel_pending(&self) {
        let dropped = core::mem::take(&mut *self.queue.borrow_mut()).len();
        self.cancelled.set(self.cancelled.get() + dropped);
    }

    fn now(&self) -> HostTime {
        HostTime(self.clock.get())
    }
}
