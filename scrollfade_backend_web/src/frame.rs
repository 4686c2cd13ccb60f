// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame scheduling.
//!
//! [`WebFrameScheduler`] implements [`FrameScheduler`] with one-shot
//! `requestAnimationFrame` callbacks. Where the call throws (the function is
//! missing), it switches permanently to `setTimeout`, paced by a
//! [`FallbackPacer`] so emulated frames stay about 16 ms apart.
//!
//! [`FrameScheduler`]: scrollfade_core::host::FrameScheduler

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use scrollfade_core::host::FrameScheduler;
use scrollfade_core::pacing::FallbackPacer;
use scrollfade_core::time::HostTime;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Direct global bindings instead of `web_sys::Window` methods, so a missing
// `requestAnimationFrame` surfaces as a caught exception.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(catch, js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> Result<i32, JsValue>;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);

    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(callback: &JsValue, delay_ms: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

#[derive(Clone, Copy, Debug)]
enum HostHandle {
    Animation(i32),
    Timeout(i32),
}

struct SchedulerInner {
    /// Set once `requestAnimationFrame` has thrown.
    use_timeout: Cell<bool>,
    pacer: RefCell<FallbackPacer>,
    /// Requests that have not run yet, keyed by a local token.
    pending: RefCell<Vec<(u64, HostHandle)>>,
    next_token: Cell<u64>,
}

impl SchedulerInner {
    fn finish(&self, token: u64) {
        self.pending.borrow_mut().retain(|(t, _)| *t != token);
    }
}

/// Frame scheduler backed by `requestAnimationFrame`.
///
/// Each scroll listener owns its own scheduler, so
/// [`cancel_pending`](FrameScheduler::cancel_pending) only withdraws that
/// listener's frames.
pub struct WebFrameScheduler {
    inner: Rc<SchedulerInner>,
}

impl WebFrameScheduler {
    /// Creates a scheduler that tries `requestAnimationFrame` first.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SchedulerInner {
                use_timeout: Cell::new(false),
                pacer: RefCell::new(FallbackPacer::with_timebase(crate::timebase())),
                pending: RefCell::new(Vec::new()),
                next_token: Cell::new(0),
            }),
        }
    }

    /// Returns `true` once the scheduler has fallen back to `setTimeout`.
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.inner.use_timeout.get()
    }

    /// Returns the number of requests that have not run yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    fn schedule_timeout(&self, callback: &JsValue) -> HostHandle {
        let delay = self.inner.pacer.borrow_mut().next_delay(crate::now());
        let delay_ms = i32::try_from(delay.as_millis(crate::timebase())).unwrap_or(i32::MAX);
        HostHandle::Timeout(set_timeout(callback, delay_ms))
    }
}

impl Default for WebFrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for WebFrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        let token = self.inner.next_token.get();
        self.inner.next_token.set(token + 1);

        let weak: Weak<SchedulerInner> = Rc::downgrade(&self.inner);
        let js_callback = Closure::once_into_js(move || {
            if let Some(inner) = weak.upgrade() {
                inner.finish(token);
            }
            callback();
        });

        let handle = if self.inner.use_timeout.get() {
            self.schedule_timeout(&js_callback)
        } else {
            match request_animation_frame(&js_callback) {
                Ok(id) => HostHandle::Animation(id),
                Err(_) => {
                    self.inner.use_timeout.set(true);
                    self.schedule_timeout(&js_callback)
                }
            }
        };
        self.inner.pending.borrow_mut().push((token, handle));
    }

    fn cancel_pending(&self) {
        // A cancelled once-closure is never invoked, so its JS wrapper leaks.
        for (_, handle) in self.inner.pending.take() {
            match handle {
                HostHandle::Animation(id) => cancel_animation_frame(id),
                HostHandle::Timeout(id) => clear_timeout(id),
            }
        }
    }

    fn now(&self) -> HostTime {
        crate::now()
    }
}

impl core::fmt::Debug for WebFrameScheduler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebFrameScheduler")
            .field("fallback", &self.inner.use_timeout.get())
            .field("pending", &self.inner.pending.borrow().len())
            .finish()
    }
}
