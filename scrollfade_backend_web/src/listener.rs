// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll event wiring.

use alloc::boxed::Box;

use scrollfade_core::driver::Driver;
use scrollfade_core::host::FrameScheduler;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

use crate::dom::DomHost;
use crate::frame::WebFrameScheduler;
use crate::WebError;

type ScrollClosure = Closure<dyn FnMut(Event)>;

/// A passive `scroll` listener feeding one [`Driver`].
///
/// Disposing (or dropping) the listener unregisters it and disposes the
/// driver, cancelling any pending frame.
pub struct ScrollListener<F: FrameScheduler + 'static = WebFrameScheduler> {
    target: EventTarget,
    driver: Driver<DomHost, F>,
    closure: Option<ScrollClosure>,
}

impl<F: FrameScheduler + 'static> ScrollListener<F> {
    /// Registers `driver` for scroll events on `target`.
    pub fn attach(target: EventTarget, driver: Driver<DomHost, F>) -> Result<Self, WebError> {
        let handle = driver.clone();
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            handle.handle_scroll();
        }) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                "scroll",
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| WebError::from_js(&e))?;

        Ok(Self {
            target,
            driver,
            closure: Some(closure),
        })
    }

    /// Returns the driver.
    #[must_use]
    pub fn driver(&self) -> &Driver<DomHost, F> {
        &self.driver
    }

    /// Returns `true` once disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.closure.is_none()
    }

    /// Unregisters the listener and disposes the driver.
    ///
    /// Calling this more than once is harmless.
    pub fn dispose(&mut self) {
        if let Some(closure) = self.closure.take() {
            _ = self
                .target
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
        }
        self.driver.dispose();
    }
}

impl<F: FrameScheduler + 'static> Drop for ScrollListener<F> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<F: FrameScheduler + 'static> core::fmt::Debug for ScrollListener<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollListener")
            .field("attached", &self.closure.is_some())
            .field("passes", &self.driver.passes())
            .finish_non_exhaustive()
    }
}
