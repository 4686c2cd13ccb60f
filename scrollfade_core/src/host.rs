// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for document integrations.
//!
//! Scrollfade splits document-specific work into *backend* crates. Each
//! backend provides the following pieces:
//!
//! - **Element resolver** — [`Host::resolve`] turns a selector into the
//!   ordered list of elements that currently match it. An empty list is a
//!   normal answer.
//!
//! - **Geometry source** — [`Host::viewport_height`] and
//!   [`Host::bounding_rect`] report live, viewport-relative measurements.
//!   Elements that are not rendered report `None`.
//!
//! - **Style sink** — [`Host::set_opacity`] writes the rendered opacity.
//!
//! - **Frame scheduler** — Implements [`FrameScheduler`] to run a callback
//!   once before the next repaint, falling back to a timer when the host has
//!   no native animation-frame primitive (see [`pacing`](crate::pacing)).
//!
//! - **Scroll listener** — Subscribes to scroll events on the configured
//!   [`ScrollSource`](crate::target::ScrollSource) and forwards them to
//!   [`Driver::handle_scroll`](crate::driver::Driver::handle_scroll). This is
//!   backend-specific and not abstracted by a trait because subscription and
//!   teardown differ fundamentally across hosts.
//!
//! # Crate boundaries
//!
//! `scrollfade_core` owns the option model, the calculator, the update state
//! machine and this contract module. Backend crates depend on
//! `scrollfade_core` and provide document glue.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::time::HostTime;

/// Element lookup, geometry and style access for one document.
///
/// Both the DOM backend and in-memory test doubles implement this trait.
pub trait Host {
    /// Handle to one element.
    type Element;

    /// Returns the elements currently matching `selector`, in document order.
    fn resolve(&self, selector: &str) -> Vec<Self::Element>;

    /// Returns the current viewport height.
    fn viewport_height(&self) -> f64;

    /// Returns the element's bounding rectangle relative to the viewport, or
    /// `None` if it is detached from the render tree.
    fn bounding_rect(&self, element: &Self::Element) -> Option<Rect>;

    /// Sets the element's rendered opacity.
    fn set_opacity(&mut self, element: &Self::Element, opacity: f64);
}

/// Runs callbacks once before the next repaint.
pub trait FrameScheduler {
    /// Schedules `callback` to run once before the next repaint.
    fn request_frame(&self, callback: Box<dyn FnOnce()>);

    /// Withdraws every callback that has not run yet, where the host allows
    /// it.
    fn cancel_pending(&self) {}

    /// Returns the current host time.
    fn now(&self) -> HostTime;
}

impl<T: FrameScheduler + ?Sized> FrameScheduler for Rc<T> {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        (**self).request_frame(callback);
    }

    fn cancel_pending(&self) {
        (**self).cancel_pending();
    }

    fn now(&self) -> HostTime {
        (**self).now()
    }
}
