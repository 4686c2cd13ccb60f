// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for scrollfade.
//!
//! This crate connects [`scrollfade_core`] to browser APIs:
//!
//! - [`DomHost`]: selector resolution, bounding rects, viewport height and
//!   inline `opacity` writes
//! - [`WebFrameScheduler`]: `requestAnimationFrame` frame requests, with a
//!   paced `setTimeout` fallback
//! - [`ScrollListener`]: a passive `scroll` listener driving one
//!   [`Driver`](scrollfade_core::driver::Driver)
//! - [`FadeOnScroll`]: the page-level entry point, including the declarative
//!   `fade-on-scroll` markup scan
//! - [`FadeHandle`]: the same entry point exported to JavaScript

#![no_std]

extern crate alloc;

mod dom;
mod fade;
mod frame;
mod listener;

pub use dom::{DomHost, format_opacity, scan_markup};
pub use fade::{FadeHandle, FadeOnScroll};
pub use frame::WebFrameScheduler;
pub use listener::ScrollListener;

use alloc::format;
use alloc::string::String;
use core::fmt;

use scrollfade_core::error::ConfigError;
use scrollfade_core::time::{HostTime, Timebase};
use wasm_bindgen::JsValue;

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    let ms = frame::performance_now();
    HostTime(millis_to_micros(ms))
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::new(1000, 1)
}

fn millis_to_micros(ms: f64) -> u64 {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    us
}

/// Errors from setting up scrollfade in a browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebError {
    /// No global `window` (for example inside a worker).
    NoWindow,
    /// The window has no document.
    NoDocument,
    /// The scroll source selector matched nothing.
    ScrollSourceNotFound(String),
    /// A target spec was rejected.
    Config(ConfigError),
    /// A DOM call threw.
    Js(String),
}

impl WebError {
    pub(crate) fn from_js(value: &JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => f.write_str("no global window"),
            Self::NoDocument => f.write_str("window has no document"),
            Self::ScrollSourceNotFound(selector) => {
                write!(f, "scroll source {selector:?} matched no element")
            }
            Self::Config(err) => write!(f, "{err}"),
            Self::Js(msg) => write!(f, "DOM error: {msg}"),
        }
    }
}

impl core::error::Error for WebError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for WebError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString as _;

    #[test]
    fn timebase_is_microsecond() {
        let tb = timebase();
        // 1 tick = 1 µs = 1000 ns
        assert_eq!(tb.ticks_to_nanos(1), 1000);
        assert_eq!(tb.ticks_to_nanos(1_000_000), 1_000_000_000);
    }

    #[test]
    fn high_res_millis_become_micro_ticks() {
        assert_eq!(millis_to_micros(16.5), 16_500);
        assert_eq!(millis_to_micros(0.0), 0);
    }

    #[test]
    fn config_errors_pass_through() {
        let err = WebError::from(ConfigError::EmptySelector);
        assert_eq!(err.to_string(), "selector is empty");
        assert!(core::error::Error::source(&err).is_some());
    }

    #[test]
    fn thrown_values_keep_their_message() {
        let err = WebError::Js("SyntaxError: bad selector".into());
        assert_eq!(err.to_string(), "DOM error: SyntaxError: bad selector");
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn missing_scroll_source_names_selector() {
        let err = WebError::ScrollSourceNotFound(".pane".into());
        assert_eq!(err.to_string(), "scroll source \".pane\" matched no element");
    }
}
