// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The page-level entry point.
//!
//! [`FadeOnScroll`] binds to one scroll source. Construction scans the
//! document for `fade-on-scroll` markup; [`add`](FadeOnScroll::add) attaches
//! more targets. Each call that attaches targets gets its own synchronizer,
//! scheduler and listener, all sharing the same scroll source.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use scrollfade_core::driver::Driver;
use scrollfade_core::error::ConfigError;
use scrollfade_core::options::Options;
use scrollfade_core::sync::{SyncConfig, Synchronizer};
use scrollfade_core::target::{ScrollSource, TargetSpec};
use wasm_bindgen::prelude::*;
use web_sys::EventTarget;

use crate::dom::{DomHost, scan_markup};
use crate::frame::WebFrameScheduler;
use crate::listener::ScrollListener;
use crate::WebError;

/// Scroll-synchronized opacity for one scroll source.
pub struct FadeOnScroll {
    source: EventTarget,
    host: DomHost,
    config: SyncConfig,
    instances: Vec<ScrollListener>,
    markup_errors: Vec<ConfigError>,
}

impl FadeOnScroll {
    /// Binds to `source` and attaches every valid `fade-on-scroll` element.
    ///
    /// Malformed markup, including class names the browser rejects as a
    /// selector, does not fail construction; see
    /// [`markup_errors`](Self::markup_errors).
    pub fn new(source: &ScrollSource) -> Result<Self, WebError> {
        Self::with_config(source, SyncConfig::default())
    }

    /// Like [`new`](Self::new), with an explicit synchronizer configuration.
    pub fn with_config(source: &ScrollSource, config: SyncConfig) -> Result<Self, WebError> {
        let host = DomHost::new()?;
        let target = host.scroll_target(source)?;
        let mut scan = scan_markup(host.document());
        scan.retain_valid(|selector| host.validate_selector(selector));
        let mut fade = Self {
            source: target,
            host,
            config,
            instances: Vec::new(),
            markup_errors: scan.errors,
        };
        if !scan.targets.is_empty() {
            fade.attach(scan.targets)?;
        }
        Ok(fade)
    }

    /// Attaches `targets` as one synchronized instance and runs its first
    /// pass.
    ///
    /// Every selector is validated first; nothing is attached if any is
    /// rejected. An empty list attaches nothing.
    pub fn add(&mut self, targets: impl IntoIterator<Item = TargetSpec>) -> Result<(), WebError> {
        let targets: Vec<TargetSpec> = targets.into_iter().collect();
        for target in &targets {
            self.host.validate_selector(target.selector())?;
        }
        if targets.is_empty() {
            return Ok(());
        }
        self.attach(targets)
    }

    /// Attaches a single `(selector, options)` pair.
    pub fn add_one(&mut self, selector: &str, options: Options) -> Result<(), WebError> {
        self.add([TargetSpec::new(selector, options)?])
    }

    /// Recomputes every instance immediately.
    pub fn update(&self) {
        for instance in &self.instances {
            instance.driver().apply_now();
        }
    }

    /// Detaches every instance. Pending frames are cancelled.
    pub fn dispose(&mut self) {
        for mut instance in self.instances.drain(..) {
            instance.dispose();
        }
    }

    /// Returns the errors from the markup scan at construction.
    #[must_use]
    pub fn markup_errors(&self) -> &[ConfigError] {
        &self.markup_errors
    }

    /// Returns the number of attached instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    fn attach(&mut self, targets: Vec<TargetSpec>) -> Result<(), WebError> {
        let sync = Synchronizer::new(self.host.clone(), targets, self.config);
        let driver = Driver::new(sync, WebFrameScheduler::new());
        let listener = ScrollListener::attach(self.source.clone(), driver)?;
        self.instances.push(listener);
        Ok(())
    }
}

impl core::fmt::Debug for FadeOnScroll {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FadeOnScroll")
            .field("config", &self.config)
            .field("instances", &self.instances.len())
            .field("markup_errors", &self.markup_errors)
            .finish_non_exhaustive()
    }
}

fn js_error(err: &impl core::fmt::Display) -> JsError {
    JsError::new(&err.to_string())
}

/// JavaScript handle for [`FadeOnScroll`].
///
/// ```js
/// const fade = new FadeHandle();           // window
/// fade.add(".hero", '{"direction":"both","waypoint":"50%"}');
/// fade.update();
/// fade.dispose();
/// ```
#[wasm_bindgen]
#[derive(Debug)]
pub struct FadeHandle {
    inner: FadeOnScroll,
}

#[wasm_bindgen]
impl FadeHandle {
    /// Binds to `page` (`"window"` or a selector; window when omitted) and
    /// scans the document for markup.
    #[wasm_bindgen(constructor)]
    pub fn new(page: Option<String>) -> Result<FadeHandle, JsError> {
        let source = ScrollSource::parse(page.as_deref());
        FadeOnScroll::new(&source)
            .map(|inner| Self { inner })
            .map_err(|e| js_error(&e))
    }

    /// Attaches `selector` with optional JSON options.
    pub fn add(&mut self, selector: &str, options: Option<String>) -> Result<(), JsError> {
        let spec = TargetSpec::parse(selector, options.as_deref()).map_err(|e| js_error(&e))?;
        self.inner.add([spec]).map_err(|e| js_error(&e))
    }

    /// Recomputes every target immediately.
    pub fn update(&self) {
        self.inner.update();
    }

    /// Detaches everything.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    /// Messages for markup elements that were skipped.
    #[wasm_bindgen(getter, js_name = markupErrors)]
    pub fn markup_errors(&self) -> Vec<String> {
        self.inner
            .markup_errors()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}
