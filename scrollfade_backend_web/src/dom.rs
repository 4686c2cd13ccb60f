// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM access.
//!
//! [`DomHost`] implements [`Host`] over the live document: selectors resolve
//! through `querySelectorAll`, geometry comes from
//! `getBoundingClientRect()` and `window.innerHeight`, and opacity is written
//! to the element's inline style with two decimals.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use scrollfade_core::error::ConfigError;
use scrollfade_core::host::Host;
use scrollfade_core::markup::{MARKER_CLASS, MarkedElement, MarkupScan, OPTIONS_ATTRIBUTE};
use scrollfade_core::target::ScrollSource;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{
    CssStyleDeclaration, Document, Element, EventTarget, HtmlElement, SvgElement, Window,
};

use crate::WebError;

/// Formats an opacity the way it is written to the inline style.
#[must_use]
pub fn format_opacity(opacity: f64) -> String {
    // Adding zero turns -0.0 into 0.0.
    let opacity = opacity + 0.0;
    format!("{opacity:.2}")
}

/// The browser document as a scrollfade [`Host`].
#[derive(Clone)]
pub struct DomHost {
    window: Window,
    document: Document,
}

impl DomHost {
    /// Binds to the global window and its document.
    pub fn new() -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        Ok(Self { window, document })
    }

    /// Returns the window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Returns the document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the elements matching `selector`, in document order.
    ///
    /// HTML and SVG elements are both kept.
    pub fn query(&self, selector: &str) -> Result<Vec<Element>, JsValue> {
        let list = self.document.query_selector_all(selector)?;
        Ok((0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    /// Checks that the document accepts `selector`.
    pub fn validate_selector(&self, selector: &str) -> Result<(), ConfigError> {
        self.document
            .query_selector(selector)
            .map(drop)
            .map_err(|_| ConfigError::InvalidSelector(selector.into()))
    }

    /// Returns the event target for a scroll source.
    pub fn scroll_target(&self, source: &ScrollSource) -> Result<EventTarget, WebError> {
        match source {
            ScrollSource::Window => Ok(EventTarget::from(self.window.clone())),
            ScrollSource::Element(selector) => self
                .document
                .query_selector(selector)
                .map_err(|_| ConfigError::InvalidSelector(selector.clone()))?
                .map(EventTarget::from)
                .ok_or_else(|| WebError::ScrollSourceNotFound(selector.clone())),
        }
    }
}

impl Host for DomHost {
    type Element = Element;

    fn resolve(&self, selector: &str) -> Vec<Element> {
        self.query(selector).unwrap_or_default()
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn bounding_rect(&self, element: &Element) -> Option<Rect> {
        if !element.is_connected() {
            return None;
        }
        let r = element.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.right(), r.bottom()))
    }

    fn set_opacity(&mut self, element: &Element, opacity: f64) {
        let Some(style) = inline_style(element) else {
            return;
        };
        // Writing a number to a style declaration cannot fail.
        _ = style.set_property("opacity", &format_opacity(opacity));
    }
}

impl core::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomHost").finish_non_exhaustive()
    }
}

/// Returns the inline style of an HTML or SVG element.
///
/// Other elements (MathML, for instance) have no binding here and are left
/// alone.
fn inline_style(element: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        Some(html.style())
    } else {
        element.dyn_ref::<SvgElement>().map(SvgElement::style)
    }
}

/// Reads every `fade-on-scroll` element in `document` into target specs.
///
/// Elements with malformed options are reported in
/// [`MarkupScan::errors`] and left out.
#[must_use]
pub fn scan_markup(document: &Document) -> MarkupScan {
    let Ok(list) = document.query_selector_all(&format!(".{MARKER_CLASS}")) else {
        return MarkupScan::default();
    };
    let elements = (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(|element| marked_element(&element));
    MarkupScan::collect(elements)
}

fn marked_element(element: &Element) -> MarkedElement {
    let classes = element.class_list();
    MarkedElement {
        classes: (0..classes.length()).filter_map(|i| classes.item(i)).collect(),
        options: element.get_attribute(OPTIONS_ATTRIBUTE),
    }
}
