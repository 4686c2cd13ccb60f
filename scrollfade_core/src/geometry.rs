// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry snapshot.
//!
//! A [`Geometry`] is read fresh for every element on every pass. Scroll
//! position and viewport size may change between frames, so snapshots are
//! never cached.

use kurbo::Rect;

/// Element and viewport measurements for one opacity computation.
///
/// All values are in CSS pixels, with `element_top` relative to the top of
/// the viewport (negative when the element starts above it).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// Height of the viewport.
    pub viewport_height: f64,
    /// Offset of the element's top edge from the viewport's top edge.
    pub element_top: f64,
    /// Height of the element's bounding box.
    pub element_height: f64,
}

impl Geometry {
    /// Creates a snapshot from raw measurements.
    #[must_use]
    pub const fn new(viewport_height: f64, element_top: f64, element_height: f64) -> Self {
        Self {
            viewport_height,
            element_top,
            element_height,
        }
    }

    /// Creates a snapshot from a viewport-relative bounding rectangle.
    #[must_use]
    pub fn from_rect(rect: Rect, viewport_height: f64) -> Self {
        let rect = rect.abs();
        Self::new(viewport_height, rect.y0, rect.height())
    }

    /// Distance from the element's top edge up to the viewport's bottom edge.
    #[must_use]
    pub fn top_from_viewport_bottom(&self) -> f64 {
        self.viewport_height - self.element_top
    }

    /// Distance from the viewport's top edge down to the element's bottom
    /// edge.
    #[must_use]
    pub fn bottom_from_viewport_top(&self) -> f64 {
        self.element_top + self.element_height
    }
}
