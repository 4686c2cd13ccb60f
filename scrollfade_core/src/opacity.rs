// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The opacity calculator.
//!
//! [`compute_opacity`] is a pure function of a [`Geometry`] snapshot and
//! [`Options`]:
//!
//! 1. resolve the waypoint distance ([`waypoint_distance`]),
//! 2. resolve the progress distance for the direction ([`progress_distance`]),
//! 3. divide and round to hundredths ([`round_hundredths`]).
//!
//! The result is **not** clamped to `[0, 1]`. Elements far below a bottom
//! waypoint produce negative values, elements past it produce values above 1;
//! the renderer clips them.

use crate::error::OpacityError;
use crate::geometry::Geometry;
use crate::options::{Direction, Options, Waypoint};

/// Resolves the waypoint to a distance in pixels.
#[must_use]
pub fn waypoint_distance(waypoint: Waypoint, geometry: &Geometry) -> f64 {
    match waypoint {
        Waypoint::Percentage(p) => geometry.viewport_height / (100.0 / p),
        Waypoint::Pixels(px) => px,
        Waypoint::SelfRelative => geometry.element_height,
    }
}

/// Resolves how far the element has progressed for `direction`.
///
/// For [`Direction::Both`], the top phase is used while
/// `bottom_from_viewport_top / waypoint` is at most 1 (the element is still
/// entering from above); otherwise the bottom phase takes over.
#[must_use]
pub fn progress_distance(direction: Direction, geometry: &Geometry, waypoint: f64) -> f64 {
    match direction {
        Direction::Top => geometry.bottom_from_viewport_top(),
        Direction::Bottom => geometry.top_from_viewport_bottom(),
        Direction::Both => {
            let top_phase = geometry.bottom_from_viewport_top();
            if top_phase / waypoint <= 1.0 {
                top_phase
            } else {
                geometry.top_from_viewport_bottom()
            }
        }
    }
}

/// Rounds to two decimal places, halves away from zero.
#[must_use]
pub fn round_hundredths(value: f64) -> f64 {
    libm::round(value * 100.0) / 100.0
}

/// Computes the opacity for one element.
///
/// Returns [`OpacityError::DegenerateViewport`] when the viewport has no
/// height, and [`OpacityError::ZeroWaypoint`] when the waypoint resolves to a
/// zero-length distance (for example `self` on an element with no height)
/// or one too short to divide by. The returned value is always finite.
pub fn compute_opacity(geometry: &Geometry, options: &Options) -> Result<f64, OpacityError> {
    if !(geometry.viewport_height.is_finite() && geometry.viewport_height > 0.0) {
        return Err(OpacityError::DegenerateViewport);
    }
    let waypoint = waypoint_distance(options.waypoint, geometry);
    if !(waypoint.is_finite() && waypoint > 0.0) {
        return Err(OpacityError::ZeroWaypoint);
    }
    let to_end = progress_distance(options.direction, geometry, waypoint);
    let opacity = round_hundredths(to_end / waypoint);
    // Subnormal waypoints pass the check above but overflow the division.
    if !opacity.is_finite() {
        return Err(OpacityError::ZeroWaypoint);
    }
    Ok(opacity)
}
