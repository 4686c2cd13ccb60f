// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! [`ConfigError`] is raised while turning caller or markup configuration into
//! [`TargetSpec`](crate::target::TargetSpec)s, so bad input is rejected before
//! any style is written. [`OpacityError`] is raised by the calculator for
//! geometry that cannot yield a finite opacity; the synchronizer treats it as a
//! per-element skip rather than a failure of the whole pass.

use alloc::string::String;
use core::fmt;

/// Errors from parsing or validating configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The direction token is not one of `top`, `bottom` or `both`.
    UnknownDirection(String),
    /// The waypoint token is not `self`, `<n>%` or `<n>px`.
    UnknownWaypoint(String),
    /// The waypoint token names a zero, negative or non-finite distance.
    NonPositiveWaypoint(String),
    /// The declarative options blob is not valid JSON options.
    Malformed(String),
    /// The selector is empty.
    EmptySelector,
    /// The host rejected the selector.
    InvalidSelector(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDirection(token) => {
                write!(f, "unknown direction {token:?} (expected top, bottom or both)")
            }
            Self::UnknownWaypoint(token) => {
                write!(f, "unknown waypoint {token:?} (expected self, <n>% or <n>px)")
            }
            Self::NonPositiveWaypoint(token) => {
                write!(f, "waypoint {token:?} must be a positive distance")
            }
            Self::Malformed(msg) => write!(f, "malformed options: {msg}"),
            Self::EmptySelector => f.write_str("selector is empty"),
            Self::InvalidSelector(selector) => write!(f, "invalid selector {selector:?}"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Errors from [`compute_opacity`](crate::opacity::compute_opacity).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpacityError {
    /// The resolved waypoint distance is zero, negative, not finite, or so
    /// short that the opacity overflows.
    ZeroWaypoint,
    /// The viewport height is zero, negative or not finite.
    DegenerateViewport,
}

impl fmt::Display for OpacityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWaypoint => f.write_str("waypoint distance is zero"),
            Self::DegenerateViewport => f.write_str("viewport has no height"),
        }
    }
}

impl core::error::Error for OpacityError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString as _;

    #[test]
    fn config_error_messages_name_the_token() {
        let err = ConfigError::UnknownWaypoint("12em".into());
        assert!(err.to_string().contains("\"12em\""), "got: {err}");

        let err = ConfigError::NonPositiveWaypoint("0px".into());
        assert!(err.to_string().contains("positive"), "got: {err}");
    }

    #[test]
    fn opacity_error_messages() {
        assert_eq!(
            OpacityError::ZeroWaypoint.to_string(),
            "waypoint distance is zero"
        );
        assert_eq!(
            OpacityError::DegenerateViewport.to_string(),
            "viewport has no height"
        );
    }
}
