// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-target options.
//!
//! [`Options`] is a closed structure: a [`Direction`] selecting which edge
//! crossing drives the fade, and a [`Waypoint`] naming the distance over which
//! opacity goes from 0 to 1. Tokens are parsed once, at configuration time,
//! into tagged variants so that the calculator never inspects strings.
//!
//! Declarative configuration arrives as a JSON object such as
//! `{"direction": "both", "waypoint": "50%"}`. [`PartialOptions::from_json`]
//! parses it; fields that are absent fall back to [`Options::DEFAULT`].

use alloc::borrow::ToOwned as _;
use alloc::string::{String, ToString as _};
use core::fmt;
use core::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Which edge crossing of the element's transit through the viewport drives
/// its opacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Fade in as the element's bottom edge descends into the viewport from
    /// above.
    Top,
    /// Fade in as the element's top edge rises into the viewport from below.
    #[default]
    Bottom,
    /// Use the top phase while the element is still entering from above, and
    /// the bottom phase once it has fully entered.
    Both,
}

impl Direction {
    /// Returns the configuration token for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Both => "both",
        }
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "both" => Ok(Self::Both),
            _ => Err(ConfigError::UnknownDirection(s.to_owned())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reference distance against which progress is normalized.
///
/// Parsed from `self`, `<n>%` (a share of the viewport height) or `<n>px`.
/// Numeric values are always finite and strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Waypoint {
    /// A percentage of the viewport height.
    Percentage(f64),
    /// A fixed length in CSS pixels.
    Pixels(f64),
    /// The element's own height.
    #[default]
    SelfRelative,
}

impl FromStr for Waypoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token == "self" {
            return Ok(Self::SelfRelative);
        }
        let (number, variant): (&str, fn(f64) -> Self) =
            if let Some(number) = token.strip_suffix('%') {
                (number, Self::Percentage)
            } else if let Some(number) = token.strip_suffix("px") {
                (number, Self::Pixels)
            } else {
                return Err(ConfigError::UnknownWaypoint(s.to_owned()));
            };
        let value: f64 = number
            .trim_end()
            .parse()
            .map_err(|_| ConfigError::UnknownWaypoint(s.to_owned()))?;
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::NonPositiveWaypoint(s.to_owned()));
        }
        Ok(variant(value))
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage(p) => write!(f, "{p}%"),
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::SelfRelative => f.write_str("self"),
        }
    }
}

/// Resolved options for one target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Options {
    /// Which edge crossing drives the fade.
    pub direction: Direction,
    /// Distance over which opacity goes from 0 to 1.
    pub waypoint: Waypoint,
}

impl Options {
    /// Defaults used for every field a caller leaves unspecified.
    pub const DEFAULT: Self = Self {
        direction: Direction::Bottom,
        waypoint: Waypoint::SelfRelative,
    };

    /// Creates options from already-parsed parts.
    #[must_use]
    pub const fn new(direction: Direction, waypoint: Waypoint) -> Self {
        Self {
            direction,
            waypoint,
        }
    }

    /// Parses a JSON options blob and merges it over [`Options::DEFAULT`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        PartialOptions::from_json(json).map(PartialOptions::resolve)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Options with every field optional, as written by a caller.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PartialOptions {
    /// Explicit direction, if any.
    pub direction: Option<Direction>,
    /// Explicit waypoint, if any.
    pub waypoint: Option<Waypoint>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptions {
    #[serde(default)]
    direction: Option<String>,
    #[serde(default)]
    waypoint: Option<String>,
}

impl PartialOptions {
    /// Parses a JSON object with optional `direction` and `waypoint` string
    /// fields.
    ///
    /// JSON `null` yields empty options. Unknown keys, non-string values and
    /// invalid syntax are reported as [`ConfigError::Malformed`]; bad tokens
    /// keep their specific error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: Option<RawOptions> =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        Ok(Self {
            direction: raw.direction.as_deref().map(str::parse).transpose()?,
            waypoint: raw.waypoint.as_deref().map(str::parse).transpose()?,
        })
    }

    /// Fills unspecified fields from `base`.
    #[must_use]
    pub fn merge_over(self, base: Options) -> Options {
        Options {
            direction: self.direction.unwrap_or(base.direction),
            waypoint: self.waypoint.unwrap_or(base.waypoint),
        }
    }

    /// Fills unspecified fields from [`Options::DEFAULT`].
    #[must_use]
    pub fn resolve(self) -> Options {
        self.merge_over(Options::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString as _;

    #[test]
    fn direction_tokens() {
        assert_eq!("top".parse::<Direction>(), Ok(Direction::Top));
        assert_eq!(" bottom ".parse::<Direction>(), Ok(Direction::Bottom));
        assert_eq!("both".parse::<Direction>(), Ok(Direction::Both));
        assert_eq!(
            "left".parse::<Direction>(),
            Err(ConfigError::UnknownDirection("left".into()))
        );
    }

    #[test]
    fn waypoint_tokens() {
        assert_eq!("self".parse::<Waypoint>(), Ok(Waypoint::SelfRelative));
        assert_eq!("50%".parse::<Waypoint>(), Ok(Waypoint::Percentage(50.0)));
        assert_eq!("12.5%".parse::<Waypoint>(), Ok(Waypoint::Percentage(12.5)));
        assert_eq!("120px".parse::<Waypoint>(), Ok(Waypoint::Pixels(120.0)));
        assert_eq!(" 80 px ".parse::<Waypoint>(), Ok(Waypoint::Pixels(80.0)));
    }

    #[test]
    fn unrecognized_waypoints_fail_at_parse_time() {
        for token in ["", "12em", "px", "%", "half", "self%"] {
            assert_eq!(
                token.parse::<Waypoint>(),
                Err(ConfigError::UnknownWaypoint(token.into())),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn zero_and_negative_waypoints_are_rejected() {
        for token in ["0px", "0%", "-20px", "inf%", "NaN px"] {
            assert_eq!(
                token.parse::<Waypoint>(),
                Err(ConfigError::NonPositiveWaypoint(token.into())),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn waypoint_display_matches_token_grammar() {
        assert_eq!(Waypoint::Percentage(50.0).to_string(), "50%");
        assert_eq!(Waypoint::Pixels(12.5).to_string(), "12.5px");
        assert_eq!(Waypoint::SelfRelative.to_string(), "self");
    }

    #[test]
    fn defaults_are_bottom_and_self() {
        assert_eq!(Options::default(), Options::DEFAULT);
        assert_eq!(Options::DEFAULT.direction, Direction::Bottom);
        assert_eq!(Options::DEFAULT.waypoint, Waypoint::SelfRelative);
    }

    #[test]
    fn json_fields_override_defaults() {
        let opts = Options::from_json(r#"{"waypoint": "100px"}"#).unwrap();
        assert_eq!(opts, Options::new(Direction::Bottom, Waypoint::Pixels(100.0)));

        let opts = Options::from_json(r#"{"direction": "top", "waypoint": "25%"}"#).unwrap();
        assert_eq!(opts, Options::new(Direction::Top, Waypoint::Percentage(25.0)));

        assert_eq!(Options::from_json("{}").unwrap(), Options::DEFAULT);
        assert_eq!(Options::from_json("null").unwrap(), Options::DEFAULT);
    }

    #[test]
    fn malformed_json_is_reported() {
        for json in ["{direction: top}", r#"{"direction": 3}"#, r#"{"speed": "fast"}"#, ""] {
            assert!(
                matches!(Options::from_json(json), Err(ConfigError::Malformed(_))),
                "json {json:?}"
            );
        }
    }

    #[test]
    fn bad_tokens_inside_json_keep_their_error() {
        assert_eq!(
            Options::from_json(r#"{"waypoint": "1em"}"#),
            Err(ConfigError::UnknownWaypoint("1em".into()))
        );
        assert_eq!(
            Options::from_json(r#"{"direction": "sideways"}"#),
            Err(ConfigError::UnknownDirection("sideways".into()))
        );
    }

    #[test]
    fn merge_over_keeps_explicit_fields() {
        let base = Options::new(Direction::Top, Waypoint::Pixels(10.0));
        let partial = PartialOptions {
            direction: Some(Direction::Both),
            waypoint: None,
        };
        assert_eq!(
            partial.merge_over(base),
            Options::new(Direction::Both, Waypoint::Pixels(10.0))
        );
    }
}
