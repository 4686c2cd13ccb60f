// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Target specifications and scroll sources.

use alloc::borrow::ToOwned as _;
use alloc::string::String;
use core::fmt;

use crate::error::ConfigError;
use crate::options::{Options, PartialOptions};

/// A selector plus the options for every element it matches.
///
/// Specs are built once at setup and never change afterwards. A selector that
/// currently matches nothing is valid; it is simply skipped until matching
/// elements exist.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetSpec {
    selector: String,
    options: Options,
}

impl TargetSpec {
    /// Creates a spec, rejecting an empty selector.
    pub fn new(selector: impl Into<String>, options: Options) -> Result<Self, ConfigError> {
        let selector = selector.into();
        if selector.trim().is_empty() {
            return Err(ConfigError::EmptySelector);
        }
        Ok(Self { selector, options })
    }

    /// Creates a spec from a selector and an optional JSON options blob.
    pub fn parse(selector: impl Into<String>, options_json: Option<&str>) -> Result<Self, ConfigError> {
        let options = match options_json {
            Some(json) => PartialOptions::from_json(json)?.resolve(),
            None => Options::DEFAULT,
        };
        Self::new(selector, options)
    }

    /// Returns the selector.
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Returns the resolved options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
}

/// The element whose scroll events drive updates.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScrollSource {
    /// The whole document (the window).
    #[default]
    Window,
    /// The first element matching a selector.
    Element(String),
}

impl ScrollSource {
    /// Parses a source token: `window` (or nothing) for the document,
    /// anything else is a selector.
    #[must_use]
    pub fn parse(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            None | Some("" | "window") => Self::Window,
            Some(selector) => Self::Element(selector.to_owned()),
        }
    }
}

impl fmt::Display for ScrollSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Window => f.write_str("window"),
            Self::Element(selector) => f.write_str(selector),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Direction, Waypoint};

    #[test]
    fn empty_selector_is_rejected() {
        assert_eq!(
            TargetSpec::new("  ", Options::DEFAULT),
            Err(ConfigError::EmptySelector)
        );
    }

    #[test]
    fn parse_without_options_uses_defaults() {
        let spec = TargetSpec::parse(".hero", None).unwrap();
        assert_eq!(spec.selector(), ".hero");
        assert_eq!(*spec.options(), Options::DEFAULT);
    }

    #[test]
    fn parse_with_options_merges() {
        let spec = TargetSpec::parse("#intro", Some(r#"{"direction": "top"}"#)).unwrap();
        assert_eq!(
            *spec.options(),
            Options::new(Direction::Top, Waypoint::SelfRelative)
        );
    }

    #[test]
    fn scroll_source_tokens() {
        assert_eq!(ScrollSource::parse(None), ScrollSource::Window);
        assert_eq!(ScrollSource::parse(Some("window")), ScrollSource::Window);
        assert_eq!(ScrollSource::parse(Some(" ")), ScrollSource::Window);
        assert_eq!(
            ScrollSource::parse(Some(".page")),
            ScrollSource::Element(".page".into())
        );
    }
}
