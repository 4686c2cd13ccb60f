// Copyright 2026 the Scrollfade Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative configuration from markup.
//!
//! Elements opt in with the [`MARKER_CLASS`] class and carry their options as
//! JSON in the [`OPTIONS_ATTRIBUTE`] attribute:
//!
//! ```html
//! <div class="fade-on-scroll hero" data-fos-options='{"waypoint": "50%"}'>
//! ```
//!
//! Each such element becomes a [`TargetSpec`] whose selector joins all of its
//! classes and requires the options attribute (`.fade-on-scroll.hero[data-fos-options]`).
//! Elements with malformed options are reported in [`MarkupScan::errors`] and
//! left out; the others still register.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::ConfigError;
use crate::target::TargetSpec;

/// Class that marks an element for declarative setup.
pub const MARKER_CLASS: &str = "fade-on-scroll";

/// Attribute holding the element's JSON options.
pub const OPTIONS_ATTRIBUTE: &str = "data-fos-options";

/// Builds the selector for an element with the given classes.
#[must_use]
pub fn markup_selector<'a>(classes: impl IntoIterator<Item = &'a str>) -> String {
    let mut selector = String::new();
    for class in classes {
        selector.push('.');
        selector.push_str(class);
    }
    selector.push('[');
    selector.push_str(OPTIONS_ATTRIBUTE);
    selector.push(']');
    selector
}

/// Builds the target spec for one marked element.
///
/// A missing attribute yields default options.
pub fn declared_target<'a>(
    classes: impl IntoIterator<Item = &'a str>,
    options_json: Option<&str>,
) -> Result<TargetSpec, ConfigError> {
    TargetSpec::parse(markup_selector(classes), options_json)
}

/// One marked element as read from the document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkedElement {
    /// The element's classes, in document order.
    pub classes: Vec<String>,
    /// The raw options attribute, if present.
    pub options: Option<String>,
}

/// Result of scanning a document for marked elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarkupScan {
    /// Specs for every element whose options parsed.
    pub targets: Vec<TargetSpec>,
    /// Errors for elements that were left out.
    pub errors: Vec<ConfigError>,
}

impl MarkupScan {
    /// Converts marked elements into specs, isolating failures per element.
    #[must_use]
    pub fn collect(elements: impl IntoIterator<Item = MarkedElement>) -> Self {
        let mut scan = Self::default();
        for element in elements {
            let classes = element.classes.iter().map(String::as_str);
            match declared_target(classes, element.options.as_deref()) {
                Ok(spec) => scan.targets.push(spec),
                Err(err) => scan.errors.push(err),
            }
        }
        scan
    }

    /// Moves every target whose selector `validate` rejects into
    /// [`errors`](Self::errors), keeping the rest in order.
    pub fn retain_valid(&mut self, mut validate: impl FnMut(&str) -> Result<(), ConfigError>) {
        let errors = &mut self.errors;
        self.targets
            .retain(|target| match validate(target.selector()) {
                Ok(()) => true,
                Err(err) => {
                    errors.push(err);
                    false
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Direction, Options, Waypoint};
    use alloc::vec;

    fn marked(classes: &[&str], options: Option<&str>) -> MarkedElement {
        MarkedElement {
            classes: classes.iter().map(|c| String::from(*c)).collect(),
            options: options.map(String::from),
        }
    }

    #[test]
    fn selector_joins_classes_and_requires_attribute() {
        assert_eq!(
            markup_selector(["fade-on-scroll", "hero", "dark"]),
            ".fade-on-scroll.hero.dark[data-fos-options]"
        );
    }

    #[test]
    fn declared_target_parses_attribute() {
        let spec = declared_target(["fade-on-scroll"], Some(r#"{"waypoint": "200px"}"#)).unwrap();
        assert_eq!(spec.selector(), ".fade-on-scroll[data-fos-options]");
        assert_eq!(
            *spec.options(),
            Options::new(Direction::Bottom, Waypoint::Pixels(200.0))
        );
    }

    #[test]
    fn malformed_elements_do_not_block_others() {
        let scan = MarkupScan::collect(vec![
            marked(&["fade-on-scroll", "a"], Some(r#"{"direction": "top"}"#)),
            marked(&["fade-on-scroll", "b"], Some("{not json")),
            marked(&["fade-on-scroll", "c"], None),
        ]);
        assert_eq!(scan.targets.len(), 2);
        assert_eq!(scan.targets[0].selector(), ".fade-on-scroll.a[data-fos-options]");
        assert_eq!(scan.targets[1].selector(), ".fade-on-scroll.c[data-fos-options]");
        assert_eq!(*scan.targets[1].options(), Options::DEFAULT);
        assert_eq!(scan.errors.len(), 1);
        assert!(matches!(scan.errors[0], ConfigError::Malformed(_)));
    }

    #[test]
    fn rejected_selectors_are_reported_and_others_kept() {
        let mut scan = MarkupScan::collect(vec![
            marked(&["fade-on-scroll", "hero"], None),
            marked(&["fade-on-scroll", "md:hidden"], None),
            marked(&["fade-on-scroll", "footer"], None),
        ]);
        scan.retain_valid(|selector| {
            if selector.contains(':') {
                Err(ConfigError::InvalidSelector(selector.into()))
            } else {
                Ok(())
            }
        });

        assert_eq!(scan.targets.len(), 2);
        assert_eq!(scan.targets[0].selector(), ".fade-on-scroll.hero[data-fos-options]");
        assert_eq!(scan.targets[1].selector(), ".fade-on-scroll.footer[data-fos-options]");
        assert_eq!(
            scan.errors,
            [ConfigError::InvalidSelector(
                ".fade-on-scroll.md:hidden[data-fos-options]".into()
            )]
        );
    }
}
