//! Shared utility functions for markdown rendering.

use pulldown_cmark::HeadingLevel;

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Language tag of a fenced code block: the first word of its info string.
///
/// Attributes after the tag (`rust ignore`, `plantuml format=png`) are not
/// part of the tag.
#[must_use]
pub(crate) fn language_tag(info: &str) -> Option<&str> {
    info.split_whitespace().next()
}
