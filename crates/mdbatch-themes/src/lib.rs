//! Syntax highlighting themes and their CSS.
//!
//! Theme names are short aliases over the themes bundled with `syntect`.
//! [`THEMES`] lists every accepted name; [`css`] produces the stylesheet for
//! class-based highlighting, and [`SyntectHighlighter`] plugs into
//! [`mdbatch::Options`] as a code highlighter.
//!
//! ```
//! use mdbatch::Options;
//! use mdbatch_themes::{SyntectHighlighter, css};
//!
//! let stylesheet = css("base16-ocean.dark").unwrap();
//! assert!(!stylesheet.is_empty());
//!
//! let options = Options::builder().code(SyntectHighlighter::classed()).build();
//! let html = mdbatch::render(&["```rust\nfn main() {}\n```"], Some(&options)).unwrap();
//! assert!(html[0].starts_with(r#"<pre><code class="language-rust">"#));
//! ```

mod highlighter;

use std::sync::LazyLock;

use mdbatch::{Error, Result};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{ClassStyle, css_for_theme_with_class_style};

pub use highlighter::{HighlightStyle, SyntectHighlighter};

/// Theme aliases and the bundled syntect theme each one names.
const THEME_ALIASES: &[(&str, &str)] = &[
    ("base16-eighties.dark", "base16-eighties.dark"),
    ("base16-mocha.dark", "base16-mocha.dark"),
    ("base16-ocean.dark", "base16-ocean.dark"),
    ("base16-ocean.light", "base16-ocean.light"),
    ("inspired-github.light", "InspiredGitHub"),
    ("solarized.dark", "Solarized (dark)"),
    ("solarized.light", "Solarized (light)"),
];

/// Every theme name accepted by [`css`] and [`SyntectHighlighter`].
pub const THEMES: &[&str] = &alias_names();

const fn alias_names() -> [&'static str; THEME_ALIASES.len()] {
    let mut names = [""; THEME_ALIASES.len()];
    let mut i = 0;
    while i < names.len() {
        names[i] = THEME_ALIASES[i].0;
        i += 1;
    }
    names
}

static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Name of the bundled syntect theme behind an alias.
fn syntect_name(alias: &str) -> Option<&'static str> {
    THEME_ALIASES
        .iter()
        .find(|(name, _)| *name == alias)
        .map(|(_, key)| *key)
}

/// Look up a theme by alias.
pub(crate) fn theme(name: &str) -> Result<&'static Theme> {
    theme_in(&THEME_SET, name)
}

fn theme_in<'s>(set: &'s ThemeSet, name: &str) -> Result<&'s Theme> {
    let key = syntect_name(name).ok_or_else(|| Error::UnknownTheme(name.to_owned()))?;
    set.themes
        .get(key)
        .ok_or_else(|| Error::MissingTheme(name.to_owned()))
}

/// CSS for class-based highlighting with `theme`.
///
/// Class names use the spaced style, matching
/// [`SyntectHighlighter::classed`].
///
/// # Errors
///
/// - [`Error::UnknownTheme`] if `theme` is not in [`THEMES`].
/// - [`Error::MissingTheme`] if the theme is not bundled.
/// - [`Error::CannotGetCss`] if the stylesheet cannot be generated.
pub fn css(theme: &str) -> Result<String> {
    css_in(&THEME_SET, theme)
}

fn css_in(set: &ThemeSet, theme: &str) -> Result<String> {
    let resolved = theme_in(set, theme)?;
    tracing::debug!(theme, "Generating theme CSS");
    css_for_theme_with_class_style(resolved, ClassStyle::Spaced)
        .map_err(|err| css_failure(theme, &err))
}

fn css_failure(theme: &str, err: &dyn std::fmt::Display) -> Error {
    Error::CannotGetCss {
        theme: theme.to_owned(),
        message: err.to_string(),
    }
}
