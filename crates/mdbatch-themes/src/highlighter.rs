//! Code highlighter backed by syntect's bundled syntaxes.

use std::fmt::Write;
use std::sync::LazyLock;

use mdbatch::{CallbackError, CodeHighlighter, Result, escape_html};
use syntect::easy::HighlightLines;
use syntect::highlighting::Theme;
use syntect::html::{
    ClassStyle, ClassedHTMLGenerator, IncludeBackground, styled_line_to_highlighted_html,
};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// How highlighted tokens are styled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HighlightStyle {
    /// `style="…"` attributes computed from the theme.
    #[default]
    Inline,
    /// Class names, to be paired with [`css`](crate::css).
    Classed,
}

#[derive(Clone, Copy, Debug)]
enum Mode {
    Inline(&'static Theme),
    Classed,
}

/// Highlights code blocks with syntect.
///
/// Output is wrapped in `<pre><code class="language-…">`, the same shell the
/// default code block rendering uses. A block without a language tag is
/// highlighted as plain text; an unrecognized tag fails with
/// [`CallbackError::UnknownLanguage`].
#[derive(Clone, Debug)]
pub struct SyntectHighlighter {
    mode: Mode,
}

impl SyntectHighlighter {
    /// Inline-styled highlighter for `theme`, one of [`THEMES`](crate::THEMES).
    pub fn new(theme: &str) -> Result<Self> {
        Self::with_style(theme, HighlightStyle::Inline)
    }

    /// Class-based highlighter. Colors come from the stylesheet, so no
    /// theme is needed here.
    #[must_use]
    pub fn classed() -> Self {
        Self {
            mode: Mode::Classed,
        }
    }

    /// Highlighter with an explicit style. The theme is validated even for
    /// [`HighlightStyle::Classed`].
    pub fn with_style(theme: &str, style: HighlightStyle) -> Result<Self> {
        let theme = crate::theme(theme)?;
        let mode = match style {
            HighlightStyle::Inline => Mode::Inline(theme),
            HighlightStyle::Classed => Mode::Classed,
        };
        Ok(Self { mode })
    }

    pub fn style(&self) -> HighlightStyle {
        match self.mode {
            Mode::Inline(_) => HighlightStyle::Inline,
            Mode::Classed => HighlightStyle::Classed,
        }
    }
}

impl CodeHighlighter for SyntectHighlighter {
    fn highlight(&self, source: &str, language: Option<&str>) -> Result<String, CallbackError> {
        let syntax = match language {
            Some(token) => SYNTAX_SET
                .find_syntax_by_token(token)
                .ok_or_else(|| CallbackError::unknown_language(token))?,
            None => SYNTAX_SET.find_syntax_plain_text(),
        };

        let body = match self.mode {
            Mode::Inline(theme) => highlight_inline(source, syntax, theme),
            Mode::Classed => highlight_classed(source, syntax),
        }
        .map_err(CallbackError::failed)?;

        let mut out = String::with_capacity(body.len() + 48);
        match language {
            Some(language) => {
                let _ = write!(
                    out,
                    r#"<pre><code class="language-{}">"#,
                    escape_html(language)
                );
            }
            None => out.push_str("<pre><code>"),
        }
        out.push_str(&body);
        out.push_str("</code></pre>");
        Ok(out)
    }
}

fn highlight_inline(
    source: &str,
    syntax: &SyntaxReference,
    theme: &Theme,
) -> Result<String, syntect::Error> {
    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut html = String::with_capacity(source.len() * 4);
    for line in LinesWithEndings::from(source) {
        let regions = highlighter.highlight_line(line, &SYNTAX_SET)?;
        html.push_str(&styled_line_to_highlighted_html(
            &regions,
            IncludeBackground::No,
        )?);
    }
    Ok(html)
}

fn highlight_classed(source: &str, syntax: &SyntaxReference) -> Result<String, syntect::Error> {
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
    for line in LinesWithEndings::from(source) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdbatch::{ErrorKind, Options, render};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_highlight_wraps_block() {
        let highlighter = SyntectHighlighter::new("base16-ocean.dark").unwrap();
        let html = highlighter
            .highlight("fn main() {}\n", Some("rust"))
            .unwrap();
        assert!(html.starts_with(r#"<pre><code class="language-rust">"#));
        assert!(html.ends_with("</code></pre>"));
        assert!(html.contains("<span style=\""));
    }

    #[test]
    fn test_classed_highlight_uses_classes() {
        let html = SyntectHighlighter::classed()
            .highlight("fn main() {}\n", Some("rust"))
            .unwrap();
        assert!(html.contains("<span class=\""));
        assert!(!html.contains("style="));
    }

    #[test]
    fn test_no_language_is_plain_text() {
        let html = SyntectHighlighter::classed()
            .highlight("a < b\n", None)
            .unwrap();
        assert!(html.starts_with("<pre><code>"));
        assert!(html.contains("a &lt; b"));
    }

    #[test]
    fn test_unknown_language() {
        let err = SyntectHighlighter::classed()
            .highlight("x", Some("no-such-language"))
            .unwrap_err();
        assert!(matches!(err, CallbackError::UnknownLanguage(ref l) if l == "no-such-language"));
    }

    #[test]
    fn test_unknown_language_through_render() {
        let options = Options::builder()
            .code(SyntectHighlighter::new("solarized.light").unwrap())
            .build();
        let err = render(&["```no-such-language\nx\n```"], Some(&options)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownLanguage);
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let err = SyntectHighlighter::new("nope").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownTheme);
    }

    #[test]
    fn test_with_style() {
        let highlighter =
            SyntectHighlighter::with_style("solarized.dark", HighlightStyle::Classed).unwrap();
        assert_eq!(highlighter.style(), HighlightStyle::Classed);
        assert_eq!(
            SyntectHighlighter::new("solarized.dark").unwrap().style(),
            HighlightStyle::Inline
        );
    }
}
