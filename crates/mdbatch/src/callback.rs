//! Caller-supplied rendering strategies for math spans and code blocks.
//!
//! A renderer is a small capability object held by [`Options`](crate::Options)
//! and invoked once per span. Closures with the matching signature implement
//! the traits directly, so most callers never name them:
//!
//! ```
//! use mdbatch::{CallbackError, Options, render};
//!
//! let options = Options::builder()
//!     .math_fn(|source, display| {
//!         let tag = if display { "div" } else { "span" };
//!         Ok(format!(r#"<{tag} class="math">{source}</{tag}>"#))
//!     })
//!     .code_fn(|source, language| match language {
//!         Some("klingon") => Err(CallbackError::unknown_language("klingon")),
//!         _ => Ok(format!("<pre>{}</pre>", source.len())),
//!     })
//!     .build();
//!
//! let html = render(&["$x$"], Some(&options)).unwrap();
//! assert_eq!(html[0], r#"<p><span class="math">x</span></p>"#);
//! ```

use crate::state::escape_html;

/// Failure reported by a callback.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    /// The callback does not support the language tag it was given.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// Any other failure.
    #[error(transparent)]
    Failed(Box<dyn std::error::Error + Send + Sync>),
}

impl CallbackError {
    /// Wrap an arbitrary error (or message) as a callback failure.
    pub fn failed(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Failed(error.into())
    }

    /// Signal that `language` is not supported.
    pub fn unknown_language(language: impl Into<String>) -> Self {
        Self::UnknownLanguage(language.into())
    }
}

/// Renders a math span into markup.
///
/// Implementations may be invoked concurrently from several threads when a
/// batch is rendered in parallel.
pub trait MathRenderer: Send + Sync {
    /// Render `source` (the literal text between the delimiters).
    ///
    /// `display` is `true` for `$$…$$` block math and `false` for `$…$`.
    fn render_math(&self, source: &str, display: bool) -> Result<String, CallbackError>;
}

/// Renders a code block into markup.
///
/// Implementations may be invoked concurrently from several threads when a
/// batch is rendered in parallel.
pub trait CodeHighlighter: Send + Sync {
    /// Render `source` (the raw block contents).
    ///
    /// `language` is the first word of the fence info string, or `None` for
    /// indented blocks and fences without a tag. Return
    /// [`CallbackError::UnknownLanguage`] for tags the highlighter does not
    /// support.
    fn highlight(&self, source: &str, language: Option<&str>) -> Result<String, CallbackError>;
}

impl<F> MathRenderer for F
where
    F: Fn(&str, bool) -> Result<String, CallbackError> + Send + Sync,
{
    fn render_math(&self, source: &str, display: bool) -> Result<String, CallbackError> {
        self(source, display)
    }
}

impl<F> CodeHighlighter for F
where
    F: Fn(&str, Option<&str>) -> Result<String, CallbackError> + Send + Sync,
{
    fn highlight(&self, source: &str, language: Option<&str>) -> Result<String, CallbackError> {
        self(source, language)
    }
}

/// Math renderer that leaves typesetting to the browser.
///
/// Emits the escaped source in a `<span class="math math-inline">` or
/// `<span class="math math-display">`, the markup KaTeX and MathJax
/// auto-render scripts look for.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClientSideMath;

impl MathRenderer for ClientSideMath {
    fn render_math(&self, source: &str, display: bool) -> Result<String, CallbackError> {
        let class = if display {
            "math math-display"
        } else {
            "math math-inline"
        };
        Ok(format!(r#"<span class="{class}">{}</span>"#, escape_html(source)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl CodeHighlighter for Upper {
        fn highlight(&self, source: &str, _language: Option<&str>) -> Result<String, CallbackError> {
            Ok(source.to_uppercase())
        }
    }

    #[test]
    fn test_struct_highlighter() {
        let highlighter: &dyn CodeHighlighter = &Upper;
        assert_eq!(highlighter.highlight("abc", None).unwrap(), "ABC");
    }

    #[test]
    fn test_closure_math_renderer() {
        let renderer = |source: &str, display: bool| -> Result<String, CallbackError> {
            Ok(format!("{source}:{display}"))
        };
        assert_eq!(renderer.render_math("x", true).unwrap(), "x:true");
    }

    #[test]
    fn test_callback_error_constructors() {
        let err = CallbackError::failed("boom");
        assert_eq!(err.to_string(), "boom");

        let err = CallbackError::unknown_language("cobol");
        assert!(matches!(err, CallbackError::UnknownLanguage(ref lang) if lang == "cobol"));
    }

    #[test]
    fn test_client_side_math() {
        assert_eq!(
            ClientSideMath.render_math("a<b", false).unwrap(),
            r#"<span class="math math-inline">a&lt;b</span>"#
        );
        assert_eq!(
            ClientSideMath.render_math("x", true).unwrap(),
            r#"<span class="math math-display">x</span>"#
        );
    }
}
