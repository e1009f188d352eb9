//! Invocation of caller-supplied callbacks.
//!
//! Every callback runs behind [`std::panic::catch_unwind`], so a panicking
//! renderer surfaces as [`Error::BadCallback`] instead of unwinding through
//! the pipeline. Callback errors are translated into the documented error
//! kinds here and nowhere else.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::callback::{CallbackError, CodeHighlighter, MathRenderer};
use crate::error::{Error, Result};

/// Borrowed view of the callbacks configured for one render call.
#[derive(Clone, Copy)]
pub(crate) struct Dispatcher<'a> {
    math: Option<&'a dyn MathRenderer>,
    code: Option<&'a dyn CodeHighlighter>,
}

impl<'a> Dispatcher<'a> {
    pub(crate) fn new(
        math: Option<&'a dyn MathRenderer>,
        code: Option<&'a dyn CodeHighlighter>,
    ) -> Self {
        Self { math, code }
    }

    /// Render a math span.
    ///
    /// Fails with [`Error::CannotConfigMath`] when no math renderer is set.
    pub(crate) fn math(&self, source: &str, display: bool) -> Result<String> {
        let renderer = self.math.ok_or(Error::CannotConfigMath)?;

        let is_display = display;
        guarded(|| renderer.render_math(source, is_display))?.map_err(|err| {
            tracing::warn!(display = is_display, error = %err, "Math callback failed");
            let source: Box<dyn std::error::Error + Send + Sync> = match err {
                CallbackError::Failed(source) => source,
                unknown @ CallbackError::UnknownLanguage(_) => Box::new(unknown),
            };
            Error::CannotRenderMath { source }
        })
    }

    /// Render a code block, or `Ok(None)` when no highlighter is set.
    pub(crate) fn code(&self, source: &str, language: Option<&str>) -> Result<Option<String>> {
        let Some(highlighter) = self.code else {
            return Ok(None);
        };

        guarded(|| highlighter.highlight(source, language))?
            .map(Some)
            .map_err(|err| {
                tracing::warn!(language, error = %err, "Code callback failed");
                match err {
                    CallbackError::UnknownLanguage(language) => Error::UnknownLanguage(language),
                    CallbackError::Failed(source) => Error::CannotHighlight { source },
                }
            })
    }
}

/// Run `f`, converting a panic into [`Error::BadCallback`].
fn guarded<T>(f: impl FnOnce() -> T) -> Result<T> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::warn!(%message, "Callback panicked");
        Error::BadCallback { message }
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "callback panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn echo_math(source: &str, display: bool) -> Result<String, CallbackError> {
        Ok(format!("[{source}|{display}]"))
    }

    fn failing_math(_source: &str, _display: bool) -> Result<String, CallbackError> {
        Err(CallbackError::failed("no parse"))
    }

    fn panicking_code(_source: &str, _language: Option<&str>) -> Result<String, CallbackError> {
        panic!("highlighter exploded")
    }

    fn picky_code(source: &str, language: Option<&str>) -> Result<String, CallbackError> {
        match language {
            Some("rust") | None => Ok(source.to_owned()),
            Some(other) => Err(CallbackError::unknown_language(other)),
        }
    }

    fn broken_code(_source: &str, _language: Option<&str>) -> Result<String, CallbackError> {
        Err(CallbackError::failed("theme not loaded"))
    }

    #[test]
    fn test_math_without_renderer() {
        let dispatcher = Dispatcher::new(None, None);
        let err = dispatcher.math("x", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CannotConfigMath);
    }

    #[test]
    fn test_math_passes_arguments() {
        let dispatcher = Dispatcher::new(Some(&echo_math), None);
        assert_eq!(dispatcher.math("a+b", true).unwrap(), "[a+b|true]");
        assert_eq!(dispatcher.math("c", false).unwrap(), "[c|false]");
    }

    #[test]
    fn test_math_failure_kind() {
        let dispatcher = Dispatcher::new(Some(&failing_math), None);
        let err = dispatcher.math("x", false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CannotRenderMath);
        assert!(err.to_string().contains("no parse"));
    }

    #[test]
    fn test_display_math_failure_kind() {
        let dispatcher = Dispatcher::new(Some(&failing_math), None);
        let err = dispatcher.math("x", true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CannotRenderMath);
    }

    #[test]
    fn test_code_without_highlighter() {
        let dispatcher = Dispatcher::new(None, None);
        assert_eq!(dispatcher.code("fn main() {}", Some("rust")).unwrap(), None);
    }

    #[test]
    fn test_code_unknown_language() {
        let dispatcher = Dispatcher::new(None, Some(&picky_code));
        assert_eq!(
            dispatcher.code("x", Some("rust")).unwrap(),
            Some("x".to_owned())
        );

        let err = dispatcher.code("x", Some("cobol")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownLanguage);
        assert_eq!(err.to_string(), "unknown language: cobol");
    }

    #[test]
    fn test_code_failure_kind() {
        let dispatcher = Dispatcher::new(None, Some(&broken_code));
        let err = dispatcher.code("x", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CannotHighlight);
    }

    #[test]
    fn test_panic_becomes_bad_callback() {
        let dispatcher = Dispatcher::new(None, Some(&panicking_code));
        let err = dispatcher.code("x", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadCallback);
        assert!(err.to_string().contains("highlighter exploded"));
    }

    #[test]
    fn test_panic_message_fallback() {
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "callback panicked");
    }
}
