//! Error types for rendering and theme lookup.

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Discriminant of an [`Error`], for callers that match on the failure class
/// without caring about the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A callback panicked.
    BadCallback,
    /// The math callback returned an error.
    CannotRenderMath,
    /// A math span was found but no math callback is configured.
    CannotConfigMath,
    /// The code callback returned an error.
    CannotHighlight,
    /// The code callback does not recognize the language tag.
    UnknownLanguage,
    /// Theme name is not one of the registered names.
    UnknownTheme,
    /// Theme name is registered but its payload is absent.
    MissingTheme,
    /// CSS generation failed for a registered theme.
    CannotGetCss,
    /// Two mutually exclusive options were enabled together.
    ConflictingOptions,
}

/// Every way a render or theme lookup can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a user callback panicked: {message}")]
    BadCallback { message: String },

    #[error("cannot render math expression: {source}")]
    CannotRenderMath {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("math span found but no math renderer is configured")]
    CannotConfigMath,

    #[error("cannot highlight code block: {source}")]
    CannotHighlight {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    #[error("theme {0} is registered but could not be loaded")]
    MissingTheme(String),

    #[error("cannot generate CSS for theme {theme}: {message}")]
    CannotGetCss { theme: String, message: String },

    #[error("options {first} and {second} cannot be enabled together")]
    ConflictingOptions {
        first: &'static str,
        second: &'static str,
    },
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadCallback { .. } => ErrorKind::BadCallback,
            Self::CannotRenderMath { .. } => ErrorKind::CannotRenderMath,
            Self::CannotConfigMath => ErrorKind::CannotConfigMath,
            Self::CannotHighlight { .. } => ErrorKind::CannotHighlight,
            Self::UnknownLanguage(_) => ErrorKind::UnknownLanguage,
            Self::UnknownTheme(_) => ErrorKind::UnknownTheme,
            Self::MissingTheme(_) => ErrorKind::MissingTheme,
            Self::CannotGetCss { .. } => ErrorKind::CannotGetCss,
            Self::ConflictingOptions { .. } => ErrorKind::ConflictingOptions,
        }
    }

    /// Whether the failure came from a caller-supplied callback.
    #[must_use]
    pub fn is_callback_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::BadCallback
                | ErrorKind::CannotRenderMath
                | ErrorKind::CannotHighlight
                | ErrorKind::UnknownLanguage
        )
    }
}
