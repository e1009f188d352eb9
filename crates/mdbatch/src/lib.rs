//! Batch Markdown to HTML rendering with pluggable math and code callbacks.
//!
//! Documents are parsed with `pulldown-cmark` and written out by an
//! extension-aware HTML emitter. Two kinds of span are delegated to the
//! caller:
//!
//! - math spans (`$…$`, `$$…$$`) go to a [`MathRenderer`];
//! - code blocks go to a [`CodeHighlighter`], falling back to escaped
//!   `<pre><code>` when none is configured.
//!
//! # Architecture
//!
//! [`Options`] holds the extension toggles and callbacks. [`Options::resolve`]
//! turns it into parser flags, rejecting conflicting toggles. The
//! [`Renderer`] walks parser events per document through an internal emitter;
//! callbacks are invoked through a dispatcher that turns panics and callback
//! errors into [`Error`] values.
//!
//! # Example
//!
//! ```
//! use mdbatch::{Options, render};
//!
//! let options = Options::builder()
//!     .tables(true)
//!     .code_fn(|source, language| {
//!         Ok(format!("<x-code lang={:?}>{}</x-code>", language.unwrap_or(""), source.trim()))
//!     })
//!     .build();
//!
//! let html = render(&["```rust\nfn main() {}\n```"], Some(&options)).unwrap();
//! assert_eq!(html[0], r#"<x-code lang="rust">fn main() {}</x-code>"#);
//! ```

mod callback;
mod dispatch;
mod emitter;
mod error;
pub mod html;
mod options;
mod renderer;
mod state;
mod util;

pub use callback::{CallbackError, ClientSideMath, CodeHighlighter, MathRenderer};
pub use error::{Error, ErrorKind, Result};
pub use options::{Extensions, FootnoteMode, Options, OptionsBuilder, ResolvedOptions};
pub use renderer::{Renderer, render};
pub use state::escape_html;
