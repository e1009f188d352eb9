//! Batch rendering entry points.

use pulldown_cmark::Parser;
use rayon::prelude::*;

use crate::emitter::HtmlEmitter;
use crate::error::Result;
use crate::options::{Options, ResolvedOptions};

/// Renders documents with one resolved configuration.
///
/// Construction resolves the options, so a misconfiguration is reported
/// before any document is touched. The renderer holds no per-document
/// state and can be shared between threads.
#[derive(Debug, Clone)]
pub struct Renderer {
    options: Options,
    resolved: ResolvedOptions,
}

impl Renderer {
    /// Resolve `options` and build a renderer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConflictingOptions`](crate::Error::ConflictingOptions)
    /// when the options cannot be resolved.
    pub fn new(options: Options) -> Result<Self> {
        let resolved = options.resolve()?;
        tracing::debug!(
            parser_options = ?resolved.parser_options(),
            footnotes = ?resolved.footnote_mode(),
            math = options.has_math_renderer(),
            code = options.has_code_highlighter(),
            "Resolved render options"
        );
        Ok(Self { options, resolved })
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    pub fn resolved(&self) -> &ResolvedOptions {
        &self.resolved
    }

    /// Render a single document.
    pub fn render_document(&self, markdown: &str) -> Result<String> {
        let parser = Parser::new_ext(markdown, self.resolved.parser_options());
        HtmlEmitter::new(self.options.dispatcher(), markdown.len()).render(parser)
    }

    /// Render documents one after another, stopping at the first failure.
    pub fn render_batch<S: AsRef<str>>(&self, markdown: &[S]) -> Result<Vec<String>> {
        markdown
            .iter()
            .map(|document| self.render_document(document.as_ref()))
            .collect()
    }

    /// Render documents on the rayon pool.
    ///
    /// Output order matches input order. If any document fails, every
    /// partial result is discarded and one of the failures is returned.
    pub fn render_batch_parallel<S: AsRef<str> + Sync>(
        &self,
        markdown: &[S],
    ) -> Result<Vec<String>> {
        markdown
            .par_iter()
            .map(|document| self.render_document(document.as_ref()))
            .collect()
    }
}

/// Render a batch of Markdown documents to HTML.
///
/// Output `i` is the HTML for input `i`. Passing `None` renders plain
/// CommonMark with no extensions. Documents are rendered in parallel, so
/// callbacks may run concurrently.
///
/// # Errors
///
/// Fails without partial output if the options conflict or any document
/// fails to render.
///
/// # Example
///
/// ```
/// use mdbatch::{Options, render};
///
/// let options = Options::builder().strikethrough(true).build();
/// let html = render(&["# Title", "~~gone~~"], Some(&options)).unwrap();
/// assert_eq!(html, ["<h1>Title</h1>", "<p><del>gone</del></p>"]);
/// ```
pub fn render<S: AsRef<str> + Sync>(markdown: &[S], options: Option<&Options>) -> Result<Vec<String>> {
    let renderer = Renderer::new(options.cloned().unwrap_or_default())?;

    tracing::debug!(documents = markdown.len(), "Rendering batch");
    let result = renderer.render_batch_parallel(markdown);
    if let Err(ref err) = result {
        tracing::debug!(error = %err, kind = ?err.kind(), "Batch aborted");
    }
    result
}
