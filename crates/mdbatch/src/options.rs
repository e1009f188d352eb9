//! Extension configuration and its translation into parser flags.

use std::fmt;
use std::sync::Arc;

use pulldown_cmark::Options as ParserOptions;

use crate::callback::{CallbackError, CodeHighlighter, MathRenderer};
use crate::dispatch::Dispatcher;
use crate::error::{Error, Result};

/// Named syntax extensions. Every toggle defaults to `false`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Extensions {
    /// GFM-style tables.
    pub tables: bool,
    /// GFM-style footnotes.
    pub footnotes: bool,
    /// Strikethrough (`~~text~~`).
    pub strikethrough: bool,
    /// Task list checkboxes.
    pub tasklists: bool,
    /// Smart quotes and punctuation ligatures.
    pub smart_punctuation: bool,
    /// Custom IDs, classes and attributes on headings (`# foo {#id .class}`).
    pub heading_attributes: bool,
    /// Skip YAML front matter delimited by `---` and `---`/`...`.
    pub yaml_style_metadata_blocks: bool,
    /// Skip TOML front matter delimited by `+++`.
    pub pluses_delimited_metadata_blocks: bool,
    /// Vanilla-Markdown footnotes. Implies `footnotes`.
    pub old_footnotes: bool,
    /// Blockquote alert tags: `[!NOTE]`, `[!TIP]`, `[!IMPORTANT]`,
    /// `[!WARNING]` and `[!CAUTION]`.
    pub gfm: bool,
    /// Definition lists.
    pub definition_list: bool,
    /// Superscript (`^text^`).
    pub superscript: bool,
    /// Subscript (`~text~`).
    pub subscript: bool,
    /// Obsidian-style `[[wikilinks]]`.
    pub wikilinks: bool,
    /// Recognize `$…$` and `$$…$$` math spans. Implied by a math renderer.
    pub math: bool,
}

/// Which footnote syntax the parser runs with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FootnoteMode {
    #[default]
    Off,
    /// GFM footnotes.
    Gfm,
    /// Vanilla-Markdown footnotes; wins when both styles are requested.
    Legacy,
}

/// Parser configuration produced by [`Options::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedOptions {
    parser: ParserOptions,
    footnotes: FootnoteMode,
}

impl ResolvedOptions {
    /// Flags passed to `pulldown_cmark::Parser::new_ext`.
    #[must_use]
    pub fn parser_options(&self) -> ParserOptions {
        self.parser
    }

    #[must_use]
    pub fn footnote_mode(&self) -> FootnoteMode {
        self.footnotes
    }

    /// Whether math spans are recognized.
    #[must_use]
    pub fn math_enabled(&self) -> bool {
        self.parser.contains(ParserOptions::ENABLE_MATH)
    }
}

/// Rendering configuration: extension toggles plus optional callbacks.
///
/// Immutable once built. Cloning is cheap and clones share callbacks.
#[derive(Clone, Default)]
pub struct Options {
    extensions: Extensions,
    math: Option<Arc<dyn MathRenderer>>,
    code: Option<Arc<dyn CodeHighlighter>>,
}

impl Options {
    /// Start building options with every extension disabled.
    #[must_use]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    #[must_use]
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    #[must_use]
    pub fn has_math_renderer(&self) -> bool {
        self.math.is_some()
    }

    #[must_use]
    pub fn has_code_highlighter(&self) -> bool {
        self.code.is_some()
    }

    /// Translate the toggles into parser flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConflictingOptions`] when both metadata block styles
    /// are enabled.
    pub fn resolve(&self) -> Result<ResolvedOptions> {
        let ext = &self.extensions;

        if ext.yaml_style_metadata_blocks && ext.pluses_delimited_metadata_blocks {
            return Err(Error::ConflictingOptions {
                first: "yaml_style_metadata_blocks",
                second: "pluses_delimited_metadata_blocks",
            });
        }

        let mut parser = ParserOptions::empty();

        macro_rules! flag_map {
            { $( $switch:expr => $flag:expr ),* $(,)? } => {
                $( if $switch { parser.insert($flag); } )*
            };
        }

        flag_map! {
            ext.tables => ParserOptions::ENABLE_TABLES,
            ext.strikethrough => ParserOptions::ENABLE_STRIKETHROUGH,
            ext.tasklists => ParserOptions::ENABLE_TASKLISTS,
            ext.smart_punctuation => ParserOptions::ENABLE_SMART_PUNCTUATION,
            ext.heading_attributes => ParserOptions::ENABLE_HEADING_ATTRIBUTES,
            ext.yaml_style_metadata_blocks => ParserOptions::ENABLE_YAML_STYLE_METADATA_BLOCKS,
            ext.pluses_delimited_metadata_blocks => ParserOptions::ENABLE_PLUSES_DELIMITED_METADATA_BLOCKS,
            ext.gfm => ParserOptions::ENABLE_GFM,
            ext.definition_list => ParserOptions::ENABLE_DEFINITION_LIST,
            ext.superscript => ParserOptions::ENABLE_SUPERSCRIPT,
            ext.subscript => ParserOptions::ENABLE_SUBSCRIPT,
            ext.wikilinks => ParserOptions::ENABLE_WIKILINKS,
            ext.math || self.math.is_some() => ParserOptions::ENABLE_MATH,
        }

        let footnotes = if ext.old_footnotes {
            parser.insert(ParserOptions::ENABLE_OLD_FOOTNOTES);
            FootnoteMode::Legacy
        } else if ext.footnotes {
            parser.insert(ParserOptions::ENABLE_FOOTNOTES);
            FootnoteMode::Gfm
        } else {
            FootnoteMode::Off
        };

        Ok(ResolvedOptions { parser, footnotes })
    }

    pub(crate) fn dispatcher(&self) -> Dispatcher<'_> {
        Dispatcher::new(self.math.as_deref(), self.code.as_deref())
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("extensions", &self.extensions)
            .field("math", &self.math.is_some())
            .field("code", &self.code.is_some())
            .finish()
    }
}

/// Builder for [`Options`].
#[derive(Default)]
#[must_use]
pub struct OptionsBuilder {
    extensions: Extensions,
    math: Option<Arc<dyn MathRenderer>>,
    code: Option<Arc<dyn CodeHighlighter>>,
}

macro_rules! toggles {
    ($($name:ident),* $(,)?) => {
        $(
            #[doc = concat!("Enable or disable `", stringify!($name), "`. See [`Extensions`].")]
            pub fn $name(mut self, enabled: bool) -> Self {
                self.extensions.$name = enabled;
                self
            }
        )*
    };
}

impl OptionsBuilder {
    toggles! {
        tables,
        footnotes,
        strikethrough,
        tasklists,
        smart_punctuation,
        heading_attributes,
        yaml_style_metadata_blocks,
        pluses_delimited_metadata_blocks,
        old_footnotes,
        gfm,
        definition_list,
        superscript,
        subscript,
        wikilinks,
    }

    /// Replace every toggle at once.
    pub fn extensions(mut self, extensions: Extensions) -> Self {
        self.extensions = extensions;
        self
    }

    /// Recognize math spans. Without a renderer, a math span fails the
    /// render with [`Error::CannotConfigMath`].
    pub fn math_syntax(mut self, enabled: bool) -> Self {
        self.extensions.math = enabled;
        self
    }

    /// Set the math renderer. Implies math syntax.
    pub fn math(mut self, renderer: impl MathRenderer + 'static) -> Self {
        self.math = Some(Arc::new(renderer));
        self
    }

    /// Set the math renderer from a closure.
    pub fn math_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str, bool) -> Result<String, CallbackError> + Send + Sync + 'static,
    {
        self.math(f)
    }

    /// Set the math renderer from a shared handle.
    pub fn math_shared(mut self, renderer: Arc<dyn MathRenderer>) -> Self {
        self.math = Some(renderer);
        self
    }

    /// Set the code highlighter.
    pub fn code(mut self, highlighter: impl CodeHighlighter + 'static) -> Self {
        self.code = Some(Arc::new(highlighter));
        self
    }

    /// Set the code highlighter from a closure.
    pub fn code_fn<F>(self, f: F) -> Self
    where
        F: Fn(&str, Option<&str>) -> Result<String, CallbackError> + Send + Sync + 'static,
    {
        self.code(f)
    }

    /// Set the code highlighter from a shared handle.
    pub fn code_shared(mut self, highlighter: Arc<dyn CodeHighlighter>) -> Self {
        self.code = Some(highlighter);
        self
    }

    pub fn build(self) -> Options {
        Options {
            extensions: self.extensions,
            math: self.math,
            code: self.code,
        }
    }
}
