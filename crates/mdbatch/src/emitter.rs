//! Event-to-HTML emitter for a single document.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd};

use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::html;
use crate::state::{CodeBlockState, FootnoteState, ImageState, TableState, escape_html};
use crate::util::{heading_level_to_num, language_tag};

/// Walks one document's events and writes HTML.
///
/// Structural events map to fixed markup. Math spans and code blocks go
/// through the [`Dispatcher`]; their output is spliced verbatim at the
/// position of the span. Nothing is reordered: the only buffering is for a
/// code block's text and an image's alt text.
pub(crate) struct HtmlEmitter<'a> {
    output: String,
    dispatcher: Dispatcher<'a>,
    /// Code block rendering state.
    code: CodeBlockState,
    /// Table rendering state.
    table: TableState,
    /// Image alt text capture state.
    image: ImageState,
    /// Footnote label numbering.
    footnotes: FootnoteState,
    /// Inside a front matter block, whose contents are dropped.
    in_metadata: bool,
}

impl<'a> HtmlEmitter<'a> {
    pub(crate) fn new(dispatcher: Dispatcher<'a>, capacity: usize) -> Self {
        Self {
            output: String::with_capacity(capacity),
            dispatcher,
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            footnotes: FootnoteState::default(),
            in_metadata: false,
        }
    }

    /// Consume `events` and return the document's HTML.
    ///
    /// Stops at the first callback failure; no partial output escapes.
    pub(crate) fn render<'e, I>(mut self, events: I) -> Result<String>
    where
        I: IntoIterator<Item = Event<'e>>,
    {
        for event in events {
            self.process_event(event)?;
        }
        Ok(self.output)
    }

    /// Push inline markup, unless it would land inside an `alt` attribute.
    fn push_inline(&mut self, content: &str) {
        if !self.image.is_active() {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) -> Result<()> {
        if self.in_metadata {
            if let Event::End(TagEnd::MetadataBlock(_)) = event {
                self.in_metadata = false;
            }
            return Ok(());
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => return self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::InlineMath(math) => return self.math(&math, false),
            Event::DisplayMath(math) => return self.math(&math, true),
            Event::Html(raw) | Event::InlineHtml(raw) => self.push_inline(&raw),
            Event::FootnoteReference(label) => {
                let number = self.footnotes.number(&label);
                if self.image.is_active() {
                    self.image.push_str(&format!("[{number}]"));
                } else {
                    html::footnote_reference(&label, number, &mut self.output);
                }
            }
            Event::SoftBreak => {
                if self.image.is_active() {
                    self.image.push_str(" ");
                } else {
                    self.output.push('\n');
                }
            }
            Event::HardBreak => {
                if self.image.is_active() {
                    self.image.push_str(" ");
                } else {
                    self.output.push_str("<br>");
                }
            }
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => html::task_list_marker(checked, &mut self.output),
        }
        Ok(())
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading {
                level,
                id,
                classes,
                attrs,
            } => html::heading_start(
                heading_level_to_num(level),
                id.as_deref(),
                &classes,
                &attrs,
                &mut self.output,
            ),
            Tag::BlockQuote(kind) => html::blockquote_start(kind, &mut self.output),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(ref info) => language_tag(info).map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(language);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => {
                    let _ = write!(self.output, r#"<ol start="{n}">"#);
                }
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(label) => {
                let number = self.footnotes.number(&label);
                html::footnote_definition_start(&label, number, &mut self.output);
            }
            Tag::MetadataBlock(_) => self.in_metadata = true,
            Tag::HtmlBlock => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                let _ = write!(self.output, "<{tag}{align}>");
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                if !self.image.is_active() {
                    html::link_start(link_type, &dest_url, &title, &mut self.output);
                }
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the matching end tag.
                self.image.start(dest_url.into_string(), title.into_string());
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) -> Result<()> {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(level) => {
                let _ = write!(self.output, "</h{}>", heading_level_to_num(level));
            }
            TagEnd::BlockQuote(_) => self.output.push_str("</blockquote>"),
            TagEnd::CodeBlock => self.code_block()?,
            TagEnd::List(ordered) => self
                .output
                .push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition => self.output.push_str("</div>"),
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                if let Some((src, title, alt)) = self.image.end() {
                    html::image(&src, &alt, &title, &mut self.output);
                }
            }
        }
        Ok(())
    }

    fn code_block(&mut self) -> Result<()> {
        let (language, content) = self.code.end();
        match self.dispatcher.code(&content, language.as_deref())? {
            Some(rendered) => self.output.push_str(&rendered),
            None => html::code_block(language.as_deref(), &content, &mut self.output),
        }
        Ok(())
    }

    fn math(&mut self, source: &str, display: bool) -> Result<()> {
        // Alt text is plain text, so math inside an image keeps its source.
        if self.image.is_active() {
            self.image.push_str(source);
            return Ok(());
        }
        let rendered = self.dispatcher.math(source, display)?;
        self.output.push_str(&rendered);
        Ok(())
    }

    fn text(&mut self, text: &str) {
        // Priority: code > image > normal text
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
        } else {
            let _ = write!(self.output, "<code>{}</code>", escape_html(code));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::CallbackError;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Options, Parser};

    fn emit(markdown: &str, options: Options) -> Result<String> {
        let parser = Parser::new_ext(markdown, options);
        HtmlEmitter::new(Dispatcher::new(None, None), markdown.len()).render(parser)
    }

    fn html(markdown: &str, options: Options) -> String {
        emit(markdown, options).unwrap()
    }

    fn bracket_math(source: &str, display: bool) -> Result<String, CallbackError> {
        Ok(if display {
            format!("[[{source}]]")
        } else {
            format!("[{source}]")
        })
    }

    fn shout_code(source: &str, language: Option<&str>) -> Result<String, CallbackError> {
        Ok(format!(
            "<{}>{}",
            language.unwrap_or("none"),
            source.to_uppercase()
        ))
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(html("Hello, world!", Options::empty()), "<p>Hello, world!</p>");
    }

    #[test]
    fn test_heading_plain() {
        assert_eq!(html("## Section", Options::empty()), "<h2>Section</h2>");
    }

    #[test]
    fn test_heading_attributes() {
        assert_eq!(
            html("# foo {#bar .baz}", Options::ENABLE_HEADING_ATTRIBUTES),
            r#"<h1 id="bar" class="baz">foo</h1>"#
        );
    }

    #[test]
    fn test_emphasis_and_strong() {
        assert_eq!(
            html("*italic* and **bold**", Options::empty()),
            "<p><em>italic</em> and <strong>bold</strong></p>"
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(
            html("~~foo~~", Options::ENABLE_STRIKETHROUGH),
            "<p><del>foo</del></p>"
        );
    }

    #[test]
    fn test_superscript_and_subscript() {
        assert_eq!(
            html("^foo^", Options::ENABLE_SUPERSCRIPT),
            "<p><sup>foo</sup></p>"
        );
        assert_eq!(
            html("~foo~", Options::ENABLE_SUBSCRIPT),
            "<p><sub>foo</sub></p>"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            html("- a\n- b", Options::empty()),
            "<ul><li>a</li><li>b</li></ul>"
        );
        assert_eq!(
            html("3. a\n4. b", Options::empty()),
            r#"<ol start="3"><li>a</li><li>b</li></ol>"#
        );
    }

    #[test]
    fn test_task_list() {
        assert_eq!(
            html("- [ ] foo\n- [x] bar", Options::ENABLE_TASKLISTS),
            concat!(
                r#"<ul><li><input type="checkbox" disabled> foo</li>"#,
                r#"<li><input type="checkbox" checked disabled> bar</li></ul>"#
            )
        );
    }

    #[test]
    fn test_table() {
        assert_eq!(
            html("| foo | bar |\n| :-- | --: |\n| baz | qux |", Options::ENABLE_TABLES),
            concat!(
                "<table><thead><tr>",
                r#"<th style="text-align:left">foo</th><th style="text-align:right">bar</th>"#,
                "</tr></thead><tbody><tr>",
                r#"<td style="text-align:left">baz</td><td style="text-align:right">qux</td>"#,
                "</tr></tbody></table>"
            )
        );
    }

    #[test]
    fn test_gfm_alert() {
        assert_eq!(
            html("> [!NOTE]\n> foo", Options::ENABLE_GFM),
            r#"<blockquote class="markdown-alert-note"><p>foo</p></blockquote>"#
        );
    }

    #[test]
    fn test_plain_blockquote() {
        assert_eq!(
            html("> foo", Options::empty()),
            "<blockquote><p>foo</p></blockquote>"
        );
    }

    #[test]
    fn test_definition_list() {
        assert_eq!(
            html("foo\n: bar", Options::ENABLE_DEFINITION_LIST),
            "<dl><dt>foo</dt><dd>bar</dd></dl>"
        );
    }

    #[test]
    fn test_wikilink() {
        assert_eq!(
            html("[[foo]]", Options::ENABLE_WIKILINKS),
            r#"<p><a href="foo">foo</a></p>"#
        );
    }

    #[test]
    fn test_footnotes() {
        let output = html("foo[^1]\n\n[^1]: bar", Options::ENABLE_FOOTNOTES);
        assert_eq!(
            output,
            concat!(
                r##"<p>foo<sup class="footnote-reference"><a href="#1">1</a></sup></p>"##,
                r#"<div class="footnote-definition" id="1"><sup class="footnote-definition-label">1</sup>"#,
                "<p>bar</p></div>"
            )
        );
    }

    #[test]
    fn test_yaml_metadata_skipped() {
        assert_eq!(
            html(
                "---\ntitle: x\n---\n\nbody",
                Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
            ),
            "<p>body</p>"
        );
    }

    #[test]
    fn test_pluses_metadata_skipped() {
        assert_eq!(
            html(
                "+++\ntitle = \"x\"\n+++\n\nbody",
                Options::ENABLE_PLUSES_DELIMITED_METADATA_BLOCKS
            ),
            "<p>body</p>"
        );
    }

    #[test]
    fn test_image_alt_text() {
        assert_eq!(
            html("![Alt *text*](image.png)", Options::empty()),
            r#"<p><img src="image.png" alt="Alt text"></p>"#
        );
    }

    #[test]
    fn test_link_with_title() {
        assert_eq!(
            html(r#"[a](https://example.com "T")"#, Options::empty()),
            r#"<p><a href="https://example.com" title="T">a</a></p>"#
        );
    }

    #[test]
    fn test_link_destination_with_space() {
        assert_eq!(
            html("[x](<a b>)", Options::empty()),
            r#"<p><a href="a%20b">x</a></p>"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(html("a < b & c", Options::empty()), "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(
            html("use `<T>`", Options::empty()),
            "<p>use <code>&lt;T&gt;</code></p>"
        );
    }

    #[test]
    fn test_raw_html_passes_through() {
        assert_eq!(
            html("<div>raw</div>", Options::empty()),
            "<div>raw</div>"
        );
    }

    #[test]
    fn test_default_code_block() {
        assert_eq!(
            html("```rust\nlet x = 1 < 2;\n```", Options::empty()),
            r#"<pre><code class="language-rust">let x = 1 &lt; 2;
</code></pre>"#
        );
    }

    #[test]
    fn test_indented_code_block() {
        assert_eq!(
            html("    plain\n", Options::empty()),
            "<pre><code>plain\n</code></pre>"
        );
    }

    #[test]
    fn test_code_callback_replaces_block() {
        let parser = Parser::new("before\n\n```c info\nint x;\n```\n\nafter");
        let output = HtmlEmitter::new(Dispatcher::new(None, Some(&shout_code)), 0)
            .render(parser)
            .unwrap();
        assert_eq!(output, "<p>before</p><c>INT X;\n<p>after</p>");
    }

    #[test]
    fn test_code_callback_without_language() {
        let parser = Parser::new("```\nx\n```");
        let output = HtmlEmitter::new(Dispatcher::new(None, Some(&shout_code)), 0)
            .render(parser)
            .unwrap();
        assert_eq!(output, "<none>X\n");
    }

    #[test]
    fn test_math_spliced_in_place() {
        let parser = Parser::new_ext("a $x$ b $$y$$ c", Options::ENABLE_MATH);
        let output = HtmlEmitter::new(Dispatcher::new(Some(&bracket_math), None), 0)
            .render(parser)
            .unwrap();
        assert_eq!(output, "<p>a [x] b [[y]] c</p>");
    }

    #[test]
    fn test_math_without_renderer_fails() {
        let err = emit("$x$", Options::ENABLE_MATH).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CannotConfigMath);
    }

    #[test]
    fn test_math_syntax_off_is_text() {
        assert_eq!(html("$x$", Options::empty()), "<p>$x$</p>");
    }

    #[test]
    fn test_math_in_image_alt_keeps_source() {
        let err_free = emit("![$x$](a.png)", Options::ENABLE_MATH).unwrap();
        assert_eq!(err_free, r#"<p><img src="a.png" alt="x"></p>"#);
    }
}
