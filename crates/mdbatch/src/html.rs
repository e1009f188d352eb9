//! HTML fragments for elements with more than a fixed open/close tag.
//!
//! Writing into a `String` cannot fail, so the `fmt::Result` of each
//! `write!` is discarded.

use std::fmt::Write;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use pulldown_cmark::{BlockQuoteKind, CowStr, LinkType};

use crate::state::escape_html;

/// Bytes that may not appear unencoded in an `href` or `src`. Reserved URL
/// characters and existing `%XX` escapes pass through.
const URL_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode and HTML-escape a URL for use in an attribute.
fn url_attr(url: &str) -> String {
    escape_html(&utf8_percent_encode(url, URL_ENCODE_SET).to_string())
}

/// Default rendering of a code block: escaped text inside `<pre><code>`.
///
/// The language tag, when present, becomes a `language-*` class.
pub fn code_block(language: Option<&str>, content: &str, out: &mut String) {
    if let Some(language) = language {
        let _ = write!(
            out,
            r#"<pre><code class="language-{}">{}</code></pre>"#,
            escape_html(language),
            escape_html(content)
        );
    } else {
        let _ = write!(out, "<pre><code>{}</code></pre>", escape_html(content));
    }
}

pub(crate) fn blockquote_start(kind: Option<BlockQuoteKind>, out: &mut String) {
    let class = match kind {
        None => {
            out.push_str("<blockquote>");
            return;
        }
        Some(BlockQuoteKind::Note) => "note",
        Some(BlockQuoteKind::Tip) => "tip",
        Some(BlockQuoteKind::Important) => "important",
        Some(BlockQuoteKind::Warning) => "warning",
        Some(BlockQuoteKind::Caution) => "caution",
    };
    let _ = write!(out, r#"<blockquote class="markdown-alert-{class}">"#);
}

pub(crate) fn heading_start(
    level: u8,
    id: Option<&str>,
    classes: &[CowStr<'_>],
    attrs: &[(CowStr<'_>, Option<CowStr<'_>>)],
    out: &mut String,
) {
    let _ = write!(out, "<h{level}");
    if let Some(id) = id {
        let _ = write!(out, r#" id="{}""#, escape_html(id));
    }
    if !classes.is_empty() {
        let joined = classes
            .iter()
            .map(|class| escape_html(class))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = write!(out, r#" class="{joined}""#);
    }
    for (name, value) in attrs {
        match value {
            Some(value) => {
                let _ = write!(out, r#" {}="{}""#, escape_html(name), escape_html(value));
            }
            None => {
                let _ = write!(out, " {}", escape_html(name));
            }
        }
    }
    out.push('>');
}

pub(crate) fn link_start(link_type: LinkType, dest_url: &str, title: &str, out: &mut String) {
    let href = if link_type == LinkType::Email && !dest_url.starts_with("mailto:") {
        url_attr(&format!("mailto:{dest_url}"))
    } else {
        url_attr(dest_url)
    };
    let _ = write!(out, r#"<a href="{href}""#);
    if !title.is_empty() {
        let _ = write!(out, r#" title="{}""#, escape_html(title));
    }
    out.push('>');
}

pub(crate) fn image(src: &str, alt: &str, title: &str, out: &mut String) {
    let title_attr = if title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(title))
    };
    let _ = write!(
        out,
        r#"<img src="{}"{title_attr} alt="{}">"#,
        url_attr(src),
        escape_html(alt)
    );
}

pub(crate) fn task_list_marker(checked: bool, out: &mut String) {
    if checked {
        out.push_str(r#"<input type="checkbox" checked disabled> "#);
    } else {
        out.push_str(r#"<input type="checkbox" disabled> "#);
    }
}

pub(crate) fn footnote_reference(label: &str, number: usize, out: &mut String) {
    let _ = write!(
        out,
        r##"<sup class="footnote-reference"><a href="#{}">{number}</a></sup>"##,
        escape_html(label)
    );
}

pub(crate) fn footnote_definition_start(label: &str, number: usize, out: &mut String) {
    let _ = write!(
        out,
        r#"<div class="footnote-definition" id="{}"><sup class="footnote-definition-label">{number}</sup>"#,
        escape_html(label)
    );
}
