//! Rendering annotated documents for terminals and browsers.

use std::{borrow::Cow, ops::Range};

use crate::{
    colors,
    engine::AnnotatedContent,
    escape::{escape_html, push_escaped},
};

/// Renders `content` for a terminal, painting each span as a match.
///
/// Spans are byte ranges into `content`; they must be sorted, disjoint and on character
/// boundaries, as produced by [`AnnotatedContent::spans`].
///
/// Control characters in `content` are neutralised with [`terminal_safe`]; each segment is
/// cleaned after slicing, so the spans still refer to the original bytes.
pub fn format_body(content: &str, spans: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(content.len() + spans.len() * 16);
    let mut last = 0;
    for span in spans {
        out.push_str(&terminal_safe(&content[last..span.start]));
        out.push_str(colors::MATCH);
        out.push_str(&terminal_safe(&content[span.clone()]));
        out.push_str(colors::RESET);
        last = span.end;
    }
    out.push_str(&terminal_safe(&content[last..]));
    out
}

/// Replaces control characters with `U+FFFD` so untrusted text cannot drive the terminal.
///
/// Newlines, tabs and a carriage return directly before a newline are kept.
pub fn terminal_safe(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let keep = match c {
            '\n' | '\t' => true,
            '\r' => chars.peek() == Some(&'\n'),
            c => !c.is_control(),
        };
        out.push(if keep { c } else { char::REPLACEMENT_CHARACTER });
    }
    Cow::Owned(out)
}

/// Extracts only the lines that contain a span, with matches painted.
///
/// Lines are separated by a dimmed `…` marker when they are not contiguous.
pub fn matching_lines(content: &str, spans: &[Range<usize>]) -> String {
    let mut out = String::new();
    let mut line_start = 0;
    let mut span_idx = 0;
    let mut last_line_no: Option<usize> = None;

    for (line_no, line) in content.split_inclusive('\n').enumerate() {
        let line_end = line_start + line.len();

        while span_idx < spans.len() && spans[span_idx].end <= line_start {
            span_idx += 1;
        }

        let local: Vec<Range<usize>> = spans[span_idx..]
            .iter()
            .take_while(|s| s.start < line_end)
            .map(|s| s.start.max(line_start) - line_start..s.end.min(line_end) - line_start)
            .filter(|s| !s.is_empty())
            .collect();

        if !local.is_empty() {
            if last_line_no.is_some_and(|prev| prev + 1 != line_no) {
                out.push_str(&crate::dim("…"));
                out.push('\n');
            }
            out.push_str(&format_body(line.trim_end_matches(['\r', '\n']), &clip(&local, line)));
            out.push('\n');
            last_line_no = Some(line_no);
        }

        line_start = line_end;
    }

    out
}

/// Clips local spans to the line without its line ending.
fn clip(spans: &[Range<usize>], line: &str) -> Vec<Range<usize>> {
    let len = line.trim_end_matches(['\r', '\n']).len();
    spans
        .iter()
        .map(|s| s.start.min(len)..s.end.min(len))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Style sheet embedded in standalone pages.
const PAGE_STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem auto;max-width:60rem;\
color:#1f2937}h1{font-size:1.25rem}dl{display:grid;grid-template-columns:max-content auto;\
gap:.25rem 1rem}dt{color:#6b7280}pre{white-space:pre-wrap;background:#f9fafb;padding:1rem;\
border-radius:.5rem;line-height:1.5}mark{background:#fef08a;padding:0 .1em}";

/// A standalone HTML page showing one annotated document.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    /// Page title (raw, escaped on render).
    title: String,
    /// Metadata rows: label, raw value, optional CSS color.
    meta: Vec<(String, String, Option<String>)>,
}

impl HtmlPage {
    /// Starts a page with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            meta: Vec::new(),
        }
    }

    /// Adds a metadata row.
    #[must_use]
    pub fn meta(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.push((label.into(), value.into(), None));
        self
    }

    /// Adds a metadata row whose value is shown in `color` (a CSS color such as `#22c55e`).
    #[must_use]
    pub fn meta_colored(
        mut self,
        label: impl Into<String>,
        value: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        self.meta
            .push((label.into(), value.into(), Some(color.into())));
        self
    }

    /// Renders the page around the annotated body.
    pub fn render(&self, body: &AnnotatedContent) -> String {
        let mut out = String::with_capacity(body.html().len() + 1024);
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        out.push_str("<title>");
        push_escaped(&mut out, &self.title);
        out.push_str("</title>\n<style>");
        out.push_str(PAGE_STYLE);
        out.push_str("</style>\n</head>\n<body>\n<h1>");
        push_escaped(&mut out, &self.title);
        out.push_str("</h1>\n");

        if !self.meta.is_empty() {
            out.push_str("<dl>\n");
            for (label, value, color) in &self.meta {
                out.push_str("<dt>");
                push_escaped(&mut out, label);
                out.push_str("</dt><dd");
                if let Some(color) = color {
                    out.push_str(" style=\"color:");
                    out.push_str(&escape_html(color));
                    out.push('"');
                }
                out.push('>');
                push_escaped(&mut out, value);
                out.push_str("</dd>\n");
            }
            out.push_str("</dl>\n");
        }

        out.push_str("<pre class=\"document\">");
        out.push_str(body.html());
        out.push_str("</pre>\n</body>\n</html>\n");
        out
    }
}
