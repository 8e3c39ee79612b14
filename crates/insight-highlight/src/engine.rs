//! Match highlighting for full documents.
//!
//! The search service ranks documents semantically, so the snippet it returns is often not a
//! verbatim substring of the document. Highlighting is therefore layered:
//!
//! 1. the snippet as a case-insensitive literal passage,
//! 2. every query term, independently of whether the passage matched,
//! 3. if nothing matched so far, the longer words of the snippet.
//!
//! Matching runs against the raw text and yields byte ranges. The HTML output is assembled
//! from escaped segments and `<mark>` markers, so a term like `amp` can never match inside an
//! entity and markers never land inside other markers.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::escape::{escape_html, push_escaped};

/// Opening highlight marker.
pub const MARK_OPEN: &str = "<mark>";

/// Closing highlight marker.
pub const MARK_CLOSE: &str = "</mark>";

/// Token length limits and matcher bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Minimum character length of a query term.
    pub min_query_term_len: usize,
    /// Minimum character length of a snippet word in the fallback pass.
    pub min_snippet_word_len: usize,
    /// Compiled size limit for each matcher, in bytes.
    pub regex_size_limit: usize,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            min_query_term_len: 3,
            min_snippet_word_len: 4,
            regex_size_limit: 10 * (1 << 20),
        }
    }
}

/// Which pass produced the highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
    /// The snippet passage was found (query terms may have added more spans).
    Passage,
    /// Only query terms were found.
    QueryTerms,
    /// Neither matched; individual snippet words were highlighted instead.
    SnippetWords,
    /// Nothing matched.
    Unmatched,
    /// Matching failed; the output is escaped but not highlighted.
    Failed,
}

impl MatchStage {
    /// Short description for display.
    pub fn description(self) -> &'static str {
        match self {
            Self::Passage => "passage matched",
            Self::QueryTerms => "query terms matched",
            Self::SnippetWords => "approximate match (snippet words)",
            Self::Unmatched => "no literal match",
            Self::Failed => "highlighting unavailable",
        }
    }
}

/// An escaped document with highlight markers.
///
/// The HTML never contains an unescaped `& < > " '` outside the markers, and every marker
/// wraps text that occurs case-insensitively in the original content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedContent {
    /// Escaped text with `<mark>` markers.
    html: String,
    /// Highlighted byte ranges of the raw content, sorted and disjoint.
    spans: Vec<Range<usize>>,
    /// Pass that produced the spans.
    stage: MatchStage,
}

impl AnnotatedContent {
    /// Escaped HTML with highlight markers.
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Consumes the annotation, returning the HTML.
    pub fn into_html(self) -> String {
        self.html
    }

    /// Highlighted byte ranges of the raw content.
    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    /// Pass that produced the highlights.
    pub fn stage(&self) -> MatchStage {
        self.stage
    }

    /// True if at least one span is highlighted.
    pub fn is_highlighted(&self) -> bool {
        !self.spans.is_empty()
    }
}

/// Produces highlighted renderings of documents.
#[derive(Debug, Clone, Default)]
pub struct HighlightEngine {
    /// Token limits.
    options: HighlightOptions,
}

impl HighlightEngine {
    /// Creates an engine with the given options.
    pub fn new(options: HighlightOptions) -> Self {
        Self { options }
    }

    /// Returns the engine options.
    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    /// Escapes `content` and highlights `snippet` and the terms of `query` within it.
    ///
    /// Never fails: if a matcher cannot be built the escaped text is returned without
    /// highlights.
    pub fn highlight(&self, content: &str, snippet: &str, query: &str) -> AnnotatedContent {
        match self.find_spans(content, snippet, query) {
            Ok((spans, stage)) => {
                debug!(spans = spans.len(), stage = ?stage, "highlighted document");
                AnnotatedContent {
                    html: mark_spans(content, &spans),
                    spans,
                    stage,
                }
            }
            Err(e) => {
                debug!(error = %e, "highlighting failed, rendering escaped text");
                AnnotatedContent {
                    html: escape_html(content),
                    spans: Vec::new(),
                    stage: MatchStage::Failed,
                }
            }
        }
    }

    /// Runs the three passes and returns coalesced spans.
    fn find_spans(
        &self,
        content: &str,
        snippet: &str,
        query: &str,
    ) -> Result<(Vec<Range<usize>>, MatchStage), regex::Error> {
        let mut spans = Vec::new();
        let mut stage = MatchStage::Unmatched;
        let has_snippet = !snippet.trim().is_empty();

        for pattern in passage_patterns(snippet) {
            let re = self.build(&pattern)?;
            spans.extend(find_ranges(&re, content));
            if !spans.is_empty() {
                stage = MatchStage::Passage;
                break;
            }
        }

        let before = spans.len();
        for term in terms(query, self.options.min_query_term_len, true) {
            let re = self.build(&regex::escape(&term))?;
            spans.extend(find_ranges(&re, content));
        }
        if stage == MatchStage::Unmatched && spans.len() > before {
            stage = MatchStage::QueryTerms;
        }

        if spans.is_empty() && has_snippet {
            for word in terms(snippet, self.options.min_snippet_word_len, false) {
                let re = self.build(&regex::escape(&word))?;
                spans.extend(find_ranges(&re, content));
            }
            if !spans.is_empty() {
                stage = MatchStage::SnippetWords;
            }
        }

        Ok((coalesce(spans), stage))
    }

    /// Compiles a case-insensitive matcher.
    fn build(&self, pattern: &str) -> Result<Regex, regex::Error> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .size_limit(self.options.regex_size_limit)
            .build()
    }
}

/// Builds the literal passage patterns for a snippet, most exact first.
///
/// Any whitespace run matches any other, since the service collapses newlines to spaces. The
/// snippet is tried as given, then without a trailing ellipsis when it has one.
fn passage_patterns(snippet: &str) -> Vec<String> {
    let trimmed = snippet.trim();
    let mut patterns: Vec<String> = whitespace_flexible(trimmed).into_iter().collect();

    let stripped = trimmed
        .strip_suffix("...")
        .or_else(|| trimmed.strip_suffix('…'))
        .map(str::trim_end);
    if let Some(stripped) = stripped
        && let Some(pattern) = whitespace_flexible(stripped)
    {
        patterns.push(pattern);
    }
    patterns
}

/// Escapes each whitespace-separated piece of `text`, joining them with `\s+`.
fn whitespace_flexible(text: &str) -> Option<String> {
    let pieces: Vec<String> = text.split_whitespace().map(regex::escape).collect();
    if pieces.is_empty() {
        return None;
    }
    Some(pieces.join(r"\s+"))
}

/// Splits `text` on whitespace, keeping distinct tokens of at least `min_len` characters.
fn terms(text: &str, min_len: usize, lowercase: bool) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        if token.chars().count() < min_len {
            continue;
        }
        let token = if lowercase {
            token.to_lowercase()
        } else {
            token.to_string()
        };
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out
}

/// Collects the non-empty match ranges of `re` in `content`.
fn find_ranges<'a>(re: &'a Regex, content: &'a str) -> impl Iterator<Item = Range<usize>> + 'a {
    re.find_iter(content)
        .map(|m| m.range())
        .filter(|r| !r.is_empty())
}

/// Sorts ranges and merges any that overlap or touch.
fn coalesce(mut spans: Vec<Range<usize>>) -> Vec<Range<usize>> {
    spans.sort_by_key(|r| (r.start, r.end));
    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Escapes `content`, wrapping each span in highlight markers.
///
/// Spans must be sorted, disjoint, and on character boundaries.
pub fn mark_spans(content: &str, spans: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(
        content.len() + spans.len() * (MARK_OPEN.len() + MARK_CLOSE.len()) + content.len() / 8,
    );
    let mut last = 0;
    for span in spans {
        push_escaped(&mut out, &content[last..span.start]);
        out.push_str(MARK_OPEN);
        push_escaped(&mut out, &content[span.clone()]);
        out.push_str(MARK_CLOSE);
        last = span.end;
    }
    push_escaped(&mut out, &content[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Highlights with default options.
    fn hl(content: &str, snippet: &str, query: &str) -> AnnotatedContent {
        HighlightEngine::default().highlight(content, snippet, query)
    }

    #[test]
    fn passage_and_terms() {
        let out = hl(
            "The quarterly report shows strong growth in Q1.",
            "strong growth",
            "growth trends",
        );
        assert_eq!(
            out.html(),
            "The quarterly report shows <mark>strong growth</mark> in Q1."
        );
        assert_eq!(out.stage(), MatchStage::Passage);
        assert!(!out.html().contains("trends"));
    }

    #[test]
    fn query_term_found_elsewhere() {
        let out = hl(
            "Growth was slow. Later, strong growth returned.",
            "strong growth",
            "growth",
        );
        assert_eq!(
            out.html(),
            "<mark>Growth</mark> was slow. Later, <mark>strong growth</mark> returned."
        );
    }

    #[test]
    fn snippet_matched_case_insensitively() {
        let out = hl("Alpha BETA gamma", "beta gamma", "");
        assert_eq!(out.html(), "Alpha <mark>BETA gamma</mark>");
    }

    #[test]
    fn every_occurrence_is_wrapped() {
        let out = hl("cat dog cat", "cat", "");
        assert_eq!(out.html(), "<mark>cat</mark> dog <mark>cat</mark>");
        assert_eq!(out.spans(), &[0..3, 8..11]);
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let out = hl("a.*b(c) appears here", "a.*b(c)", "");
        assert_eq!(out.html(), "<mark>a.*b(c)</mark> appears here");

        let out = hl("axxb(c) is not a match", "a.*b(c)", "");
        assert!(!out.html().contains(MARK_OPEN));
    }

    #[test]
    fn metacharacter_query_terms() {
        let out = hl("price is $5 [approx] (maybe)", "", "$5 [approx] (maybe) ^|\\");
        assert_eq!(
            out.html(),
            "price is $5 <mark>[approx]</mark> <mark>(maybe)</mark>"
        );
    }

    #[test]
    fn overlapping_passes_highlight_once() {
        let out = hl("a.*b(c) appears here", "a.*b(c)", "a.*b(c)");
        assert_eq!(out.html(), "<mark>a.*b(c)</mark> appears here");
        assert_eq!(out.html().matches(MARK_OPEN).count(), 1);
    }

    #[test]
    fn partial_overlap_is_merged() {
        let out = hl("strong growth ahead", "strong grow", "growth");
        assert_eq!(out.html(), "<mark>strong growth</mark> ahead");
    }

    #[test]
    fn empty_snippet_uses_only_query_terms() {
        let out = hl("report on growth and decline", "   ", "growth of");
        assert_eq!(out.html(), "report on <mark>growth</mark> and decline");
        assert_eq!(out.stage(), MatchStage::QueryTerms);

        let out = hl("report on growth and decline", "", "zzz");
        assert_eq!(out.html(), "report on growth and decline");
        assert_eq!(out.stage(), MatchStage::Unmatched);
    }

    #[test]
    fn short_query_terms_ignored() {
        let out = hl("an ox in the barn", "", "an ox in barn");
        assert_eq!(out.html(), "an ox in the <mark>barn</mark>");
    }

    #[test]
    fn fallback_to_snippet_words() {
        let out = hl(
            "Revenue increased sharply during the third quarter.",
            "revenue rose in the quarter",
            "xyz",
        );
        assert_eq!(out.stage(), MatchStage::SnippetWords);
        assert_eq!(
            out.html(),
            "<mark>Revenue</mark> increased sharply during the third <mark>quarter</mark>."
        );
    }

    #[test]
    fn fallback_skipped_when_query_matched() {
        let out = hl("Revenue increased in the quarter.", "revenue rose", "increased");
        assert_eq!(out.stage(), MatchStage::QueryTerms);
        assert_eq!(
            out.html(),
            "Revenue <mark>increased</mark> in the quarter."
        );
    }

    #[test]
    fn truncated_snippet_with_collapsed_newlines() {
        let content = "First line of notes\nsecond line continues here";
        let out = hl(content, "of notes second line...", "");
        assert_eq!(out.stage(), MatchStage::Passage);
        assert_eq!(
            out.html(),
            "First line <mark>of notes\nsecond line</mark> continues here"
        );
    }

    #[test]
    fn content_is_escaped_around_marks() {
        let out = hl(
            r#"<script>alert("x")</script> & 'quoted'"#,
            "alert",
            "",
        );
        assert_eq!(
            out.html(),
            "&lt;script&gt;<mark>alert</mark>(&quot;x&quot;)&lt;/script&gt; &amp; &apos;quoted&apos;"
        );
    }

    #[test]
    fn snippet_with_markup_matches_raw_text() {
        let out = hl("use <b>bold</b> tags", "<b>bold</b>", "");
        assert_eq!(out.html(), "use <mark>&lt;b&gt;bold&lt;/b&gt;</mark> tags");
    }

    #[test]
    fn terms_never_match_inside_entities_or_markers() {
        let out = hl("Tom & Jerry mark the spot", "", "amp mark quot");
        assert_eq!(out.html(), "Tom &amp; Jerry <mark>mark</mark> the spot");
    }

    #[test]
    fn failure_falls_back_to_escaped_text() {
        let engine = HighlightEngine::new(HighlightOptions {
            regex_size_limit: 1,
            ..HighlightOptions::default()
        });
        let out = engine.highlight("<b>growth</b>", "growth", "growth");
        assert_eq!(out.stage(), MatchStage::Failed);
        assert_eq!(out.html(), "&lt;b&gt;growth&lt;/b&gt;");
        assert!(!out.is_highlighted());
    }

    #[test]
    fn custom_term_lengths() {
        let engine = HighlightEngine::new(HighlightOptions {
            min_query_term_len: 2,
            ..HighlightOptions::default()
        });
        let out = engine.highlight("Q1 results", "", "q1");
        assert_eq!(out.html(), "<mark>Q1</mark> results");
    }

    #[test]
    fn multibyte_spans_align() {
        let out = hl("Ünïcode café naïve", "café", "naïve");
        assert_eq!(out.html(), "Ünïcode <mark>café</mark> <mark>naïve</mark>");
    }

    #[test]
    fn coalesce_merges_adjacent() {
        assert_eq!(coalesce(vec![4..6, 0..2, 2..3, 5..9]), vec![0..3, 4..9]);
    }

    #[test]
    fn passage_pattern_variants() {
        assert!(passage_patterns("  ").is_empty());
        assert_eq!(passage_patterns("..."), [r"\.\.\."]);
        assert_eq!(passage_patterns("a  b…"), [r"a\s+b…", r"a\s+b"]);
        assert_eq!(passage_patterns("x.y"), [r"x\.y"]);
    }

    #[test]
    fn verbatim_ellipsis_is_kept_in_passage() {
        let out = hl("He said wait... then left", "wait...", "");
        assert_eq!(out.stage(), MatchStage::Passage);
        assert_eq!(out.html(), "He said <mark>wait...</mark> then left");
    }

    #[test]
    fn ellipsis_only_snippet_is_matched() {
        let out = hl("To be continued...", "...", "");
        assert_eq!(out.stage(), MatchStage::Passage);
        assert_eq!(out.html(), "To be continued<mark>...</mark>");
    }
}
