//! Rendering and JSON serialization for CLI output.

use std::{fs, path::Path, process::ExitCode};

use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
pub use insight_highlight::{dim, header, rule, subheader, success, warning};
use insight_highlight::{AnnotatedContent, HtmlPage, format_body, matching_lines, terminal_safe};
use insight_client::{ClassifiedMatch, DocumentView, SearchOutcome, confidence_color};
use serde::Serialize;

/// Maximum characters of a snippet shown in the results table.
const SNIPPET_PREVIEW_CHARS: usize = 60;

/// JSON output for `insight search`.
#[derive(Serialize)]
struct JsonSearchOutput<'a> {
    /// The submitted query.
    query: &'a str,
    /// Results returned by the service.
    total_matches: usize,
    /// Results shown, in service order.
    results: &'a [ClassifiedMatch],
}

/// Results shown after applying `limit` (0 shows all).
pub fn visible(outcome: &SearchOutcome, limit: usize) -> &[ClassifiedMatch] {
    let matches = outcome.matches();
    if limit == 0 {
        matches
    } else {
        &matches[..limit.min(matches.len())]
    }
}

/// Prints results as pretty JSON.
pub fn print_json(outcome: &SearchOutcome, limit: usize) -> ExitCode {
    let output = JsonSearchOutput {
        query: outcome.query(),
        total_matches: outcome.matches().len(),
        results: visible(outcome, limit),
    };
    match serde_json::to_string_pretty(&output) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints the ranked results as a table.
pub fn print_results(outcome: &SearchOutcome, limit: usize) {
    if outcome.is_empty() {
        println!("{}", dim("No matching documents found."));
        return;
    }

    let shown = visible(outcome, limit);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["#", "File", "Score", "Relevance", "Confidence", "Snippet"]);
    for m in shown {
        table.add_row(vec![
            Cell::new(m.rank).set_alignment(CellAlignment::Right),
            Cell::new(terminal_safe(&m.scored.filename)),
            Cell::new(format!("{:.1}%", m.score_percent())).set_alignment(CellAlignment::Right),
            Cell::new(m.tier.label()),
            Cell::new(m.confidence().label()),
            Cell::new(preview(&m.scored.content_snippet, SNIPPET_PREVIEW_CHARS)),
        ]);
    }

    println!(
        "{}",
        subheader(&format!("Results for \"{}\":", terminal_safe(outcome.query())))
    );
    println!("{table}");
    if shown.len() < outcome.matches().len() {
        println!(
            "{}",
            dim(&format!(
                "Showing {} of {} results; use -n 0 to show all.",
                shown.len(),
                outcome.matches().len()
            ))
        );
    }
}

/// Prints a fetched document with its match metadata.
pub fn print_document(view: &DocumentView, matches_only: bool) {
    println!("{}", header(&terminal_safe(&view.filename)));
    println!(
        "   Score:      {:.1}% {}",
        view.similarity_score * 100.0,
        view.tier.swatch().paint(view.tier.label())
    );
    println!(
        "   Confidence: {}",
        confidence_color(view.confidence).paint(view.confidence.label())
    );
    if let Some(match_type) = &view.match_type {
        println!("   Match:      {}", terminal_safe(match_type));
    }
    if view.fetched_as != view.filename {
        println!(
            "   {}",
            dim(&format!("(fetched as {})", terminal_safe(&view.fetched_as)))
        );
    }
    print_body(&view.content, &view.annotated, matches_only);
}

/// Prints an annotated body framed by rules.
pub fn print_body(content: &str, annotated: &AnnotatedContent, matches_only: bool) {
    println!("{}", rule(60));
    if !annotated.is_highlighted() {
        println!("{}", dim(annotated.stage().description()));
    }
    let body = if matches_only {
        matching_lines(content, annotated.spans())
    } else {
        format_body(content, annotated.spans())
    };
    print!("{body}");
    if !body.ends_with('\n') {
        println!();
    }
    println!("{}", rule(60));
}

/// Page for a fetched document.
pub fn document_page(view: &DocumentView) -> String {
    HtmlPage::new(&view.filename)
        .meta("Score", format!("{:.1}%", view.similarity_score * 100.0))
        .meta_colored("Relevance", view.tier.label(), view.tier.swatch().hex())
        .meta_colored(
            "Confidence",
            view.confidence.label(),
            confidence_color(view.confidence).hex(),
        )
        .meta("Match type", view.match_type.as_deref().unwrap_or("-"))
        .render(&view.annotated)
}

/// Writes an HTML page, reporting the outcome.
pub fn write_html(path: &Path, page: &str) -> Result<(), ExitCode> {
    fs::write(path, page).map_err(|e| {
        eprintln!("error: failed to write {}: {e}", path.display());
        ExitCode::FAILURE
    })?;
    println!("{}", success(&format!("Wrote {}", path.display())));
    Ok(())
}

/// Shortens `text` to `max` characters on one line, appending `…` when cut.
fn preview(text: &str, max: usize) -> String {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let flat = terminal_safe(&joined).into_owned();
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
