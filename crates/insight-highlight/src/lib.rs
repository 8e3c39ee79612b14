//! Escaping, match highlighting and terminal colors for insight.
//!
//! Document text returned by the search service is untrusted. Everything here that produces
//! HTML escapes it first; highlighting only ever adds `<mark>` markers around text that
//! occurs in the original document.

#![warn(missing_docs)]

mod engine;
mod escape;
mod render;
mod syntax;

pub use engine::{
    AnnotatedContent, HighlightEngine, HighlightOptions, MARK_CLOSE, MARK_OPEN, MatchStage,
    mark_spans,
};
pub use escape::{escape_html, push_escaped};
pub use render::{HtmlPage, format_body, matching_lines, terminal_safe};
pub use syntax::TomlHighlighter;

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (for success).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (for warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Highlighted match: bold black on yellow.
    pub const MATCH: &str = "\x1b[1;30;43m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a success message (green).
pub fn success(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Formats text in a 24-bit color given as `0xRRGGBB`.
pub fn rgb(text: &str, color: u32) -> String {
    let r = (color >> 16) & 0xff;
    let g = (color >> 8) & 0xff;
    let b = color & 0xff;
    format!("\x1b[38;2;{r};{g};{b}m{text}{}", colors::RESET)
}

/// Returns a dimmed horizontal rule for visual separation.
pub fn rule(width: usize) -> String {
    dim(&"─".repeat(width))
}

/// Indents every line of `content` by two spaces.
pub fn indent_content(content: &str) -> String {
    content
        .lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
