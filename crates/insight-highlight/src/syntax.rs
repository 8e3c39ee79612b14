//! TOML syntax highlighting for configuration display.

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

use crate::colors;

/// Highlights configuration files for terminal output.
pub struct TomlHighlighter {
    /// Syntax definitions, including TOML from the two-face extras.
    syntax_set: SyntaxSet,
    /// Embedded color themes.
    theme_set: EmbeddedLazyThemeSet,
}

impl Default for TomlHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl TomlHighlighter {
    /// Creates a highlighter using the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
        }
    }

    /// Highlights TOML content. Falls back to plain text if TOML support is missing.
    pub fn highlight(&self, content: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension("toml")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let theme = self.theme_set.get(EmbeddedThemeName::Dracula);
        let mut lines = HighlightLines::new(syntax, theme);

        let mut output = String::with_capacity(content.len() * 2);
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}
