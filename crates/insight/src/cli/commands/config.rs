//! Implementation of `insight config`.

use std::process::ExitCode;

use insight_highlight::TomlHighlighter;

use crate::cli::context::CommandContext;

/// Shows effective configuration settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let highlighter = TomlHighlighter::new();
    print!("{}", highlighter.highlight(&ctx.config.settings_to_toml()));
    ExitCode::SUCCESS
}
