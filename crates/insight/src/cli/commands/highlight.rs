//! Implementation of `insight highlight`.

use std::{fs, process::ExitCode};

use insight_highlight::{HighlightEngine, HtmlPage};

use crate::cli::{
    args::HighlightCommand,
    context::CommandContext,
    output::{header, print_body, write_html},
};

/// Annotates a local file for a query and optional snippet.
pub fn run(ctx: &CommandContext, cmd: &HighlightCommand) -> ExitCode {
    let content = match fs::read_to_string(&cmd.file) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("error: failed to read {}: {e}", cmd.file.display());
            return ExitCode::FAILURE;
        }
    };

    let engine = HighlightEngine::new(ctx.highlight_options());
    let annotated = engine.highlight(&content, &cmd.snippet, &cmd.query);
    let title = cmd.file.display().to_string();

    println!("{}", header(&title));
    print_body(&content, &annotated, cmd.view.matches);

    if let Some(path) = &cmd.view.html {
        let page = HtmlPage::new(title)
            .meta("Query", cmd.query.as_str())
            .meta("Snippet", cmd.snippet.as_str())
            .meta("Matched by", annotated.stage().description())
            .render(&annotated);
        if let Err(code) = write_html(path, &page) {
            return code;
        }
    }

    ExitCode::SUCCESS
}
