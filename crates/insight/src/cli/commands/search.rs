//! Implementation of `insight search`.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use insight_client::collect_documents;
use tracing::info;

use crate::cli::{
    args::SearchCommand,
    context::{CommandContext, interruptible},
    output::{document_page, print_document, print_json, print_results, write_html},
};

/// Uploads documents, prints ranked results, and optionally opens some of them.
pub async fn run(ctx: &CommandContext, cmd: &SearchCommand) -> ExitCode {
    let filter = match ctx.document_filter() {
        Ok(f) => f,
        Err(code) => return code,
    };
    let documents = match collect_documents(&cmd.paths, &filter) {
        Ok(docs) => docs,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(documents = documents.len(), "collected documents");

    let settings = ctx.service_settings(&cmd.service);
    let presenter = match ctx.presenter(&settings) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let options = interruptible(settings.timeout());

    let outcome = match presenter.run_search(&cmd.query, &documents, &options).await {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let limit = cmd.limit.unwrap_or(ctx.config.search.limit);
    if cmd.json {
        return print_json(&outcome, limit);
    }
    print_results(&outcome, limit);

    let mut ranks = cmd.show.clone();
    if ranks.is_empty() && cmd.view.html.is_some() && !outcome.is_empty() {
        ranks.push(1);
    }

    let mut code = ExitCode::SUCCESS;
    for &rank in &ranks {
        let Some(selected) = outcome.get(rank) else {
            eprintln!(
                "error: no result #{rank} (search returned {})",
                outcome.matches().len()
            );
            code = ExitCode::FAILURE;
            continue;
        };

        println!();
        let view = match presenter
            .view_document(&selected.scored, outcome.query(), &options)
            .await
        {
            Ok(view) => view,
            Err(e) => {
                eprintln!("error: {e}");
                code = ExitCode::FAILURE;
                continue;
            }
        };
        print_document(&view, cmd.view.matches);

        if let Some(base) = &cmd.view.html {
            let path = html_path(base, rank, ranks.len() > 1);
            if let Err(failure) = write_html(&path, &document_page(&view)) {
                code = failure;
            }
        }
    }

    code
}

/// Output path for one page; numbered by rank when several pages are written.
fn html_path(base: &Path, rank: usize, numbered: bool) -> PathBuf {
    if !numbered {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "result".to_string());
    let name = match base.extension() {
        Some(ext) => format!("{stem}-{rank}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{rank}"),
    };
    base.with_file_name(name)
}
