//! Implementation of `insight status`.

use std::process::ExitCode;

use insight_highlight::terminal_safe;

use crate::cli::{
    args::StatusCommand,
    context::{CommandContext, interruptible},
    output::{dim, subheader, success},
};

/// Probes the search service and prints what it reports.
pub async fn run(ctx: &CommandContext, cmd: &StatusCommand) -> ExitCode {
    let settings = ctx.service_settings(&cmd.service);
    let presenter = match ctx.presenter(&settings) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let options = interruptible(settings.timeout());
    let status = match presenter.probe(&options).await {
        Ok(status) => status,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return match serde_json::to_string_pretty(&status) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize JSON: {e}");
                ExitCode::FAILURE
            }
        };
    }

    println!(
        "{} {}",
        success("Service is up"),
        dim(&format!("({})", presenter.service().base_url()))
    );
    println!();
    println!("{}", subheader("Status:"));
    let describe = |value: Option<String>| value.unwrap_or_else(|| dim("(not reported)"));
    println!(
        "   Files loaded:  {}",
        describe(status.files_loaded.map(|n| n.to_string()))
    );
    println!(
        "   Model loaded:  {}",
        describe(status.model_loaded.map(|b| if b { "yes" } else { "no" }.to_string()))
    );
    println!(
        "   Stored files:  {}",
        describe(status.storage_files.map(|n| n.to_string()))
    );
    for (key, value) in &status.extra {
        println!("   {}: {value}", terminal_safe(key));
    }

    ExitCode::SUCCESS
}
