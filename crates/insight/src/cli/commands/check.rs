//! Implementation of `insight check`.

use std::process::ExitCode;

use insight_config::{ConfigWarning, discover_config_files};

use crate::cli::{
    context::CommandContext,
    output::{dim, subheader, warning},
};

/// Lists config files and reports validation warnings.
///
/// Exits with failure when there are warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config_files = discover_config_files(&ctx.cwd);
    if config_files.is_empty() {
        println!("{}", dim("No configuration files found; using defaults."));
        println!();
        println!(
            "Run {} to create a configuration file.",
            subheader("insight init")
        );
    } else {
        println!("{}", subheader("Config files (highest precedence first):"));
        for path in &config_files {
            println!("   {}", path.display());
        }
    }
    println!();

    let warnings = ctx.config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings
        .iter()
        .map(|w| match w {
            ConfigWarning::InvalidServiceUrl { .. } => {
                "Hint: [service] url must look like http://host:port"
            }
            ConfigWarning::ThresholdOutOfRange { .. } | ConfigWarning::ThresholdsOutOfOrder => {
                "Hint: [relevance] bounds are scores in 0.0-1.0, highest tier first"
            }
            ConfigWarning::ZeroTermLength { .. } => {
                "Hint: [highlight] lengths of 0 highlight single characters"
            }
            ConfigWarning::UnsupportedExtension { .. } => {
                "Hint: the service extracts text from txt, pdf, md and docx files"
            }
            ConfigWarning::InvalidExcludePattern { .. } => {
                "Hint: [documents] exclude entries are glob patterns such as **/drafts/**"
            }
        })
        .collect();

    hints.sort_unstable();
    hints.dedup();
    for hint in hints {
        println!("{}", dim(hint));
    }
}
