//! Clap argument definitions for the `insight` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "insight")]
#[command(about = "Semantic document search from the command line")]
#[command(version)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags that override the `[service]` configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ServiceArgs {
    /// Search service base URL [default: http://localhost:8000]
    #[arg(long)]
    pub url: Option<String>,

    /// Per-request timeout in seconds, 0 to disable [default: 60]
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Flags controlling how a document is displayed.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Output only lines containing highlights
    #[arg(long)]
    pub matches: bool,

    /// Also write the highlighted document as a standalone HTML page
    #[arg(long, value_name = "FILE")]
    pub html: Option<PathBuf>,
}

/// Arguments for `insight search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Natural-language query
    pub query: String,

    /// Documents or directories to search
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Maximum results to show, 0 for all [default: 10]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Open result N after searching (can be specified multiple times)
    #[arg(long = "show", value_name = "N")]
    pub show: Vec<usize>,

    /// Output in JSON format
    #[arg(long, conflicts_with_all = ["show", "html"])]
    pub json: bool,

    #[command(flatten)]
    /// Service overrides.
    pub service: ServiceArgs,

    #[command(flatten)]
    /// Document display flags.
    pub view: ViewArgs,
}

/// Arguments for `insight highlight`.
#[derive(Args, Debug, Clone)]
pub struct HighlightCommand {
    /// Local file to annotate
    pub file: PathBuf,

    /// Query whose terms are highlighted
    #[arg(short = 'q', long)]
    pub query: String,

    /// Passage to highlight verbatim
    #[arg(short = 's', long, default_value = "")]
    pub snippet: String,

    #[command(flatten)]
    /// Document display flags.
    pub view: ViewArgs,
}

/// Arguments for `insight status`.
#[derive(Args, Debug, Clone)]
pub struct StatusCommand {
    #[command(flatten)]
    /// Service overrides.
    pub service: ServiceArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `insight init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.insight.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `insight` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search documents with the remote service and show ranked results
    #[command(after_help = "\
EXAMPLES:
  insight search 'quarterly growth' reports/
  insight search 'release plan' notes/plan.txt --show 1
  insight search 'budget' docs/ --show 1 --html budget.html
  insight search 'budget' docs/ --json")]
    Search(SearchCommand),

    /// Highlight a query in a local file without the service
    Highlight(HighlightCommand),

    /// Probe the search service
    Status(StatusCommand),

    /// Initialize insight configuration in current directory
    Init(InitCommand),

    /// Show effective configuration settings
    Config,

    /// Validate configuration and diagnose issues
    Check,
}
