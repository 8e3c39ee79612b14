//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use insight_client::{
    CallOptions, DocumentFilter, HttpService, Presenter, RelevanceThresholds,
};
use insight_config::{Config, ServiceSettings, compile_excludes};
use insight_highlight::HighlightOptions;
use tokio::signal;
use tracing::debug;

use super::args::ServiceArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for commands like `init` that should work even when an existing config file is
    /// invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Service settings with command-line overrides applied.
    pub fn service_settings(&self, args: &ServiceArgs) -> ServiceSettings {
        let mut settings = self.config.service.clone();
        if let Some(url) = &args.url {
            settings.url.clone_from(url);
        }
        if let Some(secs) = args.timeout {
            settings.timeout_secs = secs;
        }
        settings
    }

    /// Relevance boundaries from configuration.
    pub fn thresholds(&self) -> RelevanceThresholds {
        let r = &self.config.relevance;
        RelevanceThresholds {
            very_high: r.very_high,
            high: r.high,
            medium: r.medium,
            low: r.low,
        }
    }

    /// Highlight token limits from configuration.
    pub fn highlight_options(&self) -> HighlightOptions {
        HighlightOptions {
            min_query_term_len: self.config.highlight.min_query_term_len,
            min_snippet_word_len: self.config.highlight.min_snippet_word_len,
            ..HighlightOptions::default()
        }
    }

    /// Builds a presenter talking to the configured service.
    pub fn presenter(&self, settings: &ServiceSettings) -> Result<Presenter<HttpService>, ExitCode> {
        let service = HttpService::new(&settings.url).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })?;
        debug!(url = %service.base_url(), "using search service");
        Ok(Presenter::new(service)
            .with_thresholds(self.thresholds())
            .with_highlight_options(self.highlight_options()))
    }

    /// Builds the upload filter from `[documents]`.
    pub fn document_filter(&self) -> Result<DocumentFilter, ExitCode> {
        let exclude = compile_excludes(&self.config.documents.exclude).map_err(|e| {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        })?;
        Ok(DocumentFilter::new(
            self.config.documents.extensions.clone(),
            exclude,
        ))
    }
}

/// Call options with the given timeout, cancelled when the user presses Ctrl-C.
///
/// Must be called from within the runtime.
pub fn interruptible(timeout: Option<Duration>) -> CallOptions {
    let options = CallOptions::with_timeout(timeout);
    let token = options.cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
    options
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}
