//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use disco_config::{Config, discover_config_files};
use disco_text::SnippetBuilder;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (default if no config files were found).
    pub config: Config,
    /// Files the configuration was loaded from, highest precedence first.
    pub config_files: Vec<PathBuf>,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    ///
    /// An explicit `--config` path replaces discovery; relative paths resolve against the
    /// working directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config_files = match explicit {
            Some(path) => vec![cwd.join(path)],
            None => discover_config_files(&cwd),
        };
        let config = Config::load_from_files(&config_files).map_err(|e| {
            eprintln!("error: failed to load configuration: {e}");
            ExitCode::FAILURE
        })?;
        Ok(Self {
            cwd,
            config,
            config_files,
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
            config_files: Vec::new(),
        })
    }

    /// A snippet builder configured from `[snippet]`, with an optional padding override.
    pub fn snippet_builder(&self, padding: Option<usize>) -> SnippetBuilder {
        let settings = &self.config.snippet;
        SnippetBuilder::default()
            .with_dividers(&settings.dividers)
            .with_padding(padding.unwrap_or(settings.padding))
            .with_max_fragments(settings.max_fragments)
            .with_tags(settings.pre_tag.as_str(), settings.post_tag.as_str())
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}
