//! Error types for disco configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A setting holds a value the compiler cannot work with.
    #[error("invalid setting {key}: {message}")]
    InvalidSetting {
        /// Dotted key of the offending setting, e.g. `fields.title.boost`.
        key: String,
        /// What is wrong with the value.
        message: String,
    },

    /// Failed to render the effective configuration as TOML.
    #[error("failed to serialize configuration: {0}")]
    SerializeToml(#[source] ser::Error),

    /// Failed to determine home directory.
    #[error("could not determine home directory")]
    NoHomeDirectory,
}
