//! Configuration system for disco.
//!
//! disco uses TOML configuration files named `.disco.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.disco.toml` files found, then loading `~/.disco.toml` as the global config with lowest
//! precedence.
//!
//! The configuration carries the field [`Schema`] (searchable fields, boosts, exact and
//! stemmed variants, field groups and the facet allow-list) plus the settings of the filter
//! builder and the snippet builder.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod schema;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawFacets, RawField, RawFilterSettings, RawSnippetSettings, parse_config_file,
    parse_config_str,
};
pub use schema::{FieldDescriptor, FieldOptions, FieldProvider, Schema, format_boost};
use serde::{Deserialize, Serialize};
pub use templates::config_template;
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for disco.
///
/// This represents the fully resolved configuration after merging all discovered
/// `.disco.toml` files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Field schema consumed by the compiler and the filter builder.
    pub schema: Schema,
    /// Filter-query settings.
    pub filter: FilterSettings,
    /// Snippet settings.
    pub snippet: SnippetSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.disco.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                log::debug!("loading config {}", path.display());
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Loads a single configuration file, skipping discovery.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&[path.to_path_buf()])
    }

    /// The field schema, as a [`FieldProvider`].
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Builds a configuration from a single TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let path = PathBuf::from("<inline>");
        let config = parse_config_str(contents, &path)?;
        let mut merged = merge_configs(&[ParsedConfig { path, config }])?;
        merged.config_root = None;
        Ok(merged)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective configuration to TOML format.
    ///
    /// The output has the same layout as a `.disco.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableConfig {
            fields: &self.schema.fields,
            groups: &self.schema.groups,
            facets: SerializableFacets {
                fields: &self.schema.facets,
                tags: &self.schema.facet_tags,
            },
            filter: &self.filter,
            snippet: &self.snippet,
        };
        toml::to_string_pretty(&serializable).map_err(ConfigError::SerializeToml)
    }
}

/// Filter-query builder settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Facet field holding the document type.
    pub type_field: String,
    /// Types selected when the request does not constrain the type field.
    pub default_types: Vec<String>,
    /// List value meaning "documents without this field".
    pub missing_marker: String,
    /// Reserved key of the composite date filter.
    pub date_key: String,
    /// Field holding the start of the origin date range.
    pub date_from_field: String,
    /// Field holding the end of the origin date range.
    pub date_to_field: String,
    /// Reject malformed filter payloads instead of ignoring them.
    pub strict_root: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            type_field: String::from("type-facet"),
            default_types: vec![
                String::from("object"),
                String::from("description"),
                String::from("description-retro"),
            ],
            missing_marker: String::from("__MISSING__"),
            date_key: String::from("orig-date-facet"),
            date_from_field: String::from("orig-date-from-facet"),
            date_to_field: String::from("orig-date-to-facet"),
            strict_root: false,
        }
    }
}

/// Snippet builder settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SnippetSettings {
    /// Characters of context on each side of a match.
    pub padding: usize,
    /// Punctuation treated as a hard stop when snapping window edges.
    pub dividers: String,
    /// Maximum number of fragments joined into one snippet.
    pub max_fragments: usize,
    /// Markup inserted before each match.
    pub pre_tag: String,
    /// Markup inserted after each match.
    pub post_tag: String,
}

impl Default for SnippetSettings {
    fn default() -> Self {
        Self {
            padding: 60,
            dividers: String::from("()[]{};.:!?"),
            max_fragments: 3,
            pre_tag: String::from("<em>"),
            post_tag: String::from("</em>"),
        }
    }
}

/// Internal struct for TOML serialization of the effective configuration.
#[derive(Serialize)]
struct SerializableConfig<'a> {
    /// Filter-query settings.
    filter: &'a FilterSettings,
    /// Snippet settings.
    snippet: &'a SnippetSettings,
    /// Facet allow-list.
    facets: SerializableFacets<'a>,
    /// Searchable fields.
    fields: &'a BTreeMap<String, FieldOptions>,
    /// Field groups.
    groups: &'a BTreeMap<String, Vec<String>>,
}

/// Facet allow-list in `.disco.toml` layout.
#[derive(Serialize)]
struct SerializableFacets<'a> {
    /// Facet fields.
    fields: &'a Vec<String>,
    /// Tag overrides.
    tags: &'a BTreeMap<String, String>,
}
