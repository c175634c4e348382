//! Configuration file parsing.
//!
//! Parses individual `.disco.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Searchable field definitions: name -> options.
    pub fields: Option<BTreeMap<String, RawField>>,
    /// Field groups: group name -> member field names.
    /// A single member may be given as a bare string.
    #[serde_as(as = "Option<BTreeMap<_, OneOrMany<_>>>")]
    pub groups: Option<BTreeMap<String, Vec<String>>>,
    /// Facet allow-list section.
    pub facets: Option<RawFacets>,
    /// Filter-query settings section.
    pub filter: Option<RawFilterSettings>,
    /// Snippet settings section.
    pub snippet: Option<RawSnippetSettings>,
}

/// Raw field definition from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawField {
    /// Static relevance boost.
    pub boost: Option<f32>,
    /// Name of the unanalyzed variant used for exact phrases.
    pub exact: Option<String>,
    /// Name of the stemmed variant used for free-text words.
    pub stemmed: Option<String>,
}

/// Raw facet allow-list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFacets {
    /// Facet fields accepted by the filter builder.
    pub fields: Option<Vec<String>>,
    /// Per-facet tag overrides (facet field -> tag).
    pub tags: Option<BTreeMap<String, String>>,
}

/// Raw filter-query settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFilterSettings {
    /// Facet field holding the document type.
    pub type_field: Option<String>,
    /// Types selected when the request does not constrain the type field.
    pub default_types: Option<Vec<String>>,
    /// List value meaning "documents without this field".
    pub missing_marker: Option<String>,
    /// Reserved key of the composite date filter.
    pub date_key: Option<String>,
    /// Field holding the start of the origin date range.
    pub date_from_field: Option<String>,
    /// Field holding the end of the origin date range.
    pub date_to_field: Option<String>,
    /// Reject malformed filter payloads instead of ignoring them.
    pub strict_root: Option<bool>,
}

/// Raw snippet settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSnippetSettings {
    /// Characters of context on each side of a match.
    pub padding: Option<usize>,
    /// Punctuation treated as a hard stop when snapping window edges.
    pub dividers: Option<String>,
    /// Maximum number of fragments joined into one snippet.
    pub max_fragments: Option<usize>,
    /// Markup inserted before each match.
    pub pre_tag: Option<String>,
    /// Markup inserted after each match.
    pub post_tag: Option<String>,
}

/// Parses a configuration file from disk.
///
/// Returns a `RawConfig` with all fields as optionals, ready for merging.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// This is used during discovery to stop traversal at root configs.
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
