//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules.

use std::path::PathBuf;

use crate::{
    Config, ConfigError, FieldOptions, FilterSettings, Schema, SnippetSettings,
    parse::{RawConfig, RawFilterSettings, RawSnippetSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins (highest precedence)
/// - Fields and groups: merged by name, first definition wins completely
/// - Facet allow-list: first defined list wins; tag overrides merge by facet
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let schema = merge_schema(configs);
    let filter = merge_filter_settings(configs);
    let snippet = merge_snippet_settings(configs);
    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(|dir| dir.to_path_buf());

    let config = Config {
        schema,
        filter,
        snippet,
        config_root,
    };
    check_settings(&config)?;
    Ok(config)
}

/// Merges field, group and facet definitions.
fn merge_schema(configs: &[ParsedConfig]) -> Schema {
    let mut schema = Schema::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        let raw = &parsed.config;
        if let Some(fields) = &raw.fields {
            for (name, field) in fields {
                schema.fields.insert(
                    name.clone(),
                    FieldOptions {
                        boost: field.boost,
                        exact: field.exact.clone(),
                        stemmed: field.stemmed.clone(),
                    },
                );
            }
        }
        if let Some(groups) = &raw.groups {
            for (name, members) in groups {
                schema.groups.insert(name.clone(), members.clone());
            }
        }
        if let Some(facets) = &raw.facets {
            if let Some(fields) = &facets.fields {
                schema.facets = fields.clone();
            }
            if let Some(tags) = &facets.tags {
                for (facet, tag) in tags {
                    schema.facet_tags.insert(facet.clone(), tag.clone());
                }
            }
        }
    }

    schema
}

/// Merges filter settings.
fn merge_filter_settings(configs: &[ParsedConfig]) -> FilterSettings {
    let mut result = FilterSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref filter) = parsed.config.filter {
            apply_raw_filter(&mut result, filter);
        }
    }

    result
}

/// Applies raw filter settings to result, overwriting any present values.
fn apply_raw_filter(result: &mut FilterSettings, raw: &RawFilterSettings) {
    if let Some(ref v) = raw.type_field {
        result.type_field = v.clone();
    }
    if let Some(ref v) = raw.default_types {
        result.default_types = v.clone();
    }
    if let Some(ref v) = raw.missing_marker {
        result.missing_marker = v.clone();
    }
    if let Some(ref v) = raw.date_key {
        result.date_key = v.clone();
    }
    if let Some(ref v) = raw.date_from_field {
        result.date_from_field = v.clone();
    }
    if let Some(ref v) = raw.date_to_field {
        result.date_to_field = v.clone();
    }
    if let Some(v) = raw.strict_root {
        result.strict_root = v;
    }
}

/// Merges snippet settings.
fn merge_snippet_settings(configs: &[ParsedConfig]) -> SnippetSettings {
    let mut result = SnippetSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref snippet) = parsed.config.snippet {
            apply_raw_snippet(&mut result, snippet);
        }
    }

    result
}

/// Applies raw snippet settings to result.
fn apply_raw_snippet(result: &mut SnippetSettings, raw: &RawSnippetSettings) {
    if let Some(v) = raw.padding {
        result.padding = v;
    }
    if let Some(ref v) = raw.dividers {
        result.dividers = v.clone();
    }
    if let Some(v) = raw.max_fragments {
        result.max_fragments = v;
    }
    if let Some(ref v) = raw.pre_tag {
        result.pre_tag = v.clone();
    }
    if let Some(ref v) = raw.post_tag {
        result.post_tag = v.clone();
    }
}

/// Rejects values the compiler cannot work with.
///
/// Questionable but usable values are reported by validation as warnings instead.
fn check_settings(config: &Config) -> Result<(), ConfigError> {
    for (name, field) in &config.schema.fields {
        if let Some(boost) = field.boost
            && !boost.is_finite()
        {
            return Err(ConfigError::InvalidSetting {
                key: format!("fields.{name}.boost"),
                message: format!("boost must be a finite number, got {boost}"),
            });
        }
    }

    let required = [
        ("filter.type_field", &config.filter.type_field),
        ("filter.missing_marker", &config.filter.missing_marker),
        ("filter.date_key", &config.filter.date_key),
        ("filter.date_from_field", &config.filter.date_from_field),
        ("filter.date_to_field", &config.filter.date_to_field),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                key: key.to_string(),
                message: String::from("must not be empty"),
            });
        }
    }

    if config.snippet.max_fragments == 0 {
        return Err(ConfigError::InvalidSetting {
            key: String::from("snippet.max_fragments"),
            message: String::from("must be at least 1"),
        });
    }

    Ok(())
}
