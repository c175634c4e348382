//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.
//! None of these stop the compiler from running, but most of them make some
//! expressions or filters silently match nothing.

use std::{collections::BTreeSet, fmt};

use crate::{Config, Schema};

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No searchable fields are defined.
    NoFieldsDefined,
    /// A group lists a member that is neither a field nor a group.
    UndefinedGroupMember {
        /// Name of the group.
        group: String,
        /// The unknown member.
        member: String,
    },
    /// A group has no members and always compiles to nothing.
    EmptyGroup {
        /// Name of the group.
        group: String,
    },
    /// A group has the same name as a field; the group wins.
    GroupShadowsField {
        /// The shared name.
        name: String,
    },
    /// A group contains itself, directly or through other groups.
    GroupCycle {
        /// Name of a group on the cycle.
        group: String,
    },
    /// A boost is zero or negative.
    NonPositiveBoost {
        /// Name of the field.
        field: String,
        /// Rendered boost value.
        boost: String,
    },
    /// A field the filter builder relies on is not an allowed facet.
    FilterFieldNotFacet {
        /// Setting that names the field.
        setting: &'static str,
        /// The field.
        field: String,
    },
    /// No divider characters are configured for snippet boundaries.
    NoDividers,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFieldsDefined => write!(f, "no searchable fields are defined"),
            Self::UndefinedGroupMember { group, member } => {
                write!(f, "group '{group}' references undefined field '{member}'")
            }
            Self::EmptyGroup { group } => write!(f, "group '{group}' has no members"),
            Self::GroupShadowsField { name } => {
                write!(f, "group '{name}' shadows the field of the same name")
            }
            Self::GroupCycle { group } => write!(f, "group '{group}' contains itself"),
            Self::NonPositiveBoost { field, boost } => {
                write!(f, "field '{field}' has non-positive boost {boost}")
            }
            Self::FilterFieldNotFacet { setting, field } => {
                write!(f, "{setting} '{field}' is not listed in [facets] fields")
            }
            Self::NoDividers => write!(f, "snippet dividers are empty"),
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if config.schema.fields.is_empty() {
        warnings.push(ConfigWarning::NoFieldsDefined);
    }

    warnings.extend(validate_fields(&config.schema));
    warnings.extend(validate_groups(&config.schema));

    let facet_settings = [
        ("filter.type_field", &config.filter.type_field),
        ("filter.date_from_field", &config.filter.date_from_field),
        ("filter.date_to_field", &config.filter.date_to_field),
    ];
    for (setting, field) in facet_settings {
        if !config.schema.facets.contains(field) {
            warnings.push(ConfigWarning::FilterFieldNotFacet {
                setting,
                field: field.clone(),
            });
        }
    }

    if config.snippet.dividers.is_empty() {
        warnings.push(ConfigWarning::NoDividers);
    }

    warnings
}

/// Checks per-field options.
fn validate_fields(schema: &Schema) -> Vec<ConfigWarning> {
    schema
        .fields
        .iter()
        .filter_map(|(name, options)| {
            let boost = options.boost?;
            (boost <= 0.0).then(|| ConfigWarning::NonPositiveBoost {
                field: name.clone(),
                boost: boost.to_string(),
            })
        })
        .collect()
}

/// Checks group membership, shadowing and cycles.
fn validate_groups(schema: &Schema) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    for (group, members) in &schema.groups {
        if schema.fields.contains_key(group) {
            warnings.push(ConfigWarning::GroupShadowsField {
                name: group.clone(),
            });
        }
        if members.is_empty() {
            warnings.push(ConfigWarning::EmptyGroup {
                group: group.clone(),
            });
        }
        for member in members {
            if !schema.fields.contains_key(member) && !schema.groups.contains_key(member) {
                warnings.push(ConfigWarning::UndefinedGroupMember {
                    group: group.clone(),
                    member: member.clone(),
                });
            }
        }
        if reaches(schema, group, group, &mut BTreeSet::new()) {
            warnings.push(ConfigWarning::GroupCycle {
                group: group.clone(),
            });
        }
    }

    warnings
}

/// Whether `target` is reachable from the members of group `from`.
fn reaches<'a>(
    schema: &'a Schema,
    from: &'a str,
    target: &str,
    visited: &mut BTreeSet<&'a str>,
) -> bool {
    let Some(members) = schema.groups.get(from) else {
        return false;
    };
    for member in members {
        if member == target {
            return true;
        }
        if visited.insert(member.as_str()) && reaches(schema, member, target, visited) {
            return true;
        }
    }
    false
}
