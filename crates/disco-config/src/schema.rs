//! Field metadata consumed by the query compiler and the filter builder.
//!
//! [`FieldProvider`] is the read-only lookup capability; [`Schema`] is the
//! implementation backed by `.disco.toml`. Any other backing (a remote schema
//! snapshot, a test double) can stand in by implementing the trait.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Formats a boost factor the way the engine expects it: always with a fractional part.
///
/// `7.0` renders as `7.0`, `2.5` as `2.5`.
pub fn format_boost(boost: f32) -> String {
    if boost.fract() == 0.0 {
        format!("{boost:.1}")
    } else {
        format!("{boost}")
    }
}

/// A field name together with its static boost.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Engine field name.
    pub name: String,
    /// Static relevance multiplier, if any.
    pub boost: Option<f32>,
}

impl FieldDescriptor {
    /// Returns the `^<boost>` suffix, or an empty string for unboosted fields.
    pub fn boost_suffix(&self) -> String {
        self.boost
            .map(|b| format!("^{}", format_boost(b)))
            .unwrap_or_default()
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.boost_suffix())
    }
}

/// Read-only field metadata lookup.
///
/// Implementations must be immutable for the duration of a request; the compiler
/// and filter builder call these methods from any thread without locking.
pub trait FieldProvider {
    /// Whether `name` is a searchable field.
    fn is_valid_field(&self, name: &str) -> bool;

    /// Whether `name` is a field group.
    fn group_exists(&self, name: &str) -> bool;

    /// Member fields of a group, in declaration order. Empty for unknown groups.
    fn fields_in_group(&self, name: &str) -> Vec<String>;

    /// Static boost of a field.
    fn boost(&self, name: &str) -> Option<f32>;

    /// Unanalyzed variant used for exact phrases.
    fn exact_variant(&self, name: &str) -> Option<String>;

    /// Stemmed variant used for free-text words.
    fn stemmed_variant(&self, name: &str) -> Option<String>;

    /// Whether the filter builder accepts `name` as a facet key.
    fn is_facet_field(&self, name: &str) -> bool {
        self.is_valid_field(name)
    }

    /// Tag attached to filter clauses on `name`.
    fn facet_tag(&self, name: &str) -> String {
        name.to_string()
    }

    /// Field name with its boost.
    fn descriptor(&self, name: &str) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            boost: self.boost(name),
        }
    }

    /// Field name, suffixed `^<boost>` when the field is boosted.
    fn boosted_name(&self, name: &str) -> String {
        self.descriptor(name).to_string()
    }
}

/// Per-field options as configured.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FieldOptions {
    /// Static relevance boost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    /// Unanalyzed variant used for exact phrases.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<String>,
    /// Stemmed variant used for free-text words.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stemmed: Option<String>,
}

/// Field schema: searchable fields, field groups and the facet allow-list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    /// Searchable fields by name.
    pub fields: BTreeMap<String, FieldOptions>,
    /// Field groups: group name -> member field names in order.
    pub groups: BTreeMap<String, Vec<String>>,
    /// Facet fields accepted by the filter builder.
    pub facets: Vec<String>,
    /// Per-facet tag overrides.
    pub facet_tags: BTreeMap<String, String>,
}

impl Schema {
    /// Adds or replaces a field definition.
    pub fn with_field(mut self, name: impl Into<String>, options: FieldOptions) -> Self {
        self.fields.insert(name.into(), options);
        self
    }

    /// Adds or replaces a field group.
    pub fn with_group<I, S>(mut self, name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups
            .insert(name.into(), members.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a facet field to the allow-list.
    pub fn with_facet(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.facets.contains(&name) {
            self.facets.push(name);
        }
        self
    }
}

impl FieldProvider for Schema {
    fn is_valid_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn group_exists(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    fn fields_in_group(&self, name: &str) -> Vec<String> {
        self.groups.get(name).cloned().unwrap_or_default()
    }

    fn boost(&self, name: &str) -> Option<f32> {
        self.fields.get(name).and_then(|f| f.boost)
    }

    fn exact_variant(&self, name: &str) -> Option<String> {
        self.fields.get(name).and_then(|f| f.exact.clone())
    }

    fn stemmed_variant(&self, name: &str) -> Option<String> {
        self.fields.get(name).and_then(|f| f.stemmed.clone())
    }

    fn is_facet_field(&self, name: &str) -> bool {
        self.facets.iter().any(|facet| facet == name)
    }

    fn facet_tag(&self, name: &str) -> String {
        self.facet_tags
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}
