//! Filter-query builder.
//!
//! Turns a JSON filter specification (facet field → value) into tagged filter clauses.
//! Values take one of three shapes:
//!
//! - a string: `{"format-facet": "quarto"}`
//! - a list of strings, optionally containing the missing marker:
//!   `{"format-facet": ["quarto", "__MISSING__"]}`
//! - a range object: `{"year-facet": {"from": 1500, "to": 1600, "missing": true}}`
//!
//! The reserved date key takes a range object that constrains two underlying fields.
//! Entries that don't fit are skipped; the rest of the specification still applies.

use disco_config::{FieldProvider, FilterSettings};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{FilterError, compile::quote};

/// Filter clauses mapped to their optional tags, in build order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterQueries {
    /// Clause → tag.
    clauses: IndexMap<String, Option<String>>,
}

impl FilterQueries {
    /// Adds a clause. A repeated clause keeps its position and takes the new tag.
    pub fn insert(&mut self, clause: String, tag: Option<String>) {
        self.clauses.insert(clause, tag);
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether there are no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The tag of a clause: `None` if the clause is absent, `Some(None)` if untagged.
    pub fn tag(&self, clause: &str) -> Option<Option<&str>> {
        self.clauses.get(clause).map(Option::as_deref)
    }

    /// Iterates over `(clause, tag)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.clauses
            .iter()
            .map(|(clause, tag)| (clause.as_str(), tag.as_deref()))
    }

    /// Renders each clause as an engine filter parameter, prefixed `{!tag=…}` when tagged.
    pub fn to_params(&self) -> Vec<String> {
        self.iter()
            .map(|(clause, tag)| match tag {
                Some(tag) => format!("{{!tag={tag}}}{clause}"),
                None => clause.to_string(),
            })
            .collect()
    }
}

/// Builds filter clauses from a filter specification.
pub struct FilterBuilder<'a, P: ?Sized> {
    /// Field metadata; decides which keys are facets and how they are tagged.
    fields: &'a P,
    /// Field names, marker and root policy.
    settings: &'a FilterSettings,
}

impl<'a, P> FilterBuilder<'a, P>
where
    P: FieldProvider + ?Sized,
{
    /// Creates a builder.
    pub fn new(fields: &'a P, settings: &'a FilterSettings) -> Self {
        Self { fields, settings }
    }

    /// Builds filters from JSON text.
    ///
    /// Text that is not valid JSON counts as a malformed root.
    pub fn build_str(&self, json: &str) -> Result<Option<FilterQueries>, FilterError> {
        match serde_json::from_str::<Value>(json) {
            Ok(spec) => self.build(&spec),
            Err(err) => self.malformed_root(format!("invalid JSON: {err}")),
        }
    }

    /// Builds filters from a parsed specification.
    ///
    /// Returns `Ok(None)` when no clause was produced. A root that is not an object is
    /// tolerated as "no filters" unless `strict_root` is set.
    pub fn build(&self, spec: &Value) -> Result<Option<FilterQueries>, FilterError> {
        let entries = match spec {
            Value::Object(entries) => entries,
            Value::Null => return Ok(None),
            other => {
                return self.malformed_root(format!("expected an object, got {}", kind(other)));
            }
        };

        let built: Vec<(&str, String, String)> = entries
            .iter()
            .filter_map(|(key, value)| {
                self.entry(key, value)
                    .map(|(clause, tag)| (key.as_str(), clause, tag))
            })
            .collect();
        let constrains_type = built
            .iter()
            .any(|(key, ..)| *key == self.settings.type_field);

        let mut queries = FilterQueries::default();

        if !constrains_type && !self.settings.default_types.is_empty() {
            let types: Vec<String> = self
                .settings
                .default_types
                .iter()
                .map(|t| quote(t))
                .collect();
            queries.insert(
                format!("{}:({})", self.settings.type_field, types.join(" OR ")),
                Some(self.fields.facet_tag(&self.settings.type_field)),
            );
        }

        for (_, clause, tag) in built {
            queries.insert(clause, Some(tag));
        }

        Ok((!queries.is_empty()).then_some(queries))
    }

    /// Applies the root policy to a malformed specification.
    fn malformed_root(&self, reason: String) -> Result<Option<FilterQueries>, FilterError> {
        if self.settings.strict_root {
            return Err(FilterError::MalformedRoot { reason });
        }
        log::warn!("ignoring malformed filter specification: {reason}");
        Ok(None)
    }

    /// Builds the clause and tag for one entry, if it yields one.
    fn entry(&self, key: &str, value: &Value) -> Option<(String, String)> {
        if key.is_empty() || value.is_null() {
            log::debug!("skipping filter entry {key:?} without value");
            return None;
        }
        if key == self.settings.date_key {
            return self.date_entry(value);
        }
        if !self.fields.is_facet_field(key) {
            log::debug!("skipping filter on non-facet field '{key}'");
            return None;
        }

        let clause = match value {
            Value::String(s) => self.scalar_clause(key, s),
            Value::Array(items) => self.list_clause(key, items),
            Value::Object(range) => range_clause(key, range),
            other => {
                log::debug!("skipping filter '{key}': unsupported {} value", kind(other));
                None
            }
        }?;
        Some((clause, self.fields.facet_tag(key)))
    }

    /// `field:"value"`, or only-missing when the value is the marker.
    fn scalar_clause(&self, field: &str, value: &str) -> Option<String> {
        if value == self.settings.missing_marker {
            return with_missing(field, None, true);
        }
        if value.trim().is_empty() {
            log::debug!("skipping filter '{field}': empty value");
            return None;
        }
        Some(format!("{field}:{}", quote(value)))
    }

    /// `field:("a" OR "b")`, with missing inclusion when the marker is listed.
    fn list_clause(&self, field: &str, items: &[Value]) -> Option<String> {
        let mut include_missing = false;
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            match item.as_str() {
                Some(s) if s == self.settings.missing_marker => include_missing = true,
                Some(s) if !s.trim().is_empty() => values.push(quote(s)),
                Some(_) => {}
                None => log::debug!("skipping non-string value {item} in filter '{field}'"),
            }
        }

        let positive =
            (!values.is_empty()).then(|| format!("{field}:({})", values.join(" OR ")));
        with_missing(field, positive, include_missing)
    }

    /// The composite date filter over the FROM and TO fields.
    fn date_entry(&self, value: &Value) -> Option<(String, String)> {
        let Value::Object(range) = value else {
            log::debug!("skipping date filter: expected an object");
            return None;
        };
        let (Some(start), Some(end)) = (int_field(range, "from"), int_field(range, "to")) else {
            log::debug!("skipping date filter: 'from' and 'to' must be integers");
            return None;
        };
        let exact = bool_field(range, "exact");
        let missing = bool_field(range, "missing");

        let from = &self.settings.date_from_field;
        let to = &self.settings.date_to_field;

        let clause = if exact {
            let within = format!("{from}:[{start} TO *] AND {to}:[* TO {end}]");
            if missing {
                format!("({within}) OR (*:* NOT {from}:* NOT {to}:*)")
            } else {
                within
            }
        } else {
            let open = format!(
                "({from}:[{start} TO *] OR (*:* NOT {from}:*)) \
                 AND ({to}:[* TO {end}] OR (*:* NOT {to}:*))"
            );
            if missing {
                open
            } else {
                format!("{open} AND ({from}:* OR {to}:*)")
            }
        };

        Some((clause, self.fields.facet_tag(from)))
    }
}

/// `field:[from TO to]` for a numeric range, with optional missing inclusion.
fn range_clause(field: &str, range: &Map<String, Value>) -> Option<String> {
    let positive = match (int_field(range, "from"), int_field(range, "to")) {
        (Some(from), Some(to)) => Some(format!("{field}:[{from} TO {to}]")),
        _ => None,
    };
    with_missing(field, positive, bool_field(range, "missing"))
}

/// Combines a positive clause with missing-value inclusion.
fn with_missing(field: &str, positive: Option<String>, include_missing: bool) -> Option<String> {
    match (positive, include_missing) {
        (Some(positive), true) => Some(format!("(*:* NOT {field}:*) OR ({positive})")),
        (None, true) => Some(format!("-{field}:[* TO *]")),
        (Some(positive), false) => Some(positive),
        (None, false) => {
            log::debug!("skipping filter '{field}': nothing to match");
            None
        }
    }
}

/// Reads an integer member; integral strings are accepted too.
fn int_field(object: &Map<String, Value>, key: &str) -> Option<i64> {
    match object.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Reads a boolean member, defaulting to false.
fn bool_field(object: &Map<String, Value>, key: &str) -> bool {
    object.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Short name of a JSON value's type, for messages.
fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use disco_config::{FieldOptions, Schema};
    use serde_json::json;

    use super::*;

    const TYPES: &str = "type-facet:(\"object\" OR \"description\" OR \"description-retro\")";

    fn schema() -> Schema {
        Schema::default()
            .with_field("title", FieldOptions::default())
            .with_facet("format-facet")
            .with_facet("type-facet")
            .with_facet("year-facet")
            .with_facet("orig-date-from-facet")
            .with_facet("orig-date-to-facet")
    }

    fn build_with(spec: &Value, settings: &FilterSettings) -> Option<FilterQueries> {
        let schema = schema();
        FilterBuilder::new(&schema, settings).build(spec).unwrap()
    }

    fn build(spec: Value) -> Option<FilterQueries> {
        build_with(&spec, &FilterSettings::default())
    }

    fn clauses(queries: &FilterQueries) -> Vec<(&str, Option<&str>)> {
        queries.iter().collect()
    }

    #[test]
    fn test_default_type_clause_first() {
        let queries = build(json!({"format-facet": "quarto"})).unwrap();
        assert_eq!(
            clauses(&queries),
            vec![
                (TYPES, Some("type-facet")),
                ("format-facet:\"quarto\"", Some("format-facet")),
            ]
        );
    }

    #[test]
    fn test_empty_spec_still_gets_type_clause() {
        let queries = build(json!({})).unwrap();
        assert_eq!(clauses(&queries), vec![(TYPES, Some("type-facet"))]);
    }

    #[test]
    fn test_explicit_type_replaces_default() {
        let queries = build(json!({"type-facet": ["manuscript"]})).unwrap();
        assert_eq!(
            clauses(&queries),
            vec![("type-facet:(\"manuscript\")", Some("type-facet"))]
        );
    }

    #[test]
    fn test_empty_type_list_keeps_default() {
        let queries = build(json!({"type-facet": []})).unwrap();
        assert_eq!(clauses(&queries), vec![(TYPES, Some("type-facet"))]);
    }

    #[test]
    fn test_malformed_type_keeps_default() {
        for value in [json!(true), json!({}), json!([""]), json!(7), json!("  ")] {
            let queries = build(json!({"type-facet": value.clone()})).unwrap();
            assert_eq!(
                clauses(&queries),
                vec![(TYPES, Some("type-facet"))],
                "type value {value}"
            );
        }
    }

    #[test]
    fn test_list_with_missing_marker() {
        let queries = build(json!({"format-facet": ["quarto", "__MISSING__"]})).unwrap();
        assert_eq!(
            queries.tag("(*:* NOT format-facet:*) OR (format-facet:(\"quarto\"))"),
            Some(Some("format-facet"))
        );
    }

    #[test]
    fn test_list_of_only_missing() {
        let queries = build(json!({"format-facet": ["__MISSING__"]})).unwrap();
        assert_eq!(queries.tag("-format-facet:[* TO *]"), Some(Some("format-facet")));
    }

    #[test]
    fn test_list_values_or_joined() {
        let queries = build(json!({"format-facet": ["quarto", "folio", 3, ""]})).unwrap();
        assert!(queries.tag("format-facet:(\"quarto\" OR \"folio\")").is_some());
    }

    #[test]
    fn test_empty_list_skipped() {
        let queries = build(json!({"format-facet": []})).unwrap();
        assert_eq!(queries.len(), 1);
    }

    #[test]
    fn test_scalar_missing_marker() {
        let queries = build(json!({"format-facet": "__MISSING__"})).unwrap();
        assert!(queries.tag("-format-facet:[* TO *]").is_some());
    }

    #[test]
    fn test_non_facet_and_null_entries_skipped() {
        let queries = build(json!({
            "title": "codex",
            "unknown-facet": "x",
            "format-facet": null,
            "year-facet": true
        }))
        .unwrap();
        assert_eq!(clauses(&queries), vec![(TYPES, Some("type-facet"))]);
    }

    #[test]
    fn test_range() {
        let queries = build(json!({"year-facet": {"from": 1500, "to": "1600"}})).unwrap();
        assert_eq!(
            queries.tag("year-facet:[1500 TO 1600]"),
            Some(Some("year-facet"))
        );
    }

    #[test]
    fn test_range_with_missing() {
        let queries =
            build(json!({"year-facet": {"from": 1500, "to": 1600, "missing": true}})).unwrap();
        assert!(
            queries
                .tag("(*:* NOT year-facet:*) OR (year-facet:[1500 TO 1600])")
                .is_some()
        );
        let queries = build(json!({"year-facet": {"missing": true}})).unwrap();
        assert!(queries.tag("-year-facet:[* TO *]").is_some());
        let queries = build(json!({"year-facet": {"from": 1500}})).unwrap();
        assert_eq!(queries.len(), 1);
    }

    #[test]
    fn test_date_exact() {
        let queries =
            build(json!({"orig-date-facet": {"from": 1400, "to": 1500, "exact": true}})).unwrap();
        assert_eq!(
            queries.tag("orig-date-from-facet:[1400 TO *] AND orig-date-to-facet:[* TO 1500]"),
            Some(Some("orig-date-from-facet"))
        );
    }

    #[test]
    fn test_date_exact_with_missing() {
        let queries = build(json!({
            "orig-date-facet": {"from": 1400, "to": 1500, "exact": true, "missing": true}
        }))
        .unwrap();
        assert!(
            queries
                .tag(
                    "(orig-date-from-facet:[1400 TO *] AND orig-date-to-facet:[* TO 1500]) \
                     OR (*:* NOT orig-date-from-facet:* NOT orig-date-to-facet:*)"
                )
                .is_some()
        );
    }

    #[test]
    fn test_date_open_requires_one_bound_present() {
        let queries = build(json!({"orig-date-facet": {"from": 1400, "to": 1500}})).unwrap();
        assert!(
            queries
                .tag(
                    "(orig-date-from-facet:[1400 TO *] OR (*:* NOT orig-date-from-facet:*)) \
                     AND (orig-date-to-facet:[* TO 1500] OR (*:* NOT orig-date-to-facet:*)) \
                     AND (orig-date-from-facet:* OR orig-date-to-facet:*)"
                )
                .is_some()
        );
    }

    #[test]
    fn test_date_open_with_missing() {
        let queries =
            build(json!({"orig-date-facet": {"from": 1400, "to": 1500, "missing": true}})).unwrap();
        assert!(
            queries
                .tag(
                    "(orig-date-from-facet:[1400 TO *] OR (*:* NOT orig-date-from-facet:*)) \
                     AND (orig-date-to-facet:[* TO 1500] OR (*:* NOT orig-date-to-facet:*))"
                )
                .is_some()
        );
    }

    #[test]
    fn test_date_without_bounds_skipped() {
        let queries = build(json!({"orig-date-facet": {"from": "soon", "to": 1500}})).unwrap();
        assert_eq!(queries.len(), 1);
        let queries = build(json!({"orig-date-facet": "1500"})).unwrap();
        assert_eq!(queries.len(), 1);
    }

    #[test]
    fn test_specification_order_preserved() {
        let queries = build(json!({
            "year-facet": {"from": 1, "to": 2},
            "format-facet": "quarto"
        }))
        .unwrap();
        let order: Vec<&str> = queries.iter().map(|(clause, _)| clause).collect();
        assert_eq!(
            order,
            vec![TYPES, "year-facet:[1 TO 2]", "format-facet:\"quarto\""]
        );
    }

    #[test]
    fn test_tag_override() {
        let mut schema = schema();
        schema.facet_tags.insert("format-facet".into(), "format".into());
        let settings = FilterSettings::default();
        let queries = FilterBuilder::new(&schema, &settings)
            .build(&json!({"format-facet": "quarto"}))
            .unwrap()
            .unwrap();
        assert_eq!(queries.tag("format-facet:\"quarto\""), Some(Some("format")));
    }

    #[test]
    fn test_no_clauses_is_absent() {
        let settings = FilterSettings {
            default_types: Vec::new(),
            ..FilterSettings::default()
        };
        assert!(build_with(&json!({"format-facet": []}), &settings).is_none());
        assert!(build_with(&json!({}), &settings).is_none());
    }

    #[test]
    fn test_malformed_root_lenient() {
        assert!(build(json!(["format-facet"])).is_none());
        assert!(build(json!("quarto")).is_none());
        assert!(build(Value::Null).is_none());
        let schema = schema();
        let settings = FilterSettings::default();
        let builder = FilterBuilder::new(&schema, &settings);
        assert!(builder.build_str("{not json").unwrap().is_none());
    }

    #[test]
    fn test_malformed_root_strict() {
        let schema = schema();
        let settings = FilterSettings {
            strict_root: true,
            ..FilterSettings::default()
        };
        let builder = FilterBuilder::new(&schema, &settings);
        let err = builder.build(&json!([1, 2])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed filter specification: expected an object, got array"
        );
        assert!(matches!(
            builder.build_str("{not json"),
            Err(FilterError::MalformedRoot { .. })
        ));
    }

    #[test]
    fn test_quotes_escaped() {
        let queries = build(json!({"format-facet": "8\" quarto"})).unwrap();
        assert!(queries.tag("format-facet:\"8\\\" quarto\"").is_some());
    }

    #[test]
    fn test_to_params() {
        let mut queries = FilterQueries::default();
        queries.insert("a:\"x\"".into(), Some("a".into()));
        queries.insert("b:\"y\"".into(), None);
        assert_eq!(queries.to_params(), vec!["{!tag=a}a:\"x\"", "b:\"y\""]);
    }

    #[test]
    fn test_deterministic() {
        let spec = json!({"format-facet": ["a", "b"], "orig-date-facet": {"from": 1, "to": 2}});
        assert_eq!(build(spec.clone()), build(spec));
    }
}
