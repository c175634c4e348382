//! Query compiler.
//!
//! Compiles an expression AST into the engine's Lucene-style query syntax, collecting
//! the boosted names of every field the query touches.

use disco_config::{FieldDescriptor, FieldProvider};
use disco_query::{Comparison, Expr, Operator, parse};
use indexmap::IndexSet;
use serde::Serialize;

use crate::{
    CompileError,
    freetext::{build_free_text, is_free_text},
};

/// A compiled query together with the fields it searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledQuery {
    /// Engine query string.
    pub query: String,
    /// Boosted names of the fields used, in first-use order.
    pub fields: IndexSet<String>,
}

/// Where an expression sits relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// The whole query.
    Root,
    /// A child of an `And`.
    InAnd,
    /// A child of an `Or`.
    InOr,
}

/// Compiles expression ASTs against a field provider.
pub struct QueryCompiler<'a, P: ?Sized> {
    /// Field metadata.
    fields: &'a P,
}

impl<'a, P> QueryCompiler<'a, P>
where
    P: FieldProvider + ?Sized,
{
    /// Creates a compiler over the given field metadata.
    pub fn new(fields: &'a P) -> Self {
        Self { fields }
    }

    /// Parses and compiles an expression string.
    ///
    /// Returns `None` for blank input.
    pub fn compile_str(&self, input: &str) -> Result<Option<CompiledQuery>, CompileError> {
        match parse(input)? {
            Some(expr) => self.compile(&expr).map(Some),
            None => Ok(None),
        }
    }

    /// Compiles an expression.
    pub fn compile(&self, expr: &Expr) -> Result<CompiledQuery, CompileError> {
        let mut fields = IndexSet::new();
        let query = self.compile_expr(expr, Position::Root, &mut fields)?;
        Ok(CompiledQuery { query, fields })
    }

    /// Compiles one node.
    fn compile_expr(
        &self,
        expr: &Expr,
        position: Position,
        used: &mut IndexSet<String>,
    ) -> Result<String, CompileError> {
        match expr {
            Expr::And(children) => {
                let parts = self.compile_children(children, Position::InAnd, used)?;
                Ok(join(&parts, " AND ", position == Position::InOr))
            }
            Expr::Or(children) => {
                let parts = self.compile_children(children, Position::InOr, used)?;
                Ok(join(&parts, " OR ", position == Position::InAnd))
            }
            Expr::Comparison(comparison) => self.compile_comparison(comparison, used),
        }
    }

    /// Compiles child nodes, dropping those that compile to nothing.
    fn compile_children(
        &self,
        children: &[Expr],
        position: Position,
        used: &mut IndexSet<String>,
    ) -> Result<Vec<String>, CompileError> {
        let mut parts = Vec::with_capacity(children.len());
        for child in children {
            let part = self.compile_expr(child, position, used)?;
            if !part.is_empty() {
                parts.push(part);
            }
        }
        Ok(parts)
    }

    /// Compiles a comparison, expanding field groups.
    fn compile_comparison(
        &self,
        comparison: &Comparison,
        used: &mut IndexSet<String>,
    ) -> Result<String, CompileError> {
        let mut expanding = Vec::new();
        self.compile_selector(&comparison.field, comparison, used, &mut expanding)
    }

    /// Compiles `comparison` against `selector`, which is either a group or a field.
    ///
    /// `expanding` holds the groups currently being expanded; a group that contains
    /// itself contributes nothing the second time round.
    fn compile_selector(
        &self,
        selector: &str,
        comparison: &Comparison,
        used: &mut IndexSet<String>,
        expanding: &mut Vec<String>,
    ) -> Result<String, CompileError> {
        if !self.fields.group_exists(selector) {
            return self.compile_field(selector, comparison, used);
        }

        if expanding.iter().any(|group| group == selector) {
            log::warn!("field group '{selector}' contains itself; skipping");
            return Ok(String::new());
        }

        let members = self.fields.fields_in_group(selector);
        if members.is_empty() {
            log::warn!("field group '{selector}' has no members");
            return Ok(String::new());
        }

        expanding.push(selector.to_string());
        let mut parts = Vec::with_capacity(members.len());
        for member in &members {
            let part = self.compile_selector(member, comparison, used, expanding)?;
            if !part.is_empty() {
                parts.push(part);
            }
        }
        expanding.pop();

        if parts.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("({})", parts.join(" OR ")))
    }

    /// Compiles a comparison on a single field.
    fn compile_field(
        &self,
        name: &str,
        comparison: &Comparison,
        used: &mut IndexSet<String>,
    ) -> Result<String, CompileError> {
        if !self.fields.is_valid_field(name) {
            return Err(CompileError::InvalidField {
                field: name.to_string(),
            });
        }

        let field = self.fields.descriptor(name);
        let clause = self.field_clause(name, &field, comparison)?;
        if !clause.is_empty() {
            used.insert(field.to_string());
        }
        Ok(clause)
    }

    /// Renders the clause for a comparison on a known field.
    fn field_clause(
        &self,
        name: &str,
        field: &FieldDescriptor,
        comparison: &Comparison,
    ) -> Result<String, CompileError> {
        let operator = &comparison.operator;
        let arguments = &comparison.arguments;
        match operator {
            Operator::Eq | Operator::Ne => {
                let value = single_argument(name, operator, arguments)?.trim();
                let negated = *operator == Operator::Ne;
                if is_free_text(value) {
                    return Ok(build_free_text(self.fields, field, value, negated));
                }
                let prefix = if negated { "-" } else { "" };
                Ok(format!(
                    "{prefix}{}:{}{}",
                    field.name,
                    quote_value(value),
                    field.boost_suffix()
                ))
            }
            Operator::In => {
                if arguments.is_empty() {
                    return Err(argument_error(name, operator, "at least one value", 0));
                }
                let values: Vec<String> = arguments.iter().map(|v| quote_value(v)).collect();
                Ok(format!(
                    "{}:({}){}",
                    field.name,
                    values.join(" OR "),
                    field.boost_suffix()
                ))
            }
            Operator::Ge | Operator::Gt | Operator::Le | Operator::Lt => {
                let value = single_argument(name, operator, arguments)?;
                Ok(range_clause(field, operator, value))
            }
            Operator::Custom(symbol) => {
                if arguments.is_empty() {
                    return Err(argument_error(name, operator, "at least one value", 0));
                }
                Ok(format!(
                    "{} {symbol} {}{}",
                    field.name,
                    arguments.join(","),
                    field.boost_suffix()
                ))
            }
        }
    }
}

/// Renders an open-ended range clause.
fn range_clause(field: &FieldDescriptor, operator: &Operator, value: &str) -> String {
    let (open, body, close) = match operator {
        Operator::Ge => ('[', format!("{value} TO *"), ']'),
        Operator::Gt => ('{', format!("{value} TO *"), '}'),
        Operator::Le => ('[', format!("* TO {value}"), ']'),
        _ => ('{', format!("* TO {value}"), '}'),
    };
    format!("{}:{open}{body}{close}{}", field.name, field.boost_suffix())
}

/// Returns the only argument of a fixed-arity operator.
fn single_argument<'v>(
    field: &str,
    operator: &Operator,
    arguments: &'v [String],
) -> Result<&'v str, CompileError> {
    match arguments {
        [value] => Ok(value),
        _ => Err(argument_error(field, operator, "exactly one value", arguments.len())),
    }
}

/// Builds an argument-count error.
fn argument_error(
    field: &str,
    operator: &Operator,
    expected: &'static str,
    got: usize,
) -> CompileError {
    CompileError::Arguments {
        field: field.to_string(),
        operator: operator.symbol().to_string(),
        expected,
        got,
    }
}

/// Joins compiled parts, parenthesizing multiple parts when `wrap` is set.
fn join(parts: &[String], separator: &str, wrap: bool) -> String {
    let joined = parts.join(separator);
    if wrap && parts.len() > 1 {
        format!("({joined})")
    } else {
        joined
    }
}

/// Quotes a value unless it is all digits or the `*` wildcard.
pub fn quote_value(value: &str) -> String {
    let numeric = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit());
    if numeric || value == "*" {
        value.to_string()
    } else {
        quote(value)
    }
}

/// Wraps a value in double quotes, escaping backslashes and quotes.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}
