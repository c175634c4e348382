//! Expression abstract syntax tree.
//!
//! Represents parsed comparison expressions before compilation to engine queries.

use std::fmt;

/// A comparison operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `=in=`
    In,
    /// `=gt=` (alias `>`)
    Gt,
    /// `=ge=` (alias `>=`)
    Ge,
    /// `=lt=` (alias `<`)
    Lt,
    /// `=le=` (alias `<=`)
    Le,
    /// Any other symbol, passed through verbatim.
    Custom(String),
}

impl Operator {
    /// Resolves an operator symbol, including the `<`, `<=`, `>`, `>=` aliases.
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "==" => Self::Eq,
            "!=" => Self::Ne,
            "=in=" => Self::In,
            "=gt=" | ">" => Self::Gt,
            "=ge=" | ">=" => Self::Ge,
            "=lt=" | "<" => Self::Lt,
            "=le=" | "<=" => Self::Le,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Returns the canonical symbol for this operator.
    pub fn symbol(&self) -> &str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::In => "=in=",
            Self::Gt => "=gt=",
            Self::Ge => "=ge=",
            Self::Lt => "=lt=",
            Self::Le => "=le=",
            Self::Custom(symbol) => symbol,
        }
    }

    /// Whether this operator accepts a parenthesized list of arguments.
    pub fn is_multi_value(&self) -> bool {
        matches!(self, Self::In | Self::Custom(_))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A leaf comparison binding a field selector, an operator and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// Field name or field-group name.
    pub field: String,
    /// Comparison operator.
    pub operator: Operator,
    /// Argument values; never empty.
    pub arguments: Vec<String>,
}

impl Comparison {
    /// Creates a comparison.
    pub fn new(field: impl Into<String>, operator: Operator, arguments: Vec<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            arguments,
        }
    }
}

/// A parsed comparison expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Conjunction: all sub-expressions must match.
    And(Vec<Self>),

    /// Disjunction: at least one sub-expression must match.
    Or(Vec<Self>),

    /// A single field comparison.
    Comparison(Comparison),
}

impl Expr {
    /// Creates a comparison expression.
    pub fn comparison(field: impl Into<String>, operator: Operator, arguments: Vec<String>) -> Self {
        Self::Comparison(Comparison::new(field, operator, arguments))
    }

    /// Creates an And expression, flattening nested Ands.
    pub fn and(exprs: Vec<Self>) -> Self {
        let mut flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::And(inner) => inner,
                other => vec![other],
            })
            .collect();

        if flattened.len() == 1 {
            flattened.remove(0)
        } else {
            Self::And(flattened)
        }
    }

    /// Creates an Or expression, flattening nested Ors.
    pub fn or(exprs: Vec<Self>) -> Self {
        let mut flattened: Vec<Self> = exprs
            .into_iter()
            .flat_map(|e| match e {
                Self::Or(inner) => inner,
                other => vec![other],
            })
            .collect();

        if flattened.len() == 1 {
            flattened.remove(0)
        } else {
            Self::Or(flattened)
        }
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::And(exprs) => {
                writeln!(f, "{prefix}And")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Or(exprs) => {
                writeln!(f, "{prefix}Or")?;
                for expr in exprs {
                    expr.fmt_tree(f, indent + 1)?;
                }
                Ok(())
            }
            Self::Comparison(c) => writeln!(
                f,
                "{prefix}Comparison({:?} {} {:?})",
                c.field, c.operator, c.arguments
            ),
        }
    }

    /// Formats the expression back into grammar text.
    ///
    /// This produces output like: `title=="Codex Gigas";(year=ge=1500,format=in=(quarto,folio))`
    pub fn to_query_string(&self) -> String {
        self.fmt_query_string(false)
    }

    /// Internal helper for query string formatting.
    fn fmt_query_string(&self, nested: bool) -> String {
        match self {
            Self::And(exprs) => {
                let parts: Vec<String> = exprs.iter().map(|e| e.fmt_query_string(true)).collect();
                parts.join(";")
            }
            Self::Or(exprs) => {
                let parts: Vec<String> = exprs.iter().map(|e| e.fmt_query_string(true)).collect();
                if nested && exprs.len() > 1 {
                    format!("({})", parts.join(","))
                } else {
                    parts.join(",")
                }
            }
            Self::Comparison(c) => {
                let values: Vec<String> = c.arguments.iter().map(|a| quote_if_needed(a)).collect();
                if values.len() == 1 && !matches!(c.operator, Operator::In) {
                    format!("{}{}{}", c.field, c.operator, values[0])
                } else {
                    format!("{}{}({})", c.field, c.operator, values.join(","))
                }
            }
        }
    }
}

/// Quotes an argument if it contains characters that are reserved in the grammar.
fn quote_if_needed(value: &str) -> String {
    let reserved = value.is_empty()
        || value
            .chars()
            .any(|ch| ch.is_whitespace() || "\"'();,=!<>~".contains(ch));
    if reserved {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
