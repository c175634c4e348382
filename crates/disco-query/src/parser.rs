//! Expression parser.
//!
//! Parses a token stream into an expression AST using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query      → or_expr
//! or_expr    → and_expr ((',' | "or") and_expr)*
//! and_expr   → constraint ((';' | "and") constraint)*
//! constraint → '(' or_expr ')' | comparison
//! comparison → SELECTOR OPERATOR arguments
//! arguments  → '(' value (',' value)* ')' | value
//! value      → WORD | QUOTED
//! ```
//!
//! # Precedence (highest to lowest)
//!
//! 1. Grouping: `(...)`
//! 2. AND: `;` or the keyword `and`
//! 3. OR: `,` or the keyword `or`

use crate::{
    ast::{Comparison, Expr, Operator},
    error::{ParseError, QueryError},
    lexer::{Spanned, Token, tokenize_spanned},
};

/// Recursive descent parser for comparison expressions.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Spanned>,
    /// Current position in token stream.
    index: usize,
    /// Length of the input, used to report errors at end of input.
    input_len: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Spanned>, input_len: usize) -> Self {
        Self {
            tokens,
            index: 0,
            input_len,
        }
    }

    /// Parses the token stream into an expression.
    fn parse(mut self) -> Result<Option<Expr>, ParseError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let expr = self.parse_or_expr()?;

        if let Some(token) = self.peek() {
            return Err(self.error(format!("unexpected token: {token:?}")));
        }

        Ok(Some(expr))
    }

    /// Parses: or_expr → and_expr ((',' | "or") and_expr)*
    fn parse_or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut exprs = vec![self.parse_and_expr()?];

        while self.check(&Token::Comma) || self.check_keyword("or") {
            self.advance();
            exprs.push(self.parse_and_expr()?);
        }

        Ok(Expr::or(exprs))
    }

    /// Parses: and_expr → constraint ((';' | "and") constraint)*
    fn parse_and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut exprs = vec![self.parse_constraint()?];

        while self.check(&Token::Semicolon) || self.check_keyword("and") {
            self.advance();
            exprs.push(self.parse_constraint()?);
        }

        Ok(Expr::and(exprs))
    }

    /// Parses: constraint → '(' or_expr ')' | comparison
    fn parse_constraint(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token::LParen) => {
                self.advance();
                let inner = self.parse_or_expr()?;
                self.expect_rparen()?;
                Ok(inner)
            }
            Some(Token::Word(_)) => self.parse_comparison(),
            Some(Token::RParen) => Err(self.error("unexpected closing parenthesis")),
            Some(Token::Semicolon | Token::Comma) => {
                Err(self.error("logical operator needs a comparison before it"))
            }
            Some(token) => Err(self.error(format!("expected field selector, found {token:?}"))),
            None => Err(self.error("unexpected end of expression")),
        }
    }

    /// Parses: comparison → SELECTOR OPERATOR arguments
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let Some(Token::Word(field)) = self.peek().cloned() else {
            return Err(self.error("expected field selector"));
        };
        self.advance();

        let Some(Token::Operator(symbol)) = self.peek().cloned() else {
            return Err(self.error(format!("expected comparison operator after '{field}'")));
        };
        self.advance();
        let operator = Operator::from_symbol(&symbol);

        let arguments = if self.check(&Token::LParen) {
            if !operator.is_multi_value() {
                return Err(self.error(format!(
                    "operator {operator} expects a single argument, not a list"
                )));
            }
            self.parse_argument_list()?
        } else {
            vec![self.parse_value()?]
        };

        Ok(Expr::Comparison(Comparison::new(field, operator, arguments)))
    }

    /// Parses: '(' value (',' value)* ')'
    fn parse_argument_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.advance(); // (
        let mut values = vec![self.parse_value()?];
        while self.check(&Token::Comma) {
            self.advance();
            values.push(self.parse_value()?);
        }
        self.expect_rparen()?;
        Ok(values)
    }

    /// Parses a single WORD or QUOTED value.
    fn parse_value(&mut self) -> Result<String, ParseError> {
        match self.peek().cloned() {
            Some(Token::Word(value) | Token::Quoted(value)) => {
                self.advance();
                Ok(value)
            }
            Some(token) => Err(self.error(format!("expected argument value, found {token:?}"))),
            None => Err(self.error("expected argument value at end of expression")),
        }
    }

    /// Consumes a closing parenthesis or fails.
    fn expect_rparen(&mut self) -> Result<(), ParseError> {
        if !self.check(&Token::RParen) {
            return Err(self.error("expected closing parenthesis"));
        }
        self.advance();
        Ok(())
    }

    /// Creates an error located at the current token (or the end of input).
    fn error(&self, message: impl Into<String>) -> ParseError {
        let position = self
            .tokens
            .get(self.index)
            .map_or(self.input_len, |spanned| spanned.position);
        ParseError::new(message, Some(position))
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index).map(|spanned| &spanned.token)
    }

    /// Checks if the current token equals the given token.
    fn check(&self, token: &Token) -> bool {
        self.peek() == Some(token)
    }

    /// Checks if the current token is the given keyword (case-insensitive).
    fn check_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(word)) if word.eq_ignore_ascii_case(keyword))
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }
}

/// Parses an expression string into an AST.
///
/// Returns `Ok(None)` for empty expressions, `Ok(Some(expr))` for valid expressions,
/// or `Err(QueryError)` for invalid syntax.
pub fn parse(input: &str) -> Result<Option<Expr>, QueryError> {
    let tokens = tokenize_spanned(input).map_err(QueryError::from)?;
    Parser::new(tokens, input.len())
        .parse()
        .map_err(|err| QueryError::from(err).with_query(input))
}
