//! Expression lexer (tokenizer).
//!
//! Converts an expression string into a stream of tokens for the parser.

use std::{iter::Peekable, str::Chars};

use crate::error::LexError;

/// Characters that terminate an unquoted word.
const RESERVED: &str = "\"'();,=!<>";

/// A token in the expression language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An unquoted selector or value.
    Word(String),

    /// A quoted value (the quotes are stripped, escapes resolved).
    Quoted(String),

    /// A comparison operator symbol, e.g. `==`, `=in=`, `<=`.
    Operator(String),

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,

    /// Logical AND (`;`).
    Semicolon,

    /// Logical OR (`,`), also the argument separator inside lists.
    Comma,
}

/// A token together with the byte position where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Spanned {
    /// The token.
    pub token: Token,
    /// Byte position of the first character of the token.
    pub position: usize,
}

/// Tokenizes an expression string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let position = self.position;
            match self.next_token()? {
                Some(token) => tokens.push(Spanned { token, position }),
                None => break,
            }
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            ';' => {
                self.advance();
                Token::Semicolon
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            '"' | '\'' => self.read_quoted(ch)?,
            '=' | '!' | '<' | '>' => self.read_operator()?,
            _ => self.read_word(),
        };

        Ok(Some(token))
    }

    /// Reads a quoted value delimited by `quote`, resolving backslash escapes.
    fn read_quoted(&mut self, quote: char) -> Result<Token, LexError> {
        let start_pos = self.position;
        self.advance(); // opening quote

        let mut content = String::new();

        loop {
            match self.chars.peek().copied() {
                Some('\\') => {
                    self.advance();
                    match self.chars.peek().copied() {
                        Some(escaped) => {
                            content.push(escaped);
                            self.advance();
                        }
                        None => return Err(self.error_at("unclosed quote", start_pos)),
                    }
                }
                Some(ch) if ch == quote => {
                    self.advance();
                    return Ok(Token::Quoted(content));
                }
                Some(ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => return Err(self.error_at("unclosed quote", start_pos)),
            }
        }
    }

    /// Reads a comparison operator: `==`, `!=`, `=name=`, `<`, `<=`, `>`, `>=`.
    fn read_operator(&mut self) -> Result<Token, LexError> {
        let start_pos = self.position;
        let Some(first) = self.chars.next() else {
            return Err(self.error_at("expected comparison operator", start_pos));
        };
        self.position += first.len_utf8();

        let mut symbol = String::from(first);
        match first {
            '<' | '>' => {
                if self.chars.peek() == Some(&'=') {
                    symbol.push('=');
                    self.advance();
                }
            }
            '!' => {
                if self.chars.peek() != Some(&'=') {
                    return Err(self.error_at("invalid comparison operator '!'", start_pos));
                }
                symbol.push('=');
                self.advance();
            }
            _ => {
                if self.chars.peek() == Some(&'=') {
                    symbol.push('=');
                    self.advance();
                    return Ok(Token::Operator(symbol));
                }
                while let Some(&ch) = self.chars.peek() {
                    if !ch.is_ascii_alphabetic() {
                        break;
                    }
                    symbol.push(ch);
                    self.advance();
                }
                if symbol.len() == 1 || self.chars.peek() != Some(&'=') {
                    return Err(self.error_at(
                        format!("invalid comparison operator '{symbol}'"),
                        start_pos,
                    ));
                }
                symbol.push('=');
                self.advance();
            }
        }

        Ok(Token::Operator(symbol))
    }

    /// Reads an unquoted selector or value.
    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || RESERVED.contains(ch) {
                break;
            }
            word.push(ch);
            self.advance();
        }

        Token::Word(word)
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Tokenizes an expression, keeping the byte position of every token.
pub(crate) fn tokenize_spanned(input: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(input).tokenize()
}

/// Convenience function to tokenize an expression string.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Ok(tokenize_spanned(input)?
        .into_iter()
        .map(|spanned| spanned.token)
        .collect())
}
