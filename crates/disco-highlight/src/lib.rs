//! Terminal styling for disco.
//!
//! Configuration dumps are printed as highlighted TOML, machine output as highlighted JSON.
//! Snippet matches and query operators get plain ANSI emphasis, and status lines use the
//! small color helpers at the bottom of this module.

#![warn(missing_docs)]

use std::ops::Range;

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Boolean operators emphasized in compiled queries.
const QUERY_OPERATORS: &[&str] = &["AND", "OR", "NOT"];

/// A syntax highlighter for terminal output.
pub struct Highlighter {
    /// Language definitions, including TOML and JSON.
    syntax_set: SyntaxSet,
    /// Embedded color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Active theme.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter using the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML, as printed by `disco config` and `disco init`.
    pub fn highlight_toml(&self, content: &str) -> String {
        self.highlight(content, "toml")
    }

    /// Highlights JSON, as printed by the `--json` output modes.
    pub fn highlight_json(&self, content: &str) -> String {
        self.highlight(content, "json")
    }

    /// Highlights `content` using the syntax registered for `syntax_name`.
    ///
    /// The name is tried as a file extension first, then as a syntax name. Unknown
    /// syntaxes fall back to plain text.
    pub fn highlight(&self, content: &str, syntax_name: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension(syntax_name)
            .or_else(|| self.syntax_set.find_syntax_by_name(syntax_name))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self.theme_set.get(self.theme);
        let mut highlighter = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = highlighter
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges[..], false));
        }
        output.push_str(colors::RESET);
        output
    }
}

/// ANSI escape codes.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (success).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (warnings, matches).
    pub const YELLOW: &str = "\x1b[33m";
    /// Magenta text (query operators).
    pub const MAGENTA: &str = "\x1b[35m";
    /// Dim text.
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Wraps each byte range of `text` in bold yellow.
///
/// Ranges must be sorted and non-overlapping. Ranges that fall outside the text or off a
/// character boundary are skipped.
pub fn emphasize(text: &str, ranges: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(text.len() + ranges.len() * 12);
    let mut cursor = 0;
    for range in ranges {
        let valid = range.start >= cursor
            && range.start <= range.end
            && range.end <= text.len()
            && text.is_char_boundary(range.start)
            && text.is_char_boundary(range.end);
        if !valid {
            continue;
        }
        out.push_str(&text[cursor..range.start]);
        out.push_str(colors::BOLD);
        out.push_str(colors::YELLOW);
        out.push_str(&text[range.clone()]);
        out.push_str(colors::RESET);
        cursor = range.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Colors the boolean operators of a compiled query.
pub fn query(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        let word_len = rest.find(' ').unwrap_or(rest.len());
        let (word, tail) = rest.split_at(word_len);
        if QUERY_OPERATORS.contains(&word) {
            out.push_str(colors::MAGENTA);
            out.push_str(word);
            out.push_str(colors::RESET);
        } else {
            out.push_str(word);
        }
        let spaces = tail.len() - tail.trim_start_matches(' ').len();
        out.push_str(&tail[..spaces]);
        rest = &tail[spaces..];
    }
    out
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as dimmed.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats a success message in green.
pub fn success(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}

/// Formats a warning in yellow.
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}
