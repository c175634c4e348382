//! Highlighted snippets around search term matches.

use serde::Serialize;

use crate::boundary::{BoundaryCalculator, SnippetWindow};

/// Separator placed between fragments.
const FRAGMENT_SEPARATOR: &str = " … ";

/// A rendered snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    /// Fragments with matches wrapped in the configured tags.
    pub text: String,
    /// Windows the fragments were cut from, in text order.
    pub windows: Vec<SnippetWindow>,
    /// Matched spans inside those windows.
    pub matches: Vec<SnippetWindow>,
}

/// A search term prepared for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TermPattern {
    /// Lowercased words that must occur consecutively.
    words: Vec<String>,
    /// Whether the last word matches as a prefix.
    prefix: bool,
}

impl TermPattern {
    /// Parses a term. Returns `None` for terms without any word characters.
    fn parse(term: &str) -> Option<Self> {
        let term = term.trim();
        let words: Vec<String> = term
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect();
        if words.is_empty() {
            return None;
        }
        Some(Self {
            words,
            prefix: term.trim_end_matches('"').ends_with('*'),
        })
    }

    /// Whether the pattern matches the text words starting at `words[0]`.
    fn matches_at(&self, words: &[TextWord]) -> bool {
        if words.len() < self.words.len() {
            return false;
        }
        let last = self.words.len() - 1;
        self.words.iter().zip(words).enumerate().all(|(i, (want, got))| {
            if self.prefix && i == last {
                got.lower.starts_with(want.as_str())
            } else {
                got.lower == *want
            }
        })
    }
}

/// A word of the source text.
#[derive(Debug)]
struct TextWord {
    /// Span in the text.
    span: SnippetWindow,
    /// Lowercased word.
    lower: String,
}

/// Splits text into alphanumeric words.
fn text_words(text: &str) -> Vec<TextWord> {
    let mut words = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        match (ch.is_alphanumeric(), start) {
            (true, None) => start = Some(idx),
            (false, Some(begin)) => {
                words.push(word_at(text, begin, idx));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(begin) = start {
        words.push(word_at(text, begin, text.len()));
    }
    words
}

/// Builds the word covering `text[start..end]`.
fn word_at(text: &str, start: usize, end: usize) -> TextWord {
    TextWord {
        span: SnippetWindow::new(start, end),
        lower: text[start..end].to_lowercase(),
    }
}

/// Builds snippets: match windows snapped to word boundaries, merged, tagged and joined.
#[derive(Debug, Clone)]
pub struct SnippetBuilder {
    /// Edge snapping.
    boundaries: BoundaryCalculator,
    /// Characters of context on each side of a match.
    padding: usize,
    /// Maximum number of fragments.
    max_fragments: usize,
    /// Markup before a match.
    pre_tag: String,
    /// Markup after a match.
    post_tag: String,
}

impl Default for SnippetBuilder {
    fn default() -> Self {
        Self {
            boundaries: BoundaryCalculator::default(),
            padding: 60,
            max_fragments: 3,
            pre_tag: String::from("<em>"),
            post_tag: String::from("</em>"),
        }
    }
}

impl SnippetBuilder {
    /// Sets the divider characters.
    pub fn with_dividers(mut self, dividers: &str) -> Self {
        self.boundaries = BoundaryCalculator::new(dividers);
        self
    }

    /// Sets the padding in characters.
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the maximum number of fragments. Values below one are raised to one.
    pub fn with_max_fragments(mut self, max_fragments: usize) -> Self {
        self.max_fragments = max_fragments.max(1);
        self
    }

    /// Sets the markup wrapped around matches.
    pub fn with_tags(mut self, pre_tag: impl Into<String>, post_tag: impl Into<String>) -> Self {
        self.pre_tag = pre_tag.into();
        self.post_tag = post_tag.into();
        self
    }

    /// Finds whole-word, case-insensitive matches of `terms` in `text`.
    ///
    /// A trailing `*` turns the last word of a term into a prefix match. Multi-word terms
    /// match consecutive words. Overlapping matches keep the earliest.
    pub fn find_matches(&self, text: &str, terms: &[&str]) -> Vec<SnippetWindow> {
        let patterns: Vec<TermPattern> = terms
            .iter()
            .filter_map(|term| TermPattern::parse(term))
            .collect();
        let words = text_words(text);

        let mut found: Vec<SnippetWindow> = Vec::new();
        for pattern in &patterns {
            for i in 0..words.len() {
                if pattern.matches_at(&words[i..]) {
                    let last = &words[i + pattern.words.len() - 1];
                    found.push(SnippetWindow::new(words[i].span.start, last.span.end));
                }
            }
        }
        found.sort_by_key(|m| (m.start, m.end));

        let mut matches: Vec<SnippetWindow> = Vec::with_capacity(found.len());
        for candidate in found {
            if matches.last().is_none_or(|prev| candidate.start >= prev.end) {
                matches.push(candidate);
            }
        }
        matches
    }

    /// Builds the snippet for `text`, or `None` when no term occurs.
    pub fn build(&self, text: &str, terms: &[&str]) -> Option<Snippet> {
        let matches = self.find_matches(text, terms);
        if matches.is_empty() {
            log::debug!("no snippet: none of {terms:?} occur");
            return None;
        }

        let mut fragments: Vec<(SnippetWindow, Vec<SnippetWindow>)> = Vec::new();
        for matched in matches {
            let window = self
                .boundaries
                .window_around(text, matched.start, matched.end, self.padding);
            match fragments.last_mut() {
                Some((prev, inner)) if prev.touches(&window) => {
                    *prev = prev.union(&window);
                    inner.push(matched);
                }
                _ => fragments.push((window, vec![matched])),
            }
        }
        fragments.truncate(self.max_fragments);

        let rendered: Vec<String> = fragments
            .iter()
            .map(|(window, inner)| self.render(text, *window, inner))
            .collect();

        Some(Snippet {
            text: rendered.join(FRAGMENT_SEPARATOR),
            windows: fragments.iter().map(|(window, _)| *window).collect(),
            matches: fragments.into_iter().flat_map(|(_, inner)| inner).collect(),
        })
    }

    /// Renders one fragment with its matches tagged.
    fn render(&self, text: &str, window: SnippetWindow, matches: &[SnippetWindow]) -> String {
        let mut out = String::with_capacity(window.len() + matches.len() * 16);
        let mut cursor = window.start;
        for matched in matches {
            out.push_str(&text[cursor..matched.start]);
            out.push_str(&self.pre_tag);
            out.push_str(matched.slice(text));
            out.push_str(&self.post_tag);
            cursor = matched.end;
        }
        out.push_str(&text[cursor..window.end]);
        out.trim().to_string()
    }
}
