//! Word-boundary snapping for snippet windows.
//!
//! A snippet window starts as a match widened by some padding on both sides. The edges
//! then move onto word boundaries so no word is cut in half. Divider punctuation acts as
//! a hard stop: when the edge sits in a run of non-word characters containing a divider,
//! it snaps to the word just inside the divider instead of dragging the punctuation along.

use serde::Serialize;

/// Default divider punctuation.
pub const DEFAULT_DIVIDERS: &str = "()[]{};.:!?";

/// A `[start, end)` byte range into the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnippetWindow {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl SnippetWindow {
    /// Creates a window, swapping the edges if they are reversed.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the window covers no text.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether two windows overlap or touch.
    pub fn touches(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Smallest window covering both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Whether `other` lies entirely inside this window.
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The text covered by the window.
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Computes word-safe snippet edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryCalculator {
    /// Characters treated as hard stops.
    dividers: Vec<char>,
}

impl Default for BoundaryCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_DIVIDERS)
    }
}

impl BoundaryCalculator {
    /// Creates a calculator with the given divider characters.
    pub fn new(dividers: &str) -> Self {
        Self {
            dividers: dividers.chars().collect(),
        }
    }

    /// Whether `ch` is a divider.
    fn is_divider(&self, ch: char) -> bool {
        self.dividers.contains(&ch)
    }

    /// Moves a window's start offset onto a word boundary.
    ///
    /// Inside a word, walks left to the start of the word (or the start of the text).
    /// In a run of non-word characters that contains a divider, snaps forward to the
    /// start of the following word.
    pub fn left(&self, text: &str, start: usize) -> usize {
        let start = floor_char_boundary(text, start);

        if text[..start].chars().next_back().is_some_and(is_word_char) {
            return text[..start]
                .char_indices()
                .rev()
                .take_while(|&(_, ch)| is_word_char(ch))
                .last()
                .map_or(start, |(idx, _)| idx);
        }

        let run_end = next_word_start(text, start);
        if text[start..run_end].chars().any(|ch| self.is_divider(ch)) {
            run_end
        } else {
            start
        }
    }

    /// Moves a window's end offset onto a word boundary.
    ///
    /// Inside a word, walks right to the end of the word (or the end of the text). In a
    /// run of non-word characters that contains a divider, snaps back to the end of the
    /// preceding word.
    pub fn right(&self, text: &str, end: usize) -> usize {
        let end = floor_char_boundary(text, end);

        if text[end..].chars().next().is_some_and(is_word_char) {
            return text[end..]
                .char_indices()
                .find(|&(_, ch)| !is_word_char(ch))
                .map_or(text.len(), |(idx, _)| end + idx);
        }

        let run_start = prev_word_end(text, end);
        if text[run_start..end].chars().any(|ch| self.is_divider(ch)) {
            run_start
        } else {
            end
        }
    }

    /// Snaps both edges of a window.
    pub fn window(&self, text: &str, start: usize, end: usize) -> SnippetWindow {
        SnippetWindow::new(self.left(text, start), self.right(text, end))
    }

    /// Builds the window around a match, widened by `padding` characters on each side.
    ///
    /// Padding never reaches across a divider: an edge that crossed one is pulled back to
    /// the word just inside it. The result always contains the match itself.
    pub fn window_around(
        &self,
        text: &str,
        match_start: usize,
        match_end: usize,
        padding: usize,
    ) -> SnippetWindow {
        let matched = SnippetWindow::new(
            floor_char_boundary(text, match_start),
            floor_char_boundary(text, match_end),
        );

        let padded_start = text[..matched.start]
            .char_indices()
            .rev()
            .take(padding)
            .last()
            .map_or(matched.start, |(idx, _)| idx);
        let padded_end = text[matched.end..]
            .char_indices()
            .nth(padding)
            .map_or(text.len(), |(idx, _)| matched.end + idx);

        let mut window = self.window(text, padded_start, padded_end).union(&matched);
        if let Some((idx, ch)) = text[window.start..matched.start]
            .char_indices()
            .rev()
            .find(|&(_, ch)| self.is_divider(ch))
        {
            let after = window.start + idx + ch.len_utf8();
            window.start = next_word_start(text, after).min(matched.start);
        }
        if let Some((idx, _)) = text[matched.end..window.end]
            .char_indices()
            .find(|&(_, ch)| self.is_divider(ch))
        {
            window.end = prev_word_end(text, matched.end + idx).max(matched.end);
        }
        window
    }
}

/// Characters that make up words.
fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric()
}

/// Offset of the first word character at or after `from`, or the end of the text.
fn next_word_start(text: &str, from: usize) -> usize {
    text[from..]
        .char_indices()
        .find(|&(_, ch)| is_word_char(ch))
        .map_or(text.len(), |(idx, _)| from + idx)
}

/// Offset just past the last word character before `to`, or the start of the text.
fn prev_word_end(text: &str, to: usize) -> usize {
    text[..to]
        .char_indices()
        .rev()
        .find(|&(_, ch)| is_word_char(ch))
        .map_or(0, |(idx, ch)| idx + ch.len_utf8())
}

/// Clamps `idx` into `text` and moves it back onto a `char` boundary.
fn floor_char_boundary(text: &str, idx: usize) -> usize {
    let mut idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_inside_divider_run() {
        let calc = BoundaryCalculator::default();
        let text = " (;;..)Lorem Ipsum";
        assert_eq!(calc.left(text, 3), 7);
        assert_eq!(calc.left(text, 1), 7);
        assert_eq!(&text[calc.left(text, 3)..], "Lorem Ipsum");
    }

    #[test]
    fn test_left_walks_to_word_start() {
        let calc = BoundaryCalculator::default();
        let text = "Lorem Ipsum dolor";
        assert_eq!(calc.left(text, 9), 6);
        assert_eq!(calc.left(text, 3), 0);
        assert_eq!(calc.left(text, 6), 6);
        assert_eq!(calc.left(text, 0), 0);
    }

    #[test]
    fn test_left_plain_space_stays() {
        let calc = BoundaryCalculator::default();
        assert_eq!(calc.left("foo  bar", 4), 4);
    }

    #[test]
    fn test_right_inside_divider_run() {
        let calc = BoundaryCalculator::default();
        let text = "Lorem Ipsum (;;..) dolor";
        assert_eq!(calc.right(text, 15), 11);
        assert_eq!(&text[..calc.right(text, 15)], "Lorem Ipsum");
    }

    #[test]
    fn test_right_walks_to_word_end() {
        let calc = BoundaryCalculator::default();
        let text = "Lorem Ipsum dolor";
        assert_eq!(calc.right(text, 8), 11);
        assert_eq!(calc.right(text, 14), 17);
        assert_eq!(calc.right(text, 11), 11);
        assert_eq!(calc.right(text, 100), 17);
    }

    #[test]
    fn test_custom_dividers() {
        let text = "one ,, two";
        assert_eq!(BoundaryCalculator::new(",").left(text, 5), 7);
        assert_eq!(BoundaryCalculator::new(";").left(text, 5), 5);
    }

    #[test]
    fn test_multibyte_offsets() {
        let calc = BoundaryCalculator::default();
        let text = "Straße über Köln";
        // Offset 5 is inside 'ß'
        assert_eq!(calc.left(text, 5), 0);
        let end = calc.right(text, 9);
        assert_eq!(&text[..end], "Straße über");
    }

    #[test]
    fn test_window_around_contains_match() {
        let calc = BoundaryCalculator::default();
        let text = "The quick brown fox jumps over the lazy dog";
        let window = calc.window_around(text, 16, 19, 8);
        assert_eq!(window.slice(text), "quick brown fox jumps over");
    }

    #[test]
    fn test_window_around_stops_at_dividers() {
        let calc = BoundaryCalculator::default();
        let text = "First sentence. Second part (note) ends";
        assert_eq!(calc.window_around(text, 16, 22, 8).slice(text), "Second part");
        assert_eq!(calc.window_around(text, 16, 22, 3).slice(text), "Second part");
    }

    #[test]
    fn test_window_around_zero_padding() {
        let calc = BoundaryCalculator::default();
        let text = "alpha beta gamma";
        let window = calc.window_around(text, 6, 10, 0);
        assert_eq!(window.slice(text), "beta");
    }

    #[test]
    fn test_window_helpers() {
        let a = SnippetWindow::new(10, 2);
        assert_eq!(a, SnippetWindow { start: 2, end: 10 });
        assert_eq!(a.len(), 8);
        let b = SnippetWindow::new(10, 12);
        assert!(a.touches(&b));
        assert_eq!(a.union(&b), SnippetWindow::new(2, 12));
        assert!(a.union(&b).contains(&b));
        assert!(!SnippetWindow::new(13, 14).touches(&a));
        assert!(SnippetWindow::new(4, 4).is_empty());
    }
}
