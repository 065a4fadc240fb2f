//! Plain-text normalization for extracted content.

use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("BLANK_LINE_RUN: hardcoded regex is valid"));

/// Trim trailing spaces on every line and collapse newline runs
///
/// Only `' '` is trimmed, and only on the right; tabs and leading
/// indentation are kept. Every run of two or more `\n` becomes one `\n`.
/// The start and end of the whole string are otherwise left alone.
#[must_use]
pub fn default_text_tidier(text: &str) -> String {
    let trimmed = text
        .split('\n')
        .map(|line| line.trim_end_matches(' '))
        .collect::<Vec<_>>()
        .join("\n");

    BLANK_LINE_RUN.replace_all(&trimmed, "\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_blank_lines_and_trailing_spaces() {
        assert_eq!(default_text_tidier("line1   \n\n\n\nline2"), "line1\nline2");
    }

    #[test]
    fn spaces_only_lines_collapse_too() {
        assert_eq!(default_text_tidier("a  \n   \n \nb "), "a\nb");
    }

    #[test]
    fn keeps_tabs_and_leading_whitespace() {
        assert_eq!(default_text_tidier("  indented\t\n\tnext"), "  indented\t\n\tnext");
    }

    #[test]
    fn keeps_single_leading_and_trailing_newline() {
        assert_eq!(default_text_tidier("\n\n\nbody\n\n"), "\nbody\n");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(default_text_tidier(""), "");
    }
}
