//! Word extraction from source positions.
//!
//! CMS-2 identifiers and keywords may contain hyphens (`SYS-DD`,
//! `END-PROC`), so word boundaries here include the full hyphenated token
//! rather than stopping at the dash. Lookups are case-insensitive; the
//! returned text is uppercased to match the model's keys.
//!
//! Positions and columns are UTF-16 code units, the unit editors use on the
//! wire; they are converted to byte offsets before any slicing.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9_-]*").unwrap());

/// A word found at a cursor position, with its column span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// Uppercased word text.
    pub text: String,
    /// Start column (zero-based, inclusive, UTF-16 units).
    pub start: usize,
    /// End column (exclusive, UTF-16 units).
    pub end: usize,
}

/// Byte offset of the UTF-16 column `character` in `line`, clamped to the
/// end of the line.
pub fn byte_offset(line: &str, character: usize) -> usize {
    let mut units = 0;
    for (idx, ch) in line.char_indices() {
        if units >= character {
            return idx;
        }
        units += ch.len_utf16();
    }
    line.len()
}

/// UTF-16 column of the byte offset `byte` in `line`.
pub fn utf16_column(line: &str, byte: usize) -> usize {
    line.char_indices()
        .take_while(|(idx, _)| *idx < byte)
        .map(|(_, ch)| ch.len_utf16())
        .sum()
}

/// Find the word covering `character` in a single line.
///
/// A cursor sitting directly after the last character of a word still counts
/// as being on that word, matching editor hover behavior.
pub fn word_at(line: &str, character: usize) -> Option<Word> {
    let offset = byte_offset(line, character);
    WORD.find_iter(line)
        .find(|m| m.start() <= offset && offset <= m.end())
        .map(|m| Word {
            text: m.as_str().to_uppercase(),
            start: utf16_column(line, m.start()),
            end: utf16_column(line, m.end()),
        })
}

/// Find the word at a (line, character) position in a full document.
pub fn word_at_position(text: &str, line: usize, character: usize) -> Option<Word> {
    text.lines().nth(line).and_then(|l| word_at(l, character))
}

/// The partially typed word ending at `character`, used as a completion
/// prefix. Empty when the cursor follows whitespace.
pub fn prefix_before(line: &str, character: usize) -> String {
    let upto = &line[..byte_offset(line, character)];
    upto.split_whitespace()
        .last()
        .filter(|_| !upto.ends_with(char::is_whitespace))
        .map(|word| word.to_uppercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_word_under_cursor() {
        let word = word_at("SET ALTITUDE TO 5 $", 6).unwrap();
        assert_eq!(word.text, "ALTITUDE");
        assert_eq!(word.start, 4);
        assert_eq!(word.end, 12);
    }

    #[test]
    fn cursor_at_word_end_is_inclusive() {
        assert_eq!(word_at("VRBL X", 6).unwrap().text, "X");
    }

    #[test]
    fn hyphenated_keywords_are_one_word() {
        let word = word_at("END-SYS-DD TESTDD $", 5).unwrap();
        assert_eq!(word.text, "END-SYS-DD");
    }

    #[test]
    fn no_word_on_whitespace_or_digits() {
        assert_eq!(word_at("SET  X", 4), None);
        assert_eq!(word_at("16", 1), None);
    }

    #[test]
    fn lowercase_source_is_uppercased() {
        assert_eq!(word_at("vrbl altitude", 8).unwrap().text, "ALTITUDE");
    }

    #[test]
    fn position_lookup_spans_lines() {
        let text = "VRBL A I 16 S $\nVRBL LONGNAME F $";
        assert_eq!(word_at_position(text, 1, 7).unwrap().text, "LONGNAME");
        assert_eq!(word_at_position(text, 5, 0), None);
    }

    #[test]
    fn prefix_is_last_token_before_cursor() {
        assert_eq!(prefix_before("VRBL ALT", 8), "ALT");
        assert_eq!(prefix_before("VRBL ALT ", 9), "");
        assert_eq!(prefix_before("", 0), "");
        assert_eq!(prefix_before("set alt", 7), "ALT");
    }

    #[test]
    fn multibyte_comment_text_does_not_split_chars() {
        // é is two bytes but a single UTF-16 unit; columns count units.
        let line = "''héllo'' VRBL X";
        assert_eq!(prefix_before(line, 4), "''HÉ");
        let word = word_at(line, 11).unwrap();
        assert_eq!(word.text, "VRBL");
        assert_eq!(word.start, 10);
        assert_eq!(word.end, 14);
    }

    #[test]
    fn offsets_past_end_of_line_clamp() {
        assert_eq!(byte_offset("héllo", 99), 6);
        assert_eq!(prefix_before("héllo", 99), "HÉLLO");
        assert_eq!(utf16_column("héllo", 6), 5);
    }
}
