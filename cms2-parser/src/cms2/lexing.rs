//! Statement-level tokens for CMS-2 source lines.
//!
//! CMS-2 is column-free: statements are free-form token sequences terminated
//! by `$`, comments are enclosed in doubled apostrophes (`'' like this ''`),
//! and status constants are single-quoted names (`'ACTIVE'`). The lexer works
//! on one line at a time; a comment left open at end of line runs to the end
//! of that line only.

use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    /// Comment delimiter; comments toggle on and off at each `''`.
    #[token("''")]
    CommentMarker,

    /// Status constant such as `'ACTIVE'`.
    #[regex(r"'[A-Za-z][A-Za-z0-9]*'")]
    StatusConstant,

    /// Statement terminator.
    #[token("$")]
    Terminator,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[regex(r"[0-9]+")]
    Number,

    /// Identifiers and keywords; hyphens are significant (`SYS-DD`, `END-PROC`).
    #[regex(r"[A-Za-z][A-Za-z0-9_-]*")]
    Word,

    #[regex(r"[ \t]+")]
    Whitespace,

    /// Any other single character (operators, stray punctuation).
    #[regex(r".", priority = 1)]
    Other,
}

/// Remove CMS-2 comments from a single source line.
///
/// Comment state does not carry across lines, matching the CMS-2 convention
/// that an unterminated comment is cut off at end of line.
pub fn strip_comments(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut in_comment = false;
    let mut lexer = Token::lexer(line);
    while let Some(token) = lexer.next() {
        match token {
            Ok(Token::CommentMarker) => in_comment = !in_comment,
            _ if in_comment => {}
            _ => result.push_str(lexer.slice()),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<Token> {
        Token::lexer(line)
            .filter_map(|token| token.ok())
            .filter(|token| *token != Token::Whitespace)
            .collect()
    }

    #[test]
    fn lexes_declaration_statement() {
        assert_eq!(
            tokens("VRBL ALTITUDE I 16 S $"),
            vec![
                Token::Word,
                Token::Word,
                Token::Word,
                Token::Number,
                Token::Word,
                Token::Terminator,
            ]
        );
    }

    #[test]
    fn hyphenated_keywords_are_single_words() {
        let mut lexer = Token::lexer("END-SYS-DD TESTDD $");
        assert_eq!(lexer.next(), Some(Ok(Token::Word)));
        assert_eq!(lexer.slice(), "END-SYS-DD");
    }

    #[test]
    fn status_constants_are_not_comments() {
        assert_eq!(
            tokens("TYPE MODE 'OFF', 'ACTIVE' $"),
            vec![
                Token::Word,
                Token::Word,
                Token::StatusConstant,
                Token::Comma,
                Token::StatusConstant,
                Token::Terminator,
            ]
        );
    }

    #[test]
    fn strips_enclosed_comment() {
        assert_eq!(
            strip_comments("VRBL A ''the altitude'' I 16 S $"),
            "VRBL A  I 16 S $"
        );
    }

    #[test]
    fn strips_unterminated_comment_to_end_of_line() {
        assert_eq!(strip_comments("SET X TO 1 $ ''trailing note"), "SET X TO 1 $ ");
    }

    #[test]
    fn keeps_status_constants_outside_comments() {
        assert_eq!(
            strip_comments("''mode'' TYPE MODE 'OFF' $"),
            " TYPE MODE 'OFF' $"
        );
    }
}
