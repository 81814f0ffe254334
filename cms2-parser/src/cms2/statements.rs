//! Assembly of `$`-terminated CMS-2 statements.
//!
//! Statements may span any number of lines and several may share one line.
//! The assembler strips comments, joins continuation lines with a single
//! space, and attributes each statement to the line holding its terminating
//! `$` — the same attribution the reference tooling uses, so declaration
//! line numbers agree with it.

use logos::Logos;

use crate::cms2::lexing::Token;

/// A complete statement with its terminating line number (zero-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub text: String,
    pub line: usize,
}

/// Split CMS-2 source into complete statements.
///
/// Text after the final `$` of the source never forms a statement.
pub fn assemble(source: &str) -> Vec<Statement> {
    let mut statements = Vec::new();
    let mut buffer = String::new();

    for (line_no, raw) in source.lines().enumerate() {
        let mut in_comment = false;
        let mut lexer = Token::lexer(raw);
        while let Some(token) = lexer.next() {
            match token {
                Ok(Token::CommentMarker) => in_comment = !in_comment,
                _ if in_comment => {}
                Ok(Token::Terminator) => {
                    let text = normalize(&buffer);
                    buffer.clear();
                    if !text.is_empty() {
                        statements.push(Statement { text, line: line_no });
                    }
                }
                _ => buffer.push_str(lexer.slice()),
            }
        }
        // Line breaks separate tokens within a continued statement.
        buffer.push(' ');
    }

    statements
}

fn normalize(buffer: &str) -> String {
    buffer.split_whitespace().collect::<Vec<_>>().join(" ")
}
