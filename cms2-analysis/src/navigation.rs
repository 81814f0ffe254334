//! Go-to-definition and find-references.

use cms2_parser::cms2::range::{Position, Range};
use cms2_parser::cms2::SemanticModel;
use regex::Regex;

use crate::words::utf16_column;

/// Line of the declaration for a symbol name, if the model knows it.
///
/// Lookup precedence is the same as hover: variable, table, procedure,
/// function, type.
pub fn definition_line(model: &SemanticModel, name: &str) -> Option<usize> {
    let name = name.to_uppercase();
    if let Some(var) = model.variable(&name) {
        return Some(var.line);
    }
    if let Some(table) = model.table(&name) {
        return Some(table.line_start);
    }
    if let Some(proc) = model.procedure(&name) {
        return Some(proc.line_start);
    }
    if let Some(func) = model.function(&name) {
        return Some(func.line_start);
    }
    model.type_def(&name).map(|typedef| typedef.line_start)
}

/// All whole-word occurrences of `word` in the document, case-insensitive.
///
/// Reference search is textual: occurrences inside comments count too, the
/// same way grep would find them. Columns are UTF-16 units, ready to send
/// back to the editor.
pub fn find_references(text: &str, word: &str) -> Vec<Range> {
    let Ok(pattern) = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word))) else {
        return Vec::new();
    };

    let mut references = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        for m in pattern.find_iter(line) {
            references.push(Range {
                start: Position {
                    line: line_no,
                    column: utf16_column(line, m.start()),
                },
                end: Position {
                    line: line_no,
                    column: utf16_column(line, m.end()),
                },
            });
        }
    }
    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms2_parser::cms2::parse_source;

    const SOURCE: &str = "\
NAVDD SYS-DD $
VRBL ALTITUDE I 16 S $
END-SYS-DD NAVDD $
PROCEDURE CLIMB $
SET ALTITUDE TO ALTITUDE + 100 $
END-PROC CLIMB $
";

    #[test]
    fn definition_points_at_declaration_line() {
        let model = parse_source(SOURCE);
        assert_eq!(definition_line(&model, "ALTITUDE"), Some(1));
        assert_eq!(definition_line(&model, "altitude"), Some(1));
        assert_eq!(definition_line(&model, "CLIMB"), Some(3));
        assert_eq!(definition_line(&model, "NOWHERE"), None);
    }

    #[test]
    fn references_cover_every_occurrence() {
        let refs = find_references(SOURCE, "ALTITUDE");
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].start.line, 1);
        assert_eq!(refs[1].start.line, 4);
        assert_eq!(refs[1].start.column, 4);
        assert_eq!(refs[2].start.column, 16);
    }

    #[test]
    fn references_are_whole_word_only() {
        let refs = find_references("ALT ALTITUDE MYALT", "ALT");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].start.column, 0);
    }

    #[test]
    fn references_are_case_insensitive() {
        let refs = find_references("vrbl Speed i 16 s $\nSET SPEED TO 1 $", "SPEED");
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn reference_columns_count_utf16_units() {
        // é occupies two bytes but one column.
        let refs = find_references("''héllo'' ALT $", "ALT");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].start.column, 10);
        assert_eq!(refs[0].end.column, 13);
    }
}
