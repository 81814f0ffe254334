//! Flat document-symbol outline of a compilation unit.

use cms2_parser::cms2::SemanticModel;
use lsp_types::{Position, Range, SymbolKind};
use std::collections::BTreeSet;

/// One outline entry, already carrying protocol ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    pub detail: Option<String>,
    /// Full extent of the declaration, end line inclusive of the block close.
    pub range: Range,
    /// The name on the declaration line.
    pub selection_range: Range,
}

fn spanning(name: &str, line_start: usize, line_end: Option<usize>) -> (Range, Range) {
    let start = Position::new(line_start as u32, 0);
    let range = Range::new(start, Position::new(line_end.unwrap_or(line_start) as u32, 0));
    let selection = Range::new(start, Position::new(line_start as u32, name.len() as u32));
    (range, selection)
}

fn entry(
    name: &str,
    kind: SymbolKind,
    detail: impl Into<String>,
    line_start: usize,
    line_end: Option<usize>,
) -> DocumentSymbolInfo {
    let (range, selection_range) = spanning(name, line_start, line_end);
    DocumentSymbolInfo {
        name: name.to_string(),
        kind,
        detail: Some(detail.into()),
        range,
        selection_range,
    }
}

/// The outline: system blocks first, then variables, tables, procedures,
/// functions, and types.
pub fn document_symbols(model: &SemanticModel) -> Vec<DocumentSymbolInfo> {
    let mut symbols = Vec::new();

    for (name, block) in &model.sys_data_blocks {
        symbols.push(entry(name, SymbolKind::MODULE, "SYS-DD", block.line_start, block.line_end));
    }

    for (name, block) in &model.sys_proc_blocks {
        let detail = if block.is_reentrant { "SYS-PROC-REN" } else { "SYS-PROC" };
        symbols.push(entry(name, SymbolKind::MODULE, detail, block.line_start, block.line_end));
    }

    let mut seen = BTreeSet::new();
    for (name, var) in &model.variables {
        if !name.contains('.') && seen.insert(name.clone()) {
            symbols.push(entry(name, SymbolKind::VARIABLE, var.type_spec(), var.line, None));
        }
    }

    for (name, table) in &model.tables {
        symbols.push(entry(
            name,
            SymbolKind::STRUCT,
            format!("TABLE {}", table.kind.code()),
            table.line_start,
            table.line_end,
        ));
    }

    for (name, proc) in &model.procedures {
        let detail = if proc.is_exec { "EXEC-PROC" } else { "PROCEDURE" };
        symbols.push(entry(name, SymbolKind::METHOD, detail, proc.line_start, proc.line_end));
    }

    for (name, func) in &model.functions {
        symbols.push(entry(
            name,
            SymbolKind::FUNCTION,
            format!("FUNCTION -> {}", func.return_type.as_deref().unwrap_or("void")),
            func.line_start,
            func.line_end,
        ));
    }

    for (name, typedef) in &model.types {
        symbols.push(entry(
            name,
            SymbolKind::TYPE_PARAMETER,
            "TYPE",
            typedef.line_start,
            typedef.line_end,
        ));
    }

    symbols
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms2_parser::cms2::parse_source;

    const SOURCE: &str = "\
NAVDD SYS-DD $
VRBL ALTITUDE I 16 S $
TABLE WAYPOINTS V NONE 4 $
END-TABLE WAYPOINTS $
END-SYS-DD NAVDD $
NAVSP SYS-PROC-REN $
PROCEDURE CLIMB $
END-PROC CLIMB $
END-SYS-PROC NAVSP $
";

    fn find<'a>(symbols: &'a [DocumentSymbolInfo], name: &str) -> &'a DocumentSymbolInfo {
        symbols.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn outline_covers_every_declaration_kind() {
        let symbols = document_symbols(&parse_source(SOURCE));
        assert_eq!(symbols.len(), 5);

        let block = find(&symbols, "NAVDD");
        assert_eq!(block.kind, SymbolKind::MODULE);
        assert_eq!(block.detail.as_deref(), Some("SYS-DD"));
        assert_eq!(block.range.start.line, 0);
        assert_eq!(block.range.end.line, 4);

        let reentrant = find(&symbols, "NAVSP");
        assert_eq!(reentrant.detail.as_deref(), Some("SYS-PROC-REN"));

        assert_eq!(find(&symbols, "WAYPOINTS").kind, SymbolKind::STRUCT);
        assert_eq!(find(&symbols, "CLIMB").detail.as_deref(), Some("PROCEDURE"));
    }

    #[test]
    fn selection_range_spans_the_name() {
        let symbols = document_symbols(&parse_source(SOURCE));
        let var = find(&symbols, "ALTITUDE");
        assert_eq!(var.selection_range.start.line, 1);
        assert_eq!(var.selection_range.end.character, 8);
    }

    #[test]
    fn scoped_variable_keys_appear_once() {
        let symbols = document_symbols(&parse_source(SOURCE));
        let count = symbols.iter().filter(|s| s.name == "ALTITUDE").count();
        assert_eq!(count, 1);
        assert!(symbols.iter().all(|s| !s.name.contains('.')));
    }
}
