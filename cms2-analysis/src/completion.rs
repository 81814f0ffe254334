//! Completion candidates from keywords, intrinsics, and declared symbols.

use cms2_parser::cms2::keywords::{
    keyword_description, predefined_description, PREDEFINED_FUNCTIONS, RESERVED_WORDS,
};
use cms2_parser::cms2::SemanticModel;
use lsp_types::CompletionItemKind;

use crate::words::prefix_before;

/// A semantic completion candidate, translated into protocol items by the
/// language server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    pub label: String,
    pub detail: Option<String>,
    pub kind: CompletionItemKind,
    pub documentation: Option<String>,
}

impl CompletionCandidate {
    fn new(label: impl Into<String>, kind: CompletionItemKind) -> Self {
        Self {
            label: label.into(),
            detail: None,
            kind,
            documentation: None,
        }
    }

    fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// Produce completion candidates for the cursor position.
///
/// The prefix is the partially typed word before the cursor; an empty prefix
/// offers everything. Candidates cover reserved words, predefined functions,
/// and every symbol the model declares.
pub fn completion_items(
    model: &SemanticModel,
    line_text: &str,
    character: usize,
) -> Vec<CompletionCandidate> {
    let prefix = prefix_before(line_text, character);
    let matches = |label: &str| prefix.is_empty() || label.starts_with(&prefix);
    let mut items = Vec::new();

    for keyword in RESERVED_WORDS.iter().filter(|kw| matches(kw)) {
        items.push(
            CompletionCandidate::new(*keyword, CompletionItemKind::KEYWORD)
                .with_detail("CMS-2 keyword")
                .with_documentation(keyword_description(keyword)),
        );
    }

    for func in PREDEFINED_FUNCTIONS.iter().filter(|f| matches(f)) {
        items.push(
            CompletionCandidate::new(*func, CompletionItemKind::FUNCTION)
                .with_detail("Predefined function")
                .with_documentation(predefined_description(func)),
        );
    }

    for (name, var) in &model.variables {
        // Scope-qualified duplicate keys stay out of the list.
        if !name.contains('.') && matches(name) {
            items.push(
                CompletionCandidate::new(name, CompletionItemKind::VARIABLE)
                    .with_detail(var.type_spec())
                    .with_documentation(format!("Variable declared at line {}", var.line + 1)),
            );
        }
    }

    for (name, table) in &model.tables {
        if matches(name) {
            items.push(
                CompletionCandidate::new(name, CompletionItemKind::STRUCT)
                    .with_detail(format!("TABLE {} {}", table.kind.code(), table.packing))
                    .with_documentation(format!("Table with {} fields", table.fields.len())),
            );
        }
    }

    for (name, proc) in &model.procedures {
        if matches(name) {
            let params: Vec<&str> = proc
                .input_params
                .iter()
                .chain(&proc.output_params)
                .map(String::as_str)
                .collect();
            items.push(
                CompletionCandidate::new(name, CompletionItemKind::METHOD)
                    .with_detail(format!("PROCEDURE ({})", params.join(", ")))
                    .with_documentation(format!("Procedure at line {}", proc.line_start + 1)),
            );
        }
    }

    for (name, func) in &model.functions {
        if matches(name) {
            let ret = func.return_type.as_deref().unwrap_or("void");
            items.push(
                CompletionCandidate::new(name, CompletionItemKind::FUNCTION)
                    .with_detail(format!("FUNCTION -> {ret}"))
                    .with_documentation(format!("Function at line {}", func.line_start + 1)),
            );
        }
    }

    for (name, typedef) in &model.types {
        if matches(name) {
            items.push(
                CompletionCandidate::new(name, CompletionItemKind::TYPE_PARAMETER)
                    .with_detail("TYPE")
                    .with_documentation(format!("Type defined at line {}", typedef.line_start + 1)),
            );
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms2_parser::cms2::parse_source;

    const SOURCE: &str = "\
NAVDD SYS-DD $
VRBL ALTITUDE I 16 S $
TABLE WAYPOINTS V MEDIUM 10 $
END-TABLE WAYPOINTS $
END-SYS-DD NAVDD $
PROCEDURE VARY_SPEED INPUT DELTA $
END-PROC VARY_SPEED $
";

    fn labels(items: &[CompletionCandidate]) -> Vec<&str> {
        items.iter().map(|item| item.label.as_str()).collect()
    }

    #[test]
    fn empty_prefix_offers_keywords_and_symbols() {
        let model = parse_source(SOURCE);
        let items = completion_items(&model, "", 0);
        let labels = labels(&items);
        assert!(labels.contains(&"VRBL"));
        assert!(labels.contains(&"SIN"));
        assert!(labels.contains(&"ALTITUDE"));
        assert!(labels.contains(&"WAYPOINTS"));
        assert!(labels.contains(&"VARY_SPEED"));
    }

    #[test]
    fn prefix_filters_by_leading_match() {
        let model = parse_source(SOURCE);
        let items = completion_items(&model, "SET VAR", 7);
        let labels = labels(&items);
        assert!(labels.contains(&"VARY"));
        assert!(labels.contains(&"VARYING"));
        assert!(labels.contains(&"VARY_SPEED"));
        assert!(!labels.contains(&"ALTITUDE"));
    }

    #[test]
    fn variable_candidates_carry_type_detail() {
        let model = parse_source(SOURCE);
        let items = completion_items(&model, "ALT", 3);
        let alt = items.iter().find(|item| item.label == "ALTITUDE").unwrap();
        assert_eq!(alt.kind, CompletionItemKind::VARIABLE);
        assert_eq!(alt.detail.as_deref(), Some("I 16 S"));
        assert_eq!(
            alt.documentation.as_deref(),
            Some("Variable declared at line 2")
        );
    }

    #[test]
    fn scoped_duplicate_keys_are_hidden() {
        let model = parse_source(SOURCE);
        let items = completion_items(&model, "", 0);
        assert!(!labels(&items).iter().any(|label| label.contains('.')));
    }

    #[test]
    fn table_and_procedure_details() {
        let model = parse_source(SOURCE);
        let items = completion_items(&model, "", 0);
        let table = items.iter().find(|item| item.label == "WAYPOINTS").unwrap();
        assert_eq!(table.detail.as_deref(), Some("TABLE V MEDIUM"));
        let proc = items.iter().find(|item| item.label == "VARY_SPEED").unwrap();
        assert_eq!(proc.detail.as_deref(), Some("PROCEDURE (DELTA)"));
    }
}
