//! Hover markdown for the symbol under the cursor.
//!
//! Lookup order matches symbol precedence: declared variables shadow tables,
//! tables shadow procedures, and so on down to reserved words and predefined
//! functions. Declared symbols render as a fenced `cms2` declaration snippet;
//! keywords render as bold name plus description.

use cms2_parser::cms2::keywords::{
    is_predefined, is_reserved, keyword_description, predefined_description,
};
use cms2_parser::cms2::SemanticModel;

use crate::words::word_at_position;

/// Hover markdown for the word at a document position.
pub fn hover_at(model: &SemanticModel, text: &str, line: usize, character: usize) -> Option<String> {
    let word = word_at_position(text, line, character)?;
    hover_markdown(model, &word.text)
}

/// Hover markdown for a resolved word.
pub fn hover_markdown(model: &SemanticModel, word: &str) -> Option<String> {
    if let Some(var) = model.variable(word) {
        let mut md = format!("```cms2\nVRBL {} {}\n```\n", var.name, var.type_spec());
        if let Some(modifier) = var.modifier {
            md.push_str(&format!("**Modifier:** ({modifier})\n\n"));
        }
        md.push_str(&format!("*Declared at line {}*", var.line + 1));
        return Some(md);
    }

    if let Some(table) = model.table(word) {
        let mut md = format!(
            "```cms2\nTABLE {} {} {} {}\n```\n",
            table.name,
            table.kind.code(),
            table.packing,
            table.item_count.unwrap_or(0)
        );
        if !table.fields.is_empty() {
            let names: Vec<&str> = table.fields.keys().take(5).map(String::as_str).collect();
            md.push_str(&format!("**Fields:** {}", names.join(", ")));
            if table.fields.len() > 5 {
                md.push_str(&format!(" (+{} more)", table.fields.len() - 5));
            }
        }
        return Some(md);
    }

    if let Some(proc) = model.procedure(word) {
        let head = if proc.is_exec { "EXEC-PROC" } else { "PROCEDURE" };
        let mut md = format!("```cms2\n{head} {}", proc.name);
        if !proc.input_params.is_empty() {
            md.push_str(&format!(" INPUT {}", proc.input_params.join(", ")));
        }
        if !proc.output_params.is_empty() {
            md.push_str(&format!(" OUTPUT {}", proc.output_params.join(", ")));
        }
        md.push_str("\n```");
        return Some(md);
    }

    if let Some(func) = model.function(word) {
        return Some(format!(
            "```cms2\nFUNCTION {}({}) {}\n```",
            func.name,
            func.input_params.join(", "),
            func.return_type.as_deref().unwrap_or("void")
        ));
    }

    if let Some(typedef) = model.type_def(word) {
        if typedef.status_values.is_empty() {
            return Some(format!(
                "```cms2\nTYPE {} {}\n```",
                typedef.name, typedef.packing
            ));
        }
        let shown: Vec<&str> = typedef
            .status_values
            .iter()
            .take(4)
            .map(String::as_str)
            .collect();
        let ellipsis = if typedef.status_values.len() > 4 { "..." } else { "" };
        return Some(format!(
            "```cms2\nTYPE {} {}{}\n```",
            typedef.name,
            shown.join(", "),
            ellipsis
        ));
    }

    if is_reserved(word) {
        return Some(format!("**{word}**\n\n{}", keyword_description(word)));
    }

    if is_predefined(word) {
        return Some(format!(
            "**{word}**\n\n{}\n\n*Predefined CMS-2 function*",
            predefined_description(word)
        ));
    }

    None
}
