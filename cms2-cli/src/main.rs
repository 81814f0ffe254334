//! Command-line inspector for CMS-2 sources.
//!
//! Usage:
//!   cms2 `<path>` [--format `<format>`]   - Print the declaration outline of a source file

use clap::{Arg, Command};
use cms2_parser::cms2::model::SemanticModel;
use cms2_parser::cms2::parse_source;

fn main() {
    let matches = Command::new("cms2")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting CMS-2 source files")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the CMS-2 source file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: text or json")
                .default_value("text"),
        )
        .get_matches();

    let path = matches
        .get_one::<String>("path")
        .expect("path is required");
    let format = matches.get_one::<String>("format").expect("has default");

    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {}", path, e);
        std::process::exit(1);
    });

    let model = parse_source(&source);

    match format.as_str() {
        "text" => print_outline(&model),
        "json" => {
            let json = serde_json::to_string_pretty(&model).unwrap_or_else(|e| {
                eprintln!("Error serializing model: {}", e);
                std::process::exit(1);
            });
            println!("{}", json);
        }
        other => {
            eprintln!("Format '{}' not supported", other);
            eprintln!("Available formats: text, json");
            std::process::exit(1);
        }
    }
}

/// Print the declaration outline the way the model groups it.
fn print_outline(model: &SemanticModel) {
    let variables: Vec<_> = model
        .variables
        .iter()
        .filter(|(name, _)| !name.contains('.'))
        .collect();

    println!("System Data Blocks ({}):", model.sys_data_blocks.len());
    for (name, block) in &model.sys_data_blocks {
        println!("  {} (lines {}-{})", name, block.line_start + 1, end_line(block.line_end, block.line_start));
    }

    println!("\nSystem Proc Blocks ({}):", model.sys_proc_blocks.len());
    for (name, block) in &model.sys_proc_blocks {
        println!("  {} (lines {}-{})", name, block.line_start + 1, end_line(block.line_end, block.line_start));
    }

    println!("\nVariables ({}):", variables.len());
    for (name, var) in &variables {
        println!("  {}: {}", name, var.type_spec());
    }

    println!("\nTables ({}):", model.tables.len());
    for (name, table) in &model.tables {
        println!(
            "  {} {} {} [{} items]",
            name,
            table.kind.code(),
            table.packing,
            table.item_count.unwrap_or(0)
        );
        for (field_name, field) in &table.fields {
            println!("    .{}: {}", field_name, field.mode.code());
        }
    }

    println!("\nTypes ({}):", model.types.len());
    for (name, typedef) in &model.types {
        if typedef.status_values.is_empty() {
            println!("  {}: {}", name, typedef.packing);
        } else {
            println!("  {}: STATUS ({})", name, typedef.status_values.join(", "));
        }
    }

    println!("\nProcedures ({}):", model.procedures.len());
    for (name, proc) in &model.procedures {
        let mut clauses = String::new();
        if !proc.input_params.is_empty() {
            clauses.push_str(&format!("INPUT {}", proc.input_params.join(", ")));
        }
        if !proc.output_params.is_empty() {
            if !clauses.is_empty() {
                clauses.push(' ');
            }
            clauses.push_str(&format!("OUTPUT {}", proc.output_params.join(", ")));
        }
        println!("  {} {}", name, clauses);
    }

    println!("\nFunctions ({}):", model.functions.len());
    for (name, func) in &model.functions {
        println!(
            "  {}({}) -> {}",
            name,
            func.input_params.join(", "),
            func.return_type.as_deref().unwrap_or("void")
        );
    }
}

fn end_line(line_end: Option<usize>, line_start: usize) -> usize {
    line_end.unwrap_or(line_start) + 1
}
