//! Declaration recognition over assembled statements.
//!
//! The parser is a statement-at-a-time recognizer: it classifies each
//! `$`-terminated statement and updates the [`SemanticModel`] plus a small
//! amount of block state (which SYS-DD / SYS-PROC / TABLE / PROCEDURE is
//! currently open). Statements it does not recognize are skipped; the model
//! is best-effort by design and parsing never fails.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cms2::model::{
    ConstantMode, DataMode, FieldDef, FunctionDef, Modifier, Packing, ProcedureDef, SemanticModel,
    SystemDataBlock, SystemProcBlock, TableDef, TableKind, TypeDef, VariableDef, GLOBAL_SCOPE,
};
use crate::cms2::statements::{self, Statement};

static SYS_DD_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([A-Z][A-Z0-9_]*)\s+SYS-DD").unwrap());
static SYS_PROC_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^([A-Z][A-Z0-9_]*)\s+SYS-PROC").unwrap());
static VRBL_MULTI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^VRBL\s*\(([^)]+)\)\s+(.+)$").unwrap());
static VRBL_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^VRBL\s+([A-Z][A-Z0-9_]*)\s+(.+)$").unwrap());
static INT_SPEC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^I\s+(\d+)\s+(S|U)").unwrap());
static FIXED_SPEC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^A\s+(\d+)\s+(S|U)\s+(\d+)").unwrap());
static FLOAT_SPEC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^F(\s*\([TRSD]\))?").unwrap());
static CHAR_SPEC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[HC]\s*(\d+)").unwrap());
static PRESET_SPEC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bP\s+(\S+)").unwrap());
static STATUS_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'([A-Za-z][A-Za-z0-9]*)'").unwrap());
static TABLE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^TABLE\s+([A-Z][A-Z0-9_]*)\s+([VH])\s*(NONE|MEDIUM|DENSE)?\s*(?:\(([^)]+)\))?\s*(?:INDIRECT\s+)?(\d+|[A-Z][A-Z0-9_]*)?",
    )
    .unwrap()
});
static MAJOR_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bMJ\s+([A-Z][A-Z0-9]*)").unwrap());
static FIELD_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^FIELD\s+([A-Z][A-Z0-9_]*)\s+([IAFBHC])\s*(\d+)?\s*(S|U)?\s*(\d+)?\s*(?:(\d+)\s+(\d+))?\s*(?:P\s+(.+))?",
    )
    .unwrap()
});
static TYPE_STATUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^TYPE\s+([A-Z][A-Z0-9_]*)\s+(.+)$").unwrap());
static TYPE_STRUCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^TYPE\s+([A-Z][A-Z0-9_]*)\s*(NONE|MEDIUM|DENSE)?").unwrap());
static PROC_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^PROCEDURE\s+([A-Z][A-Z0-9_]*)\s*(?:INPUT\s+(.*?))?(?:\s+OUTPUT\s+(.*?))?(?:\s+EXIT\s+(.*))?$",
    )
    .unwrap()
});
static EXEC_PROC_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^EXEC-PROC\s+([A-Z][A-Z0-9_]*)\s*(?:INPUT\s+(.*))?$").unwrap());
static FUNCTION_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^FUNCTION\s+([A-Z][A-Z0-9_]*)\s*\(([^)]*)\)\s*(.+)?$").unwrap());

/// Parse CMS-2 source into a semantic model.
pub fn parse_source(source: &str) -> SemanticModel {
    SemanticParser::new().parse(source)
}

/// Statement-driven builder of the semantic model.
#[derive(Debug, Default)]
pub struct SemanticParser {
    model: SemanticModel,
    current_sys_dd: Option<String>,
    current_sys_proc: Option<String>,
    current_table: Option<String>,
    current_type: Option<String>,
    current_procedure: Option<String>,
    current_function: Option<String>,
}

impl SemanticParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(mut self, source: &str) -> SemanticModel {
        for statement in statements::assemble(source) {
            self.dispatch(&statement);
        }
        self.model
    }

    fn dispatch(&mut self, statement: &Statement) {
        let text = statement.text.as_str();
        let upper = text.to_uppercase();
        let line = statement.line;

        if upper.contains("SYS-DD") && !upper.contains("END-SYS-DD") {
            self.sys_dd_start(text, line);
        } else if upper.contains("END-SYS-DD") {
            self.end_sys_dd(line);
        } else if upper.contains("SYS-PROC") && !upper.contains("END-SYS-PROC") {
            self.sys_proc_start(text, &upper, line);
        } else if upper.contains("END-SYS-PROC") {
            self.end_sys_proc(line);
        } else if upper.starts_with("LOC-DD")
            || upper.contains(" LOC-DD")
            || upper.contains("END-LOC-DD")
        {
            // Local data division brackets carry no declarations of their own.
        } else if upper.starts_with("VRBL") || upper.contains(" VRBL ") {
            self.vrbl_declaration(text, line);
        } else if upper.starts_with("TABLE") || upper.contains(" TABLE ") {
            self.table_declaration(text, &upper, line);
        } else if upper.contains("END-TABLE") {
            self.end_table(line);
        } else if upper.starts_with("FIELD") {
            self.field_declaration(text, line);
        } else if upper.starts_with("TYPE") && !upper.contains("END-TYPE") {
            self.type_declaration(text, line);
        } else if upper.contains("END-TYPE") {
            self.end_type(line);
        } else if upper.starts_with("PROCEDURE")
            || upper.contains(" PROCEDURE ")
            || is_modified_declaration(&upper, "PROCEDURE")
        {
            self.procedure_declaration(text, line);
        } else if upper.starts_with("EXEC-PROC") || upper.contains(" EXEC-PROC ") {
            self.exec_proc_declaration(text, line);
        } else if upper.contains("END-PROC") {
            self.end_proc(line);
        } else if upper.starts_with("FUNCTION") || upper.contains(" FUNCTION ") {
            self.function_declaration(text, line);
        } else if upper.contains("END-FUNCTION") {
            self.end_function(line);
        } else if upper.starts_with("CMODE") {
            self.cmode_declaration(&upper);
        }
    }

    fn sys_dd_start(&mut self, text: &str, line: usize) {
        if let Some(caps) = SYS_DD_START.captures(text) {
            let name = caps[1].to_uppercase();
            self.model.sys_data_blocks.insert(
                name.clone(),
                SystemDataBlock {
                    name: name.clone(),
                    line_start: line,
                    ..SystemDataBlock::default()
                },
            );
            self.model.current_scope = name.clone();
            self.current_sys_dd = Some(name);
        }
    }

    fn end_sys_dd(&mut self, line: usize) {
        if let Some(name) = self.current_sys_dd.take() {
            if let Some(block) = self.model.sys_data_blocks.get_mut(&name) {
                block.line_end = Some(line);
            }
        }
        self.model.current_scope = GLOBAL_SCOPE.to_string();
    }

    fn sys_proc_start(&mut self, text: &str, upper: &str, line: usize) {
        let is_reentrant = upper.contains("SYS-PROC-REN");
        if let Some(caps) = SYS_PROC_START.captures(text) {
            let name = caps[1].to_uppercase();
            self.model.sys_proc_blocks.insert(
                name.clone(),
                SystemProcBlock {
                    name: name.clone(),
                    is_reentrant,
                    line_start: line,
                    ..SystemProcBlock::default()
                },
            );
            self.model.current_scope = name.clone();
            self.current_sys_proc = Some(name);
        }
    }

    fn end_sys_proc(&mut self, line: usize) {
        if let Some(name) = self.current_sys_proc.take() {
            if let Some(block) = self.model.sys_proc_blocks.get_mut(&name) {
                block.line_end = Some(line);
            }
        }
        self.model.current_scope = GLOBAL_SCOPE.to_string();
    }

    fn vrbl_declaration(&mut self, text: &str, line: usize) {
        let (modifier, rest) = split_modifier(text);

        if let Some(caps) = VRBL_MULTI.captures(rest) {
            let type_spec = caps[2].trim().to_string();
            let names: Vec<String> = caps[1]
                .split(',')
                .map(|name| name.trim().to_uppercase())
                .filter(|name| !name.is_empty())
                .collect();
            for name in names {
                self.create_variable(&name, &type_spec, modifier, line);
            }
            return;
        }

        if let Some(caps) = VRBL_SINGLE.captures(rest) {
            let name = caps[1].to_uppercase();
            let type_spec = caps[2].trim().to_string();
            self.create_variable(&name, &type_spec, modifier, line);
        }
    }

    fn create_variable(&mut self, name: &str, type_spec: &str, modifier: Option<Modifier>, line: usize) {
        let upper = type_spec.to_uppercase();
        let mut mode = DataMode::Unknown;
        let mut bits = None;
        let mut signed = true;
        let mut frac_bits = None;
        let mut char_length = None;
        let mut status_values = Vec::new();

        let int_caps = INT_SPEC.captures(&upper);
        if let Some(caps) = &int_caps {
            mode = DataMode::Integer;
            bits = caps[1].parse().ok();
            signed = &caps[2] == "S";
        }

        let fixed_caps = FIXED_SPEC.captures(&upper);
        if let Some(caps) = &fixed_caps {
            mode = DataMode::Fixed;
            bits = caps[1].parse().ok();
            signed = &caps[2] == "S";
            frac_bits = caps[3].parse().ok();
        }

        if FLOAT_SPEC.is_match(&upper) && int_caps.is_none() && fixed_caps.is_none() {
            mode = DataMode::Float;
        }

        if upper.starts_with('B') && !upper.starts_with("BY") {
            mode = DataMode::Boolean;
        }

        if let Some(caps) = CHAR_SPEC.captures(&upper) {
            mode = DataMode::Char;
            char_length = caps[1].parse().ok();
        }

        if type_spec.contains('\'') {
            status_values = STATUS_VALUE
                .captures_iter(type_spec)
                .map(|caps| caps[1].to_uppercase())
                .collect();
            if !status_values.is_empty() {
                mode = DataMode::Status;
            }
        }

        let preset_value = PRESET_SPEC
            .captures(type_spec)
            .map(|caps| caps[1].to_string());

        let var = VariableDef {
            name: name.to_string(),
            mode,
            bits,
            signed,
            frac_bits,
            char_length,
            status_values,
            preset_value,
            modifier,
            line,
            parent_block: self
                .current_sys_dd
                .clone()
                .or_else(|| self.current_sys_proc.clone()),
        };

        if let Some(block_name) = &self.current_sys_dd {
            if let Some(block) = self.model.sys_data_blocks.get_mut(block_name) {
                block.variables.insert(var.name.clone(), var.clone());
            }
        }
        if let Some(proc_name) = &self.current_procedure {
            if let Some(proc) = self.model.procedures.get_mut(proc_name) {
                proc.local_vars.insert(var.name.clone(), var.clone());
            }
        }
        if let Some(func_name) = &self.current_function {
            if let Some(func) = self.model.functions.get_mut(func_name) {
                func.local_vars.insert(var.name.clone(), var.clone());
            }
        }

        self.model.add_variable(var);
    }

    fn table_declaration(&mut self, text: &str, upper: &str, line: usize) {
        let Some(caps) = TABLE_DECL.captures(text) else {
            return;
        };

        let name = caps[1].to_uppercase();
        let kind = if caps[2].eq_ignore_ascii_case("H") {
            TableKind::Horizontal
        } else {
            TableKind::Vertical
        };
        let packing = caps
            .get(3)
            .map(|m| parse_packing(m.as_str()))
            .unwrap_or(Packing::None);
        let type_spec = caps.get(4).map(|m| m.as_str().to_string());
        let item_count = caps.get(5).and_then(|m| m.as_str().parse().ok());
        let major_index = MAJOR_INDEX
            .captures(text)
            .map(|caps| caps[1].to_uppercase());

        let table = TableDef {
            name: name.clone(),
            kind,
            packing,
            item_count,
            type_spec,
            is_indirect: upper.contains("INDIRECT"),
            major_index,
            line_start: line,
            ..TableDef::default()
        };

        self.model.add_table(table);
        self.current_table = Some(name);
    }

    fn end_table(&mut self, line: usize) {
        if let Some(name) = self.current_table.take() {
            if let Some(table) = self.model.tables.get_mut(&name) {
                table.line_end = Some(line);
            }
            // The enclosing SYS-DD keeps the finished table, fields included.
            if let Some(block_name) = &self.current_sys_dd {
                if let (Some(table), Some(block)) = (
                    self.model.tables.get(&name).cloned(),
                    self.model.sys_data_blocks.get_mut(block_name),
                ) {
                    block.tables.insert(name, table);
                }
            }
        }
    }

    fn field_declaration(&mut self, text: &str, line: usize) {
        let Some(table_name) = self.current_table.clone() else {
            return;
        };
        let Some(caps) = FIELD_DECL.captures(text) else {
            return;
        };

        let name = caps[1].to_uppercase();
        let mode_char = caps[2].to_uppercase();
        let bits: Option<u32> = caps.get(3).and_then(|m| m.as_str().parse().ok());
        let signed = caps.get(4).map(|m| !m.as_str().eq_ignore_ascii_case("U")).unwrap_or(true);
        let frac_bits = caps.get(5).and_then(|m| m.as_str().parse().ok());
        let start_word = caps.get(6).and_then(|m| m.as_str().parse().ok());
        let start_bit = caps.get(7).and_then(|m| m.as_str().parse().ok());
        let preset = caps.get(8).map(|m| m.as_str().to_string());

        let mode = match mode_char.as_str() {
            "I" => DataMode::Integer,
            "A" => DataMode::Fixed,
            "F" => DataMode::Float,
            "B" => DataMode::Boolean,
            "H" | "C" => DataMode::Char,
            _ => DataMode::Unknown,
        };

        let field = FieldDef {
            name: name.clone(),
            mode,
            bits,
            signed,
            frac_bits,
            char_length: if mode == DataMode::Char { bits } else { None },
            start_word,
            start_bit,
            preset_values: preset.into_iter().collect(),
            line,
            parent_table: Some(table_name.clone()),
        };

        if let Some(table) = self.model.tables.get_mut(&table_name) {
            table.fields.insert(name, field);
        }
    }

    fn type_declaration(&mut self, text: &str, line: usize) {
        if text.contains('\'') {
            if let Some(caps) = TYPE_STATUS.captures(text) {
                let name = caps[1].to_uppercase();
                let status_values = STATUS_VALUE
                    .captures_iter(&caps[2])
                    .map(|caps| caps[1].to_uppercase())
                    .collect();
                let typedef = TypeDef {
                    name: name.clone(),
                    status_values,
                    line_start: line,
                    ..TypeDef::default()
                };
                if let Some(block_name) = &self.current_sys_dd {
                    if let Some(block) = self.model.sys_data_blocks.get_mut(block_name) {
                        block.types.insert(name.clone(), typedef.clone());
                    }
                }
                self.model.add_type(typedef);
            }
        } else if let Some(caps) = TYPE_STRUCT.captures(text) {
            let name = caps[1].to_uppercase();
            let packing = caps
                .get(2)
                .map(|m| parse_packing(m.as_str()))
                .unwrap_or(Packing::None);
            self.model.add_type(TypeDef {
                name: name.clone(),
                packing,
                line_start: line,
                ..TypeDef::default()
            });
            self.current_type = Some(name);
        }
    }

    fn end_type(&mut self, line: usize) {
        if let Some(name) = self.current_type.take() {
            if let Some(typedef) = self.model.types.get_mut(&name) {
                typedef.line_end = Some(line);
            }
        }
    }

    fn procedure_declaration(&mut self, text: &str, line: usize) {
        let (modifier, rest) = split_modifier(text);
        let Some(caps) = PROC_DECL.captures(rest) else {
            return;
        };

        let name = caps[1].to_uppercase();
        let proc = ProcedureDef {
            name: name.clone(),
            is_exec: false,
            input_params: split_params(caps.get(2).map(|m| m.as_str()).unwrap_or("")),
            output_params: split_params(caps.get(3).map(|m| m.as_str()).unwrap_or("")),
            exit_params: split_params(caps.get(4).map(|m| m.as_str()).unwrap_or("")),
            modifier,
            line_start: line,
            ..ProcedureDef::default()
        };

        self.model.add_procedure(proc);
        self.current_procedure = Some(name);
    }

    fn exec_proc_declaration(&mut self, text: &str, line: usize) {
        let (modifier, rest) = split_modifier(text);
        let Some(caps) = EXEC_PROC_DECL.captures(rest) else {
            return;
        };

        let name = caps[1].to_uppercase();
        let proc = ProcedureDef {
            name: name.clone(),
            is_exec: true,
            input_params: split_params(caps.get(2).map(|m| m.as_str()).unwrap_or("")),
            modifier,
            line_start: line,
            ..ProcedureDef::default()
        };

        self.model.add_procedure(proc);
        self.current_procedure = Some(name);
    }

    fn end_proc(&mut self, line: usize) {
        if let Some(name) = self.current_procedure.take() {
            if let Some(proc) = self.model.procedures.get_mut(&name) {
                proc.line_end = Some(line);
            }
            if let Some(block_name) = &self.current_sys_proc {
                if let (Some(proc), Some(block)) = (
                    self.model.procedures.get(&name).cloned(),
                    self.model.sys_proc_blocks.get_mut(block_name),
                ) {
                    block.procedures.insert(name, proc);
                }
            }
        }
    }

    fn function_declaration(&mut self, text: &str, line: usize) {
        let (modifier, rest) = split_modifier(text);
        let Some(caps) = FUNCTION_DECL.captures(rest) else {
            return;
        };

        let name = caps[1].to_uppercase();
        let func = FunctionDef {
            name: name.clone(),
            input_params: split_params(caps.get(2).map(|m| m.as_str()).unwrap_or("")),
            return_type: caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .filter(|spec| !spec.is_empty()),
            modifier,
            line_start: line,
            ..FunctionDef::default()
        };

        self.model.add_function(func);
        self.current_function = Some(name);
    }

    fn end_function(&mut self, line: usize) {
        if let Some(name) = self.current_function.take() {
            if let Some(func) = self.model.functions.get_mut(&name) {
                func.line_end = Some(line);
            }
            if let Some(block_name) = &self.current_sys_proc {
                if let (Some(func), Some(block)) = (
                    self.model.functions.get(&name).cloned(),
                    self.model.sys_proc_blocks.get_mut(block_name),
                ) {
                    block.functions.insert(name, func);
                }
            }
        }
    }

    fn cmode_declaration(&mut self, upper: &str) {
        let argument = upper.trim_start_matches("CMODE").trim();
        self.model.constant_mode = if argument.contains('O') {
            ConstantMode::Octal
        } else {
            ConstantMode::Decimal
        };
    }
}

fn is_modified_declaration(upper: &str, keyword: &str) -> bool {
    [Modifier::ExtDef, Modifier::ExtRef, Modifier::LocRef, Modifier::TransRef]
        .iter()
        .any(|modifier| upper.starts_with(&format!("({}) {}", modifier.as_str(), keyword)))
}

/// Split a leading `(EXTDEF)`-style modifier off a declaration statement.
fn split_modifier(text: &str) -> (Option<Modifier>, &str) {
    let trimmed = text.trim_start();
    if let Some(rest) = trimmed.strip_prefix('(') {
        if let Some(close) = rest.find(')') {
            let word = rest[..close].trim().to_uppercase();
            if let Some(modifier) = Modifier::parse(&word) {
                return (Some(modifier), rest[close + 1..].trim_start());
            }
        }
    }
    (None, trimmed)
}

fn split_params(list: &str) -> Vec<String> {
    list.split(',')
        .map(|param| param.trim().to_uppercase())
        .filter(|param| !param.is_empty())
        .collect()
}

fn parse_packing(word: &str) -> Packing {
    match word.to_uppercase().as_str() {
        "MEDIUM" => Packing::Medium,
        "DENSE" => Packing::Dense,
        _ => Packing::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
''CMS-2 Test Program''
TESTDD SYS-DD $

CMODE D $  ''Decimal mode''

''Variable declarations''
VRBL ALTITUDE I 16 S $
VRBL AIRSPEED A 16 S 4 $
VRBL STATUS_OK B $
VRBL PILOT_NAME H 20 $
VRBL (LAT, LON) A 32 S 16 $

''Status type''
TYPE MODE 'OFF', 'STANDBY', 'ACTIVE', 'ALERT' $

''Table declaration''
TABLE WAYPOINTS V MEDIUM 100 $
  FIELD WP_LAT A 32 S 16 $
  FIELD WP_LON A 32 S 16 $
  FIELD WP_ALT I 16 S $
  FIELD WP_NAME H 8 $
END-TABLE WAYPOINTS $

END-SYS-DD TESTDD $

TESTSP SYS-PROC $

PROCEDURE UPDATE_POS INPUT LAT, LON OUTPUT DISTANCE $
  SET ALTITUDE TO ALTITUDE + 1 $
END-PROC UPDATE_POS $

FUNCTION CALC_DIST(P1, P2) A 32 S 8 $
  RETURN (0) $
END-FUNCTION CALC_DIST $

END-SYS-PROC TESTSP $
"#;

    #[test]
    fn parses_system_blocks_with_spans() {
        let model = parse_source(SAMPLE);
        let dd = model.sys_data_blocks.get("TESTDD").expect("SYS-DD block");
        assert_eq!(dd.line_start, 2);
        assert_eq!(dd.line_end, Some(24));
        let sp = model.sys_proc_blocks.get("TESTSP").expect("SYS-PROC block");
        assert!(!sp.is_reentrant);
        assert_eq!(sp.line_end, Some(36));
    }

    #[test]
    fn parses_variable_modes() {
        let model = parse_source(SAMPLE);
        let altitude = model.variable("ALTITUDE").unwrap();
        assert_eq!(altitude.mode, DataMode::Integer);
        assert_eq!(altitude.bits, Some(16));
        assert!(altitude.signed);

        let airspeed = model.variable("AIRSPEED").unwrap();
        assert_eq!(airspeed.mode, DataMode::Fixed);
        assert_eq!(airspeed.frac_bits, Some(4));

        assert_eq!(model.variable("STATUS_OK").unwrap().mode, DataMode::Boolean);
        let name = model.variable("PILOT_NAME").unwrap();
        assert_eq!(name.mode, DataMode::Char);
        assert_eq!(name.char_length, Some(20));
    }

    #[test]
    fn multi_name_declaration_creates_each_variable() {
        let model = parse_source(SAMPLE);
        for name in ["LAT", "LON"] {
            let var = model.variable(name).unwrap();
            assert_eq!(var.mode, DataMode::Fixed);
            assert_eq!(var.bits, Some(32));
            assert_eq!(var.frac_bits, Some(16));
        }
    }

    #[test]
    fn variables_attach_to_enclosing_sys_dd() {
        let model = parse_source(SAMPLE);
        let dd = model.sys_data_blocks.get("TESTDD").unwrap();
        assert!(dd.variables.contains_key("ALTITUDE"));
        assert_eq!(
            model.variable("ALTITUDE").unwrap().parent_block.as_deref(),
            Some("TESTDD")
        );
    }

    #[test]
    fn parses_status_type() {
        let model = parse_source(SAMPLE);
        let mode = model.type_def("MODE").unwrap();
        assert_eq!(mode.status_values, vec!["OFF", "STANDBY", "ACTIVE", "ALERT"]);
    }

    #[test]
    fn parses_table_with_fields() {
        let model = parse_source(SAMPLE);
        let table = model.table("WAYPOINTS").unwrap();
        assert_eq!(table.kind, TableKind::Vertical);
        assert_eq!(table.packing, Packing::Medium);
        assert_eq!(table.item_count, Some(100));
        assert_eq!(table.fields.len(), 4);
        assert_eq!(table.fields["WP_ALT"].mode, DataMode::Integer);
        assert_eq!(table.fields["WP_NAME"].char_length, Some(8));
        assert!(table.line_end.is_some());

        // The SYS-DD copy includes the fields gathered before END-TABLE.
        let dd = model.sys_data_blocks.get("TESTDD").unwrap();
        assert_eq!(dd.tables["WAYPOINTS"].fields.len(), 4);
    }

    #[test]
    fn parses_procedure_parameters() {
        let model = parse_source(SAMPLE);
        let proc = model.procedure("UPDATE_POS").unwrap();
        assert_eq!(proc.input_params, vec!["LAT", "LON"]);
        assert_eq!(proc.output_params, vec!["DISTANCE"]);
        assert!(proc.exit_params.is_empty());
        assert!(!proc.is_exec);
        assert!(proc.line_end.is_some());

        let sp = model.sys_proc_blocks.get("TESTSP").unwrap();
        assert!(sp.procedures.contains_key("UPDATE_POS"));
    }

    #[test]
    fn parses_function_with_return_type() {
        let model = parse_source(SAMPLE);
        let func = model.function("CALC_DIST").unwrap();
        assert_eq!(func.input_params, vec!["P1", "P2"]);
        assert_eq!(func.return_type.as_deref(), Some("A 32 S 8"));
        let sp = model.sys_proc_blocks.get("TESTSP").unwrap();
        assert!(sp.functions.contains_key("CALC_DIST"));
    }

    #[test]
    fn parses_exec_proc() {
        let model = parse_source("EXEC-PROC DISPATCH INPUT TRACK $\nEND-PROC DISPATCH $");
        let proc = model.procedure("DISPATCH").unwrap();
        assert!(proc.is_exec);
        assert_eq!(proc.input_params, vec!["TRACK"]);
    }

    #[test]
    fn parses_modifiers() {
        let model = parse_source("(EXTDEF) VRBL SHARED I 32 S $\n(EXTREF) PROCEDURE REMOTE $");
        assert_eq!(
            model.variable("SHARED").unwrap().modifier,
            Some(Modifier::ExtDef)
        );
        assert_eq!(
            model.procedure("REMOTE").unwrap().modifier,
            Some(Modifier::ExtRef)
        );
    }

    #[test]
    fn parses_preset_value() {
        let model = parse_source("VRBL RETRIES I 8 U P 3 $");
        let var = model.variable("RETRIES").unwrap();
        assert!(var.is_preset());
        assert_eq!(var.preset_value.as_deref(), Some("3"));
    }

    #[test]
    fn parses_indirect_table_with_major_index() {
        let model = parse_source("TABLE TRACKS H DENSE INDIRECT 50 MJ TRKIDX $");
        let table = model.table("TRACKS").unwrap();
        assert_eq!(table.kind, TableKind::Horizontal);
        assert_eq!(table.packing, Packing::Dense);
        assert!(table.is_indirect);
        assert_eq!(table.major_index.as_deref(), Some("TRKIDX"));
    }

    #[test]
    fn cmode_octal() {
        let model = parse_source("CMODE O $");
        assert_eq!(model.constant_mode, ConstantMode::Octal);
        let model = parse_source("CMODE D $");
        assert_eq!(model.constant_mode, ConstantMode::Decimal);
    }

    #[test]
    fn structured_type_records_packing() {
        let model = parse_source("TYPE POSITION DENSE $\nEND-TYPE POSITION $");
        let typedef = model.type_def("POSITION").unwrap();
        assert_eq!(typedef.packing, Packing::Dense);
        assert!(typedef.line_end.is_some());
    }

    #[test]
    fn unrecognized_statements_are_skipped() {
        let model = parse_source("SET ALTITUDE TO 5 $\nGOTO RESTART $");
        assert!(model.variables.is_empty());
        assert!(model.procedures.is_empty());
    }

    #[test]
    fn local_variables_attach_to_open_procedure() {
        let model = parse_source(
            "PROCEDURE STEP $\nVRBL TMP I 8 U $\nEND-PROC STEP $",
        );
        let proc = model.procedure("STEP").unwrap();
        assert!(proc.local_vars.contains_key("TMP"));
    }

    #[test]
    fn loc_dd_brackets_are_structural_only() {
        let model = parse_source(
            "PROCEDURE STEP $\nLOC-DD $\nVRBL TMP I 8 U $\nEND-LOC-DD $\nEND-PROC STEP $",
        );
        let proc = model.procedure("STEP").unwrap();
        assert!(proc.local_vars.contains_key("TMP"));
        assert!(model.variable("TMP").is_some());
        assert_eq!(model.tables.len(), 0);
        assert_eq!(model.types.len(), 0);
    }
}
