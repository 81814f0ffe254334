//! The CMS-2 semantic model.
//!
//! A declaration-level view of a compilation unit: variables, tables and
//! their fields, procedures, functions, types, and the SYS-DD / SYS-PROC
//! system blocks that scope them. Maps are name-keyed; a redeclared name
//! replaces the earlier entry. Variables are additionally stored under a
//! `SCOPE.NAME` key so lookups prefer the declaration in the current block.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// CMS-2 data modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DataMode {
    /// `I bits S|U`
    Integer,
    /// `A bits S|U frac` fixed-point
    Fixed,
    /// `F`, `F(T)`, `F(R)`, `F(S)`, `F(D)`
    Float,
    /// Single bit
    Boolean,
    /// `H len` or `C len` character data
    Char,
    /// Enumerated status values
    Status,
    #[default]
    Unknown,
}

impl DataMode {
    /// The manual's single-letter mode code.
    pub fn code(&self) -> &'static str {
        match self {
            DataMode::Integer => "I",
            DataMode::Fixed => "A",
            DataMode::Float => "F",
            DataMode::Boolean => "B",
            DataMode::Char => "H",
            DataMode::Status => "STATUS",
            DataMode::Unknown => "UNKNOWN",
        }
    }
}

/// Linkage modifier prefixes: `(EXTDEF)`, `(EXTREF)`, `(LOCREF)`, `(TRANSREF)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Modifier {
    ExtDef,
    ExtRef,
    LocRef,
    TransRef,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::ExtDef => "EXTDEF",
            Modifier::ExtRef => "EXTREF",
            Modifier::LocRef => "LOCREF",
            Modifier::TransRef => "TRANSREF",
        }
    }

    pub fn parse(word: &str) -> Option<Self> {
        match word {
            "EXTDEF" => Some(Modifier::ExtDef),
            "EXTREF" => Some(Modifier::ExtRef),
            "LOCREF" => Some(Modifier::LocRef),
            "TRANSREF" => Some(Modifier::TransRef),
            _ => None,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `VRBL` declaration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VariableDef {
    pub name: String,
    pub mode: DataMode,
    /// Bit length for I and A modes.
    pub bits: Option<u32>,
    pub signed: bool,
    /// Fractional bits for A mode.
    pub frac_bits: Option<u32>,
    /// Length for H/C mode.
    pub char_length: Option<u32>,
    pub status_values: Vec<String>,
    pub preset_value: Option<String>,
    pub modifier: Option<Modifier>,
    pub line: usize,
    pub parent_block: Option<String>,
}

impl VariableDef {
    pub fn is_preset(&self) -> bool {
        self.preset_value.is_some()
    }

    /// Type specification the way it appears in a declaration, e.g.
    /// `I 16 S`, `A 32 S 16`, `H 20`, `STATUS (OFF, ACTIVE, ...)`.
    pub fn type_spec(&self) -> String {
        let sign = if self.signed { "S" } else { "U" };
        match self.mode {
            DataMode::Integer => format!("I {} {}", self.bits.unwrap_or(0), sign),
            DataMode::Fixed => format!(
                "A {} {} {}",
                self.bits.unwrap_or(0),
                sign,
                self.frac_bits.unwrap_or(0)
            ),
            DataMode::Float => "F".to_string(),
            DataMode::Boolean => "B".to_string(),
            DataMode::Char => format!("H {}", self.char_length.unwrap_or(0)),
            DataMode::Status => {
                let mut values = self.status_values.iter().take(3).cloned().collect::<Vec<_>>();
                if self.status_values.len() > 3 {
                    values.push("...".to_string());
                }
                format!("STATUS ({})", values.join(", "))
            }
            DataMode::Unknown => self.mode.code().to_string(),
        }
    }
}

impl fmt::Display for VariableDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VRBL {} {}", self.name, self.type_spec())
    }
}

/// Table layout: `V` (vertical) or `H` (horizontal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TableKind {
    #[default]
    Vertical,
    Horizontal,
}

impl TableKind {
    pub fn code(&self) -> &'static str {
        match self {
            TableKind::Vertical => "V",
            TableKind::Horizontal => "H",
        }
    }
}

/// Packing density of tables and structured types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Packing {
    #[default]
    None,
    Medium,
    Dense,
}

impl Packing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Packing::None => "NONE",
            Packing::Medium => "MEDIUM",
            Packing::Dense => "DENSE",
        }
    }
}

impl fmt::Display for Packing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `FIELD` declaration inside a table or structured type.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldDef {
    pub name: String,
    pub mode: DataMode,
    pub bits: Option<u32>,
    pub signed: bool,
    pub frac_bits: Option<u32>,
    pub char_length: Option<u32>,
    /// Word position for user-packed fields.
    pub start_word: Option<u32>,
    /// Bit position for user-packed fields.
    pub start_bit: Option<u32>,
    pub preset_values: Vec<String>,
    pub line: usize,
    pub parent_table: Option<String>,
}

/// A `TABLE` declaration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableDef {
    pub name: String,
    pub kind: TableKind,
    pub packing: Packing,
    pub item_count: Option<u32>,
    /// Type specification for item-typed tables.
    pub type_spec: Option<String>,
    pub is_indirect: bool,
    /// Major index variable (`MJ` clause).
    pub major_index: Option<String>,
    pub modifier: Option<Modifier>,
    pub fields: BTreeMap<String, FieldDef>,
    pub line_start: usize,
    pub line_end: Option<usize>,
}

impl TableDef {
    pub fn is_item_typed(&self) -> bool {
        self.type_spec.is_some()
    }
}

/// A `PROCEDURE` or `EXEC-PROC` declaration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcedureDef {
    pub name: String,
    pub is_exec: bool,
    pub input_params: Vec<String>,
    pub output_params: Vec<String>,
    pub exit_params: Vec<String>,
    pub modifier: Option<Modifier>,
    pub local_vars: BTreeMap<String, VariableDef>,
    pub line_start: usize,
    pub line_end: Option<usize>,
}

/// A `FUNCTION` declaration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub input_params: Vec<String>,
    pub return_type: Option<String>,
    pub modifier: Option<Modifier>,
    pub local_vars: BTreeMap<String, VariableDef>,
    pub line_start: usize,
    pub line_end: Option<usize>,
}

/// A `TYPE` declaration: either a status enumeration or a packed structure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeDef {
    pub name: String,
    pub packing: Packing,
    pub status_values: Vec<String>,
    pub fields: BTreeMap<String, FieldDef>,
    pub line_start: usize,
    pub line_end: Option<usize>,
}

/// A `SYS-DD` system data block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemDataBlock {
    pub name: String,
    pub variables: BTreeMap<String, VariableDef>,
    pub tables: BTreeMap<String, TableDef>,
    pub types: BTreeMap<String, TypeDef>,
    pub line_start: usize,
    pub line_end: Option<usize>,
}

/// A `SYS-PROC` or `SYS-PROC-REN` system procedure block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemProcBlock {
    pub name: String,
    pub is_reentrant: bool,
    pub procedures: BTreeMap<String, ProcedureDef>,
    pub functions: BTreeMap<String, FunctionDef>,
    pub line_start: usize,
    pub line_end: Option<usize>,
}

/// Numeric constant interpretation set by `CMODE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ConstantMode {
    #[default]
    Decimal,
    Octal,
}

/// Scope name used outside any system block.
pub const GLOBAL_SCOPE: &str = "GLOBAL";

/// Semantic model of one CMS-2 compilation unit.
#[derive(Debug, Clone, Serialize)]
pub struct SemanticModel {
    pub variables: BTreeMap<String, VariableDef>,
    pub tables: BTreeMap<String, TableDef>,
    pub types: BTreeMap<String, TypeDef>,
    pub procedures: BTreeMap<String, ProcedureDef>,
    pub functions: BTreeMap<String, FunctionDef>,
    pub sys_data_blocks: BTreeMap<String, SystemDataBlock>,
    pub sys_proc_blocks: BTreeMap<String, SystemProcBlock>,
    pub current_scope: String,
    pub constant_mode: ConstantMode,
}

impl Default for SemanticModel {
    fn default() -> Self {
        Self {
            variables: BTreeMap::new(),
            tables: BTreeMap::new(),
            types: BTreeMap::new(),
            procedures: BTreeMap::new(),
            functions: BTreeMap::new(),
            sys_data_blocks: BTreeMap::new(),
            sys_proc_blocks: BTreeMap::new(),
            current_scope: GLOBAL_SCOPE.to_string(),
            constant_mode: ConstantMode::Decimal,
        }
    }
}

impl SemanticModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a variable under its bare name and, inside a block, under a
    /// scope-qualified `SCOPE.NAME` key as well.
    pub fn add_variable(&mut self, var: VariableDef) {
        if self.current_scope != GLOBAL_SCOPE {
            let key = format!("{}.{}", self.current_scope, var.name);
            self.variables.insert(key, var.clone());
        }
        self.variables.insert(var.name.clone(), var);
    }

    /// Look a variable up, preferring the current scope's declaration.
    pub fn variable(&self, name: &str) -> Option<&VariableDef> {
        let scoped = format!("{}.{}", self.current_scope, name);
        self.variables.get(&scoped).or_else(|| self.variables.get(name))
    }

    pub fn add_table(&mut self, table: TableDef) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    pub fn add_procedure(&mut self, proc: ProcedureDef) {
        self.procedures.insert(proc.name.clone(), proc);
    }

    pub fn procedure(&self, name: &str) -> Option<&ProcedureDef> {
        self.procedures.get(name)
    }

    pub fn add_function(&mut self, func: FunctionDef) {
        self.functions.insert(func.name.clone(), func);
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    pub fn add_type(&mut self, typedef: TypeDef) {
        self.types.insert(typedef.name.clone(), typedef);
    }

    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// All unqualified symbol names, for completion.
    pub fn all_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self
            .variables
            .keys()
            .chain(self.tables.keys())
            .chain(self.procedures.keys())
            .chain(self.functions.keys())
            .chain(self.types.keys())
            .filter(|name| !name.contains('.'))
            .cloned()
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}
