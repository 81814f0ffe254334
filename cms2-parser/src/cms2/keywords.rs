//! Reserved words and predefined functions of CMS-2.
//!
//! The reserved-word list follows section 3.3 of the reference manual plus
//! the bracketing keywords of the block structure (`SYS-DD`, `END-PROC`, …).
//! Predefined functions have universal scope and need no declaration.

/// CMS-2 reserved words.
pub const RESERVED_WORDS: &[&str] = &[
    "ABS", "ALG", "AND", "BASE", "BEGIN", "BIT", "BY", "CAT", "CHAR", "CHECKID", "CIRC", "CLOSE",
    "CMODE", "COMMENT", "COMP", "CORAD", "CORRECT", "CSWITCH", "DATA", "DATAPOOL", "DEBUG",
    "DECODE", "DEFID", "DENSE", "DEP", "DIRECT", "DISPLAY", "ELSE", "ELSIF", "ENCODE", "END",
    "ENDFILE", "EQ", "EQUALS", "EVENP", "EXCHANGE", "EXEC", "EXIT", "FIELD", "FILE", "FIND",
    "FOR", "FORMAT", "FROM", "FUNCTION", "GOTO", "GT", "GTEQ", "HEAD", "IF", "INDIRECT", "INPUT",
    "INTO", "INVALID", "LIBS", "LOG", "LT", "LTEQ", "MEANS", "MEDIUM", "MODE", "NITEMS", "NONE",
    "NOT", "OCM", "OODP", "OPEN", "OPTIONS", "OR", "OUTPUT", "OVERFLOW", "OVERLAY", "PRINT",
    "PTRACE", "PUNCH", "RANGE", "READ", "REGS", "RESUME", "RETURN", "SAVING", "SET", "SHIFT",
    "SNAP", "SPILL", "STOP", "SWAP", "SWITCH", "SYSTEM", "TABLE", "THEN", "THRU", "TO", "TRACE",
    "TYPE", "UNTIL", "USING", "VALID", "VARY", "VARYING", "VRBL", "WHILE", "WITH", "WITHIN",
    "XOR",
    // Block structure and bracketing keywords
    "SYS-DD", "SYS-PROC", "SYS-PROC-REN", "END-SYS-DD", "END-SYS-PROC", "LOC-DD", "END-LOC-DD",
    "AUTO-DD", "END-AUTO-DD", "PROCEDURE", "END-PROC", "EXEC-PROC", "END-FUNCTION", "END-TABLE",
    "END-TYPE", "END-SWITCH", "EXTDEF", "EXTREF", "LOCREF", "TRANSREF", "CONVERTIN",
    "CONVERTOUT", "STRINGFORM", "INPUTLIST", "OUTPUTLIST", "P-SWITCH", "END-P-SW", "L-SWITCH",
    "SYS-INDEX", "LOC-INDEX", "LOAD-VRBL", "NOTFOUND", "FOUND", "CASE", "LOOP", "KEY1", "KEY2",
    "KEY3",
];

/// Predefined functions with universal scope.
pub const PREDEFINED_FUNCTIONS: &[&str] = &[
    "ACDS2", "BAMS", "FIRST", "DRF", "SCALF", "ACDS", "CNT", "ICDS", "POS", "SIN", "ALDG",
    "COMPF", "IEXP", "PRED", "SUCC", "ANDF", "CONF", "ISIN", "RAD", "TDEF", "ASIN2", "COS",
    "LAST", "ROTATEHP", "VECTORHP", "ASIN", "EXP", "LENGTH", "REM", "VECTORP", "ATAN2", "FIL",
    "LN", "ROTATEP", "XORF", "ATAN", "ICOS", "ALOG", "ACOS", "ACOS2",
];

pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

pub fn is_predefined(name: &str) -> bool {
    PREDEFINED_FUNCTIONS.contains(&name)
}

/// Human-readable description of a reserved word.
pub fn keyword_description(keyword: &str) -> String {
    let known = match keyword {
        "VRBL" => "Variable declaration",
        "TABLE" => "Table (array/structure) declaration",
        "FIELD" => "Field within a table or type",
        "TYPE" => "Type definition",
        "PROCEDURE" => "Procedure (subroutine) declaration",
        "FUNCTION" => "Function declaration",
        "EXEC-PROC" => "Executive procedure (runs in task state from executive)",
        "SYS-DD" => "System Data Division - global data declarations",
        "SYS-PROC" => "System Procedure block",
        "SYS-PROC-REN" => "Re-entrant System Procedure block",
        "LOC-DD" => "Local Data Division",
        "SET" => "Assignment statement",
        "IF" => "Conditional statement",
        "THEN" => "Then clause of IF",
        "ELSE" => "Else clause of IF",
        "ELSIF" => "Else-if clause",
        "GOTO" => "Unconditional branch",
        "RETURN" => "Return from procedure/function",
        "EXIT" => "Exit from loop",
        "STOP" => "Stop program execution",
        "BEGIN" => "Begin block",
        "END" => "End block or loop",
        "VARY" => "Counted loop (FOR loop)",
        "WHILE" => "While loop",
        "LOOP" => "General loop construct",
        "CASE" => "Case/switch statement",
        "FIND" => "Table search operation",
        "DIRECT" => "Begin direct (assembly) code block",
        "INPUT" => "Input parameter list",
        "OUTPUT" => "Output parameter/statement",
        "CORAD" => "Core address (memory address) function",
        "DENSE" => "Dense packing mode",
        "MEDIUM" => "Medium packing mode",
        "NONE" => "No packing (word-aligned)",
        "INDIRECT" => "Indirect table (pointer-based)",
        "EXTDEF" => "External definition (exported)",
        "EXTREF" => "External reference (imported)",
        "LOCREF" => "Local reference",
        "TRANSREF" => "Transient reference (uses transient base register)",
        _ => return format!("CMS-2 keyword: {keyword}"),
    };
    known.to_string()
}

/// Human-readable description of a predefined function.
pub fn predefined_description(name: &str) -> String {
    let known = match name {
        "SIN" => "Sine function (floating-point)",
        "COS" => "Cosine function (floating-point)",
        "ASIN" => "Arcsine function",
        "ACOS" => "Arccosine function",
        "ATAN" => "Arctangent function",
        "ATAN2" => "Two-argument arctangent",
        "EXP" => "Exponential function (e^x)",
        "LN" => "Natural logarithm",
        "ALOG" => "Natural logarithm (alias)",
        "IEXP" => "Fixed-point exponential",
        "ISIN" => "Fixed-point sine",
        "ICOS" => "Fixed-point cosine",
        "BAMS" => "Radians to BAMS conversion",
        "RAD" => "BAMS to radians conversion",
        "ABS" => "Absolute value",
        "FIRST" => "First value of status type",
        "LAST" => "Last value of status type",
        "PRED" => "Predecessor value",
        "SUCC" => "Successor value",
        "LENGTH" => "Length of character string",
        "CNT" => "Count function",
        "REM" => "Remainder function",
        "POS" => "Position function",
        _ => return format!("Predefined function: {name}"),
    };
    known.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_keywords_are_reserved() {
        for word in ["SYS-DD", "END-SYS-PROC", "VRBL", "EXEC-PROC"] {
            assert!(is_reserved(word), "{word} should be reserved");
        }
        assert!(!is_reserved("ALTITUDE"));
    }

    #[test]
    fn predefined_lookup() {
        assert!(is_predefined("ATAN2"));
        assert!(!is_predefined("SET"));
    }

    #[test]
    fn descriptions_fall_back_to_generic_text() {
        assert_eq!(keyword_description("VRBL"), "Variable declaration");
        assert_eq!(keyword_description("SWAP"), "CMS-2 keyword: SWAP");
        assert_eq!(predefined_description("BAMS"), "Radians to BAMS conversion");
        assert_eq!(predefined_description("DRF"), "Predefined function: DRF");
    }
}
