//! # cms2-parser
//!
//! A semantic parser for CMS-2 (Compiler Monitor System 2), the US Navy's
//! standard programming language for tactical combat systems.
//!
//! The library turns CMS-2 source into a declaration-level semantic model:
//! variables, tables with fields, procedures, functions, status types, and
//! the surrounding SYS-DD / SYS-PROC system blocks. The model is what editor
//! tooling (completion, hover, navigation) operates on; it is deliberately
//! best-effort and never fails on malformed input.
//!
//! Pipeline layout mirrors the stages of the language itself:
//!
//! src/cms2
//!   ├── lexing        Statement-level tokens and comment stripping
//!   ├── statements    `$`-terminated multi-line statement assembly
//!   ├── model         The semantic model and its lookup rules
//!   ├── parsing       Declaration recognition over assembled statements
//!   └── keywords      Reserved words and predefined intrinsics
//!
//! Syntax reference: CMS-2Y Programmer's Reference Manual (M-5049) Rev 16,
//! October 1986, Fleet Combat Direction Systems Support Activity, San Diego.

pub mod cms2;
