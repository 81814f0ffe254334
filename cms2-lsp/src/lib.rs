//! Language Server Protocol implementation for CMS-2.
//!
//!     Rich editor support for CMS-2 sources in any LSP-compatible editor
//!     (VSCode, Neovim, Emacs, Sublime, etc.), built on tower-lsp.
//!
//! Feature Set
//!
//!     CMS-2 programs are declaration-heavy, so the feature set centers on the
//!     declarations the semantic model extracts:
//!
//!         1. Completion (textDocument/completion):
//!             - Reserved words with manual descriptions
//!             - Predefined functions (SIN, BAMS, CORAD, ...)
//!             - Declared variables, tables, procedures, functions, types
//!
//!         2. Hover (textDocument/hover):
//!             - Declaration snippet for symbols (VRBL, TABLE, PROCEDURE, ...)
//!             - Keyword and intrinsic descriptions
//!
//!         3. Go to Definition / Find References:
//!             - Jump to the declaring statement of any model symbol
//!             - Whole-word, case-insensitive reference search
//!
//!         4. Document Symbols (textDocument/documentSymbol):
//!             - Flat outline: SYS-DD / SYS-PROC blocks, variables, tables,
//!               procedures, functions, types
//!
//! Architecture
//!
//!     Server Layer (this crate):
//!         - Implements the tower-lsp LanguageServer trait
//!         - Owns document state: full-sync text plus the parsed model
//!         - Very thin, mostly calls the feature layer in cms2-analysis
//!         - Thin tests asserting the right things are called and returned
//!
//!     Feature Layer (cms2-analysis):
//!         - Stateless functions over the semantic model
//!         - All logic and dense unit tests
//!
//! Usage
//!
//!     Binary:
//!         $ cms2-lsp
//!     Starts the language server on stdin/stdout for editor integration.

pub mod server;

pub use server::Cms2LanguageServer;
