//! CMS-2 language support: lexing, statement assembly, and the semantic model.

pub mod keywords;
pub mod lexing;
pub mod model;
pub mod parsing;
pub mod range;
pub mod statements;

/// File extensions that identify CMS-2 sources.
pub const FILE_EXTENSIONS: &[&str] = &["cms2", "cm2", "cms"];

/// Glob patterns matching CMS-2 sources, one per extension.
pub const SOURCE_PATTERNS: &[&str] = &["*.cms2", "*.cm2", "*.cms"];

pub use model::SemanticModel;
pub use parsing::{parse_source, SemanticParser};
