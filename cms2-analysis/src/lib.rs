//! Editor-facing analyses over the CMS-2 semantic model.
//!
//! Everything in this crate is protocol-adjacent but transport-free: the
//! functions take a parsed [`cms2_parser::cms2::SemanticModel`] plus document
//! text and positions, and return plain data the language server translates
//! into protocol responses.

pub mod completion;
pub mod hover;
pub mod navigation;
pub mod symbols;
pub mod words;
pub mod workspace;
