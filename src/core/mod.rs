//! Language front end for the FPP component-modeling language.
//!
//! The pipeline is `scanner` (source text to tokens), then `analyzer`
//! (recursive-descent grammar walk with scope-aware symbol resolution), then
//! `semantic_tokens` (editor-facing encoding of the classified stream).
pub mod analyzer;
pub mod scanner;
pub mod semantic_tokens;
