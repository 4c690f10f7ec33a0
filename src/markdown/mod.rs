//! Markdown outline codec
//!
//! The format is line-oriented: a `# Title` heading, one task per
//! `- [ ]`/`- [x]` line, subtasks indented by a single unit (four spaces
//! or one tab), and any other indented line captured as note text. The
//! serializer is the exact inverse of the parser for well-formed trees.

pub mod parser;
pub mod serializer;

pub use parser::{load_from_file, parse};
pub use serializer::{render, save_to_file};

/// Placeholder title used when a document has no `# ` heading.
pub const UNTITLED_LIST: &str = "Untitled List";
