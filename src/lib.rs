//! # yamlite
//!
//! Indentation-sensitive parser for a YAML-lite configuration subset.
//!
//! The parser never fails. Lines it cannot place are dropped and recorded in
//! an [`ExceptionLog`], and a best-effort [`Document`] is always returned.
//!
//! ## Module Organization
//!
//! - [`value`] - Ordered document values
//! - [`config`] - Scalar coercion options
//! - [`exception`] - Line-scoped diagnostics
//! - [`parser`] - Single-use parser and the resulting document
//! - [`loader`] - Strict/lenient loading, files, and front matter
//!
//! ## Supported Syntax
//!
//! - Block mappings (`key: value`) and sequences (`- value`)
//! - Nesting by indentation; depth is the column of the first non-blank
//!   character, with tabs counting as one column
//! - Single-level flow mappings `{a: 1}` and sequences `[1, 2]`
//! - `#` comments and `---` separator lines (ignored)
//!
//! ## Quick Start
//!
//! ```
//! use yamlite::{parse, Value};
//!
//! let doc = parse("title: Sample\ntags:\n  - alpha\n  - beta\nyear: 2024");
//! assert!(!doc.has_errors());
//! assert_eq!(doc.root.get("year"), Some(&Value::Int(2024)));
//! assert_eq!(doc.root.pointer("tags.1"), Some(&Value::from("beta")));
//! ```
//!
//! ## Features
//!
//! - `serde` (default) - `Serialize` for values, documents and diagnostics
//! - `cli` - The `yamlite` command-line tool

// =============================================================================
// Internal stages
// =============================================================================

mod assemble;
mod interpret;
mod tokenizer;

// =============================================================================
// Public modules
// =============================================================================

/// Scalar coercion options.
pub mod config;

/// Line-scoped parse diagnostics.
pub mod exception;

/// Strict/lenient loading, files, and front matter.
pub mod loader;

/// Single-use parser and the resulting document.
pub mod parser;

/// Ordered document values.
pub mod value;

// =============================================================================
// Public re-exports
// =============================================================================

pub use config::ParseOptions;
pub use exception::{Exception, ExceptionLog, Reason};
pub use loader::{split_front_matter, LoadError, LoadPolicy, Loader};
pub use parser::{Document, Parser};
pub use value::{Mapping, Value};

// =============================================================================
// Convenience functions
// =============================================================================

/// Parse text with default options (all coercions on).
pub fn parse(text: &str) -> Document {
    Parser::new(text).parse()
}

/// Parse text with the given options.
pub fn parse_with(text: &str, options: &ParseOptions) -> Document {
    Parser::new(text).with_options(*options).parse()
}

/// Parse pre-split lines with the given options.
pub fn parse_lines(lines: &[&str], options: &ParseOptions) -> Document {
    Parser::from_lines(lines).with_options(*options).parse()
}
