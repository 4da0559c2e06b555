//! Parser entry point.
//!
//! A [`Parser`] is built for exactly one input and consumed by
//! [`Parser::parse`]. Its nodes, blocks and exception log are private to
//! that call; the resulting [`Document`] is owned by the caller.

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::assemble::assemble;
use crate::config::ParseOptions;
use crate::exception::ExceptionLog;
use crate::tokenizer::tokenize;
use crate::value::Value;

/// The result of one parse: the assembled value plus every dropped line.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Document {
    /// Root value (`Value::Null` when nothing was placed)
    pub root: Value,
    /// Diagnostics in the order they were recorded
    pub exceptions: ExceptionLog,
}

impl Document {
    /// True if any line was dropped while parsing.
    #[inline]
    pub fn has_errors(&self) -> bool {
        self.exceptions.has_errors()
    }

    /// Split into root value and exception log.
    pub fn into_parts(self) -> (Value, ExceptionLog) {
        (self.root, self.exceptions)
    }
}

/// Single-use parser over one input.
#[derive(Debug, Clone)]
pub struct Parser<'a> {
    lines: Vec<&'a str>,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    /// Create a parser over `text`, split on line breaks.
    ///
    /// Both `\n` and `\r\n` end a line; a trailing newline adds no line.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            options: ParseOptions::default(),
        }
    }

    /// Create a parser over pre-split lines.
    pub fn from_lines(lines: &[&'a str]) -> Self {
        Self {
            lines: lines.to_vec(),
            options: ParseOptions::default(),
        }
    }

    /// Set scalar coercion options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse the input. Never fails; malformed lines end up in the log.
    pub fn parse(self) -> Document {
        let mut exceptions = ExceptionLog::new();
        let nodes = tokenize(&self.lines, &mut exceptions);
        let node_count = nodes.len();
        let root = assemble(nodes, &self.options, &mut exceptions);

        log::debug!(
            "parsed {} lines: {} nodes, {} exceptions",
            self.lines.len(),
            node_count,
            exceptions.len()
        );

        Document { root, exceptions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exception::Reason;

    #[test]
    fn test_text_and_lines_agree() {
        let text = "a: 1\nb:\n  - x\n";
        let from_text = Parser::new(text).parse();
        let from_lines = Parser::from_lines(&["a: 1", "b:", "  - x"]).parse();
        assert_eq!(from_text, from_lines);
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = Parser::new("a: 1\r\nb: 2\r\n").parse();
        assert!(!doc.has_errors());
        assert_eq!(doc.root.get("b"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_options_apply() {
        let doc = Parser::new("n: 5")
            .with_options(ParseOptions::strings())
            .parse();
        assert_eq!(doc.root.get("n"), Some(&Value::from("5")));
    }

    #[test]
    fn test_exceptions_in_source_order() {
        let doc = Parser::new("a: 1\nstray\na: 2\n  c: 3").parse();
        let reasons: Vec<Reason> = doc.exceptions.iter().map(|e| e.reason).collect();
        assert_eq!(
            reasons,
            vec![
                Reason::MissingKey,
                Reason::DuplicateKey,
                Reason::InvalidIndentation
            ]
        );
        let (root, log) = doc.into_parts();
        assert_eq!(root.get("a"), Some(&Value::Int(1)));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_empty_document() {
        let doc = Parser::new("# only a comment\n---\n").parse();
        assert_eq!(doc, Document::default());
    }
}
