//! Line-scoped parse diagnostics.
//!
//! Nothing in the parser is fatal. Every line that cannot be placed in the
//! document is dropped and recorded here with its 1-based line number, a
//! reason code from a closed set, and the trimmed source text.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Why a line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Reason {
    /// A value-bearing line with neither `key:` nor `- ` in front of it.
    MissingKey,
    /// A mapping key repeated at the same depth within one block.
    DuplicateKey,
    /// A line indented to a depth with no open block.
    InvalidIndentation,
    /// A sequence item inside a mapping, or a mapping entry inside a sequence.
    KindMismatch,
}

impl Reason {
    /// The stable reason code, e.g. `"missing-key"`.
    pub fn code(self) -> &'static str {
        match self {
            Reason::MissingKey => "missing-key",
            Reason::DuplicateKey => "duplicate-key",
            Reason::InvalidIndentation => "invalid-indentation",
            Reason::KindMismatch => "kind-mismatch",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single dropped line.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Exception {
    /// Line number (1-indexed)
    pub line: usize,
    /// Reason code
    pub reason: Reason,
    /// The offending line, trimmed
    pub text: String,
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.reason, self.text)
    }
}

/// Ordered, append-only record of every line dropped during one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ExceptionLog {
    entries: Vec<Exception>,
}

impl ExceptionLog {
    /// Create an empty log.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an entry.
    pub fn record(&mut self, line: usize, reason: Reason, text: impl Into<String>) {
        let text = text.into();
        log::trace!("dropping line {}: {}: {}", line, reason, text);
        self.entries.push(Exception { line, reason, text });
    }

    /// True if any line was dropped.
    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the log has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the order they were recorded.
    #[inline]
    pub fn entries(&self) -> &[Exception] {
        &self.entries
    }

    /// Iterate over entries in recording order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, Exception> {
        self.entries.iter()
    }

    /// Count entries with the given reason.
    pub fn count(&self, reason: Reason) -> usize {
        self.entries.iter().filter(|e| e.reason == reason).count()
    }

    /// Consume the log, returning its entries.
    pub fn into_entries(self) -> Vec<Exception> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a ExceptionLog {
    type Item = &'a Exception;
    type IntoIter = core::slice::Iter<'a, Exception>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
