//! Loading documents with an acceptance policy.
//!
//! The parser always returns a best-effort document. Whether a partial
//! document is usable depends on the caller: site configuration should be
//! rejected outright when any line was dropped, while content metadata is
//! better used as-is with the problems logged.

use core::fmt;
use std::path::{Path, PathBuf};

use crate::config::ParseOptions;
use crate::exception::ExceptionLog;
use crate::parser::{Document, Parser};
use crate::tokenizer::DOCUMENT_SEPARATOR;
use crate::value::{Mapping, Value};

/// What to do with a document that has exceptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Any exception rejects the whole document.
    #[default]
    Strict,
    /// Exceptions are logged and the partial document is kept.
    Lenient,
}

/// Errors from [`Loader`].
#[derive(Debug)]
pub enum LoadError {
    /// The source could not be read.
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Strict loading found exceptions.
    Rejected {
        /// Name of the source (file path or `<string>`)
        source_name: String,
        /// Every dropped line
        exceptions: ExceptionLog,
    },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            LoadError::Rejected {
                source_name,
                exceptions,
            } => {
                write!(
                    f,
                    "{} rejected with {} exception(s)",
                    source_name,
                    exceptions.len()
                )?;
                if let Some(first) = exceptions.entries().first() {
                    write!(f, ", first at {}", first)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Rejected { .. } => None,
        }
    }
}

/// Name used for in-memory sources in errors and log messages.
const STRING_SOURCE: &str = "<string>";

/// Parses text and applies a [`LoadPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Loader {
    policy: LoadPolicy,
    options: ParseOptions,
}

impl Loader {
    /// Loader that rejects documents with any exception.
    pub fn strict() -> Self {
        Self {
            policy: LoadPolicy::Strict,
            options: ParseOptions::default(),
        }
    }

    /// Loader that keeps partial documents.
    pub fn lenient() -> Self {
        Self {
            policy: LoadPolicy::Lenient,
            options: ParseOptions::default(),
        }
    }

    /// Set scalar coercion options.
    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// The policy in effect.
    pub fn policy(&self) -> LoadPolicy {
        self.policy
    }

    /// Parse `text` and apply the policy.
    pub fn load_str(&self, text: &str) -> Result<Value, LoadError> {
        self.accept(STRING_SOURCE, self.parse(text))
    }

    /// Read and parse a UTF-8 file.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Value, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.accept(&path.display().to_string(), self.parse(&text))
    }

    /// Parse `text`, substituting an empty mapping if it is rejected.
    pub fn load_or_empty(&self, text: &str) -> Value {
        match self.load_str(text) {
            Ok(value) => value,
            Err(err) => {
                log::error!("{}; using an empty document", err);
                Value::Mapping(Mapping::new())
            }
        }
    }

    /// Split off and parse leading front matter.
    ///
    /// Returns the parsed metadata (`Value::Null` when there is none) and
    /// the remaining body text.
    pub fn load_front_matter<'t>(&self, text: &'t str) -> Result<(Value, &'t str), LoadError> {
        match split_front_matter(text) {
            (Some(meta), body) => Ok((self.load_str(meta)?, body)),
            (None, body) => Ok((Value::Null, body)),
        }
    }

    fn parse(&self, text: &str) -> Document {
        Parser::new(text).with_options(self.options).parse()
    }

    fn accept(&self, source_name: &str, document: Document) -> Result<Value, LoadError> {
        let (root, exceptions) = document.into_parts();
        if exceptions.is_empty() {
            return Ok(root);
        }

        match self.policy {
            LoadPolicy::Strict => Err(LoadError::Rejected {
                source_name: source_name.to_string(),
                exceptions,
            }),
            LoadPolicy::Lenient => {
                for exception in &exceptions {
                    log::warn!("{}: {}", source_name, exception);
                }
                Ok(root)
            }
        }
    }
}

/// Split text into `(front matter, body)`.
///
/// Front matter is present only when the first line is `---` and a later
/// line closes it with another `---`. Otherwise the whole text is body.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let Some(rest) = strip_separator_line(text) else {
        return (None, text);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DOCUMENT_SEPARATOR {
            return (Some(&rest[..offset]), &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    (None, text)
}

fn strip_separator_line(text: &str) -> Option<&str> {
    let (first, rest) = match text.find('\n') {
        Some(i) => (&text[..i], &text[i + 1..]),
        None => (text, ""),
    };
    (first.trim_end() == DOCUMENT_SEPARATOR).then_some(rest)
}
