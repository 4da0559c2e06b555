//! Line tokenizer.
//!
//! Turns raw source lines into [`Node`]s. Each line is handled on its own:
//! comments are stripped, blank lines and document separators are skipped,
//! and what remains is classified as a sequence item (`- value`), a mapping
//! entry (`key: value`), or rejected.
//!
//! Two rejections are recorded here rather than in the assembler because
//! they only need the line itself plus the nodes already emitted:
//!
//! - a value with no key in front of it (`missing-key`)
//! - a key repeated at the same depth since the last shallower line
//!   (`duplicate-key`)

use std::collections::HashSet;

use crate::exception::{ExceptionLog, Reason};

/// Key used for sequence item nodes.
pub(crate) const SEQUENCE_KEY: &str = "-";

/// Line recognized and skipped wherever it occurs.
pub(crate) const DOCUMENT_SEPARATOR: &str = "---";

/// Whether a node (or the block it lands in) is a sequence or a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    /// `- value`
    Sequence,
    /// `key: value`
    Mapping,
}

/// One accepted source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    /// `-` for a sequence item, otherwise the mapping key
    pub key: String,
    /// Text after the `- ` or `key: ` marker, trimmed (may be empty)
    pub raw_value: String,
    /// Column of the first non-whitespace character
    pub depth: usize,
    /// Line number (1-indexed)
    pub line: usize,
    /// The source line, trimmed, for diagnostics
    pub text: String,
}

impl Node {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        if self.key == SEQUENCE_KEY {
            NodeKind::Sequence
        } else {
            NodeKind::Mapping
        }
    }
}

/// Tokenize lines into nodes, recording rejected lines in `log`.
pub(crate) fn tokenize<S: AsRef<str>>(lines: &[S], log: &mut ExceptionLog) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::with_capacity(lines.len());
    let mut scopes = KeyScopes::default();

    for (idx, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let line_no = idx + 1;

        let stripped = strip_comment(line);
        let content = stripped.trim();
        if content.is_empty() || content == DOCUMENT_SEPARATOR {
            continue;
        }

        let (key, raw_value) = classify(content);
        if key.is_empty() {
            log.record(line_no, Reason::MissingKey, line.trim());
            continue;
        }

        let node = Node {
            key: key.to_string(),
            raw_value: raw_value.to_string(),
            depth: indentation(stripped),
            line: line_no,
            text: line.trim().to_string(),
        };

        if node.kind() == NodeKind::Mapping && scopes.contains(node.depth, &node.key) {
            log.record(line_no, Reason::DuplicateKey, node.text);
            continue;
        }

        scopes.accept(&node);
        nodes.push(node);
    }

    nodes
}

/// Remove a trailing comment.
///
/// A comment starts at a `#` that is outside a double-quoted span and is
/// either the first character of the line or preceded by whitespace. A
/// backslash before the `#` or the quote suppresses it.
fn strip_comment(line: &str) -> &str {
    let mut in_quote = false;
    let mut prev: Option<char> = None;

    for (i, c) in line.char_indices() {
        match c {
            '"' if prev != Some('\\') => in_quote = !in_quote,
            '#' if !in_quote && prev.map_or(true, char::is_whitespace) => {
                return &line[..i];
            }
            _ => {}
        }
        prev = Some(c);
    }

    line
}

/// Count leading whitespace characters. Tabs count as one column.
#[inline]
fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

/// Split trimmed line content into `(key, raw_value)`.
///
/// Returns an empty key when the line is neither a sequence item nor a
/// mapping entry; the whole content is then the value.
fn classify(content: &str) -> (&str, &str) {
    if let Some(rest) = content.strip_prefix('-') {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            return (SEQUENCE_KEY, rest.trim());
        }
    }

    // The key runs up to the first colon that ends the line or is followed
    // by whitespace, so `url: http://host` splits at the first colon only.
    for (i, c) in content.char_indices() {
        if c != ':' {
            continue;
        }
        let rest = &content[i + 1..];
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            let key = content[..i].trim_end();
            if key.is_empty() {
                break;
            }
            return (key, rest.trim());
        }
    }

    ("", content)
}

/// Mapping keys seen at each open depth.
///
/// Depths increase strictly from bottom to top. A set holds the keys used at
/// its depth since the last accepted node that was shallower, so a lookup is
/// the same as scanning back through accepted nodes until a shallower one.
#[derive(Debug, Default)]
struct KeyScopes {
    scopes: Vec<(usize, HashSet<String>)>,
}

impl KeyScopes {
    fn contains(&self, depth: usize, key: &str) -> bool {
        self.scopes
            .iter()
            .rev()
            .find(|(d, _)| *d <= depth)
            .is_some_and(|(d, keys)| *d == depth && keys.contains(key))
    }

    fn accept(&mut self, node: &Node) {
        while self.scopes.last().is_some_and(|(d, _)| *d > node.depth) {
            self.scopes.pop();
        }
        if self.scopes.last().map(|(d, _)| *d) != Some(node.depth) {
            self.scopes.push((node.depth, HashSet::new()));
        }
        if node.kind() == NodeKind::Mapping {
            if let Some((_, keys)) = self.scopes.last_mut() {
                keys.insert(node.key.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str]) -> (Vec<Node>, ExceptionLog) {
        let mut log = ExceptionLog::new();
        let nodes = tokenize(lines, &mut log);
        (nodes, log)
    }

    #[test]
    fn test_mapping_line() {
        let (nodes, log) = run(&["title: Sample"]);
        assert!(log.is_empty());
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].key, "title");
        assert_eq!(nodes[0].raw_value, "Sample");
        assert_eq!(nodes[0].depth, 0);
        assert_eq!(nodes[0].line, 1);
        assert_eq!(nodes[0].kind(), NodeKind::Mapping);
    }

    #[test]
    fn test_key_only_line() {
        let (nodes, _) = run(&["tags:"]);
        assert_eq!(nodes[0].key, "tags");
        assert_eq!(nodes[0].raw_value, "");
    }

    #[test]
    fn test_key_with_internal_whitespace() {
        let (nodes, _) = run(&["site name: My Site"]);
        assert_eq!(nodes[0].key, "site name");
        assert_eq!(nodes[0].raw_value, "My Site");
    }

    #[test]
    fn test_value_with_colon() {
        let (nodes, _) = run(&["url: http://example.com/a:b"]);
        assert_eq!(nodes[0].key, "url");
        assert_eq!(nodes[0].raw_value, "http://example.com/a:b");
    }

    #[test]
    fn test_sequence_lines() {
        let (nodes, log) = run(&["  - alpha", "  -", "  - "]);
        assert!(log.is_empty());
        assert_eq!(nodes.len(), 3);
        assert!(nodes.iter().all(|n| n.kind() == NodeKind::Sequence));
        assert!(nodes.iter().all(|n| n.depth == 2));
        assert_eq!(nodes[0].raw_value, "alpha");
        assert_eq!(nodes[1].raw_value, "");
        assert_eq!(nodes[2].raw_value, "");
    }

    #[test]
    fn test_dash_without_space_is_not_sequence() {
        let (nodes, log) = run(&["-5"]);
        assert!(nodes.is_empty());
        assert_eq!(log.count(Reason::MissingKey), 1);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let (nodes, log) = run(&[
            "# heading comment",
            "",
            "   ",
            "    # indented comment",
            "name: Alice # trailing",
            "hash: a#b",
            "quoted: \"a # b\"",
        ]);
        assert!(log.is_empty());
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].raw_value, "Alice");
        assert_eq!(nodes[0].line, 5);
        assert_eq!(nodes[1].raw_value, "a#b");
        assert_eq!(nodes[2].raw_value, "\"a # b\"");
    }

    #[test]
    fn test_document_separator_ignored() {
        let (nodes, log) = run(&["---", "a: 1", "---", "b: 2"]);
        assert!(log.is_empty());
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].line, 4);
    }

    #[test]
    fn test_tab_counts_as_one_column() {
        let (nodes, _) = run(&["\ta: 1", "\t\tb: 2", "  c: 3"]);
        assert_eq!(nodes[0].depth, 1);
        assert_eq!(nodes[1].depth, 2);
        assert_eq!(nodes[2].depth, 2);
    }

    #[test]
    fn test_missing_key() {
        let (nodes, log) = run(&["a: 1", "  orphan text  ", ": empty key", "b: 2"]);
        assert_eq!(nodes.len(), 2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].line, 2);
        assert_eq!(log.entries()[0].reason, Reason::MissingKey);
        assert_eq!(log.entries()[0].text, "orphan text");
        assert_eq!(log.entries()[1].line, 3);
    }

    #[test]
    fn test_duplicate_key_same_depth() {
        let (nodes, log) = run(&["a: 1", "b: 2", "a: 3"]);
        assert_eq!(nodes.len(), 2);
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].reason, Reason::DuplicateKey);
        assert_eq!(log.entries()[0].line, 3);
        assert_eq!(log.entries()[0].text, "a: 3");
    }

    #[test]
    fn test_duplicate_key_scan_stops_at_shallower_node() {
        let (nodes, log) = run(&["x:", "  name: a", "y:", "  name: b"]);
        assert!(log.is_empty());
        assert_eq!(nodes.len(), 4);
    }

    #[test]
    fn test_duplicate_key_skips_deeper_nodes() {
        let (nodes, log) = run(&["x:", "  a: 1", "y: 2", "x: 3"]);
        assert_eq!(nodes.len(), 3);
        assert_eq!(log.count(Reason::DuplicateKey), 1);
    }

    #[test]
    fn test_duplicate_key_across_sequence_sibling() {
        let (_, log) = run(&["a: 1", "- x", "a: 2"]);
        assert_eq!(log.count(Reason::DuplicateKey), 1);
    }

    #[test]
    fn test_rejected_lines_do_not_reset_key_scope() {
        let (_, log) = run(&["x:", "  k: 1", "bad words", "  k: 2"]);
        assert_eq!(log.count(Reason::MissingKey), 1);
        assert_eq!(log.count(Reason::DuplicateKey), 1);

        let (nodes, log) = run(&["a: 1", "  k: 1", "a: 2", "  k: 2"]);
        assert_eq!(nodes.len(), 2);
        assert_eq!(log.count(Reason::DuplicateKey), 2);
    }

    #[test]
    fn test_large_flat_document() {
        let lines: Vec<String> = (0..40_000).map(|i| format!("k{}: {}", i, i)).collect();
        let (nodes, log) = run_owned(&lines);
        assert!(log.is_empty());
        assert_eq!(nodes.len(), 40_000);
    }

    fn run_owned(lines: &[String]) -> (Vec<Node>, ExceptionLog) {
        let mut log = ExceptionLog::new();
        let nodes = tokenize(lines, &mut log);
        (nodes, log)
    }

    /// Reference duplicate check: scan back until a shallower node.
    fn scan_back_duplicates(nodes: &[Node]) -> usize {
        let mut accepted: Vec<&Node> = Vec::new();
        let mut duplicates = 0;
        for node in nodes {
            let duplicate = node.kind() == NodeKind::Mapping
                && accepted
                    .iter()
                    .rev()
                    .take_while(|prior| prior.depth >= node.depth)
                    .any(|prior| {
                        prior.depth == node.depth
                            && prior.kind() == NodeKind::Mapping
                            && prior.key == node.key
                    });
            if duplicate {
                duplicates += 1;
            } else {
                accepted.push(node);
            }
        }
        duplicates
    }

    proptest::proptest! {
        #[test]
        fn prop_key_scopes_match_scan_back(
            lines in proptest::collection::vec((0usize..4, "[abc-]"), 0..40)
        ) {
            let lines: Vec<String> = lines
                .iter()
                .map(|(depth, key)| match key.as_str() {
                    "-" => format!("{}- v", " ".repeat(depth * 2)),
                    key => format!("{}{}: v", " ".repeat(depth * 2), key),
                })
                .collect();

            // Every generated line classifies, so the reference sees them all.
            let all: Vec<Node> = lines
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    let (key, raw) = classify(line.trim());
                    Node {
                        key: key.to_string(),
                        raw_value: raw.to_string(),
                        depth: indentation(line),
                        line: i + 1,
                        text: line.trim().to_string(),
                    }
                })
                .collect();

            let (_, log) = run_owned(&lines);
            proptest::prop_assert_eq!(log.count(Reason::DuplicateKey), scan_back_duplicates(&all));
        }
    }

    #[test]
    fn test_strip_comment() {
        assert_eq!(strip_comment("a: b # c"), "a: b ");
        assert_eq!(strip_comment("# c"), "");
        assert_eq!(strip_comment("a: \"b # c\" # d"), "a: \"b # c\" ");
        assert_eq!(strip_comment("a: b \\# c"), "a: b \\# c");
        assert_eq!(strip_comment("a: #b"), "a: ");
    }
}
