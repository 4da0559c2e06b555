//! Value interpretation for a node's trailing text.
//!
//! A raw value is one of:
//!
//! - a flow mapping `{a: 1, b: "two words"}`
//! - a flow sequence `[1, 2, "three"]`
//! - a scalar, coerced according to [`ParseOptions`]
//!
//! Flow collections are single level. Brackets inside a flow literal are
//! kept as literal text and the top-level comma split applies to them like
//! any other character, so `[[1, 2]]` yields the two strings `"[1"` and
//! `"2]"`. Such input is reported with `log::warn!`.

use crate::config::ParseOptions;
use crate::value::{Mapping, Value};

/// Interpret a node's raw value.
pub(crate) fn interpret(raw: &str, options: &ParseOptions) -> Value {
    let text = raw.trim();

    if let Some(inner) = flow_interior(text, '{', '}') {
        warn_if_nested(text, inner);
        return flow_mapping(inner, options);
    }
    if let Some(inner) = flow_interior(text, '[', ']') {
        warn_if_nested(text, inner);
        return flow_sequence(inner, options);
    }

    quoted_or_scalar(text, options)
}

/// Block and flow-mapping values: a fully quoted value is kept as text
/// with its quotes removed, anything else goes through [`scalar`].
fn quoted_or_scalar(text: &str, options: &ParseOptions) -> Value {
    match unquote(text) {
        Some(inner) => Value::String(inner.to_string()),
        None => scalar(text, options),
    }
}

/// Convert a single scalar.
///
/// Numbers, booleans and `null` are tried in that order, each only when its
/// switch is on. Anything else is returned as the original text.
pub(crate) fn scalar(text: &str, options: &ParseOptions) -> Value {
    if options.convert_numbers {
        if let Some(number) = parse_number(text) {
            return number;
        }
    }

    if options.convert_booleans {
        match text {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
    }

    if options.convert_nulls && text == "null" {
        return Value::Null;
    }

    Value::String(text.to_string())
}

#[inline]
fn flow_interior(text: &str, open: char, close: char) -> Option<&str> {
    text.strip_prefix(open)?.strip_suffix(close)
}

fn flow_mapping(inner: &str, options: &ParseOptions) -> Value {
    let mut map = Mapping::new();

    for part in split_top_level(inner) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (key, value) = match split_key_value(part) {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (part, ""),
        };
        let key = unquote(key).unwrap_or(key);
        let value = if value.is_empty() {
            Value::Null
        } else {
            quoted_or_scalar(value, options)
        };

        map.insert(key.to_string(), value);
    }

    Value::Mapping(map)
}

fn flow_sequence(inner: &str, options: &ParseOptions) -> Value {
    let items = split_top_level(inner)
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| scalar(unquote(item).unwrap_or(item), options))
        .collect();

    Value::Sequence(items)
}

/// Split on commas outside double-quoted spans.
///
/// Quoted spans are copied verbatim. Outside them, runs of whitespace are
/// collapsed to a single space.
fn split_top_level(inner: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut prev: Option<char> = None;

    for c in inner.chars() {
        if in_quote {
            current.push(c);
            if c == '"' && prev != Some('\\') {
                in_quote = false;
            }
        } else {
            match c {
                '"' => {
                    in_quote = true;
                    current.push(c);
                }
                ',' => parts.push(core::mem::take(&mut current)),
                c if c.is_whitespace() => {
                    if !current.ends_with(' ') {
                        current.push(' ');
                    }
                }
                c => current.push(c),
            }
        }
        prev = Some(c);
    }

    parts.push(current);
    parts
}

/// Split a flow mapping entry on its first colon outside quotes.
fn split_key_value(part: &str) -> Option<(&str, &str)> {
    let mut in_quote = false;
    for (i, c) in part.char_indices() {
        match c {
            '"' => in_quote = !in_quote,
            ':' if !in_quote => return Some((&part[..i], &part[i + 1..])),
            _ => {}
        }
    }
    None
}

/// Strip the surrounding double quotes of a single quoted span.
///
/// `"A" and "B"` is two spans and is left alone.
fn unquote(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut prev: Option<char> = None;
    for c in inner.chars() {
        if c == '"' && prev != Some('\\') {
            return None;
        }
        prev = Some(c);
    }
    Some(inner)
}

/// Parse text that is entirely a finite number.
///
/// Integers that fit in an i64 stay exact; everything else is an f64.
/// Spellings like `inf` or `NaN` that `f64::from_str` accepts are not
/// numbers here.
fn parse_number(text: &str) -> Option<Value> {
    let numeric_chars = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !numeric_chars || !text.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    if let Ok(n) = text.parse::<i64>() {
        return Some(Value::Int(n));
    }

    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}

fn warn_if_nested(text: &str, inner: &str) {
    let mut in_quote = false;
    for c in inner.chars() {
        match c {
            '"' => in_quote = !in_quote,
            '{' | '}' | '[' | ']' if !in_quote => {
                log::warn!(
                    "nested flow collection is not supported, inner brackets kept as text: {}",
                    text
                );
                return;
            }
            _ => {}
        }
    }
}
