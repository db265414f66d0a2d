//! Decoding of tool-call argument text

use serde_json::{Map, Value};

use super::error::ParseError;

/// Decode an argument object, with one repair attempt
///
/// Empty input is an empty object. When strict parsing fails the text is
/// un-escaped once (see `repair`) and parsed again; the original error is
/// reported if that fails too.
pub(crate) fn decode_arguments(raw: &str) -> Result<Map<String, Value>, ParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Map::new());
    }

    match decode_strict(raw) {
        Ok(arguments) => Ok(arguments),
        Err(first) => {
            let repaired = repair(raw);
            if repaired == raw {
                return Err(first);
            }
            decode_strict(&repaired).map_err(|_| first)
        }
    }
}

/// Decode a value that is either an object or a string holding one
pub(crate) fn decode_argument_value(value: &Value) -> Result<Map<String, Value>, ParseError> {
    match value {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(map.clone()),
        Value::String(encoded) => decode_arguments(encoded),
        _ => Err(ParseError::ArgumentsNotObject),
    }
}

fn decode_strict(raw: &str) -> Result<Map<String, Value>, ParseError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ParseError::ArgumentsNotObject),
        Err(e) => Err(ParseError::InvalidArguments(e.to_string())),
    }
}

/// Undo one level of escaping: `\\` to `\`, `\n` to newline, `\"` to `"`
///
/// Other escapes are left alone.
pub(crate) fn repair(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            _ => {
                out.push('\\');
                continue;
            }
        }
        chars.next();
    }
    out
}

/// Strip one pair of matching surrounding quotes
pub(crate) fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
