//! Tokenizer for `<tool_call ...>` tags
//!
//! Walks the text left to right, one tag at a time. A broken tag is reported
//! and scanning resumes right after its opening marker, so one bad block never
//! hides the ones that follow it.

use super::error::ParseError;

const OPEN: &str = "<tool_call";
const CLOSE: &str = "</tool_call>";

/// One syntactically complete tag, not yet interpreted
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawTag<'a> {
    /// Byte offset of `<tool_call` in the scanned text
    pub start: usize,
    pub attributes: Vec<(&'a str, &'a str)>,
    /// Text between the open and close tags; `None` for self-closing tags
    pub body: Option<&'a str>,
}

impl<'a> RawTag<'a> {
    /// Attribute value by case-insensitive name
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }
}

/// A tag that could not be tokenized
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SkippedTag {
    pub start: usize,
    pub error: ParseError,
}

/// Iterator over the tags in a block of text
pub(crate) struct TagScanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TagScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Read attributes from `from` up to the end of the open tag
    ///
    /// Returns the attributes, the offset just past `>` or `/>`, and whether
    /// the tag was self-closing.
    fn read_attributes(&self, from: usize) -> Result<(Vec<(&'a str, &'a str)>, usize, bool), ParseError> {
        let text = self.text;
        let bytes = text.as_bytes();
        let mut attributes = Vec::new();
        let mut i = from;

        loop {
            i = skip_whitespace(bytes, i);
            match bytes.get(i) {
                None => return Err(ParseError::UnterminatedTag),
                Some(b'>') => return Ok((attributes, i + 1, false)),
                Some(b'/') if bytes.get(i + 1) == Some(&b'>') => return Ok((attributes, i + 2, true)),
                Some(_) => {}
            }

            let key_start = i;
            while i < bytes.len() && is_name_byte(bytes[i]) {
                i += 1;
            }
            if i == key_start {
                return Err(ParseError::MalformedTag);
            }
            let key = &text[key_start..i];

            i = skip_whitespace(bytes, i);
            if bytes.get(i) != Some(&b'=') {
                // Bare attribute
                attributes.push((key, ""));
                continue;
            }
            i = skip_whitespace(bytes, i + 1);

            match bytes.get(i) {
                None => return Err(ParseError::UnterminatedTag),
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    let value_start = i + 1;
                    let mut j = value_start;
                    // A backslash keeps the next byte inside the value
                    while j < bytes.len() && bytes[j] != quote {
                        j += if bytes[j] == b'\\' { 2 } else { 1 };
                    }
                    if j >= bytes.len() {
                        return Err(ParseError::UnterminatedTag);
                    }
                    attributes.push((key, &text[value_start..j]));
                    i = j + 1;
                }
                Some(_) => {
                    let value_start = i;
                    while i < bytes.len()
                        && !bytes[i].is_ascii_whitespace()
                        && bytes[i] != b'>'
                        && !(bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'>'))
                    {
                        i += 1;
                    }
                    attributes.push((key, &text[value_start..i]));
                }
            }
        }
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = Result<RawTag<'a>, SkippedTag>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        loop {
            let start = self.pos + text.get(self.pos..)?.find(OPEN)?;
            let after = start + OPEN.len();

            // `<tool_calls`, `<tool_caller` and friends are not our tag
            match text.as_bytes().get(after) {
                Some(&b) if is_tag_boundary(b) => {}
                Some(_) => {
                    self.pos = after;
                    continue;
                }
                None => {
                    self.pos = text.len();
                    return Some(Err(SkippedTag { start, error: ParseError::UnterminatedTag }));
                }
            }

            let (attributes, end, self_closing) = match self.read_attributes(after) {
                Ok(parsed) => parsed,
                Err(error) => {
                    self.pos = after;
                    return Some(Err(SkippedTag { start, error }));
                }
            };

            if self_closing {
                self.pos = end;
                return Some(Ok(RawTag { start, attributes, body: None }));
            }

            let rest = &text[end..];
            return match body_end(rest) {
                Some(c) => {
                    self.pos = end + c + CLOSE.len();
                    Some(Ok(RawTag { start, attributes, body: Some(&rest[..c]) }))
                }
                None => {
                    self.pos = end;
                    Some(Err(SkippedTag { start, error: ParseError::MissingCloseTag }))
                }
            };
        }
    }
}

/// Offset of the close tag ending the body that starts `rest`
///
/// `None` when another open tag begins first or no close tag follows. An open
/// marker inside a JSON string literal is body text, not a new tag.
fn body_end(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        let tail = &bytes[i..];
        if tail.starts_with(CLOSE.as_bytes()) {
            return Some(i);
        }
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            b'<' if !in_string
                && tail.starts_with(OPEN.as_bytes())
                && bytes.get(i + OPEN.len()).map_or(true, |&b| is_tag_boundary(b)) =>
            {
                return None;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Byte that may follow `<tool_call` in a real tag
fn is_tag_boundary(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'>' || b == b'/'
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(text: &str) -> Vec<Result<RawTag<'_>, SkippedTag>> {
        TagScanner::new(text).collect()
    }

    #[test]
    fn test_attributes_and_body() {
        let text = r#"before <tool_call name="read" arguments='{"a":1}'>inner</tool_call> after"#;
        let found = tags(text);
        assert_eq!(found.len(), 1);

        let tag = found[0].as_ref().unwrap();
        assert_eq!(tag.start, 7);
        assert_eq!(tag.attribute("NAME"), Some("read"));
        assert_eq!(tag.attribute("arguments"), Some(r#"{"a":1}"#));
        assert_eq!(tag.body, Some("inner"));
    }

    #[test]
    fn test_self_closing() {
        let found = tags(r#"<tool_call name=list />"#);
        let tag = found[0].as_ref().unwrap();
        assert_eq!(tag.attribute("name"), Some("list"));
        assert_eq!(tag.body, None);
    }

    #[test]
    fn test_unquoted_value_before_self_close() {
        let found = tags("<tool_call name=list/> tail");
        assert_eq!(found.len(), 1);
        let tag = found[0].as_ref().unwrap();
        assert_eq!(tag.attribute("name"), Some("list"));
        assert_eq!(tag.body, None);
    }

    #[test]
    fn test_open_marker_inside_json_string_is_body_text() {
        let text = r#"<tool_call name="write_note">{"text": "use <tool_call> blocks"}</tool_call>"#;
        let found = tags(text);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].as_ref().unwrap().body,
            Some(r#"{"text": "use <tool_call> blocks"}"#)
        );
    }

    #[test]
    fn test_similar_tag_name_inside_body() {
        let text = r#"<tool_call name="a">see <tool_calls></tool_call>"#;
        let found = tags(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].as_ref().unwrap().body, Some("see <tool_calls>"));
    }

    #[test]
    fn test_escaped_quote_stays_in_value() {
        let found = tags(r#"<tool_call name="x" arguments="{\"a\":1}"></tool_call>"#);
        let tag = found[0].as_ref().unwrap();
        assert_eq!(tag.attribute("arguments"), Some(r#"{\"a\":1}"#));
    }

    #[test]
    fn test_similar_tag_names_ignored() {
        assert!(tags("<tool_calls>[]</tool_calls> <tool_caller>").is_empty());
    }

    #[test]
    fn test_missing_close_then_recovery() {
        let text = r#"<tool_call name="a">oops <tool_call name="b"></tool_call>"#;
        let found = tags(text);
        assert_eq!(found.len(), 2);
        assert_eq!(
            found[0],
            Err(SkippedTag { start: 0, error: ParseError::MissingCloseTag })
        );
        assert_eq!(found[1].as_ref().unwrap().attribute("name"), Some("b"));
    }

    #[test]
    fn test_unterminated_open_tag() {
        let found = tags(r#"<tool_call name="a"#);
        assert_eq!(found.len(), 1);
        assert!(matches!(
            found[0],
            Err(SkippedTag { error: ParseError::UnterminatedTag, .. })
        ));
    }

    #[test]
    fn test_non_ascii_text_around_tags() {
        let text = "café ☕ <tool_call name=\"ünïcode\"></tool_call> ✓";
        let found = tags(text);
        assert_eq!(found[0].as_ref().unwrap().attribute("name"), Some("ünïcode"));
    }
}
