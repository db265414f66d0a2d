use thiserror::Error;

/// Why a single tool call was dropped
///
/// Never fatal to a parse; the offending block is logged and skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("unterminated <tool_call> tag")]
    UnterminatedTag,

    #[error("malformed attribute in <tool_call> tag")]
    MalformedTag,

    #[error("missing </tool_call>")]
    MissingCloseTag,

    #[error("tool call has no name")]
    MissingName,

    #[error("invalid arguments JSON: {0}")]
    InvalidArguments(String),

    #[error("arguments must be a JSON object")]
    ArgumentsNotObject,
}
