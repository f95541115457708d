/// Error returned when tokenizing or parsing fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg}")]
pub struct ParseError {
    msg: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        ParseError { msg: msg.into() }
    }
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;
