use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Parse(#[from] parser::errors::ParseError),
}

pub type Result<T, E = PrepareError> = std::result::Result<T, E>;

macro_rules! internal {
    ($($arg:tt)*) => {
        crate::errors::PrepareError::Internal(format!($($arg)*))
    };
}
pub(crate) use internal;
