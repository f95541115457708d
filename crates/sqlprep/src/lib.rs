//! Query parameterization for plan caching.
//!
//! Takes a parsed statement and lifts the constants a user wrote out of the
//! tree, leaving numbered parameter markers behind. Two queries that differ
//! only in their constants end up with the same canonical statement, so a
//! plan compiled for one can be reused for the other by binding the extracted
//! constants back in.

pub mod bind;
pub mod classify;
pub mod errors;
pub mod prepare;
pub mod rewrite;
pub mod statement;

pub use bind::bind_parameters;
pub use errors::{PrepareError, Result};
pub use prepare::{ParameterizedStatement, prepare};
pub use statement::ParsedStatement;
