//! SQL parser. Heavily inspired by sqlparser-rs.
pub mod ast;
pub mod errors;
pub mod keywords;
pub mod parser;
pub mod statement;
pub mod tokens;

pub use parser::parse;
