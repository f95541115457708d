use parser::parse;
use parser::statement::Statement;

use crate::errors::{Result, internal};

/// A single parsed statement along with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    sql: String,
    statement: Statement,
}

impl ParsedStatement {
    /// Parse SQL text holding exactly one statement.
    pub fn parse(sql: impl Into<String>) -> Result<Self> {
        let sql = sql.into();
        let mut statements = parse(&sql)?;
        let statement = match (statements.pop(), statements.pop()) {
            (Some(statement), None) => statement,
            (None, _) => return Err(internal!("Expected a statement, got none")),
            _ => {
                return Err(internal!(
                    "Expected exactly one statement, got {}",
                    statements.len() + 2
                ));
            }
        };
        Ok(ParsedStatement { sql, statement })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn into_parts(self) -> (String, Statement) {
        (self.sql, self.statement)
    }
}
