use parser::ast::Literal;
use parser::ast::visit::contains_parameters;
use parser::statement::Statement;
use tracing::debug;

use crate::errors::Result;
use crate::rewrite::Parameterizer;
use crate::statement::ParsedStatement;

/// Parse and parameterize SQL text holding a single statement.
pub fn prepare(sql: impl Into<String>) -> Result<ParameterizedStatement> {
    let parsed = ParsedStatement::parse(sql)?;
    Ok(ParameterizedStatement::new(parsed))
}

/// A statement in its canonical, plan-cacheable form.
///
/// For parameterizable statements this holds the rewritten tree, its display
/// text, and the displaced literals in marker order. Statements that can't be
/// parameterized (DDL, or statements that already carry markers) keep their
/// original tree and text and have no literal list.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedStatement {
    sql: String,
    statement: Statement,
    literals: Option<Vec<Literal>>,
}

impl ParameterizedStatement {
    pub fn new(parsed: ParsedStatement) -> Self {
        let (sql, statement) = parsed.into_parts();

        if statement.is_ddl() {
            debug!(%sql, "skipping parameterization for ddl");
            return ParameterizedStatement {
                sql,
                statement,
                literals: None,
            };
        }

        if contains_parameters(&statement) {
            debug!(%sql, "skipping parameterization, statement already has parameters");
            return ParameterizedStatement {
                sql,
                statement,
                literals: None,
            };
        }

        let (statement, literals) = Parameterizer::rewrite(&statement);
        let sql = statement.to_string();
        debug!(%sql, num_literals = literals.len(), "parameterized statement");

        ParameterizedStatement {
            sql,
            statement,
            literals: Some(literals),
        }
    }

    /// The statement text. Canonical display text when parameterized, the
    /// original text otherwise.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Displaced literals in marker order. None if the statement wasn't
    /// parameterizable.
    pub fn literals(&self) -> Option<&[Literal]> {
        self.literals.as_deref()
    }

    pub fn is_parameterized(&self) -> bool {
        self.literals.is_some()
    }
}
