use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::{CreateTable, DropTable, Insert, QueryNode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// SELECT/VALUES statements.
    Query(QueryNode),
    /// INSERT INTO ...
    Insert(Insert),
    /// CREATE TABLE ...
    CreateTable(CreateTable),
    /// DROP TABLE ...
    DropTable(DropTable),
}

impl Statement {
    /// Whether this statement changes the schema.
    pub fn is_ddl(&self) -> bool {
        matches!(self, Statement::CreateTable(_) | Statement::DropTable(_))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(query) => write!(f, "{query}"),
            Self::Insert(insert) => write!(f, "{insert}"),
            Self::CreateTable(create) => write!(f, "{create}"),
            Self::DropTable(drop) => write!(f, "{drop}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::parse;

    #[test]
    fn ddl_classification() {
        // (input, is_ddl)
        let tests = [
            ("select * from t1", false),
            ("insert into t1 values (1)", false),
            ("create table t1 (a int)", true),
            ("drop table t1", true),
        ];
        for (sql, expected) in tests {
            let mut statements = parse(sql).unwrap();
            assert_eq!(expected, statements.pop().unwrap().is_ddl(), "sql: {sql}");
        }
    }

    #[test]
    fn statement_display_round_trip() {
        let queries = [
            "SELECT * FROM t1 WHERE id = ? LIMIT ? OFFSET ?",
            "INSERT INTO t1 VALUES (?, ?)",
            "CREATE TABLE t1 (a INT DEFAULT 1)",
            "DROP TABLE IF EXISTS t1",
        ];
        for sql in queries {
            let mut statements = parse(sql).unwrap();
            assert_eq!(sql, statements.pop().unwrap().to_string());
        }
    }
}
