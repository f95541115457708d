use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::keywords::Keyword;
use crate::parser::Parser;
use crate::tokens::Token;

use super::{AstParseable, DisplayCommaSeparated, Ident, ObjectReference, QueryNode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    /// Table being inserted into.
    pub table: ObjectReference,
    /// Optional columns list.
    pub columns: Vec<Ident>,
    /// Source of the insert, a VALUES list or a query.
    pub source: QueryNode,
}

impl AstParseable for Insert {
    fn parse(parser: &mut Parser) -> Result<Self> {
        parser.expect_keyword(Keyword::INSERT)?;
        parser.expect_keyword(Keyword::INTO)?;

        let table = ObjectReference::parse(parser)?;

        // Optional columns list. Needs a lookahead since the source may also
        // start with a paren.
        let columns = if parser.consume_token(&Token::LeftParen) {
            if QueryNode::is_query_node_start(parser) {
                // Not a columns list after all, a parenthesized source.
                parser.idx -= 1;
                Vec::new()
            } else {
                let columns = parser.parse_comma_separated(Ident::parse)?;
                parser.expect_token(&Token::RightParen)?;
                columns
            }
        } else {
            Vec::new()
        };

        let source = QueryNode::parse(parser)?;

        Ok(Insert {
            table,
            columns,
            source,
        })
    }
}

impl fmt::Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "INSERT INTO {}", self.table)?;
        if !self.columns.is_empty() {
            write!(f, " ({})", DisplayCommaSeparated(&self.columns))?;
        }
        write!(f, " {}", self.source)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::testutil::parse_ast;
    use crate::ast::{Expr, Literal, QueryNodeBody, Values};

    #[test]
    fn insert_values() {
        let insert: Insert = parse_ast("insert into t1 values (1, 'two')").unwrap();
        assert_eq!(ObjectReference::from_strings(["t1"]), insert.table);
        assert!(insert.columns.is_empty());
        let expected = QueryNodeBody::Values(Values {
            rows: vec![vec![
                Expr::Literal(Literal::Number("1".to_string())),
                Expr::Literal(Literal::SingleQuotedString("two".to_string())),
            ]],
        });
        assert_eq!(expected, insert.source.body);
    }

    #[test]
    fn insert_with_columns() {
        let insert: Insert = parse_ast("insert into t1 (a, b) values (1, 2)").unwrap();
        assert_eq!(
            vec![Ident::from_string("a"), Ident::from_string("b")],
            insert.columns
        );
    }

    #[test]
    fn insert_from_query() {
        let insert: Insert = parse_ast("insert into t1 select * from t2").unwrap();
        assert!(matches!(insert.source.body, QueryNodeBody::Select(_)));
    }

    #[test]
    fn display_round_trip() {
        let sql = "INSERT INTO t1 (a, b) VALUES (1, 2)";
        let insert: Insert = parse_ast(sql).unwrap();
        assert_eq!(sql, insert.to_string());
    }
}
