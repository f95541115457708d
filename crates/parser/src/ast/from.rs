use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ParseError, Result};
use crate::keywords::{Keyword, RESERVED_FOR_TABLE_ALIAS};
use crate::parser::Parser;
use crate::tokens::Token;

use super::{
    AstParseable,
    DisplayCommaSeparated,
    Expr,
    Ident,
    Literal,
    ObjectReference,
    QueryNode,
    Symbol,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromNode {
    pub alias: Option<FromAlias>,
    pub body: FromNodeBody,
}

impl AstParseable for FromNode {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let mut node = FromNode::parse_base(parser)?;

        // Possible joins.
        loop {
            if parser.consume_token(&Token::Comma) {
                // Comma join, equivalent to a cross join.
                let right = FromNode::parse_base(parser)?;
                let condition = JoinCondition::None;
                let flags = JoinFlags::new(false, Symbol::Cross, &condition);
                node = FromNode {
                    alias: None,
                    body: FromNodeBody::Join(FromJoin {
                        left: Box::new(node),
                        right: Box::new(right),
                        flags,
                        condition,
                    }),
                };
                continue;
            }

            let natural = parser.parse_keyword(Keyword::NATURAL);

            let kind = if parser.parse_keyword(Keyword::JOIN)
                || parser.parse_keyword_sequence(&[Keyword::INNER, Keyword::JOIN])
            {
                Symbol::Inner
            } else if parser.parse_keyword(Keyword::LEFT) {
                parser.parse_keyword(Keyword::OUTER); // Optional.
                parser.expect_keyword(Keyword::JOIN)?;
                Symbol::Left
            } else if parser.parse_keyword(Keyword::RIGHT) {
                parser.parse_keyword(Keyword::OUTER);
                parser.expect_keyword(Keyword::JOIN)?;
                Symbol::Right
            } else if parser.parse_keyword(Keyword::FULL) {
                parser.parse_keyword(Keyword::OUTER);
                parser.expect_keyword(Keyword::JOIN)?;
                Symbol::Full
            } else if parser.parse_keyword_sequence(&[Keyword::CROSS, Keyword::JOIN]) {
                Symbol::Cross
            } else {
                if natural {
                    return Err(ParseError::new("Expected a join after NATURAL"));
                }
                break;
            };

            let right = FromNode::parse_base(parser)?;

            let condition = if kind == Symbol::Cross {
                JoinCondition::None
            } else if natural {
                JoinCondition::Natural
            } else if parser.parse_keyword(Keyword::ON) {
                JoinCondition::On(Expr::parse(parser)?)
            } else if parser.parse_keyword(Keyword::USING) {
                JoinCondition::Using(parser.parse_parenthesized_comma_separated(Ident::parse)?)
            } else {
                JoinCondition::None
            };

            let flags = JoinFlags::new(natural, kind, &condition);

            node = FromNode {
                alias: None,
                body: FromNodeBody::Join(FromJoin {
                    left: Box::new(node),
                    right: Box::new(right),
                    flags,
                    condition,
                }),
            };
        }

        Ok(node)
    }
}

impl FromNode {
    /// Parse a single table factor, no joins.
    fn parse_base(parser: &mut Parser) -> Result<Self> {
        if parser.consume_token(&Token::LeftParen) {
            if QueryNode::is_query_node_start(parser) {
                let query = QueryNode::parse(parser)?;
                parser.expect_token(&Token::RightParen)?;
                let alias = FromAlias::parse_optional(parser)?;
                return Ok(FromNode {
                    alias,
                    body: FromNodeBody::Subquery {
                        query: Box::new(query),
                    },
                });
            }

            // Parenthesized joins.
            let mut node = FromNode::parse(parser)?;
            parser.expect_token(&Token::RightParen)?;
            if let Some(alias) = FromAlias::parse_optional(parser)? {
                node.alias = Some(alias);
            }
            return Ok(node);
        }

        let reference = ObjectReference::parse(parser)?;
        let alias = FromAlias::parse_optional(parser)?;
        Ok(FromNode {
            alias,
            body: FromNodeBody::BaseTable { reference },
        })
    }
}

impl fmt::Display for FromNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.body)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromAlias {
    pub alias: Ident,
    pub columns: Option<Vec<Ident>>,
}

impl FromAlias {
    fn parse_optional(parser: &mut Parser) -> Result<Option<Self>> {
        let alias = match parser.parse_alias(RESERVED_FOR_TABLE_ALIAS)? {
            Some(alias) => alias,
            None => return Ok(None),
        };

        let columns = if parser.consume_token(&Token::LeftParen) {
            let columns = parser.parse_comma_separated(Ident::parse)?;
            parser.expect_token(&Token::RightParen)?;
            Some(columns)
        } else {
            None
        };

        Ok(Some(FromAlias { alias, columns }))
    }
}

impl fmt::Display for FromAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alias)?;
        if let Some(columns) = &self.columns {
            write!(f, "({})", DisplayCommaSeparated(columns))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromNodeBody {
    BaseTable { reference: ObjectReference },
    Subquery { query: Box<QueryNode> },
    Join(FromJoin),
}

impl fmt::Display for FromNodeBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BaseTable { reference } => write!(f, "{reference}"),
            Self::Subquery { query } => write!(f, "({query})"),
            Self::Join(join) => write!(f, "{join}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromJoin {
    pub left: Box<FromNode>,
    pub right: Box<FromNode>,
    pub flags: JoinFlags,
    pub condition: JoinCondition,
}

impl fmt::Display for FromJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.left)?;
        if self.flags.is_natural() {
            write!(f, "NATURAL ")?;
        }
        let kind = match self.flags.kind_symbol() {
            Symbol::Left => "LEFT ",
            Symbol::Right => "RIGHT ",
            Symbol::Full => "FULL ",
            Symbol::Cross => "CROSS ",
            _ => "INNER ",
        };
        write!(f, "{kind}JOIN {}", self.right)?;
        match &self.condition {
            JoinCondition::On(expr) => write!(f, " ON {expr}")?,
            JoinCondition::Using(columns) => {
                write!(f, " USING ({})", DisplayCommaSeparated(columns))?
            }
            JoinCondition::Natural | JoinCondition::None => {}
        }
        Ok(())
    }
}

/// Join shape normalized into literal nodes.
///
/// Syntax like `NATURAL LEFT JOIN ... ` carries information that doesn't live
/// in any one expression, so it's materialized as literals here. These are
/// regular tree nodes, visitors see them like any other literal, but no user
/// text maps onto them directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinFlags {
    /// Whether this is a NATURAL join. Always a [`Literal::Boolean`].
    pub natural: Literal,
    /// The join kind. Always a [`Literal::Symbol`].
    pub kind: Literal,
    /// How the join is conditioned (ON, USING, or neither). Always a
    /// [`Literal::Symbol`].
    pub qualifier: Literal,
}

impl JoinFlags {
    pub fn new(natural: bool, kind: Symbol, condition: &JoinCondition) -> Self {
        let qualifier = match condition {
            JoinCondition::On(_) => Symbol::On,
            JoinCondition::Using(_) => Symbol::Using,
            JoinCondition::Natural | JoinCondition::None => Symbol::Unconditioned,
        };
        JoinFlags {
            natural: Literal::Boolean(natural),
            kind: Literal::Symbol(kind),
            qualifier: Literal::Symbol(qualifier),
        }
    }

    pub fn is_natural(&self) -> bool {
        self.natural == Literal::Boolean(true)
    }

    pub fn kind_symbol(&self) -> Symbol {
        match self.kind {
            Literal::Symbol(s) => s,
            _ => Symbol::Inner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinCondition {
    On(Expr),
    Using(Vec<Ident>),
    Natural,
    None,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::testutil::parse_ast;
    use crate::ast::BinaryOperator;

    fn base(name: &str) -> FromNode {
        FromNode {
            alias: None,
            body: FromNodeBody::BaseTable {
                reference: ObjectReference::from_strings([name]),
            },
        }
    }

    #[test]
    fn base_table_with_alias() {
        let from: FromNode = parse_ast("t1 AS alias").unwrap();
        let expected = FromNode {
            alias: Some(FromAlias {
                alias: Ident::from_string("alias"),
                columns: None,
            }),
            body: FromNodeBody::BaseTable {
                reference: ObjectReference::from_strings(["t1"]),
            },
        };
        assert_eq!(expected, from);
    }

    #[test]
    fn inner_join_on() {
        let from: FromNode = parse_ast("t1 join t2 on t1.a = t2.a").unwrap();
        let join = match from.body {
            FromNodeBody::Join(join) => join,
            other => panic!("unexpected body: {other:?}"),
        };

        assert_eq!(base("t1"), *join.left);
        assert_eq!(base("t2"), *join.right);
        assert_eq!(
            JoinFlags {
                natural: Literal::Boolean(false),
                kind: Literal::Symbol(Symbol::Inner),
                qualifier: Literal::Symbol(Symbol::On),
            },
            join.flags
        );
        assert!(matches!(
            join.condition,
            JoinCondition::On(Expr::BinaryExpr {
                op: BinaryOperator::Eq,
                ..
            })
        ));
    }

    #[test]
    fn natural_join() {
        let from: FromNode = parse_ast("t1 natural join t2").unwrap();
        let join = match from.body {
            FromNodeBody::Join(join) => join,
            other => panic!("unexpected body: {other:?}"),
        };
        assert_eq!(
            JoinFlags {
                natural: Literal::Boolean(true),
                kind: Literal::Symbol(Symbol::Inner),
                qualifier: Literal::Symbol(Symbol::Unconditioned),
            },
            join.flags
        );
        assert_eq!(JoinCondition::Natural, join.condition);
    }

    #[test]
    fn using_join() {
        let from: FromNode = parse_ast("t1 left join t2 using (a, b)").unwrap();
        let join = match from.body {
            FromNodeBody::Join(join) => join,
            other => panic!("unexpected body: {other:?}"),
        };
        assert_eq!(
            JoinFlags {
                natural: Literal::Boolean(false),
                kind: Literal::Symbol(Symbol::Left),
                qualifier: Literal::Symbol(Symbol::Using),
            },
            join.flags
        );
        assert_eq!(
            JoinCondition::Using(vec![Ident::from_string("a"), Ident::from_string("b")]),
            join.condition
        );
    }

    #[test]
    fn comma_join_is_cross() {
        let from: FromNode = parse_ast("t1, t2").unwrap();
        let join = match from.body {
            FromNodeBody::Join(join) => join,
            other => panic!("unexpected body: {other:?}"),
        };
        assert_eq!(Literal::Symbol(Symbol::Cross), join.flags.kind);
        assert_eq!(JoinCondition::None, join.condition);
    }

    #[test]
    fn display_round_trip() {
        let froms = [
            "t1 INNER JOIN t2 ON t1.a = t2.a",
            "t1 NATURAL INNER JOIN t2",
            "t1 LEFT JOIN t2 USING (a)",
            "t1 CROSS JOIN t2",
        ];
        for sql in froms {
            let from: FromNode = parse_ast(sql).unwrap();
            assert_eq!(sql, from.to_string());
        }
    }
}
