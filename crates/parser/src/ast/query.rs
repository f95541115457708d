use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::keywords::Keyword;
use crate::parser::Parser;
use crate::tokens::Token;

use super::{
    AstParseable,
    DisplayCommaSeparated,
    Expr,
    LimitModifier,
    OrderByNode,
    SelectNode,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryNode {
    /// Main body of the query.
    pub body: QueryNodeBody,
    /// ORDER BY
    pub order_by: Vec<OrderByNode>,
    /// LIMIT and OFFSET, in either written order.
    pub limit: LimitModifier,
}

impl QueryNode {
    /// Whether the parser is at the start of a query node.
    ///
    /// Used to decide between a subquery and a nested expression after an
    /// opening paren.
    pub(crate) fn is_query_node_start(parser: &Parser) -> bool {
        matches!(
            parser.peek().and_then(|tok| tok.keyword()),
            Some(Keyword::SELECT | Keyword::VALUES)
        )
    }
}

impl AstParseable for QueryNode {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let body = QueryNodeBody::parse(parser)?;

        let order_by = if parser.parse_keyword_sequence(&[Keyword::ORDER, Keyword::BY]) {
            parser.parse_comma_separated(OrderByNode::parse)?
        } else {
            Vec::new()
        };

        let limit = LimitModifier::parse(parser)?;

        Ok(QueryNode {
            body,
            order_by,
            limit,
        })
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.body)?;
        if !self.order_by.is_empty() {
            write!(f, " ORDER BY {}", DisplayCommaSeparated(&self.order_by))?;
        }
        write!(f, "{}", self.limit)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryNodeBody {
    Select(Box<SelectNode>),
    Nested(Box<QueryNodeBody>),
    Set {
        left: Box<QueryNodeBody>,
        right: Box<QueryNodeBody>,
        operation: SetOperation,
        all: bool,
    },
    Values(Values),
}

impl AstParseable for QueryNodeBody {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let mut body = Self::parse_primary(parser)?;

        loop {
            let operation = match parser.parse_one_of_keywords(&[
                Keyword::UNION,
                Keyword::EXCEPT,
                Keyword::INTERSECT,
            ]) {
                Some(Keyword::UNION) => SetOperation::Union,
                Some(Keyword::EXCEPT) => SetOperation::Except,
                Some(Keyword::INTERSECT) => SetOperation::Intersect,
                _ => break,
            };
            let all = parser.parse_keyword(Keyword::ALL);
            let right = Self::parse_primary(parser)?;

            body = QueryNodeBody::Set {
                left: Box::new(body),
                right: Box::new(right),
                operation,
                all,
            };
        }

        Ok(body)
    }
}

impl QueryNodeBody {
    fn parse_primary(parser: &mut Parser) -> Result<Self> {
        if parser.consume_token(&Token::LeftParen) {
            let body = QueryNodeBody::parse(parser)?;
            parser.expect_token(&Token::RightParen)?;
            return Ok(QueryNodeBody::Nested(Box::new(body)));
        }

        if parser.parse_keyword(Keyword::VALUES) {
            return Ok(QueryNodeBody::Values(Values::parse_rows(parser)?));
        }

        Ok(QueryNodeBody::Select(Box::new(SelectNode::parse(parser)?)))
    }
}

impl fmt::Display for QueryNodeBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(select) => write!(f, "{select}"),
            Self::Nested(body) => write!(f, "({body})"),
            Self::Set {
                left,
                right,
                operation,
                all,
            } => {
                let all = if *all { " ALL" } else { "" };
                write!(f, "{left} {operation}{all} {right}")
            }
            Self::Values(values) => write!(f, "{values}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOperation {
    Union,
    Except,
    Intersect,
}

impl fmt::Display for SetOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Union => "UNION",
            Self::Except => "EXCEPT",
            Self::Intersect => "INTERSECT",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Values {
    pub rows: Vec<Vec<Expr>>,
}

impl Values {
    /// Parse rows, assuming VALUES was already consumed.
    fn parse_rows(parser: &mut Parser) -> Result<Self> {
        let rows =
            parser.parse_comma_separated(|p| p.parse_parenthesized_comma_separated(Expr::parse))?;
        Ok(Values { rows })
    }
}

impl fmt::Display for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VALUES ")?;
        let mut sep = "";
        for row in &self.rows {
            write!(f, "{sep}({})", DisplayCommaSeparated(row))?;
            sep = ", ";
        }
        Ok(())
    }
}
