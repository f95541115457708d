use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::keywords::{Keyword, RESERVED_FOR_COLUMN_ALIAS};
use crate::parser::Parser;
use crate::tokens::Token;

use super::{
    AstParseable,
    DisplayCommaSeparated,
    Expr,
    FromNode,
    Ident,
    ObjectReference,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectNode {
    /// Items being selected.
    pub projections: Vec<SelectExpr>,
    /// A FROM clause including joins.
    ///
    /// `FROM <table|function|subquery> [, | JOIN <table|function|subquery> ...]`
    pub from: Option<FromNode>,
    /// WHERE
    pub where_expr: Option<Expr>,
    /// GROUP BY
    pub group_by: Option<GroupByNode>,
    /// HAVING
    pub having: Option<Expr>,
}

impl AstParseable for SelectNode {
    fn parse(parser: &mut Parser) -> Result<Self> {
        parser.expect_keyword(Keyword::SELECT)?;

        let projections = parser.parse_comma_separated(SelectExpr::parse)?;

        let from = if parser.parse_keyword(Keyword::FROM) {
            Some(FromNode::parse(parser)?)
        } else {
            None
        };

        let where_expr = if parser.parse_keyword(Keyword::WHERE) {
            Some(Expr::parse(parser)?)
        } else {
            None
        };

        let group_by = if parser.parse_keyword_sequence(&[Keyword::GROUP, Keyword::BY]) {
            Some(GroupByNode::parse(parser)?)
        } else {
            None
        };

        let having = if parser.parse_keyword(Keyword::HAVING) {
            Some(Expr::parse(parser)?)
        } else {
            None
        };

        Ok(SelectNode {
            projections,
            from,
            where_expr,
            group_by,
            having,
        })
    }
}

impl fmt::Display for SelectNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SELECT {}", DisplayCommaSeparated(&self.projections))?;
        if let Some(from) = &self.from {
            write!(f, " FROM {from}")?;
        }
        if let Some(where_expr) = &self.where_expr {
            write!(f, " WHERE {where_expr}")?;
        }
        if let Some(group_by) = &self.group_by {
            write!(f, " GROUP BY {group_by}")?;
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {having}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectExpr {
    /// An unaliases expression.
    Expr(Expr),
    /// An aliased expression.
    ///
    /// `<expr> AS <ident>`
    AliasedExpr(Expr, Ident),
    /// A qualified wild card.
    ///
    /// `<reference>.*`
    QualifiedWildcard(ObjectReference),
    /// An unqualifed wild card.
    Wildcard,
}

impl AstParseable for SelectExpr {
    fn parse(parser: &mut Parser) -> Result<Self> {
        // `*` and `t.*` need a look before general expression parsing since
        // '*' is otherwise multiplication.
        let idx = parser.idx;
        if let Some(wildcard) = Self::maybe_parse_wildcard(parser) {
            return Ok(wildcard);
        }
        parser.idx = idx;

        let expr = Expr::parse(parser)?;
        match parser.parse_alias(RESERVED_FOR_COLUMN_ALIAS)? {
            Some(alias) => Ok(SelectExpr::AliasedExpr(expr, alias)),
            None => Ok(SelectExpr::Expr(expr)),
        }
    }
}

impl SelectExpr {
    /// Try to parse a (possibly qualified) wildcard.
    ///
    /// The caller resets the parser index on None.
    fn maybe_parse_wildcard(parser: &mut Parser) -> Option<Self> {
        if parser.consume_token(&Token::Mul) {
            return Some(SelectExpr::Wildcard);
        }

        let mut idents = Vec::new();
        loop {
            let value = match parser.peek().map(|tok| &tok.token) {
                Some(Token::Word(w)) => w.value.clone(),
                _ => return None,
            };
            parser.next();
            idents.push(Ident { value });

            if !parser.consume_token(&Token::Period) {
                return None;
            }
            if parser.consume_token(&Token::Mul) {
                return Some(SelectExpr::QualifiedWildcard(ObjectReference(idents)));
            }
        }
    }
}

impl fmt::Display for SelectExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(expr) => write!(f, "{expr}"),
            Self::AliasedExpr(expr, alias) => write!(f, "{expr} AS {alias}"),
            Self::QualifiedWildcard(reference) => write!(f, "{reference}.*"),
            Self::Wildcard => write!(f, "*"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupByNode {
    All,
    Exprs { exprs: Vec<Expr> },
}

impl AstParseable for GroupByNode {
    fn parse(parser: &mut Parser) -> Result<Self> {
        if parser.parse_keyword(Keyword::ALL) {
            return Ok(GroupByNode::All);
        }
        let exprs = parser.parse_comma_separated(Expr::parse)?;
        Ok(GroupByNode::Exprs { exprs })
    }
}

impl fmt::Display for GroupByNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "ALL"),
            Self::Exprs { exprs } => write!(f, "{}", DisplayCommaSeparated(exprs)),
        }
    }
}
