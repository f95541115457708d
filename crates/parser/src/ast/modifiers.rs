use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::keywords::Keyword;
use crate::parser::Parser;

use super::{AstParseable, Expr};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByNode {
    pub expr: Expr,
    pub sort: Option<SortOrder>,
}

impl AstParseable for OrderByNode {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let expr = Expr::parse(parser)?;
        let sort = if parser.parse_keyword(Keyword::ASC) {
            Some(SortOrder::Asc)
        } else if parser.parse_keyword(Keyword::DESC) {
            Some(SortOrder::Desc)
        } else {
            None
        };
        Ok(OrderByNode { expr, sort })
    }
}

impl fmt::Display for OrderByNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        match self.sort {
            Some(SortOrder::Asc) => write!(f, " ASC")?,
            Some(SortOrder::Desc) => write!(f, " DESC")?,
            None => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// LIMIT and OFFSET clauses.
///
/// Accepts either written order; the node and its display are the same for
/// both, always LIMIT then OFFSET.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LimitModifier {
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

impl AstParseable for LimitModifier {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let mut modifier = LimitModifier::default();
        loop {
            if modifier.limit.is_none() && parser.parse_keyword(Keyword::LIMIT) {
                modifier.limit = Some(Expr::parse(parser)?);
                continue;
            }
            if modifier.offset.is_none() && parser.parse_keyword(Keyword::OFFSET) {
                modifier.offset = Some(Expr::parse(parser)?);
                continue;
            }
            break;
        }
        Ok(modifier)
    }
}

impl fmt::Display for LimitModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if let Some(offset) = &self.offset {
            write!(f, " OFFSET {offset}")?;
        }
        Ok(())
    }
}
