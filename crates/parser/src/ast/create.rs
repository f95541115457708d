use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ParseError, Result};
use crate::keywords::Keyword;
use crate::parser::Parser;
use crate::tokens::Token;

use super::{AstParseable, DisplayCommaSeparated, Expr, Ident, ObjectReference};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTable {
    pub name: ObjectReference,
    pub if_not_exists: bool,
    pub columns: Vec<ColumnDef>,
}

impl fmt::Display for CreateTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CREATE TABLE ")?;
        if self.if_not_exists {
            write!(f, "IF NOT EXISTS ")?;
        }
        write!(f, "{} ({})", self.name, DisplayCommaSeparated(&self.columns))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropTable {
    pub name: ObjectReference,
    pub if_exists: bool,
}

impl fmt::Display for DropTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DROP TABLE ")?;
        if self.if_exists {
            write!(f, "IF EXISTS ")?;
        }
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: Ident,
    pub datatype: DataType,
    pub default: Option<Expr>,
    pub not_null: bool,
    pub primary_key: bool,
}

impl AstParseable for ColumnDef {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let name = Ident::parse(parser)?;
        let datatype = DataType::parse(parser)?;

        let mut default = None;
        let mut not_null = false;
        let mut primary_key = false;
        loop {
            if parser.parse_keyword(Keyword::DEFAULT) {
                default = Some(Expr::parse(parser)?);
            } else if parser.parse_keyword_sequence(&[Keyword::NOT, Keyword::NULL]) {
                not_null = true;
            } else if parser.parse_keyword_sequence(&[Keyword::PRIMARY, Keyword::KEY]) {
                primary_key = true;
            } else {
                break;
            }
        }

        Ok(ColumnDef {
            name,
            datatype,
            default,
            not_null,
            primary_key,
        })
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.datatype)?;
        if let Some(default) = &self.default {
            write!(f, " DEFAULT {default}")?;
        }
        if self.not_null {
            write!(f, " NOT NULL")?;
        }
        if self.primary_key {
            write!(f, " PRIMARY KEY")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataType {
    SmallInt,
    Integer,
    BigInt,
    Boolean,
    Double,
    Text,
    Varchar(Option<u64>),
}

impl AstParseable for DataType {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let datatype = match parser.next_keyword()? {
            Keyword::SMALLINT => DataType::SmallInt,
            Keyword::INT | Keyword::INTEGER => DataType::Integer,
            Keyword::BIGINT => DataType::BigInt,
            Keyword::BOOLEAN => DataType::Boolean,
            Keyword::DOUBLE => DataType::Double,
            Keyword::TEXT => DataType::Text,
            Keyword::VARCHAR => {
                let len = if parser.consume_token(&Token::LeftParen) {
                    let len = Self::parse_length(parser)?;
                    parser.expect_token(&Token::RightParen)?;
                    Some(len)
                } else {
                    None
                };
                DataType::Varchar(len)
            }
            other => {
                return Err(ParseError::new(format!(
                    "Unexpected keyword for data type: {other:?}"
                )));
            }
        };
        Ok(datatype)
    }
}

impl DataType {
    fn parse_length(parser: &mut Parser) -> Result<u64> {
        let tok = match parser.next() {
            Some(tok) => &tok.token,
            None => return Err(ParseError::new("Expected a length, found end of statement")),
        };
        match tok {
            Token::Number(n) => n
                .parse::<u64>()
                .map_err(|_| ParseError::new(format!("Invalid length: {n}"))),
            other => Err(ParseError::new(format!(
                "Expected a length, got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SmallInt => write!(f, "SMALLINT"),
            Self::Integer => write!(f, "INT"),
            Self::BigInt => write!(f, "BIGINT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Double => write!(f, "DOUBLE"),
            Self::Text => write!(f, "TEXT"),
            Self::Varchar(None) => write!(f, "VARCHAR"),
            Self::Varchar(Some(len)) => write!(f, "VARCHAR({len})"),
        }
    }
}
