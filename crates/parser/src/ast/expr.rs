use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{ParseError, Result};
use crate::keywords::Keyword;
use crate::parser::Parser;
use crate::tokens::Token;

use super::{AstParseable, DisplayCommaSeparated, Ident, ObjectReference, OrderByNode, QueryNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// Plus, e.g. `+9`
    Plus,
    /// Minus, e.g. `-9`
    Minus,
    /// Not, e.g. `NOT(true)`
    Not,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "NOT ",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    /// Plus, e.g. `a + b`
    Plus,
    /// Minus, e.g. `a - b`
    Minus,
    /// Multiply, e.g. `a * b`
    Multiply,
    /// Divide, e.g. `a / b`
    Divide,
    /// Modulo, e.g. `a % b`
    Modulo,
    /// String concat operator, e.g. `a || b`
    StringConcat,
    /// Greater than, e.g. `a > b`
    Gt,
    /// Less than, e.g. `a < b`
    Lt,
    /// Greater equal, e.g. `a >= b`
    GtEq,
    /// Less equal, e.g. `a <= b`
    LtEq,
    /// Equal, e.g. `a = b`
    Eq,
    /// Not equal, e.g. `a <> b`
    NotEq,
    /// And, e.g. `a AND b`
    And,
    /// Or, e.g. `a OR b`
    Or,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::StringConcat => "||",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::GtEq => ">=",
            Self::LtEq => "<=",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::And => "AND",
            Self::Or => "OR",
        })
    }
}

/// Values a parser-made enumeration literal can take.
///
/// See [`Literal::Symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    Inner,
    Left,
    Right,
    Full,
    Cross,
    On,
    Using,
    Unconditioned,
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Full => "FULL",
            Self::Cross => "CROSS",
            Self::On => "ON",
            Self::Using => "USING",
            Self::Unconditioned => "UNCONDITIONED",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    /// Unparsed number literal.
    Number(String),
    /// String literal.
    SingleQuotedString(String),
    /// Boolean literal.
    Boolean(bool),
    /// Null literal.
    Null,
    /// Enumeration constant materialized by the parser for syntax it
    /// normalizes (join shape, window behavior). No grammar production
    /// creates one from user text.
    Symbol(Symbol),
}

impl Literal {
    /// Whether this literal kind only ever comes from the parser itself.
    pub fn is_synthesized(&self) -> bool {
        matches!(self, Literal::Symbol(_))
    }

    /// Coarse type of the constant this literal carries.
    pub fn type_hint(&self) -> TypeHint {
        match self {
            Literal::Number(_) => TypeHint::Number,
            Literal::SingleQuotedString(_) => TypeHint::String,
            Literal::Boolean(_) => TypeHint::Boolean,
            Literal::Null | Literal::Symbol(_) => TypeHint::Unknown,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::SingleQuotedString(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::Boolean(true) => write!(f, "TRUE"),
            Self::Boolean(false) => write!(f, "FALSE"),
            Self::Null => write!(f, "NULL"),
            Self::Symbol(s) => write!(f, "{s}"),
        }
    }
}

/// Coarse type recorded for a displaced literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeHint {
    Number,
    String,
    Boolean,
    Unknown,
}

/// A dynamic parameter marker.
///
/// Ordinals are 1-based and assigned in order of appearance, by the parser
/// for `?` written in the source text, and by the parameterization rewrite
/// for markers it inserts. A marker's identity is its ordinal alone; the
/// type hint records what the displaced literal looked like and does not
/// participate in comparisons, so a rewritten tree compares equal to a
/// re-parse of its canonical text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub ordinal: usize,
    pub type_hint: Option<TypeHint>,
}

impl Parameter {
    pub fn new(ordinal: usize) -> Self {
        Parameter {
            ordinal,
            type_hint: None,
        }
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal
    }
}

impl Eq for Parameter {}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Column or table identifier.
    Ident(Ident),
    /// Compound identifier.
    ///
    /// `table.col`
    CompoundIdent(Vec<Ident>),
    /// An expression literal.
    Literal(Literal),
    /// A dynamic parameter marker.
    Parameter(Parameter),
    /// A unary expression.
    UnaryExpr { op: UnaryOperator, expr: Box<Expr> },
    /// A binary expression.
    BinaryExpr {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },
    /// A parenthesized expression.
    Nested(Box<Expr>),
    /// A function call, possibly windowed.
    ///
    /// `rank() OVER (PARTITION BY a ORDER BY b)`
    Function(Function),
    /// `<expr> [NOT] IN (<expr>, ...)`
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    /// A scalar subquery.
    Subquery(Box<QueryNode>),
    /// `[NOT] EXISTS (<subquery>)`
    Exists {
        subquery: Box<QueryNode>,
        not_exists: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub reference: ObjectReference,
    pub args: Vec<Expr>,
    pub over: Option<WindowSpec>,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.reference, DisplayCommaSeparated(&self.args))?;
        if let Some(over) = &self.over {
            write!(f, " OVER ({over})")?;
        }
        Ok(())
    }
}

/// A window specification attached to a function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByNode>,
    pub frame: Option<WindowFrame>,
    /// Whether the function may be evaluated over an incomplete frame.
    ///
    /// There's no grammar for this; the parser materializes the default as a
    /// literal node, like the join shape flags, so it takes part in tree
    /// comparison and literal accounting.
    pub allow_partial: Literal,
}

impl WindowSpec {
    /// Default for the allow-partial flag on every parsed window.
    pub fn default_allow_partial() -> Literal {
        Literal::Boolean(false)
    }
}

impl AstParseable for WindowSpec {
    fn parse(parser: &mut Parser) -> Result<Self> {
        parser.expect_token(&Token::LeftParen)?;

        let partition_by = if parser.parse_keyword_sequence(&[Keyword::PARTITION, Keyword::BY]) {
            parser.parse_comma_separated(Expr::parse)?
        } else {
            Vec::new()
        };

        let order_by = if parser.parse_keyword_sequence(&[Keyword::ORDER, Keyword::BY]) {
            parser.parse_comma_separated(OrderByNode::parse)?
        } else {
            Vec::new()
        };

        let frame = match parser.peek().and_then(|tok| tok.keyword()) {
            Some(Keyword::ROWS | Keyword::RANGE) => Some(WindowFrame::parse(parser)?),
            _ => None,
        };

        parser.expect_token(&Token::RightParen)?;

        Ok(WindowSpec {
            partition_by,
            order_by,
            frame,
            allow_partial: Self::default_allow_partial(),
        })
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if !self.partition_by.is_empty() {
            write!(
                f,
                "PARTITION BY {}",
                DisplayCommaSeparated(&self.partition_by)
            )?;
            sep = " ";
        }
        if !self.order_by.is_empty() {
            write!(f, "{sep}ORDER BY {}", DisplayCommaSeparated(&self.order_by))?;
            sep = " ";
        }
        if let Some(frame) = &self.frame {
            write!(f, "{sep}{frame}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub units: FrameUnits,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
}

impl AstParseable for WindowFrame {
    fn parse(parser: &mut Parser) -> Result<Self> {
        let units = match parser.next_keyword()? {
            Keyword::ROWS => FrameUnits::Rows,
            Keyword::RANGE => FrameUnits::Range,
            other => {
                return Err(ParseError::new(format!(
                    "Expected ROWS or RANGE, got {other:?}"
                )));
            }
        };

        if parser.parse_keyword(Keyword::BETWEEN) {
            let start = FrameBound::parse(parser)?;
            parser.expect_keyword(Keyword::AND)?;
            let end = FrameBound::parse(parser)?;
            Ok(WindowFrame {
                units,
                start,
                end: Some(end),
            })
        } else {
            let start = FrameBound::parse(parser)?;
            Ok(WindowFrame {
                units,
                start,
                end: None,
            })
        }
    }
}

impl fmt::Display for WindowFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end {
            Some(end) => write!(f, "{} BETWEEN {} AND {}", self.units, self.start, end),
            None => write!(f, "{} {}", self.units, self.start),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameUnits {
    Rows,
    Range,
}

impl fmt::Display for FrameUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    /// `<expr> PRECEDING`
    Preceding(Box<Expr>),
    /// `<expr> FOLLOWING`
    Following(Box<Expr>),
}

impl AstParseable for FrameBound {
    fn parse(parser: &mut Parser) -> Result<Self> {
        if parser.parse_keyword(Keyword::UNBOUNDED) {
            return match parser.next_keyword()? {
                Keyword::PRECEDING => Ok(FrameBound::UnboundedPreceding),
                Keyword::FOLLOWING => Ok(FrameBound::UnboundedFollowing),
                other => Err(ParseError::new(format!(
                    "Expected PRECEDING or FOLLOWING, got {other:?}"
                ))),
            };
        }
        if parser.parse_keyword_sequence(&[Keyword::CURRENT, Keyword::ROW]) {
            return Ok(FrameBound::CurrentRow);
        }

        let offset = Expr::parse(parser)?;
        match parser.next_keyword()? {
            Keyword::PRECEDING => Ok(FrameBound::Preceding(Box::new(offset))),
            Keyword::FOLLOWING => Ok(FrameBound::Following(Box::new(offset))),
            other => Err(ParseError::new(format!(
                "Expected PRECEDING or FOLLOWING, got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundedPreceding => write!(f, "UNBOUNDED PRECEDING"),
            Self::UnboundedFollowing => write!(f, "UNBOUNDED FOLLOWING"),
            Self::CurrentRow => write!(f, "CURRENT ROW"),
            Self::Preceding(expr) => write!(f, "{expr} PRECEDING"),
            Self::Following(expr) => write!(f, "{expr} FOLLOWING"),
        }
    }
}

impl AstParseable for Expr {
    fn parse(parser: &mut Parser) -> Result<Self> {
        Self::parse_subexpr(parser, 0)
    }
}

impl Expr {
    fn parse_subexpr(parser: &mut Parser, precedence: u8) -> Result<Self> {
        let mut expr = Expr::parse_prefix(parser)?;

        loop {
            let next_precedence = Self::get_infix_precedence(parser);
            if precedence >= next_precedence {
                break;
            }

            expr = Self::parse_infix(parser, expr, next_precedence)?;
        }

        Ok(expr)
    }

    fn parse_prefix(parser: &mut Parser) -> Result<Self> {
        let tok = match parser.next() {
            Some(tok) => &tok.token,
            None => {
                return Err(ParseError::new(
                    "Expected prefix expression, found end of statement",
                ));
            }
        };

        let expr = match tok {
            Token::Word(w) => {
                let (value, keyword) = (w.value.clone(), w.keyword);
                match keyword {
                    Some(Keyword::TRUE) => Expr::Literal(Literal::Boolean(true)),
                    Some(Keyword::FALSE) => Expr::Literal(Literal::Boolean(false)),
                    Some(Keyword::NULL) => Expr::Literal(Literal::Null),
                    Some(Keyword::NOT) => {
                        if parser.parse_keyword(Keyword::EXISTS) {
                            Self::parse_exists(parser, true)?
                        } else {
                            Expr::UnaryExpr {
                                op: UnaryOperator::Not,
                                expr: Box::new(Expr::parse_subexpr(parser, PREC_NOT)?),
                            }
                        }
                    }
                    Some(Keyword::EXISTS) => Self::parse_exists(parser, false)?,
                    _ => Self::parse_ident_or_function(parser, value)?,
                }
            }
            Token::SingleQuotedString(s) => {
                Expr::Literal(Literal::SingleQuotedString(s.clone()))
            }
            Token::Number(n) => Expr::Literal(Literal::Number(n.clone())),
            Token::QuestionMark => Expr::Parameter(Parameter::new(parser.next_param_ordinal())),
            Token::Plus => Expr::UnaryExpr {
                op: UnaryOperator::Plus,
                expr: Box::new(Expr::parse_subexpr(parser, PREC_MUL_DIV_MOD)?),
            },
            Token::Minus => Expr::UnaryExpr {
                op: UnaryOperator::Minus,
                expr: Box::new(Expr::parse_subexpr(parser, PREC_MUL_DIV_MOD)?),
            },
            Token::LeftParen => {
                if QueryNode::is_query_node_start(parser) {
                    let subquery = QueryNode::parse(parser)?;
                    parser.expect_token(&Token::RightParen)?;
                    Expr::Subquery(Box::new(subquery))
                } else {
                    let nested = Expr::parse(parser)?;
                    parser.expect_token(&Token::RightParen)?;
                    Expr::Nested(Box::new(nested))
                }
            }
            other => {
                return Err(ParseError::new(format!(
                    "Unexpected token '{other:?}'. Expected expression."
                )));
            }
        };

        Ok(expr)
    }

    /// Parse the remainder of an expression starting with a plain word:
    /// either a function call, a compound identifier, or an identifier.
    fn parse_ident_or_function(parser: &mut Parser, value: String) -> Result<Self> {
        if parser.peek().is_some_and(|tok| tok.token == Token::LeftParen) {
            parser.expect_token(&Token::LeftParen)?;
            let args = if parser.consume_token(&Token::RightParen) {
                Vec::new()
            } else {
                let args = parser.parse_comma_separated(Expr::parse)?;
                parser.expect_token(&Token::RightParen)?;
                args
            };
            let over = if parser.parse_keyword(Keyword::OVER) {
                Some(WindowSpec::parse(parser)?)
            } else {
                None
            };
            return Ok(Expr::Function(Function {
                reference: ObjectReference(vec![Ident { value }]),
                args,
                over,
            }));
        }

        if !parser.consume_token(&Token::Period) {
            return Ok(Expr::Ident(Ident { value }));
        }

        let mut idents = vec![Ident { value }, Ident::parse(parser)?];
        while parser.consume_token(&Token::Period) {
            idents.push(Ident::parse(parser)?);
        }
        Ok(Expr::CompoundIdent(idents))
    }

    fn parse_exists(parser: &mut Parser, not_exists: bool) -> Result<Self> {
        parser.expect_token(&Token::LeftParen)?;
        let subquery = QueryNode::parse(parser)?;
        parser.expect_token(&Token::RightParen)?;
        Ok(Expr::Exists {
            subquery: Box::new(subquery),
            not_exists,
        })
    }

    fn parse_infix(parser: &mut Parser, prefix: Expr, precedence: u8) -> Result<Self> {
        enum Infix {
            Binary(BinaryOperator),
            In { negated: bool },
        }

        let tok = match parser.next() {
            Some(tok) => &tok.token,
            None => {
                return Err(ParseError::new(
                    "Expected infix expression, found end of statement",
                ));
            }
        };

        let infix = match tok {
            Token::DoubleEq | Token::Eq => Infix::Binary(BinaryOperator::Eq),
            Token::Neq => Infix::Binary(BinaryOperator::NotEq),
            Token::Gt => Infix::Binary(BinaryOperator::Gt),
            Token::GtEq => Infix::Binary(BinaryOperator::GtEq),
            Token::Lt => Infix::Binary(BinaryOperator::Lt),
            Token::LtEq => Infix::Binary(BinaryOperator::LtEq),
            Token::Plus => Infix::Binary(BinaryOperator::Plus),
            Token::Minus => Infix::Binary(BinaryOperator::Minus),
            Token::Mul => Infix::Binary(BinaryOperator::Multiply),
            Token::Div => Infix::Binary(BinaryOperator::Divide),
            Token::Mod => Infix::Binary(BinaryOperator::Modulo),
            Token::Concat => Infix::Binary(BinaryOperator::StringConcat),
            Token::Word(w) => match w.keyword {
                Some(Keyword::AND) => Infix::Binary(BinaryOperator::And),
                Some(Keyword::OR) => Infix::Binary(BinaryOperator::Or),
                Some(Keyword::IN) => Infix::In { negated: false },
                // Only reachable when the precedence lookup saw NOT IN.
                Some(Keyword::NOT) => Infix::In { negated: true },
                _ => {
                    return Err(ParseError::new(format!(
                        "Unable to parse keyword {:?} as an expression",
                        w.value
                    )));
                }
            },
            other => {
                return Err(ParseError::new(format!(
                    "Unable to parse token {other:?} as an expression"
                )));
            }
        };

        match infix {
            Infix::Binary(op) => Ok(Expr::BinaryExpr {
                left: Box::new(prefix),
                op,
                right: Box::new(Expr::parse_subexpr(parser, precedence)?),
            }),
            Infix::In { negated } => {
                if negated {
                    parser.expect_keyword(Keyword::IN)?;
                }
                let list = parser.parse_parenthesized_comma_separated(Expr::parse)?;
                Ok(Expr::InList {
                    expr: Box::new(prefix),
                    list,
                    negated,
                })
            }
        }
    }

    /// Get the relative precedence of the next operator.
    ///
    /// Zero means the next token doesn't continue the current expression.
    ///
    /// See <https://www.postgresql.org/docs/16/sql-syntax-lexical.html#SQL-PRECEDENCE>
    fn get_infix_precedence(parser: &Parser) -> u8 {
        let tok = match parser.peek() {
            Some(tok) => &tok.token,
            None => return 0,
        };

        match tok {
            Token::Word(w) if w.keyword == Some(Keyword::OR) => PREC_OR,
            Token::Word(w) if w.keyword == Some(Keyword::AND) => PREC_AND,

            Token::Word(w) if w.keyword == Some(Keyword::NOT) => {
                // Precedence depends on the keyword following it.
                match parser.peek_nth(1).and_then(|tok| tok.keyword()) {
                    Some(Keyword::IN) => PREC_CONTAINMENT,
                    _ => 0,
                }
            }
            Token::Word(w) if w.keyword == Some(Keyword::IN) => PREC_CONTAINMENT,

            // Equalities
            Token::Eq
            | Token::DoubleEq
            | Token::Neq
            | Token::Lt
            | Token::LtEq
            | Token::Gt
            | Token::GtEq => PREC_COMPARISON,

            // Numeric operators
            Token::Plus | Token::Minus => PREC_ADD_SUB,
            Token::Mul | Token::Div | Token::Mod => PREC_MUL_DIV_MOD,

            // Concat
            Token::Concat => PREC_EVERYTHING_ELSE,

            _ => 0,
        }
    }
}

// Precedences, ordered low to high.
const PREC_OR: u8 = 10;
const PREC_AND: u8 = 20;
const PREC_NOT: u8 = 30;
const PREC_COMPARISON: u8 = 50; // <=, =, etc
const PREC_CONTAINMENT: u8 = 60; // IN
const PREC_EVERYTHING_ELSE: u8 = 70; // Anything without a specific precedence.
const PREC_ADD_SUB: u8 = 80;
const PREC_MUL_DIV_MOD: u8 = 90;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(ident) => write!(f, "{ident}"),
            Self::CompoundIdent(idents) => {
                let strings: Vec<_> = idents.iter().map(|i| i.value.clone()).collect();
                write!(f, "{}", strings.join("."))
            }
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Parameter(param) => write!(f, "{param}"),
            Self::UnaryExpr { op, expr } => write!(f, "{op}{expr}"),
            Self::BinaryExpr { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::Nested(expr) => write!(f, "({expr})"),
            Self::Function(function) => write!(f, "{function}"),
            Self::InList {
                expr,
                list,
                negated,
            } => {
                let not = if *negated { "NOT " } else { "" };
                write!(f, "{expr} {not}IN ({})", DisplayCommaSeparated(list))
            }
            Self::Subquery(query) => write!(f, "({query})"),
            Self::Exists {
                subquery,
                not_exists,
            } => {
                let not = if *not_exists { "NOT " } else { "" };
                write!(f, "{not}EXISTS ({subquery})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::testutil::parse_ast;

    fn ident(s: &str) -> Expr {
        Expr::Ident(Ident::from_string(s))
    }

    fn num(s: &str) -> Expr {
        Expr::Literal(Literal::Number(s.to_string()))
    }

    #[test]
    fn binary_precedence() {
        let expr: Expr = parse_ast("id = 7 and cnt < 5 + 2").unwrap();
        let expected = Expr::BinaryExpr {
            left: Box::new(Expr::BinaryExpr {
                left: Box::new(ident("id")),
                op: BinaryOperator::Eq,
                right: Box::new(num("7")),
            }),
            op: BinaryOperator::And,
            right: Box::new(Expr::BinaryExpr {
                left: Box::new(ident("cnt")),
                op: BinaryOperator::Lt,
                right: Box::new(Expr::BinaryExpr {
                    left: Box::new(num("5")),
                    op: BinaryOperator::Plus,
                    right: Box::new(num("2")),
                }),
            }),
        };
        assert_eq!(expected, expr);
    }

    #[test]
    fn or_binds_looser_than_and() {
        let expr: Expr = parse_ast("a = 1 or b = 2 and c = 3").unwrap();
        let expected = Expr::BinaryExpr {
            left: Box::new(Expr::BinaryExpr {
                left: Box::new(ident("a")),
                op: BinaryOperator::Eq,
                right: Box::new(num("1")),
            }),
            op: BinaryOperator::Or,
            right: Box::new(Expr::BinaryExpr {
                left: Box::new(Expr::BinaryExpr {
                    left: Box::new(ident("b")),
                    op: BinaryOperator::Eq,
                    right: Box::new(num("2")),
                }),
                op: BinaryOperator::And,
                right: Box::new(Expr::BinaryExpr {
                    left: Box::new(ident("c")),
                    op: BinaryOperator::Eq,
                    right: Box::new(num("3")),
                }),
            }),
        };
        assert_eq!(expected, expr);
    }

    #[test]
    fn compound_ident() {
        let expr: Expr = parse_ast("t1.a").unwrap();
        let expected = Expr::CompoundIdent(vec![Ident::from_string("t1"), Ident::from_string("a")]);
        assert_eq!(expected, expr);
    }

    #[test]
    fn in_list() {
        let expr: Expr = parse_ast("cnt IN (1, 3, 5)").unwrap();
        let expected = Expr::InList {
            expr: Box::new(ident("cnt")),
            list: vec![num("1"), num("3"), num("5")],
            negated: false,
        };
        assert_eq!(expected, expr);
    }

    #[test]
    fn not_in_list() {
        let expr: Expr = parse_ast("cnt NOT IN (1, 3)").unwrap();
        let expected = Expr::InList {
            expr: Box::new(ident("cnt")),
            list: vec![num("1"), num("3")],
            negated: true,
        };
        assert_eq!(expected, expr);
    }

    #[test]
    fn unary_minus() {
        let expr: Expr = parse_ast("-7 + 3").unwrap();
        let expected = Expr::BinaryExpr {
            left: Box::new(Expr::UnaryExpr {
                op: UnaryOperator::Minus,
                expr: Box::new(num("7")),
            }),
            op: BinaryOperator::Plus,
            right: Box::new(num("3")),
        };
        assert_eq!(expected, expr);
    }

    #[test]
    fn parameters_numbered_in_order() {
        let expr: Expr = parse_ast("a = ? and b = ?").unwrap();
        let expected = Expr::BinaryExpr {
            left: Box::new(Expr::BinaryExpr {
                left: Box::new(ident("a")),
                op: BinaryOperator::Eq,
                right: Box::new(Expr::Parameter(Parameter::new(1))),
            }),
            op: BinaryOperator::And,
            right: Box::new(Expr::BinaryExpr {
                left: Box::new(ident("b")),
                op: BinaryOperator::Eq,
                right: Box::new(Expr::Parameter(Parameter::new(2))),
            }),
        };
        assert_eq!(expected, expr);

        // And ordinals really are assigned in appearance order.
        match expr {
            Expr::BinaryExpr { left, right, .. } => {
                match (*left, *right) {
                    (
                        Expr::BinaryExpr { right: first, .. },
                        Expr::BinaryExpr { right: second, .. },
                    ) => {
                        assert_eq!(Expr::Parameter(Parameter::new(1)), *first);
                        assert_eq!(Expr::Parameter(Parameter::new(2)), *second);
                    }
                    other => panic!("unexpected structure: {other:?}"),
                }
            }
            other => panic!("unexpected structure: {other:?}"),
        }
    }

    #[test]
    fn windowed_function() {
        let expr: Expr = parse_ast("rank() over (PARTITION BY cnt + 1 ORDER BY name)").unwrap();
        let expected = Expr::Function(Function {
            reference: ObjectReference::from_strings(["rank"]),
            args: Vec::new(),
            over: Some(WindowSpec {
                partition_by: vec![Expr::BinaryExpr {
                    left: Box::new(ident("cnt")),
                    op: BinaryOperator::Plus,
                    right: Box::new(num("1")),
                }],
                order_by: vec![crate::ast::OrderByNode {
                    expr: ident("name"),
                    sort: None,
                }],
                frame: None,
                allow_partial: Literal::Boolean(false),
            }),
        });
        assert_eq!(expected, expr);
    }

    #[test]
    fn window_frame() {
        let expr: Expr = parse_ast("sum(x) over (ROWS BETWEEN 2 PRECEDING AND CURRENT ROW)")
            .unwrap();
        let frame = match &expr {
            Expr::Function(Function {
                over: Some(spec), ..
            }) => spec.frame.clone().unwrap(),
            other => panic!("unexpected structure: {other:?}"),
        };
        let expected = WindowFrame {
            units: FrameUnits::Rows,
            start: FrameBound::Preceding(Box::new(num("2"))),
            end: Some(FrameBound::CurrentRow),
        };
        assert_eq!(expected, frame);
    }

    #[test]
    fn marker_identity_ignores_type_hint() {
        let typed = Parameter {
            ordinal: 1,
            type_hint: Some(TypeHint::Number),
        };
        assert_eq!(Parameter::new(1), typed);
        assert_ne!(Parameter::new(2), typed);
    }

    #[test]
    fn display_round_trip() {
        let exprs = [
            "id = 7 AND name = 'Chao'",
            "cnt IN (1, 3, 5)",
            "rank() OVER (PARTITION BY cnt + 1 ORDER BY name)",
            "(a + b) * 2",
            "c || 'x'",
        ];
        for sql in exprs {
            let expr: Expr = parse_ast(sql).unwrap();
            assert_eq!(sql, expr.to_string());
        }
    }
}
