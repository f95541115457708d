use crate::ast::{AstParseable, ColumnDef, CreateTable, DropTable, Ident, Insert, ObjectReference, QueryNode};
use crate::errors::{ParseError, Result};
use crate::keywords::Keyword;
use crate::statement::Statement;
use crate::tokens::{Token, TokenWithLocation, Tokenizer, Word};

/// Parse SQL text into statements.
pub fn parse(sql: &str) -> Result<Vec<Statement>> {
    let toks = Tokenizer::new(sql).tokenize()?;
    Parser::with_tokens(toks).parse_statements()
}

#[derive(Debug)]
pub struct Parser {
    toks: Vec<TokenWithLocation>,
    /// Index of token we should process next.
    pub(crate) idx: usize,
    /// Number of dynamic parameters seen so far. Markers are numbered by
    /// order of appearance, 1-based.
    params: usize,
}

impl Parser {
    pub fn with_tokens(toks: Vec<TokenWithLocation>) -> Self {
        Parser {
            toks,
            idx: 0,
            params: 0,
        }
    }

    pub fn parse_statements(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            while self.consume_token(&Token::Semicolon) {}
            if self.peek().is_none() {
                break;
            }

            statements.push(self.parse_statement()?);

            match self.peek() {
                None => {}
                Some(tok) if tok.token == Token::Semicolon => {}
                Some(other) => {
                    return Err(ParseError::new(format!(
                        "Unexpected token after statement: {:?}",
                        other.token
                    )));
                }
            }
        }
        Ok(statements)
    }

    pub fn parse_statement(&mut self) -> Result<Statement> {
        let keyword = match self.peek().and_then(|tok| tok.keyword()) {
            Some(keyword) => keyword,
            None => {
                return Err(ParseError::new(match self.peek() {
                    Some(tok) => format!("Expected a SQL statement, got {:?}", tok.token),
                    None => "Empty SQL statement".to_string(),
                }));
            }
        };

        match keyword {
            Keyword::SELECT | Keyword::VALUES => Ok(Statement::Query(QueryNode::parse(self)?)),
            Keyword::INSERT => Ok(Statement::Insert(Insert::parse(self)?)),
            Keyword::CREATE => {
                self.next();
                self.parse_create()
            }
            Keyword::DROP => {
                self.next();
                self.parse_drop()
            }
            other => Err(ParseError::new(format!("Unexpected keyword: {other:?}"))),
        }
    }

    /// Parse a CREATE statement, assuming CREATE was already consumed.
    pub fn parse_create(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::TABLE)?;
        let if_not_exists =
            self.parse_keyword_sequence(&[Keyword::IF, Keyword::NOT, Keyword::EXISTS]);
        let name = ObjectReference::parse(self)?;
        let columns = self.parse_parenthesized_comma_separated(ColumnDef::parse)?;

        Ok(Statement::CreateTable(CreateTable {
            name,
            if_not_exists,
            columns,
        }))
    }

    /// Parse a DROP statement, assuming DROP was already consumed.
    pub fn parse_drop(&mut self) -> Result<Statement> {
        self.expect_keyword(Keyword::TABLE)?;
        let if_exists = self.parse_keyword_sequence(&[Keyword::IF, Keyword::EXISTS]);
        let name = ObjectReference::parse(self)?;

        Ok(Statement::DropTable(DropTable { name, if_exists }))
    }

    /// Parse a single keyword.
    ///
    /// If the next token isn't the keyword, idx is not changed, and false is
    /// returned.
    pub(crate) fn parse_keyword(&mut self, keyword: Keyword) -> bool {
        let idx = self.idx;
        if let Some(tok) = self.next() {
            if tok.is_keyword(keyword) {
                return true;
            }
        }
        self.idx = idx;
        false
    }

    /// Parse an exact sequence of keywords.
    ///
    /// If the sequence doesn't match, idx is not changed, and false is
    /// returned.
    pub(crate) fn parse_keyword_sequence(&mut self, keywords: &[Keyword]) -> bool {
        let idx = self.idx;
        for keyword in keywords {
            match self.next() {
                Some(tok) if tok.is_keyword(*keyword) => {}
                _ => {
                    self.idx = idx;
                    return false;
                }
            }
        }
        true
    }

    /// Parse any one of the provided keywords, returning which one matched.
    pub(crate) fn parse_one_of_keywords(&mut self, keywords: &[Keyword]) -> Option<Keyword> {
        let idx = self.idx;
        let kw = self.next().and_then(|tok| tok.keyword());
        match kw {
            Some(kw) if keywords.contains(&kw) => Some(kw),
            _ => {
                self.idx = idx;
                None
            }
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if !self.parse_keyword(keyword) {
            return Err(ParseError::new(format!(
                "Expected keyword {keyword:?}, got {:?}",
                self.peek().map(|tok| &tok.token)
            )));
        }
        Ok(())
    }

    /// Get the next keyword, erroring if the next token isn't one.
    pub(crate) fn next_keyword(&mut self) -> Result<Keyword> {
        match self.next().and_then(|tok| tok.keyword()) {
            Some(kw) => Ok(kw),
            None => Err(ParseError::new("Expected a keyword")),
        }
    }

    /// Consume the next token if it matches the expected token.
    pub(crate) fn consume_token(&mut self, expected: &Token) -> bool {
        let idx = self.idx;
        if let Some(tok) = self.next() {
            if &tok.token == expected {
                return true;
            }
        }
        self.idx = idx;
        false
    }

    pub(crate) fn expect_token(&mut self, expected: &Token) -> Result<()> {
        if !self.consume_token(expected) {
            return Err(ParseError::new(format!(
                "Expected {expected:?}, got {:?}",
                self.peek().map(|tok| &tok.token)
            )));
        }
        Ok(())
    }

    pub(crate) fn parse_comma_separated<T>(
        &mut self,
        mut f: impl FnMut(&mut Parser) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut values = Vec::new();
        loop {
            values.push(f(self)?);
            if !self.consume_token(&Token::Comma) {
                break;
            }
        }
        Ok(values)
    }

    pub(crate) fn parse_parenthesized_comma_separated<T>(
        &mut self,
        f: impl FnMut(&mut Parser) -> Result<T>,
    ) -> Result<Vec<T>> {
        self.expect_token(&Token::LeftParen)?;
        let values = self.parse_comma_separated(f)?;
        self.expect_token(&Token::RightParen)?;
        Ok(values)
    }

    /// Parse an optional alias, either `AS <ident>` or a bare identifier that
    /// isn't one of the reserved keywords for this position.
    pub(crate) fn parse_alias(&mut self, reserved: &[Keyword]) -> Result<Option<Ident>> {
        if self.parse_keyword(Keyword::AS) {
            return Ident::parse(self).map(Some);
        }

        let (value, keyword) = match self.peek() {
            Some(TokenWithLocation {
                token: Token::Word(Word { value, keyword }),
                ..
            }) => (value.clone(), *keyword),
            _ => return Ok(None),
        };
        if let Some(keyword) = keyword {
            if reserved.contains(&keyword) {
                return Ok(None);
            }
        }

        self.next();
        Ok(Some(Ident { value }))
    }

    /// Allocate the ordinal for a dynamic parameter just parsed.
    pub(crate) fn next_param_ordinal(&mut self) -> usize {
        self.params += 1;
        self.params
    }

    /// Get the next token, advancing past it.
    pub(crate) fn next(&mut self) -> Option<&TokenWithLocation> {
        let tok = self.toks.get(self.idx)?;
        self.idx += 1;
        Some(tok)
    }

    pub(crate) fn peek(&self) -> Option<&TokenWithLocation> {
        self.toks.get(self.idx)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<&TokenWithLocation> {
        self.toks.get(self.idx + n)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn multiple_statements() {
        let statements = parse("select 1; select 2;").unwrap();
        assert_eq!(2, statements.len());
    }

    #[test]
    fn trailing_garbage() {
        parse("select 1 from t1 t2 t3").unwrap_err();
    }

    #[test]
    fn empty_input() {
        let statements = parse("  ;; ").unwrap();
        assert_eq!(0, statements.len());
    }
}
