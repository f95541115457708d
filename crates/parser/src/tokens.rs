use crate::errors::{ParseError, Result};
use crate::keywords::{Keyword, keyword_from_str};

/// A word in the SQL text, possibly a known keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub value: String,
    pub keyword: Option<Keyword>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(Word),
    /// Unparsed number.
    Number(String),
    /// Single quoted string with the quotes stripped and doubled quotes
    /// collapsed.
    SingleQuotedString(String),
    /// Dynamic parameter marker, `?`.
    QuestionMark,
    Comma,
    Period,
    Semicolon,
    LeftParen,
    RightParen,
    Eq,
    DoubleEq,
    Neq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    Concat,
}

/// A token along with the line and column it started at.
///
/// Locations are 1-based and only used for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenWithLocation {
    pub token: Token,
    pub line: usize,
    pub col: usize,
}

impl TokenWithLocation {
    pub fn is_keyword(&self, other: Keyword) -> bool {
        match &self.token {
            Token::Word(w) => w.keyword == Some(other),
            _ => false,
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match &self.token {
            Token::Word(w) => w.keyword,
            _ => None,
        }
    }
}

/// Splits SQL text into tokens.
///
/// Whitespace and `--` comments are dropped here, the parser never sees them.
#[derive(Debug)]
pub struct Tokenizer {
    chars: Vec<char>,
    idx: usize,
    line: usize,
    col: usize,
}

impl Tokenizer {
    pub fn new(sql: &str) -> Self {
        Tokenizer {
            chars: sql.chars().collect(),
            idx: 0,
            line: 1,
            col: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<TokenWithLocation>> {
        let mut toks = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let (line, col) = (self.line, self.col);
            let token = match self.next_token()? {
                Some(token) => token,
                None => break,
            };
            toks.push(TokenWithLocation { token, line, col });
        }
        Ok(toks)
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(None),
        };

        let token = match c {
            ',' => self.single(Token::Comma),
            ';' => self.single(Token::Semicolon),
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            '?' => self.single(Token::QuestionMark),
            '+' => self.single(Token::Plus),
            '*' => self.single(Token::Mul),
            '/' => self.single(Token::Div),
            '%' => self.single(Token::Mod),
            '-' => self.single(Token::Minus), // '--' comments already skipped
            '=' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.single(Token::DoubleEq)
                } else {
                    Token::Eq
                }
            }
            '<' => {
                self.advance();
                match self.peek_char() {
                    Some('=') => self.single(Token::LtEq),
                    Some('>') => self.single(Token::Neq),
                    _ => Token::Lt,
                }
            }
            '>' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.single(Token::GtEq)
                } else {
                    Token::Gt
                }
            }
            '!' => {
                self.advance();
                if self.peek_char() == Some('=') {
                    self.single(Token::Neq)
                } else {
                    return Err(self.error("Unexpected character '!', did you mean '!='?"));
                }
            }
            '|' => {
                self.advance();
                if self.peek_char() == Some('|') {
                    self.single(Token::Concat)
                } else {
                    return Err(self.error("Unexpected character '|', did you mean '||'?"));
                }
            }
            '\'' => self.tokenize_string()?,
            '.' => {
                // Either a compound identifier separator or the start of a
                // number like '.5'.
                if self.peek_next_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.tokenize_number()
                } else {
                    self.single(Token::Period)
                }
            }
            c if c.is_ascii_digit() => self.tokenize_number(),
            c if c.is_alphabetic() || c == '_' => self.tokenize_word(),
            other => return Err(self.error(format!("Unexpected character '{other}'"))),
        };

        Ok(Some(token))
    }

    fn tokenize_word(&mut self) -> Token {
        let mut value = String::new();
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                value.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let keyword = keyword_from_str(&value);
        Token::Word(Word { value, keyword })
    }

    fn tokenize_number(&mut self) -> Token {
        let mut value = String::new();
        let mut seen_period = false;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() || (c == '.' && !seen_period) {
                seen_period |= c == '.';
                value.push(c);
                self.advance();
            } else if (c == 'e' || c == 'E')
                && self
                    .peek_next_char()
                    .is_some_and(|c| c.is_ascii_digit() || c == '+' || c == '-')
            {
                value.push(c);
                self.advance();
                // Optional exponent sign.
                if let Some(sign @ ('+' | '-')) = self.peek_char() {
                    value.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }
        Token::Number(value)
    }

    fn tokenize_string(&mut self) -> Result<Token> {
        self.advance(); // Opening quote.
        let mut value = String::new();
        loop {
            match self.peek_char() {
                Some('\'') => {
                    self.advance();
                    // Doubled quote is an escaped quote.
                    if self.peek_char() == Some('\'') {
                        value.push('\'');
                        self.advance();
                    } else {
                        return Ok(Token::SingleQuotedString(value));
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => return Err(self.error("Unterminated string literal")),
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('-') if self.peek_next_char() == Some('-') => {
                    while let Some(c) = self.peek_char() {
                        self.advance();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    /// Consume the current char and return the provided token.
    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek_next_char(&self) -> Option<char> {
        self.chars.get(self.idx + 1).copied()
    }

    fn advance(&mut self) {
        if let Some(c) = self.chars.get(self.idx) {
            if *c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.idx += 1;
        }
    }

    fn error(&self, msg: impl Into<String>) -> ParseError {
        ParseError::new(format!(
            "{} (line {}, column {})",
            msg.into(),
            self.line,
            self.col
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tokens(sql: &str) -> Vec<Token> {
        Tokenizer::new(sql)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn simple_select() {
        let got = tokens("select id from t where cnt >= 3.5");
        let expected = vec![
            Token::Word(Word {
                value: "select".to_string(),
                keyword: Some(Keyword::SELECT),
            }),
            Token::Word(Word {
                value: "id".to_string(),
                keyword: None,
            }),
            Token::Word(Word {
                value: "from".to_string(),
                keyword: Some(Keyword::FROM),
            }),
            Token::Word(Word {
                value: "t".to_string(),
                keyword: None,
            }),
            Token::Word(Word {
                value: "where".to_string(),
                keyword: Some(Keyword::WHERE),
            }),
            Token::Word(Word {
                value: "cnt".to_string(),
                keyword: None,
            }),
            Token::GtEq,
            Token::Number("3.5".to_string()),
        ];
        assert_eq!(expected, got);
    }

    #[test]
    fn strings_and_parameters() {
        let got = tokens("name = 'Chao''s' and id = ?");
        let expected = vec![
            Token::Word(Word {
                value: "name".to_string(),
                keyword: None,
            }),
            Token::Eq,
            Token::SingleQuotedString("Chao's".to_string()),
            Token::Word(Word {
                value: "and".to_string(),
                keyword: Some(Keyword::AND),
            }),
            Token::Word(Word {
                value: "id".to_string(),
                keyword: None,
            }),
            Token::Eq,
            Token::QuestionMark,
        ];
        assert_eq!(expected, got);
    }

    #[test]
    fn comments_skipped() {
        let got = tokens("select 1 -- trailing comment\n, 2");
        let expected = vec![
            Token::Word(Word {
                value: "select".to_string(),
                keyword: Some(Keyword::SELECT),
            }),
            Token::Number("1".to_string()),
            Token::Comma,
            Token::Number("2".to_string()),
        ];
        assert_eq!(expected, got);
    }

    #[test]
    fn locations() {
        let toks = Tokenizer::new("select\n  id").tokenize().unwrap();
        assert_eq!(1, toks[0].line);
        assert_eq!(1, toks[0].col);
        assert_eq!(2, toks[1].line);
        assert_eq!(3, toks[1].col);
    }

    #[test]
    fn unterminated_string() {
        Tokenizer::new("select 'oops").tokenize().unwrap_err();
    }
}
