use crate::{Lexer, SceneError, Spanned, TextRecord, TextValue, Token};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Spanned,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Result<Self, SceneError> {
        let mut lexer = Lexer::new(src);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    fn advance(&mut self) -> Result<(), SceneError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn error(&self, message: impl Into<String>) -> SceneError {
        SceneError::syntax(self.current.line, self.current.column, message)
    }

    pub fn parse_record(mut self) -> Result<TextRecord, SceneError> {
        self.parse_fields(false)
    }
}

impl<'a> Parser<'a> {
    /// Parses fields until EOF (top level) or the `}` closing the current block.
    fn parse_fields(&mut self, in_block: bool) -> Result<TextRecord, SceneError> {
        let mut record = TextRecord::new();

        loop {
            match &self.current.token {
                Token::Eof if in_block => return Err(self.error("expected `}` before end of input")),
                Token::Eof => break,

                Token::RBrace if in_block => {
                    self.advance()?;
                    break;
                }
                Token::RBrace => return Err(self.error("unexpected `}`")),

                Token::Ident(key) => {
                    let key = key.clone();
                    self.advance()?;
                    let value = self.parse_field_value(&key)?;
                    record.push(key, value);
                }

                other => {
                    return Err(self.error(format!("expected field name, got {}", describe(other))));
                }
            }
        }

        Ok(record)
    }

    fn parse_field_value(&mut self, key: &str) -> Result<TextValue, SceneError> {
        match self.current.token {
            Token::Colon => {
                self.advance()?;
                if self.current.token == Token::LBrace {
                    self.advance()?;
                    return Ok(TextValue::Block(self.parse_fields(true)?));
                }
                self.parse_scalar(key)
            }
            Token::LBrace => {
                self.advance()?;
                Ok(TextValue::Block(self.parse_fields(true)?))
            }
            _ => Err(self.error(format!("expected `:` or `{{` after `{key}`"))),
        }
    }

    fn parse_scalar(&mut self, key: &str) -> Result<TextValue, SceneError> {
        match &self.current.token {
            Token::String(first) => {
                // adjacent literals concatenate
                let mut s = first.clone();
                self.advance()?;
                while let Token::String(next) = &self.current.token {
                    s.push_str(next);
                    self.advance()?;
                }
                Ok(TextValue::Str(s))
            }
            Token::Number(n) => {
                let n = *n;
                self.advance()?;
                Ok(TextValue::Number(n))
            }
            Token::Ident(word) => {
                let word = word.clone();
                self.advance()?;
                Ok(TextValue::Ident(word))
            }
            other => Err(self.error(format!(
                "expected value for `{key}`, got {}",
                describe(other)
            ))),
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Ident(s) => format!("identifier `{s}`"),
        Token::Number(n) => format!("number `{n}`"),
        Token::String(_) => "string".to_string(),
        Token::Colon => "`:`".to_string(),
        Token::LBrace => "`{`".to_string(),
        Token::RBrace => "`}`".to_string(),
        Token::Eof => "end of input".to_string(),
    }
}

pub fn parse_record(src: &str) -> Result<TextRecord, SceneError> {
    Parser::new(src)?.parse_record()
}
