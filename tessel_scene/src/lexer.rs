use crate::SceneError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String), // components, x, SIZE_MODE_AUTO, true
    Number(f32),
    String(String),

    Colon,  // :
    LBrace, // {
    RBrace, // }

    Eof,
}

/// A token with the 1-based position of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
    pub column: u32,
}

pub struct Lexer<'a> {
    chars: std::str::Chars<'a>,
    peek: Option<char>,
    line: u32,
    column: u32,
    saw_comment: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut chars = src.chars();
        let peek = chars.next();
        Self {
            chars,
            peek,
            line: 1,
            column: 1,
            saw_comment: false,
        }
    }

    /// Whether any `#` comment has been skipped so far.
    pub fn saw_comment(&self) -> bool {
        self.saw_comment
    }

    fn bump(&mut self) -> Option<char> {
        let cur = self.peek;
        self.peek = self.chars.next();
        match cur {
            Some('\n') => {
                self.line += 1;
                self.column = 1;
            }
            Some(_) => self.column += 1,
            None => {}
        }
        cur
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    self.saw_comment = true;
                    while matches!(self.peek, Some(c) if c != '\n') {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    pub fn next_token(&mut self) -> Result<Spanned, SceneError> {
        self.skip_trivia();

        let (line, column) = (self.line, self.column);
        let spanned = |token| Spanned {
            token,
            line,
            column,
        };

        let c = match self.bump() {
            Some(c) => c,
            None => return Ok(spanned(Token::Eof)),
        };

        let token = match c {
            ':' => Token::Colon,
            '{' => Token::LBrace,
            '}' => Token::RBrace,
            '"' => Token::String(self.lex_string(line, column)?),
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => {
                Token::Number(self.lex_number(c, line, column)?)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut s = String::new();
                s.push(c);
                while let Some(p) = self.peek {
                    if !(p.is_ascii_alphanumeric() || p == '_') {
                        break;
                    }
                    s.push(p);
                    self.bump();
                }
                Token::Ident(s)
            }
            other => {
                return Err(SceneError::syntax(
                    line,
                    column,
                    format!("unexpected character `{other}`"),
                ));
            }
        };

        Ok(spanned(token))
    }

    fn lex_string(&mut self, line: u32, column: u32) -> Result<String, SceneError> {
        let mut s = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(s),
                Some('\\') => {
                    let (esc_line, esc_column) = (self.line, self.column);
                    match self.bump() {
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some('r') => s.push('\r'),
                        Some('"') => s.push('"'),
                        Some('\'') => s.push('\''),
                        Some('\\') => s.push('\\'),
                        Some(other) => {
                            return Err(SceneError::syntax(
                                esc_line,
                                esc_column,
                                format!("unknown escape `\\{other}`"),
                            ));
                        }
                        None => break,
                    }
                }
                Some('\n') | None => break,
                Some(c) => s.push(c),
            }
        }
        Err(SceneError::syntax(line, column, "unterminated string"))
    }

    fn lex_number(&mut self, first: char, line: u32, column: u32) -> Result<f32, SceneError> {
        let mut s = String::new();
        s.push(first);
        let mut prev = first;
        while let Some(p) = self.peek {
            let exponent_sign = matches!(p, '-' | '+') && matches!(prev, 'e' | 'E');
            if !(p.is_ascii_digit() || matches!(p, '.' | 'e' | 'E') || exponent_sign) {
                break;
            }
            s.push(p);
            prev = p;
            self.bump();
        }
        let n = s
            .parse::<f32>()
            .map_err(|_| SceneError::syntax(line, column, format!("malformed number `{s}`")))?;
        if !n.is_finite() {
            return Err(SceneError::syntax(
                line,
                column,
                format!("number out of range `{s}`"),
            ));
        }
        Ok(n)
    }
}

/// Lexes all of `src` and reports whether it holds a comment.
pub fn has_comment(src: &str) -> Result<bool, SceneError> {
    let mut lexer = Lexer::new(src);
    while lexer.next_token()?.token != Token::Eof {}
    Ok(lexer.saw_comment())
}
