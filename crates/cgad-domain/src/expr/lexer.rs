use super::error::ParseError;

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Int(i64),
    Float(f64),
    Str(String),
    Ident(String),

    And,
    Or,
    Not,
    In,
    True,
    False,
    None,

    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,

    Eof,
}

impl TokenKind {
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Int(v) => format!("number {v}"),
            TokenKind::Float(v) => format!("number {v}"),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Ident(name) => format!("name '{name}'"),
            TokenKind::Eof => "end of expression".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::In => "in",
            TokenKind::True => "True",
            TokenKind::False => "False",
            TokenKind::None => "None",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::SlashSlash => "//",
            TokenKind::Percent => "%",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            _ => "?",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.src[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            }
            let offset = self.pos;
            let Some(c) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    offset,
                });
                return Ok(tokens);
            };

            let kind = match c {
                '0'..='9' => self.number()?,
                '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => self.number()?,
                '\'' | '"' => self.string(c)?,
                c if c == '_' || c.is_ascii_alphabetic() => self.word(),
                _ => self.punct(c)?,
            };
            tokens.push(Token { kind, offset });
        }
    }

    fn punct(&mut self, c: char) -> Result<TokenKind, ParseError> {
        let offset = self.pos;
        self.bump();
        let next = self.peek();
        let kind = match (c, next) {
            ('=', Some('=')) => {
                self.bump();
                TokenKind::EqEq
            }
            ('!', Some('=')) => {
                self.bump();
                TokenKind::NotEq
            }
            ('<', Some('=')) => {
                self.bump();
                TokenKind::Le
            }
            ('>', Some('=')) => {
                self.bump();
                TokenKind::Ge
            }
            ('/', Some('/')) => {
                self.bump();
                TokenKind::SlashSlash
            }
            ('<', _) => TokenKind::Lt,
            ('>', _) => TokenKind::Gt,
            ('+', _) => TokenKind::Plus,
            ('-', _) => TokenKind::Minus,
            ('*', _) => TokenKind::Star,
            ('/', _) => TokenKind::Slash,
            ('%', _) => TokenKind::Percent,
            ('.', _) => TokenKind::Dot,
            (',', _) => TokenKind::Comma,
            ('(', _) => TokenKind::LParen,
            (')', _) => TokenKind::RParen,
            ('[', _) => TokenKind::LBracket,
            (']', _) => TokenKind::RBracket,
            (other, _) => {
                return Err(ParseError::new(
                    format!("unexpected character '{other}'"),
                    offset,
                ));
            }
        };
        Ok(kind)
    }

    fn word(&mut self) -> TokenKind {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c == '_' || c.is_ascii_alphanumeric())
        {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "in" => TokenKind::In,
            "True" | "true" => TokenKind::True,
            "False" | "false" => TokenKind::False,
            "None" => TokenKind::None,
            ident => TokenKind::Ident(ident.to_string()),
        }
    }

    fn number(&mut self) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        let mut is_float = false;

        self.digits();
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            self.digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let save = self.pos;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.digits();
            } else {
                self.pos = save;
            }
        }

        let text = &self.src[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(TokenKind::Float)
                .map_err(|_| ParseError::new(format!("invalid number '{text}'"), start))
        } else {
            text.parse::<i64>()
                .map(TokenKind::Int)
                .map_err(|_| ParseError::new(format!("integer literal too large '{text}'"), start))
        }
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    fn string(&mut self, quote: char) -> Result<TokenKind, ParseError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(ParseError::new("unterminated string literal", start)),
                Some(c) if c == quote => return Ok(TokenKind::Str(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('\\') => out.push('\\'),
                    Some('\'') => out.push('\''),
                    Some('"') => out.push('"'),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                    None => return Err(ParseError::new("unterminated string literal", start)),
                },
                Some(c) => out.push(c),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .expect("tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokenizes_comparison_with_dotted_name() {
        assert_eq!(
            kinds("tests.status == 'pass'"),
            vec![
                TokenKind::Ident("tests".to_string()),
                TokenKind::Dot,
                TokenKind::Ident("status".to_string()),
                TokenKind::EqEq,
                TokenKind::Str("pass".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn boolean_aliases_in_both_casings() {
        assert_eq!(
            kinds("true True false False None"),
            vec![
                TokenKind::True,
                TokenKind::True,
                TokenKind::False,
                TokenKind::False,
                TokenKind::None,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("1 2.5 .5 1e3 7 // 2"),
            vec![
                TokenKind::Int(1),
                TokenKind::Float(2.5),
                TokenKind::Float(0.5),
                TokenKind::Float(1000.0),
                TokenKind::Int(7),
                TokenKind::SlashSlash,
                TokenKind::Int(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            kinds(r#""it's" 'a\'b' 'x\ny'"#),
            vec![
                TokenKind::Str("it's".to_string()),
                TokenKind::Str("a'b".to_string()),
                TokenKind::Str("x\ny".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn rejects_unknown_characters() {
        let err = tokenize("a ; b").expect_err("semicolon");
        assert_eq!(err.offset, 2);
        assert!(err.message.contains("';'"));

        assert!(tokenize("'open").is_err());
        assert!(tokenize("a = b").is_err());
    }
}
