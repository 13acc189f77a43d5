use crate::token::{Token, TokenKind};

fn keyword(s: &str) -> Option<TokenKind> {
    match s {
        "int8" => Some(TokenKind::Int8),
        "uint8" => Some(TokenKind::UInt8),
        "int16" => Some(TokenKind::Int16),
        "uint16" => Some(TokenKind::UInt16),
        "int32" => Some(TokenKind::Int32),
        "uint32" => Some(TokenKind::UInt32),
        "int64" => Some(TokenKind::Int64),
        "uint64" => Some(TokenKind::UInt64),
        "double" => Some(TokenKind::Double),
        "string" => Some(TokenKind::StringType),
        "bool" => Some(TokenKind::Bool),
        "void" => Some(TokenKind::Void),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "while" => Some(TokenKind::While),
        "for" => Some(TokenKind::For),
        "do" => Some(TokenKind::Do),
        "switch" => Some(TokenKind::Switch),
        "case" => Some(TokenKind::Case),
        "default" => Some(TokenKind::Default),
        "break" => Some(TokenKind::Break),
        "continue" => Some(TokenKind::Continue),
        "return" => Some(TokenKind::Return),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        _ => None,
    }
}

/// Turns source text into a token stream ending with `Eof`.
///
/// Lexing never fails: any character that cannot start a token becomes an
/// `Unknown` token carrying its lexeme, and the manager reports those as
/// diagnostics.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Consume the next char when it equals `expected`.
    fn matches(&mut self, expected: char) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let line = self.line;
            let col = self.col;

            let ch = match self.current() {
                Some(c) => c,
                None => {
                    tokens.push(Token {
                        kind: TokenKind::Eof,
                        line,
                        col,
                    });
                    break;
                }
            };

            let kind = if ch.is_ascii_digit() {
                self.scan_number()
            } else if ch.is_ascii_alphabetic() || ch == '_' {
                self.scan_identifier()
            } else if ch == '"' {
                self.scan_string()
            } else {
                self.scan_operator()
            };

            tokens.push(Token { kind, line, col });
        }

        tokens
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.current() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek(1) == Some('/') => self.skip_line_comment(),
                Some('/') if self.peek(1) == Some('*') => self.skip_block_comment(),
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.current() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance(); // /
        self.advance(); // *
        while self.current().is_some() {
            if self.current() == Some('*') && self.peek(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut text = String::new();
        let mut is_float = false;

        while let Some(c) = self.current() {
            if c.is_ascii_digit() {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if self.current() == Some('.') && self.peek(1).map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            is_float = true;
            text.push('.');
            self.advance();
            while let Some(c) = self.current() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        if is_float {
            match text.parse::<f64>() {
                Ok(f) => TokenKind::Float(f),
                Err(_) => TokenKind::Unknown(text),
            }
        } else {
            match text.parse::<i64>() {
                Ok(i) => TokenKind::Int(i),
                Err(_) => TokenKind::Unknown(text),
            }
        }
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let mut ident = String::new();
        while let Some(c) = self.current() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        keyword(&ident).unwrap_or(TokenKind::Ident(ident))
    }

    fn scan_string(&mut self) -> TokenKind {
        self.advance(); // opening "
        let mut value = String::new();

        loop {
            match self.current() {
                // Unterminated literal: surface the partial text for the
                // manager's diagnostic.
                None => return TokenKind::Unknown(format!("\"{}", value)),
                Some('"') => {
                    self.advance();
                    return TokenKind::Str(value);
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('0') => value.push('\0'),
                        // Unknown escape: keep the backslash and the character.
                        Some(c) => {
                            value.push('\\');
                            value.push(c);
                        }
                        None => return TokenKind::Unknown(format!("\"{}\\", value)),
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }
    }

    fn scan_operator(&mut self) -> TokenKind {
        let ch = match self.advance() {
            Some(c) => c,
            None => return TokenKind::Eof,
        };

        match ch {
            '+' => {
                if self.matches('=') {
                    TokenKind::PlusAssign
                } else {
                    TokenKind::Plus
                }
            }
            '-' => {
                if self.matches('=') {
                    TokenKind::MinusAssign
                } else {
                    TokenKind::Minus
                }
            }
            '*' => {
                if self.matches('=') {
                    TokenKind::StarAssign
                } else {
                    TokenKind::Star
                }
            }
            '/' => {
                if self.matches('=') {
                    TokenKind::SlashAssign
                } else {
                    TokenKind::Slash
                }
            }
            '%' => TokenKind::Percent,
            '=' => {
                if self.matches('=') {
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.matches('=') {
                    TokenKind::Neq
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.matches('=') {
                    TokenKind::Lte
                } else if self.matches('<') {
                    TokenKind::Shl
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.matches('=') {
                    TokenKind::Gte
                } else if self.matches('>') {
                    TokenKind::Shr
                } else {
                    TokenKind::Gt
                }
            }
            '&' => {
                if self.matches('&') {
                    TokenKind::And
                } else {
                    TokenKind::BitAnd
                }
            }
            '|' => {
                if self.matches('|') {
                    TokenKind::Or
                } else {
                    TokenKind::BitOr
                }
            }
            '^' => TokenKind::BitXor,
            '~' => TokenKind::BitNot,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            other => TokenKind::Unknown(other.to_string()),
        }
    }
}
