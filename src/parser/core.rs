use super::*;

impl Parser {
    pub fn new(tokens: Vec<Token>, filename: impl Into<String>) -> Self {
        Parser {
            tokens,
            pos: 0,
            filename: filename.into(),
            current_procedure: String::new(),
            errors: Vec::new(),
        }
    }

    /// Parse the whole token stream into a script. Errors are collected via
    /// `errors()`; every procedure after a failed one is still attempted.
    pub fn parse(&mut self) -> Script {
        let mut procedures = Vec::new();

        while !self.is_at_end() {
            match self.procedure_declaration() {
                Ok(proc) => procedures.push(proc),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                    self.current_procedure.clear();
                }
            }
        }

        Script {
            filename: self.filename.clone(),
            procedures,
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub(super) fn error(&self, msg: impl Into<String>) -> ParseError {
        let tok = self.current();
        ParseError {
            msg: msg.into(),
            line: tok.line,
            col: tok.col,
            procedure: self.current_procedure.clone(),
        }
    }

    pub(super) fn current(&self) -> &Token {
        if self.pos < self.tokens.len() {
            &self.tokens[self.pos]
        } else {
            self.tokens.last().unwrap()
        }
    }

    pub(super) fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    pub(super) fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    /// Kind check by discriminant, so payload-carrying kinds match any payload.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        !self.is_at_end()
            && std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    pub(super) fn matches(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn consume(&mut self, kind: &TokenKind, msg: &str) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(self.error(msg))
        }
    }

    pub(super) fn consume_ident(&mut self, msg: &str) -> Result<(String, Token), ParseError> {
        let tok = self.consume(&TokenKind::Ident(String::new()), msg)?;
        match &tok.kind {
            TokenKind::Ident(name) => Ok((name.clone(), tok.clone())),
            _ => unreachable!(),
        }
    }

    /// Skip tokens until just past a `;` or `}`, or until the next token can
    /// start a statement. Called after a recorded parse error.
    pub(super) fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if matches!(
                self.previous().kind,
                TokenKind::Semicolon | TokenKind::RBrace
            ) {
                return;
            }

            match &self.current().kind {
                TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Switch
                | TokenKind::Do
                | TokenKind::Return => return,
                kind if kind.is_type_keyword() => return,
                _ => {}
            }

            self.advance();
        }
    }
}
