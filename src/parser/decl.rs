use super::*;

fn base_type_for(kind: &TokenKind) -> Option<BaseType> {
    match kind {
        TokenKind::Int8 => Some(BaseType::Int8),
        TokenKind::UInt8 => Some(BaseType::UInt8),
        TokenKind::Int16 => Some(BaseType::Int16),
        TokenKind::UInt16 => Some(BaseType::UInt16),
        TokenKind::Int32 => Some(BaseType::Int32),
        TokenKind::UInt32 => Some(BaseType::UInt32),
        TokenKind::Int64 => Some(BaseType::Int64),
        TokenKind::UInt64 => Some(BaseType::UInt64),
        TokenKind::Double => Some(BaseType::Double),
        TokenKind::StringType => Some(BaseType::Str),
        TokenKind::Bool => Some(BaseType::Bool),
        TokenKind::Void => Some(BaseType::Void),
        _ => None,
    }
}

impl Parser {
    /// True when the current token starts a variable declaration (`void` is
    /// only valid as a return type).
    pub(super) fn at_var_decl(&self) -> bool {
        self.current().kind.is_type_keyword() && !matches!(self.current().kind, TokenKind::Void)
    }

    /// A type: one of the base-type keywords, optionally suffixed with `[]`.
    pub(super) fn parse_type(&mut self) -> Result<TypeInfo, ParseError> {
        let base = match base_type_for(&self.current().kind) {
            Some(base) => {
                self.advance();
                base
            }
            None => return Err(self.error("Expected type")),
        };

        let is_array = if self.matches(&TokenKind::LBracket) {
            self.consume(&TokenKind::RBracket, "Expected ']' after '[' in type")?;
            true
        } else {
            false
        };

        Ok(TypeInfo { base, is_array })
    }

    /// `type name(params) { body }`
    pub(super) fn procedure_declaration(&mut self) -> Result<ProcedureDecl, ParseError> {
        let line = self.current().line;
        let column = self.current().col;

        let return_type = self.parse_type()?;
        let (name, _) = self.consume_ident("Expected procedure name")?;
        self.current_procedure = name.clone();

        self.consume(&TokenKind::LParen, "Expected '(' after procedure name")?;
        let parameters = self.parameters()?;
        self.consume(&TokenKind::RParen, "Expected ')' after parameters")?;

        self.consume(&TokenKind::LBrace, "Expected '{' before procedure body")?;
        let body = self.block()?;

        self.current_procedure.clear();

        Ok(ProcedureDecl {
            return_type,
            name,
            parameters,
            body,
            line,
            column,
        })
    }

    fn parameters(&mut self) -> Result<Vec<Parameter>, ParseError> {
        let mut params = Vec::new();

        if !self.check(&TokenKind::RParen) {
            loop {
                let ty = self.parse_type()?;
                let (name, _) = self.consume_ident("Expected parameter name")?;
                params.push(Parameter { ty, name });
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }

        Ok(params)
    }
}
