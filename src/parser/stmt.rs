use super::*;

impl Parser {
    pub(super) fn statement(&mut self) -> Result<Stmt, ParseError> {
        if self.matches(&TokenKind::If) {
            return self.if_statement();
        }
        if self.matches(&TokenKind::While) {
            return self.while_statement();
        }
        if self.matches(&TokenKind::Do) {
            return self.do_while_statement();
        }
        if self.matches(&TokenKind::For) {
            return self.for_statement();
        }
        if self.matches(&TokenKind::Switch) {
            return self.switch_statement();
        }
        if self.matches(&TokenKind::Return) {
            return self.return_statement();
        }
        if self.matches(&TokenKind::Break) {
            let (line, column) = (self.previous().line, self.previous().col);
            self.consume(&TokenKind::Semicolon, "Expected ';' after 'break'")?;
            return Ok(Stmt {
                kind: StmtKind::Break,
                line,
                column,
            });
        }
        if self.matches(&TokenKind::Continue) {
            let (line, column) = (self.previous().line, self.previous().col);
            self.consume(&TokenKind::Semicolon, "Expected ';' after 'continue'")?;
            return Ok(Stmt {
                kind: StmtKind::Continue,
                line,
                column,
            });
        }
        if self.matches(&TokenKind::LBrace) {
            return self.block();
        }
        if self.at_var_decl() {
            return self.var_declaration();
        }

        self.expression_statement()
    }

    /// Assumes the opening `{` has already been consumed.
    pub(super) fn block(&mut self) -> Result<Stmt, ParseError> {
        let line = self.previous().line;
        let column = self.previous().col;
        let mut statements = Vec::new();

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.consume(&TokenKind::RBrace, "Expected '}' after block")?;
        Ok(Stmt {
            kind: StmtKind::Block(statements),
            line,
            column,
        })
    }

    fn var_declaration(&mut self) -> Result<Stmt, ParseError> {
        let line = self.current().line;
        let column = self.current().col;

        let ty = self.parse_type()?;
        let (name, _) = self.consume_ident("Expected variable name")?;

        let init = if self.matches(&TokenKind::Assign) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            &TokenKind::Semicolon,
            "Expected ';' after variable declaration",
        )?;
        Ok(Stmt {
            kind: StmtKind::VarDecl { ty, name, init },
            line,
            column,
        })
    }

    fn assign_op(&mut self) -> Option<AssignOp> {
        let op = match self.current().kind {
            TokenKind::Assign => AssignOp::Assign,
            TokenKind::PlusAssign => AssignOp::AddAssign,
            TokenKind::MinusAssign => AssignOp::SubAssign,
            TokenKind::StarAssign => AssignOp::MulAssign,
            TokenKind::SlashAssign => AssignOp::DivAssign,
            _ => return None,
        };
        self.advance();
        Some(op)
    }

    /// An expression statement; a trailing assignment operator promotes it to
    /// an assignment, whose target must be a variable or an index expression.
    fn expression_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.current().line;
        let column = self.current().col;

        let expr = self.expression()?;

        if let Some(op) = self.assign_op() {
            let stmt = match (expr.kind, op) {
                (ExprKind::Variable(name), op) => {
                    let value = self.expression()?;
                    StmtKind::Assign { name, op, value }
                }
                (ExprKind::Index { target, index }, AssignOp::Assign) => {
                    let value = self.expression()?;
                    StmtKind::IndexAssign {
                        target: *target,
                        index: *index,
                        value,
                    }
                }
                _ => return Err(self.error("Invalid assignment target")),
            };
            self.consume(&TokenKind::Semicolon, "Expected ';' after expression")?;
            return Ok(Stmt {
                kind: stmt,
                line,
                column,
            });
        }

        self.consume(&TokenKind::Semicolon, "Expected ';' after expression")?;
        Ok(Stmt {
            kind: StmtKind::Expression(expr),
            line,
            column,
        })
    }

    fn if_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.previous().line;
        let column = self.previous().col;

        self.consume(&TokenKind::LParen, "Expected '(' after 'if'")?;
        let cond = self.expression()?;
        self.consume(&TokenKind::RParen, "Expected ')' after if condition")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(&TokenKind::Else) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt {
            kind: StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            line,
            column,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.previous().line;
        let column = self.previous().col;

        self.consume(&TokenKind::LParen, "Expected '(' after 'while'")?;
        let cond = self.expression()?;
        self.consume(&TokenKind::RParen, "Expected ')' after while condition")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt {
            kind: StmtKind::While { cond, body },
            line,
            column,
        })
    }

    fn do_while_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.previous().line;
        let column = self.previous().col;

        let body = Box::new(self.statement()?);

        self.consume(&TokenKind::While, "Expected 'while' after do-while body")?;
        self.consume(&TokenKind::LParen, "Expected '(' after 'while'")?;
        let cond = self.expression()?;
        self.consume(&TokenKind::RParen, "Expected ')' after while condition")?;
        self.consume(
            &TokenKind::Semicolon,
            "Expected ';' after do-while statement",
        )?;

        Ok(Stmt {
            kind: StmtKind::DoWhile { body, cond },
            line,
            column,
        })
    }

    fn for_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.previous().line;
        let column = self.previous().col;

        self.consume(&TokenKind::LParen, "Expected '(' after 'for'")?;

        let init = if self.matches(&TokenKind::Semicolon) {
            None
        } else if self.at_var_decl() {
            Some(Box::new(self.var_declaration()?))
        } else {
            Some(Box::new(self.expression_statement()?))
        };

        let cond = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(&TokenKind::Semicolon, "Expected ';' after loop condition")?;

        let incr = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.for_increment()?))
        };

        self.consume(&TokenKind::RParen, "Expected ')' after for clauses")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt {
            kind: StmtKind::For {
                init,
                cond,
                incr,
                body,
            },
            line,
            column,
        })
    }

    /// The third `for` clause: an expression or an un-semicoloned assignment.
    fn for_increment(&mut self) -> Result<Stmt, ParseError> {
        let line = self.current().line;
        let column = self.current().col;

        let expr = self.expression()?;

        if let Some(op) = self.assign_op() {
            let name = match expr.kind {
                ExprKind::Variable(name) => name,
                _ => return Err(self.error("Invalid assignment target in for loop")),
            };
            let value = self.expression()?;
            return Ok(Stmt {
                kind: StmtKind::Assign { name, op, value },
                line,
                column,
            });
        }

        Ok(Stmt {
            kind: StmtKind::Expression(expr),
            line,
            column,
        })
    }

    fn switch_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.previous().line;
        let column = self.previous().col;

        self.consume(&TokenKind::LParen, "Expected '(' after 'switch'")?;
        let subject = self.expression()?;
        self.consume(&TokenKind::RParen, "Expected ')' after switch expression")?;
        self.consume(&TokenKind::LBrace, "Expected '{' after switch expression")?;

        let mut cases = Vec::new();
        let mut seen_default = false;

        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.matches(&TokenKind::Case) {
                let value = self.expression()?;
                self.consume(&TokenKind::Colon, "Expected ':' after case expression")?;
                cases.push(SwitchCase {
                    value: Some(value),
                    body: self.case_body()?,
                });
            } else if self.matches(&TokenKind::Default) {
                self.consume(&TokenKind::Colon, "Expected ':' after default")?;
                if seen_default {
                    return Err(self.error("Multiple default labels in switch"));
                }
                seen_default = true;
                cases.push(SwitchCase {
                    value: None,
                    body: self.case_body()?,
                });
            } else {
                return Err(self.error("Expected 'case' or 'default' in switch statement"));
            }
        }

        self.consume(&TokenKind::RBrace, "Expected '}' after switch cases")?;
        Ok(Stmt {
            kind: StmtKind::Switch { subject, cases },
            line,
            column,
        })
    }

    fn case_body(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::Case)
            && !self.check(&TokenKind::Default)
            && !self.check(&TokenKind::RBrace)
            && !self.is_at_end()
        {
            stmts.push(self.statement()?);
        }
        Ok(stmts)
    }

    fn return_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.previous().line;
        let column = self.previous().col;

        let value = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };

        self.consume(&TokenKind::Semicolon, "Expected ';' after return value")?;
        Ok(Stmt {
            kind: StmtKind::Return(value),
            line,
            column,
        })
    }
}
