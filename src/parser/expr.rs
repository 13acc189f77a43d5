use super::*;

impl Parser {
    pub(super) fn expression(&mut self) -> Result<Expr, ParseError> {
        self.conditional()
    }

    /// Ternary `?:`, right-associative.
    fn conditional(&mut self) -> Result<Expr, ParseError> {
        let expr = self.logical_or()?;

        if self.matches(&TokenKind::Question) {
            let line = self.previous().line;
            let column = self.previous().col;
            let then_expr = self.expression()?;
            self.consume(&TokenKind::Colon, "Expected ':' in conditional expression")?;
            let else_expr = self.conditional()?;
            return Ok(Expr {
                kind: ExprKind::Conditional {
                    cond: Box::new(expr),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                },
                line,
                column,
            });
        }

        Ok(expr)
    }

    fn binary(left: Expr, op: BinOp, right: Expr, line: usize, column: usize) -> Expr {
        Expr {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            line,
            column,
        }
    }

    fn logical_or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.logical_and()?;
        while self.matches(&TokenKind::Or) {
            let (line, column) = (self.previous().line, self.previous().col);
            let right = self.logical_and()?;
            expr = Self::binary(expr, BinOp::Or, right, line, column);
        }
        Ok(expr)
    }

    fn logical_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.bit_or()?;
        while self.matches(&TokenKind::And) {
            let (line, column) = (self.previous().line, self.previous().col);
            let right = self.bit_or()?;
            expr = Self::binary(expr, BinOp::And, right, line, column);
        }
        Ok(expr)
    }

    fn bit_or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.bit_xor()?;
        while self.matches(&TokenKind::BitOr) {
            let (line, column) = (self.previous().line, self.previous().col);
            let right = self.bit_xor()?;
            expr = Self::binary(expr, BinOp::BitOr, right, line, column);
        }
        Ok(expr)
    }

    fn bit_xor(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.bit_and()?;
        while self.matches(&TokenKind::BitXor) {
            let (line, column) = (self.previous().line, self.previous().col);
            let right = self.bit_and()?;
            expr = Self::binary(expr, BinOp::BitXor, right, line, column);
        }
        Ok(expr)
    }

    fn bit_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.shift()?;
        while self.matches(&TokenKind::BitAnd) {
            let (line, column) = (self.previous().line, self.previous().col);
            let right = self.shift()?;
            expr = Self::binary(expr, BinOp::BitAnd, right, line, column);
        }
        Ok(expr)
    }

    fn shift(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.equality()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Shl => BinOp::Shl,
                TokenKind::Shr => BinOp::Shr,
                _ => break,
            };
            self.advance();
            let (line, column) = (self.previous().line, self.previous().col);
            let right = self.equality()?;
            expr = Self::binary(expr, op, right, line, column);
        }
        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.comparison()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Eq => BinOp::Eq,
                TokenKind::Neq => BinOp::Neq,
                _ => break,
            };
            self.advance();
            let (line, column) = (self.previous().line, self.previous().col);
            let right = self.comparison()?;
            expr = Self::binary(expr, op, right, line, column);
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.term()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Lte => BinOp::Lte,
                TokenKind::Gte => BinOp::Gte,
                _ => break,
            };
            self.advance();
            let (line, column) = (self.previous().line, self.previous().col);
            let right = self.term()?;
            expr = Self::binary(expr, op, right, line, column);
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.factor()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let (line, column) = (self.previous().line, self.previous().col);
            let right = self.factor()?;
            expr = Self::binary(expr, op, right, line, column);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.unary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let (line, column) = (self.previous().line, self.previous().col);
            let right = self.unary()?;
            expr = Self::binary(expr, op, right, line, column);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current().kind {
            TokenKind::Minus => Some(UnaryOp::Negate),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::BitNot => Some(UnaryOp::BitNot),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let line = self.previous().line;
            let column = self.previous().col;
            let operand = self.unary()?;
            return Ok(Expr {
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                line,
                column,
            });
        }

        self.call()
    }

    /// Postfix call `(...)` and index `[...]`.
    fn call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(&TokenKind::LParen) {
                expr = self.finish_call(expr)?;
            } else if self.matches(&TokenKind::LBracket) {
                expr = self.finish_index(expr)?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Expr) -> Result<Expr, ParseError> {
        let name = match callee.kind {
            ExprKind::Variable(name) => name,
            _ => return Err(self.error("Invalid function call")),
        };
        let line = self.previous().line;
        let column = self.previous().col;

        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.expression()?);
                if !self.matches(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(&TokenKind::RParen, "Expected ')' after arguments")?;

        Ok(Expr {
            kind: ExprKind::Call { name, args },
            line,
            column,
        })
    }

    fn finish_index(&mut self, target: Expr) -> Result<Expr, ParseError> {
        let line = self.previous().line;
        let column = self.previous().col;
        let index = self.expression()?;
        self.consume(&TokenKind::RBracket, "Expected ']' after index expression")?;

        Ok(Expr {
            kind: ExprKind::Index {
                target: Box::new(target),
                index: Box::new(index),
            },
            line,
            column,
        })
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.current().clone();

        let kind = match tok.kind {
            TokenKind::True => {
                self.advance();
                ExprKind::Literal(Value::Bool(true), BaseType::Bool)
            }
            TokenKind::False => {
                self.advance();
                ExprKind::Literal(Value::Bool(false), BaseType::Bool)
            }
            // Integer literals enter the tree as int32, like the rest of the
            // language's untyped integer arithmetic.
            TokenKind::Int(v) => {
                self.advance();
                ExprKind::Literal(Value::Int32(v as i32), BaseType::Int32)
            }
            TokenKind::Float(v) => {
                self.advance();
                ExprKind::Literal(Value::Double(v), BaseType::Double)
            }
            TokenKind::Str(ref s) => {
                self.advance();
                ExprKind::Literal(Value::Str(s.clone()), BaseType::Str)
            }
            TokenKind::Ident(ref name) => {
                self.advance();
                ExprKind::Variable(name.clone())
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(&TokenKind::RParen, "Expected ')' after expression")?;
                return Ok(expr);
            }
            TokenKind::LBracket => {
                self.advance();
                let mut elements = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    loop {
                        elements.push(self.expression()?);
                        if !self.matches(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.consume(&TokenKind::RBracket, "Expected ']' after array literal")?;
                ExprKind::ArrayLiteral(elements)
            }
            _ => return Err(self.error("Expected expression")),
        };

        Ok(Expr {
            kind,
            line: tok.line,
            column: tok.col,
        })
    }
}
