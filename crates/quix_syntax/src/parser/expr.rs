/// Const-expression parsing.
///
/// Binary operators are parsed by precedence climbing over the operator registry: an operator is accepted
/// when it is const-evaluable infix and binds at least as tightly as the current minimum. Prefix `-`, `+`,
/// `!` and `~` bind tighter than any infix operator.
///
/// ## Notes
/// - The caller passes the tokens that may follow the expression. Those are never consumed here, even when
///   they are also operators (`>` closing `array<T, N>`).
impl<'s> Parser<'s> {
    // ========================================================================
    // Const-expressions
    // ========================================================================

    fn const_expr(&mut self, terminators: &[Terminator]) -> Result<Expr, SyntaxError> {
        self.const_binary(0, terminators)
    }

    fn const_binary(&mut self, min_precedence: u8, terminators: &[Terminator]) -> Result<Expr, SyntaxError> {
        let mut lhs = self.const_unary(terminators)?;

        // Each operator in a chain adds a level to the tree even though parsing it does not recurse.
        let mut chained = 0;
        loop {
            let token = self.peek();
            if terminators.iter().any(|t| t.matches(&token)) {
                break;
            }
            let Some(op) = token.operator_id().filter(|op| operators::is_const_binary(*op)) else {
                break;
            };
            let info = operators::info_for(op);
            if info.precedence < min_precedence {
                break;
            }
            chained += 1;
            self.check_depth(chained)?;
            self.advance();

            let next_min = match info.associativity {
                Associativity::Left => info.precedence + 1,
                Associativity::Right => info.precedence,
            };
            let rhs = self.nested(|p| p.const_binary(next_min, terminators))?;
            lhs = Expr::binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn const_unary(&mut self, terminators: &[Terminator]) -> Result<Expr, SyntaxError> {
        let token = self.peek();
        if let Some(op) = token.operator_id().filter(|op| operators::is_const_prefix(*op)) {
            self.advance();
            let operand = self.nested(|p| p.const_unary(terminators))?;
            return Ok(Expr::unary(op, operand));
        }
        self.const_primary()
    }

    fn const_primary(&mut self) -> Result<Expr, SyntaxError> {
        let token = self.peek();
        let expr = match (&token.kind, &token.value) {
            (TokenKind::IntegerLiteral, TokenValue::Text(text)) => {
                let value = text.parse::<u64>().map_err(|_| {
                    self.fail(token.loc, SyntaxError::BadConstExpr(format!("integer literal '{text}' is out of range")))
                })?;
                Expr::int(value)
            }
            (TokenKind::FloatLiteral, TokenValue::Text(text)) => Expr::Float(FloatLiteral {
                text: text.clone(),
                width: float_width(text).unwrap_or(64),
            }),
            (TokenKind::StringLiteral, TokenValue::Text(text)) => Expr::String(text.clone()),
            (TokenKind::CharLiteral, TokenValue::Char(c)) => Expr::Char(*c),
            (TokenKind::Identifier, TokenValue::Text(name)) => Expr::Identifier(name.clone()),
            (TokenKind::Keyword, TokenValue::Keyword(KeywordId::True)) => Expr::Bool(true),
            (TokenKind::Keyword, TokenValue::Keyword(KeywordId::False)) => Expr::Bool(false),
            (TokenKind::Keyword, TokenValue::Keyword(KeywordId::Null)) => Expr::Null,
            (TokenKind::Punctuator, TokenValue::Punctuator(PunctuationId::LParen)) => {
                self.advance();
                let inner = self.nested(|p| p.const_expr(&[Terminator::Punct(PunctuationId::RParen)]))?;
                self.expect_punct(PunctuationId::RParen)?;
                return Ok(inner);
            }
            _ => {
                return Err(self.fail(
                    token.loc,
                    SyntaxError::BadConstExpr(format!("expected a value, found {token}")),
                ));
            }
        };
        self.advance();
        Ok(expr)
    }
}
