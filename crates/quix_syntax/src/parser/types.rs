/// Type parsing.
///
/// Accepts primitive names (`u8` ... `string`, plus the `void` keyword), `array<T, N>` with a
/// const-evaluated length, inline `struct { ... }` / `union { ... }` types, and the names of structs,
/// unions and enums declared earlier in the unit.
impl<'s> Parser<'s> {
    // ========================================================================
    // Types
    // ========================================================================

    /// A type that can hold a value (anything but `void`).
    fn value_type(&mut self) -> Result<Type, SyntaxError> {
        let token = self.peek();
        let ty = self.nested(Self::parse_type)?;
        if ty == Type::VOID {
            return Err(self.unexpected(&token, "a value type ('void' has no values)"));
        }
        Ok(ty)
    }

    fn parse_type(&mut self) -> Result<Type, SyntaxError> {
        let token = self.peek();
        match (&token.kind, &token.value) {
            (TokenKind::Keyword, TokenValue::Keyword(KeywordId::Void)) => {
                self.advance();
                Ok(Type::VOID)
            }
            (TokenKind::Keyword, TokenValue::Keyword(KeywordId::Struct)) => {
                self.advance();
                Ok(Type::Struct(self.type_fields()?))
            }
            (TokenKind::Keyword, TokenValue::Keyword(KeywordId::Union)) => {
                self.advance();
                Ok(Type::Union(self.type_fields()?))
            }
            (TokenKind::Identifier, TokenValue::Text(name)) => {
                self.advance();
                if name == "array" {
                    return self.array_type();
                }
                if let Some(id) = primitives::from_str(name) {
                    return Ok(Type::Primitive(id));
                }
                if self.types.contains(name.as_str()) {
                    return Ok(Type::Named(name.clone()));
                }
                Err(self.fail(token.loc, SyntaxError::UnknownType(name.clone())))
            }
            _ => Err(self.unexpected(&token, "a type")),
        }
    }

    /// `array '<' TYPE ',' CONST_EXPR '>'`, after `array` has been consumed.
    fn array_type(&mut self) -> Result<Type, SyntaxError> {
        self.expect_op(OperatorId::Lt)?;
        let elem = self.value_type()?;
        self.expect_punct(PunctuationId::Comma)?;

        let loc = self.peek().loc;
        let terminators = [Terminator::Op(OperatorId::Gt)];
        let len_expr = self.const_expr(&terminators)?;
        self.expect_op(OperatorId::Gt)?;

        let value = const_eval::evaluate(&len_expr, &self.consts)
            .map_err(|err| self.fail(loc, SyntaxError::BadConstExpr(err.to_string())))?;
        let len = value.as_u64().ok_or_else(|| {
            self.fail(
                loc,
                SyntaxError::BadConstExpr(format!("array length must be a non-negative integer, found {value:?}")),
            )
        })?;
        Ok(Type::array(elem, len))
    }

    /// `'{' (NAME ':' TYPE ';')* '}'`
    fn type_fields(&mut self) -> Result<Vec<TypeField>, SyntaxError> {
        self.expect_punct(PunctuationId::LBrace)?;
        let mut fields = Vec::new();
        while !self.match_punct(PunctuationId::RBrace) {
            let name = self.expect_ident("a field name or '}'")?;
            self.expect_punct(PunctuationId::Colon)?;
            let ty = self.value_type()?;
            self.expect_punct(PunctuationId::Semicolon)?;
            fields.push(TypeField { name, ty });
        }
        Ok(fields)
    }
}
