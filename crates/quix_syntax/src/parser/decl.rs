/// Declaration parsing.
///
/// Grammar handled here:
/// - `var`/`let`/`const NAME: TYPE [= CONST_EXPR];`
/// - `struct`/`union NAME;` and `struct`/`union NAME { field: TYPE [= CONST_EXPR]; ... };`
/// - `enum NAME [: TYPE] { A [= CONST_EXPR], B, ... };`
/// - `fn NAME(p: TYPE, ...) [: TYPE] (; | { BODY })`
/// - `subsystem NAME [: dep, ...] { DECLS };`
/// - `pub DECL`
impl<'s> Parser<'s> {
    // ========================================================================
    // Declarations
    // ========================================================================

    fn declaration(&mut self) -> Result<Stmt, SyntaxError> {
        let token = self.peek();
        let Some(id) = token.keyword_id() else {
            return Err(self.fail(
                token.loc,
                SyntaxError::ExpectedDeclaration {
                    found: token.to_string(),
                },
            ));
        };

        match id {
            KeywordId::Var => self.binding(BindingKind::Var),
            KeywordId::Let => self.binding(BindingKind::Let),
            KeywordId::Const => self.binding(BindingKind::Const),
            KeywordId::Struct | KeywordId::Union => self.composite(),
            KeywordId::Enum => self.enum_decl(),
            KeywordId::Fn => self.function(),
            KeywordId::Subsystem => self.subsystem(),
            KeywordId::Pub => self.export(),
            other => Err(self.unexpected(&token, format!("a declaration, not '{}'", keywords::as_str(other)))),
        }
    }

    /// `KEYWORD IDENT ':' TYPE (';' | '=' CONST_EXPR ';')`
    fn binding(&mut self, kind: BindingKind) -> Result<Stmt, SyntaxError> {
        let keyword = self.advance();
        let loc = keyword.loc;

        let token = self.peek();
        let Some(name) = token.ident_name().map(str::to_string) else {
            return Err(self.fail(
                token.loc,
                SyntaxError::MissingIdentifier {
                    keyword: kind.keyword(),
                },
            ));
        };
        self.advance();

        let token = self.peek();
        if !token.is_punctuation(PunctuationId::Colon) {
            return Err(self.fail(token.loc, SyntaxError::MissingColon { name }));
        }
        self.advance();

        let ty = self.value_type().map_err(|err| SyntaxError::BadType {
            name: name.clone(),
            reason: err.to_string(),
        })?;

        let init = if self.match_op(OperatorId::Eq) {
            let expr = self.const_expr(SEMICOLON).map_err(|err| SyntaxError::BadInitializer {
                name: name.clone(),
                reason: err.to_string(),
            })?;
            Some(expr)
        } else {
            None
        };

        let token = self.peek();
        if !token.is_punctuation(PunctuationId::Semicolon) {
            return Err(self.fail(
                token.loc,
                SyntaxError::MissingTerminator {
                    name,
                    expected: ";",
                    found: token.to_string(),
                },
            ));
        }
        self.advance();

        if kind == BindingKind::Const {
            if let Some(value) = init.as_ref().and_then(|e| const_eval::evaluate(e, &self.consts).ok()) {
                self.consts.define(name.clone(), value);
            }
        }

        Ok(Stmt::binding(kind, Binding { name, ty, init, loc }))
    }

    /// `struct`/`union NAME (';' | '{' FIELDS '}' ';')`
    fn composite(&mut self) -> Result<Stmt, SyntaxError> {
        let keyword = self.advance();
        let is_union = keyword.is_keyword(KeywordId::Union);
        let name = self.expect_ident("a type name")?;
        self.check_redeclaration(&name, keyword.loc)?;

        let fields = if self.match_punct(PunctuationId::Semicolon) {
            None
        } else {
            self.expect_punct(PunctuationId::LBrace)?;
            let mut fields = Vec::new();
            while !self.match_punct(PunctuationId::RBrace) {
                let field = self.expect_ident("a field name or '}'")?;
                self.expect_punct(PunctuationId::Colon)?;
                let ty = self.value_type()?;
                let default = if self.match_op(OperatorId::Eq) {
                    Some(self.const_expr(SEMICOLON)?)
                } else {
                    None
                };
                self.expect_punct(PunctuationId::Semicolon)?;
                fields.push(FieldDecl {
                    name: field,
                    ty,
                    default,
                });
            }
            self.expect_punct(PunctuationId::Semicolon)?;
            Some(fields)
        };

        self.types.insert(name.clone());
        let decl = CompositeDecl {
            name,
            fields,
            loc: keyword.loc,
        };
        Ok(if is_union { Stmt::Union(decl) } else { Stmt::Struct(decl) })
    }

    /// `enum NAME [: TYPE] '{' VARIANT (',' VARIANT)* [','] '}' ';'`
    ///
    /// Variants become constants named `NAME::VARIANT`, numbered from the previous value plus one.
    fn enum_decl(&mut self) -> Result<Stmt, SyntaxError> {
        let keyword = self.advance();
        let name = self.expect_ident("an enum name")?;
        self.check_redeclaration(&name, keyword.loc)?;

        let repr = if self.match_punct(PunctuationId::Colon) {
            let token = self.peek();
            match self.value_type()? {
                ty @ Type::Primitive(id) if primitives::info_for(id).is_integer() => ty,
                other => {
                    return Err(self.fail(
                        token.loc,
                        SyntaxError::BadType {
                            name: name.clone(),
                            reason: format!("enum representation must be an integer type, not {other}"),
                        },
                    ));
                }
            }
        } else {
            Type::Primitive(PrimitiveId::I32)
        };

        self.expect_punct(PunctuationId::LBrace)?;
        let terminators = [
            Terminator::Punct(PunctuationId::Comma),
            Terminator::Punct(PunctuationId::RBrace),
        ];
        let mut variants = Vec::new();
        let mut next_value: i128 = 0;
        while !self.match_punct(PunctuationId::RBrace) {
            let variant_loc = self.peek().loc;
            let variant = self.expect_ident("a variant name or '}'")?;
            let value = if self.match_op(OperatorId::Eq) {
                let expr = self.const_expr(&terminators)?;
                self.expect_terminator(&terminators)?;
                Some(expr)
            } else {
                None
            };

            let numeric = match &value {
                Some(expr) => match const_eval::evaluate(expr, &self.consts) {
                    Ok(ConstValue::Int(v)) => v,
                    Ok(other) => {
                        return Err(self.fail(
                            variant_loc,
                            SyntaxError::BadConstExpr(format!("enum value must be an integer, found {other:?}")),
                        ));
                    }
                    Err(err) => return Err(self.fail(variant_loc, SyntaxError::BadConstExpr(err.to_string()))),
                },
                None => next_value,
            };
            self.consts.define(format!("{name}::{variant}"), ConstValue::Int(numeric));
            next_value = numeric.saturating_add(1);

            variants.push(EnumVariant { name: variant, value });
            if !self.match_punct(PunctuationId::Comma) {
                self.expect_punct(PunctuationId::RBrace)?;
                break;
            }
        }
        self.expect_punct(PunctuationId::Semicolon)?;

        self.types.insert(name.clone());
        Ok(Stmt::Enum(EnumDecl {
            name,
            repr,
            variants,
            loc: keyword.loc,
        }))
    }

    /// `fn NAME '(' PARAMS ')' [':' TYPE] (';' | '{' BODY '}')`
    fn function(&mut self) -> Result<Stmt, SyntaxError> {
        let keyword = self.advance();
        let name = self.expect_ident("a function name")?;

        self.expect_punct(PunctuationId::LParen)?;
        let mut params = Vec::new();
        if !self.match_punct(PunctuationId::RParen) {
            loop {
                let param = self.expect_ident("a parameter name")?;
                self.expect_punct(PunctuationId::Colon)?;
                let ty = self.value_type()?;
                params.push(Param { name: param, ty });
                if self.match_punct(PunctuationId::RParen) {
                    break;
                }
                self.expect_punct(PunctuationId::Comma)?;
            }
        }

        let ret = if self.match_punct(PunctuationId::Colon) {
            self.parse_type()?
        } else {
            Type::VOID
        };

        let body = if self.match_punct(PunctuationId::Semicolon) {
            None
        } else {
            // Declarations inside the body are not visible after it.
            let saved_types = self.types.clone();
            let saved_consts = self.consts.clone();
            let body = self.block(true);
            self.types = saved_types;
            self.consts = saved_consts;
            let body = body?;
            self.match_punct(PunctuationId::Semicolon);
            Some(body)
        };

        Ok(Stmt::Function(FunctionDecl {
            name,
            params,
            ret,
            body,
            loc: keyword.loc,
        }))
    }

    /// `subsystem NAME [':' DEP (',' DEP)*] '{' DECLS '}' ';'`
    fn subsystem(&mut self) -> Result<Stmt, SyntaxError> {
        let keyword = self.advance();
        let name = self.expect_ident("a subsystem name")?;

        let mut deps = BTreeSet::new();
        if self.match_punct(PunctuationId::Colon) {
            loop {
                deps.insert(self.expect_ident("a dependency name")?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }

        let body = self.block(false)?;
        self.expect_punct(PunctuationId::Semicolon)?;

        Ok(Stmt::Subsystem(SubsystemDecl {
            name,
            deps,
            body,
            loc: keyword.loc,
        }))
    }

    /// `pub DECL`
    fn export(&mut self) -> Result<Stmt, SyntaxError> {
        let keyword = self.advance();
        let token = self.peek();
        if token.is_keyword(KeywordId::Pub) || token.keyword_id().is_none() {
            return Err(self.unexpected(&token, "a declaration after 'pub'"));
        }
        let decl = self.declaration()?;
        Ok(Stmt::Export(ExportDecl {
            decl: Box::new(decl),
            loc: keyword.loc,
        }))
    }

    /// `'{' (DECL | RETURN)* '}'`; `return` is only accepted when `in_function`.
    fn block(&mut self, in_function: bool) -> Result<Block, SyntaxError> {
        self.expect_punct(PunctuationId::LBrace)?;
        let mut stmts = Vec::new();
        loop {
            let token = self.peek();
            if token.is_punctuation(PunctuationId::RBrace) {
                self.advance();
                break;
            }
            if token.is_eof() {
                return Err(self.unexpected(&token, "'}'"));
            }
            if in_function && token.is_keyword(KeywordId::Return) {
                stmts.push(self.return_stmt()?);
            } else {
                stmts.push(self.nested(Self::declaration)?);
            }
        }
        Ok(Block::new(stmts))
    }

    /// `return [CONST_EXPR] ';'`
    fn return_stmt(&mut self) -> Result<Stmt, SyntaxError> {
        let keyword = self.advance();
        let value = if self.check_punct(PunctuationId::Semicolon) {
            None
        } else {
            Some(self.const_expr(SEMICOLON)?)
        };
        self.expect_punct(PunctuationId::Semicolon)?;
        Ok(Stmt::Return(ReturnStmt {
            value,
            loc: keyword.loc,
        }))
    }

    fn check_redeclaration(&mut self, name: &str, loc: Location) -> Result<(), SyntaxError> {
        if self.types.contains(name) || primitives::from_str(name).is_some() {
            return Err(self.fail(
                loc,
                SyntaxError::Unexpected {
                    expected: "a new type name".to_string(),
                    found: format!("'{name}', which is already a type"),
                },
            ));
        }
        Ok(())
    }
}
