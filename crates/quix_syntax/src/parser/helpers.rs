/// Token-stream helpers.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`), which also drain scanner diagnostics into the sink
/// - Matching / expecting keywords, operators, and punctuation
/// - Error construction that remembers where the error points (`fail`)
impl<'s> Parser<'s> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return the current token without consuming it.
    fn peek(&mut self) -> Token {
        let token = self.scanner.peek();
        self.drain_scanner();
        token
    }

    /// Consume and return the current token.
    fn advance(&mut self) -> Token {
        let token = self.scanner.next();
        self.drain_scanner();
        token
    }

    fn drain_scanner(&mut self) {
        let pending = self.scanner.take_diagnostics();
        if !pending.is_empty() {
            self.diagnostics.absorb(pending);
        }
    }

    fn check_punct(&mut self, id: PunctuationId) -> bool {
        self.peek().is_punctuation(id)
    }

    fn check_op(&mut self, id: OperatorId) -> bool {
        self.peek().is_operator(id)
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_op(&mut self, id: OperatorId) -> bool {
        if self.check_op(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Run `f` one nesting level down.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>) -> Result<T, SyntaxError> {
        self.check_depth(1)?;
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Fail with [`SyntaxError::TooDeep`] if `extra` more levels would pass [`MAX_NESTING_DEPTH`].
    fn check_depth(&mut self, extra: usize) -> Result<(), SyntaxError> {
        if self.depth + extra <= MAX_NESTING_DEPTH {
            return Ok(());
        }
        let loc = self.peek().loc;
        Err(self.fail(loc, SyntaxError::TooDeep(MAX_NESTING_DEPTH)))
    }

    /// Remember `loc` as the error position and hand `err` back.
    fn fail(&mut self, loc: Location, err: SyntaxError) -> SyntaxError {
        self.error_loc = loc;
        err
    }

    fn unexpected(&mut self, token: &Token, expected: impl Into<String>) -> SyntaxError {
        self.fail(
            token.loc,
            SyntaxError::Unexpected {
                expected: expected.into(),
                found: token.to_string(),
            },
        )
    }

    fn expect_punct(&mut self, id: PunctuationId) -> Result<Token, SyntaxError> {
        let token = self.peek();
        if token.is_punctuation(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&token, format!("'{}'", punctuation::as_str(id))))
        }
    }

    fn expect_op(&mut self, id: OperatorId) -> Result<Token, SyntaxError> {
        let token = self.peek();
        if token.is_operator(id) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&token, format!("'{}'", operators::as_str(id))))
        }
    }

    /// Consume an identifier and return its name.
    fn expect_ident(&mut self, what: &str) -> Result<Ident, SyntaxError> {
        let token = self.peek();
        match token.ident_name() {
            Some(name) => {
                let name = name.to_string();
                self.advance();
                Ok(name)
            }
            None => Err(self.unexpected(&token, what)),
        }
    }

    /// Check, without consuming, that the current token is one of `terminators`.
    fn expect_terminator(&mut self, terminators: &[Terminator]) -> Result<(), SyntaxError> {
        let token = self.peek();
        if terminators.iter().any(|t| t.matches(&token)) {
            return Ok(());
        }
        let expected = terminators
            .iter()
            .map(|t| format!("'{}'", t.spelling()))
            .collect::<Vec<_>>()
            .join(" or ");
        Err(self.unexpected(&token, expected))
    }
}
