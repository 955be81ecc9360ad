/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type, its top-level `parse()` loop and the [`Terminator`] set used by
/// const-expression parsing.
///
/// ## Notes
/// - The parser stops at the first failure. The failing error is recorded in the diagnostics sink and
///   returned; no partially built node escapes.
/// - Failures raised upstream (lexer or preprocessor) are not re-reported: the parse returns
///   [`SyntaxError::Aborted`] once the scanner has recorded an error.

/// A token that may close a const-expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    Punct(PunctuationId),
    Op(OperatorId),
}

impl Terminator {
    pub fn matches(self, token: &Token) -> bool {
        match self {
            Terminator::Punct(id) => token.is_punctuation(id),
            Terminator::Op(id) => token.is_operator(id),
        }
    }

    pub fn spelling(self) -> &'static str {
        match self {
            Terminator::Punct(id) => punctuation::as_str(id),
            Terminator::Op(id) => operators::as_str(id),
        }
    }
}

const SEMICOLON: &[Terminator] = &[Terminator::Punct(PunctuationId::Semicolon)];

/// How deep blocks, types and const-expressions may nest before the parse fails.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parser state.
pub struct Parser<'s> {
    scanner: &'s mut dyn Scanner,
    diagnostics: &'s mut Diagnostics,
    /// Errors already in the sink when parsing started.
    baseline_errors: usize,
    /// Where the most recent syntax error points.
    error_loc: Location,
    /// Names of structs, unions and enums declared so far.
    types: HashSet<Ident>,
    consts: ConstEnv,
    /// Current nesting level, bounded by [`MAX_NESTING_DEPTH`].
    depth: usize,
}

impl<'s> Parser<'s> {
    pub fn new(scanner: &'s mut dyn Scanner, diagnostics: &'s mut Diagnostics) -> Self {
        let baseline_errors = diagnostics.error_count();
        Self {
            scanner,
            diagnostics,
            baseline_errors,
            error_loc: Location::UNKNOWN,
            types: HashSet::new(),
            consts: ConstEnv::new(),
            depth: 0,
        }
    }

    /// Parse declarations until `EndOfFile`.
    ///
    /// ## Errors
    /// Returns the first [`SyntaxError`]; it has already been recorded in the sink.
    pub fn parse(mut self) -> Result<Root, SyntaxError> {
        let mut stmts = Vec::new();

        loop {
            let token = self.peek();
            if self.upstream_failed() {
                return Err(SyntaxError::Aborted);
            }
            if token.is_eof() {
                break;
            }
            match self.declaration() {
                Ok(stmt) => stmts.push(stmt),
                Err(err) => return Err(self.record(err)),
            }
        }

        tracing::debug!(declarations = stmts.len(), "parsed unit");
        Ok(Root {
            body: Block::new(stmts),
        })
    }

    /// Parse a single const-expression that must be followed by one of `terminators`.
    ///
    /// The terminator is left unconsumed.
    pub fn const_expression(mut self, terminators: &[Terminator]) -> Result<Expr, SyntaxError> {
        let result = self.const_expr(terminators).and_then(|expr| {
            self.expect_terminator(terminators)?;
            Ok(expr)
        });
        result.map_err(|err| self.record(err))
    }

    fn upstream_failed(&self) -> bool {
        self.diagnostics.error_count() > self.baseline_errors
    }

    /// Report `err` unless an upstream stage already failed the job.
    fn record(&mut self, err: SyntaxError) -> SyntaxError {
        if self.upstream_failed() {
            return SyntaxError::Aborted;
        }
        self.diagnostics.report(&err, self.error_loc);
        err
    }
}
