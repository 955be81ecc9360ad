/// Parse everything `scanner` yields into a [`Root`].
///
/// This is the main public entrypoint for parsing. Scanner diagnostics are moved into `diagnostics` as they
/// are produced.
///
/// ## Errors
/// Returns the first [`SyntaxError`], which is also recorded in `diagnostics`, or
/// [`SyntaxError::Aborted`] when the scanner itself reported an error.
#[tracing::instrument(skip_all)]
pub fn parse(scanner: &mut dyn Scanner, diagnostics: &mut Diagnostics) -> Result<Root, SyntaxError> {
    Parser::new(scanner, diagnostics).parse()
}

/// Parse an in-memory source with the raw lexer (no preprocessing).
pub fn parse_source(source: &str, diagnostics: &mut Diagnostics) -> Result<Root, SyntaxError> {
    let mut lexer = Lexer::from_source(source, "<input>");
    parse(&mut lexer, diagnostics)
}

/// Parse one const-expression ending at one of `terminators`, which is left unconsumed.
pub fn parse_const_expr(
    scanner: &mut dyn Scanner,
    diagnostics: &mut Diagnostics,
    terminators: &[Terminator],
) -> Result<Expr, SyntaxError> {
    Parser::new(scanner, diagnostics).const_expression(terminators)
}
