#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on the accepted declaration forms, the five distinct `var`/`let`/`const` failures and
/// the guarantee that a failed parse reports exactly one error.
mod tests {
    use super::*;
    use crate::diagnostics::{DeclPart, Severity};

    fn parse_str(source: &str) -> Result<Root, (SyntaxError, Diagnostics)> {
        let mut diagnostics = Diagnostics::new();
        match parse_source(source, &mut diagnostics) {
            Ok(root) => Ok(root),
            Err(err) => Err((err, diagnostics)),
        }
    }

    fn single(source: &str) -> Stmt {
        let root = parse_str(source).unwrap_or_else(|(err, _)| panic!("parse failed: {err}"));
        assert_eq!(root.body.stmts.len(), 1);
        root.body.stmts.into_iter().next().unwrap()
    }

    fn decl_failure(source: &str) -> DeclPart {
        let (err, diagnostics) = parse_str(source).expect_err("should fail");
        assert_eq!(diagnostics.error_count(), 1, "exactly one error for {source:?}");
        err.decl_part().unwrap_or_else(|| panic!("not a declaration error: {err:?}"))
    }

    #[test]
    fn test_let_with_initializer() {
        match single("let x: i32 = 5;") {
            Stmt::Let(b) => {
                assert_eq!(b.name, "x");
                assert_eq!(b.ty, Type::Primitive(PrimitiveId::I32));
                assert_eq!(b.init, Some(Expr::int(5)));
            }
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn test_binding_kinds() {
        assert!(matches!(single("var a: u8;"), Stmt::Var(_)));
        assert!(matches!(single("const b: bool = true;"), Stmt::Const(_)));
    }

    #[test]
    fn test_five_declaration_failures() {
        assert_eq!(decl_failure("let : i32;"), DeclPart::Identifier);
        assert_eq!(decl_failure("let x i32;"), DeclPart::Colon);
        assert_eq!(decl_failure("let x: nope;"), DeclPart::Type);
        assert_eq!(decl_failure("let x: i32 = ;"), DeclPart::Initializer);
        assert_eq!(decl_failure("let x: i32 = 5 let"), DeclPart::Terminator);
    }

    #[test]
    fn test_missing_identifier_reports_location() {
        let (_, diagnostics) = parse_str("\nlet : i32;").expect_err("fails");
        let entry = diagnostics.iter().next().unwrap();
        assert_eq!(entry.code.as_deref(), Some("quix::parse::missing_identifier"));
        assert_eq!((entry.loc.line, entry.loc.column), (2, 5));
    }

    #[test]
    fn test_non_keyword_at_top_level_is_fatal() {
        let (err, diagnostics) = parse_str("x = 1;").expect_err("fails");
        assert!(matches!(err, SyntaxError::ExpectedDeclaration { .. }));
        assert_eq!(diagnostics.iter().next().unwrap().severity, Severity::Fatal);
    }

    #[test]
    fn test_stops_at_first_error() {
        let (_, diagnostics) = parse_str("let : i32; let y i32;").expect_err("fails");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_precedence_climbing() {
        match single("const x: i32 = 1 + 2 * 3 - 4;") {
            Stmt::Const(b) => {
                let expected = Expr::binary(
                    OperatorId::Minus,
                    Expr::binary(
                        OperatorId::Plus,
                        Expr::int(1),
                        Expr::binary(OperatorId::Star, Expr::int(2), Expr::int(3)),
                    ),
                    Expr::int(4),
                );
                assert_eq!(b.init, Some(expected));
            }
            other => panic!("expected const, got {other:?}"),
        }
    }

    #[test]
    fn test_unary_and_grouping() {
        match single("let x: i64 = -(1 + 2);") {
            Stmt::Let(b) => assert_eq!(
                b.init,
                Some(Expr::unary(
                    OperatorId::Minus,
                    Expr::binary(OperatorId::Plus, Expr::int(1), Expr::int(2))
                ))
            ),
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn test_array_length_uses_earlier_consts() {
        let root = parse_str("const N: u64 = 4; var buf: array<array<u8, N * 2>, 3>;")
            .unwrap_or_else(|(err, _)| panic!("{err}"));
        match &root.body.stmts[1] {
            Stmt::Var(b) => assert_eq!(b.ty, Type::array(Type::array(Type::Primitive(PrimitiveId::U8), 8), 3)),
            other => panic!("expected var, got {other:?}"),
        }
    }

    #[test]
    fn test_array_length_must_be_constant() {
        let (err, _) = parse_str("var buf: array<u8, M>;").expect_err("fails");
        assert!(matches!(err, SyntaxError::BadType { .. }), "{err:?}");
        let (err, _) = parse_str("var buf: array<u8, -1>;").expect_err("fails");
        assert!(err.to_string().contains("non-negative"), "{err}");
    }

    #[test]
    fn test_named_types_must_be_declared_first() {
        let (err, _) = parse_str("var p: Point;").expect_err("fails");
        assert!(err.to_string().contains("unknown type 'Point'"), "{err}");

        let root = parse_str("struct Point { x: i32; y: i32 = 0; }; var p: Point;")
            .unwrap_or_else(|(err, _)| panic!("{err}"));
        match &root.body.stmts[1] {
            Stmt::Var(b) => assert_eq!(b.ty, Type::Named("Point".into())),
            other => panic!("expected var, got {other:?}"),
        }
    }

    #[test]
    fn test_forward_struct_and_union() {
        match single("union Word;") {
            Stmt::Union(d) => assert_eq!(d.fields, None),
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn test_inline_struct_type() {
        match single("let s: struct { a: u8; b: array<char, 2>; };") {
            Stmt::Let(b) => match b.ty {
                Type::Struct(fields) => {
                    assert_eq!(fields.len(), 2);
                    assert_eq!(fields[1].ty, Type::array(Type::Primitive(PrimitiveId::Char), 2));
                }
                other => panic!("expected struct type, got {other:?}"),
            },
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn test_enum_values_are_constants() {
        let root = parse_str("enum Color : u8 { Red, Green = 5, Blue, }; var c: array<u8, Color::Blue>;")
            .unwrap_or_else(|(err, _)| panic!("{err}"));
        match &root.body.stmts[0] {
            Stmt::Enum(e) => {
                assert_eq!(e.repr, Type::Primitive(PrimitiveId::U8));
                assert_eq!(e.variants.len(), 3);
            }
            other => panic!("expected enum, got {other:?}"),
        }
        match &root.body.stmts[1] {
            Stmt::Var(b) => assert_eq!(b.ty, Type::array(Type::Primitive(PrimitiveId::U8), 6)),
            other => panic!("expected var, got {other:?}"),
        }
    }

    #[test]
    fn test_enum_repr_must_be_integer() {
        let (err, _) = parse_str("enum E : f32 { A };").expect_err("fails");
        assert!(matches!(err, SyntaxError::BadType { .. }));
    }

    #[test]
    fn test_function_forms() {
        match single("fn add(a: i32, b: i32): i32 { let c: i32 = 1; return a + b; }") {
            Stmt::Function(f) => {
                assert_eq!(f.params.len(), 2);
                assert_eq!(f.ret, Type::Primitive(PrimitiveId::I32));
                let body = f.body.expect("body");
                assert!(matches!(body.stmts[1], Stmt::Return(_)));
            }
            other => panic!("expected fn, got {other:?}"),
        }
        match single("fn halt();") {
            Stmt::Function(f) => {
                assert_eq!(f.ret, Type::VOID);
                assert!(f.body.is_none());
            }
            other => panic!("expected fn, got {other:?}"),
        }
    }

    #[test]
    fn test_function_body_scope_is_local() {
        let (err, _) = parse_str("fn f() { struct Inner; } var x: Inner;").expect_err("fails");
        assert!(err.to_string().contains("Inner"), "{err}");
    }

    #[test]
    fn test_return_outside_function() {
        let (err, _) = parse_str("return 1;").expect_err("fails");
        assert!(matches!(err, SyntaxError::Unexpected { .. }));
    }

    #[test]
    fn test_subsystem_with_dependencies() {
        match single("subsystem net : io, core, io { let port: u16 = 80; };") {
            Stmt::Subsystem(s) => {
                assert_eq!(s.name, "net");
                assert_eq!(s.deps.iter().map(String::as_str).collect::<Vec<_>>(), ["core", "io"]);
                assert_eq!(s.body.stmts.len(), 1);
            }
            other => panic!("expected subsystem, got {other:?}"),
        }
    }

    #[test]
    fn test_export_wraps_one_declaration() {
        match single("pub const X: i32 = 1;") {
            Stmt::Export(e) => assert!(matches!(*e.decl, Stmt::Const(_))),
            other => panic!("expected export, got {other:?}"),
        }
        assert!(parse_str("pub pub let x: i32;").is_err());
    }

    #[test]
    fn test_void_is_not_a_value_type() {
        let (err, _) = parse_str("let x: void;").expect_err("fails");
        assert!(matches!(err, SyntaxError::BadType { .. }));
    }

    #[test]
    fn test_lexer_errors_abort_without_cascade() {
        let (err, diagnostics) = parse_str("let x: i32 = 5; $").expect_err("fails");
        assert_eq!(err, SyntaxError::Aborted);
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().code.as_deref(),
            Some("quix::lex::unexpected_character")
        );
    }

    #[test]
    fn test_parse_const_expr_leaves_terminator() {
        let mut lexer = Lexer::from_source("1 << 2 ]", "<expr>");
        let mut diagnostics = Diagnostics::new();
        let expr = parse_const_expr(
            &mut lexer,
            &mut diagnostics,
            &[Terminator::Punct(PunctuationId::RBracket)],
        )
        .expect("parses");
        assert_eq!(expr, Expr::binary(OperatorId::Shl, Expr::int(1), Expr::int(2)));
        assert!(lexer.next().is_punctuation(PunctuationId::RBracket));
    }

    fn initializer_reason(source: &str) -> String {
        match parse_str(source) {
            Err((SyntaxError::BadInitializer { reason, .. }, diagnostics)) => {
                assert_eq!(diagnostics.error_count(), 1);
                reason
            }
            other => panic!("expected a bad initializer, got {other:?}"),
        }
    }

    #[test]
    fn test_parentheses_nest_up_to_the_limit() {
        let source = format!("let x: i32 = {}1{};", "(".repeat(100), ")".repeat(100));
        match single(&source) {
            Stmt::Let(b) => assert_eq!(b.init, Some(Expr::int(1))),
            other => panic!("expected let, got {other:?}"),
        }
    }

    #[test]
    fn test_deep_parentheses_fail_without_overflow() {
        let source = format!("let x: i32 = {}1{};", "(".repeat(10_000), ")".repeat(10_000));
        assert!(initializer_reason(&source).contains("nesting deeper than"));
    }

    #[test]
    fn test_long_prefix_and_operator_chains_are_bounded() {
        let unary = format!("let x: i32 = {}1;", "- ".repeat(10_000));
        assert!(initializer_reason(&unary).contains("nesting deeper than"));

        let chain = format!("const n: u64 = 1{};", " + 1".repeat(10_000));
        assert!(initializer_reason(&chain).contains("nesting deeper than"));

        let short = format!("const n: u64 = 1{};", " + 1".repeat(50));
        assert!(matches!(single(&short), Stmt::Const(_)));
    }

    #[test]
    fn test_deep_array_types_fail_without_overflow() {
        let source = format!("let a: {}u8{};", "array<".repeat(10_000), ", 1>".repeat(10_000));
        let (err, diagnostics) = parse_str(&source).expect_err("too deep");
        assert_eq!(diagnostics.error_count(), 1);
        match err {
            SyntaxError::BadType { reason, .. } => assert!(reason.contains("nesting deeper than")),
            other => panic!("expected a bad type, got {other:?}"),
        }
    }

    #[test]
    fn test_deep_subsystems_fail_without_overflow() {
        let source = format!("{}{}", "subsystem s { ".repeat(10_000), "}; ".repeat(10_000));
        let (err, diagnostics) = parse_str(&source).expect_err("too deep");
        assert_eq!(err, SyntaxError::TooDeep(MAX_NESTING_DEPTH));
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().code.as_deref(),
            Some("quix::parse::too_deep")
        );
    }
}
