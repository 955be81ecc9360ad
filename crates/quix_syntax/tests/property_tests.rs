//! Property-based tests for the lexer and parser.

use proptest::prelude::*;
use quix_syntax::diagnostics::Diagnostics;
use quix_syntax::lexer::{self, Lexer, TokenKind};
use quix_syntax::parser;
use quix_syntax::scanner::Scanner;

fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("Not a keyword", |s| lexer::keyword_id(s).is_none() && s != "array")
}

proptest! {
    /// Arbitrary input never panics and always ends in a stable `EndOfFile`.
    #[test]
    fn lexing_terminates(source in "\\PC{0,64}") {
        let mut lexer = Lexer::from_source(&source, "fuzz.q");
        let mut steps = 0usize;
        while !lexer.next().is_eof() {
            steps += 1;
            prop_assert!(steps <= source.len() + 1);
        }
        prop_assert!(lexer.next().is_eof());
        prop_assert!(lexer.peek().is_eof());
    }

    /// `peek` never changes what `next` returns.
    #[test]
    fn peek_is_idempotent(source in "[a-z0-9 +*;:=(){}]{0,32}") {
        let mut plain = Lexer::from_source(&source, "a.q");
        let mut peeked = Lexer::from_source(&source, "b.q");
        loop {
            let first = peeked.peek();
            prop_assert_eq!(&first, &peeked.peek());
            let token = peeked.next();
            prop_assert_eq!(&first, &token);
            prop_assert_eq!(&plain.next(), &token);
            if token.is_eof() {
                break;
            }
        }
    }

    /// Integers in any radix normalise to their decimal value.
    #[test]
    fn integers_normalise_to_decimal(value in any::<u64>()) {
        for source in [format!("{value}"), format!("0x{value:x}"), format!("0b{value:b}"), format!("0o{value:o}")] {
            let tokens = lexer::lex(&source).expect("lexes");
            prop_assert_eq!(tokens[0].kind, TokenKind::IntegerLiteral);
            prop_assert_eq!(tokens[0].spelling(), value.to_string());
        }
    }

    /// Generated declarations parse to one node with the declared name.
    #[test]
    fn generated_declarations_parse(name in ident_strategy(), value in 0u32..1000) {
        let source = format!("let {name}: u32 = {value};");
        let mut diagnostics = Diagnostics::new();
        let root = parser::parse_source(&source, &mut diagnostics).expect("parses");
        prop_assert_eq!(root.body.stmts.len(), 1);
        prop_assert_eq!(root.body.stmts[0].name(), Some(name.as_str()));
    }
}
