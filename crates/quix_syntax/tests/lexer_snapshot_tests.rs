//! Snapshot tests for token dumps and AST JSON.
//!
//! Review changes: `cargo insta review`

use quix_syntax::ast::AstNode;
use quix_syntax::diagnostics::Diagnostics;
use quix_syntax::lexer::{self, Lexer, LexerConfig, Token};
use quix_syntax::parser;
use quix_syntax::scanner::Scanner;

fn dump(tokens: &[Token]) -> String {
    tokens.iter().map(Token::to_string).collect::<Vec<_>>().join("\n")
}

#[test]
fn test_declaration_tokens() {
    let tokens = lexer::lex("let x: i32 = 0x1F;\nvar name::sp: string = \"s\";").expect("lexes");
    insta::assert_snapshot!(dump(&tokens), @r#"
    Keyword(let)
    Identifier(x)
    Punctor(:)
    Identifier(i32)
    Operator(=)
    Number(31)
    Punctor(;)
    Keyword(var)
    Identifier(name::sp)
    Punctor(:)
    Identifier(string)
    Operator(=)
    String("s")
    Punctor(;)
    Eof
    "#);
}

#[test]
fn test_literal_and_macro_tokens() {
    let source = "@define A 1\n@( print hi )\n'c' 1.5 0b1010_1010 2.5e3 ~> trailing\n";
    let tokens = lexer::lex(source).expect("lexes");
    insta::assert_snapshot!(dump(&tokens), @r"
    MacroSingleLine(define A 1)
    MacroBlock(print hi)
    Char('c')
    Float(1.5)
    Number(170)
    Float(2.5e3)
    Eof
    ");
}

#[test]
fn test_operators_longest_match() {
    let tokens = lexer::lex("a <<= b >> c ^^ d != e").expect("lexes");
    insta::assert_snapshot!(dump(&tokens), @r"
    Identifier(a)
    Operator(<<=)
    Identifier(b)
    Operator(>>)
    Identifier(c)
    Operator(^^)
    Identifier(d)
    Operator(!=)
    Identifier(e)
    Eof
    ");
}

#[test]
fn test_kept_comments() {
    let mut lexer = Lexer::with_config(LexerConfig::new().with_keep_comments(true));
    let source = "// one\nlet /* two */ # three\n";
    assert!(lexer.set_source(Box::new(source.as_bytes()), "comments.q"));
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            break;
        }
    }
    insta::assert_snapshot!(dump(&tokens), @r"
    Comment(one)
    Keyword(let)
    Comment(two)
    Comment(three)
    Eof
    ");
}

#[test]
fn test_let_ast_json() {
    let mut diagnostics = Diagnostics::new();
    let root = parser::parse_source("let x: array<u8, 2 * 2> = 5;", &mut diagnostics).expect("parses");
    let json = serde_json::to_string_pretty(&root.to_json()).expect("serialises");
    insta::assert_snapshot!(json, @r#"
    {
      "stmts": [
        {
          "init": {
            "type": "IntegerLiteral",
            "value": 5,
            "width": 8
          },
          "name": "x",
          "ty": {
            "len": 4,
            "of": {
              "type": "u8"
            },
            "type": "Array"
          },
          "type": "Let"
        }
      ],
      "type": "Root"
    }
    "#);
}

#[test]
fn test_invalid_utf8_becomes_unknown_and_lexing_continues() {
    let source: &[u8] = b"let a: i32;\nlet b: \xff i32;\nlet c: i32;\n";
    let mut lexer = Lexer::new();
    assert!(lexer.set_source(Box::new(std::io::Cursor::new(source.to_vec())), "bad.q"));

    let mut tokens = Vec::new();
    loop {
        let token = lexer.next();
        if token.is_eof() {
            break;
        }
        tokens.push(token);
    }
    insta::assert_snapshot!(dump(&tokens), @r"
    Keyword(let)
    Identifier(a)
    Punctor(:)
    Identifier(i32)
    Punctor(;)
    Keyword(let)
    Identifier(b)
    Punctor(:)
    Unknown
    Identifier(i32)
    Punctor(;)
    Keyword(let)
    Identifier(c)
    Punctor(:)
    Identifier(i32)
    Punctor(;)
    ");

    let unknown = &tokens[8];
    assert_eq!((unknown.loc.line, unknown.loc.column), (2, 8));
    let diagnostics = lexer.take_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code.as_deref(), Some("quix::lex::invalid_utf8"));
}
