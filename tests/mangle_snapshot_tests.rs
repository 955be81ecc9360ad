//! Golden snapshots of mangled symbol tables
//!
//! A symbol's spelling is part of the compiler's stable output, so every
//! change to it should show up here for review.
//!
//! Review changes: `cargo insta review`

use quixcc::mangle::{self, demangle_symbol};
use quixcc::{CompileJob, JobConfig};

fn symbol_table(source: &str) -> String {
    let mut job = CompileJob::new(JobConfig::new());
    assert!(job.parse_source(source, "table.q"), "{}", job.render_diagnostics(quixcc::diagnostics::Severity::Debug));
    mangle::symbols(job.ast().expect("ast"))
        .iter()
        .map(|symbol| format!("{} {}", symbol.mangle(), symbol.name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_top_level_symbol_table() {
    let table = symbol_table(
        r#"
let x: i32;
var counter: u64 = 0;
const a::b_c: array<u8, 4>;
pub const LIMIT: f32 = 1.5;
struct Point { x: i32; y: i32; };
let origin: Point;
let pair: struct { lo: u16; hi: u16; };
let raw: union { i: u32; f: f32; };
let grid: array<array<bool, 2>, 3>;
fn skipped(): void;
"#,
    );
    insta::assert_snapshot!(table, @r"
    _ZJ0l1xi x
    _ZJ0v7counterm counter
    _ZJ0c7a_Nb__cA4_h a::b_c
    _ZJ0c5LIMITf LIMIT
    _ZJ0l6originN5Point origin
    _ZJ0l4pairS2_2lot2hit pair
    _ZJ0l3rawU2_1ij1ff raw
    _ZJ0l4gridA3_A2_b grid
    ");
}

#[test]
fn test_subsystem_symbol_table() {
    let table = symbol_table(
        r#"
subsystem net {
    let port: u16;
    subsystem tls { var key_len: u32; };
};
subsystem db : net {
    let port: u16;
};
"#,
    );
    insta::assert_snapshot!(table, @r"
    _ZJ0l9net_Nportt net::port
    _ZJ0v18net_Ntls_Nkey__lenj net::tls::key_len
    _ZJ0l8db_Nportt db::port
    ");
}

#[test]
fn test_demangled_forms() {
    let rendered = [
        "_ZJ0l1xi",
        "_ZJ0c7a_Nb__cA4_h",
        "_ZJ0l4pairS2_2lot2hit",
        "_ZJ0v1sr",
        "_ZJ0l4gridA3_A2_b",
    ]
    .iter()
    .map(|s| demangle_symbol(s).expect("valid symbol").to_string())
    .collect::<Vec<_>>()
    .join("\n");
    insta::assert_snapshot!(rendered, @r"
    let x: i32
    const a::b_c: array<u8, 4>
    let pair: struct { lo: u16; hi: u16; }
    var s: string
    let grid: array<array<bool, 2>, 3>
    ");
}

#[test]
fn test_malformed_symbol_message() {
    let err = demangle_symbol("_ZJ0l1xQ").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"'_ZJ0l1xQ' is not a quix symbol: unknown type code at offset 7");
}
