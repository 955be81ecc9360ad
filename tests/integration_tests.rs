//! Integration tests for the quixcc front end

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use quixcc::ast::{AstNode, Expr, Stmt};
use quixcc::diagnostics::Severity;
use quixcc::{Backend, CompileJob, JobConfig, JsonBackend};

fn fixtures(kind: &str) -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(kind);
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.extension().is_some_and(|e| e == "q"))
        .collect();
    files.sort();
    files
}

fn fixture_job() -> CompileJob {
    let include = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/include");
    CompileJob::new(JobConfig::new().with_include_dir(include))
}

fn codes(job: &CompileJob) -> Vec<String> {
    job.diagnostics().iter().filter_map(|d| d.code.clone()).collect()
}

/// Test that all valid fixtures compile successfully
#[test]
fn test_valid_fixtures() {
    let files = fixtures("valid");
    assert!(!files.is_empty());
    for path in files {
        let mut job = fixture_job();
        assert!(
            job.parse_file(&path),
            "Expected {} to compile successfully, got:\n{}",
            path.display(),
            job.render_diagnostics(Severity::Debug)
        );
        assert!(job.ast().is_some());
    }
}

/// Test that invalid fixtures produce errors and no tree
#[test]
fn test_invalid_fixtures() {
    let files = fixtures("invalid");
    assert!(!files.is_empty());
    for path in files {
        let mut job = fixture_job();
        assert!(!job.parse_file(&path), "Expected {} to fail", path.display());
        assert!(job.ast().is_none(), "{} produced a tree", path.display());
        assert!(job.diagnostics().error_count() >= 1);
    }
}

#[test]
fn test_let_declaration_parses_to_let_node() {
    let mut job = CompileJob::new(JobConfig::new());
    assert!(job.parse_source("let x: i32 = 5;", "main.q"));
    let root = job.ast().unwrap();
    let Stmt::Let(binding) = &root.body.stmts[0] else {
        panic!("expected a Let node, got {:?}", root.body.stmts[0]);
    };
    assert_eq!(binding.name, "x");
    assert_eq!(binding.ty.to_string(), "i32");
    assert_eq!(binding.init, Some(Expr::int(5)));
}

#[test]
fn test_missing_identifier_fails_without_node() {
    let mut job = CompileJob::new(JobConfig::new());
    assert!(!job.parse_source("let : i32;", "main.q"));
    assert!(job.ast().is_none());
    assert_eq!(codes(&job), ["quix::parse::missing_identifier"]);
}

#[test]
fn test_define_matches_const_declaration() {
    let mut defined = CompileJob::new(JobConfig::new());
    assert!(defined.parse_source("@define FLAG\n@define LIMIT 10\n@define NAME \"quix\"", "a.q"));

    let mut written = CompileJob::new(JobConfig::new());
    assert!(written.parse_source(
        "const FLAG: bool = true;\nconst LIMIT: i64 = 10;\nconst NAME: string = \"quix\";",
        "b.q"
    ));

    assert_eq!(defined.ast().unwrap().to_json(), written.ast().unwrap().to_json());
}

#[test]
fn test_circular_import_fails() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.q"), "import \"b.q\";\nlet a: i32;").unwrap();
    fs::write(dir.path().join("b.q"), "import \"a.q\";\nlet b: i32;").unwrap();

    let mut job = CompileJob::new(JobConfig::new());
    assert!(!job.parse_file(&dir.path().join("a.q")));
    assert!(job.ast().is_none());
    assert_eq!(codes(&job), ["quix::prep::circular_import"]);
}

#[test]
fn test_import_diagnostics_name_the_imported_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("lib.qh"), "let ok: i32;\nlet : bool;").unwrap();
    fs::write(dir.path().join("main.q"), "import lib;").unwrap();

    let mut job = CompileJob::new(JobConfig::new());
    assert!(!job.parse_file(&dir.path().join("main.q")));
    let rendered = job.render_diagnostics(Severity::Error);
    assert!(rendered.contains("lib.qh:2:"), "{rendered}");
}

#[test]
fn test_string_concat_folds() {
    let mut job = CompileJob::new(JobConfig::new().with_fold_constants(true));
    assert!(job.parse_source(r#"const s: string = "a" + "b" + "c";"#, "main.q"));
    let (_, binding) = job.ast().unwrap().body.stmts[0].as_binding().unwrap();
    assert_eq!(binding.init, Some(Expr::String("abc".into())));
}

#[test]
fn test_jobs_run_independently_on_threads() {
    let results: Vec<(bool, Option<String>)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                scope.spawn(move || {
                    let source = if i % 2 == 0 {
                        format!("@define N{i} {i}\nlet v{i}: array<u8, N{i} + 1>;")
                    } else {
                        format!("let v{i} i32;")
                    };
                    let mut job = CompileJob::new(JobConfig::new());
                    let ok = job.parse_source(&source, &format!("job{i}.q"));
                    let last = job.ast().and_then(|r| r.body.stmts.last()).and_then(|s| s.name().map(String::from));
                    (ok, last)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, (ok, last)) in results.into_iter().enumerate() {
        if i % 2 == 0 {
            assert!(ok, "job {i} failed");
            assert_eq!(last, Some(format!("v{i}")));
        } else {
            assert!(!ok, "job {i} should fail");
            assert_eq!(last, None);
        }
    }
}

#[test]
fn test_json_backend_emits_fixture() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/valid/bindings.q");
    let mut job = CompileJob::new(JobConfig::new());
    assert!(job.parse_file(&path));
    let root = job.ast().unwrap().clone();

    let mut backend = JsonBackend::new(Vec::new());
    assert_eq!(backend.name(), "json");
    assert!(backend.emit(&job, &root));

    let value: serde_json::Value = serde_json::from_slice(&backend.into_inner()).unwrap();
    assert_eq!(value["type"], "Root");
    assert_eq!(value["stmts"].as_array().map(Vec::len), Some(4));
}
