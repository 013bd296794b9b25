//! Integration tests for the cxxparse frontend
//!
//! Every file under `tests/fixtures/valid` must parse cleanly; every file under `tests/fixtures/invalid` must fail
//! but still recover the declarations after the broken one.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser as _;
use cxxparse::cli::{Cli, ExitCode, execute};
use cxxparse::{Language, ParseOutcome, ParserConfig, ast::TranslationUnit};

/// Parse one fixture, selecting C for `.c` files.
fn parse_fixture(path: &Path) -> (TranslationUnit, ParseOutcome) {
    let source = fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    let language = if path.extension().is_some_and(|e| e == "c") {
        Language::C
    } else {
        Language::Cpp
    };
    cxxparse::parser::parse_source(&source, ParserConfig::new().with_language(language))
}

fn fixtures(dir: &str) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("Failed to list {dir}: {e}"))
        .map(|entry| entry.unwrap().path())
        .filter(|p| p.extension().is_some_and(|e| e == "c" || e == "cpp"))
        .collect();
    paths.sort();
    paths
}

/// Test that all valid fixtures parse successfully
#[test]
fn test_valid_fixtures() {
    let paths = fixtures("tests/fixtures/valid");
    assert!(!paths.is_empty());
    for path in paths {
        let (unit, outcome) = parse_fixture(&path);
        assert!(
            outcome.passed,
            "Expected {} to parse successfully, got errors: {:?}",
            path.display(),
            outcome.errors
        );
        assert!(outcome.first_error_offset.is_none());
        assert!(!unit.nodes.is_empty(), "{} produced no declarations", path.display());
    }
}

/// Test that invalid fixtures produce errors and still recover
#[test]
fn test_invalid_fixtures() {
    for path in fixtures("tests/fixtures/invalid") {
        let (unit, outcome) = parse_fixture(&path);
        assert!(!outcome.passed, "Expected {} to fail", path.display());
        assert!(!outcome.errors.is_empty());
        assert_eq!(unit.nodes.len(), 1, "{} should recover exactly one declaration", path.display());
    }
}

#[test]
fn test_first_error_offsets() {
    let (_, outcome) = parse_fixture(Path::new("tests/fixtures/invalid/missing_initializer.cpp"));
    assert_eq!(outcome.first_error_offset, Some(8));

    let (_, outcome) = parse_fixture(Path::new("tests/fixtures/invalid/stray_brace.cpp"));
    assert_eq!(outcome.first_error_offset, Some(0));
}

#[test]
fn test_check_command_exit_codes() {
    let cli = Cli::try_parse_from(["cxxparse", "check", "tests/fixtures/valid/kr_style.c"]).unwrap();
    assert_eq!(execute(cli).unwrap(), ExitCode::SUCCESS);

    let cli = Cli::try_parse_from([
        "cxxparse",
        "check",
        "tests/fixtures/valid/declarations.cpp",
        "tests/fixtures/invalid/stray_brace.cpp",
    ])
    .unwrap();
    assert_eq!(execute(cli).unwrap(), ExitCode::FAILURE);
}

#[test]
fn test_missing_file_is_reported_not_panicked() {
    let cli = Cli::try_parse_from(["cxxparse", "parse", "tests/fixtures/does_not_exist.cpp"]).unwrap();
    let err = execute(cli).unwrap_err();
    assert!(err.message.contains("does_not_exist.cpp"));
}
