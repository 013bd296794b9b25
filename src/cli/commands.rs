//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::Path;

use cxxparse_core::lang::keywords;
use cxxparse_syntax::ast::Node;
use cxxparse_syntax::diagnostics::{LexError, SyntaxError};
use cxxparse_syntax::lexer::{self, TokenKind};
use cxxparse_syntax::{ParseOutcome, ParserConfig, parse, parse_source};
use serde::Serialize;

use super::{CliError, CliResult, ExitCode, LanguageArgs, OutputFormat};
use crate::diagnostics::render_problems;
use crate::outline::{EventLog, render_outline};

/// Maximum source file size (100 MB).
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read a source file with size validation.
///
/// Returns an error if:
/// - The file cannot be accessed or read
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(path: &Path) -> CliResult<String> {
    let display = path.display();
    let metadata = fs::metadata(path).map_err(|e| CliError::failure(format!("Cannot access file '{display}': {e}")))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{display}' is too large ({} bytes, max {MAX_SOURCE_SIZE} bytes)",
            metadata.len(),
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{display}': {e}")))
}

// ============================================================================
// lex
// ============================================================================

/// Print one line per token: `start..end kind image`.
pub fn lex_file(path: &Path, config: ParserConfig) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let (tokens, errors) = lexer::lex(&source, config.language);
    tracing::debug!(file = %path.display(), tokens = tokens.len(), errors = errors.len(), "lexed");

    for token in &tokens {
        println!(
            "{}..{} {} {}",
            token.span.start,
            token.span.end,
            token_kind_label(token.kind),
            token.image
        );
    }

    if errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        eprint!("{}", render_problems(&path.display().to_string(), &source, &errors, &[]));
        Ok(ExitCode::FAILURE)
    }
}

fn token_kind_label(kind: TokenKind) -> String {
    match kind {
        TokenKind::Keyword(id) => format!("keyword({:?})", keywords::category(id)),
        TokenKind::Operator(_) => "operator".to_string(),
        TokenKind::Punctuation(_) => "punctuation".to_string(),
        TokenKind::Ident => "identifier".to_string(),
        TokenKind::Integer => "integer".to_string(),
        TokenKind::Float => "float".to_string(),
        TokenKind::Char => "char".to_string(),
        TokenKind::String => "string".to_string(),
    }
}

// ============================================================================
// parse
// ============================================================================

/// A problem in JSON output.
#[derive(Debug, Serialize)]
pub struct ReportedProblem {
    pub message: String,
    pub start: usize,
    pub end: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl From<&SyntaxError> for ReportedProblem {
    fn from(error: &SyntaxError) -> Self {
        Self {
            message: error.message.clone(),
            start: error.span.start,
            end: error.span.end,
            notes: error.notes.clone(),
        }
    }
}

impl From<&LexError> for ReportedProblem {
    fn from(error: &LexError) -> Self {
        Self {
            message: error.message.clone(),
            start: error.span.start,
            end: error.span.end,
            notes: Vec::new(),
        }
    }
}

/// The JSON document printed by `parse --format json`.
#[derive(Debug, Serialize)]
pub struct ParseReport<'a> {
    pub file: String,
    pub passed: bool,
    pub first_error_offset: Option<usize>,
    pub errors: Vec<ReportedProblem>,
    pub lexer_errors: Vec<ReportedProblem>,
    pub nodes: &'a [Node],
}

impl<'a> ParseReport<'a> {
    pub fn new(file: String, outcome: &ParseOutcome, nodes: &'a [Node]) -> Self {
        Self {
            file,
            passed: outcome.passed,
            first_error_offset: outcome.first_error_offset,
            errors: outcome.errors.iter().map(ReportedProblem::from).collect(),
            lexer_errors: outcome.lexer_errors.iter().map(ReportedProblem::from).collect(),
            nodes,
        }
    }
}

/// Parse one file and print it in the requested format.
///
/// Diagnostics go to stderr (except in JSON, which carries them). A failed parse exits with 1 after printing
/// whatever was recognized.
pub fn parse_file(path: &Path, config: ParserConfig, format: OutputFormat) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let file = path.display().to_string();

    let outcome = match format {
        OutputFormat::Outline => {
            let (unit, outcome) = parse_source(&source, config);
            print!("{}", render_outline(&unit));
            report_problems(&file, &source, &outcome);
            outcome
        }
        OutputFormat::Events => {
            let mut log = EventLog::new();
            let outcome = parse(&source, config, &mut log);
            print!("{}", log.finish());
            report_problems(&file, &source, &outcome);
            outcome
        }
        OutputFormat::Json => {
            let (unit, outcome) = parse_source(&source, config);
            let report = ParseReport::new(file, &outcome, &unit.nodes);
            let json = serde_json::to_string_pretty(&report)
                .map_err(|e| CliError::failure(format!("Error serializing parse result: {e}")))?;
            println!("{json}");
            outcome
        }
    };

    tracing::debug!(passed = outcome.passed, errors = outcome.errors.len(), "parsed");
    Ok(if outcome.passed { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn report_problems(file: &str, source: &str, outcome: &ParseOutcome) {
    if outcome.errors.is_empty() && outcome.lexer_errors.is_empty() {
        return;
    }
    eprint!("{}", render_problems(file, source, &outcome.lexer_errors, &outcome.errors));
}

// ============================================================================
// check
// ============================================================================

/// One line of `check` output.
pub fn check_summary(file: &str, outcome: &ParseOutcome) -> String {
    if outcome.passed {
        return format!("{file}: ok");
    }
    let count = outcome.errors.len();
    let noun = if count == 1 { "error" } else { "errors" };
    match outcome.first_error_offset {
        Some(offset) => format!("{file}: failed at offset {offset} ({count} {noun})"),
        None => format!("{file}: failed ({count} {noun})"),
    }
}

/// Parse every file and report which ones fail. Files that cannot be read count as failures.
pub fn check_files(paths: &[impl AsRef<Path>], language: &LanguageArgs) -> CliResult<ExitCode> {
    let mut failed = 0usize;

    for path in paths {
        let path = path.as_ref();
        let file = path.display().to_string();
        let source = match read_source(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{}", e.message);
                println!("{file}: unreadable");
                failed += 1;
                continue;
            }
        };

        let config = language.config_for(path);
        let (_, outcome) = parse_source(&source, config);
        tracing::info!(file = %file, passed = outcome.passed, "checked");

        println!("{}", check_summary(&file, &outcome));
        if !outcome.passed {
            failed += 1;
        }
        report_problems(&file, &source, &outcome);
    }

    println!("{} of {} files parsed", paths.len() - failed, paths.len());
    Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source(Path::new("/definitely/not/here.cpp")).unwrap_err();
        assert!(err.message.contains("Cannot access file"), "{}", err.message);
        assert_eq!(err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_read_source_reads_text() {
        let path = std::env::temp_dir().join(format!("cxxparse_read_{}.cpp", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"int x;").unwrap();
        drop(file);
        assert_eq!(read_source(&path).unwrap(), "int x;");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_check_summary_lines() {
        let (_, ok) = parse_source("int x;", ParserConfig::default());
        assert_eq!(check_summary("a.cpp", &ok), "a.cpp: ok");

        let (_, bad) = parse_source("int x = ;", ParserConfig::default());
        assert_eq!(check_summary("b.cpp", &bad), "b.cpp: failed at offset 8 (1 error)");
    }

    #[test]
    fn test_json_report_carries_outcome_and_nodes() {
        let (unit, outcome) = parse_source("namespace n { int x; }", ParserConfig::default());
        let report = ParseReport::new("n.cpp".to_string(), &outcome, &unit.nodes);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["passed"], serde_json::Value::Bool(true));
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(1));
        assert!(value["errors"].as_array().is_some_and(Vec::is_empty));
    }

    #[test]
    fn test_token_kind_labels() {
        let (tokens, _) = lexer::lex("static x 1", cxxparse_syntax::Language::Cpp);
        let labels: Vec<String> = tokens.iter().map(|t| token_kind_label(t.kind)).collect();
        assert_eq!(labels, vec!["keyword(StorageClass)", "identifier", "integer"]);
    }
}
