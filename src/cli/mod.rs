//! CLI module for the cxxparse frontend
//!
//! This module provides the command-line interface around the parser.
//!
//! ## Commands
//!
//! - `lex <file>` - Print the token stream
//! - `parse <file>` - Parse one file and print an outline, JSON or the raw sink events
//! - `check <files...>` - Parse files and report pass/fail with diagnostics
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cxxparse_syntax::{Language, ParseMode, ParserConfig};
use thiserror::Error;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// A backtracking C/C++ declaration parser
#[derive(Parser, Debug)]
#[command(name = "cxxparse")]
#[command(version = VERSION)]
#[command(about = "Parse C and C++ translation units", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command that parses.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct LanguageArgs {
    /// Parse as C (the default is C++, or C for `.c` files)
    #[arg(long = "c", conflicts_with = "cpp")]
    pub c: bool,

    /// Parse as C++ even for `.c` files
    #[arg(long = "cpp")]
    pub cpp: bool,

    /// Skip function bodies instead of parsing their statements
    #[arg(long)]
    pub quick: bool,
}

impl LanguageArgs {
    /// Build the parser configuration for one file.
    ///
    /// Explicit flags win; otherwise a `.c` extension selects C.
    pub fn config_for(&self, path: &Path) -> ParserConfig {
        let language = if self.c {
            Language::C
        } else if self.cpp {
            Language::Cpp
        } else if path.extension().is_some_and(|ext| ext == "c") {
            Language::C
        } else {
            Language::Cpp
        };
        let mode = if self.quick { ParseMode::Quick } else { ParseMode::Complete };
        ParserConfig::new().with_language(language).with_mode(mode)
    }
}

/// Output format of the `parse` command.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented outline of the declaration tree
    #[default]
    Outline,
    /// The tree and the outcome as JSON
    Json,
    /// Raw sink notifications with byte spans
    Events,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream of a file
    Lex {
        /// Source file to tokenize
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        language: LanguageArgs,
    },

    /// Parse a file and print what was recognized
    Parse {
        /// Source file to parse
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Outline)]
        format: OutputFormat,
        #[command(flatten)]
        language: LanguageArgs,
    },

    /// Parse files and report which ones fail
    Check {
        /// Source files to check
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        language: LanguageArgs,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Lex { file, language } => commands::lex_file(&file, language.config_for(&file)),
        Command::Parse { file, format, language } => {
            commands::parse_file(&file, language.config_for(&file), format)
        }
        Command::Check { files, language } => commands::check_files(&files, &language),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_lex() {
        let cli = Cli::try_parse_from(["cxxparse", "lex", "a.cpp"]).unwrap();
        if let Command::Lex { file, .. } = cli.command {
            assert_eq!(file, PathBuf::from("a.cpp"));
        } else {
            panic!("Expected Lex command");
        }
    }

    #[test]
    fn test_cli_parse_format_and_flags() {
        let cli = Cli::try_parse_from(["cxxparse", "parse", "a.cpp", "--format", "json", "--quick"]).unwrap();
        if let Command::Parse { format, language, .. } = cli.command {
            assert_eq!(format, OutputFormat::Json);
            assert!(language.quick);
            assert!(!language.c);
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_cli_parse_defaults_to_outline() {
        let cli = Cli::try_parse_from(["cxxparse", "parse", "a.cpp"]).unwrap();
        if let Command::Parse { format, .. } = cli.command {
            assert_eq!(format, OutputFormat::Outline);
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_cli_check_requires_files() {
        assert!(Cli::try_parse_from(["cxxparse", "check"]).is_err());
        let cli = Cli::try_parse_from(["cxxparse", "check", "a.c", "b.cpp", "--c"]).unwrap();
        if let Command::Check { files, language } = cli.command {
            assert_eq!(files.len(), 2);
            assert!(language.c);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_error_displays_its_message() {
        let err: Box<dyn std::error::Error> = Box::new(CliError::failure("Cannot access file 'a.cpp'"));
        assert_eq!(err.to_string(), "Cannot access file 'a.cpp'");
    }

    #[test]
    fn test_language_flags_conflict() {
        assert!(Cli::try_parse_from(["cxxparse", "lex", "a.c", "--c", "--cpp"]).is_err());
    }

    #[test]
    fn test_config_from_extension_and_flags() {
        let defaults = LanguageArgs::default();
        assert_eq!(defaults.config_for(Path::new("x.c")).language, Language::C);
        assert_eq!(defaults.config_for(Path::new("x.cc")).language, Language::Cpp);
        assert_eq!(defaults.config_for(Path::new("x.cc")).mode, ParseMode::Complete);

        let forced = LanguageArgs {
            cpp: true,
            quick: true,
            ..LanguageArgs::default()
        };
        let config = forced.config_for(Path::new("x.c"));
        assert_eq!(config.language, Language::Cpp);
        assert_eq!(config.mode, ParseMode::Quick);
    }
}
