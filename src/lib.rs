#![forbid(unsafe_code)]
//! cxxparse: a backtracking recursive-descent parser for C and C++.
//!
//! The parsing itself lives in `cxxparse_syntax`; this crate is the tooling around it: the `cxxparse` command-line
//! interface, diagnostic rendering and the human-readable outline of a parsed translation unit.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod diagnostics;
pub mod outline;

pub use cxxparse_syntax::{ast, config, lexer, parser, printer, sink};
pub use cxxparse_syntax::{Language, ParseMode, ParseOutcome, ParserConfig};

pub use outline::{render_events, render_outline};
