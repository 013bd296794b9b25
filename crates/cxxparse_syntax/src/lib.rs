//! Syntax frontend for C and C++: lexer, token cursor, backtracking parser, AST and sink interface.
//!
//! The parser reads one preprocessed translation unit and reports what it recognizes to an
//! [`AstSink`](sink::AstSink) as it goes. It never gives up on a file: a declaration that cannot be parsed is
//! recorded as a [`SyntaxError`](diagnostics::SyntaxError) and skipped.
//!
//! ## Notes
//! - This crate is syntax-only. Names and types are kept as source text; nothing is looked up or resolved.
//! - Vocabulary identity (keywords/operators/punctuation) comes from `cxxparse_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use cxxparse_syntax::config::ParserConfig;
//! use cxxparse_syntax::sink::SinkEvent;
//!
//! let mut events: Vec<SinkEvent> = Vec::new();
//! let outcome = cxxparse_syntax::parse("struct S { int a; };", ParserConfig::default(), &mut events);
//! assert!(outcome.passed);
//! assert!(matches!(events[0], SinkEvent::Enter(_)));
//! ```
//!
//! ## See also
//! - `cxxparse_core::lang` for the keyword, operator and punctuation tables.

pub mod ast;
pub mod builder;
pub mod config;
pub mod cursor;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod sink;
pub mod token_helpers;

pub use config::{Language, ParseMode, ParserConfig};
pub use parser::{ParseOutcome, parse, parse_source, parse_tokens};
