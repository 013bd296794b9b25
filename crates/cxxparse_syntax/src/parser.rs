//! Backtracking recursive-descent parser for C and C++.
//!
//! Pulls tokens through a [`TokenCursor`], resolves the grammar's ambiguities with bounded lookahead and speculative
//! attempts that roll back on failure, and reports finished constructs to an [`AstSink`]. Malformed declarations are
//! recorded and skipped, so a parse always runs to the end of input.
//!
//! ## Examples
//!
//! ```rust
//! use cxxparse_syntax::config::ParserConfig;
//! use cxxparse_syntax::parser;
//!
//! let (unit, outcome) = parser::parse_source("namespace n { int x = 1; }", ParserConfig::default());
//! assert!(outcome.passed);
//! assert_eq!(unit.nodes.len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::ast::*;
use crate::builder::DeclarationBuilder;
use crate::config::{ParseMode, ParserConfig};
use crate::cursor::{Mark, TokenCursor, TokenSource, VecSource};
use crate::diagnostics::{LexError, ParseError, ParseResult, SyntaxError};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::sink::{AstSink, EventJournal, SinkEvent, TreeBuilder};
use cxxparse_core::lang::keywords::KeywordId;
use cxxparse_core::lang::operators::OperatorId;
use cxxparse_core::lang::punctuation::PunctuationId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/recovery.rs");
include!("parser/decl.rs");
include!("parser/specifiers.rs");
include!("parser/declarator.rs");
include!("parser/names.rs");
include!("parser/stmts.rs");
include!("parser/expr.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
