//! Provide the canonical C/C++ vocabulary shared by the `cxxparse` lexer, parser and tooling.
//!
//! This crate is intentionally small and dependency-free. It holds pure lookup tables: stable ids for every
//! keyword, operator and punctuation token the grammar distinguishes, plus the metadata tooling needs (dialect
//! availability, precedence, overloadability).
//!
//! ## Notes
//!
//! - **No IO**, no global state, no AST types. Syntax rules are enforced by `cxxparse_syntax`.

pub mod lang;
