//! C/C++ vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved keywords, operators and punctuation.
//!
//! Callers work with **stable IDs** (e.g. `KeywordId`, `OperatorId`) and look up spellings and metadata via the
//! registry tables instead of comparing strings.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - Every table is ordered by id, so `info_for` is an index rather than a search.
//!
//! ## Examples
//! ```rust
//! use cxxparse_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("namespace"), Some(KeywordId::Namespace));
//! assert_eq!(keywords::as_str(KeywordId::Namespace), "namespace");
//! ```

pub mod keywords;
pub mod operators;
pub mod punctuation;
pub mod registry;
