//! Shareable metadata for `cxxparse_core::lang` registries.
//!
//! The registries are **registry-first** vocabularies: keywords, operators and punctuation. This submodule provides
//! the small, dependency-free metadata types reused across all of them.
//!
//! ## Notes
//! - These types are `Copy` so registries can live in `const` tables.
//! - Metadata is meant for tooling and diagnostics; enforcement of syntax rules still lives in the lexer/parser.

/// Source dialect a parse runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    C,
    Cpp,
}

/// Which dialects reserve a vocabulary item.
///
/// ## Notes
/// - The lexer consults availability to decide whether a spelling is a keyword or a plain identifier.
///
/// ## Examples
/// ```rust
/// use cxxparse_core::lang::registry::{Availability, Dialect};
///
/// assert!(Availability::Both.available_in(Dialect::C));
/// assert!(!Availability::CppOnly.available_in(Dialect::C));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Both,
    CppOnly,
}

impl Availability {
    /// Return `true` if an item with this availability is reserved when parsing `dialect`.
    pub fn available_in(self, dialect: Dialect) -> bool {
        match self {
            Availability::Both => true,
            Availability::CppOnly => dialect == Dialect::Cpp,
        }
    }
}

/// The standard revision that introduced a vocabulary item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Standard {
    C89,
    C99,
    Cpp98,
}

/// Describe the lifecycle status of a vocabulary item.
///
/// ## Notes
/// - Intended for tooling (e.g. flagging `register` as obsolete), not for feature-gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Deprecated,
}

/// A small example snippet for documentation.
///
/// ## Examples
/// ```rust
/// use cxxparse_core::lang::registry::Example;
///
/// let ex = Example {
///     code: "namespace n { int x; }",
///     note: Some("Named namespace definition."),
/// };
/// assert!(ex.code.contains("namespace"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}
