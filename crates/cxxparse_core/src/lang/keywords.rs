//! Define the reserved keyword vocabulary for C and C++.
//!
//! This module is the single source of truth for reserved words: a stable identifier ([`KeywordId`]) plus a const
//! metadata table ([`KEYWORDS`]) that records canonical spellings, categories, dialect availability and provenance.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive** and dialect-agnostic; use [`from_str_in`] when lexing, so that
//!   C++-only words such as `class` stay identifiers in C sources.
//! - [`KEYWORDS`] is ordered by [`KeywordId`]; [`info_for`] relies on that.
//!
//! ## Examples
//! ```rust
//! use cxxparse_core::lang::keywords::{self, KeywordId};
//! use cxxparse_core::lang::registry::Dialect;
//!
//! assert_eq!(keywords::from_str("typename"), Some(KeywordId::Typename));
//! assert_eq!(keywords::from_str_in("class", Dialect::C), None);
//! assert_eq!(keywords::as_str(KeywordId::WcharT), "wchar_t");
//! ```

use super::registry::{Availability, Dialect, Example, Stability, Standard};

/// Stable identifier for every reserved keyword.
///
/// ## Notes
/// - Variants are declared in spelling order; the discriminant indexes [`KEYWORDS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeywordId {
    Asm,
    Auto,
    Bool,
    Break,
    Case,
    Catch,
    Char,
    Class,
    Const,
    ConstCast,
    Continue,
    Default,
    Delete,
    Do,
    Double,
    DynamicCast,
    Else,
    Enum,
    Explicit,
    Export,
    Extern,
    False,
    Float,
    For,
    Friend,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Mutable,
    Namespace,
    New,
    Operator,
    Private,
    Protected,
    Public,
    Register,
    ReinterpretCast,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    StaticCast,
    Struct,
    Switch,
    Template,
    This,
    Throw,
    True,
    Try,
    Typedef,
    Typeid,
    Typename,
    Union,
    Unsigned,
    Using,
    Virtual,
    Void,
    Volatile,
    WcharT,
    While,
}

/// High-level grouping for documentation and tooling.
///
/// ## Notes
/// - Categories are metadata only; the parser decides what a keyword means in context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// `auto`, `static`, `typedef`, `friend`, ...
    StorageClass,
    /// Builtin type words: `int`, `unsigned`, `wchar_t`, ...
    TypeSpecifier,
    /// `const`, `volatile`.
    Qualifier,
    /// `inline`, `virtual`, `explicit`.
    FunctionSpecifier,
    /// Words that introduce declarations: `class`, `namespace`, `template`, ...
    Declaration,
    /// `public`, `protected`, `private`.
    Access,
    ControlFlow,
    /// Words that only occur inside expressions: `sizeof`, `new`, the named casts, ...
    Expression,
    /// `true`, `false`.
    Literal,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
    pub availability: Availability,
    pub standard: Standard,
    pub stability: Stability,
    pub examples: &'static [Example],
}

/// Registry of all keywords, ordered by [`KeywordId`].
pub const KEYWORDS: &[KeywordInfo] = &[
    info(KeywordId::Asm, "asm", KeywordCategory::Declaration, Availability::Both, Standard::C89),
    info(KeywordId::Auto, "auto", KeywordCategory::StorageClass, Availability::Both, Standard::C89),
    info(KeywordId::Bool, "bool", KeywordCategory::TypeSpecifier, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Break, "break", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::Case, "case", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::Catch, "catch", KeywordCategory::ControlFlow, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Char, "char", KeywordCategory::TypeSpecifier, Availability::Both, Standard::C89),
    info(KeywordId::Class, "class", KeywordCategory::Declaration, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Const, "const", KeywordCategory::Qualifier, Availability::Both, Standard::C89),
    info(KeywordId::ConstCast, "const_cast", KeywordCategory::Expression, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Continue, "continue", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::Default, "default", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::Delete, "delete", KeywordCategory::Expression, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Do, "do", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::Double, "double", KeywordCategory::TypeSpecifier, Availability::Both, Standard::C89),
    info(KeywordId::DynamicCast, "dynamic_cast", KeywordCategory::Expression, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Else, "else", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::Enum, "enum", KeywordCategory::Declaration, Availability::Both, Standard::C89),
    info(KeywordId::Explicit, "explicit", KeywordCategory::FunctionSpecifier, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Export, "export", KeywordCategory::Declaration, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Extern, "extern", KeywordCategory::StorageClass, Availability::Both, Standard::C89),
    info(KeywordId::False, "false", KeywordCategory::Literal, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Float, "float", KeywordCategory::TypeSpecifier, Availability::Both, Standard::C89),
    info(KeywordId::For, "for", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::Friend, "friend", KeywordCategory::StorageClass, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Goto, "goto", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::If, "if", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::Inline, "inline", KeywordCategory::FunctionSpecifier, Availability::Both, Standard::C99),
    info(KeywordId::Int, "int", KeywordCategory::TypeSpecifier, Availability::Both, Standard::C89),
    info(KeywordId::Long, "long", KeywordCategory::TypeSpecifier, Availability::Both, Standard::C89),
    info(KeywordId::Mutable, "mutable", KeywordCategory::StorageClass, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Namespace, "namespace", KeywordCategory::Declaration, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::New, "new", KeywordCategory::Expression, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Operator, "operator", KeywordCategory::Declaration, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Private, "private", KeywordCategory::Access, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Protected, "protected", KeywordCategory::Access, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Public, "public", KeywordCategory::Access, Availability::CppOnly, Standard::Cpp98),
    deprecated(KeywordId::Register, "register", KeywordCategory::StorageClass, Availability::Both, Standard::C89),
    info(KeywordId::ReinterpretCast, "reinterpret_cast", KeywordCategory::Expression, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Return, "return", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::Short, "short", KeywordCategory::TypeSpecifier, Availability::Both, Standard::C89),
    info(KeywordId::Signed, "signed", KeywordCategory::TypeSpecifier, Availability::Both, Standard::C89),
    info(KeywordId::Sizeof, "sizeof", KeywordCategory::Expression, Availability::Both, Standard::C89),
    info(KeywordId::Static, "static", KeywordCategory::StorageClass, Availability::Both, Standard::C89),
    info(KeywordId::StaticCast, "static_cast", KeywordCategory::Expression, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Struct, "struct", KeywordCategory::Declaration, Availability::Both, Standard::C89),
    info(KeywordId::Switch, "switch", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
    info(KeywordId::Template, "template", KeywordCategory::Declaration, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::This, "this", KeywordCategory::Expression, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Throw, "throw", KeywordCategory::Expression, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::True, "true", KeywordCategory::Literal, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Try, "try", KeywordCategory::ControlFlow, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Typedef, "typedef", KeywordCategory::StorageClass, Availability::Both, Standard::C89),
    info(KeywordId::Typeid, "typeid", KeywordCategory::Expression, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Typename, "typename", KeywordCategory::Declaration, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Union, "union", KeywordCategory::Declaration, Availability::Both, Standard::C89),
    info(KeywordId::Unsigned, "unsigned", KeywordCategory::TypeSpecifier, Availability::Both, Standard::C89),
    info(KeywordId::Using, "using", KeywordCategory::Declaration, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Virtual, "virtual", KeywordCategory::FunctionSpecifier, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::Void, "void", KeywordCategory::TypeSpecifier, Availability::Both, Standard::C89),
    info(KeywordId::Volatile, "volatile", KeywordCategory::Qualifier, Availability::Both, Standard::C89),
    info(KeywordId::WcharT, "wchar_t", KeywordCategory::TypeSpecifier, Availability::CppOnly, Standard::Cpp98),
    info(KeywordId::While, "while", KeywordCategory::ControlFlow, Availability::Both, Standard::C89),
];

/// Canonical spelling.
///
/// ## Parameters
/// - `id`: Keyword identifier.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Category.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return `true` if the keyword is reserved only in C++.
pub fn is_cpp_only(id: KeywordId) -> bool {
    info_for(id).availability == Availability::CppOnly
}

/// Full metadata.
///
/// ## Returns
/// - The associated [`KeywordInfo`] from [`KEYWORDS`].
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    &KEYWORDS[id as usize]
}

/// Lookup by spelling, ignoring dialect availability.
///
/// ## Returns
/// - `Some(KeywordId)` if the spelling is a C or C++ keyword.
/// - `None` otherwise.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS
        .binary_search_by(|k| k.canonical.cmp(s))
        .ok()
        .map(|idx| KEYWORDS[idx].id)
}

/// Lookup by spelling, honoring the availability of the keyword in `dialect`.
///
/// ## Examples
/// ```rust
/// use cxxparse_core::lang::keywords::{self, KeywordId};
/// use cxxparse_core::lang::registry::Dialect;
///
/// assert_eq!(keywords::from_str_in("struct", Dialect::C), Some(KeywordId::Struct));
/// assert_eq!(keywords::from_str_in("template", Dialect::C), None);
/// ```
pub fn from_str_in(s: &str, dialect: Dialect) -> Option<KeywordId> {
    from_str(s).filter(|id| info_for(*id).availability.available_in(dialect))
}

// --- helpers -----------------------------------------------------------------

const fn info(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    availability: Availability,
    standard: Standard,
) -> KeywordInfo {
    KeywordInfo {
        id,
        canonical,
        category,
        availability,
        standard,
        stability: Stability::Stable,
        examples: &[],
    }
}

const fn deprecated(
    id: KeywordId,
    canonical: &'static str,
    category: KeywordCategory,
    availability: Availability,
    standard: Standard,
) -> KeywordInfo {
    let mut info = info(id, canonical, category, availability, standard);
    info.stability = Stability::Deprecated;
    info
}
