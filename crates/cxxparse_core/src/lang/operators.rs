//! Operator vocabulary.
//!
//! This module defines the canonical C++ operator token set along with the metadata the expression parser and
//! tooling share: binary precedence, whether the token also has a prefix form, and whether it is an assignment.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Word operators (`new`, `delete`, `sizeof`) are keywords and live in [`crate::lang::keywords`].
//! - `,` is punctuation ([`crate::lang::punctuation`]) even though it is also the comma operator.
//! - Every operator token may appear after the `operator` keyword, so the table doubles as the set of overloadable
//!   operator spellings.
//!
//! ## Examples
//! ```rust
//! use cxxparse_core::lang::operators::{self, OperatorId};
//!
//! assert_eq!(operators::from_str("->*"), Some(OperatorId::ArrowStar));
//! assert!(operators::info_for(OperatorId::Star).precedence > operators::info_for(OperatorId::Plus).precedence);
//! ```

use super::registry::{Example, Stability, Standard};

/// Stable identifier for every operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,

    // Bitwise / logical
    Tilde,
    Not,

    // Assignment
    Assign,

    // Comparison
    Lt,
    Gt,

    // Compound assignment
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    CaretAssign,
    AmpAssign,
    PipeAssign,

    // Shifts
    Shl,
    Shr,
    ShlAssign,
    ShrAssign,

    // Comparison
    EqEq,
    NotEq,
    LtEq,
    GtEq,

    // Logical
    AndAnd,
    OrOr,

    // Increment / decrement
    PlusPlus,
    MinusMinus,

    // Member access
    Arrow,
    ArrowStar,
    DotStar,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `precedence` is the binary precedence where higher binds tighter; `None` for tokens with no binary form.
///   The scale runs from assignment (2) up to pointer-to-member (14).
/// - `prefix` marks tokens that also act as unary prefix operators (`*p`, `-x`, `&x`, `++i`).
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spelling: &'static str,
    pub precedence: Option<u8>,
    pub prefix: bool,
    pub assignment: bool,
    pub standard: Standard,
    pub stability: Stability,
    pub examples: &'static [Example],
}

/// Registry of all operators, ordered by [`OperatorId`].
pub const OPERATORS: &[OperatorInfo] = &[
    op(OperatorId::Plus, "+", Some(12), true, false),
    op(OperatorId::Minus, "-", Some(12), true, false),
    op(OperatorId::Star, "*", Some(13), true, false),
    op(OperatorId::Slash, "/", Some(13), false, false),
    op(OperatorId::Percent, "%", Some(13), false, false),
    op(OperatorId::Caret, "^", Some(7), false, false),
    op(OperatorId::Amp, "&", Some(8), true, false),
    op(OperatorId::Pipe, "|", Some(6), false, false),
    op(OperatorId::Tilde, "~", None, true, false),
    op(OperatorId::Not, "!", None, true, false),
    op(OperatorId::Assign, "=", Some(2), false, true),
    op(OperatorId::Lt, "<", Some(10), false, false),
    op(OperatorId::Gt, ">", Some(10), false, false),
    op(OperatorId::PlusAssign, "+=", Some(2), false, true),
    op(OperatorId::MinusAssign, "-=", Some(2), false, true),
    op(OperatorId::StarAssign, "*=", Some(2), false, true),
    op(OperatorId::SlashAssign, "/=", Some(2), false, true),
    op(OperatorId::PercentAssign, "%=", Some(2), false, true),
    op(OperatorId::CaretAssign, "^=", Some(2), false, true),
    op(OperatorId::AmpAssign, "&=", Some(2), false, true),
    op(OperatorId::PipeAssign, "|=", Some(2), false, true),
    op(OperatorId::Shl, "<<", Some(11), false, false),
    op(OperatorId::Shr, ">>", Some(11), false, false),
    op(OperatorId::ShlAssign, "<<=", Some(2), false, true),
    op(OperatorId::ShrAssign, ">>=", Some(2), false, true),
    op(OperatorId::EqEq, "==", Some(9), false, false),
    op(OperatorId::NotEq, "!=", Some(9), false, false),
    op(OperatorId::LtEq, "<=", Some(10), false, false),
    op(OperatorId::GtEq, ">=", Some(10), false, false),
    op(OperatorId::AndAnd, "&&", Some(5), false, false),
    op(OperatorId::OrOr, "||", Some(4), false, false),
    op(OperatorId::PlusPlus, "++", None, true, false),
    op(OperatorId::MinusMinus, "--", None, true, false),
    op(OperatorId::Arrow, "->", None, false, false),
    cpp_op(OperatorId::ArrowStar, "->*", Some(14)),
    cpp_op(OperatorId::DotStar, ".*", Some(14)),
];

/// Return the spelling of an operator.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spelling
}

/// Return the full metadata entry for an operator.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    &OPERATORS[id as usize]
}

/// Return `true` for `=` and the compound assignment operators.
pub fn is_assignment(id: OperatorId) -> bool {
    info_for(id).assignment
}

/// Resolve an operator spelling to its identifier.
///
/// ## Returns
/// - `Some(OperatorId)` if the spelling exists in [`OPERATORS`].
/// - `None` otherwise.
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS.iter().find(|o| o.spelling == spelling).map(|o| o.id)
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spelling: &'static str,
    precedence: Option<u8>,
    prefix: bool,
    assignment: bool,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spelling,
        precedence,
        prefix,
        assignment,
        standard: Standard::C89,
        stability: Stability::Stable,
        examples: &[],
    }
}

const fn cpp_op(id: OperatorId, spelling: &'static str, precedence: Option<u8>) -> OperatorInfo {
    let mut info = op(id, spelling, precedence, false, false);
    info.standard = Standard::Cpp98;
    info
}
