//! Abstract Syntax Tree definitions for C and C++.
//!
//! The parser never hands out a finished tree by itself: it reports [`Scope`]s and [`Declaration`]s to an
//! [`AstSink`](crate::sink::AstSink) as constructs complete. The [`Node`]/[`TranslationUnit`] tree at the bottom of
//! this module is what the reference [`TreeBuilder`](crate::sink::TreeBuilder) sink assembles from those events.
//!
//! ## Notes
//! - Names, type-ids and template argument lists are kept as source text ([`Name`]); the parser does not resolve
//!   them.
//! - Every node carries byte offsets into the original source.

use bitflags::bitflags;

/// Source location span (byte offsets, half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A node with source location
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A run of tokens naming something: `x`, `::std::vector<int>`, `~Foo`, `A::operator=`, or a type-id such as
/// `unsigned long*`.
///
/// `text` joins the token images, with one space wherever the source had whitespace between two tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Name {
    pub text: String,
    pub span: Span,
    pub token_count: usize,
}

impl Name {
    /// Return `true` if the name is a single identifier token.
    pub fn is_identifier(&self) -> bool {
        self.token_count == 1
    }
}

/// A type-id (`int`, `const char*`, `std::map<K, V>`), kept as source text.
pub type TypeId = Name;

// ============================================================================
// Declaration specifiers
// ============================================================================

bitflags! {
    /// Keyword specifiers seen in a declaration-specifier sequence.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize))]
    pub struct SpecifierFlags: u32 {
        const AUTO      = 1;
        const REGISTER  = 1 << 1;
        const STATIC    = 1 << 2;
        const EXTERN    = 1 << 3;
        const MUTABLE   = 1 << 4;
        const TYPEDEF   = 1 << 5;
        const FRIEND    = 1 << 6;
        const CONST     = 1 << 7;
        const VOLATILE  = 1 << 8;
        const INLINE    = 1 << 9;
        const VIRTUAL   = 1 << 10;
        const EXPLICIT  = 1 << 11;
        const SHORT     = 1 << 12;
        const LONG      = 1 << 13;
        const LONG_LONG = 1 << 14;
        const SIGNED    = 1 << 15;
        const UNSIGNED  = 1 << 16;
        /// The type name was introduced with `typename`.
        const TYPENAME  = 1 << 17;
    }
}

impl SpecifierFlags {
    /// Flags that make a specifier sequence name a builtin ("raw") type on their own.
    pub const RAW_TYPE: SpecifierFlags = SpecifierFlags::SHORT
        .union(SpecifierFlags::LONG)
        .union(SpecifierFlags::SIGNED)
        .union(SpecifierFlags::UNSIGNED);
}

/// The builtin type keyword of a declaration, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SimpleType {
    #[default]
    Unspecified,
    Char,
    WcharT,
    Bool,
    Int,
    Float,
    Double,
    Void,
    /// A user-defined type named by `type_name` or `type_specifier`.
    ClassOrTypename,
}

/// `class`, `struct` or `union`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ClassKey {
    Class,
    Struct,
    Union,
}

impl ClassKey {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassKey::Class => "class",
            ClassKey::Struct => "struct",
            ClassKey::Union => "union",
        }
    }

    /// Member access before the first access label.
    pub fn default_access(self) -> Access {
        match self {
            ClassKey::Class => Access::Private,
            ClassKey::Struct | ClassKey::Union => Access::Public,
        }
    }
}

/// Member access level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Protected => "protected",
            Access::Private => "private",
        }
    }
}

/// Keyword of an elaborated type specifier (`class X`, `enum E`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ElaboratedKind {
    Class(ClassKey),
    Enum,
}

/// `class Foo`, `enum Color`, used without a body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElaboratedTypeSpecifier {
    pub kind: ElaboratedKind,
    pub name: Name,
}

/// A type specifier that is a construct of its own rather than a keyword or name.
///
/// Class and enum bodies are reported to the sink separately; the declaration only keeps a reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TypeSpecifier {
    Class {
        key: ClassKey,
        name: Option<Name>,
        span: Span,
    },
    Enum {
        name: Option<Name>,
        span: Span,
    },
    Elaborated(ElaboratedTypeSpecifier),
}

/// The specifier part of a declaration, shared by all its declarators.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeclSpecifiers {
    pub flags: SpecifierFlags,
    pub simple_type: SimpleType,
    pub type_name: Option<Name>,
    pub type_specifier: Option<TypeSpecifier>,
}

// ============================================================================
// Declarators
// ============================================================================

/// What a pointer operator binds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PointerKind {
    /// `*`
    Pointer,
    /// `&`
    Reference,
    /// `Class::*`
    Member(Name),
}

/// One pointer operator of a declarator, e.g. `* const`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PointerOp {
    pub kind: PointerKind,
    pub is_const: bool,
    pub is_volatile: bool,
}

/// The parameter clause and trailing qualifiers of a function declarator.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionDeclarator {
    pub parameters: Vec<ParameterDeclaration>,
    pub varargs: bool,
    pub is_const: bool,
    pub is_volatile: bool,
    /// `throw(...)`; `Some(vec![])` for `throw()`.
    pub exception_spec: Option<Vec<TypeId>>,
    /// `= 0`
    pub pure_virtual: bool,
    /// Old-style parameter declarations between `)` and the body.
    pub kr_parameters: Vec<SimpleDeclaration>,
}

/// A declarator: the name plus its pointer/array/function shape, and its initializer.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Declarator {
    pub name: Option<Name>,
    pub pointer_ops: Vec<PointerOp>,
    /// The inner declarator of a parenthesized declarator such as `(*fp)`.
    pub nested: Option<Box<Declarator>>,
    pub function: Option<FunctionDeclarator>,
    /// One entry per `[...]`; `None` for `[]`.
    pub arrays: Vec<Option<Spanned<Expr>>>,
    pub bit_field: Option<Spanned<Expr>>,
    pub initializer: Option<Initializer>,
    pub span: Span,
}

impl Declarator {
    /// The name of this declarator or, for a parenthesized declarator, of the innermost one.
    pub fn declared_name(&self) -> Option<&Name> {
        match (&self.name, &self.nested) {
            (Some(name), _) => Some(name),
            (None, Some(inner)) => inner.declared_name(),
            (None, None) => None,
        }
    }
}

/// Initializer of a declarator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Initializer {
    /// `= clause`
    Assign(InitializerClause),
    /// `(args)`
    Constructor(Spanned<Expr>),
}

/// `expr` or `{ clause, ... }`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum InitializerClause {
    Expr(Spanned<Expr>),
    List(Vec<InitializerClause>),
}

/// A function or template parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParameterDeclaration {
    pub specifiers: DeclSpecifiers,
    pub declarator: Declarator,
    pub span: Span,
}

// ============================================================================
// Declarations and scopes
// ============================================================================

/// One declarator together with the specifiers of its declaration.
///
/// `int a, *b;` is reported as two simple declarations sharing the same specifiers and span.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SimpleDeclaration {
    pub specifiers: DeclSpecifiers,
    pub declarator: Declarator,
    /// Member access when declared inside a class body.
    pub access: Option<Access>,
}

/// A declaration with specifiers only, such as `class Foo { ... };` or `struct Bar;`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TypeSpecDeclaration {
    pub specifiers: DeclSpecifiers,
    pub access: Option<Access>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Enumerator {
    pub name: String,
    pub value: Option<Spanned<Expr>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumSpecifier {
    pub name: Option<Name>,
    pub enumerators: Vec<Enumerator>,
}

/// Leaf declarations delivered through [`AstSink::accept`](crate::sink::AstSink::accept).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Declaration {
    Simple(SimpleDeclaration),
    TypeSpec(TypeSpecDeclaration),
    Enumeration(EnumSpecifier),
    /// `using namespace n;`
    UsingDirective(Name),
    /// `using [typename] n::x;`
    UsingDeclaration { typename: bool, name: Name },
    /// `namespace a = b::c;`
    NamespaceAlias { alias: String, target: Name },
    /// `asm("...");`, the string literal image.
    Asm(String),
}

/// A base class in a class head.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BaseSpecifier {
    pub name: Name,
    pub is_virtual: bool,
    pub access: Option<Access>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ClassSpecifier {
    pub key: ClassKey,
    pub name: Option<Name>,
    pub bases: Vec<BaseSpecifier>,
}

/// `name(args)` in a constructor initializer list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MemberInitializer {
    pub name: Name,
    pub args: Option<Spanned<Expr>>,
}

/// The body of a function definition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FunctionBody {
    /// The body has not been read yet (scope entry).
    Pending,
    /// Quick mode skipped the body by brace matching.
    Skipped(Span),
    Parsed(Spanned<Stmt>),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionDefinition {
    pub declaration: SimpleDeclaration,
    pub member_initializers: Vec<MemberInitializer>,
    pub body: FunctionBody,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TemplateParameterKind {
    Class,
    Typename,
    /// `template<...> class T`
    Template(Vec<TemplateParameter>),
    /// A non-type parameter such as `int N = 3`.
    Value(ParameterDeclaration),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TemplateParameter {
    pub kind: TemplateParameterKind,
    /// Name of a type or template parameter; value parameters keep theirs in the declarator.
    pub name: Option<String>,
    /// Default of a type or template parameter.
    pub default: Option<TypeId>,
    pub span: Span,
}

/// Constructs that own a body of nested declarations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ScopeKind {
    /// `namespace n { ... }`; `None` for an anonymous namespace.
    Namespace(Option<String>),
    /// `extern "C" ...`, holding the unquoted linkage name.
    Linkage(String),
    Class(ClassSpecifier),
    Template {
        exported: bool,
        parameters: Vec<TemplateParameter>,
    },
    /// `template<> ...`
    TemplateSpecialization,
    /// `template class X<int>;`
    TemplateInstantiation,
    Function(Box<FunctionDefinition>),
}

/// A scope reported through [`AstSink::enter_scope`](crate::sink::AstSink::enter_scope) and
/// [`AstSink::exit_scope`](crate::sink::AstSink::exit_scope).
///
/// On entry `span.end` equals `span.start`; the ending offset is assigned before the scope is exited.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Scope {
    pub kind: ScopeKind,
    pub span: Span,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LiteralKind {
    Integer,
    Float,
    Char,
    String,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BinaryOp {
    Comma,
    OrOr,
    AndAnd,
    BitOr,
    BitXor,
    BitAnd,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    DotStar,
    ArrowStar,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Comma => ",",
            BinaryOp::OrOr => "||",
            BinaryOp::AndAnd => "&&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::DotStar => ".*",
            BinaryOp::ArrowStar => "->*",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AssignOp {
    Assign,
    Mul,
    Div,
    Rem,
    Add,
    Sub,
    Shr,
    Shl,
    And,
    Xor,
    Or,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Shr => ">>=",
            AssignOp::Shl => "<<=",
            AssignOp::And => "&=",
            AssignOp::Xor => "^=",
            AssignOp::Or => "|=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UnaryOp {
    Deref,
    AddrOf,
    Plus,
    Minus,
    Not,
    BitNot,
    PreInc,
    PreDec,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Deref => "*",
            UnaryOp::AddrOf => "&",
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreInc => "++",
            UnaryOp::PreDec => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PostfixOp {
    Inc,
    Dec,
}

/// `dynamic_cast` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CastKind {
    Dynamic,
    Static,
    Reinterpret,
    Const,
}

impl CastKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CastKind::Dynamic => "dynamic_cast",
            CastKind::Static => "static_cast",
            CastKind::Reinterpret => "reinterpret_cast",
            CastKind::Const => "const_cast",
        }
    }
}

/// `new (placement) T [dims] (init)`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NewExpr {
    pub global: bool,
    pub placement: Option<Spanned<Expr>>,
    /// The type was written in parentheses: `new (int)`.
    pub parenthesized_type: bool,
    pub type_id: TypeId,
    pub array_sizes: Vec<Spanned<Expr>>,
    /// `Some(None)` for `()`.
    pub initializer: Option<Option<Spanned<Expr>>>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Expr {
    /// Nothing was parsed. Only produced where an operand is optional.
    Empty,
    Literal { kind: LiteralKind, image: String },
    This,
    Id(Name),
    Paren(Box<Spanned<Expr>>),
    Unary(UnaryOp, Box<Spanned<Expr>>),
    Postfix(Box<Spanned<Expr>>, PostfixOp),
    Binary(Box<Spanned<Expr>>, BinaryOp, Box<Spanned<Expr>>),
    Assign(Box<Spanned<Expr>>, AssignOp, Box<Spanned<Expr>>),
    Conditional(Box<Spanned<Expr>>, Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    /// `(T) e`
    Cast(TypeId, Box<Spanned<Expr>>),
    SizeofType(TypeId),
    SizeofExpr(Box<Spanned<Expr>>),
    New(Box<NewExpr>),
    Delete {
        global: bool,
        array: bool,
        operand: Box<Spanned<Expr>>,
    },
    Throw(Option<Box<Spanned<Expr>>>),
    Call(Box<Spanned<Expr>>, Option<Box<Spanned<Expr>>>),
    Subscript(Box<Spanned<Expr>>, Box<Spanned<Expr>>),
    Member {
        base: Box<Spanned<Expr>>,
        arrow: bool,
        template: bool,
        member: Name,
    },
    /// Functional cast: `int(x)`, `typename T::type(y)`.
    TypeConstruct {
        type_id: TypeId,
        args: Option<Box<Spanned<Expr>>>,
    },
    NamedCast {
        kind: CastKind,
        type_id: TypeId,
        operand: Box<Spanned<Expr>>,
    },
    TypeidType(TypeId),
    TypeidExpr(Box<Spanned<Expr>>),
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CatchHandler {
    /// `None` for `catch (...)`.
    pub parameter: Option<ParameterDeclaration>,
    pub body: Spanned<Stmt>,
}

/// The condition of `if`, `while` and `switch`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Condition {
    Expr(Spanned<Expr>),
    /// `if (T x = e)`
    Declaration(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Stmt {
    Compound(Vec<Spanned<Stmt>>),
    Expr(Spanned<Expr>),
    /// Declarations in block scope, in the same shape a sink would receive them.
    Declaration(Vec<Node>),
    Labeled(String, Box<Spanned<Stmt>>),
    Case(Spanned<Expr>, Box<Spanned<Stmt>>),
    Default(Box<Spanned<Stmt>>),
    If {
        condition: Condition,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },
    Switch(Condition, Box<Spanned<Stmt>>),
    While(Condition, Box<Spanned<Stmt>>),
    DoWhile(Box<Spanned<Stmt>>, Spanned<Expr>),
    For {
        init: Box<Spanned<Stmt>>,
        condition: Option<Condition>,
        step: Option<Spanned<Expr>>,
        body: Box<Spanned<Stmt>>,
    },
    Break,
    Continue,
    Return(Option<Spanned<Expr>>),
    Goto(String),
    Try {
        body: Box<Spanned<Stmt>>,
        handlers: Vec<CatchHandler>,
    },
    Empty,
}

// ============================================================================
// Assembled tree
// ============================================================================

/// A node of the tree assembled from sink events.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Node {
    Scope { scope: Scope, children: Vec<Node> },
    Declaration(Spanned<Declaration>),
}

/// All top-level nodes of one parsed source.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TranslationUnit {
    pub nodes: Vec<Node>,
}
