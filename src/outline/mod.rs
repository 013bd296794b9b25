//! Human-readable outlines of parse results.
//!
//! Two views are offered:
//! - [`render_outline`] prints a [`TranslationUnit`] tree, one construct per line, children indented under their scope.
//! - [`EventLog`] (and [`render_events`]) prints the raw sink stream with byte spans, which shows exactly what a sink
//!   was told and in which order.
//!
//! ## Notes
//! - Declarations are reconstructed from the AST, not copied from the source. Expressions go through the token
//!   printer, so initializers read `= a + 1` with a space between every token.

mod writer;

pub use writer::OutlineWriter;

use cxxparse_core::lang::keywords::{self, KeywordId};
use cxxparse_syntax::ast::{
    Access, DeclSpecifiers, Declaration, Declarator, ElaboratedKind, EnumSpecifier, FunctionBody, FunctionDeclarator,
    FunctionDefinition, Node, ParameterDeclaration, PointerKind, Scope, ScopeKind, SimpleDeclaration, SimpleType,
    SpecifierFlags, Spanned, Stmt, TemplateParameter, TemplateParameterKind, TranslationUnit, TypeSpecifier,
};
use cxxparse_syntax::printer::{print_expression, print_initializer};
use cxxparse_syntax::sink::{AstSink, SinkEvent};

const INDENT_WIDTH: usize = 2;

/// Specifier flags in the order they are printed. `typedef` is shown as the declaration kind instead.
const FLAG_WORDS: &[(SpecifierFlags, KeywordId)] = &[
    (SpecifierFlags::FRIEND, KeywordId::Friend),
    (SpecifierFlags::AUTO, KeywordId::Auto),
    (SpecifierFlags::REGISTER, KeywordId::Register),
    (SpecifierFlags::STATIC, KeywordId::Static),
    (SpecifierFlags::EXTERN, KeywordId::Extern),
    (SpecifierFlags::MUTABLE, KeywordId::Mutable),
    (SpecifierFlags::INLINE, KeywordId::Inline),
    (SpecifierFlags::VIRTUAL, KeywordId::Virtual),
    (SpecifierFlags::EXPLICIT, KeywordId::Explicit),
    (SpecifierFlags::CONST, KeywordId::Const),
    (SpecifierFlags::VOLATILE, KeywordId::Volatile),
    (SpecifierFlags::SIGNED, KeywordId::Signed),
    (SpecifierFlags::UNSIGNED, KeywordId::Unsigned),
    (SpecifierFlags::SHORT, KeywordId::Short),
    (SpecifierFlags::LONG, KeywordId::Long),
    (SpecifierFlags::LONG_LONG, KeywordId::Long),
    (SpecifierFlags::TYPENAME, KeywordId::Typename),
];

/// Render a translation unit as an indented outline.
pub fn render_outline(unit: &TranslationUnit) -> String {
    let mut writer = OutlineWriter::new(INDENT_WIDTH);
    for node in &unit.nodes {
        write_node(&mut writer, node);
    }
    writer.finish()
}

/// Render a recorded event stream, one line per event.
pub fn render_events(events: &[SinkEvent]) -> String {
    let mut log = EventLog::new();
    for event in events {
        match event {
            SinkEvent::Enter(scope) => log.enter_scope(scope),
            SinkEvent::Exit(scope) => log.exit_scope(scope.clone()),
            SinkEvent::Accept(declaration) => log.accept(declaration.clone()),
        }
    }
    log.finish()
}

fn write_node(w: &mut OutlineWriter, node: &Node) {
    match node {
        Node::Scope { scope, children } => {
            w.writeln(&scope_label(scope));
            w.indent();
            for child in children {
                write_node(w, child);
            }
            w.dedent();
        }
        Node::Declaration(declaration) => w.writeln(&declaration_label(&declaration.node)),
    }
}

/// A sink that prints every notification as it arrives.
pub struct EventLog {
    writer: OutlineWriter,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            writer: OutlineWriter::new(INDENT_WIDTH),
        }
    }

    pub fn finish(self) -> String {
        self.writer.finish()
    }
}

impl AstSink for EventLog {
    fn enter_scope(&mut self, scope: &Scope) {
        let line = format!("enter {} @{}", scope_label(scope), scope.span.start);
        self.writer.writeln(&line);
        self.writer.indent();
    }

    fn exit_scope(&mut self, scope: Scope) {
        let line = format!("exit {} @{}..{}", scope_label(&scope), scope.span.start, scope.span.end);
        self.writer.dedent();
        self.writer.writeln(&line);
    }

    fn accept(&mut self, declaration: Spanned<Declaration>) {
        let line = format!(
            "{} @{}..{}",
            declaration_label(&declaration.node),
            declaration.span.start,
            declaration.span.end
        );
        self.writer.writeln(&line);
    }
}

// ============================================================================
// Labels
// ============================================================================

/// One-line description of a scope.
pub fn scope_label(scope: &Scope) -> String {
    match &scope.kind {
        ScopeKind::Namespace(Some(name)) => format!("namespace {name}"),
        ScopeKind::Namespace(None) => "namespace <anonymous>".to_string(),
        ScopeKind::Linkage(linkage) => format!("extern \"{linkage}\""),
        ScopeKind::Class(class) => {
            let name = name_or_anonymous(class.name.as_ref().map(|n| n.text.as_str()));
            let mut text = format!("{} {name}", class.key.as_str());
            if !class.bases.is_empty() {
                let bases: Vec<String> = class
                    .bases
                    .iter()
                    .map(|base| {
                        let mut words = Vec::new();
                        if base.is_virtual {
                            words.push("virtual");
                        }
                        if let Some(access) = base.access {
                            words.push(access.as_str());
                        }
                        words.push(&base.name.text);
                        words.join(" ")
                    })
                    .collect();
                text.push_str(" : ");
                text.push_str(&bases.join(", "));
            }
            text
        }
        ScopeKind::Template { exported, parameters } => {
            let prefix = if *exported { "export " } else { "" };
            format!("{prefix}template <{}>", template_parameters(parameters))
        }
        ScopeKind::TemplateSpecialization => "template <>".to_string(),
        ScopeKind::TemplateInstantiation => "template instantiation".to_string(),
        ScopeKind::Function(definition) => function_label(definition),
    }
}

/// One-line description of a leaf declaration.
pub fn declaration_label(declaration: &Declaration) -> String {
    match declaration {
        Declaration::Simple(simple) => {
            let kind = if simple.specifiers.flags.contains(SpecifierFlags::TYPEDEF) {
                "typedef"
            } else if is_function(&simple.declarator) {
                "function"
            } else {
                "variable"
            };
            with_access(format!("{kind} {}", simple_text(simple)), simple.access)
        }
        Declaration::TypeSpec(type_spec) => with_access(
            format!("type {}", specifiers_text(&type_spec.specifiers)),
            type_spec.access,
        ),
        Declaration::Enumeration(enumeration) => enumeration_label(enumeration),
        Declaration::UsingDirective(name) => format!("using namespace {}", name.text),
        Declaration::UsingDeclaration { typename, name } => {
            if *typename {
                format!("using typename {}", name.text)
            } else {
                format!("using {}", name.text)
            }
        }
        Declaration::NamespaceAlias { alias, target } => format!("namespace {alias} = {}", target.text),
        Declaration::Asm(text) => format!("asm {text}"),
    }
}

fn function_label(definition: &FunctionDefinition) -> String {
    let mut text = format!("function {}", simple_text(&definition.declaration));
    if !definition.member_initializers.is_empty() {
        let initializers: Vec<String> = definition
            .member_initializers
            .iter()
            .map(|init| {
                let args = init.args.as_ref().map(|a| print_expression(&a.node)).unwrap_or_default();
                format!("{}({args})", init.name.text)
            })
            .collect();
        text.push_str(" : ");
        text.push_str(&initializers.join(", "));
    }
    match &definition.body {
        FunctionBody::Pending => {}
        FunctionBody::Skipped(_) => text.push_str(" [body skipped]"),
        FunctionBody::Parsed(body) => {
            let count = match &body.node {
                Stmt::Compound(statements) => statements.len(),
                _ => 1,
            };
            let noun = if count == 1 { "statement" } else { "statements" };
            text.push_str(&format!(" [{count} {noun}]"));
        }
    }
    with_access(text, definition.declaration.access)
}

fn enumeration_label(enumeration: &EnumSpecifier) -> String {
    let name = name_or_anonymous(enumeration.name.as_ref().map(|n| n.text.as_str()));
    let enumerators: Vec<String> = enumeration
        .enumerators
        .iter()
        .map(|e| match &e.value {
            Some(value) => format!("{} = {}", e.name, print_expression(&value.node)),
            None => e.name.clone(),
        })
        .collect();
    if enumerators.is_empty() {
        format!("enum {name}")
    } else {
        format!("enum {name} {{ {} }}", enumerators.join(", "))
    }
}

fn with_access(text: String, access: Option<Access>) -> String {
    match access {
        Some(access) => format!("{text} [{}]", access.as_str()),
        None => text,
    }
}

fn name_or_anonymous(name: Option<&str>) -> &str {
    name.unwrap_or("<anonymous>")
}

/// A declarator declares a function when its function suffix is not behind a pointer.
fn is_function(declarator: &Declarator) -> bool {
    declarator.function.is_some() && declarator.nested.as_ref().is_none_or(|inner| inner.pointer_ops.is_empty())
}

// ============================================================================
// Declaration text
// ============================================================================

fn join_nonempty(parts: &[String]) -> String {
    parts.iter().filter(|p| !p.is_empty()).map(String::as_str).collect::<Vec<_>>().join(" ")
}

fn simple_text(simple: &SimpleDeclaration) -> String {
    join_nonempty(&[specifiers_text(&simple.specifiers), declarator_text(&simple.declarator)])
}

fn specifiers_text(specifiers: &DeclSpecifiers) -> String {
    let mut words: Vec<&str> = FLAG_WORDS
        .iter()
        .filter(|(flag, _)| specifiers.flags.contains(*flag))
        .map(|(_, id)| keywords::as_str(*id))
        .collect();

    let type_word = match specifiers.simple_type {
        SimpleType::Unspecified => None,
        SimpleType::Char => Some(KeywordId::Char),
        SimpleType::WcharT => Some(KeywordId::WcharT),
        SimpleType::Bool => Some(KeywordId::Bool),
        SimpleType::Int => Some(KeywordId::Int),
        SimpleType::Float => Some(KeywordId::Float),
        SimpleType::Double => Some(KeywordId::Double),
        SimpleType::Void => Some(KeywordId::Void),
        SimpleType::ClassOrTypename => None,
    };
    if let Some(id) = type_word {
        words.push(keywords::as_str(id));
    }

    let mut text = words.join(" ");
    let named = match (&specifiers.type_specifier, &specifiers.type_name) {
        (Some(type_specifier), _) => type_specifier_text(type_specifier),
        (None, Some(name)) => name.text.clone(),
        (None, None) => String::new(),
    };
    if !named.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(&named);
    }
    text
}

fn type_specifier_text(type_specifier: &TypeSpecifier) -> String {
    match type_specifier {
        TypeSpecifier::Class { key, name, .. } => {
            format!("{} {}", key.as_str(), name_or_anonymous(name.as_ref().map(|n| n.text.as_str())))
        }
        TypeSpecifier::Enum { name, .. } => {
            format!("enum {}", name_or_anonymous(name.as_ref().map(|n| n.text.as_str())))
        }
        TypeSpecifier::Elaborated(elaborated) => {
            let key = match elaborated.kind {
                ElaboratedKind::Class(key) => key.as_str(),
                ElaboratedKind::Enum => keywords::as_str(KeywordId::Enum),
            };
            format!("{key} {}", elaborated.name.text)
        }
    }
}

fn declarator_text(declarator: &Declarator) -> String {
    let mut out = String::new();
    for op in &declarator.pointer_ops {
        match &op.kind {
            PointerKind::Pointer => out.push('*'),
            PointerKind::Reference => out.push('&'),
            PointerKind::Member(class) => {
                out.push_str(&class.text);
                out.push_str("::*");
            }
        }
        if op.is_const {
            out.push_str("const ");
        }
        if op.is_volatile {
            out.push_str("volatile ");
        }
    }

    if let Some(nested) = &declarator.nested {
        out.push('(');
        out.push_str(&declarator_text(nested));
        out.push(')');
    } else if let Some(name) = &declarator.name {
        out.push_str(&name.text);
    }

    if let Some(function) = &declarator.function {
        out.push_str(&function_suffix(function));
    }
    for array in &declarator.arrays {
        out.push('[');
        if let Some(size) = array {
            out.push_str(&print_expression(&size.node));
        }
        out.push(']');
    }
    if let Some(width) = &declarator.bit_field {
        out.push_str(" : ");
        out.push_str(&print_expression(&width.node));
    }
    if let Some(initializer) = &declarator.initializer {
        out.push(' ');
        out.push_str(&print_initializer(initializer));
    }
    out.trim_end().to_string()
}

fn function_suffix(function: &FunctionDeclarator) -> String {
    let mut parameters: Vec<String> = function.parameters.iter().map(parameter_text).collect();
    if function.varargs {
        parameters.push("...".to_string());
    }
    let mut out = format!("({})", parameters.join(", "));
    if function.is_const {
        out.push_str(" const");
    }
    if function.is_volatile {
        out.push_str(" volatile");
    }
    if let Some(types) = &function.exception_spec {
        let types: Vec<&str> = types.iter().map(|t| t.text.as_str()).collect();
        out.push_str(&format!(" throw({})", types.join(", ")));
    }
    if function.pure_virtual {
        out.push_str(" = 0");
    }
    out
}

fn parameter_text(parameter: &ParameterDeclaration) -> String {
    join_nonempty(&[specifiers_text(&parameter.specifiers), declarator_text(&parameter.declarator)])
}

fn template_parameters(parameters: &[TemplateParameter]) -> String {
    let texts: Vec<String> = parameters.iter().map(template_parameter).collect();
    texts.join(", ")
}

fn template_parameter(parameter: &TemplateParameter) -> String {
    let head = match &parameter.kind {
        TemplateParameterKind::Class => keywords::as_str(KeywordId::Class).to_string(),
        TemplateParameterKind::Typename => keywords::as_str(KeywordId::Typename).to_string(),
        TemplateParameterKind::Template(inner) => format!("template <{}> class", template_parameters(inner)),
        TemplateParameterKind::Value(declaration) => parameter_text(declaration),
    };
    let mut text = match (&parameter.kind, &parameter.name) {
        (TemplateParameterKind::Value(_), _) | (_, None) => head,
        (_, Some(name)) => format!("{head} {name}"),
    };
    if let Some(default) = &parameter.default {
        text.push_str(" = ");
        text.push_str(&default.text);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use cxxparse_syntax::{ParserConfig, parse_source};

    fn outline(source: &str) -> String {
        let (unit, outcome) = parse_source(source, ParserConfig::default());
        assert!(outcome.passed, "{:?}", outcome.errors);
        render_outline(&unit)
    }

    #[test]
    fn test_variable_with_initializer() {
        assert_eq!(outline("static const int x = 1 + 2;"), "variable static const int x = 1 + 2\n");
    }

    #[test]
    fn test_pointer_to_function_is_a_variable() {
        assert_eq!(
            outline("int (*handler)(int, char*);"),
            "variable int (*handler)(int, char *)\n"
        );
    }

    #[test]
    fn test_namespace_children_are_indented() {
        assert_eq!(
            outline("namespace n { typedef unsigned long size; }"),
            "namespace n\n  typedef unsigned long size\n"
        );
    }

    #[test]
    fn test_event_log_balances_indentation() {
        let mut events: Vec<SinkEvent> = Vec::new();
        cxxparse_syntax::parse("namespace a { int x; }", ParserConfig::default(), &mut events);
        let text = render_events(&events);
        assert_eq!(text, "enter namespace a @0\n  variable int x @14..20\nexit namespace a @0..22\n");
    }
}
