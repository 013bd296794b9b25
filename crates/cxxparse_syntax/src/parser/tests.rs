#[cfg(test)]
/// Parser unit tests.
///
/// These cover the ambiguity decisions (constructor vs type, template arguments vs less-than, old-style parameters)
/// and the recovery behavior: one recorded error per broken declaration, and parsing resumes after it.
mod tests {
    use super::*;
    use crate::config::Language;
    use crate::printer::{print_expression, print_initializer};

    fn parse_str(source: &str) -> (TranslationUnit, ParseOutcome) {
        parse_source(source, ParserConfig::default())
    }

    fn parse_ok(source: &str) -> Vec<Node> {
        let (unit, outcome) = parse_str(source);
        assert!(outcome.passed, "Expected a clean parse, got errors: {:?}", outcome.errors);
        unit.nodes
    }

    fn simple(node: &Node) -> &SimpleDeclaration {
        match node {
            Node::Declaration(decl) => match &decl.node {
                Declaration::Simple(simple) => simple,
                other => panic!("Expected simple declaration, got {other:?}"),
            },
            other => panic!("Expected declaration, got {other:?}"),
        }
    }

    fn initializer_text(node: &Node) -> String {
        match &simple(node).declarator.initializer {
            Some(initializer) => print_initializer(initializer),
            None => panic!("Expected initializer"),
        }
    }

    fn function(node: &Node) -> &FunctionDefinition {
        match node {
            Node::Scope {
                scope:
                    Scope {
                        kind: ScopeKind::Function(definition),
                        ..
                    },
                ..
            } => definition,
            other => panic!("Expected function definition, got {other:?}"),
        }
    }

    fn body_statements(node: &Node) -> &[Spanned<Stmt>] {
        match &function(node).body {
            FunctionBody::Parsed(Spanned {
                node: Stmt::Compound(statements),
                ..
            }) => statements,
            other => panic!("Expected parsed body, got {other:?}"),
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    #[test]
    fn test_empty_input_and_stray_semicolon() {
        assert!(parse_ok("").is_empty());
        assert!(parse_ok(";").is_empty());
    }

    #[test]
    fn test_multiple_declarators_share_specifiers() {
        let nodes = parse_ok("static unsigned long a, *b, c[10];");
        assert_eq!(nodes.len(), 3);
        let b = simple(&nodes[1]);
        assert!(b.specifiers.flags.contains(SpecifierFlags::STATIC | SpecifierFlags::UNSIGNED));
        assert_eq!(b.declarator.pointer_ops.len(), 1);
        assert_eq!(simple(&nodes[2]).declarator.arrays.len(), 1);
    }

    #[test]
    fn test_nested_template_arguments_close_with_shift() {
        let nodes = parse_ok("A<B<C<int>>> x;");
        let decl = simple(&nodes[0]);
        assert_eq!(decl.specifiers.type_name.as_ref().map(|n| n.text.as_str()), Some("A<B<C<int>>>"));
        assert_eq!(decl.declarator.declared_name().map(|n| n.text.as_str()), Some("x"));
    }

    #[test]
    fn test_namespace_using_linkage_enum_and_template() {
        let source = r#"
namespace n { int x = 1; }
using namespace n;
namespace m = n;
extern "C" { void f(void); }
enum Color { Red, Green = 2 };
template <class T> class Box { T value; };
"#;
        let nodes = parse_ok(source);
        assert_eq!(nodes.len(), 7);

        match &nodes[0] {
            Node::Scope { scope, children } => {
                assert_eq!(scope.kind, ScopeKind::Namespace(Some("n".to_string())));
                assert_eq!(children.len(), 1);
            }
            _ => panic!("Expected namespace"),
        }
        match &nodes[1] {
            Node::Declaration(decl) => match &decl.node {
                Declaration::UsingDirective(name) => assert_eq!(name.text, "n"),
                _ => panic!("Expected using directive"),
            },
            _ => panic!("Expected declaration"),
        }
        match &nodes[2] {
            Node::Declaration(decl) => match &decl.node {
                Declaration::NamespaceAlias { alias, target } => {
                    assert_eq!(alias, "m");
                    assert_eq!(target.text, "n");
                }
                _ => panic!("Expected namespace alias"),
            },
            _ => panic!("Expected declaration"),
        }
        match &nodes[3] {
            Node::Scope { scope, children } => {
                assert_eq!(scope.kind, ScopeKind::Linkage("C".to_string()));
                let f = simple(&children[0]);
                assert!(f.declarator.function.is_some());
            }
            _ => panic!("Expected linkage specification"),
        }
        match &nodes[4] {
            Node::Declaration(decl) => match &decl.node {
                Declaration::Enumeration(e) => {
                    assert_eq!(e.name.as_ref().map(|n| n.text.as_str()), Some("Color"));
                    assert_eq!(e.enumerators.len(), 2);
                    assert!(e.enumerators[1].value.is_some());
                }
                _ => panic!("Expected enumeration"),
            },
            _ => panic!("Expected declaration"),
        }
        match &nodes[6] {
            Node::Scope { scope, children } => {
                match &scope.kind {
                    ScopeKind::Template { exported, parameters } => {
                        assert!(!exported);
                        assert_eq!(parameters.len(), 1);
                        assert_eq!(parameters[0].name.as_deref(), Some("T"));
                    }
                    _ => panic!("Expected template scope"),
                }
                assert_eq!(children.len(), 2, "class scope plus its type-spec declaration");
            }
            _ => panic!("Expected template"),
        }
    }

    #[test]
    fn test_template_specialization_and_instantiation() {
        let nodes = parse_ok("template <> class Box<int> { }; template class Box<long>;");
        assert_eq!(nodes.len(), 2);
        match (&nodes[0], &nodes[1]) {
            (Node::Scope { scope: first, .. }, Node::Scope { scope: second, .. }) => {
                assert_eq!(first.kind, ScopeKind::TemplateSpecialization);
                assert_eq!(second.kind, ScopeKind::TemplateInstantiation);
            }
            _ => panic!("Expected two template scopes"),
        }
    }

    #[test]
    fn test_comparisons_inside_brackets_in_template_parameter_defaults() {
        let nodes = parse_ok("template <int N = (3 > 2), int M = f(a >> 1)> struct A { };");
        assert_eq!(nodes.len(), 1);
        match &nodes[0] {
            Node::Scope {
                scope:
                    Scope {
                        kind: ScopeKind::Template { parameters, .. },
                        ..
                    },
                ..
            } => {
                let defaults: Vec<String> = parameters
                    .iter()
                    .map(|parameter| match &parameter.kind {
                        TemplateParameterKind::Value(value) => value
                            .declarator
                            .initializer
                            .as_ref()
                            .map(print_initializer)
                            .unwrap_or_default(),
                        other => panic!("Expected value parameter, got {other:?}"),
                    })
                    .collect();
                assert_eq!(defaults, vec!["= ( 3 > 2 )", "= f ( a >> 1 )"]);
            }
            other => panic!("Expected template scope, got {other:?}"),
        }
    }

    #[test]
    fn test_class_reused_by_later_declaration_strategy() {
        let nodes = parse_ok("struct Q { int a; } q(1);");
        assert_eq!(nodes.len(), 2, "class reported once: {nodes:?}");
        match &nodes[0] {
            Node::Scope { children, .. } => assert_eq!(children.len(), 1),
            other => panic!("Expected class scope, got {other:?}"),
        }
        assert_eq!(simple(&nodes[1]).declarator.declared_name().map(|n| n.text.as_str()), Some("q"));
        assert_eq!(initializer_text(&nodes[1]), "( 1 )");
    }

    #[test]
    fn test_constructor_and_destructor_in_class() {
        let nodes = parse_ok("class Foo { public: Foo(int); ~Foo(); int size() const; };");
        assert_eq!(nodes.len(), 2);
        match &nodes[0] {
            Node::Scope { scope, children } => {
                match &scope.kind {
                    ScopeKind::Class(class) => {
                        assert_eq!(class.key, ClassKey::Class);
                        assert_eq!(class.name.as_ref().map(|n| n.text.as_str()), Some("Foo"));
                    }
                    _ => panic!("Expected class scope"),
                }
                assert_eq!(children.len(), 3);
                let ctor = simple(&children[0]);
                assert_eq!(ctor.declarator.declared_name().map(|n| n.text.as_str()), Some("Foo"));
                assert_eq!(ctor.specifiers.type_name, None);
                assert_eq!(ctor.access, Some(Access::Public));
                assert_eq!(
                    ctor.declarator.function.as_ref().map(|f| f.parameters.len()),
                    Some(1)
                );

                let dtor = simple(&children[1]);
                assert_eq!(dtor.declarator.declared_name().map(|n| n.text.as_str()), Some("~Foo"));

                let size = simple(&children[2]);
                assert!(size.declarator.function.as_ref().is_some_and(|f| f.is_const));
            }
            _ => panic!("Expected class scope"),
        }
    }

    #[test]
    fn test_qualified_operator_function() {
        let nodes = parse_ok("bool A::operator==(const A& other) const;");
        let decl = simple(&nodes[0]);
        assert_eq!(
            decl.declarator.declared_name().map(|n| n.text.as_str()),
            Some("A::operator==")
        );
        let function = decl.declarator.function.as_ref().expect("function declarator");
        assert!(function.is_const);
        assert_eq!(function.parameters[0].declarator.pointer_ops[0].kind, PointerKind::Reference);
    }

    #[test]
    fn test_function_pointer_declarator() {
        let nodes = parse_ok("int (*handler)(int, char*);");
        let decl = simple(&nodes[0]);
        assert_eq!(decl.declarator.declared_name().map(|n| n.text.as_str()), Some("handler"));
        assert!(decl.declarator.nested.is_some());
        assert_eq!(decl.declarator.function.as_ref().map(|f| f.parameters.len()), Some(2));
    }

    #[test]
    fn test_constructor_style_initializer() {
        let nodes = parse_ok("int x(5);");
        let decl = simple(&nodes[0]);
        assert!(decl.declarator.function.is_none());
        assert_eq!(initializer_text(&nodes[0]), "( 5 )");
    }

    #[test]
    fn test_throw_specification_and_pure_virtual() {
        let nodes = parse_ok("struct S { virtual void run() throw(E, F) = 0; };");
        match &nodes[0] {
            Node::Scope { children, .. } => {
                let run = simple(&children[0]);
                let function = run.declarator.function.as_ref().expect("function declarator");
                assert!(function.pure_virtual);
                assert_eq!(function.exception_spec.as_ref().map(Vec::len), Some(2));
                assert!(run.specifiers.flags.contains(SpecifierFlags::VIRTUAL));
            }
            _ => panic!("Expected struct scope"),
        }
    }

    // ========================================================================
    // Function definitions
    // ========================================================================

    #[test]
    fn test_kr_function_definition() {
        let config = ParserConfig::default().with_language(Language::C);
        let (unit, outcome) = parse_source("int f(a) int a; { return a; }", config);
        assert!(outcome.passed, "{:?}", outcome.errors);
        let definition = function(&unit.nodes[0]);
        let declarator = &definition.declaration.declarator;
        let suffix = declarator.function.as_ref().expect("function declarator");
        assert_eq!(suffix.parameters.len(), 1);
        assert_eq!(suffix.kr_parameters.len(), 1);
        assert!(matches!(definition.body, FunctionBody::Parsed(_)));
    }

    #[test]
    fn test_quick_mode_skips_bodies() {
        let config = ParserConfig::default().with_mode(ParseMode::Quick);
        let source = "void f() { int x = 1; { x++; } }";
        let (unit, outcome) = parse_source(source, config);
        assert!(outcome.passed);
        match &function(&unit.nodes[0]).body {
            FunctionBody::Skipped(span) => {
                assert_eq!(span.start, source.find('{').unwrap_or_default());
                assert_eq!(span.end, source.len());
            }
            other => panic!("Expected skipped body, got {other:?}"),
        }
    }

    #[test]
    fn test_constructor_definition_with_member_initializers() {
        let nodes = parse_ok("Foo::Foo(int v) : value(v), other() { }");
        let definition = function(&nodes[0]);
        assert_eq!(
            definition.declaration.declarator.declared_name().map(|n| n.text.as_str()),
            Some("Foo::Foo")
        );
        assert_eq!(definition.member_initializers.len(), 2);
        assert!(definition.member_initializers[1].args.is_none());
    }

    #[test]
    fn test_body_after_multiple_declarators_is_an_error() {
        let (unit, outcome) = parse_str("int f(), g() {} int ok;");
        assert!(!outcome.passed);
        assert!(
            outcome
                .errors
                .iter()
                .any(|e| e.message.contains("single declarator")),
            "got: {:?}",
            outcome.errors
        );
        assert_eq!(unit.nodes.len(), 1);
        assert_eq!(simple(&unit.nodes[0]).declarator.declared_name().map(|n| n.text.as_str()), Some("ok"));
    }

    // ========================================================================
    // Statements
    // ========================================================================

    #[test]
    fn test_statement_forms() {
        let source = r#"
void f() {
  for (int i = 0; i < 10; ++i) { if (i) continue; else break; }
  while (x) x--;
  do { } while (0);
  switch (x) { case 1: return; default: ; }
  try { g(); } catch (const E& e) { } catch (...) { }
  done: goto done;
}
"#;
        let nodes = parse_ok(source);
        let statements = body_statements(&nodes[0]);
        assert_eq!(statements.len(), 6);

        match &statements[0].node {
            Stmt::For { init, condition, step, .. } => {
                assert!(matches!(init.node, Stmt::Declaration(ref decls) if decls.len() == 1));
                assert!(matches!(condition, Some(Condition::Expr(_))));
                assert!(step.is_some());
            }
            other => panic!("Expected for statement, got {other:?}"),
        }
        assert!(matches!(statements[1].node, Stmt::While(..)));
        assert!(matches!(statements[2].node, Stmt::DoWhile(..)));
        assert!(matches!(statements[3].node, Stmt::Switch(..)));
        match &statements[4].node {
            Stmt::Try { handlers, .. } => {
                assert_eq!(handlers.len(), 2);
                assert!(handlers[0].parameter.is_some());
                assert!(handlers[1].parameter.is_none());
            }
            other => panic!("Expected try block, got {other:?}"),
        }
        assert!(matches!(statements[5].node, Stmt::Labeled(ref label, _) if label == "done"));
    }

    #[test]
    fn test_condition_declaration() {
        let nodes = parse_ok("void f() { if (int n = next()) return; }");
        match &body_statements(&nodes[0])[0].node {
            Stmt::If { condition, .. } => match condition {
                Condition::Declaration(decls) => {
                    assert_eq!(decls.len(), 1);
                    assert_eq!(initializer_text(&decls[0]), "= next ( )");
                }
                other => panic!("Expected declaration condition, got {other:?}"),
            },
            other => panic!("Expected if statement, got {other:?}"),
        }
    }

    #[test]
    fn test_block_declaration_is_kept_in_statement_tree() {
        let (unit, outcome) = parse_str("void f() { const char* s = \"a\"; }");
        assert!(outcome.passed);
        assert_eq!(unit.nodes.len(), 1, "block declarations must not reach the sink directly");
        match &body_statements(&unit.nodes[0])[0].node {
            Stmt::Declaration(decls) => assert_eq!(decls.len(), 1),
            other => panic!("Expected declaration statement, got {other:?}"),
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    #[test]
    fn test_less_than_chain_is_not_a_template_id() {
        let nodes = parse_ok("int x = a < b > c;");
        assert_eq!(initializer_text(&nodes[0]), "= a < b > c");
    }

    #[test]
    fn test_dangling_less_than_is_given_back() {
        let source = "int x = a < ;";
        let (unit, outcome) = parse_str(source);
        assert!(!outcome.passed);
        assert!(unit.nodes.is_empty());
        assert_eq!(outcome.errors.len(), 1, "{:?}", outcome.errors);
        assert_eq!(outcome.first_error_offset, source.find(';'));

        let source = "void f() { x = a < ; }";
        let (_, outcome) = parse_str(source);
        assert!(!outcome.passed);
        assert_eq!(outcome.first_error_offset, source.find(';'));
    }

    #[test]
    fn test_template_call_keeps_arguments() {
        let nodes = parse_ok("int v = max<int>(a, b);");
        assert_eq!(initializer_text(&nodes[0]), "= max<int> ( a , b )");
    }

    #[test]
    fn test_precedence() {
        let nodes = parse_ok("int x = a + b * c == d && !e;");
        match &simple(&nodes[0]).declarator.initializer {
            Some(Initializer::Assign(InitializerClause::Expr(expr))) => match &expr.node {
                Expr::Binary(lhs, BinaryOp::AndAnd, rhs) => {
                    assert_eq!(print_expression(&lhs.node), "a + b * c == d");
                    assert!(matches!(rhs.node, Expr::Unary(UnaryOp::Not, _)));
                }
                other => panic!("Expected `&&` at the top, got {other:?}"),
            },
            other => panic!("Expected expression initializer, got {other:?}"),
        }
    }

    #[test]
    fn test_new_delete_and_casts() {
        let nodes = parse_ok(
            "int* p = new (buf) int[4]; int q = static_cast<int>(f); int r = sizeof(long); int s = (int) 3.5;",
        );
        assert_eq!(initializer_text(&nodes[0]), "= new ( buf ) int [ 4 ]");
        assert_eq!(initializer_text(&nodes[1]), "= static_cast < int > ( f )");
        assert_eq!(initializer_text(&nodes[2]), "= sizeof ( long )");
        assert_eq!(initializer_text(&nodes[3]), "= ( int ) 3.5");
    }

    #[test]
    fn test_adjacent_string_literals_join() {
        let nodes = parse_ok(r#"const char* s = "a" "b";"#);
        assert_eq!(initializer_text(&nodes[0]), r#"= "a" "b""#);
    }

    #[test]
    fn test_aggregate_initializer() {
        let nodes = parse_ok("int a[] = { 1, { 2, 3 }, };");
        assert_eq!(initializer_text(&nodes[0]), "= { 1 , { 2 , 3 } }");
    }

    // ========================================================================
    // Error recovery
    // ========================================================================

    #[test]
    fn test_recovery_resumes_after_broken_declaration() {
        let source = "int x = ; int y = 5;";
        let (unit, outcome) = parse_str(source);
        assert!(!outcome.passed);
        assert_eq!(outcome.errors.len(), 1, "no cascade: {:?}", outcome.errors);
        assert_eq!(outcome.first_error_offset, Some(source.find(';').unwrap_or_default()));
        assert_eq!(unit.nodes.len(), 1);
        assert_eq!(initializer_text(&unit.nodes[0]), "= 5");
    }

    #[test]
    fn test_recovery_inside_class_body_keeps_class() {
        let (unit, outcome) = parse_str("class A { int = ; int y; }; int z;");
        assert!(!outcome.passed);
        assert_eq!(unit.nodes.len(), 3);
        match &unit.nodes[0] {
            Node::Scope { children, .. } => {
                assert_eq!(children.len(), 1);
                assert_eq!(simple(&children[0]).access, Some(Access::Private));
            }
            _ => panic!("Expected class scope"),
        }
    }

    #[test]
    fn test_stray_closing_brace_is_skipped() {
        let (unit, outcome) = parse_str("} int x;");
        assert!(!outcome.passed);
        assert_eq!(outcome.first_error_offset, Some(0));
        assert_eq!(unit.nodes.len(), 1);
    }

    #[test]
    fn test_scopes_are_balanced_at_end_of_input() {
        let mut events: Vec<SinkEvent> = Vec::new();
        let source = "namespace a { int x;";
        let outcome = parse(source, ParserConfig::default(), &mut events);
        assert!(!outcome.passed);
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], SinkEvent::Enter(_)));
        assert!(matches!(events[1], SinkEvent::Accept(_)));
        match &events[2] {
            SinkEvent::Exit(scope) => {
                assert_eq!(scope.span.start, 0);
                assert_eq!(scope.span.end, source.len());
            }
            other => panic!("Expected exit, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_declaration_leaves_cursor_and_journal_untouched() {
        let mut p = Parser::new(Lexer::new("int x = ;", Language::Cpp), ParserConfig::default());
        let before = p.checkpoint();
        assert_eq!(p.declaration(&DeclContext::default()), Err(ParseError::Backtrack));
        assert_eq!(p.cursor.mark(), before.mark);
        assert_eq!(p.journal.len(), before.events);

        let source = "int a; class A { int y; } x = ;";
        let mut p = Parser::new(Lexer::new(source, Language::Cpp), ParserConfig::default());
        assert_eq!(p.declaration(&DeclContext::default()), Ok(()));
        let before = p.checkpoint();
        assert_eq!(before.events, 1);
        assert_eq!(p.declaration(&DeclContext::default()), Err(ParseError::Backtrack));
        assert_eq!(p.cursor.mark(), before.mark);
        assert_eq!(p.journal.len(), before.events);
        assert!(matches!(p.classes.values().next(), Some(Some(_))), "the class body was parsed");
    }

    #[test]
    fn test_deep_nesting_is_reported_not_overflowed() {
        let nested = |depth: usize| format!("int x = {}1{}; int y;", "(".repeat(depth), ")".repeat(depth));

        let (unit, outcome) = parse_str(&nested(20));
        assert!(outcome.passed, "{:?}", outcome.errors);
        assert_eq!(unit.nodes.len(), 2);

        let (unit, outcome) = parse_str(&nested(10_000));
        assert!(!outcome.passed);
        assert!(
            outcome.errors.iter().any(|e| e.message.contains("nesting too deep")),
            "got: {:?}",
            outcome.errors
        );
        assert_eq!(unit.nodes.len(), 1);
        assert_eq!(simple(&unit.nodes[0]).declarator.declared_name().map(|n| n.text.as_str()), Some("y"));
    }

    #[test]
    fn test_broken_nested_classes_are_parsed_once_per_position() {
        let depth = 12;
        let mut source = String::new();
        for level in 0..depth {
            source.push_str(&format!("struct S{level} {{ "));
        }
        source.push_str("int x; ");
        for level in (0..depth).rev() {
            source.push_str(&format!("}} m{level} = ; "));
        }

        let mut p = Parser::new(Lexer::new(&source, Language::Cpp), ParserConfig::default());
        let mut events: Vec<SinkEvent> = Vec::new();
        p.translation_unit(&mut events);
        assert!(!p.passed);
        assert_eq!(p.first_error_offset, source.find("= ;").map(|at| at + 2));
        assert_eq!(p.classes.len(), depth);
    }

    #[test]
    fn test_parse_tokens_matches_parse_source() {
        let source = "namespace n { struct S { int a; }; }";
        let (tokens, lex_errors) = crate::lexer::lex(source, Language::Cpp);
        assert!(lex_errors.is_empty());
        let mut from_tokens = TreeBuilder::new();
        let outcome = parse_tokens(tokens, ParserConfig::default(), &mut from_tokens);
        assert!(outcome.passed);
        assert_eq!(from_tokens.finish(), parse_str(source).0);
    }
}
