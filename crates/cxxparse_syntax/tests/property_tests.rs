//! Property-based tests for the parser
//!
//! These tests use proptest to check invariants across many randomly generated inputs, catching edge cases that
//! hand-written tests might miss: arbitrary token soup must never panic or unbalance the sink, parsing must be
//! deterministic, and printed expressions must reparse to the same text.

use std::mem;

use cxxparse_syntax::ast::{Declaration, Node};
use cxxparse_syntax::printer::print_initializer;
use cxxparse_syntax::sink::SinkEvent;
use cxxparse_syntax::{ParseMode, ParserConfig, parse, parse_source};
use proptest::prelude::*;

/// Source fragments that exercise most grammar entry points when shuffled together.
const FRAGMENTS: &[&str] = &[
    "int", "char", "x", "y", "T", "Foo", "::", "<", ">", ">>", "(", ")", "{", "}", "[", "]", ";", ",", "=", "*", "&",
    "~", ":", "?", "+", "-", "...", "1", "2.5", "'c'", "\"s\"", "class", "struct", "enum", "namespace", "template",
    "typename", "typedef", "extern \"C\"", "operator", "const", "virtual", "public", "using", "return", "if", "else",
    "for", "while", "new", "delete", "sizeof", "try", "catch", "throw",
];

fn fragment_soup() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40).prop_map(|parts| parts.join(" "))
}

fn config_strategy() -> impl Strategy<Value = ParserConfig> {
    prop_oneof![Just(ParseMode::Complete), Just(ParseMode::Quick)].prop_map(|mode| ParserConfig::new().with_mode(mode))
}

/// Expressions built from a small grammar, printed with ordinary spacing.
fn expression_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof!["[a-e]", "[0-9]{1,3}"];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(&["+", "-", "*", "/", "<", "==", "&&", "||", "<<"][..]), inner.clone())
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.clone().prop_map(|e| format!("({e})")),
            inner.clone().prop_map(|e| format!("-{e}")),
            inner.clone().prop_map(|e| format!("f({e})")),
            (inner.clone(), inner.clone(), inner).prop_map(|(c, a, b)| format!("{c} ? {a} : {b}")),
        ]
    })
}

/// The printed initializer of the first declaration, if it has one.
fn first_initializer(nodes: &[Node]) -> Option<String> {
    match nodes.first()? {
        Node::Declaration(declaration) => match &declaration.node {
            Declaration::Simple(simple) => simple.declarator.initializer.as_ref().map(print_initializer),
            _ => None,
        },
        Node::Scope { .. } => None,
    }
}

// =============================================================================
// Robustness
// =============================================================================

#[cfg(test)]
mod robustness {
    use super::*;

    proptest! {
        /// Property: any token sequence parses without panicking, and the sink sees balanced, properly nested scopes
        #[test]
        fn sink_events_are_balanced(source in fragment_soup(), config in config_strategy()) {
            let mut events: Vec<SinkEvent> = Vec::new();
            let outcome = parse(&source, config, &mut events);

            let mut open = Vec::new();
            for event in &events {
                match event {
                    SinkEvent::Enter(scope) => open.push(mem::discriminant(&scope.kind)),
                    SinkEvent::Exit(scope) => {
                        let entered = open.pop();
                        prop_assert_eq!(entered, Some(mem::discriminant(&scope.kind)));
                        prop_assert!(scope.span.start <= scope.span.end);
                        prop_assert!(scope.span.end <= source.len());
                    }
                    SinkEvent::Accept(declaration) => {
                        prop_assert!(declaration.span.end <= source.len());
                    }
                }
            }
            prop_assert!(open.is_empty(), "unclosed scopes for {:?}", source);

            prop_assert_eq!(outcome.passed, outcome.errors.is_empty());
            prop_assert_eq!(outcome.passed, outcome.first_error_offset.is_none());
            if let Some(offset) = outcome.first_error_offset {
                prop_assert!(offset <= source.len());
            }
        }

        /// Property: parsing the same input twice reports exactly the same thing
        #[test]
        fn parsing_is_deterministic(source in fragment_soup(), config in config_strategy()) {
            let mut first: Vec<SinkEvent> = Vec::new();
            let mut second: Vec<SinkEvent> = Vec::new();
            let outcome1 = parse(&source, config, &mut first);
            let outcome2 = parse(&source, config, &mut second);
            prop_assert_eq!(first, second);
            prop_assert_eq!(outcome1, outcome2);
        }
    }
}

// =============================================================================
// Expressions
// =============================================================================

#[cfg(test)]
mod expressions {
    use super::*;

    proptest! {
        /// Property: a printed initializer reparses to the same printed text
        #[test]
        fn printed_initializers_reparse_identically(expr in expression_strategy()) {
            let source = format!("int v = {expr};");
            let (unit, outcome) = parse_source(&source, ParserConfig::new());
            prop_assume!(outcome.passed);
            let printed = first_initializer(&unit.nodes);
            prop_assert!(printed.is_some(), "no initializer for {}", source);
            let printed = printed.unwrap_or_default();

            let reparsed_source = format!("int v {printed};");
            let (reparsed, outcome) = parse_source(&reparsed_source, ParserConfig::new());
            prop_assert!(outcome.passed, "printed form failed to parse: {}", reparsed_source);
            prop_assert_eq!(first_initializer(&reparsed.nodes), Some(printed));
        }
    }

    #[test]
    fn simple_sum_round_trips() {
        let (unit, outcome) = parse_source("int v = a + b * 2;", ParserConfig::new());
        assert!(outcome.passed);
        assert_eq!(first_initializer(&unit.nodes).as_deref(), Some("= a + b * 2"));
    }
}
