//! Golden snapshot tests for outlines
//!
//! These tests parse the C/C++ files in `tests/outline_fixtures/` and compare the rendered outline against
//! inline snapshots, so changes to what the parser reports are reviewed and intentional.
//!
//! Run with: `cargo test --test outline_snapshot_tests`
//! Review changes: `cargo insta review`

use cxxparse::outline::render_events;
use cxxparse::sink::SinkEvent;
use cxxparse::{Language, ParseMode, ParserConfig, render_outline};
use std::fs;

/// Load a fixture from the outline_fixtures directory
fn load_fixture(name: &str) -> String {
    let path = format!("tests/outline_fixtures/{name}");
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read fixture: {path}"))
}

/// Parse a fixture and render its outline, failing on syntax errors.
fn outline(name: &str, config: ParserConfig) -> String {
    let source = load_fixture(name);
    let (unit, outcome) = cxxparse::parser::parse_source(&source, config);
    assert!(outcome.passed, "{name} failed to parse: {:?}", outcome.errors);
    render_outline(&unit)
}

#[test]
fn test_geometry_outline() {
    insta::assert_snapshot!(outline("geometry.cpp", ParserConfig::new()), @r"
namespace geometry
  struct Point
    variable int x [public]
    variable int y [public]
  type struct Point
  class Shape : public Base
    function virtual double area() const = 0 [public]
    variable int id [private]
  type class Shape
  enum Color { Red, Green = 2 }
  type enum Color
  typedef unsigned long size_type
");
}

#[test]
fn test_function_bodies_are_parsed_in_complete_mode() {
    insta::assert_snapshot!(outline("functions.cpp", ParserConfig::new()), @r"
function int add(int a, int b) [2 statements]
template <class T>
  function T max(T a, T b)
");
}

#[test]
fn test_function_bodies_are_skipped_in_quick_mode() {
    let config = ParserConfig::new().with_mode(ParseMode::Quick);
    insta::assert_snapshot!(outline("functions.cpp", config), @r"
function int add(int a, int b) [body skipped]
template <class T>
  function T max(T a, T b)
");
}

#[test]
fn test_kr_definition_in_c() {
    let config = ParserConfig::new().with_language(Language::C);
    insta::assert_snapshot!(outline("legacy.c", config), @r"
function int twice(x) [1 statement]
variable static char buffer[64]
");
}

#[test]
fn test_event_stream_with_spans() {
    let mut events: Vec<SinkEvent> = Vec::new();
    let outcome = cxxparse::parser::parse("extern \"C\" { int f(void); }", ParserConfig::new(), &mut events);
    assert!(outcome.passed);
    insta::assert_snapshot!(render_events(&events), @r#"
enter extern "C" @0
  function int f(void) @13..25
exit extern "C" @0..27
"#);
}
