//! Layering guardrails for the workspace crates.
//!
//! - `cxxparse_core` holds pure vocabulary tables and must stay dependency-free.
//! - `cxxparse_syntax` is a library: terminal rendering, argument parsing and subscriber setup belong to the CLI
//!   crate, so `miette`, `clap` and `tracing-subscriber` must not appear in its `[dependencies]`.

/// Collect the crate names listed in the `[dependencies]` table of a manifest.
fn main_dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            if line == "[dependencies]" {
                in_dependencies = true;
                continue;
            }
            // Any new section after `[dependencies]` ends the scan window.
            if in_dependencies {
                break;
            }
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_vocabulary_crate_has_no_dependencies() {
    let manifest = include_str!("../crates/cxxparse_core/Cargo.toml");
    let deps = main_dependencies(manifest);
    assert!(deps.is_empty(), "cxxparse_core must stay dependency-free, found {deps:?}");
}

#[test]
fn syntax_crate_does_not_depend_on_cli_stack() {
    let manifest = include_str!("../crates/cxxparse_syntax/Cargo.toml");
    let deps = main_dependencies(manifest);
    for forbidden in ["clap", "miette", "tracing-subscriber", "serde_json"] {
        assert!(
            !deps.iter().any(|d| d == forbidden),
            "`{forbidden}` must not appear in cxxparse_syntax [dependencies]; it belongs to the CLI crate"
        );
    }
    assert!(deps.iter().any(|d| d == "cxxparse_core"), "syntax crate should use the core registries");
}

#[test]
fn manifest_scan_stops_at_next_table() {
    let manifest = "[package]\nname = \"x\"\n\n[dependencies]\na = \"1\" # note\nb = { path = \"b\" }\n\n[dev-dependencies]\nc = \"1\"\n";
    assert_eq!(main_dependencies(manifest), vec!["a".to_string(), "b".to_string()]);
}
