//! Diagnostic rendering for the CLI.
//!
//! Parser and lexer problems carry byte spans into the source. This module wraps them as [`miette`] diagnostics so
//! they print with a source snippet and a label under the offending token.

use std::fmt;

use cxxparse_syntax::ast::Span;
use cxxparse_syntax::diagnostics::{LexError, SyntaxError};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use thiserror::Error;

/// One recorded problem, ready to render.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SourceDiagnostic {
    message: String,
    source_code: NamedSource<String>,
    span: SourceSpan,
    label: String,
    help: Option<String>,
    code: &'static str,
}

impl Diagnostic for SourceDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help.as_ref().map(|help| Box::new(help) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source_code)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.label.clone()), self.span);
        Some(Box::new(std::iter::once(label)))
    }
}

impl SourceDiagnostic {
    fn new(file: &str, source: &str, code: &'static str, message: &str, span: Span) -> Self {
        let start = span.start.min(source.len());
        let len = span.len().min(source.len() - start);
        Self {
            message: message.to_string(),
            source_code: NamedSource::new(file, source.to_string()),
            span: SourceSpan::from((start, len)),
            label: "here".to_string(),
            help: None,
            code,
        }
    }

    /// A syntax error recorded by the parser. Its notes become the label and help text.
    pub fn syntax(file: &str, source: &str, error: &SyntaxError) -> Self {
        let mut diagnostic = Self::new(file, source, "cxxparse::syntax", &error.message, error.span);
        if let Some((first, rest)) = error.notes.split_first() {
            diagnostic.label = first.clone();
            if !rest.is_empty() {
                diagnostic.help = Some(rest.join("\n"));
            }
        }
        diagnostic
    }

    /// A lexical problem the lexer skipped.
    pub fn lex(file: &str, source: &str, error: &LexError) -> Self {
        Self::new(file, source, "cxxparse::lex", &error.message, error.span)
    }
}

/// Render diagnostics as plain text (no color), one after another.
pub fn render(diagnostics: &[SourceDiagnostic]) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    let mut out = String::new();
    for diagnostic in diagnostics {
        if handler.render_report(&mut out, diagnostic).is_err() {
            out.push_str(&diagnostic.message);
            out.push('\n');
        }
    }
    out
}

/// Render every lexer and syntax problem of one file.
pub fn render_problems(file: &str, source: &str, lex_errors: &[LexError], syntax_errors: &[SyntaxError]) -> String {
    let diagnostics: Vec<SourceDiagnostic> = lex_errors
        .iter()
        .map(|e| SourceDiagnostic::lex(file, source, e))
        .chain(syntax_errors.iter().map(|e| SourceDiagnostic::syntax(file, source, e)))
        .collect();
    render(&diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_diagnostic_mentions_message_and_file() {
        let source = "int x = ;\n";
        let error = SyntaxError::new("expected a declaration", Span::new(8, 9)).with_note("found `;`");
        let text = render_problems("demo.cpp", source, &[], &[error]);
        assert!(text.contains("expected a declaration"), "{text}");
        assert!(text.contains("demo.cpp"), "{text}");
        assert!(text.contains("found `;`"), "{text}");
    }

    #[test]
    fn test_span_past_end_is_clamped() {
        let source = "namespace a {";
        let error = SyntaxError::new("unexpected end of input", Span::new(40, 40));
        let diagnostic = SourceDiagnostic::syntax("eof.cpp", source, &error);
        assert_eq!(diagnostic.span.offset(), source.len());
        assert_eq!(diagnostic.span.len(), 0);
    }
}
