/// Parse `source` and report its constructs to `sink`.
///
/// This is the main public entrypoint for parsing.
///
/// ## Parameters
/// - `source`: The text of one translation unit, after preprocessing. Directive lines are skipped.
/// - `config`: Language dialect and quick/complete mode.
/// - `sink`: Receives scope and declaration events in source order.
///
/// ## Returns
/// A [`ParseOutcome`] with the pass/fail flag, the first error offset and every recorded problem. The parse never
/// stops early: malformed declarations are skipped.
#[tracing::instrument(skip_all, fields(language = ?config.language, mode = ?config.mode, len = source.len()))]
pub fn parse(source: &str, config: ParserConfig, sink: &mut dyn AstSink) -> ParseOutcome {
    Parser::new(Lexer::new(source, config.language), config).parse(sink)
}

/// Parse `source` into a [`TranslationUnit`] using a [`TreeBuilder`] sink.
pub fn parse_source(source: &str, config: ParserConfig) -> (TranslationUnit, ParseOutcome) {
    let mut builder = TreeBuilder::new();
    let outcome = parse(source, config, &mut builder);
    (builder.finish(), outcome)
}

/// Parse an already lexed token stream.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_tokens(tokens: Vec<Token>, config: ParserConfig, sink: &mut dyn AstSink) -> ParseOutcome {
    Parser::new(VecSource::from(tokens), config).parse(sink)
}
