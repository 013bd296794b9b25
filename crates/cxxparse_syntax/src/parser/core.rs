/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type, its session state and the top-level `parse()` entrypoint, plus a few
/// small internal types shared across the other parser chunks.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a single module.
/// - Sink events go through an [`EventJournal`] first. A checkpoint records the journal length, so rolling back an
///   attempt also discards what it reported. Events reach the caller's sink between top-level declarations only.

/// Number of parses run by this process, used in the timing log line.
static PARSE_COUNT: AtomicUsize = AtomicUsize::new(0);

/// How many speculative attempts may be nested before the parser gives up on a construct.
///
/// Every recursive rule goes through `attempt`, so this bounds the recursion depth of the whole grammar.
const MAX_NESTING_DEPTH: usize = 200;

/// How a simple declaration resolves the constructor/function/variable ambiguity.
///
/// The strategies are tried in declaration order until one succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclStrategy {
    /// A name followed by `(` is a constructor; its parenthesized part is a parameter clause.
    TryConstructor,
    /// The parenthesized part is a parameter clause unless it can only be an expression.
    TryFunction,
    /// The parenthesized part is a constructor-style initializer.
    TryVariable,
}

/// Where a declaration is being parsed.
#[derive(Debug, Clone, Copy, Default)]
struct DeclContext<'c> {
    /// Current member access inside a class body.
    access: Option<Access>,
    /// Unqualified name of the enclosing class, used to spot constructors.
    class_name: Option<&'c str>,
}

/// Flags of one declaration-specifier sequence.
#[derive(Debug, Clone, Copy)]
struct SpecifierContext<'c> {
    /// Parsing a function or template parameter.
    parm: bool,
    /// Parsing an old-style (K&R) parameter declaration.
    for_kr: bool,
    strategy: DeclStrategy,
    decl: DeclContext<'c>,
}

/// A saved parser position: cursor mark plus journal length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Checkpoint {
    mark: Mark,
    events: usize,
}

/// A class specifier already parsed at some position, kept so other strategies can reuse it.
#[derive(Debug, Clone)]
struct ParsedClass {
    end: Mark,
    events: Vec<SinkEvent>,
    specifier: TypeSpecifier,
}

/// What a finished parse reports besides the sink events.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// `true` when no syntax error was recorded.
    pub passed: bool,
    /// Offset of the first recorded syntax error.
    pub first_error_offset: Option<usize>,
    pub errors: Vec<SyntaxError>,
    /// Lexical problems the token source skipped.
    pub lexer_errors: Vec<LexError>,
}

/// Parser state.
///
/// ## Notes
/// - One parser handles one translation unit; `parse()` consumes it.
/// - Grammar rules return [`ParseResult`]. A rule that fails with [`ParseError::Backtrack`] leaves the cursor and
///   the journal where it found them (see `attempt` in `helpers.rs`).
pub struct Parser<S> {
    cursor: TokenCursor<S>,
    config: ParserConfig,
    journal: EventJournal,
    errors: Vec<SyntaxError>,
    first_error_offset: Option<usize>,
    passed: bool,
    /// Depth of template parameter lists being parsed; `>` closes the list instead of comparing.
    template_params: usize,
    /// Number of `attempt` calls currently on the stack.
    depth: usize,
    /// Class specifiers by start position; `None` records a failed parse.
    classes: HashMap<Mark, Option<ParsedClass>>,
}

impl<S: TokenSource> Parser<S> {
    /// Create a parser reading from `source`.
    pub fn new(source: S, config: ParserConfig) -> Self {
        Self {
            cursor: TokenCursor::new(source),
            config,
            journal: EventJournal::default(),
            errors: Vec::new(),
            first_error_offset: None,
            passed: true,
            template_params: 0,
            depth: 0,
            classes: HashMap::new(),
        }
    }

    /// Parse the whole translation unit, reporting constructs to `sink`.
    ///
    /// The parse always runs to the end of input. Syntax errors are recovered from and summarized in the returned
    /// [`ParseOutcome`]; every scope the sink was told about is exited before this returns.
    pub fn parse(mut self, sink: &mut dyn AstSink) -> ParseOutcome {
        let started = Instant::now();

        self.translation_unit(sink);

        self.journal.flush(sink);
        let end = self.input_end();
        let closed = self.journal.close_open_scopes(sink, end);
        if closed > 0 {
            tracing::debug!(closed, "closed scopes left open at end of input");
        }

        let count = PARSE_COUNT.fetch_add(1, Ordering::Relaxed) + 1;
        let elapsed = started.elapsed().as_millis();
        if self.passed {
            tracing::debug!("Parse {count}: {elapsed}ms");
        } else {
            tracing::debug!("Parse {count}: {elapsed}ms - parse failure");
        }

        ParseOutcome {
            passed: self.passed,
            first_error_offset: self.first_error_offset,
            errors: self.errors,
            lexer_errors: self.cursor.take_lexer_errors(),
        }
    }

    /// End offset of the last token of the input.
    fn input_end(&mut self) -> usize {
        while !self.cursor.is_at_end() {
            if self.cursor.consume().is_err() {
                break;
            }
        }
        self.cursor.last_end()
    }
}
