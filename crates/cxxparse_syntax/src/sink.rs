//! The AST sink interface and the reference sinks.
//!
//! The parser reports constructs as they complete:
//! - `enter_scope` when a construct with a body starts (namespace, linkage, class, template, function),
//! - `accept` for each leaf declaration,
//! - `exit_scope` when the body ends, with the scope's ending offset assigned.
//!
//! Calls are always balanced and properly nested, and a sink never sees a construct from a speculative attempt that
//! was later rolled back.
//!
//! ## Notes
//! - [`TreeBuilder`] folds the event stream into a [`TranslationUnit`].
//! - `Vec<SinkEvent>` records the raw stream, which is handy in tests.

use crate::ast::{Declaration, Node, Scope, Spanned, TranslationUnit};

/// Receiver of parse results.
pub trait AstSink {
    /// A scope with a body begins. `scope.span.end` is not known yet.
    fn enter_scope(&mut self, scope: &Scope);
    /// The most recently entered scope ends.
    fn exit_scope(&mut self, scope: Scope);
    /// A leaf declaration completed.
    fn accept(&mut self, declaration: Spanned<Declaration>);
}

/// One sink notification.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Enter(Scope),
    Exit(Scope),
    Accept(Spanned<Declaration>),
}

impl AstSink for Vec<SinkEvent> {
    fn enter_scope(&mut self, scope: &Scope) {
        self.push(SinkEvent::Enter(scope.clone()));
    }

    fn exit_scope(&mut self, scope: Scope) {
        self.push(SinkEvent::Exit(scope));
    }

    fn accept(&mut self, declaration: Spanned<Declaration>) {
        self.push(SinkEvent::Accept(declaration));
    }
}

/// Builds a [`TranslationUnit`] tree from sink notifications.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    open: Vec<Vec<Node>>,
    root: Vec<Node>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a recorded event stream into nodes.
    pub fn from_events(events: impl IntoIterator<Item = SinkEvent>) -> Vec<Node> {
        let mut builder = TreeBuilder::new();
        for event in events {
            match event {
                SinkEvent::Enter(scope) => builder.enter_scope(&scope),
                SinkEvent::Exit(scope) => builder.exit_scope(scope),
                SinkEvent::Accept(decl) => builder.accept(decl),
            }
        }
        builder.finish().nodes
    }

    fn push(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(children) => children.push(node),
            None => self.root.push(node),
        }
    }

    /// Return the assembled tree.
    ///
    /// Children of scopes that were never exited are hoisted to the enclosing level.
    pub fn finish(mut self) -> TranslationUnit {
        while let Some(children) = self.open.pop() {
            for node in children {
                self.push(node);
            }
        }
        TranslationUnit { nodes: self.root }
    }
}

impl AstSink for TreeBuilder {
    fn enter_scope(&mut self, _scope: &Scope) {
        self.open.push(Vec::new());
    }

    fn exit_scope(&mut self, scope: Scope) {
        match self.open.pop() {
            Some(children) => self.push(Node::Scope { scope, children }),
            None => {
                tracing::warn!(start = scope.span.start, "exit_scope without a matching enter_scope");
                self.push(Node::Scope {
                    scope,
                    children: Vec::new(),
                });
            }
        }
    }

    fn accept(&mut self, declaration: Spanned<Declaration>) {
        self.push(Node::Declaration(declaration));
    }
}

/// Buffer of sink events that may still be rolled back.
///
/// Every parser checkpoint records the journal length; restoring the checkpoint truncates the journal. Events are
/// forwarded to the real sink only when no checkpoint is outstanding.
#[derive(Debug, Default)]
pub(crate) struct EventJournal {
    events: Vec<SinkEvent>,
    /// Scopes already forwarded to the sink and not yet exited.
    forwarded_open: Vec<Scope>,
}

impl EventJournal {
    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }

    pub(crate) fn push(&mut self, event: SinkEvent) {
        self.events.push(event);
    }

    /// Copies of the events recorded since `len`.
    pub(crate) fn events_since(&self, len: usize) -> Vec<SinkEvent> {
        self.events.get(len..).map(<[SinkEvent]>::to_vec).unwrap_or_default()
    }

    /// Remove and return the events recorded since `len`.
    pub(crate) fn split_off(&mut self, len: usize) -> Vec<SinkEvent> {
        self.events.split_off(len.min(self.events.len()))
    }

    /// Forward every buffered event to `sink`.
    pub(crate) fn flush(&mut self, sink: &mut dyn AstSink) {
        for event in self.events.drain(..) {
            match event {
                SinkEvent::Enter(scope) => {
                    sink.enter_scope(&scope);
                    self.forwarded_open.push(scope);
                }
                SinkEvent::Exit(scope) => {
                    self.forwarded_open.pop();
                    sink.exit_scope(scope);
                }
                SinkEvent::Accept(decl) => sink.accept(decl),
            }
        }
    }

    /// Exit every scope the sink still has open, innermost first, ending them at `end`.
    ///
    /// Returns how many scopes were closed.
    pub(crate) fn close_open_scopes(&mut self, sink: &mut dyn AstSink, end: usize) -> usize {
        let mut closed = 0;
        while let Some(mut scope) = self.forwarded_open.pop() {
            scope.span.end = end.max(scope.span.start);
            sink.exit_scope(scope);
            closed += 1;
        }
        closed
    }
}
