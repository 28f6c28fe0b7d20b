use crate::term::Term;
use thiserror::Error;

/// Why a list chain could not be linearized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainFault {
    /// A link has `first` triples other than exactly one.
    #[error("expected one rdf:first, found {0}")]
    FirstCount(usize),
    /// A link has `rest` triples other than exactly one.
    #[error("expected one rdf:rest, found {0}")]
    RestCount(usize),
    /// A link reappeared before `rdf:nil` was reached.
    #[error("cycle before rdf:nil")]
    Cycle,
    /// A link is not a blank node.
    #[error("link is not a blank node")]
    NotBlank,
    /// A link is referenced from somewhere other than its predecessor.
    #[error("link is referenced more than once")]
    Shared,
    /// A link carries properties besides `first`, `rest` and `rdf:type rdf:List`.
    #[error("link carries extra properties")]
    ExtraProperties,
    /// The chain ends in something that is neither a link nor `rdf:nil`.
    #[error("chain does not end in rdf:nil")]
    Unterminated,
}

/// Contract violations on the namespace scope stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// `exit_scope` did not match the innermost frame.
    #[error("unresolved scope: exit at depth {threshold}, innermost frame is {innermost:?}")]
    UnresolvedScope {
        threshold: u32,
        innermost: Option<u32>,
    },

    /// A frame or binding was requested shallower than the innermost frame.
    #[error("depth {depth} is shallower than the innermost frame at {innermost}")]
    DepthRegression { depth: u32, innermost: u32 },
}

/// Non-fatal conditions recorded during a compaction pass.
///
/// None of these stop the pass; each degrades the abbreviation of one
/// subject or reference and is kept as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompactError {
    #[error("malformed list chain at {head}: {fault}")]
    MalformedListChain { head: Term, fault: ChainFault },

    #[error("prefix {prefix:?} is bound to <{bound}>, cannot reuse it for <{candidate}>")]
    AmbiguousPrefix {
        prefix: String,
        bound: String,
        candidate: String,
    },

    #[error("{local:?} is not a legal local name in <{uri}>")]
    IllegalLocalName { uri: String, local: String },

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("triple in graph {found:?} does not belong to the pass graph {expected:?}")]
    ContextMismatch {
        expected: Option<Term>,
        found: Option<Term>,
    },
}
