//! # rdf-abbrev - Abbreviated RDF Graph Compaction
//!
//! Turns an unordered stream of RDF triples into ordered, nested subject
//! blocks ready for an abbreviating writer (Turtle-style or nested-element
//! XML), and turns absolute URIs into short qualified names against a stack
//! of scoped namespace bindings.
//!
//! A pass has two phases:
//! 1. **Ingestion**: [`Compactor`] interns terms, counts subject/object
//!    occurrences and groups properties per subject.
//! 2. **Emission**: [`Compactor::finish`] collapses `rdf:first`/`rdf:rest`
//!    chains into list views; [`CompactedGraph::emit`] then decides which
//!    blank nodes nest in place and orders the top-level blocks.
//!
//! ## Example
//!
//! ```
//! use rdf_abbrev::{Compactor, ObjectDescriptor, ScopeStack, Term};
//!
//! let ex = |s: &str| Term::uri(format!("http://example.org/{s}"));
//! let mut compactor = Compactor::new();
//! compactor.ingest(&ex("alice"), &ex("knows"), &Term::blank("b"));
//! compactor.ingest(&Term::blank("b"), &ex("name"), &Term::literal("Bob"));
//!
//! let graph = compactor.finish();
//! let mut stack = ScopeStack::with_standard_namespaces();
//! stack.bind(Some("ex"), "http://example.org/", 0).unwrap();
//! let emission = graph.emit(&mut stack, &mut graph.allocator());
//!
//! // `_:b` is referenced once, so it is written inside alice's block
//! assert_eq!(emission.blocks.len(), 1);
//! let (predicate, objects) = &emission.blocks[0].properties[0];
//! assert_eq!(predicate.to_string(), "ex:knows");
//! assert!(matches!(objects[0], ObjectDescriptor::Nested(_)));
//! ```
//!
//! ## Determinism
//!
//! Subjects are emitted in first-seen order, predicate groups in first-seen
//! order and objects in arrival order, so the same triple sequence always
//! produces the same blocks and the same minted prefixes.

mod compactor;
mod config;
mod emit;
mod error;
mod list;
mod namespace;
mod node;
#[cfg(feature = "oxrdf")]
mod oxrdf_compat;
mod predicate;
mod qname;
mod subject;
mod term;
pub mod vocab;

#[cfg(test)]
mod tests;

pub use compactor::{CompactedGraph, CompactionStats, Compactor};
pub use config::{CompactorConfig, DuplicatePolicy, EmissionOrder, MintPolicy};
pub use emit::{Emission, Identifier, ObjectDescriptor, SubjectBlock};
pub use error::{ChainFault, CompactError, ScopeError};
pub use namespace::{Namespace, ScopeFrame, ScopeStack};
pub use node::{Node, NodeIndex, NodeKey};
pub use predicate::PredicateKind;
pub use qname::{is_name_token, QName, QNameAllocator};
pub use subject::{Member, PropertyGroup, SubjectIndex, SubjectKey, SubjectRecord};
pub use term::{Literal, Term, Triple};
