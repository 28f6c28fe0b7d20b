use crate::config::CompactorConfig;
use crate::emit::{Emission, Emitter};
use crate::error::CompactError;
use crate::list::collapse_lists;
use crate::namespace::ScopeStack;
use crate::node::{Node, NodeIndex, NodeKey};
use crate::predicate::PredicateKind;
use crate::qname::QNameAllocator;
use crate::subject::{SubjectIndex, SubjectRecord};
use crate::term::{Term, Triple};
use ahash::AHashMap as HashMap;
use tracing::{debug, trace, warn};

/// Ingestion phase of one compaction pass.
///
/// Feed triples one at a time, then call [`Compactor::finish`] to run list
/// detection and obtain a read-only [`CompactedGraph`].
///
/// ```
/// use rdf_abbrev::{Compactor, QNameAllocator, ScopeStack, Term, Triple};
///
/// let mut compactor = Compactor::new();
/// compactor.push(Triple::new(
///     Term::uri("http://example.org/s"),
///     Term::uri("http://example.org/p"),
///     Term::literal("o"),
/// ))?;
///
/// let graph = compactor.finish();
/// let mut stack = ScopeStack::new();
/// stack.bind(Some("ex"), "http://example.org/", 0)?;
/// let emission = graph.emit(&mut stack, &mut QNameAllocator::default());
///
/// assert_eq!(emission.blocks.len(), 1);
/// assert_eq!(emission.blocks[0].properties[0].0.to_string(), "ex:p");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Compactor {
    config: CompactorConfig,
    nodes: NodeIndex,
    subjects: SubjectIndex,
    /// Classification cache, one entry per distinct predicate
    kinds: HashMap<NodeKey, PredicateKind>,
    /// Graph context of the pass, fixed by the first triple
    context: Option<Option<Term>>,
    triples: usize,
    duplicates: usize,
    diagnostics: Vec<CompactError>,
}

impl Compactor {
    pub fn new() -> Self {
        Self::with_config(CompactorConfig::default())
    }

    pub fn with_config(config: CompactorConfig) -> Self {
        Self {
            config,
            nodes: NodeIndex::new(),
            subjects: SubjectIndex::new(),
            kinds: HashMap::default(),
            context: None,
            triples: 0,
            duplicates: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn config(&self) -> &CompactorConfig {
        &self.config
    }

    /// Ingests one triple.
    ///
    /// A triple whose graph differs from the first one seen is not ingested;
    /// the mismatch is returned and kept as a diagnostic.
    pub fn push(&mut self, triple: Triple) -> Result<(), CompactError> {
        if self.context.is_none() {
            self.context = Some(triple.graph.clone());
        }
        if let Some(expected) = &self.context {
            if *expected != triple.graph {
                let err = CompactError::ContextMismatch {
                    expected: expected.clone(),
                    found: triple.graph,
                };
                warn!(%err, "skipping triple");
                self.diagnostics.push(err.clone());
                return Err(err);
            }
        }
        self.ingest(&triple.subject, &triple.predicate, &triple.object);
        Ok(())
    }

    /// Ingests every triple, skipping (and recording) context mismatches.
    pub fn extend<I: IntoIterator<Item = Triple>>(&mut self, triples: I) {
        for triple in triples {
            // Mismatches are already kept in the diagnostics
            let _ = self.push(triple);
        }
    }

    /// Ingests one `(subject, predicate, object)` statement of the pass graph.
    pub fn ingest(&mut self, subject: &Term, predicate: &Term, object: &Term) {
        let s = self.nodes.intern(subject);
        let p = self.nodes.intern(predicate);
        let o = self.nodes.intern(object);

        let mut kind = *self
            .kinds
            .entry(p)
            .or_insert_with(|| PredicateKind::classify(predicate));
        if matches!(kind, PredicateKind::Ordinal(_)) && !self.config.collapse_containers {
            kind = PredicateKind::Ordinary;
        }

        let key = self.subjects.lookup_or_create(s, &self.nodes);
        let added = match self.subjects.get_mut(key) {
            Some(rec) => rec.add(kind, p, o, self.config.duplicates),
            None => false,
        };

        self.triples += 1;
        if added {
            self.nodes.record_as_subject(s);
            self.nodes.record_as_object(o);
            trace!(?kind, %subject, %predicate, "ingested");
        } else {
            self.duplicates += 1;
            trace!(%subject, %predicate, %object, "duplicate dropped");
        }
    }

    /// Number of triples offered so far, duplicates included.
    pub fn len(&self) -> usize {
        self.triples
    }

    pub fn is_empty(&self) -> bool {
        self.triples == 0
    }

    pub fn nodes(&self) -> &NodeIndex {
        &self.nodes
    }

    pub fn subjects(&self) -> &SubjectIndex {
        &self.subjects
    }

    /// Ends ingestion and runs list detection.
    pub fn finish(mut self) -> CompactedGraph {
        let order = self.subjects.first_seen();
        let outcome = if self.config.collapse_lists {
            collapse_lists(
                &self.nodes,
                &mut self.subjects,
                &order,
                self.config.root.as_ref(),
            )
        } else {
            Default::default()
        };

        let stats = CompactionStats {
            triples: self.triples,
            duplicates_dropped: self.duplicates,
            nodes: self.nodes.len(),
            subjects: self.subjects.len(),
            lists_collapsed: outcome.collapsed,
            malformed_chains: outcome.diagnostics.len(),
        };
        debug!(?stats, "compaction finished");

        let mut diagnostics = self.diagnostics;
        diagnostics.extend(outcome.diagnostics);

        CompactedGraph {
            config: self.config,
            nodes: self.nodes,
            subjects: self.subjects,
            stats,
            diagnostics,
        }
    }
}

impl Default for Compactor {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters describing one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactionStats {
    /// Triples ingested, duplicates included
    pub triples: usize,
    /// Triples dropped by [`DuplicatePolicy::Collapse`](crate::DuplicatePolicy::Collapse)
    pub duplicates_dropped: usize,
    /// Distinct terms
    pub nodes: usize,
    /// Subject records
    pub subjects: usize,
    pub lists_collapsed: usize,
    pub malformed_chains: usize,
}

/// A sealed pass: indexes are frozen and list views are computed.
#[derive(Debug)]
pub struct CompactedGraph {
    pub(crate) config: CompactorConfig,
    pub(crate) nodes: NodeIndex,
    pub(crate) subjects: SubjectIndex,
    stats: CompactionStats,
    diagnostics: Vec<CompactError>,
}

impl CompactedGraph {
    pub fn stats(&self) -> CompactionStats {
        self.stats
    }

    /// Non-fatal problems met during ingestion and list detection.
    pub fn diagnostics(&self) -> &[CompactError] {
        &self.diagnostics
    }

    pub fn config(&self) -> &CompactorConfig {
        &self.config
    }

    pub fn nodes(&self) -> &NodeIndex {
        &self.nodes
    }

    pub fn subjects(&self) -> &SubjectIndex {
        &self.subjects
    }

    pub fn node(&self, term: &Term) -> Option<&Node> {
        self.nodes.find(term).map(|key| &self.nodes[key])
    }

    pub fn record(&self, term: &Term) -> Option<&SubjectRecord> {
        self.nodes
            .find(term)
            .and_then(|key| self.subjects.record_of(key))
    }

    /// True when `term` can be written nested inside the one triple that
    /// references it instead of as a standalone block.
    pub fn is_inline_eligible(&self, term: &Term) -> bool {
        self.nodes
            .find(term)
            .is_some_and(|key| self.inline_eligible(key))
    }

    pub(crate) fn inline_eligible(&self, key: NodeKey) -> bool {
        let node = &self.nodes[key];
        node.term().is_blank()
            && node.as_object_count() <= 1
            && self.config.root.as_ref() != Some(node.term())
            && !self
                .subjects
                .record_of(key)
                .is_some_and(SubjectRecord::is_explicit)
    }

    /// A fresh allocator minting with the configured prefix base.
    pub fn allocator(&self) -> QNameAllocator {
        QNameAllocator::new(self.config.mint_prefix.clone())
    }

    /// Produces the ordered subject blocks, resolving names against `stack`.
    ///
    /// Only the scope stack and the allocator are mutated; the graph itself
    /// is read-only here, so emitting twice yields the same blocks.
    pub fn emit(&self, stack: &mut ScopeStack, names: &mut QNameAllocator) -> Emission {
        Emitter::new(self, stack, names).run()
    }
}
