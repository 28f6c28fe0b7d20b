use crate::term::Term;
use slotmap::{new_key_type, SlotMap};
use std::collections::BTreeMap;
use std::sync::Arc;

new_key_type! {
    /// Stable handle to an interned [`Node`].
    pub struct NodeKey;
}

/// An interned term together with its occurrence counters.
///
/// The term is shared with the [`NodeIndex`] lookup table, which is the only
/// place that decides uniqueness.
#[derive(Debug, Clone)]
pub struct Node {
    term: Arc<Term>,
    as_subject: u32,
    as_object: u32,
}

impl Node {
    fn new(term: Arc<Term>) -> Self {
        Self {
            term,
            as_subject: 0,
            as_object: 0,
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    /// Number of ingested triples using this term as subject.
    pub fn as_subject_count(&self) -> u32 {
        self.as_subject
    }

    /// Number of ingested triples using this term as object.
    pub fn as_object_count(&self) -> u32 {
        self.as_object
    }
}

/// Interning table: one [`Node`] per distinct [`Term`] for one compaction pass.
///
/// Nodes live in a slot map and are addressed by [`NodeKey`] everywhere else.
/// There is no removal; the whole index is dropped with the pass.
#[derive(Debug, Default)]
pub struct NodeIndex {
    nodes: SlotMap<NodeKey, Node>,
    by_term: BTreeMap<Arc<Term>, NodeKey>,
}

impl NodeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node for `term`, creating it with zero counters if absent.
    pub fn intern(&mut self, term: &Term) -> NodeKey {
        if let Some(&key) = self.by_term.get(term) {
            return key;
        }
        let term = Arc::new(term.clone());
        let key = self.nodes.insert(Node::new(Arc::clone(&term)));
        self.by_term.insert(term, key);
        key
    }

    /// Looks up a term without interning it.
    pub fn find(&self, term: &Term) -> Option<NodeKey> {
        self.by_term.get(term).copied()
    }

    pub fn record_as_subject(&mut self, key: NodeKey) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.as_subject = node.as_subject.saturating_add(1);
        }
    }

    pub fn record_as_object(&mut self, key: NodeKey) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.as_object = node.as_object.saturating_add(1);
        }
    }

    pub fn get(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Returns the term of `key`.
    ///
    /// Keys are only handed out by this index and never removed, so a miss
    /// means the key came from a different pass.
    pub fn term(&self, key: NodeKey) -> &Term {
        self.nodes[key].term()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in term order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.by_term.values().map(move |&key| (key, &self.nodes[key]))
    }
}

impl std::ops::Index<NodeKey> for NodeIndex {
    type Output = Node;

    fn index(&self, key: NodeKey) -> &Node {
        &self.nodes[key]
    }
}
