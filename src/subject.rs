use crate::config::DuplicatePolicy;
use crate::node::{NodeIndex, NodeKey};
use crate::predicate::PredicateKind;
use ahash::AHashMap as HashMap;
use slotmap::{new_key_type, SlotMap};
use std::cmp::Ordering;

new_key_type! {
    /// Stable handle to a [`SubjectRecord`].
    pub struct SubjectKey;
}

/// All objects seen for one predicate under one subject, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyGroup {
    pub predicate: NodeKey,
    pub objects: Vec<NodeKey>,
}

/// One container membership `rdf:_N` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Member {
    pub ordinal: u32,
    pub object: NodeKey,
}

/// Aggregated data for one subject node.
#[derive(Debug, Clone)]
pub struct SubjectRecord {
    node: NodeKey,
    type_node: Option<NodeKey>,
    /// Predicate groups in first-seen order
    properties: Vec<PropertyGroup>,
    /// Predicate -> position in `properties`
    group_index: HashMap<NodeKey, usize>,
    /// Sorted by ordinal, stable for equal ordinals
    members: Vec<Member>,
    list_items: Option<Vec<NodeKey>>,
    valid: bool,
    explicit: bool,
    seen: usize,
}

impl SubjectRecord {
    fn new(node: NodeKey, seen: usize) -> Self {
        Self {
            node,
            type_node: None,
            properties: Vec::new(),
            group_index: HashMap::default(),
            members: Vec::new(),
            list_items: None,
            valid: true,
            explicit: false,
            seen,
        }
    }

    pub fn node(&self) -> NodeKey {
        self.node
    }

    /// The last `rdf:type` object seen for this subject.
    pub fn type_node(&self) -> Option<NodeKey> {
        self.type_node
    }

    pub fn properties(&self) -> &[PropertyGroup] {
        &self.properties
    }

    pub fn group(&self, predicate: NodeKey) -> Option<&PropertyGroup> {
        self.group_index
            .get(&predicate)
            .map(|&slot| &self.properties[slot])
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// The linearized items if this subject heads a collapsed list.
    pub fn list_items(&self) -> Option<&[NodeKey]> {
        self.list_items.as_deref()
    }

    /// False once the record has been folded into a list view.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// True when the record must be emitted standalone with an identifier.
    pub fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// Position of this subject in ingestion order.
    pub fn first_seen(&self) -> usize {
        self.seen
    }

    /// Records one `(predicate, object)` pair according to its kind.
    ///
    /// Returns false when the duplicate policy dropped the pair.
    pub fn add(
        &mut self,
        kind: PredicateKind,
        predicate: NodeKey,
        object: NodeKey,
        duplicates: DuplicatePolicy,
    ) -> bool {
        match kind {
            PredicateKind::Ordinal(ordinal) => self.add_member(ordinal, object, duplicates),
            PredicateKind::Type => {
                let added = self.add_property(predicate, object, duplicates);
                self.type_node = Some(object);
                added
            }
            PredicateKind::ListFirst | PredicateKind::ListRest | PredicateKind::Ordinary => {
                self.add_property(predicate, object, duplicates)
            }
        }
    }

    fn add_property(
        &mut self,
        predicate: NodeKey,
        object: NodeKey,
        duplicates: DuplicatePolicy,
    ) -> bool {
        let slot = match self.group_index.get(&predicate) {
            Some(&slot) => slot,
            None => {
                self.properties.push(PropertyGroup {
                    predicate,
                    objects: Vec::new(),
                });
                let slot = self.properties.len() - 1;
                self.group_index.insert(predicate, slot);
                slot
            }
        };

        let objects = &mut self.properties[slot].objects;
        if duplicates == DuplicatePolicy::Collapse && objects.contains(&object) {
            return false;
        }
        objects.push(object);
        true
    }

    fn add_member(&mut self, ordinal: u32, object: NodeKey, duplicates: DuplicatePolicy) -> bool {
        if duplicates == DuplicatePolicy::Collapse
            && self
                .members
                .iter()
                .any(|m| m.ordinal == ordinal && m.object == object)
        {
            return false;
        }
        // Insert after every entry with the same ordinal to keep arrival order
        let at = self.members.partition_point(|m| m.ordinal <= ordinal);
        self.members.insert(at, Member { ordinal, object });
        true
    }

    pub(crate) fn set_list_items(&mut self, items: Vec<NodeKey>) {
        self.list_items = Some(items);
    }

    pub(crate) fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Folds this cell into an enclosing chain.
    pub(crate) fn absorb(&mut self) {
        self.valid = false;
        self.list_items = None;
    }

    pub(crate) fn force_explicit(&mut self) {
        self.explicit = true;
    }

    /// Orders two records by their subject terms.
    pub fn compare(&self, other: &SubjectRecord, nodes: &NodeIndex) -> Ordering {
        nodes.term(self.node).cmp(nodes.term(other.node))
    }
}

/// Subject records keyed by subject node.
///
/// Records are split into an ordinary (URI) partition and a blank partition,
/// each kept in first-seen order.
#[derive(Debug, Default)]
pub struct SubjectIndex {
    records: SlotMap<SubjectKey, SubjectRecord>,
    by_node: HashMap<NodeKey, SubjectKey>,
    ordinary: Vec<SubjectKey>,
    blanks: Vec<SubjectKey>,
}

impl SubjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for `node`, creating it if this is the first reference.
    pub fn lookup_or_create(&mut self, node: NodeKey, nodes: &NodeIndex) -> SubjectKey {
        if let Some(&key) = self.by_node.get(&node) {
            return key;
        }
        let seen = self.records.len();
        let key = self.records.insert(SubjectRecord::new(node, seen));
        self.by_node.insert(node, key);
        if nodes.term(node).is_blank() {
            self.blanks.push(key);
        } else {
            self.ordinary.push(key);
        }
        key
    }

    pub fn find(&self, node: NodeKey) -> Option<SubjectKey> {
        self.by_node.get(&node).copied()
    }

    pub fn get(&self, key: SubjectKey) -> Option<&SubjectRecord> {
        self.records.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: SubjectKey) -> Option<&mut SubjectRecord> {
        self.records.get_mut(key)
    }

    /// Record for `node`, if it was ever used as a subject.
    pub fn record_of(&self, node: NodeKey) -> Option<&SubjectRecord> {
        self.find(node).and_then(|key| self.records.get(key))
    }

    /// URI subjects in first-seen order.
    pub fn ordinary(&self) -> &[SubjectKey] {
        &self.ordinary
    }

    /// Blank subjects in first-seen order.
    pub fn blanks(&self) -> &[SubjectKey] {
        &self.blanks
    }

    /// All subjects in first-seen order, merging both partitions.
    pub fn first_seen(&self) -> Vec<SubjectKey> {
        let mut keys = Vec::with_capacity(self.records.len());
        let (mut i, mut j) = (0, 0);
        while i < self.ordinary.len() || j < self.blanks.len() {
            let take_ordinary = match (self.ordinary.get(i), self.blanks.get(j)) {
                (Some(&a), Some(&b)) => self.records[a].seen < self.records[b].seen,
                (Some(_), None) => true,
                _ => false,
            };
            if take_ordinary {
                keys.push(self.ordinary[i]);
                i += 1;
            } else {
                keys.push(self.blanks[j]);
                j += 1;
            }
        }
        keys
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl std::ops::Index<SubjectKey> for SubjectIndex {
    type Output = SubjectRecord;

    fn index(&self, key: SubjectKey) -> &SubjectRecord {
        &self.records[key]
    }
}
