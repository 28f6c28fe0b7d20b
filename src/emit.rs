use crate::compactor::CompactedGraph;
use crate::config::{EmissionOrder, MintPolicy};
use crate::error::CompactError;
use crate::namespace::{Namespace, ScopeStack};
use crate::node::NodeKey;
use crate::qname::{QName, QNameAllocator};
use crate::subject::SubjectKey;
use crate::term::Term;
use crate::vocab;
use ahash::AHashSet as HashSet;
use tracing::debug;

/// How a subject block is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Resource(QName),
    Blank(String),
}

/// One object position in a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectDescriptor {
    /// A resource, abbreviated when a binding applies.
    Resource(QName),
    /// A blank node written by label; it has or will get its own block.
    Blank(String),
    Literal {
        lexical: String,
        language: Option<String>,
        datatype: Option<QName>,
    },
    /// An inline-eligible subject written in place.
    Nested(Box<SubjectBlock>),
}

/// Everything a writer needs to serialize one subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectBlock {
    /// `None` for nested blocks and for unreferenced blank subjects.
    pub identifier: Option<Identifier>,
    pub type_qname: Option<QName>,
    /// Predicate groups in first-seen order, objects in arrival order.
    pub properties: Vec<(QName, Vec<ObjectDescriptor>)>,
    /// Container members by ascending ordinal.
    pub members: Vec<(u32, ObjectDescriptor)>,
    /// Items of a collapsed `rdf:first`/`rdf:rest` chain.
    pub list_view: Option<Vec<ObjectDescriptor>>,
}

impl SubjectBlock {
    /// Number of blocks nested anywhere below this one.
    pub fn nested_count(&self) -> usize {
        let objects = self
            .properties
            .iter()
            .flat_map(|(_, objects)| objects.iter())
            .chain(self.members.iter().map(|(_, object)| object))
            .chain(self.list_view.iter().flatten());
        objects
            .map(|object| match object {
                ObjectDescriptor::Nested(block) => 1 + block.nested_count(),
                _ => 0,
            })
            .sum()
    }
}

/// Output of [`CompactedGraph::emit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emission {
    /// Top-level blocks in emission order.
    pub blocks: Vec<SubjectBlock>,
    /// Synthetic bindings this emission added to the stack, for the
    /// document header. Includes earlier prefixes bound again.
    pub minted: Vec<Namespace>,
    /// Pass diagnostics followed by naming diagnostics.
    pub diagnostics: Vec<CompactError>,
}

impl Emission {
    pub fn nested_count(&self) -> usize {
        self.blocks.iter().map(SubjectBlock::nested_count).sum()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Predicate,
    Reference,
}

/// Builds blocks from a sealed graph.
pub(crate) struct Emitter<'a> {
    graph: &'a CompactedGraph,
    stack: &'a mut ScopeStack,
    names: &'a mut QNameAllocator,
    /// Subjects already written, nested or top-level
    placed: HashSet<NodeKey>,
    rdf_type: Option<NodeKey>,
    rdf_first: Option<NodeKey>,
    rdf_rest: Option<NodeKey>,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(
        graph: &'a CompactedGraph,
        stack: &'a mut ScopeStack,
        names: &'a mut QNameAllocator,
    ) -> Self {
        let find = |uri: &str| graph.nodes.find(&Term::uri(uri));
        Self {
            graph,
            stack,
            names,
            placed: HashSet::default(),
            rdf_type: find(vocab::RDF_TYPE),
            rdf_first: find(vocab::RDF_FIRST),
            rdf_rest: find(vocab::RDF_REST),
        }
    }

    pub(crate) fn run(mut self) -> Emission {
        let graph = self.graph;
        let bound_before = self.names.bindings().len();
        let subjects = &graph.subjects;
        let order: Vec<SubjectKey> = match graph.config.order {
            EmissionOrder::FirstSeen => subjects.first_seen(),
            EmissionOrder::ResourcesFirst => subjects
                .ordinary()
                .iter()
                .chain(subjects.blanks())
                .copied()
                .collect(),
        };

        let mut blocks = Vec::new();
        for &key in &order {
            let rec = &subjects[key];
            let node = rec.node();
            if !rec.is_valid() || self.placed.contains(&node) || self.nests(node) {
                continue;
            }
            blocks.push(self.top_level(key));
        }

        // Once-referenced subjects whose referrer was never written: cycles
        // of blank nodes, or a list head referenced from inside its own list.
        // An unreferenced collapsed head has no block of its own.
        for &key in &order {
            let rec = &subjects[key];
            let node = rec.node();
            let writable = rec.is_valid()
                || (rec.list_items().is_some() && graph.nodes[node].as_object_count() > 0);
            if writable && !self.placed.contains(&node) {
                debug!(subject = %graph.nodes.term(node), "writing unreached subject");
                blocks.push(self.top_level(key));
            }
        }

        let mut diagnostics = graph.diagnostics().to_vec();
        diagnostics.extend(self.names.take_diagnostics());
        let minted = self.names.bindings()[bound_before..].to_vec();
        debug!(blocks = blocks.len(), minted = minted.len(), "emission built");

        Emission {
            blocks,
            minted,
            diagnostics,
        }
    }

    /// Whether `node` will be written nested at its single reference.
    fn nests(&self, node: NodeKey) -> bool {
        self.graph.inline_eligible(node) && self.graph.nodes[node].as_object_count() == 1
    }

    fn top_level(&mut self, key: SubjectKey) -> SubjectBlock {
        let graph = self.graph;
        let rec = &graph.subjects[key];
        let node = &graph.nodes[rec.node()];
        let identifier = match node.term() {
            Term::Uri(uri) => Some(Identifier::Resource(self.name(uri, Role::Reference))),
            Term::Blank(label) => {
                let referenced = node.as_object_count() > 0
                    || rec.is_explicit()
                    || graph.config.root.as_ref() == Some(node.term());
                referenced.then(|| Identifier::Blank(label.clone()))
            }
            literal => Some(Identifier::Resource(QName::full(&literal.to_string()))),
        };
        let mut block = self.block(key);
        block.identifier = identifier;
        block
    }

    fn block(&mut self, key: SubjectKey) -> SubjectBlock {
        let graph = self.graph;
        let rec = &graph.subjects[key];
        self.placed.insert(rec.node());

        let mut block = SubjectBlock::default();
        let is_list = rec.list_items().is_some();

        // Lift one rdf:type occurrence into the block header
        let mut lifted = rec
            .type_node()
            .filter(|&t| graph.nodes.term(t).is_uri());
        if let Some(type_node) = lifted {
            if let Some(uri) = graph.nodes.term(type_node).as_uri() {
                block.type_qname = Some(self.name(uri, Role::Predicate));
            }
        }

        for group in rec.properties() {
            let predicate = Some(group.predicate);
            if is_list && (predicate == self.rdf_first || predicate == self.rdf_rest) {
                continue;
            }
            let mut objects = Vec::with_capacity(group.objects.len());
            for &object in &group.objects {
                if predicate == self.rdf_type && lifted == Some(object) {
                    lifted = None;
                    continue;
                }
                objects.push(self.describe(object));
            }
            if objects.is_empty() {
                continue;
            }
            let name = match graph.nodes.term(group.predicate) {
                Term::Uri(uri) => self.name(uri, Role::Predicate),
                other => QName::full(&other.to_string()),
            };
            block.properties.push((name, objects));
        }

        for member in rec.members() {
            let object = self.describe(member.object);
            block.members.push((member.ordinal, object));
        }

        if let Some(items) = rec.list_items() {
            let view = items.iter().map(|&item| self.describe(item)).collect();
            block.list_view = Some(view);
        }
        block
    }

    fn describe(&mut self, object: NodeKey) -> ObjectDescriptor {
        let graph = self.graph;
        match graph.nodes.term(object) {
            Term::Uri(uri) => ObjectDescriptor::Resource(self.name(uri, Role::Reference)),
            Term::Literal(lit) => ObjectDescriptor::Literal {
                lexical: lit.lexical.clone(),
                language: lit.language.clone(),
                datatype: lit
                    .datatype
                    .as_deref()
                    .map(|dt| self.name(dt, Role::Reference)),
            },
            Term::Blank(label) => {
                if !self.nests(object) || self.placed.contains(&object) {
                    return ObjectDescriptor::Blank(label.clone());
                }
                match graph.subjects.find(object) {
                    Some(key) => {
                        let rec = &graph.subjects[key];
                        if rec.is_valid() || rec.list_items().is_some() {
                            ObjectDescriptor::Nested(Box::new(self.block(key)))
                        } else {
                            ObjectDescriptor::Blank(label.clone())
                        }
                    }
                    None => {
                        // Never used as a subject: an empty anonymous node
                        self.placed.insert(object);
                        ObjectDescriptor::Nested(Box::default())
                    }
                }
            }
        }
    }

    fn name(&mut self, uri: &str, role: Role) -> QName {
        let allow_auto = match self.graph.config.mint {
            MintPolicy::Never => false,
            MintPolicy::Predicates => role == Role::Predicate,
            MintPolicy::Everywhere => true,
        };
        self.names.to_qname(self.stack, uri, allow_auto)
    }
}
