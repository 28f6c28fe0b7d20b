use crate::error::{ChainFault, CompactError};
use crate::node::{NodeIndex, NodeKey};
use crate::subject::{SubjectIndex, SubjectKey};
use crate::term::Term;
use crate::vocab;
use ahash::AHashSet as HashSet;
use tracing::{trace, warn};

/// Keys of the vocabulary terms list detection needs, if they were ever seen.
struct ListVocab {
    first: NodeKey,
    rest: NodeKey,
    nil: Option<NodeKey>,
    rdf_type: Option<NodeKey>,
    list_class: Option<NodeKey>,
}

impl ListVocab {
    fn lookup(nodes: &NodeIndex) -> Option<Self> {
        let find = |uri: &str| nodes.find(&Term::uri(uri));
        Some(Self {
            first: find(vocab::RDF_FIRST)?,
            rest: find(vocab::RDF_REST)?,
            nil: find(vocab::RDF_NIL),
            rdf_type: find(vocab::RDF_TYPE),
            list_class: find(vocab::RDF_LIST),
        })
    }
}

/// What one detection run did.
#[derive(Debug, Default)]
pub(crate) struct ListOutcome {
    pub collapsed: usize,
    pub diagnostics: Vec<CompactError>,
}

/// Walks every `rdf:first`/`rdf:rest` chain and linearizes the well-formed ones.
///
/// A collapsed head gets the item sequence as its list view; its links are
/// invalidated. The head is invalidated too unless it is the root or is
/// referenced at least twice, in which case it keeps a top-level block. A
/// malformed chain marks every link it reached as explicit.
pub(crate) fn collapse_lists(
    nodes: &NodeIndex,
    subjects: &mut SubjectIndex,
    order: &[SubjectKey],
    root: Option<&Term>,
) -> ListOutcome {
    let mut outcome = ListOutcome::default();
    let Some(vocab) = ListVocab::lookup(nodes) else {
        return outcome;
    };

    let cells: Vec<SubjectKey> = order
        .iter()
        .copied()
        .filter(|&key| {
            let rec = &subjects[key];
            rec.group(vocab.first).is_some() || rec.group(vocab.rest).is_some()
        })
        .collect();

    // Nodes that continue some other cell's chain cannot start one
    let mut continuations: HashSet<NodeKey> = HashSet::default();
    for &key in &cells {
        let rec = &subjects[key];
        if let Some(group) = rec.group(vocab.rest) {
            continuations.extend(group.objects.iter().filter(|&&o| o != rec.node()));
        }
    }

    let mut visited: HashSet<SubjectKey> = HashSet::default();
    let mut starts: Vec<SubjectKey> = cells
        .iter()
        .copied()
        .filter(|&key| !continuations.contains(&subjects[key].node()))
        .collect();
    // Cells never reached from a head can only sit on a pure cycle
    starts.extend(cells.iter().copied());

    for head in starts {
        if visited.contains(&head) {
            continue;
        }
        match walk(nodes, subjects, &vocab, head, &mut visited) {
            Ok(chain) => apply(nodes, subjects, chain, root),
            Err((links, fault)) => {
                let err = CompactError::MalformedListChain {
                    head: nodes.term(subjects[head].node()).clone(),
                    fault,
                };
                warn!(%err, "list left uncollapsed");
                for link in links {
                    if let Some(rec) = subjects.get_mut(link) {
                        rec.force_explicit();
                    }
                }
                outcome.diagnostics.push(err);
            }
        }
    }
    outcome.collapsed = cells
        .iter()
        .filter(|&&key| subjects[key].list_items().is_some())
        .count();
    outcome
}

struct Chain {
    links: Vec<SubjectKey>,
    items: Vec<NodeKey>,
}

fn walk(
    nodes: &NodeIndex,
    subjects: &SubjectIndex,
    vocab: &ListVocab,
    head: SubjectKey,
    visited: &mut HashSet<SubjectKey>,
) -> Result<Chain, (Vec<SubjectKey>, ChainFault)> {
    let head_node = subjects[head].node();
    let mut links = Vec::new();
    let mut items = Vec::new();
    let mut seen: HashSet<NodeKey> = HashSet::default();
    let mut current = head_node;

    loop {
        if Some(current) == vocab.nil {
            break;
        }
        if !seen.insert(current) {
            return Err((links, ChainFault::Cycle));
        }
        let Some(key) = subjects.find(current) else {
            return Err((links, ChainFault::Unterminated));
        };
        visited.insert(key);
        links.push(key);

        let rec = &subjects[key];
        if !nodes.term(current).is_blank() {
            return Err((links, ChainFault::NotBlank));
        }
        if current != head_node && nodes[current].as_object_count() != 1 {
            return Err((links, ChainFault::Shared));
        }

        let firsts = rec.group(vocab.first).map_or(&[][..], |g| &g.objects[..]);
        let rests = rec.group(vocab.rest).map_or(&[][..], |g| &g.objects[..]);
        let (&item, &next) = match (firsts, rests) {
            ([item], [next]) => (item, next),
            ([_], other) => return Err((links, ChainFault::RestCount(other.len()))),
            (other, _) => return Err((links, ChainFault::FirstCount(other.len()))),
        };

        let extra = !rec.members().is_empty()
            || rec.properties().iter().any(|g| {
                let is_list_type = Some(g.predicate) == vocab.rdf_type
                    && g.objects.iter().all(|&o| Some(o) == vocab.list_class);
                g.predicate != vocab.first && g.predicate != vocab.rest && !is_list_type
            });
        if extra {
            return Err((links, ChainFault::ExtraProperties));
        }

        items.push(item);
        current = next;
    }

    trace!(links = links.len(), "list chain walked");
    Ok(Chain { links, items })
}

fn apply(
    nodes: &NodeIndex,
    subjects: &mut SubjectIndex,
    chain: Chain,
    root: Option<&Term>,
) {
    let Some((&head, rest)) = chain.links.split_first() else {
        return;
    };
    // A tail walked earlier from its own start loses its view to this head
    for &link in rest {
        if let Some(rec) = subjects.get_mut(link) {
            rec.absorb();
        }
    }
    let head_node = subjects[head].node();
    // Referenced once: nested at the reference. Unreferenced: the view
    // lives on the record only. Shared heads keep their own block.
    let absorbed =
        nodes[head_node].as_object_count() <= 1 && root != Some(nodes.term(head_node));
    if let Some(rec) = subjects.get_mut(head) {
        rec.set_list_items(chain.items);
        if absorbed {
            rec.invalidate();
        }
    }
}
