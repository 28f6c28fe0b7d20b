use crate::compactor::{CompactedGraph, Compactor};
use crate::emit::{Emission, Identifier, ObjectDescriptor, SubjectBlock};
use crate::namespace::ScopeStack;
use crate::term::Term;
use crate::vocab;
use proptest::prelude::*;

/// Small vocabulary so generated graphs share nodes, reuse predicates and
/// hit the list and container paths.
fn term_from(byte: u8) -> Term {
    match byte % 12 {
        0..=3 => Term::blank(format!("b{}", byte % 4)),
        4..=6 => Term::uri(format!("http://example.org/r{}", byte % 3)),
        7 => Term::uri(vocab::RDF_NIL),
        _ => Term::literal(format!("v{}", byte % 4)),
    }
}

fn predicate_from(byte: u8) -> Term {
    match byte % 8 {
        0 => Term::uri(vocab::RDF_FIRST),
        1 => Term::uri(vocab::RDF_REST),
        2 => Term::uri(vocab::RDF_TYPE),
        3 => Term::uri(vocab::ordinal_uri(u32::from(byte % 3) + 1)),
        n => Term::uri(format!("http://example.org/p{n}")),
    }
}

/// Subjects are never literals here; objects may be anything.
fn graph_from(bytes: &[u8]) -> Compactor {
    let mut compactor = Compactor::new();
    for chunk in bytes.chunks_exact(3) {
        let subject = match term_from(chunk[0]) {
            Term::Literal(_) => Term::blank(format!("b{}", chunk[0] % 4)),
            other => other,
        };
        compactor.ingest(&subject, &predicate_from(chunk[1]), &term_from(chunk[2]));
    }
    compactor
}

fn ex_stack() -> ScopeStack {
    let mut stack = ScopeStack::with_standard_namespaces();
    stack.bind(Some("ex"), "http://example.org/", 0).unwrap();
    stack
}

fn emit(graph: &CompactedGraph) -> Emission {
    graph.emit(&mut ex_stack(), &mut graph.allocator())
}

/// Counts every object position a writer would produce, list cells
/// expanded back into their first/rest triples.
fn triples_written(block: &SubjectBlock) -> usize {
    let mut count = usize::from(block.type_qname.is_some());
    let objects = block
        .properties
        .iter()
        .flat_map(|(_, objects)| objects.iter())
        .chain(block.members.iter().map(|(_, object)| object));
    for object in objects {
        count += 1;
        if let ObjectDescriptor::Nested(inner) = object {
            count += triples_written(inner);
        }
    }
    if let Some(items) = &block.list_view {
        count += 2 * items.len();
        for item in items {
            if let ObjectDescriptor::Nested(inner) = item {
                count += triples_written(inner);
            }
        }
    }
    count
}

/// Triples held only by the list view of an unreferenced collapsed head:
/// the head's own groups plus one first/rest pair per further cell.
fn unwritten_list_triples(graph: &CompactedGraph) -> usize {
    graph
        .subjects()
        .first_seen()
        .into_iter()
        .map(|key| &graph.subjects()[key])
        .filter(|rec| !rec.is_valid() && graph.nodes()[rec.node()].as_object_count() == 0)
        .filter_map(|rec| {
            let items = rec.list_items()?;
            let own: usize = rec.properties().iter().map(|g| g.objects.len()).sum();
            Some(own + 2 * items.len().saturating_sub(1))
        })
        .sum()
}

fn blank_identifiers(emission: &Emission) -> Vec<String> {
    emission
        .blocks
        .iter()
        .filter_map(|block| match &block.identifier {
            Some(Identifier::Blank(label)) => Some(label.clone()),
            _ => None,
        })
        .collect()
}

proptest! {
    /// Every ingested statement shows up exactly once in the output, except
    /// the cells of a list nothing refers to, which live in its list view.
    #[test]
    fn prop_no_triple_dropped(bytes in prop::collection::vec(any::<u8>(), 0..90)) {
        let graph = graph_from(&bytes).finish();
        let emission = emit(&graph);

        let written: usize = emission.blocks.iter().map(triples_written).sum();
        prop_assert_eq!(written + unwritten_list_triples(&graph), graph.stats().triples);
    }

    /// The same input always yields the same blocks and prefixes.
    #[test]
    fn prop_deterministic(bytes in prop::collection::vec(any::<u8>(), 0..90)) {
        let first = emit(&graph_from(&bytes).finish());
        let second = emit(&graph_from(&bytes).finish());
        prop_assert_eq!(first, second);
    }

    /// A blank node is written top-level at most once.
    #[test]
    fn prop_single_placement(bytes in prop::collection::vec(any::<u8>(), 0..90)) {
        let emission = emit(&graph_from(&bytes).finish());
        let mut labels = blank_identifiers(&emission);
        let total = labels.len();
        labels.sort();
        labels.dedup();
        prop_assert_eq!(labels.len(), total);
    }

    /// A blank node referenced more than once always has its own labelled block.
    #[test]
    fn prop_shared_blanks_are_labelled(bytes in prop::collection::vec(any::<u8>(), 0..90)) {
        let graph = graph_from(&bytes).finish();
        let emission = emit(&graph);
        let labels = blank_identifiers(&emission);

        for rec in graph.subjects().first_seen().into_iter().map(|k| &graph.subjects()[k]) {
            let node = &graph.nodes()[rec.node()];
            if let Term::Blank(label) = node.term() {
                if node.as_object_count() > 1 && rec.is_valid() {
                    prop_assert!(labels.contains(label), "{} has no block", label);
                }
            }
        }
    }

    /// Counters match the triples that were fed in.
    #[test]
    fn prop_counters_sum(bytes in prop::collection::vec(any::<u8>(), 0..90)) {
        let graph = graph_from(&bytes).finish();
        let (subjects, objects) = graph
            .nodes()
            .iter()
            .fold((0, 0), |(s, o), (_, node)| {
                (s + node.as_subject_count() as usize, o + node.as_object_count() as usize)
            });
        prop_assert_eq!(subjects, graph.stats().triples);
        prop_assert_eq!(objects, graph.stats().triples);
    }
}

/// Bolero fuzz test: compaction never panics on arbitrary input
#[cfg(test)]
#[test]
fn fuzz_no_panic() {
    bolero::check!().with_type::<Vec<u8>>().for_each(|input| {
        let graph = graph_from(input).finish();
        let emission = emit(&graph);

        let written: usize = emission.blocks.iter().map(triples_written).sum();
        assert_eq!(written + unwritten_list_triples(&graph), graph.stats().triples);
    });
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    fn ex(local: &str) -> Term {
        Term::uri(format!("http://example.org/{local}"))
    }

    #[test]
    fn test_shared_blank_written_once() {
        let mut c = Compactor::new();
        c.ingest(&ex("s"), &ex("p"), &Term::blank("n"));
        c.ingest(&ex("t"), &ex("p"), &Term::blank("n"));
        c.ingest(&Term::blank("n"), &ex("name"), &Term::literal("N"));
        let emission = emit(&c.finish());

        assert_eq!(emission.blocks.len(), 3);
        assert_eq!(blank_identifiers(&emission), ["n"]);
        assert_eq!(emission.nested_count(), 0);
    }

    #[test]
    fn test_list_round_trip() {
        let mut c = Compactor::new();
        c.ingest(&Term::blank("a"), &Term::uri(vocab::RDF_FIRST), &Term::literal("x"));
        c.ingest(&Term::blank("a"), &Term::uri(vocab::RDF_REST), &Term::blank("b"));
        c.ingest(&Term::blank("b"), &Term::uri(vocab::RDF_FIRST), &Term::literal("y"));
        c.ingest(&Term::blank("b"), &Term::uri(vocab::RDF_REST), &Term::uri(vocab::RDF_NIL));
        let graph = c.finish();
        let emission = emit(&graph);

        let head = graph.record(&Term::blank("a")).unwrap();
        let items: Vec<&Term> = head
            .list_items()
            .unwrap()
            .iter()
            .map(|&k| graph.nodes().term(k))
            .collect();
        assert_eq!(items, [&Term::literal("x"), &Term::literal("y")]);
        assert!(!head.is_valid());
        assert!(!graph.record(&Term::blank("b")).unwrap().is_valid());
        assert!(emission.blocks.is_empty());
        assert_eq!(unwritten_list_triples(&graph), 4);
    }

    #[test]
    fn test_referenced_list_round_trip() {
        let mut c = Compactor::new();
        c.ingest(&ex("s"), &ex("items"), &Term::blank("a"));
        c.ingest(&Term::blank("a"), &Term::uri(vocab::RDF_FIRST), &Term::literal("x"));
        c.ingest(&Term::blank("a"), &Term::uri(vocab::RDF_REST), &Term::blank("b"));
        c.ingest(&Term::blank("b"), &Term::uri(vocab::RDF_FIRST), &Term::literal("y"));
        c.ingest(&Term::blank("b"), &Term::uri(vocab::RDF_REST), &Term::uri(vocab::RDF_NIL));
        let graph = c.finish();
        let emission = emit(&graph);

        assert!(!graph.record(&Term::blank("a")).unwrap().is_valid());
        assert!(!graph.record(&Term::blank("b")).unwrap().is_valid());
        assert_eq!(emission.blocks.len(), 1);
        assert!(blank_identifiers(&emission).is_empty());
        assert_eq!(triples_written(&emission.blocks[0]), 5);
    }

    #[test]
    fn test_names_stable_across_emissions() {
        let mut c = Compactor::new();
        c.ingest(&ex("s"), &Term::uri("http://other.org/v#p"), &Term::literal("1"));
        c.ingest(&ex("s"), &Term::uri("http://other.org/v#q"), &Term::literal("2"));
        let graph = c.finish();

        let mut stack = ex_stack();
        let mut names = graph.allocator();
        let first = graph.emit(&mut stack, &mut names);
        let second = graph.emit(&mut stack, &mut names);

        assert_eq!(first.blocks, second.blocks);
        assert_eq!(first.minted.len(), 1);
        assert!(second.minted.is_empty());
        assert_eq!(first.blocks[0].properties[0].0.to_string(), "ns0:p");
        assert_eq!(first.blocks[0].properties[1].0.to_string(), "ns0:q");
    }
}
