use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rdf_abbrev::{vocab, CompactedGraph, Compactor, ScopeStack, Term, Triple};

fn ex(local: impl std::fmt::Display) -> Term {
    Term::uri(format!("http://example.org/{local}"))
}

/// People with a nested address each, mostly tree-shaped
fn generate_people(size: usize) -> Vec<Triple> {
    let mut triples = Vec::with_capacity(size * 5);
    for i in 0..size {
        let person = ex(format!("person/{i}"));
        let address = Term::blank(format!("addr{i}"));
        triples.push(Triple::new(person.clone(), Term::uri(vocab::RDF_TYPE), ex("Person")));
        triples.push(Triple::new(person.clone(), ex("name"), Term::literal(format!("Person {i}"))));
        triples.push(Triple::new(person.clone(), ex("address"), address.clone()));
        triples.push(Triple::new(address.clone(), ex("city"), Term::literal("Springfield")));
        if i > 0 {
            triples.push(Triple::new(person, ex("knows"), ex(format!("person/{}", i - 1))));
        }
    }
    triples
}

/// One long `rdf:first`/`rdf:rest` chain
fn generate_list(size: usize) -> Vec<Triple> {
    let mut triples = vec![Triple::new(ex("s"), ex("items"), Term::blank("l0"))];
    for i in 0..size {
        let cell = Term::blank(format!("l{i}"));
        let next = if i + 1 == size {
            Term::uri(vocab::RDF_NIL)
        } else {
            Term::blank(format!("l{}", i + 1))
        };
        triples.push(Triple::new(cell.clone(), Term::uri(vocab::RDF_FIRST), Term::literal(i.to_string())));
        triples.push(Triple::new(cell, Term::uri(vocab::RDF_REST), next));
    }
    triples
}

fn compact(triples: &[Triple]) -> CompactedGraph {
    let mut compactor = Compactor::new();
    compactor.extend(triples.iter().cloned());
    compactor.finish()
}

fn ex_stack() -> ScopeStack {
    let mut stack = ScopeStack::with_standard_namespaces();
    stack
        .bind(Some("ex"), "http://example.org/", 0)
        .expect("fresh stack accepts depth 0");
    stack
}

fn bench_ingest(c: &mut Criterion) {
    let sizes = [100, 1_000, 10_000];
    let mut group = c.benchmark_group("ingest");

    for size in sizes.iter() {
        let people = generate_people(*size);
        group.bench_with_input(BenchmarkId::new("people", size), &people, |b, triples| {
            b.iter(|| black_box(compact(black_box(triples)).stats()));
        });

        let list = generate_list(*size);
        group.bench_with_input(BenchmarkId::new("list", size), &list, |b, triples| {
            b.iter(|| black_box(compact(black_box(triples)).stats()));
        });
    }

    group.finish();
}

fn bench_emit(c: &mut Criterion) {
    let sizes = [100, 1_000, 10_000];
    let mut group = c.benchmark_group("emit");

    for size in sizes.iter() {
        let graph = compact(&generate_people(*size));
        group.bench_with_input(BenchmarkId::new("people", size), &graph, |b, graph| {
            b.iter(|| {
                let emission = graph.emit(&mut ex_stack(), &mut graph.allocator());
                black_box(emission.blocks.len())
            });
        });

        // No bindings at all: every predicate namespace gets minted
        group.bench_with_input(BenchmarkId::new("people_minted", size), &graph, |b, graph| {
            b.iter(|| {
                let emission = graph.emit(&mut ScopeStack::new(), &mut graph.allocator());
                black_box(emission.minted.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ingest, bench_emit);
criterion_main!(benches);
