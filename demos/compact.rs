use rdf_abbrev::{
    vocab, CompactorConfig, Compactor, Identifier, ObjectDescriptor, ScopeStack, SubjectBlock,
    Term, Triple,
};
use std::env;
use std::fs;

/// Compacts a small sample graph and prints it in a Turtle-like layout.
///
/// Usage: cargo run --example compact [config.json]
///
/// Set `RUST_LOG=rdf_abbrev=trace` to watch ingestion and list detection.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path).unwrap_or_else(|e| {
                eprintln!("Cannot read \"{path}\": {e}");
                std::process::exit(1);
            });
            serde_json::from_str::<CompactorConfig>(&text).unwrap_or_else(|e| {
                eprintln!("Invalid config: {e}");
                std::process::exit(1);
            })
        }
        None => CompactorConfig::default(),
    };

    let mut compactor = Compactor::with_config(config);
    compactor.extend(sample());
    let graph = compactor.finish();
    println!("# {:?}", graph.stats());

    let mut stack = ScopeStack::with_standard_namespaces();
    stack
        .bind(Some("ex"), "http://example.org/", 0)
        .expect("depth 0 on a fresh stack");
    let emission = graph.emit(&mut stack, &mut graph.allocator());

    for ns in stack.visible() {
        let prefix = ns.prefix.as_deref().unwrap_or("");
        println!("@prefix {prefix}: <{}> .", ns.uri);
    }
    println!();
    for block in &emission.blocks {
        let mut out = String::new();
        write_block(&mut out, block, 0);
        println!("{out} .\n");
    }
    for err in &emission.diagnostics {
        println!("# warning: {err}");
    }
}

fn sample() -> Vec<Triple> {
    let ex = |s: &str| Term::uri(format!("http://example.org/{s}"));
    let rdf = |s: &str| Term::uri(format!("{}{s}", vocab::RDF));
    vec![
        Triple::new(ex("alice"), rdf("type"), ex("Person")),
        Triple::new(ex("alice"), ex("name"), Term::literal("Alice")),
        Triple::new(ex("alice"), ex("address"), Term::blank("addr")),
        Triple::new(Term::blank("addr"), ex("city"), Term::literal("Paris")),
        Triple::new(ex("alice"), ex("pets"), Term::blank("l1")),
        Triple::new(Term::blank("l1"), rdf("first"), Term::literal("Rex")),
        Triple::new(Term::blank("l1"), rdf("rest"), Term::blank("l2")),
        Triple::new(Term::blank("l2"), rdf("first"), Term::literal("Tom")),
        Triple::new(Term::blank("l2"), rdf("rest"), rdf("nil")),
        Triple::new(ex("alice"), ex("knows"), Term::blank("bob")),
        Triple::new(ex("carol"), ex("knows"), Term::blank("bob")),
        Triple::new(Term::blank("bob"), ex("name"), Term::literal("Bob")),
        Triple::new(ex("carol"), ex("likes"), Term::uri("http://other.org/vocab#Jazz")),
        Triple::new(ex("tags"), rdf("_2"), Term::literal("second")),
        Triple::new(ex("tags"), rdf("_1"), Term::literal("first")),
    ]
}

fn write_block(out: &mut String, block: &SubjectBlock, indent: usize) {
    let pad = "    ".repeat(indent + 1);
    match &block.identifier {
        Some(Identifier::Resource(q)) => out.push_str(&q.to_string()),
        Some(Identifier::Blank(label)) => out.push_str(&format!("_:{label}")),
        None if indent == 0 => out.push_str("[]"),
        None => {}
    }

    let mut lines = Vec::new();
    if let Some(t) = &block.type_qname {
        lines.push(format!("a {t}"));
    }
    for (predicate, objects) in &block.properties {
        let rendered: Vec<String> = objects.iter().map(|o| object(o, indent + 1)).collect();
        lines.push(format!("{predicate} {}", rendered.join(", ")));
    }
    for (ordinal, member) in &block.members {
        lines.push(format!("rdf:_{ordinal} {}", object(member, indent + 1)));
    }
    if let Some(items) = &block.list_view {
        let rendered: Vec<String> = items.iter().map(|o| object(o, indent + 1)).collect();
        lines.push(format!("( {} )", rendered.join(" ")));
    }
    for (i, line) in lines.iter().enumerate() {
        out.push_str(if i == 0 { "\n" } else { " ;\n" });
        out.push_str(&pad);
        out.push_str(line);
    }
}

fn object(descriptor: &ObjectDescriptor, indent: usize) -> String {
    match descriptor {
        ObjectDescriptor::Resource(q) => q.to_string(),
        ObjectDescriptor::Blank(label) => format!("_:{label}"),
        ObjectDescriptor::Literal {
            lexical,
            language,
            datatype,
        } => match (language, datatype) {
            (Some(lang), _) => format!("{lexical:?}@{lang}"),
            (None, Some(dt)) => format!("{lexical:?}^^{dt}"),
            (None, None) => format!("{lexical:?}"),
        },
        ObjectDescriptor::Nested(block) => {
            let mut out = String::from("[");
            write_block(&mut out, block, indent);
            out.push_str(" ]");
            out
        }
    }
}
