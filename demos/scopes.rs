use rdf_abbrev::{QNameAllocator, ScopeStack};

/// Walks through nested namespace scopes the way an XML writer would.
///
/// Usage: cargo run --example scopes
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trace")),
        )
        .init();

    let widget = "http://example.org/ns#Widget";
    let mut stack = ScopeStack::with_standard_namespaces();
    let mut names = QNameAllocator::default();

    stack.bind(Some("ex"), "http://example.org/ns#", 0)?;
    println!("depth 0: {}", names.to_qname(&mut stack, widget, false));

    stack.bind(None, "http://example.org/ns#", 1)?;
    stack.bind(Some("ex"), "http://elsewhere.org/", 1)?;
    println!("depth 1: {}", names.to_qname(&mut stack, widget, false));

    stack.enter_scope(2)?;
    let minted = names.to_qname(&mut stack, "http://other.org/terms/Gadget", true);
    println!("depth 2: {minted}");
    for ns in stack.visible() {
        println!("  visible {:?} -> {} (depth {})", ns.prefix, ns.uri, ns.depth);
    }

    stack.exit_scope(2)?;
    stack.exit_scope(1)?;
    println!("back at depth 0: {}", names.to_qname(&mut stack, widget, false));

    if let Err(err) = stack.exit_scope(5) {
        println!("rejected: {err}");
    }
    Ok(())
}
