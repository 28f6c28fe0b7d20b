use crate::namespace::ScopeStack;
use crate::qname::QNameAllocator;
use proptest::prelude::*;

const PREFIXES: [&str; 3] = ["a", "b", "c"];
const NAMESPACES: [&str; 4] = [
    "http://example.org/",
    "http://example.org/ns#",
    "http://other.org/v/",
    "urn:x:",
];

/// One binding step: `(deeper, prefix index or default, namespace index)`.
fn bindings() -> impl Strategy<Value = Vec<(bool, Option<usize>, usize)>> {
    prop::collection::vec(
        (any::<bool>(), prop::option::of(0..PREFIXES.len()), 0..NAMESPACES.len()),
        0..24,
    )
}

fn build(steps: &[(bool, Option<usize>, usize)]) -> ScopeStack {
    let mut stack = ScopeStack::with_standard_namespaces();
    let mut depth = 0;
    for &(deeper, prefix, ns) in steps {
        if deeper {
            depth += 1;
        }
        stack
            .bind(prefix.map(|i| PREFIXES[i]), NAMESPACES[ns], depth)
            .unwrap();
    }
    stack
}

fn uris() -> impl Strategy<Value = String> {
    (0..NAMESPACES.len(), "[a-z][a-z0-9]{0,4}").prop_map(|(ns, local)| format!("{}{local}", NAMESPACES[ns]))
}

proptest! {
    /// A resolved name always expands back to the URI it came from.
    #[test]
    fn prop_resolution_expands_back(steps in bindings(), uri in uris()) {
        let stack = build(&steps);
        if let Some((prefix, local)) = stack.resolve_prefix(&uri) {
            let ns = stack.resolve_uri(prefix.as_deref()).unwrap();
            prop_assert_eq!(format!("{ns}{local}"), uri);
        }
    }

    /// Entering and leaving a scope leaves the outer bindings as they were.
    #[test]
    fn prop_exit_restores(steps in bindings(), inner in bindings(), uri in uris()) {
        let mut stack = build(&steps);
        let before = stack.visible();
        let resolved = stack.resolve_prefix(&uri);

        let depth = stack.depth().unwrap_or(0) + 1;
        stack.enter_scope(depth).unwrap();
        for &(_, prefix, ns) in &inner {
            stack.bind(prefix.map(|i| PREFIXES[i]), NAMESPACES[ns], depth).unwrap();
        }
        stack.exit_scope(depth).unwrap();

        prop_assert_eq!(stack.visible(), before);
        prop_assert_eq!(stack.resolve_prefix(&uri), resolved);
    }

    /// Asking twice for the same URI gives the same name and mints nothing new.
    #[test]
    fn prop_qnames_stable(steps in bindings(), uris in prop::collection::vec(uris(), 1..8)) {
        let mut stack = build(&steps);
        let mut names = QNameAllocator::default();

        let first: Vec<_> = uris.iter().map(|u| names.to_qname(&mut stack, u, true)).collect();
        let minted = names.minted().len();
        let second: Vec<_> = uris.iter().map(|u| names.to_qname(&mut stack, u, true)).collect();

        prop_assert_eq!(first, second);
        prop_assert_eq!(names.minted().len(), minted);
    }
}
