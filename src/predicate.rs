use crate::term::Term;
use crate::vocab;

/// How ingestion treats a predicate.
///
/// Computed once per distinct predicate term and cached by the compactor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    /// `rdf:type`
    Type,

    /// Container membership `rdf:_N`.
    Ordinal(u32),

    /// `rdf:first`
    ListFirst,

    /// `rdf:rest`
    ListRest,

    /// Anything else.
    Ordinary,
}

impl PredicateKind {
    pub fn classify(predicate: &Term) -> Self {
        let Some(uri) = predicate.as_uri() else {
            return PredicateKind::Ordinary;
        };
        match uri {
            vocab::RDF_TYPE => PredicateKind::Type,
            vocab::RDF_FIRST => PredicateKind::ListFirst,
            vocab::RDF_REST => PredicateKind::ListRest,
            _ => match vocab::check_ordinal(uri) {
                Some(n) => PredicateKind::Ordinal(n),
                None => PredicateKind::Ordinary,
            },
        }
    }
}
