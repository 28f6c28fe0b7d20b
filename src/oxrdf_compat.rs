//! Conversions from the `oxrdf` data model.
//!
//! Simple literals (`xsd:string`) become plain literals and language-tagged
//! literals drop their implicit `rdf:langString` datatype. Quoted triples
//! have no counterpart here and become opaque blank nodes.

use crate::term::{Literal, Term, Triple};
use crate::vocab;

impl From<oxrdf::NamedNode> for Term {
    fn from(node: oxrdf::NamedNode) -> Self {
        Term::Uri(node.into_string())
    }
}

impl From<oxrdf::BlankNode> for Term {
    fn from(node: oxrdf::BlankNode) -> Self {
        Term::Blank(node.as_str().to_string())
    }
}

impl From<oxrdf::Literal> for Term {
    fn from(literal: oxrdf::Literal) -> Self {
        let lexical = literal.value().to_string();
        let converted = if let Some(language) = literal.language() {
            Literal::lang(lexical, language)
        } else {
            let datatype = literal.datatype().as_str();
            if datatype == format!("{}string", vocab::XSD) {
                Literal::plain(lexical)
            } else {
                Literal::typed(lexical, datatype)
            }
        };
        Term::Literal(converted)
    }
}

impl From<oxrdf::Subject> for Term {
    #[allow(unreachable_patterns)]
    fn from(subject: oxrdf::Subject) -> Self {
        match subject {
            oxrdf::Subject::NamedNode(node) => node.into(),
            oxrdf::Subject::BlankNode(node) => node.into(),
            other => Term::Blank(other.to_string()),
        }
    }
}

impl From<oxrdf::Term> for Term {
    #[allow(unreachable_patterns)]
    fn from(term: oxrdf::Term) -> Self {
        match term {
            oxrdf::Term::NamedNode(node) => node.into(),
            oxrdf::Term::BlankNode(node) => node.into(),
            oxrdf::Term::Literal(literal) => literal.into(),
            other => Term::Blank(other.to_string()),
        }
    }
}

impl From<oxrdf::Triple> for Triple {
    fn from(triple: oxrdf::Triple) -> Self {
        Triple::new(
            triple.subject.into(),
            triple.predicate.into(),
            triple.object.into(),
        )
    }
}

impl From<oxrdf::Quad> for Triple {
    fn from(quad: oxrdf::Quad) -> Self {
        let graph = match quad.graph_name {
            oxrdf::GraphName::NamedNode(node) => Some(node.into()),
            oxrdf::GraphName::BlankNode(node) => Some(node.into()),
            oxrdf::GraphName::DefaultGraph => None,
        };
        Triple {
            subject: quad.subject.into(),
            predicate: quad.predicate.into(),
            object: quad.object.into(),
            graph,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_conversion() {
        let plain: Term = oxrdf::Literal::new_simple_literal("x").into();
        assert_eq!(plain, Term::literal("x"));

        let tagged: Term = oxrdf::Literal::new_language_tagged_literal_unchecked("x", "en").into();
        assert_eq!(tagged, Term::Literal(Literal::lang("x", "en")));

        let typed: Term = oxrdf::Literal::new_typed_literal(
            "1",
            oxrdf::NamedNode::new_unchecked(format!("{}integer", vocab::XSD)),
        )
        .into();
        assert_eq!(
            typed,
            Term::Literal(Literal::typed("1", format!("{}integer", vocab::XSD)))
        );
    }

    #[test]
    fn test_quad_conversion() {
        let quad = oxrdf::Quad::new(
            oxrdf::BlankNode::new_unchecked("b"),
            oxrdf::NamedNode::new_unchecked("http://example.org/p"),
            oxrdf::NamedNode::new_unchecked("http://example.org/o"),
            oxrdf::NamedNode::new_unchecked("http://example.org/g"),
        );
        let triple: Triple = quad.into();
        assert_eq!(triple.subject, Term::blank("b"));
        assert_eq!(triple.object, Term::uri("http://example.org/o"));
        assert_eq!(triple.graph, Some(Term::uri("http://example.org/g")));
    }
}
