//! Well-known namespace URIs and the handful of RDF terms the compactor
//! treats specially.

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
pub const RDF_LIST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#List";

/// Returns the ordinal `N` if `uri` is a container membership property
/// `rdf:_N` with `N` a positive decimal integer.
///
/// Anything else after `rdf:_` (signs, leading zeros, trailing junk,
/// overflow) is not an ordinal.
pub fn check_ordinal(uri: &str) -> Option<u32> {
    let digits = uri.strip_prefix(RDF)?.strip_prefix('_')?;
    if digits.is_empty() || digits.starts_with('0') {
        return None;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u32>().ok()
}

/// Builds the container membership property URI for ordinal `n`.
pub fn ordinal_uri(n: u32) -> String {
    format!("{RDF}_{n}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals() {
        assert_eq!(check_ordinal(&ordinal_uri(1)), Some(1));
        assert_eq!(check_ordinal(&ordinal_uri(42)), Some(42));
        assert_eq!(
            check_ordinal("http://www.w3.org/1999/02/22-rdf-syntax-ns#_7"),
            Some(7)
        );
    }

    #[test]
    fn test_non_ordinals() {
        assert_eq!(check_ordinal(RDF_TYPE), None);
        assert_eq!(check_ordinal(&format!("{RDF}_")), None);
        assert_eq!(check_ordinal(&format!("{RDF}_0")), None);
        assert_eq!(check_ordinal(&format!("{RDF}_01")), None);
        assert_eq!(check_ordinal(&format!("{RDF}_3a")), None);
        assert_eq!(check_ordinal(&format!("{RDF}_-3")), None);
        assert_eq!(check_ordinal(&format!("{RDF}_99999999999")), None);
        assert_eq!(check_ordinal("http://example.org/_3"), None);
    }
}
