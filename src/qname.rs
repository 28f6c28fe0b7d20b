use crate::error::CompactError;
use crate::namespace::{Namespace, ScopeStack};
use std::fmt;
use tracing::{debug, warn};

/// A namespace-prefixed short form of a URI.
///
/// `prefix` is `Some("")` for the default namespace and `None` when no
/// binding applies, in which case writers render `source_uri` in full.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub prefix: Option<String>,
    pub local_name: String,
    pub source_uri: String,
}

impl QName {
    /// The unabbreviated fallback for `uri`.
    pub fn full(uri: &str) -> Self {
        Self {
            prefix: None,
            local_name: String::new(),
            source_uri: uri.to_string(),
        }
    }

    pub fn is_abbreviated(&self) -> bool {
        self.prefix.is_some()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local_name),
            None => write!(f, "<{}>", self.source_uri),
        }
    }
}

/// True if `s` can stand as the local part of a qualified name.
///
/// Starts with a letter or `_`; continues with letters, digits, `-`, `_`
/// or `.`; does not end with `.`.
pub fn is_name_token(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !s.ends_with('.') && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Turns URIs into qualified names, minting namespace bindings on demand.
///
/// The mint counter lives here rather than in any global, so each
/// serialization owns its own sequence of synthetic prefixes.
#[derive(Debug, Clone)]
pub struct QNameAllocator {
    prefix_base: String,
    counter: u32,
    minted: Vec<Namespace>,
    /// Every binding pushed onto a stack, re-binds of earlier prefixes included
    bound: Vec<Namespace>,
    diagnostics: Vec<CompactError>,
}

impl Default for QNameAllocator {
    fn default() -> Self {
        Self::new("ns")
    }
}

impl QNameAllocator {
    /// Creates an allocator minting `{prefix_base}0`, `{prefix_base}1`, ...
    pub fn new(prefix_base: impl Into<String>) -> Self {
        Self {
            prefix_base: prefix_base.into(),
            counter: 0,
            minted: Vec::new(),
            bound: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Namespaces minted so far, in minting order.
    pub fn minted(&self) -> &[Namespace] {
        &self.minted
    }

    /// Every binding this allocator added to a scope stack, in order.
    ///
    /// Differs from [`minted`](Self::minted) when an earlier prefix had to
    /// be bound again on a stack that no longer carried it.
    pub fn bindings(&self) -> &[Namespace] {
        &self.bound
    }

    /// Problems met while minting.
    pub fn diagnostics(&self) -> &[CompactError] {
        &self.diagnostics
    }

    pub(crate) fn take_diagnostics(&mut self) -> Vec<CompactError> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Abbreviates `uri` against `stack`.
    ///
    /// On a miss with `allow_auto`, splits `uri` at its last `#` (else last
    /// `/`), binds a fresh prefix to the left part in the innermost frame and
    /// returns the new name. Any failure yields [`QName::full`].
    pub fn to_qname(&mut self, stack: &mut ScopeStack, uri: &str, allow_auto: bool) -> QName {
        if let Some((prefix, local_name)) = stack.resolve_prefix(uri) {
            return QName {
                prefix: Some(prefix.unwrap_or_default()),
                local_name,
                source_uri: uri.to_string(),
            };
        }
        if !allow_auto {
            return QName::full(uri);
        }
        match self.mint(stack, uri) {
            Ok(qname) => qname,
            Err(err) => {
                debug!(%err, "falling back to full uri");
                self.diagnostics.push(err);
                QName::full(uri)
            }
        }
    }

    fn mint(&mut self, stack: &mut ScopeStack, uri: &str) -> Result<QName, CompactError> {
        let split = uri
            .rfind('#')
            .or_else(|| uri.rfind('/'))
            .map_or(0, |i| i + 1);
        let (ns, local) = uri.split_at(split);
        if ns.is_empty() || !is_name_token(local) {
            return Err(CompactError::IllegalLocalName {
                uri: uri.to_string(),
                local: local.to_string(),
            });
        }

        let depth = stack.depth().unwrap_or(0);

        // A namespace minted earlier keeps its prefix, even after the frame
        // holding it was popped.
        if let Some(prev) = self.minted.iter().find(|m| m.uri == ns) {
            let prefix = prev.prefix.clone().unwrap_or_default();
            match stack.resolve_uri(Some(&prefix)) {
                None => {
                    stack.bind(Some(&prefix), ns, depth)?;
                    debug!(prefix = %prefix, namespace = ns, "rebound minted namespace");
                    self.bound.push(Namespace {
                        prefix: Some(prefix.clone()),
                        uri: ns.to_string(),
                        depth,
                    });
                    return Ok(qname(prefix, local, uri));
                }
                Some(bound) if bound == ns => return Ok(qname(prefix, local, uri)),
                Some(_) => {}
            }
        }

        let prefix = loop {
            let candidate = format!("{}{}", self.prefix_base, self.counter);
            self.counter += 1;
            match stack.resolve_uri(Some(&candidate)) {
                None => break candidate,
                Some(bound) if bound == ns => break candidate,
                Some(bound) => {
                    let err = CompactError::AmbiguousPrefix {
                        prefix: candidate,
                        bound: bound.to_string(),
                        candidate: ns.to_string(),
                    };
                    warn!(%err, "synthetic prefix taken, trying next");
                    self.diagnostics.push(err);
                }
            }
        };

        stack.bind(Some(&prefix), ns, depth)?;
        debug!(prefix = %prefix, namespace = ns, "minted namespace");
        let namespace = Namespace {
            prefix: Some(prefix.clone()),
            uri: ns.to_string(),
            depth,
        };
        self.minted.push(namespace.clone());
        self.bound.push(namespace);
        Ok(qname(prefix, local, uri))
    }
}

fn qname(prefix: String, local: &str, uri: &str) -> QName {
    QName {
        prefix: Some(prefix),
        local_name: local.to_string(),
        source_uri: uri.to_string(),
    }
}
