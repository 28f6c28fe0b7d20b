use crate::error::ScopeError;
use crate::qname::is_name_token;
use crate::vocab;
use ahash::AHashSet as HashSet;
use std::collections::BTreeMap;
use tracing::{trace, warn};

/// A visible prefix binding, as reported by [`ScopeStack::visible`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// `None` for the default namespace.
    pub prefix: Option<String>,
    pub uri: String,
    /// Depth of the frame that introduced the binding.
    pub depth: u32,
}

impl Namespace {
    pub fn is_rdf(&self) -> bool {
        self.uri == vocab::RDF
    }

    pub fn is_rdfs(&self) -> bool {
        self.uri == vocab::RDFS
    }

    pub fn is_xml(&self) -> bool {
        self.uri == vocab::XML || self.prefix.as_deref() == Some("xml")
    }
}

/// Bindings introduced at one nesting depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeFrame {
    pub depth: u32,
    pub bindings: BTreeMap<String, String>,
    /// Default namespace; an empty URI undeclares any outer default.
    pub default_uri: Option<String>,
}

impl ScopeFrame {
    fn new(depth: u32) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

/// Nested prefix bindings.
///
/// Frame depths never decrease from bottom to top. Lookups walk from the
/// innermost frame outward; a prefix (or the default) rebound in an inner
/// frame hides every outer binding of it.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stack whose depth-0 frame binds `rdf`, `rdfs`, `xsd` and `xml`.
    pub fn with_standard_namespaces() -> Self {
        let mut frame = ScopeFrame::new(0);
        for (prefix, uri) in [
            ("rdf", vocab::RDF),
            ("rdfs", vocab::RDFS),
            ("xsd", vocab::XSD),
            ("xml", vocab::XML),
        ] {
            frame.bindings.insert(prefix.to_string(), uri.to_string());
        }
        Self {
            frames: vec![frame],
        }
    }

    /// Depth of the innermost frame.
    pub fn depth(&self) -> Option<u32> {
        self.frames.last().map(|f| f.depth)
    }

    pub fn frames(&self) -> &[ScopeFrame] {
        &self.frames
    }

    /// Pushes an empty frame at `depth`.
    pub fn enter_scope(&mut self, depth: u32) -> Result<(), ScopeError> {
        self.check_depth(depth)?;
        trace!(depth, "enter scope");
        self.frames.push(ScopeFrame::new(depth));
        Ok(())
    }

    /// Binds `prefix` (or the default namespace for `None`) to `uri` at `depth`.
    ///
    /// The binding goes into the innermost frame when it sits at `depth`;
    /// a deeper `depth` opens a new frame first.
    pub fn bind(&mut self, prefix: Option<&str>, uri: &str, depth: u32) -> Result<(), ScopeError> {
        self.check_depth(depth)?;
        if self.depth() != Some(depth) {
            self.frames.push(ScopeFrame::new(depth));
        }
        let last = self.frames.len() - 1;
        let frame = &mut self.frames[last];
        trace!(?prefix, uri, depth, "bind namespace");
        match prefix {
            Some(prefix) => {
                frame.bindings.insert(prefix.to_string(), uri.to_string());
            }
            None => frame.default_uri = Some(uri.to_string()),
        }
        Ok(())
    }

    /// Pops every frame at `threshold`.
    ///
    /// The innermost frame must sit exactly at `threshold`. Anything else is
    /// a caller bug (a skipped level or a double pop) and leaves the stack
    /// untouched.
    pub fn exit_scope(&mut self, threshold: u32) -> Result<usize, ScopeError> {
        let innermost = self.depth();
        if innermost != Some(threshold) {
            let err = ScopeError::UnresolvedScope {
                threshold,
                innermost,
            };
            warn!(%err, "rejected scope exit");
            return Err(err);
        }
        let keep = self.frames.partition_point(|f| f.depth < threshold);
        let popped = self.frames.len() - keep;
        self.frames.truncate(keep);
        trace!(threshold, popped, "exit scope");
        Ok(popped)
    }

    /// Finds the binding that abbreviates `uri`.
    ///
    /// Returns `(prefix, local_name)` from the innermost frame holding a
    /// namespace that `uri` starts with and whose remainder is a legal local
    /// name. Within one frame the longest namespace wins, named prefixes
    /// before the default on a tie.
    pub fn resolve_prefix(&self, uri: &str) -> Option<(Option<String>, String)> {
        let mut hidden: HashSet<&str> = HashSet::default();
        let mut default_hidden = false;

        for frame in self.frames.iter().rev() {
            let mut best: Option<(Option<&str>, &str)> = None;

            for (prefix, ns) in &frame.bindings {
                if hidden.contains(prefix.as_str()) || !splits(uri, ns) {
                    continue;
                }
                if best.map_or(true, |(_, b)| ns.len() > b.len()) {
                    best = Some((Some(prefix.as_str()), ns.as_str()));
                }
            }

            if !default_hidden {
                if let Some(ns) = frame.default_uri.as_deref() {
                    if splits(uri, ns) && best.map_or(true, |(_, b)| ns.len() > b.len()) {
                        best = Some((None, ns));
                    }
                }
            }

            if let Some((prefix, ns)) = best {
                return Some((prefix.map(str::to_string), uri[ns.len()..].to_string()));
            }

            hidden.extend(frame.bindings.keys().map(String::as_str));
            default_hidden |= frame.default_uri.is_some();
        }
        None
    }

    /// Looks up the URI currently bound to `prefix` (`None` for the default).
    pub fn resolve_uri(&self, prefix: Option<&str>) -> Option<&str> {
        for frame in self.frames.iter().rev() {
            match prefix {
                Some(p) => {
                    if let Some(uri) = frame.bindings.get(p) {
                        return Some(uri);
                    }
                }
                None => {
                    if let Some(uri) = frame.default_uri.as_deref() {
                        return (!uri.is_empty()).then_some(uri);
                    }
                }
            }
        }
        None
    }

    /// Snapshot of the visible bindings, innermost frame first.
    pub fn visible(&self) -> Vec<Namespace> {
        let mut out: Vec<Namespace> = Vec::new();
        let mut default_done = false;

        for frame in self.frames.iter().rev() {
            if !default_done {
                if let Some(uri) = &frame.default_uri {
                    default_done = true;
                    if !uri.is_empty() {
                        out.push(Namespace {
                            prefix: None,
                            uri: uri.clone(),
                            depth: frame.depth,
                        });
                    }
                }
            }
            for (prefix, uri) in &frame.bindings {
                if out.iter().any(|ns| ns.prefix.as_deref() == Some(prefix)) {
                    continue;
                }
                out.push(Namespace {
                    prefix: Some(prefix.clone()),
                    uri: uri.clone(),
                    depth: frame.depth,
                });
            }
        }
        out
    }

    fn check_depth(&self, depth: u32) -> Result<(), ScopeError> {
        match self.depth() {
            Some(innermost) if depth < innermost => {
                Err(ScopeError::DepthRegression { depth, innermost })
            }
            _ => Ok(()),
        }
    }
}

/// True when `ns` is a proper prefix of `uri` leaving a legal local name.
fn splits(uri: &str, ns: &str) -> bool {
    !ns.is_empty()
        && uri.len() > ns.len()
        && uri.starts_with(ns)
        && is_name_token(&uri[ns.len()..])
}
