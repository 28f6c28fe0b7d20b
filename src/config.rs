use crate::term::Term;
use serde::{Deserialize, Serialize};

/// What to do with a `(predicate, object)` pair seen twice under one subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep every occurrence.
    #[default]
    Preserve,
    /// Keep only the first occurrence.
    Collapse,
}

/// Order of top-level subject blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionOrder {
    /// First-seen order across all subjects.
    #[default]
    FirstSeen,
    /// URI subjects first, then blank subjects, each in first-seen order.
    ResourcesFirst,
}

/// Where the qname allocator may mint new namespace bindings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MintPolicy {
    /// Never mint; unresolved URIs fall back to full-URI rendering.
    Never,
    /// Mint for predicate and type names only.
    #[default]
    Predicates,
    /// Mint for every resource reference.
    Everywhere,
}

/// Options for one compaction pass.
///
/// ```
/// use rdf_abbrev::{CompactorConfig, DuplicatePolicy, MintPolicy};
///
/// let config = CompactorConfig::default()
///     .with_duplicates(DuplicatePolicy::Collapse)
///     .with_mint(MintPolicy::Never);
/// assert_eq!(config.mint_prefix, "ns");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactorConfig {
    pub duplicates: DuplicatePolicy,
    pub order: EmissionOrder,
    /// Subject that is never inlined and always gets an identifier.
    pub root: Option<Term>,
    pub mint: MintPolicy,
    /// Base for synthetic prefixes; a counter is appended.
    pub mint_prefix: String,
    /// Linearize `rdf:first`/`rdf:rest` chains into list views.
    pub collapse_lists: bool,
    /// Gather `rdf:_N` properties into container members.
    pub collapse_containers: bool,
}

impl Default for CompactorConfig {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            order: EmissionOrder::default(),
            root: None,
            mint: MintPolicy::default(),
            mint_prefix: "ns".to_string(),
            collapse_lists: true,
            collapse_containers: true,
        }
    }
}

impl CompactorConfig {
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_order(mut self, order: EmissionOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_root(mut self, root: Term) -> Self {
        self.root = Some(root);
        self
    }

    pub fn with_mint(mut self, mint: MintPolicy) -> Self {
        self.mint = mint;
        self
    }

    pub fn with_mint_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.mint_prefix = prefix.into();
        self
    }

    pub fn with_collapse_lists(mut self, enabled: bool) -> Self {
        self.collapse_lists = enabled;
        self
    }

    pub fn with_collapse_containers(mut self, enabled: bool) -> Self {
        self.collapse_containers = enabled;
        self
    }
}
