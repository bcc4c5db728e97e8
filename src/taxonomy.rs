//! Per-kind attribute taxonomy.
//!
//! Splits every node kind's attributes into scalar attributes and child
//! attributes, remembering which child attributes hold ordered lists. Entries
//! are derived from the static node table on first use and cached for the
//! life of the process.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::ast::NodeKind;
use crate::error::TaxonomyError;

/// A child attribute and whether it holds an ordered list of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildAttr {
    pub name: &'static str,
    pub list: bool,
}

/// Static attribute table of one node kind.
///
/// `attributes` is every declared attribute in declaration order; `scalars`
/// names the leaf attributes among them; `children` describes the rest.
#[derive(Debug, Clone, Copy)]
pub struct KindDescription {
    pub kind: NodeKind,
    pub attributes: &'static [&'static str],
    pub scalars: &'static [&'static str],
    pub children: &'static [ChildAttr],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyEntry {
    kind: NodeKind,
    scalars: Vec<&'static str>,
    children: Vec<ChildAttr>,
}

impl TaxonomyEntry {
    /// Derives the entry, treating every attribute that is not a scalar as a
    /// child. The derived child set must match the child descriptors exactly.
    pub fn derive(desc: &KindDescription) -> Result<Self, TaxonomyError> {
        let kind = desc.kind.as_str();
        let scalars: HashSet<&str> = desc.scalars.iter().copied().collect();

        for scalar in desc.scalars {
            if !desc.attributes.contains(scalar) {
                return Err(TaxonomyError::Misdeclared {
                    kind,
                    attribute: *scalar,
                    reason: "scalar is not in the attribute list",
                });
            }
        }

        let mut children = Vec::new();
        for attribute in desc.attributes {
            if scalars.contains(attribute) {
                continue;
            }
            let child = desc
                .children
                .iter()
                .find(|c| c.name == *attribute)
                .ok_or(TaxonomyError::Unclassified {
                    kind,
                    attribute: *attribute,
                })?;
            if children.iter().any(|c: &ChildAttr| c.name == child.name) {
                return Err(TaxonomyError::Misdeclared {
                    kind,
                    attribute: *attribute,
                    reason: "declared more than once",
                });
            }
            children.push(*child);
        }

        for child in desc.children {
            if scalars.contains(child.name) {
                return Err(TaxonomyError::Misdeclared {
                    kind,
                    attribute: child.name,
                    reason: "declared as both a scalar and a child",
                });
            }
            if !desc.attributes.contains(&child.name) {
                return Err(TaxonomyError::Misdeclared {
                    kind,
                    attribute: child.name,
                    reason: "child is not in the attribute list",
                });
            }
        }

        Ok(Self {
            kind: desc.kind,
            scalars: desc.scalars.to_vec(),
            children,
        })
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn scalars(&self) -> &[&'static str] {
        &self.scalars
    }

    #[must_use]
    pub fn children(&self) -> &[ChildAttr] {
        &self.children
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&ChildAttr> {
        self.children.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn is_scalar(&self, name: &str) -> bool {
        self.scalars.iter().any(|s| *s == name)
    }

    /// Every key a node of this kind exports, besides `_nodetype`.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scalars
            .iter()
            .copied()
            .chain(self.children.iter().map(|c| c.name))
    }
}

/// Memoizing registry of taxonomy entries.
#[derive(Debug, Default)]
pub struct Taxonomy {
    cache: RwLock<HashMap<NodeKind, Arc<TaxonomyEntry>>>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the encoder and decoder.
    pub fn global() -> &'static Taxonomy {
        static GLOBAL: OnceLock<Taxonomy> = OnceLock::new();
        GLOBAL.get_or_init(Taxonomy::new)
    }

    pub fn attributes_of(&self, kind: NodeKind) -> Result<Arc<TaxonomyEntry>, TaxonomyError> {
        if let Some(entry) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
        {
            return Ok(Arc::clone(entry));
        }

        // Computed outside the lock; a racing thread may do the same work and
        // the first insert wins.
        let entry = Arc::new(TaxonomyEntry::derive(kind.description())?);
        log::debug!(
            "taxonomy for {kind}: scalars {:?}, children {:?}",
            entry.scalars,
            entry.children
        );

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(cache.entry(kind).or_insert(entry)))
    }

    /// Number of kinds computed so far.
    pub fn cached(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Looks up `kind` in the global registry.
pub fn attributes_of(kind: NodeKind) -> Result<Arc<TaxonomyEntry>, TaxonomyError> {
    Taxonomy::global().attributes_of(kind)
}
