//! Relation set
//!
//! Association-family edges are stored under an unordered [`PairKey`], so a
//! pair of classes can hold at most one of them. Hierarchy edges (inheritance
//! and realization) live in a separate ordered set and never interact with the
//! association family.
//!
//! Every write goes through one of the transition methods (`associate`,
//! `associate_many`, `compose`, `share`, `depend`). They compare the incoming
//! evidence with whatever the pair already holds using [`Strength`] and either
//! insert, upgrade in place, collapse into a bidirectional edge, or suppress
//! the weaker evidence.

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Multiplicity label for list-like attributes
pub const MANY: &str = "0..*";

/// Kind of an association-family edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelationKind {
    Dependency,
    Association { bidirectional: bool },
    Composition { bidirectional: bool },
    Aggregation { bidirectional: bool },
}

impl RelationKind {
    pub fn is_bidirectional(self) -> bool {
        match self {
            RelationKind::Dependency => false,
            RelationKind::Association { bidirectional }
            | RelationKind::Composition { bidirectional }
            | RelationKind::Aggregation { bidirectional } => bidirectional,
        }
    }

    /// PlantUML arrow for this kind
    pub fn arrow(self) -> &'static str {
        match self {
            RelationKind::Dependency => "..>",
            RelationKind::Association { bidirectional: false } => "-->",
            RelationKind::Association { bidirectional: true } => "--",
            RelationKind::Composition { bidirectional: false } => "*-->",
            RelationKind::Composition { bidirectional: true } => "*--",
            RelationKind::Aggregation { bidirectional: false } => "o-->",
            RelationKind::Aggregation { bidirectional: true } => "o--",
        }
    }
}

/// Rank of an edge in the upgrade lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Strength {
    Dependency,
    Association,
    Multiplicity,
    Ownership,
}

/// An association-family edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub source: String,
    pub target: String,
    pub kind: RelationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_multiplicity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_multiplicity: Option<String>,
}

impl Relation {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            source_multiplicity: None,
            target_multiplicity: None,
        }
    }

    pub fn with_source_multiplicity(mut self, label: impl Into<String>) -> Self {
        self.source_multiplicity = Some(label.into());
        self
    }

    pub fn with_target_multiplicity(mut self, label: impl Into<String>) -> Self {
        self.target_multiplicity = Some(label.into());
        self
    }

    pub fn has_multiplicity(&self) -> bool {
        self.source_multiplicity.is_some() || self.target_multiplicity.is_some()
    }

    pub fn is_bidirectional(&self) -> bool {
        self.kind.is_bidirectional()
    }

    pub fn strength(&self) -> Strength {
        match self.kind {
            RelationKind::Dependency => Strength::Dependency,
            RelationKind::Association { .. } if self.has_multiplicity() => Strength::Multiplicity,
            RelationKind::Association { .. } => Strength::Association,
            RelationKind::Composition { .. } | RelationKind::Aggregation { .. } => {
                Strength::Ownership
            }
        }
    }

    /// Whether this edge is directed from `source` (self-loops count as both)
    pub fn points_from(&self, source: &str) -> bool {
        !self.is_bidirectional() && self.source == source
    }

    /// Make `source` the left-hand end, carrying the multiplicities along
    fn orient_from(&mut self, source: &str) {
        if self.source != source {
            std::mem::swap(&mut self.source, &mut self.target);
            std::mem::swap(&mut self.source_multiplicity, &mut self.target_multiplicity);
        }
    }

    /// Put a multiplicity label on the end named `end`
    fn mark_end(&mut self, end: &str, label: &str) {
        if self.target == end {
            self.target_multiplicity = Some(label.to_string());
        } else if self.source == end {
            self.source_multiplicity = Some(label.to_string());
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        if let Some(label) = &self.source_multiplicity {
            write!(f, " \"{}\"", label)?;
        }
        write!(f, " {}", self.kind.arrow())?;
        if let Some(label) = &self.target_multiplicity {
            write!(f, " \"{}\"", label)?;
        }
        write!(f, " {}", self.target)
    }
}

/// Kind of a hierarchy edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyKind {
    Inheritance,
    Realization,
}

/// A directed child → parent (or interface) edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HierarchyEdge {
    pub child: String,
    pub parent: String,
    pub kind: HierarchyKind,
}

impl HierarchyEdge {
    pub fn new(child: impl Into<String>, parent: impl Into<String>, kind: HierarchyKind) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
            kind,
        }
    }
}

impl fmt::Display for HierarchyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            HierarchyKind::Inheritance => write!(f, "{} <|-- {}", self.parent, self.child),
            HierarchyKind::Realization => write!(f, "{} ..|> {}", self.child, self.parent),
        }
    }
}

/// Canonical unordered key of a class pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey(String, String);

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self(a.to_string(), b.to_string())
        } else {
            Self(b.to_string(), a.to_string())
        }
    }

    pub fn first(&self) -> &str {
        &self.0
    }

    pub fn second(&self) -> &str {
        &self.1
    }
}

/// What a transition did to the set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The pair had no edge; one was added
    Inserted,
    /// A weaker edge was replaced by a stronger one
    Upgraded,
    /// Opposite directions merged into one bidirectional edge
    Collapsed,
    /// Composition turned into aggregation
    Downgraded,
    /// The pair already carried exactly this evidence
    Unchanged,
    /// A stronger edge already holds the pair
    Suppressed,
}

/// Deduplicated relation set
#[derive(Debug, Clone, Default)]
pub struct RelationSet {
    hierarchy: IndexSet<HierarchyEdge>,
    edges: IndexMap<PairKey, Relation>,
}

impl RelationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Association-family edge between `a` and `b`, in either direction
    pub fn get(&self, a: &str, b: &str) -> Option<&Relation> {
        self.edges.get(&PairKey::new(a, b))
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.edges.values()
    }

    pub fn hierarchy(&self) -> impl Iterator<Item = &HierarchyEdge> {
        self.hierarchy.iter()
    }

    /// Number of association-family edges
    pub fn relation_count(&self) -> usize {
        self.edges.len()
    }

    pub fn hierarchy_count(&self) -> usize {
        self.hierarchy.len()
    }

    pub fn len(&self) -> usize {
        self.relation_count() + self.hierarchy_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.hierarchy.clear();
        self.edges.clear();
    }

    /// Record `child` extending or realizing `parent`
    pub fn add_hierarchy(&mut self, child: &str, parent: &str, kind: HierarchyKind) -> Transition {
        if self.hierarchy.insert(HierarchyEdge::new(child, parent, kind)) {
            Transition::Inserted
        } else {
            Transition::Unchanged
        }
    }

    fn insert(&mut self, relation: Relation) -> Transition {
        let key = PairKey::new(&relation.source, &relation.target);
        self.edges.insert(key, relation);
        Transition::Inserted
    }

    /// `owner` holds a plain reference to `target`
    pub fn associate(&mut self, owner: &str, target: &str) -> Transition {
        let directed = RelationKind::Association {
            bidirectional: false,
        };
        let Some(existing) = self.edges.get_mut(&PairKey::new(owner, target)) else {
            return self.insert(Relation::new(owner, target, directed));
        };

        match existing.strength() {
            Strength::Dependency => {
                *existing = Relation::new(owner, target, directed);
                Transition::Upgraded
            }
            Strength::Association => {
                if existing.is_bidirectional() || existing.points_from(owner) {
                    Transition::Unchanged
                } else {
                    *existing = Relation::new(
                        owner,
                        target,
                        RelationKind::Association {
                            bidirectional: true,
                        },
                    );
                    Transition::Collapsed
                }
            }
            Strength::Multiplicity | Strength::Ownership => Transition::Suppressed,
        }
    }

    /// `owner` holds a collection of `element`
    pub fn associate_many(&mut self, owner: &str, element: &str) -> Transition {
        let directed = RelationKind::Association {
            bidirectional: false,
        };
        let bidirectional = RelationKind::Association {
            bidirectional: true,
        };
        let Some(existing) = self.edges.get_mut(&PairKey::new(owner, element)) else {
            return self.insert(Relation::new(owner, element, directed).with_target_multiplicity(MANY));
        };

        match existing.strength() {
            Strength::Dependency => {
                *existing = Relation::new(owner, element, directed).with_target_multiplicity(MANY);
                Transition::Upgraded
            }
            Strength::Association => {
                if existing.points_from(owner) {
                    // superseded by the container view of the same reference
                    *existing =
                        Relation::new(owner, element, directed).with_target_multiplicity(MANY);
                    Transition::Upgraded
                } else {
                    *existing =
                        Relation::new(owner, element, bidirectional).with_target_multiplicity(MANY);
                    Transition::Collapsed
                }
            }
            Strength::Multiplicity => {
                if existing.points_from(owner) {
                    Transition::Unchanged
                } else if existing.is_bidirectional() {
                    let before = existing.clone();
                    existing.mark_end(element, MANY);
                    if *existing == before {
                        Transition::Unchanged
                    } else {
                        Transition::Upgraded
                    }
                } else {
                    // many-to-many: the reverse collection already exists
                    existing.kind = bidirectional;
                    existing.mark_end(element, MANY);
                    Transition::Collapsed
                }
            }
            Strength::Ownership => Transition::Suppressed,
        }
    }

    /// `owner` instantiates `target` in a constructor or entry point
    pub fn compose(&mut self, owner: &str, target: &str) -> Transition {
        let Some(existing) = self.edges.get_mut(&PairKey::new(owner, target)) else {
            return self.insert(Relation::new(
                owner,
                target,
                RelationKind::Composition {
                    bidirectional: false,
                },
            ));
        };

        match existing.strength() {
            Strength::Ownership => {
                if existing.source == owner {
                    Transition::Unchanged
                } else {
                    Transition::Suppressed
                }
            }
            Strength::Dependency => {
                *existing = Relation::new(
                    owner,
                    target,
                    RelationKind::Composition {
                        bidirectional: false,
                    },
                );
                Transition::Upgraded
            }
            Strength::Association | Strength::Multiplicity => {
                // a reverse reference means the target also navigates back
                let bidirectional = existing.is_bidirectional() || !existing.points_from(owner);
                existing.orient_from(owner);
                existing.kind = RelationKind::Composition { bidirectional };
                Transition::Upgraded
            }
        }
    }

    /// `target` is instantiated by several owners: `owner`'s composition
    /// becomes aggregation
    pub fn share(&mut self, owner: &str, target: &str) -> Transition {
        match self.edges.get_mut(&PairKey::new(owner, target)) {
            Some(existing) if existing.source == owner => match existing.kind {
                RelationKind::Composition { bidirectional } => {
                    existing.kind = RelationKind::Aggregation { bidirectional };
                    Transition::Downgraded
                }
                _ => Transition::Unchanged,
            },
            _ => Transition::Unchanged,
        }
    }

    /// `owner` uses `target` transiently
    pub fn depend(&mut self, owner: &str, target: &str) -> Transition {
        if self.edges.contains_key(&PairKey::new(owner, target)) {
            return Transition::Suppressed;
        }
        self.insert(Relation::new(owner, target, RelationKind::Dependency))
    }
}
