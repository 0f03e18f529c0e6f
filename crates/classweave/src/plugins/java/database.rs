//! Model registry
//!
//! Run-scoped store of every declaration seen so far, keyed by name, plus the
//! construction evidence gathered from constructor and entry-point bodies.
//! Iteration follows first-seen order.

use anyhow::Result;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::trace;

use super::model::ClassModel;
use crate::core::Database;

/// One construction evidence entry: `owner` instantiates `constructed`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Construction {
    pub owner: String,
    pub constructed: String,
}

impl Construction {
    pub fn new(owner: impl Into<String>, constructed: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            constructed: constructed.into(),
        }
    }
}

/// Registry of class models and construction evidence
#[derive(Debug, Clone, Default, Serialize)]
pub struct ModelRegistry {
    classes: IndexMap<String, ClassModel>,
    construction: IndexMap<String, IndexSet<String>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a model unless one with the same name exists
    ///
    /// Returns `false` for a duplicate; the stored model is left untouched.
    pub fn register(&mut self, model: ClassModel) -> bool {
        if self.classes.contains_key(&model.name) {
            trace!(class = %model.name, "Duplicate declaration ignored");
            return false;
        }
        self.classes.insert(model.name.clone(), model);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn get_class(&self, name: &str) -> Option<&ClassModel> {
        self.classes.get(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassModel> {
        self.classes.values()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Record that `owner` instantiates `constructed`; duplicates are dropped
    pub fn record_construction(
        &mut self,
        owner: impl Into<String>,
        constructed: impl Into<String>,
    ) -> bool {
        self.construction
            .entry(owner.into())
            .or_default()
            .insert(constructed.into())
    }

    /// Types instantiated by `owner`, in first-seen order
    pub fn constructed_by(&self, owner: &str) -> Option<&IndexSet<String>> {
        self.construction.get(owner)
    }

    /// Every owner with its construction evidence
    pub fn construction_evidence(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.construction
            .iter()
            .map(|(owner, types)| (owner.as_str(), types))
    }

    /// Distinct owners that instantiate `constructed`
    pub fn owners_of(&self, constructed: &str) -> Vec<&str> {
        self.construction
            .iter()
            .filter(|(_, types)| types.contains(constructed))
            .map(|(owner, _)| owner.as_str())
            .collect()
    }

    pub fn construction_count(&self) -> usize {
        self.construction.values().map(IndexSet::len).sum()
    }
}

impl Database for ModelRegistry {
    type Node = ClassModel;
    type Edge = Construction;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        self.register(node);
        Ok(())
    }

    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        self.record_construction(edge.owner, edge.constructed);
        Ok(())
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.get_class(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.classes.values()
    }

    fn edges(&self) -> impl Iterator<Item = Self::Edge> + '_ {
        self.construction.iter().flat_map(|(owner, types)| {
            types
                .iter()
                .map(move |constructed| Construction::new(owner.as_str(), constructed.as_str()))
        })
    }

    fn clear(&mut self) {
        self.classes.clear();
        self.construction.clear();
    }

    fn node_count(&self) -> usize {
        self.class_count()
    }

    fn edge_count(&self) -> usize {
        self.construction_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::java::model::Attribute;

    #[test]
    fn test_first_seen_wins() {
        let mut registry = ModelRegistry::new();
        let mut first = ClassModel::class("Car");
        first.add_attribute(Attribute::new("engine", "Engine"));

        assert!(registry.register(first));
        assert!(!registry.register(ClassModel::class("Car")));

        assert_eq!(registry.class_count(), 1);
        assert_eq!(registry.get_class("Car").unwrap().attributes.len(), 1);
    }

    #[test]
    fn test_registry_keeps_insertion_order() {
        let mut registry = ModelRegistry::new();
        registry.register(ClassModel::class("Zebra"));
        registry.register(ClassModel::enumeration("Color"));
        registry.register(ClassModel::class("Apple"));

        let names: Vec<_> = registry.classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra", "Color", "Apple"]);
    }

    #[test]
    fn test_construction_evidence_is_deduplicated() {
        let mut registry = ModelRegistry::new();
        assert!(registry.record_construction("Car", "Engine"));
        assert!(!registry.record_construction("Car", "Engine"));
        assert!(registry.record_construction("Car", "Wheel"));
        assert!(registry.record_construction("Garage", "Engine"));

        let car: Vec<_> = registry.constructed_by("Car").unwrap().iter().collect();
        assert_eq!(car, vec!["Engine", "Wheel"]);
        assert_eq!(registry.owners_of("Engine"), vec!["Car", "Garage"]);
        assert_eq!(registry.construction_count(), 3);
    }

    #[test]
    fn test_database_trait() {
        let mut registry = ModelRegistry::new();
        registry.add_node(ClassModel::class("Car")).unwrap();
        registry.add_node(ClassModel::class("Car")).unwrap();
        registry
            .add_edge(Construction::new("Car", "Engine"))
            .unwrap();

        assert_eq!(registry.node_count(), 1);
        assert_eq!(registry.edge_count(), 1);
        assert!(registry.get_node("Car").is_some());
        let edges: Vec<_> = registry.edges().collect();
        assert_eq!(edges, vec![Construction::new("Car", "Engine")]);

        registry.clear();
        assert_eq!(registry.node_count(), 0);
        assert_eq!(registry.edge_count(), 0);
    }
}
