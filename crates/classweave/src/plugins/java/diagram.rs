//! Finished class diagram
//!
//! The registry snapshot together with the relation set inferred from it.
//! This is what renderers and the `inspect` command consume.

use anyhow::Result;
use serde::Serialize;

use super::database::ModelRegistry;
use super::inference::RelationInferenceEngine;
use super::model::ClassModel;
use super::relations::{HierarchyEdge, Relation, RelationSet};
use crate::core::{Database, DiagramError};

/// Any edge of the finished diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DiagramEdge {
    Hierarchy(HierarchyEdge),
    Relation(Relation),
}

/// Registry plus inferred relations
#[derive(Debug, Clone, Default)]
pub struct ClassDiagram {
    registry: ModelRegistry,
    relations: RelationSet,
}

impl ClassDiagram {
    pub fn new(registry: ModelRegistry, relations: RelationSet) -> Self {
        Self {
            registry,
            relations,
        }
    }

    /// Run inference over `registry` with the given engine
    pub fn infer(registry: ModelRegistry, engine: &RelationInferenceEngine) -> Self {
        let relations = engine.infer(&registry);
        Self::new(registry, relations)
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn relations(&self) -> &RelationSet {
        &self.relations
    }

    pub fn into_parts(self) -> (ModelRegistry, RelationSet) {
        (self.registry, self.relations)
    }

    /// One line per edge, hierarchy first
    pub fn relation_lines(&self) -> Vec<String> {
        self.relations
            .hierarchy()
            .map(ToString::to_string)
            .chain(self.relations.relations().map(ToString::to_string))
            .collect()
    }
}

impl Database for ClassDiagram {
    type Node = ClassModel;
    type Edge = DiagramEdge;

    fn add_node(&mut self, node: Self::Node) -> Result<()> {
        self.registry.register(node);
        Ok(())
    }

    /// Only hierarchy edges can be added directly; association-family edges
    /// come from inference
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()> {
        match edge {
            DiagramEdge::Hierarchy(edge) => {
                self.relations
                    .add_hierarchy(&edge.child, &edge.parent, edge.kind);
                Ok(())
            }
            DiagramEdge::Relation(relation) => Err(DiagramError::render_error(format!(
                "relation {} must be produced by inference",
                relation
            ))
            .into()),
        }
    }

    fn get_node(&self, id: &str) -> Option<&Self::Node> {
        self.registry.get_class(id)
    }

    fn nodes(&self) -> impl Iterator<Item = &Self::Node> {
        self.registry.classes()
    }

    fn edges(&self) -> impl Iterator<Item = Self::Edge> + '_ {
        self.relations
            .hierarchy()
            .cloned()
            .map(DiagramEdge::Hierarchy)
            .chain(self.relations.relations().cloned().map(DiagramEdge::Relation))
    }

    fn clear(&mut self) {
        self.registry.clear();
        self.relations.clear();
    }

    fn node_count(&self) -> usize {
        self.registry.class_count()
    }

    fn edge_count(&self) -> usize {
        self.relations.len()
    }
}
