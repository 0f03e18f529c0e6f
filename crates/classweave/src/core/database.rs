//! Core database trait for diagram data storage
//!
//! Both the per-run model registry and the finished class diagram store their
//! data behind this trait, so renderers and callers can walk nodes and edges
//! without knowing which stage produced them.

use anyhow::Result;

/// Core trait for diagram databases
///
/// The associated types let each stage define its own node and edge
/// structures. Node lookup is keyed by the node's unique name.
pub trait Database {
    /// The node data type for this database
    type Node: Clone;

    /// The edge data type for this database
    type Edge: Clone;

    /// Add a node to the database
    fn add_node(&mut self, node: Self::Node) -> Result<()>;

    /// Add an edge to the database
    fn add_edge(&mut self, edge: Self::Edge) -> Result<()>;

    /// Get a node by name
    fn get_node(&self, id: &str) -> Option<&Self::Node>;

    /// Iterate over all nodes
    fn nodes(&self) -> impl Iterator<Item = &Self::Node>;

    /// Iterate over all edges
    fn edges(&self) -> impl Iterator<Item = Self::Edge> + '_;

    /// Clear all data from the database
    fn clear(&mut self);

    /// Get the number of nodes
    fn node_count(&self) -> usize;

    /// Get the number of edges
    fn edge_count(&self) -> usize;
}
