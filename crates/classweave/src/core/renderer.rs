//! Core renderer trait for diagram output

use anyhow::Result;

use super::Database;

/// Trait for serializing a finished database into an output document
pub trait Renderer<D: Database> {
    type Output;

    fn render(&self, database: &D) -> Result<Self::Output>;

    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    /// Short name of the produced notation (e.g. "plantuml")
    fn format(&self) -> &'static str;
}
