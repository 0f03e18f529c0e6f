//! classweave - Generate PlantUML class diagrams from Java sources
//!
//! Extracts classes, enums and interfaces from Java-like source text with
//! lightweight matchers, infers one canonical relation per class pair and
//! renders the result as a PlantUML class diagram.
//!
//! # Quick Start
//!
//! ```rust
//! use classweave::generate;
//!
//! let uml = generate(&[
//!     "class Engine {}",
//!     "class Car { private Engine engine; public Car(){ engine = new Engine(); } }",
//! ])
//! .unwrap();
//! assert!(uml.contains("Car *--> Engine"));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use classweave::prelude::*;
//!
//! let parser = JavaParser::new();
//! let mut registry = ModelRegistry::new();
//! parser.parse("class Library { private ArrayList<Book> books; }", &mut registry).unwrap();
//! parser.parse("class Book {}", &mut registry).unwrap();
//!
//! let engine = RelationInferenceEngine::new();
//! let diagram = ClassDiagram::infer(registry, &engine);
//! assert_eq!(diagram.relation_lines(), vec!["Library --> \"0..*\" Book"]);
//!
//! let uml = PlantUmlRenderer::new().render(&diagram).unwrap();
//! assert!(uml.contains("-books: Book [*]"));
//! ```

pub mod core;
pub mod plugins;

use std::path::Path;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Database, DiagramError, DirectorySource, GeneratorConfig, MemorySource, Parser, Renderer,
        SourceProvider, SourceUnit,
    };
    pub use crate::plugins::java::{
        ClassDiagram, ClassModel, JavaParser, ModelRegistry, PlantUmlRenderer,
        RelationInferenceEngine, RelationSet,
    };
    pub use crate::plugins::orchestrator::Orchestrator;
}

fn memory_source<S: AsRef<str>>(sources: &[S]) -> MemorySource {
    sources
        .iter()
        .enumerate()
        .map(|(i, text)| SourceUnit::new(format!("unit-{}", i + 1), text.as_ref()))
        .collect::<Vec<_>>()
        .into()
}

/// Generate a PlantUML class diagram from in-memory sources
///
/// Each element is the full text of one source unit.
///
/// # Example
/// ```rust
/// let uml = classweave::generate(&["class Library { private ArrayList<Book> books; }", "class Book {}"]).unwrap();
/// assert!(uml.contains("Library --> \"0..*\" Book"));
/// ```
pub fn generate<S: AsRef<str>>(sources: &[S]) -> anyhow::Result<String> {
    use crate::plugins::orchestrator::Orchestrator;

    Orchestrator::new().run(&memory_source(sources))
}

/// Generate a PlantUML class diagram from every `.java` file under `root`
///
/// Fails when the directory cannot be read or contains no Java files.
pub fn generate_from_dir(root: impl AsRef<Path>) -> anyhow::Result<String> {
    use crate::plugins::orchestrator::Orchestrator;

    Orchestrator::new().run(&DirectorySource::new(root.as_ref()))
}

/// Extract the structural model without inferring relations
///
/// # Example
/// ```rust
/// use classweave::prelude::Database;
///
/// let registry = classweave::extract(&["enum Color { RED, GREEN }"]).unwrap();
/// assert_eq!(registry.node_count(), 1);
/// ```
pub fn extract<S: AsRef<str>>(sources: &[S]) -> anyhow::Result<plugins::java::ModelRegistry> {
    use crate::plugins::orchestrator::Orchestrator;

    let units: Vec<SourceUnit> = memory_source(sources).units()?;
    Orchestrator::new().extract(&units)
}
