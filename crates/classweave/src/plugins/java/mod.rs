//! Java class-diagram plugin
//!
//! Extracts class models from Java-like source, infers the relations between
//! them and renders the result as PlantUML.

mod database;
mod diagram;
mod inference;
pub mod matchers;
mod model;
mod parser;
mod relations;
mod renderer;
pub mod type_parser;

pub use database::{Construction, ModelRegistry};
pub use diagram::{ClassDiagram, DiagramEdge};
pub use inference::RelationInferenceEngine;
pub use model::{Attribute, ClassKind, ClassModel, Method, MethodKind, Parameter, Visibility};
pub use parser::JavaParser;
pub use relations::{
    HierarchyEdge, HierarchyKind, PairKey, Relation, RelationKind, RelationSet, Strength,
    Transition, MANY,
};
pub use renderer::{PlantUmlRenderer, END_MARKER, START_MARKER};
pub use type_parser::{parse_type, TypeRef};
