//! PlantUML renderer
//!
//! Pure string assembly: enum blocks, class and interface blocks, then every
//! hierarchy and relation line, between the start and end markers.

use std::fmt::Write as _;

use anyhow::Result;
use tracing::{debug, span, Level};

use super::diagram::ClassDiagram;
use super::model::{Attribute, ClassKind, ClassModel, Method, Visibility};
use crate::core::{GeneratorConfig, Renderer};

pub const START_MARKER: &str = "@startuml";
pub const END_MARKER: &str = "@enduml";

const INDENT: &str = "    ";

/// Renders a [`ClassDiagram`] as PlantUML text
#[derive(Debug, Clone, Default)]
pub struct PlantUmlRenderer {
    config: GeneratorConfig,
}

impl PlantUmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The config decides which attribute types get the `[*]` marker
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    fn attribute_line(&self, attribute: &Attribute) -> String {
        let type_text = match &attribute.type_ref {
            Some(ty) if !ty.is_array() && self.config.is_container(ty.simple_name()) => {
                match ty.element() {
                    Some(element) => format!("{} [*]", element),
                    None => attribute.declared_type.clone(),
                }
            }
            Some(ty) => ty.to_string(),
            None => attribute.declared_type.clone(),
        };
        format!(
            "{}{}: {}",
            attribute.visibility.to_char(),
            attribute.name,
            type_text
        )
    }

    fn method_line(owner: ClassKind, method: &Method) -> String {
        let params = method
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.param_type, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        // Interface members without a modifier are public
        let visibility = match (owner, method.visibility) {
            (ClassKind::Interface, Visibility::Package) => Visibility::Public,
            (_, declared) => declared,
        };
        format!("{}{}({})", visibility.to_char(), method.name, params)
    }

    fn write_enum(out: &mut String, model: &ClassModel) -> std::fmt::Result {
        writeln!(out, "enum {} {{", model.name)?;
        for constant in &model.enum_constants {
            writeln!(out, "{INDENT}{constant}")?;
        }
        writeln!(out, "}}")
    }

    fn write_class(&self, out: &mut String, model: &ClassModel) -> std::fmt::Result {
        writeln!(out, "{} {} {{", model.kind.keyword(), model.name)?;
        for attribute in &model.attributes {
            writeln!(out, "{INDENT}{}", self.attribute_line(attribute))?;
        }
        for method in &model.methods {
            writeln!(out, "{INDENT}{}", Self::method_line(model.kind, method))?;
        }
        writeln!(out, "}}")
    }

    fn write_document(&self, out: &mut String, diagram: &ClassDiagram) -> std::fmt::Result {
        writeln!(out, "{START_MARKER}")?;

        let classes = diagram.registry().classes();
        let (enums, others): (Vec<_>, Vec<_>) = classes.partition(|c| c.kind == ClassKind::Enum);
        for model in enums {
            Self::write_enum(out, model)?;
        }
        for model in others {
            self.write_class(out, model)?;
        }

        writeln!(out)?;
        for line in diagram.relation_lines() {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "{END_MARKER}")
    }
}

impl Renderer<ClassDiagram> for PlantUmlRenderer {
    type Output = String;

    fn render(&self, database: &ClassDiagram) -> Result<Self::Output> {
        let render_span = span!(
            Level::DEBUG,
            "render_plantuml",
            classes = database.registry().class_count(),
            relations = database.relations().len()
        );
        let _enter = render_span.enter();

        let mut out = String::new();
        self.write_document(&mut out, database)?;

        debug!(output_len = out.len(), "Rendering completed");
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "plantuml"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn format(&self) -> &'static str {
        "plantuml"
    }
}
