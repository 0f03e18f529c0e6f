//! Declaration extractor
//!
//! Scans one source unit and registers the class, enum or interface it
//! declares. Extraction is best-effort: every facet that does not match is
//! left empty, and a unit that declares nothing leaves the registry alone.

use anyhow::Result;
use tracing::{debug, span, trace, Level};

use super::database::ModelRegistry;
use super::matchers::{
    block_body, declaration_header, find_attributes, find_declaration, find_enum_constants,
    find_instantiations, find_methods, find_supertypes, find_type_parameters, parse_parameters,
    strip_noise, DeclarationMatch,
};
use super::model::{Attribute, ClassKind, ClassModel, Method, MethodKind};
use crate::core::{GeneratorConfig, Parser};

/// Extractor for Java-like source units
#[derive(Debug, Clone, Default)]
pub struct JavaParser {
    config: GeneratorConfig,
}

impl JavaParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn extract_enum(&self, text: &str, decl: &DeclarationMatch) -> ClassModel {
        let mut model = ClassModel::enumeration(&decl.name);
        for constant in find_enum_constants(text, decl) {
            model.add_enum_constant(constant);
        }
        model
    }

    fn extract_interface(&self, text: &str, decl: &DeclarationMatch) -> ClassModel {
        let mut model = ClassModel::interface(&decl.name);
        model.type_parameters = find_type_parameters(text, decl);
        if let Some(parent) = find_supertypes(declaration_header(text, decl)).extends {
            model.extends = Some(parent);
        }
        for sig in find_methods(text, decl.start, &decl.name) {
            model.add_method(
                Method::new(&sig.name)
                    .with_visibility(sig.visibility())
                    .with_parameters(parse_parameters(&sig.params)),
            );
        }
        model
    }

    /// Build a class model plus the types its constructors and entry point
    /// instantiate
    fn extract_class(&self, text: &str, decl: &DeclarationMatch) -> (ClassModel, Vec<String>) {
        let supertypes = find_supertypes(declaration_header(text, decl));
        let mut model = ClassModel::class(&decl.name);
        model.type_parameters = find_type_parameters(text, decl);
        model.extends = supertypes.extends;
        model.implements = supertypes.implements;

        let signatures = find_methods(text, decl.start, &decl.name);

        // Fields declared after the first method are not read
        let section_end = signatures.first().map(|m| m.start).unwrap_or(text.len());
        let section = &text[decl.start..section_end.max(decl.start)];
        for found in find_attributes(section) {
            if found.name == decl.name {
                continue;
            }
            trace!(attribute = %found.name, ty = %found.type_text, "Matched attribute");
            model.add_attribute(
                Attribute::new(found.name, found.type_text).with_visibility(found.visibility),
            );
        }

        let mut constructed = Vec::new();
        for sig in signatures {
            let kind = if sig.name == decl.name {
                MethodKind::Constructor
            } else if sig.name == self.config.entry_point {
                MethodKind::EntryPoint
            } else {
                MethodKind::Regular
            };

            if kind != MethodKind::Regular {
                if let Some(body) = sig.body_open.and_then(|open| block_body(text, open)) {
                    for ty in find_instantiations(body) {
                        if self.config.is_container(&ty) {
                            continue;
                        }
                        trace!(owner = %decl.name, constructed = %ty, "Matched instantiation");
                        constructed.push(ty);
                    }
                }
            }

            model.add_method(
                Method::new(&sig.name)
                    .with_visibility(sig.visibility())
                    .with_kind(kind)
                    .with_parameters(parse_parameters(&sig.params)),
            );
        }

        (model, constructed)
    }
}

impl Parser<ModelRegistry> for JavaParser {
    fn parse(&self, input: &str, database: &mut ModelRegistry) -> Result<()> {
        let parse_span = span!(Level::DEBUG, "extract_unit", input_len = input.len());
        let _enter = parse_span.enter();

        let text = strip_noise(input);
        let Some(decl) = find_declaration(&text) else {
            debug!("No declaration found in unit");
            return Ok(());
        };

        if database.contains(&decl.name) {
            debug!(class = %decl.name, "Declaration already registered, unit skipped");
            return Ok(());
        }

        let (model, constructed) = match decl.kind {
            ClassKind::Enum => (self.extract_enum(&text, &decl), Vec::new()),
            ClassKind::Interface => (self.extract_interface(&text, &decl), Vec::new()),
            ClassKind::Class => self.extract_class(&text, &decl),
        };

        debug!(
            class = %model.name,
            kind = model.kind.keyword(),
            attributes = model.attributes.len(),
            methods = model.methods.len(),
            constructed = constructed.len(),
            "Extracted declaration"
        );

        let owner = model.name.clone();
        database.register(model);
        for ty in constructed {
            database.record_construction(owner.as_str(), ty);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "java"
    }

    fn version(&self) -> &'static str {
        "0.1.0"
    }

    fn can_parse(&self, input: &str) -> bool {
        find_declaration(&strip_noise(input)).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::java::model::{Parameter, Visibility};

    fn extract(sources: &[&str]) -> ModelRegistry {
        let parser = JavaParser::new();
        let mut registry = ModelRegistry::new();
        for source in sources {
            parser.parse(source, &mut registry).unwrap();
        }
        registry
    }

    #[test]
    fn test_parser_metadata() {
        let parser = JavaParser::new();
        assert_eq!(parser.name(), "java");
        assert_eq!(parser.version(), "0.1.0");
        assert!(parser.can_parse("public class A {}"));
        assert!(!parser.can_parse("// class A {}"));
    }

    #[test]
    fn test_car_engine_example() {
        let registry = extract(&[
            "class Engine {}",
            "class Car { private Engine engine; public Car(){ engine = new Engine(); } }",
        ]);

        let car = registry.get_class("Car").unwrap();
        assert_eq!(car.attributes.len(), 1);
        assert_eq!(car.attributes[0].name, "engine");
        assert_eq!(car.attributes[0].declared_type, "Engine");
        assert_eq!(car.attributes[0].visibility, Visibility::Private);
        assert_eq!(car.methods.len(), 1);
        assert!(car.methods[0].is_constructor());

        let evidence: Vec<_> = registry.constructed_by("Car").unwrap().iter().collect();
        assert_eq!(evidence, vec!["Engine"]);
    }

    #[test]
    fn test_constructor_visibility_is_public() {
        let registry = extract(&["class Secret {\n    private Secret() {}\n}"]);
        let ctor = &registry.get_class("Secret").unwrap().methods[0];
        assert_eq!(ctor.kind, MethodKind::Constructor);
        assert_eq!(ctor.visibility, Visibility::Public);
    }

    #[test]
    fn test_entry_point_evidence_goes_to_declaring_class() {
        let registry = extract(&[r#"
public class App {
    public static void main(String[] args) {
        Garage garage = new Garage();
        List<Car> cars = new ArrayList<>();
        helper = new Helper(garage);
    }
}
"#]);
        let app = registry.get_class("App").unwrap();
        assert_eq!(app.methods[0].kind, MethodKind::EntryPoint);
        assert_eq!(
            app.methods[0].parameters,
            vec![Parameter::new("String[]", "args")]
        );
        let evidence: Vec<_> = registry.constructed_by("App").unwrap().iter().collect();
        assert_eq!(evidence, vec!["Garage", "Helper"]);
    }

    #[test]
    fn test_regular_method_bodies_are_not_evidence() {
        let registry = extract(&[
            "class Shop {\n    void restock() {\n        item = new Item();\n    }\n}",
        ]);
        assert!(registry.constructed_by("Shop").is_none());
    }

    #[test]
    fn test_custom_entry_point() {
        let parser = JavaParser::with_config(GeneratorConfig::default().with_entry_point("run"));
        let mut registry = ModelRegistry::new();
        parser
            .parse(
                "class Job {\n    public void run() {\n        task = new Task();\n    }\n}",
                &mut registry,
            )
            .unwrap();
        assert_eq!(registry.get_class("Job").unwrap().methods[0].kind, MethodKind::EntryPoint);
        assert!(registry.constructed_by("Job").unwrap().contains("Task"));
    }

    #[test]
    fn test_fields_after_methods_are_ignored() {
        let registry = extract(&[r#"
class Counter {
    private int count;
    public void increment() {
        count++;
    }
    private Logger logger;
}
"#]);
        let counter = registry.get_class("Counter").unwrap();
        let names: Vec<_> = counter.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["count"]);
    }

    #[test]
    fn test_inheritance_and_realization() {
        let registry = extract(&[
            "public class Dog extends Animal implements Pet, Serializable {\n}",
        ]);
        let dog = registry.get_class("Dog").unwrap();
        assert_eq!(dog.extends.as_deref(), Some("Animal"));
        assert_eq!(dog.implements, vec!["Pet", "Serializable"]);
    }

    #[test]
    fn test_enum_extraction() {
        let registry = extract(&["public enum Color {\n    RED, GREEN, BLUE;\n}"]);
        let color = registry.get_class("Color").unwrap();
        assert_eq!(color.kind, ClassKind::Enum);
        assert_eq!(color.enum_constants, vec!["RED", "GREEN", "BLUE"]);
        assert!(color.attributes.is_empty());
    }

    #[test]
    fn test_interface_extraction() {
        let registry = extract(&[
            "public interface Drivable extends Movable {\n    void drive(Road road);\n}",
        ]);
        let drivable = registry.get_class("Drivable").unwrap();
        assert_eq!(drivable.kind, ClassKind::Interface);
        assert_eq!(drivable.extends.as_deref(), Some("Movable"));
        assert_eq!(drivable.methods.len(), 1);
        assert_eq!(drivable.methods[0].parameters[0].param_type, "Road");
    }

    #[test]
    fn test_generic_declarations_record_type_parameters() {
        let registry = extract(&[
            "public class Pair<K extends Comparable<K>, V> {\n    private K key;\n}",
            "interface Source<T> {\n    T next();\n}",
        ]);
        assert_eq!(registry.get_class("Pair").unwrap().type_parameters, vec!["K", "V"]);
        assert_eq!(registry.get_class("Source").unwrap().type_parameters, vec!["T"]);
    }

    #[test]
    fn test_first_seen_wins_and_skips_evidence() {
        let registry = extract(&[
            "class Car { private Engine engine; }",
            "class Car { private Wheel wheel; public Car() { wheel = new Wheel(); } }",
        ]);
        let car = registry.get_class("Car").unwrap();
        assert_eq!(car.attributes[0].name, "engine");
        assert!(registry.constructed_by("Car").is_none());
        assert_eq!(registry.class_count(), 1);
    }

    #[test]
    fn test_unit_without_declaration() {
        let registry = extract(&["import java.util.List;", ""]);
        assert_eq!(registry.class_count(), 0);
    }

    #[test]
    fn test_commented_out_declaration_is_ignored() {
        let registry = extract(&["/* class Ghost {} */\n// class Phantom {}\nclass Real {}"]);
        assert!(registry.get_class("Ghost").is_none());
        assert!(registry.get_class("Phantom").is_none());
        assert!(registry.get_class("Real").is_some());
    }

    #[test]
    fn test_malformed_container_keeps_other_facets() {
        let registry = extract(&[
            "class Broken {\n    private List<Book books;\n    private Author author;\n}",
        ]);
        let broken = registry.get_class("Broken").unwrap();
        assert!(broken.attributes.iter().any(|a| a.name == "author"));
    }
}
