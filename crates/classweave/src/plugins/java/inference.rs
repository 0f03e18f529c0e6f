//! Relation inference
//!
//! Runs over a completed [`ModelRegistry`] and produces a [`RelationSet`]. The
//! passes run in a fixed order because later passes rewrite what earlier ones
//! produced:
//!
//! 0. hierarchy (`extends` / `implements`)
//! 1. attribute associations
//! 2. container multiplicities
//! 3. construction evidence (composition, then shared-ownership downgrade)
//! 4. parameter dependencies

use std::collections::HashSet;

use tracing::{debug, span, trace, Level};

use super::database::ModelRegistry;
use super::model::{ClassModel, MethodKind};
use super::relations::{HierarchyKind, RelationSet, Transition};
use super::type_parser::{parse_type, TypeRef};
use crate::core::GeneratorConfig;

/// Inference engine over a finished registry
#[derive(Debug, Clone, Default)]
pub struct RelationInferenceEngine {
    config: GeneratorConfig,
}

impl RelationInferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run every pass and return the final relation set
    pub fn infer(&self, registry: &ModelRegistry) -> RelationSet {
        let infer_span = span!(
            Level::DEBUG,
            "infer_relations",
            classes = registry.class_count(),
            evidence = registry.construction_count()
        );
        let _enter = infer_span.enter();

        let mut relations = RelationSet::new();
        self.hierarchy_pass(registry, &mut relations);
        self.attribute_pass(registry, &mut relations);
        self.container_pass(registry, &mut relations);
        self.construction_pass(registry, &mut relations);
        self.dependency_pass(registry, &mut relations);

        debug!(
            hierarchy = relations.hierarchy_count(),
            relations = relations.relation_count(),
            "Inference completed"
        );
        relations
    }

    /// Simple name of `ty` when it may be a relation target
    ///
    /// Arrays, wildcards, parameterized types and built-ins are never targets.
    pub fn known_target<'a>(&self, ty: &'a TypeRef, registry: &ModelRegistry) -> Option<&'a str> {
        if ty.is_wildcard() || ty.is_array() || ty.is_parameterized() {
            return None;
        }
        let name = ty.simple_name();
        if name.is_empty() || self.config.is_builtin(name) || self.config.is_builtin(&ty.name) {
            return None;
        }
        if self.config.declared_only && !registry.contains(name) {
            return None;
        }
        Some(name)
    }

    /// `known_target` as seen from inside `owner`, whose own type parameters
    /// are not classes
    fn member_target<'a>(
        &self,
        owner: &ClassModel,
        ty: &'a TypeRef,
        registry: &ModelRegistry,
    ) -> Option<&'a str> {
        self.known_target(ty, registry).filter(|name| !owner.is_type_parameter(name))
    }

    /// Element type of a container reference, `None` for anything else
    fn container_element<'a>(&self, ty: &'a TypeRef) -> Option<&'a TypeRef> {
        if ty.is_array() || !self.config.is_container(ty.simple_name()) {
            return None;
        }
        ty.element()
    }

    fn is_container(&self, ty: &TypeRef) -> bool {
        !ty.is_array() && self.config.is_container(ty.simple_name())
    }

    pub fn hierarchy_pass(&self, registry: &ModelRegistry, relations: &mut RelationSet) {
        for class in registry.classes() {
            if let Some(parent) = &class.extends {
                if self.hierarchy_target(parent, registry) {
                    let outcome = relations.add_hierarchy(&class.name, parent, HierarchyKind::Inheritance);
                    log_transition("hierarchy", &class.name, parent, outcome);
                }
            }
            for interface in &class.implements {
                if self.hierarchy_target(interface, registry) {
                    let outcome =
                        relations.add_hierarchy(&class.name, interface, HierarchyKind::Realization);
                    log_transition("hierarchy", &class.name, interface, outcome);
                }
            }
        }
    }

    fn hierarchy_target(&self, name: &str, registry: &ModelRegistry) -> bool {
        !self.config.declared_only || registry.contains(name)
    }

    pub fn attribute_pass(&self, registry: &ModelRegistry, relations: &mut RelationSet) {
        for class in registry.classes() {
            for attribute in &class.attributes {
                let Some(ty) = &attribute.type_ref else {
                    trace!(owner = %class.name, attribute = %attribute.name, "Malformed attribute type skipped");
                    continue;
                };
                if self.is_container(ty) {
                    continue;
                }
                if let Some(target) = self.member_target(class, ty, registry) {
                    let outcome = relations.associate(&class.name, target);
                    log_transition("attribute", &class.name, target, outcome);
                }
            }
        }
    }

    pub fn container_pass(&self, registry: &ModelRegistry, relations: &mut RelationSet) {
        for class in registry.classes() {
            for attribute in &class.attributes {
                let Some(ty) = &attribute.type_ref else {
                    continue;
                };
                if !self.is_container(ty) {
                    continue;
                }
                let Some(element) = self.container_element(ty) else {
                    trace!(owner = %class.name, attribute = %attribute.name, "Container without element type skipped");
                    continue;
                };
                if let Some(target) = self.member_target(class, element, registry) {
                    let outcome = relations.associate_many(&class.name, target);
                    log_transition("container", &class.name, target, outcome);
                }
            }
        }
    }

    pub fn construction_pass(&self, registry: &ModelRegistry, relations: &mut RelationSet) {
        for (owner, constructed) in registry.construction_evidence() {
            for ty in constructed {
                let ty_ref = TypeRef::new(ty.as_str());
                if let Some(target) = self.known_target(&ty_ref, registry) {
                    let outcome = relations.compose(owner, target);
                    log_transition("composition", owner, target, outcome);
                }
            }
        }

        // Shared ownership needs the complete evidence map
        for (owner, constructed) in registry.construction_evidence() {
            for ty in constructed {
                if registry.owners_of(ty).len() < 2 {
                    continue;
                }
                let outcome = relations.share(owner, ty);
                log_transition("aggregation", owner, ty, outcome);
            }
        }
    }

    pub fn dependency_pass(&self, registry: &ModelRegistry, relations: &mut RelationSet) {
        for class in registry.classes() {
            let held = self.attribute_types(class);
            for method in &class.methods {
                if method.kind == MethodKind::Constructor {
                    continue;
                }
                for param in &method.parameters {
                    let Some(ty) = parse_type(&param.param_type) else {
                        continue;
                    };
                    let ty = if self.is_container(&ty) {
                        match self.container_element(&ty) {
                            Some(element) => element.clone(),
                            None => continue,
                        }
                    } else {
                        ty
                    };
                    let Some(target) = self.member_target(class, &ty, registry) else {
                        continue;
                    };
                    if held.contains(target) {
                        trace!(
                            owner = %class.name,
                            related = target,
                            "Parameter type already held as attribute"
                        );
                        continue;
                    }
                    let outcome = relations.depend(&class.name, target);
                    log_transition("dependency", &class.name, target, outcome);
                }
            }
        }
    }

    /// Simple names of the class's attribute types, containers unwrapped
    fn attribute_types<'a>(&self, class: &'a ClassModel) -> HashSet<&'a str> {
        class
            .attributes
            .iter()
            .filter_map(|attr| {
                let ty = attr.type_ref.as_ref()?;
                let ty = if self.is_container(ty) {
                    ty.element()?
                } else {
                    ty
                };
                Some(ty.simple_name())
            })
            .collect()
    }
}

fn log_transition(pass: &'static str, owner: &str, target: &str, outcome: Transition) {
    match outcome {
        Transition::Unchanged => {}
        Transition::Inserted => trace!(pass, owner, related = target, "Edge added"),
        Transition::Suppressed => {
            trace!(pass, owner, related = target, "Weaker evidence suppressed by existing edge")
        }
        other => trace!(pass, owner, related = target, transition = ?other, "Edge rewritten"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Parser;
    use crate::plugins::java::parser::JavaParser;

    fn registry(sources: &[&str]) -> ModelRegistry {
        let parser = JavaParser::new();
        let mut registry = ModelRegistry::new();
        for source in sources {
            parser.parse(source, &mut registry).unwrap();
        }
        registry
    }

    fn lines(relations: &RelationSet) -> Vec<String> {
        relations
            .hierarchy()
            .map(ToString::to_string)
            .chain(relations.relations().map(ToString::to_string))
            .collect()
    }

    fn infer(sources: &[&str]) -> Vec<String> {
        lines(&RelationInferenceEngine::new().infer(&registry(sources)))
    }

    #[test]
    fn test_car_engine_composition() {
        let result = infer(&[
            "class Engine {}",
            "class Car { private Engine engine; public Car(){ engine = new Engine(); } }",
        ]);
        assert_eq!(result, vec!["Car *--> Engine"]);
    }

    #[test]
    fn test_library_books_multiplicity() {
        let result = infer(&[
            "class Library { private ArrayList<Book> books; }",
            "class Book {}",
        ]);
        assert_eq!(result, vec!["Library --> \"0..*\" Book"]);
    }

    #[test]
    fn test_directional_collapse() {
        let result = infer(&[
            "class Husband { private Wife wife; }",
            "class Wife { private Husband husband; }",
        ]);
        assert_eq!(result, vec!["Wife -- Husband"]);
    }

    #[test]
    fn test_reverse_plain_with_container() {
        let result = infer(&[
            "class Library { private List<Book> books; }",
            "class Book { private Library library; }",
        ]);
        assert_eq!(result, vec!["Library -- \"0..*\" Book"]);
    }

    #[test]
    fn test_many_to_many() {
        let result = infer(&[
            "class Course { private Set<Student> students; }",
            "class Student { private List<Course> courses; }",
        ]);
        assert_eq!(result, vec!["Course \"0..*\" -- \"0..*\" Student"]);
    }

    #[test]
    fn test_shared_ownership_downgrades_to_aggregation() {
        let result = infer(&[
            "class Engine {}",
            "class Car { private Engine engine; public Car() { engine = new Engine(); } }",
            "class Boat { private Engine engine; public Boat() { engine = new Engine(); } }",
        ]);
        assert_eq!(result, vec!["Car o--> Engine", "Boat o--> Engine"]);
    }

    #[test]
    fn test_entry_point_composition() {
        let result = infer(&[r#"
public class Main {
    public static void main(String[] args) {
        Shop shop = new Shop();
    }
}
"#]);
        assert_eq!(result, vec!["Main *--> Shop"]);
    }

    #[test]
    fn test_dependency_pass() {
        let result = infer(&[r#"
class Driver {
    private Car car;
    public Driver(Car car, License license) {
        this.car = car;
    }
    public void drive(Car other, Road road, List<Passenger> passengers, int speed) {
    }
}
"#]);
        assert_eq!(
            result,
            vec!["Driver --> Car", "Driver ..> Road", "Driver ..> Passenger"]
        );
    }

    #[test]
    fn test_dependency_suppressed_by_container_attribute() {
        let result = infer(&[r#"
class Playlist {
    private List<Song> songs;
    public void add(Song song) {
    }
}
"#]);
        assert_eq!(result, vec!["Playlist --> \"0..*\" Song"]);
    }

    #[test]
    fn test_dependency_does_not_add_alongside_stronger_edge() {
        let result = infer(&[
            "class Order { private Customer customer; }",
            "class Customer {\n    public void place(Order order) {\n    }\n}",
        ]);
        assert_eq!(result, vec!["Order --> Customer"]);
    }

    #[test]
    fn test_builtins_arrays_and_generics_are_not_targets() {
        let result = infer(&[r#"
class Holder {
    private String name;
    private int count;
    private Engine[] spares;
    private Map<String, Engine> byName;
    private Optional<Engine> maybe;
    public void accept(Integer value, Object any) {
    }
}
"#]);
        assert!(result.is_empty(), "unexpected relations: {:?}", result);
    }

    #[test]
    fn test_hierarchy_coexists_with_association() {
        let result = infer(&[
            "class Employee {}",
            "class Manager extends Employee implements Reviewer { private Employee assistant; }",
        ]);
        assert_eq!(
            result,
            vec!["Employee <|-- Manager", "Manager ..|> Reviewer", "Manager --> Employee"]
        );
    }

    #[test]
    fn test_declared_only_filters_external_types() {
        let registry = registry(&[
            "class Car extends Vehicle { private Engine engine; private Wheel wheel; }",
            "class Engine {}",
        ]);
        let engine =
            RelationInferenceEngine::with_config(GeneratorConfig::default().with_declared_only(true));
        assert_eq!(lines(&engine.infer(&registry)), vec!["Car --> Engine"]);

        let open = RelationInferenceEngine::new();
        assert_eq!(
            lines(&open.infer(&registry)),
            vec!["Vehicle <|-- Car", "Car --> Engine", "Car --> Wheel"]
        );
    }

    #[test]
    fn test_known_target() {
        let engine = RelationInferenceEngine::new();
        let registry = ModelRegistry::new();
        let check = |text: &str| {
            let ty = parse_type(text).unwrap();
            engine.known_target(&ty, &registry).map(str::to_string)
        };
        assert_eq!(check("Engine"), Some("Engine".to_string()));
        assert_eq!(check("com.acme.Engine"), Some("Engine".to_string()));
        assert_eq!(check("String"), None);
        assert_eq!(check("Engine[]"), None);
        assert_eq!(check("List<Engine>"), None);
    }

    #[test]
    fn test_type_parameters_are_not_targets() {
        let lines = infer(&[
            "class Box<T> {\n    private T value;\n    private List<T> history;\n    public void put(T item) {\n    }\n}",
            "class Shelf<E extends Box<E>> {\n    private Box<E> top;\n    private Label label;\n}",
        ]);
        assert_eq!(lines, vec!["Shelf --> Label"]);
    }

    #[test]
    fn test_inference_is_idempotent() {
        let registry = registry(&[
            "class A { private B b; private List<C> cs; public A() { b = new B(); } }",
            "class B { private A a; }",
            "class C { public void use(D d) {} }",
        ]);
        let engine = RelationInferenceEngine::new();
        assert_eq!(lines(&engine.infer(&registry)), lines(&engine.infer(&registry)));
    }
}
