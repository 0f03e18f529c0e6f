//! Generator configuration
//!
//! Everything the extractor and the inference passes treat as a "fixed list"
//! lives here, so callers can widen or narrow it without touching the passes.

use super::DiagramError;

/// Container types whose element type becomes a `"0..*"` relation target
pub const DEFAULT_CONTAINER_TYPES: &[&str] = &[
    "ArrayList",
    "LinkedList",
    "List",
    "Vector",
    "Set",
    "HashSet",
    "TreeSet",
    "Collection",
    "Queue",
    "Deque",
    "ArrayDeque",
];

/// Built-in types that never become relation targets
pub const DEFAULT_BUILTIN_TYPES: &[&str] = &[
    "int", "long", "short", "byte", "double", "float", "char", "boolean", "void", "Integer",
    "Long", "Short", "Byte", "Double", "Float", "Character", "Boolean", "Void", "String",
    "Object", "system",
];

/// Configuration for one diagram-generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Simple names of list-like container types
    pub container_types: Vec<String>,
    /// Types excluded from relation inference
    pub builtin_types: Vec<String>,
    /// Method name whose body counts as construction evidence
    pub entry_point: String,
    /// File extension (without dot) picked up by directory sources
    pub source_extension: String,
    /// Only relate classes that were themselves declared in the corpus
    pub declared_only: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            container_types: DEFAULT_CONTAINER_TYPES.iter().map(|s| s.to_string()).collect(),
            builtin_types: DEFAULT_BUILTIN_TYPES.iter().map(|s| s.to_string()).collect(),
            entry_point: "main".to_string(),
            source_extension: "java".to_string(),
            declared_only: false,
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_point(mut self, name: impl Into<String>) -> Self {
        self.entry_point = name.into();
        self
    }

    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn with_declared_only(mut self, declared_only: bool) -> Self {
        self.declared_only = declared_only;
        self
    }

    /// Add an extra container type (e.g. a project-specific collection)
    pub fn with_container_type(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.container_types.contains(&name) {
            self.container_types.push(name);
        }
        self
    }

    /// Add an extra built-in type that should never be related
    pub fn with_builtin_type(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.builtin_types.contains(&name) {
            self.builtin_types.push(name);
        }
        self
    }

    pub fn is_container(&self, simple_name: &str) -> bool {
        self.container_types.iter().any(|c| c == simple_name)
    }

    pub fn is_builtin(&self, type_text: &str) -> bool {
        self.builtin_types.iter().any(|b| b == type_text)
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), DiagramError> {
        if self.entry_point.trim().is_empty() {
            return Err(DiagramError::config_error("entry point must not be empty"));
        }
        if self.source_extension.trim().is_empty() {
            return Err(DiagramError::config_error(
                "source extension must not be empty",
            ));
        }
        Ok(())
    }
}
