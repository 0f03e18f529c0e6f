//! Source providers
//!
//! A provider hands the pipeline every source unit of a run up front. The
//! pipeline never starts extracting until `units()` has returned, and a
//! provider failure abandons the whole run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, trace};
use walkdir::WalkDir;

use super::DiagramError;

/// One retrieved source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceUnit {
    /// Path or other identifier, used for logging only
    pub identifier: String,
    pub text: String,
}

impl SourceUnit {
    pub fn new(identifier: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            text: text.into(),
        }
    }
}

/// Producer of source units for one run
pub trait SourceProvider {
    /// Materialize every unit of the corpus
    fn units(&self) -> Result<Vec<SourceUnit>, DiagramError>;

    /// Get the name of this provider
    fn name(&self) -> &'static str;
}

/// Units held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    units: Vec<SourceUnit>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, identifier: impl Into<String>, text: impl Into<String>) -> Self {
        self.units.push(SourceUnit::new(identifier, text));
        self
    }

    pub fn push(&mut self, unit: SourceUnit) {
        self.units.push(unit);
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl From<Vec<SourceUnit>> for MemorySource {
    fn from(units: Vec<SourceUnit>) -> Self {
        Self { units }
    }
}

impl SourceProvider for MemorySource {
    fn units(&self) -> Result<Vec<SourceUnit>, DiagramError> {
        Ok(self.units.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

/// Recursive walk of a local directory
///
/// Files are returned sorted by path so first-seen naming is stable between
/// runs on the same tree.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "java".to_string(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext == self.extension.as_str())
            .unwrap_or(false)
    }
}

impl SourceProvider for DirectorySource {
    fn units(&self) -> Result<Vec<SourceUnit>, DiagramError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|source| DiagramError::Walk {
                root: self.root.clone(),
                source,
            })?;
            if entry.file_type().is_file() && self.matches_extension(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(DiagramError::EmptySource {
                root: self.root.clone(),
                extension: self.extension.clone(),
            });
        }

        let mut units = Vec::with_capacity(paths.len());
        for path in paths {
            // A root that is itself a file strips down to nothing
            let identifier = match path.strip_prefix(&self.root) {
                Ok(rel) if !rel.as_os_str().is_empty() => rel.display().to_string(),
                _ => path.display().to_string(),
            };
            trace!(identifier = %identifier, "Reading source unit");
            let bytes = fs::read(&path)
                .map_err(|source| DiagramError::source_error(identifier.clone(), source))?;
            let text = match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    debug!(identifier = %identifier, "Source unit is not valid UTF-8");
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            };
            units.push(SourceUnit::new(identifier, text));
        }

        debug!(root = %self.root.display(), units = units.len(), "Collected source units");
        Ok(units)
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_source_keeps_order() {
        let source = MemorySource::new()
            .with_unit("A.java", "class A {}")
            .with_unit("B.java", "class B {}");
        let units = source.units().unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].identifier, "A.java");
        assert_eq!(units[1].text, "class B {}");
        assert_eq!(source.name(), "memory");
    }

    #[test]
    fn test_directory_source_decodes_non_utf8_lossily() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Autor.java"), b"// Mu\xf1oz\nclass Autor {}").unwrap();
        fs::write(dir.path().join("Libro.java"), "class Libro {}").unwrap();

        let units = DirectorySource::new(dir.path()).units().unwrap();
        assert_eq!(units.len(), 2);
        assert!(units[0].text.contains("Mu\u{FFFD}oz"));
        assert!(units[0].text.ends_with("class Autor {}"));
        assert_eq!(units[1].text, "class Libro {}");
    }

    #[test]
    fn test_directory_source_walks_recursively() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("model/parts")).unwrap();
        fs::write(dir.path().join("model/Car.java"), "class Car {}").unwrap();
        fs::write(dir.path().join("model/parts/Engine.java"), "class Engine {}").unwrap();
        fs::write(dir.path().join("README.md"), "# not java").unwrap();

        let source = DirectorySource::new(dir.path());
        let units = source.units().unwrap();

        assert_eq!(units.len(), 2);
        let ids: Vec<_> = units.iter().map(|u| u.identifier.as_str()).collect();
        assert!(ids[0].ends_with("Car.java"));
        assert!(ids[1].ends_with("Engine.java"));
    }

    #[test]
    fn test_directory_source_custom_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Car.jav"), "class Car {}").unwrap();
        fs::write(dir.path().join("Bus.java"), "class Bus {}").unwrap();

        let source = DirectorySource::new(dir.path()).with_extension(".jav");
        assert_eq!(source.extension(), "jav");
        let units = source.units().unwrap();
        assert_eq!(units.len(), 1);
        assert!(units[0].text.contains("Car"));
    }

    #[test]
    fn test_directory_source_single_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Car.java");
        fs::write(&file, "class Car {}").unwrap();

        let units = DirectorySource::new(&file).units().unwrap();
        assert_eq!(units.len(), 1);
        assert!(units[0].identifier.ends_with("Car.java"));
    }

    #[test]
    fn test_directory_source_empty_is_error() {
        let dir = tempdir().unwrap();
        let err = DirectorySource::new(dir.path()).units().unwrap_err();
        assert!(matches!(err, DiagramError::EmptySource { .. }));
    }

    #[test]
    fn test_directory_source_missing_root_is_error() {
        let dir = tempdir().unwrap();
        let err = DirectorySource::new(dir.path().join("nope"))
            .units()
            .unwrap_err();
        assert!(matches!(err, DiagramError::Walk { .. }));
        assert!(err.is_source_failure());
    }
}
