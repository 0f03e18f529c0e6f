//! Core error types for diagram generation
//!
//! Only whole-run failures are modelled here. Extraction misses and malformed
//! facets never surface as errors; they contribute nothing to the model.

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for diagram generation
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Source error: failed to read {identifier}")]
    Source {
        identifier: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Source error: failed to walk {}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Source error: no .{extension} files found under {}", root.display())]
    EmptySource { root: PathBuf, extension: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("Render error: {message}")]
    Render { message: String },
}

impl DiagramError {
    /// Create a new source (retrieval) error for one unit or directory
    pub fn source_error(identifier: impl Into<String>, source: std::io::Error) -> Self {
        Self::Source {
            identifier: identifier.into(),
            source,
        }
    }

    /// Create a new config error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Whether this error came from the retrieval side of the pipeline
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            Self::Source { .. } | Self::Walk { .. } | Self::EmptySource { .. }
        )
    }
}
