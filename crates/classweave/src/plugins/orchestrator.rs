//! Pipeline orchestrator
//!
//! Owns everything one diagram-generation run needs:
//! SourceProvider → JavaParser → ModelRegistry → RelationInferenceEngine → PlantUmlRenderer
//!
//! Every call to [`Orchestrator::build`] starts from an empty registry, so no
//! state leaks from one run into the next.

use anyhow::Result;
use tracing::{debug, info, span, trace, Level};

use crate::core::{Database, GeneratorConfig, Parser, Renderer, SourceProvider, SourceUnit};
use crate::plugins::java::{
    ClassDiagram, JavaParser, ModelRegistry, PlantUmlRenderer, RelationInferenceEngine,
};

/// Runs the extract → infer → render pipeline
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: GeneratorConfig,
    parser: JavaParser,
    engine: RelationInferenceEngine,
    renderer: PlantUmlRenderer,
}

impl Orchestrator {
    /// Create an orchestrator with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an orchestrator whose stages all share `config`
    pub fn with_config(config: GeneratorConfig) -> Self {
        Self {
            parser: JavaParser::with_config(config.clone()),
            engine: RelationInferenceEngine::with_config(config.clone()),
            renderer: PlantUmlRenderer::with_config(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Extract every unit into a fresh registry
    pub fn extract(&self, units: &[SourceUnit]) -> Result<ModelRegistry> {
        let extract_span = span!(Level::DEBUG, "pipeline_extract", units = units.len());
        let _enter = extract_span.enter();

        let mut registry = ModelRegistry::new();
        for unit in units {
            trace!(unit = %unit.identifier, "Extracting unit");
            self.parser.parse(&unit.text, &mut registry)?;
        }

        debug!(
            classes = registry.node_count(),
            evidence = registry.edge_count(),
            "Extraction completed"
        );
        Ok(registry)
    }

    /// Fetch, extract and infer, without rendering
    pub fn build<P>(&self, provider: &P) -> Result<ClassDiagram>
    where
        P: SourceProvider + ?Sized,
    {
        let build_span = span!(Level::INFO, "build_diagram", provider = provider.name());
        let _enter = build_span.enter();

        self.config.validate()?;

        // Step 1: Materialize every unit before any extraction starts
        let fetch_span = span!(Level::DEBUG, "pipeline_fetch");
        let _fetch_enter = fetch_span.enter();
        let units = provider.units()?;
        debug!(units = units.len(), "Source units retrieved");
        drop(_fetch_enter);

        // Step 2: Extract
        let registry = self.extract(&units)?;

        // Step 3: Infer over the completed registry
        let infer_span = span!(Level::DEBUG, "pipeline_infer");
        let _infer_enter = infer_span.enter();
        let diagram = ClassDiagram::infer(registry, &self.engine);
        debug!(edges = diagram.edge_count(), "Inference completed");
        drop(_infer_enter);

        Ok(diagram)
    }

    /// Render a finished diagram
    pub fn render(&self, diagram: &ClassDiagram) -> Result<String> {
        self.renderer.render(diagram)
    }

    /// Run the complete pipeline and return the PlantUML document
    pub fn run<P>(&self, provider: &P) -> Result<String>
    where
        P: SourceProvider + ?Sized,
    {
        let run_span = span!(Level::INFO, "generate_diagram", provider = provider.name());
        let _enter = run_span.enter();

        info!("Starting diagram generation");
        let diagram = self.build(provider)?;
        let output = self.render(&diagram)?;
        info!(
            classes = diagram.node_count(),
            edges = diagram.edge_count(),
            "Diagram generation completed"
        );

        Ok(output)
    }
}
