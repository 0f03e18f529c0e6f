//! Command-line interface for the classweave utility
//!
//! Walks a source tree and prints a PlantUML class diagram, or an inspection
//! report of what was extracted and inferred.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

use classweave::core::logging::init_logging;
use classweave::core::{DirectorySource, GeneratorConfig};
use classweave::plugins::java::{ClassDiagram, ClassModel, Construction, HierarchyEdge, Relation};
use classweave::plugins::Orchestrator;

/// classweave - Generate PlantUML class diagrams from Java sources
#[derive(Parser)]
#[command(name = "classweave")]
#[command(about = "A Rust utility to turn Java source trees into PlantUML class diagrams")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Options shared by every command that reads a source tree
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Source directory (or single file) to scan
    #[arg(short, long, default_value = ".")]
    pub input: PathBuf,

    /// File extension of source units
    #[arg(long, default_value = "java")]
    pub extension: String,

    /// Method whose body counts as construction evidence, like a constructor
    #[arg(long, default_value = "main")]
    pub entry_point: String,

    /// Only draw relations between classes declared in the scanned tree
    #[arg(long)]
    pub declared_only: bool,
}

impl SourceArgs {
    fn config(&self) -> GeneratorConfig {
        GeneratorConfig::default()
            .with_source_extension(self.extension.as_str())
            .with_entry_point(self.entry_point.as_str())
            .with_declared_only(self.declared_only)
    }

    fn provider(&self, config: &GeneratorConfig) -> DirectorySource {
        DirectorySource::new(&self.input).with_extension(config.source_extension.as_str())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a PlantUML class diagram
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file for the diagram (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the extracted classes and inferred relations
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Machine-readable inspection output
#[derive(Serialize)]
struct InspectReport<'a> {
    classes: Vec<&'a ClassModel>,
    construction: Vec<Construction>,
    hierarchy: Vec<&'a HierarchyEdge>,
    relations: Vec<&'a Relation>,
    lines: Vec<String>,
}

impl<'a> InspectReport<'a> {
    fn new(diagram: &'a ClassDiagram) -> Self {
        let registry = diagram.registry();
        Self {
            classes: registry.classes().collect(),
            construction: registry
                .construction_evidence()
                .flat_map(|(owner, types)| {
                    types.iter().map(move |ty| Construction::new(owner, ty.as_str()))
                })
                .collect(),
            hierarchy: diagram.relations().hierarchy().collect(),
            relations: diagram.relations().relations().collect(),
            lines: diagram.relation_lines(),
        }
    }
}

/// Main CLI application
#[derive(Default)]
pub struct ClassweaveApp;

impl ClassweaveApp {
    /// Create a new application instance
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("CLASSWEAVE_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("CLASSWEAVE_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("classweave v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate { source, output } => {
                self.generate_command(&source, output, cli.verbose)
            }
            Commands::Inspect { source, json } => self.inspect_command(&source, json, cli.verbose),
        }
    }

    /// Build the diagram for a source tree
    pub fn build(&self, source: &SourceArgs) -> Result<ClassDiagram> {
        let config = source.config();
        let provider = source.provider(&config);
        Orchestrator::with_config(config).build(&provider)
    }

    /// Render the PlantUML document for a source tree
    pub fn generate_document(&self, source: &SourceArgs) -> Result<String> {
        let config = source.config();
        let provider = source.provider(&config);
        Orchestrator::with_config(config).run(&provider)
    }

    /// Handle the generate command
    fn generate_command(
        &self,
        source: &SourceArgs,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        if verbose {
            eprintln!("Scanning {}", source.input.display());
        }

        let document = self.generate_document(source)?;
        info!(input = %source.input.display(), bytes = document.len(), "Diagram generated");

        if verbose {
            eprintln!("Generated {} bytes of PlantUML", document.len());
        }

        self.write_output(output, &document)
    }

    /// Handle the inspect command
    fn inspect_command(&self, source: &SourceArgs, json: bool, verbose: bool) -> Result<()> {
        if verbose {
            eprintln!("Scanning {}", source.input.display());
        }

        let diagram = self.build(source)?;
        info!(
            input = %source.input.display(),
            classes = diagram.registry().class_count(),
            "Diagram inspected"
        );
        let report = Self::inspect_report(&diagram, json)?;
        self.write_output(None, &report)
    }

    /// Format the extracted model and relations
    pub fn inspect_report(diagram: &ClassDiagram, json: bool) -> Result<String> {
        if json {
            return Ok(serde_json::to_string_pretty(&InspectReport::new(diagram))?);
        }

        let registry = diagram.registry();
        let mut out = String::new();
        out.push_str(&format!("Classes: {}\n", registry.class_count()));
        for class in registry.classes() {
            out.push_str(&format!(
                "  {} {} ({} attributes, {} methods)\n",
                class.kind.keyword(),
                class.name,
                class.attributes.len(),
                class.methods.len()
            ));
        }

        out.push_str(&format!(
            "Construction evidence: {}\n",
            registry.construction_count()
        ));
        for (owner, types) in registry.construction_evidence() {
            let types: Vec<_> = types.iter().map(String::as_str).collect();
            out.push_str(&format!("  {} -> {}\n", owner, types.join(", ")));
        }

        let lines = diagram.relation_lines();
        out.push_str(&format!("Relations: {}\n", lines.len()));
        for line in lines {
            out.push_str(&format!("  {}\n", line));
        }
        Ok(out)
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn source_args(input: &Path) -> SourceArgs {
        SourceArgs {
            input: input.to_path_buf(),
            extension: "java".to_string(),
            entry_point: "main".to_string(),
            declared_only: false,
        }
    }

    fn write_car_engine(dir: &Path) {
        fs::write(dir.join("Engine.java"), "class Engine {}").unwrap();
        fs::write(
            dir.join("Car.java"),
            "class Car { private Engine engine; public Car(){ engine = new Engine(); } }",
        )
        .unwrap();
    }

    #[test]
    fn test_cli_parsing_generate_command() {
        let args = vec![
            "classweave",
            "generate",
            "--input",
            "src",
            "--output",
            "out.puml",
            "--extension",
            "jav",
            "--entry-point",
            "run",
            "--declared-only",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Generate { source, output } => {
                assert_eq!(source.input, PathBuf::from("src"));
                assert_eq!(output, Some(PathBuf::from("out.puml")));
                assert_eq!(source.extension, "jav");
                assert_eq!(source.entry_point, "run");
                assert!(source.declared_only);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parsing_defaults() {
        let cli = Cli::try_parse_from(["classweave", "generate"]).unwrap();
        assert!(!cli.verbose);
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert_eq!(cli.log_format, LogFormat::Compact);
        match cli.command {
            Commands::Generate { source, output } => {
                assert_eq!(source.input, PathBuf::from("."));
                assert_eq!(source.extension, "java");
                assert_eq!(source.entry_point, "main");
                assert!(!source.declared_only);
                assert!(output.is_none());
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_parsing_inspect_command() {
        let args = vec!["classweave", "--verbose", "--log-level", "trace", "inspect", "-i", "app", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_level, LogLevel::Trace);
        match cli.command {
            Commands::Inspect { source, json } => {
                assert_eq!(source.input, PathBuf::from("app"));
                assert!(json);
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["classweave", "--log-format", "xml", "generate"]).is_err());
    }

    #[test]
    fn test_generate_document() {
        let dir = tempdir().unwrap();
        write_car_engine(dir.path());

        let app = ClassweaveApp::new();
        let document = app.generate_document(&source_args(dir.path())).unwrap();
        assert!(document.starts_with("@startuml\n"));
        assert!(document.contains("\nCar *--> Engine\n"));
    }

    #[test]
    fn test_generate_command_writes_file() {
        let dir = tempdir().unwrap();
        write_car_engine(dir.path());
        let out = dir.path().join("diagram.puml");

        let mut app = ClassweaveApp::new();
        let cli = Cli::try_parse_from([
            "classweave",
            "generate",
            "-i",
            dir.path().to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ])
        .unwrap();
        app.run(cli).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.ends_with("@enduml\n"));
        assert!(written.contains("class Car {\n    -engine: Engine\n    +Car()\n}\n"));
    }

    #[test]
    fn test_generate_command_fails_on_empty_tree() {
        let dir = tempdir().unwrap();
        let mut app = ClassweaveApp::new();
        let cli = Cli::try_parse_from(["classweave", "generate", "-i", dir.path().to_str().unwrap()])
            .unwrap();
        let err = app.run(cli).unwrap_err();
        assert!(err.to_string().contains("no .java files"));
    }

    #[test]
    fn test_inspect_report_human() {
        let dir = tempdir().unwrap();
        write_car_engine(dir.path());

        let app = ClassweaveApp::new();
        let diagram = app.build(&source_args(dir.path())).unwrap();
        let report = ClassweaveApp::inspect_report(&diagram, false).unwrap();

        assert!(report.contains("Classes: 2\n"));
        assert!(report.contains("  class Car (1 attributes, 1 methods)\n"));
        assert!(report.contains("  Car -> Engine\n"));
        assert!(report.contains("Relations: 1\n  Car *--> Engine\n"));
    }

    #[test]
    fn test_inspect_report_json() {
        let dir = tempdir().unwrap();
        write_car_engine(dir.path());

        let app = ClassweaveApp::new();
        let diagram = app.build(&source_args(dir.path())).unwrap();
        let report = ClassweaveApp::inspect_report(&diagram, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(value["classes"].as_array().unwrap().len(), 2);
        assert_eq!(value["construction"][0]["owner"], "Car");
        assert_eq!(value["relations"][0]["kind"]["type"], "composition");
        assert_eq!(value["relations"][0]["kind"]["bidirectional"], false);
        assert_eq!(value["lines"][0], "Car *--> Engine");
    }

    #[test]
    fn test_write_output_to_file() {
        let app = ClassweaveApp::new();
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("output.puml");

        app.write_output(Some(file_path.clone()), "@startuml\n@enduml\n")
            .unwrap();

        let read_content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(read_content, "@startuml\n@enduml\n");
    }
}
