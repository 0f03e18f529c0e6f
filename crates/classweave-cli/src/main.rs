//! classweave CLI - Generate PlantUML class diagrams from Java sources

mod cli;

use clap::Parser;

fn main() {
    // Logging is initialized by `run` from the parsed flags
    let cli_args = cli::Cli::parse();

    let mut app = cli::ClassweaveApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
