//! Core abstractions for diagram generation
//!
//! Traits shared by every stage of the pipeline plus the ambient pieces
//! (errors, configuration, logging, source providers).

mod config;
mod database;
mod error;
pub mod logging;
mod parser;
mod renderer;
pub mod source;

pub use config::*;
pub use database::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use renderer::*;
pub use source::*;
