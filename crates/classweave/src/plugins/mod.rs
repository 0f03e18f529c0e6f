//! Plugin implementations
//!
//! The `java` plugin implements the core traits for Java-like sources; the
//! orchestrator wires it into a single run.

pub mod java;
pub mod orchestrator;

pub use java::*;
pub use orchestrator::*;
