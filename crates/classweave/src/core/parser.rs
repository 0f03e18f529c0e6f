//! Core parser trait for source extraction

use anyhow::Result;

use super::Database;

/// Trait for turning one source unit into database entries
///
/// Parsers are best-effort: input that matches nothing leaves the database
/// untouched and still returns `Ok(())`.
pub trait Parser<D: Database> {
    /// Extract whatever the input declares into `database`
    fn parse(&self, input: &str, database: &mut D) -> Result<()>;

    /// Get the name of this parser
    fn name(&self) -> &'static str;

    /// Get the version of this parser
    fn version(&self) -> &'static str;

    /// Check if the input looks like something this parser understands
    fn can_parse(&self, input: &str) -> bool;
}
