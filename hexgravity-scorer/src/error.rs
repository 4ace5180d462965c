//! Error type raised by the scoring pipeline.

use hexgravity_core::ConfigError;
use thiserror::Error;

/// A scoring run could not be carried out.
///
/// Per-entity projection failures are not errors at this level; they are
/// skipped and counted in the run diagnostics.
#[derive(Debug, Error, PartialEq)]
pub enum ScoreError {
    /// The configuration does not cover the presented input, or was invalid
    /// in a way only visible once inputs are known (e.g. a POI category with
    /// no configuration).
    #[error(transparent)]
    Config(#[from] ConfigError),
}
