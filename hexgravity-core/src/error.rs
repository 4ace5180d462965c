//! Input-shape errors shared by the domain constructors and the CLI decoders.

use thiserror::Error;

/// The input table is structurally unusable.
///
/// A partial schema makes every downstream result meaningless, so these
/// errors are fatal for the whole run rather than recoverable per record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataShapeError {
    /// A required field was absent from an input record.
    #[error("required field `{field}` is missing from the input")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
    /// A POI carried an empty category label.
    #[error("POI {poi_id} has an empty category label")]
    EmptyCategory {
        /// Identifier of the offending POI.
        poi_id: u64,
    },
    /// A hex boundary had no computable centroid.
    #[error("hex {hex_id} has a degenerate boundary polygon")]
    DegenerateBoundary {
        /// Identifier of the offending hex cell.
        hex_id: String,
    },
}
