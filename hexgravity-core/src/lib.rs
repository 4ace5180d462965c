//! Core domain types for the hexgravity scoring engine.
//!
//! The crate supplies the building blocks the scoring pipeline is assembled
//! from: POI and hex-cell models, the planar projection used for metric
//! geometry, a bounding-box spatial index, the distance-decay kernel, and the
//! validated configuration surface. Constructors return `Result` so invalid
//! input is surfaced before any scoring runs.

#![forbid(unsafe_code)]

mod config;
mod error;
mod hex;
mod kernel;
mod poi;
mod projection;
mod spatial;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{CategoryConfig, ClampBounds, ConfigError, EngineConfig, Reducer};
pub use error::DataShapeError;
pub use hex::{HexCell, HexId};
pub use kernel::{DecayKernel, DecayParams};
pub use poi::{Poi, Tags};
pub use projection::{LambertAzimuthalEqualArea, ProjectionError};
pub use spatial::{PlanarDisk, SpatialIndex};
