//! Facade crate for the hexgravity scoring engine.
//!
//! Re-exports the core domain types and the gravity scoring pipeline so
//! downstream consumers depend on a single crate.

#![forbid(unsafe_code)]

pub use hexgravity_core::{
    ClampBounds, CategoryConfig, ConfigError, DataShapeError, DecayKernel, DecayParams,
    EngineConfig, HexCell, HexId, LambertAzimuthalEqualArea, PlanarDisk, Poi, ProjectionError,
    Reducer, SpatialIndex, Tags,
};

pub use hexgravity_scorer::{
    CompositeHexScore, GravityEngine, HexScore, ScoreDiagnostics, ScoreError, ScoreOutput,
    ScoredPair,
};
