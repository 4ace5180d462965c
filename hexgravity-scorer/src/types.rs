//! Output tables produced by the scoring pipeline.

use geo::Polygon;
use hexgravity_core::HexId;
use serde::{Deserialize, Serialize};

/// One surviving candidate pair after full distance computation.
///
/// A POI may score against multiple hexes and vice versa, but each
/// (POI, hex) combination appears at most once per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPair {
    /// Identifier of the contributing POI.
    pub poi_id: u64,
    /// Identifier of the receiving hex cell.
    pub hex_id: HexId,
    /// Category the pair was scored under.
    pub category: String,
    /// Planar distance between POI and hex centroid, kilometres.
    pub distance_km: f64,
    /// Decay-kernel value at that distance.
    pub score: f64,
}

/// Aggregated score for one hex cell under one category.
///
/// Present for every processable hex and every configured category; hexes
/// with no surviving candidates carry an explicit zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexScore {
    /// Identifier of the hex cell.
    pub hex_id: HexId,
    /// Category the score belongs to.
    pub category: String,
    /// Reduced score over the hex's candidate pairs.
    pub score: f64,
}

/// Final weighted composite per hex cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeHexScore {
    /// Identifier of the hex cell.
    pub hex_id: HexId,
    /// Clamp-then-weight sum across all configured categories.
    pub score: f64,
    /// Geographic boundary, carried through for downstream rendering.
    pub boundary: Polygon<f64>,
}

/// Counters surfaced to the caller instead of silently absorbed failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDiagnostics {
    /// POIs dropped because their coordinates failed projection.
    pub skipped_pois: usize,
    /// Hex cells dropped because their geometry failed projection.
    pub skipped_hexes: usize,
    /// Candidate pairs that survived pruning, across all categories.
    pub candidate_pairs: usize,
}

/// Everything one scoring run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutput {
    /// One row per processable hex per configured category.
    pub scores: Vec<HexScore>,
    /// One composite row per processable hex.
    pub composite: Vec<CompositeHexScore>,
    /// The per-pair contribution table behind the aggregates.
    pub contributions: Vec<ScoredPair>,
    /// Skip and survival counters for the run.
    pub diagnostics: ScoreDiagnostics,
}
