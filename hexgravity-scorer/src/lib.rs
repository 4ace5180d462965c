//! Gravity-model scoring of hexagonal grid cells.
//!
//! The engine takes a table of categorised POIs and a hexagonal grid, prunes
//! the cross product down to plausible (POI, hex) pairs with spatial-index
//! joins in a planar equal-area frame, scores every surviving pair with a
//! piecewise-exponential decay kernel, and reduces the pairs into one score
//! per hex per category plus one clamped, weighted composite per hex.
//!
//! Inputs are fully materialised before scoring starts and the spatial
//! indices are read-only once built, so the per-hex work parallelises freely;
//! results are independent of input order.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//! use geo::Coord;
//! use hexgravity_core::test_support::{hex_cell, poi};
//! use hexgravity_core::{CategoryConfig, ClampBounds, DecayParams, EngineConfig, Reducer};
//! use hexgravity_scorer::GravityEngine;
//!
//! let fuel = CategoryConfig::new(DecayParams::new(1000.0, 2000.0)?, Reducer::Sum, 1.0)?;
//! let config = EngineConfig::new(
//!     BTreeMap::from([(String::from("fuel"), fuel)]),
//!     ClampBounds::default(),
//! )?;
//! let engine = GravityEngine::new(config);
//!
//! let pois = vec![poi(1, "fuel", 10.0, 52.0)];
//! let hexes = vec![hex_cell("hex-0", Coord { x: 10.0, y: 52.0 }, 500.0)];
//! let output = engine.score(&pois, &hexes)?;
//! assert_eq!(output.scores.len(), 1);
//! assert_eq!(output.scores[0].score, 1.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use hexgravity_core::{
    ConfigError, DecayKernel, EngineConfig, HexCell, LambertAzimuthalEqualArea, Poi,
};

mod error;
mod prune;
mod types;

pub use error::ScoreError;
pub use types::{CompositeHexScore, HexScore, ScoreDiagnostics, ScoreOutput, ScoredPair};

use prune::PlanarPoi;

/// The gravity scoring engine.
///
/// Construction is cheap; all heavy work happens in [`GravityEngine::score`].
/// The engine holds no mutable state, so one instance can serve concurrent
/// callers (`Send + Sync`).
#[derive(Debug, Clone)]
pub struct GravityEngine {
    config: EngineConfig,
    projection: LambertAzimuthalEqualArea,
}

impl GravityEngine {
    /// Build an engine with the default ETRS89-LAEA planar frame.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_projection(config, LambertAzimuthalEqualArea::etrs89())
    }

    /// Build an engine with an explicitly re-centred planar frame, for
    /// deployments outside the European operating region.
    #[must_use]
    pub fn with_projection(config: EngineConfig, projection: LambertAzimuthalEqualArea) -> Self {
        Self { config, projection }
    }

    /// The validated configuration this engine scores with.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score every hex cell against every configured category.
    ///
    /// Every processable hex appears exactly once per configured category in
    /// `scores` and exactly once in `composite`, zero-scored when no POI
    /// survives pruning near it. Entities whose coordinates cannot be
    /// projected are skipped and counted in the diagnostics.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownCategory`] (wrapped in [`ScoreError`])
    /// when a POI carries a category the configuration does not cover; this
    /// is checked before any computation starts.
    pub fn score(&self, pois: &[Poi], hexes: &[HexCell]) -> Result<ScoreOutput, ScoreError> {
        self.validate_categories(pois)?;
        log::info!(
            "scoring {} POIs against {} hex cells",
            pois.len(),
            hexes.len()
        );

        let (planar_pois, skipped_pois) = prune::project_pois(&self.projection, pois);
        let (mut planar_hexes, skipped_hexes) = prune::project_hexes(&self.projection, hexes);
        if skipped_pois > 0 {
            log::warn!("skipped {skipped_pois} POIs with unprojectable coordinates");
        }
        if skipped_hexes > 0 {
            log::warn!("skipped {skipped_hexes} hex cells with unprojectable geometry");
        }
        // Fix the output order up front; everything downstream folds over
        // hexes in this order.
        planar_hexes.sort_by(|a, b| hexes[a.slot].id().cmp(hexes[b.slot].id()));

        let by_category = group_by_category(pois, &planar_pois);
        let clamp = self.config.clamp();
        let empty: Vec<PlanarPoi> = Vec::new();

        let mut scores = Vec::new();
        let mut contributions = Vec::new();
        let mut composite_totals = vec![0.0_f64; planar_hexes.len()];
        let mut candidate_pairs = 0_usize;

        for (category, category_config) in self.config.categories() {
            let category_pois = by_category.get(category).unwrap_or(&empty);
            let mut pairs =
                prune::candidate_pairs(&planar_hexes, category_pois, category_config.decay);
            // Fold in (hex, POI id) order so float accumulation is identical
            // whatever order the input tables arrived in.
            pairs.sort_unstable_by_key(|pair| (pair.hex, pois[category_pois[pair.poi].slot].id));
            log::debug!(
                "category {category}: {} candidate pairs from {} POIs",
                pairs.len(),
                category_pois.len()
            );
            candidate_pairs += pairs.len();

            let kernel = DecayKernel::new(category_config.decay);
            let mut per_hex: Vec<Vec<f64>> = vec![Vec::new(); planar_hexes.len()];
            for pair in &pairs {
                let score = kernel.score(pair.distance_km);
                per_hex[pair.hex].push(score);
                contributions.push(ScoredPair {
                    poi_id: pois[category_pois[pair.poi].slot].id,
                    hex_id: hexes[planar_hexes[pair.hex].slot].id().clone(),
                    category: category.to_owned(),
                    distance_km: pair.distance_km,
                    score,
                });
            }

            for (position, planar_hex) in planar_hexes.iter().enumerate() {
                let aggregated = category_config.reducer.reduce(&per_hex[position]);
                // Clamp strictly before weighting so no weight can rescale
                // the clamp boundary.
                composite_totals[position] += category_config.weight * clamp.apply(aggregated);
                scores.push(HexScore {
                    hex_id: hexes[planar_hex.slot].id().clone(),
                    category: category.to_owned(),
                    score: aggregated,
                });
            }
        }

        scores.sort_by(|a, b| {
            a.hex_id
                .cmp(&b.hex_id)
                .then_with(|| a.category.cmp(&b.category))
        });
        let composite = planar_hexes
            .iter()
            .zip(composite_totals)
            .map(|(planar_hex, score)| {
                let hex = &hexes[planar_hex.slot];
                CompositeHexScore {
                    hex_id: hex.id().clone(),
                    score,
                    boundary: hex.boundary().clone(),
                }
            })
            .collect();

        Ok(ScoreOutput {
            scores,
            composite,
            contributions,
            diagnostics: ScoreDiagnostics {
                skipped_pois,
                skipped_hexes,
                candidate_pairs,
            },
        })
    }

    fn validate_categories(&self, pois: &[Poi]) -> Result<(), ScoreError> {
        for poi in pois {
            if self.config.category(&poi.category).is_none() {
                return Err(ConfigError::UnknownCategory {
                    category: poi.category.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Group planar POIs by their category label, preserving input slots.
fn group_by_category<'a>(
    pois: &'a [Poi],
    planar: &[PlanarPoi],
) -> BTreeMap<&'a str, Vec<PlanarPoi>> {
    let mut grouped: BTreeMap<&str, Vec<PlanarPoi>> = BTreeMap::new();
    for planar_poi in planar {
        grouped
            .entry(pois[planar_poi.slot].category.as_str())
            .or_default()
            .push(*planar_poi);
    }
    grouped
}
