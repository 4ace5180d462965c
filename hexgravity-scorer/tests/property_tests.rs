//! Property-based tests for the scoring pipeline.

use std::collections::BTreeMap;

use geo::Coord;
use proptest::prelude::*;

use hexgravity_core::test_support::{hex_cell, poi};
use hexgravity_core::{
    CategoryConfig, ClampBounds, DecayParams, EngineConfig, HexCell, Poi, Reducer,
};
use hexgravity_scorer::GravityEngine;

fn engine() -> GravityEngine {
    let decay = DecayParams::new(100_000.0, 500_000.0).expect("valid decay distances");
    let cafe = CategoryConfig::new(decay, Reducer::Sum, 1.0).expect("valid category");
    let config = EngineConfig::new(
        BTreeMap::from([(String::from("cafe"), cafe)]),
        ClampBounds::default(),
    )
    .expect("valid config");
    GravityEngine::new(config)
}

/// Coordinates inside the default frame's well-conditioned region.
fn coords(max_count: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    proptest::collection::vec((5.0..15.0_f64, 47.0..57.0_f64), 0..max_count)
}

fn build_pois(coords: &[(f64, f64)]) -> Vec<Poi> {
    (1_u64..)
        .zip(coords)
        .map(|(id, (lon, lat))| poi(id, "cafe", *lon, *lat))
        .collect()
}

fn build_hexes(coords: &[(f64, f64)]) -> Vec<HexCell> {
    coords
        .iter()
        .enumerate()
        .map(|(index, (lon, lat))| {
            hex_cell(&format!("hex-{index}"), Coord { x: *lon, y: *lat }, 5000.0)
        })
        .collect()
}

proptest! {
    #[test]
    fn outputs_stay_within_model_bounds(
        poi_coords in coords(12),
        hex_coords in coords(6),
    ) {
        let engine = engine();
        let pois = build_pois(&poi_coords);
        let hexes = build_hexes(&hex_coords);

        let output = engine.score(&pois, &hexes).expect("scoring succeeds");

        for pair in &output.contributions {
            prop_assert!(pair.distance_km >= 0.0);
            prop_assert!(pair.score > 0.0 && pair.score <= 1.0);
        }
        for row in &output.scores {
            prop_assert!(row.score.is_finite());
            prop_assert!(row.score >= 0.0);
        }
        // One category with weight 1: the composite inherits the clamp range.
        for row in &output.composite {
            prop_assert!(row.score >= 0.0 && row.score <= 2.0);
        }
    }

    #[test]
    fn every_hex_is_scored_exactly_once_per_category(
        poi_coords in coords(12),
        hex_coords in coords(6),
    ) {
        let engine = engine();
        let pois = build_pois(&poi_coords);
        let hexes = build_hexes(&hex_coords);

        let output = engine.score(&pois, &hexes).expect("scoring succeeds");

        prop_assert_eq!(output.scores.len(), hexes.len());
        prop_assert_eq!(output.composite.len(), hexes.len());
        let mut ids: Vec<_> = output.scores.iter().map(|row| row.hex_id.clone()).collect();
        ids.dedup();
        prop_assert_eq!(ids.len(), hexes.len());
    }

    #[test]
    fn reversing_input_order_changes_nothing(
        poi_coords in coords(12),
        hex_coords in coords(6),
    ) {
        let engine = engine();
        let mut pois = build_pois(&poi_coords);
        let mut hexes = build_hexes(&hex_coords);

        let baseline = engine.score(&pois, &hexes).expect("scoring succeeds");
        pois.reverse();
        hexes.reverse();
        let reversed = engine.score(&pois, &hexes).expect("scoring succeeds");

        prop_assert_eq!(baseline.scores, reversed.scores);
        prop_assert_eq!(baseline.composite, reversed.composite);
        prop_assert_eq!(baseline.diagnostics, reversed.diagnostics);
    }
}
