//! End-to-end behaviour of the gravity engine on geographic fixtures.

use std::collections::BTreeMap;

use geo::Coord;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::{fixture, rstest};

use hexgravity_core::test_support::{hex_cell, offset_north, poi};
use hexgravity_core::{
    CategoryConfig, ClampBounds, ConfigError, DecayParams, EngineConfig, HexId, Reducer,
};
use hexgravity_scorer::{GravityEngine, ScoreError, ScoreOutput};

/// Natural origin of the default planar frame; projection distortion is
/// smallest here, so fixture distances in metres stay honest.
const CENTER: Coord<f64> = Coord { x: 10.0, y: 52.0 };

/// Fixture degree-to-metre conversions are approximate, so distance-derived
/// scores are only compared this tightly.
const SCORE_TOLERANCE: f64 = 0.02;

fn decay() -> DecayParams {
    // Saturated within 500 km, decay scale 400 km, search radius 600 km.
    DecayParams::new(100_000.0, 500_000.0).expect("valid decay distances")
}

fn config_with(categories: Vec<(&str, Reducer, f64)>) -> EngineConfig {
    let categories: BTreeMap<String, CategoryConfig> = categories
        .into_iter()
        .map(|(name, reducer, weight)| {
            let category =
                CategoryConfig::new(decay(), reducer, weight).expect("valid category config");
            (name.to_owned(), category)
        })
        .collect();
    EngineConfig::new(categories, ClampBounds::default()).expect("valid engine config")
}

#[fixture]
fn cafe_engine() -> GravityEngine {
    GravityEngine::new(config_with(vec![("cafe", Reducer::Sum, 1.0)]))
}

fn category_score(output: &ScoreOutput, hex_id: &str, category: &str) -> f64 {
    output
        .scores
        .iter()
        .find(|row| row.hex_id == HexId::from(hex_id) && row.category == category)
        .map(|row| row.score)
        .expect("score row present")
}

fn composite_score(output: &ScoreOutput, hex_id: &str) -> f64 {
    output
        .composite
        .iter()
        .find(|row| row.hex_id == HexId::from(hex_id))
        .map(|row| row.score)
        .expect("composite row present")
}

#[rstest]
fn poi_within_saturation_scores_exactly_one(cafe_engine: GravityEngine) {
    let hexes = vec![hex_cell("hex-a", CENTER, 5000.0)];
    let pois = vec![poi(1, "cafe", CENTER.x, offset_north(CENTER, 300_000.0).y)];

    let output = cafe_engine.score(&pois, &hexes).expect("scoring succeeds");

    assert_eq!(category_score(&output, "hex-a", "cafe"), 1.0);
    assert_eq!(composite_score(&output, "hex-a"), 1.0);
    assert_eq!(output.contributions.len(), 1);
    assert_eq!(output.diagnostics.candidate_pairs, 1);
}

#[rstest]
fn poi_beyond_saturation_decays_exponentially(cafe_engine: GravityEngine) {
    let hexes = vec![hex_cell("hex-a", CENTER, 5000.0)];
    // 550 km out: 50 km past the threshold over a 400 km scale.
    let pois = vec![poi(1, "cafe", CENTER.x, offset_north(CENTER, 550_000.0).y)];

    let output = cafe_engine.score(&pois, &hexes).expect("scoring succeeds");

    let expected = (-0.125_f64).exp();
    let score = category_score(&output, "hex-a", "cafe");
    assert!(
        (score - expected).abs() < SCORE_TOLERANCE,
        "expected ~{expected}, got {score}"
    );
}

#[rstest]
fn poi_beyond_search_radius_contributes_nothing(cafe_engine: GravityEngine) {
    let hexes = vec![hex_cell("hex-a", CENTER, 5000.0)];
    // 800 km out, past the 600 km search radius: pruned, not merely small.
    let pois = vec![poi(1, "cafe", CENTER.x, offset_north(CENTER, 800_000.0).y)];

    let output = cafe_engine.score(&pois, &hexes).expect("scoring succeeds");

    assert_eq!(category_score(&output, "hex-a", "cafe"), 0.0);
    assert_eq!(composite_score(&output, "hex-a"), 0.0);
    assert!(output.contributions.is_empty());
    assert_eq!(output.diagnostics.candidate_pairs, 0);
}

#[rstest]
fn every_hex_gets_a_row_for_every_configured_category() {
    let engine = GravityEngine::new(config_with(vec![
        ("cafe", Reducer::Sum, 1.0),
        ("fuel", Reducer::Sum, 1.0),
    ]));
    let far = offset_north(CENTER, 2_000_000.0);
    let hexes = vec![
        hex_cell("hex-a", CENTER, 5000.0),
        hex_cell("hex-b", far, 5000.0),
    ];
    // Only cafes anywhere, and none near hex-b.
    let pois = vec![poi(1, "cafe", CENTER.x, CENTER.y)];

    let output = engine.score(&pois, &hexes).expect("scoring succeeds");

    assert_eq!(output.scores.len(), 4);
    assert_eq!(output.composite.len(), 2);
    assert_eq!(category_score(&output, "hex-a", "fuel"), 0.0);
    assert_eq!(category_score(&output, "hex-b", "cafe"), 0.0);
    assert_eq!(category_score(&output, "hex-b", "fuel"), 0.0);
    assert_eq!(composite_score(&output, "hex-b"), 0.0);
}

#[rstest]
fn composite_clamps_the_aggregate_before_weighting() {
    let engine = GravityEngine::new(config_with(vec![("cafe", Reducer::Sum, 3.0)]));
    let hexes = vec![hex_cell("hex-a", CENTER, 5000.0)];
    // Five saturated POIs: the raw aggregate is 5, the clamp caps it at 2.
    let pois: Vec<_> = (0..5_u32)
        .map(|index| {
            let position = offset_north(CENTER, f64::from(index) * 50_000.0);
            poi(u64::from(index) + 1, "cafe", position.x, position.y)
        })
        .collect();

    let output = engine.score(&pois, &hexes).expect("scoring succeeds");

    assert_eq!(category_score(&output, "hex-a", "cafe"), 5.0);
    assert_eq!(composite_score(&output, "hex-a"), 6.0);
}

#[rstest]
fn mean_reducer_averages_saturated_pois() {
    let engine = GravityEngine::new(config_with(vec![("cafe", Reducer::Mean, 1.0)]));
    let hexes = vec![hex_cell("hex-a", CENTER, 5000.0)];
    let pois = vec![
        poi(1, "cafe", CENTER.x, offset_north(CENTER, 100_000.0).y),
        poi(2, "cafe", CENTER.x, offset_north(CENTER, 200_000.0).y),
    ];

    let output = engine.score(&pois, &hexes).expect("scoring succeeds");

    assert_eq!(category_score(&output, "hex-a", "cafe"), 1.0);
}

#[rstest]
fn results_are_independent_of_input_order() {
    let engine = GravityEngine::new(config_with(vec![
        ("cafe", Reducer::Sum, 1.0),
        ("fuel", Reducer::Max, 0.5),
    ]));
    let mut hexes = vec![
        hex_cell("hex-a", CENTER, 5000.0),
        hex_cell("hex-b", offset_north(CENTER, 150_000.0), 5000.0),
        hex_cell("hex-c", offset_north(CENTER, 520_000.0), 5000.0),
    ];
    let mut pois = vec![
        poi(1, "cafe", CENTER.x, CENTER.y),
        poi(2, "cafe", CENTER.x, offset_north(CENTER, 100_000.0).y),
        poi(3, "fuel", CENTER.x, offset_north(CENTER, 250_000.0).y),
        poi(4, "fuel", CENTER.x, offset_north(CENTER, 560_000.0).y),
        poi(5, "cafe", CENTER.x, offset_north(CENTER, 530_000.0).y),
    ];

    let baseline = engine.score(&pois, &hexes).expect("scoring succeeds");

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    hexes.shuffle(&mut rng);
    pois.shuffle(&mut rng);
    let shuffled = engine.score(&pois, &hexes).expect("scoring succeeds");

    assert_eq!(baseline.scores, shuffled.scores);
    assert_eq!(baseline.composite, shuffled.composite);
    assert_eq!(baseline.diagnostics, shuffled.diagnostics);

    let sort_key = |output: &ScoreOutput| {
        let mut keys: Vec<_> = output
            .contributions
            .iter()
            .map(|pair| (pair.category.clone(), pair.hex_id.clone(), pair.poi_id))
            .collect();
        keys.sort();
        keys
    };
    assert_eq!(sort_key(&baseline), sort_key(&shuffled));
}

#[rstest]
fn unknown_poi_category_fails_before_scoring(cafe_engine: GravityEngine) {
    let hexes = vec![hex_cell("hex-a", CENTER, 5000.0)];
    let pois = vec![poi(1, "museum", CENTER.x, CENTER.y)];

    let result = cafe_engine.score(&pois, &hexes);

    assert_eq!(
        result,
        Err(ScoreError::Config(ConfigError::UnknownCategory {
            category: String::from("museum")
        }))
    );
}

#[rstest]
fn unprojectable_entities_are_skipped_and_counted(cafe_engine: GravityEngine) {
    let antipode = Coord { x: -170.0, y: -52.0 };
    let hexes = vec![
        hex_cell("hex-a", CENTER, 5000.0),
        hex_cell("hex-far", antipode, 5000.0),
    ];
    let pois = vec![
        poi(1, "cafe", CENTER.x, CENTER.y),
        poi(2, "cafe", antipode.x, antipode.y),
    ];

    let output = cafe_engine.score(&pois, &hexes).expect("scoring succeeds");

    assert_eq!(output.diagnostics.skipped_pois, 1);
    assert_eq!(output.diagnostics.skipped_hexes, 1);
    // The skipped hex appears in no output table.
    assert!(output
        .scores
        .iter()
        .all(|row| row.hex_id != HexId::from("hex-far")));
    assert!(output
        .composite
        .iter()
        .all(|row| row.hex_id != HexId::from("hex-far")));
    assert_eq!(category_score(&output, "hex-a", "cafe"), 1.0);
}

#[rstest]
fn output_rows_are_sorted_by_hex_then_category() {
    let engine = GravityEngine::new(config_with(vec![
        ("cafe", Reducer::Sum, 1.0),
        ("fuel", Reducer::Sum, 1.0),
    ]));
    let hexes = vec![
        hex_cell("hex-b", offset_north(CENTER, 150_000.0), 5000.0),
        hex_cell("hex-a", CENTER, 5000.0),
    ];
    let pois = vec![poi(1, "cafe", CENTER.x, CENTER.y)];

    let output = engine.score(&pois, &hexes).expect("scoring succeeds");

    let keys: Vec<_> = output
        .scores
        .iter()
        .map(|row| (row.hex_id.as_str().to_owned(), row.category.clone()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    let composite_ids: Vec<_> = output
        .composite
        .iter()
        .map(|row| row.hex_id.as_str().to_owned())
        .collect();
    assert_eq!(composite_ids, vec!["hex-a", "hex-b"]);
}
