//! Planar input preparation and the three-stage candidate-pruning funnel.
//!
//! The funnel exists purely for performance: stage 1 discards hexes with no
//! POI circle of interest anywhere near them, stage 2 discards POIs whose
//! circle touches no surviving hex, and stage 3 runs the precise `d + k`
//! radius test that determines the actual candidate pairs. Skipping stages 1
//! and 2 and running stage 3 against everything yields the identical pair
//! set, just slower.

use geo::{BoundingRect, Coord, Distance, Euclidean, LineString, Point, Polygon, Rect};
use hexgravity_core::{
    DecayParams, HexCell, LambertAzimuthalEqualArea, PlanarDisk, Poi, SpatialIndex,
};
use rayon::prelude::*;

const METRES_PER_KILOMETRE: f64 = 1000.0;

/// A POI carried into the planar frame, addressed by its input position.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlanarPoi {
    /// Index into the caller's POI slice.
    pub(crate) slot: usize,
    /// Projected position, metres.
    pub(crate) position: Coord<f64>,
}

/// A hex cell carried into the planar frame.
#[derive(Debug, Clone)]
pub(crate) struct PlanarHex {
    /// Index into the caller's hex slice.
    pub(crate) slot: usize,
    /// Projected centroid, metres.
    pub(crate) centroid: Coord<f64>,
    /// Projected boundary polygon, metres.
    pub(crate) boundary: Polygon<f64>,
    /// Envelope of the projected boundary.
    pub(crate) bounds: Rect<f64>,
}

/// One surviving (hex, POI) candidate with its exact planar distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CandidatePair {
    /// Index into the planar hex slice.
    pub(crate) hex: usize,
    /// Index into the planar POI slice.
    pub(crate) poi: usize,
    /// Centroid-to-POI distance, kilometres.
    pub(crate) distance_km: f64,
}

/// Project POIs into the planar frame, skipping unprojectable records.
///
/// Returns the surviving planar POIs and the number skipped.
pub(crate) fn project_pois(
    projection: &LambertAzimuthalEqualArea,
    pois: &[Poi],
) -> (Vec<PlanarPoi>, usize) {
    let mut planar = Vec::with_capacity(pois.len());
    let mut skipped = 0_usize;
    for (slot, poi) in pois.iter().enumerate() {
        match projection.project(poi.location) {
            Ok(position) => planar.push(PlanarPoi { slot, position }),
            Err(error) => {
                log::debug!("skipping POI {}: {error}", poi.id);
                skipped += 1;
            }
        }
    }
    (planar, skipped)
}

/// Project hex cells into the planar frame, skipping unprojectable records.
///
/// A cell is skipped when its centroid or any boundary vertex fails
/// projection; a cell that cannot be placed in the planar frame cannot be
/// pruned or scored.
pub(crate) fn project_hexes(
    projection: &LambertAzimuthalEqualArea,
    hexes: &[HexCell],
) -> (Vec<PlanarHex>, usize) {
    let mut planar = Vec::with_capacity(hexes.len());
    let mut skipped = 0_usize;
    for (slot, hex) in hexes.iter().enumerate() {
        match project_hex(projection, slot, hex) {
            Some(projected) => planar.push(projected),
            None => skipped += 1,
        }
    }
    (planar, skipped)
}

fn project_hex(
    projection: &LambertAzimuthalEqualArea,
    slot: usize,
    hex: &HexCell,
) -> Option<PlanarHex> {
    let centroid = match projection.project(hex.centroid()) {
        Ok(centroid) => centroid,
        Err(error) => {
            log::debug!("skipping hex {}: {error}", hex.id());
            return None;
        }
    };
    let mut ring = Vec::with_capacity(hex.boundary().exterior().0.len());
    for vertex in &hex.boundary().exterior().0 {
        match projection.project(*vertex) {
            Ok(projected) => ring.push(projected),
            Err(error) => {
                log::debug!("skipping hex {}: {error}", hex.id());
                return None;
            }
        }
    }
    let boundary = Polygon::new(LineString::from(ring), Vec::new());
    let bounds = boundary.bounding_rect()?;
    Some(PlanarHex {
        slot,
        centroid,
        boundary,
        bounds,
    })
}

/// Run the full pruning funnel for one category and return its candidate
/// pairs, sorted by (hex, POI) slot for deterministic downstream folds.
pub(crate) fn candidate_pairs(
    hexes: &[PlanarHex],
    pois: &[PlanarPoi],
    decay: DecayParams,
) -> Vec<CandidatePair> {
    if hexes.is_empty() || pois.is_empty() {
        return Vec::new();
    }

    let circle_radius = decay.circle_of_interest_radius_m();

    // Stage 1, hex-centric: keep hexes touched by at least one POI circle
    // of interest. The circle index is built once and only read afterwards.
    let circles = SpatialIndex::build(pois.iter().enumerate().map(|(index, poi)| {
        (index, PlanarDisk::new(poi.position, circle_radius).bounds())
    }));
    let surviving_hexes: Vec<usize> = hexes
        .par_iter()
        .enumerate()
        .filter(|(_, hex)| {
            circles.query(&hex.bounds).any(|poi_index| {
                PlanarDisk::new(pois[poi_index].position, circle_radius)
                    .intersects_polygon(&hex.boundary)
            })
        })
        .map(|(index, _)| index)
        .collect();
    if surviving_hexes.is_empty() {
        return Vec::new();
    }

    // Stage 2, POI-centric: keep POIs whose circle of interest reaches at
    // least one surviving hex boundary.
    let hex_bounds = SpatialIndex::build(
        surviving_hexes
            .iter()
            .map(|&hex_index| (hex_index, hexes[hex_index].bounds)),
    );
    let surviving_pois: Vec<usize> = pois
        .par_iter()
        .enumerate()
        .filter(|(_, poi)| {
            let circle = PlanarDisk::new(poi.position, circle_radius);
            hex_bounds
                .query(&circle.bounds())
                .any(|hex_index| circle.intersects_polygon(&hexes[hex_index].boundary))
        })
        .map(|(index, _)| index)
        .collect();
    if surviving_pois.is_empty() {
        return Vec::new();
    }

    // Stage 3, pair assembly: the precise d + k search disk around each
    // surviving hex centroid collects each nearby POI at most once.
    let positions = SpatialIndex::build(surviving_pois.iter().map(|&poi_index| {
        let position = pois[poi_index].position;
        (poi_index, Rect::new(position, position))
    }));
    let search_radius = decay.search_radius_m();
    let mut pairs: Vec<CandidatePair> = surviving_hexes
        .par_iter()
        .flat_map_iter(|&hex_index| {
            let hex = &hexes[hex_index];
            let disk = PlanarDisk::new(hex.centroid, search_radius);
            positions
                .query(&disk.bounds())
                .filter(move |&poi_index| disk.contains(pois[poi_index].position))
                .map(move |poi_index| CandidatePair {
                    hex: hex_index,
                    poi: poi_index,
                    distance_km: Euclidean.distance(
                        Point::from(hex.centroid),
                        Point::from(pois[poi_index].position),
                    ) / METRES_PER_KILOMETRE,
                })
        })
        .collect();
    pairs.sort_unstable_by_key(|pair| (pair.hex, pair.poi));
    pairs
}
