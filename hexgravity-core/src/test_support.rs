//! Fixture builders shared by unit, integration, and property tests.

use geo::{Coord, LineString, Polygon};

use crate::{HexCell, Poi};

/// Metres per degree of latitude, good enough for fixture geometry.
const METRES_PER_DEGREE: f64 = 111_320.0;

/// Build a regular hexagonal cell around a geographic centre.
///
/// The circumradius is given in metres and converted to degree offsets with
/// a cosine-corrected longitude scale, which keeps fixture cells roughly
/// regular anywhere in the operating region.
///
/// # Panics
/// Panics when the resulting boundary is degenerate; fixture inputs are
/// expected to be sane.
#[must_use]
pub fn hex_cell(id: &str, center: Coord<f64>, circumradius_m: f64) -> HexCell {
    let dlat = circumradius_m / METRES_PER_DEGREE;
    let dlon = circumradius_m / (METRES_PER_DEGREE * center.y.to_radians().cos());
    let ring: Vec<Coord<f64>> = (0..6)
        .map(|i| {
            let angle = f64::from(i) * std::f64::consts::FRAC_PI_3;
            Coord {
                x: center.x + dlon * angle.cos(),
                y: center.y + dlat * angle.sin(),
            }
        })
        .collect();
    HexCell::new(id, Polygon::new(LineString::from(ring), Vec::new())).expect("regular hexagon")
}

/// Build a tagless POI at a geographic position.
///
/// # Panics
/// Panics for a blank category; fixture inputs are expected to be sane.
#[must_use]
pub fn poi(id: u64, category: &str, lon: f64, lat: f64) -> Poi {
    Poi::with_empty_tags(id, category, Coord { x: lon, y: lat }).expect("valid fixture poi")
}

/// Shift a geographic coordinate north by approximately `metres`.
#[must_use]
pub fn offset_north(start: Coord<f64>, metres: f64) -> Coord<f64> {
    Coord {
        x: start.x,
        y: start.y + metres / METRES_PER_DEGREE,
    }
}
