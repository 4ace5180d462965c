//! Hexagonal grid cells.

use std::fmt;

use geo::{Centroid, Coord, Polygon};

use crate::DataShapeError;

/// Stable identifier of one cell in a hierarchical hexagonal tiling.
///
/// The addressing scheme (e.g. H3) is opaque to the engine; identifiers only
/// need to be unique within one grid and stable across runs so repeated
/// scoring results are comparable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct HexId(String);

impl HexId {
    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for HexId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for HexId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// One cell of the hexagonal tiling covering the region of interest.
///
/// The boundary is a geographic polygon (lon/lat degrees); the centroid is
/// derived from it at construction so the two can never disagree. Cells are
/// assumed not to overlap and to tile the region without gaps — an invariant
/// of the external grid builder, not enforced here.
#[derive(Debug, Clone, PartialEq)]
pub struct HexCell {
    id: HexId,
    boundary: Polygon<f64>,
    centroid: Coord<f64>,
}

impl HexCell {
    /// Validate and construct a [`HexCell`], deriving its centroid.
    ///
    /// # Errors
    /// Returns [`DataShapeError::DegenerateBoundary`] when the polygon has no
    /// computable centroid (e.g. an empty or zero-area ring).
    pub fn new(id: impl Into<HexId>, boundary: Polygon<f64>) -> Result<Self, DataShapeError> {
        let id = id.into();
        let centroid = boundary
            .centroid()
            .ok_or_else(|| DataShapeError::DegenerateBoundary {
                hex_id: id.to_string(),
            })?;
        Ok(Self {
            id,
            boundary,
            centroid: centroid.into(),
        })
    }

    /// The cell identifier.
    #[must_use]
    pub fn id(&self) -> &HexId {
        &self.id
    }

    /// The geographic boundary polygon.
    #[must_use]
    pub fn boundary(&self) -> &Polygon<f64> {
        &self.boundary
    }

    /// The geographic centroid derived from the boundary.
    #[must_use]
    pub fn centroid(&self) -> Coord<f64> {
        self.centroid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, polygon};
    use rstest::rstest;

    #[rstest]
    fn centroid_is_derived_from_boundary() {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 2.0, y: 0.0),
            (x: 2.0, y: 2.0),
            (x: 0.0, y: 2.0),
        ];
        let cell = HexCell::new("8a1f", square).expect("valid cell");
        let centroid = cell.centroid();
        assert!((centroid.x - 1.0).abs() < 1e-12);
        assert!((centroid.y - 1.0).abs() < 1e-12);
    }

    #[rstest]
    fn empty_boundary_is_rejected() {
        let empty = Polygon::new(LineString::new(Vec::new()), Vec::new());
        let result = HexCell::new("dead", empty);
        assert_eq!(
            result,
            Err(DataShapeError::DegenerateBoundary {
                hex_id: String::from("dead")
            })
        );
    }
}
