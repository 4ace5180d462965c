//! Point-of-interest model.

use std::collections::HashMap;

use geo::Coord;

use crate::DataShapeError;

/// Free-form key/value attributes carried through scoring unmodified.
pub type Tags = HashMap<String, String>;

/// A geo-located point of interest.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`, in degrees.
/// The category label groups POIs that share one decay configuration.
/// Instances are immutable once ingested by the scorer.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hexgravity_core::Poi;
///
/// let poi = Poi::with_empty_tags(1, "fuel", Coord { x: 10.0, y: 52.0 })?;
/// assert_eq!(poi.category, "fuel");
/// # Ok::<(), hexgravity_core::DataShapeError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Poi {
    /// Opaque identifier, unique within one category.
    pub id: u64,
    /// Category label, e.g. an OSM tag value.
    pub category: String,
    /// Geographic position (lon, lat) in degrees.
    pub location: Coord<f64>,
    /// Descriptive attributes (name, OSM tags).
    pub tags: Tags,
}

impl Poi {
    /// Validate and construct a [`Poi`].
    ///
    /// # Errors
    /// Returns [`DataShapeError::EmptyCategory`] when the category label is
    /// empty or whitespace.
    pub fn new(
        id: u64,
        category: impl Into<String>,
        location: Coord<f64>,
        tags: Tags,
    ) -> Result<Self, DataShapeError> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(DataShapeError::EmptyCategory { poi_id: id });
        }
        Ok(Self {
            id,
            category,
            location,
            tags,
        })
    }

    /// Construct a [`Poi`] without descriptive attributes.
    ///
    /// # Errors
    /// Returns [`DataShapeError::EmptyCategory`] when the category label is
    /// empty or whitespace.
    pub fn with_empty_tags(
        id: u64,
        category: impl Into<String>,
        location: Coord<f64>,
    ) -> Result<Self, DataShapeError> {
        Self::new(id, category, location, Tags::new())
    }
}
