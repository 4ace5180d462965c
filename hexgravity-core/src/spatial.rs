//! Bounding-box spatial index and planar pruning disks.
//!
//! The index answers "which members' envelopes intersect this query
//! envelope" in sub-quadratic time via an R-tree; exact geometric tests and
//! de-duplication are the caller's responsibility. It is built once with
//! `bulk_load` and treated as read-only afterwards, which is the only
//! synchronization the concurrent pipeline needs.

use geo::{Coord, Point, Polygon, Rect};
use geo::{Distance, Euclidean};
use rstar::{AABB, RTree, RTreeObject};

/// Envelope entry wrapping the index of the source record.
#[derive(Debug, Clone)]
struct Entry {
    slot: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for Entry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn to_aabb(rect: &Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners(
        [rect.min().x, rect.min().y],
        [rect.max().x, rect.max().y],
    )
}

/// R-tree over the bounding boxes of an indexed collection.
///
/// Members are addressed by the `slot` they were inserted with (typically
/// the position in the source table). A query returns every matching slot
/// exactly once.
///
/// # Examples
/// ```
/// use geo::{Coord, Rect};
/// use hexgravity_core::SpatialIndex;
///
/// let index = SpatialIndex::build([
///     (0, Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 })),
///     (1, Rect::new(Coord { x: 5.0, y: 5.0 }, Coord { x: 6.0, y: 6.0 })),
/// ]);
/// let probe = Rect::new(Coord { x: 0.5, y: 0.5 }, Coord { x: 2.0, y: 2.0 });
/// assert_eq!(index.query(&probe).collect::<Vec<_>>(), vec![0]);
/// ```
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<Entry>,
}

impl SpatialIndex {
    /// Bulk-load the index from `(slot, envelope)` pairs.
    #[must_use]
    pub fn build(envelopes: impl IntoIterator<Item = (usize, Rect<f64>)>) -> Self {
        let entries = envelopes
            .into_iter()
            .map(|(slot, rect)| Entry {
                slot,
                envelope: to_aabb(&rect),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Slots of all members whose envelope intersects the query envelope.
    ///
    /// Boundary contact counts as intersection. Each member is yielded at
    /// most once per query, in no particular order.
    pub fn query<'a>(&'a self, envelope: &Rect<f64>) -> impl Iterator<Item = usize> + 'a {
        self.tree
            .locate_in_envelope_intersecting(&to_aabb(envelope))
            .map(|entry| entry.slot)
    }

    /// Number of indexed members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// A disk in the planar frame, used only for candidate pruning.
///
/// Covers both pruning shapes of the model: the circle of interest around a
/// POI (radius `2d`) and the search disk around a hex centroid (radius
/// `d + k`). Ephemeral; discarded once scoring is done.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarDisk {
    /// Disk centre in planar metres.
    pub center: Coord<f64>,
    /// Disk radius in metres.
    pub radius_m: f64,
}

impl PlanarDisk {
    /// Construct a disk around a planar centre.
    #[must_use]
    pub fn new(center: Coord<f64>, radius_m: f64) -> Self {
        Self { center, radius_m }
    }

    /// Axis-aligned envelope of the disk, for index queries.
    #[must_use]
    pub fn bounds(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.center.x - self.radius_m,
                y: self.center.y - self.radius_m,
            },
            Coord {
                x: self.center.x + self.radius_m,
                y: self.center.y + self.radius_m,
            },
        )
    }

    /// Whether a planar point lies inside the disk (boundary inclusive).
    #[must_use]
    pub fn contains(&self, point: Coord<f64>) -> bool {
        Euclidean.distance(Point::from(self.center), Point::from(point)) <= self.radius_m
    }

    /// Whether the disk intersects a planar polygon.
    ///
    /// A centre inside the polygon has distance zero, so containment counts
    /// as intersection.
    #[must_use]
    pub fn intersects_polygon(&self, polygon: &Polygon<f64>) -> bool {
        Euclidean.distance(&Point::from(self.center), polygon) <= self.radius_m
    }
}
