//! Planar equal-area projection between WGS84 lon/lat and metric coordinates.
//!
//! Implements the ellipsoidal (GRS80) Lambert azimuthal equal-area projection
//! from Snyder's *Map Projections — A Working Manual*, defaulting to the
//! ETRS89-LAEA parameters (EPSG:3035) used for Europe-scale deployments. All
//! buffering, disk construction, and distance computation happens in this
//! planar frame; input and output stay geographic. For other operating
//! regions the projection centre is swappable while the contract — Euclidean
//! distance in metres close to true ground distance — is unchanged.

use geo::Coord;
use thiserror::Error;

/// GRS80 semi-major axis, metres.
const SEMI_MAJOR_M: f64 = 6_378_137.0;
/// GRS80 first eccentricity squared.
const ECCENTRICITY_SQ: f64 = 0.006_694_380_022_903_416;

/// Convergence threshold for the iterative inverse latitude solve.
const INVERSE_TOLERANCE: f64 = 1e-12;
const MAX_INVERSE_ITERATIONS: usize = 16;

/// Forward-mapping denominator below which a point is treated as antipodal.
const ANTIPODAL_EPS: f64 = 1e-10;

/// A coordinate could not be carried across the projection.
///
/// These failures are per-entity: the scorer skips the offending record,
/// counts it, and continues with the batch.
#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    /// Longitude or latitude was NaN or infinite.
    #[error("coordinate ({lon}, {lat}) is not finite")]
    NonFinite {
        /// Offending longitude, degrees.
        lon: f64,
        /// Offending latitude, degrees.
        lat: f64,
    },
    /// Longitude or latitude fell outside the geographic domain.
    #[error("coordinate ({lon}, {lat}) is outside [-180, 180] x [-90, 90]")]
    OutOfBounds {
        /// Offending longitude, degrees.
        lon: f64,
        /// Offending latitude, degrees.
        lat: f64,
    },
    /// The point is at or near the antipode of the projection centre, where
    /// the forward mapping is singular.
    #[error("coordinate ({lon}, {lat}) is antipodal to the projection centre")]
    Antipodal {
        /// Offending longitude, degrees.
        lon: f64,
        /// Offending latitude, degrees.
        lat: f64,
    },
    /// A planar coordinate lay outside the projection's image disk.
    #[error("planar point ({x}, {y}) is outside the projection domain")]
    OutsideImage {
        /// Offending easting, metres.
        x: f64,
        /// Offending northing, metres.
        y: f64,
    },
}

/// Lambert azimuthal equal-area projection on the GRS80 ellipsoid.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use hexgravity_core::LambertAzimuthalEqualArea;
///
/// let projection = LambertAzimuthalEqualArea::etrs89();
/// // The natural origin maps exactly onto the false origin.
/// let planar = projection.project(Coord { x: 10.0, y: 52.0 })?;
/// assert!((planar.x - 4_321_000.0).abs() < 1e-6);
/// assert!((planar.y - 3_210_000.0).abs() < 1e-6);
/// # Ok::<(), hexgravity_core::ProjectionError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertAzimuthalEqualArea {
    lon0_deg: f64,
    lat0_deg: f64,
    false_easting_m: f64,
    false_northing_m: f64,
    // Derived constants, precomputed once.
    q_pole: f64,
    sin_beta0: f64,
    cos_beta0: f64,
    radius_q: f64,
    stretch: f64,
}

impl LambertAzimuthalEqualArea {
    /// Construct a projection centred on `(lon0, lat0)` degrees with the
    /// given false origin in metres.
    #[must_use]
    pub fn new(lon0_deg: f64, lat0_deg: f64, false_easting_m: f64, false_northing_m: f64) -> Self {
        let e = ECCENTRICITY_SQ.sqrt();
        let q_pole = authalic_q(1.0, e);
        let lat0 = lat0_deg.to_radians();
        let (sin0, cos0) = lat0.sin_cos();
        let q0 = authalic_q(sin0, e);
        let beta0 = clamped_asin(q0 / q_pole);
        let (sin_beta0, cos_beta0) = beta0.sin_cos();
        let radius_q = SEMI_MAJOR_M * (q_pole / 2.0).sqrt();
        // Snyder's D: stretches the planar frame so areas stay true away
        // from the centre parallel.
        let m0 = cos0 / (1.0 - ECCENTRICITY_SQ * sin0 * sin0).sqrt();
        let stretch = if cos_beta0.abs() < f64::EPSILON {
            1.0
        } else {
            SEMI_MAJOR_M * m0 / (radius_q * cos_beta0)
        };
        Self {
            lon0_deg,
            lat0_deg,
            false_easting_m,
            false_northing_m,
            q_pole,
            sin_beta0,
            cos_beta0,
            radius_q,
            stretch,
        }
    }

    /// The ETRS89-LAEA / EPSG:3035 parameterization (centre 10°E 52°N,
    /// false origin 4 321 000 E / 3 210 000 N).
    #[must_use]
    pub fn etrs89() -> Self {
        Self::new(10.0, 52.0, 4_321_000.0, 3_210_000.0)
    }

    /// Project a geographic coordinate (lon, lat degrees) into the planar
    /// frame (metres).
    ///
    /// # Errors
    /// Returns [`ProjectionError`] for non-finite input, coordinates outside
    /// the geographic domain, or points antipodal to the projection centre.
    pub fn project(&self, geographic: Coord<f64>) -> Result<Coord<f64>, ProjectionError> {
        let (lon, lat) = (geographic.x, geographic.y);
        self.validate_geographic(lon, lat)?;

        let e = ECCENTRICITY_SQ.sqrt();
        let phi = lat.to_radians();
        let lambda = normalize_longitude(lon - self.lon0_deg).to_radians();
        let q = authalic_q(phi.sin(), e);
        let beta = clamped_asin(q / self.q_pole);
        let (sin_beta, cos_beta) = beta.sin_cos();
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let denom = 1.0 + self.sin_beta0 * sin_beta + self.cos_beta0 * cos_beta * cos_lambda;
        if denom <= ANTIPODAL_EPS {
            return Err(ProjectionError::Antipodal { lon, lat });
        }
        let b = self.radius_q * (2.0 / denom).sqrt();

        let x = self.false_easting_m + b * self.stretch * cos_beta * sin_lambda;
        let y = self.false_northing_m
            + (b / self.stretch)
                * (self.cos_beta0 * sin_beta - self.sin_beta0 * cos_beta * cos_lambda);
        Ok(Coord { x, y })
    }

    /// Map a planar coordinate (metres) back to geographic degrees.
    ///
    /// # Errors
    /// Returns [`ProjectionError::OutsideImage`] when the point is not finite
    /// or lies outside the projection's image disk.
    pub fn unproject(&self, planar: Coord<f64>) -> Result<Coord<f64>, ProjectionError> {
        let (x, y) = (planar.x, planar.y);
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::OutsideImage { x, y });
        }

        let xr = (x - self.false_easting_m) / self.stretch;
        let yr = self.stretch * (y - self.false_northing_m);
        let rho = xr.hypot(yr);
        if rho < f64::EPSILON {
            return Ok(Coord {
                x: self.lon0_deg,
                y: self.lat0_deg,
            });
        }
        let half_chord = rho / (2.0 * self.radius_q);
        if half_chord > 1.0 {
            return Err(ProjectionError::OutsideImage { x, y });
        }
        let ce = 2.0 * half_chord.asin();
        let (sin_ce, cos_ce) = ce.sin_cos();

        let q = self.q_pole * (cos_ce * self.sin_beta0 + yr * sin_ce * self.cos_beta0 / rho);
        let lambda = (xr * sin_ce)
            .atan2(rho * self.cos_beta0 * cos_ce - yr * self.sin_beta0 * sin_ce);
        let phi = solve_latitude(q, self.q_pole);

        Ok(Coord {
            x: normalize_longitude(self.lon0_deg + lambda.to_degrees()),
            y: phi.to_degrees(),
        })
    }

    fn validate_geographic(&self, lon: f64, lat: f64) -> Result<(), ProjectionError> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(ProjectionError::NonFinite { lon, lat });
        }
        if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
            return Err(ProjectionError::OutOfBounds { lon, lat });
        }
        Ok(())
    }
}

impl Default for LambertAzimuthalEqualArea {
    fn default() -> Self {
        Self::etrs89()
    }
}

/// Snyder's `q` auxiliary, proportional to the authalic latitude's sine.
fn authalic_q(sin_phi: f64, e: f64) -> f64 {
    let es = e * sin_phi;
    (1.0 - ECCENTRICITY_SQ)
        * (sin_phi / (1.0 - es * es) - (1.0 / (2.0 * e)) * ((1.0 - es) / (1.0 + es)).ln())
}

/// Recover the geodetic latitude from `q` by fixed-point iteration.
fn solve_latitude(q: f64, q_pole: f64) -> f64 {
    use std::f64::consts::FRAC_PI_2;

    if q.abs() >= q_pole - INVERSE_TOLERANCE {
        return FRAC_PI_2.copysign(q);
    }

    let e = ECCENTRICITY_SQ.sqrt();
    let mut phi = clamped_asin(q / q_pole);
    for _ in 0..MAX_INVERSE_ITERATIONS {
        let (sin_phi, cos_phi) = phi.sin_cos();
        if cos_phi.abs() < f64::EPSILON {
            break;
        }
        let es = e * sin_phi;
        let one_minus = 1.0 - es * es;
        let delta = (one_minus * one_minus / (2.0 * cos_phi))
            * (q / (1.0 - ECCENTRICITY_SQ) - sin_phi / one_minus
                + (1.0 / (2.0 * e)) * ((1.0 - es) / (1.0 + es)).ln());
        phi += delta;
        if delta.abs() < INVERSE_TOLERANCE {
            break;
        }
    }
    phi
}

fn clamped_asin(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).asin()
}

/// Wrap a longitude difference into `[-180, 180]` degrees.
fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}
