//! Distance-decay ("gravity") kernel.
//!
//! Influence is saturated at 1 within the saturation distance `k`, then
//! decays exponentially with the decay reference distance `d` setting the
//! slope: at `d + (d - k)` the score has fallen to `exp(-1)`. The kernel is
//! undefined for `k == d` (zero denominator), so it can only be built from a
//! [`DecayParams`] value that has already proven `k < d`. Sharpness tuning
//! for `k` close to `d` is deliberately not smoothed; the strict ordering is
//! a hard precondition.

use crate::ConfigError;

const METRES_PER_KILOMETRE: f64 = 1000.0;

/// Validated pair of decay distances, in metres.
///
/// `saturation_m` is the model's `k`; `decay_m` is `d`. Both must be positive,
/// finite, and strictly ordered `k < d`.
///
/// # Examples
/// ```
/// use hexgravity_core::DecayParams;
///
/// let params = DecayParams::new(1000.0, 2000.0)?;
/// assert_eq!(params.circle_of_interest_radius_m(), 4000.0);
/// assert_eq!(params.search_radius_m(), 3000.0);
/// # Ok::<(), hexgravity_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayParams {
    saturation_m: f64,
    decay_m: f64,
}

impl DecayParams {
    /// Validate and construct decay distances.
    ///
    /// # Errors
    /// Returns [`ConfigError::NonPositiveDistance`] for a distance that is
    /// not a positive finite number, and
    /// [`ConfigError::InvalidDecayDistances`] unless `saturation_m` is
    /// strictly smaller than `decay_m`.
    pub fn new(saturation_m: f64, decay_m: f64) -> Result<Self, ConfigError> {
        for (name, value) in [("k", saturation_m), ("d", decay_m)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositiveDistance { name, value });
            }
        }
        if saturation_m >= decay_m {
            return Err(ConfigError::InvalidDecayDistances {
                saturation_m,
                decay_m,
            });
        }
        Ok(Self {
            saturation_m,
            decay_m,
        })
    }

    /// The saturation distance `k`, in metres.
    #[must_use]
    pub fn saturation_m(&self) -> f64 {
        self.saturation_m
    }

    /// The decay reference distance `d`, in metres.
    #[must_use]
    pub fn decay_m(&self) -> f64 {
        self.decay_m
    }

    /// Radius of a POI's pruning disk (`2d`), in metres.
    #[must_use]
    pub fn circle_of_interest_radius_m(&self) -> f64 {
        2.0 * self.decay_m
    }

    /// Radius of a hex centroid's search disk (`d + k`), in metres.
    #[must_use]
    pub fn search_radius_m(&self) -> f64 {
        self.decay_m + self.saturation_m
    }
}

/// Piecewise constant-then-exponential decay curve over distance.
///
/// Constructed from validated [`DecayParams`], so the singular `D == K`
/// denominator is unrepresentable here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayKernel {
    threshold_km: f64,
    scale_km: f64,
}

impl DecayKernel {
    /// Build the kernel for the given decay distances.
    #[must_use]
    pub fn new(params: DecayParams) -> Self {
        Self {
            threshold_km: params.decay_m / METRES_PER_KILOMETRE,
            scale_km: (params.decay_m - params.saturation_m) / METRES_PER_KILOMETRE,
        }
    }

    /// Score a POI/hex pair at the given distance in kilometres.
    ///
    /// Exactly `1.0` for distances up to `D = d/1000`; beyond that the score
    /// strictly decreases towards (but never reaches) zero.
    #[must_use]
    pub fn score(&self, distance_km: f64) -> f64 {
        let overshoot = (distance_km - self.threshold_km).max(0.0);
        (-overshoot / self.scale_km).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-12;

    fn kernel(k_m: f64, d_m: f64) -> DecayKernel {
        DecayKernel::new(DecayParams::new(k_m, d_m).expect("valid params"))
    }

    #[rstest]
    #[case(0.0)]
    #[case(0.1)]
    #[case(0.3)]
    #[case(0.5)]
    fn saturates_at_one_within_threshold(#[case] distance_km: f64) {
        let kernel = kernel(100.0, 500.0);
        assert_eq!(kernel.score(distance_km), 1.0);
    }

    #[rstest]
    fn decays_to_reference_value() {
        // k = 100 m, d = 500 m: a pair 800 km out scores exp(-0.75).
        let kernel = kernel(100.0, 500.0);
        let expected = (-0.75_f64).exp();
        assert!((kernel.score(800.0) - expected).abs() < TOLERANCE);
    }

    #[rstest]
    fn strictly_decreases_beyond_threshold() {
        let kernel = kernel(1000.0, 2000.0);
        let mut previous = kernel.score(2.0);
        for step in 1..=50 {
            let distance_km = 2.0 + f64::from(step) * 0.5;
            let score = kernel.score(distance_km);
            assert!(score < previous, "score must fall at {distance_km} km");
            assert!(score > 0.0, "score never reaches zero");
            previous = score;
        }
    }

    #[rstest]
    #[case(2000.0, 2000.0)]
    #[case(2500.0, 2000.0)]
    fn rejects_unordered_distances(#[case] k_m: f64, #[case] d_m: f64) {
        let result = DecayParams::new(k_m, d_m);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidDecayDistances { .. })
        ));
    }

    #[rstest]
    #[case(0.0, 2000.0)]
    #[case(-5.0, 2000.0)]
    #[case(1000.0, f64::NAN)]
    #[case(1000.0, f64::INFINITY)]
    fn rejects_degenerate_distances(#[case] k_m: f64, #[case] d_m: f64) {
        let result = DecayParams::new(k_m, d_m);
        assert!(matches!(result, Err(ConfigError::NonPositiveDistance { .. })));
    }
}
