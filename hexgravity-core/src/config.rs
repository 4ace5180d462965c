//! Engine configuration surface.
//!
//! All validation is eager: an [`EngineConfig`] can only exist with strictly
//! ordered decay distances per category, finite non-negative weights, and
//! ordered clamp bounds. The scorer therefore never re-validates mid-run.

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;

use crate::DecayParams;

/// Invalid engine configuration.
///
/// Raised before any computation starts; never recoverable mid-run.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The saturation distance `k` must be strictly smaller than the decay
    /// reference distance `d`.
    #[error(
        "saturation distance k = {saturation_m} m must be strictly smaller \
         than decay distance d = {decay_m} m"
    )]
    InvalidDecayDistances {
        /// Configured `k`, in metres.
        saturation_m: f64,
        /// Configured `d`, in metres.
        decay_m: f64,
    },
    /// A decay distance was zero, negative, or non-finite.
    #[error("distance `{name}` must be a positive finite number, got {value}")]
    NonPositiveDistance {
        /// Which distance was rejected (`k` or `d`).
        name: &'static str,
        /// Offending value, in metres.
        value: f64,
    },
    /// The reducer name did not match any known reducer.
    #[error("unknown reducer `{name}` (expected sum, mean, or max)")]
    UnknownReducer {
        /// Name found in the configuration.
        name: String,
    },
    /// A POI referenced a category with no configuration.
    #[error("no configuration for category `{category}`")]
    UnknownCategory {
        /// Category label without configuration.
        category: String,
    },
    /// A category weight was negative or non-finite.
    #[error("category weight must be a non-negative finite number, got {weight}")]
    InvalidWeight {
        /// Offending weight.
        weight: f64,
    },
    /// Clamp bounds were unordered or non-finite.
    #[error("clamp bounds [{lower}, {upper}] must be finite and ordered")]
    InvalidClampBounds {
        /// Configured lower bound.
        lower: f64,
        /// Configured upper bound.
        upper: f64,
    },
    /// The configuration named no categories at all.
    #[error("configuration must name at least one category")]
    NoCategories,
    /// A category key was empty.
    #[error("category names must not be empty")]
    EmptyCategoryName,
}

/// Order-independent reduction applied to a hex's candidate-pair scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Reducer {
    /// Sum of all pair scores (the reference default).
    #[default]
    Sum,
    /// Arithmetic mean of all pair scores.
    Mean,
    /// Largest single pair score.
    Max,
}

impl Reducer {
    /// Reduce a hex's pair scores to one value.
    ///
    /// An empty slice reduces to `0.0` for every reducer, which is how hexes
    /// with no surviving candidates end up scored zero rather than missing.
    #[must_use]
    pub fn reduce(self, scores: &[f64]) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }
        match self {
            Self::Sum => scores.iter().sum(),
            Self::Mean => {
                let total: f64 = scores.iter().sum();
                #[allow(clippy::cast_precision_loss)]
                let count = scores.len() as f64;
                total / count
            }
            Self::Max => scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

impl FromStr for Reducer {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "mean" => Ok(Self::Mean),
            "max" => Ok(Self::Max),
            _ => Err(ConfigError::UnknownReducer {
                name: name.to_owned(),
            }),
        }
    }
}

/// Bounded range each category's aggregate is clamped into before weighting.
///
/// Clamping before weighting bounds the influence of one saturated category;
/// weighting first would let a weight rescale the clamp boundary, which is
/// explicitly disallowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampBounds {
    lower: f64,
    upper: f64,
}

impl ClampBounds {
    /// Validate and construct clamp bounds.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidClampBounds`] unless both bounds are
    /// finite and `lower < upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, ConfigError> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(ConfigError::InvalidClampBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Clamp an aggregated category score into the bounded range.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        value.clamp(self.lower, self.upper)
    }

    /// The lower bound.
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// The upper bound.
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.upper
    }
}

impl Default for ClampBounds {
    /// The reference range `[0, 2]`.
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 2.0,
        }
    }
}

/// Per-category scoring parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryConfig {
    /// Decay distances `k` and `d` for this category.
    pub decay: DecayParams,
    /// Reduction applied to the category's pair scores per hex.
    pub reducer: Reducer,
    /// Weight of this category in the composite score.
    pub weight: f64,
}

impl CategoryConfig {
    /// Validate and construct per-category parameters.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidWeight`] when the weight is negative or
    /// non-finite.
    pub fn new(decay: DecayParams, reducer: Reducer, weight: f64) -> Result<Self, ConfigError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::InvalidWeight { weight });
        }
        Ok(Self {
            decay,
            reducer,
            weight,
        })
    }
}

/// Fully validated engine configuration.
///
/// # Examples
/// ```
/// use hexgravity_core::{CategoryConfig, ClampBounds, DecayParams, EngineConfig, Reducer};
/// use std::collections::BTreeMap;
///
/// let fuel = CategoryConfig::new(DecayParams::new(1000.0, 2000.0)?, Reducer::Sum, 1.0)?;
/// let config = EngineConfig::new(
///     BTreeMap::from([(String::from("fuel"), fuel)]),
///     ClampBounds::default(),
/// )?;
/// assert!(config.category("fuel").is_some());
/// # Ok::<(), hexgravity_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    categories: BTreeMap<String, CategoryConfig>,
    clamp: ClampBounds,
}

impl EngineConfig {
    /// Validate and construct the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoCategories`] for an empty category map and
    /// [`ConfigError::EmptyCategoryName`] for a blank category key. The
    /// per-category and clamp invariants are enforced by the respective
    /// constructors before this point.
    pub fn new(
        categories: BTreeMap<String, CategoryConfig>,
        clamp: ClampBounds,
    ) -> Result<Self, ConfigError> {
        if categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        if categories.keys().any(|name| name.trim().is_empty()) {
            return Err(ConfigError::EmptyCategoryName);
        }
        Ok(Self { categories, clamp })
    }

    /// Iterate the configured categories in name order.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &CategoryConfig)> {
        self.categories
            .iter()
            .map(|(name, config)| (name.as_str(), config))
    }

    /// Look up one category's configuration.
    #[must_use]
    pub fn category(&self, name: &str) -> Option<&CategoryConfig> {
        self.categories.get(name)
    }

    /// The composite clamp bounds.
    #[must_use]
    pub fn clamp(&self) -> ClampBounds {
        self.clamp
    }
}
