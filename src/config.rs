//! User-facing settings for the batch drivers.
//!
//! Both configs deserialize with every field optional; missing fields take the defaults
//! below. Lengths are stored in the user's unit and converted to model feet on use.

use serde::{Deserialize, Serialize};

use crate::align::extent::{ExtentOptions, OffsetMode};
use crate::align::grid::BubbleChoice;
use crate::align::mapper::MapStrategy;
use crate::align::orientation::DEFAULT_AXIS_TOLERANCE;
use crate::align::sampler::{CurveSampler, DEFAULT_MIN_SAMPLES};
use crate::align::sheet::TitleBlockCorner;
use crate::align::units::LengthUnit;
use crate::geom::{Side, SideValues};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: String, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: String, value: f64 },
    #[error("axis tolerance must lie in [0, 1], got {0}")]
    AxisToleranceOutOfRange(f64),
    #[error("at least one curve sample is required")]
    NoSamples,
}

fn check_length(field: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite {
            field: field.to_string(),
            value,
        });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// Settings for aligning viewports to their grid anchors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub corner: TitleBlockCorner,
    /// Offset from the corner along sheet X, in `unit`.
    pub offset_x: f64,
    /// Offset from the corner along sheet Y, in `unit`.
    pub offset_y: f64,
    pub unit: LengthUnit,
    /// Only align plan views.
    pub plan_only: bool,
    /// Skip sheets that do not carry exactly one title block.
    pub strict_title_block: bool,
    pub axis_tol: f64,
    pub min_samples: usize,
    pub strategy: MapStrategy,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            corner: TitleBlockCorner::BottomLeft,
            offset_x: 20.0,
            offset_y: 20.0,
            unit: LengthUnit::Millimeters,
            plan_only: true,
            strict_title_block: true,
            axis_tol: DEFAULT_AXIS_TOLERANCE,
            min_samples: DEFAULT_MIN_SAMPLES,
            strategy: MapStrategy::Auto,
        }
    }
}

impl AlignConfig {
    /// # Errors
    /// Returns the first setting that cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_length("offset_x", self.offset_x)?;
        check_length("offset_y", self.offset_y)?;
        if !(0.0..=1.0).contains(&self.axis_tol) {
            return Err(ConfigError::AxisToleranceOutOfRange(self.axis_tol));
        }
        if self.min_samples == 0 {
            return Err(ConfigError::NoSamples);
        }
        Ok(())
    }

    /// Corner offsets in sheet feet.
    #[must_use]
    pub fn offset_feet(&self) -> (f64, f64) {
        (self.unit.to_feet(self.offset_x), self.unit.to_feet(self.offset_y))
    }

    #[must_use]
    pub fn sampler(&self) -> CurveSampler {
        CurveSampler::with_min_samples(self.min_samples)
    }
}

/// Settings for recomputing 2D grid extents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtentConfig {
    /// Offset distance per side, in `unit`.
    pub distances: SideValues<f64>,
    pub modes: SideValues<OffsetMode>,
    pub unit: LengthUnit,
    pub bubbles: BubbleChoice,
    pub plan_only: bool,
}

impl Default for ExtentConfig {
    fn default() -> Self {
        Self {
            distances: SideValues::uniform(0.0),
            modes: SideValues::uniform(OffsetMode::Outside),
            unit: LengthUnit::Millimeters,
            bubbles: BubbleChoice::BothEnds,
            plan_only: true,
        }
    }
}

impl ExtentConfig {
    /// One distance and one mode for all four sides.
    #[must_use]
    pub fn uniform(distance: f64, mode: OffsetMode, unit: LengthUnit) -> Self {
        Self {
            distances: SideValues::uniform(distance),
            modes: SideValues::uniform(mode),
            unit,
            ..Self::default()
        }
    }

    /// # Errors
    /// Returns the first side whose distance is unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Side::ALL
            .into_iter()
            .try_for_each(|side| check_length(&format!("{side} distance"), self.distances.get(side)))
    }

    /// Engine options with distances converted to model feet.
    #[must_use]
    pub fn extent_options(&self) -> ExtentOptions {
        ExtentOptions {
            offsets: self.distances.map(|d| self.unit.to_feet(d)),
            modes: self.modes,
            ..ExtentOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_defaults() {
        let config = AlignConfig::default();
        assert_eq!(config.corner, TitleBlockCorner::BottomLeft);
        assert!(config.plan_only && config.strict_title_block);
        assert_eq!(config.sampler().min_samples, 11);
        let (dx, dy) = config.offset_feet();
        assert!((dx - 20.0 / 304.8).abs() < 1e-12);
        assert_eq!(dx, dy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn align_validation() {
        let bad_tol = AlignConfig {
            axis_tol: 1.5,
            ..AlignConfig::default()
        };
        assert_eq!(bad_tol.validate(), Err(ConfigError::AxisToleranceOutOfRange(1.5)));
        let no_samples = AlignConfig {
            min_samples: 0,
            ..AlignConfig::default()
        };
        assert_eq!(no_samples.validate(), Err(ConfigError::NoSamples));
        let negative = AlignConfig {
            offset_y: -1.0,
            ..AlignConfig::default()
        };
        assert!(matches!(negative.validate(), Err(ConfigError::Negative { field, .. }) if field == "offset_y"));
    }

    #[test]
    fn extent_options_are_in_feet() {
        let config = ExtentConfig::uniform(12.0, OffsetMode::Inside, LengthUnit::Inches);
        let options = config.extent_options();
        assert_eq!(options.offsets, SideValues::uniform(1.0));
        assert_eq!(options.modes.get(Side::Top), OffsetMode::Inside);
        assert_eq!(options.min_length, 1e-4);
    }

    #[test]
    fn extent_validation_names_the_side() {
        let mut config = ExtentConfig::default();
        config.distances.left = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().starts_with("left distance must be finite"));
    }
}
