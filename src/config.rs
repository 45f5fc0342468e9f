//! Tunables for projection, blinking and marker appearance.
//!
//! Every field has a default, so a JSON document only needs the keys it
//! overrides:
//!
//! ```json
//! { "blink": { "interval_ms": 250 }, "aliases": [["EX1", "YINTANG"]] }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::math::Aabb;
use crate::point::AliasTable;

/// Top-level locator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    pub projection: ProjectionParams,
    pub blink: BlinkParams,
    pub markers: MarkerStyles,
    /// Extra synonym groups added on top of the built-in alias table.
    pub aliases: Vec<Vec<String>>,
}

impl LocatorConfig {
    /// Parses and validates a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that reference sizes and timer durations are usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.projection;
        if !(p.reference_width > 0.0 && p.reference_height > 0.0) {
            return Err(ConfigError::Invalid(
                "projection reference size must be positive".to_owned(),
            ));
        }
        if p.depth_pad_ratio < 0.0 || p.min_depth_pad < 0.0 {
            return Err(ConfigError::Invalid(
                "depth padding must not be negative".to_owned(),
            ));
        }
        if self.blink.interval_ms == 0 || self.blink.duration_ms == 0 {
            return Err(ConfigError::Invalid("blink timings must be non-zero".to_owned()));
        }
        if self.aliases.iter().any(Vec::is_empty) {
            return Err(ConfigError::Invalid("alias groups must not be empty".to_owned()));
        }
        Ok(())
    }

    /// The built-in alias table extended with the configured groups.
    #[must_use]
    pub fn alias_table(&self) -> AliasTable {
        let mut table = AliasTable::builtin().clone();
        for group in &self.aliases {
            table.add_group(group.iter().map(String::as_str));
        }
        table
    }
}

/// Mapping from the 2D reference images onto the model's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParams {
    /// Width of the reference image in coordinate units.
    pub reference_width: f64,
    /// Height of the reference image in coordinate units.
    pub reference_height: f64,
    /// Fraction of the box depth a projected point sits outside the surface.
    pub depth_pad_ratio: f64,
    /// Lower bound for that offset.
    pub min_depth_pad: f64,
}

impl Default for ProjectionParams {
    fn default() -> Self {
        Self {
            reference_width: 100.0,
            reference_height: 230.0,
            depth_pad_ratio: 0.03,
            min_depth_pad: 0.02,
        }
    }
}

/// Timing of the highlight marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkParams {
    /// Visibility toggle period.
    pub interval_ms: u64,
    /// Time until the highlight clears itself.
    pub duration_ms: u64,
}

impl BlinkParams {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for BlinkParams {
    fn default() -> Self {
        Self {
            interval_ms: 180,
            duration_ms: 1800,
        }
    }
}

/// How a marker's radius is derived from the model's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusBasis {
    /// Box width (X extent), at least 1.
    Width,
    /// Largest extent, or 1 for a degenerate box.
    MaxExtent,
}

/// Appearance of one marker kind. Resources built from it are shared by
/// every marker of that kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub radius_basis: RadiusBasis,
    pub radius_factor: f64,
    /// Base colour as `0xRRGGBB`.
    pub color: u32,
    /// Emissive colour as `0xRRGGBB`.
    pub emissive: u32,
    pub emissive_intensity: f64,
    /// 1.0 is opaque.
    pub opacity: f64,
}

impl MarkerStyle {
    /// Soft glow used for every point in the active set.
    #[must_use]
    pub fn persistent() -> Self {
        Self {
            radius_basis: RadiusBasis::Width,
            radius_factor: 0.006,
            color: 0x00fe_f08a,
            emissive: 0x00fa_cc15,
            emissive_intensity: 0.6,
            opacity: 0.7,
        }
    }

    /// Bright blinking sphere for the selected point.
    #[must_use]
    pub fn highlight() -> Self {
        Self {
            radius_basis: RadiusBasis::MaxExtent,
            radius_factor: 0.012,
            color: 0x00fa_cc15,
            emissive: 0x00fa_cc15,
            emissive_intensity: 1.25,
            opacity: 1.0,
        }
    }

    /// Marker radius for a model with the given bounds.
    #[must_use]
    pub fn radius_for(&self, bounds: &Aabb) -> f64 {
        let basis = match self.radius_basis {
            RadiusBasis::Width => (bounds.max.x - bounds.min.x).max(1.0),
            RadiusBasis::MaxExtent => {
                let extent = bounds.max_extent();
                if extent > 0.0 {
                    extent
                } else {
                    1.0
                }
            }
        };
        basis * self.radius_factor
    }
}

/// Styles for both marker kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyles {
    pub persistent: MarkerStyle,
    pub highlight: MarkerStyle,
}

impl Default for MarkerStyles {
    fn default() -> Self {
        Self {
            persistent: MarkerStyle::persistent(),
            highlight: MarkerStyle::highlight(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use crate::point::PointId;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_reference_frame() {
        let config = LocatorConfig::default();
        assert_relative_eq!(config.projection.reference_width, 100.0);
        assert_relative_eq!(config.projection.reference_height, 230.0);
        assert_eq!(config.blink.interval(), Duration::from_millis(180));
        assert_eq!(config.blink.duration(), Duration::from_millis(1800));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = LocatorConfig::from_json_str(r#"{ "blink": { "interval_ms": 250 } }"#).unwrap();
        assert_eq!(config.blink.interval_ms, 250);
        assert_eq!(config.blink.duration_ms, 1800);
        assert_eq!(config.projection, ProjectionParams::default());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = LocatorConfig::from_json_str(r#"{ "blink": { "interval_ms": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = LocatorConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn configured_groups_extend_builtin_table() {
        let config =
            LocatorConfig::from_json_str(r#"{ "aliases": [["EX1", "yintang"]] }"#).unwrap();
        let table = config.alias_table();
        assert_eq!(table.lookup(&PointId::new("YINTANG")), ["PT_YINTANG", "PT_EX1"]);
        assert_eq!(table.lookup(&PointId::new("LV3")), ["PT_LV3", "PT_LR3"]);
    }

    #[test]
    fn marker_radius_bases() {
        let bounds = Aabb::new(Point3::new(-0.25, 0.0, -0.1), Point3::new(0.25, 1.8, 0.1));
        // Width 0.5 is clamped up to 1.
        assert_relative_eq!(MarkerStyle::persistent().radius_for(&bounds), 0.006);
        assert_relative_eq!(MarkerStyle::highlight().radius_for(&bounds), 1.8 * 0.012);

        let flat = Aabb::new(Point3::origin(), Point3::origin());
        assert_relative_eq!(MarkerStyle::highlight().radius_for(&flat), 0.012);
    }
}
