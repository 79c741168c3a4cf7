// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Preview configuration system

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Segment count below which circular features stop looking round
pub const MIN_CIRCLE_SEGMENTS: u32 = 32;

/// Tunables for the SVG → solid pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Largest X/Y extent of the part after scaling
    pub target_extent: f64,
    /// Extrusion depth per scaled millimetre of thickness
    pub depth_factor: f64,
    /// Depth floor so thin sheets stay visible
    pub min_depth: f64,
    /// Thickness used when the caller supplies none
    pub default_thickness: f64,
    /// Shapes larger than this fraction of the exterior are duplicate outlines
    pub hole_area_ratio: f64,
    /// Points sampled per quadratic/cubic path segment
    pub curve_divisions: u32,
    /// Segments for circles, ellipses and hole stencils
    pub circle_segments: u32,
    /// Stencil length as a multiple of the extrusion depth
    pub stencil_length_factor: f64,
    /// Fallback box size [x, y, z]
    pub fallback_size: [f64; 3],
    /// Run the CSG hole refinement stage
    pub cut_holes: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            target_extent: 80.0,
            depth_factor: 0.15,
            min_depth: 0.5,
            default_thickness: 3.0,
            hole_area_ratio: 0.8,
            curve_divisions: 12,
            circle_segments: MIN_CIRCLE_SEGMENTS,
            stencil_length_factor: 3.0,
            fallback_size: [20.0, 20.0, 5.0],
            cut_holes: true,
        }
    }
}

impl PreviewConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: PreviewConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from("preview.toml").exists() {
            Self::from_file("preview.toml")?
        } else {
            Self::default()
        };

        if let Ok(ratio) = std::env::var("PREVIEW_HOLE_AREA_RATIO") {
            if let Ok(ratio) = ratio.parse() {
                config.hole_area_ratio = ratio;
            }
        }

        if let Ok(divisions) = std::env::var("PREVIEW_CURVE_DIVISIONS") {
            if let Ok(divisions) = divisions.parse() {
                config.curve_divisions = divisions;
            }
        }

        if let Ok(cut_holes) = std::env::var("PREVIEW_CUT_HOLES") {
            config.cut_holes = cut_holes.parse().unwrap_or(true);
        }

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(self.target_extent > 0.0) {
            bail!("target_extent must be positive, got {}", self.target_extent);
        }
        if !(self.depth_factor > 0.0) || !(self.min_depth > 0.0) {
            bail!("depth_factor and min_depth must be positive");
        }
        if !(self.hole_area_ratio > 0.0 && self.hole_area_ratio <= 1.0) {
            bail!(
                "hole_area_ratio must lie in (0, 1], got {}",
                self.hole_area_ratio
            );
        }
        if self.curve_divisions == 0 {
            bail!("curve_divisions must be at least 1");
        }
        if !(self.stencil_length_factor > 1.0) {
            bail!("stencil_length_factor must exceed 1 so stencils pierce the slab");
        }
        if self.fallback_size.iter().any(|s| !(*s > 0.0)) {
            bail!("fallback_size components must be positive");
        }
        Ok(())
    }

    /// Circle segment count with the roundness floor applied
    pub fn effective_circle_segments(&self) -> u32 {
        self.circle_segments.max(MIN_CIRCLE_SEGMENTS)
    }

    /// Thickness to extrude with: absent, zero, negative or NaN input falls back
    pub fn effective_thickness(&self, thickness_mm: Option<f64>) -> f64 {
        match thickness_mm {
            Some(t) if t.is_finite() && t > 0.0 => t,
            _ => self.default_thickness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        assert!(PreviewConfig::default().validate().is_ok());
    }

    #[test]
    fn test_effective_thickness() {
        let config = PreviewConfig::default();
        assert_eq!(config.effective_thickness(None), 3.0);
        assert_eq!(config.effective_thickness(Some(0.0)), 3.0);
        assert_eq!(config.effective_thickness(Some(-2.0)), 3.0);
        assert_eq!(config.effective_thickness(Some(f64::NAN)), 3.0);
        assert_eq!(config.effective_thickness(Some(6.0)), 6.0);
    }

    #[test]
    fn test_circle_segment_floor() {
        let config = PreviewConfig {
            circle_segments: 8,
            ..PreviewConfig::default()
        };
        assert_eq!(config.effective_circle_segments(), 32);
    }

    #[test]
    fn test_rejects_bad_ratio() {
        let config = PreviewConfig {
            hole_area_ratio: 1.5,
            ..PreviewConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let config = PreviewConfig {
            hole_area_ratio: 0.9,
            curve_divisions: 16,
            ..PreviewConfig::default()
        };

        let file = NamedTempFile::new()?;
        config.save(file.path())?;
        let loaded = PreviewConfig::from_file(file.path())?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let file = NamedTempFile::new()?;
        std::fs::write(file.path(), "hole_area_ratio = 0.7\n")?;
        let loaded = PreviewConfig::from_file(file.path())?;
        assert_eq!(loaded.hole_area_ratio, 0.7);
        assert_eq!(loaded.target_extent, 80.0);
        Ok(())
    }
}
