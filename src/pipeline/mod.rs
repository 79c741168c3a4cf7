// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! SVG → solid pipeline
//!
//! Decompose, classify, extrude, then cut holes. Every run starts from
//! scratch and always ends in something renderable.

pub mod classify;
pub mod construct;
pub mod refine;

pub use classify::{classify, ClassifiedShape, Classification, Role};
pub use construct::{build_solid, SolidFrame};
pub use refine::{cut_holes, CylinderStencil};

use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::geometry::{Mesh, Primitive};
use crate::svg;
use nalgebra::Vector3;
use tracing::{debug, error, warn};

/// Terminal state of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Extruded (and possibly hole-cut) part
    Solid(Mesh),
    /// Placeholder box shown when no solid could be built
    Fallback(Mesh),
}

impl Rendered {
    pub fn mesh(&self) -> &Mesh {
        match self {
            Rendered::Solid(mesh) | Rendered::Fallback(mesh) => mesh,
        }
    }

    pub fn into_mesh(self) -> Mesh {
        match self {
            Rendered::Solid(mesh) | Rendered::Fallback(mesh) => mesh,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Rendered::Fallback(_))
    }
}

/// Everything one run produced, for callers that want more than the mesh
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub rendered: Rendered,
    pub classification: Classification,
    /// Absent when no solid was attempted
    pub frame: Option<SolidFrame>,
    /// Holes successfully subtracted
    pub holes_cut: usize,
}

/// Main entry point for rendering previews
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PreviewConfig,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline using `config` as given.
    ///
    /// The config is not validated; use [`Pipeline::try_with_config`] for
    /// values that did not come from [`PreviewConfig::from_file`] or
    /// [`PreviewConfig::load`].
    pub fn with_config(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Pipeline using `config` after [`PreviewConfig::validate`] accepts it
    pub fn try_with_config(config: PreviewConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Run every stage and return only the renderable result
    pub fn render(&self, svg_markup: &str, thickness_mm: Option<f64>) -> Rendered {
        self.run(svg_markup, thickness_mm).rendered
    }

    /// Run every stage on `svg_markup`.
    ///
    /// Never fails: stage errors are logged and recovered from, ending in the
    /// fallback box or the uncut solid.
    pub fn run(&self, svg_markup: &str, thickness_mm: Option<f64>) -> PipelineRun {
        let shapes = svg::decompose(svg_markup, &self.config);
        let classification = classify(shapes, self.config.hole_area_ratio);

        if classification.exterior().is_none() {
            warn!(error = %PreviewError::EmptyInput, "rendering fallback box");
            return PipelineRun {
                rendered: Rendered::Fallback(self.fallback_mesh()),
                classification,
                frame: None,
                holes_cut: 0,
            };
        }

        let thickness = self.config.effective_thickness(thickness_mm);
        let frame = SolidFrame::from_bounds(&classification.global_bounds(), thickness, &self.config);
        debug!(
            shapes = classification.len(),
            holes = classification.holes().count(),
            ignored = classification.ignored().count(),
            scale = frame.scale,
            depth = frame.depth,
            "classified shapes"
        );

        let solid = match build_solid(&classification, &frame) {
            Ok(solid) => solid,
            Err(e) => {
                error!(error = %e, "failed to build solid, rendering fallback box");
                return PipelineRun {
                    rendered: Rendered::Fallback(self.fallback_mesh()),
                    classification,
                    frame: Some(frame),
                    holes_cut: 0,
                };
            }
        };

        let has_holes = classification.holes().next().is_some();
        let (mesh, holes_cut) = if self.config.cut_holes && has_holes {
            match cut_holes(&solid, classification.holes(), &frame, &self.config) {
                Ok(cut) => cut,
                Err(e) => {
                    error!(error = %e, "hole refinement failed, keeping uncut solid");
                    (solid, 0)
                }
            }
        } else {
            (solid, 0)
        };

        PipelineRun {
            rendered: Rendered::Solid(mesh),
            classification,
            frame: Some(frame),
            holes_cut,
        }
    }

    /// Centered placeholder box
    pub fn fallback_mesh(&self) -> Mesh {
        let [x, y, z] = self.config.fallback_size;
        Primitive::cube(Vector3::new(x, y, z), true).to_mesh()
    }
}
