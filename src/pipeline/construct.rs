// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Solid construction: profile assembly, extrusion and placement

use super::classify::Classification;
use crate::config::PreviewConfig;
use crate::error::{PreviewError, Result};
use crate::geometry::{extrude_profile, Bounds2, Mesh, Profile};
use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Placement shared by the solid and its hole stencils
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidFrame {
    /// Center of the global shape bounds in document units
    pub center: Point2<f64>,
    /// Document units to scene units
    pub scale: f64,
    /// Extrusion depth in scene units
    pub depth: f64,
}

impl SolidFrame {
    /// Frame for shapes spanning `bounds`, extruded at `thickness` mm
    pub fn from_bounds(bounds: &Bounds2, thickness: f64, config: &PreviewConfig) -> Self {
        let max_dim = bounds.width().max(bounds.height());
        let scale = if max_dim > 0.0 {
            config.target_extent / max_dim
        } else {
            1.0
        };
        let depth = (thickness * scale * config.depth_factor).max(config.min_depth);

        Self {
            center: bounds.center(),
            scale,
            depth,
        }
    }

    /// Scene position of a document point on the slab mid-plane
    pub fn place(&self, point: &Point2<f64>) -> Point3<f64> {
        Point3::new(
            (point.x - self.center.x) * self.scale,
            -(point.y - self.center.y) * self.scale,
            -self.depth / 2.0,
        )
    }

    /// Move an extruded mesh from document space into the scene.
    ///
    /// Depth is already in scene units, so Z is not scaled. The half turn
    /// about X turns SVG's y-down into the viewer's y-up.
    pub fn apply(&self, mesh: &mut Mesh) {
        mesh.translate(Vector3::new(-self.center.x, -self.center.y, 0.0));
        mesh.scale(Vector3::new(self.scale, self.scale, 1.0));
        mesh.rotate_x(PI);
        mesh.recompute_normals();
    }
}

/// Extrude the exterior with its holes and place it in the scene
pub fn build_solid(classification: &Classification, frame: &SolidFrame) -> Result<Mesh> {
    let exterior = classification.exterior().ok_or(PreviewError::EmptyInput)?;
    let profile = Profile::assemble(
        &exterior.points,
        classification.holes().map(|hole| hole.points.as_slice()),
    );

    let mut mesh = extrude_profile(&profile, frame.depth)?;
    frame.apply(&mut mesh);

    if mesh.is_empty() {
        return Err(PreviewError::extrusion("extrusion produced no faces"));
    }
    Ok(mesh)
}
