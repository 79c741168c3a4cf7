// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Hole refinement: cylinder stencils subtracted from the solid

use super::classify::ClassifiedShape;
use super::construct::SolidFrame;
use crate::config::PreviewConfig;
use crate::error::{PreviewError, Result};
use crate::geometry::{polygon::mean_radius, Mesh, Primitive};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cylinder approximating one hole, in scene units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CylinderStencil {
    /// Center of the cylinder, on the slab mid-plane
    pub center: Point3<f64>,
    pub radius: f64,
    /// Extent along Z; longer than the slab is deep so the cut goes through
    pub length: f64,
    pub segments: u32,
}

impl CylinderStencil {
    pub fn for_hole(hole: &ClassifiedShape, frame: &SolidFrame, config: &PreviewConfig) -> Result<Self> {
        let radius = mean_radius(&hole.points, &hole.centroid) * frame.scale;
        let length = frame.depth * config.stencil_length_factor;

        if !radius.is_finite() || radius <= 0.0 {
            return Err(PreviewError::csg(format!(
                "hole from element {} has degenerate radius {}",
                hole.source_index, radius
            )));
        }
        if !length.is_finite() || length <= 0.0 {
            return Err(PreviewError::csg(format!("degenerate stencil length {}", length)));
        }

        Ok(Self {
            center: frame.place(&hole.centroid),
            radius,
            length,
            segments: config.effective_circle_segments(),
        })
    }

    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = Primitive::cylinder(self.length, self.radius, self.segments, true).to_mesh();
        mesh.translate(self.center.coords);
        mesh
    }
}

/// Subtract the stencils of all holes from `solid` in one boolean pass.
///
/// Holes are assumed not to overlap, so their stencils are merged into a
/// single subtrahend and both BSP trees are built only once. Any failure
/// abandons the whole refinement; callers keep the uncut solid.
pub fn cut_holes<'a>(
    solid: &Mesh,
    holes: impl IntoIterator<Item = &'a ClassifiedShape>,
    frame: &SolidFrame,
    config: &PreviewConfig,
) -> Result<(Mesh, usize)> {
    let mut cutter = Mesh::new();
    let mut count = 0;

    for hole in holes {
        let stencil = CylinderStencil::for_hole(hole, frame, config)?;
        debug!(
            element = hole.source_index,
            radius = stencil.radius,
            x = stencil.center.x,
            y = stencil.center.y,
            "adding hole stencil"
        );
        cutter.merge(&stencil.to_mesh());
        count += 1;
    }

    if count == 0 {
        return Ok((solid.clone(), 0));
    }

    let mut result = solid.difference(&cutter)?;
    result.recompute_normals();
    debug!(
        stencils = count,
        triangles = result.triangle_count(),
        "holes cut"
    );
    Ok((result, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon::area_and_bounds;
    use crate::pipeline::classify::Role;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    fn hole(points: Vec<Point2<f64>>) -> ClassifiedShape {
        let (signed_area, bounds) = area_and_bounds(&points);
        ClassifiedShape {
            points,
            signed_area,
            area: signed_area.abs(),
            centroid: bounds.center(),
            bounds,
            source_index: 1,
            role: Role::Hole,
        }
    }

    fn frame() -> SolidFrame {
        SolidFrame {
            center: Point2::new(50.0, 25.0),
            scale: 0.8,
            depth: 0.36,
        }
    }

    #[test]
    fn test_stencil_geometry() {
        let square = hole(vec![
            Point2::new(58.0, 28.0),
            Point2::new(62.0, 28.0),
            Point2::new(62.0, 32.0),
            Point2::new(58.0, 32.0),
        ]);
        let stencil = CylinderStencil::for_hole(&square, &frame(), &PreviewConfig::default()).unwrap();

        assert_relative_eq!(stencil.radius, 8f64.sqrt() * 0.8, epsilon = 1e-12);
        assert_relative_eq!(stencil.length, 0.36 * 3.0, epsilon = 1e-12);
        assert_relative_eq!(stencil.center.x, 8.0, epsilon = 1e-12);
        assert_relative_eq!(stencil.center.y, -4.0, epsilon = 1e-12);
        assert_relative_eq!(stencil.center.z, -0.18, epsilon = 1e-12);

        let bbox = stencil.to_mesh().bounding_box();
        assert_relative_eq!(bbox.max.z - bbox.min.z, stencil.length, epsilon = 1e-9);
        assert_relative_eq!(bbox.center().z, stencil.center.z, epsilon = 1e-9);
    }

    #[test]
    fn test_degenerate_hole_rejected() {
        let point = Point2::new(50.0, 25.0);
        let collapsed = hole(vec![point, point, point]);
        assert!(matches!(
            CylinderStencil::for_hole(&collapsed, &frame(), &PreviewConfig::default()),
            Err(PreviewError::Csg(_))
        ));
    }

    #[test]
    fn test_no_holes_returns_copy() {
        let solid = Primitive::cube(nalgebra::Vector3::new(10.0, 10.0, 1.0), true).to_mesh();
        let (result, cut) = cut_holes(&solid, std::iter::empty(), &frame(), &PreviewConfig::default()).unwrap();
        assert_eq!(cut, 0);
        assert_eq!(result.triangle_count(), solid.triangle_count());
    }

    #[test]
    fn test_all_holes_cut_in_one_pass() {
        let solid = Primitive::cube(nalgebra::Vector3::new(80.0, 40.0, 0.5), true).to_mesh();
        let frame = SolidFrame {
            center: Point2::new(50.0, 25.0),
            scale: 0.8,
            depth: 0.5,
        };
        let ring = |cx: f64| {
            (0..32)
                .map(|i| {
                    let a = std::f64::consts::TAU * i as f64 / 32.0;
                    Point2::new(cx + 5.0 * a.cos(), 25.0 + 5.0 * a.sin())
                })
                .collect::<Vec<_>>()
        };
        let holes = [hole(ring(20.0)), hole(ring(50.0)), hole(ring(80.0))];

        let (result, cut) = cut_holes(&solid, &holes, &frame, &PreviewConfig::default()).unwrap();
        assert_eq!(cut, 3);

        // Three r = 4 prisms of depth 0.5 removed from 80 x 40 x 0.5
        let prism = 0.5 * 32.0 * 16.0 * (std::f64::consts::TAU / 32.0).sin() * 0.5;
        let volume = crate::geometry::analyze(&result).volume;
        assert_relative_eq!(volume, 1600.0 - 3.0 * prism, epsilon = 1e-6);
    }
}
