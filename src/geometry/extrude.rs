// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Straight extrusion of a profile along +Z

use super::{Mesh, Profile, Triangle, Vertex};
use crate::error::{PreviewError, Result};
use nalgebra::{Point2, Point3, Vector3};

/// Extrude `profile` from z = 0 to z = `depth`.
///
/// No bevel and a single step along the depth. Caps and every wall quad get
/// their own vertices so normals stay flat. Faces point outward regardless
/// of the profile's input winding.
pub fn extrude_profile(profile: &Profile, depth: f64) -> Result<Mesh> {
    if !depth.is_finite() || depth <= 0.0 {
        return Err(PreviewError::extrusion(format!(
            "extrusion depth must be positive, got {}",
            depth
        )));
    }

    let profile = profile.normalized();
    if super::polygon::signed_area(&profile.exterior).abs() < 1e-12 {
        return Err(PreviewError::extrusion("profile exterior has zero area"));
    }

    let triangulation = profile.triangulate()?;
    let points = &triangulation.points;
    let n = points.len();

    let mut mesh = Mesh::with_capacity(n * 6, triangulation.triangles.len() * 2 + n * 2);

    let up = Vector3::new(0.0, 0.0, 1.0);
    let down = -up;

    // Caps
    let bottom_start = mesh.vertex_count();
    for p in points {
        mesh.add_vertex(Vertex::new(Point3::new(p.x, p.y, 0.0), down));
    }
    let top_start = mesh.vertex_count();
    for p in points {
        mesh.add_vertex(Vertex::new(Point3::new(p.x, p.y, depth), up));
    }
    for [a, b, c] in &triangulation.triangles {
        mesh.add_triangle(Triangle::new([
            bottom_start + a,
            bottom_start + c,
            bottom_start + b,
        ]));
        mesh.add_triangle(Triangle::new([top_start + a, top_start + b, top_start + c]));
    }

    // Walls
    add_walls(&mut mesh, &profile.exterior, depth);
    for hole in &profile.holes {
        add_walls(&mut mesh, hole, depth);
    }

    Ok(mesh)
}

/// One quad per ring edge; counter-clockwise rings face outward, clockwise
/// rings face into the hole.
fn add_walls(mesh: &mut Mesh, ring: &[Point2<f64>], depth: f64) {
    let n = ring.len();
    for i in 0..n {
        let p = ring[i];
        let q = ring[(i + 1) % n];
        let edge = q - p;
        let Some(normal) = Vector3::new(edge.y, -edge.x, 0.0).try_normalize(1e-12) else {
            continue;
        };

        let b0 = mesh.add_vertex(Vertex::new(Point3::new(p.x, p.y, 0.0), normal));
        let b1 = mesh.add_vertex(Vertex::new(Point3::new(q.x, q.y, 0.0), normal));
        let t1 = mesh.add_vertex(Vertex::new(Point3::new(q.x, q.y, depth), normal));
        let t0 = mesh.add_vertex(Vertex::new(Point3::new(p.x, p.y, depth), normal));

        mesh.add_triangle(Triangle::new([b0, b1, t1]));
        mesh.add_triangle(Triangle::new([b0, t1, t0]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{analyze, mesh_utils::is_closed};
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn test_extrude_box_volume() {
        let mesh = extrude_profile(&Profile::new(rect(0.0, 0.0, 10.0, 5.0)), 2.0).unwrap();
        let stats = analyze(&mesh);

        assert!(is_closed(&mesh));
        assert_relative_eq!(stats.volume, 100.0, epsilon = 1e-9);
        assert_eq!(mesh.vertex_count(), 4 * 6);
    }

    #[test]
    fn test_clockwise_exterior_still_positive_volume() {
        let mut ring = rect(0.0, 0.0, 10.0, 5.0);
        ring.reverse();
        let mesh = extrude_profile(&Profile::new(ring), 2.0).unwrap();
        assert_relative_eq!(analyze(&mesh).volume, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_extrude_with_hole() {
        let exterior = rect(0.0, 0.0, 10.0, 10.0);
        let profile = Profile::assemble(&exterior, [rect(4.0, 4.0, 6.0, 6.0).as_slice()]);
        let mesh = extrude_profile(&profile, 1.0).unwrap();

        assert!(is_closed(&mesh));
        assert_relative_eq!(analyze(&mesh).volume, 96.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_zero_depth() {
        let result = extrude_profile(&Profile::new(rect(0.0, 0.0, 1.0, 1.0)), 0.0);
        assert!(matches!(result, Err(PreviewError::Extrusion(_))));
    }

    #[test]
    fn test_rejects_collinear_exterior() {
        let ring = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ];
        assert!(extrude_profile(&Profile::new(ring), 1.0).is_err());
    }
}
