// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry analytics and statistics

use super::{mesh_utils, Mesh};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometry statistics and analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Enclosed volume in cubic units
    pub volume: f64,
    /// Total surface area in square units
    pub surface_area: f64,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f64; 6],
    /// Mean vertex position [x, y, z]
    pub centroid: [f64; 3],
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Edges used by a single triangle once positions are welded
    pub boundary_edges: usize,
    /// No welded edge is shared by more than two triangles
    pub is_manifold: bool,
    /// Every welded edge is shared by exactly two triangles
    pub is_watertight: bool,
}

impl GeometryStats {
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            surface_area: 0.0,
            bbox: [0.0; 6],
            centroid: [0.0; 3],
            vertex_count: 0,
            triangle_count: 0,
            boundary_edges: 0,
            is_manifold: false,
            is_watertight: false,
        }
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.bbox[3] - self.bbox[0],
            self.bbox[4] - self.bbox[1],
            self.bbox[5] - self.bbox[2],
        ]
    }
}

impl fmt::Display for GeometryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [sx, sy, sz] = self.size();
        writeln!(f, "Volume:        {:>12.4}", self.volume)?;
        writeln!(f, "Surface area:  {:>12.4}", self.surface_area)?;
        writeln!(
            f,
            "Centroid:      ({:.2}, {:.2}, {:.2})",
            self.centroid[0], self.centroid[1], self.centroid[2]
        )?;
        writeln!(
            f,
            "Bounds min:    ({:.2}, {:.2}, {:.2})",
            self.bbox[0], self.bbox[1], self.bbox[2]
        )?;
        writeln!(
            f,
            "Bounds max:    ({:.2}, {:.2}, {:.2})",
            self.bbox[3], self.bbox[4], self.bbox[5]
        )?;
        writeln!(f, "Size:          {:.2} x {:.2} x {:.2}", sx, sy, sz)?;
        writeln!(f, "Vertices:      {:>12}", self.vertex_count)?;
        writeln!(f, "Triangles:     {:>12}", self.triangle_count)?;
        writeln!(f, "Open edges:    {:>12}", self.boundary_edges)?;
        writeln!(
            f,
            "Manifold:      {:>12}",
            if self.is_manifold { "yes" } else { "no" }
        )?;
        write!(
            f,
            "Watertight:    {:>12}",
            if self.is_watertight { "yes" } else { "no" }
        )
    }
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &Mesh) -> GeometryStats {
    if mesh.vertices.is_empty() || mesh.triangles.is_empty() {
        return GeometryStats::empty();
    }

    let bounds = mesh.bounding_box();
    let boundary_edges = mesh_utils::boundary_edge_count(mesh);

    GeometryStats {
        volume: calculate_volume(mesh),
        surface_area: calculate_surface_area(mesh),
        bbox: [
            bounds.min.x,
            bounds.min.y,
            bounds.min.z,
            bounds.max.x,
            bounds.max.y,
            bounds.max.z,
        ],
        centroid: calculate_centroid(mesh),
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        boundary_edges,
        is_manifold: mesh_utils::is_manifold(mesh),
        is_watertight: mesh_utils::is_closed(mesh),
    }
}

/// Sum of signed tetrahedron volumes against the origin
fn calculate_volume(mesh: &Mesh) -> f64 {
    let volume: f64 = mesh
        .triangles
        .iter()
        .map(|triangle| {
            let [v0, v1, v2] = triangle.positions(mesh);
            v0.coords.dot(&v1.coords.cross(&v2.coords)) / 6.0
        })
        .sum();

    volume.abs()
}

fn calculate_surface_area(mesh: &Mesh) -> f64 {
    mesh.triangles
        .iter()
        .map(|triangle| {
            let [v0, v1, v2] = triangle.positions(mesh);
            (v1 - v0).cross(&(v2 - v0)).norm() / 2.0
        })
        .sum()
}

fn calculate_centroid(mesh: &Mesh) -> [f64; 3] {
    let sum = mesh
        .vertices
        .iter()
        .fold(nalgebra::Vector3::zeros(), |acc, v| acc + v.position.coords);
    let mean = sum / mesh.vertices.len() as f64;
    [mean.x, mean.y, mean.z]
}
