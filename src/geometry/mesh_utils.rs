// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh validation utilities
//!
//! Extruded and CSG meshes carry per-face vertices for flat shading, so
//! connectivity is judged on welded positions rather than vertex indices.

use super::Mesh;
use nalgebra::Point3;
use std::collections::HashMap;

/// Positions closer than this are treated as the same vertex
const WELD_RESOLUTION: f64 = 1e-6;

type PointKey = [i64; 3];

fn quantize(p: &Point3<f64>) -> PointKey {
    [
        (p.x / WELD_RESOLUTION).round() as i64,
        (p.y / WELD_RESOLUTION).round() as i64,
        (p.z / WELD_RESOLUTION).round() as i64,
    ]
}

/// Undirected edge between two welded positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    v0: PointKey,
    v1: PointKey,
}

impl Edge {
    fn new(a: PointKey, b: PointKey) -> Self {
        // Smaller key first for consistent hashing
        if a <= b {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }
}

fn edge_counts(mesh: &Mesh) -> HashMap<Edge, u32> {
    let mut counts: HashMap<Edge, u32> = HashMap::new();

    for triangle in &mesh.triangles {
        let keys = triangle
            .positions(mesh)
            .map(|position| quantize(&position));
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[0] == keys[2] {
            continue;
        }

        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            *counts.entry(Edge::new(keys[a], keys[b])).or_insert(0) += 1;
        }
    }

    counts
}

/// Check if mesh is manifold (each edge shared by at most 2 triangles)
pub fn is_manifold(mesh: &Mesh) -> bool {
    edge_counts(mesh).values().all(|&count| count <= 2)
}

/// Check if mesh is closed (each edge shared by exactly 2 triangles)
pub fn is_closed(mesh: &Mesh) -> bool {
    let counts = edge_counts(mesh);
    !counts.is_empty() && counts.values().all(|&count| count == 2)
}

/// Number of edges used by exactly one triangle
pub fn boundary_edge_count(mesh: &Mesh) -> usize {
    edge_counts(mesh).values().filter(|&&count| count == 1).count()
}
