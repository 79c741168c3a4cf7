// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! 2D exterior-with-holes profile and its triangulation

use super::polygon::{signed_area, wound_against};
use crate::error::{PreviewError, Result};
use nalgebra::Point2;

/// One exterior ring plus hole rings wound opposite to it
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub exterior: Vec<Point2<f64>>,
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile {
    pub fn new(exterior: Vec<Point2<f64>>) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }

    /// Add a hole, reversing it first if it winds like the exterior
    pub fn add_hole(&mut self, hole: &[Point2<f64>]) {
        let reference = signed_area(&self.exterior);
        self.holes.push(wound_against(hole, reference));
    }

    /// Build a profile from an exterior and any number of holes
    pub fn assemble<'a, I>(exterior: &[Point2<f64>], holes: I) -> Self
    where
        I: IntoIterator<Item = &'a [Point2<f64>]>,
    {
        let mut profile = Self::new(exterior.to_vec());
        for hole in holes {
            profile.add_hole(hole);
        }
        profile
    }

    pub fn point_count(&self) -> usize {
        self.exterior.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Copy of the profile with the exterior counter-clockwise and holes clockwise
    pub fn normalized(&self) -> Self {
        let mut exterior = self.exterior.clone();
        if signed_area(&exterior) < 0.0 {
            exterior.reverse();
        }
        let reference = signed_area(&exterior);
        let holes = self
            .holes
            .iter()
            .map(|hole| wound_against(hole, reference))
            .collect();
        Self { exterior, holes }
    }

    /// Triangulate with earcut.
    ///
    /// Returned indices address the exterior points followed by each hole's
    /// points in order; every triangle is counter-clockwise.
    pub fn triangulate(&self) -> Result<Triangulation> {
        if self.exterior.len() < 3 {
            return Err(PreviewError::extrusion(
                "profile exterior needs at least 3 points",
            ));
        }

        let valid_holes: Vec<&Vec<Point2<f64>>> =
            self.holes.iter().filter(|h| h.len() >= 3).collect();

        let mut points = Vec::with_capacity(self.point_count());
        points.extend_from_slice(&self.exterior);

        let mut hole_indices = Vec::with_capacity(valid_holes.len());
        for hole in valid_holes {
            hole_indices.push(points.len());
            points.extend_from_slice(hole);
        }

        let mut vertices = Vec::with_capacity(points.len() * 2);
        for p in &points {
            vertices.push(p.x);
            vertices.push(p.y);
        }

        let raw = earcutr::earcut(&vertices, &hole_indices, 2)
            .map_err(|e| PreviewError::extrusion(format!("triangulation failed: {:?}", e)))?;

        let mut triangles = Vec::with_capacity(raw.len() / 3);
        for tri in raw.chunks_exact(3) {
            let (a, b, c) = (tri[0], tri[1], tri[2]);
            let cross = (points[b] - points[a]).perp(&(points[c] - points[a]));
            if cross > 0.0 {
                triangles.push([a, b, c]);
            } else if cross < 0.0 {
                triangles.push([a, c, b]);
            }
        }

        if triangles.is_empty() {
            return Err(PreviewError::extrusion("triangulation produced no faces"));
        }

        Ok(Triangulation { points, triangles })
    }
}

/// Triangulated profile
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Exterior points followed by hole points
    pub points: Vec<Point2<f64>>,
    /// Counter-clockwise triangles indexing into `points`
    pub triangles: Vec<[usize; 3]>,
}
