// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Exterior / hole classification of decoded shapes

use crate::geometry::polygon::{area_and_bounds, point_in_polygon};
use crate::geometry::Bounds2;
use crate::svg::RawShape;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a shape contributes to the solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Outer boundary of the part
    Exterior,
    /// Material removed from the exterior
    Hole,
    /// Duplicate outline or shape outside the exterior
    Ignored,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Exterior => "exterior",
            Role::Hole => "hole",
            Role::Ignored => "ignored",
        };
        f.write_str(name)
    }
}

/// A decoded shape with its measurements and assigned role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedShape {
    pub points: Vec<Point2<f64>>,
    /// Shoelace area; the sign gives the winding
    pub signed_area: f64,
    pub area: f64,
    pub bounds: Bounds2,
    /// Center of `bounds`
    pub centroid: Point2<f64>,
    pub source_index: usize,
    pub role: Role,
}

impl ClassifiedShape {
    fn measure(shape: RawShape) -> Self {
        let (signed_area, bounds) = area_and_bounds(&shape.points);
        Self {
            centroid: bounds.center(),
            area: signed_area.abs(),
            signed_area,
            bounds,
            source_index: shape.source_index,
            points: shape.points,
            role: Role::Ignored,
        }
    }
}

/// Shapes ordered by descending area, each with a role
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub shapes: Vec<ClassifiedShape>,
}

impl Classification {
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn exterior(&self) -> Option<&ClassifiedShape> {
        self.shapes.first().filter(|s| s.role == Role::Exterior)
    }

    pub fn holes(&self) -> impl Iterator<Item = &ClassifiedShape> {
        self.with_role(Role::Hole)
    }

    pub fn ignored(&self) -> impl Iterator<Item = &ClassifiedShape> {
        self.with_role(Role::Ignored)
    }

    fn with_role(&self, role: Role) -> impl Iterator<Item = &ClassifiedShape> {
        self.shapes.iter().filter(move |s| s.role == role)
    }

    /// Bounds of every shape, ignored ones included
    pub fn global_bounds(&self) -> Bounds2 {
        self.shapes
            .iter()
            .fold(Bounds2::empty(), |acc, s| acc.union(&s.bounds))
    }
}

/// Assign roles to `shapes`.
///
/// The largest shape is the exterior (first one wins a tie). Every other
/// shape is a hole when its area is at most `hole_area_ratio` of the
/// exterior's and its centroid lies inside the exterior; otherwise it is
/// ignored.
pub fn classify(shapes: Vec<RawShape>, hole_area_ratio: f64) -> Classification {
    let mut measured: Vec<ClassifiedShape> =
        shapes.into_iter().map(ClassifiedShape::measure).collect();
    // Stable, so equal areas keep document order
    measured.sort_by(|a, b| b.area.total_cmp(&a.area));

    let Some((exterior, rest)) = measured.split_first_mut() else {
        return Classification::default();
    };
    exterior.role = Role::Exterior;

    let threshold = exterior.area * hole_area_ratio;
    for shape in rest.iter_mut() {
        shape.role = if shape.area > threshold {
            Role::Ignored
        } else if point_in_polygon(&shape.centroid, &exterior.points) {
            Role::Hole
        } else {
            Role::Ignored
        };
    }

    Classification { shapes: measured }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x: f64, y: f64, side: f64, index: usize) -> RawShape {
        RawShape::new(
            vec![
                Point2::new(x, y),
                Point2::new(x + side, y),
                Point2::new(x + side, y + side),
                Point2::new(x, y + side),
            ],
            index,
        )
    }

    #[test]
    fn test_concentric_squares() {
        let result = classify(vec![square(4.0, 4.0, 2.0, 0), square(0.0, 0.0, 10.0, 1)], 0.8);

        let exterior = result.exterior().unwrap();
        assert_eq!(exterior.source_index, 1);
        assert_relative_eq!(exterior.area, 100.0);

        let holes: Vec<_> = result.holes().collect();
        assert_eq!(holes.len(), 1);
        assert_eq!(holes[0].centroid, Point2::new(5.0, 5.0));
    }

    #[test]
    fn test_disjoint_equal_squares() {
        let result = classify(vec![square(0.0, 0.0, 10.0, 0), square(20.0, 0.0, 10.0, 1)], 0.8);

        assert_eq!(result.exterior().unwrap().source_index, 0);
        assert_eq!(result.ignored().count(), 1);
        assert_eq!(result.holes().count(), 0);
    }

    #[test]
    fn test_area_ratio_boundary() {
        // 81% and 79% of a 100 x 100 exterior, both centered
        let side_81 = 90.0;
        let side_79 = 7900.0_f64.sqrt();

        let over = classify(
            vec![square(0.0, 0.0, 100.0, 0), square(5.0, 5.0, side_81, 1)],
            0.8,
        );
        assert_eq!(over.shapes[1].role, Role::Ignored);

        let under = classify(
            vec![square(0.0, 0.0, 100.0, 0), square(5.0, 5.0, side_79, 1)],
            0.8,
        );
        assert_eq!(under.shapes[1].role, Role::Hole);
    }

    #[test]
    fn test_outside_shape_ignored() {
        let result = classify(vec![square(0.0, 0.0, 10.0, 0), square(50.0, 50.0, 1.0, 1)], 0.8);
        assert_eq!(result.shapes[1].role, Role::Ignored);
        let bounds = result.global_bounds();
        assert_eq!(bounds.max_x, 51.0);
    }

    #[test]
    fn test_empty_input() {
        let result = classify(Vec::new(), 0.8);
        assert!(result.is_empty());
        assert!(result.exterior().is_none());
        assert!(result.global_bounds().is_empty());
    }
}
