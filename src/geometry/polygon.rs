// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Planar polygon helpers: orientation, extent and containment

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Axis-aligned 2D bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2 {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds2 {
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include(&mut self, point: &Point2<f64>) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn union(&self, other: &Bounds2) -> Bounds2 {
        Bounds2 {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Signed area (shoelace) and bounds in one pass over the ring.
///
/// Positive area means counter-clockwise in a y-up frame.
pub fn area_and_bounds(points: &[Point2<f64>]) -> (f64, Bounds2) {
    let mut twice_area = 0.0;
    let mut bounds = Bounds2::empty();
    let n = points.len();

    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n];
        twice_area += p.x * q.y - q.x * p.y;
        bounds.include(p);
    }

    (twice_area / 2.0, bounds)
}

pub fn signed_area(points: &[Point2<f64>]) -> f64 {
    area_and_bounds(points).0
}

/// Even-odd ray casting test
pub fn point_in_polygon(point: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (&polygon[i], &polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y)
            && point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Mean distance from each vertex to `center`
pub fn mean_radius(points: &[Point2<f64>], center: &Point2<f64>) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| nalgebra::distance(p, center)).sum::<f64>() / points.len() as f64
}

/// Return `ring` wound opposite to a reference orientation.
///
/// Reverses only when the ring currently winds the same way as
/// `reference_signed_area`, so applying it twice changes nothing.
pub fn wound_against(ring: &[Point2<f64>], reference_signed_area: f64) -> Vec<Point2<f64>> {
    let mut out = ring.to_vec();
    if signed_area(ring) * reference_signed_area > 0.0 {
        out.reverse();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x: f64, y: f64, side: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(x, y),
            Point2::new(x + side, y),
            Point2::new(x + side, y + side),
            Point2::new(x, y + side),
        ]
    }

    #[test]
    fn test_area_sign_tracks_winding() {
        let ccw = square(0.0, 0.0, 10.0);
        let mut cw = ccw.clone();
        cw.reverse();

        assert_relative_eq!(signed_area(&ccw), 100.0);
        assert_relative_eq!(signed_area(&cw), -100.0);
    }

    #[test]
    fn test_bounds_single_pass() {
        let (_, bounds) = area_and_bounds(&square(-5.0, 2.0, 4.0));
        assert_eq!(bounds.min_x, -5.0);
        assert_eq!(bounds.max_x, -1.0);
        assert_eq!(bounds.min_y, 2.0);
        assert_eq!(bounds.max_y, 6.0);
        assert_eq!(bounds.center(), Point2::new(-3.0, 4.0));
    }

    #[test]
    fn test_point_in_polygon() {
        let poly = square(0.0, 0.0, 10.0);
        assert!(point_in_polygon(&Point2::new(5.0, 5.0), &poly));
        assert!(!point_in_polygon(&Point2::new(15.0, 5.0), &poly));
        assert!(!point_in_polygon(&Point2::new(5.0, -0.1), &poly));
    }

    #[test]
    fn test_point_in_concave_polygon() {
        // U shape: the notch is outside
        let poly = vec![
            Point2::new(0.0, 0.0),
            Point2::new(30.0, 0.0),
            Point2::new(30.0, 30.0),
            Point2::new(20.0, 30.0),
            Point2::new(20.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 30.0),
            Point2::new(0.0, 30.0),
        ];
        assert!(!point_in_polygon(&Point2::new(15.0, 20.0), &poly));
        assert!(point_in_polygon(&Point2::new(5.0, 20.0), &poly));
    }

    #[test]
    fn test_mean_radius_of_square() {
        let poly = square(-1.0, -1.0, 2.0);
        assert_relative_eq!(mean_radius(&poly, &Point2::origin()), 2f64.sqrt());
    }

    #[test]
    fn test_wound_against_is_idempotent() {
        let exterior = square(0.0, 0.0, 10.0);
        let hole = square(2.0, 2.0, 2.0);
        let reference = signed_area(&exterior);

        let once = wound_against(&hole, reference);
        let twice = wound_against(&once, reference);

        assert!(signed_area(&once) < 0.0);
        assert_eq!(once, twice);
    }
}
