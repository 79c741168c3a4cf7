// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flattening of Bézier paths into closed point rings

use super::RawShape;
use kurbo::{BezPath, CubicBez, ParamCurve, PathEl, Point, QuadBez};
use nalgebra::Point2;

/// Points closer than this are merged when cleaning a ring
const DUPLICATE_EPSILON: f64 = 1e-9;

/// Split `path` into one ring per sub-path.
///
/// Curves are sampled at `divisions` evenly spaced parameter values per
/// segment. Open sub-paths are closed implicitly. Rings left with fewer than
/// three distinct points, or with non-finite coordinates, are dropped.
pub fn flatten(path: &BezPath, divisions: u32, source_index: usize) -> Vec<RawShape> {
    let divisions = divisions.max(1);
    let mut shapes = Vec::new();
    let mut ring: Vec<Point> = Vec::new();
    let mut last = Point::ORIGIN;

    let mut finish = |ring: &mut Vec<Point>| {
        if let Some(shape) = close_ring(std::mem::take(ring), source_index) {
            shapes.push(shape);
        }
    };

    for element in path.elements() {
        match *element {
            PathEl::MoveTo(p) => {
                finish(&mut ring);
                ring.push(p);
                last = p;
            }
            PathEl::LineTo(p) => {
                if ring.is_empty() {
                    ring.push(last);
                }
                ring.push(p);
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                if ring.is_empty() {
                    ring.push(last);
                }
                let curve = QuadBez::new(last, p1, p2);
                sample(&curve, divisions, &mut ring);
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                if ring.is_empty() {
                    ring.push(last);
                }
                let curve = CubicBez::new(last, p1, p2, p3);
                sample(&curve, divisions, &mut ring);
                last = p3;
            }
            PathEl::ClosePath => {
                // The pen returns to the sub-path start
                if let Some(&start) = ring.first() {
                    last = start;
                }
                finish(&mut ring);
            }
        }
    }
    finish(&mut ring);

    shapes
}

fn sample(curve: &impl ParamCurve, divisions: u32, out: &mut Vec<Point>) {
    for k in 1..=divisions {
        out.push(curve.eval(k as f64 / divisions as f64));
    }
}

/// Drop repeated points and the explicit closing point, then validate
fn close_ring(points: Vec<Point>, source_index: usize) -> Option<RawShape> {
    let mut ring: Vec<Point2<f64>> = Vec::with_capacity(points.len());
    for p in points {
        let p = Point2::new(p.x, p.y);
        if ring
            .last()
            .map_or(true, |q| nalgebra::distance(q, &p) > DUPLICATE_EPSILON)
        {
            ring.push(p);
        }
    }

    while ring.len() > 1 {
        match (ring.first(), ring.last()) {
            (Some(first), Some(last)) if nalgebra::distance(first, last) <= DUPLICATE_EPSILON => {
                ring.pop();
            }
            _ => break,
        }
    }

    if ring.len() < 3 || ring.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return None;
    }

    Some(RawShape {
        points: ring,
        source_index,
    })
}
