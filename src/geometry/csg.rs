// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CSG (Constructive Solid Geometry) operations using BSP tree
//!
//! Nodes live in a flat arena and every traversal uses an explicit work
//! stack, so deep trees built from finely tessellated stencils do not grow
//! the call stack.

use super::{Mesh, Triangle, Vertex};
use crate::error::{PreviewError, Result};
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// Distance under which a point is considered on a plane
const EPSILON: f64 = 1e-5;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

#[derive(Debug, Clone, Copy)]
struct Plane {
    normal: Vector3<f64>,
    w: f64,
}

impl Plane {
    fn from_points(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a)).try_normalize(1e-12)?;
        Some(Self {
            normal,
            w: normal.dot(&a.coords),
        })
    }

    fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    fn side_of(&self, point: &Point3<f64>) -> u8 {
        let t = self.normal.dot(&point.coords) - self.w;
        if t < -EPSILON {
            BACK
        } else if t > EPSILON {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Sort `polygon` relative to this plane, splitting it when it spans.
    ///
    /// Coplanar polygons go to `coplanar_front` or `coplanar_back` depending
    /// on which way they face.
    fn split_polygon(
        &self,
        polygon: Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let sides: Vec<u8> = polygon
            .vertices
            .iter()
            .map(|v| self.side_of(&v.position))
            .collect();
        let polygon_type = sides.iter().fold(COPLANAR, |acc, side| acc | side);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon);
                } else {
                    coplanar_back.push(polygon);
                }
            }
            FRONT => front.push(polygon),
            BACK => back.push(polygon),
            _ => {
                let n = polygon.vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (si, sj) = (sides[i], sides[j]);
                    let (vi, vj) = (&polygon.vertices[i], &polygon.vertices[j]);

                    if si != BACK {
                        f.push(*vi);
                    }
                    if si != FRONT {
                        b.push(*vi);
                    }
                    if si | sj == SPANNING {
                        let t = (self.w - self.normal.dot(&vi.position.coords))
                            / self.normal.dot(&(vj.position - vi.position));
                        let v = vi.lerp(vj, t);
                        f.push(v);
                        b.push(v);
                    }
                }

                if f.len() >= 3 {
                    front.push(Polygon {
                        vertices: f,
                        plane: polygon.plane,
                    });
                }
                if b.len() >= 3 {
                    back.push(Polygon {
                        vertices: b,
                        plane: polygon.plane,
                    });
                }
            }
        }
    }
}

/// Convex planar polygon; split pieces inherit their parent's plane
#[derive(Debug, Clone)]
struct Polygon {
    vertices: Vec<Vertex>,
    plane: Plane,
}

impl Polygon {
    fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.normal = -v.normal;
        }
        self.plane.flip();
    }
}

#[derive(Debug, Clone, Default)]
struct BspNode {
    plane: Option<Plane>,
    front: Option<usize>,
    back: Option<usize>,
    polygons: Vec<Polygon>,
}

/// BSP tree stored as an arena; node 0 is the root
#[derive(Debug, Clone)]
struct BspTree {
    nodes: Vec<BspNode>,
}

impl BspTree {
    fn new(polygons: Vec<Polygon>) -> Self {
        let mut tree = Self {
            nodes: vec![BspNode::default()],
        };
        tree.build(polygons);
        tree
    }

    fn push_node(&mut self) -> usize {
        self.nodes.push(BspNode::default());
        self.nodes.len() - 1
    }

    /// Insert polygons, extending the tree where they fall off a leaf
    fn build(&mut self, polygons: Vec<Polygon>) {
        let mut work = vec![(0usize, polygons)];

        while let Some((index, polygons)) = work.pop() {
            if polygons.is_empty() {
                continue;
            }

            let plane = match self.nodes[index].plane {
                Some(plane) => plane,
                None => {
                    let plane = polygons[0].plane;
                    self.nodes[index].plane = Some(plane);
                    plane
                }
            };

            let mut coplanar = Vec::new();
            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                let mut coplanar_back = Vec::new();
                plane.split_polygon(polygon, &mut coplanar, &mut coplanar_back, &mut front, &mut back);
                coplanar.append(&mut coplanar_back);
            }
            self.nodes[index].polygons.append(&mut coplanar);

            if !front.is_empty() {
                let child = match self.nodes[index].front {
                    Some(child) => child,
                    None => {
                        let child = self.push_node();
                        self.nodes[index].front = Some(child);
                        child
                    }
                };
                work.push((child, front));
            }
            if !back.is_empty() {
                let child = match self.nodes[index].back {
                    Some(child) => child,
                    None => {
                        let child = self.push_node();
                        self.nodes[index].back = Some(child);
                        child
                    }
                };
                work.push((child, back));
            }
        }
    }

    /// Convert solid space to empty space and empty space to solid space
    fn invert(&mut self) {
        for node in &mut self.nodes {
            for polygon in &mut node.polygons {
                polygon.flip();
            }
            if let Some(plane) = node.plane.as_mut() {
                plane.flip();
            }
            std::mem::swap(&mut node.front, &mut node.back);
        }
    }

    /// Remove the parts of `polygons` that lie inside this tree's solid
    fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let mut kept = Vec::new();
        let mut work = vec![(0usize, polygons)];

        while let Some((index, polygons)) = work.pop() {
            let node = &self.nodes[index];
            let Some(plane) = node.plane else {
                kept.extend(polygons);
                continue;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            for polygon in polygons {
                let mut coplanar_front = Vec::new();
                let mut coplanar_back = Vec::new();
                plane.split_polygon(
                    polygon,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
                front.append(&mut coplanar_front);
                back.append(&mut coplanar_back);
            }

            match node.front {
                Some(child) => work.push((child, front)),
                None => kept.extend(front),
            }
            // Anything behind a leaf is inside the solid
            if let Some(child) = node.back {
                work.push((child, back));
            }
        }

        kept
    }

    /// Remove every polygon in this tree that lies inside `other`
    fn clip_to(&mut self, other: &BspTree) {
        for node in &mut self.nodes {
            let polygons = std::mem::take(&mut node.polygons);
            node.polygons = other.clip_polygons(polygons);
        }
    }

    fn all_polygons(&self) -> Vec<Polygon> {
        self.nodes
            .iter()
            .flat_map(|node| node.polygons.iter().cloned())
            .collect()
    }
}

/// Convert mesh to polygons, dropping degenerate triangles
fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    mesh.triangles
        .iter()
        .filter_map(|tri| {
            let [a, b, c] = tri.positions(mesh);
            let plane = Plane::from_points(&a, &b, &c)?;
            Some(Polygon {
                vertices: tri.indices.iter().map(|&i| mesh.vertices[i]).collect(),
                plane,
            })
        })
        .collect()
}

/// Convert polygons back to a flat-shaded triangle mesh
fn polygons_to_mesh(polygons: &[Polygon]) -> Mesh {
    let mut mesh = Mesh::new();

    for polygon in polygons {
        let normal = polygon.plane.normal;
        let indices: Vec<usize> = polygon
            .vertices
            .iter()
            .map(|v| mesh.add_vertex(Vertex::new(v.position, normal)))
            .collect();

        // Split polygons are convex, so a fan covers them
        for k in 1..indices.len().saturating_sub(1) {
            mesh.add_triangle(Triangle::new([indices[0], indices[k], indices[k + 1]]));
        }
    }

    mesh
}

/// Subtract `b` from `a`.
///
/// Fails when `a` has no usable faces or when nothing of `a` survives.
/// An empty `b` leaves `a` unchanged.
pub fn csg_difference(a: &Mesh, b: &Mesh) -> Result<Mesh> {
    let polys_a = mesh_to_polygons(a);
    if polys_a.is_empty() {
        return Err(PreviewError::csg("cannot subtract from an empty mesh"));
    }
    let polys_b = mesh_to_polygons(b);
    if polys_b.is_empty() {
        return Ok(a.clone());
    }

    let mut tree_a = BspTree::new(polys_a);
    let mut tree_b = BspTree::new(polys_b);

    tree_a.invert();
    tree_a.clip_to(&tree_b);
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_a.build(tree_b.all_polygons());
    tree_a.invert();

    let polygons = tree_a.all_polygons();
    debug!(
        nodes_a = tree_a.nodes.len(),
        nodes_b = tree_b.nodes.len(),
        polygons = polygons.len(),
        "BSP difference complete"
    );

    let result = polygons_to_mesh(&polygons);
    if result.is_empty() {
        return Err(PreviewError::csg("difference removed the entire mesh"));
    }
    Ok(result)
}
