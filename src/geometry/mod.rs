// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and operations

mod analytics;
mod bbox;
mod csg;
mod extrude;
mod mesh;
pub mod mesh_utils;
pub mod polygon;
mod primitives;
mod profile;

pub use analytics::{analyze, GeometryStats};
pub use bbox::BoundingBox;
pub use csg::csg_difference;
pub use extrude::extrude_profile;
pub use mesh::{Mesh, Triangle, Vertex};
pub use polygon::Bounds2;
pub use primitives::Primitive;
pub use profile::{Profile, Triangulation};
