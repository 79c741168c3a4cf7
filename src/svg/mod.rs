// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! SVG path decomposition
//!
//! Turns SVG markup into closed 2D point rings, one per sub-path, in
//! document coordinates with every `transform` applied.

mod document;
mod path;
mod transform;

pub use document::decompose;
pub use path::flatten;
pub use transform::{parse_numbers, parse_transform};

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A closed polygon decoded from one SVG sub-path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawShape {
    /// Ring vertices without a repeated closing point
    pub points: Vec<Point2<f64>>,
    /// Position of the source element among the document's shape elements
    pub source_index: usize,
}

impl RawShape {
    pub fn new(points: Vec<Point2<f64>>, source_index: usize) -> Self {
        Self {
            points,
            source_index,
        }
    }
}
