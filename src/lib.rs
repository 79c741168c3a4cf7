// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Laser-cut part preview core
//!
//! Turns a flat SVG cut path plus a sheet thickness into a 3D solid with
//! through-holes, ready for a real-time viewport or export.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod pipeline;
pub mod scene;
pub mod svg;
pub mod viewport;

#[cfg(feature = "wasm")]
pub mod ffi;

pub use config::PreviewConfig;
pub use error::PreviewError;
pub use geometry::{analyze, GeometryStats, Mesh, Primitive};
pub use io::{decode_preview, export_gltf, export_stl};
pub use pipeline::{Classification, Pipeline, PipelineRun, Rendered, Role};
pub use scene::{Material, Scene};
pub use viewport::OrbitCamera;

/// Render `svg_markup` with the default configuration
pub fn render_preview(svg_markup: &str, thickness_mm: Option<f64>) -> Rendered {
    Pipeline::new().render(svg_markup, thickness_mm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_rect() {
        let rendered = render_preview(r#"<svg><rect width="10" height="10"/></svg>"#, Some(3.0));
        assert!(!rendered.is_fallback());
        assert!(rendered.mesh().triangle_count() > 0);
    }
}
