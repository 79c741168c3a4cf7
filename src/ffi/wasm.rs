// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! WASM bindings using wasm-bindgen

use crate::pipeline::{Pipeline, Rendered};
use crate::scene::Material;
use crate::{io, PreviewConfig};
use wasm_bindgen::prelude::*;

/// Rendered preview handed to JavaScript
#[wasm_bindgen]
pub struct WasmMesh {
    inner: crate::geometry::Mesh,
    is_fallback: bool,
}

impl From<Rendered> for WasmMesh {
    fn from(rendered: Rendered) -> Self {
        Self {
            is_fallback: rendered.is_fallback(),
            inner: rendered.into_mesh(),
        }
    }
}

#[wasm_bindgen]
impl WasmMesh {
    pub fn vertex_count(&self) -> usize {
        self.inner.vertex_count()
    }

    pub fn triangle_count(&self) -> usize {
        self.inner.triangle_count()
    }

    /// True when the placeholder box was rendered instead of the part
    #[wasm_bindgen(getter)]
    pub fn is_fallback(&self) -> bool {
        self.is_fallback
    }

    /// Flat xyz positions, ready for a `Float32Array` attribute
    pub fn positions(&self) -> Vec<f32> {
        self.inner
            .vertices
            .iter()
            .flat_map(|v| [v.position.x as f32, v.position.y as f32, v.position.z as f32])
            .collect()
    }

    pub fn normals(&self) -> Vec<f32> {
        self.inner
            .vertices
            .iter()
            .flat_map(|v| [v.normal.x as f32, v.normal.y as f32, v.normal.z as f32])
            .collect()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.inner
            .triangles
            .iter()
            .flat_map(|t| t.indices.map(|i| i as u32))
            .collect()
    }

    /// Binary glTF with the preview material
    pub fn to_glb(&self) -> Result<Vec<u8>, JsValue> {
        io::gltf_bytes(&self.inner, &Material::default())
            .map_err(|e| JsValue::from_str(&format!("GLB export error: {}", e)))
    }
}

/// Render SVG markup at the given sheet thickness in millimetres
#[wasm_bindgen]
pub fn render_preview(svg: &str, thickness: Option<f64>) -> WasmMesh {
    Pipeline::with_config(PreviewConfig::default())
        .render(svg, thickness)
        .into()
}

/// Render the backend's base64 preview field
#[wasm_bindgen]
pub fn render_preview_base64(encoded: &str, thickness: Option<f64>) -> Result<WasmMesh, JsValue> {
    let svg = io::decode_preview(encoded)
        .map_err(|e| JsValue::from_str(&format!("Preview decode error: {}", e)))?;
    Ok(render_preview(&svg, thickness))
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
