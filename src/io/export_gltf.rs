// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GLTF/GLB exporter

use crate::geometry::Mesh;
use crate::scene::Material;
use anyhow::{Context, Result};
use serde_json::json;
use std::io::Write;
use std::path::Path;

const GLB_MAGIC: u32 = 0x46546C67; // "glTF"
const CHUNK_JSON: u32 = 0x4E4F534A; // "JSON"
const CHUNK_BIN: u32 = 0x004E4942; // "BIN\0"

/// Export mesh to GLB for `.glb` paths, otherwise glTF JSON plus a `.bin`
pub fn export(mesh: &Mesh, material: &Material, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let is_glb = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("glb"));

    if is_glb {
        let bytes = glb_bytes(mesh, material)?;
        std::fs::write(path, bytes)
            .with_context(|| format!("Failed to write GLB file: {:?}", path))
    } else {
        export_gltf_separate(mesh, material, path)
    }
}

/// Binary glTF held in memory
pub fn glb_bytes(mesh: &Mesh, material: &Material) -> Result<Vec<u8>> {
    let (gltf, buffer_data) = create_gltf_json(mesh, material, None);

    let json_string = serde_json::to_string(&gltf)?;
    let json_length = align_to_multiple_of_four(json_string.len());
    let buffer_length = align_to_multiple_of_four(buffer_data.len());
    let total_length = 12 + 8 + json_length + 8 + buffer_length;

    let mut out = Vec::with_capacity(total_length);

    out.write_all(&GLB_MAGIC.to_le_bytes())?;
    out.write_all(&2u32.to_le_bytes())?;
    out.write_all(&(total_length as u32).to_le_bytes())?;

    out.write_all(&(json_length as u32).to_le_bytes())?;
    out.write_all(&CHUNK_JSON.to_le_bytes())?;
    out.write_all(json_string.as_bytes())?;
    out.resize(out.len() + json_length - json_string.len(), b' ');

    out.write_all(&(buffer_length as u32).to_le_bytes())?;
    out.write_all(&CHUNK_BIN.to_le_bytes())?;
    out.write_all(&buffer_data)?;
    out.resize(out.len() + buffer_length - buffer_data.len(), 0);

    Ok(out)
}

/// Export mesh to GLTF with separate .bin file
fn export_gltf_separate(mesh: &Mesh, material: &Material, path: &Path) -> Result<()> {
    let bin_path = path.with_extension("bin");
    let bin_name = bin_path
        .file_name()
        .and_then(|name| name.to_str())
        .context("glTF output path has no file name")?;

    let (gltf, buffer_data) = create_gltf_json(mesh, material, Some(bin_name));

    let json_string = serde_json::to_string_pretty(&gltf)?;
    std::fs::write(path, json_string)
        .with_context(|| format!("Failed to write glTF file: {:?}", path))?;
    std::fs::write(&bin_path, buffer_data)
        .with_context(|| format!("Failed to write glTF buffer: {:?}", bin_path))?;

    Ok(())
}

fn create_gltf_json(
    mesh: &Mesh,
    material: &Material,
    buffer_uri: Option<&str>,
) -> (serde_json::Value, Vec<u8>) {
    let mut buffer_data = Vec::new();

    // Write positions
    let position_offset = buffer_data.len();
    let (min_pos, max_pos) = calculate_bounds(mesh);
    for vertex in &mesh.vertices {
        for c in [vertex.position.x, vertex.position.y, vertex.position.z] {
            buffer_data.extend_from_slice(&(c as f32).to_le_bytes());
        }
    }
    let position_length = buffer_data.len() - position_offset;

    // Write normals
    let normal_offset = buffer_data.len();
    for vertex in &mesh.vertices {
        for c in [vertex.normal.x, vertex.normal.y, vertex.normal.z] {
            buffer_data.extend_from_slice(&(c as f32).to_le_bytes());
        }
    }
    let normal_length = buffer_data.len() - normal_offset;

    // Write indices
    let indices_offset = buffer_data.len();
    for triangle in &mesh.triangles {
        for index in triangle.indices {
            buffer_data.extend_from_slice(&(index as u32).to_le_bytes());
        }
    }
    let indices_length = buffer_data.len() - indices_offset;

    let mut buffer = json!({ "byteLength": buffer_data.len() });
    if let Some(uri) = buffer_uri {
        buffer["uri"] = json!(uri);
    }

    let gltf = json!({
        "asset": {
            "generator": concat!("lasercut-preview ", env!("CARGO_PKG_VERSION")),
            "version": "2.0"
        },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "materials": [
            {
                "pbrMetallicRoughness": {
                    "baseColorFactor": material.base_color,
                    "metallicFactor": material.metalness,
                    "roughnessFactor": material.roughness
                },
                "doubleSided": material.double_sided
            }
        ],
        "meshes": [
            {
                "primitives": [
                    {
                        "attributes": { "POSITION": 0, "NORMAL": 1 },
                        "indices": 2,
                        "material": 0,
                        "mode": 4
                    }
                ]
            }
        ],
        "accessors": [
            {
                "bufferView": 0,
                "byteOffset": 0,
                "componentType": 5126,
                "count": mesh.vertices.len(),
                "type": "VEC3",
                "min": min_pos,
                "max": max_pos
            },
            {
                "bufferView": 1,
                "byteOffset": 0,
                "componentType": 5126,
                "count": mesh.vertices.len(),
                "type": "VEC3"
            },
            {
                "bufferView": 2,
                "byteOffset": 0,
                "componentType": 5125,
                "count": mesh.triangles.len() * 3,
                "type": "SCALAR"
            }
        ],
        "bufferViews": [
            {
                "buffer": 0,
                "byteOffset": position_offset,
                "byteLength": position_length,
                "target": 34962
            },
            {
                "buffer": 0,
                "byteOffset": normal_offset,
                "byteLength": normal_length,
                "target": 34962
            },
            {
                "buffer": 0,
                "byteOffset": indices_offset,
                "byteLength": indices_length,
                "target": 34963
            }
        ],
        "buffers": [buffer]
    });

    (gltf, buffer_data)
}

fn calculate_bounds(mesh: &Mesh) -> ([f32; 3], [f32; 3]) {
    let bbox = mesh.bounding_box();
    if bbox.is_empty() {
        return ([0.0; 3], [0.0; 3]);
    }
    (
        [bbox.min.x as f32, bbox.min.y as f32, bbox.min.z as f32],
        [bbox.max.x as f32, bbox.max.y as f32, bbox.max.z as f32],
    )
}

fn align_to_multiple_of_four(n: usize) -> usize {
    (n + 3) & !3
}
