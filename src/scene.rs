// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene container the preview result is mounted into

use crate::geometry::{BoundingBox, Mesh};
use crate::pipeline::{Classification, Pipeline};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// PBR material for the previewed part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Linear RGBA, as glTF `baseColorFactor` expects
    pub base_color: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    pub double_sided: bool,
}

impl Default for Material {
    /// Light grey, slightly metallic sheet
    fn default() -> Self {
        Self::from_hex(0xe0e0e0, 0.1, 0.6)
    }
}

impl Material {
    /// Material from an sRGB hex color such as `0xe0e0e0`
    pub fn from_hex(rgb: u32, metalness: f32, roughness: f32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((rgb >> shift) & 0xff) as f32 / 255.0);
        Self {
            base_color: [channel(16), channel(8), channel(0), 1.0],
            metalness,
            roughness,
            double_sided: true,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// A mesh with the material it is drawn with
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub mesh: Mesh,
    pub material: Material,
    pub is_fallback: bool,
}

/// Children sharing one position offset
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub children: Vec<SceneNode>,
    pub position: Vector3<f64>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            children: Vec::new(),
            position: Vector3::zeros(),
        }
    }
}

impl Group {
    pub fn clear(&mut self) {
        self.children.clear();
        self.position = Vector3::zeros();
    }

    pub fn add(&mut self, node: SceneNode) {
        self.children.push(node);
    }

    /// Bounds of the children before the group offset is applied
    pub fn local_bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::empty();
        for child in &self.children {
            for vertex in &child.mesh.vertices {
                bounds.expand_to_include(&vertex.position);
            }
        }
        bounds
    }

    /// Bounds with the group offset applied
    pub fn world_bounds(&self) -> BoundingBox {
        let local = self.local_bounds();
        if local.is_empty() {
            return local;
        }
        BoundingBox::new(local.min + self.position, local.max + self.position)
    }
}

/// Owns the preview subtree and rebuilds it on every input change
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pipeline: Pipeline,
    material: Material,
    root: Group,
    classification: Classification,
}

impl Scene {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            ..Self::default()
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Classification from the most recent rebuild
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Replace the scene content with a fresh render of `svg_markup`.
    ///
    /// The previous children are dropped first, then the group is moved so
    /// the new content's bounding box is centered on the origin.
    pub fn rebuild(&mut self, svg_markup: &str, thickness_mm: Option<f64>) -> &Group {
        self.root.clear();

        let run = self.pipeline.run(svg_markup, thickness_mm);
        self.classification = run.classification;

        let is_fallback = run.rendered.is_fallback();
        self.root.add(SceneNode {
            mesh: run.rendered.into_mesh(),
            material: self.material,
            is_fallback,
        });

        let bounds = self.root.local_bounds();
        if !bounds.is_empty() {
            self.root.position = -bounds.center().coords;
        }
        debug!(
            children = self.root.children.len(),
            fallback = is_fallback,
            "scene rebuilt"
        );

        &self.root
    }
}
