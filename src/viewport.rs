// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Orbit camera for the preview viewport

use nalgebra::{Isometry3, Matrix4, Perspective3, Point3, Vector3};
use serde::{Deserialize, Serialize};

const DEFAULT_POSITION: [f64; 3] = [100.0, 80.0, 120.0];
const ZOOM_IN_FACTOR: f64 = 0.8;
const ZOOM_OUT_FACTOR: f64 = 1.25;

/// Perspective camera orbiting a target point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitCamera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    /// Vertical field of view in degrees
    pub fov: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        let [x, y, z] = DEFAULT_POSITION;
        Self {
            position: Point3::new(x, y, z),
            target: Point3::origin(),
            fov: 50.0,
            min_distance: 30.0,
            max_distance: 500.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

impl OrbitCamera {
    pub fn distance(&self) -> f64 {
        nalgebra::distance(&self.position, &self.target)
    }

    pub fn zoom_in(&mut self) {
        self.dolly(ZOOM_IN_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.dolly(ZOOM_OUT_FACTOR);
    }

    /// Back to the default position looking at the origin
    pub fn reset(&mut self) {
        let defaults = Self::default();
        self.position = defaults.position;
        self.target = defaults.target;
    }

    /// Rotate around the target; elevation stays short of the poles
    pub fn orbit(&mut self, delta_azimuth: f64, delta_elevation: f64) {
        let offset = self.position - self.target;
        let distance = offset.norm();
        if distance == 0.0 {
            return;
        }

        let azimuth = offset.x.atan2(offset.z) + delta_azimuth;
        let elevation = ((offset.y / distance).asin() + delta_elevation).clamp(-1.5, 1.5);

        self.position = self.target
            + Vector3::new(
                distance * elevation.cos() * azimuth.sin(),
                distance * elevation.sin(),
                distance * elevation.cos() * azimuth.cos(),
            );
    }

    /// Scale the camera-to-target distance, keeping it within bounds
    fn dolly(&mut self, factor: f64) {
        let offset = self.position - self.target;
        let distance = offset.norm();
        if distance == 0.0 {
            return;
        }
        let new_distance = (distance * factor).clamp(self.min_distance, self.max_distance);
        self.position = self.target + offset * (new_distance / distance);
    }

    pub fn view_matrix(&self) -> Matrix4<f64> {
        Isometry3::look_at_rh(&self.position, &self.target, &Vector3::y()).to_homogeneous()
    }

    pub fn projection_matrix(&self, aspect: f64) -> Matrix4<f64> {
        Perspective3::new(aspect, self.fov.to_radians(), self.near, self.far).to_homogeneous()
    }
}
