// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - preview decoding and mesh export

mod export_gltf;
mod export_stl;
mod preview;

pub use export_gltf::export as export_gltf;
pub use export_gltf::glb_bytes as gltf_bytes;
pub use export_stl::export_stl;
pub use preview::{decode_preview, encode_preview};
