// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! FFI bindings for WASM hosts

#[cfg(feature = "wasm")]
pub mod wasm;
