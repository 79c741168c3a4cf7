// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Decoding of the backend's base64 SVG preview field

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

/// Decode a base64 SVG preview into markup.
///
/// Accepts the bare base64 payload or a full `data:` URL, and tolerates
/// line breaks inside the payload.
pub fn decode_preview(encoded: &str) -> Result<String> {
    let payload = encoded.trim();
    let payload = payload.strip_prefix(DATA_URL_PREFIX).unwrap_or(payload);
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .context("Preview is not valid base64")?;
    String::from_utf8(bytes).context("Decoded preview is not UTF-8 text")
}

/// Inverse of [`decode_preview`], without the data URL prefix
pub fn encode_preview(svg_markup: &str) -> String {
    STANDARD.encode(svg_markup.as_bytes())
}
