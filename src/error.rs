// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for the preview pipeline

use thiserror::Error;

/// Preview pipeline result type
pub type Result<T> = std::result::Result<T, PreviewError>;

/// Failures raised by the individual pipeline stages.
///
/// None of these ever leave [`crate::Pipeline::run`]; each stage's caller
/// recovers from them (skip, fallback box or pre-CSG solid).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreviewError {
    /// An SVG element's geometry could not be decoded
    #[error("malformed geometry in element {index}: {message}")]
    Decomposition { index: usize, message: String },

    /// The SVG document is not well-formed XML
    #[error("SVG markup error: {0}")]
    Markup(String),

    /// No closed shape survived decomposition
    #[error("no closed shapes found in SVG input")]
    EmptyInput,

    /// Profile assembly or extrusion failed
    #[error("extrusion failed: {0}")]
    Extrusion(String),

    /// Boolean subtraction failed
    #[error("CSG evaluation failed: {0}")]
    Csg(String),
}

impl PreviewError {
    pub fn decomposition(index: usize, msg: impl Into<String>) -> Self {
        PreviewError::Decomposition {
            index,
            message: msg.into(),
        }
    }

    pub fn extrusion(msg: impl Into<String>) -> Self {
        PreviewError::Extrusion(msg.into())
    }

    pub fn csg(msg: impl Into<String>) -> Self {
        PreviewError::Csg(msg.into())
    }
}
