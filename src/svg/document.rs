// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! SVG document walk: element geometry under composed transforms

use super::path::flatten;
use super::transform::{parse_numbers, parse_transform};
use super::RawShape;
use crate::config::PreviewConfig;
use crate::error::{PreviewError, Result};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Shape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::f64::consts::PI;
use tracing::{debug, warn};

/// Containers whose content is never rendered directly
const SKIPPED_CONTAINERS: &[&[u8]] = &[
    b"defs",
    b"clipPath",
    b"mask",
    b"symbol",
    b"pattern",
    b"marker",
    b"style",
    b"title",
    b"desc",
    b"metadata",
];

/// Elements that carry geometry
const SHAPE_ELEMENTS: &[&[u8]] = &[
    b"path",
    b"rect",
    b"circle",
    b"ellipse",
    b"polygon",
    b"polyline",
    b"line",
];

/// Tolerance used when kurbo converts rounded corners to curves
const ROUNDED_RECT_TOLERANCE: f64 = 0.1;

/// Attributes of one element, unescaped
struct Attributes(Vec<(String, String)>);

impl Attributes {
    fn read(element: &BytesStart<'_>, index: usize) -> Result<Self> {
        let mut pairs = Vec::new();
        for attr in element.attributes() {
            let attr = attr.map_err(|e| PreviewError::decomposition(index, e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| PreviewError::decomposition(index, e.to_string()))?
                .into_owned();
            pairs.push((key, value));
        }
        Ok(Self(pairs))
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Numeric attribute; a missing attribute yields `default`
    fn length(&self, name: &str, default: f64, index: usize) -> Result<f64> {
        match self.get(name) {
            None => Ok(default),
            Some(raw) => parse_length(raw).ok_or_else(|| {
                PreviewError::decomposition(index, format!("invalid {} value {:?}", name, raw))
            }),
        }
    }

    fn transform(&self, index: usize) -> Result<Affine> {
        match self.get("transform") {
            None => Ok(Affine::IDENTITY),
            Some(raw) => {
                parse_transform(raw).map_err(|msg| PreviewError::decomposition(index, msg))
            }
        }
    }
}

/// A plain number, optionally suffixed with `px`
fn parse_length(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    match parse_numbers(number)?.as_slice() {
        &[value] => Some(value),
        _ => None,
    }
}

/// Walk `svg` and return every closed ring it draws, in document order.
///
/// Malformed elements are skipped and an XML syntax error ends the walk
/// early; both are logged and never fail the call.
pub fn decompose(svg: &str, config: &PreviewConfig) -> Vec<RawShape> {
    let mut reader = Reader::from_str(svg);
    reader.config_mut().trim_text(true);

    let mut shapes = Vec::new();
    let mut transforms = vec![Affine::IDENTITY];
    let mut skip_depth = 0usize;
    let mut element_index = 0usize;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                let err = PreviewError::Markup(e.to_string());
                warn!(
                    position = reader.buffer_position(),
                    shapes = shapes.len(),
                    error = %err,
                    "stopping SVG walk, keeping shapes decoded so far"
                );
                break;
            }
        };

        match event {
            Event::Start(element) => {
                if skip_depth > 0 || is_skipped(&element) {
                    skip_depth += 1;
                    continue;
                }
                let parent = current(&transforms);
                match visit(&element, parent, &mut element_index, config, &mut shapes) {
                    Some(own) => transforms.push(own),
                    // Bad transform on a container: drop its whole subtree
                    None => skip_depth = 1,
                }
            }
            Event::Empty(element) => {
                if skip_depth > 0 || is_skipped(&element) {
                    continue;
                }
                let parent = current(&transforms);
                visit(&element, parent, &mut element_index, config, &mut shapes);
            }
            Event::End(_) => {
                if skip_depth > 0 {
                    skip_depth -= 1;
                } else if transforms.len() > 1 {
                    transforms.pop();
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    debug!(
        elements = element_index,
        shapes = shapes.len(),
        "SVG decomposition complete"
    );
    shapes
}

fn current(transforms: &[Affine]) -> Affine {
    transforms.last().copied().unwrap_or(Affine::IDENTITY)
}

fn is_skipped(element: &BytesStart<'_>) -> bool {
    SKIPPED_CONTAINERS.contains(&element.local_name().as_ref())
}

/// Handle one element; returns the transform its children inherit, or
/// `None` when the element's own transform is unusable.
fn visit(
    element: &BytesStart<'_>,
    parent: Affine,
    element_index: &mut usize,
    config: &PreviewConfig,
    shapes: &mut Vec<RawShape>,
) -> Option<Affine> {
    let name = element.local_name();
    let is_shape = SHAPE_ELEMENTS.contains(&name.as_ref());
    let index = *element_index;
    if is_shape {
        *element_index += 1;
    }

    let result = Attributes::read(element, index).and_then(|attrs| {
        let transform = parent * attrs.transform(index)?;
        if is_shape {
            if let Some(outline) = element_outline(name.as_ref(), &attrs, config, index)? {
                shapes.extend(flatten(
                    &(transform * outline),
                    config.curve_divisions,
                    index,
                ));
            }
        }
        Ok(transform)
    });

    match result {
        Ok(transform) => Some(transform),
        Err(err) => {
            warn!(
                element = %String::from_utf8_lossy(name.as_ref()),
                error = %err,
                "skipping malformed SVG element"
            );
            None
        }
    }
}

/// Outline of a basic shape or path in its own user space.
///
/// `Ok(None)` for elements that never enclose area.
fn element_outline(
    name: &[u8],
    attrs: &Attributes,
    config: &PreviewConfig,
    index: usize,
) -> Result<Option<BezPath>> {
    let outline = match name {
        b"path" => {
            let d = attrs
                .get("d")
                .ok_or_else(|| PreviewError::decomposition(index, "path without d attribute"))?;
            BezPath::from_svg(d)
                .map_err(|e| PreviewError::decomposition(index, format!("path data: {}", e)))?
        }
        b"rect" => rect_outline(attrs, index)?,
        b"circle" => {
            let r = attrs.length("r", 0.0, index)?;
            let center = Point::new(
                attrs.length("cx", 0.0, index)?,
                attrs.length("cy", 0.0, index)?,
            );
            ellipse_outline(center, r, r, config.effective_circle_segments(), index)?
        }
        b"ellipse" => {
            let center = Point::new(
                attrs.length("cx", 0.0, index)?,
                attrs.length("cy", 0.0, index)?,
            );
            let rx = attrs.length("rx", 0.0, index)?;
            let ry = attrs.length("ry", 0.0, index)?;
            ellipse_outline(center, rx, ry, config.effective_circle_segments(), index)?
        }
        b"polygon" | b"polyline" => {
            let raw = attrs.get("points").unwrap_or("");
            let coords = parse_numbers(raw).ok_or_else(|| {
                PreviewError::decomposition(index, format!("invalid points {:?}", raw))
            })?;
            // An odd trailing coordinate is ignored
            let points = coords.chunks_exact(2).map(|xy| Point::new(xy[0], xy[1]));
            polyline(points)
        }
        _ => return Ok(None),
    };
    Ok(Some(outline))
}

fn rect_outline(attrs: &Attributes, index: usize) -> Result<BezPath> {
    let x = attrs.length("x", 0.0, index)?;
    let y = attrs.length("y", 0.0, index)?;
    let width = attrs.length("width", 0.0, index)?;
    let height = attrs.length("height", 0.0, index)?;
    if !(width > 0.0 && height > 0.0) {
        return Err(PreviewError::decomposition(
            index,
            format!("rect has non-positive size {}x{}", width, height),
        ));
    }

    // A single given corner radius applies to both axes
    let rx = attrs.get("rx").map(|_| attrs.length("rx", 0.0, index)).transpose()?;
    let ry = attrs.get("ry").map(|_| attrs.length("ry", 0.0, index)).transpose()?;
    let radius = match (rx, ry) {
        (Some(rx), Some(ry)) => rx.min(ry),
        (Some(r), None) | (None, Some(r)) => r,
        (None, None) => 0.0,
    }
    .clamp(0.0, width.min(height) / 2.0);

    let rect = Rect::new(x, y, x + width, y + height);
    if radius > 0.0 {
        Ok(RoundedRect::from_rect(rect, radius).to_path(ROUNDED_RECT_TOLERANCE))
    } else {
        Ok(rect.to_path(ROUNDED_RECT_TOLERANCE))
    }
}

fn ellipse_outline(center: Point, rx: f64, ry: f64, segments: u32, index: usize) -> Result<BezPath> {
    if !(rx > 0.0 && ry > 0.0) {
        return Err(PreviewError::decomposition(
            index,
            format!("non-positive radius {} / {}", rx, ry),
        ));
    }
    let points = (0..segments).map(|i| {
        let angle = 2.0 * PI * i as f64 / segments as f64;
        Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
    });
    Ok(polyline(points))
}

fn polyline(points: impl IntoIterator<Item = Point>) -> BezPath {
    let mut path = BezPath::new();
    for (i, p) in points.into_iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    path
}
