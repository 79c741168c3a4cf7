// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end pipeline scenarios

use approx::assert_relative_eq;
use lasercut_preview::geometry::{analyze, Mesh};
use lasercut_preview::{io, render_preview, Pipeline, PreviewConfig, Role, Scene};
use std::f64::consts::PI;

const PLATE_WITH_HOLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="100mm" height="50mm" viewBox="0 0 100 50">
  <g stroke="black" fill="none">
    <path d="M0 0 L100 0 L100 50 L0 50 Z"/>
    <circle cx="50" cy="25" r="10"/>
  </g>
</svg>"#;

/// Is (x, y) covered by a triangle facing up or down?
fn cap_covers(mesh: &Mesh, x: f64, y: f64) -> bool {
    mesh.triangles.iter().any(|tri| {
        if tri.face_normal(mesh).z.abs() < 0.9 {
            return false;
        }
        let [a, b, c] = tri.positions(mesh);
        let side = |p: &nalgebra::Point3<f64>, q: &nalgebra::Point3<f64>| {
            (q.x - p.x) * (y - p.y) - (q.y - p.y) * (x - p.x)
        };
        let (d1, d2, d3) = (side(&a, &b), side(&b, &c), side(&c, &a));
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    })
}

#[test]
fn test_plate_with_centered_hole() {
    let run = Pipeline::new().run(PLATE_WITH_HOLE, Some(3.0));
    assert!(!run.rendered.is_fallback());

    let exterior = run.classification.exterior().unwrap();
    assert_relative_eq!(exterior.area, 5000.0, epsilon = 1e-9);

    let holes: Vec<_> = run.classification.holes().collect();
    assert_eq!(holes.len(), 1);
    assert!((holes[0].area - PI * 100.0).abs() < PI * 100.0 * 0.02);
    assert_eq!(run.holes_cut, 1);

    let frame = run.frame.unwrap();
    assert_relative_eq!(frame.scale, 0.8);
    assert_relative_eq!(frame.depth, (3.0 * frame.scale * 0.15_f64).max(0.5));

    let mesh = run.rendered.mesh();
    let bbox = mesh.bounding_box();
    assert_relative_eq!(bbox.size().x, 80.0, epsilon = 1e-6);
    assert_relative_eq!(bbox.size().y, 40.0, epsilon = 1e-6);
    assert_relative_eq!(bbox.size().z, frame.depth, epsilon = 1e-6);

    // Through-opening at the center, material beside it
    assert!(!cap_covers(mesh, 0.0, 0.0));
    assert!(cap_covers(mesh, 20.0, 0.0));
}

#[test]
fn test_hole_removes_material() {
    let cut = Pipeline::new().render(PLATE_WITH_HOLE, Some(3.0));
    let uncut = Pipeline::with_config(PreviewConfig {
        cut_holes: false,
        ..PreviewConfig::default()
    })
    .render(PLATE_WITH_HOLE, Some(3.0));

    let depth = 0.5;
    let slab = 80.0 * 40.0 * depth;
    let prism = 0.5 * 32.0 * 64.0 * (2.0 * PI / 32.0).sin() * depth;

    // The profile already carries the hole, the stencil only cleans it up
    let uncut_volume = analyze(uncut.mesh()).volume;
    assert_relative_eq!(uncut_volume, slab - prism, epsilon = 1e-6);

    let cut_volume = analyze(cut.mesh()).volume;
    assert!((cut_volume - (slab - prism)).abs() < prism * 0.2);
}

#[test]
fn test_empty_inputs_render_fallback() {
    for svg in [
        "",
        "<svg/>",
        "<svg><line x1=\"0\" y1=\"0\" x2=\"10\" y2=\"10\"/></svg>",
        "<svg><path d=\"M0 0 L10 10\"/></svg>",
        "definitely not svg",
    ] {
        let rendered = render_preview(svg, Some(3.0));
        assert!(rendered.is_fallback(), "expected fallback for {:?}", svg);
        let size = rendered.mesh().bounding_box().size();
        assert_relative_eq!(size.x, 20.0);
        assert_relative_eq!(size.z, 5.0);
    }
}

#[test]
fn test_simple_polygon_scales_to_target_extent() {
    let svg = r#"<svg><polygon points="0,0 200,0 200,30 100,60 0,30"/></svg>"#;
    let rendered = render_preview(svg, None);
    assert!(!rendered.is_fallback());

    let mesh = rendered.mesh();
    let size = mesh.bounding_box().size();
    assert_relative_eq!(size.x.max(size.y), 80.0, epsilon = 1e-6);
    // Five points: two caps plus four vertices per wall
    assert_eq!(mesh.vertex_count(), 5 * 6);
    assert!(analyze(mesh).is_watertight);
}

#[test]
fn test_disjoint_squares() {
    let svg = r#"<svg>
        <rect x="0" y="0" width="10" height="10"/>
        <rect x="20" y="0" width="10" height="10"/>
    </svg>"#;
    let run = Pipeline::new().run(svg, Some(3.0));

    let exterior = run.classification.exterior().unwrap();
    assert_eq!(exterior.source_index, 0);
    assert_eq!(run.classification.shapes[1].role, Role::Ignored);

    // Ignored shapes still count toward the framing bounds
    let frame = run.frame.unwrap();
    assert_relative_eq!(frame.scale, 80.0 / 30.0);
    let size = run.rendered.mesh().bounding_box().size();
    assert_relative_eq!(size.x, 10.0 * 80.0 / 30.0, epsilon = 1e-6);
}

#[test]
fn test_concentric_squares() {
    let svg = r#"<svg>
        <rect x="40" y="40" width="20" height="20"/>
        <rect x="0" y="0" width="100" height="100"/>
    </svg>"#;
    let run = Pipeline::new().run(svg, Some(3.0));

    assert_eq!(run.classification.exterior().unwrap().source_index, 1);
    assert_eq!(run.classification.holes().count(), 1);
    assert_eq!(run.holes_cut, 1);
    assert!(!cap_covers(run.rendered.mesh(), 0.0, 0.0));
}

#[test]
fn test_area_ratio_boundary_through_svg() {
    // 90 x 90 is 81% of the exterior, 88.8 x 88.8 just under 79%
    let over = r#"<svg><rect width="100" height="100"/><rect x="5" y="5" width="90" height="90"/></svg>"#;
    let under = r#"<svg><rect width="100" height="100"/><rect x="6" y="6" width="88.8" height="88.8"/></svg>"#;

    let pipeline = Pipeline::new();
    assert_eq!(
        pipeline.run(over, None).classification.shapes[1].role,
        Role::Ignored
    );
    assert_eq!(
        pipeline.run(under, None).classification.shapes[1].role,
        Role::Hole
    );
}

#[test]
fn test_hole_winding_does_not_matter() {
    let ccw = r#"<svg><path d="M0 0 H100 V100 H0 Z M40 40 H60 V60 H40 Z"/></svg>"#;
    let cw = r#"<svg><path d="M0 0 H100 V100 H0 Z M40 40 V60 H60 V40 Z"/></svg>"#;

    let config = PreviewConfig {
        cut_holes: false,
        ..PreviewConfig::default()
    };
    let pipeline = Pipeline::with_config(config);
    let a = analyze(pipeline.render(ccw, Some(3.0)).mesh()).volume;
    let b = analyze(pipeline.render(cw, Some(3.0)).mesh()).volume;
    assert_relative_eq!(a, b, epsilon = 1e-9);
    assert!(a < 80.0 * 80.0 * 0.5);
}

#[test]
fn test_base64_preview_field() {
    let encoded = io::encode_preview(PLATE_WITH_HOLE);
    let svg = io::decode_preview(&encoded).unwrap();
    assert_eq!(svg, PLATE_WITH_HOLE);
    assert!(!render_preview(&svg, Some(3.0)).is_fallback());
}

#[test]
fn test_scene_rebuild_clears_previous_result() {
    let mut scene = Scene::new(Pipeline::new());
    scene.rebuild(PLATE_WITH_HOLE, Some(3.0));
    let group = scene.rebuild("", Some(3.0));

    assert_eq!(group.children.len(), 1);
    assert!(group.children[0].is_fallback);
    assert_relative_eq!(group.world_bounds().center().x, 0.0, epsilon = 1e-9);
}

#[test]
fn test_perforated_plate_cuts_every_hole() {
    // 10 x 5 grid of r = 4 holes on a 200 x 100 plate
    let mut svg = String::from(r#"<svg><rect width="200" height="100"/>"#);
    for row in 0..5 {
        for col in 0..10 {
            svg.push_str(&format!(
                r#"<circle cx="{}" cy="{}" r="4"/>"#,
                10 + col * 20,
                10 + row * 20
            ));
        }
    }
    svg.push_str("</svg>");

    let run = Pipeline::new().run(&svg, Some(3.0));
    assert!(!run.rendered.is_fallback());
    assert_eq!(run.classification.holes().count(), 50);
    assert_eq!(run.holes_cut, 50);

    let mesh = run.rendered.mesh();
    assert!(
        mesh.triangle_count() < 150_000,
        "{} triangles for 50 holes",
        mesh.triangle_count()
    );

    // Openings at the first and last hole, material between them
    let scale = run.frame.unwrap().scale;
    assert!(!cap_covers(mesh, -90.0 * scale, 40.0 * scale));
    assert!(!cap_covers(mesh, 90.0 * scale, -40.0 * scale));
    assert!(cap_covers(mesh, -80.0 * scale, 40.0 * scale));
}
