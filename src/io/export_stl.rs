// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL exporter

use crate::geometry::Mesh;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export mesh to STL; binary for `.stl` paths, ASCII otherwise
pub fn export_stl(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let is_binary = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("stl"));

    let file = File::create(path)
        .with_context(|| format!("Failed to create STL file: {:?}", path))?;
    let mut writer = BufWriter::new(file);

    if is_binary {
        write_binary(mesh, &mut writer)?;
    } else {
        write_ascii(mesh, &mut writer)?;
    }
    writer.flush().context("Failed to flush STL file")?;
    Ok(())
}

fn facets(mesh: &Mesh) -> impl Iterator<Item = ([f32; 3], [[f32; 3]; 3])> + '_ {
    mesh.triangles.iter().map(move |tri| {
        let n = tri.face_normal(mesh);
        let [a, b, c] = tri.positions(mesh);
        let v = |p: nalgebra::Point3<f64>| [p.x as f32, p.y as f32, p.z as f32];
        ([n.x as f32, n.y as f32, n.z as f32], [v(a), v(b), v(c)])
    })
}

fn write_binary(mesh: &Mesh, writer: &mut impl Write) -> Result<()> {
    use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

    let triangles: Vec<StlTriangle> = facets(mesh)
        .map(|(normal, [a, b, c])| StlTriangle {
            normal: Normal::new(normal),
            vertices: [StlVertex::new(a), StlVertex::new(b), StlVertex::new(c)],
        })
        .collect();

    stl_io::write_stl(writer, triangles.iter()).context("Failed to write STL file")?;
    Ok(())
}

fn write_ascii(mesh: &Mesh, writer: &mut impl Write) -> Result<()> {
    writeln!(writer, "solid lasercut_preview")?;
    for (n, vertices) in facets(mesh) {
        writeln!(writer, "  facet normal {} {} {}", n[0], n[1], n[2])?;
        writeln!(writer, "    outer loop")?;
        for v in vertices {
            writeln!(writer, "      vertex {} {} {}", v[0], v[1], v[2])?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid lasercut_preview")?;
    Ok(())
}
