// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Laser-cut preview CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lasercut_preview::cli::Reporter;
use lasercut_preview::{analyze, io, Material, Pipeline, PreviewConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lasercut-preview")]
#[command(about = "Extrude SVG cut paths into 3D preview solids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./preview.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Glb,
    Gltf,
    Stl,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an SVG to a 3D file
    Render {
        /// Input SVG file
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Sheet thickness in millimetres
        #[arg(short, long)]
        thickness: Option<f64>,

        /// Input holds the base64 preview field instead of raw SVG
        #[arg(long)]
        base64: bool,

        /// Output format; inferred from the output extension when omitted
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// List decoded shapes and their roles
    Classify {
        /// Input SVG file
        input: PathBuf,

        #[arg(long)]
        base64: bool,

        /// Print the classification as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print analytics of the rendered solid
    Stats {
        /// Input SVG file
        input: PathBuf,

        #[arg(short, long)]
        thickness: Option<f64>,

        #[arg(long)]
        base64: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => PreviewConfig::from_file(path)?,
        None => PreviewConfig::load()?,
    };
    let pipeline = Pipeline::with_config(config);

    match cli.command {
        Commands::Render {
            input,
            output,
            thickness,
            base64,
            format,
        } => render_command(&pipeline, &input, &output, thickness, base64, format),
        Commands::Classify {
            input,
            base64,
            json,
        } => classify_command(&pipeline, &input, base64, json),
        Commands::Stats {
            input,
            thickness,
            base64,
        } => stats_command(&pipeline, &input, thickness, base64),
        Commands::Version => {
            println!("lasercut-preview v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_svg(input: &Path, base64: bool) -> Result<String> {
    if !input.exists() {
        Reporter::report_error(&format!("Input file not found: {}", input.display()));
        std::process::exit(1);
    }

    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    if base64 {
        io::decode_preview(&content)
    } else {
        Ok(content)
    }
}

fn infer_format(output: &Path) -> Result<Format> {
    let extension = output
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("glb") => Ok(Format::Glb),
        Some("gltf") => Ok(Format::Gltf),
        Some("stl") => Ok(Format::Stl),
        _ => bail!(
            "Cannot infer format from {}; pass --format glb|gltf|stl",
            output.display()
        ),
    }
}

fn render_command(
    pipeline: &Pipeline,
    input: &Path,
    output: &Path,
    thickness: Option<f64>,
    base64: bool,
    format: Option<Format>,
) -> Result<()> {
    let svg = read_svg(input, base64)?;
    let format = match format {
        Some(format) => format,
        None => infer_format(output)?,
    };

    let start = std::time::Instant::now();
    let run = pipeline.run(&svg, thickness);
    let elapsed = start.elapsed();

    let mesh = run.rendered.mesh();
    let material = Material::default();
    match format {
        Format::Glb => {
            let bytes = io::gltf_bytes(mesh, &material)?;
            std::fs::write(output, bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
        }
        Format::Gltf => io::export_gltf(mesh, &material, output)?,
        Format::Stl => io::export_stl(mesh, output)?,
    }

    Reporter::report_render(&input.display().to_string(), &run, elapsed);
    Reporter::success(&format!("Wrote {}", output.display()));
    Ok(())
}

fn classify_command(pipeline: &Pipeline, input: &Path, base64: bool, json: bool) -> Result<()> {
    let svg = read_svg(input, base64)?;
    let classification = pipeline.run(&svg, None).classification;

    if json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        Reporter::report_classification(&classification);
    }
    Ok(())
}

fn stats_command(
    pipeline: &Pipeline,
    input: &Path,
    thickness: Option<f64>,
    base64: bool,
) -> Result<()> {
    let svg = read_svg(input, base64)?;
    let rendered = pipeline.render(&svg, thickness);

    if rendered.is_fallback() {
        Reporter::report_warning("No usable outline, showing fallback box");
    }
    Reporter::report_stats(&analyze(rendered.mesh()));
    Ok(())
}
