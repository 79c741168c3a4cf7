// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::geometry::GeometryStats;
use crate::pipeline::{Classification, PipelineRun, Role};
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    fn rule() {
        println!("{}", "━".repeat(72).bright_black());
    }

    /// Summary of one pipeline run
    pub fn report_render(file: &str, run: &PipelineRun, duration: Duration) {
        let mesh = run.rendered.mesh();

        println!();
        Self::rule();
        println!("{} {}", "Rendered:".bold(), file.cyan());
        Self::rule();

        if run.rendered.is_fallback() {
            println!(
                "{} {}",
                "⚠️ ".yellow(),
                "No usable outline, fallback box rendered".yellow().bold()
            );
        } else {
            println!("{} {}", "✅".green(), "Solid built".green().bold());
        }

        Self::field("Shapes", run.classification.len().to_string());
        Self::field(
            "Holes cut",
            format!(
                "{} of {}",
                run.holes_cut,
                run.classification.holes().count()
            ),
        );
        if let Some(frame) = run.frame {
            Self::field("Scale", format!("{:.4}", frame.scale));
            Self::field("Depth", format!("{:.4}", frame.depth));
        }
        Self::field("Vertices", mesh.vertex_count().to_string());
        Self::field("Triangles", mesh.triangle_count().to_string());
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );
        Self::rule();
    }

    /// One line per shape, largest first
    pub fn report_classification(classification: &Classification) {
        if classification.is_empty() {
            Self::report_warning("No closed shapes found");
            return;
        }

        println!(
            "{:>4}  {:<9} {:>14} {:>22}  {:>7}",
            "#".bold(),
            "role".bold(),
            "area".bold(),
            "centroid".bold(),
            "points".bold()
        );
        for (rank, shape) in classification.shapes.iter().enumerate() {
            let role = format!("{:<9}", shape.role.to_string());
            let role = match shape.role {
                Role::Exterior => role.green(),
                Role::Hole => role.cyan(),
                Role::Ignored => role.bright_black(),
            };
            println!(
                "{:>4}  {} {:>14.3} {:>22}  {:>7}",
                rank,
                role,
                shape.area,
                format!("({:.2}, {:.2})", shape.centroid.x, shape.centroid.y),
                shape.points.len()
            );
        }
    }

    pub fn report_stats(stats: &GeometryStats) {
        Self::rule();
        for line in stats.to_string().lines() {
            println!("  {}", line);
        }
        Self::rule();
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn field(name: &str, value: String) {
        println!("  {} {}", format!("{}:", name).bright_black(), value.cyan());
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
