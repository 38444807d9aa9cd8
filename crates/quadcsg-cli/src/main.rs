//! quadcsg CLI - point and track queries against CSG model files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quadcsg::{Model, Point3, RuleTree, Track, TrackDirection, Vec3};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "quadcsg")]
#[command(about = "Query constructive solid geometry built from quadric surfaces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the surfaces and cells of a model file
    Info {
        /// Path to the .toml model
        model: PathBuf,
    },
    /// Report whether a point lies in a cell
    Inside {
        /// Path to the .toml model
        model: PathBuf,
        /// Cell number
        cell: i32,
        /// Point coordinates
        #[arg(required = true, num_args = 3, allow_negative_numbers = true, value_names = ["X", "Y", "Z"])]
        point: Vec<f64>,
    },
    /// List where a ray crosses the boundary of a cell
    Trace {
        /// Path to the .toml model
        model: PathBuf,
        /// Cell number
        cell: i32,
        /// Start of the ray
        #[arg(long, required = true, num_args = 3, allow_negative_numbers = true, value_names = ["X", "Y", "Z"])]
        from: Vec<f64>,
        /// Direction of the ray
        #[arg(long, required = true, num_args = 3, allow_negative_numbers = true, value_names = ["X", "Y", "Z"])]
        dir: Vec<f64>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the minimal sum-of-products and product-of-sums forms of a rule
    Simplify {
        /// Rule text, e.g. "1 2 : 1 -2"
        rule: String,
        /// Largest number of surfaces to minimize over
        #[arg(long, default_value_t = 16)]
        limit: usize,
    },
}

#[derive(Serialize)]
struct TraceReport {
    cell: i32,
    crossings: Vec<CrossingRow>,
    links: Vec<LinkRow>,
    total_length: f64,
}

#[derive(Serialize)]
struct CrossingRow {
    direction: &'static str,
    distance: f64,
    point: [f64; 3],
}

#[derive(Serialize)]
struct LinkRow {
    entry: [f64; 3],
    exit: [f64; 3],
    length: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { model } => show_info(&model)?,
        Commands::Inside { model, cell, point } => inside(&model, cell, &point)?,
        Commands::Trace {
            model,
            cell,
            from,
            dir,
            json,
        } => trace(&model, cell, &from, &dir, json)?,
        Commands::Simplify { rule, limit } => simplify(&rule, limit)?,
    }

    Ok(())
}

fn load_model(path: &Path) -> Result<Model> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    Model::from_toml(&text).with_context(|| format!("cannot load {}", path.display()))
}

fn point(coords: &[f64]) -> Point3 {
    Point3::new(coords[0], coords[1], coords[2])
}

fn show_info(path: &Path) -> Result<()> {
    let model = load_model(path)?;
    let settings = model.settings();

    println!("quadcsg model: {}", path.display());
    println!("  Merge distance: {}", settings.merge_distance);
    println!("  Probe step: {}", settings.probe_step);
    println!("  Surfaces: {}", model.surfaces().len());
    for surface in model.surfaces() {
        println!("    {}", surface.write());
    }

    println!("  Cells: {}", model.cell_ids().count());
    for id in model.cell_ids() {
        match model.object(id) {
            Ok(obj) => println!("    {}", obj.write()),
            Err(e) => println!("    {} (invalid: {})", id, e),
        }
    }
    Ok(())
}

fn inside(path: &Path, cell: i32, coords: &[f64]) -> Result<()> {
    let model = load_model(path)?;
    let obj = model.object(cell)?;
    let p = point(coords);

    let state = if obj.is_on_side(&p) {
        "on boundary"
    } else if obj.is_valid(&p) {
        "inside"
    } else {
        "outside"
    };
    println!("({}, {}, {}) is {} cell {}", p.x, p.y, p.z, state, cell);
    Ok(())
}

fn trace(path: &Path, cell: i32, from: &[f64], dir: &[f64], json: bool) -> Result<()> {
    let model = load_model(path)?;
    let obj = model.object(cell)?;
    let mut track = Track::new(point(from), Vec3::new(dir[0], dir[1], dir[2]))?;
    obj.intercept_surface(&mut track);

    let report = TraceReport {
        cell,
        crossings: track
            .intercepts()
            .iter()
            .map(|i| CrossingRow {
                direction: match i.direction {
                    TrackDirection::Entering => "entering",
                    TrackDirection::Leaving => "leaving",
                },
                distance: i.distance,
                point: i.point.coords.into(),
            })
            .collect(),
        links: track
            .links()
            .iter()
            .map(|l| LinkRow {
                entry: l.entry.coords.into(),
                exit: l.exit.coords.into(),
                length: l.dist_inside,
            })
            .collect(),
        total_length: track.total_length(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if report.crossings.is_empty() {
        println!("Ray does not cross cell {}", cell);
        return Ok(());
    }
    println!("Crossings of cell {}:", cell);
    for c in &report.crossings {
        println!(
            "  {:>8} at {:>12.6}  ({}, {}, {})",
            c.direction, c.distance, c.point[0], c.point[1], c.point[2]
        );
    }
    println!("Length inside: {:.6}", report.total_length);
    Ok(())
}

fn simplify(text: &str, limit: usize) -> Result<()> {
    let mut tree = RuleTree::parse(text)?;
    let removed = tree.remove_complementary();
    if removed > 0 {
        println!("Removed {} redundant operand(s): {}", removed, tree);
    }
    println!("DNF: {}", tree.make_dnf(limit)?);
    println!("CNF: {}", tree.make_cnf(limit)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_are_required() {
        assert!(Cli::try_parse_from(["quadcsg", "inside", "m.toml", "1"]).is_err());
        assert!(Cli::try_parse_from(["quadcsg", "trace", "m.toml", "1", "--dir", "1", "0", "0"]).is_err());
        assert!(Cli::try_parse_from(["quadcsg", "inside", "m.toml", "1", "0", "-2", "0"]).is_ok());
    }
}
