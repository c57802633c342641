use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dmfgen_board::{PeripheralDefinition, PeripheralElectrodeDef};
use dmfgen_core::Point;
use dmfgen_export::save_peripheral;
use dmfgen_geometry::Polygon;
use dmfgen_trace::{trace_peripheral, LabelStrategy, Primitive, SequentialLabels, TraceOptions};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import traced CAD geometry into a peripheral definition file.
    ///
    /// Inputs are primitive-list JSON documents as produced by the CAD
    /// parser; multiple files are combined and electrodes labeled in
    /// trace order.
    Import {
        /// Primitive-list JSON files
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Unique type name of the peripheral
        #[arg(long)]
        kind: String,

        /// Peripheral class
        #[arg(long, default_value = "reservoir")]
        class: String,

        /// Comma-separated labels for the traced polygons, in trace
        /// order; defaults to A, B, C, …
        #[arg(long)]
        labels: Option<String>,

        /// Output path
        #[arg(short, long, value_name = "FILE")]
        out: PathBuf,

        /// Overwrite an existing output file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Import {
            files,
            kind,
            class,
            labels,
            out,
            force,
        } => import(files, kind, class, labels, out, force),
    }
}

fn import(
    files: Vec<PathBuf>,
    kind: String,
    class: String,
    labels: Option<String>,
    out: PathBuf,
    force: bool,
) -> Result<()> {
    let mut primitives: Vec<Primitive> = Vec::new();
    for file in &files {
        let json = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read input file: {file:?}"))?;
        let batch: Vec<Primitive> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse primitive list from {file:?}"))?;
        primitives.extend(batch);
    }

    let mut strategy = scripted_labels(labels);
    let labeled = trace_peripheral(&primitives, &TraceOptions::default(), strategy.as_mut())
        .context("Failed to trace polygons from the input geometry")?;
    if labeled.is_empty() {
        bail!("no labeled polygons to write");
    }

    let definition = PeripheralDefinition {
        class,
        kind,
        origin: Point::default(),
        electrodes: labeled
            .into_iter()
            .map(|(label, polygon)| {
                let anchor = polygon.centroid();
                PeripheralElectrodeDef {
                    label,
                    polygon,
                    anchor,
                }
            })
            .collect(),
    };

    if out.exists() && !force {
        bail!("{out:?} already exists (pass --force to overwrite)");
    }
    save_peripheral(&out, &definition)
        .with_context(|| format!("Failed to write peripheral file {out:?}"))?;
    println!("Wrote {} electrodes to {}", definition.len(), out.display());
    Ok(())
}

fn scripted_labels(labels: Option<String>) -> Box<dyn LabelStrategy> {
    match labels {
        Some(raw) => {
            let list: Vec<Option<String>> = raw
                .split(',')
                .map(|s| {
                    let s = s.trim();
                    (!s.is_empty()).then(|| s.to_string())
                })
                .collect();
            Box::new(move |polygons: &[Polygon]| {
                let mut assigned = list.clone();
                assigned.resize(polygons.len(), None);
                assigned
            })
        }
        None => Box::new(SequentialLabels),
    }
}
