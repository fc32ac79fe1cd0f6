//! strata command line.
//!
//! # Commands
//!
//! - `strata slice <FILE>` - Slice an STL file and print a per-layer summary
//! - `strata info <FILE>` - Print format, solid name, triangle count and bounds
//!
//! Logging goes to stderr. `RUST_LOG` overrides the level chosen with `-v`.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use strata_slice::{Precision, SliceOutput, SliceParams, slice_mesh};
use strata_stl::StlReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Slice triangle meshes into layer polygons
#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Slice STL meshes into closed layer polygons", long_about = None)]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice an STL file at regular heights
    Slice(SliceArgs),

    /// Describe an STL file without slicing it
    Info {
        /// The STL file to read
        #[arg(name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SliceArgs {
    /// The STL file to slice
    #[arg(name = "FILE")]
    file: PathBuf,

    /// Distance between sample heights, in model units
    #[arg(long, default_value_t = 0.2)]
    layer_height: f64,

    /// Snap coordinates to this many decimal places
    #[arg(long, conflicts_with = "epsilon")]
    decimals: Option<u32>,

    /// Snap coordinates to multiples of this unit
    #[arg(long)]
    epsilon: Option<f64>,

    /// Keep points lying on straight edges
    #[arg(long)]
    keep_collinear: bool,

    /// Run on a single thread
    #[arg(long)]
    sequential: bool,

    /// Print the whole result as JSON
    #[arg(long)]
    json: bool,
}

impl SliceArgs {
    fn params(&self) -> SliceParams {
        let precision = match (self.decimals, self.epsilon) {
            (Some(d), _) => Precision::Decimals(d),
            (None, Some(e)) => Precision::Epsilon(e),
            (None, None) => Precision::default(),
        };
        SliceParams::default()
            .with_layer_height(self.layer_height)
            .with_precision(precision)
            .with_merge_collinear(!self.keep_collinear)
            .with_parallel(!self.sequential)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut out = io::stdout().lock();
    match cli.command {
        Commands::Slice(args) => run_slice(&args, &mut out),
        Commands::Info { file } => run_info(&file, &mut out),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_slice(args: &SliceArgs, out: &mut impl Write) -> Result<()> {
    let soup = strata_stl::load_stl(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    info!(path = %args.file.display(), triangles = soup.len(), "Loaded mesh");

    let output = slice_mesh(&soup, &args.params())
        .with_context(|| format!("failed to slice {}", args.file.display()))?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &output).context("failed to write JSON")?;
        writeln!(out)?;
    } else {
        write_summary(&output, out)?;
    }
    Ok(())
}

fn write_summary(output: &SliceOutput, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{output}")?;
    for layer in &output.layers {
        let open = layer.regions.iter().filter(|r| !r.closed).count();
        write!(
            out,
            "layer {:>5}  z={:<12}  segments={:<6}  regions={:<4}  open={}",
            layer.index,
            layer.z,
            layer.segment_count,
            layer.region_count(),
            open
        )?;
        if layer.degenerate {
            write!(out, "  degenerate")?;
        }
        if layer.exploration_truncated {
            write!(out, "  truncated")?;
        }
        if layer.has_defects() {
            write!(
                out,
                "  defects={}/{}/{}",
                layer.branch_count, layer.termination_count, layer.fault_count
            )?;
        }
        writeln!(out)?;
    }
    if let Some(plan) = output.bounds.and_then(|b| b.plan) {
        writeln!(
            out,
            "plan: x [{}, {}]  y [{}, {}]",
            plan.left, plan.right, plan.back, plan.front
        )?;
    }
    writeln!(out, "diagnostics: {}", output.diagnostics)?;
    Ok(())
}

fn run_info(path: &Path, out: &mut impl Write) -> Result<()> {
    let reader =
        StlReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let format = reader.format();
    let soup = reader
        .into_soup()
        .with_context(|| format!("failed to read {}", path.display()))?;

    writeln!(out, "format:    {format}")?;
    writeln!(out, "solid:     {}", soup.name.as_deref().unwrap_or("<unnamed>"))?;
    writeln!(out, "triangles: {}", soup.len())?;
    let bounds = soup.bounds();
    if !bounds.is_empty() {
        let (lo, hi) = (bounds.min, bounds.max);
        writeln!(
            out,
            "bounds:    [{}, {}, {}] .. [{}, {}, {}]",
            lo.x, lo.y, lo.z, hi.x, hi.y, hi.z
        )?;
    }
    Ok(())
}
