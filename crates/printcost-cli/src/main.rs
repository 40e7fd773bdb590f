//! printcost - estimate what a 3D print costs in filament and electricity.
//!
//! Two calculators are available: `manual`, for a known filament mass, and
//! `model`, which infers the mass from the volume of an STL file.
//!
//! # Logging
//!
//! Logs go to stderr. Use `-v`/`-vv`/`-vvv` or set `RUST_LOG`, e.g.
//! `RUST_LOG=printcost_mesh=debug printcost model part.stl`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use printcost_estimate::{
    estimate_from_mesh, estimate_manual, EstimatorConfig, PrintJob,
};
use printcost_mesh::{bounding_box, mass_properties, read_stl_path, surface_area};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod args;
mod report;

use args::{EnergyArgs, MaterialArgs, PrintArgs};
use report::{BoundsInfo, CostReport, MeshInfo};

#[derive(Parser)]
#[command(name = "printcost")]
#[command(author, version, about = "3D print cost calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML file with default parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON for scripting
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a print from a known filament mass
    Manual {
        /// Filament used, in grams
        #[arg(long)]
        grams: f64,

        #[command(flatten)]
        material: MaterialArgs,

        #[command(flatten)]
        energy: EnergyArgs,
    },
    /// Estimate filament use and cost from an STL model
    Model {
        /// Input STL file (binary or ASCII)
        input: PathBuf,

        #[command(flatten)]
        print: PrintArgs,

        #[command(flatten)]
        material: MaterialArgs,

        #[command(flatten)]
        energy: EnergyArgs,
    },
    /// Show volume and mass properties of an STL model
    Info {
        /// Input STL file (binary or ASCII)
        input: PathBuf,
    },
    /// List built-in printer power profiles
    Printers,
}

fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "printcost_mesh=info,printcost_estimate=info",
            2 => "printcost_mesh=debug,printcost_estimate=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EstimatorConfig> {
    match path {
        Some(path) => EstimatorConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(EstimatorConfig::default()),
    }
}

/// Refuse model files above the configured size before reading them.
fn check_file_size(path: &Path, max_bytes: u64) -> Result<()> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    if len > max_bytes {
        bail!(
            "{} is {} bytes, larger than the {} byte limit",
            path.display(),
            len,
            max_bytes
        );
    }
    Ok(())
}

fn run_manual(cli: &Cli, grams: f64, material: &MaterialArgs, energy: &EnergyArgs) -> Result<()> {
    let config = args::merge(load_config(cli.config.as_deref())?, None, material, energy);

    let filament = config.material.to_filament()?;
    let job = PrintJob::new(energy.hours, config.energy.resolve()?)?;
    let estimate = estimate_manual(grams, &filament, &job)?;
    info!("Manual estimate: total {:.2}", estimate.total_cost);

    report::print_cost(&CostReport::manual(estimate), cli.format, cli.quiet)
}

fn run_model(
    cli: &Cli,
    input: &Path,
    print: &PrintArgs,
    material: &MaterialArgs,
    energy: &EnergyArgs,
) -> Result<()> {
    let config = args::merge(load_config(cli.config.as_deref())?, Some(print), material, energy);

    // Validate every parameter before touching the file.
    let params = config.print.to_parameters()?;
    let filament = config.material.to_filament()?;
    let job = PrintJob::new(energy.hours, config.energy.resolve()?)?;

    check_file_size(input, config.limits.max_file_bytes)?;
    let mesh = read_stl_path(input).with_context(|| {
        format!(
            "Could not read {}; please re-upload a valid STL file",
            input.display()
        )
    })?;

    let result = estimate_from_mesh(&mesh, &config.model, &params, &filament, &job)?;
    let report = CostReport::model(input.display().to_string(), &result);
    report::print_cost(&report, cli.format, cli.quiet)
}

fn run_info(cli: &Cli, input: &Path) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    check_file_size(input, config.limits.max_file_bytes)?;
    let mesh = read_stl_path(input)
        .with_context(|| format!("Failed to load mesh from {}", input.display()))?;

    let props = mass_properties(&mesh)?;
    let info = MeshInfo {
        file: input.display().to_string(),
        triangles: mesh.num_triangles(),
        vertices: mesh.num_vertices(),
        bounds: bounding_box(&mesh).map(|(min, max)| BoundsInfo::new(min, max)),
        surface_area_mm2: surface_area(&mesh)?,
        volume_mm3: props.volume,
        volume_cm3: props.volume / 1000.0,
        centroid: [props.centroid.x, props.centroid.y, props.centroid.z],
        inertia: report::inertia_rows(&props),
    };
    report::print_info(&info, cli.format, cli.quiet)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Commands::Manual {
            grams,
            material,
            energy,
        } => run_manual(&cli, *grams, material, energy),
        Commands::Model {
            input,
            print,
            material,
            energy,
        } => run_model(&cli, input, print, material, energy),
        Commands::Info { input } => run_info(&cli, input),
        Commands::Printers => report::print_printers(cli.format),
    };

    if let Err(e) = &result {
        if !cli.quiet {
            eprintln!("Error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {cause}");
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
