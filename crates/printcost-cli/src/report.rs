//! Result rendering.

use printcost_estimate::{CostEstimate, ModelEstimate, PrinterProfile};
use printcost_mesh::{MassProperties, Point3};
use serde::Serialize;

use crate::OutputFormat;

/// Cost summary printed for both calculator modes.
#[derive(Serialize)]
pub struct CostReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(flatten)]
    pub estimate: CostEstimate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl CostReport {
    pub fn manual(estimate: CostEstimate) -> Self {
        Self {
            file: None,
            estimate,
            warning: None,
        }
    }

    pub fn model(file: String, result: &ModelEstimate) -> Self {
        Self {
            file: Some(file),
            estimate: result.estimate,
            warning: result.warning.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct MeshInfo {
    pub file: String,
    pub triangles: usize,
    pub vertices: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundsInfo>,
    pub surface_area_mm2: f64,
    pub volume_mm3: f64,
    pub volume_cm3: f64,
    pub centroid: [f64; 3],
    pub inertia: [[f64; 3]; 3],
}

#[derive(Serialize)]
pub struct BoundsInfo {
    pub min: [f64; 3],
    pub max: [f64; 3],
    pub dimensions: [f64; 3],
}

impl BoundsInfo {
    pub fn new(min: Point3, max: Point3) -> Self {
        let dims = max - min;
        Self {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
            dimensions: [dims.x, dims.y, dims.z],
        }
    }
}

pub fn inertia_rows(props: &MassProperties) -> [[f64; 3]; 3] {
    let m = &props.inertia;
    [
        [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
        [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
    ]
}

/// Format the cost lines shown to the user.
pub fn cost_lines(report: &CostReport) -> Vec<String> {
    let e = &report.estimate;
    let mut lines = Vec::new();
    if let Some(warning) = &report.warning {
        lines.push(format!("Warning: {warning}"));
    }
    if let Some(volume) = e.volume_cm3 {
        lines.push(format!("Model Volume: {volume:.2} cm³"));
        lines.push(format!("Estimated filament used: {:.2} grams", e.mass_g));
    }
    lines.push(format!(
        "Estimated cost: {:.2} (Filament: {:.2}, Electricity: {:.2})",
        e.total_cost, e.material_cost, e.energy_cost
    ));
    lines
}

pub fn print_cost(report: &CostReport, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Text => {
            if !quiet {
                for line in cost_lines(report) {
                    println!("{line}");
                }
            }
            Ok(())
        }
    }
}

pub fn print_info(info: &MeshInfo, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(info),
        OutputFormat::Text => {
            if quiet {
                return Ok(());
            }
            println!("Mesh: {}", info.file);
            println!("  Triangles: {}", info.triangles);
            println!("  Vertices: {}", info.vertices);
            if let Some(b) = &info.bounds {
                println!(
                    "  Dimensions: {:.2} x {:.2} x {:.2} mm",
                    b.dimensions[0], b.dimensions[1], b.dimensions[2]
                );
            }
            println!("  Surface area: {:.2} mm²", info.surface_area_mm2);
            println!("  Volume: {:.2} cm³", info.volume_cm3);
            println!(
                "  Centroid: ({:.2}, {:.2}, {:.2})",
                info.centroid[0], info.centroid[1], info.centroid[2]
            );
            println!("  Inertia (about centroid, unit density):");
            for row in &info.inertia {
                println!("    [{:>14.3} {:>14.3} {:>14.3}]", row[0], row[1], row[2]);
            }
            Ok(())
        }
    }
}

pub fn print_printers(format: OutputFormat) -> anyhow::Result<()> {
    let profiles = PrinterProfile::all();
    match format {
        OutputFormat::Json => print_json(&profiles),
        OutputFormat::Text => {
            for p in profiles {
                println!("{:<12} {:<22} {:>6.0} W", p.id, p.name, p.watts);
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
