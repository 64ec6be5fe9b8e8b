//! # Precast Calc CLI
//!
//! Command line shell over `calc_core`: system comparison, modular layouts,
//! corbel schedules and column schedules. Every command prints a readable
//! summary, or the raw result as JSON with `--json`.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (e.g. `RUST_LOG=calc_core=debug`).

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use calc_core::calculations::column_schedule::{self, ColumnScheduleInput, ColumnScheduleRow};
use calc_core::calculations::corbel::{
    calculate_batch, check_geometry, size_corbel, CorbelBatchInput, CorbelBatchResult, CorbelCase,
    CorbelGeometry, CorbelLoad, SizingResult,
};
use calc_core::calculations::modular_layout::{self, LayoutInput, LayoutResult};
use calc_core::calculations::CalculationOutput;
use calc_core::file_io::{read_column_sections, read_corbel_loads, write_text};
use calc_core::report::{CorbelReport, ReportHeader};
use calc_core::systems::{self, Criterion, RECOMMENDED_SYSTEM};
use calc_core::table::{corbel_results_to_csv, schedule_to_csv};
use calc_core::{load_session, save_session, CalcResult, DesignSession, GlobalSettings};

#[derive(Parser)]
#[command(name = "calc_cli")]
#[command(about = "Precast concrete design calculations")]
struct Cli {
    /// Print results as JSON instead of a summary
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the construction systems
    Systems {
        /// Show one system (full or short name)
        #[arg(short, long)]
        name: Option<String>,

        /// Rank all systems by a criterion (speed, cost, sustainability, logistics, quality)
        #[arg(short, long)]
        rank: Option<String>,
    },

    /// Stack modular units into a footprint grid
    Layout {
        /// Number of units to place
        #[arg(short, long, default_value = "12")]
        units: u32,

        /// Maximum units per stack
        #[arg(short = 'm', long, default_value = "3")]
        max_height: u32,
    },

    /// Size corbel reinforcement
    Corbel {
        #[command(flatten)]
        geometry: GeometryArgs,

        /// Vertical force V (kN) for a single case
        #[arg(long, requires = "h")]
        v: Option<f64>,

        /// Horizontal force H (kN) for a single case
        #[arg(long, requires = "v")]
        h: Option<f64>,

        /// Load table (CSV with Location, V, H); the default schedule is used otherwise
        #[arg(short, long, conflicts_with = "v")]
        cases: Option<PathBuf>,

        /// Write the sized schedule as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write a Markdown calculation record (single case only)
        #[arg(long, requires = "v")]
        report: Option<PathBuf>,

        #[arg(long, default_value = "")]
        project: String,

        #[arg(long, default_value = "")]
        engineer: String,
    },

    /// Detail minimum reinforcement for a column table
    Columns {
        /// Column table (CSV); eight 300 x 300 rectangular rows are used otherwise
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Bar diameter (mm); the smallest allowed diameter by default
        #[arg(short, long)]
        bar_diameter: Option<f64>,

        /// Write the schedule as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Work with saved design sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(clap::Args)]
struct GeometryArgs {
    /// Column width (cm)
    #[arg(long, default_value = "80")]
    width: f64,

    /// Corbel height hc (cm)
    #[arg(long, default_value = "65")]
    height: f64,

    /// Corbel depth (cm)
    #[arg(long, default_value = "40")]
    depth: f64,

    /// Bearing pad offset from the corbel edge (cm)
    #[arg(long, default_value = "5")]
    pad: f64,
}

impl From<&GeometryArgs> for CorbelGeometry {
    fn from(args: &GeometryArgs) -> Self {
        CorbelGeometry {
            column_width_cm: args.width,
            corbel_height_cm: args.height,
            corbel_depth_cm: args.depth,
            pad_offset_cm: args.pad,
        }
    }
}

#[derive(Subcommand)]
enum SessionAction {
    /// Create a session file with the default corbel, column and layout grids
    New {
        path: PathBuf,

        #[arg(long, default_value = "")]
        project: String,

        #[arg(long, default_value = "")]
        engineer: String,
    },

    /// List the items stored in a session
    Show { path: PathBuf },

    /// Evaluate every item of a session
    Run { path: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json = cli.json;

    match cli.command {
        Commands::Systems { name, rank } => run_systems(name.as_deref(), rank.as_deref(), json),
        Commands::Layout { units, max_height } => {
            let input = LayoutInput {
                label: "Modular Asset".to_string(),
                total_units: units,
                max_height,
            };
            let layout = modular_layout::calculate(&input)?;
            emit(json, &layout, || print_layout(&layout))
        }
        Commands::Corbel {
            geometry,
            v,
            h,
            cases,
            output,
            report,
            project,
            engineer,
        } => {
            let geometry = CorbelGeometry::from(&geometry);
            match (v, h) {
                (Some(v), Some(h)) => {
                    let case = CorbelCase {
                        label: "Corbel".to_string(),
                        vertical_force_kn: v,
                        horizontal_force_kn: h,
                        geometry,
                    };
                    run_single_corbel(&case, report.as_deref(), &project, &engineer, json)
                }
                _ => run_corbel_schedule(geometry, cases.as_deref(), output.as_deref(), json),
            }
        }
        Commands::Columns {
            input,
            bar_diameter,
            output,
        } => run_columns(input.as_deref(), bar_diameter, output.as_deref(), json),
        Commands::Session { action } => run_session(action, json),
    }
}

/// Print `value` as JSON, or run the text renderer.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce()) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text();
    }
    Ok(())
}

fn run_systems(name: Option<&str>, rank: Option<&str>, json: bool) -> Result<()> {
    if let Some(name) = name {
        let system = systems::find_flexible(name)?;
        return emit(json, system, || {
            println!("{}", system.name);
            println!("{}", "-".repeat(system.name.len()));
            for criterion in Criterion::ALL {
                println!("  {:<16} {:.1}", criterion.display_name(), system.score(criterion));
            }
            println!("  {:<16} {:.2}", "Mean", system.mean_score());
        });
    }

    let ranked = match rank {
        Some(criterion) => systems::ranked_by(Criterion::from_str_flexible(criterion)?),
        None => systems::list_systems().iter().collect(),
    };

    emit(json, &ranked, || {
        println!(
            "{:<30} {:>6} {:>6} {:>6} {:>6} {:>6}",
            "System", "Speed", "Cost", "Sust.", "Logi.", "Qual."
        );
        println!("{}", "-".repeat(66));
        for s in &ranked {
            println!(
                "{:<30} {:>6.1} {:>6.1} {:>6.1} {:>6.1} {:>6.1}",
                s.name, s.speed, s.cost, s.sustainability, s.logistics, s.quality
            );
        }
        println!();
        println!("Recommended: {}", RECOMMENDED_SYSTEM);
        for note in systems::selection_notes() {
            println!("  {:<20} + {:<26} - {}", note.system, note.benefit, note.trade_off);
        }
    })
}

fn print_layout(layout: &LayoutResult) {
    println!("Units placed:    {}", layout.blocks.len());
    println!("Footprint cells: {}", layout.footprint_column_count);
    println!("Levels used:     {}", layout.levels_used());
    println!(
        "Footprint area:  {:.1} (block {}x{}x{})",
        layout.footprint_area(),
        layout.dimensions.width,
        layout.dimensions.length,
        layout.dimensions.height
    );
    println!();

    // Plan view: stack height per cell, one line per grid row
    let cells = layout.cells();
    for row in 0..layout.grid_side {
        let line: Vec<String> = (0..layout.grid_side)
            .map(|column| match cells.get(&(column, row)) {
                Some(height) => format!("[{}]", height),
                None => " . ".to_string(),
            })
            .collect();
        println!("  {}", line.join(""));
    }
}

fn run_single_corbel(
    case: &CorbelCase,
    report: Option<&Path>,
    project: &str,
    engineer: &str,
    json: bool,
) -> Result<()> {
    let result = size_corbel(case)?;

    if let Some(path) = report {
        let record = CorbelReport::build(ReportHeader::new(project, engineer), case)?;
        write_text(path, &record.to_markdown())?;
        tracing::info!(path = %path.display(), "wrote corbel report");
    }

    emit(json, &result, || print_sizing(case, &result))
}

fn print_sizing(case: &CorbelCase, result: &SizingResult) {
    let check = check_geometry(&case.geometry);
    println!("Corbel: V = {} kN, H = {} kN", case.vertical_force_kn, case.horizontal_force_kn);
    println!("  Column {} cm", case.geometry.column_size_tag());
    println!("  Type:         {}", result.classification);
    println!(
        "  ac/hc:        {:.2} {}",
        check.ratio,
        status_icon(check.passes)
    );
    println!("  VRd,max:      {:.1} kN", result.vrd_kn);
    println!("  d:            {:.1} cm", result.effective_depth_cm);
    println!("  ac:           {:.1} cm", result.lever_arm_cm);
    println!("  z0:           {:.2} cm", result.z0_cm);
    println!("  ZEd:          {:.1} kN", result.zed_kn);
    println!("  As1:          {:.2} cm2", result.as1_cm2);
    println!("  As2:          {:.2} cm2", result.as2_cm2);
}

fn run_corbel_schedule(
    geometry: CorbelGeometry,
    cases: Option<&Path>,
    output: Option<&Path>,
    json: bool,
) -> Result<()> {
    let loads: Vec<CorbelLoad> = match cases {
        Some(path) => read_corbel_loads(path).with_context(|| format!("reading {}", path.display()))?,
        None => CorbelBatchInput::default().loads,
    };
    let input = CorbelBatchInput {
        label: "Corbel Schedule".to_string(),
        geometry,
        loads,
    };
    let result = calculate_batch(&input)?;

    if let Some(path) = output {
        write_text(path, &corbel_results_to_csv(&result))?;
        tracing::info!(path = %path.display(), rows = result.rows.len(), "wrote corbel schedule");
    }

    emit(json, &result, || print_corbel_schedule(&result))
}

/// A value right-aligned to `width` with `precision` decimals, or "-" when absent.
fn cell(value: Option<f64>, width: usize, precision: usize) -> String {
    match value {
        Some(v) => format!("{:>width$.precision$}", v),
        None => format!("{:>width$}", "-"),
    }
}

fn print_corbel_schedule(result: &CorbelBatchResult) {
    println!("Column {} cm, {}", result.column_size_tag, result.classification);
    println!(
        "Geometry check ac/hc = {:.2} {}",
        result.geometry_check.ratio,
        status_icon(result.geometry_check.passes)
    );
    println!();
    println!("{:<16} {:>8} {:>8} {:>10} {:>10}", "Location", "V", "H", "As1", "As2");
    println!("{}", "-".repeat(56));
    for row in &result.rows {
        let v = cell(row.load.vertical_force_kn, 8, 1);
        let h = cell(row.load.horizontal_force_kn, 8, 1);
        match &row.outcome {
            Ok(r) => println!(
                "{:<16} {} {} {:>10.2} {:>10.2}",
                row.load.location, v, h, r.as1_cm2, r.as2_cm2
            ),
            Err(e) => {
                println!("{:<16} {} {} {}", row.load.location, v, h, status_icon(false));
                println!("    {}", e);
            }
        }
    }

    let failed = result.failed_count();
    if failed > 0 {
        println!();
        println!("{} of {} rows could not be sized", failed, result.rows.len());
    }
    if let Some(governing) = &result.governing {
        println!();
        println!("Governing: {} (As1 = {:.2} cm2)", governing.location, governing.as1_cm2);
    }
}

fn run_columns(input: Option<&Path>, bar_diameter: Option<f64>, output: Option<&Path>, json: bool) -> Result<()> {
    let mut schedule = ColumnScheduleInput::default();
    if let Some(path) = input {
        schedule.sections = read_column_sections(path).with_context(|| format!("reading {}", path.display()))?;
    }

    let settings = GlobalSettings {
        bar_diameter_mm: bar_diameter,
        ..GlobalSettings::default()
    };
    let rows = column_schedule::calculate(&schedule, settings.chosen_bar_diameter_mm()?)?;

    if let Some(path) = output {
        write_text(path, &schedule_to_csv(&rows))?;
        tracing::info!(path = %path.display(), rows = rows.len(), "wrote column schedule");
    }

    emit(json, &rows, || print_columns(&rows))
}

fn print_columns(rows: &[ColumnScheduleRow]) {
    println!(
        "{:<10} {:<5} {:>12} {:>7} {:>8} {:>12} {:>8}  Notes",
        "Column", "Shape", "Ac (mm2)", "n_bars", "dia", "As (mm2)", "rho (%)"
    );
    println!("{}", "-".repeat(79));
    for row in rows {
        let ac = cell(Some(row.ac_mm2).filter(|a| a.is_finite()), 12, 0);
        let rho = cell(row.reinforcement_ratio().map(|r| r * 100.0), 8, 2);
        println!(
            "{:<10} {:<5} {} {:>7} {:>8.0} {:>12.2} {}  {}",
            row.section.id,
            row.section.shape.code(),
            ac,
            row.n_bars,
            row.bar_diam_mm,
            row.as_provided_mm2,
            rho,
            row.notes
        );
    }
}

fn run_session(action: SessionAction, json: bool) -> Result<()> {
    match action {
        SessionAction::New {
            path,
            project,
            engineer,
        } => {
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            let session = DesignSession::with_default_items(project, engineer);
            save_session(&session, &path)?;
            println!("Created {} with {} items", path.display(), session.item_count());
            Ok(())
        }
        SessionAction::Show { path } => {
            let session = load_session(&path)?;
            emit(json, &session, || {
                println!("Project:  {}", session.meta.project_name);
                println!("Engineer: {}", session.meta.engineer);
                println!("Modified: {}", session.meta.modified.format("%Y-%m-%d %H:%M"));
                println!();
                for (id, item) in session.items_by_label() {
                    println!("  {}  {:<16} {}", id, item.calc_type(), item.label());
                }
            })
        }
        SessionAction::Run { path } => {
            let session = load_session(&path)?;
            let mut outputs = Vec::new();
            for (id, item) in session.items_by_label() {
                outputs.push((id, item, session.evaluate(id)));
            }

            if json {
                let values: Vec<_> = outputs
                    .iter()
                    .map(|(id, item, output)| {
                        serde_json::json!({
                            "id": id,
                            "label": item.label(),
                            "output": output,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
                return Ok(());
            }

            for (_, item, output) in &outputs {
                println!("== {} ({}) ==", item.label(), item.calc_type());
                print_output(output);
                println!();
            }
            Ok(())
        }
    }
}

fn print_output(output: &CalcResult<CalculationOutput>) {
    match output {
        Err(e) => println!("{} {}", status_icon(false), e),
        Ok(CalculationOutput::CorbelBatch(result)) => print_corbel_schedule(result),
        Ok(CalculationOutput::ColumnSchedule { rows }) => print_columns(rows),
        Ok(CalculationOutput::Layout(layout)) => print_layout(layout),
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}
