use clap::{Parser, Subcommand};
use ds_app::{
    AppError, AppResult, PointStage, ProcessDriver, SweepProgressEvent, SweepSummary,
    compile_point_deck, load_config, run_sweep_with_progress,
};
use ds_config::{SweepConfig, save_yaml, validate_config};
use ds_deck::write_deck;
use ds_extract::{OutputExtractor, RecordField};
use ds_results::{ResultFormat, load_report, peaks};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "ds-cli")]
#[command(about = "detsweep - two-pass detonation sweeps over an external simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a concentration sweep and write the report
    Run {
        /// Path to the sweep YAML file
        config_path: PathBuf,
        /// Report format override (json or csv)
        #[arg(long)]
        format: Option<String>,
        /// Report directory override
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Print (or write) the input deck for one concentration
    Deck {
        /// Path to the sweep YAML file
        config_path: PathBuf,
        /// Concentration of the variable mixture, in (0, 1)
        #[arg(short, long)]
        concentration: f64,
        /// Specific volume [cc/g] for a second-pass deck
        #[arg(long)]
        density: Option<f64>,
        /// Write to the simulator's input path instead of stdout
        #[arg(long)]
        write: bool,
    },
    /// Extract a record from a simulator report
    Extract {
        /// Path to the simulator report
        report_path: PathBuf,
        /// Only read the standard volume, as in the first pass
        #[arg(long)]
        density_only: bool,
        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarise a saved report
    Summary {
        /// Path to a results .json or .csv file
        results_path: PathBuf,
    },
    /// Validate a sweep file
    Validate {
        /// Path to the sweep YAML file
        config_path: PathBuf,
    },
    /// Write the reference sweep configuration
    InitConfig {
        /// Destination YAML path
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> AppResult<()> {
    // Logs go to stderr so the progress line owns stdout.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config_path,
            format,
            output_dir,
        } => cmd_run(&config_path, format.as_deref(), output_dir),
        Commands::Deck {
            config_path,
            concentration,
            density,
            write,
        } => cmd_deck(&config_path, concentration, density, write),
        Commands::Extract {
            report_path,
            density_only,
            json,
        } => cmd_extract(&report_path, density_only, json),
        Commands::Summary { results_path } => cmd_summary(&results_path),
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::InitConfig { path, force } => cmd_init_config(&path, force),
    }
}

fn cmd_run(config_path: &Path, format: Option<&str>, output_dir: Option<PathBuf>) -> AppResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(format) = format {
        config.output.format = ResultFormat::from_extension(format)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown format '{}'", format)))?;
    }
    if let Some(dir) = output_dir {
        config.output.dir = dir;
    }
    tracing::debug!(config = %config_path.display(), format = %config.output.format, "sweep loaded");

    let points = config.concentrations.generate_points();
    println!(
        "Sweeping {} in {} with {} chemistry: {} points",
        config.variable.name(),
        config.base.name(),
        config.chemistry.name(),
        points.len()
    );

    let driver = ProcessDriver::new(&config.simulator);
    let mut last_emit = Instant::now();
    let mut last_key = (usize::MAX, PointStage::Init);
    let response = run_sweep_with_progress(
        &config,
        driver,
        Some(&mut |event: SweepProgressEvent| {
            let key = (event.index, event.stage);
            let emit_now = key != last_key || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_key = key;
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    println!("✓ Sweep completed: {}", response.sweep_id);
    print_sweep_summary(&response.summary);
    println!("  Report: {}", response.saved.report_path.display());
    println!("  Manifest: {}", response.saved.manifest_path.display());
    Ok(())
}

fn cmd_deck(config_path: &Path, concentration: f64, density: Option<f64>, write: bool) -> AppResult<()> {
    let config = load_config(config_path)?;
    let deck = compile_point_deck(&config, concentration, density)?;

    if write {
        let path = config.simulator.input_file();
        write_deck(&deck, &path)?;
        println!("✓ Deck written: {}", path.display());
    } else {
        println!("{}", deck.text);
    }
    Ok(())
}

fn cmd_extract(report_path: &Path, density_only: bool, json: bool) -> AppResult<()> {
    let bytes = std::fs::read(report_path)?;
    let text = String::from_utf8_lossy(&bytes);
    let extractor = OutputExtractor::new()?;

    if density_only {
        let volume = extractor.extract_density(&text)?;
        println!("specific_volume = {} cc/g", volume);
        return Ok(());
    }

    let record = extractor.extract(&text)?;
    if json {
        let content = serde_json::to_string_pretty(&record)
            .map_err(|e| AppError::Extract(e.to_string()))?;
        println!("{}", content);
        return Ok(());
    }

    for field in RecordField::all() {
        if field == RecordField::SpecificVolume {
            continue;
        }
        let value = field
            .get(&record)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let note = if record.missing.contains(&field) {
            "  (no match)"
        } else {
            ""
        };
        println!("  {:<20} {:>12} {}{}", field.name(), value, field.unit(), note);
    }
    Ok(())
}

fn cmd_summary(results_path: &Path) -> AppResult<()> {
    let results = load_report(results_path)?;
    println!("Results: {}", results_path.display());
    println!("  Points: {}", results.len());
    if let (Some(first), Some(last)) = (
        results.concentrations().first().copied(),
        results.concentrations().last().copied(),
    ) {
        println!("  Range: {} to {}", first, last);
    }

    for peak in peaks(&results) {
        let si = peak
            .si
            .map(|(value, unit)| format!(" ({:.4e} {})", value, unit))
            .unwrap_or_default();
        println!(
            "  Peak {:<12} {:>12.3} {:<6} at {}{}",
            peak.field.name(),
            peak.value,
            peak.field.unit(),
            peak.concentration,
            si
        );
    }
    Ok(())
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating sweep: {}", config_path.display());
    let config = load_config(config_path)?;
    validate_config(&config)?;
    println!("✓ Sweep is valid");
    println!(
        "  {} points, {} chemistry, {} report",
        config.concentrations.generate_points().len(),
        config.chemistry.name(),
        config.output.format
    );
    Ok(())
}

fn cmd_init_config(path: &Path, force: bool) -> AppResult<()> {
    if path.exists() && !force {
        return Err(AppError::InvalidInput(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_yaml(path, &SweepConfig::reference())?;
    println!("✓ Wrote reference sweep: {}", path.display());
    Ok(())
}

fn print_sweep_summary(summary: &SweepSummary) {
    println!(
        "  Completed: {}/{}",
        summary.completed(),
        summary.attempted()
    );
    if !summary.skipped.is_empty() {
        println!("  Skipped:");
        for point in &summary.skipped {
            println!(
                "    {:<8} {:<26} {}",
                point.concentration, point.stage, point.reason
            );
        }
    }
    if !summary.partial.is_empty() {
        println!("  Partial records: {}", summary.partial.len());
    }
    println!(
        "  Time: {:.1}s total, {:.1}s in {} simulator runs",
        summary.timing.total_time_s,
        summary.timing.simulator_time_s,
        summary.timing.simulator_runs
    );
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &SweepProgressEvent) {
    let width = 28usize;
    let fraction = event.fraction_complete();
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    let mut line = format!(
        "\r[{}] {:>3}/{}  c={:<6}  stage={:<24}  elapsed={:.1}s",
        bar,
        (event.index + 1).min(event.total),
        event.total,
        event.concentration,
        event.stage.name(),
        event.elapsed_wall_s
    );
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    print!("{}", line);
    let _ = io::stdout().flush();
}
