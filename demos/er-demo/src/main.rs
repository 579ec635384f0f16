//! er-demo — command-line driver for the er_sim emergency-room simulator.
//!
//! Loads an intake file (or the bundled sample), rates every patient either
//! from a seeded generator or by asking at the terminal, then runs
//! treat-then-admit rounds until every patient is discharged.  Discharges and
//! round summaries are written to the output directory.

mod status;

use std::io::{self, BufRead, Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use er_core::ErConfig;
use er_output::{CsvWriter, DischargeWriter, OutputObserver};
use er_sim::{ErSim, RoundOutcome, SimBuilder, SimObserver};
use er_triage::{IntakeReport, PromptOracle, SeededOracle, load_intake_csv, load_intake_reader};

use status::StatusPrinter;

const SAMPLE_INTAKE: &str = include_str!("../data/intake.csv");

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "er-demo", about = "Emergency-room triage and treatment simulator")]
struct Cli {
    /// Intake CSV (name,age,weight,height,billing_key,symptoms,id).  Uses the
    /// bundled sample when omitted.
    #[arg(long)]
    intake: Option<PathBuf>,

    /// TOML file with an `ErConfig`.  Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    doctors: Option<usize>,

    #[arg(long)]
    capacity: Option<usize>,

    #[arg(long)]
    visit_charge: Option<u64>,

    /// Seed for unattended severity ratings.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Ask for each patient's severity at the terminal.
    #[arg(long)]
    interactive: bool,

    /// Wait for Enter between rounds.
    #[arg(long)]
    step: bool,

    /// Directory for discharges.csv and round_summaries.csv.
    #[arg(long, default_value = "output/er-demo")]
    output: PathBuf,

    /// Write the discharge log to SQLite instead of CSV.
    #[cfg(feature = "sqlite")]
    #[arg(long)]
    sqlite: bool,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    info!(?config, "configuration");

    // 1. Intake.
    let intake = load_intake(cli.intake.as_deref())?;
    if !intake.skipped.is_empty() {
        warn!(skipped = intake.skipped.len(), "malformed intake records were skipped");
    }
    println!("Loaded {} patients", intake.patients.len());

    // 2. Build and triage.
    let mut sim = SimBuilder::new(config).intake(intake.patients).build()?;
    let report = if cli.interactive {
        let stdin = io::stdin();
        let mut oracle = PromptOracle::new(stdin.lock(), io::stdout());
        sim.triage(&mut oracle)?.clone()
    } else {
        sim.triage(&mut SeededOracle::new(cli.seed))?.clone()
    };
    println!(
        "Triage: {} ranked, {} rejected ratings, {} dropped (selector full)",
        report.ranked.len(),
        report.rejected_ratings,
        report.overflowed.len(),
    );
    println!();

    // 3. Output.
    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;

    write_with_selected_backend(&mut sim, &cli)
}

#[cfg(feature = "sqlite")]
fn write_with_selected_backend(sim: &mut ErSim, cli: &Cli) -> Result<()> {
    if cli.sqlite {
        let writer = er_output::SqliteWriter::new(&cli.output)?;
        return drive(sim, writer, cli.step, &cli.output);
    }
    drive(sim, CsvWriter::new(&cli.output)?, cli.step, &cli.output)
}

#[cfg(not(feature = "sqlite"))]
fn write_with_selected_backend(sim: &mut ErSim, cli: &Cli) -> Result<()> {
    drive(sim, CsvWriter::new(&cli.output)?, cli.step, &cli.output)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<ErConfig> {
    let mut config = match &cli.config {
        None => ErConfig::default(),
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
    };
    if let Some(n) = cli.doctors {
        config.doctor_count = n;
    }
    if let Some(n) = cli.capacity {
        config.capacity_per_doctor = n;
    }
    if let Some(n) = cli.visit_charge {
        config.visit_charge = n;
    }
    config.validate()?;
    Ok(config)
}

fn load_intake(path: Option<&Path>) -> Result<IntakeReport> {
    let report = match path {
        Some(p) => load_intake_csv(p).with_context(|| format!("loading {}", p.display()))?,
        None    => load_intake_reader(Cursor::new(SAMPLE_INTAKE))?,
    };
    if report.patients.is_empty() {
        bail!("intake contains no usable patient records");
    }
    Ok(report)
}

/// Run rounds to completion, printing status after each one.
fn drive<W: DischargeWriter>(sim: &mut ErSim, writer: W, step: bool, out_dir: &Path) -> Result<()> {
    let mut output = OutputObserver::new(writer);
    let mut printer = StatusPrinter::new(io::stdout());
    let mut observer = Both(&mut output, &mut printer);

    let t0 = Instant::now();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        match sim.advance(&mut observer)? {
            RoundOutcome::Finished => break,
            RoundOutcome::Advanced(_) if step && !sim.is_finished() => {
                print!("Press Enter for the next round...");
                io::stdout().flush()?;
                let mut line = String::new();
                if input.read_line(&mut line)? == 0 {
                    // Input closed: run the remaining rounds unattended.
                    while let RoundOutcome::Advanced(_) = sim.advance(&mut observer)? {}
                    break;
                }
            }
            RoundOutcome::Advanced(_) => {}
        }
    }
    let elapsed = t0.elapsed();

    if let Some(e) = output.take_error() {
        warn!("output error: {e}");
    }

    println!();
    println!("Simulation complete: {} rounds in {:.3} s", sim.round().0, elapsed.as_secs_f64());
    println!("  discharges written : {}  ({})", output.discharges_written(), out_dir.display());
    if sim.sink_failures() > 0 {
        println!("  discharge write failures: {}", sim.sink_failures());
    }
    println!();
    status::print_billing(&mut io::stdout(), sim)?;
    Ok(())
}

/// Fan one set of callbacks out to two observers.
struct Both<'a, A: SimObserver, B: SimObserver>(&'a mut A, &'a mut B);

impl<A: SimObserver, B: SimObserver> SimObserver for Both<'_, A, B> {
    fn on_round_start(&mut self, round: er_core::Round) {
        self.0.on_round_start(round);
        self.1.on_round_start(round);
    }

    fn on_discharge(&mut self, record: &er_sim::DischargeRecord) -> er_sim::SinkResult {
        let result = self.0.on_discharge(record);
        // The status printer never fails; the writer's result is what counts.
        let _ = self.1.on_discharge(record);
        result
    }

    fn on_round_end(&mut self, snapshot: &er_sim::RoundSnapshot) {
        self.0.on_round_end(snapshot);
        self.1.on_round_end(snapshot);
    }

    fn on_sim_end(&mut self, final_round: er_core::Round) {
        self.0.on_sim_end(final_round);
        self.1.on_sim_end(final_round);
    }
}
