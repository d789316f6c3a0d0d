use std::path::PathBuf;

use chrono::Local;
use clap::Parser;
use tracing::error;

use beitragseinzug::core::{EinzugError, format_euro};
use beitragseinzug::pipeline::{RunOptions, default_output_name, run_with};
use beitragseinzug::spreadsheet::DEFAULT_SHEET;

/// Creates a SEPA direct debit file (pain.008.001.02) for collecting
/// membership fees from a member table.
#[derive(Debug, Parser)]
#[command(name = "beitragseinzug", version)]
struct Cli {
    /// Member table as .ods, .xlsx or .csv
    #[arg(default_value = "mitgliedertabelle.ods")]
    file: PathBuf,

    /// Configuration file in TOML format
    #[arg(short = 'c', long = "configfile", default_value = "config.toml")]
    config: PathBuf,

    /// Output XML file [default: sammelauftrag-<today>.xml]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also print the XML to the terminal
    #[arg(short, long, overrides_with = "no_print")]
    print: bool,

    #[arg(long = "no-print", hide = true, overrides_with = "print")]
    no_print: bool,

    /// Minimum days between today and the collection date
    #[arg(short = 'd', long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(0..=365))]
    min_delta: u32,

    /// Sheet holding the member list
    #[arg(short, long, default_value = DEFAULT_SHEET)]
    sheet: String,

    /// Fixed message id instead of a generated one
    #[arg(long)]
    message_id: Option<String>,

    /// Show debug output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("CRITICAL: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = execute(&cli) {
        error!(exit_code = e.exit_code(), "run aborted");
        eprintln!("CRITICAL: {e}");
        std::process::exit(e.exit_code());
    }
}

fn execute(cli: &Cli) -> Result<(), EinzugError> {
    let now = Local::now().naive_local();
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_output_name(now.date())));

    let options = RunOptions {
        input: cli.file.clone(),
        config: cli.config.clone(),
        output,
        sheet: cli.sheet.clone(),
        min_delta: cli.min_delta,
        message_id: cli.message_id.clone(),
    };

    let summary = run_with(&options, now, |profile| {
        println!(
            "Konfiguration: {} ({}, {}, {})",
            profile.name, profile.iban, profile.bic, profile.creditor_id
        );
    })?;

    println!("Aktive Mitglieder: {}", summary.active_members);
    println!("Einzugsdatum: {}", summary.collection_date.format("%d.%m.%Y"));
    println!("Gesamtbetrag: {}", format_euro(summary.total_cents));
    println!("XML Ausgabe gespeichert in {}.", summary.output.display());

    if cli.print && !cli.no_print {
        println!();
        println!("{}", summary.xml);
    }
    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("BEITRAGSEINZUG_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
