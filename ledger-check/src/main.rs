use std::path::PathBuf;

use anyhow::Context;
use chrono_tz::Tz;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ledger_check::config::{CheckConfig, MAX_LIMIT_SECS};
use ledger_check::ledger::read_ledger;
use ledger_check::report::{Summary, write_invalid_log, write_summary_json};
use ledger_check::stops::StopDirectory;
use ledger_check::trips::build_trips;

/// Rebuild train trips from a stop ledger and report inconsistent ones.
#[derive(Parser, Debug)]
#[command(name = "ledger-check", version)]
struct Args {
    /// Ledger file to check
    #[arg(long)]
    input: PathBuf,

    /// CSV stop directory (stop_id,name,is_real)
    #[arg(long)]
    stops: Option<PathBuf>,

    /// Directory for the invalid-trip log
    #[arg(long, default_value = "log")]
    log_dir: PathBuf,

    /// Also write the summary as JSON to this file
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Timezone of the ledger's clock values
    #[arg(long, default_value = "Asia/Jerusalem")]
    timezone: Tz,

    /// Largest allowed gap between adjacent stops, in seconds
    #[arg(
        long,
        default_value_t = 3600,
        value_parser = clap::value_parser!(i64).range(0..=MAX_LIMIT_SECS)
    )]
    max_gap_secs: i64,

    /// Largest allowed arrival or departure delay, in seconds
    #[arg(
        long,
        default_value_t = 5400,
        value_parser = clap::value_parser!(i64).range(0..=MAX_LIMIT_SECS)
    )]
    max_delay_secs: i64,

    /// Print every parsed stop line
    #[arg(long)]
    dump: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = CheckConfig::new(args.timezone, args.max_gap_secs, args.max_delay_secs)?;

    let directory = match &args.stops {
        Some(path) => StopDirectory::load(path)?,
        None => StopDirectory::empty(),
    };

    info!(path = %args.input.display(), "reading ledger");
    let records = read_ledger(&args.input, &directory, &config)?;
    info!(records = records.len(), "ledger read");

    if args.dump {
        for record in &records {
            println!("{record}");
        }
    }

    let trips = build_trips(&records, &config);

    let summary = Summary::from_trips(&trips);
    summary.log();
    println!("{summary}");

    let invalid_path = write_invalid_log(&args.log_dir, &trips)
        .context("failed to write invalid-trip log")?;
    println!("Invalid details written to {}", invalid_path.display());

    if let Some(path) = &args.summary_json {
        write_summary_json(path, &summary).context("failed to write JSON summary")?;
    }

    Ok(())
}
