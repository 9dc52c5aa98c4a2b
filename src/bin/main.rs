use std::io::Write;
use std::path::PathBuf;

use asmap_node_diff::diff::diff_snapshots;
use asmap_node_diff::formats::{format_changes, format_report};
use asmap_node_diff::io::check_input;
use asmap_node_diff::models::Horizon;
use asmap_node_diff::{load_asmap, load_peers, AsmapDiffError};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::info;

/// asmap_node_diff compares how two asmap versions classify the peers of a node.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    /// Node address file (generated with the `getnodeaddresses 0` RPC)
    node_addresses_file: PathBuf,

    /// Previous asmap file, binary or text
    previous_asmap_file: PathBuf,

    /// Current asmap file, binary or text
    current_asmap_file: PathBuf,

    /// List every changed peer and enable debug logging
    #[clap(short, long)]
    verbose: bool,

    /// Horizon as LABEL=DURATION (e.g. "last month=30d"); replaces the default set when given
    #[clap(long = "horizon", value_name = "LABEL=DURATION")]
    horizons: Vec<Horizon>,

    /// Reference time in unix seconds. Defaults to the current time
    #[clap(long)]
    reference_time: Option<i64>,
}

fn run(opts: Opts) -> Result<(), AsmapDiffError> {
    for path in [
        &opts.node_addresses_file,
        &opts.previous_asmap_file,
        &opts.current_asmap_file,
    ] {
        check_input(path)?;
    }

    let reference_time = opts
        .reference_time
        .unwrap_or_else(|| Utc::now().timestamp());
    match DateTime::<Utc>::from_timestamp(reference_time, 0) {
        Some(t) => info!("reference time {} ({})", reference_time, t.to_rfc3339()),
        None => info!("reference time {}", reference_time),
    }
    let horizons = match opts.horizons.is_empty() {
        true => Horizon::defaults(),
        false => opts.horizons,
    };

    let peers = load_peers(&opts.node_addresses_file)?;
    let prev = load_asmap(&opts.previous_asmap_file)?;
    let cur = load_asmap(&opts.current_asmap_file)?;

    let report = diff_snapshots(&prev, &cur, &peers, &horizons, reference_time);
    if !report.invalid.is_empty() {
        info!("skipped {} peers with invalid addresses", report.invalid.len());
    }

    let mut stdout = std::io::stdout();
    let mut output = format_report(&report.results);
    if opts.verbose && !report.changes.is_empty() {
        output.push('\n');
        output.push_str(&format_changes(&report.changes));
    }
    if let Err(e) = writeln!(stdout, "{}", output) {
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn main() {
    let opts: Opts = Opts::parse();

    let default_filter = match opts.verbose {
        true => "debug",
        false => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(opts) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
