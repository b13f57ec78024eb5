//! HL7 DFT Report Application
//!
//! Decodes single messages into readable reports, lists the transactions of
//! a directory of DFT files by date, and searches that directory for one
//! patient's charges.
//!
//! # Commands
//!
//! - `decode <FILE>`: segment report of one message
//! - `list <DIR>`: date-ordered table of name, date and total per file
//! - `search <DIR> --patient <NAME>`: JSON notes of the matching files

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hl7_decode::{decode_report, ListingTable, PatientQuery};
use hl7_host::{BatchConfig, BatchStatistics, MessageBatch};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hl7-report", version, about = "Decode HL7 v2 DFT messages")]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the segment report of one message file
    Decode {
        file: PathBuf,

        /// Also print the message itself, one segment per line
        #[arg(long)]
        raw: bool,
    },

    /// List patient name, first transaction date and total of every file
    List {
        dir: PathBuf,

        /// File name prefix of DFT messages
        #[arg(long, env = "HL7_DFT_PREFIX", default_value = "DFT-")]
        prefix: String,
    },

    /// Print the notes of files whose patient matches a name, as JSON
    Search {
        dir: PathBuf,

        /// Patient name, in any word order
        #[arg(long)]
        patient: String,

        /// Minimum similarity score (0-100)
        #[arg(long, default_value_t = hl7_decode::note::DEFAULT_MATCH_THRESHOLD,
              value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: u8,

        /// File name prefix of DFT messages
        #[arg(long, env = "HL7_DFT_PREFIX", default_value = "DFT-")]
        prefix: String,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Byte count for the statistics summary, in B, KiB or MiB
fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;

    match bytes {
        b if b >= MIB => format!("{:.2} MiB", b as f64 / MIB as f64),
        b if b >= KIB => format!("{:.2} KiB", b as f64 / KIB as f64),
        b => format!("{b} B"),
    }
}

fn print_statistics(stats: &BatchStatistics, duration: Duration) {
    eprintln!();
    eprintln!("Statistics:");
    eprintln!("  Files seen:        {}", stats.files_seen);
    eprintln!("  Files processed:   {}", stats.files_processed);
    eprintln!("  Files failed:      {}", stats.files_failed);
    eprintln!("  Bytes read:        {}", format_bytes(stats.bytes_read));
    eprintln!("  Time:              {:.2}s", duration.as_secs_f64());
}

fn decode_file(file: &Path, raw: bool) -> Result<()> {
    let mut batch = MessageBatch::default();
    let bytes = batch
        .read_message(file)
        .with_context(|| format!("cannot read message {}", file.display()))?;

    if raw {
        let text = String::from_utf8_lossy(&bytes);
        println!("Raw message:");
        for line in text.split(['\r', '\n']).filter(|l| !l.trim().is_empty()) {
            println!("{line}");
        }
        println!();
    }

    print!("{}", decode_report(&bytes));
    Ok(())
}

fn list_dir(dir: &Path, prefix: String) -> Result<()> {
    let start = Instant::now();
    let mut batch = MessageBatch::new(BatchConfig {
        prefix,
        ..Default::default()
    });

    let records = batch
        .extract_dir(dir)
        .with_context(|| format!("cannot list {}", dir.display()))?;
    info!(records = records.len(), "extracted transactions");

    print!("{}", ListingTable::new(&records));
    print_statistics(batch.statistics(), start.elapsed());
    Ok(())
}

fn search_dir(dir: &Path, query: &PatientQuery, prefix: String) -> Result<()> {
    let start = Instant::now();
    let mut batch = MessageBatch::new(BatchConfig {
        prefix,
        ..Default::default()
    });

    let matches = batch
        .search_dir(dir, query)
        .with_context(|| format!("cannot search {}", dir.display()))?;
    info!(patient = query.name(), matches = matches.len(), "search complete");

    let output: serde_json::Map<String, serde_json::Value> = matches
        .into_iter()
        .map(|(name, note)| serde_json::to_value(note).map(|value| (name, value)))
        .collect::<serde_json::Result<_>>()?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    print_statistics(batch.statistics(), start.elapsed());
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Decode { file, raw } => decode_file(&file, raw),
        Command::List { dir, prefix } => list_dir(&dir, prefix),
        Command::Search {
            dir,
            patient,
            threshold,
            prefix,
        } => {
            let query = PatientQuery::new(patient).with_threshold(threshold);
            search_dir(&dir, &query, prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(16 * 1024 * 1024), "16.00 MiB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3072.00 MiB");
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from([
            "hl7-report",
            "-vv",
            "search",
            "/data",
            "--patient",
            "MARGARET BURROWS",
            "--threshold",
            "90",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Search {
                patient, threshold, ..
            } => {
                assert_eq!(patient, "MARGARET BURROWS");
                assert_eq!(threshold, 90);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_threshold_above_100() {
        let result = Cli::try_parse_from([
            "hl7-report", "search", "/data", "--patient", "X", "--threshold", "101",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
