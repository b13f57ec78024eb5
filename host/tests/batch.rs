//! Directory processing tests

use std::fs;
use std::path::{Path, PathBuf};

use hl7_decode::PatientQuery;
use hl7_host::{BatchConfig, BatchStatistics, MessageBatch};

use pretty_assertions::assert_eq;

mod common;

use common::{message_dir, MESSAGES};

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_list_files_by_prefix() {
    let dir = message_dir();
    let batch = MessageBatch::default();

    let files = batch.list_files(dir.path()).unwrap();
    assert_eq!(
        file_names(&files),
        vec!["DFT-100.txt", "DFT-200.txt", "DFT-300.txt"]
    );

    let adt = MessageBatch::new(BatchConfig {
        prefix: "ADT-".to_string(),
        ..Default::default()
    });
    assert_eq!(file_names(&adt.list_files(dir.path()).unwrap()), vec!["ADT-400.txt"]);
}

#[test]
fn test_extract_dir_sorted_by_date() {
    let dir = message_dir();
    let mut batch = MessageBatch::default();

    let records = batch.extract_dir(dir.path()).unwrap();
    let summary: Vec<(&str, &str, String, String)> = records
        .iter()
        .map(|r| {
            (
                r.source_identifier.as_str(),
                r.last_name.as_str(),
                r.transaction_date
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
                r.total_amount.to_string(),
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            ("DFT-200.txt", "SMITH", "2025-01-01".to_string(), "20".to_string()),
            ("DFT-100.txt", "BURROWS", "2025-04-10".to_string(), "150.00".to_string()),
            ("DFT-300.txt", "DOE", String::new(), "0".to_string()),
        ]
    );

    let expected_bytes: u64 = MESSAGES
        .iter()
        .filter(|(name, _)| name.starts_with("DFT-"))
        .map(|(_, body)| body.len() as u64)
        .sum();
    assert_eq!(
        batch.statistics(),
        &BatchStatistics {
            files_seen: 3,
            files_processed: 3,
            files_failed: 0,
            bytes_read: expected_bytes,
        }
    );
}

#[test]
fn test_oversized_file_is_skipped() {
    let dir = message_dir();
    fs::write(dir.path().join("DFT-999.txt"), "x".repeat(512)).unwrap();

    let mut batch = MessageBatch::new(BatchConfig {
        max_file_size: 256,
        ..Default::default()
    });
    let records = batch.extract_dir(dir.path()).unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(batch.statistics().files_seen, 4);
    assert_eq!(batch.statistics().files_failed, 1);
}

#[test]
fn test_search_dir() {
    let dir = message_dir();
    let mut batch = MessageBatch::default();

    let query = PatientQuery::new("Margaret Burrows");
    let notes = batch.search_dir(dir.path(), &query).unwrap();

    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].0, "DFT-100.txt");
    assert_eq!(notes[0].1.charges.len(), 2);
}

#[test]
fn test_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut batch = MessageBatch::default();

    assert!(batch.extract_dir(dir.path()).unwrap().is_empty());
    assert_eq!(batch.statistics(), &BatchStatistics::default());
}

#[test]
fn test_missing_directory_is_an_error() {
    let mut batch = MessageBatch::default();
    assert!(batch.extract_dir(Path::new("/nonexistent/dft")).is_err());
}

#[test]
fn test_overflowing_amounts_do_not_abort_the_batch() {
    let dir = message_dir();
    fs::write(
        dir.path().join("DFT-050.txt"),
        "PID|1||||HUGE^AMOUNT\n\
         FT1|1|X|20250601||||||||79228162514264337593543950335\n\
         FT1|2|X|20250601||||||||79228162514264337593543950335",
    )
    .unwrap();

    let mut batch = MessageBatch::default();
    let records = batch.extract_dir(dir.path()).unwrap();

    assert_eq!(records.len(), 4);
    assert_eq!(batch.statistics().files_processed, 4);
    let huge = records.iter().find(|r| r.last_name == "HUGE").unwrap();
    assert_eq!(huge.total_amount.to_string(), "79228162514264337593543950335");
}
