//! Message directory fixtures

#![allow(dead_code)]

use std::fs;

use tempfile::TempDir;

/// Message files keyed by name; the last one does not carry the DFT prefix
pub const MESSAGES: &[(&str, &str)] = &[
    (
        "DFT-100.txt",
        "MSH|^~\\&|APP\nPID|1||||BURROWS^MARGARET\nFT1|1|A|20250410||||||||100.50\nFT1|2|B|20250301||||||||49.50",
    ),
    (
        "DFT-200.txt",
        "MSH|^~\\&|APP\nPID|1||||SMITH^JOHN\nFT1|1|C|20250101||||||||20",
    ),
    ("DFT-300.txt", "MSH|^~\\&|APP\nPID|1||||DOE^JANE\nEVN|P03"),
    ("ADT-400.txt", "MSH|^~\\&|APP\nPID|1||||IGNORED^FILE"),
];

/// Temporary directory holding [`MESSAGES`] plus a `DFT-` named subdirectory
pub fn message_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, body) in MESSAGES {
        fs::write(dir.path().join(name), body).unwrap();
    }
    fs::create_dir(dir.path().join("DFT-subdir")).unwrap();
    dir
}
