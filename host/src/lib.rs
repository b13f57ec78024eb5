//! HL7 Host Library
//!
//! Directory-level processing of DFT message files: selecting files by
//! prefix, reading them with a size limit, and running the decoders of
//! [`hl7_decode`] over each one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hl7_decode::{
    extract_bytes, parse_note, sort_by_transaction_date, DftNote, PatientQuery,
    TransactionAggregate,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum HostError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is {size} bytes, above the {limit} byte limit")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
}

pub type Result<T> = std::result::Result<T, HostError>;

/// Configuration for batch processing
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// File name prefix of DFT messages
    pub prefix: String,
    /// Files larger than this are rejected
    pub max_file_size: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            prefix: "DFT-".to_string(),
            max_file_size: 16 * 1024 * 1024, // 16MB
        }
    }
}

/// Statistics collected while processing a directory
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStatistics {
    /// Files matching the prefix
    pub files_seen: usize,
    /// Files read and decoded
    pub files_processed: usize,
    /// Files that could not be read
    pub files_failed: usize,
    /// Total bytes read
    pub bytes_read: u64,
}

/// Message file processor
#[derive(Debug, Default)]
pub struct MessageBatch {
    config: BatchConfig,
    stats: BatchStatistics,
}

impl MessageBatch {
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            stats: BatchStatistics::default(),
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn statistics(&self) -> &BatchStatistics {
        &self.stats
    }

    /// Regular files in `dir` whose name starts with the prefix, sorted by name
    pub fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let io_error = |source| HostError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let is_file = entry.file_type().map_err(io_error)?.is_file();
            let matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(&self.config.prefix));

            if is_file && matches {
                files.push(entry.path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Read a message file, rejecting files above `max_file_size`
    pub fn read_message(&mut self, path: &Path) -> Result<Vec<u8>> {
        let io_error = |source| HostError::Io {
            path: path.to_path_buf(),
            source,
        };

        let size = fs::metadata(path).map_err(io_error)?.len();
        if size > self.config.max_file_size {
            return Err(HostError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.config.max_file_size,
            });
        }

        let bytes = fs::read(path).map_err(io_error)?;
        self.stats.bytes_read += bytes.len() as u64;
        Ok(bytes)
    }

    /// Run `f` over every matching file; unreadable files are logged and skipped
    fn for_each_message<F>(&mut self, dir: &Path, mut f: F) -> Result<()>
    where
        F: FnMut(&str, &[u8]),
    {
        for path in self.list_files(dir)? {
            self.stats.files_seen += 1;

            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.read_message(&path) {
                Ok(bytes) => {
                    debug!(file = %name, bytes = bytes.len(), "processing message");
                    f(&name, &bytes);
                    self.stats.files_processed += 1;
                }
                Err(e) => {
                    warn!(file = %name, error = %e, "skipping file");
                    self.stats.files_failed += 1;
                }
            }
        }
        Ok(())
    }

    /// Transaction aggregates of every matching file, in listing order
    pub fn extract_dir(&mut self, dir: &Path) -> Result<Vec<TransactionAggregate>> {
        let mut records = Vec::new();
        self.for_each_message(dir, |name, bytes| {
            records.push(extract_bytes(bytes).with_source(name));
        })?;
        Ok(sort_by_transaction_date(records))
    }

    /// Notes of the files whose first patient matches `query`, keyed by file name
    pub fn search_dir(
        &mut self,
        dir: &Path,
        query: &PatientQuery,
    ) -> Result<Vec<(String, DftNote)>> {
        let mut notes = Vec::new();
        self.for_each_message(dir, |name, bytes| {
            if let Some(note) = parse_note(bytes, Some(query)) {
                notes.push((name.to_string(), note));
            }
        })?;
        Ok(notes)
    }
}
