//! HL7 v2 DFT Decoding
//!
//! Segment handlers built on [`hl7_segment`]:
//!
//! - [`ReportDecoder`] turns every segment into a titled block of
//!   `- Label: value` lines, using a per-segment-type field table
//! - [`TransactionExtractor`] folds PID and FT1 segments into a
//!   [`TransactionAggregate`] (patient name, first transaction date, total)
//! - [`NoteCollector`] builds a serializable [`DftNote`], optionally
//!   restricted to one patient
//!
//! Decoding and extraction never fail. Missing fields are skipped, malformed
//! dates and amounts fall back to "absent" and zero, and a segment that
//! cannot be formatted yields one `Error processing ...` line.
//!
//! # Usage
//! ```ignore
//! let lines = hl7_decode::decode(message);
//! let aggregate = hl7_decode::extract(message).with_source("DFT-962.txt");
//! ```

pub mod error;
pub mod format;
mod layout;
pub mod listing;
pub mod note;
pub mod report;
pub mod transaction;

pub use error::DecodeError;
pub use listing::{sort_by_transaction_date, ListingTable};
pub use note::{parse_note, DftNote, NoteCollector, PatientQuery};
pub use report::{decode_report, Block, Report, ReportDecoder};
pub use transaction::{extract_aggregate, TransactionAggregate, TransactionExtractor};

/// Decode a message into report lines
pub fn decode(raw_text: &str) -> Vec<String> {
    decode_bytes(raw_text.as_bytes())
}

/// Decode a message that may contain bytes that are not UTF-8
pub fn decode_bytes(raw: &[u8]) -> Vec<String> {
    decode_report(raw).lines()
}

/// Extract the transaction aggregate of a message
pub fn extract(raw_text: &str) -> TransactionAggregate {
    extract_aggregate(raw_text.as_bytes())
}

/// Extract from a message that may contain bytes that are not UTF-8
pub fn extract_bytes(raw: &[u8]) -> TransactionAggregate {
    extract_aggregate(raw)
}
