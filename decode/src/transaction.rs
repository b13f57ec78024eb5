//! Patient name, first transaction date and total amount of a DFT message.

use std::str::FromStr;

use chrono::NaiveDate;
use hl7_segment::{parse_message, Halt, Segment, SegmentHandler, SegmentKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DecodeError, Result};

/// PID field holding the patient name
const PATIENT_NAME: usize = 5;
/// FT1 field holding the transaction date
const TRANSACTION_DATE: usize = 3;
/// FT1 field holding the transaction amount
const TRANSACTION_AMOUNT: usize = 11;

/// Summary of one message's financial transactions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAggregate {
    pub last_name: String,
    pub first_name: String,
    /// Date of the first FT1 whose date parses
    pub transaction_date: Option<NaiveDate>,
    /// Sum of every FT1 amount; unparsable or out-of-range amounts count as zero
    pub total_amount: Decimal,
    /// Where the message came from (e.g. a file name), set by the caller
    pub source_identifier: String,
}

impl TransactionAggregate {
    pub fn with_source(self, source: impl Into<String>) -> Self {
        Self {
            source_identifier: source.into(),
            ..self
        }
    }
}

/// Parse the first eight characters as `YYYYMMDD`
pub fn parse_transaction_date(text: &str) -> Option<NaiveDate> {
    let date = text.get(..8)?;
    if !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y%m%d").ok()
}

/// Parse a decimal amount such as `100.50`, `-12`, ` 7.5 ` or `1e2`
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Amount contribution of an FT1 amount field
///
/// Empty and non-numeric text contributes zero. Numbers that `Decimal`
/// cannot hold (e.g. `9e28`) are an error so the caller can report them.
pub fn read_amount(text: &str) -> Result<Decimal> {
    if let Some(amount) = parse_amount(text) {
        return Ok(amount);
    }

    let text = text.trim();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Err(DecodeError::AmountOutOfRange {
            value: text.to_string(),
        }),
        _ => Ok(Decimal::ZERO),
    }
}

/// Segment handler folding PID and FT1 segments into a [`TransactionAggregate`]
///
/// The last PID with a two-part name wins. Segments that cannot be read are
/// logged and skipped.
#[derive(Debug, Default)]
pub struct TransactionExtractor {
    aggregate: TransactionAggregate,
}

impl TransactionExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> TransactionAggregate {
        self.aggregate
    }

    fn apply_patient(&mut self, segment: &Segment<'_>) -> Result<()> {
        let Some(name) = segment.field(PATIENT_NAME) else {
            return Ok(());
        };

        let mut components = name.components();
        let (Some(last), Some(first)) = (components.next(), components.next()) else {
            return Ok(());
        };

        let invalid = || DecodeError::InvalidUtf8 {
            position: PATIENT_NAME,
        };
        let last = last.as_str().ok_or_else(invalid)?;
        let first = first.as_str().ok_or_else(invalid)?;

        self.aggregate.last_name = last.to_string();
        self.aggregate.first_name = first.to_string();
        Ok(())
    }

    /// Date and amount of one FT1; an amount that cannot be added is an error
    /// and leaves the running total untouched
    fn apply_transaction(&mut self, segment: &Segment<'_>) -> Result<()> {
        if self.aggregate.transaction_date.is_none() {
            self.aggregate.transaction_date = segment
                .field(TRANSACTION_DATE)
                .and_then(|f| f.as_str())
                .and_then(parse_transaction_date);
        }

        let amount = match segment.field(TRANSACTION_AMOUNT).and_then(|f| f.as_str()) {
            Some(text) => read_amount(text)?,
            None => Decimal::ZERO,
        };

        self.aggregate.total_amount = self
            .aggregate
            .total_amount
            .checked_add(amount)
            .ok_or(DecodeError::TotalOverflow { amount })?;
        Ok(())
    }
}

impl SegmentHandler for TransactionExtractor {
    fn handle(&mut self, segment: &Segment<'_>) -> std::result::Result<(), Halt> {
        let kind = segment.kind();

        let applied = match kind {
            SegmentKind::Pid => self.apply_patient(segment),
            SegmentKind::Ft1 => self.apply_transaction(segment),
            _ => {
                debug!(segment = %kind, "ignoring segment");
                Ok(())
            }
        };

        if let Err(e) = applied {
            warn!(segment = %kind, error = %e, "skipping segment");
        }
        Ok(())
    }
}

/// Fold a raw message into a [`TransactionAggregate`]
pub fn extract_aggregate(raw: &[u8]) -> TransactionAggregate {
    let mut extractor = TransactionExtractor::new();
    if let Err(halt) = parse_message(raw, &mut extractor) {
        warn!(reason = %halt, "transaction extraction stopped early");
    }
    extractor.finish()
}
