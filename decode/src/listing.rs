//! Date-ordered listing of transaction aggregates.

use std::fmt;

use crate::transaction::TransactionAggregate;

const RULE_WIDTH: usize = 80;

/// Dated records first in ascending date order, then undated records
///
/// The sort is stable: records with equal dates, and all undated records,
/// keep their input order.
pub fn sort_by_transaction_date(mut records: Vec<TransactionAggregate>) -> Vec<TransactionAggregate> {
    records.sort_by_key(|record| (record.transaction_date.is_none(), record.transaction_date));
    records
}

/// Console table of aggregates, one row per record
pub struct ListingTable<'a> {
    records: &'a [TransactionAggregate],
}

impl<'a> ListingTable<'a> {
    pub fn new(records: &'a [TransactionAggregate]) -> Self {
        Self { records }
    }

    fn format_row(record: &TransactionAggregate) -> String {
        let date = record
            .transaction_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "N/A".to_string());

        let mut amount = record.total_amount.round_dp(2);
        amount.rescale(2);
        let amount = amount.to_string();

        format!(
            "{:<15} {:<15} {:<12} ${:<14} {:<30}",
            record.last_name, record.first_name, date, amount, record.source_identifier
        )
    }
}

impl fmt::Display for ListingTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(RULE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<15} {:<15} {:<12} {:<15} {:<30}",
            "Last Name", "First Name", "Date", "Total Amount", "Filename"
        )?;
        writeln!(f, "{rule}")?;

        for record in self.records {
            writeln!(f, "{}", Self::format_row(record))?;
        }
        Ok(())
    }
}
