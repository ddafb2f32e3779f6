use std::io::Write;

use anyhow::Result;

use crate::application::LedgerService;
use crate::domain::format_cents;

/// Exporter for writing an account's stored transaction history as CSV.
pub struct StatementExporter<'a> {
    service: &'a LedgerService,
}

impl<'a> StatementExporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export the full stored history (up to the storage cap) to CSV.
    /// Returns the number of rows written.
    pub fn export_csv<W: Write>(&self, id: &str, writer: W) -> Result<usize> {
        let history = self.service.history(id)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // Write header
        csv_writer.write_record(["time", "type", "amount", "balance", "meta"])?;

        let mut count = 0;
        for tx in history {
            csv_writer.write_record([
                tx.time.format("%Y-%m-%d %H:%M:%S").to_string(),
                tx.kind.as_str().to_string(),
                format_cents(tx.amount),
                format_cents(tx.balance),
                tx.meta.clone(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }
}
