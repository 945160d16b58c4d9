//! Semicolon-delimited CSV report rendering, matching the input file conventions

use std::io::Write;

use csv::WriterBuilder;

use crate::report::{BalanceReport, PostingJournal, ReportFormat};
use crate::types::LedgerResult;
use crate::utils::validation::DATE_FORMAT;

/// CSV output with `;` as the field delimiter
pub struct Csv;

impl ReportFormat for Csv {
    fn write_balances<W: Write>(w: W, report: &BalanceReport) -> LedgerResult<()> {
        let mut writer = WriterBuilder::new().delimiter(b';').from_writer(w);
        writer.write_record(["Konto", "Navn", "Type", "Saldo"])?;
        for line in &report.lines {
            writer.write_record([
                line.account.to_string(),
                line.name.clone(),
                line.kind.to_string(),
                line.balance.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_journal<W: Write>(w: W, journal: &PostingJournal) -> LedgerResult<()> {
        let mut writer = WriterBuilder::new().delimiter(b';').from_writer(w);
        writer.write_record(["Dato", "Bilagsnummer", "Konto", "Tekst", "Beløb", "Kilde"])?;
        for entry in &journal.entries {
            let posting = &entry.posting;
            writer.write_record([
                posting.date.format(DATE_FORMAT).to_string(),
                posting.voucher.to_string(),
                posting.account.to_string(),
                posting.text.clone(),
                posting.amount.to_string(),
                posting.source_batch.clone(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}
