//! Plain-text report rendering

use std::io::Write;

use crate::report::{BalanceReport, PostingJournal, ReportFormat};
use crate::types::LedgerResult;
use crate::utils::validation::DATE_FORMAT;

/// Fixed-width text output for terminals and log files
pub struct Text;

impl ReportFormat for Text {
    fn write_balances<W: Write>(mut w: W, report: &BalanceReport) -> LedgerResult<()> {
        writeln!(w, "Saldobalance: {}", report.period_name)?;
        writeln!(w)?;
        writeln!(w, "{:>7}  {:<40} {:>14}", "Konto", "Navn", "Saldo")?;
        for line in &report.lines {
            writeln!(
                w,
                "{:>7}  {:<40} {:>14}",
                line.account,
                line.name,
                line.balance.to_string()
            )?;
        }
        writeln!(w)?;
        writeln!(
            w,
            "{:>7}  {:<40} {:>14}",
            "",
            "I alt",
            report.total().to_string()
        )?;
        Ok(())
    }

    fn write_journal<W: Write>(mut w: W, journal: &PostingJournal) -> LedgerResult<()> {
        writeln!(w, "Posteringsjournal: {}", journal.period_name)?;
        writeln!(w)?;
        writeln!(
            w,
            "{:<10}  {:>7}  {:>7}  {:<40} {:>14}  {}",
            "Dato", "Bilag", "Konto", "Tekst", "Beløb", "Kilde"
        )?;
        for entry in &journal.entries {
            let posting = &entry.posting;
            writeln!(
                w,
                "{:<10}  {:>7}  {:>7}  {:<40} {:>14}  {}",
                posting.date.format(DATE_FORMAT).to_string(),
                posting.voucher,
                posting.account,
                posting.text,
                posting.amount.to_string(),
                posting.source_batch
            )?;
        }
        Ok(())
    }
}
