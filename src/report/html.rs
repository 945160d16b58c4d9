//! Standalone HTML report rendering

use std::io;
use std::io::Write;

use crate::report::{BalanceReport, PostingJournal, ReportFormat};
use crate::types::LedgerResult;
use crate::utils::validation::DATE_FORMAT;

/// HTML table output, one self-contained document per report
pub struct Html;

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn write_head<W: Write>(w: &mut W, title: &str) -> io::Result<()> {
    writeln!(w, "<!DOCTYPE html>")?;
    writeln!(w, "<html lang=\"da\">")?;
    writeln!(
        w,
        "<head><meta charset=\"utf-8\"><title>{}</title></head>",
        escape(title)
    )?;
    writeln!(w, "<body>")?;
    writeln!(w, "<h1>{}</h1>", escape(title))?;
    writeln!(w, "<table>")
}

fn write_foot<W: Write>(w: &mut W) -> io::Result<()> {
    writeln!(w, "</table>")?;
    writeln!(w, "</body>")?;
    writeln!(w, "</html>")
}

impl ReportFormat for Html {
    fn write_balances<W: Write>(mut w: W, report: &BalanceReport) -> LedgerResult<()> {
        write_head(&mut w, &format!("Saldobalance: {}", report.period_name))?;
        writeln!(
            w,
            "<tr><th>Konto</th><th>Navn</th><th>Type</th><th>Saldo</th></tr>"
        )?;
        for line in &report.lines {
            writeln!(
                w,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                line.account,
                escape(&line.name),
                line.kind,
                line.balance
            )?;
        }
        writeln!(
            w,
            "<tr><td></td><td>I alt</td><td></td><td>{}</td></tr>",
            report.total()
        )?;
        write_foot(&mut w)?;
        Ok(())
    }

    fn write_journal<W: Write>(mut w: W, journal: &PostingJournal) -> LedgerResult<()> {
        write_head(&mut w, &format!("Posteringsjournal: {}", journal.period_name))?;
        writeln!(
            w,
            "<tr><th>Dato</th><th>Bilag</th><th>Konto</th><th>Tekst</th><th>Beløb</th><th>Kilde</th></tr>"
        )?;
        for entry in &journal.entries {
            let posting = &entry.posting;
            writeln!(
                w,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                posting.date.format(DATE_FORMAT),
                posting.voucher,
                posting.account,
                escape(&posting.text),
                posting.amount,
                escape(&posting.source_batch)
            )?;
        }
        write_foot(&mut w)?;
        Ok(())
    }
}
