//! Report rendering over the ledger's posting list and balance lookup
//!
//! Renderers carry no business rules of their own; they format data the
//! engine already produced. Each output format implements [`ReportFormat`]
//! over any `std::io::Write` sink.

pub mod csv;
pub mod html;
pub mod text;

pub use self::csv::Csv;
pub use self::html::Html;
pub use self::text::Text;

use std::io::Write;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::ledger::engine::LedgerEngine;
use crate::types::{AccountKind, LedgerResult, Posting};

/// Rendering of ledger reports to an output sink
pub trait ReportFormat {
    /// Render per-account balances
    fn write_balances<W: Write>(w: W, report: &BalanceReport) -> LedgerResult<()>;

    /// Render the full posting journal
    fn write_journal<W: Write>(w: W, journal: &PostingJournal) -> LedgerResult<()>;
}

/// One line of a balance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceLine {
    pub account: u32,
    pub name: String,
    pub kind: AccountKind,
    pub balance: BigDecimal,
}

/// Per-account balances in account-number order
///
/// Sum accounts carry the total of all postings on account numbers in
/// their range instead of a balance of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub period_name: String,
    pub lines: Vec<BalanceLine>,
}

impl BalanceReport {
    /// Build the report from an engine's chart and accumulated postings
    pub fn from_engine(engine: &LedgerEngine) -> Self {
        let lines = engine
            .registry()
            .all()
            .map(|account| {
                let balance = match account.kind {
                    AccountKind::SumRange { from, to } => engine
                        .postings()
                        .iter()
                        .filter(|p| p.account >= from && p.account <= to)
                        .map(|p| &p.amount)
                        .sum(),
                    _ => engine.balance_of(account.number),
                };
                BalanceLine {
                    account: account.number,
                    name: account.name.clone(),
                    kind: account.kind,
                    balance,
                }
            })
            .collect();

        Self {
            period_name: engine.period().name.clone(),
            lines,
        }
    }

    /// Sum of all non-sum lines; zero for a finalized ledger
    pub fn total(&self) -> BigDecimal {
        self.lines
            .iter()
            .filter(|line| !matches!(line.kind, AccountKind::SumRange { .. }))
            .map(|line| &line.balance)
            .sum()
    }
}

/// One journal entry: a posting joined with its account name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub posting: Posting,
    pub account_name: String,
}

/// Every posting in accumulation order, with account names resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingJournal {
    pub period_name: String,
    pub entries: Vec<JournalEntry>,
}

impl PostingJournal {
    /// Build the journal from an engine's postings
    pub fn from_engine(engine: &LedgerEngine) -> Self {
        let entries = engine
            .postings()
            .iter()
            .map(|posting| JournalEntry {
                account_name: engine
                    .registry()
                    .lookup(posting.account)
                    .map(|account| account.name.clone())
                    .unwrap_or_default(),
                posting: posting.clone(),
            })
            .collect();

        Self {
            period_name: engine.period().name.clone(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::batch::BATCH_HEADER;
    use crate::ledger::chart::AccountRegistry;
    use crate::types::{Account, Period, VatCode};
    use chrono::NaiveDate;

    fn engine_with_postings() -> LedgerEngine {
        let registry = AccountRegistry::from_accounts(vec![
            Account::new(1000, "Kasse", AccountKind::Status, VatCode::None),
            Account::new(2000, "Egenkapital", AccountKind::Status, VatCode::None),
            Account::new(5000, "Salg", AccountKind::Operating, VatCode::None),
            Account::new(5100, "Gebyrer", AccountKind::Operating, VatCode::None),
            Account::new(
                5900,
                "Omsætning i alt",
                AccountKind::SumRange { from: 5000, to: 5899 },
                VatCode::None,
            ),
        ])
        .unwrap();
        let period = Period {
            name: "Regnskab 2025".to_string(),
            from: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            vat_rate: BigDecimal::from(0),
            input_vat_account: 0,
            output_vat_account: 0,
        };

        let mut engine = LedgerEngine::new(registry, period);
        let content = format!(
            "{BATCH_HEADER}\n\
             10-02-2025;1;5000;Salg af varer;-700;1000\n\
             11-02-2025;2;5100;Ekspeditionsgebyr;-300;1000\n"
        );
        engine.ingest_batch(&content, "kladde1").unwrap();
        engine.finalize().unwrap();
        engine
    }

    #[test]
    fn test_balance_report_lines_follow_chart_order() {
        let engine = engine_with_postings();
        let report = BalanceReport::from_engine(&engine);

        let numbers: Vec<u32> = report.lines.iter().map(|l| l.account).collect();
        assert_eq!(numbers, vec![1000, 2000, 5000, 5100, 5900]);
        assert_eq!(report.period_name, "Regnskab 2025");
    }

    #[test]
    fn test_sum_account_totals_its_range() {
        let engine = engine_with_postings();
        let report = BalanceReport::from_engine(&engine);

        let sum_line = report.lines.iter().find(|l| l.account == 5900).unwrap();
        assert_eq!(sum_line.balance, BigDecimal::from(-1000));

        let cash = report.lines.iter().find(|l| l.account == 1000).unwrap();
        assert_eq!(cash.balance, BigDecimal::from(1000));
    }

    #[test]
    fn test_report_total_excludes_sum_lines() {
        let engine = engine_with_postings();
        let report = BalanceReport::from_engine(&engine);
        assert_eq!(report.total(), BigDecimal::from(0));
    }

    #[test]
    fn test_journal_resolves_account_names() {
        let engine = engine_with_postings();
        let journal = PostingJournal::from_engine(&engine);

        assert_eq!(journal.entries.len(), 4);
        assert_eq!(journal.entries[0].account_name, "Salg");
        assert_eq!(journal.entries[1].account_name, "Kasse");
    }
}
