//! The ledger engine: batch ingestion, expansion, VAT generation and balances

use std::fs;
use std::path::Path;

use bigdecimal::BigDecimal;
use tracing::{debug, info};

use crate::ledger::batch::{parse_batch, BatchLine};
use crate::ledger::chart::AccountRegistry;
use crate::tax::vat::vat_postings_for;
use crate::types::{
    AccountKind, LedgerError, LedgerResult, Period, Posting, PostingOrigin, RawRecord,
    RecordError, RecordErrorKind, VatCode,
};
use crate::utils::validation::{validate_amount, validate_text, validate_voucher};

/// Text prefix marking opening-balance postings
pub const PRIMO_TEXT_PREFIX: &str = "PRIMO: ";

/// Engine lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Empty,
    Ingesting,
    Finalized,
}

/// The batch bookkeeping engine
///
/// Owns the growing posting collection for one run. Batches are ingested
/// one at a time through the validation and expansion pipeline; a batch
/// either lands completely or not at all, and earlier batches are never
/// rolled back. `finalize` runs VAT generation exactly once and freezes
/// the ledger; afterwards `postings` and `balance_of` are the contractual
/// read surface.
pub struct LedgerEngine {
    registry: AccountRegistry,
    period: Period,
    postings: Vec<Posting>,
    state: EngineState,
}

impl LedgerEngine {
    /// Create an engine over a validated chart of accounts and period
    pub fn new(registry: AccountRegistry, period: Period) -> Self {
        Self {
            registry,
            period,
            postings: Vec::new(),
            state: EngineState::Empty,
        }
    }

    /// The chart of accounts this engine validates against
    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    /// The accounting period this engine validates against
    pub fn period(&self) -> &Period {
        &self.period
    }

    /// Whether `finalize` has completed successfully
    pub fn is_finalized(&self) -> bool {
        self.state == EngineState::Finalized
    }

    /// Ingest one batch of raw transaction lines
    ///
    /// Pipeline: header check, per-line parse (defects aggregated),
    /// per-record validation against chart and period (defects
    /// aggregated), counter-account expansion, exact zero-sum check,
    /// accumulation. Any failure rejects this batch as a whole and
    /// leaves previously ingested batches untouched.
    pub fn ingest_batch(&mut self, content: &str, label: &str) -> LedgerResult<()> {
        if self.state == EngineState::Finalized {
            return Err(LedgerError::AlreadyFinalized);
        }

        let lines = parse_batch(content, label)?;
        self.check_batch(&lines, label)?;

        let expanded = self.expand_batch(lines);
        let sum: BigDecimal = expanded.iter().map(|p| &p.amount).sum();
        if sum != BigDecimal::from(0) {
            return Err(LedgerError::UnbalancedBatch {
                batch: label.to_string(),
                sum,
            });
        }

        info!(batch = %label, postings = expanded.len(), "batch ingested");
        self.postings.extend(expanded);
        self.state = EngineState::Ingesting;

        Ok(())
    }

    /// Ingest every regular file in a directory as one batch each
    ///
    /// Files are processed in lexicographic file-name order and labeled
    /// with their file name, keeping generated postings and report
    /// ordering reproducible across runs. Stops at the first failing
    /// batch; batches ingested before it remain.
    pub fn ingest_dir(&mut self, dir: impl AsRef<Path>) -> LedgerResult<()> {
        if self.state == EngineState::Finalized {
            return Err(LedgerError::AlreadyFinalized);
        }

        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        for path in &paths {
            let label = match path.file_name() {
                Some(name) => name.to_string_lossy().into_owned(),
                None => continue,
            };
            debug!(file = %label, "ingesting batch file");
            let content = fs::read_to_string(path)?;
            self.ingest_batch(&content, &label)?;
        }

        Ok(())
    }

    /// Run VAT generation and freeze the ledger
    ///
    /// Generation walks a snapshot of the accumulated postings, so its
    /// own output is never taxed again. Every generated posting is
    /// re-validated; one failure aborts finalize with nothing appended.
    /// A second call fails with `AlreadyFinalized`.
    pub fn finalize(&mut self) -> LedgerResult<&[Posting]> {
        if self.state == EngineState::Finalized {
            return Err(LedgerError::AlreadyFinalized);
        }

        if self.period.has_vat() {
            let generated = self.generate_vat_postings()?;
            info!(generated = generated.len(), "VAT postings appended");
            self.postings.extend(generated);
        }

        self.state = EngineState::Finalized;
        debug!(postings = self.postings.len(), "ledger finalized");

        Ok(&self.postings)
    }

    /// Sum of all posting amounts on one account
    ///
    /// Contractual after `finalize`; before that it reflects only the
    /// batches ingested so far.
    pub fn balance_of(&self, account: u32) -> BigDecimal {
        self.postings
            .iter()
            .filter(|p| p.account == account)
            .map(|p| &p.amount)
            .sum()
    }

    /// All postings in accumulation order
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    fn check_batch(&self, lines: &[BatchLine], label: &str) -> LedgerResult<()> {
        let mut errors = Vec::new();
        for parsed in lines {
            if let Err(kind) = self.check_record(&parsed.record) {
                errors.push(RecordError {
                    line: parsed.line,
                    kind,
                });
            }
        }

        if !errors.is_empty() {
            return Err(LedgerError::InvalidRecords {
                batch: label.to_string(),
                errors,
            });
        }

        Ok(())
    }

    /// Field-range and cross-entity rules for one record; the first
    /// violated rule is reported
    fn check_record(&self, record: &RawRecord) -> Result<(), RecordErrorKind> {
        validate_voucher(record.voucher)?;
        validate_text(&record.text)?;
        validate_amount(&record.amount)?;

        match record.date {
            Some(date) if !self.period.contains(date) => {
                return Err(RecordErrorKind::DateOutOfPeriod { date });
            }
            None if !record.is_primo() => return Err(RecordErrorKind::MissingDate),
            _ => {}
        }

        let account = self
            .registry
            .lookup(record.account)
            .ok_or(RecordErrorKind::UnknownAccount {
                number: record.account,
            })?;
        let counter = match record.counter_account {
            Some(number) => Some(
                self.registry
                    .lookup(number)
                    .ok_or(RecordErrorKind::UnknownAccount { number })?,
            ),
            None => None,
        };

        if record.is_primo() {
            if account.kind != AccountKind::Status {
                return Err(RecordErrorKind::PrimoOnNonStatusAccount {
                    account: record.account,
                });
            }
            if let Some(counter) = counter {
                if counter.kind != AccountKind::Status {
                    return Err(RecordErrorKind::PrimoOnNonStatusAccount {
                        account: counter.number,
                    });
                }
            }
        }

        Ok(())
    }

    /// Turn validated records into postings: primo date substitution and
    /// text prefixing, then counter-account expansion
    fn expand_batch(&self, lines: Vec<BatchLine>) -> Vec<Posting> {
        let mut postings = Vec::new();
        for BatchLine { record, .. } in lines {
            let origin = if record.is_primo() {
                PostingOrigin::Primo
            } else {
                PostingOrigin::Manual
            };
            let (date, text) = match record.date {
                Some(date) => (date, record.text),
                // Only primo records reach this arm; validated above.
                None => (
                    self.period.from,
                    format!("{}{}", PRIMO_TEXT_PREFIX, record.text),
                ),
            };

            if let Some(counter) = record.counter_account {
                postings.push(Posting {
                    date,
                    voucher: record.voucher,
                    account: record.account,
                    text: text.clone(),
                    amount: record.amount.clone(),
                    source_batch: record.source_batch.clone(),
                    origin,
                });
                postings.push(Posting {
                    date,
                    voucher: record.voucher,
                    account: counter,
                    text,
                    amount: -record.amount,
                    source_batch: record.source_batch,
                    origin: PostingOrigin::CounterAccount,
                });
            } else {
                postings.push(Posting {
                    date,
                    voucher: record.voucher,
                    account: record.account,
                    text,
                    amount: record.amount,
                    source_batch: record.source_batch,
                    origin,
                });
            }
        }

        postings
    }

    fn generate_vat_postings(&self) -> LedgerResult<Vec<Posting>> {
        let mut generated = Vec::new();
        for source in &self.postings {
            let account = match self.registry.lookup(source.account) {
                Some(account) => account,
                None => continue,
            };
            let clearing_account = match account.vat_code {
                VatCode::None => continue,
                VatCode::Input => self.period.input_vat_account,
                VatCode::Output => self.period.output_vat_account,
            };

            if let Some((on_account, on_clearing)) =
                vat_postings_for(source, &self.period.vat_rate, clearing_account)
            {
                generated.push(on_account);
                generated.push(on_clearing);
            }
        }

        for posting in &generated {
            self.check_generated(posting)
                .map_err(|reason| LedgerError::InvalidGeneratedPosting {
                    account: posting.account,
                    reason,
                })?;
        }

        Ok(generated)
    }

    /// Re-validate a generated posting with the record rule set
    ///
    /// The text rule is satisfied by the already-validated source text;
    /// the primo special-case never applies to generated postings.
    fn check_generated(&self, posting: &Posting) -> Result<(), RecordErrorKind> {
        validate_voucher(posting.voucher)?;
        validate_amount(&posting.amount)?;

        if !self.registry.contains(posting.account) {
            return Err(RecordErrorKind::UnknownAccount {
                number: posting.account,
            });
        }

        if !self.period.contains(posting.date) {
            return Err(RecordErrorKind::DateOutOfPeriod { date: posting.date });
        }

        Ok(())
    }
}
