//! Core types and data structures for the bookkeeping engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account kinds in the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountKind {
    /// Operating account - income-statement activity (file code `drift`)
    Operating,
    /// Status account - balance-sheet positions carried across periods (file code `status`)
    Status,
    /// Sum account - reporting header totalling the accounts in `from..=to` (file code `sum:<from>-<til>`)
    SumRange {
        /// First account number of the summed range
        from: u32,
        /// Last account number of the summed range
        to: u32,
    },
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKind::Operating => write!(f, "drift"),
            AccountKind::Status => write!(f, "status"),
            AccountKind::SumRange { from, to } => write!(f, "sum:{}-{}", from, to),
        }
    }
}

/// VAT treatment of postings on an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VatCode {
    /// No VAT handling (file code `INGEN`)
    None,
    /// Purchase-side VAT, extracted to the input-VAT clearing account (file code `INDG`)
    Input,
    /// Sales-side VAT, extracted to the output-VAT clearing account (file code `UDG`)
    Output,
}

impl fmt::Display for VatCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VatCode::None => write!(f, "INGEN"),
            VatCode::Input => write!(f, "INDG"),
            VatCode::Output => write!(f, "UDG"),
        }
    }
}

/// One account from the chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account number, unique within the chart, range 1..=1_000_000
    pub number: u32,
    /// Human-readable account name
    pub name: String,
    /// Kind of account (Operating, Status or SumRange)
    pub kind: AccountKind,
    /// VAT code; always `VatCode::None` for Status accounts
    pub vat_code: VatCode,
}

impl Account {
    /// Create a new account
    pub fn new(number: u32, name: impl Into<String>, kind: AccountKind, vat_code: VatCode) -> Self {
        Self {
            number,
            name: name.into(),
            kind,
            vat_code,
        }
    }
}

/// Accounting-period metadata: date span, VAT rate and VAT clearing accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// Name of the accounting entity or period
    pub name: String,
    /// First day of the period (inclusive)
    pub from: NaiveDate,
    /// Last day of the period (inclusive)
    pub to: NaiveDate,
    /// VAT rate as a decimal fraction (0.25 = 25%); zero disables VAT generation
    pub vat_rate: BigDecimal,
    /// Clearing account receiving extracted purchase VAT; 0 when `vat_rate` is zero
    pub input_vat_account: u32,
    /// Clearing account receiving extracted sales VAT; 0 when `vat_rate` is zero
    pub output_vat_account: u32,
}

impl Period {
    /// Whether a date falls inside the period (both bounds inclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && date <= self.to
    }

    /// Whether the period carries a non-zero VAT rate
    pub fn has_vat(&self) -> bool {
        self.vat_rate != BigDecimal::from(0)
    }
}

/// One parsed line from a batch file, before validation and expansion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Posting date; blank only for primo records, later substituted with the period start
    pub date: Option<NaiveDate>,
    /// Voucher number, non-zero, range -1_000_000..=1_000_000; negative marks a primo entry
    pub voucher: i64,
    /// Target account number
    pub account: u32,
    /// Posting text, 3..=200 chars
    pub text: String,
    /// Signed amount; positive = debit, negative = credit
    pub amount: BigDecimal,
    /// Counter account; presence triggers expansion into an offsetting posting
    pub counter_account: Option<u32>,
    /// Label of the batch this record came from
    pub source_batch: String,
}

impl RawRecord {
    /// Whether this record is an opening-balance (primo) entry
    pub fn is_primo(&self) -> bool {
        self.voucher < 0
    }
}

/// How a posting entered the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostingOrigin {
    /// Taken directly from a batch line
    Manual,
    /// Synthesized offsetting posting from a record's counter account
    CounterAccount,
    /// Synthesized by VAT generation during finalize
    VatGenerated,
    /// Opening-balance entry carried in from a prior period
    Primo,
}

/// One final, expanded, immutable ledger posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Posting date, always within the accounting period
    pub date: NaiveDate,
    /// Voucher number carried from the originating record
    pub voucher: i64,
    /// Target account number, always present in the chart
    pub account: u32,
    /// Posting text
    pub text: String,
    /// Signed amount; positive = debit, negative = credit
    pub amount: BigDecimal,
    /// Label of the originating batch, or `"Autogenereret"` for VAT postings
    pub source_batch: String,
    /// How the posting entered the ledger
    pub origin: PostingOrigin,
}

/// A defect in a single batch line, reported with its 1-based line number
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct RecordError {
    pub line: u64,
    pub kind: RecordErrorKind,
}

/// Reasons a batch line can be rejected
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordErrorKind {
    #[error("expected 5 or 6 fields, found {found}")]
    FieldCount { found: usize },
    #[error("field `{field}` has unparseable value `{value}`")]
    Unparseable { field: &'static str, value: String },
    #[error("date is blank but only primo records may leave it empty")]
    MissingDate,
    #[error("voucher number {voucher} is zero or outside -1000000..=1000000")]
    VoucherOutOfRange { voucher: i64 },
    #[error("text is {length} chars long, allowed range is 3..=200")]
    TextLength { length: usize },
    #[error("amount must be non-zero")]
    ZeroAmount,
    #[error("account {number} does not exist in the chart of accounts")]
    UnknownAccount { number: u32 },
    #[error("date {date} falls outside the accounting period")]
    DateOutOfPeriod { date: NaiveDate },
    #[error("primo posting targets account {account}, which is not a status account")]
    PrimoOnNonStatusAccount { account: u32 },
}

/// Errors that can occur in the bookkeeping engine
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("batch `{batch}`: first line does not match the expected column header")]
    MalformedBatch { batch: String },
    #[error("batch `{batch}` rejected with {} defective record(s)", .errors.len())]
    InvalidRecords {
        batch: String,
        errors: Vec<RecordError>,
    },
    #[error("batch `{batch}` does not balance: posting sum is {sum}")]
    UnbalancedBatch { batch: String, sum: BigDecimal },
    #[error("duplicate account number {number} in the chart of accounts")]
    DuplicateAccount { number: u32 },
    #[error("chart of accounts line {line}: malformed record")]
    MalformedRecord { line: u64 },
    #[error("chart of accounts line {line}: field `{field}` has invalid value `{value}`")]
    InvalidFieldValue {
        line: u64,
        field: &'static str,
        value: String,
    },
    #[error("invalid accounting period: {0}")]
    InvalidPeriod(String),
    #[error("invalid VAT account configuration: {0}")]
    InvalidVatAccountConfig(String),
    #[error("generated VAT posting on account {account} is invalid: {reason}")]
    InvalidGeneratedPosting {
        account: u32,
        reason: RecordErrorKind,
    },
    #[error("ledger is already finalized")]
    AlreadyFinalized,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for bookkeeping operations
pub type LedgerResult<T> = Result<T, LedgerError>;
