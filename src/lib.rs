//! # Bookkeeping Core
//!
//! A batch double-entry bookkeeping library: semicolon-delimited
//! transaction batches go in, a validated and internally consistent
//! posting set with automatic VAT entries comes out.
//!
//! ## Features
//!
//! - **Batch ingestion**: header-checked batch files with per-line parsing
//!   and aggregated error reporting; a batch lands completely or not at all
//! - **Chart of accounts**: operating, status and sum accounts loaded from
//!   `nr;navn;type;moms` records
//! - **Shorthand expansion**: counter-account offsets and opening-balance
//!   (primo) entries expanded into fully balanced postings
//! - **VAT generation**: VAT included in posted amounts is extracted to
//!   clearing accounts when the ledger is finalized
//! - **Balances and reports**: per-account balance queries with plain-text,
//!   CSV and HTML renderers
//!
//! ## Quick Start
//!
//! ```rust
//! use bookkeeping_core::{AccountRegistry, LedgerEngine, Period};
//! use bigdecimal::BigDecimal;
//!
//! let registry = AccountRegistry::load(
//!     "1000;Kasse;status;INGEN\n1100;Salg;drift;INGEN\n",
//! ).unwrap();
//! let period = Period::load(
//!     "Demo ApS;01-01-2025;31-12-2025;0;0;0\n",
//! ).unwrap();
//!
//! let mut engine = LedgerEngine::new(registry, period);
//! engine.ingest_batch(
//!     "Dato;Bilagsnummer;Konto;Tekst;Beløb;Modkonto\n\
//!      15-01-2025;1;1100;Kontant salg;-500;1000\n",
//!     "kladde1",
//! ).unwrap();
//! engine.finalize().unwrap();
//!
//! assert_eq!(engine.balance_of(1000), BigDecimal::from(500));
//! assert_eq!(engine.balance_of(1100), BigDecimal::from(-500));
//! ```

pub mod ledger;
pub mod report;
pub mod tax;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use report::{BalanceReport, PostingJournal, ReportFormat};
pub use tax::vat::*;
pub use types::*;
