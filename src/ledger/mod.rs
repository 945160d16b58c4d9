//! Ledger module containing batch ingestion, the chart of accounts and the posting engine

pub mod batch;
pub mod chart;
pub mod engine;
pub mod period;

pub use batch::*;
pub use chart::*;
pub use engine::*;
