//! Tax handling: automatic VAT posting generation

pub mod vat;

pub use vat::*;
