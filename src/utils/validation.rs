//! Field parsing and validation rules shared by record ingestion and the
//! chart and period loaders

use crate::types::RecordErrorKind;
use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// Highest account number allowed in the chart of accounts
pub const MAX_ACCOUNT_NUMBER: u32 = 1_000_000;

/// Largest voucher-number magnitude allowed on a record
pub const MAX_VOUCHER_NUMBER: i64 = 1_000_000;

/// Minimum posting text length, counted in chars
pub const MIN_TEXT_LEN: usize = 3;

/// Maximum posting text length, counted in chars
pub const MAX_TEXT_LEN: usize = 200;

/// Maximum account and period name length, counted in chars
pub const MAX_NAME_LEN: usize = 100;

/// Longest accounting period span, in days
pub const MAX_PERIOD_DAYS: i64 = 731;

/// Date format used by every input file (`dd-MM-yyyy`)
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Whether an account number lies in the chart's permitted range
pub fn account_number_in_range(number: u32) -> bool {
    (1..=MAX_ACCOUNT_NUMBER).contains(&number)
}

/// Parse a date in the fixed `dd-MM-yyyy` input format
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Parse a decimal that may use either `.` or `,` as its separator
///
/// Mixing both separators in one value is rejected; thousands
/// separators are not part of the input formats.
pub fn parse_decimal(value: &str) -> Option<BigDecimal> {
    if value.contains(',') && value.contains('.') {
        return None;
    }

    value.replace(',', ".").parse().ok()
}

/// 1-based physical line of a byte offset into an input file
///
/// The csv reader's own line numbers do not count skipped blank lines.
pub fn physical_line(source: &str, byte: u64) -> u64 {
    let end = (byte as usize).min(source.len());
    source.as_bytes()[..end]
        .iter()
        .filter(|&&b| b == b'\n')
        .count() as u64
        + 1
}

/// Validate a voucher number: non-zero and within range
pub fn validate_voucher(voucher: i64) -> Result<(), RecordErrorKind> {
    if voucher == 0 || voucher.unsigned_abs() > MAX_VOUCHER_NUMBER as u64 {
        return Err(RecordErrorKind::VoucherOutOfRange { voucher });
    }

    Ok(())
}

/// Validate a posting text against the length rule
///
/// The rule always applies to the original record text; presentation
/// prefixes such as `"PRIMO: "` are added after this check and never
/// count toward the cap.
pub fn validate_text(text: &str) -> Result<(), RecordErrorKind> {
    let length = text.chars().count();
    if !(MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&length) {
        return Err(RecordErrorKind::TextLength { length });
    }

    Ok(())
}

/// Validate that a posting amount is non-zero
pub fn validate_amount(amount: &BigDecimal) -> Result<(), RecordErrorKind> {
    if *amount == BigDecimal::from(0) {
        return Err(RecordErrorKind::ZeroAmount);
    }

    Ok(())
}
