//! VAT extraction and automatic posting generation

use bigdecimal::{BigDecimal, RoundingMode};

use crate::types::{Posting, PostingOrigin};

/// Source batch label carried by every generated VAT posting
pub const VAT_BATCH_LABEL: &str = "Autogenereret";

/// Text prefix for generated VAT postings
pub const VAT_TEXT_PREFIX: &str = "Moms af ";

/// Extract the VAT portion of a VAT-inclusive amount
///
/// Computes `|amount| * rate / (1 + rate)` rounded to two decimals with
/// half-even rounding. Amounts on VAT-coded accounts are gross; this
/// recovers the tax share contained in them. The sign of `amount` is
/// ignored.
pub fn extract_vat(amount: &BigDecimal, rate: &BigDecimal) -> BigDecimal {
    let portion = amount.abs() * rate / (BigDecimal::from(1) + rate);
    portion.with_scale_round(2, RoundingMode::HalfEven)
}

/// Build the posting pair generated for one VAT-coded source posting
///
/// The first posting lands on the source posting's own account and
/// reduces its net magnitude by the VAT portion; the second mirrors the
/// portion onto the given clearing account with the opposite sign. Date
/// and voucher are carried over from the source. Returns `None` when the
/// extracted portion rounds to zero, since a zero posting cannot exist.
pub fn vat_postings_for(
    source: &Posting,
    rate: &BigDecimal,
    clearing_account: u32,
) -> Option<(Posting, Posting)> {
    let vat = extract_vat(&source.amount, rate);
    if vat == BigDecimal::from(0) {
        return None;
    }

    let correction = if source.amount >= BigDecimal::from(0) {
        -vat
    } else {
        vat
    };

    let text = format!("{}{}", VAT_TEXT_PREFIX, source.text);
    let on_account = Posting {
        date: source.date,
        voucher: source.voucher,
        account: source.account,
        text: text.clone(),
        amount: correction.clone(),
        source_batch: VAT_BATCH_LABEL.to_string(),
        origin: PostingOrigin::VatGenerated,
    };
    let on_clearing = Posting {
        date: source.date,
        voucher: source.voucher,
        account: clearing_account,
        text,
        amount: -correction,
        source_batch: VAT_BATCH_LABEL.to_string(),
        origin: PostingOrigin::VatGenerated,
    };

    Some((on_account, on_clearing))
}
