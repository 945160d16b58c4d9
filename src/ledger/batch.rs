//! Batch file parsing: header check and per-line field coercion

use crate::types::{LedgerError, LedgerResult, RawRecord, RecordError, RecordErrorKind};
use crate::utils::validation::{parse_date, parse_decimal, physical_line};

/// Canonical batch header carrying the counter-account column
pub const BATCH_HEADER: &str = "Dato;Bilagsnummer;Konto;Tekst;Beløb;Modkonto";

/// Canonical batch header without the counter-account column
pub const BATCH_HEADER_SHORT: &str = "Dato;Bilagsnummer;Konto;Tekst;Beløb";

/// One parsed data line together with its 1-based file line number
///
/// The line number survives parsing so that later validation stages can
/// still report defects against the source file.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchLine {
    pub line: u64,
    pub record: RawRecord,
}

/// Parse one batch file into raw records
///
/// The first line must equal one of the two canonical headers. Every
/// defective data line is collected with its line number and the whole
/// batch is rejected together with the full list; a batch is never
/// partially parsed. Blank lines are skipped.
pub fn parse_batch(content: &str, label: &str) -> LedgerResult<Vec<BatchLine>> {
    let header = content.lines().next().unwrap_or("");
    if header != BATCH_HEADER && header != BATCH_HEADER_SHORT {
        return Err(LedgerError::MalformedBatch {
            batch: label.to_string(),
        });
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    let mut errors = Vec::new();
    for (idx, row) in rdr.records().enumerate() {
        let fallback_line = idx as u64 + 2;
        let record = match row {
            Ok(record) => record,
            Err(err) => {
                errors.push(RecordError {
                    line: err
                        .position()
                        .map(|p| physical_line(content, p.byte()))
                        .unwrap_or(fallback_line),
                    kind: RecordErrorKind::Unparseable {
                        field: "linje",
                        value: err.to_string(),
                    },
                });
                continue;
            }
        };
        let line = record
            .position()
            .map(|p| physical_line(content, p.byte()))
            .unwrap_or(fallback_line);

        match parse_record(&record, label) {
            Ok(raw) => records.push(BatchLine { line, record: raw }),
            Err(kind) => errors.push(RecordError { line, kind }),
        }
    }

    if !errors.is_empty() {
        return Err(LedgerError::InvalidRecords {
            batch: label.to_string(),
            errors,
        });
    }

    Ok(records)
}

/// Coerce one data line into a raw record
///
/// Only field-level parsing happens here; range rules and cross-entity
/// checks run later against the chart and the period.
fn parse_record(record: &csv::StringRecord, label: &str) -> Result<RawRecord, RecordErrorKind> {
    if record.len() != 5 && record.len() != 6 {
        return Err(RecordErrorKind::FieldCount {
            found: record.len(),
        });
    }

    let date = match &record[0] {
        "" => None,
        value => Some(
            parse_date(value).ok_or_else(|| RecordErrorKind::Unparseable {
                field: "Dato",
                value: value.to_string(),
            })?,
        ),
    };

    let voucher = record[1]
        .parse::<i64>()
        .map_err(|_| RecordErrorKind::Unparseable {
            field: "Bilagsnummer",
            value: record[1].to_string(),
        })?;

    let account = record[2]
        .parse::<u32>()
        .map_err(|_| RecordErrorKind::Unparseable {
            field: "Konto",
            value: record[2].to_string(),
        })?;

    let amount = parse_decimal(&record[4]).ok_or_else(|| RecordErrorKind::Unparseable {
        field: "Beløb",
        value: record[4].to_string(),
    })?;

    let counter_account = match record.get(5) {
        None | Some("") => None,
        Some(value) => Some(
            value
                .parse::<u32>()
                .map_err(|_| RecordErrorKind::Unparseable {
                    field: "Modkonto",
                    value: value.to_string(),
                })?,
        ),
    };

    Ok(RawRecord {
        date,
        voucher,
        account,
        text: record[3].to_string(),
        amount,
        counter_account,
        source_batch: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn batch(lines: &[&str]) -> String {
        let mut content = String::from(BATCH_HEADER);
        for line in lines {
            content.push('\n');
            content.push_str(line);
        }
        content.push('\n');
        content
    }

    #[test]
    fn test_missing_header_rejected() {
        let err = parse_batch("15-01-2025;1;5000;Salg;1000\n", "kladde1").unwrap_err();
        assert!(matches!(err, LedgerError::MalformedBatch { .. }));
    }

    #[test]
    fn test_both_header_forms_accepted() {
        assert!(parse_batch(&batch(&[]), "a").unwrap().is_empty());

        let short = format!("{}\n15-01-2025;1;5000;Salg;1000\n", BATCH_HEADER_SHORT);
        assert_eq!(parse_batch(&short, "a").unwrap().len(), 1);
    }

    #[test]
    fn test_parse_full_record() {
        let content = batch(&["15-01-2025;7;5000;Kontant salg;1250,50;1000"]);
        let lines = parse_batch(&content, "kladde1").unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line, 2);
        let record = &lines[0].record;
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 1, 15));
        assert_eq!(record.voucher, 7);
        assert_eq!(record.account, 5000);
        assert_eq!(record.text, "Kontant salg");
        assert_eq!(record.amount, "1250.50".parse::<BigDecimal>().unwrap());
        assert_eq!(record.counter_account, Some(1000));
        assert_eq!(record.source_batch, "kladde1");
    }

    #[test]
    fn test_blank_date_and_empty_counter_account() {
        let content = batch(&[";-1;1000;PRIMO saldo;500;", "15-01-2025;1;5000;Salg;-500"]);
        let lines = parse_batch(&content, "kladde1").unwrap();

        assert_eq!(lines[0].record.date, None);
        assert_eq!(lines[0].record.counter_account, None);
        assert!(lines[0].record.is_primo());
        assert_eq!(lines[1].record.counter_account, None);
        assert!(!lines[1].record.is_primo());
    }

    #[test]
    fn test_decimal_separator_variants() {
        let content = batch(&[
            "15-01-2025;1;5000;Salg;-1000,25",
            "15-01-2025;1;5000;Salg;1000.25",
        ]);
        let lines = parse_batch(&content, "kladde1").unwrap();

        assert_eq!(
            lines[0].record.amount,
            "-1000.25".parse::<BigDecimal>().unwrap()
        );
        assert_eq!(
            lines[1].record.amount,
            "1000.25".parse::<BigDecimal>().unwrap()
        );
    }

    #[test]
    fn test_parse_errors_aggregate_with_line_numbers() {
        let content = batch(&[
            "15-01-2025;1;5000;Salg;1000",
            "32-01-2025;2;5000;Salg;1000",
            "15-01-2025;tre;5000;Salg;abc",
            "15-01-2025;4;5000;Salg;1000;2000;9",
        ]);
        let err = parse_batch(&content, "kladde1").unwrap_err();

        let errors = match err {
            LedgerError::InvalidRecords { batch, errors } => {
                assert_eq!(batch, "kladde1");
                errors
            }
            other => panic!("unexpected error: {other:?}"),
        };

        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].line, 3);
        assert!(matches!(
            errors[0].kind,
            RecordErrorKind::Unparseable { field: "Dato", .. }
        ));
        assert_eq!(errors[1].line, 4);
        assert!(matches!(
            errors[1].kind,
            RecordErrorKind::Unparseable {
                field: "Bilagsnummer",
                ..
            }
        ));
        assert_eq!(errors[2].line, 5);
        assert!(matches!(
            errors[2].kind,
            RecordErrorKind::FieldCount { found: 7 }
        ));
    }

    #[test]
    fn test_blank_lines_skipped() {
        let content = format!(
            "{}\n15-01-2025;1;5000;Salg;1000\n\n15-01-2025;1;1000;Salg;-1000\n",
            BATCH_HEADER
        );
        let lines = parse_batch(&content, "kladde1").unwrap();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, 2);
        assert_eq!(lines[1].line, 4);
    }

    #[test]
    fn test_error_after_blank_line_cites_physical_line() {
        let content = format!(
            "{}\n15-01-2025;1;5000;Salg;1000\n\n32-01-2025;2;5000;Salg;1000\n",
            BATCH_HEADER
        );
        let err = parse_batch(&content, "kladde1").unwrap_err();

        let errors = match err {
            LedgerError::InvalidRecords { errors, .. } => errors,
            other => panic!("unexpected error: {other:?}"),
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 4);
        assert!(matches!(
            errors[0].kind,
            RecordErrorKind::Unparseable { field: "Dato", .. }
        ));
    }

    #[test]
    fn test_mixed_separator_amount_rejected() {
        let content = batch(&["15-01-2025;1;5000;Salg;1.000,50"]);
        let err = parse_batch(&content, "kladde1").unwrap_err();

        assert!(matches!(err, LedgerError::InvalidRecords { .. }));
    }
}
