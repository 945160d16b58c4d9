//! Accounting-period loading and validation

use bigdecimal::num_bigint::BigInt;
use bigdecimal::BigDecimal;

use crate::types::{LedgerError, LedgerResult, Period};
use crate::utils::validation::{
    account_number_in_range, parse_date, parse_decimal, MAX_NAME_LEN, MAX_PERIOD_DAYS,
};

impl Period {
    /// Parse and validate the one-line period record
    /// (`regnskabsNavn;periodeFra;periodeTil;kontoTilgodehavendeMoms;kontoSkyldigMoms;momsprocent`)
    ///
    /// The VAT rate is the sixth, required field, written as a decimal
    /// fraction (`0,25` for 25%). Whether the two VAT clearing accounts
    /// exist in the chart is not checked here; the engine defers that to
    /// VAT posting generation, where chart and period are first available
    /// together.
    pub fn load(source: &str) -> LedgerResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(source.as_bytes());

        let mut records = rdr.records();
        let record = match records.next() {
            Some(Ok(record)) => record,
            _ => {
                return Err(LedgerError::InvalidPeriod(
                    "expected exactly one period record".to_string(),
                ))
            }
        };
        if records.next().is_some() {
            return Err(LedgerError::InvalidPeriod(
                "expected exactly one period record".to_string(),
            ));
        }

        if record.len() != 6 {
            return Err(LedgerError::InvalidPeriod(format!(
                "expected 6 fields, found {}",
                record.len()
            )));
        }

        let from = parse_date(&record[1]).ok_or_else(|| {
            LedgerError::InvalidPeriod(format!("unparseable start date `{}`", &record[1]))
        })?;
        let to = parse_date(&record[2]).ok_or_else(|| {
            LedgerError::InvalidPeriod(format!("unparseable end date `{}`", &record[2]))
        })?;
        let input_vat_account = parse_account(&record[3], "kontoTilgodehavendeMoms")?;
        let output_vat_account = parse_account(&record[4], "kontoSkyldigMoms")?;
        let vat_rate = parse_decimal(&record[5]).ok_or_else(|| {
            LedgerError::InvalidPeriod(format!("unparseable VAT rate `{}`", &record[5]))
        })?;

        let period = Period {
            name: record[0].to_string(),
            from,
            to,
            vat_rate,
            input_vat_account,
            output_vat_account,
        };
        period.validate()?;

        Ok(period)
    }

    /// Validate the field constraints of an already-constructed period
    pub fn validate(&self) -> LedgerResult<()> {
        let name_len = self.name.chars().count();
        if name_len < 2 || name_len > MAX_NAME_LEN {
            return Err(LedgerError::InvalidPeriod(format!(
                "name is {} chars long, allowed range is 2..=100",
                name_len
            )));
        }

        if self.to <= self.from {
            return Err(LedgerError::InvalidPeriod(format!(
                "end date {} is not after start date {}",
                self.to, self.from
            )));
        }

        let days = (self.to - self.from).num_days();
        if days > MAX_PERIOD_DAYS {
            return Err(LedgerError::InvalidPeriod(format!(
                "period spans {} days, at most {} are allowed",
                days, MAX_PERIOD_DAYS
            )));
        }

        let half = BigDecimal::new(BigInt::from(5), 1);
        if self.vat_rate < BigDecimal::from(0) || self.vat_rate >= half {
            return Err(LedgerError::InvalidPeriod(format!(
                "VAT rate {} is outside 0..0.5",
                self.vat_rate
            )));
        }

        self.validate_vat_accounts()
    }

    fn validate_vat_accounts(&self) -> LedgerResult<()> {
        if !self.has_vat() {
            if self.input_vat_account != 0 || self.output_vat_account != 0 {
                return Err(LedgerError::InvalidVatAccountConfig(
                    "VAT clearing accounts must be 0 when the VAT rate is zero".to_string(),
                ));
            }
            return Ok(());
        }

        for (label, number) in [
            ("kontoTilgodehavendeMoms", self.input_vat_account),
            ("kontoSkyldigMoms", self.output_vat_account),
        ] {
            if !account_number_in_range(number) {
                return Err(LedgerError::InvalidVatAccountConfig(format!(
                    "{} is {}, expected an account number in 1..=1000000",
                    label, number
                )));
            }
        }

        Ok(())
    }
}

fn parse_account(value: &str, field: &str) -> LedgerResult<u32> {
    value.parse::<u32>().map_err(|_| {
        LedgerError::InvalidPeriod(format!("unparseable {} `{}`", field, value))
    })
}
