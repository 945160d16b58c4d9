//! Chart of accounts loading and lookup

use std::collections::BTreeMap;

use crate::types::{Account, AccountKind, LedgerError, LedgerResult, VatCode};
use crate::utils::validation::{account_number_in_range, physical_line, MAX_NAME_LEN};

/// The validated, immutable chart of accounts
///
/// Loaded once from its source and never mutated afterwards; every
/// account lookup during ingestion and VAT generation goes through
/// this registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountRegistry {
    accounts: BTreeMap<u32, Account>,
}

impl AccountRegistry {
    /// Parse and validate a chart of accounts from its semicolon-separated
    /// source (`nr;navn;type;moms`, one account per line, no header)
    pub fn load(source: &str) -> LedgerResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(source.as_bytes());

        let mut registry = Self::default();
        for (idx, row) in rdr.records().enumerate() {
            let fallback_line = idx as u64 + 1;
            let record = row.map_err(|err| LedgerError::MalformedRecord {
                line: err
                    .position()
                    .map(|p| physical_line(source, p.byte()))
                    .unwrap_or(fallback_line),
            })?;
            let line = record
                .position()
                .map(|p| physical_line(source, p.byte()))
                .unwrap_or(fallback_line);

            if record.len() != 4 {
                return Err(LedgerError::MalformedRecord { line });
            }

            let number = parse_number(&record[0], line)?;
            let name = parse_name(&record[1], line)?;
            let kind = parse_kind(&record[2], line)?;
            let vat_code = parse_vat_code(&record[3], line)?;

            let account = Account::new(number, name, kind, vat_code);
            check_vat_invariant(&account, line)?;
            registry.insert(account)?;
        }

        Ok(registry)
    }

    /// Build a registry from already-constructed accounts, applying the
    /// same field rules as [`AccountRegistry::load`]
    ///
    /// Reported line numbers refer to the account's 1-based position in
    /// the sequence.
    pub fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> LedgerResult<Self> {
        let mut registry = Self::default();
        for (idx, account) in accounts.into_iter().enumerate() {
            check_account(&account, idx as u64 + 1)?;
            registry.insert(account)?;
        }

        Ok(registry)
    }

    fn insert(&mut self, account: Account) -> LedgerResult<()> {
        if self.accounts.contains_key(&account.number) {
            return Err(LedgerError::DuplicateAccount {
                number: account.number,
            });
        }

        self.accounts.insert(account.number, account);
        Ok(())
    }

    /// Look up an account by number
    pub fn lookup(&self, number: u32) -> Option<&Account> {
        self.accounts.get(&number)
    }

    /// Whether an account number exists in the chart
    pub fn contains(&self, number: u32) -> bool {
        self.accounts.contains_key(&number)
    }

    /// All accounts, ordered by account number
    pub fn all(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Number of accounts in the chart
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the chart is empty
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn parse_number(value: &str, line: u64) -> LedgerResult<u32> {
    let number = value
        .parse::<u32>()
        .map_err(|_| LedgerError::InvalidFieldValue {
            line,
            field: "nr",
            value: value.to_string(),
        })?;

    if !account_number_in_range(number) {
        return Err(LedgerError::InvalidFieldValue {
            line,
            field: "nr",
            value: value.to_string(),
        });
    }

    Ok(number)
}

fn parse_name(value: &str, line: u64) -> LedgerResult<String> {
    if value.is_empty() || value.chars().count() > MAX_NAME_LEN {
        return Err(LedgerError::InvalidFieldValue {
            line,
            field: "navn",
            value: value.to_string(),
        });
    }

    Ok(value.to_string())
}

fn parse_kind(value: &str, line: u64) -> LedgerResult<AccountKind> {
    match value {
        "drift" => Ok(AccountKind::Operating),
        "status" => Ok(AccountKind::Status),
        _ => parse_sum_range(value).ok_or(LedgerError::InvalidFieldValue {
            line,
            field: "type",
            value: value.to_string(),
        }),
    }
}

fn parse_sum_range(value: &str) -> Option<AccountKind> {
    let range = value.strip_prefix("sum:")?;
    let (from, to) = range.split_once('-')?;
    let from = from.parse::<u32>().ok()?;
    let to = to.parse::<u32>().ok()?;

    if from == 0 || from >= to || !account_number_in_range(to) {
        return None;
    }

    Some(AccountKind::SumRange { from, to })
}

fn parse_vat_code(value: &str, line: u64) -> LedgerResult<VatCode> {
    match value {
        "INGEN" => Ok(VatCode::None),
        "INDG" => Ok(VatCode::Input),
        "UDG" => Ok(VatCode::Output),
        _ => Err(LedgerError::InvalidFieldValue {
            line,
            field: "moms",
            value: value.to_string(),
        }),
    }
}

fn check_account(account: &Account, line: u64) -> LedgerResult<()> {
    if !account_number_in_range(account.number) {
        return Err(LedgerError::InvalidFieldValue {
            line,
            field: "nr",
            value: account.number.to_string(),
        });
    }

    if account.name.is_empty() || account.name.chars().count() > MAX_NAME_LEN {
        return Err(LedgerError::InvalidFieldValue {
            line,
            field: "navn",
            value: account.name.clone(),
        });
    }

    if let AccountKind::SumRange { from, to } = account.kind {
        if from == 0 || from >= to || !account_number_in_range(to) {
            return Err(LedgerError::InvalidFieldValue {
                line,
                field: "type",
                value: account.kind.to_string(),
            });
        }
    }

    check_vat_invariant(account, line)
}

/// Status accounts carry balances across periods and must never be VAT-coded
fn check_vat_invariant(account: &Account, line: u64) -> LedgerResult<()> {
    if account.kind == AccountKind::Status && account.vat_code != VatCode::None {
        return Err(LedgerError::InvalidFieldValue {
            line,
            field: "moms",
            value: account.vat_code.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = "\
1000;Kasse;status;INGEN
2000;Bank;status;INGEN
5000;Salg;drift;UDG
6000;Varekøb;drift;INDG
9000;Resultat;sum:5000-8999;INGEN
";

    #[test]
    fn test_load_valid_chart() {
        let registry = AccountRegistry::load(CHART).unwrap();

        assert_eq!(registry.len(), 5);
        assert_eq!(registry.lookup(5000).unwrap().name, "Salg");
        assert_eq!(registry.lookup(5000).unwrap().vat_code, VatCode::Output);
        assert_eq!(
            registry.lookup(9000).unwrap().kind,
            AccountKind::SumRange {
                from: 5000,
                to: 8999
            }
        );
        assert!(registry.lookup(4000).is_none());
    }

    #[test]
    fn test_load_is_ordered_by_number() {
        let shuffled = "5000;Salg;drift;UDG\n1000;Kasse;status;INGEN\n3000;Moms;status;INGEN\n";
        let registry = AccountRegistry::load(shuffled).unwrap();

        let numbers: Vec<u32> = registry.all().map(|a| a.number).collect();
        assert_eq!(numbers, vec![1000, 3000, 5000]);
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let source = "1000;Kasse;status;INGEN\n\n5000;Salg;drift;UDG\n";
        let registry = AccountRegistry::load(source).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_error_after_blank_line_cites_physical_line() {
        let source = "1000;Kasse;status;INGEN\n\n5000;Salg;drift;MOMS\n";
        let err = AccountRegistry::load(source).unwrap_err();

        assert!(matches!(
            err,
            LedgerError::InvalidFieldValue {
                line: 3,
                field: "moms",
                ..
            }
        ));
    }

    #[test]
    fn test_duplicate_account_number() {
        let source = "1000;Kasse;status;INGEN\n1000;Bank;status;INGEN\n";
        let err = AccountRegistry::load(source).unwrap_err();

        assert!(matches!(
            err,
            LedgerError::DuplicateAccount { number: 1000 }
        ));
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let err = AccountRegistry::load("1000;Kasse;status\n").unwrap_err();
        assert!(matches!(err, LedgerError::MalformedRecord { line: 1 }));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = AccountRegistry::load("1000;Kasse;aktiv;INGEN\n").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidFieldValue { field: "type", .. }
        ));
    }

    #[test]
    fn test_unknown_vat_code_rejected() {
        let err = AccountRegistry::load("5000;Salg;drift;MOMS\n").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidFieldValue { field: "moms", .. }
        ));
    }

    #[test]
    fn test_status_account_must_not_be_vat_coded() {
        let err = AccountRegistry::load("1000;Kasse;status;UDG\n").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidFieldValue { field: "moms", .. }
        ));
    }

    #[test]
    fn test_sum_range_bounds() {
        assert!(AccountRegistry::load("9000;Alt;sum:1-1000000;INGEN\n").is_ok());
        assert!(AccountRegistry::load("9000;Tom;sum:200-100;INGEN\n").is_err());
        assert!(AccountRegistry::load("9000;Nul;sum:0-100;INGEN\n").is_err());
        assert!(AccountRegistry::load("9000;Stor;sum:1-1000001;INGEN\n").is_err());
    }

    #[test]
    fn test_number_out_of_range() {
        let err = AccountRegistry::load("0;Nul;status;INGEN\n").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidFieldValue { field: "nr", .. }
        ));

        let err = AccountRegistry::load("1000001;Stor;status;INGEN\n").unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidFieldValue { field: "nr", .. }
        ));
    }

    #[test]
    fn test_from_accounts_checks_invariants() {
        let accounts = vec![
            Account::new(1000, "Kasse", AccountKind::Status, VatCode::None),
            Account::new(1000, "Bank", AccountKind::Status, VatCode::None),
        ];
        let err = AccountRegistry::from_accounts(accounts).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateAccount { number: 1000 }));

        let accounts = vec![Account::new(
            2000,
            "Bank",
            AccountKind::Status,
            VatCode::Input,
        )];
        assert!(AccountRegistry::from_accounts(accounts).is_err());
    }
}
