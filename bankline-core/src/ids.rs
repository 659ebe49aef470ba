//! External identifier formatting
//!
//! Account and transaction numbers are formatted from numeric ids drawn
//! from DuckDB sequences (see `adapters::duckdb`), so uniqueness and
//! monotonicity are enforced at the persistence boundary rather than by a
//! read-max-plus-one query.

/// `ACC` + zero-padded numeric id, minimum 3 digits
pub fn account_number(id: i64) -> String {
    format!("ACC{:03}", id)
}

/// `TXN` + zero-padded numeric id, minimum 6 digits
pub fn transaction_number(id: i64) -> String {
    format!("TXN{:06}", id)
}

/// Numeric suffix of an account or transaction number, if well-formed
pub fn numeric_suffix(number: &str) -> Option<i64> {
    number.trim_start_matches(|c: char| c.is_ascii_alphabetic()).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_number_padding() {
        assert_eq!(account_number(1), "ACC001");
        assert_eq!(account_number(42), "ACC042");
        assert_eq!(account_number(999), "ACC999");
        // Width grows naturally past the padded minimum
        assert_eq!(account_number(1000), "ACC1000");
    }

    #[test]
    fn test_transaction_number_padding() {
        assert_eq!(transaction_number(1), "TXN000001");
        assert_eq!(transaction_number(123456), "TXN123456");
        assert_eq!(transaction_number(1234567), "TXN1234567");
    }

    #[test]
    fn test_numeric_suffix() {
        assert_eq!(numeric_suffix("ACC007"), Some(7));
        assert_eq!(numeric_suffix("TXN000123"), Some(123));
        assert_eq!(numeric_suffix("garbage"), None);
    }
}
