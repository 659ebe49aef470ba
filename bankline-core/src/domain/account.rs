//! Account domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account product type. Fixed set - the console only opens these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Checking,
    Business,
    FixedDeposit,
}

impl AccountType {
    pub const ALL: [AccountType; 4] = [
        AccountType::Savings,
        AccountType::Checking,
        AccountType::Business,
        AccountType::FixedDeposit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Checking => "Checking",
            AccountType::Business => "Business",
            AccountType::FixedDeposit => "FixedDeposit",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    /// Accepts the canonical names case-insensitively, plus the common
    /// "fixed-deposit" / "fixed_deposit" spellings from CLI input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "savings" => Ok(AccountType::Savings),
            "checking" => Ok(AccountType::Checking),
            "business" => Ok(AccountType::Business),
            "fixeddeposit" => Ok(AccountType::FixedDeposit),
            _ => Err(format!("unknown account type: {}", s)),
        }
    }
}

/// A customer account
///
/// `balance` is mutated only by the transaction engine (and by the initial
/// funding written at creation). Transactions are queried on demand by
/// `account_id` - never held as a nested collection on the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    /// Unique external identifier, `ACC` + zero-padded sequence
    pub account_number: String,
    pub holder_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub account_type: AccountType,
    pub balance: Decimal,
    /// Argon2id PHC string - never cleartext
    #[serde(skip_serializing, default)]
    pub pin_hash: String,
    /// False means soft-deleted
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
}

/// Mutable profile fields, used for account opening and profile updates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountProfile {
    pub holder_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl AccountProfile {
    /// Validate profile data: all fields present, email and phone shaped
    /// plausibly. Intentionally loose - this is a presence/format check,
    /// not address verification.
    pub fn validate(&self) -> Result<(), String> {
        if self.holder_name.trim().is_empty() {
            return Err("Account holder name is required.".to_string());
        }
        if self.address.trim().is_empty() {
            return Err("Address is required.".to_string());
        }
        let email_re = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
        if !email_re.is_match(self.email.trim()) {
            return Err("Invalid email address.".to_string());
        }
        let phone_re = Regex::new(r"^[0-9+\-() ]{7,20}$").unwrap();
        if !phone_re.is_match(self.phone.trim()) {
            return Err("Invalid phone number.".to_string());
        }
        Ok(())
    }
}

/// Validate a plaintext PIN before hashing: exactly four digits
pub(crate) fn validate_pin(pin: &str) -> Result<(), String> {
    if pin.len() != 4 || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err("PIN must be exactly 4 digits.".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_profile() -> AccountProfile {
        AccountProfile {
            holder_name: "John Doe".to_string(),
            email: "john.doe@email.com".to_string(),
            phone: "555-0101".to_string(),
            address: "123 Main St, City, State 12345".to_string(),
        }
    }

    #[test]
    fn test_profile_validation() {
        assert!(valid_profile().validate().is_ok());

        let mut p = valid_profile();
        p.holder_name = "  ".to_string();
        assert!(p.validate().is_err());

        let mut p = valid_profile();
        p.email = "not-an-email".to_string();
        assert!(p.validate().is_err());

        let mut p = valid_profile();
        p.phone = "call me".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_pin_validation() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("12345").is_err());
        assert!(validate_pin("12a4").is_err());
    }

    #[test]
    fn test_account_type_parsing() {
        assert_eq!("savings".parse::<AccountType>().unwrap(), AccountType::Savings);
        assert_eq!("Checking".parse::<AccountType>().unwrap(), AccountType::Checking);
        assert_eq!(
            "fixed-deposit".parse::<AccountType>().unwrap(),
            AccountType::FixedDeposit
        );
        assert!("gold".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_account_type_roundtrip() {
        for t in AccountType::ALL {
            assert_eq!(t.as_str().parse::<AccountType>().unwrap(), t);
        }
    }
}
