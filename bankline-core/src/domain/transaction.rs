//! Transaction domain model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of monetary operation recorded against an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    InterestCredit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Transfer => "Transfer",
            TransactionType::InterestCredit => "InterestCredit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            "transfer" => Ok(TransactionType::Transfer),
            "interestcredit" => Ok(TransactionType::InterestCredit),
            _ => Err(format!("unknown transaction type: {}", s)),
        }
    }
}

/// An immutable audit record of a single balance change
///
/// Created exactly once per monetary operation (twice for a transfer, one
/// per account). There is no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    /// Unique external identifier, `TXN` + zero-padded sequence
    pub transaction_number: String,
    /// Owning account
    pub account_id: i64,
    pub tx_type: TransactionType,
    /// Always positive; the type and (for transfers) the record's side
    /// determine the balance effect
    pub amount: Decimal,
    /// The owning account's balance immediately after this transaction was
    /// applied. A point-in-time snapshot, never recomputed.
    pub balance_after: Decimal,
    pub description: Option<String>,
    /// Counterparty account number - Transfer records only
    pub to_account_number: Option<String>,
    pub transaction_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parsing() {
        assert_eq!("deposit".parse::<TransactionType>().unwrap(), TransactionType::Deposit);
        assert_eq!(
            "interest-credit".parse::<TransactionType>().unwrap(),
            TransactionType::InterestCredit
        );
        assert!("payment".parse::<TransactionType>().is_err());
    }
}
