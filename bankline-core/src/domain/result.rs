//! Result and error types for the core library

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which side of a transfer a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Source,
    Destination,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Party::Source => f.write_str("Source"),
            Party::Destination => f.write_str("Destination"),
        }
    }
}

/// Core error taxonomy. `Display` is the exact user-facing message; callers
/// print it verbatim.
#[derive(Error, Debug)]
pub enum Error {
    /// Amount was zero or negative. The operation noun keeps the original
    /// console wording ("Deposit", "Withdrawal", "Transfer").
    #[error("{op} amount must be greater than zero.")]
    InvalidAmount { op: &'static str },

    #[error("Cannot transfer to the same account.")]
    SameAccount,

    #[error("Account not found or inactive.")]
    AccountNotFound,

    #[error("{side} account not found or inactive.")]
    TransferAccountNotFound { side: Party },

    #[error("Insufficient funds.")]
    InsufficientFunds,

    #[error("Insufficient funds in source account.")]
    InsufficientSourceFunds,

    #[error("Transfer failed. Please try again.")]
    TransferFailed,

    /// Deliberately does not reveal whether the account number or the PIN
    /// was wrong.
    #[error("Invalid account number or PIN.")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidProfile(String),

    #[error("Service temporarily unavailable. Please try again.")]
    Persistence(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Persistence(format!("{:#}", err))
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Success message for an operation's structured result
pub trait Summarize {
    fn summary(&self) -> String;
}

/// Operation result with a display-ready message, for CLI/API callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a failed result
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

impl<T: Summarize> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => {
                let message = data.summary();
                Self::ok(message, data)
            }
            Err(e) => Self::fail(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Receipt;

    impl Summarize for Receipt {
        fn summary(&self) -> String {
            "done".to_string()
        }
    }

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<Receipt> = Ok(Receipt).into();
        assert!(result.success);
        assert_eq!(result.message, "done");
        assert!(result.data.is_some());
    }

    #[test]
    fn test_operation_result_fail_uses_display_message() {
        let result: OperationResult<Receipt> = Err(Error::InsufficientFunds).into();
        assert!(!result.success);
        assert_eq!(result.message, "Insufficient funds.");
        assert!(result.data.is_none());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::InvalidAmount { op: "Deposit" }.to_string(),
            "Deposit amount must be greater than zero."
        );
        assert_eq!(
            Error::TransferAccountNotFound { side: Party::Destination }.to_string(),
            "Destination account not found or inactive."
        );
        assert_eq!(Error::TransferFailed.to_string(), "Transfer failed. Please try again.");
    }
}
