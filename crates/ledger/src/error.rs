//! The module contains the errors the ledger can throw.
//!
//! Validation errors ([`InvalidAmount`], [`InsufficientFunds`], [`InvalidPin`],
//! [`SelfTransfer`]) are surfaced to the caller as-is. [`DuplicateReference`]
//! is retried internally and only escapes when regeneration keeps colliding.
//!
//! [`InvalidAmount`]: LedgerError::InvalidAmount
//! [`InsufficientFunds`]: LedgerError::InsufficientFunds
//! [`InvalidPin`]: LedgerError::InvalidPin
//! [`SelfTransfer`]: LedgerError::SelfTransfer
//! [`DuplicateReference`]: LedgerError::DuplicateReference
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Wallet frozen: {0}")]
    WalletFrozen(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
    #[error("invalid PIN")]
    InvalidPin,
    #[error("sender and receiver must differ")]
    SelfTransfer,
    #[error("Duplicate reference: {0}")]
    DuplicateReference(String),
    #[error("Payment method inactive: {0}")]
    PaymentMethodInactive(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::WalletFrozen(a), Self::WalletFrozen(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidTransition(a), Self::InvalidTransition(b)) => a == b,
            (Self::InvalidPin, Self::InvalidPin) => true,
            (Self::SelfTransfer, Self::SelfTransfer) => true,
            (Self::DuplicateReference(a), Self::DuplicateReference(b)) => a == b,
            (Self::PaymentMethodInactive(a), Self::PaymentMethodInactive(b)) => a == b,
            (Self::CurrencyMismatch(a), Self::CurrencyMismatch(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
