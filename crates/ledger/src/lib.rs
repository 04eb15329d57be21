//! Ledger & flexible payment core.
//!
//! Wallet balances, an append-only transaction ledger, two-phase
//! deposit/withdrawal workflows with operator review, instant peer
//! transfers, and a currency conversion cache. Every balance mutation goes
//! through a database transaction together with the ledger row that records
//! it.

pub use commands::{
    DepositCmd, PaymentMethodNewCmd, RejectCmd, TransactionFilter, TransferCmd, ValidateCmd,
    WithdrawCmd,
};
pub use currency::Currency;
pub use error::LedgerError;
pub use fx::{
    CurrencyService, DEFAULT_RATE_TTL, RateLock, RateProvider, RateProviderError,
    StaticRateProvider, convert_minor, default_rate,
};
pub use money::Money;
pub use notify::{LogNotifier, NoopNotifier, Notifier, WalletEvent, WalletEventKind};
pub use ops::{Ledger, LedgerBuilder, LedgerConfig, TransferReceipt};
pub use orders::{OrderTotals, PricedOrder};
pub use payment_methods::{AccountDetails, PaymentMethod, PaymentMethodKind};
pub use transactions::{
    Transaction, TransactionKind, TransactionStatus, TransferDirection, new_reference,
};
pub use wallets::{Wallet, WalletStatus};

mod commands;
mod currency;
mod error;
mod fx;
mod money;
mod notify;
mod ops;
mod orders;
mod payment_methods;
mod pin;
mod transactions;
mod util;
mod wallets;

type ResultLedger<T> = Result<T, LedgerError>;
