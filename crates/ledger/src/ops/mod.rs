use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, DatabaseTransaction, QueryFilter, prelude::*};

use crate::notify::{Notifier, NoopNotifier};
use crate::{Currency, LedgerError, ResultLedger, TransactionKind};

mod deposits;
mod payment_methods;
mod review;
mod transactions;
mod transfers;
mod wallets;
mod withdrawals;

pub use transfers::TransferReceipt;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result: crate::ResultLedger<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Tunables of the payment core.
#[derive(Clone, Copy, Debug)]
pub struct LedgerConfig {
    /// Currency wallets and ledger rows are denominated in.
    pub base_currency: Currency,
    /// Per-transaction cap, minor units.
    pub max_amount_minor: i64,
    /// Flat fee charged on withdrawals, minor units.
    pub withdrawal_fee_minor: i64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            base_currency: Currency::default(),
            max_amount_minor: 10_000_000,
            withdrawal_fee_minor: 0,
        }
    }
}

pub struct Ledger {
    database: DatabaseConnection,
    config: LedgerConfig,
    notifier: Arc<dyn Notifier>,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Validates a user-supplied amount against the configured cap.
    pub(in crate::ops) fn check_amount(&self, amount_minor: i64) -> ResultLedger<()> {
        if amount_minor <= 0 {
            return Err(LedgerError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if amount_minor > self.config.max_amount_minor {
            return Err(LedgerError::InvalidAmount(format!(
                "amount exceeds the configured maximum of {}",
                self.config.max_amount_minor
            )));
        }
        Ok(())
    }

    /// Generates a ledger reference and verifies it does not collide,
    /// regenerating a bounded number of times. Timestamp + random suffix is
    /// only probabilistically unique; the unique index is the backstop.
    pub(in crate::ops) async fn unique_reference(
        &self,
        db_tx: &DatabaseTransaction,
        kind: TransactionKind,
        now: DateTime<Utc>,
    ) -> ResultLedger<String> {
        const RETRIES: usize = 3;
        for _ in 0..RETRIES {
            let candidate = crate::transactions::new_reference(kind, now);
            let exists = crate::transactions::Entity::find()
                .filter(crate::transactions::Column::Reference.eq(candidate.clone()))
                .one(db_tx)
                .await?
                .is_some();
            if !exists {
                return Ok(candidate);
            }
        }
        Err(LedgerError::DuplicateReference(
            "reference generation kept colliding".to_string(),
        ))
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultLedger<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidAmount(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Ledger`
pub struct LedgerBuilder {
    database: DatabaseConnection,
    config: LedgerConfig,
    notifier: Arc<dyn Notifier>,
}

impl Default for LedgerBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            config: LedgerConfig::default(),
            notifier: Arc::new(NoopNotifier),
        }
    }
}

impl LedgerBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    pub fn config(mut self, config: LedgerConfig) -> LedgerBuilder {
        self.config = config;
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> LedgerBuilder {
        self.notifier = notifier;
        self
    }

    /// Construct `Ledger`
    pub async fn build(self) -> ResultLedger<Ledger> {
        Ok(Ledger {
            database: self.database,
            config: self.config,
            notifier: self.notifier,
        })
    }
}
