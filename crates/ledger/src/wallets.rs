//! The module contains the `Wallet` struct and its persistence model.

use chrono::{DateTime, Utc};

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{Currency, LedgerError, Money};

/// Lifecycle status of a wallet.
///
/// Wallets are never hard-deleted; an operator freezes them instead. A frozen
/// wallet rejects every balance mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WalletStatus {
    #[default]
    Active,
    Frozen,
}

impl WalletStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Frozen => "frozen",
        }
    }
}

impl TryFrom<&str> for WalletStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "frozen" => Ok(Self::Frozen),
            other => Err(LedgerError::InvalidTransition(format!(
                "invalid wallet status: {other}"
            ))),
        }
    }
}

/// One balance record per user.
///
/// `balance` is the spendable amount; `pending_balance` holds funds earmarked
/// for in-flight withdrawals. Both are non-negative minor-unit amounts, and
/// every mutation happens through the ledger-writing operations so the two
/// fields never drift from the transaction history.
#[derive(Clone, Debug)]
pub struct Wallet {
    /// The owning user. One wallet per user, created lazily on the first
    /// financial action.
    pub user_id: String,
    pub balance: Money,
    pub pending_balance: Money,
    pub currency: Currency,
    pub status: WalletStatus,
    pub pin_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(user_id: String, currency: Currency, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            balance: Money::ZERO,
            pending_balance: Money::ZERO,
            currency,
            status: WalletStatus::Active,
            pin_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Spendable funds, i.e. `balance` (reserved funds are already excluded).
    #[must_use]
    pub fn available(&self) -> Money {
        self.balance
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == WalletStatus::Active
    }

    /// Whether transfers/withdrawals require a PIN.
    #[must_use]
    pub fn is_pin_protected(&self) -> bool {
        self.pin_hash.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub balance: i64,
    pub pending_balance: i64,
    pub currency: String,
    pub status: String,
    pub pin_hash: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            user_id: ActiveValue::Set(value.user_id.clone()),
            balance: ActiveValue::Set(value.balance.minor()),
            pending_balance: ActiveValue::Set(value.pending_balance.minor()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            pin_hash: ActiveValue::Set(value.pin_hash.clone()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: model.user_id,
            balance: Money::new(model.balance),
            pending_balance: Money::new(model.pending_balance),
            currency: Currency::try_from(model.currency.as_str())?,
            status: WalletStatus::try_from(model.status.as_str())?,
            pin_hash: model.pin_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
