//! Ledger entries.
//!
//! A `Transaction` is one append-only row recording a balance-affecting
//! event. Deposits and withdrawals are born `pending` (funds settle
//! out-of-band and an operator confirms them); transfers are instantaneous
//! and born `completed`, written as a debit/credit pair sharing one
//! reference.
//!
//! Completed rows are immutable: corrections happen via new compensating
//! transactions, never by editing history.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, LedgerError, ResultLedger};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
        }
    }

    /// Human-readable reference prefix for this kind.
    fn reference_prefix(self) -> &'static str {
        match self {
            Self::Deposit => "DEP",
            Self::Withdrawal => "WDR",
            Self::Transfer => "TRF",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "transfer" => Ok(Self::Transfer),
            other => Err(LedgerError::InvalidTransition(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Which side of a transfer a row records. Only transfers carry a direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    Debit,
    Credit,
}

impl TransferDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
        }
    }
}

impl TryFrom<&str> for TransferDirection {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            other => Err(LedgerError::InvalidTransition(format!(
                "invalid transfer direction: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Rejected,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Rejected => "rejected",
        }
    }

    /// The status state machine: `pending` resolves exactly once, everything
    /// else is terminal.
    #[must_use]
    pub fn can_transition(self, to: TransactionStatus) -> bool {
        matches!(
            (self, to),
            (
                TransactionStatus::Pending,
                TransactionStatus::Completed | TransactionStatus::Rejected
            )
        )
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "rejected" => Ok(Self::Rejected),
            other => Err(LedgerError::InvalidTransition(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

/// Generates a human-readable, probabilistically unique reference.
///
/// Format: `{DEP|WDR|TRF}-{YYYYMMDDHHMMSS}-{6 hex}`. Timestamp plus random
/// suffix alone is only probabilistically unique, so callers re-check against
/// the ledger's unique index and regenerate on collision.
#[must_use]
pub fn new_reference(kind: TransactionKind, now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        kind.reference_prefix(),
        now.format("%Y%m%d%H%M%S"),
        &suffix[..6].to_uppercase()
    )
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub kind: TransactionKind,
    pub direction: Option<TransferDirection>,
    /// The requested amount, always positive.
    pub amount_minor: i64,
    pub fee_minor: i64,
    /// `amount + fee`; for withdrawals this is what gets reserved.
    pub total_minor: i64,
    pub currency: Currency,
    pub status: TransactionStatus,
    /// Globally unique except that the two rows of a transfer share it.
    pub reference: String,
    pub payment_method_id: Option<Uuid>,
    pub counterparty_user_id: Option<String>,
    /// Name of the out-of-band payer, as typed at deposit time.
    pub client_name: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub validated_by: Option<String>,
    pub rejected_by: Option<String>,
    pub decision_note: Option<String>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: String,
        kind: TransactionKind,
        amount_minor: i64,
        fee_minor: i64,
        currency: Currency,
        status: TransactionStatus,
        reference: String,
        created_at: DateTime<Utc>,
    ) -> ResultLedger<Self> {
        if amount_minor <= 0 {
            return Err(LedgerError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if fee_minor < 0 {
            return Err(LedgerError::InvalidAmount(
                "fee_minor must be >= 0".to_string(),
            ));
        }
        let total_minor = amount_minor.checked_add(fee_minor).ok_or_else(|| {
            LedgerError::InvalidAmount("amount plus fee overflows".to_string())
        })?;
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            direction: None,
            amount_minor,
            fee_minor,
            total_minor,
            currency,
            status,
            reference,
            payment_method_id: None,
            counterparty_user_id: None,
            client_name: None,
            description: None,
            created_at,
            updated_at: created_at,
            validated_by: None,
            rejected_by: None,
            decision_note: None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    /// `debit`/`credit` for transfers, empty string otherwise. Stored
    /// non-nullable so the `(reference, direction)` unique index also covers
    /// deposit/withdrawal rows (sqlite treats NULLs as distinct).
    pub direction: String,
    pub amount_minor: i64,
    pub fee_minor: i64,
    pub total_minor: i64,
    pub currency: String,
    pub status: String,
    pub reference: String,
    pub payment_method_id: Option<String>,
    pub counterparty_user_id: Option<String>,
    pub client_name: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub validated_by: Option<String>,
    pub rejected_by: Option<String>,
    pub decision_note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::UserId",
        to = "super::wallets::Column::UserId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
    #[sea_orm(
        belongs_to = "super::payment_methods::Entity",
        from = "Column::PaymentMethodId",
        to = "super::payment_methods::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    PaymentMethods,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl Related<super::payment_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            direction: ActiveValue::Set(
                tx.direction.map(|d| d.as_str().to_string()).unwrap_or_default(),
            ),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            fee_minor: ActiveValue::Set(tx.fee_minor),
            total_minor: ActiveValue::Set(tx.total_minor),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            reference: ActiveValue::Set(tx.reference.clone()),
            payment_method_id: ActiveValue::Set(tx.payment_method_id.map(|id| id.to_string())),
            counterparty_user_id: ActiveValue::Set(tx.counterparty_user_id.clone()),
            client_name: ActiveValue::Set(tx.client_name.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
            validated_by: ActiveValue::Set(tx.validated_by.clone()),
            rejected_by: ActiveValue::Set(tx.rejected_by.clone()),
            decision_note: ActiveValue::Set(tx.decision_note.clone()),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let direction = if model.direction.is_empty() {
            None
        } else {
            Some(TransferDirection::try_from(model.direction.as_str())?)
        };
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::KeyNotFound("transaction not exists".to_string()))?,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            direction,
            amount_minor: model.amount_minor,
            fee_minor: model.fee_minor,
            total_minor: model.total_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            status: TransactionStatus::try_from(model.status.as_str())?,
            reference: model.reference,
            payment_method_id: model
                .payment_method_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
            counterparty_user_id: model.counterparty_user_id,
            client_name: model.client_name,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
            validated_by: model.validated_by,
            rejected_by: model.rejected_by,
            decision_note: model.decision_note,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn pending_resolves_exactly_once() {
        use TransactionStatus::*;
        assert!(Pending.can_transition(Completed));
        assert!(Pending.can_transition(Rejected));
        assert!(!Pending.can_transition(Pending));
        assert!(!Pending.can_transition(Failed));
        for terminal in [Completed, Rejected, Failed] {
            for to in [Pending, Completed, Rejected, Failed] {
                assert!(!terminal.can_transition(to));
            }
        }
    }

    #[test]
    fn reference_carries_prefix_and_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let reference = new_reference(TransactionKind::Deposit, now);
        assert!(reference.starts_with("DEP-20260314092653-"));
        assert_eq!(reference.len(), "DEP-20260314092653-".len() + 6);

        let other = new_reference(TransactionKind::Deposit, now);
        assert_ne!(reference, other);
    }

    #[test]
    fn new_rejects_non_positive_amounts() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let err = Transaction::new(
            "alice".to_string(),
            TransactionKind::Deposit,
            0,
            0,
            Currency::Xaf,
            TransactionStatus::Pending,
            new_reference(TransactionKind::Deposit, now),
            now,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InvalidAmount("amount_minor must be > 0".to_string())
        );
    }

    #[test]
    fn total_is_amount_plus_fee() {
        let now = Utc.timestamp_opt(0, 0).unwrap();
        let tx = Transaction::new(
            "alice".to_string(),
            TransactionKind::Withdrawal,
            3_000,
            150,
            Currency::Xaf,
            TransactionStatus::Pending,
            new_reference(TransactionKind::Withdrawal, now),
            now,
        )
        .unwrap();
        assert_eq!(tx.total_minor, 3_150);
    }
}
