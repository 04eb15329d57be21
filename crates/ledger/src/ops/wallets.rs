use chrono::{DateTime, Utc};

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{LedgerError, ResultLedger, Wallet, WalletStatus, pin, wallets};

use super::{Ledger, normalize_required_text, with_tx};

impl Ledger {
    /// Return a wallet snapshot from DB.
    pub async fn wallet(&self, user_id: &str) -> ResultLedger<Wallet> {
        let model = wallets::Entity::find_by_id(user_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("wallet not exists".to_string()))?;
        Wallet::try_from(model)
    }

    /// Return the user's wallet, creating an empty active one on first use.
    ///
    /// Wallets are created lazily: the first financial action a user takes
    /// materializes the row.
    pub async fn ensure_wallet(&self, user_id: &str) -> ResultLedger<Wallet> {
        let user_id = normalize_required_text(user_id, "user id")?;
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            let model = self.ensure_wallet_model(&db_tx, &user_id, now).await?;
            Wallet::try_from(model)
        })
    }

    /// Freezes or unfreezes a wallet. Frozen wallets reject every balance
    /// mutation until reactivated; the row itself is never deleted.
    pub async fn set_wallet_status(
        &self,
        user_id: &str,
        status: WalletStatus,
    ) -> ResultLedger<()> {
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            self.wallet_model(&db_tx, user_id).await?;
            let active = wallets::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
                status: ActiveValue::Set(status.as_str().to_string()),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Sets or clears the wallet PIN used to authorize transfers and
    /// withdrawals.
    pub async fn set_pin(&self, user_id: &str, new_pin: Option<&str>) -> ResultLedger<()> {
        let user_id = normalize_required_text(user_id, "user id")?;
        let pin_hash = match new_pin {
            Some(p) => {
                let p = normalize_required_text(p, "pin")?;
                Some(pin::hash_pin(&user_id, &p))
            }
            None => None,
        };
        let now = Utc::now();
        with_tx!(self, |db_tx| {
            self.ensure_wallet_model(&db_tx, &user_id, now).await?;
            let active = wallets::ActiveModel {
                user_id: ActiveValue::Set(user_id.clone()),
                pin_hash: ActiveValue::Set(pin_hash.clone()),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    pub(in crate::ops) async fn wallet_model(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultLedger<wallets::Model> {
        wallets::Entity::find_by_id(user_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("wallet not exists".to_string()))
    }

    pub(in crate::ops) async fn ensure_wallet_model(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultLedger<wallets::Model> {
        if let Some(model) = wallets::Entity::find_by_id(user_id.to_string())
            .one(db_tx)
            .await?
        {
            return Ok(model);
        }

        let wallet = Wallet::new(user_id.to_string(), self.config.base_currency, now);
        let active: wallets::ActiveModel = (&wallet).into();
        Ok(active.insert(db_tx).await?)
    }

    /// Atomically adjusts `balance` and `pending_balance`.
    ///
    /// Runs inside the caller's DB transaction so the read-modify-write
    /// cannot interleave with a concurrent delta on the same wallet. Fails
    /// without side effects when the wallet is frozen or either field would
    /// go negative.
    pub(in crate::ops) async fn apply_delta(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        balance_delta: i64,
        pending_delta: i64,
        now: DateTime<Utc>,
    ) -> ResultLedger<()> {
        let model = self.wallet_model(db_tx, user_id).await?;

        let status = WalletStatus::try_from(model.status.as_str())?;
        if status != WalletStatus::Active {
            return Err(LedgerError::WalletFrozen(user_id.to_string()));
        }

        let new_balance = model.balance.checked_add(balance_delta).ok_or_else(|| {
            LedgerError::InvalidAmount("balance overflow".to_string())
        })?;
        let new_pending = model
            .pending_balance
            .checked_add(pending_delta)
            .ok_or_else(|| LedgerError::InvalidAmount("pending balance overflow".to_string()))?;

        if new_balance < 0 {
            return Err(LedgerError::InsufficientFunds(user_id.to_string()));
        }
        if new_pending < 0 {
            return Err(LedgerError::InsufficientFunds(format!(
                "pending funds for {user_id}"
            )));
        }

        let active = wallets::ActiveModel {
            user_id: ActiveValue::Set(user_id.to_string()),
            balance: ActiveValue::Set(new_balance),
            pending_balance: ActiveValue::Set(new_pending),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        active.update(db_tx).await?;
        Ok(())
    }
}
