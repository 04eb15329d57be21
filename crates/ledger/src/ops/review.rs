//! Operator review of pending deposits and withdrawals.
//!
//! Validation and rejection are the only exits from `pending`. Deciding an
//! already-decided transaction fails with `InvalidTransition`, so the balance
//! effect of a decision is applied exactly once even if two operators race.

use chrono::Utc;
use uuid::Uuid;

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::notify::{WalletEvent, WalletEventKind};
use crate::{
    LedgerError, RejectCmd, ResultLedger, Transaction, TransactionKind, TransactionStatus,
    ValidateCmd, transactions,
};

use super::{Ledger, normalize_optional_text, normalize_required_text, with_tx};

impl Ledger {
    /// Confirms external settlement of a pending transaction.
    ///
    /// - deposit: credits the wallet with the deposited amount
    /// - withdrawal: releases the reserved funds (they have left the system)
    pub async fn validate_transaction(&self, cmd: ValidateCmd) -> ResultLedger<Transaction> {
        let actor = normalize_required_text(&cmd.actor_id, "actor")?;
        let note = normalize_optional_text(cmd.note.as_deref());
        let now = Utc::now();

        let tx: Transaction = with_tx!(self, |db_tx| {
            let mut tx = self
                .pending_for_decision(&db_tx, cmd.transaction_id, TransactionStatus::Completed)
                .await?;

            match tx.kind {
                TransactionKind::Deposit => {
                    self.apply_delta(&db_tx, &tx.user_id, tx.amount_minor, 0, now)
                        .await?;
                }
                TransactionKind::Withdrawal => {
                    self.apply_delta(&db_tx, &tx.user_id, 0, -tx.total_minor, now)
                        .await?;
                }
                TransactionKind::Transfer => {
                    return Err(LedgerError::InvalidTransition(
                        "transfers settle instantly and are never pending".to_string(),
                    ));
                }
            }

            let active = transactions::ActiveModel {
                id: ActiveValue::Set(tx.id.to_string()),
                status: ActiveValue::Set(TransactionStatus::Completed.as_str().to_string()),
                validated_by: ActiveValue::Set(Some(actor.clone())),
                decision_note: ActiveValue::Set(note.clone()),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            tx.status = TransactionStatus::Completed;
            tx.validated_by = Some(actor.clone());
            tx.decision_note = note.clone();
            tx.updated_at = now;
            Ok(tx)
        })?;

        tracing::info!(
            reference = %tx.reference,
            actor = %actor,
            kind = ?tx.kind,
            "transaction validated"
        );
        let kind = match tx.kind {
            TransactionKind::Deposit => WalletEventKind::DepositValidated,
            _ => WalletEventKind::WithdrawalValidated,
        };
        self.notifier
            .notify(
                &tx.user_id,
                WalletEvent {
                    kind,
                    reference: tx.reference.clone(),
                    amount_minor: tx.amount_minor,
                },
            )
            .await;

        Ok(tx)
    }

    /// Rejects a pending transaction. The reason is mandatory.
    ///
    /// - deposit: no balance effect (nothing was credited yet)
    /// - withdrawal: returns the reserved funds to the spendable balance
    pub async fn reject_transaction(&self, cmd: RejectCmd) -> ResultLedger<Transaction> {
        let actor = normalize_required_text(&cmd.actor_id, "actor")?;
        let reason = normalize_required_text(&cmd.reason, "reason")?;
        let now = Utc::now();

        let tx: Transaction = with_tx!(self, |db_tx| {
            let mut tx = self
                .pending_for_decision(&db_tx, cmd.transaction_id, TransactionStatus::Rejected)
                .await?;

            match tx.kind {
                TransactionKind::Deposit => {}
                TransactionKind::Withdrawal => {
                    self.apply_delta(&db_tx, &tx.user_id, tx.total_minor, -tx.total_minor, now)
                        .await?;
                }
                TransactionKind::Transfer => {
                    return Err(LedgerError::InvalidTransition(
                        "transfers settle instantly and are never pending".to_string(),
                    ));
                }
            }

            let active = transactions::ActiveModel {
                id: ActiveValue::Set(tx.id.to_string()),
                status: ActiveValue::Set(TransactionStatus::Rejected.as_str().to_string()),
                rejected_by: ActiveValue::Set(Some(actor.clone())),
                decision_note: ActiveValue::Set(Some(reason.clone())),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            tx.status = TransactionStatus::Rejected;
            tx.rejected_by = Some(actor.clone());
            tx.decision_note = Some(reason.clone());
            tx.updated_at = now;
            Ok(tx)
        })?;

        tracing::info!(
            reference = %tx.reference,
            actor = %actor,
            reason = %reason,
            "transaction rejected"
        );
        let kind = match tx.kind {
            TransactionKind::Deposit => WalletEventKind::DepositRejected,
            _ => WalletEventKind::WithdrawalRejected,
        };
        self.notifier
            .notify(
                &tx.user_id,
                WalletEvent {
                    kind,
                    reference: tx.reference.clone(),
                    amount_minor: tx.amount_minor,
                },
            )
            .await;

        Ok(tx)
    }

    /// Loads a transaction and enforces the status state machine for a
    /// decision to `target`.
    async fn pending_for_decision(
        &self,
        db_tx: &DatabaseTransaction,
        transaction_id: Uuid,
        target: TransactionStatus,
    ) -> ResultLedger<Transaction> {
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .one(db_tx)
            .await?
            .ok_or_else(|| LedgerError::KeyNotFound("transaction not exists".to_string()))?;
        let tx = Transaction::try_from(model)?;

        if !tx.status.can_transition(target) {
            return Err(LedgerError::InvalidTransition(format!(
                "transaction {} is already {}",
                tx.reference,
                tx.status.as_str()
            )));
        }
        Ok(tx)
    }
}
