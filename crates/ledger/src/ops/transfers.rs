use chrono::Utc;
use uuid::Uuid;

use sea_orm::{TransactionTrait, prelude::*};

use crate::notify::{WalletEvent, WalletEventKind};
use crate::{
    Currency, LedgerError, ResultLedger, Transaction, TransactionKind, TransactionStatus,
    TransferCmd, TransferDirection, pin, transactions,
};

use super::{Ledger, normalize_optional_text, normalize_required_text, with_tx};

/// Result of a completed peer transfer: the two ledger rows and the
/// reference they share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferReceipt {
    pub debit_transaction_id: Uuid,
    pub credit_transaction_id: Uuid,
    pub reference: String,
    pub amount_minor: i64,
}

impl Ledger {
    /// Instant wallet-to-wallet transfer.
    ///
    /// One all-or-nothing unit: debit the sender, credit the receiver, write
    /// a `debit` row for the sender and a `credit` row for the receiver
    /// sharing one reference, both immediately `completed`. Wallets are read
    /// sender-first so opposing transfers acquire rows in a consistent
    /// order.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultLedger<TransferReceipt> {
        let sender_id = normalize_required_text(&cmd.sender_id, "sender id")?;
        let receiver_id = normalize_required_text(&cmd.receiver_id, "receiver id")?;
        if sender_id == receiver_id {
            return Err(LedgerError::SelfTransfer);
        }
        self.check_amount(cmd.amount_minor)?;
        let description = normalize_optional_text(cmd.description.as_deref());
        let now = Utc::now();

        let receipt: TransferReceipt = with_tx!(self, |db_tx| {
            let sender = self.wallet_model(&db_tx, &sender_id).await?;

            // PIN-protected wallets fail closed.
            if let Some(hash) = sender.pin_hash.as_deref() {
                if !pin::verify_pin(&sender_id, cmd.pin.as_deref(), hash) {
                    return Err(LedgerError::InvalidPin);
                }
            }

            let receiver = self
                .wallet_model(&db_tx, &receiver_id)
                .await
                .map_err(|err| match err {
                    LedgerError::KeyNotFound(_) => {
                        LedgerError::KeyNotFound("receiver wallet not exists".to_string())
                    }
                    other => other,
                })?;

            if sender.currency != receiver.currency {
                return Err(LedgerError::CurrencyMismatch(format!(
                    "sender wallet is {}, receiver wallet is {}",
                    sender.currency, receiver.currency
                )));
            }
            let currency = Currency::try_from(sender.currency.as_str())?;

            self.apply_delta(&db_tx, &sender_id, -cmd.amount_minor, 0, now)
                .await?;
            self.apply_delta(&db_tx, &receiver_id, cmd.amount_minor, 0, now)
                .await?;

            let reference = self
                .unique_reference(&db_tx, TransactionKind::Transfer, now)
                .await?;

            let mut debit = Transaction::new(
                sender_id.clone(),
                TransactionKind::Transfer,
                cmd.amount_minor,
                0,
                currency,
                TransactionStatus::Completed,
                reference.clone(),
                now,
            )?;
            debit.direction = Some(TransferDirection::Debit);
            debit.counterparty_user_id = Some(receiver_id.clone());
            debit.description = description.clone();

            let mut credit = Transaction::new(
                receiver_id.clone(),
                TransactionKind::Transfer,
                cmd.amount_minor,
                0,
                currency,
                TransactionStatus::Completed,
                reference.clone(),
                now,
            )?;
            credit.direction = Some(TransferDirection::Credit);
            credit.counterparty_user_id = Some(sender_id.clone());
            credit.description = description.clone();

            transactions::ActiveModel::from(&debit).insert(&db_tx).await?;
            transactions::ActiveModel::from(&credit).insert(&db_tx).await?;

            Ok(TransferReceipt {
                debit_transaction_id: debit.id,
                credit_transaction_id: credit.id,
                reference,
                amount_minor: cmd.amount_minor,
            })
        })?;

        tracing::info!(
            sender = %sender_id,
            receiver = %receiver_id,
            reference = %receipt.reference,
            amount_minor = receipt.amount_minor,
            "transfer completed"
        );
        self.notifier
            .notify(
                &sender_id,
                WalletEvent {
                    kind: WalletEventKind::TransferSent,
                    reference: receipt.reference.clone(),
                    amount_minor: receipt.amount_minor,
                },
            )
            .await;
        self.notifier
            .notify(
                &receiver_id,
                WalletEvent {
                    kind: WalletEventKind::TransferReceived,
                    reference: receipt.reference.clone(),
                    amount_minor: receipt.amount_minor,
                },
            )
            .await;

        Ok(receipt)
    }
}
