use chrono::Utc;

use sea_orm::{TransactionTrait, prelude::*};

use crate::notify::{WalletEvent, WalletEventKind};
use crate::{
    LedgerError, ResultLedger, Transaction, TransactionKind, TransactionStatus, WithdrawCmd, pin,
    transactions,
};

use super::{Ledger, normalize_required_text, with_tx};

impl Ledger {
    /// Records a withdrawal request and reserves the funds.
    ///
    /// `amount + fee` moves from `balance` to `pending_balance` in the same
    /// DB transaction that writes the `pending` row, so two concurrent
    /// requests cannot spend the same funds. The reservation is only ever
    /// resolved by an operator validating or rejecting the request.
    pub async fn request_withdrawal(&self, cmd: WithdrawCmd) -> ResultLedger<Transaction> {
        let user_id = normalize_required_text(&cmd.user_id, "user id")?;
        self.check_amount(cmd.amount_minor)?;
        let fee_minor = self.config.withdrawal_fee_minor;
        let total_minor = cmd.amount_minor.checked_add(fee_minor).ok_or_else(|| {
            LedgerError::InvalidAmount("amount plus fee overflows".to_string())
        })?;
        let now = Utc::now();

        let tx: Transaction = with_tx!(self, |db_tx| {
            let wallet = self.ensure_wallet_model(&db_tx, &user_id, now).await?;

            // PIN-protected wallets fail closed: no PIN is as wrong as a bad
            // one.
            if let Some(hash) = wallet.pin_hash.as_deref() {
                if !pin::verify_pin(&user_id, cmd.pin.as_deref(), hash) {
                    return Err(LedgerError::InvalidPin);
                }
            }

            let method = self
                .payment_method_model(&db_tx, cmd.payment_method_id)
                .await?;
            if !method.is_active {
                return Err(LedgerError::PaymentMethodInactive(method.name));
            }

            // Reserve before the pending row becomes visible.
            self.apply_delta(&db_tx, &user_id, -total_minor, total_minor, now)
                .await?;

            let reference = self
                .unique_reference(&db_tx, TransactionKind::Withdrawal, now)
                .await?;
            let mut tx = Transaction::new(
                user_id.clone(),
                TransactionKind::Withdrawal,
                cmd.amount_minor,
                fee_minor,
                self.config.base_currency,
                TransactionStatus::Pending,
                reference,
                now,
            )?;
            tx.payment_method_id = Some(cmd.payment_method_id);

            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })?;

        tracing::info!(
            user_id = %tx.user_id,
            reference = %tx.reference,
            amount_minor = tx.amount_minor,
            fee_minor = tx.fee_minor,
            "withdrawal requested, funds reserved"
        );
        self.notifier
            .notify(
                &tx.user_id,
                WalletEvent {
                    kind: WalletEventKind::WithdrawalRequested,
                    reference: tx.reference.clone(),
                    amount_minor: tx.amount_minor,
                },
            )
            .await;

        Ok(tx)
    }
}
