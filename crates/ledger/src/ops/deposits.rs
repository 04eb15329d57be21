use chrono::Utc;

use sea_orm::{TransactionTrait, prelude::*};

use crate::notify::{WalletEvent, WalletEventKind};
use crate::{
    DepositCmd, LedgerError, ResultLedger, Transaction, TransactionKind, TransactionStatus,
    transactions,
};

use super::{Ledger, normalize_optional_text, normalize_required_text, with_tx};

impl Ledger {
    /// Records a manually-settled deposit request.
    ///
    /// The user is expected to have paid out-of-band through the selected
    /// payment method; no balance changes here. The row stays `pending` until
    /// an operator validates or rejects the settlement.
    pub async fn request_deposit(&self, cmd: DepositCmd) -> ResultLedger<Transaction> {
        let user_id = normalize_required_text(&cmd.user_id, "user id")?;
        let client_name = normalize_required_text(&cmd.client_name, "client name")?;
        let description = normalize_optional_text(cmd.description.as_deref());
        self.check_amount(cmd.amount_minor)?;
        let now = Utc::now();

        let tx: Transaction = with_tx!(self, |db_tx| {
            self.ensure_wallet_model(&db_tx, &user_id, now).await?;

            let method = self
                .payment_method_model(&db_tx, cmd.payment_method_id)
                .await?;
            if !method.is_active {
                return Err(LedgerError::PaymentMethodInactive(method.name));
            }

            let reference = self
                .unique_reference(&db_tx, TransactionKind::Deposit, now)
                .await?;
            let mut tx = Transaction::new(
                user_id.clone(),
                TransactionKind::Deposit,
                cmd.amount_minor,
                0,
                self.config.base_currency,
                TransactionStatus::Pending,
                reference,
                now,
            )?;
            tx.payment_method_id = Some(cmd.payment_method_id);
            tx.client_name = Some(client_name.clone());
            tx.description = description.clone();

            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })?;

        tracing::info!(
            user_id = %tx.user_id,
            reference = %tx.reference,
            amount_minor = tx.amount_minor,
            "deposit requested"
        );
        self.notifier
            .notify(
                &tx.user_id,
                WalletEvent {
                    kind: WalletEventKind::DepositRequested,
                    reference: tx.reference.clone(),
                    amount_minor: tx.amount_minor,
                },
            )
            .await;

        Ok(tx)
    }
}
