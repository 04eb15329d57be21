//! User notification hook.
//!
//! The ledger emits an event after every committed financial operation.
//! Delivery is fire-and-forget: implementations swallow their own failures,
//! so a dead mail server can never roll back a completed transaction.

use async_trait::async_trait;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalletEventKind {
    DepositRequested,
    DepositValidated,
    DepositRejected,
    WithdrawalRequested,
    WithdrawalValidated,
    WithdrawalRejected,
    TransferSent,
    TransferReceived,
}

#[derive(Clone, Debug)]
pub struct WalletEvent {
    pub kind: WalletEventKind,
    pub reference: String,
    pub amount_minor: i64,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Notifies `user_id` about a wallet event. Must not fail; log and move
    /// on.
    async fn notify(&self, user_id: &str, event: WalletEvent);
}

/// Default notifier: does nothing.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _user_id: &str, _event: WalletEvent) {}
}

/// Notifier that traces events, useful in development deployments.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, user_id: &str, event: WalletEvent) {
        tracing::info!(
            user_id,
            reference = %event.reference,
            amount_minor = event.amount_minor,
            kind = ?event.kind,
            "wallet event"
        );
    }
}
