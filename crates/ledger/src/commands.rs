//! Command structs consumed by the ledger operations.

use uuid::Uuid;

use crate::{PaymentMethodKind, TransactionKind, TransactionStatus, payment_methods::AccountDetails};

/// User requests a manually-settled deposit: they have paid (or will pay)
/// out-of-band and an operator confirms settlement later.
#[derive(Clone, Debug)]
pub struct DepositCmd {
    pub user_id: String,
    pub payment_method_id: Uuid,
    pub amount_minor: i64,
    /// Name on the out-of-band payment, used by the operator to match the
    /// incoming settlement.
    pub client_name: String,
    pub description: Option<String>,
}

/// User requests a payout. The total (amount + fee) is reserved from the
/// spendable balance until an operator resolves the request.
#[derive(Clone, Debug)]
pub struct WithdrawCmd {
    pub user_id: String,
    pub payment_method_id: Uuid,
    pub amount_minor: i64,
    pub pin: Option<String>,
}

/// Instant wallet-to-wallet transfer.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub sender_id: String,
    pub receiver_id: String,
    pub amount_minor: i64,
    pub pin: Option<String>,
    pub description: Option<String>,
}

/// Operator confirms external settlement of a pending transaction.
#[derive(Clone, Debug)]
pub struct ValidateCmd {
    pub transaction_id: Uuid,
    pub actor_id: String,
    pub note: Option<String>,
}

/// Operator rejects a pending transaction. A reason is mandatory.
#[derive(Clone, Debug)]
pub struct RejectCmd {
    pub transaction_id: Uuid,
    pub actor_id: String,
    pub reason: String,
}

/// Operator registers a new payment method.
#[derive(Clone, Debug)]
pub struct PaymentMethodNewCmd {
    pub name: String,
    pub kind: PaymentMethodKind,
    pub instructions: Option<String>,
    pub account_details: AccountDetails,
}

/// Filters for the per-user transaction listing (newest first).
#[derive(Clone, Copy, Debug)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub status: Option<TransactionStatus>,
    pub limit: u64,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            kind: None,
            status: None,
            limit: 50,
        }
    }
}
