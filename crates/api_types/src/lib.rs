use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Xaf,
    Usd,
    Eur,
    Gbp,
    Ngn,
}

pub mod wallet {
    use super::*;

    /// Query parameters for the balance endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceQuery {
        /// When set, the response carries converted/formatted amounts in
        /// this currency alongside the base-currency integers.
        pub display_currency: Option<Currency>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletBalance {
        pub user_id: String,
        pub balance_minor: i64,
        pub pending_balance_minor: i64,
        pub currency: Currency,
        /// `active` or `frozen`.
        pub status: String,
        pub display: Option<DisplayAmounts>,
    }

    /// Converted amounts, formatted for display. Informational only; the
    /// integers in the base currency remain the source of truth.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DisplayAmounts {
        pub currency: Currency,
        pub rate: f64,
        pub balance: String,
        pub pending_balance: String,
    }

    /// Request body for setting (or clearing, with `null`) the wallet PIN.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PinUpdate {
        pub pin: Option<String>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Deposit,
        Withdrawal,
        Transfer,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionStatus {
        Pending,
        Completed,
        Failed,
        Rejected,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransferDirection {
        Debit,
        Credit,
    }

    /// Request body for a manually-settled deposit.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DepositNew {
        pub payment_method_id: Uuid,
        pub amount_minor: i64,
        /// Name on the out-of-band payment.
        pub client_name: String,
        pub description: Option<String>,
    }

    /// Request body for a withdrawal. The PIN is required when the wallet
    /// has one configured.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WithdrawNew {
        pub payment_method_id: Uuid,
        pub amount_minor: i64,
        pub pin: Option<String>,
    }

    /// Request body for an instant peer transfer.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub receiver_id: String,
        pub amount_minor: i64,
        pub pin: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
        pub reference: String,
        pub status: TransactionStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferCreated {
        pub debit_transaction_id: Uuid,
        pub credit_transaction_id: Uuid,
        pub reference: String,
    }

    /// Query parameters for the per-user transaction listing.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub kind: Option<TransactionKind>,
        pub status: Option<TransactionStatus>,
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub direction: Option<TransferDirection>,
        pub amount_minor: i64,
        pub fee_minor: i64,
        pub total_minor: i64,
        pub currency: Currency,
        pub status: TransactionStatus,
        pub reference: String,
        pub payment_method_id: Option<Uuid>,
        pub counterparty_user_id: Option<String>,
        pub description: Option<String>,
        /// RFC3339 timestamp, including timezone offset.
        pub created_at: DateTime<FixedOffset>,
        pub updated_at: DateTime<FixedOffset>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod payment_method {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethodKind {
        MobileMoney,
        Mpesa,
        Crypto,
        BankTransfer,
        Other,
    }

    /// Method-specific settlement coordinates; fill what the kind needs.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct AccountDetails {
        pub account_name: Option<String>,
        pub account_number: Option<String>,
        pub bank_name: Option<String>,
        pub wallet_address: Option<String>,
        pub network: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodNew {
        pub name: String,
        pub kind: PaymentMethodKind,
        pub instructions: Option<String>,
        #[serde(default)]
        pub account_details: AccountDetails,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodCreated {
        pub id: Uuid,
    }

    /// Toggle body; methods referenced by transactions are never deleted.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodUpdate {
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodView {
        pub id: Uuid,
        pub name: String,
        pub kind: PaymentMethodKind,
        pub instructions: Option<String>,
        pub account_details: AccountDetails,
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodsResponse {
        pub payment_methods: Vec<PaymentMethodView>,
    }
}

pub mod admin {
    use super::*;

    /// Operator confirmation of external settlement.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ValidateRequest {
        pub note: Option<String>,
    }

    /// Operator rejection. The reason is mandatory.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RejectRequest {
        pub reason: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DecisionResponse {
        pub success: bool,
        pub transaction: transaction::TransactionView,
    }

    /// Query parameters for the pending-review listing.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PendingQuery {
        pub kind: Option<transaction::TransactionKind>,
    }
}

pub mod rates {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RateView {
        pub base: Currency,
        pub currency: Currency,
        /// `base -> currency` multiplier for major units.
        pub rate: f64,
    }
}
