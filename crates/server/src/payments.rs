//! Deposit/withdrawal request endpoints and the payment-method listing.

use api_types::payment_method::{
    AccountDetails as ApiAccountDetails, PaymentMethodKind as ApiMethodKind, PaymentMethodView,
    PaymentMethodsResponse,
};
use api_types::transaction::{DepositNew, TransactionCreated, WithdrawNew};
use axum::{Extension, Json, extract::State, http::StatusCode};
use ledger::{DepositCmd, WithdrawCmd};

use crate::transactions::map_status;
use crate::{ServerError, server::ServerState, user};

pub(crate) fn map_method_kind(kind: ledger::PaymentMethodKind) -> ApiMethodKind {
    match kind {
        ledger::PaymentMethodKind::MobileMoney => ApiMethodKind::MobileMoney,
        ledger::PaymentMethodKind::Mpesa => ApiMethodKind::Mpesa,
        ledger::PaymentMethodKind::Crypto => ApiMethodKind::Crypto,
        ledger::PaymentMethodKind::BankTransfer => ApiMethodKind::BankTransfer,
        ledger::PaymentMethodKind::Other => ApiMethodKind::Other,
    }
}

pub(crate) fn map_method_kind_in(kind: ApiMethodKind) -> ledger::PaymentMethodKind {
    match kind {
        ApiMethodKind::MobileMoney => ledger::PaymentMethodKind::MobileMoney,
        ApiMethodKind::Mpesa => ledger::PaymentMethodKind::Mpesa,
        ApiMethodKind::Crypto => ledger::PaymentMethodKind::Crypto,
        ApiMethodKind::BankTransfer => ledger::PaymentMethodKind::BankTransfer,
        ApiMethodKind::Other => ledger::PaymentMethodKind::Other,
    }
}

pub(crate) fn to_method_view(method: ledger::PaymentMethod) -> PaymentMethodView {
    PaymentMethodView {
        id: method.id,
        name: method.name,
        kind: map_method_kind(method.kind),
        instructions: method.instructions,
        account_details: ApiAccountDetails {
            account_name: method.account_details.account_name,
            account_number: method.account_details.account_number,
            bank_name: method.account_details.bank_name,
            wallet_address: method.account_details.wallet_address,
            network: method.account_details.network,
        },
        is_active: method.is_active,
    }
}

/// Records a deposit request. The user pays out-of-band; the transaction
/// stays `pending` until an operator confirms settlement.
pub async fn deposit_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DepositNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let tx = state
        .ledger
        .request_deposit(DepositCmd {
            user_id: user.username.clone(),
            payment_method_id: payload.payment_method_id,
            amount_minor: payload.amount_minor,
            client_name: payload.client_name,
            description: payload.description,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            id: tx.id,
            reference: tx.reference,
            status: map_status(tx.status),
        }),
    ))
}

/// Records a withdrawal request, reserving `amount + fee` from the spendable
/// balance.
pub async fn withdraw_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<WithdrawNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let tx = state
        .ledger
        .request_withdrawal(WithdrawCmd {
            user_id: user.username.clone(),
            payment_method_id: payload.payment_method_id,
            amount_minor: payload.amount_minor,
            pin: payload.pin,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            id: tx.id,
            reference: tx.reference,
            status: map_status(tx.status),
        }),
    ))
}

/// Lists payment methods. Regular users only see active methods; operators
/// see everything.
pub async fn payment_methods(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<PaymentMethodsResponse>, ServerError> {
    let methods = state.ledger.payment_methods(!user.is_admin).await?;
    Ok(Json(PaymentMethodsResponse {
        payment_methods: methods.into_iter().map(to_method_view).collect(),
    }))
}
