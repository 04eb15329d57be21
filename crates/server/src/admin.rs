//! Operator endpoints: pending review and payment-method administration.

use api_types::admin::{DecisionResponse, PendingQuery, RejectRequest, ValidateRequest};
use api_types::payment_method::{PaymentMethodCreated, PaymentMethodNew, PaymentMethodUpdate};
use api_types::transaction::TransactionListResponse;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use ledger::{AccountDetails, PaymentMethodNewCmd, RejectCmd, ValidateCmd};
use uuid::Uuid;

use crate::payments::{map_method_kind_in, to_method_view};
use crate::transactions::{map_kind_in, to_view};
use crate::{ServerError, server::ServerState, user};

fn require_admin(user: &user::Model) -> Result<(), ServerError> {
    if user.is_admin {
        Ok(())
    } else {
        Err(ServerError::Forbidden(
            "administrator access required".to_string(),
        ))
    }
}

/// Pending deposits/withdrawals awaiting review, oldest first.
pub async fn list_pending(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    require_admin(&user)?;

    let txs = state
        .ledger
        .pending_transactions(query.kind.map(map_kind_in))
        .await?;
    let transactions = txs
        .into_iter()
        .map(to_view)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(TransactionListResponse { transactions }))
}

/// Confirms external settlement of a pending transaction, applying its
/// balance effect exactly once.
pub async fn validate_transaction(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ValidateRequest>,
) -> Result<Json<DecisionResponse>, ServerError> {
    require_admin(&user)?;

    let tx = state
        .ledger
        .validate_transaction(ValidateCmd {
            transaction_id: id,
            actor_id: user.username.clone(),
            note: payload.note,
        })
        .await?;

    Ok(Json(DecisionResponse {
        success: true,
        transaction: to_view(tx)?,
    }))
}

/// Rejects a pending transaction. Rejecting a withdrawal returns the
/// reserved funds; rejecting a deposit has no balance effect.
pub async fn reject_transaction(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<DecisionResponse>, ServerError> {
    require_admin(&user)?;

    let tx = state
        .ledger
        .reject_transaction(RejectCmd {
            transaction_id: id,
            actor_id: user.username.clone(),
            reason: payload.reason,
        })
        .await?;

    Ok(Json(DecisionResponse {
        success: true,
        transaction: to_view(tx)?,
    }))
}

pub async fn payment_method_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentMethodNew>,
) -> Result<(StatusCode, Json<PaymentMethodCreated>), ServerError> {
    require_admin(&user)?;

    let id = state
        .ledger
        .new_payment_method(PaymentMethodNewCmd {
            name: payload.name,
            kind: map_method_kind_in(payload.kind),
            instructions: payload.instructions,
            account_details: AccountDetails {
                account_name: payload.account_details.account_name,
                account_number: payload.account_details.account_number,
                bank_name: payload.account_details.bank_name,
                wallet_address: payload.account_details.wallet_address,
                network: payload.account_details.network,
            },
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PaymentMethodCreated { id })))
}

pub async fn payment_method_update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentMethodUpdate>,
) -> Result<StatusCode, ServerError> {
    require_admin(&user)?;

    state
        .ledger
        .set_payment_method_active(id, payload.is_active)
        .await?;

    Ok(StatusCode::OK)
}
