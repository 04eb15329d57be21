//! Peer transfer endpoint.

use api_types::transaction::{TransferCreated, TransferNew};
use axum::{Extension, Json, extract::State, http::StatusCode};
use ledger::TransferCmd;

use crate::{ServerError, server::ServerState, user};

/// Instant wallet-to-wallet transfer: debit, credit and both ledger rows
/// commit as one unit, or nothing happens at all.
pub async fn transfer_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<(StatusCode, Json<TransferCreated>), ServerError> {
    let receipt = state
        .ledger
        .transfer(TransferCmd {
            sender_id: user.username.clone(),
            receiver_id: payload.receiver_id,
            amount_minor: payload.amount_minor,
            pin: payload.pin,
            description: payload.description,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransferCreated {
            debit_transaction_id: receipt.debit_transaction_id,
            credit_transaction_id: receipt.credit_transaction_id,
            reference: receipt.reference,
        }),
    ))
}
