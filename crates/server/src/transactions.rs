//! Transactions API endpoints and ledger↔API type mapping.

use api_types::transaction::{
    TransactionKind as ApiKind, TransactionList, TransactionListResponse,
    TransactionStatus as ApiStatus, TransactionView, TransferDirection as ApiDirection,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::FixedOffset;

use crate::{ServerError, server::ServerState, user};

pub(crate) fn map_kind(kind: ledger::TransactionKind) -> ApiKind {
    match kind {
        ledger::TransactionKind::Deposit => ApiKind::Deposit,
        ledger::TransactionKind::Withdrawal => ApiKind::Withdrawal,
        ledger::TransactionKind::Transfer => ApiKind::Transfer,
    }
}

pub(crate) fn map_kind_in(kind: ApiKind) -> ledger::TransactionKind {
    match kind {
        ApiKind::Deposit => ledger::TransactionKind::Deposit,
        ApiKind::Withdrawal => ledger::TransactionKind::Withdrawal,
        ApiKind::Transfer => ledger::TransactionKind::Transfer,
    }
}

pub(crate) fn map_status(status: ledger::TransactionStatus) -> ApiStatus {
    match status {
        ledger::TransactionStatus::Pending => ApiStatus::Pending,
        ledger::TransactionStatus::Completed => ApiStatus::Completed,
        ledger::TransactionStatus::Failed => ApiStatus::Failed,
        ledger::TransactionStatus::Rejected => ApiStatus::Rejected,
    }
}

pub(crate) fn map_status_in(status: ApiStatus) -> ledger::TransactionStatus {
    match status {
        ApiStatus::Pending => ledger::TransactionStatus::Pending,
        ApiStatus::Completed => ledger::TransactionStatus::Completed,
        ApiStatus::Failed => ledger::TransactionStatus::Failed,
        ApiStatus::Rejected => ledger::TransactionStatus::Rejected,
    }
}

pub(crate) fn map_currency(currency: ledger::Currency) -> api_types::Currency {
    match currency {
        ledger::Currency::Xaf => api_types::Currency::Xaf,
        ledger::Currency::Usd => api_types::Currency::Usd,
        ledger::Currency::Eur => api_types::Currency::Eur,
        ledger::Currency::Gbp => api_types::Currency::Gbp,
        ledger::Currency::Ngn => api_types::Currency::Ngn,
    }
}

pub(crate) fn map_currency_in(currency: api_types::Currency) -> ledger::Currency {
    match currency {
        api_types::Currency::Xaf => ledger::Currency::Xaf,
        api_types::Currency::Usd => ledger::Currency::Usd,
        api_types::Currency::Eur => ledger::Currency::Eur,
        api_types::Currency::Gbp => ledger::Currency::Gbp,
        api_types::Currency::Ngn => ledger::Currency::Ngn,
    }
}

fn map_direction(direction: ledger::TransferDirection) -> ApiDirection {
    match direction {
        ledger::TransferDirection::Debit => ApiDirection::Debit,
        ledger::TransferDirection::Credit => ApiDirection::Credit,
    }
}

pub(crate) fn to_view(tx: ledger::Transaction) -> Result<TransactionView, ServerError> {
    let utc = FixedOffset::east_opt(0)
        .ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))?;
    Ok(TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        direction: tx.direction.map(map_direction),
        amount_minor: tx.amount_minor,
        fee_minor: tx.fee_minor,
        total_minor: tx.total_minor,
        currency: map_currency(tx.currency),
        status: map_status(tx.status),
        reference: tx.reference,
        payment_method_id: tx.payment_method_id,
        counterparty_user_id: tx.counterparty_user_id,
        description: tx.description,
        created_at: tx.created_at.with_timezone(&utc),
        updated_at: tx.updated_at.with_timezone(&utc),
    })
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let filter = ledger::TransactionFilter {
        kind: payload.kind.map(map_kind_in),
        status: payload.status.map(map_status_in),
        limit: payload.limit.unwrap_or(50),
    };

    let txs = state
        .ledger
        .transactions_for_user(&user.username, &filter)
        .await?;

    let transactions = txs
        .into_iter()
        .map(to_view)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(TransactionListResponse { transactions }))
}
