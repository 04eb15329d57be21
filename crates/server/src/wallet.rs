//! Wallet API endpoints.

use api_types::wallet::{BalanceQuery, DisplayAmounts, PinUpdate, WalletBalance};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::transactions::{map_currency, map_currency_in};
use crate::{ServerError, server::ServerState, user};

/// Balance read model. Creates the wallet lazily so a fresh user sees zero
/// balances instead of a 404. With `display_currency` set, converted and
/// formatted amounts are attached (informational; base-currency integers
/// stay authoritative).
pub async fn balance(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<BalanceQuery>,
) -> Result<Json<WalletBalance>, ServerError> {
    let wallet = state.ledger.ensure_wallet(&user.username).await?;

    let display = match query.display_currency {
        Some(api_currency) => {
            let currency = map_currency_in(api_currency);
            let rate = state.currency.rate(currency).await;
            let balance = state.currency.convert(wallet.balance.minor(), currency).await;
            let pending = state
                .currency
                .convert(wallet.pending_balance.minor(), currency)
                .await;
            Some(DisplayAmounts {
                currency: api_currency,
                rate,
                balance: state.currency.format(balance.minor(), currency),
                pending_balance: state.currency.format(pending.minor(), currency),
            })
        }
        None => None,
    };

    Ok(Json(WalletBalance {
        user_id: wallet.user_id,
        balance_minor: wallet.balance.minor(),
        pending_balance_minor: wallet.pending_balance.minor(),
        currency: map_currency(wallet.currency),
        status: wallet.status.as_str().to_string(),
        display,
    }))
}

/// Sets or clears the wallet PIN for the authenticated user.
pub async fn set_pin(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PinUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .ledger
        .set_pin(&user.username, payload.pin.as_deref())
        .await?;
    Ok(StatusCode::OK)
}
