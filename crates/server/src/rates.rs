//! FX rate endpoint.

use api_types::rates::RateView;
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::transactions::map_currency;
use crate::{ServerError, server::ServerState, user};

/// Current `base -> currency` rate from the conversion cache. Never fails on
/// provider trouble; the service degrades to cached or default rates.
pub async fn get_rate(
    Extension(_user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(currency): Path<String>,
) -> Result<Json<RateView>, ServerError> {
    let currency = ledger::Currency::try_from(currency.as_str())
        .map_err(|err| ServerError::Generic(err.to_string()))?;
    let rate = state.currency.rate(currency).await;

    Ok(Json(RateView {
        base: map_currency(state.currency.base()),
        currency: map_currency(currency),
        rate,
    }))
}
