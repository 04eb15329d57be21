use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use ledger::{CurrencyService, Ledger};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{admin, payments, rates, transactions, transfers, user, wallet};

#[derive(Clone)]
pub struct ServerState {
    pub ledger: Arc<Ledger>,
    pub currency: Arc<CurrencyService>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/wallet", get(wallet::balance))
        .route("/wallet/pin", post(wallet::set_pin))
        .route("/deposits", post(payments::deposit_new))
        .route("/withdrawals", post(payments::withdraw_new))
        .route("/transfers", post(transfers::transfer_new))
        .route("/transactions", get(transactions::list))
        .route("/payment-methods", get(payments::payment_methods))
        .route("/rates/{currency}", get(rates::get_rate))
        .route("/admin/transactions", get(admin::list_pending))
        .route(
            "/admin/transactions/{id}/validate",
            post(admin::validate_transaction),
        )
        .route(
            "/admin/transactions/{id}/reject",
            post(admin::reject_transaction),
        )
        .route("/admin/payment-methods", post(admin::payment_method_new))
        .route(
            "/admin/payment-methods/{id}",
            axum::routing::patch(admin::payment_method_update),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
