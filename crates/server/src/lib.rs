use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

use serde::Serialize;
pub use server::{run_with_listener, spawn_with_listener};

mod admin;
mod payments;
mod rates;
mod server;
mod transactions;
mod transfers;
mod user;
mod wallet;

pub use server::ServerState;

pub enum ServerError {
    Ledger(LedgerError),
    Forbidden(String),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::ExistingKey(_) => StatusCode::CONFLICT,
        LedgerError::InvalidPin => StatusCode::FORBIDDEN,
        LedgerError::Database(_) | LedgerError::DuplicateReference(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        LedgerError::InvalidAmount(_)
        | LedgerError::InsufficientFunds(_)
        | LedgerError::WalletFrozen(_)
        | LedgerError::InvalidTransition(_)
        | LedgerError::SelfTransfer
        | LedgerError::PaymentMethodInactive(_)
        | LedgerError::CurrencyMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        LedgerError::DuplicateReference(detail) => {
            tracing::error!("reference generation exhausted retries: {detail}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => {
                (status_for_ledger_error(&err), message_for_ledger_error(err))
            }
            ServerError::Forbidden(err) => (StatusCode::FORBIDDEN, err),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_not_found_maps_to_404() {
        let res = ServerError::from(LedgerError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn ledger_conflict_maps_to_409() {
        let res = ServerError::from(LedgerError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_pin_maps_to_403() {
        let res = ServerError::from(LedgerError::InvalidPin).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn ledger_validation_maps_to_422() {
        for err in [
            LedgerError::InvalidAmount("x".to_string()),
            LedgerError::InsufficientFunds("x".to_string()),
            LedgerError::WalletFrozen("x".to_string()),
            LedgerError::InvalidTransition("x".to_string()),
            LedgerError::SelfTransfer,
        ] {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn internal_errors_are_masked() {
        let res = ServerError::from(LedgerError::DuplicateReference("boom".to_string()))
            .into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
