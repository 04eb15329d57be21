use std::sync::Arc;
use std::time::Duration;

use ledger::{
    Currency, CurrencyService, Ledger, LedgerConfig, LogNotifier, RateProvider,
    StaticRateProvider,
};
use migration::{Migrator, MigratorTrait};
use server::ServerState;

mod rates;
mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "cauris={level},server={level},ledger={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    let config = ledger_config(settings.ledger.as_ref())?;
    let base_currency = config.base_currency;
    let ledger = Ledger::builder()
        .database(db.clone())
        .config(config)
        .notifier(Arc::new(LogNotifier))
        .build()
        .await?;

    let (provider, ttl): (Arc<dyn RateProvider>, Option<Duration>) = match &settings.fx {
        Some(fx) => {
            tracing::info!(url = %fx.url, "using HTTP FX provider");
            let timeout = Duration::from_secs(fx.timeout_secs.unwrap_or(10));
            (
                Arc::new(rates::HttpRateProvider::new(fx.url.clone(), timeout)?),
                fx.ttl_secs.map(Duration::from_secs),
            )
        }
        None => {
            tracing::info!("no FX provider configured, using built-in default rates");
            (Arc::new(StaticRateProvider::defaults(base_currency)), None)
        }
    };
    let mut currency = CurrencyService::new(base_currency, provider);
    if let Some(ttl) = ttl {
        currency = currency.with_ttl(ttl);
    }

    let state = ServerState {
        ledger: Arc::new(ledger),
        currency: Arc::new(currency),
        db,
    };

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(state, listener).await?;

    Ok(())
}

fn ledger_config(
    settings: Option<&settings::LedgerSettings>,
) -> Result<LedgerConfig, Box<dyn std::error::Error + Send + Sync>> {
    let mut config = LedgerConfig::default();
    let Some(settings) = settings else {
        return Ok(config);
    };

    if let Some(code) = settings.currency.as_deref() {
        config.base_currency = Currency::try_from(code).map_err(|err| err.to_string())?;
    }
    if let Some(max) = settings.max_amount_minor {
        config.max_amount_minor = max;
    }
    if let Some(fee) = settings.withdrawal_fee_minor {
        config.withdrawal_fee_minor = fee;
    }
    Ok(config)
}

async fn parse_database(
    database: &str,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match database {
        "memory" => String::from("sqlite::memory:"),
        path => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
