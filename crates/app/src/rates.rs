//! HTTP implementation of the ledger's `RateProvider`.
//!
//! Expects an exchangerate-style endpoint returning
//! `{"rates": {"USD": 0.0017, ...}}` for `GET {url}?base={code}`. Requests
//! carry a hard timeout; failures surface as `RateProviderError` and the
//! conversion cache degrades to stale/default rates.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use ledger::{Currency, RateProvider, RateProviderError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

pub struct HttpRateProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpRateProvider {
    pub fn new(url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rates(
        &self,
        base: Currency,
    ) -> Result<HashMap<Currency, f64>, RateProviderError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("base", base.code())])
            .send()
            .await
            .map_err(|err| RateProviderError(err.to_string()))?
            .error_for_status()
            .map_err(|err| RateProviderError(err.to_string()))?;

        let parsed: RatesResponse = response
            .json()
            .await
            .map_err(|err| RateProviderError(err.to_string()))?;

        // Unknown codes in the payload are ignored.
        let rates = parsed
            .rates
            .iter()
            .filter_map(|(code, rate)| {
                Currency::try_from(code.as_str())
                    .ok()
                    .map(|currency| (currency, *rate))
            })
            .collect();
        Ok(rates)
    }
}
