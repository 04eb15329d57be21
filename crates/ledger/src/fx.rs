//! Currency conversion and the FX rate cache.
//!
//! [`CurrencyService`] is an explicit instance constructed once per process
//! and passed around; there is no module-level cache. It fetches rates
//! through an injected [`RateProvider`], keeps them for a TTL (one hour by
//! default) and degrades instead of failing: on a fetch error it serves the
//! stale cache if one exists, otherwise a built-in default-rate table.
//!
//! Rate lookups never hold a wallet lock: callers fetch rates before entering
//! any atomic balance scope.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{Currency, Money};

/// Default cache lifetime for fetched rates.
pub const DEFAULT_RATE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
#[error("rate provider error: {0}")]
pub struct RateProviderError(pub String);

/// External FX source. Returns `base -> currency` multipliers for every
/// currency it knows; missing entries fall back to defaults.
#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(
        &self,
        base: Currency,
    ) -> Result<HashMap<Currency, f64>, RateProviderError>;
}

/// Fixed-rate provider for tests and offline deployments.
pub struct StaticRateProvider {
    rates: HashMap<Currency, f64>,
}

impl StaticRateProvider {
    pub fn new(rates: HashMap<Currency, f64>) -> Self {
        Self { rates }
    }

    /// Provider preloaded with the built-in default table.
    #[must_use]
    pub fn defaults(base: Currency) -> Self {
        let rates = Currency::ALL
            .iter()
            .map(|&c| (c, default_rate(base, c)))
            .collect();
        Self { rates }
    }
}

#[async_trait]
impl RateProvider for StaticRateProvider {
    async fn fetch_rates(
        &self,
        _base: Currency,
    ) -> Result<HashMap<Currency, f64>, RateProviderError> {
        Ok(self.rates.clone())
    }
}

/// Hardcoded fallback rates, expressed as `1 XAF -> currency`. Cross rates
/// for other bases are derived from this table.
fn xaf_rate(currency: Currency) -> f64 {
    match currency {
        Currency::Xaf => 1.0,
        // XAF is pegged to EUR at 655.957.
        Currency::Eur => 1.0 / 655.957,
        Currency::Usd => 0.001_70,
        Currency::Gbp => 0.001_31,
        Currency::Ngn => 2.55,
    }
}

/// Fallback rate `base -> target` from the built-in table.
#[must_use]
pub fn default_rate(base: Currency, target: Currency) -> f64 {
    xaf_rate(target) / xaf_rate(base)
}

/// Converts minor units between currencies given a major-unit rate,
/// correcting for the differing minor-unit exponents and rounding to the
/// nearest target minor unit.
#[must_use]
pub fn convert_minor(amount_minor: i64, rate: f64, from: Currency, to: Currency) -> i64 {
    if from == to {
        return amount_minor;
    }
    let from_scale = 10f64.powi(i32::from(from.minor_units()));
    let to_scale = 10f64.powi(i32::from(to.minor_units()));
    let major = amount_minor as f64 / from_scale;
    (major * rate * to_scale).round() as i64
}

/// An exchange rate captured at a point in time.
///
/// Locked onto a record at creation so later rate drift cannot retroactively
/// change historical totals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateLock {
    pub currency: Currency,
    pub rate: f64,
    pub locked_at: DateTime<Utc>,
}

struct RateCache {
    rates: HashMap<Currency, f64>,
    fetched_at: Instant,
}

pub struct CurrencyService {
    base: Currency,
    provider: Arc<dyn RateProvider>,
    ttl: Duration,
    cache: Mutex<Option<RateCache>>,
}

impl CurrencyService {
    pub fn new(base: Currency, provider: Arc<dyn RateProvider>) -> Self {
        Self {
            base,
            provider,
            ttl: DEFAULT_RATE_TTL,
            cache: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn base(&self) -> Currency {
        self.base
    }

    /// Returns the `base -> target` rate, serving the cache when fresh.
    ///
    /// Never fails: a provider error falls back to the stale cache when one
    /// exists, otherwise to the built-in defaults, and is logged as degraded
    /// service.
    pub async fn rate(&self, target: Currency) -> f64 {
        if target == self.base {
            return 1.0;
        }

        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                if let Some(rate) = cached.rates.get(&target) {
                    return *rate;
                }
            }
        }

        match self.provider.fetch_rates(self.base).await {
            Ok(rates) => {
                let rate = rates
                    .get(&target)
                    .copied()
                    .unwrap_or_else(|| default_rate(self.base, target));
                *cache = Some(RateCache {
                    rates,
                    fetched_at: Instant::now(),
                });
                rate
            }
            Err(err) => {
                tracing::warn!(%target, error = %err, "rate fetch failed, serving fallback");
                cache
                    .as_ref()
                    .and_then(|stale| stale.rates.get(&target).copied())
                    .unwrap_or_else(|| default_rate(self.base, target))
            }
        }
    }

    /// Converts a base-currency amount to `target` minor units.
    pub async fn convert(&self, amount_minor: i64, target: Currency) -> Money {
        let rate = self.rate(target).await;
        Money::new(convert_minor(amount_minor, rate, self.base, target))
    }

    /// Formats an amount of minor units in the given currency.
    #[must_use]
    pub fn format(&self, amount_minor: i64, currency: Currency) -> String {
        currency.format_minor(amount_minor)
    }

    /// Captures the current `base -> target` rate for permanent attachment
    /// to a record.
    pub async fn lock_rate(&self, target: Currency) -> RateLock {
        RateLock {
            currency: target,
            rate: self.rate(target).await,
            locked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl RateProvider for FailingProvider {
        async fn fetch_rates(
            &self,
            _base: Currency,
        ) -> Result<HashMap<Currency, f64>, RateProviderError> {
            Err(RateProviderError("connection refused".to_string()))
        }
    }

    struct CountingProvider {
        calls: std::sync::atomic::AtomicUsize,
        rate: f64,
        /// Calls beyond this many fail, simulating a provider outage.
        fail_after: usize,
    }

    impl CountingProvider {
        fn new(rate: f64) -> Self {
            Self {
                calls: std::sync::atomic::AtomicUsize::new(0),
                rate,
                fail_after: usize::MAX,
            }
        }
    }

    #[async_trait]
    impl RateProvider for CountingProvider {
        async fn fetch_rates(
            &self,
            _base: Currency,
        ) -> Result<HashMap<Currency, f64>, RateProviderError> {
            let call = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if call >= self.fail_after {
                return Err(RateProviderError("provider outage".to_string()));
            }
            Ok(HashMap::from([(Currency::Usd, self.rate)]))
        }
    }

    #[tokio::test]
    async fn base_rate_short_circuits_without_provider() {
        let service = CurrencyService::new(Currency::Xaf, Arc::new(FailingProvider));
        assert_eq!(service.rate(Currency::Xaf).await, 1.0);
    }

    #[tokio::test]
    async fn fresh_cache_skips_refetch() {
        let provider = Arc::new(CountingProvider::new(0.002));
        let service = CurrencyService::new(Currency::Xaf, provider.clone());
        assert_eq!(service.rate(Currency::Usd).await, 0.002);
        assert_eq!(service.rate(Currency::Usd).await, 0.002);
        assert_eq!(provider.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_defaults() {
        let service = CurrencyService::new(Currency::Xaf, Arc::new(FailingProvider));
        let rate = service.rate(Currency::Eur).await;
        assert!((rate - default_rate(Currency::Xaf, Currency::Eur)).abs() < 1e-12);
    }

    #[tokio::test]
    async fn expired_cache_is_served_stale_when_provider_dies() {
        let provider = Arc::new(CountingProvider {
            calls: std::sync::atomic::AtomicUsize::new(0),
            rate: 0.002,
            fail_after: 1,
        });
        let service = CurrencyService::new(Currency::Xaf, provider).with_ttl(Duration::ZERO);
        assert_eq!(service.rate(Currency::Usd).await, 0.002);

        // TTL is zero, so this refetches; the provider is now down and the
        // stale cached rate is served instead of the default table.
        assert_eq!(service.rate(Currency::Usd).await, 0.002);
    }

    #[tokio::test]
    async fn convert_round_trips_within_one_minor_unit() {
        let service = CurrencyService::new(
            Currency::Xaf,
            Arc::new(StaticRateProvider::defaults(Currency::Xaf)),
        );
        let amount = 655_957; // 655,957 XAF ≈ 1,000 EUR
        let rate = service.rate(Currency::Eur).await;
        let eur = convert_minor(amount, rate, Currency::Xaf, Currency::Eur);
        let back = convert_minor(eur, 1.0 / rate, Currency::Eur, Currency::Xaf);
        assert!((back - amount).abs() <= 1, "round trip drifted: {back}");
    }

    #[tokio::test]
    async fn identity_conversion_is_exact() {
        let service = CurrencyService::new(Currency::Xaf, Arc::new(FailingProvider));
        assert_eq!(service.convert(12_345, Currency::Xaf).await.minor(), 12_345);
    }

    #[test]
    fn convert_minor_corrects_exponent_difference() {
        // 1000 XAF (0 decimals) at 0.0017 USD/XAF = $1.70 = 170 cents.
        assert_eq!(
            convert_minor(1_000, 0.0017, Currency::Xaf, Currency::Usd),
            170
        );
        // And back with the inverse rate.
        assert_eq!(
            convert_minor(170, 1.0 / 0.0017, Currency::Usd, Currency::Xaf),
            1_000
        );
    }
}
