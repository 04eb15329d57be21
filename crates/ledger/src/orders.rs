//! Order pricing with a locked exchange rate.
//!
//! An order captures its exchange rate exactly once, at creation. The
//! display-currency equivalents are computed from that [`RateLock`] and
//! stored; re-displaying the order later never consults the live cache, so
//! historical totals cannot drift with the market.

use chrono::{DateTime, Utc};

use crate::fx::{CurrencyService, RateLock, convert_minor};
use crate::{Currency, LedgerError, ResultLedger};

/// Base-currency amounts making up an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal_minor: i64,
    pub shipping_fee_minor: i64,
}

impl OrderTotals {
    pub fn new(subtotal_minor: i64, shipping_fee_minor: i64) -> ResultLedger<Self> {
        if subtotal_minor < 0 || shipping_fee_minor < 0 {
            return Err(LedgerError::InvalidAmount(
                "order amounts must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            subtotal_minor,
            shipping_fee_minor,
        })
    }

    #[must_use]
    pub fn total_minor(&self) -> i64 {
        self.subtotal_minor + self.shipping_fee_minor
    }
}

/// An order with its display-currency amounts frozen at creation time.
#[derive(Clone, Debug, PartialEq)]
pub struct PricedOrder {
    /// Amounts in the base currency, the accounting source of truth.
    pub totals: OrderTotals,
    pub currency: Currency,
    pub display_currency: Currency,
    /// The locked `base -> display` rate; never refreshed.
    pub exchange_rate: f64,
    pub rate_locked_at: DateTime<Utc>,
    pub display_subtotal_minor: i64,
    pub display_shipping_fee_minor: i64,
    pub display_total_minor: i64,
}

impl PricedOrder {
    /// Prices an order against a captured rate lock. Called exactly once per
    /// order.
    #[must_use]
    pub fn price(totals: OrderTotals, base: Currency, lock: &RateLock) -> Self {
        let convert = |minor| convert_minor(minor, lock.rate, base, lock.currency);
        Self {
            totals,
            currency: base,
            display_currency: lock.currency,
            exchange_rate: lock.rate,
            rate_locked_at: lock.locked_at,
            display_subtotal_minor: convert(totals.subtotal_minor),
            display_shipping_fee_minor: convert(totals.shipping_fee_minor),
            display_total_minor: convert(totals.total_minor()),
        }
    }
}

impl CurrencyService {
    /// Locks the current rate and prices `totals` for display. The returned
    /// order is self-contained: later cache refreshes do not affect it.
    pub async fn price_order(
        &self,
        totals: OrderTotals,
        display_currency: Currency,
    ) -> PricedOrder {
        let lock = self.lock_rate(display_currency).await;
        PricedOrder::price(totals, self.base(), &lock)
    }
}
