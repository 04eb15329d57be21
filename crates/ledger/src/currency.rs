use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// ISO-like currency code used by wallets and ledger rows.
///
/// Balances are stored in the deployment's **base currency** (default `XAF`);
/// the remaining codes exist as display currencies for conversion and
/// formatting.
///
/// ## Minor units
///
/// The ledger stores monetary values as an `i64` number of **minor units**
/// (see `Money`). `minor_units()` returns how many decimal digits are used
/// when converting between:
/// - major units (human input/output, e.g. `10.50 USD`)
/// - minor units (stored integers, e.g. `1050`)
///
/// XAF carries no subdivision, so its minor unit is the franc itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Xaf,
    Usd,
    Eur,
    Gbp,
    Ngn,
}

impl Currency {
    /// Every currency the conversion service quotes.
    pub const ALL: [Currency; 5] = [
        Currency::Xaf,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Ngn,
    ];

    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Xaf => "XAF",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Ngn => "NGN",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Xaf => 0,
            Currency::Usd | Currency::Eur | Currency::Gbp | Currency::Ngn => 2,
        }
    }

    /// Display symbol. XAF is conventionally written after the amount.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Xaf => "FCFA",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Ngn => "₦",
        }
    }

    const fn symbol_after_amount(self) -> bool {
        matches!(self, Currency::Xaf)
    }

    /// Formats an amount of minor units with the currency's precision and
    /// thousands grouping, e.g. `1234567` → `"$12,345.67"` or `"1,234,567 FCFA"`.
    #[must_use]
    pub fn format_minor(self, amount_minor: i64) -> String {
        let sign = if amount_minor < 0 { "-" } else { "" };
        let abs = amount_minor.unsigned_abs();
        let scale = 10u64.pow(u32::from(self.minor_units()));
        let major = abs / scale;
        let frac = abs % scale;

        let grouped = group_thousands(major);
        let number = if self.minor_units() == 0 {
            grouped
        } else {
            format!(
                "{grouped}.{frac:0width$}",
                width = self.minor_units() as usize
            )
        };

        if self.symbol_after_amount() {
            format!("{sign}{number} {}", self.symbol())
        } else {
            format!("{sign}{}{number}", self.symbol())
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "XAF" => Ok(Currency::Xaf),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "NGN" => Ok(Currency::Ngn),
            other => Err(LedgerError::CurrencyMismatch(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_groups_thousands_and_applies_precision() {
        assert_eq!(Currency::Xaf.format_minor(0), "0 FCFA");
        assert_eq!(Currency::Xaf.format_minor(2500), "2,500 FCFA");
        assert_eq!(Currency::Xaf.format_minor(1_234_567), "1,234,567 FCFA");
        assert_eq!(Currency::Usd.format_minor(1), "$0.01");
        assert_eq!(Currency::Usd.format_minor(1_234_567), "$12,345.67");
        assert_eq!(Currency::Eur.format_minor(-1050), "-€10.50");
        assert_eq!(Currency::Ngn.format_minor(200_000), "₦2,000.00");
    }

    #[test]
    fn format_output_parses_back() {
        let amount = 9_876_543;
        for currency in Currency::ALL {
            let formatted = currency.format_minor(amount);
            let bare: String = formatted
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            let parsed = crate::Money::parse(&bare, currency).unwrap();
            assert_eq!(parsed.minor(), amount, "round-trip failed for {currency}");
        }
    }

    #[test]
    fn codes_round_trip() {
        for currency in Currency::ALL {
            assert_eq!(Currency::try_from(currency.code()).unwrap(), currency);
        }
        assert!(Currency::try_from("KES").is_err());
    }
}
