//! Pricing configuration for the paid rewrite.
//!
//! One flat price per supported country, charged in that country's
//! currency. Unknown countries and currencies fall back to USD.

use serde::{Deserialize, Serialize};

/// Price point for one country/currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    /// ISO country code this price applies to.
    pub country: String,
    /// Lowercase ISO currency code as the payment gateway expects it.
    pub currency: String,
    /// Amount in minor currency units (cents/pence).
    pub amount_minor_units: u64,
    /// Currency symbol for display.
    pub symbol: String,
    /// Pre-formatted display price.
    pub display: String,
}

/// Pricing table for the rewrite product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Supported price points.
    pub price_points: Vec<PricePoint>,
}

impl PricingConfig {
    /// Look up pricing by ISO country code, falling back to USD.
    #[must_use]
    pub fn for_country(&self, country: &str) -> &PricePoint {
        self.price_points
            .iter()
            .find(|p| p.country.eq_ignore_ascii_case(country))
            .unwrap_or_else(|| self.default_price())
    }

    /// Look up pricing by currency code, falling back to USD.
    #[must_use]
    pub fn for_currency(&self, currency: &str) -> &PricePoint {
        self.price_points
            .iter()
            .find(|p| p.currency.eq_ignore_ascii_case(currency))
            .unwrap_or_else(|| self.default_price())
    }

    /// The USD fallback price point.
    ///
    /// # Panics
    ///
    /// Panics if the table has no USD entry; the default table always has one.
    #[must_use]
    pub fn default_price(&self) -> &PricePoint {
        self.price_points
            .iter()
            .find(|p| p.currency == "usd")
            .expect("pricing table must contain a usd entry")
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_points: vec![
                PricePoint {
                    country: "GB".into(),
                    currency: "gbp".into(),
                    amount_minor_units: 499,
                    symbol: "\u{a3}".into(),
                    display: "\u{a3}4.99".into(),
                },
                PricePoint {
                    country: "US".into(),
                    currency: "usd".into(),
                    amount_minor_units: 499,
                    symbol: "$".into(),
                    display: "$4.99".into(),
                },
                PricePoint {
                    country: "AU".into(),
                    currency: "aud".into(),
                    amount_minor_units: 999,
                    symbol: "A$".into(),
                    display: "A$9.99".into(),
                },
            ],
        }
    }
}
