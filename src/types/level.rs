use rust_decimal::Decimal;
use serde::Deserialize;

/// A raw `(price, quantity)` entry from an exchange snapshot.
///
/// Exchanges send levels as `["price", "qty"]` string pairs; both parse straight into
/// [`Decimal`] so no precision is lost before bucketing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "(Decimal, Decimal)")]
pub struct PriceLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}

impl PriceLevel {
    #[inline]
    pub fn new(price: Decimal, quantity: Decimal) -> Self {
        Self { price, quantity }
    }
}

impl From<(Decimal, Decimal)> for PriceLevel {
    fn from((price, quantity): (Decimal, Decimal)) -> Self {
        Self { price, quantity }
    }
}

/// One bucket after aggregation: its label price and the summed quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatedLevel {
    pub price: Decimal,
    pub quantity: Decimal,
}
